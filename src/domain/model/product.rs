use crate::domain::error::DomainError;
use crate::domain::model::{CategoryId, Money, ProductId, ProductSnapshot};

/// 商品エンティティ
/// 在庫数の台帳として、ガード付きの減算と無条件の加算を提供する
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Money,
    stock: u32,
    category_id: Option<CategoryId>,
}

impl Product {
    /// データベースから取得したデータで商品を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: ProductId,
        name: String,
        description: Option<String>,
        price: Money,
        stock: u32,
        category_id: Option<CategoryId>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            price,
            stock,
            category_id,
        }
    }

    /// 商品IDを取得
    pub fn id(&self) -> ProductId {
        self.id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 商品説明を取得
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 単価を取得
    pub fn price(&self) -> Money {
        self.price
    }

    /// 在庫数を取得
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// カテゴリIDを取得
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }

    /// 在庫を引き当てる
    ///
    /// # Arguments
    /// * `quantity` - 引き当てる数量
    ///
    /// # Returns
    /// * `Ok(())` - 引き当て成功
    /// * `Err(DomainError::InsufficientStock)` - 在庫不足（在庫数は変化しない）
    pub fn reserve(&mut self, quantity: u32) -> Result<(), DomainError> {
        if !self.has_available_stock(quantity) {
            return Err(DomainError::InsufficientStock(self.name.clone()));
        }
        self.stock -= quantity;
        Ok(())
    }

    /// 在庫を戻す（キャンセル時など）
    /// 戻す数量は過去に引き当てた数量を超えないため、上限チェックは行わない
    ///
    /// # Arguments
    /// * `quantity` - 戻す数量
    pub fn release(&mut self, quantity: u32) {
        self.stock += quantity;
    }

    /// 指定された数量の在庫が利用可能かチェック
    pub fn has_available_stock(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// 読み取りモデル用のスナップショットを作成
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot::new(self.name.clone(), self.price)
    }
}

/// 新規登録用の商品ドラフト
/// IDはデータベースの採番に委ねるため持たない
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    name: String,
    description: Option<String>,
    price: Money,
    stock: u32,
    category_id: Option<CategoryId>,
}

impl NewProduct {
    /// 新しい商品ドラフトを作成
    /// バリデーション:
    /// - 商品名は空でない必要がある
    /// - 価格は負でない必要がある
    pub fn new(
        name: String,
        description: Option<String>,
        price: Money,
        stock: u32,
        category_id: Option<CategoryId>,
    ) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidValue(
                "商品名は空にできません".to_string(),
            ));
        }
        if price.amount() < 0 {
            return Err(DomainError::InvalidValue(
                "価格は負にできません".to_string(),
            ));
        }
        Ok(Self {
            name,
            description,
            price,
            stock,
            category_id,
        })
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 商品説明を取得
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 単価を取得
    pub fn price(&self) -> Money {
        self.price
    }

    /// 初期在庫数を取得
    pub fn stock(&self) -> u32 {
        self.stock
    }

    /// カテゴリIDを取得
    pub fn category_id(&self) -> Option<CategoryId> {
        self.category_id
    }
}
