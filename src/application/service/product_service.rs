use crate::application::ApplicationError;
use crate::domain::model::{CategoryId, Money, NewProduct, Product, ProductId};
use crate::domain::port::ProductRepository;
use std::sync::Arc;

/// 商品アプリケーションサービス
/// 在庫の持ち主であるカタログ側の最小限の管理操作を提供する
pub struct ProductApplicationService {
    product_repository: Arc<dyn ProductRepository>,
}

impl ProductApplicationService {
    /// 新しい商品アプリケーションサービスを作成
    pub fn new(product_repository: Arc<dyn ProductRepository>) -> Self {
        Self { product_repository }
    }

    /// 新しい商品を登録
    ///
    /// # Arguments
    /// * `name` - 商品名（空は不可）
    /// * `description` - 商品説明
    /// * `price_cents` - 単価（負は不可）
    /// * `stock` - 初期在庫数
    /// * `category_id` - カテゴリID
    ///
    /// # Returns
    /// * `Ok(ProductId)` - 登録された商品のID
    pub async fn create_product(
        &self,
        name: String,
        description: Option<String>,
        price_cents: i64,
        stock: u32,
        category_id: Option<CategoryId>,
    ) -> Result<ProductId, ApplicationError> {
        let product = NewProduct::new(name, description, Money::brl(price_cents), stock, category_id)?;
        self.product_repository
            .insert(&product)
            .await
            .map_err(ApplicationError::from)
    }

    /// 商品IDで商品を取得
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ApplicationError> {
        self.product_repository
            .find_by_id(product_id)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| {
                ApplicationError::NotFound(format!("商品ID {} が見つかりません", product_id))
            })
    }

    /// すべての商品を取得
    /// 商品IDの昇順で並べて返す
    pub async fn get_all_products(&self) -> Result<Vec<Product>, ApplicationError> {
        self.product_repository
            .find_all()
            .await
            .map_err(ApplicationError::from)
    }

    /// 商品を削除
    /// 既存の注文明細はそのまま残る
    pub async fn delete_product(&self, product_id: ProductId) -> Result<(), ApplicationError> {
        let deleted = self
            .product_repository
            .delete(product_id)
            .await
            .map_err(ApplicationError::from)?;
        if !deleted {
            return Err(ApplicationError::NotFound(format!(
                "商品ID {} が見つかりません",
                product_id
            )));
        }
        Ok(())
    }
}
