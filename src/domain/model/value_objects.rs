use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};

use std::fmt;

/// 注文の一意識別子
/// データベースの自動採番によって払い出される
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderId(u64);

impl OrderId {
    /// u64からOrderIdを作成
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 商品の一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(u64);

impl ProductId {
    /// u64からProductIdを作成
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ユーザーの一意識別子
/// 認証は上流で検証済みであり、このサービスでは不透明な識別子として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(u64);

impl UserId {
    /// u64からUserIdを作成
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// カテゴリの一意識別子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(u64);

impl CategoryId {
    /// u64からCategoryIdを作成
    pub fn from_u64(value: u64) -> Self {
        Self(value)
    }

    /// 内部の値を取得
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 通貨
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// ブラジルレアル
    #[allow(clippy::upper_case_acronyms)]
    BRL,
}

/// 金額を表す値オブジェクト
/// 端数誤差を避けるためセンタボ単位の整数で保持する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// 金額と通貨から作成
    pub fn new(amount: i64, currency: String) -> Result<Self, DomainError> {
        let currency = match currency.as_str() {
            "BRL" => Currency::BRL,
            _ => {
                return Err(DomainError::InvalidValue(format!(
                    "サポートされていない通貨: {}",
                    currency
                )))
            }
        };
        Ok(Self { amount, currency })
    }

    /// ブラジルレアルの金額を作成
    pub fn brl(amount: i64) -> Self {
        Self {
            amount,
            currency: Currency::BRL,
        }
    }

    /// 金額を取得
    pub fn amount(&self) -> i64 {
        self.amount
    }

    /// 通貨を文字列として取得
    pub fn currency(&self) -> String {
        match self.currency {
            Currency::BRL => "BRL".to_string(),
        }
    }

    /// 金額を加算
    pub fn add(&self, other: &Money) -> Result<Money, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch);
        }
        Ok(Money {
            amount: self.amount + other.amount,
            currency: self.currency,
        })
    }

    /// 金額を乗算
    pub fn multiply(&self, factor: u32) -> Money {
        Money {
            amount: self.amount * factor as i64,
            currency: self.currency,
        }
    }
}

/// 注文明細が参照する商品のスナップショット
/// 読み取り時にJOINで取得される。商品が削除済みの場合は存在しない
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    name: String,
    price: Money,
}

impl ProductSnapshot {
    /// 新しいスナップショットを作成
    pub fn new(name: String, price: Money) -> Self {
        Self { name, price }
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 単価を取得
    pub fn price(&self) -> Money {
        self.price
    }
}

/// 注文明細を表す値オブジェクト
/// 同一注文内で同じ商品を参照する明細が複数存在してもよい
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    product_id: ProductId,
    quantity: u32,
    product: Option<ProductSnapshot>,
}

impl OrderLine {
    /// 新しい注文明細を作成
    /// 数量は1以上である必要がある
    pub fn new(product_id: ProductId, quantity: u32) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            product_id,
            quantity,
            product: None,
        })
    }

    /// データベースから取得したデータで注文明細を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        product_id: ProductId,
        quantity: u32,
        product: Option<ProductSnapshot>,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            product_id,
            quantity,
            product,
        })
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// 商品スナップショットを取得
    /// 商品が削除済みの場合はNone
    pub fn product(&self) -> Option<&ProductSnapshot> {
        self.product.as_ref()
    }

    /// 小計を計算（単価 × 数量）
    /// 商品が削除済みで単価が不明な場合はNone
    pub fn subtotal(&self) -> Option<Money> {
        self.product.as_ref().map(|p| p.price().multiply(self.quantity))
    }
}
