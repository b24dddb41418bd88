// 出力ポート
// ドメイン層が外部に依存する機能をトレイトとして定義
// アダプター層でこれらのトレイトを実装する

use crate::domain::model::{NewProduct, Order, OrderId, OrderLine, Product, ProductId, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use uuid::Uuid;

/// ロガートレイト
/// ログ出力を抽象化するポート
pub trait Logger: Send + Sync {
    /// デバッグレベルのログを出力
    fn debug(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 情報レベルのログを出力
    fn info(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// 警告レベルのログを出力
    fn warn(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );

    /// エラーレベルのログを出力
    fn error(
        &self,
        component: &str,
        message: &str,
        correlation_id: Option<Uuid>,
        context: Option<HashMap<String, String>>,
    );
}

/// リポジトリエラー型
/// 永続化層の操作で発生するエラーを表現する
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::enum_variant_names)]
pub enum RepositoryError {
    /// データベース接続に失敗
    ConnectionFailed(String),
    /// 操作に失敗
    OperationFailed(String),
    /// データの取得に失敗
    FetchFailed(String),
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::ConnectionFailed(msg) => write!(f, "Connection failed: {}", msg),
            RepositoryError::OperationFailed(msg) => write!(f, "Operation failed: {}", msg),
            RepositoryError::FetchFailed(msg) => write!(f, "Fetch failed: {}", msg),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// ユニットオブワークトレイト
/// 注文の作成・キャンセルに伴う一連の変更を、すべて成功したときだけ
/// コミットする単位としてまとめる。`commit`を呼ばずにdropした場合、
/// それまでの変更はすべてロールバックされる
#[async_trait]
pub trait UnitOfWork: Send {
    /// 注文ヘッダーを挿入し、採番された注文IDを返す
    ///
    /// # Arguments
    /// * `user_id` - 注文するユーザーのID
    async fn insert_order(&mut self, user_id: UserId) -> Result<OrderId, RepositoryError>;

    /// 商品を取得する
    /// 同じ商品に対する並行した注文を直列化するため、
    /// 実装はトランザクション終了まで有効な行ロックを取得する
    ///
    /// # Returns
    /// * `Ok(Some(Product))` - 商品が見つかった
    /// * `Ok(None)` - 商品が存在しない
    async fn find_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError>;

    /// 商品の在庫数を保存する
    async fn save_product_stock(&mut self, product: &Product) -> Result<(), RepositoryError>;

    /// 注文明細を挿入する
    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &OrderLine,
    ) -> Result<(), RepositoryError>;

    /// 注文IDとユーザーIDの組で注文を取得する
    /// 他のユーザーの注文は存在しない注文と同様にNoneを返す
    async fn find_order_by_id_and_user(
        &mut self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError>;

    /// 注文のすべての明細を削除する
    async fn delete_order_lines(&mut self, order_id: OrderId) -> Result<(), RepositoryError>;

    /// 注文ヘッダーを削除する
    async fn delete_order(&mut self, order_id: OrderId) -> Result<(), RepositoryError>;

    /// ここまでの変更をすべてコミットする
    async fn commit(self: Box<Self>) -> Result<(), RepositoryError>;
}

/// ユニットオブワークファクトリトレイト
/// 新しいユニットオブワークを開始する
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 新しいユニットオブワークを開始する
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError>;
}

/// 注文リポジトリトレイト
/// 注文集約の読み取りを抽象化する。明細には商品スナップショットが付与される
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 指定されたユーザーのすべての注文を取得する
    /// 作成日時の降順で並べて返す
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// 注文IDとユーザーIDの組で注文を検索する
    ///
    /// # Returns
    /// * `Ok(Some(Order))` - 注文が見つかった
    /// * `Ok(None)` - 注文が存在しないか、他のユーザーのもの
    async fn find_by_id_and_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError>;
}

/// 商品リポジトリトレイト
/// 商品カタログ側の永続化を抽象化する
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 商品を登録し、採番された商品IDを返す
    async fn insert(&self, product: &NewProduct) -> Result<ProductId, RepositoryError>;

    /// 商品IDで商品を検索する
    async fn find_by_id(&self, product_id: ProductId)
        -> Result<Option<Product>, RepositoryError>;

    /// すべての商品を取得する
    /// 商品IDの昇順で並べて返す
    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;

    /// 商品を削除する
    /// 既存の注文明細には影響しない
    ///
    /// # Returns
    /// * `Ok(true)` - 削除した
    /// * `Ok(false)` - 商品が存在しなかった
    async fn delete(&self, product_id: ProductId) -> Result<bool, RepositoryError>;
}
