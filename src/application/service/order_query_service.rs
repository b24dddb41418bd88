use crate::application::service::ORDER_NOT_FOUND_MESSAGE;
use crate::application::ApplicationError;
use crate::domain::model::{Order, OrderId, UserId};
use crate::domain::port::OrderRepository;
use std::sync::Arc;

/// 注文クエリサービス
/// 読み取り専用の注文操作を提供する。
/// 結果は常に要求したユーザーの注文に限定される
pub struct OrderQueryService {
    order_repository: Arc<dyn OrderRepository>,
}

impl OrderQueryService {
    /// 新しい注文クエリサービスを作成
    ///
    /// # Arguments
    /// * `order_repository` - 注文リポジトリ
    pub fn new(order_repository: Arc<dyn OrderRepository>) -> Self {
        Self { order_repository }
    }

    /// 指定されたユーザーのすべての注文を取得
    /// 作成日時の降順で並べて返す
    ///
    /// # Arguments
    /// * `user_id` - 注文を取得するユーザーのID
    pub async fn list_orders(&self, user_id: UserId) -> Result<Vec<Order>, ApplicationError> {
        self.order_repository
            .find_by_user(user_id)
            .await
            .map_err(ApplicationError::from)
    }

    /// 注文IDで注文を取得
    /// 注文が存在しない場合と他のユーザーの注文だった場合は
    /// 区別できない同一のNotFoundを返す
    ///
    /// # Arguments
    /// * `user_id` - 要求したユーザーのID
    /// * `order_id` - 注文ID
    pub async fn get_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, ApplicationError> {
        self.order_repository
            .find_by_id_and_user(order_id, user_id)
            .await
            .map_err(ApplicationError::from)?
            .ok_or_else(|| ApplicationError::NotFound(ORDER_NOT_FOUND_MESSAGE.to_string()))
    }
}
