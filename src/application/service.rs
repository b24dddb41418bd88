pub mod order_query_service;
pub mod product_service;

pub use order_query_service::OrderQueryService;
pub use product_service::ProductApplicationService;

use crate::application::ApplicationError;
use crate::domain::model::{OrderId, OrderLine, ProductId, UserId};
use crate::domain::port::{Logger, RepositoryError, UnitOfWorkFactory};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// 注文が存在しない場合と他のユーザーの注文だった場合は
/// 同一のエラーメッセージを返し、所有関係を漏らさない
pub(crate) const ORDER_NOT_FOUND_MESSAGE: &str =
    "注文が見つからないか、このユーザーのものではありません";

/// 注文明細のリクエスト
/// 数量が未指定または0の場合は1として扱う
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
}

impl OrderLineRequest {
    /// 実際に注文する数量を返す
    fn normalized_quantity(&self) -> u32 {
        self.quantity.filter(|&q| q > 0).unwrap_or(1)
    }
}

/// 注文アプリケーションサービス
/// 注文の作成とキャンセルを、1つのユニットオブワークとして実行する
pub struct OrderApplicationService {
    uow_factory: Arc<dyn UnitOfWorkFactory>,
    logger: Arc<dyn Logger>,
}

impl OrderApplicationService {
    const COMPONENT: &'static str = "OrderApplicationService";

    /// 新しい注文アプリケーションサービスを作成
    ///
    /// # Arguments
    /// * `uow_factory` - ユニットオブワークファクトリ
    /// * `logger` - ロガー
    pub fn new(uow_factory: Arc<dyn UnitOfWorkFactory>, logger: Arc<dyn Logger>) -> Self {
        Self {
            uow_factory,
            logger,
        }
    }

    /// 新しい注文を作成
    ///
    /// 各明細リクエストを受け取った順に処理する。同一商品への複数の明細は
    /// 直前の明細による在庫の減少を観測した上でチェックされる。
    /// いずれかの明細で失敗した場合、注文全体が破棄され、
    /// 在庫の減少も一切残らない
    ///
    /// # Arguments
    /// * `user_id` - 注文するユーザーのID（上流で検証済み）
    /// * `line_requests` - 注文明細リクエストのリスト
    ///
    /// # Returns
    /// * `Ok(OrderId)` - 作成された注文のID
    /// * `Err(ApplicationError)` - 作成失敗
    pub async fn place_order(
        &self,
        user_id: UserId,
        line_requests: Vec<OrderLineRequest>,
    ) -> Result<OrderId, ApplicationError> {
        if line_requests.is_empty() {
            return Err(ApplicationError::InvalidRequest(
                "注文する商品を1件以上指定してください".to_string(),
            ));
        }

        let correlation_id = Uuid::new_v4();

        // 注文ヘッダー、在庫の引き当て、注文明細を1つのユニットオブワークで扱う。
        // エラーで早期リターンした場合はコミットされず、すべてロールバックされる
        let mut uow = self
            .uow_factory
            .begin()
            .await
            .map_err(|e| self.internal(correlation_id, "ユニットオブワークの開始に失敗しました", &e))?;

        let order_id = uow
            .insert_order(user_id)
            .await
            .map_err(|e| self.internal(correlation_id, "注文ヘッダーの作成に失敗しました", &e))?;

        for request in &line_requests {
            let quantity = request.normalized_quantity();

            let mut product = uow
                .find_product(request.product_id)
                .await
                .map_err(|e| self.internal(correlation_id, "商品の取得に失敗しました", &e))?
                .ok_or_else(|| {
                    ApplicationError::ProductNotFound(format!(
                        "商品ID {} が見つかりません",
                        request.product_id
                    ))
                })?;

            product.reserve(quantity).map_err(ApplicationError::from)?;

            uow.save_product_stock(&product)
                .await
                .map_err(|e| self.internal(correlation_id, "在庫の保存に失敗しました", &e))?;

            let line = OrderLine::new(request.product_id, quantity)?;
            uow.insert_order_line(order_id, &line)
                .await
                .map_err(|e| self.internal(correlation_id, "注文明細の保存に失敗しました", &e))?;
        }

        uow.commit()
            .await
            .map_err(|e| self.internal(correlation_id, "注文のコミットに失敗しました", &e))?;

        let mut context = HashMap::new();
        context.insert("order_id".to_string(), order_id.to_string());
        context.insert("user_id".to_string(), user_id.to_string());
        self.logger.info(
            Self::COMPONENT,
            "注文を作成しました",
            Some(correlation_id),
            Some(context),
        );

        Ok(order_id)
    }

    /// 注文をキャンセル
    ///
    /// 各明細の数量を商品在庫へ戻した上で、明細と注文ヘッダーを削除する。
    /// 注文後に削除された商品への明細は、在庫の戻し先が存在しないためスキップする
    ///
    /// # Arguments
    /// * `user_id` - キャンセルを要求したユーザーのID
    /// * `order_id` - キャンセルする注文のID
    ///
    /// # Returns
    /// * `Ok(())` - キャンセル成功
    /// * `Err(ApplicationError::NotFound)` - 注文が存在しないか、他のユーザーのもの
    pub async fn cancel_order(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<(), ApplicationError> {
        let correlation_id = Uuid::new_v4();

        let mut uow = self
            .uow_factory
            .begin()
            .await
            .map_err(|e| self.internal(correlation_id, "ユニットオブワークの開始に失敗しました", &e))?;

        let order = uow
            .find_order_by_id_and_user(order_id, user_id)
            .await
            .map_err(|e| self.internal(correlation_id, "注文の取得に失敗しました", &e))?
            .ok_or_else(|| ApplicationError::NotFound(ORDER_NOT_FOUND_MESSAGE.to_string()))?;

        for line in order.order_lines() {
            let product = uow
                .find_product(line.product_id())
                .await
                .map_err(|e| self.internal(correlation_id, "商品の取得に失敗しました", &e))?;

            match product {
                Some(mut product) => {
                    product.release(line.quantity());
                    uow.save_product_stock(&product)
                        .await
                        .map_err(|e| self.internal(correlation_id, "在庫の保存に失敗しました", &e))?;
                }
                // 商品が削除済みの場合は在庫を戻さない
                None => continue,
            }
        }

        uow.delete_order_lines(order.id())
            .await
            .map_err(|e| self.internal(correlation_id, "注文明細の削除に失敗しました", &e))?;
        uow.delete_order(order.id())
            .await
            .map_err(|e| self.internal(correlation_id, "注文ヘッダーの削除に失敗しました", &e))?;

        uow.commit()
            .await
            .map_err(|e| self.internal(correlation_id, "キャンセルのコミットに失敗しました", &e))?;

        let mut context = HashMap::new();
        context.insert("order_id".to_string(), order_id.to_string());
        context.insert("user_id".to_string(), user_id.to_string());
        self.logger.info(
            Self::COMPONENT,
            "注文をキャンセルしました",
            Some(correlation_id),
            Some(context),
        );

        Ok(())
    }

    /// 永続化層のエラーをログに残し、詳細を含まない内部エラーへ変換する
    fn internal(
        &self,
        correlation_id: Uuid,
        message: &str,
        err: &RepositoryError,
    ) -> ApplicationError {
        let mut context = HashMap::new();
        context.insert("error".to_string(), err.to_string());
        self.logger.error(
            Self::COMPONENT,
            message,
            Some(correlation_id),
            Some(context),
        );
        ApplicationError::Internal(message.to_string())
    }
}
