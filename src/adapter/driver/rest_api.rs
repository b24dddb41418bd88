use axum::{
    async_trait,
    extract::rejection::JsonRejection,
    extract::{FromRequestParts, Path, State},
    http::request::Parts,
    http::StatusCode,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::application::service::{
    OrderApplicationService, OrderLineRequest, OrderQueryService, ProductApplicationService,
};
use crate::application::ApplicationError;
use crate::adapter::driver::request_dto::{CreateOrderRequest, CreateProductRequest};
use crate::adapter::driver::response_dto::{
    OrderDetailResponse, OrderSummaryResponse, ProductResponse,
};
use crate::domain::model::{CategoryId, OrderId, ProductId, UserId};
use crate::domain::port::Logger;

// REST API用のレスポンスDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub product_id: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

// アプリケーションサービスを含む状態
pub type AppState = AppStateInner;

#[derive(Clone)]
pub struct AppStateInner {
    pub order_service: Arc<OrderApplicationService>,
    pub order_query_service: Arc<OrderQueryService>,
    pub product_service: Arc<ProductApplicationService>,
    pub logger: Arc<dyn Logger>,
}

/// 認証済みユーザー
/// 認証トークンの検証は上流のゲートウェイで行われており、
/// 検証済みのユーザーIDが X-User-Id ヘッダーで渡される
pub struct AuthenticatedUser(pub UserId);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ApiError>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());

        match user_id {
            Some(user_id) => Ok(AuthenticatedUser(UserId::from_u64(user_id))),
            None => Err((
                StatusCode::UNAUTHORIZED,
                Json(ApiError {
                    error: "認証されていないリクエストです".to_string(),
                    code: "UNAUTHORIZED".to_string(),
                }),
            )),
        }
    }
}

// REST APIルーターを作成
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/orders", post(create_order))
        .route("/orders", get(get_orders))
        .route("/orders/:order_id", get(get_order_by_id))
        .route("/orders/:order_id", delete(cancel_order))
        .route("/products", post(create_product))
        .route("/products", get(get_products))
        .route("/products/:product_id", get(get_product_by_id))
        .route("/products/:product_id", delete(delete_product))
}

// ヘルスチェックエンドポイント
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "ecommerce-order-management",
        "version": "0.1.0"
    }))
}

// 注文作成エンドポイント
async fn create_order(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), (StatusCode, Json<ApiError>)> {
    // 配列でないボディなどの形式エラーはここで弾く
    let Json(request) = payload.map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: "リクエストボディの形式が不正です".to_string(),
                code: "INVALID_REQUEST".to_string(),
            }),
        )
    })?;

    let line_requests: Vec<OrderLineRequest> = request
        .products
        .iter()
        .map(|line| OrderLineRequest {
            product_id: ProductId::from_u64(line.product_id),
            quantity: line.quantity,
        })
        .collect();

    match state.order_service.place_order(user_id, line_requests).await {
        Ok(order_id) => Ok((
            StatusCode::CREATED,
            Json(CreateOrderResponse {
                order_id: order_id.as_u64(),
            }),
        )),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 注文一覧取得エンドポイント
async fn get_orders(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<Vec<OrderSummaryResponse>>, (StatusCode, Json<ApiError>)> {
    match state.order_query_service.list_orders(user_id).await {
        Ok(orders) => {
            let response: Vec<OrderSummaryResponse> = orders
                .iter()
                .map(OrderSummaryResponse::from_order)
                .collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 注文詳細取得エンドポイント
async fn get_order_by_id(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(order_id): Path<u64>,
) -> Result<Json<OrderDetailResponse>, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_u64(order_id);

    match state.order_query_service.get_order(user_id, order_id).await {
        Ok(order) => Ok(Json(OrderDetailResponse::from_order(&order))),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 注文キャンセルエンドポイント
// キャンセルは状態遷移ではなく注文の完全な削除であり、成功時はボディを返さない
async fn cancel_order(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Path(order_id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let order_id = OrderId::from_u64(order_id);

    match state.order_service.cancel_order(user_id, order_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 商品登録エンドポイント（カタログ管理用）
async fn create_product(
    State(state): State<AppState>,
    Json(request): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<CreateProductResponse>), (StatusCode, Json<ApiError>)> {
    let result = state
        .product_service
        .create_product(
            request.name,
            request.description,
            request.price_cents,
            request.stock,
            request.category_id.map(CategoryId::from_u64),
        )
        .await;

    match result {
        Ok(product_id) => Ok((
            StatusCode::CREATED,
            Json(CreateProductResponse {
                product_id: product_id.as_u64(),
            }),
        )),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 商品一覧取得エンドポイント
async fn get_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, (StatusCode, Json<ApiError>)> {
    match state.product_service.get_all_products().await {
        Ok(products) => {
            let response: Vec<ProductResponse> =
                products.iter().map(ProductResponse::from_product).collect();
            Ok(Json(response))
        }
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 商品詳細取得エンドポイント
async fn get_product_by_id(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> Result<Json<ProductResponse>, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_u64(product_id);

    match state.product_service.get_product(product_id).await {
        Ok(product) => Ok(Json(ProductResponse::from_product(&product))),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// 商品削除エンドポイント
async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<u64>,
) -> Result<StatusCode, (StatusCode, Json<ApiError>)> {
    let product_id = ProductId::from_u64(product_id);

    match state.product_service.delete_product(product_id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(err) => Err(map_application_error(state.logger.as_ref(), err)),
    }
}

// アプリケーションエラーをHTTPエラーにマッピング
// 内部エラーの詳細はログにだけ残し、レスポンスには漏らさない
fn map_application_error(
    logger: &dyn Logger,
    err: ApplicationError,
) -> (StatusCode, Json<ApiError>) {
    match err {
        ApplicationError::InvalidRequest(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INVALID_REQUEST".to_string(),
            }),
        ),
        ApplicationError::ProductNotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "PRODUCT_NOT_FOUND".to_string(),
            }),
        ),
        ApplicationError::InsufficientStock(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiError {
                error: msg,
                code: "INSUFFICIENT_STOCK".to_string(),
            }),
        ),
        ApplicationError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiError {
                error: msg,
                code: "NOT_FOUND".to_string(),
            }),
        ),
        ApplicationError::Internal(detail) => {
            let mut context = HashMap::new();
            context.insert("error".to_string(), detail);
            logger.error("RestApi", "内部エラーが発生しました", None, Some(context));
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "内部エラーが発生しました".to_string(),
                    code: "INTERNAL_ERROR".to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    struct NoopLogger;

    impl Logger for NoopLogger {
        fn debug(
            &self,
            _: &str,
            _: &str,
            _: Option<Uuid>,
            _: Option<HashMap<String, String>>,
        ) {
        }
        fn info(
            &self,
            _: &str,
            _: &str,
            _: Option<Uuid>,
            _: Option<HashMap<String, String>>,
        ) {
        }
        fn warn(
            &self,
            _: &str,
            _: &str,
            _: Option<Uuid>,
            _: Option<HashMap<String, String>>,
        ) {
        }
        fn error(
            &self,
            _: &str,
            _: &str,
            _: Option<Uuid>,
            _: Option<HashMap<String, String>>,
        ) {
        }
    }

    #[test]
    fn test_map_application_error_not_found() {
        let err = ApplicationError::NotFound("注文が見つかりません".to_string());
        let (status, Json(api_error)) = map_application_error(&NoopLogger, err);

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.code, "NOT_FOUND");
        assert_eq!(api_error.error, "注文が見つかりません");
    }

    #[test]
    fn test_map_application_error_insufficient_stock() {
        let err = ApplicationError::InsufficientStock("在庫が不足しています: Livro".to_string());
        let (status, Json(api_error)) = map_application_error(&NoopLogger, err);

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.code, "INSUFFICIENT_STOCK");
        assert!(api_error.error.contains("Livro"));
    }

    #[test]
    fn test_map_application_error_internal_is_opaque() {
        let err = ApplicationError::Internal("connection refused at 10.0.0.5".to_string());
        let (status, Json(api_error)) = map_application_error(&NoopLogger, err);

        // 内部の詳細はレスポンスに含まれない
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.code, "INTERNAL_ERROR");
        assert!(!api_error.error.contains("10.0.0.5"));
    }

    #[test]
    fn test_api_error_structure() {
        let api_error = ApiError {
            error: "テストエラー".to_string(),
            code: "TEST_ERROR".to_string(),
        };

        let json = serde_json::to_string(&api_error).unwrap();
        assert!(json.contains("テストエラー"));
        assert!(json.contains("TEST_ERROR"));

        let deserialized: ApiError = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.error, "テストエラー");
        assert_eq!(deserialized.code, "TEST_ERROR");
    }
}
