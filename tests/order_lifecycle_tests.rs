// 注文のライフサイクル全体を、インメモリストアに対して
// アプリケーションサービス経由で検証する統合テスト

use ecommerce_order_management::adapter::driven::InMemoryStore;
use ecommerce_order_management::application::service::{
    OrderApplicationService, OrderLineRequest, OrderQueryService,
};
use ecommerce_order_management::application::ApplicationError;
use ecommerce_order_management::domain::model::{
    Money, NewProduct, OrderId, ProductId, UserId,
};
use ecommerce_order_management::domain::port::{Logger, ProductRepository};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

struct NoopLogger;

impl Logger for NoopLogger {
    fn debug(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn info(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn warn(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
    fn error(&self, _: &str, _: &str, _: Option<Uuid>, _: Option<HashMap<String, String>>) {}
}

struct TestContext {
    store: InMemoryStore,
    order_service: OrderApplicationService,
    query_service: OrderQueryService,
}

impl TestContext {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let order_service = OrderApplicationService::new(
            Arc::new(store.clone()),
            Arc::new(NoopLogger),
        );
        let query_service = OrderQueryService::new(Arc::new(store.clone()));
        Self {
            store,
            order_service,
            query_service,
        }
    }

    async fn add_product(&self, name: &str, price_cents: i64, stock: u32) -> ProductId {
        let product =
            NewProduct::new(name.to_string(), None, Money::brl(price_cents), stock, None).unwrap();
        self.store.insert(&product).await.unwrap()
    }

    async fn stock_of(&self, product_id: ProductId) -> u32 {
        self.store
            .find_by_id(product_id)
            .await
            .unwrap()
            .unwrap()
            .stock()
    }
}

fn line(product_id: ProductId, quantity: u32) -> OrderLineRequest {
    OrderLineRequest {
        product_id,
        quantity: Some(quantity),
    }
}

#[tokio::test]
async fn test_place_order_decrements_stock() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Notebook Dell XPS 15", 400_000, 5).await;

    let order_id = ctx
        .order_service
        .place_order(user, vec![line(p1, 3)])
        .await
        .unwrap();

    assert_eq!(ctx.stock_of(p1).await, 2);

    // 注文が一覧と詳細の両方から見える
    let orders = ctx.query_service.list_orders(user).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].id(), order_id);

    let order = ctx.query_service.get_order(user, order_id).await.unwrap();
    assert_eq!(order.order_lines().len(), 1);
    assert_eq!(order.order_lines()[0].quantity(), 3);
    assert_eq!(
        order.order_lines()[0].product().unwrap().name(),
        "Notebook Dell XPS 15"
    );
}

#[tokio::test]
async fn test_place_order_with_insufficient_stock_fails() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Notebook Dell XPS 15", 400_000, 5).await;

    let result = ctx
        .order_service
        .place_order(user, vec![line(p1, 10)])
        .await;

    match result {
        Err(ApplicationError::InsufficientStock(msg)) => {
            // エラーメッセージには商品名が含まれる
            assert!(msg.contains("Notebook Dell XPS 15"));
        }
        other => panic!("unexpected result: {:?}", other),
    }

    // 在庫は変化せず、注文も作成されない
    assert_eq!(ctx.stock_of(p1).await, 5);
    assert!(ctx.query_service.list_orders(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_line_rolls_back_whole_order() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 5).await;
    let missing = ProductId::from_u64(999);

    // 2件目の明細が存在しない商品を参照している
    let result = ctx
        .order_service
        .place_order(user, vec![line(p1, 2), line(missing, 1)])
        .await;

    assert!(matches!(result, Err(ApplicationError::ProductNotFound(_))));

    // 1件目の明細による在庫の減少もロールバックされる
    assert_eq!(ctx.stock_of(p1).await, 5);
    assert!(ctx.query_service.list_orders(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancel_order_restores_stock_exactly() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 10).await;
    let p2 = ctx.add_product("Livro", 8_990, 30).await;

    let order_id = ctx
        .order_service
        .place_order(user, vec![line(p1, 4), line(p2, 2)])
        .await
        .unwrap();
    assert_eq!(ctx.stock_of(p1).await, 6);
    assert_eq!(ctx.stock_of(p2).await, 28);

    ctx.order_service.cancel_order(user, order_id).await.unwrap();

    // 在庫が正確に元へ戻り、注文は跡形もなく消える
    assert_eq!(ctx.stock_of(p1).await, 10);
    assert_eq!(ctx.stock_of(p2).await, 30);
    assert!(ctx.query_service.list_orders(user).await.unwrap().is_empty());
    assert!(matches!(
        ctx.query_service.get_order(user, order_id).await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_place_order_with_empty_lines_fails() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);

    let result = ctx.order_service.place_order(user, Vec::new()).await;
    assert!(matches!(result, Err(ApplicationError::InvalidRequest(_))));
}

#[tokio::test]
async fn test_cancel_foreign_order_is_indistinguishable_from_missing() {
    let ctx = TestContext::new();
    let owner = UserId::from_u64(1);
    let other = UserId::from_u64(2);
    let p1 = ctx.add_product("Camiseta", 5_000, 10).await;

    let order_id = ctx
        .order_service
        .place_order(owner, vec![line(p1, 4)])
        .await
        .unwrap();

    // 他のユーザーによるキャンセルと、存在しない注文のキャンセルは
    // 完全に同一のエラーを返す
    let foreign_err = ctx
        .order_service
        .cancel_order(other, order_id)
        .await
        .unwrap_err();
    let missing_err = ctx
        .order_service
        .cancel_order(other, OrderId::from_u64(12345))
        .await
        .unwrap_err();
    assert_eq!(foreign_err, missing_err);

    // 持ち主の注文と在庫は無傷のまま
    assert_eq!(ctx.stock_of(p1).await, 6);
    assert_eq!(ctx.query_service.list_orders(owner).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_product_lines_accumulate_against_stock() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 5).await;

    // 同一商品への明細は受け取った順に処理され、
    // 2件目は1件目による在庫の減少を観測する
    let result = ctx
        .order_service
        .place_order(user, vec![line(p1, 3), line(p1, 3)])
        .await;
    assert!(matches!(result, Err(ApplicationError::InsufficientStock(_))));
    assert_eq!(ctx.stock_of(p1).await, 5);

    // 合計が在庫内に収まる場合は2件の明細が別々に残る
    let order_id = ctx
        .order_service
        .place_order(user, vec![line(p1, 2), line(p1, 2)])
        .await
        .unwrap();
    assert_eq!(ctx.stock_of(p1).await, 1);

    let order = ctx.query_service.get_order(user, order_id).await.unwrap();
    assert_eq!(order.order_lines().len(), 2);
}

#[tokio::test]
async fn test_quantity_defaults_to_one() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 5).await;

    let order_id = ctx
        .order_service
        .place_order(
            user,
            vec![
                OrderLineRequest {
                    product_id: p1,
                    quantity: None,
                },
                OrderLineRequest {
                    product_id: p1,
                    quantity: Some(0),
                },
            ],
        )
        .await
        .unwrap();

    // 未指定と0はどちらも1として扱われる
    assert_eq!(ctx.stock_of(p1).await, 3);

    let order = ctx.query_service.get_order(user, order_id).await.unwrap();
    assert_eq!(order.order_lines().len(), 2);
    assert!(order.order_lines().iter().all(|l| l.quantity() == 1));
}

#[tokio::test]
async fn test_cancel_skips_release_for_deleted_product() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 10).await;
    let p2 = ctx.add_product("Livro", 8_990, 30).await;

    let order_id = ctx
        .order_service
        .place_order(user, vec![line(p1, 4), line(p2, 2)])
        .await
        .unwrap();

    // 注文後に商品が削除される
    assert!(ctx.store.delete(p1).await.unwrap());

    ctx.order_service.cancel_order(user, order_id).await.unwrap();

    // 削除済み商品の在庫戻しはスキップされ、残った商品だけ戻る
    assert!(ctx.store.find_by_id(p1).await.unwrap().is_none());
    assert_eq!(ctx.stock_of(p2).await, 30);
    assert!(ctx.query_service.list_orders(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_list_orders_excludes_other_users() {
    let ctx = TestContext::new();
    let u1 = UserId::from_u64(1);
    let u2 = UserId::from_u64(2);
    let p1 = ctx.add_product("Camiseta", 5_000, 100).await;

    ctx.order_service
        .place_order(u1, vec![line(p1, 1)])
        .await
        .unwrap();
    let u2_order = ctx
        .order_service
        .place_order(u2, vec![line(p1, 2)])
        .await
        .unwrap();

    let u1_orders = ctx.query_service.list_orders(u1).await.unwrap();
    assert_eq!(u1_orders.len(), 1);
    assert!(u1_orders.iter().all(|o| o.user_id() == u1));

    // 他のユーザーの注文詳細は取得できない
    assert!(matches!(
        ctx.query_service.get_order(u1, u2_order).await,
        Err(ApplicationError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_order_detail_shows_deleted_product_line_without_snapshot() {
    let ctx = TestContext::new();
    let user = UserId::from_u64(1);
    let p1 = ctx.add_product("Camiseta", 5_000, 10).await;

    let order_id = ctx
        .order_service
        .place_order(user, vec![line(p1, 1)])
        .await
        .unwrap();

    assert!(ctx.store.delete(p1).await.unwrap());

    // 明細は残るが、商品スナップショットは付与されない
    let order = ctx.query_service.get_order(user, order_id).await.unwrap();
    assert_eq!(order.order_lines().len(), 1);
    assert!(order.order_lines()[0].product().is_none());
    assert!(order.calculate_total().is_none());
}
