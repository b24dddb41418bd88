use crate::domain::model::{Order, OrderLine, Product};
use serde::Serialize;

/// 注文一覧用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderSummaryResponse {
    pub order_id: u64,
    pub user_id: u64,
    pub created_at: String,
    pub line_count: usize,
    pub total_cents: Option<i64>,
    pub total_currency: Option<String>,
}

/// 注文詳細用のレスポンスDTO
#[derive(Serialize)]
pub struct OrderDetailResponse {
    pub order_id: u64,
    pub user_id: u64,
    pub created_at: String,
    pub order_lines: Vec<OrderLineResponse>,
    pub total_cents: Option<i64>,
    pub total_currency: Option<String>,
}

/// 注文明細用のレスポンスDTO
/// 商品が削除済みの場合、スナップショット由来のフィールドはnullになる
#[derive(Serialize)]
pub struct OrderLineResponse {
    pub product_id: u64,
    pub quantity: u32,
    pub product_name: Option<String>,
    pub unit_price_cents: Option<i64>,
    pub unit_price_currency: Option<String>,
    pub subtotal_cents: Option<i64>,
}

/// 商品用のレスポンスDTO
#[derive(Serialize)]
pub struct ProductResponse {
    pub product_id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub price_currency: String,
    pub stock: u32,
    pub category_id: Option<u64>,
}

impl OrderSummaryResponse {
    /// ドメインオブジェクトからOrderSummaryResponseを作成
    pub fn from_order(order: &Order) -> Self {
        let total = order.calculate_total();
        Self {
            order_id: order.id().as_u64(),
            user_id: order.user_id().as_u64(),
            created_at: order.created_at().to_rfc3339(),
            line_count: order.order_lines().len(),
            total_cents: total.map(|t| t.amount()),
            total_currency: total.map(|t| t.currency()),
        }
    }
}

impl OrderDetailResponse {
    /// ドメインオブジェクトからOrderDetailResponseを作成
    pub fn from_order(order: &Order) -> Self {
        let order_lines: Vec<OrderLineResponse> = order
            .order_lines()
            .iter()
            .map(OrderLineResponse::from_order_line)
            .collect();

        let total = order.calculate_total();

        Self {
            order_id: order.id().as_u64(),
            user_id: order.user_id().as_u64(),
            created_at: order.created_at().to_rfc3339(),
            order_lines,
            total_cents: total.map(|t| t.amount()),
            total_currency: total.map(|t| t.currency()),
        }
    }
}

impl OrderLineResponse {
    /// ドメインオブジェクトからOrderLineResponseを作成
    pub fn from_order_line(line: &OrderLine) -> Self {
        Self {
            product_id: line.product_id().as_u64(),
            quantity: line.quantity(),
            product_name: line.product().map(|p| p.name().to_string()),
            unit_price_cents: line.product().map(|p| p.price().amount()),
            unit_price_currency: line.product().map(|p| p.price().currency()),
            subtotal_cents: line.subtotal().map(|s| s.amount()),
        }
    }
}

impl ProductResponse {
    /// ドメインオブジェクトからProductResponseを作成
    pub fn from_product(product: &Product) -> Self {
        Self {
            product_id: product.id().as_u64(),
            name: product.name().to_string(),
            description: product.description().map(|d| d.to_string()),
            price_cents: product.price().amount(),
            price_currency: product.price().currency(),
            stock: product.stock(),
            category_id: product.category_id().map(|id| id.as_u64()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{
        Money, OrderId, ProductId, ProductSnapshot, UserId,
    };
    use chrono::Utc;

    fn order_with_lines(lines: Vec<OrderLine>) -> Order {
        Order::reconstruct(OrderId::from_u64(1), UserId::from_u64(7), Utc::now(), lines)
    }

    #[test]
    fn test_order_detail_response_with_snapshot() {
        let snapshot = ProductSnapshot::new("Livro".to_string(), Money::brl(8990));
        let line = OrderLine::reconstruct(ProductId::from_u64(3), 2, Some(snapshot)).unwrap();
        let order = order_with_lines(vec![line]);

        let response = OrderDetailResponse::from_order(&order);
        assert_eq!(response.order_id, 1);
        assert_eq!(response.order_lines.len(), 1);
        assert_eq!(response.order_lines[0].product_name.as_deref(), Some("Livro"));
        assert_eq!(response.order_lines[0].subtotal_cents, Some(17980));
        assert_eq!(response.total_cents, Some(17980));
    }

    #[test]
    fn test_order_detail_response_with_deleted_product() {
        let line = OrderLine::reconstruct(ProductId::from_u64(3), 2, None).unwrap();
        let order = order_with_lines(vec![line]);

        let response = OrderDetailResponse::from_order(&order);
        // 商品が削除済みの場合は金額関連のフィールドがnullになる
        assert!(response.order_lines[0].product_name.is_none());
        assert!(response.order_lines[0].subtotal_cents.is_none());
        assert!(response.total_cents.is_none());
    }

    #[test]
    fn test_order_summary_response() {
        let snapshot = ProductSnapshot::new("Livro".to_string(), Money::brl(1000));
        let line = OrderLine::reconstruct(ProductId::from_u64(3), 5, Some(snapshot)).unwrap();
        let order = order_with_lines(vec![line]);

        let response = OrderSummaryResponse::from_order(&order);
        assert_eq!(response.line_count, 1);
        assert_eq!(response.total_cents, Some(5000));
        assert_eq!(response.total_currency.as_deref(), Some("BRL"));
    }

    #[test]
    fn test_product_response_serialization() {
        let product = Product::reconstruct(
            ProductId::from_u64(1),
            "Livro".to_string(),
            Some("Primeiro volume".to_string()),
            Money::brl(8990),
            30,
            None,
        );

        let response = ProductResponse::from_product(&product);
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"product_id\":1"));
        assert!(json.contains("\"stock\":30"));
    }
}
