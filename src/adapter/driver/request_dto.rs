use serde::{Deserialize, Serialize};

/// 注文作成用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub products: Vec<OrderLineRequestDto>,
}

/// 注文明細のリクエストDTO
/// 数量は省略可能で、省略時は1として扱われる
#[derive(Serialize, Deserialize)]
pub struct OrderLineRequestDto {
    pub product_id: u64,
    pub quantity: Option<u32>,
}

/// 商品登録用のリクエストDTO
#[derive(Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub stock: u32,
    pub category_id: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_order_request_deserialization() {
        let json = r#"{"products":[{"product_id":1,"quantity":2},{"product_id":3}]}"#;
        let request: CreateOrderRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.products.len(), 2);
        assert_eq!(request.products[0].product_id, 1);
        assert_eq!(request.products[0].quantity, Some(2));
        // 数量省略時はNoneになる
        assert_eq!(request.products[1].quantity, None);
    }

    #[test]
    fn test_create_order_request_rejects_non_array() {
        let json = r#"{"products":{"product_id":1}}"#;
        let result: Result<CreateOrderRequest, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_order_request_serialization() {
        let request = CreateOrderRequest {
            products: vec![OrderLineRequestDto {
                product_id: 1,
                quantity: Some(3),
            }],
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("product_id"));
        assert!(json.contains("quantity"));
    }

    #[test]
    fn test_create_product_request_deserialization() {
        let json = r#"{"name":"Livro","price_cents":8990,"stock":30,"category_id":null,"description":null}"#;
        let request: CreateProductRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.name, "Livro");
        assert_eq!(request.price_cents, 8990);
        assert_eq!(request.stock, 30);
        assert!(request.category_id.is_none());
    }
}
