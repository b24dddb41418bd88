use crate::domain::error::DomainError;
use crate::domain::port::RepositoryError;

/// アプリケーション層のエラー型
/// 呼び出し元に公開するエラーの分類を表す
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplicationError {
    /// リクエスト不正（空の注文など）。呼び出し元が修正して再送する
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// 参照された商品が存在しない
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    /// 在庫不足。メッセージには対象商品の名前を含む
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    /// 注文が見つからない。他のユーザーの注文も同じエラーに畳み込む
    #[error("Not found: {0}")]
    NotFound(String),
    /// 予期しない内部エラー。詳細はサーバー側でログに残し、呼び出し元には漏らさない
    #[error("Internal error: {0}")]
    Internal(String),
}

// From実装でエラー変換を簡潔に
impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InsufficientStock(name) => {
                ApplicationError::InsufficientStock(format!("在庫が不足しています: {}", name))
            }
            DomainError::InvalidQuantity => {
                ApplicationError::InvalidRequest("無効な数量です".to_string())
            }
            DomainError::InvalidValue(msg) => ApplicationError::InvalidRequest(msg),
            DomainError::CurrencyMismatch => {
                ApplicationError::Internal("通貨が一致しません".to_string())
            }
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        ApplicationError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_carries_product_name() {
        let err: ApplicationError =
            DomainError::InsufficientStock("Notebook Dell XPS 15".to_string()).into();
        match err {
            ApplicationError::InsufficientStock(msg) => {
                assert!(msg.contains("Notebook Dell XPS 15"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_repository_error_maps_to_internal() {
        let err: ApplicationError =
            RepositoryError::OperationFailed("boom".to_string()).into();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }

    #[test]
    fn test_invalid_quantity_maps_to_invalid_request() {
        let err: ApplicationError = DomainError::InvalidQuantity.into();
        assert!(matches!(err, ApplicationError::InvalidRequest(_)));
    }
}
