use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{CategoryId, Money, NewProduct, Product, ProductId};
use crate::domain::port::{ProductRepository, RepositoryError};
use async_trait::async_trait;

// MySQL関連のインポート
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, Pool, Row};

/// MySQL商品リポジトリ
/// MySQLデータベースを使用して商品を永続化する
#[derive(Clone)]
pub struct MySqlProductRepository {
    pool: Pool<MySql>,
}

impl MySqlProductRepository {
    /// 新しいMySQL商品リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

/// データベースの行から商品エンティティを構築する
pub(crate) fn product_from_row(row: &MySqlRow) -> Result<Product, RepositoryError> {
    let price = Money::new(
        row.get::<i64, _>("price_cents"),
        row.get::<String, _>("price_currency"),
    )
    .map_err(|e| RepositoryError::FetchFailed(format!("金額の構築に失敗しました: {}", e)))?;

    Ok(Product::reconstruct(
        ProductId::from_u64(row.get::<u64, _>("id")),
        row.get("name"),
        row.get::<Option<String>, _>("description"),
        price,
        row.get::<u32, _>("stock"),
        row.get::<Option<u64>, _>("category_id")
            .map(CategoryId::from_u64),
    ))
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn insert(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price_cents, price_currency, stock, category_id)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.name())
        .bind(product.description())
        .bind(product.price().amount())
        .bind(product.price().currency())
        .bind(product.stock())
        .bind(product.category_id().map(|id| id.as_u64()))
        .execute(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の登録に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(ProductId::from_u64(result.last_insert_id()))
    }

    async fn find_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, price_currency, stock, category_id
            FROM products
            WHERE id = ?
            "#,
        )
        .bind(product_id.as_u64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(product_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        // 商品IDの昇順で並べる
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, price_currency, stock, category_id
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        let mut products = Vec::new();
        for row in &rows {
            products.push(product_from_row(row)?);
        }

        Ok(products)
    }

    async fn delete(&self, product_id: ProductId) -> Result<bool, RepositoryError> {
        // 注文明細は履歴として残すため、order_linesには触れない
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(product_id.as_u64())
            .execute(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("商品の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(result.rows_affected() > 0)
    }
}
