use crate::adapter::database_error::DatabaseError;
use crate::adapter::driven::product_repository::product_from_row;
use crate::domain::model::{Order, OrderId, OrderLine, Product, ProductId, UserId};
use crate::domain::port::{RepositoryError, UnitOfWork, UnitOfWorkFactory};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row, Transaction};

/// MySQLユニットオブワークファクトリ
/// コネクションプールからトランザクションを開始する
pub struct MySqlUnitOfWorkFactory {
    pool: Pool<MySql>,
}

impl MySqlUnitOfWorkFactory {
    /// 新しいファクトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for MySqlUnitOfWorkFactory {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| {
                DatabaseError::ConnectionError(format!("トランザクション開始に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(Box::new(MySqlUnitOfWork { tx }))
    }
}

/// MySQLユニットオブワーク
/// 1つのトランザクションに束ねられた書き込み操作を提供する。
/// commitされずにdropされた場合、sqlxのTransactionが自動的にロールバックする
pub struct MySqlUnitOfWork {
    tx: Transaction<'static, MySql>,
}

#[async_trait]
impl UnitOfWork for MySqlUnitOfWork {
    async fn insert_order(&mut self, user_id: UserId) -> Result<OrderId, RepositoryError> {
        let result = sqlx::query("INSERT INTO orders (user_id) VALUES (?)")
            .bind(user_id.as_u64())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文ヘッダーの保存に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(OrderId::from_u64(result.last_insert_id()))
    }

    async fn find_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        // FOR UPDATEで行ロックを取得し、同じ商品への並行した
        // 読み取り・書き込みをトランザクション側で直列化させる
        let row = sqlx::query(
            r#"
            SELECT id, name, description, price_cents, price_currency, stock, category_id
            FROM products
            WHERE id = ?
            FOR UPDATE
            "#,
        )
        .bind(product_id.as_u64())
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("商品の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        match row {
            Some(row) => Ok(Some(product_from_row(&row)?)),
            None => Ok(None),
        }
    }

    async fn save_product_stock(&mut self, product: &Product) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE products SET stock = ? WHERE id = ?")
            .bind(product.stock())
            .bind(product.id().as_u64())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("在庫の保存に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &OrderLine,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO order_lines (order_id, product_id, quantity)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(order_id.as_u64())
        .bind(line.product_id().as_u64())
        .bind(line.quantity())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文明細の保存に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn find_order_by_id_and_user(
        &mut self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT o.id, o.user_id, o.created_at, ol.product_id, ol.quantity
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            WHERE o.id = ? AND o.user_id = ?
            FOR UPDATE
            "#,
        )
        .bind(order_id.as_u64())
        .bind(user_id.as_u64())
        .fetch_all(&mut *self.tx)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        if rows.is_empty() {
            return Ok(None);
        }

        let first_row = &rows[0];
        let created_at: DateTime<Utc> = first_row.get("created_at");

        // 注文明細を再構築（明細が1件もない注文はLEFT JOINでNULL行になる）
        let mut order_lines = Vec::new();
        for row in &rows {
            if let (Some(product_id), Some(quantity)) = (
                row.get::<Option<u64>, _>("product_id"),
                row.get::<Option<u32>, _>("quantity"),
            ) {
                let line = OrderLine::reconstruct(ProductId::from_u64(product_id), quantity, None)
                    .map_err(|e| {
                        RepositoryError::FetchFailed(format!("注文明細の構築に失敗しました: {}", e))
                    })?;
                order_lines.push(line);
            }
        }

        Ok(Some(Order::reconstruct(
            order_id,
            user_id,
            created_at,
            order_lines,
        )))
    }

    async fn delete_order_lines(&mut self, order_id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM order_lines WHERE order_id = ?")
            .bind(order_id.as_u64())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DatabaseError::QueryError(format!("注文明細の削除に失敗しました: {}", e)))
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn delete_order(&mut self, order_id: OrderId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id.as_u64())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!("注文ヘッダーの削除に失敗しました: {}", e))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        self.tx
            .commit()
            .await
            .map_err(|e| {
                DatabaseError::QueryError(format!(
                    "トランザクションのコミットに失敗しました: {}",
                    e
                ))
            })
            .map_err(RepositoryError::from)?;

        Ok(())
    }
}
