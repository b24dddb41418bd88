use crate::adapter::database_error::DatabaseError;
use crate::domain::model::{
    Money, Order, OrderId, OrderLine, ProductId, ProductSnapshot, UserId,
};
use crate::domain::port::{OrderRepository, RepositoryError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

// MySQL関連のインポート
use sqlx::{MySql, Pool, Row};

/// MySQL注文リポジトリ
/// 注文を明細と商品スナップショット付きで読み取る
pub struct MySqlOrderRepository {
    pool: Pool<MySql>,
}

impl MySqlOrderRepository {
    /// 新しいMySQL注文リポジトリを作成
    ///
    /// # Arguments
    /// * `pool` - MySQLコネクションプール
    pub fn new(pool: Pool<MySql>) -> Self {
        Self { pool }
    }

    /// データベースの行から注文オブジェクトのリストを構築する
    /// JOINされた結果から複数の注文を再構築する。行の並び順を維持する
    fn build_orders_from_rows(
        &self,
        rows: Vec<sqlx::mysql::MySqlRow>,
    ) -> Result<Vec<Order>, RepositoryError> {
        use std::collections::HashMap;

        // 注文IDごとにグループ化（最初に現れた順序を保持する）
        let mut order_ids: Vec<u64> = Vec::new();
        let mut order_groups: HashMap<u64, Vec<&sqlx::mysql::MySqlRow>> = HashMap::new();
        for row in &rows {
            let order_id: u64 = row.get("id");
            if !order_groups.contains_key(&order_id) {
                order_ids.push(order_id);
            }
            order_groups.entry(order_id).or_default().push(row);
        }

        let mut orders = Vec::new();

        for order_id in order_ids {
            let order_rows = &order_groups[&order_id];

            // 最初の行から注文の基本情報を取得
            let first_row = order_rows[0];
            let user_id = UserId::from_u64(first_row.get::<u64, _>("user_id"));
            let created_at: DateTime<Utc> = first_row.get("created_at");

            // 注文明細を再構築
            let mut order_lines = Vec::new();
            for row in order_rows {
                let (Some(product_id), Some(quantity)) = (
                    row.get::<Option<u64>, _>("product_id"),
                    row.get::<Option<u32>, _>("quantity"),
                ) else {
                    // 明細が1件もない注文のNULL行
                    continue;
                };

                // 商品が削除済みの場合、スナップショット列はNULLになる
                let snapshot = match (
                    row.get::<Option<String>, _>("product_name"),
                    row.get::<Option<i64>, _>("price_cents"),
                    row.get::<Option<String>, _>("price_currency"),
                ) {
                    (Some(name), Some(amount), Some(currency)) => {
                        let price = Money::new(amount, currency).map_err(|e| {
                            RepositoryError::FetchFailed(format!(
                                "金額の構築に失敗しました: {}",
                                e
                            ))
                        })?;
                        Some(ProductSnapshot::new(name, price))
                    }
                    _ => None,
                };

                let line =
                    OrderLine::reconstruct(ProductId::from_u64(product_id), quantity, snapshot)
                        .map_err(|e| {
                            RepositoryError::FetchFailed(format!(
                                "注文明細の構築に失敗しました: {}",
                                e
                            ))
                        })?;
                order_lines.push(line);
            }

            orders.push(Order::reconstruct(
                OrderId::from_u64(order_id),
                user_id,
                created_at,
                order_lines,
            ));
        }

        Ok(orders)
    }
}

#[async_trait]
impl OrderRepository for MySqlOrderRepository {
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        // ordersとorder_lines、商品スナップショット用のproductsをJOINして取得
        // 作成日時の降順で並べる
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.user_id, o.created_at,
                ol.product_id, ol.quantity,
                p.name AS product_name, p.price_cents, p.price_currency
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            LEFT JOIN products p ON ol.product_id = p.id
            WHERE o.user_id = ?
            ORDER BY o.created_at DESC, o.id DESC
            "#,
        )
        .bind(user_id.as_u64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文一覧の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        self.build_orders_from_rows(rows)
    }

    async fn find_by_id_and_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                o.id, o.user_id, o.created_at,
                ol.product_id, ol.quantity,
                p.name AS product_name, p.price_cents, p.price_currency
            FROM orders o
            LEFT JOIN order_lines ol ON o.id = ol.order_id
            LEFT JOIN products p ON ol.product_id = p.id
            WHERE o.id = ? AND o.user_id = ?
            "#,
        )
        .bind(order_id.as_u64())
        .bind(user_id.as_u64())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(format!("注文の取得に失敗しました: {}", e)))
        .map_err(RepositoryError::from)?;

        Ok(self.build_orders_from_rows(rows)?.into_iter().next())
    }
}
