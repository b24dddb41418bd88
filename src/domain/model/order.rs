use crate::domain::model::{Money, OrderId, OrderLine, UserId};
use chrono::{DateTime, Utc};

/// Order集約
/// 注文ヘッダーと注文明細を1つの単位として扱う集約ルート。
/// 作成後の内容変更は存在せず、キャンセルは集約ごと削除される
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    id: OrderId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    order_lines: Vec<OrderLine>,
}

impl Order {
    /// データベースから取得したデータで注文を再構築
    /// リポジトリでの使用を想定
    pub fn reconstruct(
        id: OrderId,
        user_id: UserId,
        created_at: DateTime<Utc>,
        order_lines: Vec<OrderLine>,
    ) -> Self {
        Self {
            id,
            user_id,
            created_at,
            order_lines,
        }
    }

    /// 注文IDを取得
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// 注文したユーザーのIDを取得
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// 注文日時を取得
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 注文明細のリストを取得
    pub fn order_lines(&self) -> &[OrderLine] {
        &self.order_lines
    }

    /// 合計金額を計算
    /// いずれかの明細の商品が削除済みで単価が不明な場合はNone
    pub fn calculate_total(&self) -> Option<Money> {
        let mut total = Money::brl(0);
        for line in &self.order_lines {
            total = total.add(&line.subtotal()?).ok()?;
        }
        Some(total)
    }
}
