use crate::domain::model::{
    NewProduct, Order, OrderId, OrderLine, Product, ProductId, UserId,
};
use crate::domain::port::{
    OrderRepository, ProductRepository, RepositoryError, UnitOfWork, UnitOfWorkFactory,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// 保存された注文
#[derive(Debug, Clone)]
struct StoredOrder {
    user_id: UserId,
    created_at: DateTime<Utc>,
    lines: Vec<(ProductId, u32)>,
}

/// ストアの内部状態
#[derive(Debug, Clone, Default)]
struct StoreState {
    products: HashMap<u64, Product>,
    orders: HashMap<u64, StoredOrder>,
    next_product_id: u64,
    next_order_id: u64,
}

impl StoreState {
    fn build_order(&self, order_id: OrderId, stored: &StoredOrder) -> Result<Order, RepositoryError> {
        let mut lines = Vec::new();
        for (product_id, quantity) in &stored.lines {
            // 商品が削除済みの場合、スナップショットは付与されない
            let snapshot = self
                .products
                .get(&product_id.as_u64())
                .map(|product| product.snapshot());
            let line = OrderLine::reconstruct(*product_id, *quantity, snapshot)
                .map_err(|e| RepositoryError::FetchFailed(e.to_string()))?;
            lines.push(line);
        }
        Ok(Order::reconstruct(
            order_id,
            stored.user_id,
            stored.created_at,
            lines,
        ))
    }
}

/// インメモリストア
/// すべてのストアポートをメモリ上で実装する。テストと開発用
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<StoreState>>,
}

impl InMemoryStore {
    /// 新しい空のストアを作成
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::OperationFailed("ストアのロックに失敗しました".to_string()))
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, RepositoryError> {
        // 現在の状態のコピー上で変更を行い、コミット時に公開する
        let state = self.lock()?.clone();
        Ok(Box::new(InMemoryUnitOfWork {
            shared: Arc::clone(&self.inner),
            state,
        }))
    }
}

#[async_trait]
impl ProductRepository for InMemoryStore {
    async fn insert(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        let mut state = self.lock()?;
        state.next_product_id += 1;
        let id = ProductId::from_u64(state.next_product_id);
        state.products.insert(
            id.as_u64(),
            Product::reconstruct(
                id,
                product.name().to_string(),
                product.description().map(|d| d.to_string()),
                product.price(),
                product.stock(),
                product.category_id(),
            ),
        );
        Ok(id)
    }

    async fn find_by_id(
        &self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        let state = self.lock()?;
        Ok(state.products.get(&product_id.as_u64()).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let state = self.lock()?;
        let mut products: Vec<Product> = state.products.values().cloned().collect();
        products.sort_by_key(|p| p.id().as_u64());
        Ok(products)
    }

    async fn delete(&self, product_id: ProductId) -> Result<bool, RepositoryError> {
        let mut state = self.lock()?;
        Ok(state.products.remove(&product_id.as_u64()).is_some())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let state = self.lock()?;
        let mut entries: Vec<(&u64, &StoredOrder)> = state
            .orders
            .iter()
            .filter(|(_, stored)| stored.user_id == user_id)
            .collect();
        // 作成日時の降順で並べる
        entries.sort_by(|(id_a, a), (id_b, b)| {
            (b.created_at, *id_b).cmp(&(a.created_at, *id_a))
        });

        let mut orders = Vec::new();
        for (id, stored) in entries {
            orders.push(state.build_order(OrderId::from_u64(*id), stored)?);
        }
        Ok(orders)
    }

    async fn find_by_id_and_user(
        &self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        let state = self.lock()?;
        match state.orders.get(&order_id.as_u64()) {
            Some(stored) if stored.user_id == user_id => {
                Ok(Some(state.build_order(order_id, stored)?))
            }
            _ => Ok(None),
        }
    }
}

/// インメモリユニットオブワーク
/// 状態のコピーを変更し、commitで共有状態を置き換える。
/// commitされずにdropされた場合、コピーが破棄されるだけで何も起こらない
struct InMemoryUnitOfWork {
    shared: Arc<Mutex<StoreState>>,
    state: StoreState,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn insert_order(&mut self, user_id: UserId) -> Result<OrderId, RepositoryError> {
        self.state.next_order_id += 1;
        let id = OrderId::from_u64(self.state.next_order_id);
        self.state.orders.insert(
            id.as_u64(),
            StoredOrder {
                user_id,
                created_at: Utc::now(),
                lines: Vec::new(),
            },
        );
        Ok(id)
    }

    async fn find_product(
        &mut self,
        product_id: ProductId,
    ) -> Result<Option<Product>, RepositoryError> {
        Ok(self.state.products.get(&product_id.as_u64()).cloned())
    }

    async fn save_product_stock(&mut self, product: &Product) -> Result<(), RepositoryError> {
        self.state
            .products
            .insert(product.id().as_u64(), product.clone());
        Ok(())
    }

    async fn insert_order_line(
        &mut self,
        order_id: OrderId,
        line: &OrderLine,
    ) -> Result<(), RepositoryError> {
        let stored = self
            .state
            .orders
            .get_mut(&order_id.as_u64())
            .ok_or_else(|| {
                RepositoryError::OperationFailed(format!(
                    "注文 {} が存在しません",
                    order_id
                ))
            })?;
        stored.lines.push((line.product_id(), line.quantity()));
        Ok(())
    }

    async fn find_order_by_id_and_user(
        &mut self,
        order_id: OrderId,
        user_id: UserId,
    ) -> Result<Option<Order>, RepositoryError> {
        match self.state.orders.get(&order_id.as_u64()) {
            Some(stored) if stored.user_id == user_id => {
                Ok(Some(self.state.build_order(order_id, stored)?))
            }
            _ => Ok(None),
        }
    }

    async fn delete_order_lines(&mut self, order_id: OrderId) -> Result<(), RepositoryError> {
        if let Some(stored) = self.state.orders.get_mut(&order_id.as_u64()) {
            stored.lines.clear();
        }
        Ok(())
    }

    async fn delete_order(&mut self, order_id: OrderId) -> Result<(), RepositoryError> {
        self.state.orders.remove(&order_id.as_u64());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepositoryError> {
        let mut shared = self.shared.lock().map_err(|_| {
            RepositoryError::OperationFailed("ストアのロックに失敗しました".to_string())
        })?;
        *shared = self.state;
        Ok(())
    }
}
