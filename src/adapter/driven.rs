// 駆動される側アダプター（リポジトリ実装など）

mod console_logger;
mod in_memory_store;
mod order_repository;
mod product_repository;
mod unit_of_work;

pub use console_logger::ConsoleLogger;
pub use in_memory_store::InMemoryStore;
pub use order_repository::MySqlOrderRepository;
pub use product_repository::MySqlProductRepository;
pub use unit_of_work::MySqlUnitOfWorkFactory;
