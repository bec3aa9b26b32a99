pub mod database;
pub mod stock_repository;

pub use database::Database;
pub use stock_repository::SqliteStockRepository;
