pub mod persistence;
pub mod repositories;

pub use persistence::{Database, SqliteStockRepository};
pub use repositories::InMemoryStockRepository;
