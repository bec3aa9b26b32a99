// Trading entities and value objects
pub mod ticker;
pub mod types;
