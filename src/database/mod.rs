pub mod manager;
pub mod memory;
pub mod postgres;
pub mod store;

pub use manager::DatabaseManager;
pub use memory::MemoryStore;
pub use postgres::PgJournalStore;
pub use store::{JournalStore, StoreError, StoreResult, Table};
