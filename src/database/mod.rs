pub mod manager;
pub mod memory;
pub mod models;
pub mod repository;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryAccountStore;
pub use models::{Account, NewAccount};
pub use repository::{AccountStore, PgAccountStore};
