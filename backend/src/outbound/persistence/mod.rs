//! Persistence adapters implementing the repository ports.
//!
//! Two families exist: MongoDB-backed adapters for production and volatile
//! in-memory adapters for tests and database-less dev runs. Both honour the
//! same version-token contract on updates.

mod memory;
mod mongo;

pub use memory::{InMemoryRepairRepository, InMemoryUserRepository};
pub use mongo::{MongoRepairRepository, MongoUserRepository, connect};
