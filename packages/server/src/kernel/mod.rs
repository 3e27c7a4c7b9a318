//! Kernel module - storage infrastructure and dependencies.

pub mod deps;
pub mod edge_set;
pub mod memory_store;
pub mod postgres_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use edge_set::EdgeSet;
pub use memory_store::MemoryStore;
pub use postgres_store::PostgresStore;
pub use test_dependencies::SpyAccountDirectory;
pub use traits::*;
