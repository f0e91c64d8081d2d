//! MemberHub Store
//!
//! The store handle every resolver talks to. Provides:
//! - The [`Store`] trait (find/create/update/delete per table, subscription join)
//! - A PostgreSQL implementation over a deadpool connection pool
//! - An in-memory implementation enforcing the same constraints

mod error;
mod memory;
mod pool;
mod postgres;
mod store;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use pool::{PoolConfig, StorePool};
pub use postgres::PgStore;
pub use store::{PostFilter, Store, StoreHandle, UserFilter};
