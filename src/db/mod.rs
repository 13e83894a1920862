//! Database layer: PostgreSQL pool.

mod pool;

pub use pool::{create_pool, ensure_schema, DbPool};
