//! SQLite storage layer.
//!
//! Draft slots backed by SQLite with WAL mode and split read/write
//! connection pools.

pub mod draft_slot;
pub mod pool;
