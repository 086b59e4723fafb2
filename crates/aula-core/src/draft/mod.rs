//! Draft persistence: the storage port, the load/save policy and the
//! debounced autosave task.

pub mod autosave;
pub mod persistence;
pub mod storage;
