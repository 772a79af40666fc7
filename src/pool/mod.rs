pub mod record;
pub mod slot_pool;

pub use record::PoolRecord;
pub use slot_pool::{PoolHooks, SlotPool};
