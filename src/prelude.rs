pub use crate::builder::PoolConfigBuilder;
#[cfg(feature = "concurrency")]
pub use crate::concurrent::ConcurrentPoolCoordinator;
pub use crate::config::{
    CoordinatorConfig, InstantiationMode, OverflowBehavior, PoolConfig, ResetMode,
};
pub use crate::coordinator::{InstanceId, PoolCoordinator};
pub use crate::ds::{ActiveSet, IntrusiveList, SlotArena, SlotId};
pub use crate::error::{ConfigError, InvariantError, PoolError};
pub use crate::policy::{OverflowResolver, ResetPolicy, TemplateDefaults, TemplateSelector};
pub use crate::pool::{PoolHooks, PoolRecord, SlotPool};
pub use crate::stats::{PoolCounters, PoolStats};
pub use crate::traits::{Host, PoolCallbacks, Poolable};
pub use crate::transform::Transform;
