//! poolkit: multi-pool resource recycling.
//!
//! A [`PoolCoordinator`](coordinator::PoolCoordinator) keeps named pools of
//! reusable instances. Each pool recycles through a fixed slot array with an
//! overflow stack, caps how many instances it may ever create, picks which
//! template to instantiate, and decides what to do when every instance is in
//! use.
//!
//! ## Layers
//!
//! ```text
//!   coordinator   PoolCoordinator, InstanceId       (per-key pools, host calls)
//!        │
//!   policy        TemplateSelector, OverflowResolver, ResetPolicy
//!        │
//!   pool          PoolRecord (ceiling) ─► SlotPool (slots + overflow + active)
//!        │
//!   ds            ActiveSet ─► IntrusiveList ─► SlotArena
//! ```
//!
//! The crate never installs a `tracing` subscriber; warnings about refused
//! requests, repaired weights and consistency faults are emitted as events
//! for the embedding application to collect.

pub mod builder;
#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod config;
pub mod coordinator;
pub mod ds;
pub mod error;
pub mod policy;
pub mod pool;
pub mod prelude;
pub mod stats;
pub mod traits;
pub mod transform;
