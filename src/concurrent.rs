//! Shared coordinator for multi-threaded callers.
//!
//! [`PoolCoordinator`] itself is single-threaded. [`ConcurrentPoolCoordinator`]
//! puts the whole thing behind one `parking_lot::Mutex`, so every call is
//! serialized and a pool never sees two operations interleave. Handles
//! ([`InstanceId`]) are plain `Copy` values and can be passed between threads
//! freely; payloads are reached through [`with_instance_mut`].
//!
//! [`with_instance_mut`]: ConcurrentPoolCoordinator::with_instance_mut
//!
//! ```text
//!   thread A ──┐
//!   thread B ──┼──► Mutex<PoolCoordinator<H>> ──► pools / instances / host
//!   thread C ──┘
//! ```

use parking_lot::Mutex;

use crate::config::{CoordinatorConfig, PoolConfig};
use crate::coordinator::{InstanceId, PoolCoordinator};
use crate::error::PoolError;
use crate::stats::PoolStats;
use crate::traits::Host;
use crate::transform::Transform;

pub struct ConcurrentPoolCoordinator<H: Host> {
    inner: Mutex<PoolCoordinator<H>>,
}

impl<H: Host> ConcurrentPoolCoordinator<H> {
    pub fn new(host: H) -> Self {
        Self::from_coordinator(PoolCoordinator::new(host))
    }

    pub fn with_config(host: H, settings: CoordinatorConfig) -> Self {
        Self::from_coordinator(PoolCoordinator::with_config(host, settings))
    }

    pub fn from_coordinator(coordinator: PoolCoordinator<H>) -> Self {
        Self {
            inner: Mutex::new(coordinator),
        }
    }

    /// Runs `f` with exclusive access to the coordinator.
    pub fn with<R>(&self, f: impl FnOnce(&mut PoolCoordinator<H>) -> R) -> R {
        let mut coordinator = self.inner.lock();
        f(&mut coordinator)
    }

    pub fn register_pool(&self, config: PoolConfig<H::Template>) -> bool {
        self.inner.lock().register_pool(config)
    }

    pub fn get(&self, key: &str, placement: Option<Transform>) -> Result<Option<InstanceId>, PoolError> {
        self.inner.lock().get(key, placement)
    }

    pub fn release(&self, id: InstanceId) -> Result<(), PoolError> {
        self.inner.lock().release(id)
    }

    pub fn release_all(&self) -> Result<usize, PoolError> {
        self.inner.lock().release_all()
    }

    pub fn clear_pool(&self, key: &str) -> Result<(), PoolError> {
        self.inner.lock().clear_pool(key)
    }

    pub fn active_count(&self, key: &str) -> Result<usize, PoolError> {
        self.inner.lock().active_count(key)
    }

    pub fn inactive_count(&self, key: &str) -> Result<usize, PoolError> {
        self.inner.lock().inactive_count(key)
    }

    pub fn total_created(&self, key: &str) -> Result<usize, PoolError> {
        self.inner.lock().total_created(key)
    }

    pub fn stats(&self, key: &str) -> Result<PoolStats, PoolError> {
        self.inner.lock().stats(key)
    }

    pub fn with_instance_mut<R>(&self, id: InstanceId, f: impl FnOnce(&mut H::Instance) -> R) -> Option<R> {
        let mut coordinator = self.inner.lock();
        coordinator.instance_mut(id).map(f)
    }

    pub fn dispose(&self) {
        self.inner.lock().dispose();
    }

    pub fn into_inner(self) -> PoolCoordinator<H> {
        self.inner.into_inner()
    }
}
