//! Ceiling-enforcing wrapper around a [`SlotPool`].
//!
//! A [`PoolRecord`] owns one pool's storage and the `total_created` counter
//! that caps how many instances that pool may ever have created. Every call
//! that can reach the creation hook passes through a small adapter that
//! refuses once the ceiling is hit and counts each successful creation
//! exactly once, so the counter cannot drift from the hook calls.
//!
//! ```text
//!   caller hooks ──► CeilingHooks ──► SlotPool
//!                    │  create(): refuse if total_created ≥ max_size
//!                    │            else inner.create(), total_created += 1
//!                    └─ on_rent / on_return / on_destroy: count + forward
//! ```
//!
//! `total_created` never goes down except through [`PoolRecord::clear`].
//! Items placed into storage by [`PoolRecord::prewarm`] still run the return
//! hook but are not counted in [`PoolCounters::returns`].

use std::hash::Hash;

use tracing::warn;

use crate::error::PoolError;
use crate::pool::slot_pool::{PoolHooks, SlotPool};
use crate::stats::PoolCounters;

/// One pool's storage plus its creation ceiling.
#[derive(Debug)]
pub struct PoolRecord<T> {
    pool: SlotPool<T>,
    total_created: usize,
    max_size: usize,
    counters: PoolCounters,
    log_activity: bool,
}

struct CeilingHooks<'a, H: ?Sized> {
    inner: &'a mut H,
    total_created: &'a mut usize,
    max_size: usize,
    counters: &'a mut PoolCounters,
    count_returns: bool,
}

impl<H: ?Sized> CeilingHooks<'_, H> {
    /// Counts one genuinely new instance. Only the creation path calls this.
    fn increment_created(&mut self) {
        *self.total_created += 1;
        self.counters.created += 1;
    }
}

impl<T, H> PoolHooks<T> for CeilingHooks<'_, H>
where
    H: PoolHooks<T> + ?Sized,
{
    fn create(&mut self) -> Option<T> {
        if *self.total_created >= self.max_size {
            return None;
        }
        let item = self.inner.create()?;
        self.increment_created();
        Some(item)
    }

    fn on_rent(&mut self, item: T) {
        self.inner.on_rent(item);
    }

    fn on_return(&mut self, item: T) {
        if self.count_returns {
            self.counters.returns += 1;
        }
        self.inner.on_return(item);
    }

    fn on_destroy(&mut self, item: T) {
        self.counters.destroyed += 1;
        self.inner.on_destroy(item);
    }
}

impl<T> PoolRecord<T>
where
    T: Copy + Eq + Hash,
{
    /// Creates a record with `slots` fixed slots and a ceiling of `max_size`.
    pub fn new(slots: usize, max_size: usize) -> Self {
        Self {
            pool: SlotPool::new(slots),
            total_created: 0,
            max_size,
            counters: PoolCounters::default(),
            log_activity: false,
        }
    }

    /// Enables the ceiling-refusal warning emitted by [`rent`](Self::rent).
    pub fn with_activity_logging(mut self, enabled: bool) -> Self {
        self.log_activity = enabled;
        self
    }

    fn split<'a, H>(&'a mut self, hooks: &'a mut H) -> (&'a mut SlotPool<T>, CeilingHooks<'a, H>)
    where
        H: PoolHooks<T> + ?Sized,
    {
        let Self {
            pool,
            total_created,
            max_size,
            counters,
            ..
        } = self;
        let wrapped = CeilingHooks {
            inner: hooks,
            total_created,
            max_size: *max_size,
            counters,
            count_returns: true,
        };
        (pool, wrapped)
    }

    #[inline]
    pub fn can_create_more(&self) -> bool {
        self.total_created < self.max_size
    }

    /// `true` when the ceiling is fully handed out and nothing is stored.
    ///
    /// This is what triggers the overflow policy.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pool.active_count() >= self.max_size && self.pool.inactive_count() == 0
    }

    /// Rents through the ceiling.
    ///
    /// Returns `Ok(None)` when the ceiling is reached and nothing is stored
    /// (a warning if activity logging is on), or when `hooks.create()` declines.
    pub fn rent<H>(&mut self, hooks: &mut H) -> Result<Option<T>, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        if self.pool.is_disposed() {
            return Err(PoolError::Disposed);
        }
        if !self.can_create_more() && self.pool.inactive_count() == 0 {
            self.counters.refused += 1;
            if self.log_activity {
                warn!(
                    total_created = self.total_created,
                    max_size = self.max_size,
                    "pool reached its creation ceiling"
                );
            }
            return Ok(None);
        }

        let (pool, mut wrapped) = self.split(hooks);
        let item = pool.rent(&mut wrapped)?;
        if item.is_some() {
            self.counters.rents += 1;
        }
        Ok(item)
    }

    pub fn give_back<H>(&mut self, item: T, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        pool.give_back(item, &mut wrapped)
    }

    pub fn give_back_all<H>(&mut self, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        pool.give_back_all(&mut wrapped)
    }

    /// Returns up to `count` active items, oldest first.
    pub fn give_back_many<H>(&mut self, count: usize, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        pool.give_back_many(count, &mut wrapped)
    }

    /// Creates up to `count` inactive items, stopping at the ceiling.
    pub fn prewarm<H>(&mut self, count: usize, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        wrapped.count_returns = false;
        pool.prewarm(count, &mut wrapped)
    }

    /// Destroys everything and resets the creation counter.
    pub fn clear<H>(&mut self, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        pool.clear(&mut wrapped)?;
        self.total_created = 0;
        Ok(())
    }

    pub fn dispose<H>(&mut self, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        let (pool, mut wrapped) = self.split(hooks);
        pool.dispose(&mut wrapped)?;
        self.total_created = 0;
        Ok(())
    }

    /// Records one overflow reclaim.
    pub fn note_reuse(&mut self) {
        self.counters.reused += 1;
    }

    /// Records a request turned away by policy rather than by the ceiling check.
    pub fn note_refusal(&mut self) {
        self.counters.refused += 1;
    }

    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    pub fn inactive_count(&self) -> usize {
        self.pool.inactive_count()
    }

    pub fn total_created(&self) -> usize {
        self.total_created
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn counters(&self) -> PoolCounters {
        self.counters
    }

    pub fn is_disposed(&self) -> bool {
        self.pool.is_disposed()
    }

    pub fn log_activity(&self) -> bool {
        self.log_activity
    }

    /// Read access to the underlying storage (active ordering, slot layout).
    pub fn slot_pool(&self) -> &SlotPool<T> {
        &self.pool
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.pool.debug_validate_invariants();
        assert!(self.total_created <= self.max_size);
        assert!(self.active_count() + self.inactive_count() <= self.total_created);
    }
}
