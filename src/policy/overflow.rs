//! What happens when an exhausted pool is asked for another instance.
//!
//! The resolver runs only when [`PoolRecord::is_exhausted`] holds: every
//! instance the ceiling allows is active and nothing is stored.
//!
//! ```text
//!   Block         → refuse
//!   ReuseOldest   → victim = oldest active
//!   ReuseRandom   → victim = oldest if one active, else active_at(uniform)
//!
//!   victim: give_back (on_return) → rent (on_rent, now newest) → caller resets
//! ```
//!
//! The reclaimed instance goes through the ordinary return and rent paths,
//! so it leaves the active ordering and re-enters it as the newest entry.
//! An exhausted pool with nothing active, or a re-rent that hands back a
//! different instance, is a consistency fault: it is reported at error level
//! and the request yields nothing.

use std::hash::Hash;

use rand::Rng;
use tracing::{debug, error, warn};

use crate::config::OverflowBehavior;
use crate::error::PoolError;
use crate::pool::record::PoolRecord;
use crate::pool::slot_pool::PoolHooks;

/// Outcome of an overflow resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<T> {
    /// An active instance was reclaimed and handed out again.
    Reused(T),
    /// The policy refused the request.
    Refused,
    /// Bookkeeping disagreed with itself; nothing was handed out.
    Fault,
}

impl<T> Resolution<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Resolution::Reused(item) => Some(item),
            Resolution::Refused | Resolution::Fault => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverflowResolver {
    behavior: OverflowBehavior,
}

impl OverflowResolver {
    pub const fn new(behavior: OverflowBehavior) -> Self {
        Self { behavior }
    }

    pub const fn behavior(&self) -> OverflowBehavior {
        self.behavior
    }

    /// Picks which active instance to reclaim, without touching the pool.
    pub fn pick_victim<T, R>(&self, record: &PoolRecord<T>, rng: &mut R) -> Option<T>
    where
        T: Copy + Eq + Hash,
        R: Rng,
    {
        let pool = record.slot_pool();
        match self.behavior {
            OverflowBehavior::Block => None,
            OverflowBehavior::ReuseOldest => pool.oldest_active(),
            OverflowBehavior::ReuseRandom => match pool.active_count() {
                0 => None,
                1 => pool.oldest_active(),
                active => pool.active_at(rng.random_range(0..active)),
            },
        }
    }

    /// Applies the policy to an exhausted `record`, drawing the victim from `rng`.
    #[cfg(test)]
    fn resolve<T, H, R>(
        &self,
        key: &str,
        record: &mut PoolRecord<T>,
        hooks: &mut H,
        rng: &mut R,
        log_activity: bool,
    ) -> Result<Resolution<T>, PoolError>
    where
        T: Copy + Eq + Hash,
        H: PoolHooks<T> + ?Sized,
        R: Rng,
    {
        let victim = self.pick_victim(record, rng);
        self.reclaim(key, record, victim, hooks, log_activity)
    }

    /// Reclaims `victim` (from [`pick_victim`](Self::pick_victim)) on an exhausted `record`.
    pub fn reclaim<T, H>(
        &self,
        key: &str,
        record: &mut PoolRecord<T>,
        victim: Option<T>,
        hooks: &mut H,
        log_activity: bool,
    ) -> Result<Resolution<T>, PoolError>
    where
        T: Copy + Eq + Hash,
        H: PoolHooks<T> + ?Sized,
    {
        if self.behavior == OverflowBehavior::Block {
            record.note_refusal();
            if log_activity {
                warn!(
                    pool = key,
                    max_size = record.max_size(),
                    "pool exhausted, request blocked"
                );
            }
            return Ok(Resolution::Refused);
        }

        let Some(victim) = victim.filter(|v| record.slot_pool().is_active(v)) else {
            error!(
                pool = key,
                behavior = %self.behavior,
                "pool is exhausted but has no active instance to reclaim"
            );
            return Ok(Resolution::Fault);
        };

        record.give_back(victim, hooks)?;
        match record.rent(hooks)? {
            Some(item) if item == victim => {
                record.note_reuse();
                if log_activity {
                    debug!(pool = key, behavior = %self.behavior, "reclaimed an active instance");
                }
                Ok(Resolution::Reused(victim))
            },
            other => {
                error!(
                    pool = key,
                    behavior = %self.behavior,
                    "re-rent after reclaim did not return the reclaimed instance"
                );
                if let Some(item) = other {
                    record.give_back(item, hooks)?;
                }
                Ok(Resolution::Fault)
            },
        }
    }
}
