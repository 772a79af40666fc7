//! Per-pool counters and point-in-time snapshots.
//!
//! [`PoolCounters`] are cumulative event counts kept by each
//! [`PoolRecord`](crate::pool::record::PoolRecord); they survive
//! `clear_pool`, unlike the creation ceiling counter. [`PoolStats`] adds the
//! gauges captured at snapshot time.

use std::fmt;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoolCounters {
    /// Successful rents, fresh creations included.
    pub rents: u64,
    /// Instances given back to storage, overflow reclaims included.
    /// Prewarm placements do not count.
    pub returns: u64,
    /// Instances the host actually instantiated.
    pub created: u64,
    /// Active instances reclaimed by an overflow policy.
    pub reused: u64,
    /// Requests turned away at the ceiling or by `Block`.
    pub refused: u64,
    pub destroyed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolStats {
    pub key: String,
    pub category: String,

    // gauges captured at snapshot time
    pub active: usize,
    pub inactive: usize,
    pub total_created: usize,
    pub max_size: usize,

    pub counters: PoolCounters,
}

impl PoolStats {
    /// Fraction of the ceiling currently handed out, in `[0, 1]` for sane configs.
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.active as f64 / self.max_size as f64
        }
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: active={} inactive={} created={}/{} rents={} returns={} reused={} refused={}",
            self.category,
            self.key,
            self.active,
            self.inactive,
            self.total_created,
            self.max_size,
            self.counters.rents,
            self.counters.returns,
            self.counters.reused,
            self.counters.refused,
        )
    }
}
