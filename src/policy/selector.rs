//! Template selection per pool.
//!
//! Each pool owns one [`TemplateSelector`]: a round-robin cursor for
//! `Sequential` and a `SmallRng` for the random modes and for random overflow
//! victims. Both persist across calls, so a pool's sequence continues where
//! it left off until the pool is cleared.
//!
//! ## Weighted pick
//!
//! ```text
//!   weights:     [0.5,  0.25, 0.25]       total = 1.0
//!   cumulative:  [0.5,  0.75, 1.0 ]
//!   r = uniform[0, total)  → first index with r ≤ cumulative
//!   r = 0.6               →  index 1
//! ```
//!
//! A zero weight is never picked; a non-positive total falls back to index 0.
//!
//! ## Seeding
//!
//! With a coordinator seed, the pool's generator is seeded from
//! `seed ^ fx_hash(key)`, so two pools with the same seed still draw
//! independent sequences and a rerun reproduces both. Without one the
//! generator is seeded from the OS.

use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;
use tracing::{error, warn};

use crate::config::InstantiationMode;

/// Weight given to entries that were zero or negative at registration.
pub const MIN_REPAIRED_WEIGHT: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct TemplateSelector {
    cursor: usize,
    rng: SmallRng,
}

impl TemplateSelector {
    pub fn new(rng: SmallRng) -> Self {
        Self { cursor: 0, rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// Selector for pool `key`, reproducible when `seed` is set.
    pub fn for_pool(key: &str, seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                let mut hasher = FxHasher::default();
                key.hash(&mut hasher);
                Self::seeded(seed ^ hasher.finish())
            },
            None => Self::new(SmallRng::from_os_rng()),
        }
    }

    /// Index of the template to instantiate next, or `None` if there are no templates.
    pub fn select(&mut self, mode: InstantiationMode, weights: &[f32], count: usize) -> Option<usize> {
        if count == 0 {
            error!(mode = %mode, "cannot select a template from an empty list");
            return None;
        }

        let index = match mode {
            InstantiationMode::Sequential => {
                let index = self.cursor % count;
                self.cursor = (index + 1) % count;
                index
            },
            InstantiationMode::Random => self.rng.random_range(0..count),
            InstantiationMode::WeightedRandom => self.weighted(&weights[..weights.len().min(count)]),
            InstantiationMode::FirstOnly => 0,
        };
        Some(index)
    }

    fn weighted(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().sum();
        if !(total > 0.0) {
            return 0;
        }

        let r = self.rng.random::<f32>() * total;
        let mut cumulative = 0.0;
        for (index, &weight) in weights.iter().enumerate() {
            cumulative += weight;
            if weight > 0.0 && r <= cumulative {
                return index;
            }
        }
        0
    }

    pub fn rng_mut(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Fixes weights at registration time.
    ///
    /// A length mismatch rebuilds the list with `1.0` for every template;
    /// zero or negative entries become [`MIN_REPAIRED_WEIGHT`]. Both log a
    /// warning. Returns `true` if anything changed.
    pub fn repair_weights(key: &str, weights: &mut Vec<f32>, template_count: usize) -> bool {
        let mut repaired = false;
        if weights.len() != template_count {
            warn!(
                pool = key,
                weights = weights.len(),
                templates = template_count,
                "weight count does not match template count, resetting all weights to 1.0"
            );
            weights.clear();
            weights.resize(template_count, 1.0);
            repaired = true;
        }

        for (index, weight) in weights.iter_mut().enumerate() {
            if !(*weight > 0.0) {
                warn!(
                    pool = key,
                    index,
                    weight = *weight,
                    repaired = MIN_REPAIRED_WEIGHT,
                    "non-positive template weight"
                );
                *weight = MIN_REPAIRED_WEIGHT;
                repaired = true;
            }
        }
        repaired
    }

    /// `weights[index] / Σ weights`, or `0` when the total is not positive.
    pub fn normalized_weight(weights: &[f32], index: usize) -> f32 {
        let total: f32 = weights.iter().sum();
        match weights.get(index) {
            Some(&weight) if total > 0.0 => weight / total,
            _ => 0.0,
        }
    }
}
