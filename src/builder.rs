//! Fluent builder for [`PoolConfig`].
//!
//! Wraps templates in `Arc` for you, keeps the weight list in step with the
//! template list, and offers a validated [`try_build`](PoolConfigBuilder::try_build)
//! next to the unchecked [`build`](PoolConfigBuilder::build).
//!
//! ## Example
//!
//! ```rust
//! use poolkit::builder::PoolConfigBuilder;
//! use poolkit::config::{InstantiationMode, OverflowBehavior};
//!
//! let config = PoolConfigBuilder::new("enemies")
//!     .category("Actors")
//!     .weighted_template("grunt", 0.8)
//!     .weighted_template("brute", 0.2)
//!     .instantiation_mode(InstantiationMode::WeightedRandom)
//!     .overflow_behavior(OverflowBehavior::Block)
//!     .initial_size(4)
//!     .max_size(16)
//!     .try_build()
//!     .unwrap();
//!
//! assert_eq!(config.templates.len(), 2);
//! assert_eq!(config.template_weights, vec![0.8, 0.2]);
//! ```

use std::sync::Arc;

use crate::config::{InstantiationMode, OverflowBehavior, PoolConfig, ResetMode};
use crate::error::ConfigError;
use crate::transform::Transform;

/// Builder for [`PoolConfig`].
pub struct PoolConfigBuilder<Tm> {
    config: PoolConfig<Tm>,
}

impl<Tm> PoolConfigBuilder<Tm> {
    /// Starts from the defaults for a pool called `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            config: PoolConfig {
                key: key.into(),
                ..PoolConfig::default()
            },
        }
    }

    /// Adds a template with weight `1.0`.
    pub fn template(self, template: Tm) -> Self {
        self.shared_template(Arc::new(template))
    }

    /// Adds an already shared template with weight `1.0`.
    pub fn shared_template(self, template: Arc<Tm>) -> Self {
        self.weighted_shared_template(template, 1.0)
    }

    pub fn weighted_template(self, template: Tm, weight: f32) -> Self {
        self.weighted_shared_template(Arc::new(template), weight)
    }

    pub fn weighted_shared_template(mut self, template: Arc<Tm>, weight: f32) -> Self {
        // Keep weights aligned with the templates added so far.
        self.config.template_weights.resize(self.config.templates.len(), 1.0);
        self.config.templates.push(template);
        self.config.template_weights.push(weight);
        self
    }

    /// Replaces the weight list. Mismatched lengths are evened out at build time.
    pub fn weights(mut self, weights: impl Into<Vec<f32>>) -> Self {
        self.config.template_weights = weights.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.config.category = category.into();
        self
    }

    pub fn initial_size(mut self, initial_size: usize) -> Self {
        self.config.initial_size = initial_size;
        self
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.config.max_size = max_size;
        self
    }

    pub fn instantiation_mode(mut self, mode: InstantiationMode) -> Self {
        self.config.instantiation_mode = mode;
        self
    }

    pub fn overflow_behavior(mut self, behavior: OverflowBehavior) -> Self {
        self.config.overflow_behavior = behavior;
        self
    }

    pub fn reset_mode(mut self, mode: ResetMode) -> Self {
        self.config.reset_mode = mode;
        self
    }

    pub fn custom_defaults(mut self, transform: Transform) -> Self {
        self.config.custom_defaults = transform;
        self
    }

    pub fn prewarm_on_start(mut self, prewarm: bool) -> Self {
        self.config.prewarm_on_start = prewarm;
        self
    }

    pub fn log_activity(mut self, log: bool) -> Self {
        self.config.log_activity = log;
        self
    }

    /// Finishes without validation; weights are synced to the templates.
    pub fn build(mut self) -> PoolConfig<Tm> {
        self.config.sync_weights();
        self.config
    }

    /// Finishes and validates.
    pub fn try_build(self) -> Result<PoolConfig<Tm>, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
