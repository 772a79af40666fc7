//! Pool and coordinator configuration.
//!
//! [`PoolConfig`] describes one pool: its key, templates and their weights,
//! sizing, and the three policy knobs ([`InstantiationMode`],
//! [`OverflowBehavior`], [`ResetMode`]). Most callers build it through
//! [`PoolConfigBuilder`](crate::builder::PoolConfigBuilder).
//!
//! The mode enums parse from text in two ways: [`FromStr`] is strict and
//! fails with a [`ConfigError`], while `from_name_lenient` logs a warning and
//! falls back to the default mode. Matching ignores ASCII case, `_`, `-` and
//! spaces, so `"weighted_random"` and `"WeightedRandom"` are the same mode.
//!
//! ## Defaults
//!
//! | Field                | Default               |
//! |----------------------|-----------------------|
//! | `category`           | `"Default"`           |
//! | `initial_size`       | 10                    |
//! | `max_size`           | 100                   |
//! | `instantiation_mode` | `Sequential`          |
//! | `overflow_behavior`  | `ReuseOldest`         |
//! | `reset_mode`         | `UseTemplateDefaults` |
//! | `custom_defaults`    | `Transform::IDENTITY` |
//! | `prewarm_on_start`   | `true`                |
//! | `log_activity`       | `false`               |

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use crate::error::ConfigError;
use crate::transform::Transform;

pub const DEFAULT_CATEGORY: &str = "Default";
pub const DEFAULT_INITIAL_SIZE: usize = 10;
pub const DEFAULT_MAX_SIZE: usize = 100;

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

macro_rules! named_modes {
    ($ty:ident, $label:literal, fallback = $fallback:ident, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub const fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name),+
                }
            }

            /// Parses `name`, falling back to the default with a warning when unknown.
            pub fn from_name_lenient(name: &str) -> Self {
                name.parse().unwrap_or_else(|_| {
                    warn!(
                        kind = $label,
                        name,
                        fallback = $ty::$fallback.name(),
                        "unknown mode name, using fallback"
                    );
                    $ty::$fallback
                })
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                $ty::$fallback
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = normalize(s);
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|mode| normalize(mode.name()) == wanted)
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $ty::ALL.iter().map(|m| m.name()).collect();
                        ConfigError::new(format!(
                            concat!("invalid ", $label, ": '{}'. Valid options are: {}"),
                            s,
                            valid.join(", ")
                        ))
                    })
            }
        }
    };
}

/// How a pool picks which template to instantiate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstantiationMode {
    /// Round-robin over the templates.
    Sequential,
    /// Uniform pick.
    Random,
    /// Pick proportional to `template_weights`.
    WeightedRandom,
    /// Always the first template.
    FirstOnly,
}

named_modes!(InstantiationMode, "instantiation mode", fallback = Sequential, {
    Sequential => "Sequential",
    Random => "Random",
    WeightedRandom => "WeightedRandom",
    FirstOnly => "FirstOnly",
});

/// What a pool does when every instance it may create is already active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverflowBehavior {
    /// Refuse the request.
    Block,
    /// Reclaim the longest-held active instance.
    ReuseOldest,
    /// Reclaim a uniformly chosen active instance.
    ReuseRandom,
}

named_modes!(OverflowBehavior, "overflow behavior", fallback = ReuseOldest, {
    Block => "Block",
    ReuseOldest => "ReuseOldest",
    ReuseRandom => "ReuseRandom",
});

/// Which transform an instance receives when handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetMode {
    /// The template's own transform, captured on first instantiation.
    UseTemplateDefaults,
    /// The pool's `custom_defaults`.
    UseCustomDefaults,
    /// The placement passed to `get`.
    UseProvidedValues,
    /// Leave the instance where it is.
    KeepCurrent,
}

named_modes!(ResetMode, "reset mode", fallback = UseTemplateDefaults, {
    UseTemplateDefaults => "UseTemplateDefaults",
    UseCustomDefaults => "UseCustomDefaults",
    UseProvidedValues => "UseProvidedValues",
    KeepCurrent => "KeepCurrent",
});

/// Configuration of a single pool.
#[derive(Debug)]
pub struct PoolConfig<Tm> {
    pub key: String,
    /// Empty means the coordinator's default category.
    pub category: String,
    pub templates: Vec<Arc<Tm>>,
    pub template_weights: Vec<f32>,
    pub initial_size: usize,
    pub max_size: usize,
    pub instantiation_mode: InstantiationMode,
    pub overflow_behavior: OverflowBehavior,
    pub reset_mode: ResetMode,
    pub custom_defaults: Transform,
    pub prewarm_on_start: bool,
    pub log_activity: bool,
}

impl<Tm> PoolConfig<Tm> {
    /// Default-sized config for `key` with one weight of `1.0` per template.
    pub fn new(key: impl Into<String>, templates: Vec<Arc<Tm>>) -> Self {
        let mut config = Self {
            key: key.into(),
            templates,
            ..Self::default()
        };
        config.sync_weights();
        config
    }

    /// Makes `template_weights` line up with `templates`.
    ///
    /// Missing weights become `1.0`, surplus ones are dropped and every
    /// value is clamped into `[0, 1]` (NaN becomes `0`).
    pub fn sync_weights(&mut self) {
        self.template_weights.resize(self.templates.len(), 1.0);
        for weight in &mut self.template_weights {
            *weight = if weight.is_nan() {
                0.0
            } else {
                weight.clamp(0.0, 1.0)
            };
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.template_weights.iter().sum()
    }

    /// Share of the total weight held by template `index`; `0` if the total is not positive.
    pub fn normalized_weight(&self, index: usize) -> f32 {
        let total = self.total_weight();
        match self.template_weights.get(index) {
            Some(&weight) if total > 0.0 => weight / total,
            _ => 0.0,
        }
    }

    /// Category to file the pool under, given the coordinator's default.
    pub fn effective_category<'a>(&'a self, default: &'a str) -> &'a str {
        if self.category.is_empty() {
            default
        } else {
            &self.category
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key.trim().is_empty() {
            return Err(ConfigError::new("key must not be empty"));
        }
        if self.templates.is_empty() {
            return Err(ConfigError::new(format!(
                "pool '{}' needs at least one template",
                self.key
            )));
        }
        if self.initial_size == 0 {
            return Err(ConfigError::new("initial_size must be > 0"));
        }
        if self.max_size < self.initial_size {
            return Err(ConfigError::new(format!(
                "max_size ({}) must be >= initial_size ({})",
                self.max_size, self.initial_size
            )));
        }
        Ok(())
    }
}

impl<Tm> Default for PoolConfig<Tm> {
    fn default() -> Self {
        Self {
            key: String::new(),
            category: DEFAULT_CATEGORY.to_owned(),
            templates: Vec::new(),
            template_weights: Vec::new(),
            initial_size: DEFAULT_INITIAL_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            instantiation_mode: InstantiationMode::default(),
            overflow_behavior: OverflowBehavior::default(),
            reset_mode: ResetMode::default(),
            custom_defaults: Transform::IDENTITY,
            prewarm_on_start: true,
            log_activity: false,
        }
    }
}

impl<Tm> Clone for PoolConfig<Tm> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            category: self.category.clone(),
            templates: self.templates.clone(),
            template_weights: self.template_weights.clone(),
            initial_size: self.initial_size,
            max_size: self.max_size,
            instantiation_mode: self.instantiation_mode,
            overflow_behavior: self.overflow_behavior,
            reset_mode: self.reset_mode,
            custom_defaults: self.custom_defaults,
            prewarm_on_start: self.prewarm_on_start,
            log_activity: self.log_activity,
        }
    }
}

/// Coordinator-wide settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Base seed for every pool's random source. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Category for pools registered with an empty one.
    pub default_category: String,
}

impl CoordinatorConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_category: DEFAULT_CATEGORY.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(templates: usize) -> PoolConfig<&'static str> {
        PoolConfig::new("pool", (0..templates).map(|_| Arc::new("t")).collect())
    }

    // ==============================================
    // Mode names
    // ==============================================

    mod mode_names {
        use super::*;

        #[test]
        fn display_round_trips_through_from_str() {
            for &mode in InstantiationMode::ALL {
                assert_eq!(mode.to_string().parse::<InstantiationMode>(), Ok(mode));
            }
            for &mode in OverflowBehavior::ALL {
                assert_eq!(mode.to_string().parse::<OverflowBehavior>(), Ok(mode));
            }
            for &mode in ResetMode::ALL {
                assert_eq!(mode.to_string().parse::<ResetMode>(), Ok(mode));
            }
        }

        #[test]
        fn parsing_ignores_case_and_separators() {
            assert_eq!(
                "weighted_random".parse::<InstantiationMode>(),
                Ok(InstantiationMode::WeightedRandom)
            );
            assert_eq!(
                "reuse-oldest".parse::<OverflowBehavior>(),
                Ok(OverflowBehavior::ReuseOldest)
            );
            assert_eq!("keep current".parse::<ResetMode>(), Ok(ResetMode::KeepCurrent));
        }

        #[test]
        fn strict_parse_lists_valid_options() {
            let err = "Shuffle".parse::<InstantiationMode>().unwrap_err();
            assert!(err.message().contains("'Shuffle'"));
            assert!(err.message().contains("FirstOnly"));
        }

        #[test]
        fn lenient_parse_falls_back() {
            assert_eq!(
                InstantiationMode::from_name_lenient("Shuffle"),
                InstantiationMode::Sequential
            );
            assert_eq!(
                OverflowBehavior::from_name_lenient("Explode"),
                OverflowBehavior::ReuseOldest
            );
            assert_eq!(ResetMode::from_name_lenient("???"), ResetMode::UseTemplateDefaults);
            assert_eq!(OverflowBehavior::from_name_lenient("block"), OverflowBehavior::Block);
        }
    }

    // ==============================================
    // Weights
    // ==============================================

    mod weights {
        use super::*;

        #[test]
        fn sync_pads_with_one() {
            let mut config = config_with(3);
            config.template_weights = vec![0.5];
            config.sync_weights();
            assert_eq!(config.template_weights, vec![0.5, 1.0, 1.0]);
        }

        #[test]
        fn sync_truncates_and_clamps() {
            let mut config = config_with(2);
            config.template_weights = vec![-1.0, 4.0, 0.3];
            config.sync_weights();
            assert_eq!(config.template_weights, vec![0.0, 1.0]);
        }

        #[test]
        fn sync_zeroes_nan() {
            let mut config = config_with(1);
            config.template_weights = vec![f32::NAN];
            config.sync_weights();
            assert_eq!(config.template_weights, vec![0.0]);
        }

        #[test]
        fn normalized_weight_divides_by_total() {
            let mut config = config_with(2);
            config.template_weights = vec![0.25, 0.75];
            assert!((config.total_weight() - 1.0).abs() < f32::EPSILON);
            assert!((config.normalized_weight(1) - 0.75).abs() < f32::EPSILON);
            assert_eq!(config.normalized_weight(7), 0.0);
        }

        #[test]
        fn normalized_weight_is_zero_without_total() {
            let mut config = config_with(2);
            config.template_weights = vec![0.0, 0.0];
            assert_eq!(config.normalized_weight(0), 0.0);
        }
    }

    // ==============================================
    // Validation
    // ==============================================

    mod validation {
        use super::*;

        #[test]
        fn defaults_match_documented_values() {
            let config = config_with(1);
            assert_eq!(config.category, "Default");
            assert_eq!(config.initial_size, 10);
            assert_eq!(config.max_size, 100);
            assert_eq!(config.instantiation_mode, InstantiationMode::Sequential);
            assert_eq!(config.overflow_behavior, OverflowBehavior::ReuseOldest);
            assert_eq!(config.reset_mode, ResetMode::UseTemplateDefaults);
            assert!(config.prewarm_on_start);
            assert!(!config.log_activity);
            assert_eq!(config.template_weights, vec![1.0]);
            assert!(config.validate().is_ok());
        }

        #[test]
        fn rejects_bad_shapes() {
            let mut config = config_with(1);
            config.key = "  ".into();
            assert!(config.validate().is_err());

            let config = config_with(0);
            assert!(config.validate().unwrap_err().message().contains("template"));

            let mut config = config_with(1);
            config.initial_size = 0;
            assert!(config.validate().unwrap_err().message().contains("initial_size"));

            let mut config = config_with(1);
            config.max_size = 5;
            assert!(config.validate().unwrap_err().message().contains("max_size"));
        }

        #[test]
        fn empty_category_uses_default() {
            let mut config = config_with(1);
            config.category.clear();
            assert_eq!(config.effective_category("Misc"), "Misc");
            config.category = "Enemies".into();
            assert_eq!(config.effective_category("Misc"), "Enemies");
        }

        #[test]
        fn coordinator_config_defaults() {
            let config = CoordinatorConfig::default();
            assert_eq!(config.seed, None);
            assert_eq!(config.default_category, "Default");
            assert_eq!(CoordinatorConfig::seeded(7).seed, Some(7));
        }
    }
}
