//! Per-pool policies: which template to instantiate, what to do when the
//! pool is exhausted, and where a handed-out instance is placed.

pub mod overflow;
pub mod reset;
pub mod selector;

pub use overflow::{OverflowResolver, Resolution};
pub use reset::{ResetPolicy, TemplateDefaults};
pub use selector::TemplateSelector;
