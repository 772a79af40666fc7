//! # Host Boundary Traits
//!
//! The coordinator never creates, destroys or places anything itself. It
//! talks to the embedding application through three traits:
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────┐
//!   │                 Host                         │
//!   │                                              │
//!   │  type Template                               │
//!   │  type Instance: Poolable                     │
//!   │                                              │
//!   │  instantiate(&mut, &Template) → Option<Inst> │
//!   │  destroy(&mut, Instance)                     │
//!   │  template_transform(&, &Template) → Transform│
//!   └───────────────────────┬──────────────────────┘
//!                           │ produces
//!                           ▼
//!   ┌──────────────────────────────────────────────┐
//!   │                 Poolable                     │
//!   │                                              │
//!   │  transform(&) → Transform                    │
//!   │  set_transform(&mut, Transform)              │
//!   │  set_active(&mut, bool)           (no-op)    │
//!   │  callbacks(&mut) → Option<&mut dyn ..>(None) │
//!   └───────────────────────┬──────────────────────┘
//!                           │ optionally exposes
//!                           ▼
//!   ┌──────────────────────────────────────────────┐
//!   │               PoolCallbacks                  │
//!   │                                              │
//!   │  on_initialize   once, after creation        │
//!   │  on_rent         every time it is handed out │
//!   │  on_return       every time it comes back    │
//!   │  on_pool_destroy right before destruction    │
//!   └──────────────────────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Trait           | Implemented by            | Purpose                          |
//! |-----------------|---------------------------|----------------------------------|
//! | `Host`          | the embedding engine      | Create / destroy / baseline      |
//! | `Poolable`      | the pooled payload        | Placement and visibility         |
//! | `PoolCallbacks` | payloads that want hooks  | Lifecycle notifications          |
//!
//! Whether an instance exposes [`PoolCallbacks`] is asked once, right after
//! it is created, and remembered for the rest of its life.
//!
//! ## Example
//!
//! ```
//! use poolkit::traits::{Host, PoolCallbacks, Poolable};
//! use poolkit::transform::Transform;
//!
//! #[derive(Default)]
//! struct Spark {
//!     at: Transform,
//!     visible: bool,
//!     rents: u32,
//! }
//!
//! impl PoolCallbacks for Spark {
//!     fn on_rent(&mut self) {
//!         self.rents += 1;
//!     }
//! }
//!
//! impl Poolable for Spark {
//!     fn transform(&self) -> Transform {
//!         self.at
//!     }
//!     fn set_transform(&mut self, transform: Transform) {
//!         self.at = transform;
//!     }
//!     fn set_active(&mut self, active: bool) {
//!         self.visible = active;
//!     }
//!     fn callbacks(&mut self) -> Option<&mut dyn PoolCallbacks> {
//!         Some(self)
//!     }
//! }
//!
//! struct Engine;
//!
//! impl Host for Engine {
//!     type Template = &'static str;
//!     type Instance = Spark;
//!
//!     fn instantiate(&mut self, _template: &Self::Template) -> Option<Spark> {
//!         Some(Spark::default())
//!     }
//! }
//! ```

use crate::transform::Transform;

/// Lifecycle notifications an instance may opt into.
pub trait PoolCallbacks {
    /// Called once, right after the instance is created.
    fn on_initialize(&mut self) {}

    /// Called whenever the instance is handed out.
    fn on_rent(&mut self) {}

    /// Called whenever the instance is given back.
    fn on_return(&mut self) {}

    /// Called right before the pool destroys the instance.
    fn on_pool_destroy(&mut self) {}
}

/// A payload the coordinator can place and toggle.
pub trait Poolable {
    fn transform(&self) -> Transform;

    fn set_transform(&mut self, transform: Transform);

    /// Shows or hides the instance. Called on every rent and return.
    fn set_active(&mut self, _active: bool) {}

    /// Exposes lifecycle callbacks, if the payload has any.
    fn callbacks(&mut self) -> Option<&mut dyn PoolCallbacks> {
        None
    }
}

/// The embedding application: owns templates, creates and destroys instances.
pub trait Host {
    type Template;
    type Instance: Poolable;

    /// Creates a new instance from `template`.
    ///
    /// Only called when no recyclable instance exists. Returning `None`
    /// makes the request fail softly.
    fn instantiate(&mut self, template: &Self::Template) -> Option<Self::Instance>;

    /// Destroys an instance for good. The default just drops it.
    fn destroy(&mut self, instance: Self::Instance) {
        drop(instance);
    }

    /// Baseline placement of `template`, captured the first time it is instantiated.
    fn template_transform(&self, _template: &Self::Template) -> Transform {
        Transform::IDENTITY
    }
}
