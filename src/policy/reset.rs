//! Reset policy: which transform an instance gets when it is handed out.
//!
//! [`ResetPolicy`] turns a pool's [`ResetMode`] into a concrete target
//! transform. [`TemplateDefaults`] remembers each template's baseline, keyed
//! by the address of its `Arc` allocation and guarded by a `Weak` so the
//! cache never keeps a template alive and never confuses a dead template
//! with a new one that happens to reuse its address.
//!
//! | Mode                  | Target                                      |
//! |-----------------------|---------------------------------------------|
//! | `UseTemplateDefaults` | cached baseline; untouched if none recorded |
//! | `UseCustomDefaults`   | the pool's `custom_defaults`                |
//! | `UseProvidedValues`   | the placement, `IDENTITY` when absent       |
//! | `KeepCurrent`         | untouched                                   |

use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;

use crate::config::ResetMode;
use crate::transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetPolicy {
    pub mode: ResetMode,
    pub custom_defaults: Transform,
}

impl ResetPolicy {
    pub const fn new(mode: ResetMode, custom_defaults: Transform) -> Self {
        Self {
            mode,
            custom_defaults,
        }
    }

    /// Transform to apply, or `None` to leave the instance as it is.
    pub fn target(
        &self,
        template_default: Option<Transform>,
        placement: Option<Transform>,
    ) -> Option<Transform> {
        match self.mode {
            ResetMode::UseTemplateDefaults => template_default,
            ResetMode::UseCustomDefaults => Some(self.custom_defaults),
            ResetMode::UseProvidedValues => Some(placement.unwrap_or(Transform::IDENTITY)),
            ResetMode::KeepCurrent => None,
        }
    }
}

/// Baseline transforms per template, captured on first instantiation.
#[derive(Debug)]
pub struct TemplateDefaults<Tm> {
    entries: FxHashMap<usize, (Weak<Tm>, Transform)>,
}

fn address<Tm>(ptr: *const Tm) -> usize {
    ptr as *const () as usize
}

impl<Tm> TemplateDefaults<Tm> {
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Returns the recorded baseline for `template`, recording `capture()` first if needed.
    pub fn capture(&mut self, template: &Arc<Tm>, capture: impl FnOnce() -> Transform) -> Transform {
        let key = address(Arc::as_ptr(template));
        match self.entries.get(&key) {
            Some((weak, transform)) if weak.strong_count() > 0 => *transform,
            _ => {
                let transform = capture();
                self.entries.insert(key, (Arc::downgrade(template), transform));
                transform
            },
        }
    }

    pub fn get(&self, template: &Arc<Tm>) -> Option<Transform> {
        self.lookup(address(Arc::as_ptr(template)))
    }

    /// Looks up through the weak back-link an instance keeps to its template.
    pub fn get_weak(&self, template: &Weak<Tm>) -> Option<Transform> {
        if template.strong_count() == 0 {
            return None;
        }
        self.lookup(address(template.as_ptr()))
    }

    fn lookup(&self, key: usize) -> Option<Transform> {
        self.entries
            .get(&key)
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, transform)| *transform)
    }

    /// Drops entries whose template no longer exists. Returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<Tm> Default for TemplateDefaults<Tm> {
    fn default() -> Self {
        Self::new()
    }
}
