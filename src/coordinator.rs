//! Multi-pool coordinator.
//!
//! [`PoolCoordinator`] owns every pool, every instance payload and the
//! [`Host`] that creates and destroys them. Callers register pools by key,
//! then ask for instances with [`get`](PoolCoordinator::get) and hand them
//! back with [`release`](PoolCoordinator::release). What they hold in the
//! meantime is an [`InstanceId`], a `Copy` generational handle: once the
//! instance is destroyed the handle goes stale and every call that takes it
//! answers `InvalidArgument` or `None`.
//!
//! ## Architecture
//!
//! ```text
//!   PoolCoordinator<H>
//!   ├── host: H                                creates / destroys payloads
//!   ├── instances: SlotArena<Instance>         payload + pool + template link
//!   ├── defaults: TemplateDefaults             baseline transform per template
//!   └── pools: key → PoolEntry
//!                    ├── config: PoolConfig
//!                    ├── record: PoolRecord<InstanceId>
//!                    │             └── SlotPool (slots, overflow, ActiveSet)
//!                    └── selector: TemplateSelector (cursor + SmallRng)
//! ```
//!
//! ## Request flow
//!
//! ```text
//!   get(key, placement)
//!     │
//!     ├─ record.is_exhausted()? ──yes──► OverflowResolver ──► reset ──► id / None
//!     │
//!     └─ record.rent(lifecycle)
//!          ├─ recycled: set_active(true), on_rent
//!          └─ created:  instantiate, reset(identity), on_initialize,
//!                       set_active(false) ... then set_active(true), on_rent
//!        └─► reset(placement) ──► id
//! ```
//!
//! ## Example
//!
//! ```
//! use poolkit::builder::PoolConfigBuilder;
//! use poolkit::coordinator::PoolCoordinator;
//! use poolkit::traits::{Host, Poolable};
//! use poolkit::transform::Transform;
//!
//! #[derive(Default)]
//! struct Bullet(Transform);
//!
//! impl Poolable for Bullet {
//!     fn transform(&self) -> Transform {
//!         self.0
//!     }
//!     fn set_transform(&mut self, transform: Transform) {
//!         self.0 = transform;
//!     }
//! }
//!
//! struct Engine;
//!
//! impl Host for Engine {
//!     type Template = &'static str;
//!     type Instance = Bullet;
//!
//!     fn instantiate(&mut self, _template: &&'static str) -> Option<Bullet> {
//!         Some(Bullet::default())
//!     }
//! }
//!
//! let mut pools = PoolCoordinator::new(Engine);
//! pools.register_pool(
//!     PoolConfigBuilder::new("bullets")
//!         .template("bullet")
//!         .initial_size(4)
//!         .max_size(8)
//!         .build(),
//! );
//!
//! let id = pools.get("bullets", None).unwrap().unwrap();
//! assert_eq!(pools.active_count("bullets"), Ok(1));
//! pools.release(id).unwrap();
//! assert_eq!(pools.inactive_count("bullets"), Ok(4));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use rustc_hash::FxHashMap;
use tracing::{debug, error, info, warn};

use crate::config::{
    CoordinatorConfig, InstantiationMode, OverflowBehavior, PoolConfig, ResetMode,
};
use crate::ds::{SlotArena, SlotId};
use crate::error::{InvariantError, PoolError};
use crate::policy::overflow::OverflowResolver;
use crate::policy::reset::{ResetPolicy, TemplateDefaults};
use crate::policy::selector::TemplateSelector;
use crate::pool::record::PoolRecord;
use crate::pool::slot_pool::PoolHooks;
use crate::stats::PoolStats;
use crate::traits::{Host, PoolCallbacks, Poolable};
use crate::transform::Transform;

/// Handle to an instance owned by a [`PoolCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(SlotId);

impl InstanceId {
    pub fn slot(self) -> SlotId {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0.index(), self.0.generation())
    }
}

struct Instance<H: Host> {
    payload: H::Instance,
    pool: Arc<str>,
    template: Weak<H::Template>,
    active: bool,
    has_callbacks: bool,
}

impl<H: Host> Instance<H> {
    fn callbacks(&mut self) -> Option<&mut dyn PoolCallbacks> {
        if self.has_callbacks {
            self.payload.callbacks()
        } else {
            None
        }
    }
}

struct PoolEntry<Tm> {
    key: Arc<str>,
    category: String,
    config: PoolConfig<Tm>,
    record: PoolRecord<InstanceId>,
    selector: TemplateSelector,
}

/// Creation and lifecycle hooks for one pool, borrowed out of the coordinator.
struct Lifecycle<'a, H: Host> {
    host: &'a mut H,
    instances: &'a mut SlotArena<Instance<H>>,
    defaults: &'a mut TemplateDefaults<H::Template>,
    config: &'a PoolConfig<H::Template>,
    selector: &'a mut TemplateSelector,
    pool: &'a Arc<str>,
}

impl<H: Host> Lifecycle<'_, H> {
    fn reset_policy(&self) -> ResetPolicy {
        ResetPolicy::new(self.config.reset_mode, self.config.custom_defaults)
    }

    /// Fresh instances come out of `create` inactive; this runs their first activation.
    fn activate(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id.0) else {
            return;
        };
        if instance.active {
            return;
        }
        instance.active = true;
        instance.payload.set_active(true);
        if let Some(callbacks) = instance.callbacks() {
            callbacks.on_rent();
        }
    }

    fn reset(&mut self, id: InstanceId, placement: Option<Transform>) {
        let policy = self.reset_policy();
        let Some(instance) = self.instances.get_mut(id.0) else {
            return;
        };
        let baseline = self.defaults.get_weak(&instance.template);
        if let Some(target) = policy.target(baseline, placement) {
            instance.payload.set_transform(target);
        }
    }
}

impl<H: Host> PoolHooks<InstanceId> for Lifecycle<'_, H> {
    fn create(&mut self) -> Option<InstanceId> {
        let Self {
            host,
            instances,
            defaults,
            config,
            selector,
            pool,
        } = self;

        let index = selector.select(
            config.instantiation_mode,
            &config.template_weights,
            config.templates.len(),
        )?;
        let template = &config.templates[index];
        let baseline = defaults.capture(template, || host.template_transform(template));

        let Some(mut payload) = host.instantiate(template) else {
            error!(pool = %pool, template = index, "host failed to instantiate template");
            return None;
        };

        let policy = ResetPolicy::new(config.reset_mode, config.custom_defaults);
        if let Some(target) = policy.target(Some(baseline), Some(Transform::IDENTITY)) {
            payload.set_transform(target);
        }

        let has_callbacks = match payload.callbacks() {
            Some(callbacks) => {
                callbacks.on_initialize();
                true
            },
            None => false,
        };
        payload.set_active(false);

        let slot = instances.insert(Instance {
            payload,
            pool: Arc::clone(*pool),
            template: Arc::downgrade(template),
            active: false,
            has_callbacks,
        });
        Some(InstanceId(slot))
    }

    fn on_rent(&mut self, id: InstanceId) {
        self.activate(id);
    }

    fn on_return(&mut self, id: InstanceId) {
        let Some(instance) = self.instances.get_mut(id.0) else {
            return;
        };
        instance.active = false;
        instance.payload.set_active(false);
        if let Some(callbacks) = instance.callbacks() {
            callbacks.on_return();
        }
    }

    fn on_destroy(&mut self, id: InstanceId) {
        let Some(mut instance) = self.instances.remove(id.0) else {
            return;
        };
        if let Some(callbacks) = instance.callbacks() {
            callbacks.on_pool_destroy();
        }
        self.host.destroy(instance.payload);
    }
}

/// Owns every pool and every pooled instance.
pub struct PoolCoordinator<H: Host> {
    host: H,
    settings: CoordinatorConfig,
    pools: FxHashMap<Arc<str>, PoolEntry<H::Template>>,
    /// Registration order.
    order: Vec<Arc<str>>,
    instances: SlotArena<Instance<H>>,
    defaults: TemplateDefaults<H::Template>,
    disposed: bool,
}

impl<H: Host> PoolCoordinator<H> {
    pub fn new(host: H) -> Self {
        Self::with_config(host, CoordinatorConfig::default())
    }

    pub fn with_config(host: H, settings: CoordinatorConfig) -> Self {
        Self {
            host,
            settings,
            pools: FxHashMap::default(),
            order: Vec::new(),
            instances: SlotArena::new(),
            defaults: TemplateDefaults::new(),
            disposed: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn settings(&self) -> &CoordinatorConfig {
        &self.settings
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn ensure_live(&self) -> Result<(), PoolError> {
        if self.disposed {
            Err(PoolError::Disposed)
        } else {
            Ok(())
        }
    }

    fn entry(&self, key: &str) -> Result<&PoolEntry<H::Template>, PoolError> {
        self.pools
            .get(key)
            .ok_or_else(|| PoolError::PoolNotFound(key.to_owned()))
    }

    fn entry_mut(&mut self, key: &str) -> Result<&mut PoolEntry<H::Template>, PoolError> {
        self.pools
            .get_mut(key)
            .ok_or_else(|| PoolError::PoolNotFound(key.to_owned()))
    }

    /// Splits out one pool's record and the hooks that drive it.
    fn pool_parts(
        &mut self,
        key: &str,
    ) -> Result<(&mut PoolRecord<InstanceId>, Lifecycle<'_, H>), PoolError> {
        let Self {
            host,
            pools,
            instances,
            defaults,
            ..
        } = self;
        let PoolEntry {
            key: pool,
            config,
            record,
            selector,
            ..
        } = pools
            .get_mut(key)
            .ok_or_else(|| PoolError::PoolNotFound(key.to_owned()))?;
        let hooks = Lifecycle {
            host,
            instances,
            defaults,
            config,
            selector,
            pool,
        };
        Ok((record, hooks))
    }

    // -- Registration -------------------------------------------------------

    /// Registers a pool and prewarms it if configured to.
    ///
    /// Returns `false` (and logs a warning) if the key is already taken or
    /// the coordinator is disposed. The config is not validated; see
    /// [`PoolConfig::validate`].
    pub fn register_pool(&mut self, mut config: PoolConfig<H::Template>) -> bool {
        if self.disposed {
            warn!(pool = %config.key, "cannot register a pool on a disposed coordinator");
            return false;
        }
        if self.pools.contains_key(config.key.as_str()) {
            warn!(pool = %config.key, "pool already registered, ignoring");
            return false;
        }

        if config.instantiation_mode == InstantiationMode::WeightedRandom {
            TemplateSelector::repair_weights(
                &config.key,
                &mut config.template_weights,
                config.templates.len(),
            );
        }

        let key: Arc<str> = Arc::from(config.key.as_str());
        let category = config
            .effective_category(&self.settings.default_category)
            .to_owned();
        let entry = PoolEntry {
            key: Arc::clone(&key),
            category,
            selector: TemplateSelector::for_pool(&key, self.settings.seed),
            record: PoolRecord::new(config.initial_size, config.max_size)
                .with_activity_logging(config.log_activity),
            config,
        };
        let (prewarm, initial_size, log_activity) = (
            entry.config.prewarm_on_start,
            entry.config.initial_size,
            entry.config.log_activity,
        );
        self.pools.insert(Arc::clone(&key), entry);
        self.order.push(Arc::clone(&key));

        if prewarm {
            match self.pool_parts(&key) {
                Ok((record, mut hooks)) => match record.prewarm(initial_size, &mut hooks) {
                    Ok(created) if created < initial_size => {
                        warn!(pool = &*key, created, initial_size, "prewarm stopped early");
                    },
                    Ok(_) => {},
                    Err(err) => error!(pool = &*key, %err, "prewarm failed"),
                },
                Err(err) => error!(pool = &*key, %err, "registered pool went missing"),
            }
        }

        if log_activity {
            debug!(pool = &*key, initial_size, prewarm, "registered pool");
        }
        true
    }

    // -- Renting ------------------------------------------------------------

    /// Hands out an instance from pool `key`.
    ///
    /// `Ok(None)` means the pool could not produce one: it is blocked at its
    /// ceiling, the host declined to instantiate, or bookkeeping failed a
    /// consistency check (logged at error level).
    pub fn get(
        &mut self,
        key: &str,
        placement: Option<Transform>,
    ) -> Result<Option<InstanceId>, PoolError> {
        self.ensure_live()?;
        let (record, mut hooks) = self.pool_parts(key)?;
        let log_activity = hooks.config.log_activity;

        if record.is_exhausted() {
            let resolver = OverflowResolver::new(hooks.config.overflow_behavior);
            let victim = resolver.pick_victim(record, hooks.selector.rng_mut());
            let resolution = resolver.reclaim(key, record, victim, &mut hooks, log_activity)?;
            let Some(id) = resolution.into_option() else {
                return Ok(None);
            };
            hooks.reset(id, placement);
            return Ok(Some(id));
        }

        let Some(id) = record.rent(&mut hooks)? else {
            return Ok(None);
        };
        hooks.activate(id);
        hooks.reset(id, placement);

        if log_activity {
            debug!(
                pool = key,
                instance = %id,
                active = record.active_count(),
                inactive = record.inactive_count(),
                "rented instance"
            );
        }
        Ok(Some(id))
    }

    // -- Releasing ----------------------------------------------------------

    /// Returns an active instance to its pool.
    pub fn release(&mut self, id: InstanceId) -> Result<(), PoolError> {
        self.ensure_live()?;
        let instance = self
            .instances
            .get(id.0)
            .ok_or(PoolError::InvalidArgument("unknown or stale instance handle"))?;
        if !instance.active {
            return Err(PoolError::InvalidArgument("instance is not active"));
        }
        let pool = Arc::clone(&instance.pool);

        let (record, mut hooks) = self.pool_parts(&pool)?;
        record.give_back(id, &mut hooks)?;
        if hooks.config.log_activity {
            debug!(pool = &*pool, instance = %id, "released instance");
        }
        Ok(())
    }

    /// Destroys an instance that no pool knows about.
    pub fn release_untracked(&mut self, instance: H::Instance) {
        warn!("releasing an instance that no pool tracks, destroying it");
        self.host.destroy(instance);
    }

    /// Returns up to `count` of the pool's oldest active instances.
    pub fn release_count(&mut self, key: &str, count: usize) -> Result<usize, PoolError> {
        self.ensure_live()?;
        let (record, mut hooks) = self.pool_parts(key)?;
        if count == 0 {
            return Ok(0);
        }
        record.give_back_many(count, &mut hooks)
    }

    /// Returns every active instance of pool `key`.
    pub fn release_all_in(&mut self, key: &str) -> Result<usize, PoolError> {
        self.ensure_live()?;
        let (record, mut hooks) = self.pool_parts(key)?;
        record.give_back_all(&mut hooks)
    }

    /// Returns every active instance of every pool.
    pub fn release_all(&mut self) -> Result<usize, PoolError> {
        self.ensure_live()?;
        let mut released = 0;
        for key in self.order.clone() {
            released += self.release_all_in(&key)?;
        }
        Ok(released)
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Destroys every instance of pool `key` and starts it over.
    ///
    /// The creation counter and the sequential cursor go back to zero; the
    /// pool is not prewarmed again.
    pub fn clear_pool(&mut self, key: &str) -> Result<(), PoolError> {
        self.ensure_live()?;
        let (record, mut hooks) = self.pool_parts(key)?;
        record.clear(&mut hooks)?;
        hooks.selector.reset_cursor();
        if hooks.config.log_activity {
            debug!(pool = key, "cleared pool");
        }
        Ok(())
    }

    /// Destroys every instance of every pool and drops the pools. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for key in std::mem::take(&mut self.order) {
            if let Ok((record, mut hooks)) = self.pool_parts(&key) {
                if let Err(err) = record.dispose(&mut hooks) {
                    error!(pool = &*key, %err, "failed to dispose pool");
                }
            }
        }
        self.pools.clear();
        self.defaults.clear();
        self.disposed = true;
    }

    // -- Settings -----------------------------------------------------------

    /// Sets the pool's custom defaults and switches it to `UseCustomDefaults`.
    pub fn set_custom_defaults(&mut self, key: &str, transform: Transform) -> Result<(), PoolError> {
        let config = &mut self.entry_mut(key)?.config;
        config.custom_defaults = transform;
        config.reset_mode = ResetMode::UseCustomDefaults;
        Ok(())
    }

    pub fn set_reset_mode(&mut self, key: &str, mode: ResetMode) -> Result<(), PoolError> {
        self.entry_mut(key)?.config.reset_mode = mode;
        Ok(())
    }

    pub fn reset_mode(&self, key: &str) -> Result<ResetMode, PoolError> {
        Ok(self.entry(key)?.config.reset_mode)
    }

    pub fn instantiation_mode(&self, key: &str) -> Result<InstantiationMode, PoolError> {
        Ok(self.entry(key)?.config.instantiation_mode)
    }

    pub fn overflow_behavior(&self, key: &str) -> Result<OverflowBehavior, PoolError> {
        Ok(self.entry(key)?.config.overflow_behavior)
    }

    pub fn config(&self, key: &str) -> Option<&PoolConfig<H::Template>> {
        self.pools.get(key).map(|entry| &entry.config)
    }

    // -- Queries ------------------------------------------------------------

    pub fn active_count(&self, key: &str) -> Result<usize, PoolError> {
        Ok(self.entry(key)?.record.active_count())
    }

    pub fn inactive_count(&self, key: &str) -> Result<usize, PoolError> {
        Ok(self.entry(key)?.record.inactive_count())
    }

    pub fn total_created(&self, key: &str) -> Result<usize, PoolError> {
        Ok(self.entry(key)?.record.total_created())
    }

    pub fn pool_exists(&self, key: &str) -> bool {
        self.pools.contains_key(key)
    }

    /// Pool keys in registration order.
    pub fn pool_keys(&self) -> Vec<&str> {
        self.order.iter().map(|key| &**key).collect()
    }

    pub fn pool_keys_sorted(&self) -> Vec<&str> {
        let mut keys = self.pool_keys();
        keys.sort_unstable();
        keys
    }

    /// Active instances of pool `key`, oldest first.
    pub fn active_instances(&self, key: &str) -> Result<Vec<InstanceId>, PoolError> {
        Ok(self.entry(key)?.record.slot_pool().active_snapshot())
    }

    pub fn instance(&self, id: InstanceId) -> Option<&H::Instance> {
        self.instances.get(id.0).map(|instance| &instance.payload)
    }

    pub fn instance_mut(&mut self, id: InstanceId) -> Option<&mut H::Instance> {
        self.instances.get_mut(id.0).map(|instance| &mut instance.payload)
    }

    pub fn pool_of(&self, id: InstanceId) -> Option<&str> {
        self.instances.get(id.0).map(|instance| &*instance.pool)
    }

    /// Template the instance was created from, if it is still alive.
    pub fn template_of(&self, id: InstanceId) -> Option<Arc<H::Template>> {
        self.instances.get(id.0)?.template.upgrade()
    }

    pub fn is_active(&self, id: InstanceId) -> bool {
        self.instances
            .get(id.0)
            .is_some_and(|instance| instance.active)
    }

    /// Number of live instances across all pools, active or not.
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    // -- Categories ---------------------------------------------------------

    pub fn category_of(&self, key: &str) -> Option<&str> {
        self.pools.get(key).map(|entry| entry.category.as_str())
    }

    /// Distinct categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let mut categories: Vec<&str> = self
            .pools
            .values()
            .map(|entry| entry.category.as_str())
            .collect();
        categories.sort_unstable();
        categories.dedup();
        categories
    }

    /// Keys of the pools filed under `category`, in registration order.
    pub fn pools_in_category(&self, category: &str) -> Vec<&str> {
        self.order
            .iter()
            .filter(|key| {
                self.pools
                    .get(&***key)
                    .is_some_and(|entry| entry.category == category)
            })
            .map(|key| &**key)
            .collect()
    }

    // -- Statistics ---------------------------------------------------------

    pub fn stats(&self, key: &str) -> Result<PoolStats, PoolError> {
        Ok(Self::snapshot(self.entry(key)?))
    }

    /// Stats for every pool, in registration order.
    pub fn all_stats(&self) -> Vec<PoolStats> {
        self.order
            .iter()
            .filter_map(|key| self.pools.get(&**key))
            .map(Self::snapshot)
            .collect()
    }

    fn snapshot(entry: &PoolEntry<H::Template>) -> PoolStats {
        PoolStats {
            key: entry.key.to_string(),
            category: entry.category.clone(),
            active: entry.record.active_count(),
            inactive: entry.record.inactive_count(),
            total_created: entry.record.total_created(),
            max_size: entry.record.max_size(),
            counters: entry.record.counters(),
        }
    }

    /// Emits one `info` event per pool.
    pub fn log_statistics(&self) {
        for stats in self.all_stats() {
            info!(
                pool = %stats.key,
                category = %stats.category,
                active = stats.active,
                inactive = stats.inactive,
                total_created = stats.total_created,
                max_size = stats.max_size,
                rents = stats.counters.rents,
                reused = stats.counters.reused,
                refused = stats.counters.refused,
                "pool statistics"
            );
        }
    }

    // -- Invariants ---------------------------------------------------------

    /// Cross-checks the pools against the instance arena.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut per_pool: FxHashMap<&str, (usize, usize)> = FxHashMap::default();
        for (slot, instance) in self.instances.iter() {
            let Some(entry) = self.pools.get(&*instance.pool) else {
                return Err(InvariantError::new(format!(
                    "instance {} belongs to unknown pool '{}'",
                    InstanceId(slot),
                    instance.pool
                )));
            };
            let tracked_active = entry.record.slot_pool().is_active(&InstanceId(slot));
            if tracked_active != instance.active {
                return Err(InvariantError::new(format!(
                    "instance {} is active={} but pool '{}' says active={}",
                    InstanceId(slot),
                    instance.active,
                    instance.pool,
                    tracked_active
                )));
            }
            let counts = per_pool.entry(&*instance.pool).or_default();
            counts.0 += 1;
            if instance.active {
                counts.1 += 1;
            }
        }

        for (key, entry) in &self.pools {
            let record = &entry.record;
            let (live, active) = per_pool.get(&**key).copied().unwrap_or_default();
            if record.total_created() > record.max_size() {
                return Err(InvariantError::new(format!(
                    "pool '{key}' created {} instances, ceiling is {}",
                    record.total_created(),
                    record.max_size()
                )));
            }
            if record.active_count() + record.inactive_count() > record.total_created() {
                return Err(InvariantError::new(format!(
                    "pool '{key}' holds {} instances but created only {}",
                    record.active_count() + record.inactive_count(),
                    record.total_created()
                )));
            }
            if live != record.active_count() + record.inactive_count() {
                return Err(InvariantError::new(format!(
                    "pool '{key}' tracks {} instances, arena has {live}",
                    record.active_count() + record.inactive_count()
                )));
            }
            if active != record.active_count() {
                return Err(InvariantError::new(format!(
                    "pool '{key}' tracks {} active instances, arena has {active}",
                    record.active_count()
                )));
            }
        }
        Ok(())
    }
}

impl<H: Host> Drop for PoolCoordinator<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<H: Host> fmt::Debug for PoolCoordinator<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolCoordinator")
            .field("pools", &self.pool_keys())
            .field("instances", &self.instances.len())
            .field("settings", &self.settings)
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PoolConfigBuilder;
    use glam::Vec3;

    #[derive(Debug, Default)]
    struct Dummy {
        transform: Transform,
        visible: bool,
        template: u32,
    }

    impl Poolable for Dummy {
        fn transform(&self) -> Transform {
            self.transform
        }

        fn set_transform(&mut self, transform: Transform) {
            self.transform = transform;
        }

        fn set_active(&mut self, active: bool) {
            self.visible = active;
        }
    }

    #[derive(Default)]
    struct Factory {
        instantiated: usize,
        destroyed: usize,
        fail: bool,
    }

    impl Host for Factory {
        type Template = u32;
        type Instance = Dummy;

        fn instantiate(&mut self, template: &u32) -> Option<Dummy> {
            if self.fail {
                return None;
            }
            self.instantiated += 1;
            Some(Dummy {
                template: *template,
                ..Dummy::default()
            })
        }

        fn destroy(&mut self, _instance: Dummy) {
            self.destroyed += 1;
        }

        fn template_transform(&self, template: &u32) -> Transform {
            Transform::from_position(Vec3::splat(*template as f32))
        }
    }

    fn coordinator() -> PoolCoordinator<Factory> {
        PoolCoordinator::with_config(Factory::default(), CoordinatorConfig::seeded(17))
    }

    fn small(key: &str, initial: usize, max: usize) -> PoolConfig<u32> {
        PoolConfigBuilder::new(key)
            .template(1)
            .initial_size(initial)
            .max_size(max)
            .build()
    }

    // ==============================================
    // Registration
    // ==============================================

    mod registration {
        use super::*;

        #[test]
        fn prewarms_initial_size() {
            let mut pools = coordinator();
            assert!(pools.register_pool(small("a", 3, 5)));

            assert_eq!(pools.inactive_count("a"), Ok(3));
            assert_eq!(pools.active_count("a"), Ok(0));
            assert_eq!(pools.total_created("a"), Ok(3));
            assert_eq!(pools.host().instantiated, 3);
            pools.check_invariants().unwrap();
        }

        #[test]
        fn duplicate_key_is_ignored() {
            let mut pools = coordinator();
            assert!(pools.register_pool(small("a", 1, 2)));
            assert!(!pools.register_pool(small("a", 4, 8)));
            assert_eq!(pools.total_created("a"), Ok(1));
            assert_eq!(pools.pool_keys(), vec!["a"]);
        }

        #[test]
        fn prewarm_can_be_disabled() {
            let mut pools = coordinator();
            let mut config = small("lazy", 4, 4);
            config.prewarm_on_start = false;
            pools.register_pool(config);
            assert_eq!(pools.inactive_count("lazy"), Ok(0));
            assert_eq!(pools.host().instantiated, 0);
        }

        #[test]
        fn malformed_config_is_accepted() {
            let mut pools = coordinator();
            let config: PoolConfig<u32> = PoolConfigBuilder::new("empty").initial_size(2).build();
            assert!(pools.register_pool(config));
            assert_eq!(pools.total_created("empty"), Ok(0));
            assert_eq!(pools.get("empty", None), Ok(None));
        }

        #[test]
        fn weighted_pools_get_repaired_weights() {
            let mut pools = coordinator();
            let config = PoolConfigBuilder::new("w")
                .weighted_template(1, 1.0)
                .weighted_template(2, 0.0)
                .instantiation_mode(InstantiationMode::WeightedRandom)
                .prewarm_on_start(false)
                .build();
            pools.register_pool(config);
            assert_eq!(pools.config("w").unwrap().template_weights, vec![1.0, 0.1]);
        }

        #[test]
        fn empty_category_uses_coordinator_default() {
            let mut pools = PoolCoordinator::with_config(
                Factory::default(),
                CoordinatorConfig {
                    seed: Some(1),
                    default_category: "Misc".into(),
                },
            );
            let mut config = small("a", 1, 1);
            config.category.clear();
            pools.register_pool(config);
            pools.register_pool(PoolConfigBuilder::new("b").template(1).category("Fx").build());

            assert_eq!(pools.category_of("a"), Some("Misc"));
            assert_eq!(pools.categories(), vec!["Fx", "Misc"]);
            assert_eq!(pools.pools_in_category("Fx"), vec!["b"]);
        }
    }

    // ==============================================
    // Get / Release
    // ==============================================

    mod get_and_release {
        use super::*;

        #[test]
        fn unknown_pool_is_an_error() {
            let mut pools = coordinator();
            assert_eq!(
                pools.get("nope", None),
                Err(PoolError::PoolNotFound("nope".into()))
            );
            assert!(matches!(pools.active_count("nope"), Err(PoolError::PoolNotFound(_))));
        }

        #[test]
        fn rented_instances_are_visible_and_tracked() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 2, 4));
            let id = pools.get("a", None).unwrap().unwrap();

            assert!(pools.is_active(id));
            assert!(pools.instance(id).unwrap().visible);
            assert_eq!(pools.pool_of(id), Some("a"));
            assert_eq!(pools.template_of(id).as_deref(), Some(&1));
            pools.check_invariants().unwrap();
        }

        #[test]
        fn release_returns_and_hides() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 2, 4));
            let id = pools.get("a", None).unwrap().unwrap();

            pools.release(id).unwrap();
            assert!(!pools.is_active(id));
            assert!(!pools.instance(id).unwrap().visible);
            assert_eq!(
                pools.release(id),
                Err(PoolError::InvalidArgument("instance is not active"))
            );
        }

        #[test]
        fn fresh_creation_past_prewarm() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 1, 3));
            pools.get("a", None).unwrap().unwrap();
            let fresh = pools.get("a", None).unwrap().unwrap();

            assert!(pools.is_active(fresh));
            assert!(pools.instance(fresh).unwrap().visible);
            assert_eq!(pools.total_created("a"), Ok(2));
        }

        #[test]
        fn host_failure_yields_none() {
            let mut pools = coordinator();
            let mut config = small("a", 1, 3);
            config.prewarm_on_start = false;
            pools.register_pool(config);
            pools.host_mut().fail = true;

            assert_eq!(pools.get("a", None), Ok(None));
            assert_eq!(pools.total_created("a"), Ok(0));
        }

        #[test]
        fn release_count_and_all() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 2, 6));
            pools.register_pool(small("b", 2, 6));
            for _ in 0..4 {
                pools.get("a", None).unwrap();
            }
            pools.get("b", None).unwrap();

            assert_eq!(pools.release_count("a", 0), Ok(0));
            assert_eq!(pools.release_count("a", 3), Ok(3));
            assert_eq!(pools.active_count("a"), Ok(1));
            assert_eq!(pools.release_all(), Ok(2));
            assert_eq!(pools.active_count("b"), Ok(0));
            assert_eq!(pools.release_all_in("a"), Ok(0));
        }

        #[test]
        fn untracked_release_destroys() {
            let mut pools = coordinator();
            pools.release_untracked(Dummy::default());
            assert_eq!(pools.host().destroyed, 1);
        }
    }

    // ==============================================
    // Lifecycle
    // ==============================================

    mod lifecycle {
        use super::*;

        #[test]
        fn clear_pool_destroys_and_invalidates_handles() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 2, 4));
            let id = pools.get("a", None).unwrap().unwrap();

            pools.clear_pool("a").unwrap();
            assert_eq!(pools.host().destroyed, 2);
            assert_eq!(pools.total_created("a"), Ok(0));
            assert!(pools.instance(id).is_none());
            assert_eq!(
                pools.release(id),
                Err(PoolError::InvalidArgument("unknown or stale instance handle"))
            );
            pools.check_invariants().unwrap();
        }

        #[test]
        fn dispose_is_idempotent_and_final() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 3, 4));
            pools.get("a", None).unwrap();

            pools.dispose();
            pools.dispose();
            assert!(pools.is_disposed());
            assert_eq!(pools.host().destroyed, 3);
            assert_eq!(pools.instance_count(), 0);
            assert_eq!(pools.get("a", None), Err(PoolError::Disposed));
            assert!(!pools.register_pool(small("b", 1, 1)));
        }

        #[test]
        fn custom_defaults_switch_reset_mode() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 1, 1));
            let spot = Transform::from_position(Vec3::new(4.0, 5.0, 6.0));

            pools.set_custom_defaults("a", spot).unwrap();
            assert_eq!(pools.reset_mode("a"), Ok(ResetMode::UseCustomDefaults));

            let id = pools.get("a", Some(Transform::IDENTITY)).unwrap().unwrap();
            assert_eq!(pools.instance(id).unwrap().transform, spot);
        }

        #[test]
        fn template_defaults_come_from_host() {
            let mut pools = coordinator();
            pools.register_pool(
                PoolConfigBuilder::new("a")
                    .template(3)
                    .initial_size(1)
                    .max_size(1)
                    .build(),
            );
            let id = pools.get("a", Some(Transform::IDENTITY)).unwrap().unwrap();
            assert_eq!(
                pools.instance(id).unwrap().transform,
                Transform::from_position(Vec3::splat(3.0))
            );
            assert_eq!(pools.instance(id).unwrap().template, 3);
        }

        #[test]
        fn mode_getters_and_setters() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 1, 1));
            pools.set_reset_mode("a", ResetMode::KeepCurrent).unwrap();

            assert_eq!(pools.reset_mode("a"), Ok(ResetMode::KeepCurrent));
            assert_eq!(pools.instantiation_mode("a"), Ok(InstantiationMode::Sequential));
            assert_eq!(pools.overflow_behavior("a"), Ok(OverflowBehavior::ReuseOldest));
            assert!(pools.set_reset_mode("x", ResetMode::KeepCurrent).is_err());
        }

        #[test]
        fn stats_reflect_activity() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 2, 2));
            let id = pools.get("a", None).unwrap().unwrap();
            pools.release(id).unwrap();

            let stats = pools.stats("a").unwrap();
            assert_eq!(stats.inactive, 2);
            assert_eq!(stats.total_created, 2);
            assert_eq!(stats.counters.rents, 1);
            assert_eq!(stats.counters.returns, 1);
            assert_eq!(stats.counters.created, 2);
            assert_eq!(pools.all_stats().len(), 1);
            pools.log_statistics();
        }

        #[test]
        fn debug_output_is_compact() {
            let mut pools = coordinator();
            pools.register_pool(small("a", 1, 1));
            let text = format!("{pools:?}");
            assert!(text.starts_with("PoolCoordinator"));
            assert!(text.contains("\"a\""));
        }
    }
}
