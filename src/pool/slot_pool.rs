//! Fixed-slot recycling store with an unbounded overflow stack.
//!
//! A [`SlotPool`] keeps inactive items in a fixed array sized at
//! initialization, spills returns that do not fit onto an overflow stack, and
//! tracks the currently rented items in an insertion-ordered [`ActiveSet`].
//! It never creates anything on its own: creation and the lifecycle
//! notifications go through the [`PoolHooks`] passed to each call, so the
//! owner decides what "create" and "destroy" mean.
//!
//! ## Architecture
//!
//! ```text
//!   slots (capacity = initial size), scanned from a rotating cursor
//!   ┌─────┬─────┬─────┬─────┐
//!   │  a  │  -  │  c  │  -  │         overflow: [d, e]   (stack, top = e)
//!   └─────┴─────┴─────┴─────┘
//!            ▲ cursor
//!
//!   active (oldest → newest): [x, y, z]
//! ```
//!
//! ## Rent order
//!
//! 1. First occupied slot at or after the cursor (wrapping); the cursor moves
//!    one past the hit, so consecutive rents walk the array round-robin.
//! 2. Top of the overflow stack.
//! 3. `hooks.create()`. Fresh items do not get `on_rent`; creation runs its
//!    own initialization.
//!
//! ## Return order
//!
//! First empty slot from index 0, otherwise the overflow stack.
//!
//! ## Example
//!
//! ```
//! use poolkit::pool::slot_pool::{PoolHooks, SlotPool};
//!
//! struct Counter(u32);
//!
//! impl PoolHooks<u32> for Counter {
//!     fn create(&mut self) -> Option<u32> {
//!         self.0 += 1;
//!         Some(self.0)
//!     }
//! }
//!
//! let mut hooks = Counter(0);
//! let mut pool = SlotPool::new(2);
//!
//! let a = pool.rent(&mut hooks).unwrap().unwrap();
//! pool.give_back(a, &mut hooks).unwrap();
//! assert_eq!(pool.rent(&mut hooks).unwrap(), Some(a));
//! assert_eq!(hooks.0, 1);
//! ```

use std::hash::Hash;

use crate::ds::ActiveSet;
use crate::error::PoolError;

/// Callbacks a [`SlotPool`] invokes while it moves items around.
///
/// `create` is the only required hook. The rest default to no-ops.
pub trait PoolHooks<T> {
    /// Produces a brand new item, or `None` if none can be made right now.
    fn create(&mut self) -> Option<T>;

    /// A recycled item became active.
    fn on_rent(&mut self, _item: T) {}

    /// An active item became inactive.
    fn on_return(&mut self, _item: T) {}

    /// The pool is letting go of an item for good.
    fn on_destroy(&mut self, _item: T) {}
}

/// Bounded recycling store for `Copy` item handles.
#[derive(Debug)]
pub struct SlotPool<T> {
    slots: Box<[Option<T>]>,
    cursor: usize,
    /// Occupied slots; the overflow stack is counted separately.
    slot_count: usize,
    overflow: Vec<T>,
    active: ActiveSet<T>,
    disposed: bool,
}

impl<T> SlotPool<T>
where
    T: Copy + Eq + Hash,
{
    /// Creates a pool with `size` empty slots.
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size].into_boxed_slice(),
            cursor: 0,
            slot_count: 0,
            overflow: Vec::new(),
            active: ActiveSet::with_capacity(size),
            disposed: false,
        }
    }

    /// Resets every piece of state and reallocates `size` empty slots.
    ///
    /// Items still held are forgotten without any hook firing; call
    /// [`clear`](Self::clear) first if they need to be destroyed.
    pub fn initialize(&mut self, size: usize) {
        *self = Self::new(size);
    }

    /// Hands out an item, creating one through `hooks` if nothing is recyclable.
    ///
    /// Returns `Ok(None)` when nothing is stored and `hooks.create()` declined.
    pub fn rent<H>(&mut self, hooks: &mut H) -> Result<Option<T>, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;

        if let Some(item) = self.take_from_slots().or_else(|| self.overflow.pop()) {
            self.active.insert(item);
            hooks.on_rent(item);
            return Ok(Some(item));
        }

        let Some(item) = hooks.create() else {
            return Ok(None);
        };
        self.active.insert(item);
        Ok(Some(item))
    }

    /// Returns an active item to storage.
    ///
    /// Fails with [`PoolError::InvalidArgument`] if `item` is not currently
    /// rented from this pool, which also rejects a second return of the same
    /// item.
    pub fn give_back<H>(&mut self, item: T, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;
        if !self.active.remove(&item) {
            return Err(PoolError::InvalidArgument("item is not active in this pool"));
        }
        hooks.on_return(item);
        self.store(item);
        Ok(())
    }

    /// Returns every active item.
    pub fn give_back_all<H>(&mut self, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;
        let snapshot = self.active.snapshot();
        for &item in &snapshot {
            self.give_back(item, hooks)?;
        }
        Ok(snapshot.len())
    }

    /// Returns up to `count` active items, oldest first.
    pub fn give_back_many<H>(&mut self, count: usize, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;
        let batch: Vec<T> = self.active.iter().take(count).collect();
        for &item in &batch {
            self.give_back(item, hooks)?;
        }
        Ok(batch.len())
    }

    /// Destroys every item the pool knows about: active, slotted and overflow.
    pub fn clear<H>(&mut self, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;

        for item in self.active.snapshot() {
            hooks.on_destroy(item);
        }
        self.active.clear();

        for slot in self.slots.iter_mut() {
            if let Some(item) = slot.take() {
                hooks.on_destroy(item);
            }
        }
        self.slot_count = 0;

        // Stack order, top first.
        while let Some(item) = self.overflow.pop() {
            hooks.on_destroy(item);
        }
        Ok(())
    }

    /// Creates up to `count` items and stores them as inactive.
    ///
    /// Stops early when `hooks.create()` declines; returns how many were made.
    pub fn prewarm<H>(&mut self, count: usize, hooks: &mut H) -> Result<usize, PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.ensure_live()?;
        for created in 0..count {
            let Some(item) = hooks.create() else {
                return Ok(created);
            };
            self.active.insert(item);
            self.give_back(item, hooks)?;
        }
        Ok(count)
    }

    /// Clears the pool and refuses every later call.
    pub fn dispose<H>(&mut self, hooks: &mut H) -> Result<(), PoolError>
    where
        H: PoolHooks<T> + ?Sized,
    {
        self.clear(hooks)?;
        self.disposed = true;
        Ok(())
    }

    /// Number of inactive items (slots plus overflow).
    pub fn inactive_count(&self) -> usize {
        self.slot_count + self.overflow.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Length of the fixed slot array.
    pub fn slot_capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn overflow_len(&self) -> usize {
        self.overflow.len()
    }

    pub fn is_active(&self, item: &T) -> bool {
        self.active.contains(item)
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Longest-held active item.
    pub fn oldest_active(&self) -> Option<T> {
        self.active.oldest()
    }

    /// Active item at position `index`, counting from the oldest.
    pub fn active_at(&self, index: usize) -> Option<T> {
        self.active.nth(index)
    }

    /// Active items, oldest first.
    pub fn active_snapshot(&self) -> Vec<T> {
        self.active.snapshot()
    }

    fn ensure_live(&self) -> Result<(), PoolError> {
        if self.disposed {
            Err(PoolError::Disposed)
        } else {
            Ok(())
        }
    }

    fn take_from_slots(&mut self) -> Option<T> {
        let len = self.slots.len();
        if self.slot_count == 0 || len == 0 {
            return None;
        }
        for _ in 0..len {
            let index = self.cursor;
            self.cursor = (self.cursor + 1) % len;
            if let Some(item) = self.slots[index].take() {
                self.slot_count -= 1;
                return Some(item);
            }
        }
        None
    }

    fn store(&mut self, item: T) {
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(item);
                self.slot_count += 1;
            },
            None => self.overflow.push(item),
        }
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        self.active.debug_validate_invariants();
        let occupied = self.slots.iter().filter(|slot| slot.is_some()).count();
        assert_eq!(occupied, self.slot_count);
        for item in self.slots.iter().flatten().chain(self.overflow.iter()) {
            assert!(!self.active.contains(item), "item is both stored and active");
        }
    }
}
