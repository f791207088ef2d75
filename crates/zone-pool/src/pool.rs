//! Fixed-capacity slot pool with deferred release.
//!
//! Every slot is in one of three states:
//!
//! ```text
//!   Free ──create──▶ Occupied ──release (locks == 0)──▶ Free
//!                       │
//!                       └──release (locks > 0)──▶ PendingRelease ──last unlock──▶ Free
//! ```
//!
//! Locks are a reentrancy guard, not a mutex. A caller locks an entry before
//! running callbacks that may ask for that same entry to be released; the
//! release is then parked until the matching `unlock`.

use tracing::trace;

use crate::handle::{SlotId, ZoneHandle};

/// A live slot.
struct Entry<T> {
    value: T,
    /// Outstanding `lock` calls.
    locks: u32,
    /// Released while locked; freed by the last `unlock`.
    pending_release: bool,
}

/// Outcome of [`Pool::release`].
#[derive(Debug, PartialEq, Eq)]
pub enum Release<T> {
    /// The handle did not refer to a live slot.
    Missing,
    /// The slot was already waiting for its last unlock.
    AlreadyPending,
    /// The slot is locked; it will be freed by the last `unlock`.
    Deferred,
    /// The slot was freed immediately.
    Freed(T),
}

impl<T> Release<T> {
    /// Whether the slot was freed by this call.
    #[must_use]
    pub const fn is_freed(&self) -> bool {
        matches!(self, Self::Freed(_))
    }
}

/// Pool of `N` fixed slots handing out [`ZoneHandle`]s.
///
/// Allocation always takes the lowest free slot, so handle assignment is
/// deterministic and does not depend on release order.
pub struct Pool<T, const N: usize> {
    slots: Box<[Option<Entry<T>>]>,
    /// Number of live slots (occupied or pending).
    len: usize,
}

impl<T, const N: usize> Default for Pool<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Pool<T, N> {
    /// Create an empty pool with all `N` slots free.
    #[must_use]
    pub fn new() -> Self {
        debug_assert!(N <= SlotId::MAX as usize, "pool capacity exceeds handle range");
        Self {
            slots: (0..N).map(|_| None).collect(),
            len: 0,
        }
    }

    /// Place `value` in the lowest free slot.
    ///
    /// Returns `None` when every slot is taken.
    pub fn create(&mut self, value: T) -> Option<ZoneHandle> {
        let index = self.slots.iter().position(Option::is_none)?;
        self.slots[index] = Some(Entry {
            value,
            locks: 0,
            pending_release: false,
        });
        self.len += 1;
        Some(ZoneHandle::new(index as SlotId))
    }

    fn entry(&self, handle: ZoneHandle) -> Option<&Entry<T>> {
        self.slots.get(handle.index())?.as_ref()
    }

    fn entry_mut(&mut self, handle: ZoneHandle) -> Option<&mut Entry<T>> {
        self.slots.get_mut(handle.index())?.as_mut()
    }

    /// Get the value behind a live handle.
    #[must_use]
    pub fn get(&self, handle: ZoneHandle) -> Option<&T> {
        self.entry(handle).map(|entry| &entry.value)
    }

    /// Get the value behind a live handle mutably.
    #[must_use]
    pub fn get_mut(&mut self, handle: ZoneHandle) -> Option<&mut T> {
        self.entry_mut(handle).map(|entry| &mut entry.value)
    }

    /// Check whether a handle refers to a live slot.
    #[must_use]
    pub fn contains(&self, handle: ZoneHandle) -> bool {
        self.entry(handle).is_some()
    }

    /// Release a handle.
    ///
    /// Frees the slot right away when it is not locked, otherwise marks it
    /// pending so the last [`unlock`](Self::unlock) frees it.
    pub fn release(&mut self, handle: ZoneHandle) -> Release<T> {
        let Some(entry) = self.entry_mut(handle) else {
            return Release::Missing;
        };

        if entry.pending_release {
            return Release::AlreadyPending;
        }

        if entry.locks > 0 {
            entry.pending_release = true;
            trace!(%handle, locks = entry.locks, "release deferred");
            return Release::Deferred;
        }

        match self.free(handle) {
            Some(value) => Release::Freed(value),
            None => Release::Missing,
        }
    }

    fn free(&mut self, handle: ZoneHandle) -> Option<T> {
        let entry = self.slots.get_mut(handle.index())?.take()?;
        self.len -= 1;
        Some(entry.value)
    }

    /// Protect a live slot from being freed until the matching `unlock`.
    pub fn lock(&mut self, handle: ZoneHandle) {
        if let Some(entry) = self.entry_mut(handle) {
            entry.locks += 1;
        }
    }

    /// Drop one lock.
    ///
    /// Returns `true` when this was the last lock on a slot released in the
    /// meantime, i.e. a deferred release just completed.
    pub fn unlock(&mut self, handle: ZoneHandle) -> bool {
        let Some(entry) = self.entry_mut(handle) else {
            return false;
        };

        entry.locks = entry.locks.saturating_sub(1);
        if entry.locks > 0 || !entry.pending_release {
            return false;
        }

        trace!(%handle, "deferred release completed");
        self.free(handle).is_some()
    }

    /// Number of outstanding locks on a slot (0 for dead handles).
    #[must_use]
    pub fn lock_count(&self, handle: ZoneHandle) -> u32 {
        self.entry(handle).map_or(0, |entry| entry.locks)
    }

    /// Check whether a slot has at least one outstanding lock.
    #[must_use]
    pub fn is_locked(&self, handle: ZoneHandle) -> bool {
        self.lock_count(handle) > 0
    }

    /// Check whether a slot was released while locked and awaits its last unlock.
    #[must_use]
    pub fn is_pending_release(&self, handle: ZoneHandle) -> bool {
        self.entry(handle).is_some_and(|entry| entry.pending_release)
    }

    /// Valid handle range, `[lower, upper)`.
    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        (0, N)
    }

    /// Snapshot of all live handles in slot order.
    ///
    /// The snapshot is detached from the pool, so it can be walked while
    /// entries are locked, unlocked or released.
    #[must_use]
    pub fn handles(&self) -> Vec<ZoneHandle> {
        self.iter().map(|(handle, _)| handle).collect()
    }

    /// Iterate over live entries in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|entry| (ZoneHandle::new(index as SlotId), &entry.value))
        })
    }

    /// Iterate mutably over live entries in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ZoneHandle, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            slot.as_mut()
                .map(|entry| (ZoneHandle::new(index as SlotId), &mut entry.value))
        })
    }

    /// Number of live slots.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if no slot is live.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Total number of slots.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Free every slot, locked or not.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.len = 0;
    }
}

impl<T, const N: usize> core::fmt::Debug for Pool<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &N)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
