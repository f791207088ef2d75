//! Pool handles.
//!
//! A handle is the slot index of a pool entry. It stays valid from `create`
//! until the slot is freed, and is then recycled for the next `create` that
//! lands on the same slot.

use std::fmt;

/// Raw slot index.
pub type SlotId = u32;

/// Stable reference to a pool-resident object.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ZoneHandle(SlotId);

impl ZoneHandle {
    /// Create a handle from a raw slot index.
    #[must_use]
    pub const fn new(id: SlotId) -> Self {
        Self(id)
    }

    /// Get the raw slot index.
    #[must_use]
    pub const fn id(self) -> SlotId {
        self.0
    }

    /// Get the slot index as a `usize` for indexing.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<SlotId> for ZoneHandle {
    fn from(id: SlotId) -> Self {
        Self(id)
    }
}

impl fmt::Debug for ZoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ZoneHandle({})", self.0)
    }
}

impl fmt::Display for ZoneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
