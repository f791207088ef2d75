//! Dual-track id table.
//!
//! Each slot carries two independent values: a *global* id (a server-wide
//! handle the slot stands in for) and a *private* id (a second numbering that
//! also needs a compact per-player slot). The slot index is what goes on the
//! wire for that player.
//!
//! The two tracks are written and cleared independently, but share slots:
//! a slot can be handed out again only once both tracks are empty.

use tracing::trace;

/// Raw id stored in either track.
pub type RawId = u32;

/// Compact per-player slot index.
pub type SlotIndex = usize;

/// Which half of a slot an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Server-global handles.
    Global,
    /// Per-player private numbering.
    Private,
}

/// One slot of the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct IdPair {
    private: Option<RawId>,
    global: Option<RawId>,
}

impl IdPair {
    const fn is_free(self) -> bool {
        self.private.is_none() && self.global.is_none()
    }

    const fn get(self, track: Track) -> Option<RawId> {
        match track {
            Track::Global => self.global,
            Track::Private => self.private,
        }
    }

    fn field_mut(&mut self, track: Track) -> &mut Option<RawId> {
        match track {
            Track::Global => &mut self.global,
            Track::Private => &mut self.private,
        }
    }
}

/// Fixed-capacity translation table for one player.
///
/// All operations are linear in `N`; tables are small and touched on
/// visibility changes, not every tick.
#[derive(Clone)]
pub struct IdTable<const N: usize> {
    slots: Box<[IdPair]>,
}

impl<const N: usize> Default for IdTable<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> IdTable<N> {
    /// Create a table with every slot empty.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: vec![IdPair::default(); N].into_boxed_slice(),
        }
    }

    fn first_free(&self) -> Option<SlotIndex> {
        self.slots.iter().position(|pair| pair.is_free())
    }

    /// Store `id` on `track` in the first fully empty slot.
    ///
    /// Returns `None` when no slot is empty on both tracks.
    pub fn reserve(&mut self, track: Track, id: RawId) -> Option<SlotIndex> {
        let slot = self.first_free()?;
        *self.slots[slot].field_mut(track) = Some(id);
        trace!(?track, id, slot, "reserved id");
        Some(slot)
    }

    /// Find the slot holding `id` on `track`.
    #[must_use]
    pub fn lookup(&self, track: Track, id: RawId) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(|pair| pair.get(track) == Some(id))
    }

    /// Clear `id` from `track`, leaving the other track untouched.
    ///
    /// Returns the slot it occupied.
    pub fn release(&mut self, track: Track, id: RawId) -> Option<SlotIndex> {
        let slot = self.lookup(track, id)?;
        *self.slots[slot].field_mut(track) = None;
        trace!(?track, id, slot, "released id");
        Some(slot)
    }

    /// Read the id stored on `track` at `slot`.
    #[must_use]
    pub fn get(&self, track: Track, slot: SlotIndex) -> Option<RawId> {
        self.slots.get(slot).and_then(|pair| pair.get(track))
    }

    pub fn reserve_global(&mut self, id: RawId) -> Option<SlotIndex> {
        self.reserve(Track::Global, id)
    }

    pub fn reserve_local(&mut self, id: RawId) -> Option<SlotIndex> {
        self.reserve(Track::Private, id)
    }

    #[must_use]
    pub fn lookup_global(&self, id: RawId) -> Option<SlotIndex> {
        self.lookup(Track::Global, id)
    }

    #[must_use]
    pub fn lookup_local(&self, id: RawId) -> Option<SlotIndex> {
        self.lookup(Track::Private, id)
    }

    pub fn release_global(&mut self, id: RawId) -> Option<SlotIndex> {
        self.release(Track::Global, id)
    }

    pub fn release_local(&mut self, id: RawId) -> Option<SlotIndex> {
        self.release(Track::Private, id)
    }

    /// Decode a compact slot index back to the global id it stands for.
    #[must_use]
    pub fn global_at(&self, slot: SlotIndex) -> Option<RawId> {
        self.get(Track::Global, slot)
    }

    /// Decode a compact slot index back to the private id it stands for.
    #[must_use]
    pub fn local_at(&self, slot: SlotIndex) -> Option<RawId> {
        self.get(Track::Private, slot)
    }

    /// Check whether `slot` can be handed out by the next reservation.
    #[must_use]
    pub fn is_slot_free(&self, slot: SlotIndex) -> bool {
        self.slots.get(slot).is_some_and(|pair| pair.is_free())
    }

    /// Number of slots with at least one track set.
    #[must_use]
    pub fn len_used(&self) -> usize {
        self.slots.iter().filter(|pair| !pair.is_free()).count()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Clear both tracks of every slot.
    pub fn reset(&mut self) {
        self.slots.fill(IdPair::default());
    }
}

impl<const N: usize> core::fmt::Debug for IdTable<N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IdTable")
            .field("capacity", &N)
            .field("used", &self.len_used())
            .finish()
    }
}
