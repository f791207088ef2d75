//! Per-player zone data.

use std::fmt;

use zone_ids::{IdTable, RawId, SlotIndex};
use zone_pool::ZoneHandle;

use crate::ZONE_POOL_SIZE;

/// Server-side player identifier, supplied by the player subsystem.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u32);

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player({})", self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Zone id as numbered for one client.
pub type ClientZoneId = SlotIndex;

/// Zone state attached to a connected player.
///
/// Holds the player's id table: the global track maps pool handles of zones
/// shown to the player, the private track is free for collaborators that
/// keep a per-player zone numbering of their own.
#[derive(Debug, Default)]
pub struct PlayerZoneData {
    ids: IdTable<ZONE_POOL_SIZE>,
}

impl PlayerZoneData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Client id the zone is shown under, if any.
    #[must_use]
    pub fn client_id(&self, zone: ZoneHandle) -> Option<ClientZoneId> {
        self.ids.lookup_global(zone.id())
    }

    /// Zone handle behind a client id, if any.
    #[must_use]
    pub fn zone(&self, client_id: ClientZoneId) -> Option<ZoneHandle> {
        self.ids.global_at(client_id).map(ZoneHandle::new)
    }

    pub(crate) fn reserve_zone(&mut self, zone: ZoneHandle) -> Option<ClientZoneId> {
        self.ids.reserve_global(zone.id())
    }

    pub(crate) fn release_zone(&mut self, zone: ZoneHandle) -> Option<ClientZoneId> {
        self.ids.release_global(zone.id())
    }

    /// Reserve a client id for a private zone number.
    pub fn reserve_private(&mut self, id: RawId) -> Option<ClientZoneId> {
        self.ids.reserve_local(id)
    }

    /// Release a private zone number, returning the client id it held.
    pub fn release_private(&mut self, id: RawId) -> Option<ClientZoneId> {
        self.ids.release_local(id)
    }

    #[must_use]
    pub fn lookup_private(&self, id: RawId) -> Option<ClientZoneId> {
        self.ids.lookup_local(id)
    }

    #[must_use]
    pub fn private_at(&self, client_id: ClientZoneId) -> Option<RawId> {
        self.ids.local_at(client_id)
    }

    /// Number of client ids in use on either track.
    #[must_use]
    pub fn ids_in_use(&self) -> usize {
        self.ids.len_used()
    }

    /// Forget every reserved id.
    pub fn reset(&mut self) {
        self.ids.reset();
    }
}
