//! Events dispatched by [`GangZones`](crate::GangZones).

use zone_pool::ZoneHandle;

use crate::player::PlayerId;

/// Player/zone notifications.
///
/// The zone is locked in the pool while these are dispatched, so an observer
/// may release it; the slot is freed once every observer has returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneEvent {
    /// The player moved into a checked zone shown to them.
    Enter { player: PlayerId, zone: ZoneHandle },
    /// The player moved out of a checked zone shown to them.
    Leave { player: PlayerId, zone: ZoneHandle },
    /// The player disconnected; fired once per live zone after its state for
    /// that player has been purged.
    PlayerRemoved { player: PlayerId, zone: ZoneHandle },
}

impl ZoneEvent {
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match *self {
            Self::Enter { player, .. }
            | Self::Leave { player, .. }
            | Self::PlayerRemoved { player, .. } => player,
        }
    }

    #[must_use]
    pub const fn zone(&self) -> ZoneHandle {
        match *self {
            Self::Enter { zone, .. } | Self::Leave { zone, .. } | Self::PlayerRemoved { zone, .. } => {
                zone
            }
        }
    }
}

/// Pool occupancy notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolEvent {
    /// A zone was created. It is locked during dispatch.
    Created(ZoneHandle),
    /// A zone's slot was freed. The handle is already invalid.
    Destroyed(ZoneHandle),
}

impl PoolEvent {
    #[must_use]
    pub const fn handle(&self) -> ZoneHandle {
        match *self {
            Self::Created(handle) | Self::Destroyed(handle) => handle,
        }
    }
}
