//! Zone Core - gang zones for a tick-driven game server
//!
//! # Key Concepts
//!
//! - **Zone**: a rectangle on the map plane living in a fixed-size pool
//! - **Checked zone**: a zone opted into per-tick enter/leave evaluation
//! - **Client id**: the compact per-player number a zone is shown under
//!
//! # Tick Flow
//!
//! ```text
//! for each connected player:
//!     GangZones::on_update(player, position)
//!         for each checked zone shown to the player:
//!             inside rectangle?  ── changed ──▶ lock ▶ Enter/Leave observers ▶ unlock
//! ```
//!
//! # Example
//!
//! ```
//! use zone_core::{Colour, GangZones, PlayerId, Vec2, Vec3, ZoneEvent, ZonePos};
//!
//! let mut zones = GangZones::new();
//! zones.zone_events().observe(|zones: &mut GangZones, event: &ZoneEvent| {
//!     // Capture-the-zone: the first entry destroys it.
//!     if let ZoneEvent::Enter { zone, .. } = *event {
//!         zones.release(zone);
//!     }
//! });
//!
//! let player = PlayerId(0);
//! zones.on_connect(player);
//!
//! let zone = zones
//!     .create(ZonePos::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0)))
//!     .unwrap();
//! zones.use_zone_check(zone, true);
//! zones.show_for_player(zone, player, Colour::RED);
//!
//! zones.on_update(player, Vec3::new(5.0, 5.0, 0.0));
//! assert!(zones.get(zone).is_none());
//! ```

mod events;
mod geometry;
mod player;
mod transport;
mod zone;
mod zones;

pub use events::{PoolEvent, ZoneEvent};
pub use geometry::{Colour, Vec2, Vec3, ZonePos};
pub use player::{ClientZoneId, PlayerId, PlayerZoneData};
pub use transport::{NullTransport, PacketLog, ZonePacket, ZoneTransport};
pub use zone::Zone;
pub use zone_event::{EventDispatcher, ObserverId};
pub use zone_pool::ZoneHandle;
pub use zones::GangZones;

/// Number of zone slots, and of client zone ids per player.
pub const ZONE_POOL_SIZE: usize = 1024;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        Colour, GangZones, PlayerId, PoolEvent, Vec2, Vec3, ZoneEvent, ZoneHandle, ZonePos,
    };
}
