//! Seam to the wire layer.
//!
//! [`GangZones`](crate::GangZones) decides *what* each client should see and
//! under which client id; a [`ZoneTransport`] turns that into packets.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::geometry::{Colour, ZonePos};
use crate::player::{ClientZoneId, PlayerId};

/// Outbound zone messages for one client.
pub trait ZoneTransport: Send + Sync {
    /// Create (or redraw) a zone on the client.
    fn show(&mut self, player: PlayerId, client_id: ClientZoneId, pos: &ZonePos, colour: Colour);

    /// Remove a zone from the client.
    fn hide(&mut self, player: PlayerId, client_id: ClientZoneId);

    /// Start flashing a zone.
    fn flash(&mut self, player: PlayerId, client_id: ClientZoneId, colour: Colour);

    /// Stop flashing a zone.
    fn stop_flash(&mut self, player: PlayerId, client_id: ClientZoneId);
}

/// Transport that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTransport;

impl ZoneTransport for NullTransport {
    fn show(&mut self, _: PlayerId, _: ClientZoneId, _: &ZonePos, _: Colour) {}

    fn hide(&mut self, _: PlayerId, _: ClientZoneId) {}

    fn flash(&mut self, _: PlayerId, _: ClientZoneId, _: Colour) {}

    fn stop_flash(&mut self, _: PlayerId, _: ClientZoneId) {}
}

/// A message as a transport would have encoded it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ZonePacket {
    Show {
        player: PlayerId,
        client_id: ClientZoneId,
        pos: ZonePos,
        colour: Colour,
    },
    Hide {
        player: PlayerId,
        client_id: ClientZoneId,
    },
    Flash {
        player: PlayerId,
        client_id: ClientZoneId,
        colour: Colour,
    },
    StopFlash {
        player: PlayerId,
        client_id: ClientZoneId,
    },
}

impl ZonePacket {
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        match *self {
            Self::Show { player, .. }
            | Self::Hide { player, .. }
            | Self::Flash { player, .. }
            | Self::StopFlash { player, .. } => player,
        }
    }
}

/// Transport that records packets into a shared log.
///
/// Clone the log handle before boxing the transport to read it back.
#[derive(Debug, Default, Clone)]
pub struct PacketLog {
    packets: Arc<Mutex<Vec<ZonePacket>>>,
}

impl PacketLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every packet recorded so far.
    #[must_use]
    pub fn drain(&self) -> Vec<ZonePacket> {
        core::mem::take(&mut *self.packets.lock())
    }

    /// Forget every packet recorded so far.
    pub fn clear(&self) {
        self.packets.lock().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.lock().is_empty()
    }

    fn push(&self, packet: ZonePacket) {
        self.packets.lock().push(packet);
    }
}

impl ZoneTransport for PacketLog {
    fn show(&mut self, player: PlayerId, client_id: ClientZoneId, pos: &ZonePos, colour: Colour) {
        self.push(ZonePacket::Show {
            player,
            client_id,
            pos: *pos,
            colour,
        });
    }

    fn hide(&mut self, player: PlayerId, client_id: ClientZoneId) {
        self.push(ZonePacket::Hide { player, client_id });
    }

    fn flash(&mut self, player: PlayerId, client_id: ClientZoneId, colour: Colour) {
        self.push(ZonePacket::Flash {
            player,
            client_id,
            colour,
        });
    }

    fn stop_flash(&mut self, player: PlayerId, client_id: ClientZoneId) {
        self.push(ZonePacket::StopFlash { player, client_id });
    }
}
