//! The gang zone component.
//!
//! Owns the zone pool, the set of zones checked every tick, one id table
//! per connected player and the event dispatchers. Everything runs on the
//! caller's stack; observers get `&mut GangZones` and may create, hide or
//! release zones (including the one they are being told about) while the
//! component is in the middle of a walk.

use hashbrown::HashMap;
use tracing::{debug, trace, warn};
use zone_event::EventDispatcher;
use zone_ids::RawId;
use zone_pool::{ActiveSet, Pool, Release, ZoneHandle};

use crate::ZONE_POOL_SIZE;
use crate::events::{PoolEvent, ZoneEvent};
use crate::geometry::{Colour, Vec3, ZonePos};
use crate::player::{ClientZoneId, PlayerId, PlayerZoneData};
use crate::transport::{NullTransport, ZoneTransport};
use crate::zone::Zone;

/// Gang zone storage, visibility and enter/leave tracking.
pub struct GangZones {
    storage: Pool<Zone, ZONE_POOL_SIZE>,
    /// Zones evaluated by `on_update`.
    checking: ActiveSet,
    players: HashMap<PlayerId, PlayerZoneData>,
    transport: Box<dyn ZoneTransport>,
    zone_events: EventDispatcher<GangZones, ZoneEvent>,
    pool_events: EventDispatcher<GangZones, PoolEvent>,
    /// Bumped at the start of every `on_update`.
    walk: u64,
}

impl Default for GangZones {
    fn default() -> Self {
        Self::new()
    }
}

impl GangZones {
    /// Component name used in logs.
    pub const NAME: &'static str = "GangZones";

    /// Create an empty component that sends nothing to clients.
    #[must_use]
    pub fn new() -> Self {
        Self::with_transport(NullTransport)
    }

    /// Create an empty component that sends zone packets through `transport`.
    #[must_use]
    pub fn with_transport(transport: impl ZoneTransport + 'static) -> Self {
        Self {
            storage: Pool::new(),
            checking: ActiveSet::new(),
            players: HashMap::new(),
            transport: Box::new(transport),
            zone_events: EventDispatcher::new(),
            pool_events: EventDispatcher::new(),
            walk: 0,
        }
    }

    /// Replace the transport.
    pub fn set_transport(&mut self, transport: impl ZoneTransport + 'static) {
        self.transport = Box::new(transport);
    }

    // ==================== Events ====================

    /// Enter/leave/player-removed observers.
    pub fn zone_events(&mut self) -> &mut EventDispatcher<GangZones, ZoneEvent> {
        &mut self.zone_events
    }

    /// Pool created/destroyed observers.
    pub fn pool_events(&mut self) -> &mut EventDispatcher<GangZones, PoolEvent> {
        &mut self.pool_events
    }

    /// Dispatch a zone event with the zone locked for the duration.
    fn dispatch_zone_event(&mut self, handle: ZoneHandle, event: ZoneEvent) {
        self.storage.lock(handle);
        let observers = self.zone_events.snapshot();
        observers.dispatch(self, &event);
        self.unlock(handle);
    }

    fn dispatch_pool_event(&mut self, event: PoolEvent) {
        let observers = self.pool_events.snapshot();
        observers.dispatch(self, &event);
    }

    // ==================== Pool ====================

    /// Create a zone covering `pos`.
    ///
    /// Returns `None` when the pool is full.
    pub fn create(&mut self, pos: ZonePos) -> Option<ZoneHandle> {
        let mut zone = Zone::new(pos);
        zone.created_walk = self.walk;

        let Some(handle) = self.storage.create(zone) else {
            warn!(capacity = ZONE_POOL_SIZE, "gang zone pool exhausted");
            return None;
        };
        debug!(%handle, ?pos, "gang zone created");

        self.storage.lock(handle);
        self.dispatch_pool_event(PoolEvent::Created(handle));
        self.unlock(handle);

        Some(handle)
    }

    #[must_use]
    pub fn get(&self, handle: ZoneHandle) -> Option<&Zone> {
        self.storage.get(handle)
    }

    #[must_use]
    pub fn get_mut(&mut self, handle: ZoneHandle) -> Option<&mut Zone> {
        self.storage.get_mut(handle)
    }

    /// Check whether `handle` refers to a live zone (including one awaiting
    /// its last unlock).
    #[must_use]
    pub fn contains(&self, handle: ZoneHandle) -> bool {
        self.storage.contains(handle)
    }

    fn is_usable(&self, handle: ZoneHandle) -> bool {
        self.storage.contains(handle) && !self.storage.is_pending_release(handle)
    }

    /// Destroy a zone.
    ///
    /// The zone stops being checked and is hidden from every player right
    /// away. If it is locked (an observer for it is running), the slot itself
    /// is freed at the last [`unlock`](Self::unlock).
    pub fn release(&mut self, handle: ZoneHandle) {
        if !self.is_usable(handle) {
            return;
        }

        self.checking.disable(handle);
        self.destream(handle);

        match self.storage.release(handle) {
            Release::Freed(_) => {
                debug!(%handle, "gang zone released");
                self.dispatch_pool_event(PoolEvent::Destroyed(handle));
            }
            Release::Deferred => {
                debug!(%handle, locks = self.storage.lock_count(handle), "gang zone release deferred");
            }
            Release::Missing | Release::AlreadyPending => {}
        }
    }

    /// Hide a zone from everyone and drop all per-player state.
    fn destream(&mut self, handle: ZoneHandle) {
        let Some(zone) = self.storage.get_mut(handle) else {
            return;
        };

        for player in zone.clear_players() {
            let Some(data) = self.players.get_mut(&player) else {
                continue;
            };
            if let Some(client_id) = data.release_zone(handle) {
                self.transport.hide(player, client_id);
            }
        }
    }

    /// Keep a zone alive across a callback that may release it.
    pub fn lock(&mut self, handle: ZoneHandle) {
        self.storage.lock(handle);
    }

    /// Drop a lock taken with [`lock`](Self::lock).
    ///
    /// Returns `true` when this completed a deferred release.
    pub fn unlock(&mut self, handle: ZoneHandle) -> bool {
        if !self.storage.unlock(handle) {
            return false;
        }

        debug!(%handle, "gang zone released");
        self.dispatch_pool_event(PoolEvent::Destroyed(handle));
        true
    }

    /// Valid handle range, `[lower, upper)`.
    #[must_use]
    pub const fn bounds(&self) -> (usize, usize) {
        self.storage.bounds()
    }

    /// Snapshot of live zone handles.
    #[must_use]
    pub fn handles(&self) -> Vec<ZoneHandle> {
        self.storage.handles()
    }

    /// Iterate over live zones.
    pub fn iter(&self) -> impl Iterator<Item = (ZoneHandle, &Zone)> {
        self.storage.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.storage.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Drop every zone and every player's zone ids without notifying anyone.
    ///
    /// Must not be called from an observer.
    pub fn reset(&mut self) {
        self.storage.clear();
        self.checking.clear();
        for data in self.players.values_mut() {
            data.reset();
        }
        debug!(component = Self::NAME, "state reset");
    }

    // ==================== Checking ====================

    /// Opt a zone in or out of per-tick enter/leave checks.
    pub fn use_zone_check(&mut self, handle: ZoneHandle, enable: bool) {
        if enable {
            if self.is_usable(handle) {
                self.checking.enable(handle);
            }
        } else {
            self.checking.disable(handle);
        }
    }

    #[must_use]
    pub fn is_zone_checked(&self, handle: ZoneHandle) -> bool {
        self.checking.contains(handle)
    }

    /// Zones currently checked every tick.
    pub fn checking_zones(&self) -> impl Iterator<Item = ZoneHandle> + '_ {
        self.checking.iter()
    }

    // ==================== Players ====================

    /// Attach fresh zone data to a connecting player.
    pub fn on_connect(&mut self, player: PlayerId) {
        self.players.insert(player, PlayerZoneData::new());
        debug!(%player, "player zone data attached");
    }

    /// Purge a disconnecting player from every zone.
    ///
    /// Fires [`ZoneEvent::PlayerRemoved`] once per live zone, then drops the
    /// player's id table.
    pub fn on_disconnect(&mut self, player: PlayerId) {
        for handle in self.storage.handles() {
            let Some(zone) = self.storage.get_mut(handle) else {
                continue;
            };
            zone.remove_for(player);
            self.dispatch_zone_event(handle, ZoneEvent::PlayerRemoved { player, zone: handle });
        }

        self.players.remove(&player);
        debug!(%player, "player zone data dropped");
    }

    #[must_use]
    pub fn player_data(&self, player: PlayerId) -> Option<&PlayerZoneData> {
        self.players.get(&player)
    }

    #[must_use]
    pub fn player_data_mut(&mut self, player: PlayerId) -> Option<&mut PlayerZoneData> {
        self.players.get_mut(&player)
    }

    /// Per-tick update for one player.
    ///
    /// Walks the checked zones shown to the player and fires enter/leave on
    /// transitions. Zones hidden from the player keep their recorded state.
    /// Always returns `true`.
    pub fn on_update(&mut self, player: PlayerId, position: Vec3) -> bool {
        let point = position.xy();
        self.walk += 1;
        let walk = self.walk;

        for handle in self.checking.snapshot() {
            // An earlier observer in this walk may have released or unchecked it.
            if !self.checking.contains(handle) {
                continue;
            }
            let Some(zone) = self.storage.get_mut(handle) else {
                continue;
            };
            // Slot recycled by an observer during this walk (or a nested one).
            if zone.created_walk >= walk {
                continue;
            }
            if !zone.is_shown_for(player) {
                continue;
            }

            let in_area = zone.position().contains(point);
            let event = match (in_area, zone.is_player_inside(player)) {
                (true, false) => ZoneEvent::Enter { player, zone: handle },
                (false, true) => ZoneEvent::Leave { player, zone: handle },
                _ => continue,
            };

            zone.set_player_inside(player, in_area);
            trace!(%player, %handle, ?event, "zone transition");
            self.dispatch_zone_event(handle, event);
        }

        true
    }

    // ==================== Visibility ====================

    /// Show a zone to a player in `colour`, or recolour it if already shown.
    ///
    /// Returns `false` if the zone or player is unknown, or the player has no
    /// free client id left.
    pub fn show_for_player(&mut self, handle: ZoneHandle, player: PlayerId, colour: Colour) -> bool {
        if !self.is_usable(handle) {
            return false;
        }
        let Some(data) = self.players.get_mut(&player) else {
            return false;
        };

        let client_id = match data.client_id(handle) {
            Some(client_id) => client_id,
            None => {
                let Some(client_id) = data.reserve_zone(handle) else {
                    warn!(%player, %handle, "no free client zone id");
                    return false;
                };
                client_id
            }
        };

        let Some(zone) = self.storage.get_mut(handle) else {
            return false;
        };
        zone.set_shown(player, colour);
        self.transport.show(player, client_id, zone.position(), colour);
        true
    }

    /// Hide a zone from a player. The player's inside state is kept.
    pub fn hide_for_player(&mut self, handle: ZoneHandle, player: PlayerId) -> bool {
        let Some(zone) = self.storage.get_mut(handle) else {
            return false;
        };
        if !zone.set_hidden(player) {
            return false;
        }

        if let Some(client_id) = self
            .players
            .get_mut(&player)
            .and_then(|data| data.release_zone(handle))
        {
            self.transport.hide(player, client_id);
        }
        true
    }

    /// Start flashing a zone already shown to a player.
    pub fn flash_for_player(&mut self, handle: ZoneHandle, player: PlayerId, colour: Colour) -> bool {
        let Some(client_id) = self.client_id(player, handle) else {
            return false;
        };
        let Some(zone) = self.storage.get_mut(handle) else {
            return false;
        };

        zone.set_flashing(player, Some(colour));
        self.transport.flash(player, client_id, colour);
        true
    }

    /// Stop flashing a zone for a player.
    pub fn stop_flash_for_player(&mut self, handle: ZoneHandle, player: PlayerId) -> bool {
        let Some(client_id) = self.client_id(player, handle) else {
            return false;
        };
        let Some(zone) = self.storage.get_mut(handle) else {
            return false;
        };
        if !zone.is_flashing_for(player) {
            return false;
        }

        zone.set_flashing(player, None);
        self.transport.stop_flash(player, client_id);
        true
    }

    /// Move a zone and redraw it for everyone it is shown to.
    ///
    /// Inside state is re-evaluated on the next update.
    pub fn set_position(&mut self, handle: ZoneHandle, pos: ZonePos) -> bool {
        let Some(zone) = self.storage.get_mut(handle) else {
            return false;
        };
        zone.set_position(pos);

        let shown: Vec<_> = zone
            .shown_players()
            .filter_map(|player| zone.colour_for(player).map(|colour| (player, colour)))
            .collect();

        for (player, colour) in shown {
            let Some(client_id) = self.players.get(&player).and_then(|data| data.client_id(handle))
            else {
                continue;
            };
            self.transport.hide(player, client_id);
            self.transport.show(player, client_id, &pos, colour);
        }
        true
    }

    // ==================== Client ids ====================

    /// Client id a zone is shown under for `player`.
    #[must_use]
    pub fn client_id(&self, player: PlayerId, handle: ZoneHandle) -> Option<ClientZoneId> {
        self.players.get(&player)?.client_id(handle)
    }

    /// Reserve a client id for a zone numbered privately by a collaborator.
    ///
    /// Shares the player's client id space with shown zones. Reserving an id
    /// already held returns its existing client id.
    pub fn reserve_private_id(&mut self, player: PlayerId, id: RawId) -> Option<ClientZoneId> {
        let data = self.players.get_mut(&player)?;
        if let Some(client_id) = data.lookup_private(id) {
            return Some(client_id);
        }

        let client_id = data.reserve_private(id);
        if client_id.is_none() {
            warn!(%player, id, "no free client zone id for private zone");
        }
        client_id
    }

    /// Release a private zone number, returning the client id it held.
    pub fn release_private_id(&mut self, player: PlayerId, id: RawId) -> Option<ClientZoneId> {
        self.players.get_mut(&player)?.release_private(id)
    }

    /// Resolve a client id received from `player` to a live zone.
    #[must_use]
    pub fn client_zone(&self, player: PlayerId, client_id: ClientZoneId) -> Option<ZoneHandle> {
        let handle = self.players.get(&player)?.zone(client_id)?;
        self.is_usable(handle).then_some(handle)
    }
}

impl core::fmt::Debug for GangZones {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GangZones")
            .field("zones", &self.storage.len())
            .field("checking", &self.checking.len())
            .field("players", &self.players.len())
            .field("zone_observers", &self.zone_events.len())
            .field("pool_observers", &self.pool_events.len())
            .finish_non_exhaustive()
    }
}
