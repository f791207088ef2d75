//! Demo world: zones on a grid, players walking across it.

use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;
use tracing::{debug, info};
use zone_core::prelude::*;
use zone_core::{ClientZoneId, ZoneTransport};

use crate::config::RunnerConfig;

/// Grid spacing between zone origins.
const CELL: f32 = 40.0;
/// Zone edge length.
const ZONE_SIZE: f32 = 24.0;
/// Zones per grid row.
const ROW_LEN: u32 = 8;
/// A zone is torn down after this many entries.
const CAPTURE_ENTRIES: u32 = 3;

/// Transport that logs what would be sent.
#[derive(Debug, Default)]
pub struct TracingTransport;

impl ZoneTransport for TracingTransport {
    fn show(&mut self, player: PlayerId, client_id: ClientZoneId, pos: &ZonePos, colour: Colour) {
        debug!(%player, client_id, ?pos, colour = colour.rgba(), "show zone");
    }

    fn hide(&mut self, player: PlayerId, client_id: ClientZoneId) {
        debug!(%player, client_id, "hide zone");
    }

    fn flash(&mut self, player: PlayerId, client_id: ClientZoneId, colour: Colour) {
        debug!(%player, client_id, colour = colour.rgba(), "flash zone");
    }

    fn stop_flash(&mut self, player: PlayerId, client_id: ClientZoneId) {
        debug!(%player, client_id, "stop flash");
    }
}

/// Running totals shared with the observers.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    pub enters: u32,
    pub leaves: u32,
    pub captured: u32,
    pub destroyed: u32,
}

/// A walking player.
#[derive(Debug, Clone, Copy)]
struct Walker {
    id: PlayerId,
    position: Vec3,
    speed: f32,
    connected: bool,
}

/// Zones, players and the observers tying them together.
pub struct Simulation {
    zones: GangZones,
    walkers: Vec<Walker>,
    stats: Arc<Mutex<Stats>>,
    width: f32,
}

impl Simulation {
    #[must_use]
    pub fn new(config: &RunnerConfig) -> Self {
        let mut zones = GangZones::with_transport(TracingTransport);
        let stats = Arc::new(Mutex::new(Stats::default()));
        register_observers(&mut zones, &stats);

        let walkers: Vec<_> = (0..config.players)
            .map(|i| Walker {
                id: PlayerId(i),
                position: Vec3::new(0.0, lane(i, config.zones), 0.0),
                speed: 1.5 + (i % 3) as f32,
                connected: true,
            })
            .collect();

        for walker in &walkers {
            zones.on_connect(walker.id);
        }

        for i in 0..config.zones {
            spawn_zone(&mut zones, i, walkers.iter().map(|w| w.id));
        }

        Self {
            zones,
            walkers,
            stats,
            width: (ROW_LEN as f32) * CELL,
        }
    }

    /// Advance every connected player one step and run the zone update.
    pub fn tick(&mut self, tick: u64) {
        for walker in &mut self.walkers {
            if !walker.connected {
                continue;
            }

            walker.position.x += walker.speed;
            if walker.position.x > self.width {
                walker.position.x = 0.0;
            }
            self.zones.on_update(walker.id, walker.position);
        }

        // Drop the last player halfway through the first lap, keeping at least one walking.
        if tick == 100 && self.walkers.len() > 1 {
            if let Some(walker) = self.walkers.last_mut().filter(|w| w.connected) {
                walker.connected = false;
                info!(player = %walker.id, "player disconnected");
                self.zones.on_disconnect(walker.id);
            }
        }
    }

    #[must_use]
    pub fn stats(&self) -> Stats {
        self.stats.lock().clone()
    }

    #[must_use]
    pub fn zones(&self) -> &GangZones {
        &self.zones
    }
}

/// Y coordinate of a player's lane, crossing the rows of zones.
fn lane(player: u32, zones: u32) -> f32 {
    let rows = zones.div_ceil(ROW_LEN).max(1);
    (player % rows) as f32 * CELL + ZONE_SIZE / 2.0
}

fn spawn_zone(zones: &mut GangZones, index: u32, players: impl Iterator<Item = PlayerId>) {
    let x = (index % ROW_LEN) as f32 * CELL;
    let y = (index / ROW_LEN) as f32 * CELL;
    let pos = ZonePos::new(Vec2::new(x, y), Vec2::new(x + ZONE_SIZE, y + ZONE_SIZE));

    let Some(handle) = zones.create(pos) else {
        return;
    };
    zones.use_zone_check(handle, true);
    for player in players {
        zones.show_for_player(handle, player, Colour::from_rgba(0x33, 0x99, 0xFF, 0x80));
    }
}

fn register_observers(zones: &mut GangZones, stats: &Arc<Mutex<Stats>>) {
    let entries: Arc<Mutex<HashMap<ZoneHandle, u32>>> = Arc::default();

    let stats_clone = stats.clone();
    zones
        .zone_events()
        .observe(move |zones: &mut GangZones, event: &ZoneEvent| match *event {
            ZoneEvent::Enter { player, zone } => {
                stats_clone.lock().enters += 1;
                info!(%player, %zone, "entered zone");
                zones.flash_for_player(zone, player, Colour::RED);

                let count = {
                    let mut entries = entries.lock();
                    let count = entries.entry(zone).or_default();
                    *count += 1;
                    *count
                };
                if count >= CAPTURE_ENTRIES {
                    info!(%zone, "zone captured");
                    stats_clone.lock().captured += 1;
                    entries.lock().remove(&zone);
                    zones.release(zone);
                }
            }
            ZoneEvent::Leave { player, zone } => {
                stats_clone.lock().leaves += 1;
                info!(%player, %zone, "left zone");
                zones.stop_flash_for_player(zone, player);
            }
            ZoneEvent::PlayerRemoved { .. } => {}
        });

    let stats_clone = stats.clone();
    zones
        .pool_events()
        .observe(move |_, event: &PoolEvent| {
            if let PoolEvent::Destroyed(zone) = *event {
                debug!(%zone, "zone slot freed");
                stats_clone.lock().destroyed += 1;
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(players: u32, zones: u32) -> RunnerConfig {
        RunnerConfig {
            target_fps: 1000.0,
            ticks: 0,
            players,
            zones,
        }
    }

    #[test]
    fn test_setup_shows_every_zone() {
        let sim = Simulation::new(&config(3, 10));
        assert_eq!(sim.zones().len(), 10);
        assert_eq!(sim.zones().checking_zones().count(), 10);

        for (_, zone) in sim.zones().iter() {
            assert_eq!(zone.shown_players().count(), 3);
        }
    }

    #[test]
    fn test_walk_enters_and_captures() {
        let mut sim = Simulation::new(&config(1, 8));

        // Three laps along row 0 enter each zone three times.
        for tick in 0..700 {
            sim.tick(tick);
        }

        // A lone player is never dropped.
        assert!(sim.walkers[0].connected);

        let stats = sim.stats();
        assert!(stats.enters >= 8 * CAPTURE_ENTRIES);
        assert_eq!(stats.captured, 8);
        assert_eq!(stats.destroyed, 8);
        assert!(sim.zones().is_empty());
    }

    #[test]
    fn test_disconnect_at_tick_100() {
        let mut sim = Simulation::new(&config(2, 8));
        for tick in 0..=100 {
            sim.tick(tick);
        }

        assert!(!sim.walkers[1].connected);
        assert!(sim.zones().player_data(PlayerId(1)).is_none());
        for (_, zone) in sim.zones().iter() {
            assert!(!zone.is_shown_for(PlayerId(1)));
        }
    }
}
