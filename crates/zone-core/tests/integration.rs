//! Integration tests for zone-core

use std::sync::Arc;

use parking_lot::Mutex;
use zone_core::prelude::*;
use zone_core::{PacketLog, ZONE_POOL_SIZE, ZonePacket};

// ============================================================================
// Helpers
// ============================================================================

type EventLog = Arc<Mutex<Vec<ZoneEvent>>>;

/// Component with one connected player and an event recorder.
fn setup() -> (GangZones, PlayerId, EventLog) {
    let mut zones = GangZones::new();
    let events: EventLog = Arc::default();
    let events_clone = events.clone();
    zones
        .zone_events()
        .observe(move |_, event| events_clone.lock().push(*event));

    let player = PlayerId(0);
    zones.on_connect(player);
    (zones, player, events)
}

fn square(min: f32, max: f32) -> ZonePos {
    ZonePos::new(Vec2::new(min, min), Vec2::new(max, max))
}

/// Create a checked zone shown to `player`.
fn checked_zone(zones: &mut GangZones, player: PlayerId, pos: ZonePos) -> ZoneHandle {
    let handle = zones.create(pos).unwrap();
    zones.use_zone_check(handle, true);
    assert!(zones.show_for_player(handle, player, Colour::RED));
    handle
}

fn at(x: f32, y: f32) -> Vec3 {
    Vec3::new(x, y, 10.0)
}

// ============================================================================
// Pool
// ============================================================================

#[test]
fn test_pool_capacity() {
    let mut zones = GangZones::new();

    let mut handles: Vec<_> = (0..ZONE_POOL_SIZE)
        .map(|_| zones.create(square(0.0, 1.0)).unwrap())
        .collect();
    assert_eq!(zones.len(), ZONE_POOL_SIZE);

    handles.sort();
    handles.dedup();
    assert_eq!(handles.len(), ZONE_POOL_SIZE);

    assert!(zones.create(square(0.0, 1.0)).is_none());
    assert_eq!(zones.bounds(), (0, ZONE_POOL_SIZE));

    zones.release(handles[10]);
    assert_eq!(zones.create(square(0.0, 1.0)), Some(handles[10]));
}

#[test]
fn test_invalid_handles_are_ignored() {
    let mut zones = GangZones::new();
    let stale = ZoneHandle::new(5);

    zones.release(stale);
    zones.lock(stale);
    assert!(!zones.unlock(stale));
    assert!(zones.get(stale).is_none());
    assert!(zones.get(ZoneHandle::new(ZONE_POOL_SIZE as u32 + 1)).is_none());
}

// ============================================================================
// Containment
// ============================================================================

#[test]
fn test_enter_move_leave() {
    let (mut zones, player, events) = setup();
    let zone = checked_zone(&mut zones, player, square(0.0, 10.0));

    zones.on_update(player, at(-5.0, -5.0));
    assert!(events.lock().is_empty());

    zones.on_update(player, at(5.0, 5.0));
    assert_eq!(*events.lock(), vec![ZoneEvent::Enter { player, zone }]);
    assert!(zones.get(zone).unwrap().is_player_inside(player));

    zones.on_update(player, at(7.0, 2.0));
    assert_eq!(events.lock().len(), 1);

    zones.on_update(player, at(11.0, 5.0));
    assert_eq!(
        *events.lock(),
        vec![
            ZoneEvent::Enter { player, zone },
            ZoneEvent::Leave { player, zone }
        ]
    );
    assert!(!zones.get(zone).unwrap().is_player_inside(player));
}

#[test]
fn test_boundary_counts_as_inside() {
    let (mut zones, player, events) = setup();
    let zone = checked_zone(&mut zones, player, square(0.0, 10.0));

    zones.on_update(player, at(10.0, 0.0));
    assert_eq!(*events.lock(), vec![ZoneEvent::Enter { player, zone }]);
}

#[test]
fn test_unchecked_zone_fires_nothing() {
    let (mut zones, player, events) = setup();
    let zone = checked_zone(&mut zones, player, square(0.0, 10.0));
    zones.use_zone_check(zone, false);

    zones.on_update(player, at(5.0, 5.0));
    assert!(events.lock().is_empty());
    assert!(!zones.get(zone).unwrap().is_player_inside(player));
}

#[test]
fn test_hidden_zone_freezes_state() {
    let (mut zones, player, events) = setup();
    let zone = checked_zone(&mut zones, player, square(0.0, 10.0));

    zones.on_update(player, at(5.0, 5.0));
    events.lock().clear();

    assert!(zones.hide_for_player(zone, player));
    zones.on_update(player, at(50.0, 50.0));
    assert!(events.lock().is_empty());
    assert!(zones.get(zone).unwrap().is_player_inside(player));

    // Shown again: evaluation resumes from the recorded Inside state.
    zones.show_for_player(zone, player, Colour::WHITE);
    zones.on_update(player, at(50.0, 50.0));
    assert_eq!(*events.lock(), vec![ZoneEvent::Leave { player, zone }]);
}

#[test]
fn test_players_tracked_independently() {
    let (mut zones, alice, events) = setup();
    let bob = PlayerId(1);
    zones.on_connect(bob);

    let zone = checked_zone(&mut zones, alice, square(0.0, 10.0));
    zones.show_for_player(zone, bob, Colour::WHITE);

    zones.on_update(alice, at(5.0, 5.0));
    zones.on_update(bob, at(20.0, 20.0));
    zones.on_update(bob, at(1.0, 1.0));

    assert_eq!(
        *events.lock(),
        vec![
            ZoneEvent::Enter { player: alice, zone },
            ZoneEvent::Enter { player: bob, zone }
        ]
    );
}

// ============================================================================
// Reentrancy
// ============================================================================

#[test]
fn test_observer_releases_zone_during_enter() {
    let (mut zones, player, events) = setup();
    let destroyed = Arc::new(Mutex::new(Vec::new()));
    let destroyed_clone = destroyed.clone();
    zones.pool_events().observe(move |_, event| {
        if let PoolEvent::Destroyed(handle) = *event {
            destroyed_clone.lock().push(handle);
        }
    });

    let seen_alive = Arc::new(Mutex::new(false));
    let seen_alive_clone = seen_alive.clone();
    zones.zone_events().observe(|zones: &mut GangZones, event: &ZoneEvent| {
        if let ZoneEvent::Enter { zone, .. } = *event {
            zones.release(zone);
        }
    });
    // Registered after the releasing observer: still sees a live zone.
    zones.zone_events().observe(move |zones: &mut GangZones, event: &ZoneEvent| {
        *seen_alive_clone.lock() = zones.get(event.zone()).is_some();
    });

    let zone = checked_zone(&mut zones, player, square(0.0, 10.0));
    zones.on_update(player, at(5.0, 5.0));

    assert!(*seen_alive.lock());
    assert_eq!(*destroyed.lock(), vec![zone]);
    assert!(zones.get(zone).is_none());
    assert!(!zones.is_zone_checked(zone));
    assert_eq!(events.lock().len(), 1);

    // Nothing left to leave.
    zones.on_update(player, at(50.0, 50.0));
    assert_eq!(events.lock().len(), 1);
    assert_eq!(destroyed.lock().len(), 1);
}

#[test]
fn test_observer_releases_later_zone_in_same_walk() {
    let (mut zones, player, events) = setup();
    let first = checked_zone(&mut zones, player, square(0.0, 10.0));
    let second = checked_zone(&mut zones, player, square(0.0, 10.0));

    zones.zone_events().observe(move |zones: &mut GangZones, event: &ZoneEvent| {
        if *event == (ZoneEvent::Enter { player: PlayerId(0), zone: first }) {
            zones.release(second);
        }
    });

    zones.on_update(player, at(5.0, 5.0));
    assert_eq!(*events.lock(), vec![ZoneEvent::Enter { player, zone: first }]);
    assert!(zones.get(second).is_none());
}

#[test]
fn test_recycled_slot_waits_for_next_update() {
    let (mut zones, player, events) = setup();
    let first = checked_zone(&mut zones, player, square(0.0, 10.0));
    let second = checked_zone(&mut zones, player, square(0.0, 10.0));

    let spawned = Arc::new(Mutex::new(None));
    let spawned_clone = spawned.clone();
    zones.zone_events().observe(move |zones: &mut GangZones, event: &ZoneEvent| {
        if let ZoneEvent::Enter { player, zone } = *event {
            if zone == first {
                zones.release(second);
                let handle = zones.create(square(0.0, 10.0)).unwrap();
                zones.use_zone_check(handle, true);
                zones.show_for_player(handle, player, Colour::WHITE);
                *spawned_clone.lock() = Some(handle);
            }
        }
    });

    zones.on_update(player, at(5.0, 5.0));
    let replacement = *spawned.lock();
    let replacement = replacement.unwrap();

    // Lowest free slot is the one just released.
    assert_eq!(replacement, second);
    assert_eq!(*events.lock(), vec![ZoneEvent::Enter { player, zone: first }]);

    zones.on_update(player, at(5.0, 5.0));
    assert_eq!(
        *events.lock(),
        vec![
            ZoneEvent::Enter { player, zone: first },
            ZoneEvent::Enter { player, zone: replacement }
        ]
    );
}

#[test]
fn test_private_id_reserved_once() {
    let mut zones = GangZones::new();
    let player = PlayerId(2);
    zones.on_connect(player);

    let client_id = zones.reserve_private_id(player, 42).unwrap();
    assert_eq!(zones.reserve_private_id(player, 42), Some(client_id));
    assert_eq!(zones.player_data(player).unwrap().ids_in_use(), 1);

    assert_eq!(zones.release_private_id(player, 42), Some(client_id));
    assert_eq!(zones.release_private_id(player, 42), None);
    assert_eq!(zones.player_data(player).unwrap().ids_in_use(), 0);
}

#[test]
fn test_observer_creates_zone_during_enter() {
    let (mut zones, player, _events) = setup();
    zones.zone_events().observe(|zones: &mut GangZones, event: &ZoneEvent| {
        if let ZoneEvent::Enter { player, .. } = *event {
            let spawned = zones.create(square(100.0, 110.0)).unwrap();
            zones.use_zone_check(spawned, true);
            zones.show_for_player(spawned, player, Colour::WHITE);
        }
    });

    checked_zone(&mut zones, player, square(0.0, 10.0));
    zones.on_update(player, at(5.0, 5.0));
    assert_eq!(zones.len(), 2);
    assert_eq!(zones.checking_zones().count(), 2);
}

// ============================================================================
// Players
// ============================================================================

#[test]
fn test_disconnect_purges_player() {
    let (mut zones, player, events) = setup();
    let a = checked_zone(&mut zones, player, square(0.0, 10.0));
    let b = zones.create(square(20.0, 30.0)).unwrap();

    zones.on_update(player, at(5.0, 5.0));
    events.lock().clear();

    zones.on_disconnect(player);

    assert_eq!(
        *events.lock(),
        vec![
            ZoneEvent::PlayerRemoved { player, zone: a },
            ZoneEvent::PlayerRemoved { player, zone: b }
        ]
    );
    assert!(!zones.get(a).unwrap().is_player_inside(player));
    assert!(!zones.get(a).unwrap().is_shown_for(player));
    assert!(zones.player_data(player).is_none());

    // Reconnecting starts from Outside with nothing shown.
    zones.on_connect(player);
    zones.on_update(player, at(5.0, 5.0));
    assert_eq!(events.lock().len(), 2);
}

#[test]
fn test_client_id_exhaustion() {
    let log = PacketLog::new();
    let mut zones = GangZones::with_transport(log.clone());
    let player = PlayerId(4);
    zones.on_connect(player);

    // Private numbering occupies one client id.
    let private = zones.reserve_private_id(player, 900).unwrap();
    assert_eq!(private, 0);

    let handles: Vec<_> = (0..ZONE_POOL_SIZE)
        .map(|_| zones.create(square(0.0, 1.0)).unwrap())
        .collect();
    let shown = handles
        .iter()
        .filter(|&&handle| zones.show_for_player(handle, player, Colour::RED))
        .count();

    assert_eq!(shown, ZONE_POOL_SIZE - 1);
    assert_eq!(zones.client_id(player, handles[0]), Some(1));
    assert!(!zones.get(handles[ZONE_POOL_SIZE - 1]).unwrap().is_shown_for(player));

    // Freeing the private id makes room again.
    assert_eq!(zones.release_private_id(player, 900), Some(0));
    assert!(zones.show_for_player(handles[ZONE_POOL_SIZE - 1], player, Colour::RED));
    assert_eq!(zones.client_id(player, handles[ZONE_POOL_SIZE - 1]), Some(0));
    assert!(matches!(
        log.drain().last(),
        Some(ZonePacket::Show { client_id: 0, .. })
    ));
}
