//! A single gang zone.

use hashbrown::{HashMap, HashSet};

use crate::geometry::{Colour, ZonePos};
use crate::player::PlayerId;

/// Pool-resident zone.
///
/// Visibility, flashing and inside state are all per player. The zone itself
/// never talks to clients; [`GangZones`](crate::GangZones) does that and keeps
/// the player's id table in step.
#[derive(Debug, Clone, Default)]
pub struct Zone {
    pos: ZonePos,
    /// Players the zone is shown to, with their fill colour.
    shown_for: HashMap<PlayerId, Colour>,
    /// Players the zone is flashing for, with the flash colour.
    flashing_for: HashMap<PlayerId, Colour>,
    /// Players last seen inside the rectangle.
    inside: HashSet<PlayerId>,
    /// Update walk that was running, or last ran, when the zone was created.
    pub(crate) created_walk: u64,
}

impl Zone {
    #[must_use]
    pub fn new(pos: ZonePos) -> Self {
        Self {
            pos,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn position(&self) -> &ZonePos {
        &self.pos
    }

    pub(crate) fn set_position(&mut self, pos: ZonePos) {
        self.pos = pos;
    }

    #[must_use]
    pub fn is_shown_for(&self, player: PlayerId) -> bool {
        self.shown_for.contains_key(&player)
    }

    /// Fill colour used for `player`, if shown.
    #[must_use]
    pub fn colour_for(&self, player: PlayerId) -> Option<Colour> {
        self.shown_for.get(&player).copied()
    }

    #[must_use]
    pub fn is_flashing_for(&self, player: PlayerId) -> bool {
        self.flashing_for.contains_key(&player)
    }

    /// Flash colour used for `player`, if flashing.
    #[must_use]
    pub fn flash_colour_for(&self, player: PlayerId) -> Option<Colour> {
        self.flashing_for.get(&player).copied()
    }

    #[must_use]
    pub fn is_player_inside(&self, player: PlayerId) -> bool {
        self.inside.contains(&player)
    }

    /// Players the zone is currently shown to.
    pub fn shown_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.shown_for.keys().copied()
    }

    /// Players currently recorded as inside.
    pub fn players_inside(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.inside.iter().copied()
    }

    pub(crate) fn set_shown(&mut self, player: PlayerId, colour: Colour) {
        self.shown_for.insert(player, colour);
    }

    /// Hide for one player. Inside state is kept.
    pub(crate) fn set_hidden(&mut self, player: PlayerId) -> bool {
        self.flashing_for.remove(&player);
        self.shown_for.remove(&player).is_some()
    }

    pub(crate) fn set_flashing(&mut self, player: PlayerId, colour: Option<Colour>) {
        match colour {
            Some(colour) => {
                self.flashing_for.insert(player, colour);
            }
            None => {
                self.flashing_for.remove(&player);
            }
        }
    }

    pub(crate) fn set_player_inside(&mut self, player: PlayerId, inside: bool) {
        if inside {
            self.inside.insert(player);
        } else {
            self.inside.remove(&player);
        }
    }

    /// Forget everything recorded for `player`.
    pub(crate) fn remove_for(&mut self, player: PlayerId) {
        self.shown_for.remove(&player);
        self.flashing_for.remove(&player);
        self.inside.remove(&player);
    }

    /// Forget every player. Returns the players the zone was shown to.
    pub(crate) fn clear_players(&mut self) -> Vec<PlayerId> {
        self.flashing_for.clear();
        self.inside.clear();
        self.shown_for.drain().map(|(player, _)| player).collect()
    }
}
