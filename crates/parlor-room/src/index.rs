//! The player-location index: which room each connection occupies.

use std::collections::HashMap;

use parlor_protocol::{PlayerId, RoomId};

/// Maps each player to the room they currently occupy.
///
/// A player appears here iff they hold a roster seat in exactly the
/// referenced room — this is the authority used to reject "already in
/// a room" joins and to route leave/disconnect cleanup. The index
/// holds ids only, never owning references; deletion stays with the
/// registry.
#[derive(Default)]
pub struct PlayerLocationIndex {
    locations: HashMap<PlayerId, RoomId>,
}

impl PlayerLocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a player now occupies a room.
    ///
    /// Fails without mutation if the player already has an entry.
    pub fn try_enter(&mut self, player: PlayerId, room: RoomId) -> bool {
        if self.locations.contains_key(&player) {
            return false;
        }
        self.locations.insert(player, room);
        true
    }

    /// Removes and returns the player's prior room, if any.
    pub fn leave(&mut self, player: PlayerId) -> Option<RoomId> {
        self.locations.remove(&player)
    }

    pub fn room_of(&self, player: PlayerId) -> Option<RoomId> {
        self.locations.get(&player).copied()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}
