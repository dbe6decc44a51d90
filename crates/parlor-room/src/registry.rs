//! The room registry: all live rooms, keyed by generated room id.

use std::collections::HashMap;

use parlor_protocol::{GameMode, RoomId, RoomSummary};

use crate::Room;

/// Collection of every room currently alive.
///
/// Ids are the smallest non-negative value not in use, so deleted ids
/// get reused. The registry never sweeps: deletion is driven by the
/// leave/disconnect path the instant a roster empties, so every key
/// present maps to a non-empty room.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs and inserts a room under the smallest free id.
    ///
    /// Linear scan from zero; the id space is dense by construction,
    /// so the scan terminates within `rooms.len() + 1` probes.
    pub fn create(
        &mut self,
        name: String,
        mode: GameMode,
        visible: bool,
    ) -> &mut Room {
        let mut id = RoomId(0);
        while self.rooms.contains_key(&id) {
            id = RoomId(id.0 + 1);
        }
        let room = Room::new(id, name, mode, visible);
        self.rooms.entry(id).or_insert(room)
    }

    pub fn get(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn get_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn remove(&mut self, id: RoomId) -> Option<Room> {
        self.rooms.remove(&id)
    }

    /// The answer set for lobby discovery: visible rooms that have not
    /// started. Order unspecified.
    pub fn open_rooms(&self) -> Vec<RoomSummary> {
        self.rooms
            .values()
            .filter(|r| r.visible() && !r.started())
            .map(|r| r.summary())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
