//! The room state machine: one lobby's roster and lifecycle flags.

use parlor_protocol::{
    GameMode, PlayerColor, PlayerId, PlayerInfo, RoomId, RoomSummary,
    ServerMessage,
};
use tokio::sync::mpsc;

/// Channel sender for delivering outbound messages to one connection.
pub type Outbox = mpsc::UnboundedSender<ServerMessage>;

/// One seat in a room: identity, display name, host flag, color.
///
/// Owned by exactly one [`Room`] at a time; created on join, dropped
/// on leave or disconnect.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub color: PlayerColor,
}

impl Player {
    pub fn new(
        id: PlayerId,
        name: String,
        is_host: bool,
        color: PlayerColor,
    ) -> Self {
        Self {
            id,
            name,
            is_host,
            color,
        }
    }

    /// The wire representation of this seat.
    pub fn info(&self) -> PlayerInfo {
        PlayerInfo {
            id: self.id,
            name: self.name.clone(),
            is_host: self.is_host,
            color: self.color,
        }
    }
}

/// A player together with the channel that reaches their connection.
///
/// Keeping the pair in one collection means the roster and the
/// connection list can never fall out of step.
struct Seat {
    player: Player,
    outbox: Outbox,
}

/// A lobby: ordered roster, capacity derived from game mode,
/// visibility flag, started flag.
///
/// Capacity is recomputed from the mode on demand, never stored.
/// `started` is monotonic — once true it never reverts, and no join
/// may succeed after it.
pub struct Room {
    id: RoomId,
    name: String,
    mode: GameMode,
    visible: bool,
    started: bool,
    seats: Vec<Seat>,
}

impl Room {
    pub(crate) fn new(
        id: RoomId,
        name: String,
        mode: GameMode,
        visible: bool,
    ) -> Self {
        Self {
            id,
            name,
            mode,
            visible,
            started: false,
            seats: Vec::new(),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn started(&self) -> bool {
        self.started
    }

    /// Marks the room as started. Irreversible.
    pub fn set_started(&mut self) {
        self.started = true;
    }

    pub fn max_players(&self) -> usize {
        self.mode.max_players()
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Appends a player and their connection channel as one unit.
    ///
    /// Fails (no mutation) when the room is full or already started.
    pub fn add_player(&mut self, player: Player, outbox: Outbox) -> bool {
        if self.seats.len() >= self.max_players() || self.started {
            return false;
        }
        self.seats.push(Seat { player, outbox });
        true
    }

    /// Removes the seat of the given player, returning them.
    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        let pos = self.seats.iter().position(|s| s.player.id == id)?;
        Some(self.seats.remove(pos).player)
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.seats.iter().any(|s| s.player.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.seats
            .iter()
            .map(|s| &s.player)
            .find(|p| p.id == id)
    }

    /// The colors currently in use, in seat order.
    pub fn taken_colors(&self) -> Vec<PlayerColor> {
        self.seats.iter().map(|s| s.player.color).collect()
    }

    pub fn is_color_taken(&self, color: PlayerColor) -> bool {
        self.seats.iter().any(|s| s.player.color == color)
    }

    /// Recolors the given player's seat. Fails if they are not seated.
    pub fn set_color(&mut self, id: PlayerId, color: PlayerColor) -> bool {
        match self.seats.iter_mut().find(|s| s.player.id == id) {
            Some(seat) => {
                seat.player.color = color;
                true
            }
            None => false,
        }
    }

    pub fn host(&self) -> Option<&Player> {
        self.seats
            .iter()
            .map(|s| &s.player)
            .find(|p| p.is_host)
    }

    /// Promotes the first seat (list order) to host and returns its id.
    ///
    /// Idempotent when the first seat already hosts.
    pub fn promote_first_to_host(&mut self) -> Option<PlayerId> {
        let seat = self.seats.first_mut()?;
        seat.player.is_host = true;
        Some(seat.player.id)
    }

    /// The serialization contract exposed to the wire layer.
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id,
            name: self.name.clone(),
            mode: self.mode,
            max_players: self.max_players(),
            player_count: self.seats.len(),
        }
    }

    /// The full ordered roster as wire representations.
    pub fn roster(&self) -> Vec<PlayerInfo> {
        self.seats.iter().map(|s| s.player.info()).collect()
    }

    /// Sends to a single seated player. Silently drops if the
    /// receiver is gone (connection already closed).
    pub fn send_to(&self, id: PlayerId, msg: &ServerMessage) {
        if let Some(seat) = self.seats.iter().find(|s| s.player.id == id) {
            let _ = seat.outbox.send(msg.clone());
        }
    }

    /// Sends to every connection currently seated in the room.
    pub fn broadcast(&self, msg: &ServerMessage) {
        for seat in &self.seats {
            let _ = seat.outbox.send(msg.clone());
        }
    }

    /// Sends to every seated connection except one.
    pub fn broadcast_except(&self, excluded: PlayerId, msg: &ServerMessage) {
        for seat in &self.seats {
            if seat.player.id != excluded {
                let _ = seat.outbox.send(msg.clone());
            }
        }
    }

    /// A clone of the outbox reaching the given player, if seated.
    pub fn outbox_of(&self, id: PlayerId) -> Option<Outbox> {
        self.seats
            .iter()
            .find(|s| s.player.id == id)
            .map(|s| s.outbox.clone())
    }
}
