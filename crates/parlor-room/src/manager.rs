//! The lobby manager: atomic create/join/leave/change-color operations.
//!
//! Composes the [`RoomRegistry`] and the [`PlayerLocationIndex`] so
//! that each request either satisfies every invariant — roster slot,
//! index entry, broadcasts — or mutates nothing at all. The server
//! holds one `LobbyManager` behind a mutex; every method here runs
//! inside that critical section, which is what makes the check-then-
//! commit sequences atomic from the protocol's point of view.

use parlor_protocol::{
    GameMode, PlayerColor, PlayerId, RoomId, RoomSummary, ServerMessage,
};

use crate::{LobbyError, Outbox, Player, PlayerLocationIndex, Room, RoomRegistry};

/// Picks the color a joiner actually gets.
///
/// If the request is free it stands; otherwise the lowest unused enum
/// value is assigned. Deterministic by construction. When every color
/// is in use (rooms seat more players than there are colors) the
/// request stands unchanged.
fn resolve_color(
    taken: &[PlayerColor],
    requested: PlayerColor,
) -> PlayerColor {
    if !taken.contains(&requested) {
        return requested;
    }
    PlayerColor::ALL
        .into_iter()
        .find(|c| !taken.contains(c))
        .unwrap_or(requested)
}

/// Falls back to "<host>'s Lobby" when the creator sent no name.
fn default_room_name(name: String, host_name: &str) -> String {
    if name.is_empty() {
        format!("{host_name}'s Lobby")
    } else {
        name
    }
}

/// Manages all live rooms and tracks which player is in which room.
///
/// This is the entry point for lobby operations from the connection
/// handlers. Success notifications and broadcasts are sent from inside
/// the operation, before the lock is released, so observers can never
/// see a half-applied mutation.
#[derive(Default)]
pub struct LobbyManager {
    registry: RoomRegistry,
    index: PlayerLocationIndex,
}

impl LobbyManager {
    /// Creates a new, empty lobby manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a room and seats the creator as its host.
    ///
    /// The new room gets the smallest free id. The creator receives
    /// `CreateSuccess` with the room summary and their assigned seat.
    ///
    /// # Errors
    /// [`LobbyError::AlreadyInRoom`] if the creator already occupies a
    /// room — a player is in at most one room at a time.
    pub fn create_room(
        &mut self,
        player_id: PlayerId,
        display_name: &str,
        name: String,
        mode: GameMode,
        visible: bool,
        color: PlayerColor,
        outbox: Outbox,
    ) -> Result<RoomId, LobbyError> {
        if let Some(existing) = self.index.room_of(player_id) {
            return Err(LobbyError::AlreadyInRoom(player_id, existing));
        }

        let name = default_room_name(name, display_name);
        let room = self.registry.create(name, mode, visible);
        let room_id = room.id();

        let player =
            Player::new(player_id, display_name.to_string(), true, color);
        let seated = player.info();
        // A freshly created room is empty and unstarted, so this
        // cannot fail.
        room.add_player(player, outbox);
        self.index.try_enter(player_id, room_id);

        let room = self
            .registry
            .get(room_id)
            .expect("room just created");
        room.send_to(
            player_id,
            &ServerMessage::CreateSuccess {
                room: room.summary(),
                player: seated,
            },
        );

        tracing::info!(%room_id, name = room.name(), %player_id, "room created");
        Ok(room_id)
    }

    /// Seats a player in an existing room.
    ///
    /// On success the index entry is registered before any message
    /// goes out: the joiner receives `JoinSuccess` with the full
    /// ordered roster, everyone else `PlayerJoined`. A requested color
    /// that is already taken silently resolves to the lowest free one.
    ///
    /// # Errors
    /// - [`LobbyError::RoomNotFound`] — unknown room id (code 3),
    ///   checked first, even for a player who is already seated
    /// - [`LobbyError::AlreadyInRoom`] — one room per player (code 2)
    /// - [`LobbyError::RoomFullOrStarted`] — capacity or started (code 2)
    pub fn join_room(
        &mut self,
        player_id: PlayerId,
        display_name: &str,
        room_id: RoomId,
        color: PlayerColor,
        outbox: Outbox,
    ) -> Result<(), LobbyError> {
        let room = self
            .registry
            .get_mut(room_id)
            .ok_or(LobbyError::RoomNotFound(room_id))?;

        if let Some(existing) = self.index.room_of(player_id) {
            return Err(LobbyError::AlreadyInRoom(player_id, existing));
        }

        let color = resolve_color(&room.taken_colors(), color);
        let player =
            Player::new(player_id, display_name.to_string(), false, color);
        let joined = player.info();

        if !room.add_player(player, outbox) {
            return Err(LobbyError::RoomFullOrStarted(room_id));
        }
        self.index.try_enter(player_id, room_id);

        room.send_to(
            player_id,
            &ServerMessage::JoinSuccess {
                room: room.summary(),
                players: room.roster(),
            },
        );
        room.broadcast_except(
            player_id,
            &ServerMessage::PlayerJoined { player: joined },
        );

        tracing::info!(%player_id, %room_id, "player joined");
        Ok(())
    }

    /// Removes a player from whatever room they occupy.
    ///
    /// The explicit-leave request and the connection-drop path both
    /// land here, so host migration behaves identically for the two;
    /// `notify_leaver` is true only for the explicit request (a
    /// dropped connection has nobody to tell).
    ///
    /// If the roster empties, the room is deleted on the spot.
    /// Otherwise the first remaining seat is promoted to host and the
    /// room is told who left and who hosts now.
    pub fn leave(
        &mut self,
        player_id: PlayerId,
        notify_leaver: bool,
    ) -> Result<RoomId, LobbyError> {
        let room_id = self
            .index
            .leave(player_id)
            .ok_or(LobbyError::NotInRoom(player_id))?;

        let room = self
            .registry
            .get_mut(room_id)
            .ok_or(LobbyError::RoomNotFound(room_id))?;

        let leaver_outbox = room.outbox_of(player_id);
        let leaver = room
            .remove_player(player_id)
            .ok_or(LobbyError::NotInRoom(player_id))?;

        if notify_leaver {
            if let Some(outbox) = leaver_outbox {
                let _ = outbox.send(ServerMessage::LeaveSuccess);
            }
        }

        if room.is_empty() {
            self.registry.remove(room_id);
            tracing::info!(%room_id, "room deleted");
        } else {
            let new_host = room
                .promote_first_to_host()
                .expect("roster is non-empty");
            room.broadcast(&ServerMessage::PlayerLeft {
                leaver: player_id,
                new_host,
                leaver_name: leaver.name,
            });
        }

        tracing::info!(%player_id, %room_id, "player left");
        Ok(room_id)
    }

    /// Switches a seated player to another color.
    ///
    /// Unlike join, a conflict here is an error, not a resolution: the
    /// player asked for that color specifically. Success broadcasts
    /// `ColorChangeSuccess` to the whole room, sender included.
    ///
    /// # Errors
    /// - [`LobbyError::RoomNotFound`] — unknown room id
    /// - [`LobbyError::ColorTaken`] — color in use (code 1 on the wire)
    /// - [`LobbyError::NotInRoom`] — sender holds no seat there
    pub fn change_color(
        &mut self,
        player_id: PlayerId,
        room_id: RoomId,
        color: PlayerColor,
    ) -> Result<(), LobbyError> {
        let room = self
            .registry
            .get_mut(room_id)
            .ok_or(LobbyError::RoomNotFound(room_id))?;

        if room.is_color_taken(color) {
            return Err(LobbyError::ColorTaken(color));
        }
        if !room.set_color(player_id, color) {
            return Err(LobbyError::NotInRoom(player_id));
        }

        room.broadcast(&ServerMessage::ColorChangeSuccess {
            player: player_id,
            color,
        });

        tracing::debug!(%player_id, %room_id, ?color, "color changed");
        Ok(())
    }

    /// Visible rooms that have not started, for lobby discovery.
    pub fn open_rooms(&self) -> Vec<RoomSummary> {
        self.registry.open_rooms()
    }

    /// The room a player currently occupies, if any.
    pub fn room_of(&self, player_id: PlayerId) -> Option<RoomId> {
        self.index.room_of(player_id)
    }

    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.registry.get(room_id)
    }

    pub fn room_mut(&mut self, room_id: RoomId) -> Option<&mut Room> {
        self.registry.get_mut(room_id)
    }

    /// Number of live rooms.
    pub fn room_count(&self) -> usize {
        self.registry.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_color_keeps_free_request() {
        let taken = [PlayerColor::Green, PlayerColor::Red];
        assert_eq!(
            resolve_color(&taken, PlayerColor::Blue),
            PlayerColor::Blue
        );
    }

    #[test]
    fn test_resolve_color_assigns_lowest_unused() {
        // Green and Blue taken, Green requested: the lowest free value
        // is Red — not Blue, not arbitrary.
        let taken = [PlayerColor::Green, PlayerColor::Blue];
        assert_eq!(
            resolve_color(&taken, PlayerColor::Green),
            PlayerColor::Red
        );
    }

    #[test]
    fn test_resolve_color_all_taken_keeps_request() {
        let taken = [PlayerColor::Green, PlayerColor::Red, PlayerColor::Blue];
        assert_eq!(
            resolve_color(&taken, PlayerColor::Red),
            PlayerColor::Red
        );
    }

    #[test]
    fn test_default_room_name() {
        assert_eq!(
            default_room_name(String::new(), "ada"),
            "ada's Lobby"
        );
        assert_eq!(default_room_name("pit".into(), "ada"), "pit");
    }
}
