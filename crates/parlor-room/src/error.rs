//! Error types for the lobby layer.

use parlor_protocol::{
    ERR_CONFLICT, ERR_UNAUTHORIZED, ERR_UNAVAILABLE, PlayerColor, PlayerId,
    RoomId,
};

/// Errors that can occur during lobby operations.
///
/// Every variant maps to the wire error-code convention via
/// [`code`](LobbyError::code); the handler picks the per-request
/// failure notification to carry it.
#[derive(Debug, thiserror::Error)]
pub enum LobbyError {
    /// The room does not exist (anymore).
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    /// The room refused the join: full, or the match already started.
    #[error("room {0} is full or has started")]
    RoomFullOrStarted(RoomId),

    /// The player already occupies a room.
    #[error("player {0} is already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The player does not occupy the room this operation targets.
    #[error("player {0} is not in a room")]
    NotInRoom(PlayerId),

    /// The requested color is already taken by a seated player.
    #[error("color {0:?} is already taken")]
    ColorTaken(PlayerColor),
}

impl LobbyError {
    /// The numeric wire code for this failure.
    ///
    /// `ColorTaken` reports 1, matching the historical color-change
    /// contract; every other state conflict is 2 and a missing room 3.
    pub fn code(&self) -> u8 {
        match self {
            Self::RoomNotFound(_) => ERR_UNAVAILABLE,
            Self::RoomFullOrStarted(_)
            | Self::AlreadyInRoom(..)
            | Self::NotInRoom(_) => ERR_CONFLICT,
            Self::ColorTaken(_) => ERR_UNAUTHORIZED,
        }
    }
}
