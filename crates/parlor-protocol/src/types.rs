//! Core types of the Parlor lobby protocol.
//!
//! Everything in this module travels on the wire: identity newtypes,
//! the per-player attributes negotiated in a lobby, and the closed
//! request/notification vocabulary. Requests are decoded once at the
//! connection boundary into [`ClientMessage`]; the core then matches
//! exhaustively instead of dispatching on numeric tags.

use serde::{Deserialize, Serialize};

use std::fmt;

use parlor_transport::ConnectionId;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A player's identity: the stable id of their connection.
///
/// Newtype over `u64` so a `PlayerId` can't be confused with a
/// `RoomId` even though both are integers underneath.
/// `#[serde(transparent)]` keeps it a plain number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl From<ConnectionId> for PlayerId {
    fn from(id: ConnectionId) -> Self {
        Self(id.into_inner())
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A room's identity.
///
/// Room ids are allocated densely from zero and reused after a room is
/// deleted, so `u16` is plenty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u16);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Lobby attributes
// ---------------------------------------------------------------------------

/// The game mode a room is created for.
///
/// The mode fixes the room's capacity; capacity is always recomputed
/// from the mode, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Arena,
    Survival,
}

impl GameMode {
    /// Maximum number of players a room of this mode can seat.
    pub fn max_players(self) -> usize {
        match self {
            Self::Arena => 8,
            Self::Survival => 10,
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Arena => write!(f, "Arena"),
            Self::Survival => write!(f, "Survival"),
        }
    }
}

/// A player's lobby color, unique within a room.
///
/// The discriminants define the resolution order: when a requested
/// color is taken, the lowest unused value is assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerColor {
    Green = 0,
    Red = 1,
    Blue = 2,
}

impl PlayerColor {
    /// All colors in ascending resolution order.
    pub const ALL: [PlayerColor; 3] =
        [PlayerColor::Green, PlayerColor::Red, PlayerColor::Blue];
}

// ---------------------------------------------------------------------------
// Wire-facing summaries
// ---------------------------------------------------------------------------

/// What the server tells clients about a room.
///
/// Sent in lobby listings and in create/join confirmations. The full
/// roster travels separately (see [`ServerMessage::JoinSuccess`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub mode: GameMode,
    pub max_players: usize,
    pub player_count: usize,
}

/// One seated player, as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub id: PlayerId,
    pub name: String,
    pub is_host: bool,
    pub color: PlayerColor,
}

// ---------------------------------------------------------------------------
// Error codes
// ---------------------------------------------------------------------------

/// Request payload could not be decoded.
pub const ERR_MALFORMED: u8 = 0;
/// Caller is not authenticated (or, for color changes, the color is taken).
pub const ERR_UNAUTHORIZED: u8 = 1;
/// State conflict: full, already started, already seated, not host.
pub const ERR_CONFLICT: u8 = 2;
/// Resource missing or exhausted: unknown room, no idle game server.
pub const ERR_UNAVAILABLE: u8 = 3;

// ---------------------------------------------------------------------------
// Inbound messages
// ---------------------------------------------------------------------------

/// Everything a connection can send to the lobby.
///
/// Game clients send the lobby requests; game-server worker processes
/// send the `Server*` messages. A connection's role is fixed by its
/// first message (`Login` or `RegisterServer`).
///
/// `#[serde(tag = "type")]` produces internally tagged JSON, e.g.
/// `{ "type": "JoinRoom", "room_id": 3, "color": "Green" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Client → Server: authenticate and claim a display name.
    Login {
        name: String,
        token: Option<String>,
    },

    /// Client → Server: create a room and take its host seat.
    /// An empty `name` defaults to "<host>'s Lobby".
    CreateRoom {
        name: String,
        mode: GameMode,
        visible: bool,
        color: PlayerColor,
    },

    /// Client → Server: take a seat in an existing room.
    JoinRoom {
        room_id: RoomId,
        color: PlayerColor,
    },

    /// Client → Server: leave the current room.
    LeaveRoom,

    /// Client → Server: switch to another color in the given room.
    ChangeColor {
        room_id: RoomId,
        color: PlayerColor,
    },

    /// Client → Server: list visible rooms that haven't started.
    ListOpenRooms,

    /// Client → Server: bind the room to a game server and start.
    /// Only the room's host may send this.
    StartGame { room_id: RoomId },

    /// Worker → Server: register as a game-server process.
    RegisterServer,

    /// Worker → Server: the worker is idle and ready for a match.
    ServerAvailable,

    /// Worker → Server: the match is loaded; clients may transition.
    ServerReady,
}

// ---------------------------------------------------------------------------
// Outbound messages
// ---------------------------------------------------------------------------

/// Everything the lobby sends back to clients and workers.
///
/// Failure variants carry the numeric error code convention:
/// 0 malformed, 1 unauthorized, 2 state-conflict, 3 unavailable.
/// `ChangeColorFailed` keeps the historical wire contract where a
/// taken color is code 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Login accepted; the connection is now an authenticated player.
    LoginOk { player_id: PlayerId },
    LoginFailed { code: u8 },

    /// Room created; the sender is seated as host.
    CreateSuccess {
        room: RoomSummary,
        player: PlayerInfo,
    },
    CreateFailed { code: u8 },

    /// Join confirmed, with the full ordered roster (host first is not
    /// guaranteed; seat order is join order).
    JoinSuccess {
        room: RoomSummary,
        players: Vec<PlayerInfo>,
    },
    JoinFailed { code: u8 },

    /// Broadcast to the rest of the room when someone joins.
    PlayerJoined { player: PlayerInfo },

    /// Sent to the leaver on an explicit leave (not on disconnect).
    LeaveSuccess,

    /// Broadcast to the remaining room members: who left, who hosts now.
    PlayerLeft {
        leaver: PlayerId,
        new_host: PlayerId,
        leaver_name: String,
    },

    /// Broadcast to the whole room on a successful color change.
    ColorChangeSuccess {
        player: PlayerId,
        color: PlayerColor,
    },
    ColorChangeFailed { code: u8 },

    /// The answer set for lobby discovery: visible, unstarted rooms.
    OpenRooms { rooms: Vec<RoomSummary> },
    OpenRoomsFailed { code: u8 },

    /// Broadcast to the room: a game server was bound at this port.
    StartGameSuccess { port: u16 },
    StartGameFailed { code: u8 },

    /// Broadcast to the room once the bound worker signals readiness.
    LoadGame,

    /// Worker ← Server: registration confirmed, bind your listener here.
    ServerRegistered { port: u16 },

    /// Worker ← Server: the roster and mode for the match to run.
    InitializeGame {
        mode: GameMode,
        players: Vec<PlayerInfo>,
    },

    /// The request payload could not be decoded at all.
    InvalidRequest { code: u8 },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(all(test, feature = "json"))]
mod tests {
    //! The client SDK and the worker processes parse these JSON shapes,
    //! so the serde attributes are part of the wire contract.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_from_connection_id() {
        let pid = PlayerId::from(ConnectionId::new(9));
        assert_eq!(pid, PlayerId(9));
    }

    #[test]
    fn test_room_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&RoomId(3)).unwrap();
        assert_eq!(json, "3");
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(RoomId(3).to_string(), "R-3");
    }

    #[test]
    fn test_game_mode_capacity() {
        assert_eq!(GameMode::Arena.max_players(), 8);
        assert_eq!(GameMode::Survival.max_players(), 10);
    }

    #[test]
    fn test_player_color_order_is_ascending() {
        assert!(PlayerColor::Green < PlayerColor::Red);
        assert!(PlayerColor::Red < PlayerColor::Blue);
        assert_eq!(
            PlayerColor::ALL,
            [PlayerColor::Green, PlayerColor::Red, PlayerColor::Blue]
        );
    }

    #[test]
    fn test_client_message_join_room_json_format() {
        let msg = ClientMessage::JoinRoom {
            room_id: RoomId(3),
            color: PlayerColor::Blue,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "JoinRoom");
        assert_eq!(json["room_id"], 3);
        assert_eq!(json["color"], "Blue");
    }

    #[test]
    fn test_client_message_login_without_token() {
        let msg = ClientMessage::Login {
            name: "ada".into(),
            token: None,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "Login");
        assert_eq!(json["name"], "ada");
        assert!(json["token"].is_null());
    }

    #[test]
    fn test_client_message_create_room_round_trip() {
        let msg = ClientMessage::CreateRoom {
            name: String::new(),
            mode: GameMode::Survival,
            visible: true,
            color: PlayerColor::Green,
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ClientMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_worker_messages_round_trip() {
        for msg in [
            ClientMessage::RegisterServer,
            ClientMessage::ServerAvailable,
            ClientMessage::ServerReady,
        ] {
            let bytes = serde_json::to_vec(&msg).unwrap();
            let decoded: ClientMessage =
                serde_json::from_slice(&bytes).unwrap();
            assert_eq!(msg, decoded);
        }
    }

    #[test]
    fn test_server_message_join_failed_carries_numeric_code() {
        let msg = ServerMessage::JoinFailed {
            code: ERR_UNAVAILABLE,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "JoinFailed");
        assert_eq!(json["code"], 3);
    }

    #[test]
    fn test_server_message_player_left_json_format() {
        let msg = ServerMessage::PlayerLeft {
            leaver: PlayerId(1),
            new_host: PlayerId(2),
            leaver_name: "ada".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "PlayerLeft");
        assert_eq!(json["leaver"], 1);
        assert_eq!(json["new_host"], 2);
        assert_eq!(json["leaver_name"], "ada");
    }

    #[test]
    fn test_room_summary_round_trip() {
        let summary = RoomSummary {
            id: RoomId(0),
            name: "ada's Lobby".into(),
            mode: GameMode::Arena,
            max_players: 8,
            player_count: 1,
        };
        let bytes = serde_json::to_vec(&summary).unwrap();
        let decoded: RoomSummary = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary, decoded);
    }

    #[test]
    fn test_initialize_game_round_trip() {
        let msg = ServerMessage::InitializeGame {
            mode: GameMode::Arena,
            players: vec![PlayerInfo {
                id: PlayerId(1),
                name: "ada".into(),
                is_host: true,
                color: PlayerColor::Green,
            }],
        };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: ServerMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientMessage, _> =
            serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_request_type_returns_error() {
        let unknown = r#"{"type": "TeleportHome", "speed": 9000}"#;
        let result: Result<ClientMessage, _> =
            serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_field_returns_error() {
        // JoinRoom without a room_id must not decode.
        let wrong = r#"{"type": "JoinRoom", "color": "Green"}"#;
        let result: Result<ClientMessage, _> = serde_json::from_str(wrong);
        assert!(result.is_err());
    }
}
