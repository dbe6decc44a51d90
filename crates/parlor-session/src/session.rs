//! The per-player session record.

use parlor_protocol::PlayerId;

/// The server's record of one authenticated player connection.
///
/// Created when a login is accepted, destroyed when the connection
/// drops (or when the connection re-registers as a game server). The
/// display name never changes for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Which player this session belongs to.
    pub player_id: PlayerId,

    /// The display name assigned at login.
    pub display_name: String,
}
