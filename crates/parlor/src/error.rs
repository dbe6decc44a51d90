//! Unified error type for the Parlor lobby server.

use parlor_pool::PoolError;
use parlor_protocol::ProtocolError;
use parlor_room::LobbyError;
use parlor_session::SessionError;
use parlor_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `parlor` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (connection, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (auth, duplicate login).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A lobby-level error (room missing, full, color conflict).
    #[error(transparent)]
    Lobby(#[from] LobbyError),

    /// A worker-pool error (duplicate or missing registration).
    #[error(transparent)]
    Pool(#[from] PoolError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_protocol::PlayerColor;
    use parlor_transport::ConnectionId;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Transport(_)));
        assert!(parlor_err.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err = SessionError::AuthFailed("nope".into());
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Session(_)));
    }

    #[test]
    fn test_from_lobby_error() {
        let err = LobbyError::ColorTaken(PlayerColor::Red);
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Lobby(_)));
    }

    #[test]
    fn test_from_pool_error() {
        let err = PoolError::NotRegistered(ConnectionId::new(7));
        let parlor_err: ParlorError = err.into();
        assert!(matches!(parlor_err, ParlorError::Pool(_)));
    }
}
