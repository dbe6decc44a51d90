//! Error types for the session layer.

/// Errors that can occur at the authentication boundary.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The authenticator rejected the login. Mapped to wire error
    /// code 1 by the handler.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The connection already has a session; a connection logs in at
    /// most once.
    #[error("player {0} is already logged in")]
    AlreadyLoggedIn(parlor_protocol::PlayerId),

    /// No session exists for the given connection.
    #[error("no session for player {0}")]
    NotFound(parlor_protocol::PlayerId),
}
