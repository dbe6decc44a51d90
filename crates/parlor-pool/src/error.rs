//! Error types for the worker pool.

use parlor_transport::ConnectionId;

/// Errors that can occur during pool operations.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// The connection already holds a worker slot.
    #[error("connection {0} is already registered as a game server")]
    AlreadyRegistered(ConnectionId),

    /// No worker slot exists for the connection.
    #[error("connection {0} is not a registered game server")]
    NotRegistered(ConnectionId),
}
