//! Start-game handshake between the lobby and the worker pool.
//!
//! Starting a match touches both halves of the server: the room must
//! flip to started (and drop out of discovery) and a game-server
//! worker must be claimed and handed the roster. [`MatchStarter`] is
//! the only place those two cross, so neither the lobby nor the pool
//! knows the other exists.
//!
//! The sequence on success:
//!   1. host sends `StartGame` → worker is claimed, room flips to
//!      started, worker gets `InitializeGame`, room gets
//!      `StartGameSuccess` with the worker's port
//!   2. players connect to the worker out of band
//!   3. worker sends `ServerReady` → room gets `LoadGame`

use std::sync::Arc;

use parlor_pool::ServerPool;
use parlor_protocol::{
    ERR_CONFLICT, ERR_UNAVAILABLE, PlayerId, RoomId, ServerMessage,
};
use parlor_room::LobbyManager;
use parlor_transport::ConnectionId;
use tokio::sync::Mutex;

/// Why a start request was refused. Nothing has changed when one of
/// these comes back: the room is still open and no worker was claimed.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("room {0} not found")]
    RoomNotFound(RoomId),

    #[error("player {0} is not the host of room {1}")]
    NotHost(PlayerId, RoomId),

    #[error("room {0} has already started")]
    AlreadyStarted(RoomId),

    #[error("no game server available")]
    NoServerAvailable,
}

impl StartError {
    /// The numeric wire code carried by `StartGameFailed`.
    pub fn code(&self) -> u8 {
        match self {
            Self::NotHost(..) | Self::AlreadyStarted(_) => ERR_CONFLICT,
            Self::RoomNotFound(_) | Self::NoServerAvailable => ERR_UNAVAILABLE,
        }
    }
}

/// Drives the two-step start handshake.
///
/// Holds its own handles to the lobby and the pool so the connection
/// handlers only need one call per protocol step.
pub struct MatchStarter {
    lobby: Arc<Mutex<LobbyManager>>,
    pool: Arc<ServerPool>,
}

impl MatchStarter {
    pub fn new(lobby: Arc<Mutex<LobbyManager>>, pool: Arc<ServerPool>) -> Self {
        Self { lobby, pool }
    }

    /// Claims a worker for the room and kicks off the match.
    ///
    /// Every precondition is checked under the lobby lock before the
    /// claim, and the room flips to started only after a worker is
    /// secured. A failed claim therefore leaves the room exactly as it
    /// was, and the request can simply be retried.
    ///
    /// # Errors
    /// - [`StartError::RoomNotFound`] — unknown room id (code 3)
    /// - [`StartError::NotHost`] — requester holds no host seat (code 2)
    /// - [`StartError::AlreadyStarted`] — double start (code 2)
    /// - [`StartError::NoServerAvailable`] — pool exhausted (code 3)
    pub async fn start_game(
        &self,
        requester: PlayerId,
        room_id: RoomId,
    ) -> Result<u16, StartError> {
        let mut lobby = self.lobby.lock().await;
        let room = lobby
            .room_mut(room_id)
            .ok_or(StartError::RoomNotFound(room_id))?;

        let is_host = room.player(requester).is_some_and(|p| p.is_host);
        if !is_host {
            return Err(StartError::NotHost(requester, room_id));
        }
        if room.started() {
            return Err(StartError::AlreadyStarted(room_id));
        }

        let claimed = self
            .pool
            .claim(room_id)
            .await
            .ok_or(StartError::NoServerAvailable)?;

        room.set_started();

        // The worker gets the roster it will host; the room learns
        // where to connect. Started rooms no longer show up in
        // discovery, so nobody can join between these two sends.
        let _ = claimed.sender.send(ServerMessage::InitializeGame {
            mode: room.mode(),
            players: room.roster(),
        });
        room.broadcast(&ServerMessage::StartGameSuccess {
            port: claimed.port,
        });

        tracing::info!(
            %room_id,
            %requester,
            worker = %claimed.connection,
            port = claimed.port,
            "match started"
        );
        Ok(claimed.port)
    }

    /// Completes the handshake when the claimed worker reports ready.
    ///
    /// The worker's `ServerReady` resolves to whatever room it is
    /// serving; every player there gets `LoadGame`. A `ServerReady`
    /// from a worker with no bound room (or a room that emptied in the
    /// meantime) is logged and dropped, since the worker gets no reply
    /// either way.
    pub async fn server_ready(&self, worker: ConnectionId) {
        let Some(room_id) = self.pool.serving(worker).await else {
            tracing::warn!(%worker, "ServerReady from worker with no match");
            return;
        };

        let lobby = self.lobby.lock().await;
        match lobby.room(room_id) {
            Some(room) => {
                room.broadcast(&ServerMessage::LoadGame);
                tracing::info!(%room_id, %worker, "worker ready, room loading");
            }
            None => {
                tracing::warn!(
                    %room_id,
                    %worker,
                    "ServerReady for a room that no longer exists"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_error_codes() {
        assert_eq!(StartError::NotHost(PlayerId(1), RoomId(0)).code(), 2);
        assert_eq!(StartError::AlreadyStarted(RoomId(0)).code(), 2);
        assert_eq!(StartError::RoomNotFound(RoomId(9)).code(), 3);
        assert_eq!(StartError::NoServerAvailable.code(), 3);
    }
}
