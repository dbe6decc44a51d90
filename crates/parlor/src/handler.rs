//! Per-connection handler: role selection, auth, and message routing.
//!
//! Each accepted connection gets its own Tokio task running this
//! handler. A connection starts out anonymous and its first meaningful
//! message picks its role: `Login` makes it a player, `RegisterServer`
//! makes it a game-server worker. The same loop then routes lobby
//! requests or pool reports depending on that role, and the cleanup on
//! exit differs per role too: a dropped player leaves their room as if
//! they had sent `LeaveRoom`, a dropped worker gives its port back.
//!
//! Replies and broadcasts flow through a per-connection outbox channel
//! rather than being written to the socket inside lobby operations.
//! Lobby code can then send to any member while holding the lobby
//! lock, and this task alone touches the socket.

use std::sync::Arc;

use parlor_protocol::{
    ClientMessage, Codec, ERR_CONFLICT, ERR_MALFORMED, ERR_UNAUTHORIZED,
    PlayerId, ServerMessage,
};
use parlor_room::{LobbyError, Outbox};
use parlor_session::Authenticator;
use parlor_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::server::ServerState;

/// What a connection has become. Fixed by the first `Login` or
/// `RegisterServer` it sends; `Guest` connections can do neither
/// lobby nor pool work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Guest,
    Player,
    Worker,
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<A, C>>,
) -> Result<(), ParlorError>
where
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    let player_id = PlayerId::from(conn_id);
    tracing::debug!(%conn_id, "handling new connection");

    let (outbox, outbox_rx) = mpsc::unbounded_channel();
    let mut role = Role::Guest;

    let result =
        serve(&conn, &state, player_id, &outbox, outbox_rx, &mut role).await;

    // Cleanup runs whether the loop ended cleanly or with an error, so
    // a yanked cable converges to the same state as a polite goodbye.
    match role {
        Role::Player => {
            state.sessions.lock().await.remove(player_id);
            let mut lobby = state.lobby.lock().await;
            match lobby.leave(player_id, false) {
                Ok(room_id) => {
                    tracing::info!(
                        %player_id, %room_id,
                        "disconnected player removed from room"
                    );
                }
                Err(LobbyError::NotInRoom(_)) => {}
                Err(e) => {
                    tracing::warn!(%player_id, error = %e, "cleanup failed");
                }
            }
        }
        Role::Worker => {
            if let Some(port) = state.pool.unregister(conn_id).await {
                tracing::info!(%conn_id, port, "worker disconnected");
            }
        }
        Role::Guest => {}
    }

    result
}

/// The connection's main loop: socket in, outbox out.
async fn serve<A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<A, C>>,
    player_id: PlayerId,
    outbox: &Outbox,
    mut outbox_rx: mpsc::UnboundedReceiver<ServerMessage>,
    role: &mut Role,
) -> Result<(), ParlorError>
where
    A: Authenticator,
    C: Codec,
{
    loop {
        tokio::select! {
            outbound = outbox_rx.recv() => {
                // The local sender half keeps the channel open, so
                // recv() never yields None while this loop runs.
                let Some(msg) = outbound else { break };
                let bytes = state.codec.encode(&msg)?;
                conn.send(&bytes).await?;
            }
            inbound = conn.recv() => {
                let data = match inbound {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::debug!(%player_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%player_id, error = %e, "recv error");
                        break;
                    }
                };

                let msg = match state.codec.decode::<ClientMessage>(&data) {
                    Ok(msg) => msg,
                    Err(e) => {
                        tracing::debug!(
                            %player_id, error = %e, "undecodable request"
                        );
                        let _ = outbox.send(ServerMessage::InvalidRequest {
                            code: ERR_MALFORMED,
                        });
                        continue;
                    }
                };

                dispatch(conn.id(), player_id, msg, state, outbox, role).await;
            }
        }
    }

    Ok(())
}

/// Routes one decoded request. Failure replies go through the outbox;
/// nothing here touches the socket directly.
async fn dispatch<A, C>(
    conn_id: ConnectionId,
    player_id: PlayerId,
    msg: ClientMessage,
    state: &Arc<ServerState<A, C>>,
    outbox: &Outbox,
    role: &mut Role,
) where
    A: Authenticator,
    C: Codec,
{
    match msg {
        ClientMessage::Login { name, token } => {
            if *role != Role::Guest {
                tracing::debug!(%player_id, ?role, "duplicate login attempt");
                let _ = outbox.send(ServerMessage::LoginFailed {
                    code: ERR_CONFLICT,
                });
                return;
            }
            match state.auth.authenticate(&name, token.as_deref()).await {
                Ok(display_name) => {
                    let mut sessions = state.sessions.lock().await;
                    match sessions.create(player_id, display_name) {
                        Ok(_) => {
                            *role = Role::Player;
                            tracing::info!(%player_id, "player logged in");
                            let _ = outbox
                                .send(ServerMessage::LoginOk { player_id });
                        }
                        Err(e) => {
                            tracing::warn!(
                                %player_id, error = %e, "session create failed"
                            );
                            let _ = outbox.send(ServerMessage::LoginFailed {
                                code: ERR_CONFLICT,
                            });
                        }
                    }
                }
                Err(e) => {
                    tracing::info!(%player_id, error = %e, "login rejected");
                    let _ = outbox.send(ServerMessage::LoginFailed {
                        code: ERR_UNAUTHORIZED,
                    });
                }
            }
        }

        ClientMessage::CreateRoom {
            name,
            mode,
            visible,
            color,
        } => {
            let Some(display_name) = display_name_of(state, player_id).await
            else {
                let _ = outbox.send(ServerMessage::CreateFailed {
                    code: ERR_UNAUTHORIZED,
                });
                return;
            };
            let mut lobby = state.lobby.lock().await;
            if let Err(e) = lobby.create_room(
                player_id,
                &display_name,
                name,
                mode,
                visible,
                color,
                outbox.clone(),
            ) {
                tracing::debug!(%player_id, error = %e, "create refused");
                let _ = outbox
                    .send(ServerMessage::CreateFailed { code: e.code() });
            }
        }

        ClientMessage::JoinRoom { room_id, color } => {
            let Some(display_name) = display_name_of(state, player_id).await
            else {
                let _ = outbox.send(ServerMessage::JoinFailed {
                    code: ERR_UNAUTHORIZED,
                });
                return;
            };
            let mut lobby = state.lobby.lock().await;
            if let Err(e) = lobby.join_room(
                player_id,
                &display_name,
                room_id,
                color,
                outbox.clone(),
            ) {
                tracing::debug!(%player_id, %room_id, error = %e, "join refused");
                let _ =
                    outbox.send(ServerMessage::JoinFailed { code: e.code() });
            }
        }

        ClientMessage::LeaveRoom => {
            // No failure notification for leave; a player outside any
            // room asking to leave one is already where they wanted
            // to be.
            let mut lobby = state.lobby.lock().await;
            if let Err(e) = lobby.leave(player_id, true) {
                tracing::debug!(%player_id, error = %e, "leave ignored");
            }
        }

        ClientMessage::ChangeColor { room_id, color } => {
            let mut lobby = state.lobby.lock().await;
            if let Err(e) = lobby.change_color(player_id, room_id, color) {
                tracing::debug!(
                    %player_id, %room_id, error = %e, "color change refused"
                );
                let _ = outbox.send(ServerMessage::ColorChangeFailed {
                    code: e.code(),
                });
            }
        }

        ClientMessage::ListOpenRooms => {
            if !state.sessions.lock().await.is_logged_in(player_id) {
                let _ = outbox.send(ServerMessage::OpenRoomsFailed {
                    code: ERR_UNAUTHORIZED,
                });
                return;
            }
            let rooms = state.lobby.lock().await.open_rooms();
            let _ = outbox.send(ServerMessage::OpenRooms { rooms });
        }

        ClientMessage::StartGame { room_id } => {
            if !state.sessions.lock().await.is_logged_in(player_id) {
                let _ = outbox.send(ServerMessage::StartGameFailed {
                    code: ERR_UNAUTHORIZED,
                });
                return;
            }
            // Success replies (StartGameSuccess to the room, the
            // roster to the worker) are sent by the starter itself.
            if let Err(e) = state.starter.start_game(player_id, room_id).await
            {
                tracing::debug!(%player_id, %room_id, error = %e, "start refused");
                let _ = outbox.send(ServerMessage::StartGameFailed {
                    code: e.code(),
                });
            }
        }

        ClientMessage::RegisterServer => {
            if *role == Role::Player {
                // A logged-in client turning into a worker sheds its
                // player state first.
                state.sessions.lock().await.remove(player_id);
                let _ = state.lobby.lock().await.leave(player_id, false);
            }
            match state.pool.register(conn_id, outbox.clone()).await {
                Ok(port) => {
                    *role = Role::Worker;
                    tracing::info!(%conn_id, port, "game server registered");
                    let _ =
                        outbox.send(ServerMessage::ServerRegistered { port });
                }
                Err(e) => {
                    tracing::warn!(%conn_id, error = %e, "register refused");
                }
            }
        }

        ClientMessage::ServerAvailable => {
            if let Err(e) = state.pool.mark_available(conn_id).await {
                tracing::warn!(%conn_id, error = %e, "availability ignored");
            }
        }

        ClientMessage::ServerReady => {
            state.starter.server_ready(conn_id).await;
        }
    }
}

/// The session display name, or `None` when the connection never
/// logged in.
async fn display_name_of<A, C>(
    state: &Arc<ServerState<A, C>>,
    player_id: PlayerId,
) -> Option<String>
where
    A: Authenticator,
    C: Codec,
{
    state
        .sessions
        .lock()
        .await
        .display_name(player_id)
        .map(str::to_string)
}
