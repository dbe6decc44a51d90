//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a Parlor lobby server. It ties
//! together all the layers: transport → protocol → session → lobby →
//! worker pool.

use std::sync::Arc;

use parlor_pool::{PoolConfig, ServerPool};
use parlor_protocol::{Codec, JsonCodec};
use parlor_room::LobbyManager;
use parlor_session::{Authenticator, SessionManager};
use parlor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ParlorError;
use crate::handler::handle_connection;
use crate::starter::MatchStarter;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed; the pool carries its
/// own lock internally.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) lobby: Arc<Mutex<LobbyManager>>,
    pub(crate) pool: Arc<ServerPool>,
    pub(crate) starter: MatchStarter,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,ignore
/// use parlor::prelude::*;
///
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(my_auth)
///     .await?;
/// server.run().await
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    pool_config: PoolConfig,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            pool_config: PoolConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the worker pool configuration.
    pub fn pool_config(mut self, config: PoolConfig) -> Self {
        self.pool_config = config;
        self
    }

    /// Builds and starts the server with the given authenticator.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<ParlorServer<A, JsonCodec>, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let lobby = Arc::new(Mutex::new(LobbyManager::new()));
        let pool = Arc::new(ServerPool::new(self.pool_config));
        let starter = MatchStarter::new(Arc::clone(&lobby), Arc::clone(&pool));

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new()),
            lobby,
            pool,
            starter,
            auth,
            codec: JsonCodec,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor lobby server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer<A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl<A, C> ParlorServer<A, C>
where
    A: Authenticator,
    C: Codec,
{
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each
    /// one. A connection stays anonymous until its first message picks
    /// a role for it, so players and game-server workers share this
    /// single listener. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
