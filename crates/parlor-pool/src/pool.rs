//! The server pool: slot registry and port allocation.

use std::collections::{BTreeSet, HashMap};

use parlor_protocol::{RoomId, ServerMessage};
use parlor_transport::ConnectionId;
use tokio::sync::{Mutex, mpsc};

use crate::PoolError;

/// Channel sender for delivering messages to a worker's connection.
pub type WorkerSender = mpsc::UnboundedSender<ServerMessage>;

/// Pool settings.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Lowest port handed to workers; allocation scans upward from it.
    pub base_port: u16,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self { base_port: 4297 }
    }
}

/// One registered worker process.
struct Slot {
    sender: WorkerSender,
    port: u16,
    /// False until the worker signals readiness, false again once
    /// bound to a room.
    available: bool,
    /// The room this worker is currently serving, once bound.
    serving: Option<RoomId>,
}

/// What a successful claim hands to the match starter.
#[derive(Clone)]
pub struct ClaimedServer {
    pub connection: ConnectionId,
    pub port: u16,
    pub sender: WorkerSender,
}

/// All worker slots and the ports they occupy.
struct PoolInner {
    slots: HashMap<ConnectionId, Slot>,
    ports_in_use: BTreeSet<u16>,
}

/// Thread-safe pool of registered game-server workers.
///
/// Cheap to share as `Arc<ServerPool>`; every operation takes the one
/// internal lock, which is what makes scan-and-reserve (ports) and
/// scan-and-bind (claims) atomic under concurrent registrations.
pub struct ServerPool {
    config: PoolConfig,
    inner: Mutex<PoolInner>,
}

impl ServerPool {
    pub fn new(config: PoolConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(PoolInner {
                slots: HashMap::new(),
                ports_in_use: BTreeSet::new(),
            }),
        }
    }

    /// Registers a worker and allocates it the smallest free port at
    /// or above the configured base.
    ///
    /// The caller relays the port to the worker, which binds its own
    /// listener there. Two concurrent registrations can never receive
    /// the same port: the scan and the reservation happen under one
    /// lock.
    ///
    /// # Errors
    /// [`PoolError::AlreadyRegistered`] if this connection already
    /// holds a slot.
    pub async fn register(
        &self,
        connection: ConnectionId,
        sender: WorkerSender,
    ) -> Result<u16, PoolError> {
        let mut inner = self.inner.lock().await;
        if inner.slots.contains_key(&connection) {
            return Err(PoolError::AlreadyRegistered(connection));
        }

        let mut port = self.config.base_port;
        while inner.ports_in_use.contains(&port) {
            port += 1;
        }
        inner.ports_in_use.insert(port);
        inner.slots.insert(
            connection,
            Slot {
                sender,
                port,
                available: false,
                serving: None,
            },
        );

        tracing::info!(%connection, port, "game server registered");
        Ok(port)
    }

    /// Marks a worker idle and ready to accept a match.
    ///
    /// # Errors
    /// [`PoolError::NotRegistered`] if no slot exists.
    pub async fn mark_available(
        &self,
        connection: ConnectionId,
    ) -> Result<(), PoolError> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .slots
            .get_mut(&connection)
            .ok_or(PoolError::NotRegistered(connection))?;
        slot.available = true;
        tracing::debug!(%connection, port = slot.port, "game server available");
        Ok(())
    }

    /// Claims the first available worker and binds it to a room.
    ///
    /// First-fit in iteration order, no load balancing. The
    /// availability check, the flag clear, and the binding are one
    /// critical section, so a worker can never be handed to two rooms.
    /// Returns `None` when no worker is idle — the caller fails the
    /// start immediately rather than waiting.
    pub async fn claim(&self, room: RoomId) -> Option<ClaimedServer> {
        let mut inner = self.inner.lock().await;
        let (connection, slot) = inner
            .slots
            .iter_mut()
            .find(|(_, slot)| slot.available)?;
        let connection = *connection;

        slot.available = false;
        slot.serving = Some(room);

        tracing::info!(%connection, port = slot.port, %room, "game server claimed");
        Some(ClaimedServer {
            connection,
            port: slot.port,
            sender: slot.sender.clone(),
        })
    }

    /// The room a worker is currently bound to, if any.
    pub async fn serving(&self, connection: ConnectionId) -> Option<RoomId> {
        let inner = self.inner.lock().await;
        inner.slots.get(&connection)?.serving
    }

    /// Removes a worker slot and releases its port to the free set.
    ///
    /// Called on worker disconnect. If the worker was bound to a
    /// started room, that room is NOT re-matched or notified — only
    /// the port is reclaimed (documented non-goal).
    ///
    /// Returns the freed port, or `None` if the connection held no slot.
    pub async fn unregister(&self, connection: ConnectionId) -> Option<u16> {
        let mut inner = self.inner.lock().await;
        let slot = inner.slots.remove(&connection)?;
        inner.ports_in_use.remove(&slot.port);
        tracing::info!(%connection, port = slot.port, "game server unregistered");
        Some(slot.port)
    }

    /// Number of registered workers.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.slots.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.slots.is_empty()
    }

    /// Number of workers currently idle and claimable.
    pub async fn available_count(&self) -> usize {
        self.inner
            .lock()
            .await
            .slots
            .values()
            .filter(|s| s.available)
            .count()
    }
}

impl Default for ServerPool {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}
