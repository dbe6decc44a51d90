//! Integration tests for the worker pool: port allocation under
//! concurrency, claim semantics, and port reclamation.

use std::sync::Arc;

use parlor_pool::{PoolConfig, PoolError, ServerPool, WorkerSender};
use parlor_protocol::RoomId;
use parlor_transport::ConnectionId;
use tokio::sync::mpsc;

fn conn(id: u64) -> ConnectionId {
    ConnectionId::new(id)
}

fn sender() -> WorkerSender {
    mpsc::unbounded_channel().0
}

#[tokio::test]
async fn test_ports_allocated_from_base_upward() {
    let pool = ServerPool::new(PoolConfig { base_port: 4297 });

    assert_eq!(pool.register(conn(1), sender()).await.unwrap(), 4297);
    assert_eq!(pool.register(conn(2), sender()).await.unwrap(), 4298);
    assert_eq!(pool.register(conn(3), sender()).await.unwrap(), 4299);
}

#[tokio::test]
async fn test_register_twice_fails() {
    let pool = ServerPool::default();
    pool.register(conn(1), sender()).await.unwrap();

    let err = pool.register(conn(1), sender()).await.unwrap_err();
    assert!(matches!(err, PoolError::AlreadyRegistered(_)));
    assert_eq!(pool.len().await, 1);
}

#[tokio::test]
async fn test_freed_port_is_reused() {
    let pool = ServerPool::default();
    pool.register(conn(1), sender()).await.unwrap();
    let middle = pool.register(conn(2), sender()).await.unwrap();
    pool.register(conn(3), sender()).await.unwrap();

    assert_eq!(pool.unregister(conn(2)).await, Some(middle));

    // The freed port is the smallest unused value, so the next
    // registration gets it back.
    assert_eq!(pool.register(conn(4), sender()).await.unwrap(), middle);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_registrations_get_distinct_ports() {
    const WORKERS: u64 = 32;
    let pool = Arc::new(ServerPool::new(PoolConfig { base_port: 4297 }));

    let mut handles = Vec::new();
    for id in 0..WORKERS {
        let pool = Arc::clone(&pool);
        handles.push(tokio::spawn(async move {
            pool.register(conn(id), sender()).await.unwrap()
        }));
    }

    let mut ports = Vec::new();
    for handle in handles {
        ports.push(handle.await.unwrap());
    }

    ports.sort_unstable();
    ports.dedup();
    assert_eq!(ports.len() as u64, WORKERS, "ports must be unique");
    assert!(ports.iter().all(|&p| p >= 4297));
}

#[tokio::test]
async fn test_claim_requires_availability() {
    let pool = ServerPool::default();
    pool.register(conn(1), sender()).await.unwrap();

    // Registered but not yet available: nothing to claim.
    assert!(pool.claim(RoomId(0)).await.is_none());

    pool.mark_available(conn(1)).await.unwrap();
    let claimed = pool.claim(RoomId(0)).await.expect("worker is idle");
    assert_eq!(claimed.connection, conn(1));

    // A claim clears availability: the same worker can't serve two rooms.
    assert!(pool.claim(RoomId(1)).await.is_none());
    assert_eq!(pool.serving(conn(1)).await, Some(RoomId(0)));
}

#[tokio::test]
async fn test_mark_available_unknown_connection_fails() {
    let pool = ServerPool::default();
    let err = pool.mark_available(conn(9)).await.unwrap_err();
    assert!(matches!(err, PoolError::NotRegistered(_)));
}

#[tokio::test]
async fn test_unregister_bound_worker_reclaims_port_only() {
    let pool = ServerPool::default();
    let port = pool.register(conn(1), sender()).await.unwrap();
    pool.mark_available(conn(1)).await.unwrap();
    pool.claim(RoomId(3)).await.expect("claim succeeds");

    // Worker drops mid-game: the slot goes away and the port frees up,
    // nothing else.
    assert_eq!(pool.unregister(conn(1)).await, Some(port));
    assert!(pool.is_empty().await);
    assert_eq!(pool.register(conn(2), sender()).await.unwrap(), port);
}

#[tokio::test]
async fn test_unregister_unknown_connection_is_none() {
    let pool = ServerPool::default();
    assert_eq!(pool.unregister(conn(5)).await, None);
}
