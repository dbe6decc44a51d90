//! Game-server worker pool for Parlor.
//!
//! Worker processes register with the lobby, get a unique port
//! allocated from a fixed base upward, signal when they are idle, and
//! are claimed one at a time when a room starts a match. The pool owns
//! the slot lifetime and the port space; a worker disconnect releases
//! its port back to the free set.
//!
//! All state lives behind a single mutex: "find the smallest unused
//! port" and "claim the first idle worker" are scan-then-commit
//! sequences that are only correct inside one critical section.

mod error;
mod pool;

pub use error::PoolError;
pub use pool::{ClaimedServer, PoolConfig, ServerPool, WorkerSender};
