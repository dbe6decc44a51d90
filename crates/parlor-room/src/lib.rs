//! Room lifecycle management for Parlor.
//!
//! A room is a lobby: an ordered roster of players waiting to start a
//! match. This crate owns the room state machine and the two concurrent
//! invariants around it — unique, densely allocated room ids and
//! at-most-one-active-room-per-player.
//!
//! # Key types
//!
//! - [`Room`] — roster, capacity, visibility, started flag
//! - [`RoomRegistry`] — all live rooms, smallest-free-id allocation
//! - [`PlayerLocationIndex`] — which room each player occupies
//! - [`LobbyManager`] — composes the two and performs the atomic
//!   create/join/leave/change-color operations, emitting broadcasts
//!
//! `LobbyManager` is not thread-safe by itself; the server holds it
//! behind a `tokio::sync::Mutex`, which serializes roster mutation
//! per operation and makes join (capacity check + index entry) atomic.

mod error;
mod index;
mod manager;
mod registry;
mod room;

pub use error::LobbyError;
pub use index::PlayerLocationIndex;
pub use manager::LobbyManager;
pub use registry::RoomRegistry;
pub use room::{Outbox, Player, Room};
