//! Wire protocol for Parlor.
//!
//! This crate defines the language that lobby clients, game-server
//! workers, and the matchmaking server speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], identities and
//!   lobby attributes) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing so.
//!
//! The protocol layer sits between the transport (raw bytes) and the
//! lobby core; it knows nothing about rooms or the server pool.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, ERR_CONFLICT, ERR_MALFORMED, ERR_UNAUTHORIZED,
    ERR_UNAVAILABLE, GameMode, PlayerColor, PlayerId, PlayerInfo, RoomId,
    RoomSummary, ServerMessage,
};
