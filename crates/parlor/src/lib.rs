//! # Parlor
//!
//! Multiplayer lobby server: rooms, sessions, and a pool of external
//! game-server workers.
//!
//! Clients connect over WebSocket, log in, and create or join rooms.
//! Game-server processes connect to the same listener and register as
//! workers. When a host starts a match, a worker is claimed from the
//! pool, handed the roster, and the room is told which port to play
//! on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//! # use parlor_session::{Authenticator, SessionError};
//! # struct DevAuth;
//! # impl Authenticator for DevAuth {
//! #     async fn authenticate(
//! #         &self,
//! #         name: &str,
//! #         _token: Option<&str>,
//! #     ) -> Result<String, SessionError> {
//! #         Ok(name.to_string())
//! #     }
//! # }
//!
//! # async fn run() -> Result<(), ParlorError> {
//! let server = ParlorServerBuilder::new()
//!     .bind("0.0.0.0:8080")
//!     .build(DevAuth)
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;
mod starter;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};
pub use starter::{MatchStarter, StartError};

// Re-export the sub-crates so applications can depend on `parlor`
// alone.
pub use parlor_pool as pool;
pub use parlor_protocol as protocol;
pub use parlor_room as room;
pub use parlor_session as session;
pub use parlor_transport as transport;

/// The common imports for building a lobby server.
pub mod prelude {
    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder};
    pub use parlor_pool::PoolConfig;
    pub use parlor_protocol::{
        ClientMessage, GameMode, PlayerColor, PlayerId, RoomId, ServerMessage,
    };
    pub use parlor_session::Authenticator;
}
