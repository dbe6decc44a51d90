//! Player session boundary for Parlor.
//!
//! Authentication itself is an external collaborator; this crate is
//! only the seam the lobby consumes:
//!
//! 1. **Capability check** — is this connection an authenticated
//!    player? ([`Authenticator`] trait, [`SessionManager::is_logged_in`])
//! 2. **Display name** — the stable name assigned at login, immutable
//!    for the session ([`SessionManager::display_name`])
//!
//! Credential validation, friend lists, and persistence live outside
//! this repository.

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::Authenticator;
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::Session;
