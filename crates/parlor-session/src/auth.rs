//! Authentication hook for validating player identity.
//!
//! Parlor doesn't validate credentials itself — that belongs to
//! whatever auth provider the deployment uses. The [`Authenticator`]
//! trait is the seam: the handler passes the requested display name
//! and optional token from the `Login` message, and gets back either
//! the display name to record for the session or an auth failure.

use crate::SessionError;

/// Validates a login request and returns the display name to use.
///
/// `Send + Sync + 'static` because the authenticator is shared across
/// connection tasks for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use parlor_session::{Authenticator, SessionError};
///
/// /// Accepts any non-empty name. Development only.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(
///         &self,
///         name: &str,
///         _token: Option<&str>,
///     ) -> Result<String, SessionError> {
///         if name.is_empty() {
///             return Err(SessionError::AuthFailed(
///                 "display name required".into(),
///             ));
///         }
///         Ok(name.to_string())
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the login and returns the session's display name.
    ///
    /// Implementations may normalize the name (trim, canonicalize) —
    /// whatever they return is the name the session keeps.
    fn authenticate(
        &self,
        name: &str,
        token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<String, SessionError>> + Send;
}
