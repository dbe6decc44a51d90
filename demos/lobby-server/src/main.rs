//! A runnable lobby server with development-grade auth.
//!
//! Clients log in with any non-empty display name; game-server
//! workers register against the default port range. Point a WebSocket
//! client at `0.0.0.0:8080` and speak the JSON protocol.

use parlor::prelude::*;
use parlor::session::SessionError;

/// Accepts any non-empty display name. Development only: a real
/// deployment validates the token against its auth provider.
struct DevAuth;

impl Authenticator for DevAuth {
    async fn authenticate(
        &self,
        name: &str,
        _token: Option<&str>,
    ) -> Result<String, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::AuthFailed(
                "display name required".into(),
            ));
        }
        Ok(name.to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=parlor=debug for per-request tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let addr = std::env::var("PARLOR_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let base_port = std::env::var("PARLOR_BASE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(4297);

    tracing::info!(%addr, base_port, "starting lobby server");

    let server = ParlorServerBuilder::new()
        .bind(&addr)
        .pool_config(PoolConfig { base_port })
        .build(DevAuth)
        .await?;

    server.run().await?;
    Ok(())
}
