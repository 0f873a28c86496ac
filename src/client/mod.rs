pub mod api;
pub mod dispatch;
#[cfg(feature = "network")]
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use api::{Backend, OfflineBackend};

/// Pick the backend for this run. Falls back to offline mode when the
/// network feature is off, the user asked for it, or the client cannot be built.
pub fn connect(server_url: &str, timeout: Duration, offline: bool) -> Arc<dyn Backend> {
    if offline {
        tracing::info!("running offline");
        return Arc::new(OfflineBackend);
    }
    connect_http(server_url, timeout)
}

#[cfg(feature = "network")]
fn connect_http(server_url: &str, timeout: Duration) -> Arc<dyn Backend> {
    match http::HttpBackend::new(server_url, timeout) {
        Ok(backend) => {
            tracing::info!(server = server_url, "using http backend");
            Arc::new(backend)
        }
        Err(e) => {
            tracing::warn!(error = %e, "http client unavailable, running offline");
            Arc::new(OfflineBackend)
        }
    }
}

#[cfg(not(feature = "network"))]
fn connect_http(_server_url: &str, _timeout: Duration) -> Arc<dyn Backend> {
    tracing::info!("built without network support, running offline");
    Arc::new(OfflineBackend)
}
