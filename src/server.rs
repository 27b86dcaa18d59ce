use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tokio::{net::TcpListener, task::JoinHandle};

use crate::{
    api::{self, CallbackHandoff},
    config::CALLBACK_PATH,
    error::AuthError,
    warning,
};

pub fn router(handoff: Arc<CallbackHandoff>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route(CALLBACK_PATH, get(api::callback))
        .fallback(api::fallback)
        .layer(Extension(handoff))
}

/// Binds the callback listener on `addr` and serves it on a background task.
///
/// Binding happens before this returns so a taken port is reported before the
/// user is sent to the login page.
pub async fn start_callback_server(
    addr: &str,
    handoff: Arc<CallbackHandoff>,
) -> Result<JoinHandle<()>, AuthError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| AuthError::Bind {
            addr: addr.to_string(),
            source,
        })?;

    let app = router(handoff);
    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
