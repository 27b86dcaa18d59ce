use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};

use crate::api::CallbackHandoff;

pub async fn health(Extension(handoff): Extension<Arc<CallbackHandoff>>) -> Json<Value> {
    let login = if handoff.is_completed().await {
        "completed"
    } else {
        "pending"
    };

    Json(json!({
        "status": "ok",
        "login": login,
        "version": env!("CARGO_PKG_VERSION")
    }))
}
