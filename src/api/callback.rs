use std::{collections::HashMap, sync::Arc};

use axum::{
    Extension,
    extract::Query,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
};
use reqwest::Client;
use tokio::sync::{Mutex, oneshot};

use crate::{
    config::Settings,
    error::{AuthError, ClientError},
    info,
    spotify::{auth::exchange_code, http_client},
    types::Token,
    warning,
};

pub type AuthResult = Result<Token, AuthError>;

/// Single-use bridge from the `/callback` handler to the authorization flow.
pub struct CallbackHandoff {
    state: String,
    code_verifier: Option<String>,
    settings: Arc<Settings>,
    http: Client,
    sender: Mutex<Option<oneshot::Sender<AuthResult>>>,
}

impl CallbackHandoff {
    pub fn new(
        state: String,
        code_verifier: Option<String>,
        settings: Arc<Settings>,
        sender: oneshot::Sender<AuthResult>,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            http: http_client(&settings)?,
            state,
            code_verifier,
            settings,
            sender: Mutex::new(Some(sender)),
        })
    }

    /// True once a callback consumed the hand-off.
    pub async fn is_completed(&self) -> bool {
        self.sender.lock().await.is_none()
    }

    async fn take_sender(&self) -> Option<oneshot::Sender<AuthResult>> {
        self.sender.lock().await.take()
    }

    /// Validates the redirect parameters and exchanges the code.
    async fn complete(&self, params: &HashMap<String, String>) -> AuthResult {
        if let Some(error) = params.get("error") {
            return Err(AuthError::Provider(error.clone()));
        }

        let received = params.get("state").cloned().unwrap_or_default();
        if received != self.state {
            return Err(AuthError::StateMismatch {
                received,
                expected: self.state.clone(),
            });
        }

        let code = params.get("code").ok_or(AuthError::MissingCode)?;
        let token = exchange_code(
            &self.http,
            &self.settings,
            code,
            self.code_verifier.as_deref(),
        )
        .await?;
        Ok(token)
    }
}

pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(handoff): Extension<Arc<CallbackHandoff>>,
) -> Response {
    let Some(sender) = handoff.take_sender().await else {
        warning!("Ignoring callback, login already completed");
        return (StatusCode::GONE, Html("<h4>Login already completed.</h4>")).into_response();
    };

    let result = handoff.complete(&params).await;
    let response = match &result {
        Ok(_) => Html("Login Completed!").into_response(),
        Err(AuthError::StateMismatch { .. }) => StatusCode::NOT_FOUND.into_response(),
        Err(_) => (StatusCode::FORBIDDEN, "Couldn't get token").into_response(),
    };

    // The flow only drops the receiver when it is already gone.
    let _ = sender.send(result);
    response
}

pub async fn fallback(uri: Uri) -> StatusCode {
    info!("Got request for: {}", uri);
    StatusCode::NOT_FOUND
}
