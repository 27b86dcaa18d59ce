use std::sync::Arc;

use chrono::Utc;
use reqwest::Client;
use tokio::sync::oneshot;
use url::Url;

use crate::{
    api::CallbackHandoff,
    config::Settings,
    error::{AuthError, ClientError},
    info,
    server::start_callback_server,
    success,
    types::{Token, TokenResponse},
    utils,
};

/// Runs the OAuth 2.0 authorization-code flow and returns a fresh token.
///
/// 1. Generates the anti-forgery `state` (and a PKCE verifier when no client
///    secret is configured)
/// 2. Binds the local callback server, failing fast if the port is taken
/// 3. Opens the authorization URL in the browser, or prints it
/// 4. Waits for the callback handler to hand over the exchanged token
///
/// There is no timeout: without a callback this waits forever. The listener
/// is shut down once the hand-off completed.
pub async fn authorize(settings: Arc<Settings>, open_browser: bool) -> Result<Token, AuthError> {
    let state = utils::generate_state();
    let code_verifier = settings
        .client_secret
        .is_none()
        .then(utils::generate_code_verifier);

    let (sender, receiver) = oneshot::channel();
    let handoff = Arc::new(CallbackHandoff::new(
        state.clone(),
        code_verifier.clone(),
        Arc::clone(&settings),
        sender,
    )?);

    let server = start_callback_server(&settings.server_addr(), handoff).await?;

    let challenge = code_verifier.as_deref().map(utils::generate_code_challenge);
    let auth_url = authorize_url(&settings, &state, challenge.as_deref())?;

    if !open_browser || webbrowser::open(&auth_url).is_err() {
        info!(
            "Please log in to Spotify by visiting the following page in your browser:\n{}",
            auth_url
        );
    }

    let result = receiver.await.map_err(|_| AuthError::ChannelClosed);
    server.abort();

    let token = result??;
    success!("Authentication successful!");
    Ok(token)
}

/// Builds the Spotify authorization URL with every parameter percent-encoded.
pub fn authorize_url(
    settings: &Settings,
    state: &str,
    code_challenge: Option<&str>,
) -> Result<String, ClientError> {
    let mut params = vec![
        ("client_id", settings.client_id.as_str()),
        ("response_type", "code"),
        ("redirect_uri", settings.redirect_uri.as_str()),
        ("scope", settings.scope.as_str()),
        ("state", state),
    ];
    if let Some(challenge) = code_challenge {
        params.push(("code_challenge_method", "S256"));
        params.push(("code_challenge", challenge));
    }

    let url = Url::parse_with_params(&settings.auth_url, &params)?;
    Ok(url.into())
}

/// Exchanges an authorization code for an access token.
///
/// Uses HTTP basic auth with the client secret when one is configured,
/// otherwise proves possession of the PKCE `verifier`.
pub async fn exchange_code(
    http: &Client,
    settings: &Settings,
    code: &str,
    verifier: Option<&str>,
) -> Result<Token, ClientError> {
    let mut form = vec![
        ("grant_type", "authorization_code"),
        ("code", code),
        ("redirect_uri", settings.redirect_uri.as_str()),
        ("client_id", settings.client_id.as_str()),
    ];
    if let Some(verifier) = verifier {
        form.push(("code_verifier", verifier));
    }

    let res = request_token(http, settings, &form).await?;
    Ok(Token {
        access_token: res.access_token,
        refresh_token: res.refresh_token.unwrap_or_default(),
        scope: res.scope,
        expires_in: res.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// Trades a refresh token for a new access token.
///
/// Spotify may or may not rotate the refresh token; the old one is kept when
/// the response carries none.
pub async fn refresh_token(
    http: &Client,
    settings: &Settings,
    refresh_token: &str,
) -> Result<Token, ClientError> {
    if refresh_token.is_empty() {
        return Err(ClientError::Refresh(
            "access token expired and no refresh token was issued".to_string(),
        ));
    }

    let form = [
        ("grant_type", "refresh_token"),
        ("refresh_token", refresh_token),
        ("client_id", settings.client_id.as_str()),
    ];

    let res = request_token(http, settings, &form)
        .await
        .map_err(|e| ClientError::Refresh(e.to_string()))?;

    info!("Access token refreshed");
    Ok(Token {
        access_token: res.access_token,
        refresh_token: res
            .refresh_token
            .unwrap_or_else(|| refresh_token.to_string()),
        scope: res.scope,
        expires_in: res.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

async fn request_token(
    http: &Client,
    settings: &Settings,
    form: &[(&str, &str)],
) -> Result<TokenResponse, ClientError> {
    let mut request = http.post(&settings.token_url).form(form);
    if let Some(secret) = &settings.client_secret {
        request = request.basic_auth(&settings.client_id, Some(secret));
    }

    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status { status, body });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
