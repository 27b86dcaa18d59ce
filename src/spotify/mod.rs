//! # Spotify Integration Module
//!
//! Everything that talks to the Spotify Web API lives here. The reconciliation
//! code in [`crate::sync`] never sees HTTP: it works against the
//! [`CollectionClient`] trait, and [`SpotifyClient`] is the production
//! implementation of that trait.
//!
//! ## Submodules
//!
//! - [`auth`] - OAuth 2.0 authorization-code flow (client secret or PKCE),
//!   local callback hand-off and token exchange/refresh
//! - [`tracks`] - liked songs and playlist item pages
//! - [`playlist`] - playlist listing and membership mutations
//!
//! ## Rate limiting
//!
//! Every request goes through `SpotifyClient::send`, which honors
//! `429 Too Many Requests` with its `Retry-After` header (up to 120 seconds)
//! and retries `502 Bad Gateway` after a short pause. A request that is still
//! failing after [`MAX_RETRIES`] attempts is returned as an error to the caller.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    config::Settings,
    error::ClientError,
    types::{PlaylistSummary, Token, TrackId, TrackPage},
    warning,
};

pub mod auth;
pub mod playlist;
pub mod tracks;

pub const MAX_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 120;
const BAD_GATEWAY_PAUSE: Duration = Duration::from_secs(10);
/// Refresh this many seconds before the access token actually expires.
const TOKEN_EXPIRY_BUFFER_SECS: u64 = 240;

/// The remote capabilities the reconciliation needs.
///
/// `next_page` returns `Ok(None)` once the collection is exhausted, which is
/// the only non-error way a paginated read ends.
#[async_trait]
pub trait CollectionClient: Send + Sync {
    async fn liked_tracks_page(&self) -> Result<TrackPage, ClientError>;

    async fn playlist_tracks_page(&self, playlist_id: &str) -> Result<TrackPage, ClientError>;

    async fn next_page(&self, page: &TrackPage) -> Result<Option<TrackPage>, ClientError>;

    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, ClientError>;

    async fn add_tracks(&self, playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError>;

    async fn remove_tracks(&self, playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError>;
}

/// Authenticated Spotify Web API client.
pub struct SpotifyClient {
    http: Client,
    settings: Arc<Settings>,
    token: Mutex<Token>,
    bad_gateway_pause: Duration,
}

impl SpotifyClient {
    pub fn new(settings: Arc<Settings>, token: Token) -> Result<Self, ClientError> {
        let http = http_client(&settings)?;
        Ok(Self {
            http,
            settings,
            token: Mutex::new(token),
            bad_gateway_pause: BAD_GATEWAY_PAUSE,
        })
    }

    /// Overrides how long a `502 Bad Gateway` is waited out before retrying.
    pub fn with_bad_gateway_pause(mut self, pause: Duration) -> Self {
        self.bad_gateway_pause = pause;
        self
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_url.trim_end_matches('/'), path)
    }

    /// Returns a usable access token, refreshing it first when it is about to expire.
    async fn access_token(&self) -> Result<String, ClientError> {
        let mut token = self.token.lock().await;
        if is_expired(&token) {
            let refreshed =
                auth::refresh_token(&self.http, &self.settings, &token.refresh_token).await?;
            *token = refreshed;
        }
        Ok(token.access_token.clone())
    }

    /// Sends a request built by `build`, handling auth, rate limits and gateway errors.
    async fn send<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut attempt = 0;
        loop {
            let token = self.access_token().await?;
            let response = build(&self.http).bearer_auth(token).send().await?;
            let status = response.status();

            if status.is_success() {
                return Ok(response);
            }

            if status == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = retry_after_secs(&response);
                if retry_after > MAX_RETRY_AFTER_SECS || attempt >= MAX_RETRIES {
                    return Err(ClientError::RateLimited(retry_after));
                }
                warning!("Rate limited by Spotify, waiting {} seconds", retry_after);
                sleep(Duration::from_secs(retry_after)).await;
                attempt += 1;
                continue;
            }

            if status == StatusCode::BAD_GATEWAY && attempt < MAX_RETRIES {
                sleep(self.bad_gateway_pause).await;
                attempt += 1;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
    }

    async fn get_json<T, F>(&self, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let response = self.send(build).await?;
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CollectionClient for SpotifyClient {
    async fn liked_tracks_page(&self) -> Result<TrackPage, ClientError> {
        self.saved_tracks().await
    }

    async fn playlist_tracks_page(&self, playlist_id: &str) -> Result<TrackPage, ClientError> {
        self.playlist_items(playlist_id).await
    }

    async fn next_page(&self, page: &TrackPage) -> Result<Option<TrackPage>, ClientError> {
        match &page.next {
            Some(url) => self.track_page_at(url).await.map(Some),
            None => Ok(None),
        }
    }

    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, ClientError> {
        self.current_user_playlists().await
    }

    async fn add_tracks(&self, playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError> {
        self.add_items(playlist_id, ids).await
    }

    async fn remove_tracks(&self, playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError> {
        self.remove_items(playlist_id, ids).await
    }
}

/// HTTP client bounded by the configured request timeout.
pub fn http_client(settings: &Settings) -> Result<Client, ClientError> {
    Ok(Client::builder().timeout(settings.http_timeout).build()?)
}

pub fn is_expired(token: &Token) -> bool {
    let now = Utc::now().timestamp() as u64;
    now + TOKEN_EXPIRY_BUFFER_SECS >= token.obtained_at + token.expires_in
}

fn retry_after_secs(response: &Response) -> u64 {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(1)
}
