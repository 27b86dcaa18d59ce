//! Configuration management for likesync.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory. Variables already present in the process
//! environment win over the file. Everything is read once into [`Settings`]
//! at startup and never changes afterwards.

use std::{env, path::PathBuf, time::Duration};

use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:8080/callback";
pub const DEFAULT_PORT: u16 = 8080;
/// The only path the callback listener routes.
pub const CALLBACK_PATH: &str = "/callback";
pub const DEFAULT_PLAYLIST_NAME: &str = "Liked Songs (public)";
/// Spotify accepts at most 100 items per playlist mutation.
pub const MAX_BATCH_SIZE: usize = 100;
pub const DEFAULT_BATCH_SIZE: usize = MAX_BATCH_SIZE;
/// Seconds any single outbound HTTP request may take.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SCOPE: &str =
    "user-library-read playlist-read-private playlist-modify-public playlist-modify-private";

/// Loads environment variables from `likesync/.env` in the local data directory.
///
/// The directory is created when missing so users know where to put the
/// file. A missing `.env` is fine, the process environment alone may carry
/// every setting.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/likesync/.env`
/// - macOS: `~/Library/Application Support/likesync/.env`
/// - Windows: `%LOCALAPPDATA%/likesync/.env`
pub async fn load_env() -> Result<(), String> {
    let path = env_file_path();
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

/// Path of the `.env` file [`load_env`] reads, whether or not it exists.
pub fn env_file_path() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("likesync/.env");
    path
}

/// Immutable runtime settings.
///
/// Built once at startup and shared as `Arc<Settings>` by the login flow,
/// the callback server and the API client.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `SPOTIFY_CLIENT_ID`, required.
    pub client_id: String,
    /// `None` switches the authorization flow to PKCE.
    pub client_secret: Option<String>,
    /// Must end in [`CALLBACK_PATH`] and point at `port`.
    pub redirect_uri: String,
    /// Port the callback listener binds on `127.0.0.1`.
    pub port: u16,
    pub playlist_name: String,
    pub batch_size: usize,
    pub api_url: String,
    pub auth_url: String,
    pub token_url: String,
    pub scope: String,
    /// Upper bound for every request to Spotify, token exchange included.
    pub http_timeout: Duration,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads settings through `lookup`; empty values count as unset.
    ///
    /// Unset values fall back to the `DEFAULT_*` constants. The callback port
    /// defaults to the port of the redirect URI.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::Missing`] when `SPOTIFY_CLIENT_ID` is unset
    /// - [`ConfigError::Invalid`] for an unparsable port, batch size or timeout,
    ///   a redirect URI whose path is not [`CALLBACK_PATH`], or a port that
    ///   disagrees with the redirect URI
    ///
    /// # Example
    ///
    /// ```
    /// let settings = Settings::from_lookup(|name| match name {
    ///     "SPOTIFY_CLIENT_ID" => Some("my-client".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(settings.server_addr(), "127.0.0.1:8080");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let client_id = get("SPOTIFY_CLIENT_ID").ok_or(ConfigError::Missing("SPOTIFY_CLIENT_ID"))?;

        let redirect_uri =
            get("SPOTIFY_REDIRECT_URI").unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string());
        let uri_port = redirect_port(&redirect_uri)?;

        let port = match get("LIKESYNC_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "LIKESYNC_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => uri_port,
        };
        if port != uri_port {
            return Err(ConfigError::Invalid {
                name: "LIKESYNC_PORT",
                value: port.to_string(),
                reason: format!(
                    "SPOTIFY_REDIRECT_URI points at port {}, the callback listener would never see the redirect",
                    uri_port
                ),
            });
        }

        let batch_size = match get("LIKESYNC_BATCH_SIZE") {
            Some(raw) => parse_batch_size(&raw).map_err(|reason| ConfigError::Invalid {
                name: "LIKESYNC_BATCH_SIZE",
                value: raw.clone(),
                reason,
            })?,
            None => DEFAULT_BATCH_SIZE,
        };

        let http_timeout = match get("LIKESYNC_HTTP_TIMEOUT") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        name: "LIKESYNC_HTTP_TIMEOUT",
                        value: raw.clone(),
                        reason: "must be at least 1 second".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        name: "LIKESYNC_HTTP_TIMEOUT",
                        value: raw.clone(),
                        reason: e.to_string(),
                    });
                }
            },
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Settings {
            client_id,
            client_secret: get("SPOTIFY_CLIENT_SECRET"),
            redirect_uri,
            port,
            playlist_name: get("LIKESYNC_PLAYLIST")
                .unwrap_or_else(|| DEFAULT_PLAYLIST_NAME.to_string()),
            batch_size,
            api_url: get("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            auth_url: get("SPOTIFY_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_TOKEN_URL").unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            scope: get("SPOTIFY_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            http_timeout,
        })
    }

    /// Address the callback listener binds to.
    pub fn server_addr(&self) -> String {
        format!("127.0.0.1:{}", self.port)
    }
}

/// Port the redirect URI sends the browser to. The path must be [`CALLBACK_PATH`].
fn redirect_port(redirect_uri: &str) -> Result<u16, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: "SPOTIFY_REDIRECT_URI",
        value: redirect_uri.to_string(),
        reason,
    };

    let url = Url::parse(redirect_uri).map_err(|e| invalid(e.to_string()))?;
    if url.path() != CALLBACK_PATH {
        return Err(invalid(format!("path must be {}", CALLBACK_PATH)));
    }
    url.port_or_known_default()
        .ok_or_else(|| invalid("no port for this scheme".to_string()))
}

/// Parses a batch size in `1..=MAX_BATCH_SIZE`. Also used as a clap value parser.
pub fn parse_batch_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw.trim().parse().map_err(|e| format!("{}", e))?;
    if size == 0 || size > MAX_BATCH_SIZE {
        return Err(format!("must be between 1 and {}", MAX_BATCH_SIZE));
    }
    Ok(size)
}
