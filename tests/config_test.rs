use std::collections::HashMap;

use likesync::{
    config::{self, Settings, parse_batch_size},
    error::ConfigError,
};

fn settings_from(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Settings::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn test_defaults_apply_when_unset() {
    let settings = settings_from(&[("SPOTIFY_CLIENT_ID", "client")]).unwrap();

    assert_eq!(settings.client_id, "client");
    assert_eq!(settings.client_secret, None);
    assert_eq!(settings.redirect_uri, config::DEFAULT_REDIRECT_URI);
    assert_eq!(settings.port, 8080);
    assert_eq!(settings.playlist_name, config::DEFAULT_PLAYLIST_NAME);
    assert_eq!(settings.batch_size, 100);
    assert_eq!(settings.api_url, "https://api.spotify.com/v1");
    assert_eq!(settings.server_addr(), "127.0.0.1:8080");
    assert!(settings.scope.contains("user-library-read"));
    assert!(settings.scope.contains("playlist-modify-public"));
}

#[test]
fn test_values_from_environment_override_defaults() {
    let settings = settings_from(&[
        ("SPOTIFY_CLIENT_ID", "client"),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
        ("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:9000/callback"),
        ("LIKESYNC_PORT", "9000"),
        ("LIKESYNC_PLAYLIST", "Pauls Liked Songs"),
        ("LIKESYNC_BATCH_SIZE", "50"),
    ])
    .unwrap();

    assert_eq!(settings.client_secret.as_deref(), Some("secret"));
    assert_eq!(settings.redirect_uri, "http://127.0.0.1:9000/callback");
    assert_eq!(settings.port, 9000);
    assert_eq!(settings.playlist_name, "Pauls Liked Songs");
    assert_eq!(settings.batch_size, 50);
}

#[test]
fn test_missing_client_id_is_an_error() {
    let err = settings_from(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("SPOTIFY_CLIENT_ID")));

    // blank counts as unset
    let err = settings_from(&[("SPOTIFY_CLIENT_ID", "  ")]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
}

#[test]
fn test_blank_secret_means_pkce() {
    let settings =
        settings_from(&[("SPOTIFY_CLIENT_ID", "client"), ("SPOTIFY_CLIENT_SECRET", "")]).unwrap();

    assert!(settings.client_secret.is_none());
}

#[test]
fn test_invalid_port_is_an_error() {
    let err = settings_from(&[("SPOTIFY_CLIENT_ID", "client"), ("LIKESYNC_PORT", "http")])
        .unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { name: "LIKESYNC_PORT", .. }));
}

#[test]
fn test_invalid_batch_size_is_an_error() {
    for raw in ["0", "101", "many"] {
        let err = settings_from(&[("SPOTIFY_CLIENT_ID", "client"), ("LIKESYNC_BATCH_SIZE", raw)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LIKESYNC_BATCH_SIZE", .. }));
    }
}

#[test]
fn test_http_timeout_defaults_and_validates() {
    let settings = settings_from(&[("SPOTIFY_CLIENT_ID", "client")]).unwrap();
    assert_eq!(settings.http_timeout, std::time::Duration::from_secs(30));

    let settings =
        settings_from(&[("SPOTIFY_CLIENT_ID", "client"), ("LIKESYNC_HTTP_TIMEOUT", "5")]).unwrap();
    assert_eq!(settings.http_timeout, std::time::Duration::from_secs(5));

    for raw in ["0", "soon"] {
        let err = settings_from(&[("SPOTIFY_CLIENT_ID", "client"), ("LIKESYNC_HTTP_TIMEOUT", raw)])
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "LIKESYNC_HTTP_TIMEOUT", .. }));
    }
}

#[test]
fn test_parse_batch_size_bounds() {
    assert_eq!(parse_batch_size("1"), Ok(1));
    assert_eq!(parse_batch_size(" 100 "), Ok(100));
    assert!(parse_batch_size("0").is_err());
    assert!(parse_batch_size("101").is_err());
    assert!(parse_batch_size("-3").is_err());
}

#[test]
fn test_env_file_lives_in_likesync_directory() {
    let path = config::env_file_path();

    assert!(path.ends_with("likesync/.env"));
}

#[test]
fn test_port_follows_redirect_uri_when_unset() {
    let settings = settings_from(&[
        ("SPOTIFY_CLIENT_ID", "client"),
        ("SPOTIFY_REDIRECT_URI", "http://localhost:9000/callback"),
    ])
    .unwrap();

    assert_eq!(settings.port, 9000);
    assert_eq!(settings.server_addr(), "127.0.0.1:9000");
}

#[test]
fn test_redirect_uri_must_reach_the_callback_listener() {
    // wrong path
    let err = settings_from(&[
        ("SPOTIFY_CLIENT_ID", "client"),
        ("SPOTIFY_REDIRECT_URI", "http://localhost:9000/auth"),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "SPOTIFY_REDIRECT_URI", .. }));

    // port disagrees with the listener
    let err = settings_from(&[
        ("SPOTIFY_CLIENT_ID", "client"),
        ("SPOTIFY_REDIRECT_URI", "http://localhost:9000/callback"),
        ("LIKESYNC_PORT", "8080"),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "LIKESYNC_PORT", .. }));

    let err = settings_from(&[
        ("SPOTIFY_CLIENT_ID", "client"),
        ("SPOTIFY_REDIRECT_URI", "not a url"),
    ])
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "SPOTIFY_REDIRECT_URI", .. }));
}
