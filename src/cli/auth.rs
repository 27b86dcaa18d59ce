use std::sync::Arc;

use crate::{
    config::Settings,
    error,
    spotify::{self, SpotifyClient},
    sync::{self, Phase},
};

/// Logs in through the browser and returns an authenticated client.
///
/// Every failure here is fatal for a one-shot run and exits the process.
pub async fn login(settings: Arc<Settings>, open_browser: bool) -> SpotifyClient {
    sync::enter(Phase::AwaitingAuth);
    let token = match spotify::auth::authorize(Arc::clone(&settings), open_browser).await {
        Ok(token) => token,
        Err(e) => error!("Authentication failed: {}", e),
    };
    sync::enter(Phase::Authenticated);

    match SpotifyClient::new(settings, token) {
        Ok(client) => client,
        Err(e) => error!("Cannot create Spotify client: {}", e),
    }
}
