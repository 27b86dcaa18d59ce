use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::login,
    config::Settings,
    error,
    spotify::CollectionClient,
    types::PlaylistTableRow,
    warning,
};

pub async fn playlists(settings: Arc<Settings>, open_browser: bool) {
    let client = login(settings, open_browser).await;

    let mut playlists = match client.list_playlists().await {
        Ok(playlists) => playlists,
        Err(e) => error!("Failed to list playlists: {}", e),
    };

    if playlists.is_empty() {
        warning!("You have no playlists yet.");
        return;
    }

    playlists.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));

    let table_rows: Vec<PlaylistTableRow> = playlists
        .into_iter()
        .map(|p| PlaylistTableRow {
            name: p.name,
            owner: p.owner,
            public: if p.public { "yes" } else { "no" }.to_string(),
            tracks: p.total,
        })
        .collect();

    println!("{}", Table::new(table_rows));
}
