use crate::{
    error::ClientError,
    spotify::CollectionClient,
    types::{TrackPage, TrackSet},
};

/// Pre-sizing cap, `total` comes straight from the server.
const MAX_PRESIZE: usize = 10_000;

/// Drains a paginated collection, starting at `first`, into a [`TrackSet`].
///
/// Entries without an id (removed tracks, local files, episodes) are skipped
/// and duplicates collapse. Any error other than running out of pages aborts
/// the whole fetch: a partial set would make the sync remove tracks it never saw.
pub async fn fetch_track_set(
    client: &dyn CollectionClient,
    first: TrackPage,
) -> Result<TrackSet, ClientError> {
    let mut tracks = TrackSet::with_capacity((first.total as usize).min(MAX_PRESIZE));
    let mut page = first;

    loop {
        tracks.extend(page.tracks.iter().flatten().cloned());

        match client.next_page(&page).await? {
            Some(next) => page = next,
            None => break,
        }
    }

    Ok(tracks)
}

/// Every track in the user's liked songs.
pub async fn fetch_liked(client: &dyn CollectionClient) -> Result<TrackSet, ClientError> {
    let first = client.liked_tracks_page().await?;
    fetch_track_set(client, first).await
}

/// Every track currently in the playlist.
pub async fn fetch_playlist(
    client: &dyn CollectionClient,
    playlist_id: &str,
) -> Result<TrackSet, ClientError> {
    let first = client.playlist_tracks_page(playlist_id).await?;
    fetch_track_set(client, first).await
}
