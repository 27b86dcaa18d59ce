use crate::{
    error::ClientError,
    spotify::SpotifyClient,
    types::{Paging, TrackItem, TrackPage},
};

/// Largest page `/me/tracks` serves.
const SAVED_TRACKS_LIMIT: &str = "50";
/// Largest page `/playlists/{id}/tracks` serves.
const PLAYLIST_ITEMS_LIMIT: &str = "100";
/// Only what the fetcher looks at. Spotify keeps the filter in `next` URLs.
const PLAYLIST_ITEM_FIELDS: &str = "items(track(id,type,is_local)),next,offset,total";

impl SpotifyClient {
    /// First page of the user's saved tracks (`GET /me/tracks`).
    pub async fn saved_tracks(&self) -> Result<TrackPage, ClientError> {
        let url = self.api_url("/me/tracks");
        let page: Paging<TrackItem> = self
            .get_json(|http| http.get(&url).query(&[("limit", SAVED_TRACKS_LIMIT)]))
            .await?;
        Ok(page.into())
    }

    /// First page of a playlist's items (`GET /playlists/{id}/tracks`).
    pub async fn playlist_items(&self, playlist_id: &str) -> Result<TrackPage, ClientError> {
        let url = self.api_url(&format!("/playlists/{}/tracks", playlist_id));
        let page: Paging<TrackItem> = self
            .get_json(|http| {
                http.get(&url).query(&[
                    ("limit", PLAYLIST_ITEMS_LIMIT),
                    ("fields", PLAYLIST_ITEM_FIELDS),
                ])
            })
            .await?;
        Ok(page.into())
    }

    /// Follows a `next` URL handed out by a previous page.
    pub async fn track_page_at(&self, url: &str) -> Result<TrackPage, ClientError> {
        let page: Paging<TrackItem> = self.get_json(|http| http.get(url)).await?;
        Ok(page.into())
    }
}
