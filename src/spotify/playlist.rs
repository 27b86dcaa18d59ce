use crate::{
    error::ClientError,
    spotify::SpotifyClient,
    types::{
        AddTracksRequest, Paging, PlaylistSummary, RemoveTracksRequest, SimplifiedPlaylist,
        TrackId, TrackUri,
    },
};

const PLAYLISTS_LIMIT: &str = "50";

impl SpotifyClient {
    /// All playlists owned or followed by the current user, every page drained.
    ///
    /// Spotify occasionally returns `null` entries in this listing, those are dropped.
    pub async fn current_user_playlists(&self) -> Result<Vec<PlaylistSummary>, ClientError> {
        let url = self.api_url("/me/playlists");
        let mut page: Paging<Option<SimplifiedPlaylist>> = self
            .get_json(|http| http.get(&url).query(&[("limit", PLAYLISTS_LIMIT)]))
            .await?;

        let mut playlists = Vec::new();
        loop {
            playlists.extend(page.items.into_iter().flatten().map(PlaylistSummary::from));
            match page.next {
                Some(next) => page = self.get_json(|http| http.get(&next)).await?,
                None => break,
            }
        }

        Ok(playlists)
    }

    /// Appends tracks to a playlist (`POST /playlists/{id}/tracks`, max 100 per call).
    pub async fn add_items(&self, playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError> {
        let url = self.api_url(&format!("/playlists/{}/tracks", playlist_id));
        let body = AddTracksRequest {
            uris: ids.iter().map(TrackId::uri).collect(),
        };

        self.send(|http| http.post(&url).json(&body)).await?;
        Ok(())
    }

    /// Removes every occurrence of the tracks (`DELETE /playlists/{id}/tracks`, max 100 per call).
    pub async fn remove_items(
        &self,
        playlist_id: &str,
        ids: &[TrackId],
    ) -> Result<(), ClientError> {
        let url = self.api_url(&format!("/playlists/{}/tracks", playlist_id));
        let body = RemoveTracksRequest {
            tracks: ids.iter().map(|id| TrackUri { uri: id.uri() }).collect(),
        };

        self.send(|http| http.delete(&url).json(&body)).await?;
        Ok(())
    }
}
