use std::{collections::HashSet, fmt};

use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// OAuth token held in memory for the duration of one run.
///
/// Never written to disk. [`crate::spotify::SpotifyClient`] swaps it for a
/// refreshed one shortly before `obtained_at + expires_in`.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    /// Empty when Spotify issued none; the run then cannot outlive the access token.
    pub refresh_token: String,
    pub scope: String,
    /// Lifetime in seconds, as returned by the token endpoint.
    pub expires_in: u64,
    /// Unix timestamp (seconds) of the exchange or refresh.
    pub obtained_at: u64,
}

/// Opaque Spotify track id, e.g. `4uLU6hMCjMI75M1A2tKUQC`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(String);

impl TrackId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `spotify:track:<id>` form playlist mutations expect.
    pub fn uri(&self) -> String {
        format!("spotify:track:{}", self.0)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrackId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Membership of a collection. Order and duplicates are irrelevant to the sync.
pub type TrackSet = HashSet<TrackId>;

/// One page of a paginated track collection.
///
/// `tracks` keeps removed or unavailable entries as `None` so the fetcher can
/// skip them explicitly. `next` is the absolute URL of the following page.
#[derive(Debug, Clone, Default)]
pub struct TrackPage {
    pub tracks: Vec<Option<TrackId>>,
    pub next: Option<String>,
    pub offset: u32,
    pub total: u32,
}

/// Which side of the mirror a fetch was reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    LikedSongs,
    Playlist,
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::LikedSongs => f.write_str("liked songs"),
            Collection::Playlist => f.write_str("playlist tracks"),
        }
    }
}

/// A playlist as listed by `/me/playlists`, reduced to what the CLI shows.
///
/// The sync target is picked from these by exact `name` match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    /// Display name of the owner, or their user id when they have none.
    pub owner: String,
    pub public: bool,
    /// Number of items Spotify reports for the playlist.
    pub total: u32,
}

/// Row of the `playlists` command output.
#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub owner: String,
    pub public: String,
    pub tracks: u32,
}

/// Row of the per-direction batch report printed after a sync.
#[derive(Tabled)]
pub struct ApplyTableRow {
    pub direction: String,
    pub batches: usize,
    pub failed_batches: usize,
    pub tracks: usize,
    pub failed_tracks: usize,
}

// Spotify Web API payloads

/// Spotify's paging envelope. `next` is an absolute URL or `null` on the last page.
#[derive(Debug, Clone, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    pub next: Option<String>,
    #[serde(default)]
    pub offset: u32,
    #[serde(default)]
    pub total: u32,
}

/// Item of both `/me/tracks` and `/playlists/{id}/tracks`.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackItem {
    pub track: Option<TrackObject>,
}

/// The few track fields the fetcher requests.
#[derive(Debug, Clone, Deserialize)]
pub struct TrackObject {
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_local: bool,
}

impl TrackItem {
    /// Returns the track id, or `None` for removed tracks, local files and episodes.
    pub fn track_id(&self) -> Option<TrackId> {
        let track = self.track.as_ref()?;
        if track.is_local || track.kind.as_deref().is_some_and(|k| k != "track") {
            return None;
        }
        track.id.as_deref().map(TrackId::from)
    }
}

impl From<Paging<TrackItem>> for TrackPage {
    fn from(page: Paging<TrackItem>) -> Self {
        TrackPage {
            tracks: page.items.iter().map(TrackItem::track_id).collect(),
            next: page.next,
            offset: page.offset,
            total: page.total,
        }
    }
}

/// Entry of `/me/playlists`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimplifiedPlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub tracks: Option<PlaylistTracksRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistTracksRef {
    pub total: u32,
}

impl From<SimplifiedPlaylist> for PlaylistSummary {
    fn from(p: SimplifiedPlaylist) -> Self {
        PlaylistSummary {
            id: p.id,
            name: p.name,
            owner: p.owner.display_name.unwrap_or(p.owner.id),
            public: p.public.unwrap_or(false),
            total: p.tracks.map_or(0, |t| t.total),
        }
    }
}

/// Body of `POST /playlists/{id}/tracks`: `{"uris": ["spotify:track:…"]}`.
#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest {
    pub uris: Vec<String>,
}

/// Body of `DELETE /playlists/{id}/tracks`: `{"tracks": [{"uri": "spotify:track:…"}]}`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveTracksRequest {
    pub tracks: Vec<TrackUri>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackUri {
    pub uri: String,
}

/// Response of the token endpoint, for both code exchange and refresh.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
}
