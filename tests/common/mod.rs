#![allow(dead_code)]

use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;
use likesync::{
    error::ClientError,
    spotify::CollectionClient,
    types::{PlaylistSummary, TrackId, TrackPage, TrackSet},
};

pub const PLAYLIST_ID: &str = "pl-target";
pub const PLAYLIST_NAME: &str = "Liked Songs (public)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Add(Vec<TrackId>),
    Remove(Vec<TrackId>),
}

/// In-memory `CollectionClient` with scripted pages and failures.
///
/// Pages of a collection are chained through `next` cursors of the form
/// `<collection>:<index>`.
#[derive(Default)]
pub struct FakeClient {
    liked: Vec<TrackPage>,
    playlist: Vec<TrackPage>,
    playlists: Vec<PlaylistSummary>,
    fail_liked_page: Option<usize>,
    fail_playlist_page: Option<usize>,
    fail_list_playlists: bool,
    fail_add_calls: HashSet<usize>,
    fail_remove_calls: HashSet<usize>,
    calls: Mutex<Vec<Call>>,
    page_requests: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self {
            playlists: vec![playlist(PLAYLIST_ID, PLAYLIST_NAME)],
            ..Default::default()
        }
    }

    pub fn with_liked(mut self, pages: Vec<Vec<Option<&str>>>) -> Self {
        self.liked = chain("liked", pages);
        self
    }

    pub fn with_playlist(mut self, pages: Vec<Vec<Option<&str>>>) -> Self {
        self.playlist = chain("playlist", pages);
        self
    }

    pub fn with_playlists(mut self, playlists: Vec<PlaylistSummary>) -> Self {
        self.playlists = playlists;
        self
    }

    pub fn failing_liked_page(mut self, index: usize) -> Self {
        self.fail_liked_page = Some(index);
        self
    }

    pub fn failing_playlist_page(mut self, index: usize) -> Self {
        self.fail_playlist_page = Some(index);
        self
    }

    pub fn failing_list_playlists(mut self) -> Self {
        self.fail_list_playlists = true;
        self
    }

    /// Makes the `n`th add call (0-based) fail.
    pub fn failing_add_call(mut self, n: usize) -> Self {
        self.fail_add_calls.insert(n);
        self
    }

    pub fn failing_remove_call(mut self, n: usize) -> Self {
        self.fail_remove_calls.insert(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn page_requests(&self) -> Vec<String> {
        self.page_requests.lock().unwrap().clone()
    }

    fn page(&self, collection: &str, index: usize) -> Result<TrackPage, ClientError> {
        self.page_requests
            .lock()
            .unwrap()
            .push(format!("{}:{}", collection, index));

        let (pages, fail) = match collection {
            "liked" => (&self.liked, self.fail_liked_page),
            _ => (&self.playlist, self.fail_playlist_page),
        };
        if fail == Some(index) {
            return Err(ClientError::Other(format!(
                "{} page {} unavailable",
                collection, index
            )));
        }
        Ok(pages.get(index).cloned().unwrap_or_default())
    }

    fn mutate(&self, call: Call) -> Result<(), ClientError> {
        let mut calls = self.calls.lock().unwrap();
        let (n, failing) = match &call {
            Call::Add(_) => (
                calls.iter().filter(|c| matches!(c, Call::Add(_))).count(),
                &self.fail_add_calls,
            ),
            Call::Remove(_) => (
                calls.iter().filter(|c| matches!(c, Call::Remove(_))).count(),
                &self.fail_remove_calls,
            ),
        };
        calls.push(call);
        if failing.contains(&n) {
            return Err(ClientError::Other(format!("mutation {} rejected", n)));
        }
        Ok(())
    }
}

#[async_trait]
impl CollectionClient for FakeClient {
    async fn liked_tracks_page(&self) -> Result<TrackPage, ClientError> {
        self.page("liked", 0)
    }

    async fn playlist_tracks_page(&self, playlist_id: &str) -> Result<TrackPage, ClientError> {
        assert_eq!(playlist_id, PLAYLIST_ID);
        self.page("playlist", 0)
    }

    async fn next_page(&self, page: &TrackPage) -> Result<Option<TrackPage>, ClientError> {
        let Some(next) = &page.next else {
            return Ok(None);
        };
        let (collection, index) = next.split_once(':').expect("fake cursor");
        self.page(collection, index.parse().expect("fake cursor index"))
            .map(Some)
    }

    async fn list_playlists(&self) -> Result<Vec<PlaylistSummary>, ClientError> {
        if self.fail_list_playlists {
            return Err(ClientError::Other("playlists unavailable".to_string()));
        }
        Ok(self.playlists.clone())
    }

    async fn add_tracks(&self, _playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError> {
        self.mutate(Call::Add(ids.to_vec()))
    }

    async fn remove_tracks(&self, _playlist_id: &str, ids: &[TrackId]) -> Result<(), ClientError> {
        self.mutate(Call::Remove(ids.to_vec()))
    }
}

fn chain(collection: &str, pages: Vec<Vec<Option<&str>>>) -> Vec<TrackPage> {
    let count = pages.len();
    let mut offset = 0;
    let total: usize = pages.iter().map(Vec::len).sum();

    pages
        .into_iter()
        .enumerate()
        .map(|(i, tracks)| {
            let page = TrackPage {
                next: (i + 1 < count).then(|| format!("{}:{}", collection, i + 1)),
                offset: offset as u32,
                total: total as u32,
                tracks: tracks.into_iter().map(|t| t.map(TrackId::from)).collect(),
            };
            offset += page.tracks.len();
            page
        })
        .collect()
}

pub fn playlist(id: &str, name: &str) -> PlaylistSummary {
    PlaylistSummary {
        id: id.to_string(),
        name: name.to_string(),
        owner: "paul".to_string(),
        public: true,
        total: 0,
    }
}

pub fn set(ids: &[&str]) -> TrackSet {
    ids.iter().map(|id| TrackId::from(*id)).collect()
}

pub fn ids(ids: &[&str]) -> Vec<TrackId> {
    ids.iter().map(|id| TrackId::from(*id)).collect()
}

/// `count` distinct ids `t000`, `t001`, ...
pub fn numbered(count: usize) -> Vec<TrackId> {
    (0..count).map(|i| TrackId::new(format!("t{:03}", i))).collect()
}
