//! # Sync Module
//!
//! One-shot reconciliation of a playlist against the user's liked songs.
//!
//! ```text
//! AwaitingAuth → Authenticated → FetchingBoth → Reconciling → Applying → Done
//! ```
//!
//! The first two phases belong to the login in [`crate::cli`]; [`run`] takes
//! an authenticated [`CollectionClient`] and drives the rest:
//!
//! - [`fetch`] drains both paginated collections into track sets, concurrently
//! - [`reconcile`] diffs them into a [`ChangeSet`]
//! - [`apply`] sends the change set in bounded batches
//!
//! Fetch errors abort the run before anything is mutated. Batch errors are
//! logged and counted in the [`ApplyReport`], never returned.

use std::{fmt, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    error::{FetchFailure, SyncError},
    info,
    spotify::CollectionClient,
    types::{Collection, PlaylistSummary, TrackSet},
    warning,
};

pub mod apply;
pub mod fetch;
pub mod reconcile;

pub use apply::{ApplyReport, Direction, DirectionReport, apply};
pub use reconcile::{ChangeSet, reconcile};

/// Steps of one sync run, in order. Each is announced once through [`enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingAuth,
    Authenticated,
    FetchingBoth,
    Reconciling,
    Applying,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Phase::AwaitingAuth => "Waiting for Spotify login",
            Phase::Authenticated => "Logged in",
            Phase::FetchingBoth => "Fetching liked songs and playlist tracks",
            Phase::Reconciling => "Comparing liked songs with the playlist",
            Phase::Applying => "Updating the playlist",
            Phase::Done => "Done",
        };
        f.write_str(msg)
    }
}

/// Logs the transition into `phase`.
pub fn enter(phase: Phase) {
    info!("{}", phase);
}

/// Per-run knobs, resolved from [`crate::config::Settings`] and CLI flags.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// Exact name of the target playlist.
    pub playlist_name: String,
    /// Tracks per mutation call, `1..=100`.
    pub batch_size: usize,
    /// Stop after reconciling and leave the playlist untouched.
    pub dry_run: bool,
}

/// Everything a finished run learned and did.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The resolved target playlist.
    pub playlist: PlaylistSummary,
    /// Distinct liked tracks.
    pub liked_count: usize,
    /// Distinct tracks in the playlist before the run.
    pub playlist_count: usize,
    pub changes: ChangeSet,
    /// `None` for dry runs.
    pub report: Option<ApplyReport>,
}

/// Mirrors the liked songs into the playlist named in `options`.
///
/// Runs every phase after login: resolve the playlist, fetch both
/// collections, reconcile them and, unless `dry_run` is set, apply the
/// change set.
///
/// # Arguments
///
/// * `client` - Authenticated collection client
/// * `options` - Target playlist, batch size and dry-run flag
///
/// # Returns
///
/// A [`SyncOutcome`] once every phase ran. Batch failures are inside its
/// report. Playlist resolution, fetch errors and an invalid batch size are
/// returned as [`SyncError`] before anything is mutated.
///
/// # Example
///
/// ```
/// let options = SyncOptions {
///     playlist_name: "Liked Songs (public)".to_string(),
///     batch_size: 100,
///     dry_run: true,
/// };
/// let outcome = sync::run(&client, &options).await?;
/// info!("{} tracks would be added", outcome.changes.to_add.len());
/// ```
pub async fn run(
    client: &dyn CollectionClient,
    options: &SyncOptions,
) -> Result<SyncOutcome, SyncError> {
    let playlist = resolve_playlist(client, &options.playlist_name).await?;

    enter(Phase::FetchingBoth);
    let pb = spinner(format!("Fetching tracks for '{}'...", playlist.name));
    let fetched = fetch_both(client, &playlist.id).await;
    pb.finish_and_clear();
    let (liked, target) = fetched?;
    info!(
        "{} liked songs, {} tracks in '{}'",
        liked.len(),
        target.len(),
        playlist.name
    );

    enter(Phase::Reconciling);
    let changes = reconcile(&liked, &target);
    info!(
        "{} tracks to add, {} tracks to remove",
        changes.to_add.len(),
        changes.to_remove.len()
    );

    let report = if options.dry_run {
        None
    } else {
        enter(Phase::Applying);
        Some(apply(client, &playlist.id, &changes, options.batch_size).await?)
    };

    enter(Phase::Done);
    Ok(SyncOutcome {
        playlist,
        liked_count: liked.len(),
        playlist_count: target.len(),
        changes,
        report,
    })
}

/// Finds the playlist whose name matches exactly. The first match wins.
pub async fn resolve_playlist(
    client: &dyn CollectionClient,
    name: &str,
) -> Result<PlaylistSummary, SyncError> {
    let playlists = client
        .list_playlists()
        .await
        .map_err(SyncError::ListPlaylists)?;

    let mut matches = playlists.into_iter().filter(|p| p.name == name);
    let playlist = matches
        .next()
        .ok_or_else(|| SyncError::PlaylistNotFound(name.to_string()))?;

    let others = matches.count();
    if others > 0 {
        warning!(
            "{} more playlists are named '{}', using {}",
            others,
            name,
            playlist.id
        );
    }

    Ok(playlist)
}

/// Fetches liked songs and the playlist concurrently.
///
/// Both reads run to completion; when either fails every failure is returned.
pub async fn fetch_both(
    client: &dyn CollectionClient,
    playlist_id: &str,
) -> Result<(TrackSet, TrackSet), SyncError> {
    let (liked, target) = tokio::join!(
        fetch::fetch_liked(client),
        fetch::fetch_playlist(client, playlist_id)
    );

    match (liked, target) {
        (Ok(liked), Ok(target)) => Ok((liked, target)),
        (liked, target) => {
            let failures = [
                (Collection::LikedSongs, liked.err()),
                (Collection::Playlist, target.err()),
            ]
            .into_iter()
            .filter_map(|(collection, err)| {
                err.map(|source| FetchFailure { collection, source })
            })
            .collect();
            Err(SyncError::Fetch(failures))
        }
    }
}

fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}
