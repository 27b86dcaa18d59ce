use std::fmt;

use crate::{
    config::MAX_BATCH_SIZE,
    error::SyncError,
    spotify::CollectionClient,
    sync::ChangeSet,
    types::{ApplyTableRow, TrackId},
    utils, warning,
};

/// Which list of a [`ChangeSet`] a batch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Liked but missing from the playlist.
    Add,
    /// In the playlist but no longer liked.
    Remove,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Add => f.write_str("add"),
            Direction::Remove => f.write_str("remove"),
        }
    }
}

/// Outcome of the batches sent in one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectionReport {
    /// Calls attempted, successful or not.
    pub batches: usize,
    pub failed_batches: usize,
    pub tracks: usize,
    pub failed_tracks: usize,
}

/// What [`apply`] did with a change set.
///
/// A report with failed batches is still a finished run: the failures were
/// already logged, and the caller decides whether they make the run fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    pub added: DirectionReport,
    pub removed: DirectionReport,
}

impl ApplyReport {
    /// Failed batches across both directions.
    pub fn failed_batches(&self) -> usize {
        self.added.failed_batches + self.removed.failed_batches
    }

    /// Tracks that were part of a failed batch, across both directions.
    pub fn failed_tracks(&self) -> usize {
        self.added.failed_tracks + self.removed.failed_tracks
    }

    /// Total mutation calls made against the remote playlist.
    pub fn calls(&self) -> usize {
        self.added.batches + self.removed.batches
    }

    /// True when every batch was accepted, i.e. the playlist now mirrors the liked songs.
    pub fn is_complete(&self) -> bool {
        self.failed_batches() == 0
    }

    /// One row per direction, additions first, for printing with `tabled`.
    pub fn table_rows(&self) -> Vec<ApplyTableRow> {
        [(Direction::Add, &self.added), (Direction::Remove, &self.removed)]
            .into_iter()
            .map(|(direction, r)| ApplyTableRow {
                direction: direction.to_string(),
                batches: r.batches,
                failed_batches: r.failed_batches,
                tracks: r.tracks,
                failed_tracks: r.failed_tracks,
            })
            .collect()
    }
}

/// Applies a change set to a playlist in batches of at most `batch_size` tracks.
///
/// Additions go first, then removals, each list in its own order and strictly
/// one call at a time. A failing batch is logged and skipped; this returns
/// once every batch has been attempted. Only an out of range `batch_size` is
/// reported as an error, and then nothing is sent.
///
/// # Arguments
///
/// * `client` - Authenticated collection client
/// * `playlist_id` - Spotify id of the playlist to mutate
/// * `changes` - Result of `reconcile`
/// * `batch_size` - Tracks per call, `1..=MAX_BATCH_SIZE`
///
/// # Returns
///
/// An [`ApplyReport`] counting sent and failed batches per direction, or
/// [`SyncError::InvalidBatchSize`].
///
/// # Example
///
/// ```
/// let changes = sync::reconcile(&liked, &in_playlist);
/// let report = sync::apply(&client, &playlist.id, &changes, 100).await?;
/// if !report.is_complete() {
///     warning!("{} tracks were not synced", report.failed_tracks());
/// }
/// ```
pub async fn apply(
    client: &dyn CollectionClient,
    playlist_id: &str,
    changes: &ChangeSet,
    batch_size: usize,
) -> Result<ApplyReport, SyncError> {
    if batch_size == 0 || batch_size > MAX_BATCH_SIZE {
        return Err(SyncError::InvalidBatchSize {
            got: batch_size,
            max: MAX_BATCH_SIZE,
        });
    }

    let added = apply_direction(
        client,
        playlist_id,
        Direction::Add,
        &changes.to_add,
        batch_size,
    )
    .await;
    let removed = apply_direction(
        client,
        playlist_id,
        Direction::Remove,
        &changes.to_remove,
        batch_size,
    )
    .await;

    Ok(ApplyReport { added, removed })
}

async fn apply_direction(
    client: &dyn CollectionClient,
    playlist_id: &str,
    direction: Direction,
    ids: &[TrackId],
    batch_size: usize,
) -> DirectionReport {
    let mut report = DirectionReport::default();
    let count = ids.len().div_ceil(batch_size);

    for (index, batch) in ids.chunks(batch_size).enumerate() {
        report.batches += 1;

        let result = match direction {
            Direction::Add => client.add_tracks(playlist_id, batch).await,
            Direction::Remove => client.remove_tracks(playlist_id, batch).await,
        };

        match result {
            Ok(()) => report.tracks += batch.len(),
            Err(e) => {
                report.failed_batches += 1;
                report.failed_tracks += batch.len();
                warning!(
                    "Failed to {} batch {}/{} ({} tracks, {}): {}",
                    direction,
                    index + 1,
                    count,
                    batch.len(),
                    utils::describe_batch(batch),
                    e
                );
            }
        }
    }

    report
}
