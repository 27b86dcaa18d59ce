use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::login,
    config::Settings,
    error, info, success,
    sync::{self, SyncOptions, SyncOutcome},
    warning,
};

/// How many ids a dry run lists per direction before summarizing.
const DRY_RUN_PREVIEW: usize = 20;

pub async fn sync(settings: Arc<Settings>, options: SyncOptions, strict: bool, open_browser: bool) {
    let client = login(settings, open_browser).await;

    let outcome = match sync::run(&client, &options).await {
        Ok(outcome) => outcome,
        Err(e) => error!("Sync aborted: {}", e),
    };

    match &outcome.report {
        None => print_dry_run(&outcome),
        Some(report) => {
            println!("{}", Table::new(report.table_rows()));

            if report.is_complete() {
                success!("Sync Complete");
            } else if strict {
                error!(
                    "Sync finished with {} failed batches ({} tracks), '{}' is out of sync",
                    report.failed_batches(),
                    report.failed_tracks(),
                    outcome.playlist.name
                );
            } else {
                warning!(
                    "Sync finished with {} failed batches ({} tracks), '{}' is out of sync. Run again to retry.",
                    report.failed_batches(),
                    report.failed_tracks(),
                    outcome.playlist.name
                );
            }
        }
    }
}

fn print_dry_run(outcome: &SyncOutcome) {
    if outcome.changes.is_empty() {
        success!("'{}' already mirrors your liked songs", outcome.playlist.name);
        return;
    }

    for (label, ids) in [
        ("add", &outcome.changes.to_add),
        ("remove", &outcome.changes.to_remove),
    ] {
        for id in ids.iter().take(DRY_RUN_PREVIEW) {
            info!("would {} {}", label, id.uri());
        }
        if ids.len() > DRY_RUN_PREVIEW {
            info!("... and {} more to {}", ids.len() - DRY_RUN_PREVIEW, label);
        }
    }

    warning!(
        "Dry run, '{}' was not modified ({} changes pending)",
        outcome.playlist.name,
        outcome.changes.len()
    );
}
