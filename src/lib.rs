//! Liked Songs mirror for Spotify
//!
//! This library keeps a Spotify playlist in sync with the user's liked songs.
//! It logs in through the OAuth authorization-code flow, fetches both
//! collections page by page, diffs them and applies the difference in
//! batches that respect the Web API's per-call limits.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration loading from `.env` and the environment
//! - `error` - Error types
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client and the `CollectionClient` trait
//! - `sync` - Pagination, reconciliation and batch application
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use likesync::{config, sync};
//!
//! async fn mirror(client: &dyn likesync::spotify::CollectionClient) -> likesync::Res<()> {
//!     config::load_env().await?;
//!     let options = sync::SyncOptions {
//!         playlist_name: "Liked Songs (public)".to_string(),
//!         batch_size: 100,
//!         dry_run: false,
//!     };
//!     sync::run(client, &options).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod server;
pub mod spotify;
pub mod sync;
pub mod types;
pub mod utils;

/// Result alias for plumbing code that only reports errors.
///
/// Domain code returns the typed errors in [`error`]; `main` and the doc
/// examples box them through this alias.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a progress line prefixed with a blue `o`.
///
/// ```
/// info!("{} tracks to add", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red diagnostic to stderr and exits with status 1.
///
/// For the fatal cases of a one-shot run: failed login, failed fetch,
/// missing configuration. Code after it does not run.
///
/// ```
/// error!("Sync aborted: {}", e);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow warning for problems the run survives, such as a failed batch.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
