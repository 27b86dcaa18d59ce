//! # CLI Module
//!
//! User-facing commands. Each command logs in first (nothing is cached
//! between runs), then delegates to [`crate::sync`] or the Spotify client and
//! renders the result.
//!
//! - [`sync`] - mirror liked songs into the target playlist
//! - [`playlists`] - list the user's playlists, handy to pick a target name
//! - [`login`] - shared browser login used by both

mod auth;
mod playlists;
mod sync;

pub use auth::login;
pub use playlists::playlists;
pub use sync::sync;
