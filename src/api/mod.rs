//! # API Module
//!
//! HTTP endpoints served by the local listener while the user logs in.
//!
//! - [`callback`] - receives the OAuth redirect, verifies the anti-forgery
//!   `state`, exchanges the code and hands the token to the waiting flow
//! - [`health`] - liveness check returning the crate version
//! - [`fallback`] - logs and rejects every other path
//!
//! The hand-off between the callback and the waiting authorization flow is a
//! [`CallbackHandoff`]: a one-shot channel created by the flow and shared with
//! the router as an axum `Extension`. Only the first callback is served.

mod callback;
mod health;

pub use callback::{CallbackHandoff, callback, fallback};
pub use health::health;
