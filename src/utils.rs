use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::TrackId;

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Anti-forgery value sent with the authorization request and checked on callback.
pub fn generate_state() -> String {
    random_alphanumeric(32)
}

/// Short human readable description of a batch for log lines.
pub fn describe_batch(ids: &[TrackId]) -> String {
    match (ids.first(), ids.len()) {
        (None, _) => "empty batch".to_string(),
        (Some(first), 1) => first.to_string(),
        (Some(first), n) => format!("{} and {} more", first, n - 1),
    }
}
