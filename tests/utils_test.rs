use likesync::{types::TrackId, utils::*};

#[test]
fn test_generate_code_verifier() {
    let verifier = generate_code_verifier();

    assert_eq!(verifier.len(), 128);
    assert!(verifier.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(verifier, generate_code_verifier());
}

#[test]
fn test_generate_code_challenge() {
    // RFC 7636 appendix B
    let challenge = generate_code_challenge("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");

    assert_eq!(challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), 32);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_describe_batch() {
    assert_eq!(describe_batch(&[]), "empty batch");
    assert_eq!(describe_batch(&[TrackId::from("A")]), "A");
    assert_eq!(
        describe_batch(&[TrackId::from("A"), TrackId::from("B"), TrackId::from("C")]),
        "A and 2 more"
    );
}

#[test]
fn test_token_expiry_includes_refresh_buffer() {
    use likesync::{spotify::is_expired, types::Token};

    let now = chrono::Utc::now().timestamp() as u64;
    let token = |obtained_at: u64, expires_in: u64| Token {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        scope: String::new(),
        expires_in,
        obtained_at,
    };

    assert!(!is_expired(&token(now, 3600)));
    // inside the four minute buffer counts as expired
    assert!(is_expired(&token(now, 200)));
    assert!(is_expired(&token(now - 7200, 3600)));
}
