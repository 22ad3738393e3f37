//! Token lifecycle invariants that hold independent of the database: claim
//! shapes, type discrimination, tampering, and the stored-mirror equality
//! check that makes refresh tokens single-use.

use chrono::Utc;
use uuid::Uuid;

use account_service::models::User;
use account_service::security::jwt;

const SECRET: &str = "unit-test-secret";

fn user() -> User {
    User {
        id: Uuid::new_v4(),
        username: "alice".to_string(),
        email: "alice@example.com".to_string(),
        full_name: "Alice Example".to_string(),
        password_hash: "$argon2id$unused".to_string(),
        avatar_url: "https://media.example.com/avatars/alice.png".to_string(),
        cover_image_url: None,
        refresh_token: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn access_token_carries_identity_claims() {
    let u = user();
    let token = jwt::sign_access_token(SECRET, 900, &u).expect("sign");
    let claims = jwt::decode_access_token(SECRET, &token).expect("decode");

    assert_eq!(claims.sub, u.id.to_string());
    assert_eq!(claims.email, u.email);
    assert_eq!(claims.username, u.username);
    assert_eq!(claims.full_name, u.full_name);
}

#[test]
fn refresh_token_carries_subject_only() {
    let id = Uuid::new_v4();
    let token = jwt::sign_refresh_token(SECRET, 604800, id).expect("sign");
    let claims = jwt::decode_refresh_token(SECRET, &token).expect("decode");

    assert_eq!(claims.sub, id.to_string());
    assert_eq!(claims.token_type, jwt::TOKEN_TYPE_REFRESH);
}

#[test]
fn token_types_are_not_interchangeable() {
    let u = user();
    let access = jwt::sign_access_token(SECRET, 900, &u).expect("sign");
    let refresh = jwt::sign_refresh_token(SECRET, 604800, u.id).expect("sign");

    assert!(jwt::decode_refresh_token(SECRET, &access).is_err());
    assert!(jwt::decode_access_token(SECRET, &refresh).is_err());
}

#[test]
fn tampered_token_is_rejected() {
    let u = user();
    let token = jwt::sign_access_token(SECRET, 900, &u).expect("sign");

    // Flip a character inside the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().expect("non-empty token");
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    assert!(jwt::decode_access_token(SECRET, &tampered).is_err());
}

#[test]
fn stored_mirror_makes_refresh_tokens_single_use() {
    let mut u = user();

    let first = jwt::sign_refresh_token(SECRET, 604800, u.id).expect("sign");
    u.refresh_token = Some(first.clone());
    assert!(u.holds_refresh_token(&first));

    // Rotation overwrites the mirror; the old token no longer matches even
    // though its signature is still valid. A different ttl keeps the two
    // tokens distinct when signed within the same second.
    let second = jwt::sign_refresh_token(SECRET, 604900, u.id).expect("sign");
    u.refresh_token = Some(second.clone());
    assert!(jwt::decode_refresh_token(SECRET, &first).is_ok());
    assert!(!u.holds_refresh_token(&first));
    assert!(u.holds_refresh_token(&second));

    // Logout clears the mirror; nothing matches afterwards.
    u.refresh_token = None;
    assert!(!u.holds_refresh_token(&second));
}
