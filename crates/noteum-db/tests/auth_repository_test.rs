//! Integration tests for the user and session repositories.
//!
//! These tests require a running PostgreSQL with the noteum schema applied
//! (`DATABASE_URL`, defaulting to the local development database).

use noteum_core::{CreateUserRequest, Error, SessionRepository, UserRepository};
use noteum_db::test_fixtures::{test_database_url, unique_suffix};
use noteum_db::Database;

async fn connect() -> Database {
    Database::connect(&test_database_url())
        .await
        .expect("Failed to connect to database")
}

fn user_request(suffix: &str) -> CreateUserRequest {
    CreateUserRequest {
        email: format!("user-{}@example.com", suffix),
        username: format!("user_{}", suffix),
        password: "correcthorse".to_string(),
    }
}

#[tokio::test]
async fn test_create_user_and_verify_password() {
    let db = connect().await;
    let suffix = unique_suffix();
    let req = user_request(&suffix);

    let user = db.users.create(req.clone()).await.expect("create user");
    assert_eq!(user.email, req.email.to_lowercase());
    assert_eq!(user.username, req.username);

    let verified = db
        .users
        .verify_password(&req.email, "correcthorse")
        .await
        .expect("verify password");
    assert_eq!(verified.id, user.id);
}

#[tokio::test]
async fn test_verify_password_uniform_failure() {
    let db = connect().await;
    let suffix = unique_suffix();
    let req = user_request(&suffix);
    db.users.create(req.clone()).await.expect("create user");

    let wrong_password = db
        .users
        .verify_password(&req.email, "not-the-password")
        .await
        .unwrap_err();
    let unknown_email = db
        .users
        .verify_password("nobody@example.com", "whatever")
        .await
        .unwrap_err();

    // Same message either way: no existence oracle.
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_email_and_username_taken() {
    let db = connect().await;
    let suffix = unique_suffix();
    let req = user_request(&suffix);
    db.users.create(req.clone()).await.expect("create user");

    assert!(db.users.email_taken(&req.email).await.unwrap());
    assert!(db.users.username_taken(&req.username).await.unwrap());
    assert!(!db.users.email_taken("free@example.com").await.unwrap());
    assert!(!db.users.username_taken("free_username").await.unwrap());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let db = connect().await;
    let suffix = unique_suffix();
    let req = user_request(&suffix);
    db.users.create(req.clone()).await.expect("create user");

    let mut dup = req.clone();
    dup.username = format!("other_{}", suffix);
    let err = db.users.create(dup).await.unwrap_err();
    assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn test_session_roundtrip() {
    let db = connect().await;
    let suffix = unique_suffix();
    let user = db.users.create(user_request(&suffix)).await.unwrap();

    let issued = db.sessions.create(user.id).await.expect("open session");
    assert!(!issued.token.is_empty());
    assert!(issued.expires_at_utc > chrono::Utc::now());

    let resolved = db.sessions.validate(&issued.token).await.expect("validate");
    assert_eq!(resolved.id, user.id);

    assert!(db.sessions.revoke(&issued.token).await.unwrap());
    assert!(db.sessions.validate(&issued.token).await.is_err());
}

#[tokio::test]
async fn test_revoke_unknown_token_is_false() {
    let db = connect().await;
    assert!(!db.sessions.revoke("no-such-token").await.unwrap());
}

#[tokio::test]
async fn test_expired_session_is_rejected() {
    let db = connect().await;
    let suffix = unique_suffix();
    let user = db.users.create(user_request(&suffix)).await.unwrap();
    let issued = db.sessions.create(user.id).await.unwrap();

    // Force the session past its expiry.
    sqlx::query(
        "UPDATE session SET expires_at_utc = NOW() - INTERVAL '1 hour'
         WHERE token_hash = encode(sha256($1::bytea), 'hex')",
    )
    .bind(issued.token.as_bytes())
    .execute(db.pool())
    .await
    .expect("expire session");

    let err = db.sessions.validate(&issued.token).await.unwrap_err();
    assert!(matches!(err, Error::Unauthorized(_)));

    // Cleanup removes it.
    let removed = db.sessions.cleanup_expired().await.unwrap();
    assert!(removed >= 1);
}
