//! Session repository implementation.
//!
//! Sessions are opaque bearer tokens with a fixed lifetime. The cleartext
//! token is handed out exactly once at creation; only its SHA256 hash is
//! stored, so a database leak does not leak live credentials.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres};
use tracing::debug;
use uuid::Uuid;

use noteum_core::defaults::{SESSION_LIFETIME_HOURS, SESSION_TOKEN_LENGTH};
use noteum_core::{Error, IssuedSession, Result, SessionRepository, User};

/// PostgreSQL implementation of SessionRepository.
pub struct PgSessionRepository {
    pool: Pool<Postgres>,
}

impl PgSessionRepository {
    /// Create a new PgSessionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically random session token.
    fn generate_token() -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..SESSION_TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a token using SHA256.
    fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create(&self, user_id: Uuid) -> Result<IssuedSession> {
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);
        let expires_at = Utc::now() + Duration::hours(SESSION_LIFETIME_HOURS);

        sqlx::query(
            r#"INSERT INTO session (id, user_id, token_hash, created_at_utc, expires_at_utc)
               VALUES ($1, $2, $3, NOW(), $4)"#,
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        debug!(
            subsystem = "db",
            component = "sessions",
            op = "create",
            user_id = %user_id,
            "Session opened"
        );

        Ok(IssuedSession {
            token,
            expires_at_utc: expires_at,
        })
    }

    async fn validate(&self, token: &str) -> Result<User> {
        let token_hash = Self::hash_token(token);

        let user = sqlx::query_as::<_, User>(
            r#"SELECT u.id, u.email, u.username, u.created_at_utc, u.updated_at_utc
               FROM session s
               JOIN app_user u ON u.id = s.user_id
               WHERE s.token_hash = $1 AND s.expires_at_utc > NOW()"#,
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::Unauthorized("You must be logged in".to_string()))?;

        Ok(user)
    }

    async fn revoke(&self, token: &str) -> Result<bool> {
        let token_hash = Self::hash_token(token);
        let result = sqlx::query("DELETE FROM session WHERE token_hash = $1")
            .bind(&token_hash)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn cleanup_expired(&self) -> Result<u64> {
        let result = sqlx::query("DELETE FROM session WHERE expires_at_utc <= NOW()")
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected();
        if removed > 0 {
            debug!(
                subsystem = "db",
                component = "sessions",
                op = "cleanup_expired",
                removed = removed,
                "Expired sessions removed"
            );
        }
        Ok(removed)
    }
}
