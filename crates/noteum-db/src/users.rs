//! User account repository implementation.

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use noteum_core::{CreateUserRequest, Error, Result, User, UserRepository};

/// Length of the per-user password salt.
const SALT_LENGTH: usize = 16;

/// PostgreSQL implementation of UserRepository.
pub struct PgUserRepository {
    pool: Pool<Postgres>,
}

impl PgUserRepository {
    /// Create a new PgUserRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Generate a random alphanumeric string.
    fn generate_salt() -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::thread_rng();
        (0..SALT_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CHARSET.len());
                CHARSET[idx] as char
            })
            .collect()
    }

    /// Hash a password with its salt using SHA256.
    fn hash_password(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a password against a stored salt and hash.
    fn verify_hash(salt: &str, password: &str, hash: &str) -> bool {
        Self::hash_password(salt, password) == hash
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, req: CreateUserRequest) -> Result<User> {
        let salt = Self::generate_salt();
        let hash = Self::hash_password(&salt, &req.password);
        let id = Uuid::now_v7();

        let user = sqlx::query_as::<_, User>(
            r#"INSERT INTO app_user (id, email, username, password_hash, password_salt,
                                     created_at_utc, updated_at_utc)
               VALUES ($1, LOWER($2), $3, $4, $5, NOW(), NOW())
               RETURNING id, email, username, created_at_utc, updated_at_utc"#,
        )
        .bind(id)
        .bind(req.email.trim())
        .bind(req.username.trim())
        .bind(&hash)
        .bind(&salt)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn fetch(&self, id: Uuid) -> Result<User> {
        sqlx::query_as::<_, User>(
            "SELECT id, email, username, created_at_utc, updated_at_utc
             FROM app_user WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("User {} not found", id)))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, created_at_utc, updated_at_utc
             FROM app_user WHERE email = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, username, created_at_utc, updated_at_utc
             FROM app_user WHERE username = $1",
        )
        .bind(username.trim())
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn email_taken(&self, email: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM app_user WHERE email = LOWER($1))")
            .bind(email.trim())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<bool, _>(0))
    }

    async fn username_taken(&self, username: &str) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM app_user WHERE username = $1)")
            .bind(username.trim())
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<bool, _>(0))
    }

    async fn verify_password(&self, email: &str, password: &str) -> Result<User> {
        // Uniform failure message: never reveal whether the email exists.
        let denied = || Error::Unauthorized("Invalid email or password".to_string());

        let row = sqlx::query(
            "SELECT id, email, username, password_hash, password_salt,
                    created_at_utc, updated_at_utc
             FROM app_user WHERE email = LOWER($1)",
        )
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(denied)?;

        let hash: String = row.get("password_hash");
        let salt: String = row.get("password_salt");
        if !Self::verify_hash(&salt, password, &hash) {
            return Err(denied());
        }

        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            username: row.get("username"),
            created_at_utc: row.get("created_at_utc"),
            updated_at_utc: row.get("updated_at_utc"),
        })
    }
}
