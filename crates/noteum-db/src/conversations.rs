//! Per-note conversation history repository implementation.
//!
//! Exchanges are append-only. `recent_for_note` returns the tail of the
//! conversation re-sorted oldest first, so prompt assembly can replay it
//! chronologically without a second sort.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use noteum_core::{ChatExchange, ConversationRepository, Result};

/// PostgreSQL implementation of ConversationRepository.
pub struct PgConversationRepository {
    pool: Pool<Postgres>,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn append(&self, note_id: Uuid, question: &str, response: &str) -> Result<Uuid> {
        let id = Uuid::now_v7();

        sqlx::query(
            r#"INSERT INTO note_conversation (id, note_id, question, response, created_at_utc)
               VALUES ($1, $2, $3, $4, NOW())"#,
        )
        .bind(id)
        .bind(note_id)
        .bind(question)
        .bind(response)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_for_note(&self, note_id: Uuid) -> Result<Vec<ChatExchange>> {
        let exchanges = sqlx::query_as::<_, ChatExchange>(
            "SELECT id, note_id, question, response, created_at_utc
             FROM note_conversation WHERE note_id = $1
             ORDER BY created_at_utc ASC, id ASC",
        )
        .bind(note_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(exchanges)
    }

    async fn recent_for_note(&self, note_id: Uuid, limit: i64) -> Result<Vec<ChatExchange>> {
        let mut exchanges = sqlx::query_as::<_, ChatExchange>(
            "SELECT id, note_id, question, response, created_at_utc
             FROM note_conversation WHERE note_id = $1
             ORDER BY created_at_utc DESC, id DESC
             LIMIT $2",
        )
        .bind(note_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        // The query returns newest-first; callers replay oldest-first.
        exchanges.reverse();
        Ok(exchanges)
    }

    async fn clear_for_note(&self, note_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM note_conversation WHERE note_id = $1")
            .bind(note_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_for_note(&self, note_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM note_conversation WHERE note_id = $1")
            .bind(note_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get(0))
    }
}
