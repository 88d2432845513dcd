//! Note repository implementation.
//!
//! Every query is author-scoped: a note belonging to a different user is
//! indistinguishable from a missing one, so no endpoint can be used as an
//! existence oracle for other users' data.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use noteum_core::defaults::{PAGE_LIMIT, PAGE_OFFSET};
use noteum_core::{
    note_preview, CreateNoteRequest, Error, ListNotesRequest, ListNotesResponse, Note,
    NoteRepository, NoteSummary, Result,
};

/// PostgreSQL implementation of NoteRepository.
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn insert(&self, author_id: Uuid, req: CreateNoteRequest) -> Result<Uuid> {
        let id = req.id.unwrap_or_else(Uuid::now_v7);

        sqlx::query(
            r#"INSERT INTO note (id, author_id, text, created_at_utc, updated_at_utc)
               VALUES ($1, $2, $3, NOW(), NOW())"#,
        )
        .bind(id)
        .bind(author_id)
        .bind(&req.text)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn fetch(&self, author_id: Uuid, id: Uuid) -> Result<Note> {
        sqlx::query_as::<_, Note>(
            "SELECT id, author_id, text, created_at_utc, updated_at_utc
             FROM note WHERE id = $1 AND author_id = $2",
        )
        .bind(id)
        .bind(author_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(Error::NoteNotFound(id))
    }

    async fn update_text(&self, author_id: Uuid, id: Uuid, text: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE note SET text = $3, updated_at_utc = NOW()
             WHERE id = $1 AND author_id = $2",
        )
        .bind(id)
        .bind(author_id)
        .bind(text)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, author_id: Uuid, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }
        Ok(())
    }

    async fn list(&self, author_id: Uuid, req: ListNotesRequest) -> Result<ListNotesResponse> {
        let limit = req.limit.unwrap_or(PAGE_LIMIT);
        let offset = req.offset.unwrap_or(PAGE_OFFSET);
        if limit <= 0 {
            return Err(Error::InvalidInput("limit must be >= 1".to_string()));
        }
        if offset < 0 {
            return Err(Error::InvalidInput("offset must be >= 0".to_string()));
        }

        let total: i64 = sqlx::query("SELECT COUNT(*) FROM note WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?
            .get(0);

        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, author_id, text, created_at_utc, updated_at_utc
             FROM note WHERE author_id = $1
             ORDER BY created_at_utc DESC, id DESC
             LIMIT $2 OFFSET $3",
        )
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let summaries = notes
            .into_iter()
            .map(|n| NoteSummary {
                id: n.id,
                preview: note_preview(&n.text),
                created_at_utc: n.created_at_utc,
                updated_at_utc: n.updated_at_utc,
            })
            .collect();

        Ok(ListNotesResponse {
            notes: summaries,
            total,
            limit,
            offset,
        })
    }

    async fn recent_for_author(&self, author_id: Uuid, limit: i64) -> Result<Vec<Note>> {
        let notes = sqlx::query_as::<_, Note>(
            "SELECT id, author_id, text, created_at_utc, updated_at_utc
             FROM note WHERE author_id = $1
             ORDER BY created_at_utc DESC, id DESC
             LIMIT $2",
        )
        .bind(author_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(notes)
    }

    async fn exists(&self, author_id: Uuid, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM note WHERE id = $1 AND author_id = $2)")
            .bind(id)
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get::<bool, _>(0))
    }
}
