//! Integration tests for per-note conversation history.

use noteum_core::{
    ConversationRepository, CreateNoteRequest, CreateUserRequest, NoteRepository, UserRepository,
};
use noteum_db::test_fixtures::{test_database_url, unique_suffix};
use noteum_db::Database;
use uuid::Uuid;

async fn connect() -> Database {
    Database::connect(&test_database_url())
        .await
        .expect("Failed to connect to database")
}

async fn create_note(db: &Database) -> (Uuid, Uuid) {
    let suffix = unique_suffix();
    let author = db
        .users
        .create(CreateUserRequest {
            email: format!("conv-{}@example.com", suffix),
            username: format!("conv_{}", suffix),
            password: "correcthorse".to_string(),
        })
        .await
        .expect("create user")
        .id;
    let note_id = db
        .notes
        .insert(
            author,
            CreateNoteRequest {
                id: None,
                text: "conversation target".to_string(),
            },
        )
        .await
        .expect("create note");
    (author, note_id)
}

#[tokio::test]
async fn test_append_and_list_in_creation_order() {
    let db = connect().await;
    let (_, note_id) = create_note(&db).await;

    for i in 0..3 {
        db.conversations
            .append(note_id, &format!("q{}", i), &format!("r{}", i))
            .await
            .unwrap();
    }

    let history = db.conversations.list_for_note(note_id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].question, "q0");
    assert_eq!(history[2].question, "q2");
    assert_eq!(db.conversations.count_for_note(note_id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_recent_for_note_returns_tail_oldest_first() {
    let db = connect().await;
    let (_, note_id) = create_note(&db).await;

    for i in 0..5 {
        db.conversations
            .append(note_id, &format!("q{}", i), &format!("r{}", i))
            .await
            .unwrap();
    }

    let tail = db.conversations.recent_for_note(note_id, 2).await.unwrap();
    assert_eq!(tail.len(), 2);
    // Last two exchanges, replayed chronologically.
    assert_eq!(tail[0].question, "q3");
    assert_eq!(tail[1].question, "q4");
}

#[tokio::test]
async fn test_clear_for_note() {
    let db = connect().await;
    let (_, note_id) = create_note(&db).await;

    db.conversations.append(note_id, "q", "r").await.unwrap();
    db.conversations.append(note_id, "q2", "r2").await.unwrap();

    let removed = db.conversations.clear_for_note(note_id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(db.conversations.list_for_note(note_id).await.unwrap().is_empty());

    // Clearing an empty conversation is a no-op.
    assert_eq!(db.conversations.clear_for_note(note_id).await.unwrap(), 0);
}

#[tokio::test]
async fn test_deleting_note_cascades_to_conversation() {
    let db = connect().await;
    let (author, note_id) = create_note(&db).await;

    db.conversations.append(note_id, "q", "r").await.unwrap();
    db.notes.delete(author, note_id).await.unwrap();

    assert_eq!(db.conversations.count_for_note(note_id).await.unwrap(), 0);
}
