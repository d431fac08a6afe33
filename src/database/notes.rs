use chrono::Utc;
use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::{Note, NoteFields};

const NOTE_COLUMNS: &str =
    "id, title, content, category, user_id, pinned, archived, created_at, updated_at";

/// Which boolean flag a toggle flips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NoteFlag {
    Pinned,
    Archived,
}

impl NoteFlag {
    fn column(self) -> &'static str {
        match self {
            NoteFlag::Pinned => "pinned",
            NoteFlag::Archived => "archived",
        }
    }
}

/// Note CRUD. Every statement touching a specific note matches on
/// `id AND user_id`, so another user's note looks exactly like a missing one.
#[derive(Debug, Clone)]
pub struct NoteRepository {
    pool: SqlitePool,
}

impl NoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All notes owned by `user_id`, in storage order
    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<Note>, DatabaseError> {
        let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = ?");
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(notes)
    }

    pub async fn create(&self, user_id: i64, fields: &NoteFields) -> Result<Note, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO notes (title, content, category, user_id, pinned, archived, created_at, updated_at) \
             VALUES (?, ?, ?, ?, 0, 0, ?, ?) RETURNING {NOTE_COLUMNS}"
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(&fields.title)
            .bind(&fields.content)
            .bind(&fields.category)
            .bind(user_id)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(note)
    }

    /// Overwrite title, content and category and bump `updated_at`
    pub async fn update(&self, note_id: i64, user_id: i64, fields: &NoteFields) -> Result<(), DatabaseError> {
        let result = sqlx::query(
            "UPDATE notes SET title = ?, content = ?, category = ?, updated_at = ? WHERE id = ? AND user_id = ?",
        )
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(&fields.category)
        .bind(Utc::now())
        .bind(note_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Self::expect_row(result.rows_affected(), note_id)
    }

    /// Flip a flag in a single statement; `updated_at` is left alone
    async fn toggle(&self, note_id: i64, user_id: i64, flag: NoteFlag) -> Result<(), DatabaseError> {
        let column = flag.column();
        let sql = format!(
            "UPDATE notes SET {column} = CASE WHEN {column} = 0 THEN 1 ELSE 0 END WHERE id = ? AND user_id = ?"
        );
        let result = sqlx::query(&sql)
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Self::expect_row(result.rows_affected(), note_id)
    }

    pub async fn toggle_pin(&self, note_id: i64, user_id: i64) -> Result<(), DatabaseError> {
        self.toggle(note_id, user_id, NoteFlag::Pinned).await
    }

    pub async fn toggle_archive(&self, note_id: i64, user_id: i64) -> Result<(), DatabaseError> {
        self.toggle(note_id, user_id, NoteFlag::Archived).await
    }

    pub async fn delete(&self, note_id: i64, user_id: i64) -> Result<(), DatabaseError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(note_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Self::expect_row(result.rows_affected(), note_id)
    }

    fn expect_row(rows_affected: u64, note_id: i64) -> Result<(), DatabaseError> {
        if rows_affected == 0 {
            return Err(DatabaseError::NotFound(format!("Note {} not found", note_id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, UserRepository};

    struct Fixture {
        notes: NoteRepository,
        alice: i64,
        bob: i64,
    }

    async fn fixture() -> Fixture {
        let db = Database::in_memory().await.unwrap();
        let users = UserRepository::new(db.pool().clone());
        let alice = users.insert("Alice", "alice@x.com", "h").await.unwrap();
        let bob = users.insert("Bob", "bob@x.com", "h").await.unwrap();
        Fixture {
            notes: NoteRepository::new(db.pool().clone()),
            alice,
            bob,
        }
    }

    fn fields(title: &str) -> NoteFields {
        NoteFields {
            title: title.to_string(),
            content: "body".to_string(),
            category: "misc".to_string(),
        }
    }

    async fn fetch(notes: &NoteRepository, user_id: i64, note_id: i64) -> Option<Note> {
        notes
            .list_for_user(user_id)
            .await
            .unwrap()
            .into_iter()
            .find(|n| n.id == note_id)
    }

    #[tokio::test]
    async fn create_sets_defaults() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("first")).await.unwrap();

        assert_eq!(note.title, "first");
        assert_eq!(note.user_id, f.alice);
        assert!(!note.pinned);
        assert!(!note.archived);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[tokio::test]
    async fn list_is_scoped_to_owner() {
        let f = fixture().await;
        f.notes.create(f.alice, &fields("a1")).await.unwrap();
        f.notes.create(f.alice, &fields("a2")).await.unwrap();
        f.notes.create(f.bob, &fields("b1")).await.unwrap();

        let titles: Vec<String> = f
            .notes
            .list_for_user(f.alice)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.title)
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_timestamp() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("old")).await.unwrap();

        let new_fields = NoteFields {
            title: "new".to_string(),
            content: "changed".to_string(),
            category: "work".to_string(),
        };
        f.notes.update(note.id, f.alice, &new_fields).await.unwrap();

        let updated = fetch(&f.notes, f.alice, note.id).await.unwrap();
        assert_eq!(updated.title, "new");
        assert_eq!(updated.content, "changed");
        assert_eq!(updated.category, "work");
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.created_at, note.created_at);
    }

    #[tokio::test]
    async fn update_by_other_owner_is_not_found() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("mine")).await.unwrap();

        let err = f.notes.update(note.id, f.bob, &fields("stolen")).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert_eq!(fetch(&f.notes, f.alice, note.id).await.unwrap().title, "mine");
    }

    #[tokio::test]
    async fn toggle_pin_twice_restores_value() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("pin me")).await.unwrap();

        f.notes.toggle_pin(note.id, f.alice).await.unwrap();
        let pinned = fetch(&f.notes, f.alice, note.id).await.unwrap();
        assert!(pinned.pinned);
        assert_eq!(pinned.updated_at, note.updated_at);

        f.notes.toggle_pin(note.id, f.alice).await.unwrap();
        assert!(!fetch(&f.notes, f.alice, note.id).await.unwrap().pinned);
    }

    #[tokio::test]
    async fn toggle_archive_twice_restores_value() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("archive me")).await.unwrap();

        f.notes.toggle_archive(note.id, f.alice).await.unwrap();
        let archived = fetch(&f.notes, f.alice, note.id).await.unwrap();
        assert!(archived.archived);
        assert!(!archived.pinned);

        f.notes.toggle_archive(note.id, f.alice).await.unwrap();
        assert!(!fetch(&f.notes, f.alice, note.id).await.unwrap().archived);
    }

    #[tokio::test]
    async fn toggles_by_other_owner_are_not_found() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("mine")).await.unwrap();

        assert!(matches!(
            f.notes.toggle_pin(note.id, f.bob).await,
            Err(DatabaseError::NotFound(_))
        ));
        assert!(matches!(
            f.notes.toggle_archive(note.id, f.bob).await,
            Err(DatabaseError::NotFound(_))
        ));
        let unchanged = fetch(&f.notes, f.alice, note.id).await.unwrap();
        assert!(!unchanged.pinned && !unchanged.archived);
    }

    #[tokio::test]
    async fn delete_missing_note_leaves_table_unchanged() {
        let f = fixture().await;
        f.notes.create(f.alice, &fields("keep")).await.unwrap();

        let err = f.notes.delete(9999, f.alice).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound(_)));
        assert_eq!(f.notes.list_for_user(f.alice).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn delete_is_owner_scoped() {
        let f = fixture().await;
        let note = f.notes.create(f.alice, &fields("mine")).await.unwrap();

        assert!(f.notes.delete(note.id, f.bob).await.is_err());
        f.notes.delete(note.id, f.alice).await.unwrap();
        assert!(f.notes.list_for_user(f.alice).await.unwrap().is_empty());
    }
}
