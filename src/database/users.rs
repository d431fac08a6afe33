use sqlx::SqlitePool;

use crate::database::manager::DatabaseError;
use crate::database::models::User;

/// Persistence for user identity records
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Exact-match lookup by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    /// Insert a user with an already-hashed password and return the new id.
    ///
    /// A UNIQUE violation on `email` is reported as `DuplicateEmail`.
    pub async fn insert(&self, name: &str, email: &str, password_hash: &str) -> Result<i64, DatabaseError> {
        let result = sqlx::query("INSERT INTO users (name, email, password) VALUES (?, ?, ?)")
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .execute(&self.pool)
            .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DatabaseError::DuplicateEmail(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
