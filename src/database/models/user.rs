use serde::Serialize;
use sqlx::FromRow;

/// Registered account. `password_hash` is the stored Argon2 PHC string,
/// never the plaintext, and is never serialized.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sqlx(rename = "password")]
    pub password_hash: String,
}
