// handlers/protected/notes/mod.rs - Note management (bearer token required)
//
// Every handler receives the caller's `AuthUser` from the JWT gate and passes
// its id down, so each repository call is owner-scoped.

pub mod collection; // GET/POST /api/notes
pub mod record;     // PUT/DELETE /api/notes/:id, PATCH .../pin and .../archive

pub use collection::{create, list};
pub use record::{delete, toggle_archive, toggle_pin, update};

use serde::Deserialize;

use crate::database::models::NoteFields;
use crate::error::ApiError;

/// Body of create and update. Fields are optional here so a missing one
/// becomes our 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct NoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
}

impl TryFrom<NoteRequest> for NoteFields {
    type Error = ApiError;

    fn try_from(request: NoteRequest) -> Result<Self, Self::Error> {
        match (request.title, request.content, request.category) {
            (Some(title), Some(content), Some(category)) if !title.trim().is_empty() => {
                Ok(NoteFields { title, content, category })
            }
            _ => Err(ApiError::validation_error(
                "Title, content, and category are required.",
            )),
        }
    }
}
