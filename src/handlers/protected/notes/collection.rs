use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use super::NoteRequest;
use crate::app::AppState;
use crate::database::models::{Note, NoteFields};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/notes - All of the caller's notes, in storage order
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<Note>> {
    let notes = state.notes.list_for_user(user.user_id).await?;
    Ok(ApiResponse::success(notes))
}

/// POST /api/notes - Create a note owned by the caller
///
/// Responds 201 with the stored note, which carries at least
/// `id`, `title`, `content` and `category`.
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Note> {
    let Json(payload) = payload?;
    let fields = NoteFields::try_from(payload)?;

    let note = state.notes.create(user.user_id, &fields).await?;
    tracing::debug!(note_id = note.id, user_id = user.user_id, "Note created");

    Ok(ApiResponse::created(note))
}
