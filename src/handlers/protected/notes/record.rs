use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};

use super::NoteRequest;
use crate::app::AppState;
use crate::database::models::NoteFields;
use crate::middleware::{ApiResult, AuthUser, Message};

/// PUT /api/notes/:id - Overwrite title, content and category
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    note_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> ApiResult<Message> {
    let Path(note_id) = note_id?;
    let Json(payload) = payload?;
    let fields = NoteFields::try_from(payload)?;

    state.notes.update(note_id, user.user_id, &fields).await?;
    Ok(Message::ok("Note updated successfully"))
}

/// PATCH /api/notes/:id/pin - Flip the pinned flag
pub async fn toggle_pin(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    note_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(note_id) = note_id?;

    state.notes.toggle_pin(note_id, user.user_id).await?;
    Ok(Message::ok("Pin status updated successfully"))
}

/// PATCH /api/notes/:id/archive - Flip the archived flag
pub async fn toggle_archive(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    note_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(note_id) = note_id?;

    state.notes.toggle_archive(note_id, user.user_id).await?;
    Ok(Message::ok("Archive status updated successfully"))
}

/// DELETE /api/notes/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    note_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Message> {
    let Path(note_id) = note_id?;

    state.notes.delete(note_id, user.user_id).await?;
    tracing::debug!(note_id, user_id = user.user_id, "Note deleted");
    Ok(Message::ok("Note deleted successfully"))
}
