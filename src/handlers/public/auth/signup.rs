use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: &'static str,
    pub user_id: i64,
}

/// POST /api/auth/Signup - Register a user
///
/// Expected Input:
/// ```json
/// { "name": "string", "email": "string", "password": "string" }
/// ```
///
/// 201 `{ "message", "userId" }` on success; 400 when a field is missing or
/// empty, or the email is already registered.
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<SignupResponse> {
    let Json(payload) = payload?;

    let user_id = state
        .accounts
        .register(
            payload.name.as_deref().unwrap_or_default(),
            payload.email.as_deref().unwrap_or_default(),
            payload.password.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok(ApiResponse::created(SignupResponse {
        message: "User registered successfully",
        user_id,
    }))
}
