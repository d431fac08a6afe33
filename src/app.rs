use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, patch, post, put},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{AuthError, PasswordHasher, TokenIssuer};
use crate::config::AppConfig;
use crate::database::{Database, NoteRepository, UserRepository};
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::services::AccountService;

/// Everything a request handler can reach. Cheap to clone; the database
/// handle inside is shared, not duplicated.
#[derive(Debug, Clone)]
pub struct AppState {
    pub database: Database,
    pub accounts: AccountService,
    pub notes: NoteRepository,
    pub tokens: TokenIssuer,
}

impl AppState {
    pub fn new(config: &AppConfig, database: Database) -> Result<Self, AuthError> {
        let security = &config.security;
        let tokens = TokenIssuer::new(&security.jwt_secret, security.token_ttl_secs);
        let hasher = PasswordHasher::new(security.password_memory_kib, security.password_iterations)?;
        let pool = database.pool().clone();

        Ok(Self {
            accounts: AccountService::new(UserRepository::new(pool.clone()), hasher, tokens.clone()),
            notes: NoteRepository::new(pool),
            tokens,
            database,
        })
    }

    #[cfg(test)]
    pub async fn for_tests() -> Self {
        use crate::config::Environment;

        let mut config = AppConfig::preset(Environment::Development, "test-secret");
        config.security.password_memory_kib = 1024;
        config.security.password_iterations = 1;
        let database = Database::in_memory().await.expect("in-memory database");
        Self::new(&config, database).expect("test state")
    }
}

/// Full router: public auth routes, gated note routes, CORS and tracing
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        .merge(note_routes(state.clone()))
        .with_state(state)
        .layer(cors_layer(&config.security.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/auth/Signup", post(auth::signup))
        .route("/api/auth/Login", post(auth::login))
}

fn note_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::notes;

    Router::new()
        .route("/api/notes", get(notes::list).post(notes::create))
        .route("/api/notes/:id", put(notes::update).delete(notes::delete))
        .route("/api/notes/:id/pin", patch(notes::toggle_pin))
        .route("/api/notes/:id/archive", patch(notes::toggle_archive))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring unparseable CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Notes API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "auth": "/api/auth/Signup, /api/auth/Login (public)",
            "notes": "/api/notes[/:id[/pin|/archive]] (bearer token)",
            "health": "/health (public)"
        }
    }))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.database.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_ok() {
        let state = AppState::for_tests().await;
        let config = AppConfig::preset(crate::config::Environment::Development, "test-secret");
        let response = app(state, &config)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn note_routes_require_token() {
        let state = AppState::for_tests().await;
        let config = AppConfig::preset(crate::config::Environment::Development, "test-secret");
        let response = app(state, &config)
            .oneshot(Request::builder().uri("/api/notes").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
