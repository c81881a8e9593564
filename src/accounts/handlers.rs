use axum::{
    extract::{FromRef, State},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};

use crate::accounts::dto::{LoginRequest, RegisterRequest};
use crate::accounts::extractors::AuthUser;
use crate::accounts::jwt::JwtKeys;
use crate::accounts::repo::PgUserRepository;
use crate::accounts::service::AccountService;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/profile", get(profile))
}

fn service(state: &AppState) -> AccountService<PgUserRepository> {
    AccountService::new(PgUserRepository::new(state.db.clone()))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Response, ApiError> {
    let out = service(&state).register(payload).await?;
    info!(user_id = out.id, username = %out.username, "user registered");
    Ok(ApiResponse::created("user registered successfully", out))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let out = service(&state).login(payload, &keys).await?;
    info!("user logged in");
    Ok(ApiResponse::ok("login successful", out))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Response, ApiError> {
    let out = service(&state).get_profile(user_id).await?;
    Ok(ApiResponse::ok("profile retrieved", out))
}
