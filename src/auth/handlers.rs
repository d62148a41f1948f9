use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::{
    auth::{
        dto::{AuthData, LoginRequest, ProfileData, SignupRequest},
        extractors::AuthUser,
        services,
    },
    error::AppError,
    response::Envelope,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
}

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/auth/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<AuthData>>), AppError> {
    let Json(payload) = payload.map_err(malformed)?;
    let data = services::signup(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok("User created successfully", data)),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Envelope<AuthData>>, AppError> {
    let Json(payload) = payload.map_err(malformed)?;
    let data = services::login(&state, payload).await?;
    Ok(Json(Envelope::ok("Login successful", data)))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Envelope<ProfileData>>, AppError> {
    let user = services::profile(&state, user_id).await?;
    Ok(Json(Envelope::ok(
        "Profile retrieved successfully",
        ProfileData { user },
    )))
}

fn malformed(rejection: JsonRejection) -> AppError {
    AppError::MalformedBody(rejection.body_text())
}
