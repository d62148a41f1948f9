use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{AuthData, LoginRequest, PublicUser, SignupRequest},
        repo::StoreError,
        repo_types::User,
        validation::{validate_login, validate_signup},
    },
    error::AppError,
    state::AppState,
};

const SIGNUP_FAILED: &str = "Failed to create user";
const LOGIN_FAILED: &str = "Login failed";
const PROFILE_FAILED: &str = "Failed to retrieve profile";

pub async fn signup(state: &AppState, payload: SignupRequest) -> Result<AuthData, AppError> {
    let input = validate_signup(&payload).map_err(AppError::Validation)?;

    // Ensure email is not taken
    let existing = state
        .users
        .find_by_email(&input.email)
        .await
        .map_err(|e| AppError::unexpected(SIGNUP_FAILED, e))?;
    if existing.is_some() {
        warn!(email = %input.email, "email already registered");
        return Err(AppError::DuplicateEmail);
    }

    let hash = state
        .hasher
        .hash_blocking(input.password)
        .await
        .map_err(|e| AppError::unexpected(SIGNUP_FAILED, e))?;

    let user = match state.users.create(User::new(input.name, input.email, hash)).await {
        Ok(u) => u,
        Err(StoreError::DuplicateKey) => {
            warn!("email registered concurrently");
            return Err(AppError::DuplicateEmail);
        }
        Err(e) => return Err(AppError::unexpected(SIGNUP_FAILED, e)),
    };

    let token = state
        .keys
        .issue(user.id)
        .map_err(|e| AppError::unexpected(SIGNUP_FAILED, e))?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthData {
        user: user.into(),
        token,
    })
}

pub async fn login(state: &AppState, payload: LoginRequest) -> Result<AuthData, AppError> {
    let input = validate_login(&payload).map_err(AppError::Validation)?;

    let user = match state.users.find_by_email(&input.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %input.email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        }
        Err(e) => return Err(AppError::unexpected(LOGIN_FAILED, e)),
    };

    let ok = state
        .hasher
        .verify_blocking(input.password, user.password_hash.clone())
        .await
        .map_err(|e| AppError::unexpected(LOGIN_FAILED, e))?;
    if !ok {
        warn!(email = %input.email, user_id = %user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    let token = state
        .keys
        .issue(user.id)
        .map_err(|e| AppError::unexpected(LOGIN_FAILED, e))?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthData {
        user: user.into(),
        token,
    })
}

/// Re-fetches the record behind a verified token. A deleted user is treated as unauthorized.
pub async fn profile(state: &AppState, user_id: Uuid) -> Result<PublicUser, AppError> {
    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user.into()),
        Ok(None) => {
            warn!(user_id = %user_id, "token subject no longer exists");
            Err(AppError::Unauthorized("User not found"))
        }
        Err(e) => Err(AppError::unexpected(PROFILE_FAILED, e)),
    }
}
