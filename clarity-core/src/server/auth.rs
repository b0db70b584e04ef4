use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::auth::accounts::MISSING_FIELDS;
use crate::auth::{create_account, verify_credentials, AuthError, LoginRequest, SignupRequest};
use crate::error::ApiError;
use crate::store::User;

use super::extract::BearerClaims;
use super::AppState;

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: User,
}

fn reject_body(rejection: JsonRejection) -> ApiError {
    warn!(error = %rejection, "Rejected auth request body");
    ApiError::BadRequest(MISSING_FIELDS)
}

/// `POST /api/auth/signup`
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(request) = payload.map_err(reject_body)?;

    let result = match request.validate() {
        Ok(account) => create_account(state.store.as_ref(), account).await,
        Err(err) => Err(err),
    };
    let user = result.map_err(|err| match err {
        AuthError::Invalid(message) => ApiError::BadRequest(message),
        AuthError::DuplicateEmail(_) => ApiError::Conflict("Email already exists"),
        other => {
            error!(error = %other, "Signup error");
            ApiError::Internal("Failed to create account")
        }
    })?;

    let token = state.tokens.issue(&user).map_err(|err| {
        error!(error = %err, "Failed to issue token");
        ApiError::Internal("Failed to create account")
    })?;

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// `POST /api/auth/login`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(request) = payload.map_err(reject_body)?;
    let (email, password) = request
        .validate()
        .map_err(|_| ApiError::BadRequest(MISSING_FIELDS))?;

    let user = verify_credentials(state.store.as_ref(), &email, &password)
        .await
        .map_err(|err| {
            error!(error = %err, "Login error");
            ApiError::Internal("Failed to sign in")
        })?
        .ok_or(ApiError::Unauthorized("Invalid credentials"))?;

    let token = state.tokens.issue(&user).map_err(|err| {
        error!(error = %err, "Failed to issue token");
        ApiError::Internal("Failed to sign in")
    })?;

    Ok(Json(AuthResponse { user, token }))
}

/// `GET /api/auth/me`
pub async fn me(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .store
        .find_user_by_id(claims.user_id)
        .await
        .map_err(|err| {
            error!(error = %err, "Failed to load user");
            ApiError::Internal("Failed to load user")
        })?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(MeResponse { user }))
}
