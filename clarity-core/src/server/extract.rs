use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::debug;

use crate::auth::Claims;
use crate::error::ApiError;
use crate::identity::Identity;

use super::AppState;

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Acting identity: the token's user when a valid bearer token is present,
/// otherwise the demo identity configured on the server.
#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(token) = bearer_token(parts) {
            if let Some(claims) = state.tokens.verify(token) {
                return Ok(Identity::User {
                    id: claims.user_id,
                    email: claims.email,
                });
            }
            debug!("Invalid bearer token; acting as demo identity");
        }
        Ok(Identity::Demo {
            email: state.demo_email.clone(),
        })
    }
}

/// Claims of a required bearer token.
pub struct BearerClaims(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized("Missing token"))?;
        state
            .tokens
            .verify(token)
            .map(BearerClaims)
            .ok_or(ApiError::Unauthorized("Invalid token"))
    }
}
