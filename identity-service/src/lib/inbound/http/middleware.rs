use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use thiserror::Error;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "bearer";

/// Identity decoded from a verified token, stored in request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Reasons the gate turns a request away.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// No bearer token was presented.
    #[error("Access denied")]
    AccessDenied,

    /// A token was presented but did not verify.
    #[error("Invalid token")]
    InvalidToken,
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::AccessDenied => ApiError::Unauthorized(err.to_string()),
            AccessError::InvalidToken => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Middleware that admits a request only with a valid bearer token.
///
/// Missing token is 401, a token that fails verification is 400. On success
/// the caller's [`AuthenticatedUser`] is attached to the request.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(req.headers())?;
    let user_id = verify_token(&state, token)?;

    req.extensions_mut().insert(AuthenticatedUser { user_id });

    Ok(next.run(req).await)
}

fn verify_token(state: &AppState, token: &str) -> Result<UserId, AccessError> {
    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        AccessError::InvalidToken
    })?;

    let subject = claims.subject().ok_or_else(|| {
        tracing::warn!("Token carries no subject");
        AccessError::InvalidToken
    })?;

    UserId::from_string(subject).map_err(|e| {
        tracing::warn!(error = %e, "Token subject is not a user id");
        AccessError::InvalidToken
    })
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// An absent header, another scheme, or an empty token all count as no token.
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AccessError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AccessError::AccessDenied)?;

    let (scheme, token) = value
        .trim()
        .split_once(' ')
        .ok_or(AccessError::AccessDenied)?;

    let token = token.trim();
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) || token.is_empty() {
        return Err(AccessError::AccessDenied);
    }

    Ok(token)
}
