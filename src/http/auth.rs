//! Bearer credential handling
//!
//! Header: `Authorization: Bearer <token>`. The token is opaque here;
//! verification belongs to the identity collaborator, which answers with
//! the user id or nothing. A 401 tells the client to force
//! re-authentication.

use axum::http::{header, HeaderMap};

use crate::context::IdentityVerifier;
use crate::http::error::ApiError;

/// Pull the bearer token out of the request headers
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Resolve the verified user id for this request
pub async fn authenticate(
    identity: &dyn IdentityVerifier,
    headers: &HeaderMap,
) -> Result<i64, ApiError> {
    let token = bearer_token(headers).ok_or_else(ApiError::missing_credential)?;

    match identity.verify(token).await {
        Ok(Some(user_id)) => Ok(user_id),
        Ok(None) => Err(ApiError::invalid_credential()),
        Err(e) => Err(ApiError::from(e)),
    }
}
