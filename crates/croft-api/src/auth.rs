//! Bearer-token extractor and standalone verifier.
//!
//! Token issuance is out of scope: the server is configured with an argon2
//! hash of a single shared token and merely answers yes or no per request.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};

use crate::{AppState, error::ApiError};
use croft_core::store::HerdStore;

/// Credentials accepted as valid for this server instance.
#[derive(Clone)]
pub struct AuthConfig {
  /// PHC string produced by argon2 over the API token,
  /// e.g. `$argon2id$v=19$…`
  pub token_hash: String,
}

/// Zero-size marker: present in a handler means the request was
/// authenticated. As a parts extractor it runs before any body extractor,
/// so unauthenticated requests are rejected without reading the payload.
pub struct Authenticated;

/// Verify the bearer token directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<(), ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let token = header_val
    .strip_prefix("Bearer ")
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&config.token_hash).map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(token.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(())
}

impl<S> FromRequestParts<AppState<S>> for Authenticated
where
  S: HerdStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)?;
    Ok(Authenticated)
  }
}
