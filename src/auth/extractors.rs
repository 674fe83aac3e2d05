use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use super::{cookie::read_auth_cookie, repo_types::User};
use crate::{error::AppError, state::AppState};

/// Pulls the raw token from `Authorization: Bearer <token>`, falling back to
/// the auth cookie.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| {
            let scheme = auth.get(..7)?;
            scheme
                .eq_ignore_ascii_case("bearer ")
                .then(|| auth[7..].trim().to_string())
        })
        .filter(|t| !t.is_empty());

    from_header.or_else(|| read_auth_cookie(headers))
}

/// Authenticated caller, resolved through the token store.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers).ok_or_else(|| {
            debug!("no credentials presented");
            AppError::Unauthorized
        })?;

        state
            .auth
            .verify(&token)
            .await?
            .map(AuthUser)
            .ok_or(AppError::Unauthorized)
    }
}
