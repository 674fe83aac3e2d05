use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{ProfileResponse, UpsertProfileRequest};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn profile_routes() -> Router<AppState> {
    Router::new().route(
        "/profile",
        get(get_profile).put(put_profile).delete(delete_profile),
    )
}

#[instrument(skip_all)]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ProfileResponse>, AppError> {
    let profile = state.profiles.get(user.id).await?;
    Ok(Json(ProfileResponse { profile }))
}

#[instrument(skip_all)]
pub async fn put_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<UpsertProfileRequest>, JsonRejection>,
) -> Result<Json<ProfileResponse>, AppError> {
    let Json(payload) = payload?;
    let update = payload.validate()?;
    let profile = state
        .profiles
        .upsert(user.id, update.full_name.as_deref(), update.email.as_deref())
        .await?;
    info!(user_id = %user.id, "profile saved");
    Ok(Json(ProfileResponse {
        profile: Some(profile),
    }))
}

#[instrument(skip_all)]
pub async fn delete_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, AppError> {
    state.profiles.delete(user.id).await?;
    info!(user_id = %user.id, "profile deleted");
    Ok(StatusCode::NO_CONTENT)
}
