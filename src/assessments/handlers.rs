use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::{
    dto::{SubmitAssessmentRequest, SubmittedAssessment},
    repo_types::Assessment,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

pub fn assessment_routes() -> Router<AppState> {
    Router::new()
        .route("/assessments", post(submit_assessment).delete(delete_assessments))
        .route("/assessments/latest", get(latest_assessment))
        .route("/assessments/:id", get(get_assessment))
}

#[instrument(skip_all)]
pub async fn submit_assessment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<SubmitAssessmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubmittedAssessment>), AppError> {
    let Json(payload) = payload?;
    let input = payload.validate()?;
    let created = services::submit(&state, user.id, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip_all)]
pub async fn latest_assessment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Assessment>, AppError> {
    Ok(Json(services::latest(&state, user.id).await?))
}

#[instrument(skip(state, user))]
pub async fn get_assessment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Assessment>, AppError> {
    let id: i64 = id
        .parse()
        .map_err(|_| AppError::validation("id", "Invalid id"))?;
    Ok(Json(services::by_id(&state, user.id, id).await?))
}

#[instrument(skip_all)]
pub async fn delete_assessments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<StatusCode, AppError> {
    services::delete_all(&state, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}
