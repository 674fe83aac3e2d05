use tracing::{info, instrument};
use uuid::Uuid;

use super::{dto::SubmittedAssessment, repo_types::Assessment};
use crate::{error::AppError, scoring, scoring::model::AssessmentInput, state::AppState};

/// Scores the survey and stores input plus result under `user_id`.
#[instrument(skip(state, input))]
pub async fn submit(
    state: &AppState,
    user_id: Uuid,
    input: AssessmentInput,
) -> Result<SubmittedAssessment, AppError> {
    let result = scoring::assess(&input, state.estimator.as_ref()).await;
    let id = state.assessments.create(user_id, &input, &result).await?;
    info!(
        assessment_id = id,
        risk = %result.risk_score,
        model_version = %result.screening.model_version,
        "assessment stored"
    );
    Ok(SubmittedAssessment { id, result })
}

#[instrument(skip(state))]
pub async fn latest(state: &AppState, user_id: Uuid) -> Result<Assessment, AppError> {
    state
        .assessments
        .latest(user_id)
        .await?
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state))]
pub async fn by_id(state: &AppState, user_id: Uuid, id: i64) -> Result<Assessment, AppError> {
    state
        .assessments
        .get(user_id, id)
        .await?
        .ok_or(AppError::NotFound)
}

#[instrument(skip(state))]
pub async fn delete_all(state: &AppState, user_id: Uuid) -> Result<(), AppError> {
    let removed = state.assessments.delete_all(user_id).await?;
    info!(removed, "assessments deleted");
    Ok(())
}
