//! Screening pipeline: rule engine first, then the estimator refines the
//! probability, with a fixed fallback when the estimator is unavailable.
//!
//! `risk_score` always comes from the rules while `confidence` comes from the
//! probability channel.

pub mod estimator;
pub mod model;
pub mod rules;
pub mod screening;

use tracing::{debug, warn};

use self::{
    estimator::Estimator,
    model::{AssessmentInput, AssessmentResult, Screening},
    screening::{confidence, ModelFeatures},
};

pub async fn assess(input: &AssessmentInput, estimator: &dyn Estimator) -> AssessmentResult {
    let outcome = rules::classify(input);
    debug!(points = outcome.points, risk = %outcome.risk, "rule classification");

    let features = ModelFeatures::from(input);
    let screening = match estimator.predict(&features).await {
        Ok(prediction) => {
            Screening::from_probability(prediction.probability, prediction.model_version)
        }
        Err(e) => {
            warn!("estimator failed, using rule-based fallback: {e:#}");
            Screening::fallback(outcome.risk)
        }
    };

    AssessmentResult {
        risk_score: outcome.risk,
        confidence: confidence(screening.pcos_probability),
        contributing_factors: outcome.factors,
        recommendations: rules::recommendations(),
        screening,
    }
}
