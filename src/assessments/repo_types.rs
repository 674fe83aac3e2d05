use anyhow::Context;
use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::scoring::model::{AssessmentInput, RiskScore, Screening};

/// Raw `assessments` row; categorical columns are TEXT.
#[derive(Debug, FromRow)]
pub struct AssessmentRow {
    pub id: i64,
    pub user_id: Uuid,
    pub age: i32,
    pub height: i32,
    pub weight: i32,
    pub cycle_regularity: String,
    pub exercise_frequency: String,
    pub sleep_quality: String,
    pub symptoms: Vec<String>,
    pub family_history: bool,
    pub risk_score: String,
    pub confidence: i32,
    pub contributing_factors: Vec<String>,
    pub recommendations: Vec<String>,
    pub pcos_likelihood: Option<String>,
    pub pcos_possible: Option<bool>,
    pub pcos_probability: Option<f64>,
    pub model_version: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Stored submission together with its computed result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: i64,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub input: AssessmentInput,
    pub risk_score: RiskScore,
    pub confidence: i32,
    pub contributing_factors: Vec<String>,
    pub recommendations: Vec<String>,
    /// Absent for rows written before the screening columns existed.
    #[serde(flatten)]
    pub screening: Option<Screening>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<AssessmentRow> for Assessment {
    type Error = anyhow::Error;

    fn try_from(r: AssessmentRow) -> Result<Self, Self::Error> {
        let screening = match (
            r.pcos_likelihood,
            r.pcos_possible,
            r.pcos_probability,
            r.model_version,
        ) {
            (Some(likelihood), Some(possible), Some(probability), Some(model_version)) => {
                Some(Screening {
                    pcos_likelihood: likelihood.parse().context("pcos_likelihood")?,
                    pcos_possible: possible,
                    pcos_probability: probability,
                    model_version,
                })
            }
            _ => None,
        };

        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            input: AssessmentInput {
                age: r.age,
                height_cm: r.height,
                weight_kg: r.weight,
                cycle_regularity: r.cycle_regularity.parse().context("cycle_regularity")?,
                symptoms: r.symptoms,
                family_history: r.family_history,
                exercise_frequency: r.exercise_frequency.parse().context("exercise_frequency")?,
                sleep_quality: r.sleep_quality.parse().context("sleep_quality")?,
            },
            risk_score: r.risk_score.parse().context("risk_score")?,
            confidence: r.confidence,
            contributing_factors: r.contributing_factors,
            recommendations: r.recommendations,
            screening,
            created_at: r.created_at,
        })
    }
}
