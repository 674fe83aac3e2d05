use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Assessment, AssessmentRow};
use crate::scoring::model::{AssessmentInput, AssessmentResult};

/// Assessment persistence, always scoped to the owning user.
#[async_trait]
pub trait AssessmentStore: Send + Sync {
    /// Inserts one submission with its computed result and returns the new id.
    async fn create(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
        result: &AssessmentResult,
    ) -> anyhow::Result<i64>;

    async fn latest(&self, user_id: Uuid) -> anyhow::Result<Option<Assessment>>;

    /// `None` both for unknown ids and for ids owned by someone else.
    async fn get(&self, user_id: Uuid, id: i64) -> anyhow::Result<Option<Assessment>>;

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgAssessmentStore {
    db: PgPool,
}

impl PgAssessmentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, user_id, age, height, weight, cycle_regularity, exercise_frequency,
           sleep_quality, symptoms, family_history, risk_score, confidence,
           contributing_factors, recommendations, pcos_likelihood, pcos_possible,
           pcos_probability, model_version, created_at
    FROM assessments
"#;

#[async_trait]
impl AssessmentStore for PgAssessmentStore {
    async fn create(
        &self,
        user_id: Uuid,
        input: &AssessmentInput,
        result: &AssessmentResult,
    ) -> anyhow::Result<i64> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO assessments (
                user_id, age, height, weight, cycle_regularity, exercise_frequency,
                sleep_quality, symptoms, family_history, risk_score, confidence,
                contributing_factors, recommendations, pcos_likelihood, pcos_possible,
                pcos_probability, model_version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(input.age)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.cycle_regularity.as_str())
        .bind(input.exercise_frequency.as_str())
        .bind(input.sleep_quality.as_str())
        .bind(&input.symptoms)
        .bind(input.family_history)
        .bind(result.risk_score.as_str())
        .bind(result.confidence)
        .bind(&result.contributing_factors)
        .bind(&result.recommendations)
        .bind(result.screening.pcos_likelihood.as_str())
        .bind(result.screening.pcos_possible)
        .bind(result.screening.pcos_probability)
        .bind(&result.screening.model_version)
        .fetch_one(&self.db)
        .await?;
        Ok(id)
    }

    async fn latest(&self, user_id: Uuid) -> anyhow::Result<Option<Assessment>> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, AssessmentRow>(&sql)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        row.map(Assessment::try_from).transpose()
    }

    async fn get(&self, user_id: Uuid, id: i64) -> anyhow::Result<Option<Assessment>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, AssessmentRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;
        row.map(Assessment::try_from).transpose()
    }

    async fn delete_all(&self, user_id: Uuid) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM assessments WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
