use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::AppError,
    scoring::model::{symptoms, AssessmentInput, AssessmentResult},
};

pub const AGE_RANGE: (i64, i64) = (1, 120);
pub const HEIGHT_CM_RANGE: (i64, i64) = (0, 300);
pub const WEIGHT_KG_RANGE: (i64, i64) = (0, 500);
pub const MAX_SYMPTOMS: usize = 32;
pub const MAX_SYMPTOM_LEN: usize = 64;

/// Survey body as sent by the client. Fields stay untyped JSON here so that a
/// missing or mistyped field is reported by name instead of as a JSON error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    pub age: Option<Value>,
    pub height: Option<Value>,
    pub weight: Option<Value>,
    pub cycle_regularity: Option<Value>,
    pub exercise_frequency: Option<Value>,
    pub sleep_quality: Option<Value>,
    pub symptoms: Option<Value>,
    pub family_history: Option<Value>,
}

fn required(value: Option<Value>, field: &'static str) -> Result<Value, AppError> {
    value.ok_or_else(|| AppError::validation(field, format!("{field} is required")))
}

fn integer(
    value: Option<Value>,
    (min, max): (i64, i64),
    field: &'static str,
) -> Result<i32, AppError> {
    let n = required(value, field)?
        .as_i64()
        .ok_or_else(|| AppError::validation(field, format!("{field} must be an integer")))?;
    if n < min || n > max {
        return Err(AppError::validation(
            field,
            format!("{field} must be between {min} and {max}"),
        ));
    }
    Ok(n as i32)
}

fn variant<T: FromStr>(value: Option<Value>, field: &'static str) -> Result<T, AppError> {
    let Value::String(raw) = required(value, field)? else {
        return Err(AppError::validation(field, format!("{field} must be a string")));
    };
    raw.trim()
        .parse()
        .map_err(|_| AppError::validation(field, format!("Invalid {field}: {raw}")))
}

fn boolean(value: Option<Value>, field: &'static str) -> Result<bool, AppError> {
    required(value, field)?
        .as_bool()
        .ok_or_else(|| AppError::validation(field, format!("{field} must be a boolean")))
}

fn clean_symptoms(value: Option<Value>) -> Result<Vec<String>, AppError> {
    let Value::Array(raw) = required(value, "symptoms")? else {
        return Err(AppError::validation("symptoms", "symptoms must be an array"));
    };
    if raw.len() > MAX_SYMPTOMS {
        return Err(AppError::validation(
            "symptoms",
            format!("At most {MAX_SYMPTOMS} symptoms are allowed"),
        ));
    }
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for entry in &raw {
        let tag = entry.as_str().map(str::trim).unwrap_or_default();
        if tag.is_empty() || tag.chars().count() > MAX_SYMPTOM_LEN {
            return Err(AppError::validation("symptoms", "Invalid symptom"));
        }
        if !symptoms::KNOWN.contains(&tag) {
            debug!(symptom = %tag, "unrecognized symptom tag");
        }
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    Ok(out)
}

impl SubmitAssessmentRequest {
    /// Checks fields in survey order and reports the first failure.
    pub fn validate(self) -> Result<AssessmentInput, AppError> {
        let age = integer(self.age, AGE_RANGE, "age")?;
        let height_cm = integer(self.height, HEIGHT_CM_RANGE, "height")?;
        let weight_kg = integer(self.weight, WEIGHT_KG_RANGE, "weight")?;
        let cycle_regularity = variant(self.cycle_regularity, "cycleRegularity")?;
        let symptoms = clean_symptoms(self.symptoms)?;
        let family_history = boolean(self.family_history, "familyHistory")?;
        let exercise_frequency = variant(self.exercise_frequency, "exerciseFrequency")?;
        let sleep_quality = variant(self.sleep_quality, "sleepQuality")?;

        Ok(AssessmentInput {
            age,
            height_cm,
            weight_kg,
            cycle_regularity,
            symptoms,
            family_history,
            exercise_frequency,
            sleep_quality,
        })
    }
}

/// Response for a fresh submission: the new id plus the computed result.
#[derive(Debug, Serialize)]
pub struct SubmittedAssessment {
    pub id: i64,
    #[serde(flatten)]
    pub result: AssessmentResult,
}
