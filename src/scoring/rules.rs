//! Deterministic rule engine.
//!
//! Weights and thresholds are part of the output contract: irregular or
//! absent cycles add 2, family history adds 1, androgenic symptoms add 1;
//! 3 or more points is high risk, 1 or more is medium.

use super::model::{symptoms, AssessmentInput, CycleRegularity, RiskScore};

pub const FACTOR_IRREGULAR_CYCLE: &str = "Irregular Menstrual Cycle";
pub const FACTOR_FAMILY_HISTORY: &str = "Family History";
pub const FACTOR_ANDROGENIC: &str = "Androgenic Symptoms";

pub const RECOMMENDATIONS: [&str; 3] = [
    "Consult with a healthcare provider",
    "Maintain a balanced diet rich in whole foods",
    "Regular moderate exercise",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome {
    pub points: u8,
    pub risk: RiskScore,
    pub factors: Vec<String>,
}

impl RiskScore {
    pub fn from_points(points: u8) -> Self {
        match points {
            0 => RiskScore::Low,
            1 | 2 => RiskScore::Medium,
            _ => RiskScore::High,
        }
    }
}

pub fn classify(input: &AssessmentInput) -> RuleOutcome {
    let mut points = 0;
    let mut factors = Vec::new();

    if input.cycle_regularity != CycleRegularity::Regular {
        points += 2;
        factors.push(FACTOR_IRREGULAR_CYCLE.to_string());
    }
    if input.family_history {
        points += 1;
        factors.push(FACTOR_FAMILY_HISTORY.to_string());
    }
    if input.has_symptom(symptoms::ACNE) || input.has_symptom(symptoms::HAIR_GROWTH) {
        points += 1;
        factors.push(FACTOR_ANDROGENIC.to_string());
    }

    RuleOutcome {
        points,
        risk: RiskScore::from_points(points),
        factors,
    }
}

/// Not personalized: every result carries the same three items.
pub fn recommendations() -> Vec<String> {
    RECOMMENDATIONS.iter().map(|r| r.to_string()).collect()
}
