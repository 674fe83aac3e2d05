use serde::Serialize;

use super::model::{
    symptoms, AssessmentInput, CycleRegularity, ExerciseFrequency, Likelihood, RiskScore,
    Screening, SleepQuality,
};

/// Version tag reported when the rule-based fallback produced the probability.
pub const FALLBACK_MODEL_VERSION: &str = "screening-rule-v1";

const LIKELY_THRESHOLD: f64 = 0.66;
const POSSIBLE_THRESHOLD: f64 = 0.33;

/// Body mass index; 0 for non-positive heights or any non-finite result.
pub fn bmi(height_cm: f64, weight_kg: f64) -> f64 {
    let m = height_cm / 100.0;
    if !m.is_finite() || m <= 0.0 {
        return 0.0;
    }
    let bmi = weight_kg / (m * m);
    if bmi.is_finite() {
        bmi
    } else {
        0.0
    }
}

pub fn likelihood_from_probability(p: f64) -> Likelihood {
    if p >= LIKELY_THRESHOLD {
        Likelihood::Likely
    } else if p >= POSSIBLE_THRESHOLD {
        Likelihood::Possible
    } else {
        Likelihood::Unlikely
    }
}

/// User-facing confidence, 0..=100, taken from the probability channel.
pub fn confidence(p: f64) -> i32 {
    (p.clamp(0.0, 1.0) * 100.0).round() as i32
}

impl Screening {
    pub fn from_probability(p: f64, model_version: impl Into<String>) -> Self {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        let likelihood = likelihood_from_probability(p);
        Self {
            pcos_likelihood: likelihood,
            pcos_possible: likelihood != Likelihood::Unlikely,
            pcos_probability: p,
            model_version: model_version.into(),
        }
    }

    pub fn fallback(risk: RiskScore) -> Self {
        let p = match risk {
            RiskScore::High => 0.8,
            RiskScore::Medium => 0.5,
            RiskScore::Low => 0.2,
        };
        Self::from_probability(p, FALLBACK_MODEL_VERSION)
    }
}

/// Feature row handed to the external estimator. Field names are the
/// estimator's training columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelFeatures {
    pub age: i32,
    pub height_cm: i32,
    pub weight_kg: i32,
    pub bmi: f64,
    pub symptom_acne: u8,
    pub symptom_hair_growth: u8,
    pub symptom_hair_loss: u8,
    pub family_history: u8,
    pub cycle_regularity: CycleRegularity,
    pub exercise_frequency: ExerciseFrequency,
    pub sleep_quality: SleepQuality,
}

impl From<&AssessmentInput> for ModelFeatures {
    fn from(input: &AssessmentInput) -> Self {
        Self {
            age: input.age,
            height_cm: input.height_cm,
            weight_kg: input.weight_kg,
            bmi: bmi(input.height_cm as f64, input.weight_kg as f64),
            symptom_acne: input.has_symptom(symptoms::ACNE) as u8,
            symptom_hair_growth: input.has_symptom(symptoms::HAIR_GROWTH) as u8,
            symptom_hair_loss: input.has_symptom(symptoms::HAIR_LOSS) as u8,
            family_history: input.family_history as u8,
            cycle_regularity: input.cycle_regularity,
            exercise_frequency: input.exercise_frequency,
            sleep_quality: input.sleep_quality,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::rules::tests::input;

    #[test]
    fn bmi_basic() {
        let v = bmi(170.0, 72.25);
        assert!((v - 25.0).abs() < 1e-9);
    }

    #[test]
    fn bmi_degenerate_heights_are_zero() {
        for w in [0.0, 60.0, -5.0, f64::MAX] {
            assert_eq!(bmi(0.0, w), 0.0);
            assert_eq!(bmi(-170.0, w), 0.0);
            assert_eq!(bmi(f64::NAN, w), 0.0);
        }
        assert_eq!(bmi(170.0, f64::INFINITY), 0.0);
        assert_eq!(bmi(f64::MIN_POSITIVE, 1.0), 0.0);
    }

    #[test]
    fn likelihood_steps() {
        assert_eq!(likelihood_from_probability(0.0), Likelihood::Unlikely);
        assert_eq!(likelihood_from_probability(0.329), Likelihood::Unlikely);
        assert_eq!(likelihood_from_probability(0.33), Likelihood::Possible);
        assert_eq!(likelihood_from_probability(0.659), Likelihood::Possible);
        assert_eq!(likelihood_from_probability(0.66), Likelihood::Likely);
        assert_eq!(likelihood_from_probability(1.0), Likelihood::Likely);
    }

    #[test]
    fn possible_flag_tracks_likelihood() {
        for i in 0..=100 {
            let s = Screening::from_probability(i as f64 / 100.0, "m");
            assert_eq!(s.pcos_possible, s.pcos_likelihood != Likelihood::Unlikely);
        }
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(Screening::from_probability(1.7, "m").pcos_probability, 1.0);
        assert_eq!(Screening::from_probability(-0.2, "m").pcos_probability, 0.0);
        assert_eq!(Screening::from_probability(f64::NAN, "m").pcos_probability, 0.0);
    }

    #[test]
    fn fallback_table() {
        let high = Screening::fallback(RiskScore::High);
        assert_eq!(high.pcos_probability, 0.8);
        assert_eq!(high.pcos_likelihood, Likelihood::Likely);
        assert_eq!(high.model_version, FALLBACK_MODEL_VERSION);

        let medium = Screening::fallback(RiskScore::Medium);
        assert_eq!(medium.pcos_probability, 0.5);
        assert_eq!(medium.pcos_likelihood, Likelihood::Possible);

        let low = Screening::fallback(RiskScore::Low);
        assert_eq!(low.pcos_probability, 0.2);
        assert_eq!(low.pcos_likelihood, Likelihood::Unlikely);
        assert!(!low.pcos_possible);
    }

    #[test]
    fn confidence_rounds_probability() {
        assert_eq!(confidence(0.8), 80);
        assert_eq!(confidence(0.42), 42);
        assert_eq!(confidence(0.556), 56);
        assert_eq!(confidence(0.0), 0);
        assert_eq!(confidence(1.0), 100);
    }

    #[test]
    fn features_from_input() {
        let f = ModelFeatures::from(&input(
            CycleRegularity::Irregular,
            true,
            &["hair_loss", "acne"],
        ));
        assert_eq!(f.symptom_acne, 1);
        assert_eq!(f.symptom_hair_growth, 0);
        assert_eq!(f.symptom_hair_loss, 1);
        assert_eq!(f.family_history, 1);

        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["cycle_regularity"], "irregular");
        assert_eq!(json["exercise_frequency"], "moderate");
        assert_eq!(json["sleep_quality"], "good");
        assert_eq!(json["height_cm"], 165);
        assert!(json["bmi"].as_f64().unwrap() > 22.0);
    }
}
