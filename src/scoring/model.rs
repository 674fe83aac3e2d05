use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Closed string-valued enums shared by the API, the database and the
/// estimator payload.
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err(UnknownVariant(s.to_string())),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

text_enum!(CycleRegularity {
    Regular => "regular",
    Irregular => "irregular",
    Absent => "absent",
});

text_enum!(ExerciseFrequency {
    Sedentary => "sedentary",
    Moderate => "moderate",
    Active => "active",
});

text_enum!(SleepQuality {
    Good => "good",
    Fair => "fair",
    Poor => "poor",
});

text_enum!(
    /// Discrete label from the rule engine.
    RiskScore {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

text_enum!(
    /// Three-bucket label derived from a probability.
    Likelihood {
        Unlikely => "unlikely",
        Possible => "possible",
        Likely => "likely",
    }
);

pub mod symptoms {
    pub const ACNE: &str = "acne";
    pub const HAIR_GROWTH: &str = "hair_growth";
    pub const HAIR_LOSS: &str = "hair_loss";
    pub const WEIGHT_GAIN: &str = "weight_gain";
    pub const FATIGUE: &str = "fatigue";
    pub const MOOD_SWINGS: &str = "mood_swings";

    /// Tags the survey form offers. Other tags are accepted and stored.
    pub const KNOWN: &[&str] = &[
        ACNE,
        HAIR_GROWTH,
        HAIR_LOSS,
        WEIGHT_GAIN,
        FATIGUE,
        MOOD_SWINGS,
    ];
}

/// Validated survey answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentInput {
    pub age: i32,
    #[serde(rename = "height")]
    pub height_cm: i32,
    #[serde(rename = "weight")]
    pub weight_kg: i32,
    pub cycle_regularity: CycleRegularity,
    pub symptoms: Vec<String>,
    pub family_history: bool,
    pub exercise_frequency: ExerciseFrequency,
    pub sleep_quality: SleepQuality,
}

impl AssessmentInput {
    pub fn has_symptom(&self, tag: &str) -> bool {
        self.symptoms.iter().any(|s| s == tag)
    }
}

/// Probability-based screening block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screening {
    pub pcos_likelihood: Likelihood,
    pub pcos_possible: bool,
    pub pcos_probability: f64,
    pub model_version: String,
}

/// Everything computed server-side for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub risk_score: RiskScore,
    pub confidence: i32,
    pub contributing_factors: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub screening: Screening,
}
