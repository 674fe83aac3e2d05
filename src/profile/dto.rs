use serde::{Deserialize, Serialize};

use super::repo_types::Profile;
use crate::{auth::services::normalize_email, error::AppError};

pub const FULL_NAME_MAX_LENGTH: usize = 200;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertProfileRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Profile fields after trimming; blank strings become `None`.
#[derive(Debug, PartialEq)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl UpsertProfileRequest {
    pub fn validate(self) -> Result<ProfileUpdate, AppError> {
        let full_name = non_blank(self.full_name);
        if full_name
            .as_ref()
            .is_some_and(|n| n.chars().count() > FULL_NAME_MAX_LENGTH)
        {
            return Err(AppError::validation(
                "fullName",
                format!("Full name must be at most {FULL_NAME_MAX_LENGTH} characters"),
            ));
        }
        let email = non_blank(self.email)
            .map(|e| normalize_email(&e))
            .transpose()?;
        Ok(ProfileUpdate { full_name, email })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: Option<Profile>,
}
