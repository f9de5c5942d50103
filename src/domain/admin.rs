use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{is_blank, Draft, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    /// Left empty to keep the current password.
    pub password: Option<String>,
    pub photo: Option<PathBuf>,
}

impl Draft for ProfileDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) || is_blank(&self.email) {
            return Err(ValidationError("Name and email are required".to_string()));
        }
        Ok(())
    }
}
