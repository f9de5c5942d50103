use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, is_blank, Draft, ListRow, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestService {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ListRow for TestService {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> bool {
        self.status
    }

    fn set_status(&mut self, status: bool) {
        self.status = status;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestServiceDraft {
    pub title: String,
    pub status: bool,
}

impl Default for TestServiceDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            status: true,
        }
    }
}

impl Draft for TestServiceDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.title) {
            return Err(ValidationError("Please enter a title".to_string()));
        }
        Ok(())
    }
}
