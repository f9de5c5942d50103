use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, is_blank, Draft, ListRow, ValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default)]
    pub registration_count: u64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ListRow for Parent {
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

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParentDraft {
    pub name: String,
}

impl Draft for ParentDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.name) {
            return Err(ValidationError("Please enter a name".to_string()));
        }
        Ok(())
    }
}
