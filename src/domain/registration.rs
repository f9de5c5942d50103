use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, is_blank, lenient_string, Draft, ListRow, ValidationError};

/// The owning parent of a lab. List endpoints embed it, some detail
/// responses only carry the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParentRef {
    Embedded {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        name: String,
    },
    Id(String),
}

impl ParentRef {
    pub fn id(&self) -> &str {
        match self {
            Self::Embedded { id, .. } | Self::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Embedded { name, .. } if !name.is_empty() => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TestRef {
    Embedded {
        #[serde(rename = "_id")]
        id: String,
        #[serde(default)]
        title: String,
    },
    Id(String),
}

impl TestRef {
    pub fn label(&self) -> &str {
        match self {
            Self::Embedded { title, .. } if !title.is_empty() => title,
            Self::Embedded { id, .. } | Self::Id(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceItem {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub lab_name: String,
    #[serde(default)]
    pub lab_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default = "default_true")]
    pub status: bool,
    #[serde(default)]
    pub parent: Option<ParentRef>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub establishment_year: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub area_name: Option<String>,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub pincode: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub whatsapp: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub owner_phone: Option<String>,
    #[serde(default)]
    pub owner_email: Option<String>,

    #[serde(default)]
    pub home_collection: bool,
    #[serde(default, rename = "is24x7")]
    pub open_24x7: bool,
    #[serde(default)]
    pub emergency: bool,
    #[serde(default)]
    pub ambulance_service: bool,
    #[serde(default)]
    pub open_time: Option<String>,
    #[serde(default)]
    pub close_time: Option<String>,
    #[serde(default)]
    pub weekly_off: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub staff_count: Option<String>,

    #[serde(default)]
    pub upi_id: Option<String>,
    #[serde(default)]
    pub bank_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub account_number: Option<String>,
    #[serde(default)]
    pub ifsc_code: Option<String>,

    #[serde(default)]
    pub lab_logo: Option<String>,
    #[serde(default)]
    pub lab_banner: Option<String>,
    #[serde(default)]
    pub pathology_docs: Option<String>,

    #[serde(default)]
    pub selected_tests: Vec<TestRef>,
    #[serde(default, rename = "test")]
    pub pricing: Vec<PriceItem>,
    #[serde(default, rename = "Certification")]
    pub certifications: Vec<Certification>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Registration {
    /// "Area, City, State" with missing parts skipped.
    pub fn locality(&self) -> String {
        [&self.area_name, &self.city, &self.state]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn source_label(&self) -> &str {
        self.source.as_deref().filter(|s| !s.is_empty()).unwrap_or("web")
    }
}

impl ListRow for Registration {
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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentField {
    LabLogo,
    LabBanner,
    PathologyDocs,
}

impl AttachmentField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LabLogo => "labLogo",
            Self::LabBanner => "labBanner",
            Self::PathologyDocs => "pathologyDocs",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub field: AttachmentField,
    pub path: PathBuf,
}

/// Fields a registration form submits. Empty optional fields are not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDraft {
    pub parent: Option<String>,
    pub lab_name: String,
    pub lab_type: Option<String>,
    pub owner_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub full_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub status: bool,
    pub attachments: Vec<Attachment>,
}

impl Default for RegistrationDraft {
    fn default() -> Self {
        Self {
            parent: None,
            lab_name: String::new(),
            lab_type: None,
            owner_name: String::new(),
            phone: String::new(),
            email: None,
            full_address: None,
            city: None,
            state: None,
            pincode: None,
            status: true,
            attachments: Vec::new(),
        }
    }
}

impl RegistrationDraft {
    /// Text parts of the multipart body, in a stable order.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let optional = [
            ("parent", &self.parent),
            ("labType", &self.lab_type),
            ("email", &self.email),
            ("fullAddress", &self.full_address),
            ("city", &self.city),
            ("state", &self.state),
            ("pincode", &self.pincode),
        ];

        let mut fields = vec![
            ("labName", self.lab_name.trim().to_string()),
            ("ownerName", self.owner_name.trim().to_string()),
            ("phone", self.phone.trim().to_string()),
        ];
        fields.extend(optional.into_iter().filter_map(|(key, value)| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| (key, v.to_string()))
        }));
        fields.push(("status", self.status.to_string()));
        fields
    }
}

impl Draft for RegistrationDraft {
    fn validate(&self) -> Result<(), ValidationError> {
        if is_blank(&self.lab_name) || is_blank(&self.owner_name) || is_blank(&self.phone) {
            return Err(ValidationError(
                "Required fields: Lab Name, Owner Name, Lab Phone".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_list_row_with_embedded_parent() {
        let reg: Registration = serde_json::from_str(
            r#"{
                "_id": "r1",
                "labName": "Lal Path Labs",
                "areaName": "Sector 18",
                "city": "Noida",
                "state": "UP",
                "ownerName": "Dr. Lal",
                "phone": 9876543210,
                "status": true,
                "parent": {"_id": "p1", "name": "Lal Group"},
                "establishmentYear": 1999,
                "is24x7": true,
                "test": [{"name": "CBC", "price": 300}]
            }"#,
        )
        .unwrap();

        assert_eq!(reg.locality(), "Sector 18, Noida, UP");
        assert_eq!(reg.phone.as_deref(), Some("9876543210"));
        assert_eq!(reg.parent.as_ref().and_then(|p| p.name()), Some("Lal Group"));
        assert_eq!(reg.establishment_year.as_deref(), Some("1999"));
        assert!(reg.open_24x7);
        assert_eq!(reg.pricing[0].price.as_deref(), Some("300"));
        assert_eq!(reg.source_label(), "web");
    }

    #[test]
    fn decodes_parent_as_bare_id() {
        let reg: Registration =
            serde_json::from_str(r#"{"_id": "r2", "labName": "X", "parent": "p9"}"#).unwrap();
        let parent = reg.parent.unwrap();
        assert_eq!(parent.id(), "p9");
        assert_eq!(parent.name(), None);
        assert!(reg.status);
    }

    #[test]
    fn draft_requires_name_owner_and_phone() {
        let mut draft = RegistrationDraft {
            lab_name: "Lab".to_string(),
            owner_name: "Owner".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());

        draft.phone = "  12345 ".to_string();
        assert!(draft.validate().is_ok());

        draft.city = Some("  ".to_string());
        let fields = draft.text_fields();
        assert!(fields.contains(&("phone", "12345".to_string())));
        assert!(!fields.iter().any(|(k, _)| *k == "city"));
        assert_eq!(fields.last(), Some(&("status", "true".to_string())));
    }
}
