pub mod admin;
pub mod pagination;
pub mod parent;
pub mod registration;
pub mod stats;
pub mod test_service;

pub use admin::*;
pub use pagination::*;
pub use parent::*;
pub use registration::*;
pub use stats::*;
pub use test_service::*;

use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// A record that can be listed, toggled and deleted by a list controller.
pub trait ListRow: Clone + Send + Sync + 'static {
    fn id(&self) -> &str;
    fn status(&self) -> bool;
    fn set_status(&mut self, status: bool);
}

/// A create/edit payload that can be checked before it is sent.
pub trait Draft {
    fn validate(&self) -> Result<(), ValidationError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// The backend is loose about scalar types: years, counts and prices show up
/// as either strings or numbers depending on which form created the record.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

pub(crate) fn any_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_string(deserializer).map(Option::unwrap_or_default)
}
