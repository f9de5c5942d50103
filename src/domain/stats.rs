use serde::{Deserialize, Serialize};

use super::any_string;

/// One selectable value of a filter dimension, with the number of rows it matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    #[serde(default)]
    pub label: String,
    #[serde(default, deserialize_with = "any_string")]
    pub value: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStats {
    #[serde(default)]
    pub types: Vec<Facet>,
    #[serde(default)]
    pub status: Vec<Facet>,
    #[serde(default)]
    pub sources: Vec<Facet>,
    #[serde(default)]
    pub parents: Vec<Facet>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub individual_count: u64,
    #[serde(default)]
    pub parent_count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub registrations: u64,
    #[serde(default)]
    pub parents: u64,
    #[serde(default)]
    pub tests: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facet_values_accept_booleans() {
        let stats: RegistrationStats = serde_json::from_str(
            r#"{
                "types": [{"label": "Diagnostic", "value": "Diagnostic", "count": 4}],
                "status": [{"label": "Active", "value": true, "count": 3}],
                "totalCount": 9,
                "individualCount": 6,
                "parentCount": 3
            }"#,
        )
        .unwrap();
        assert_eq!(stats.status[0].value, "true");
        assert_eq!(stats.types[0].count, 4);
        assert!(stats.parents.is_empty());
        assert_eq!(stats.parent_count, 3);
    }
}
