use std::sync::Arc;

use async_trait::async_trait;
use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row, TableState};

use super::{
    facet_options, ordinal_cell, status_cell, status_options, CollectionSpec, FilterOption,
    FilterSpec, OperationId, OperationSpec,
};
use crate::app::App;
use crate::client::{Ack, AdminClient, ClientResult, ListPage, ListParams};
use crate::controller::{ListQuery, Resource, ResourceLabels};
use crate::domain::{Registration, RegistrationDraft, RegistrationStats};
use crate::theme;

pub const REG_TYPE: &str = "regType";
pub const PARENT_ID: &str = "parentId";
pub const INDIVIDUAL: &str = "individual";
pub const PARENT: &str = "parent";

static LABELS: ResourceLabels = ResourceLabels {
    fetch_failed: "Failed to fetch data",
    status_failed: "Failed to update status",
    status_updated: "Status updated",
    delete_prompt: "Are you sure? You won't be able to revert this!",
    delete_failed: "Failed to delete",
    deleted: "Registration deleted",
    submit_failed: "Failed to update registration",
    created: "Laboratory registered successfully",
    updated: "Laboratory updated successfully",
};

/// Registered labs, either standalone or affiliated with a parent.
pub struct Registrations {
    client: Arc<dyn AdminClient>,
}

impl Registrations {
    pub fn new(client: Arc<dyn AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for Registrations {
    type Row = Registration;
    type Draft = RegistrationDraft;

    fn labels(&self) -> &'static ResourceLabels {
        &LABELS
    }

    async fn list(&self, params: &ListParams) -> ClientResult<ListPage<Registration>> {
        self.client.list_registrations(params).await
    }

    async fn set_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.client.set_registration_status(id, status).await
    }

    async fn remove(&self, id: &str) -> ClientResult<Ack> {
        self.client.delete_registration(id).await
    }

    async fn create(&self, draft: &RegistrationDraft) -> ClientResult<Ack> {
        self.client.create_registration(draft).await
    }

    async fn update(&self, id: &str, draft: &RegistrationDraft) -> ClientResult<Ack> {
        self.client.update_registration(id, draft).await
    }
}

pub fn default_filters() -> Vec<(&'static str, &'static str)> {
    vec![
        ("type", ""),
        ("status", ""),
        ("source", ""),
        (REG_TYPE, INDIVIDUAL),
        (PARENT_ID, ""),
    ]
}

/// Filter changes for switching tabs. Leaving the parent tab drops the
/// parent selection.
pub fn reg_type_filters(reg_type: &str) -> Vec<(String, String)> {
    if reg_type == PARENT {
        vec![(REG_TYPE.to_string(), PARENT.to_string())]
    } else {
        vec![
            (REG_TYPE.to_string(), INDIVIDUAL.to_string()),
            (PARENT_ID.to_string(), String::new()),
        ]
    }
}

/// Labs affiliated with one parent.
pub fn parent_filters(parent_id: &str) -> Vec<(String, String)> {
    vec![
        (REG_TYPE.to_string(), PARENT.to_string()),
        (PARENT_ID.to_string(), parent_id.to_string()),
    ]
}

pub fn other_reg_type(current: &str) -> &'static str {
    if current == PARENT {
        INDIVIDUAL
    } else {
        PARENT
    }
}

pub(super) const FILTERS: &[FilterSpec] = &[
    FilterSpec {
        key: "type",
        label: "Lab Type",
        options: type_options,
    },
    FilterSpec {
        key: "status",
        label: "Status",
        options: registration_status_options,
    },
    FilterSpec {
        key: "source",
        label: "Source",
        options: source_options,
    },
    FilterSpec {
        key: PARENT_ID,
        label: "Parent",
        options: parent_options,
    },
];

fn type_options(_query: &ListQuery, stats: Option<&RegistrationStats>) -> Option<Vec<FilterOption>> {
    // The tabs already split on these two.
    let types = stats
        .map(|s| s.types.as_slice())
        .unwrap_or_default()
        .iter()
        .filter(|t| t.value != "Parent" && t.value != "Individual");
    Some(facet_options("All Lab Types", types))
}

fn registration_status_options(
    query: &ListQuery,
    stats: Option<&RegistrationStats>,
) -> Option<Vec<FilterOption>> {
    match stats {
        Some(stats) if !stats.status.is_empty() => {
            Some(facet_options("All Status", &stats.status))
        }
        _ => status_options(query, stats),
    }
}

fn source_options(_query: &ListQuery, stats: Option<&RegistrationStats>) -> Option<Vec<FilterOption>> {
    let sources = stats.map(|s| s.sources.as_slice()).unwrap_or_default();
    Some(facet_options("All Sources", sources))
}

fn parent_options(query: &ListQuery, stats: Option<&RegistrationStats>) -> Option<Vec<FilterOption>> {
    if query.filter(REG_TYPE) != PARENT {
        return None;
    }
    let parents = stats.map(|s| s.parents.as_slice()).unwrap_or_default();
    Some(facet_options("All Parents", parents))
}

pub(super) const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        id: OperationId::Open,
        label: "details",
        key: 'o',
    },
    OperationSpec {
        id: OperationId::ToggleStatus,
        label: "toggle",
        key: 's',
    },
    OperationSpec {
        id: OperationId::Create,
        label: "register",
        key: 'a',
    },
    OperationSpec {
        id: OperationId::Edit,
        label: "edit",
        key: 'e',
    },
    OperationSpec {
        id: OperationId::Delete,
        label: "delete",
        key: 'd',
    },
];

pub(super) static COLLECTION: CollectionSpec = CollectionSpec {
    header: &[" #", "Lab", "Locality", "Owner", "Phone", "Type", "Source", "Status"],
    widths,
    rows,
    loading_label: " Loading registrations...",
    empty_label: " No registrations found",
    table_state,
};

fn widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(24),
        Constraint::Percentage(22),
        Constraint::Percentage(14),
        Constraint::Length(13),
        Constraint::Length(12),
        Constraint::Length(7),
        Constraint::Length(12),
    ]
}

fn rows(app: &App) -> Vec<Row<'static>> {
    let view = app.feeds.registrations.borrow();
    view.rows
        .iter()
        .enumerate()
        .map(|(i, reg)| {
            let lab = match reg.parent.as_ref().and_then(|p| p.name()) {
                Some(parent) => format!("{} ({})", reg.lab_name, parent),
                None => reg.lab_name.clone(),
            };
            Row::new(vec![
                ordinal_cell(view.pagination.ordinal(i)),
                Cell::from(lab).style(Style::default().fg(theme::TEXT)),
                Cell::from(reg.locality()),
                Cell::from(reg.owner_name.clone().unwrap_or_default()),
                Cell::from(reg.phone.clone().unwrap_or_default()),
                Cell::from(reg.lab_type.clone().unwrap_or_else(|| "N/A".to_string())),
                Cell::from(reg.source_label().to_string())
                    .style(Style::default().fg(theme::TEXT_DIM)),
                status_cell(reg.status, view.pending.get(&reg.id)),
            ])
        })
        .collect()
}

fn table_state(app: &mut App) -> &mut TableState {
    &mut app.registration_table_state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Facet;

    fn facet(label: &str, value: &str, count: u64) -> Facet {
        Facet {
            label: label.to_string(),
            value: value.to_string(),
            count,
        }
    }

    fn stats() -> RegistrationStats {
        RegistrationStats {
            types: vec![
                facet("Parent", "Parent", 3),
                facet("Diagnostic", "Diagnostic", 4),
                facet("Individual", "Individual", 6),
            ],
            status: vec![facet("Active", "true", 7), facet("Inactive", "false", 2)],
            sources: vec![facet("admin", "admin", 1)],
            parents: vec![facet("Lal Group", "p1", 2)],
            ..Default::default()
        }
    }

    fn query() -> ListQuery {
        default_filters()
            .into_iter()
            .fold(ListQuery::new(10), |q, (k, v)| q.with_filter(k, v))
    }

    #[test]
    fn lab_types_skip_tab_values() {
        let options = type_options(&query(), Some(&stats())).unwrap();
        assert_eq!(
            options,
            vec![
                FilterOption::new("All Lab Types", ""),
                FilterOption::new("Diagnostic (4)", "Diagnostic"),
            ]
        );
    }

    #[test]
    fn status_falls_back_without_stats() {
        let live = registration_status_options(&query(), Some(&stats())).unwrap();
        assert_eq!(live[1], FilterOption::new("Active (7)", "true"));

        let fallback = registration_status_options(&query(), None).unwrap();
        assert_eq!(fallback[1], FilterOption::new("Active", "true"));
    }

    #[test]
    fn parent_filter_only_on_parent_tab() {
        let mut query = query();
        assert!(parent_options(&query, Some(&stats())).is_none());

        query.set_filter(REG_TYPE, PARENT);
        let options = parent_options(&query, Some(&stats())).unwrap();
        assert_eq!(options[1], FilterOption::new("Lal Group (2)", "p1"));
    }

    #[test]
    fn switching_to_individual_clears_parent() {
        let filters = reg_type_filters(other_reg_type(PARENT));
        assert!(filters.contains(&(REG_TYPE.to_string(), INDIVIDUAL.to_string())));
        assert!(filters.contains(&(PARENT_ID.to_string(), String::new())));

        let filters = reg_type_filters(other_reg_type(INDIVIDUAL));
        assert_eq!(filters, vec![(REG_TYPE.to_string(), PARENT.to_string())]);
    }
}
