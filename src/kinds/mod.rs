pub mod parents;
pub mod registrations;
pub mod test_services;

pub use parents::Parents;
pub use registrations::Registrations;
pub use test_services::TestServices;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row, TableState};

use crate::app::{App, ListFeeds};
use crate::client::AdminClient;
use crate::controller::{
    ConfirmationGate, ControllerConfig, ListController, ListOps, ListQuery, Notifier, PendingKind,
};
use crate::domain::{Facet, RegistrationStats};
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindId {
    TestService,
    Registration,
    Parent,
}

impl KindId {
    pub const ALL: [KindId; 3] = [Self::TestService, Self::Registration, Self::Parent];

    pub fn label(&self) -> &'static str {
        kind_spec(*self).label
    }
}

#[derive(Debug, Clone)]
pub struct KindSpec {
    pub id: KindId,
    pub label: &'static str,
    pub collection: &'static CollectionSpec,
    pub filters: &'static [FilterSpec],
    pub operations: &'static [OperationSpec],
}

#[derive(Debug, Clone, Copy)]
pub struct CollectionSpec {
    pub header: &'static [&'static str],
    pub widths: fn() -> Vec<Constraint>,
    pub rows: fn(&App) -> Vec<Row<'static>>,
    pub loading_label: &'static str,
    pub empty_label: &'static str,
    pub table_state: fn(&mut App) -> &mut TableState,
}

/// One dropdown in a list's filter bar.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub key: &'static str,
    pub label: &'static str,
    /// `None` hides the filter for the current query.
    pub options: fn(&ListQuery, Option<&RegistrationStats>) -> Option<Vec<FilterOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption {
    pub label: String,
    pub value: String,
}

impl FilterOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationId {
    ToggleStatus,
    Delete,
    Create,
    Edit,
    Open,
}

#[derive(Debug, Clone, Copy)]
pub struct OperationSpec {
    pub id: OperationId,
    pub label: &'static str,
    pub key: char,
}

static KIND_SPECS: [KindSpec; 3] = [
    KindSpec {
        id: KindId::TestService,
        label: "Tests & Services",
        collection: &test_services::COLLECTION,
        filters: test_services::FILTERS,
        operations: test_services::OPERATIONS,
    },
    KindSpec {
        id: KindId::Registration,
        label: "Registrations",
        collection: &registrations::COLLECTION,
        filters: registrations::FILTERS,
        operations: registrations::OPERATIONS,
    },
    KindSpec {
        id: KindId::Parent,
        label: "Parents",
        collection: &parents::COLLECTION,
        filters: parents::FILTERS,
        operations: parents::OPERATIONS,
    },
];

pub fn registry() -> &'static [KindSpec] {
    &KIND_SPECS
}

pub fn kind_spec(kind: KindId) -> &'static KindSpec {
    match kind {
        KindId::TestService => &KIND_SPECS[0],
        KindId::Registration => &KIND_SPECS[1],
        KindId::Parent => &KIND_SPECS[2],
    }
}

pub fn collection_spec(kind: KindId) -> &'static CollectionSpec {
    kind_spec(kind).collection
}

pub fn operation_for_key(kind: KindId, key: char) -> Option<OperationId> {
    kind_spec(kind)
        .operations
        .iter()
        .find(|op| op.key == key)
        .map(|op| op.id)
}

pub fn has_operation(kind: KindId, op: OperationId) -> bool {
    kind_spec(kind).operations.iter().any(|spec| spec.id == op)
}

/// The three list controllers, one per listed resource.
pub struct Controllers {
    pub tests: ListController<TestServices>,
    pub registrations: ListController<Registrations>,
    pub parents: ListController<Parents>,
}

impl Controllers {
    pub fn new(
        client: Arc<dyn AdminClient>,
        notifier: Arc<dyn Notifier>,
        gate: Arc<dyn ConfirmationGate>,
        page_size: u32,
        debounce: Duration,
    ) -> Self {
        let config = |filters: Vec<(&'static str, &'static str)>| ControllerConfig {
            limit: page_size,
            debounce,
            filters,
        };
        Self {
            tests: ListController::new(
                TestServices::new(client.clone()),
                notifier.clone(),
                gate.clone(),
                config(test_services::default_filters()),
            ),
            registrations: ListController::new(
                Registrations::new(client.clone()),
                notifier.clone(),
                gate.clone(),
                config(registrations::default_filters()),
            ),
            parents: ListController::new(
                Parents::new(client),
                notifier,
                gate,
                config(parents::default_filters()),
            ),
        }
    }

    /// An owned handle for driving `kind` from a spawned task.
    pub fn ops(&self, kind: KindId) -> Box<dyn ListOps> {
        match kind {
            KindId::TestService => Box::new(self.tests.clone()),
            KindId::Registration => Box::new(self.registrations.clone()),
            KindId::Parent => Box::new(self.parents.clone()),
        }
    }

    pub fn feeds(&self) -> ListFeeds {
        ListFeeds {
            tests: self.tests.subscribe(),
            registrations: self.registrations.subscribe(),
            parents: self.parents.subscribe(),
        }
    }
}

pub(crate) fn status_options(
    _query: &ListQuery,
    _stats: Option<&RegistrationStats>,
) -> Option<Vec<FilterOption>> {
    Some(vec![
        FilterOption::new("All Status", ""),
        FilterOption::new("Active", "true"),
        FilterOption::new("Inactive", "false"),
    ])
}

/// "All ..." followed by one option per facet, labelled with its live count.
pub(crate) fn facet_options<'a>(
    all_label: &str,
    facets: impl IntoIterator<Item = &'a Facet>,
) -> Vec<FilterOption> {
    std::iter::once(FilterOption::new(all_label, ""))
        .chain(
            facets
                .into_iter()
                .map(|f| FilterOption::new(format!("{} ({})", f.label, f.count), f.value.clone())),
        )
        .collect()
}

pub(crate) fn status_cell(status: bool, pending: Option<PendingKind>) -> Cell<'static> {
    match pending {
        Some(PendingKind::Toggle) => {
            Cell::from(" ◌ updating").style(Style::default().fg(theme::YELLOW))
        }
        Some(PendingKind::Delete) => {
            Cell::from(" ✗ deleting").style(Style::default().fg(theme::RED))
        }
        None if status => Cell::from(" ● Active").style(Style::default().fg(theme::GREEN)),
        None => Cell::from(" ○ Inactive").style(Style::default().fg(theme::TEXT_MUTED)),
    }
}

pub(crate) fn ordinal_cell(ordinal: u64) -> Cell<'static> {
    Cell::from(format!(" {}", ordinal)).style(Style::default().fg(theme::TEXT_MUTED))
}

pub(crate) fn format_date(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(|t| {
        let local = t.with_timezone(&chrono::Local);
        local.format("%Y-%m-%d").to_string()
    })
    .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_is_registered() {
        for kind in KindId::ALL {
            assert_eq!(kind_spec(kind).id, kind);
        }
        assert_eq!(registry().len(), KindId::ALL.len());
    }

    #[test]
    fn operation_keys_resolve_per_kind() {
        assert_eq!(
            operation_for_key(KindId::Parent, 's'),
            Some(OperationId::ToggleStatus)
        );
        assert_eq!(
            operation_for_key(KindId::TestService, 'd'),
            Some(OperationId::Delete)
        );
        assert_eq!(operation_for_key(KindId::TestService, 'o'), None);
        assert!(has_operation(KindId::Registration, OperationId::Open));
    }

    #[test]
    fn facet_labels_carry_counts() {
        let facets = [Facet {
            label: "Active".to_string(),
            value: "true".to_string(),
            count: 3,
        }];
        let options = facet_options("All Status", &facets);
        assert_eq!(
            options,
            vec![
                FilterOption::new("All Status", ""),
                FilterOption::new("Active (3)", "true"),
            ]
        );
    }
}
