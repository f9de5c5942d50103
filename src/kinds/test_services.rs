use std::sync::Arc;

use async_trait::async_trait;
use ratatui::layout::Constraint;
use ratatui::style::Style;
use ratatui::widgets::{Cell, Row, TableState};

use super::{
    format_date, ordinal_cell, status_cell, status_options, CollectionSpec, FilterSpec,
    OperationId, OperationSpec,
};
use crate::app::App;
use crate::client::{Ack, AdminClient, ClientResult, ListPage, ListParams};
use crate::controller::{Resource, ResourceLabels};
use crate::domain::{TestService, TestServiceDraft};
use crate::theme;

static LABELS: ResourceLabels = ResourceLabels {
    fetch_failed: "Failed to fetch data",
    status_failed: "Failed to update status",
    status_updated: "Status updated",
    delete_prompt: "Are you sure? You won't be able to revert this!",
    delete_failed: "Failed to delete",
    deleted: "Deleted",
    submit_failed: "Operation failed",
    created: "Created",
    updated: "Updated",
};

/// The test and service catalog labs pick from.
pub struct TestServices {
    client: Arc<dyn AdminClient>,
}

impl TestServices {
    pub fn new(client: Arc<dyn AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for TestServices {
    type Row = TestService;
    type Draft = TestServiceDraft;

    fn labels(&self) -> &'static ResourceLabels {
        &LABELS
    }

    async fn list(&self, params: &ListParams) -> ClientResult<ListPage<TestService>> {
        self.client.list_test_services(params).await
    }

    async fn set_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.client.set_test_service_status(id, status).await
    }

    async fn remove(&self, id: &str) -> ClientResult<Ack> {
        self.client.delete_test_service(id).await
    }

    async fn create(&self, draft: &TestServiceDraft) -> ClientResult<Ack> {
        self.client.create_test_service(draft).await
    }

    async fn update(&self, id: &str, draft: &TestServiceDraft) -> ClientResult<Ack> {
        self.client.update_test_service(id, draft).await
    }
}

pub fn default_filters() -> Vec<(&'static str, &'static str)> {
    vec![("status", "")]
}

pub(super) const FILTERS: &[FilterSpec] = &[FilterSpec {
    key: "status",
    label: "Status",
    options: status_options,
}];

pub(super) const OPERATIONS: &[OperationSpec] = &[
    OperationSpec {
        id: OperationId::ToggleStatus,
        label: "toggle",
        key: 's',
    },
    OperationSpec {
        id: OperationId::Create,
        label: "add",
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
    header: &[" #", "Title", "Created", "Status"],
    widths,
    rows,
    loading_label: " Loading tests & services...",
    empty_label: " No tests or services found",
    table_state,
};

fn widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(55),
        Constraint::Length(12),
        Constraint::Length(14),
    ]
}

fn rows(app: &App) -> Vec<Row<'static>> {
    let view = app.feeds.tests.borrow();
    view.rows
        .iter()
        .enumerate()
        .map(|(i, test)| {
            Row::new(vec![
                ordinal_cell(view.pagination.ordinal(i)),
                Cell::from(test.title.clone()).style(Style::default().fg(theme::TEXT)),
                Cell::from(format_date(test.created_at.as_ref())),
                status_cell(test.status, view.pending.get(&test.id)),
            ])
        })
        .collect()
}

fn table_state(app: &mut App) -> &mut TableState {
    &mut app.test_table_state
}
