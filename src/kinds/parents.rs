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
use crate::domain::{Parent, ParentDraft};
use crate::theme;

static LABELS: ResourceLabels = ResourceLabels {
    fetch_failed: "Failed to fetch parents",
    status_failed: "Failed to update status",
    status_updated: "Status updated",
    delete_prompt: "Are you sure? You won't be able to revert this!",
    delete_failed: "Failed to delete",
    deleted: "Parent deleted",
    submit_failed: "Something went wrong",
    created: "Parent created",
    updated: "Parent updated",
};

/// Owning organizations of labs.
pub struct Parents {
    client: Arc<dyn AdminClient>,
}

impl Parents {
    pub fn new(client: Arc<dyn AdminClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Resource for Parents {
    type Row = Parent;
    type Draft = ParentDraft;

    fn labels(&self) -> &'static ResourceLabels {
        &LABELS
    }

    async fn list(&self, params: &ListParams) -> ClientResult<ListPage<Parent>> {
        self.client.list_parents(params).await
    }

    async fn set_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.client.set_parent_status(id, status).await
    }

    async fn remove(&self, id: &str) -> ClientResult<Ack> {
        self.client.delete_parent(id).await
    }

    async fn create(&self, draft: &ParentDraft) -> ClientResult<Ack> {
        self.client.create_parent(draft).await
    }

    async fn update(&self, id: &str, draft: &ParentDraft) -> ClientResult<Ack> {
        self.client.update_parent(id, draft).await
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
        id: OperationId::Open,
        label: "labs",
        key: 'o',
    },
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
    header: &[" #", "Name", "Labs", "Created", "Status"],
    widths,
    rows,
    loading_label: " Loading parents...",
    empty_label: " No parents found",
    table_state,
};

fn widths() -> Vec<Constraint> {
    vec![
        Constraint::Length(6),
        Constraint::Percentage(45),
        Constraint::Length(8),
        Constraint::Length(12),
        Constraint::Length(14),
    ]
}

fn rows(app: &App) -> Vec<Row<'static>> {
    let view = app.feeds.parents.borrow();
    view.rows
        .iter()
        .enumerate()
        .map(|(i, parent)| {
            Row::new(vec![
                ordinal_cell(view.pagination.ordinal(i)),
                Cell::from(parent.name.clone()).style(Style::default().fg(theme::TEXT)),
                Cell::from(parent.registration_count.to_string()),
                Cell::from(format_date(parent.created_at.as_ref())),
                status_cell(parent.status, view.pending.get(&parent.id)),
            ])
        })
        .collect()
}

fn table_state(app: &mut App) -> &mut TableState {
    &mut app.parent_table_state
}
