//! The list-view controller shared by every listed resource.
//!
//! A [`ListController`] owns the query (debounced search, filters, page), the
//! current page of rows and the set of rows with an in-flight mutation. All of
//! it lives in one `watch` channel so readers always see a consistent
//! snapshot. Resources plug in through the [`Resource`] capability trait.

pub mod debounce;
pub mod gate;
pub mod list;
pub mod pending;
pub mod query;

pub use debounce::Debouncer;
pub use gate::{ConfirmationGate, Notice, NoticeLevel, Notifier};
pub use list::{ControllerConfig, ListController, ListOps, ListView, MutationOutcome};
pub use pending::{PendingActions, PendingKind};
pub use query::ListQuery;

use async_trait::async_trait;

use crate::client::{Ack, ClientResult, ListPage, ListParams};
use crate::domain::{Draft, ListRow};

/// User-facing strings a resource supplies to the shared controller.
#[derive(Debug, Clone, Copy)]
pub struct ResourceLabels {
    pub fetch_failed: &'static str,
    pub status_failed: &'static str,
    pub status_updated: &'static str,
    pub delete_prompt: &'static str,
    pub delete_failed: &'static str,
    pub deleted: &'static str,
    pub submit_failed: &'static str,
    pub created: &'static str,
    pub updated: &'static str,
}

/// Anything that can be listed, toggled, deleted, created and edited.
#[async_trait]
pub trait Resource: Send + Sync + 'static {
    type Row: ListRow;
    type Draft: Draft + Send + Sync + 'static;

    fn labels(&self) -> &'static ResourceLabels;

    async fn list(&self, params: &ListParams) -> ClientResult<ListPage<Self::Row>>;

    async fn set_status(&self, id: &str, status: bool) -> ClientResult<Ack>;

    async fn remove(&self, id: &str) -> ClientResult<Ack>;

    async fn create(&self, draft: &Self::Draft) -> ClientResult<Ack>;

    async fn update(&self, id: &str, draft: &Self::Draft) -> ClientResult<Ack>;
}
