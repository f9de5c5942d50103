use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use super::debounce::Debouncer;
use super::gate::{ConfirmationGate, Notifier};
use super::pending::{PendingActions, PendingKind};
use super::query::ListQuery;
use super::Resource;
use crate::client::{ClientResult, ListPage};
use crate::domain::{Draft, ListRow, Pagination, RegistrationStats};

/// Everything a list screen renders, published as one snapshot.
#[derive(Debug, Clone)]
pub struct ListView<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
    pub stats: Option<RegistrationStats>,
    pub query: ListQuery,
    pub loading: bool,
    /// Set after the first successful fetch.
    pub loaded: bool,
    pub pending: PendingActions,
}

impl<T> ListView<T> {
    pub fn new(query: ListQuery) -> Self {
        Self {
            rows: Vec::new(),
            pagination: Pagination::empty(query.limit),
            stats: None,
            query,
            loading: false,
            loaded: false,
            pending: PendingActions::default(),
        }
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.has_prev(self.query.page)
    }

    pub fn has_next(&self) -> bool {
        self.pagination.has_next(self.query.page)
    }
}

impl<T: ListRow> ListView<T> {
    pub fn row(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self::new(ListQuery::default())
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub limit: u32,
    pub debounce: Duration,
    pub filters: Vec<(&'static str, &'static str)>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            limit: 10,
            debounce: Duration::from_millis(500),
            filters: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    Applied,
    Failed,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// Another action on the same row was still in flight.
    Skipped,
}

enum Commit {
    Stale,
    Done,
    Refetch,
}

struct Inner<R: Resource> {
    resource: R,
    notifier: Arc<dyn Notifier>,
    gate: Arc<dyn ConfirmationGate>,
    state: watch::Sender<ListView<R::Row>>,
    latest_fetch: AtomicU64,
    debounce: Debouncer,
}

impl<R: Resource> Inner<R> {
    fn finish_loading(&self, seq: u64) {
        self.state.send_if_modified(|view| {
            if self.latest_fetch.load(Ordering::SeqCst) != seq || !view.loading {
                return false;
            }
            view.loading = false;
            true
        });
    }
}

/// Clears the loading flag if a fetch future is dropped before it finishes.
struct LoadingGuard<'a, R: Resource> {
    inner: &'a Inner<R>,
    seq: u64,
    armed: bool,
}

impl<R: Resource> Drop for LoadingGuard<'_, R> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.finish_loading(self.seq);
        }
    }
}

/// Search, filter, paginate, toggle and delete for one resource.
///
/// Cheap to clone; clones share state.
pub struct ListController<R: Resource> {
    inner: Arc<Inner<R>>,
}

impl<R: Resource> Clone for ListController<R> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<R: Resource> ListController<R> {
    pub fn new(
        resource: R,
        notifier: Arc<dyn Notifier>,
        gate: Arc<dyn ConfirmationGate>,
        config: ControllerConfig,
    ) -> Self {
        let query = config
            .filters
            .iter()
            .fold(ListQuery::new(config.limit), |query, (key, value)| {
                query.with_filter(key, value)
            });
        let (state, _) = watch::channel(ListView::new(query));
        Self {
            inner: Arc::new(Inner {
                resource,
                notifier,
                gate,
                state,
                latest_fetch: AtomicU64::new(0),
                debounce: Debouncer::new(config.debounce),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ListView<R::Row>> {
        self.inner.state.subscribe()
    }

    pub fn snapshot(&self) -> ListView<R::Row> {
        self.inner.state.borrow().clone()
    }

    pub fn resource(&self) -> &R {
        &self.inner.resource
    }

    /// Fetches the current query. Only the most recently started refresh
    /// gets to publish its result.
    pub async fn refresh(&self) {
        loop {
            let mut seq = 0;
            let mut params = Vec::new();
            self.inner.state.send_modify(|view| {
                seq = self.inner.latest_fetch.fetch_add(1, Ordering::SeqCst) + 1;
                view.loading = true;
                params = view.query.params();
            });

            let mut guard = LoadingGuard {
                inner: &self.inner,
                seq,
                armed: true,
            };
            tracing::debug!(seq, "fetching list");
            let result = self.inner.resource.list(&params).await;
            guard.armed = false;

            match self.commit(seq, result) {
                Commit::Stale | Commit::Done => return,
                Commit::Refetch => continue,
            }
        }
    }

    fn commit(&self, seq: u64, result: ClientResult<ListPage<R::Row>>) -> Commit {
        let mut outcome = Commit::Stale;
        let mut failure = None;
        let mut result = Some(result);

        self.inner.state.send_if_modified(|view| {
            if self.inner.latest_fetch.load(Ordering::SeqCst) != seq {
                return false;
            }
            match result.take() {
                Some(Ok(page)) => {
                    // Deleting the last row of the last page leaves us past the end.
                    let last = page.pagination.last_page();
                    if view.query.page > last {
                        view.query.page = last;
                        outcome = Commit::Refetch;
                        return true;
                    }
                    view.rows = page.rows;
                    view.pagination = page.pagination;
                    if page.stats.is_some() {
                        view.stats = page.stats;
                    }
                    view.loaded = true;
                }
                Some(Err(err)) => failure = Some(err),
                None => {}
            }
            view.loading = false;
            outcome = Commit::Done;
            true
        });

        if matches!(outcome, Commit::Stale) {
            tracing::debug!(seq, "discarding stale list response");
        }
        if let Some(err) = failure {
            tracing::warn!(seq, "list fetch failed: {}", err);
            let labels = self.inner.resource.labels();
            self.inner.notifier.error(&err.describe(labels.fetch_failed));
        }
        outcome
    }

    /// Records a keystroke in the search box. The effective search, and the
    /// fetch it triggers, follow once input has been idle for the debounce
    /// interval.
    pub fn on_search_input(&self, text: impl Into<String>) {
        let text = text.into();
        self.inner.state.send_if_modified(|view| {
            if view.query.search_raw == text {
                return false;
            }
            view.query.search_raw = text;
            true
        });

        let this = self.clone();
        self.inner.debounce.schedule(move || {
            if this.inner.state.send_if_modified(|view| view.query.apply_search()) {
                tokio::spawn(async move { this.refresh().await });
            }
        });
    }

    pub async fn set_filter(&self, key: &str, value: &str) {
        self.set_filters(&[(key, value)]).await;
    }

    /// Applies several filter values at once with a single fetch.
    pub async fn set_filters<K, V>(&self, filters: &[(K, V)])
    where
        K: AsRef<str> + Sync,
        V: AsRef<str> + Sync,
    {
        let changed = self.inner.state.send_if_modified(|view| {
            filters.iter().fold(false, |changed, (key, value)| {
                view.query.set_filter(key.as_ref(), value.as_ref()) || changed
            })
        });
        if changed {
            self.refresh().await;
        }
    }

    pub async fn set_page(&self, page: u32) {
        let changed = self.inner.state.send_if_modified(|view| {
            let page = view.pagination.clamp(page);
            view.query.set_page(page)
        });
        if changed {
            self.refresh().await;
        }
    }

    pub async fn next_page(&self) {
        let page = self.inner.state.borrow().query.page.saturating_add(1);
        self.set_page(page).await;
    }

    pub async fn prev_page(&self) {
        let page = self.inner.state.borrow().query.page.saturating_sub(1);
        self.set_page(page).await;
    }

    fn claim(&self, id: &str, kind: PendingKind) -> bool {
        self.inner
            .state
            .send_if_modified(|view| view.pending.claim(id, kind))
    }

    fn release(&self, id: &str) {
        self.inner
            .state
            .send_if_modified(|view| view.pending.release(id));
    }

    /// Flips one row's status and patches it in place on success.
    pub async fn toggle_status(&self, id: &str, current: bool) -> MutationOutcome {
        // A refresh may have dropped the row since it was selected.
        let claimed = self.inner.state.send_if_modified(|view| {
            view.rows.iter().any(|row| row.id() == id)
                && view.pending.claim(id, PendingKind::Toggle)
        });
        if !claimed {
            tracing::debug!(id, "toggle ignored, row busy or gone");
            return MutationOutcome::Skipped;
        }

        let labels = self.inner.resource.labels();
        let next = !current;
        match self.inner.resource.set_status(id, next).await {
            Ok(ack) => {
                self.inner.state.send_modify(|view| {
                    view.pending.release(id);
                    if let Some(row) = view.rows.iter_mut().find(|row| row.id() == id) {
                        row.set_status(next);
                    }
                });
                self.inner
                    .notifier
                    .success(ack.message_or(labels.status_updated));
                MutationOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(id, "status update failed: {}", err);
                self.release(id);
                self.inner
                    .notifier
                    .error(&err.describe(labels.status_failed));
                MutationOutcome::Failed
            }
        }
    }

    /// Deletes a row after confirmation, then refetches the current page.
    pub async fn remove(&self, id: &str) -> MutationOutcome {
        if self.inner.state.borrow().pending.contains(id) {
            return MutationOutcome::Skipped;
        }

        let labels = self.inner.resource.labels();
        if !self.inner.gate.confirm(labels.delete_prompt).await {
            tracing::debug!(id, "delete cancelled");
            return MutationOutcome::Cancelled;
        }
        if !self.claim(id, PendingKind::Delete) {
            return MutationOutcome::Skipped;
        }

        let result = self.inner.resource.remove(id).await;
        self.release(id);
        match result {
            Ok(ack) => {
                self.inner.notifier.success(ack.message_or(labels.deleted));
                self.refresh().await;
                MutationOutcome::Applied
            }
            Err(err) => {
                tracing::warn!(id, "delete failed: {}", err);
                self.inner
                    .notifier
                    .error(&err.describe(labels.delete_failed));
                MutationOutcome::Failed
            }
        }
    }

    /// Creates (`target == None`) or updates a row from a form draft.
    /// Returns true when the server accepted it.
    pub async fn submit(&self, target: Option<&str>, draft: &R::Draft) -> bool {
        if let Err(err) = draft.validate() {
            self.inner.notifier.error(&err.0);
            return false;
        }

        let labels = self.inner.resource.labels();
        let result = match target {
            Some(id) => self.inner.resource.update(id, draft).await,
            None => self.inner.resource.create(draft).await,
        };
        match result {
            Ok(ack) => {
                let fallback = if target.is_some() {
                    labels.updated
                } else {
                    labels.created
                };
                self.inner.notifier.success(ack.message_or(fallback));
                self.refresh().await;
                true
            }
            Err(err) => {
                tracing::warn!(id = ?target, "submit failed: {}", err);
                self.inner
                    .notifier
                    .error(&err.describe(labels.submit_failed));
                false
            }
        }
    }
}

/// Type-erased list operations, so the UI can drive any resource's
/// controller through one handle.
#[async_trait]
pub trait ListOps: Send + Sync {
    async fn refresh(&self);

    fn on_search_input(&self, text: String);

    async fn set_filters(&self, filters: Vec<(String, String)>);

    async fn set_page(&self, page: u32);

    async fn next_page(&self);

    async fn prev_page(&self);

    async fn toggle_status(&self, id: String, current: bool) -> MutationOutcome;

    async fn remove(&self, id: String) -> MutationOutcome;
}

#[async_trait]
impl<R: Resource> ListOps for ListController<R> {
    async fn refresh(&self) {
        ListController::refresh(self).await
    }

    fn on_search_input(&self, text: String) {
        ListController::on_search_input(self, text)
    }

    async fn set_filters(&self, filters: Vec<(String, String)>) {
        ListController::set_filters(self, &filters).await
    }

    async fn set_page(&self, page: u32) {
        ListController::set_page(self, page).await
    }

    async fn next_page(&self) {
        ListController::next_page(self).await
    }

    async fn prev_page(&self) {
        ListController::prev_page(self).await
    }

    async fn toggle_status(&self, id: String, current: bool) -> MutationOutcome {
        ListController::toggle_status(self, &id, current).await
    }

    async fn remove(&self, id: String) -> MutationOutcome {
        ListController::remove(self, &id).await
    }
}
