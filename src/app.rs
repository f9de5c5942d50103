use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::widgets::TableState;
use tokio::sync::{oneshot, watch};

use crate::action::{Action, ViewType};
use crate::controller::{ListQuery, ListView, Notice};
use crate::domain::*;
use crate::input::commands::find_command;
use crate::input::{FormDraft, FormState, FormTarget};
use crate::kinds::registrations::{other_reg_type, parent_filters, reg_type_filters, REG_TYPE};
use crate::kinds::{collection_spec, has_operation, kind_spec, FilterOption, FilterSpec, KindId, OperationId};

const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Collection(KindId),
    RegistrationDetail,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Command,
    Search,
    PendingG,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    Confirm(String),
    Filters { focus: usize },
    Form(FormState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    LoggedOut,
    LoggingIn,
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Refresh(KindId),
    SearchInput(KindId, String),
    SetFilters(KindId, Vec<(String, String)>),
    NextPage(KindId),
    PrevPage(KindId),
    ToggleStatus(KindId, String, bool),
    Remove(KindId, String),
    Submit(KindId, Option<String>, FormDraft),
    LoadDashboard,
    LoadRegistration(String),
    LoadProfile,
    UpdateProfile(String, ProfileDraft),
    Login { email: String, password: String },
    Logout,
    Quit,
}

/// Live snapshots published by the three list controllers.
pub struct ListFeeds {
    pub tests: watch::Receiver<ListView<TestService>>,
    pub registrations: watch::Receiver<ListView<Registration>>,
    pub parents: watch::Receiver<ListView<Parent>>,
}

/// The row-independent part of a list snapshot.
#[derive(Debug, Clone)]
pub struct FeedSummary {
    pub query: ListQuery,
    pub pagination: Pagination,
    pub stats: Option<RegistrationStats>,
    pub len: usize,
    pub loading: bool,
    pub loaded: bool,
    pub has_prev: bool,
    pub has_next: bool,
}

impl ListFeeds {
    pub fn summary(&self, kind: KindId) -> FeedSummary {
        match kind {
            KindId::TestService => summarize(&self.tests),
            KindId::Registration => summarize(&self.registrations),
            KindId::Parent => summarize(&self.parents),
        }
    }

    fn row_at(&self, kind: KindId, index: usize) -> Option<(String, bool)> {
        match kind {
            KindId::TestService => row_at(&self.tests, index),
            KindId::Registration => row_at(&self.registrations, index),
            KindId::Parent => row_at(&self.parents, index),
        }
    }
}

fn summarize<T>(feed: &watch::Receiver<ListView<T>>) -> FeedSummary {
    let view = feed.borrow();
    FeedSummary {
        query: view.query.clone(),
        pagination: view.pagination,
        stats: view.stats.clone(),
        len: view.rows.len(),
        loading: view.loading,
        loaded: view.loaded,
        has_prev: view.has_prev(),
        has_next: view.has_next(),
    }
}

fn row_at<T: ListRow>(feed: &watch::Receiver<ListView<T>>, index: usize) -> Option<(String, bool)> {
    let view = feed.borrow();
    view.rows
        .get(index)
        .map(|row| (row.id().to_string(), row.status()))
}

pub struct App {
    // View state
    pub view: View,
    pub input_mode: InputMode,
    pub overlay: Overlay,
    pub active_tab: ViewType,

    // Lists
    pub feeds: ListFeeds,
    pub test_table_state: TableState,
    pub registration_table_state: TableState,
    pub parent_table_state: TableState,

    // Other screens
    pub dashboard: Option<DashboardStats>,
    pub registration: Option<Registration>,
    pub profile: Option<AdminProfile>,
    pub detail_scroll: u16,

    // Session
    pub session: SessionStatus,
    pub login_email: String,
    pending_confirm: Option<oneshot::Sender<bool>>,

    // Input
    pub input_buffer: String,

    // App
    pub should_quit: bool,
    pub toasts: VecDeque<(Notice, Instant)>,
}

impl App {
    pub fn new(feeds: ListFeeds, login_email: String) -> Self {
        Self {
            view: View::Dashboard,
            input_mode: InputMode::Normal,
            overlay: Overlay::None,
            active_tab: ViewType::Dashboard,

            feeds,
            test_table_state: TableState::default(),
            registration_table_state: TableState::default(),
            parent_table_state: TableState::default(),

            dashboard: None,
            registration: None,
            profile: None,
            detail_scroll: 0,

            session: SessionStatus::LoggedOut,
            login_email,
            pending_confirm: None,

            input_buffer: String::new(),

            should_quit: false,
            toasts: VecDeque::new(),
        }
    }

    pub fn login_email_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.login_email.is_empty() {
            fallback
        } else {
            &self.login_email
        }
    }

    /// Opens the login form. Also used at startup when no credentials were given.
    pub fn prompt_login(&mut self) {
        self.overlay = Overlay::Form(FormState::login(&self.login_email));
    }

    pub fn update(&mut self, action: Action) -> Vec<Effect> {
        match action {
            // Navigation
            Action::NavigateUp => {
                if self.is_scroll_view() {
                    self.detail_scroll = self.detail_scroll.saturating_sub(1);
                } else if let Some(state) = self.current_table_state() {
                    state.select_previous();
                }
                vec![]
            }
            Action::NavigateDown => {
                if self.is_scroll_view() {
                    self.detail_scroll = self.detail_scroll.saturating_add(1);
                } else {
                    self.navigate_down(1);
                }
                vec![]
            }
            Action::NavigateTop => {
                self.input_mode = InputMode::Normal;
                if self.is_scroll_view() {
                    self.detail_scroll = 0;
                } else if let Some(state) = self.current_table_state() {
                    state.select_first();
                }
                vec![]
            }
            Action::NavigateBottom => {
                if self.is_scroll_view() {
                    self.detail_scroll = u16::MAX;
                } else {
                    self.navigate_down(usize::MAX);
                }
                vec![]
            }
            Action::PageUp => {
                if self.is_scroll_view() {
                    self.detail_scroll = self.detail_scroll.saturating_sub(self.page_height());
                } else if let Some(state) = self.current_table_state() {
                    let idx = state.selected().unwrap_or(0);
                    state.select(Some(idx.saturating_sub(10)));
                }
                vec![]
            }
            Action::PageDown => {
                if self.is_scroll_view() {
                    self.detail_scroll = self.detail_scroll.saturating_add(self.page_height());
                } else {
                    self.navigate_down(self.page_height() as usize);
                }
                vec![]
            }
            Action::NextPage => match self.current_kind() {
                Some(kind) => vec![Effect::NextPage(kind)],
                None => vec![],
            },
            Action::PrevPage => match self.current_kind() {
                Some(kind) => vec![Effect::PrevPage(kind)],
                None => vec![],
            },
            Action::Select => self.handle_select(),
            Action::Back => self.handle_back(),

            // View switching
            Action::SwitchView(view_type) => self.switch_view(view_type),

            // Vim chord
            Action::EnterPendingG => {
                self.input_mode = InputMode::PendingG;
                vec![]
            }

            // Operations
            Action::RunOperation(op_id) => self.run_operation(op_id),
            Action::ToggleRegType => {
                if self.view != View::Collection(KindId::Registration) {
                    return vec![];
                }
                let query = self.feeds.summary(KindId::Registration).query;
                let next = other_reg_type(query.filter(REG_TYPE));
                self.registration_table_state.select(None);
                vec![Effect::SetFilters(
                    KindId::Registration,
                    reg_type_filters(next),
                )]
            }

            // UI
            Action::OpenCommandInput => {
                self.input_mode = InputMode::Command;
                self.input_buffer.clear();
                vec![]
            }
            Action::OpenSearch => {
                if let Some(kind) = self.current_kind() {
                    self.input_mode = InputMode::Search;
                    self.input_buffer = self.feeds.summary(kind).query.search_raw;
                }
                vec![]
            }
            Action::OpenFilters => {
                if let Some(kind) = self.current_kind() {
                    if !self.visible_filters(kind).is_empty() {
                        self.overlay = Overlay::Filters { focus: 0 };
                    }
                }
                vec![]
            }
            Action::CloseOverlay => {
                if self.overlay != Overlay::None {
                    self.close_overlay();
                } else if self.input_mode != InputMode::Normal {
                    self.input_mode = InputMode::Normal;
                    self.input_buffer.clear();
                }
                vec![]
            }
            Action::SubmitCommandInput(cmd) => {
                self.input_mode = InputMode::Normal;
                let effects = self.execute_command(&cmd);
                self.input_buffer.clear();
                effects
            }
            Action::UpdateInputBuffer(buf) => {
                self.input_buffer = buf;
                match (&self.input_mode, self.current_kind()) {
                    (InputMode::Search, Some(kind)) => {
                        vec![Effect::SearchInput(kind, self.input_buffer.clone())]
                    }
                    _ => vec![],
                }
            }
            Action::ToggleHelp => {
                self.overlay = if self.overlay == Overlay::Help {
                    Overlay::None
                } else {
                    Overlay::Help
                };
                vec![]
            }

            // Filter picker
            Action::FilterFocusNext => {
                self.move_filter_focus(true);
                vec![]
            }
            Action::FilterFocusPrev => {
                self.move_filter_focus(false);
                vec![]
            }
            Action::FilterCycle(forward) => self.cycle_filter(forward),

            // Forms
            Action::FormInput(c) => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.input(c);
                }
                vec![]
            }
            Action::FormBackspace => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.backspace();
                }
                vec![]
            }
            Action::FormNextField => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.focus_next();
                }
                vec![]
            }
            Action::FormPrevField => {
                if let Overlay::Form(form) = &mut self.overlay {
                    form.focus_prev();
                }
                vec![]
            }
            Action::FormSubmit => self.submit_form(),
            Action::EditProfile => {
                if let Some(profile) = &self.profile {
                    self.overlay = Overlay::Form(FormState::profile(profile));
                }
                vec![]
            }
            Action::FormAccepted(kind) => {
                if let Overlay::Form(form) = &self.overlay {
                    if matches!(form.target, FormTarget::Create(k) | FormTarget::Edit(k, _) if k == kind)
                    {
                        self.overlay = Overlay::None;
                    }
                }
                vec![]
            }

            // Confirmation
            Action::RequestConfirm { prompt, reply } => {
                if let Some(previous) = self.pending_confirm.replace(reply) {
                    let _ = previous.send(false);
                }
                self.overlay = Overlay::Confirm(prompt);
                vec![]
            }
            Action::ConfirmAnswer(answer) => {
                if let Some(reply) = self.pending_confirm.take() {
                    let _ = reply.send(answer);
                }
                if matches!(self.overlay, Overlay::Confirm(_)) {
                    self.overlay = Overlay::None;
                }
                vec![]
            }

            // Data responses
            Action::ListChanged(kind) => {
                let len = self.feeds.summary(kind).len;
                let state = (collection_spec(kind).table_state)(self);
                match state.selected() {
                    _ if len == 0 => state.select(None),
                    None => state.select(Some(0)),
                    Some(idx) if idx >= len => state.select(Some(len - 1)),
                    Some(_) => {}
                }
                vec![]
            }
            Action::DashboardLoaded(stats) => {
                self.dashboard = Some(stats);
                vec![]
            }
            Action::RegistrationLoaded(registration) => {
                self.registration = Some(*registration);
                vec![]
            }
            Action::ProfileLoaded(profile) => {
                self.profile = Some(profile);
                vec![]
            }
            Action::ProfileUpdated => {
                if matches!(&self.overlay, Overlay::Form(form) if matches!(form.target, FormTarget::Profile(_)))
                {
                    self.overlay = Overlay::None;
                }
                vec![Effect::LoadProfile]
            }
            Action::LoggedIn => {
                self.session = SessionStatus::Active;
                if matches!(&self.overlay, Overlay::Form(form) if form.target == FormTarget::Login) {
                    self.overlay = Overlay::None;
                }
                self.refresh_current_view()
            }
            Action::SessionExpired => {
                self.session = SessionStatus::LoggedOut;
                self.profile = None;
                self.dashboard = None;
                if let Some(reply) = self.pending_confirm.take() {
                    let _ = reply.send(false);
                }
                self.prompt_login();
                vec![]
            }

            // App control
            Action::Refresh => self.refresh_current_view(),
            Action::Quit => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            Action::Tick => {
                self.expire_toasts(Instant::now());
                vec![]
            }
            Action::Notify(notice) => {
                self.push_toast(notice);
                vec![]
            }
        }
    }

    fn switch_view(&mut self, view_type: ViewType) -> Vec<Effect> {
        self.active_tab = view_type;
        self.detail_scroll = 0;
        match view_type {
            ViewType::Dashboard => {
                self.view = View::Dashboard;
                vec![Effect::LoadDashboard]
            }
            ViewType::Profile => {
                self.view = View::Profile;
                vec![Effect::LoadProfile]
            }
            ViewType::Tests | ViewType::Registrations | ViewType::Parents => {
                let Some(kind) = view_type.kind() else {
                    return vec![];
                };
                self.view = View::Collection(kind);
                vec![Effect::Refresh(kind)]
            }
        }
    }

    fn handle_select(&mut self) -> Vec<Effect> {
        match self.view {
            View::Collection(kind) if has_operation(kind, OperationId::Open) => {
                self.run_operation(OperationId::Open)
            }
            View::Collection(kind) if has_operation(kind, OperationId::Edit) => {
                self.run_operation(OperationId::Edit)
            }
            _ => vec![],
        }
    }

    fn handle_back(&mut self) -> Vec<Effect> {
        match self.view {
            View::RegistrationDetail => {
                self.view = View::Collection(KindId::Registration);
                self.registration = None;
                self.detail_scroll = 0;
                vec![]
            }
            _ => vec![],
        }
    }

    fn execute_command(&mut self, cmd: &str) -> Vec<Effect> {
        let command = cmd.trim();
        let Some(def) = find_command(command) else {
            self.push_toast(Notice::error(format!("unknown command: {}", command)));
            return vec![];
        };
        match def.name {
            "home" => self.switch_view(ViewType::Dashboard),
            "tests" => self.switch_view(ViewType::Tests),
            "registrations" => self.switch_view(ViewType::Registrations),
            "parents" => self.switch_view(ViewType::Parents),
            "profile" => self.switch_view(ViewType::Profile),
            "refresh" => self.refresh_current_view(),
            "login" => {
                self.prompt_login();
                vec![]
            }
            "logout" => vec![Effect::Logout],
            "quit" => {
                self.should_quit = true;
                vec![Effect::Quit]
            }
            "help" => {
                self.overlay = Overlay::Help;
                vec![]
            }
            _ => vec![],
        }
    }

    fn refresh_current_view(&mut self) -> Vec<Effect> {
        match &self.view {
            View::Dashboard => vec![Effect::LoadDashboard],
            View::Collection(kind) => vec![Effect::Refresh(*kind)],
            View::RegistrationDetail => match &self.registration {
                Some(reg) => vec![Effect::LoadRegistration(reg.id.clone())],
                None => vec![],
            },
            View::Profile => vec![Effect::LoadProfile],
        }
    }

    fn run_operation(&mut self, op_id: OperationId) -> Vec<Effect> {
        let Some(kind) = self.current_kind() else {
            return vec![];
        };
        if !has_operation(kind, op_id) {
            return vec![];
        }
        if op_id == OperationId::Create {
            self.overlay = Overlay::Form(match kind {
                KindId::TestService => FormState::test_service(None),
                KindId::Registration => FormState::registration(None),
                KindId::Parent => FormState::parent(None),
            });
            return vec![];
        }

        let Some((id, status)) = self.selected_row(kind) else {
            self.push_toast(Notice::error("no row selected"));
            return vec![];
        };
        match op_id {
            OperationId::ToggleStatus => vec![Effect::ToggleStatus(kind, id, status)],
            OperationId::Delete => vec![Effect::Remove(kind, id)],
            OperationId::Edit => {
                let form = match kind {
                    KindId::TestService => FormState::test_service(self.feeds.tests.borrow().row(&id)),
                    KindId::Registration => {
                        FormState::registration(self.feeds.registrations.borrow().row(&id))
                    }
                    KindId::Parent => FormState::parent(self.feeds.parents.borrow().row(&id)),
                };
                self.overlay = Overlay::Form(form);
                vec![]
            }
            OperationId::Open => match kind {
                KindId::Parent => {
                    self.active_tab = ViewType::Registrations;
                    self.view = View::Collection(KindId::Registration);
                    self.registration_table_state.select(None);
                    vec![Effect::SetFilters(KindId::Registration, parent_filters(&id))]
                }
                KindId::Registration => {
                    self.view = View::RegistrationDetail;
                    self.registration = None;
                    self.detail_scroll = 0;
                    vec![Effect::LoadRegistration(id)]
                }
                KindId::TestService => vec![],
            },
            OperationId::Create => vec![],
        }
    }

    fn submit_form(&mut self) -> Vec<Effect> {
        let Overlay::Form(form) = &self.overlay else {
            return vec![];
        };
        let draft = form.draft();
        match (form.target.clone(), draft) {
            (FormTarget::Create(kind), draft) => vec![Effect::Submit(kind, None, draft)],
            (FormTarget::Edit(kind, id), draft) => vec![Effect::Submit(kind, Some(id), draft)],
            (FormTarget::Profile(id), FormDraft::Profile(draft)) => {
                vec![Effect::UpdateProfile(id, draft)]
            }
            (FormTarget::Login, FormDraft::Login { email, password }) => {
                if email.is_empty() || password.is_empty() {
                    self.push_toast(Notice::error("Email and password are required"));
                    return vec![];
                }
                self.login_email = email.clone();
                self.session = SessionStatus::LoggingIn;
                vec![Effect::Login { email, password }]
            }
            _ => vec![],
        }
    }

    /// Filters shown for `kind` under its current query, with their options.
    pub fn visible_filters(&self, kind: KindId) -> Vec<(&'static FilterSpec, Vec<FilterOption>)> {
        let summary = self.feeds.summary(kind);
        kind_spec(kind)
            .filters
            .iter()
            .filter_map(|spec| {
                (spec.options)(&summary.query, summary.stats.as_ref()).map(|opts| (spec, opts))
            })
            .collect()
    }

    fn move_filter_focus(&mut self, forward: bool) {
        let count = self
            .current_kind()
            .map(|kind| self.visible_filters(kind).len())
            .unwrap_or(0);
        if let Overlay::Filters { focus } = &mut self.overlay {
            if count > 0 {
                *focus = if forward {
                    (*focus + 1) % count
                } else {
                    (*focus + count - 1) % count
                };
            }
        }
    }

    fn cycle_filter(&mut self, forward: bool) -> Vec<Effect> {
        let (Some(kind), Overlay::Filters { focus }) = (self.current_kind(), &self.overlay) else {
            return vec![];
        };
        let filters = self.visible_filters(kind);
        if filters.is_empty() {
            return vec![];
        }
        let (spec, options) = &filters[*focus % filters.len()];
        if options.is_empty() {
            return vec![];
        }
        let query = self.feeds.summary(kind).query;
        let current = options
            .iter()
            .position(|opt| opt.value == query.filter(spec.key))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        vec![Effect::SetFilters(
            kind,
            vec![(spec.key.to_string(), options[next].value.clone())],
        )]
    }

    fn close_overlay(&mut self) {
        if matches!(self.overlay, Overlay::Confirm(_)) {
            if let Some(reply) = self.pending_confirm.take() {
                let _ = reply.send(false);
            }
        }
        self.overlay = Overlay::None;
    }

    fn push_toast(&mut self, notice: Notice) {
        self.toasts.push_back((notice, Instant::now()));
        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }
    }

    fn expire_toasts(&mut self, now: Instant) {
        self.toasts
            .retain(|(_, at)| now.saturating_duration_since(*at) < TOAST_TTL);
    }

    pub fn current_kind(&self) -> Option<KindId> {
        match self.view {
            View::Collection(kind) => Some(kind),
            _ => None,
        }
    }

    fn selected_row(&self, kind: KindId) -> Option<(String, bool)> {
        let state = match kind {
            KindId::TestService => &self.test_table_state,
            KindId::Registration => &self.registration_table_state,
            KindId::Parent => &self.parent_table_state,
        };
        self.feeds.row_at(kind, state.selected()?)
    }

    fn current_table_state(&mut self) -> Option<&mut TableState> {
        let kind = self.current_kind()?;
        Some((collection_spec(kind).table_state)(self))
    }

    fn navigate_down(&mut self, by: usize) {
        let Some(kind) = self.current_kind() else {
            return;
        };
        let len = self.feeds.summary(kind).len;
        if len == 0 {
            return;
        }
        let state = (collection_spec(kind).table_state)(self);
        let next = state
            .selected()
            .map_or(0, |idx| idx.saturating_add(by).min(len - 1));
        state.select(Some(next));
    }

    fn is_scroll_view(&self) -> bool {
        matches!(
            self.view,
            View::RegistrationDetail | View::Profile | View::Dashboard
        )
    }

    fn page_height(&self) -> u16 {
        10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::NoticeLevel;
    use crate::kinds::{parents, registrations, test_services};
    use crate::kinds::registrations::{PARENT, PARENT_ID};

    struct Fixture {
        app: App,
        tests: watch::Sender<ListView<TestService>>,
        registrations: watch::Sender<ListView<Registration>>,
        parents: watch::Sender<ListView<Parent>>,
    }

    fn view_with<T>(filters: Vec<(&'static str, &'static str)>) -> ListView<T> {
        let query = filters
            .into_iter()
            .fold(ListQuery::new(10), |q, (k, v)| q.with_filter(k, v));
        ListView::new(query)
    }

    fn fixture() -> Fixture {
        let (tests, tests_rx) = watch::channel(view_with(test_services::default_filters()));
        let (registrations, registrations_rx) =
            watch::channel(view_with(registrations::default_filters()));
        let (parents, parents_rx) = watch::channel(view_with(parents::default_filters()));
        let feeds = ListFeeds {
            tests: tests_rx,
            registrations: registrations_rx,
            parents: parents_rx,
        };
        Fixture {
            app: App::new(feeds, "admin@example.com".to_string()),
            tests,
            registrations,
            parents,
        }
    }

    fn test_service(id: &str, status: bool) -> TestService {
        TestService {
            id: id.to_string(),
            title: format!("Test {}", id),
            status,
            created_at: None,
        }
    }

    fn parent(id: &str, name: &str) -> Parent {
        Parent {
            id: id.to_string(),
            name: name.to_string(),
            status: true,
            registration_count: 0,
            created_at: None,
        }
    }

    #[test]
    fn search_mode_forwards_every_keystroke() {
        let mut f = fixture();
        f.app.update(Action::SwitchView(ViewType::Tests));
        f.app.update(Action::OpenSearch);
        assert_eq!(f.app.input_mode, InputMode::Search);

        let effects = f.app.update(Action::UpdateInputBuffer("la".to_string()));
        assert_eq!(
            effects,
            vec![Effect::SearchInput(KindId::TestService, "la".to_string())]
        );

        f.app.update(Action::CloseOverlay);
        assert_eq!(f.app.input_mode, InputMode::Normal);
        assert!(f.app.update(Action::UpdateInputBuffer("x".to_string())).is_empty());
    }

    #[test]
    fn toggle_sends_selected_rows_current_status() {
        let mut f = fixture();
        f.tests.send_modify(|view| {
            view.rows = vec![test_service("t1", true), test_service("t2", false)];
        });
        f.app.update(Action::SwitchView(ViewType::Tests));
        f.app.update(Action::ListChanged(KindId::TestService));
        f.app.update(Action::NavigateDown);

        let effects = f.app.update(Action::RunOperation(OperationId::ToggleStatus));
        assert_eq!(
            effects,
            vec![Effect::ToggleStatus(
                KindId::TestService,
                "t2".to_string(),
                false
            )]
        );
    }

    #[test]
    fn operations_without_selection_do_nothing() {
        let mut f = fixture();
        f.app.update(Action::SwitchView(ViewType::Parents));
        assert!(f.app.update(Action::RunOperation(OperationId::Delete)).is_empty());
        assert_eq!(f.app.toasts.len(), 1);
    }

    #[test]
    fn opening_parent_filters_registrations() {
        let mut f = fixture();
        f.parents.send_modify(|view| view.rows = vec![parent("p1", "Lal Group")]);
        f.app.update(Action::SwitchView(ViewType::Parents));
        f.app.update(Action::ListChanged(KindId::Parent));

        let effects = f.app.update(Action::Select);
        assert_eq!(f.app.view, View::Collection(KindId::Registration));
        assert_eq!(f.app.active_tab, ViewType::Registrations);
        assert_eq!(
            effects,
            vec![Effect::SetFilters(
                KindId::Registration,
                parent_filters("p1")
            )]
        );
    }

    #[test]
    fn reg_type_toggle_flips_tab() {
        let mut f = fixture();
        f.app.update(Action::SwitchView(ViewType::Registrations));
        let effects = f.app.update(Action::ToggleRegType);
        assert_eq!(
            effects,
            vec![Effect::SetFilters(
                KindId::Registration,
                vec![(REG_TYPE.to_string(), PARENT.to_string())]
            )]
        );

        f.registrations.send_modify(|view| {
            view.query.set_filter(REG_TYPE, PARENT);
        });
        let effects = f.app.update(Action::ToggleRegType);
        assert_eq!(
            effects,
            vec![Effect::SetFilters(
                KindId::Registration,
                vec![
                    (REG_TYPE.to_string(), "individual".to_string()),
                    (PARENT_ID.to_string(), String::new()),
                ]
            )]
        );
    }

    #[test]
    fn filter_cycle_walks_options() {
        let mut f = fixture();
        f.app.update(Action::SwitchView(ViewType::Tests));
        f.app.update(Action::OpenFilters);
        assert_eq!(f.app.overlay, Overlay::Filters { focus: 0 });

        let effects = f.app.update(Action::FilterCycle(true));
        assert_eq!(
            effects,
            vec![Effect::SetFilters(
                KindId::TestService,
                vec![("status".to_string(), "true".to_string())]
            )]
        );

        let effects = f.app.update(Action::FilterCycle(false));
        assert_eq!(
            effects,
            vec![Effect::SetFilters(
                KindId::TestService,
                vec![("status".to_string(), "false".to_string())]
            )]
        );
    }

    #[test]
    fn newer_confirm_cancels_older() {
        let mut f = fixture();
        let (first, mut first_rx) = oneshot::channel();
        let (second, mut second_rx) = oneshot::channel();

        f.app.update(Action::RequestConfirm {
            prompt: "Delete?".to_string(),
            reply: first,
        });
        f.app.update(Action::RequestConfirm {
            prompt: "Delete other?".to_string(),
            reply: second,
        });
        assert_eq!(first_rx.try_recv(), Ok(false));
        assert_eq!(f.app.overlay, Overlay::Confirm("Delete other?".to_string()));

        f.app.update(Action::ConfirmAnswer(true));
        assert_eq!(second_rx.try_recv(), Ok(true));
        assert_eq!(f.app.overlay, Overlay::None);
    }

    #[test]
    fn escape_on_confirm_answers_no() {
        let mut f = fixture();
        let (reply, mut rx) = oneshot::channel();
        f.app.update(Action::RequestConfirm {
            prompt: "Delete?".to_string(),
            reply,
        });
        f.app.update(Action::CloseOverlay);
        assert_eq!(rx.try_recv(), Ok(false));
    }

    #[test]
    fn expired_session_prompts_login() {
        let mut f = fixture();
        f.app.session = SessionStatus::Active;
        f.app.update(Action::SessionExpired);
        assert_eq!(f.app.session, SessionStatus::LoggedOut);

        f.app.update(Action::FormNextField);
        for c in "secret".chars() {
            f.app.update(Action::FormInput(c));
        }
        let effects = f.app.update(Action::FormSubmit);
        assert_eq!(
            effects,
            vec![Effect::Login {
                email: "admin@example.com".to_string(),
                password: "secret".to_string(),
            }]
        );
        assert_eq!(f.app.session, SessionStatus::LoggingIn);

        let effects = f.app.update(Action::LoggedIn);
        assert_eq!(f.app.overlay, Overlay::None);
        assert_eq!(effects, vec![Effect::LoadDashboard]);
    }

    #[test]
    fn create_form_closes_once_accepted() {
        let mut f = fixture();
        f.app.update(Action::SwitchView(ViewType::Parents));
        f.app.update(Action::RunOperation(OperationId::Create));
        for c in "Metro".chars() {
            f.app.update(Action::FormInput(c));
        }
        let effects = f.app.update(Action::FormSubmit);
        assert_eq!(
            effects,
            vec![Effect::Submit(
                KindId::Parent,
                None,
                FormDraft::Parent(ParentDraft {
                    name: "Metro".to_string()
                })
            )]
        );

        f.app.update(Action::FormAccepted(KindId::TestService));
        assert!(matches!(f.app.overlay, Overlay::Form(_)));
        f.app.update(Action::FormAccepted(KindId::Parent));
        assert_eq!(f.app.overlay, Overlay::None);
    }

    #[test]
    fn list_change_keeps_selection_in_bounds() {
        let mut f = fixture();
        f.tests.send_modify(|view| {
            view.rows = (1..=3).map(|i| test_service(&i.to_string(), true)).collect();
        });
        f.app.update(Action::SwitchView(ViewType::Tests));
        f.app.update(Action::ListChanged(KindId::TestService));
        f.app.update(Action::NavigateBottom);
        f.app.update(Action::NavigateDown);
        f.app.update(Action::NavigateDown);
        assert_eq!(f.app.test_table_state.selected(), Some(2));

        f.tests.send_modify(|view| view.rows.truncate(1));
        f.app.update(Action::ListChanged(KindId::TestService));
        assert_eq!(f.app.test_table_state.selected(), Some(0));

        f.tests.send_modify(|view| view.rows.clear());
        f.app.update(Action::ListChanged(KindId::TestService));
        assert_eq!(f.app.test_table_state.selected(), None);
    }

    #[test]
    fn toasts_expire_and_cap() {
        let mut f = fixture();
        for i in 0..5 {
            f.app.update(Action::Notify(Notice::success(format!("n{}", i))));
        }
        assert_eq!(f.app.toasts.len(), MAX_TOASTS);
        assert_eq!(f.app.toasts[0].0.message, "n2");
        assert_eq!(f.app.toasts[0].0.level, NoticeLevel::Success);

        f.app.expire_toasts(Instant::now() + TOAST_TTL);
        assert!(f.app.toasts.is_empty());
    }

    #[test]
    fn unknown_command_reports_error() {
        let mut f = fixture();
        assert!(f
            .app
            .update(Action::SubmitCommandInput("frobnicate".to_string()))
            .is_empty());
        assert_eq!(f.app.toasts[0].0.level, NoticeLevel::Error);

        let effects = f.app.update(Action::SubmitCommandInput("labs".to_string()));
        assert_eq!(effects, vec![Effect::Refresh(KindId::Registration)]);
    }
}
