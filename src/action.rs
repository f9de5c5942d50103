use tokio::sync::oneshot;

use crate::controller::Notice;
use crate::domain::*;
use crate::kinds::{KindId, OperationId};

#[derive(Debug)]
pub enum Action {
    // Navigation
    NavigateUp,
    NavigateDown,
    NavigateTop,
    NavigateBottom,
    PageUp,
    PageDown,
    NextPage,
    PrevPage,
    Select,
    Back,

    // View switching
    SwitchView(ViewType),

    // Vim chord
    EnterPendingG,

    // Row operations
    RunOperation(OperationId),
    ToggleRegType,

    // UI
    OpenCommandInput,
    OpenSearch,
    OpenFilters,
    CloseOverlay,
    SubmitCommandInput(String),
    UpdateInputBuffer(String),
    ToggleHelp,

    // Filter picker
    FilterFocusNext,
    FilterFocusPrev,
    FilterCycle(bool),

    // Forms
    FormInput(char),
    FormBackspace,
    FormNextField,
    FormPrevField,
    FormSubmit,
    FormAccepted(KindId),
    EditProfile,

    // Confirmation
    RequestConfirm {
        prompt: String,
        reply: oneshot::Sender<bool>,
    },
    ConfirmAnswer(bool),

    // Data responses
    ListChanged(KindId),
    DashboardLoaded(DashboardStats),
    RegistrationLoaded(Box<Registration>),
    ProfileLoaded(AdminProfile),
    ProfileUpdated,
    LoggedIn,
    SessionExpired,

    // App control
    Refresh,
    Quit,
    Tick,
    Notify(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Dashboard,
    Tests,
    Registrations,
    Parents,
    Profile,
}

impl ViewType {
    pub const ALL: [ViewType; 5] = [
        Self::Dashboard,
        Self::Tests,
        Self::Registrations,
        Self::Parents,
        Self::Profile,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Tests => "Tests & Services",
            Self::Registrations => "Registrations",
            Self::Parents => "Parents",
            Self::Profile => "Profile",
        }
    }

    pub fn kind(&self) -> Option<KindId> {
        match self {
            Self::Tests => Some(KindId::TestService),
            Self::Registrations => Some(KindId::Registration),
            Self::Parents => Some(KindId::Parent),
            Self::Dashboard | Self::Profile => None,
        }
    }

    pub fn for_kind(kind: KindId) -> Self {
        match kind {
            KindId::TestService => Self::Tests,
            KindId::Registration => Self::Registrations,
            KindId::Parent => Self::Parents,
        }
    }
}
