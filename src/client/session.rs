use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Credentials returned by a successful admin login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub admin_id: String,
}

/// Shared, explicitly owned session slot.
///
/// The HTTP client reads the bearer token from here on every request; the
/// slot is filled on login and emptied on logout or on a 401 response.
/// List controllers never look at it.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        let handle = Self::new();
        handle.establish(session);
        handle
    }

    pub fn establish(&self, session: Session) {
        tracing::info!(admin_id = %session.admin_id, "session established");
        *self.write() = Some(session);
    }

    pub fn clear(&self) {
        if self.write().take().is_some() {
            tracing::info!("session cleared");
        }
    }

    pub fn current(&self) -> Option<Session> {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn admin_id(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.admin_id.clone())
    }

    pub fn is_active(&self) -> bool {
        self.read().is_some()
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<Session>> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<Session>> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
