use async_trait::async_trait;
use thiserror::Error;

use super::Session;
use crate::domain::*;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("{}", .message.as_deref().unwrap_or("request rejected by server"))]
    Server {
        status: Option<u16>,
        message: Option<String>,
    },
    #[error("session expired")]
    Unauthorized,
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("parse error: {0}")]
    ParseError(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("config error: {0}")]
    ConfigError(String),
    #[error("timeout")]
    Timeout,
}

impl ClientError {
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            status: None,
            message: Some(message.into()),
        }
    }

    /// Text worth showing to the user as-is, if the failure carries one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Server { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            Self::Validation(err) => Some(err.0.as_str()),
            Self::Unauthorized => Some("Session expired, please log in again"),
            _ => None,
        }
    }

    pub fn describe(&self, fallback: &str) -> String {
        self.user_message().unwrap_or(fallback).to_string()
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Query string for a list request, already flattened into key/value pairs.
pub type ListParams = [(String, String)];

/// Acknowledgement of a mutation. The backend usually attaches a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    pub message: Option<String>,
}

impl Ack {
    pub fn message_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.message
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub rows: Vec<T>,
    pub pagination: Pagination,
    pub stats: Option<RegistrationStats>,
}

#[async_trait]
pub trait AdminClient: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> ClientResult<Session>;

    async fn logout(&self);

    async fn admin_profile(&self) -> ClientResult<AdminProfile>;

    async fn update_admin_profile(&self, id: &str, draft: &ProfileDraft) -> ClientResult<Ack>;

    async fn dashboard_stats(&self) -> ClientResult<DashboardStats>;

    async fn list_parents(&self, params: &ListParams) -> ClientResult<ListPage<Parent>>;

    async fn create_parent(&self, draft: &ParentDraft) -> ClientResult<Ack>;

    async fn update_parent(&self, id: &str, draft: &ParentDraft) -> ClientResult<Ack>;

    async fn set_parent_status(&self, id: &str, status: bool) -> ClientResult<Ack>;

    async fn delete_parent(&self, id: &str) -> ClientResult<Ack>;

    async fn list_test_services(&self, params: &ListParams)
        -> ClientResult<ListPage<TestService>>;

    async fn create_test_service(&self, draft: &TestServiceDraft) -> ClientResult<Ack>;

    async fn update_test_service(&self, id: &str, draft: &TestServiceDraft) -> ClientResult<Ack>;

    async fn set_test_service_status(&self, id: &str, status: bool) -> ClientResult<Ack>;

    async fn delete_test_service(&self, id: &str) -> ClientResult<Ack>;

    async fn list_registrations(
        &self,
        params: &ListParams,
    ) -> ClientResult<ListPage<Registration>>;

    async fn get_registration(&self, id: &str) -> ClientResult<Registration>;

    async fn create_registration(&self, draft: &RegistrationDraft) -> ClientResult<Ack>;

    async fn update_registration(&self, id: &str, draft: &RegistrationDraft)
        -> ClientResult<Ack>;

    async fn set_registration_status(&self, id: &str, status: bool) -> ClientResult<Ack>;

    async fn delete_registration(&self, id: &str) -> ClientResult<Ack>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_prefers_server_message() {
        let err = ClientError::server("Parent is linked to labs");
        assert_eq!(err.describe("Failed to delete"), "Parent is linked to labs");
        assert_eq!(err.to_string(), "Parent is linked to labs");

        let err = ClientError::Server {
            status: Some(500),
            message: Some(String::new()),
        };
        assert_eq!(err.describe("Failed to delete"), "Failed to delete");

        let err = ClientError::Transport("connection refused".to_string());
        assert_eq!(err.describe("Failed to fetch data"), "Failed to fetch data");
    }

    #[test]
    fn ack_falls_back_when_message_missing() {
        assert_eq!(Ack::default().message_or("Deleted"), "Deleted");
        let ack = Ack {
            message: Some("Parent deleted".to_string()),
        };
        assert_eq!(ack.message_or("Deleted"), "Parent deleted");
    }
}
