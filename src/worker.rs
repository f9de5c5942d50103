use std::sync::Arc;

use tokio::sync::mpsc;

use crate::action::Action;
use crate::client::{AdminClient, ClientError};
use crate::controller::Notice;
use crate::domain::{Draft, ProfileDraft};

/// Requests outside the list controllers: session, dashboard, detail and
/// profile screens.
#[derive(Debug)]
pub enum CliRequest {
    Login { email: String, password: String },
    Logout,
    LoadDashboard,
    LoadRegistration { id: String },
    LoadProfile,
    UpdateProfile { id: String, draft: ProfileDraft },
}

#[derive(Clone)]
pub struct CliHandle {
    tx: mpsc::UnboundedSender<CliRequest>,
}

impl CliHandle {
    pub fn send(&self, request: CliRequest) {
        let _ = self.tx.send(request);
    }
}

pub struct CliWorker {
    client: Arc<dyn AdminClient>,
    rx: mpsc::UnboundedReceiver<CliRequest>,
    action_tx: mpsc::UnboundedSender<Action>,
}

impl CliWorker {
    pub fn new(
        client: Arc<dyn AdminClient>,
        action_tx: mpsc::UnboundedSender<Action>,
    ) -> (Self, CliHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = CliHandle { tx };
        let worker = Self {
            client,
            rx,
            action_tx,
        };
        (worker, handle)
    }

    /// Each request runs on its own task, so a slow screen never holds up
    /// a login or another screen's load.
    pub async fn run(mut self) {
        while let Some(request) = self.rx.recv().await {
            let client = self.client.clone();
            let action_tx = self.action_tx.clone();
            tokio::spawn(async move {
                for action in serve(client.as_ref(), request).await {
                    if action_tx.send(action).is_err() {
                        return;
                    }
                }
            });
        }
    }
}

async fn serve(client: &dyn AdminClient, request: CliRequest) -> Vec<Action> {
    match request {
        CliRequest::Login { email, password } => {
            match client.login(&email, &password).await {
                Ok(session) => {
                    tracing::info!(admin_id = %session.admin_id, "logged in");
                    vec![
                        Action::LoggedIn,
                        Action::Notify(Notice::success("Login successful!")),
                    ]
                }
                Err(e) => vec![failure(e, "Login failed")],
            }
        }
        CliRequest::Logout => {
            client.logout().await;
            tracing::info!("logged out");
            vec![
                Action::SessionExpired,
                Action::Notify(Notice::success("You have been logged out successfully.")),
            ]
        }
        CliRequest::LoadDashboard => match client.dashboard_stats().await {
            Ok(stats) => vec![Action::DashboardLoaded(stats)],
            Err(e) => vec![failure(e, "Failed to fetch dashboard stats")],
        },
        CliRequest::LoadRegistration { id } => match client.get_registration(&id).await {
            Ok(registration) => vec![Action::RegistrationLoaded(Box::new(registration))],
            Err(e) => vec![failure(e, "Failed to load registration data")],
        },
        CliRequest::LoadProfile => match client.admin_profile().await {
            Ok(profile) => vec![Action::ProfileLoaded(profile)],
            Err(e) => vec![failure(e, "Failed to fetch profile")],
        },
        CliRequest::UpdateProfile { id, draft } => {
            if let Err(e) = draft.validate() {
                return vec![Action::Notify(Notice::error(e.0))];
            }
            match client.update_admin_profile(&id, &draft).await {
                Ok(ack) => vec![
                    Action::ProfileUpdated,
                    Action::Notify(Notice::success(
                        ack.message_or("Profile updated successfully"),
                    )),
                ],
                Err(e) => vec![failure(e, "Failed to update profile")],
            }
        }
    }
}

fn failure(err: ClientError, fallback: &str) -> Action {
    tracing::warn!("{}: {}", fallback, err);
    Action::Notify(Notice::error(err.describe(fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Ack, ClientResult, ListPage, ListParams, Session};
    use crate::controller::NoticeLevel;
    use crate::domain::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    #[derive(Default)]
    struct ScriptedClient {
        profile_updates: Mutex<Vec<String>>,
        dashboard_hold: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl AdminClient for ScriptedClient {
        async fn login(&self, email: &str, _password: &str) -> ClientResult<Session> {
            if email == "admin@example.com" {
                Ok(Session {
                    token: "t".to_string(),
                    admin_id: "a1".to_string(),
                })
            } else {
                Err(ClientError::server("Invalid credentials"))
            }
        }

        async fn logout(&self) {}

        async fn admin_profile(&self) -> ClientResult<AdminProfile> {
            Err(ClientError::Unauthorized)
        }

        async fn update_admin_profile(&self, id: &str, _draft: &ProfileDraft) -> ClientResult<Ack> {
            self.profile_updates.lock().unwrap().push(id.to_string());
            Ok(Ack::default())
        }

        async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
            let hold = self.dashboard_hold.lock().unwrap().take();
            if let Some(hold) = hold {
                let _ = hold.await;
            }
            Err(ClientError::Transport("connection refused".to_string()))
        }

        async fn list_parents(&self, _params: &ListParams) -> ClientResult<ListPage<Parent>> {
            unimplemented!()
        }

        async fn create_parent(&self, _draft: &ParentDraft) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn update_parent(&self, _id: &str, _draft: &ParentDraft) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn set_parent_status(&self, _id: &str, _status: bool) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn delete_parent(&self, _id: &str) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn list_test_services(
            &self,
            _params: &ListParams,
        ) -> ClientResult<ListPage<TestService>> {
            unimplemented!()
        }

        async fn create_test_service(&self, _draft: &TestServiceDraft) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn update_test_service(
            &self,
            _id: &str,
            _draft: &TestServiceDraft,
        ) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn set_test_service_status(&self, _id: &str, _status: bool) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn delete_test_service(&self, _id: &str) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn list_registrations(
            &self,
            _params: &ListParams,
        ) -> ClientResult<ListPage<Registration>> {
            unimplemented!()
        }

        async fn get_registration(&self, id: &str) -> ClientResult<Registration> {
            Err(ClientError::server(format!("Registration {} not found", id)))
        }

        async fn create_registration(&self, _draft: &RegistrationDraft) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn update_registration(
            &self,
            _id: &str,
            _draft: &RegistrationDraft,
        ) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn set_registration_status(&self, _id: &str, _status: bool) -> ClientResult<Ack> {
            unimplemented!()
        }

        async fn delete_registration(&self, _id: &str) -> ClientResult<Ack> {
            unimplemented!()
        }
    }

    fn notice(action: &Action) -> Option<&Notice> {
        match action {
            Action::Notify(notice) => Some(notice),
            _ => None,
        }
    }

    #[tokio::test]
    async fn login_reports_success_and_failure() {
        let client = ScriptedClient::default();
        let request = CliRequest::Login {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        };
        let actions = serve(&client, request).await;
        assert!(matches!(actions[0], Action::LoggedIn));

        let request = CliRequest::Login {
            email: "nobody@example.com".to_string(),
            password: "secret".to_string(),
        };
        let actions = serve(&client, request).await;
        assert_eq!(
            notice(&actions[0]).map(|n| n.message.as_str()),
            Some("Invalid credentials")
        );
    }

    #[tokio::test]
    async fn failures_fall_back_to_screen_messages() {
        let client = ScriptedClient::default();

        let actions = serve(&client, CliRequest::LoadDashboard).await;
        let n = notice(&actions[0]).unwrap();
        assert_eq!(n.level, NoticeLevel::Error);
        assert_eq!(n.message, "Failed to fetch dashboard stats");

        let request = CliRequest::LoadRegistration {
            id: "r9".to_string(),
        };
        let actions = serve(&client, request).await;
        assert_eq!(notice(&actions[0]).unwrap().message, "Registration r9 not found");

        let actions = serve(&client, CliRequest::LoadProfile).await;
        assert_eq!(
            notice(&actions[0]).unwrap().message,
            "Session expired, please log in again"
        );
    }

    #[tokio::test]
    async fn invalid_profile_never_reaches_client() {
        let client = ScriptedClient::default();
        let request = CliRequest::UpdateProfile {
            id: "a1".to_string(),
            draft: ProfileDraft {
                name: "Admin".to_string(),
                ..Default::default()
            },
        };
        let actions = serve(&client, request).await;
        assert_eq!(actions.len(), 1);
        assert_eq!(notice(&actions[0]).unwrap().level, NoticeLevel::Error);
        assert!(client.profile_updates.lock().unwrap().is_empty());

        let request = CliRequest::UpdateProfile {
            id: "a1".to_string(),
            draft: ProfileDraft {
                name: "Admin".to_string(),
                email: "admin@example.com".to_string(),
                ..Default::default()
            },
        };
        let actions = serve(&client, request).await;
        assert!(matches!(actions[0], Action::ProfileUpdated));
        assert_eq!(
            notice(&actions[1]).unwrap().message,
            "Profile updated successfully"
        );
    }

    #[tokio::test]
    async fn slow_dashboard_does_not_hold_up_login() {
        let (release, hold) = oneshot::channel();
        let client = Arc::new(ScriptedClient {
            dashboard_hold: Mutex::new(Some(hold)),
            ..ScriptedClient::default()
        });
        let (action_tx, mut action_rx) = mpsc::unbounded_channel();
        let (worker, handle) = CliWorker::new(client, action_tx);
        tokio::spawn(worker.run());

        handle.send(CliRequest::LoadDashboard);
        handle.send(CliRequest::Login {
            email: "admin@example.com".to_string(),
            password: "secret".to_string(),
        });

        let first = action_rx.recv().await.unwrap();
        assert!(matches!(first, Action::LoggedIn));

        release.send(()).unwrap();
        let mut dashboard_failed = false;
        while let Some(action) = action_rx.recv().await {
            let message = notice(&action).map(|n| n.message.as_str());
            if message == Some("Failed to fetch dashboard stats") {
                dashboard_failed = true;
                break;
            }
        }
        assert!(dashboard_failed);
    }
}
