use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::envelope::{check_status, decode_envelope, error_message, Envelope};
use super::session::{Session, SessionHandle};
use super::traits::*;
use crate::domain::*;

pub struct HttpAdminClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    page_size: u32,
}

#[derive(Debug, Deserialize)]
struct LoginReply {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, rename = "_id")]
    id: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct StatusPatch {
    status: bool,
}

impl HttpAdminClient {
    pub fn new(
        base_url: &str,
        session: SessionHandle,
        timeout: Duration,
        page_size: u32,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::ConfigError(format!("failed to build http client: {}", e)))?;

        tracing::info!("Using admin API at {}", base_url);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            page_size,
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let request_id = uuid::Uuid::new_v4().to_string();
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header("x-request-id", &request_id);
        if let Some(token) = self.session.token() {
            builder = builder.bearer_auth(token);
        }
        (builder, request_id)
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        request_id: &str,
        op: &'static str,
    ) -> ClientResult<(u16, String)> {
        tracing::debug!(request_id, op, "sending request");
        let response = builder.send().await.map_err(|e| {
            tracing::error!(request_id, op, "request failed: {}", e);
            transport_error(e)
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(transport_error)?;
        tracing::debug!(request_id, op, status, "response received");
        Ok((status, body))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
        op: &'static str,
    ) -> ClientResult<Envelope<T>> {
        let (status, body) = self.execute(builder, request_id, op).await?;
        match decode_envelope(status, &body) {
            Err(ClientError::Unauthorized) => {
                tracing::warn!(request_id, op, "unauthorized, clearing session");
                self.session.clear();
                Err(ClientError::Unauthorized)
            }
            Err(err) => {
                tracing::warn!(request_id, op, status, "request rejected: {}", err);
                Err(err)
            }
            Ok(envelope) => Ok(envelope),
        }
    }

    async fn get_data<T: DeserializeOwned>(&self, path: &str, op: &'static str) -> ClientResult<T> {
        let (builder, request_id) = self.request(Method::GET, path);
        self.send::<T>(builder, &request_id, op).await?.into_data()
    }

    async fn list<R: DeserializeOwned>(
        &self,
        path: &str,
        params: &ListParams,
        op: &'static str,
    ) -> ClientResult<ListPage<R>> {
        let (builder, request_id) = self.request(Method::GET, path);
        self.send::<Vec<R>>(builder.query(params), &request_id, op)
            .await?
            .into_page(self.page_size)
    }

    async fn ack_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        op: &'static str,
    ) -> ClientResult<Ack> {
        let (builder, request_id) = self.request(method, path);
        self.send::<serde_json::Value>(builder.json(body), &request_id, op)
            .await?
            .into_ack()
    }

    async fn ack_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
        op: &'static str,
    ) -> ClientResult<Ack> {
        let (builder, request_id) = self.request(method, path);
        self.send::<serde_json::Value>(builder.multipart(form), &request_id, op)
            .await?
            .into_ack()
    }

    async fn delete(&self, path: &str, op: &'static str) -> ClientResult<Ack> {
        let (builder, request_id) = self.request(Method::DELETE, path);
        self.send::<serde_json::Value>(builder, &request_id, op)
            .await?
            .into_ack()
    }
}

fn transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(err.to_string())
    }
}

async fn file_part(path: &Path) -> ClientResult<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ClientError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(file_name))
}

async fn registration_form(draft: &RegistrationDraft) -> ClientResult<Form> {
    let mut form = Form::new();
    for (key, value) in draft.text_fields() {
        form = form.text(key, value);
    }
    for attachment in &draft.attachments {
        form = form.part(attachment.field.as_str(), file_part(&attachment.path).await?);
    }
    Ok(form)
}

async fn profile_form(draft: &ProfileDraft) -> ClientResult<Form> {
    let mut form = Form::new()
        .text("name", draft.name.trim().to_string())
        .text("email", draft.email.trim().to_string());
    if let Some(password) = draft.password.as_deref().filter(|p| !p.is_empty()) {
        form = form.text("password", password.to_string());
    }
    if let Some(photo) = &draft.photo {
        form = form.part("profilePhoto", file_part(photo).await?);
    }
    Ok(form)
}

#[async_trait]
impl AdminClient for HttpAdminClient {
    async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let (builder, request_id) = self.request(Method::POST, "/admin/login");
        let builder = builder.json(&Credentials { email, password });
        let (status, body) = self.execute(builder, &request_id, "login").await?;

        // A 401 here means bad credentials, not an expired session.
        if status == 401 {
            return Err(ClientError::Server {
                status: Some(status),
                message: error_message(&body).or_else(|| Some("Invalid credentials".to_string())),
            });
        }
        check_status(status, &body)?;

        let reply: LoginReply =
            serde_json::from_str(&body).map_err(|e| ClientError::ParseError(e.to_string()))?;
        match (reply.token, reply.id) {
            (Some(token), Some(admin_id)) => {
                let session = Session { token, admin_id };
                self.session.establish(session.clone());
                Ok(session)
            }
            _ => Err(ClientError::Server {
                status: Some(status),
                message: reply.message.or_else(|| Some("Login failed".to_string())),
            }),
        }
    }

    async fn logout(&self) {
        self.session.clear();
    }

    async fn admin_profile(&self) -> ClientResult<AdminProfile> {
        let admin_id = self.session.admin_id().ok_or(ClientError::Unauthorized)?;
        self.get_data(&format!("/admin/get/{}", admin_id), "admin_profile")
            .await
    }

    async fn update_admin_profile(&self, id: &str, draft: &ProfileDraft) -> ClientResult<Ack> {
        let form = profile_form(draft).await?;
        self.ack_multipart(
            Method::PUT,
            &format!("/admin/update/{}", id),
            form,
            "update_admin_profile",
        )
        .await
    }

    async fn dashboard_stats(&self) -> ClientResult<DashboardStats> {
        self.get_data("/dashboard/stats", "dashboard_stats").await
    }

    async fn list_parents(&self, params: &ListParams) -> ClientResult<ListPage<Parent>> {
        self.list("/parent/get", params, "list_parents").await
    }

    async fn create_parent(&self, draft: &ParentDraft) -> ClientResult<Ack> {
        self.ack_json(Method::POST, "/parent/create", draft, "create_parent")
            .await
    }

    async fn update_parent(&self, id: &str, draft: &ParentDraft) -> ClientResult<Ack> {
        self.ack_json(
            Method::PUT,
            &format!("/parent/update/{}", id),
            draft,
            "update_parent",
        )
        .await
    }

    async fn set_parent_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.ack_json(
            Method::PATCH,
            &format!("/parent/status/{}", id),
            &StatusPatch { status },
            "set_parent_status",
        )
        .await
    }

    async fn delete_parent(&self, id: &str) -> ClientResult<Ack> {
        self.delete(&format!("/parent/delete/{}", id), "delete_parent")
            .await
    }

    async fn list_test_services(
        &self,
        params: &ListParams,
    ) -> ClientResult<ListPage<TestService>> {
        self.list("/test-service/get", params, "list_test_services")
            .await
    }

    async fn create_test_service(&self, draft: &TestServiceDraft) -> ClientResult<Ack> {
        self.ack_json(
            Method::POST,
            "/test-service/create",
            draft,
            "create_test_service",
        )
        .await
    }

    async fn update_test_service(&self, id: &str, draft: &TestServiceDraft) -> ClientResult<Ack> {
        self.ack_json(
            Method::PUT,
            &format!("/test-service/update/{}", id),
            draft,
            "update_test_service",
        )
        .await
    }

    async fn set_test_service_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.ack_json(
            Method::PATCH,
            &format!("/test-service/status/{}", id),
            &StatusPatch { status },
            "set_test_service_status",
        )
        .await
    }

    async fn delete_test_service(&self, id: &str) -> ClientResult<Ack> {
        self.delete(&format!("/test-service/delete/{}", id), "delete_test_service")
            .await
    }

    async fn list_registrations(
        &self,
        params: &ListParams,
    ) -> ClientResult<ListPage<Registration>> {
        self.list("/registrations/get", params, "list_registrations")
            .await
    }

    async fn get_registration(&self, id: &str) -> ClientResult<Registration> {
        self.get_data(&format!("/registrations/get/{}", id), "get_registration")
            .await
    }

    async fn create_registration(&self, draft: &RegistrationDraft) -> ClientResult<Ack> {
        let form = registration_form(draft).await?;
        self.ack_multipart(
            Method::POST,
            "/registrations/create",
            form,
            "create_registration",
        )
        .await
    }

    async fn update_registration(
        &self,
        id: &str,
        draft: &RegistrationDraft,
    ) -> ClientResult<Ack> {
        let form = registration_form(draft).await?;
        self.ack_multipart(
            Method::PUT,
            &format!("/registrations/{}", id),
            form,
            "update_registration",
        )
        .await
    }

    async fn set_registration_status(&self, id: &str, status: bool) -> ClientResult<Ack> {
        self.ack_json(
            Method::PATCH,
            &format!("/registrations/status/{}", id),
            &StatusPatch { status },
            "set_registration_status",
        )
        .await
    }

    async fn delete_registration(&self, id: &str) -> ClientResult<Ack> {
        self.delete(&format!("/registrations/{}", id), "delete_registration")
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves exactly one response and hands back the raw request head.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            let head_end = loop {
                if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
                let n = socket.read(&mut buf).await.unwrap();
                assert!(n > 0, "client closed before sending headers");
                request.extend_from_slice(&buf[..n]);
            };
            let head = String::from_utf8_lossy(&request[..head_end]).into_owned();
            let body_len = head
                .lines()
                .find_map(|l| l.to_lowercase().strip_prefix("content-length:").map(|v| v.trim().to_string()))
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(0);
            while request.len() < head_end + body_len {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(head);
        });
        (format!("http://{}/api", addr), rx)
    }

    fn client(base_url: &str, session: SessionHandle) -> HttpAdminClient {
        HttpAdminClient::new(base_url, session, Duration::from_secs(5), 10).unwrap()
    }

    fn signed_in() -> SessionHandle {
        SessionHandle::with_session(Session {
            token: "tok".to_string(),
            admin_id: "a1".to_string(),
        })
    }

    #[tokio::test]
    async fn list_sends_query_and_auth_headers() {
        let (base, head) = serve_once(
            "200 OK",
            r#"{"success":true,"data":[],"pagination":{"page":2,"limit":10,"total":0,"totalPages":0}}"#,
        )
        .await;
        let client = client(&base, signed_in());
        let params = vec![
            ("search".to_string(), "lal".to_string()),
            ("page".to_string(), "2".to_string()),
        ];

        let page = client.list_parents(&params).await.unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.pagination.page, 2);

        let head = head.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /api/parent/get?search=lal&page=2 "));
        assert!(head.contains("authorization: bearer tok"));
        assert!(head.contains("x-request-id: "));
    }

    #[tokio::test]
    async fn unauthorized_response_clears_session() {
        let (base, _head) = serve_once("401 Unauthorized", r#"{"message":"jwt expired"}"#).await;
        let session = signed_in();
        let client = client(&base, session.clone());

        let err = client.dashboard_stats().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn rejected_login_keeps_server_message() {
        let (base, _head) =
            serve_once("401 Unauthorized", r#"{"success":false,"message":"Wrong password"}"#).await;
        let session = SessionHandle::new();
        let client = client(&base, session.clone());

        let err = client.login("admin@lab.in", "nope").await.unwrap_err();
        assert_eq!(err.user_message(), Some("Wrong password"));
        assert!(!session.is_active());
    }

    #[tokio::test]
    async fn login_establishes_session() {
        let (base, head) = serve_once("200 OK", r#"{"token":"fresh","_id":"a9"}"#).await;
        let session = SessionHandle::new();
        let client = client(&base, session.clone());

        let established = client.login("admin@lab.in", "secret").await.unwrap();
        assert_eq!(established.admin_id, "a9");
        assert_eq!(session.token().as_deref(), Some("fresh"));
        assert!(head.await.unwrap().starts_with("POST /api/admin/login "));
    }

    #[tokio::test]
    async fn missing_attachment_fails_before_sending() {
        let err = file_part(Path::new("/nonexistent/lab-logo.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
