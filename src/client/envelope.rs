use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Ack, ClientError, ClientResult, ListPage};
use crate::domain::{Pagination, RegistrationStats};

/// `{success, data, pagination?, stats?, message?}` as returned by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
    #[serde(default)]
    pub stats: Option<RegistrationStats>,
    #[serde(default)]
    pub message: Option<String>,
}

impl<T> Envelope<T> {
    fn ensure_success(&self) -> ClientResult<()> {
        if self.success {
            Ok(())
        } else {
            Err(ClientError::Server {
                status: None,
                message: self.message.clone(),
            })
        }
    }

    pub fn into_data(self) -> ClientResult<T> {
        self.ensure_success()?;
        self.data
            .ok_or_else(|| ClientError::ParseError("response has no data".to_string()))
    }

    pub fn into_ack(self) -> ClientResult<Ack> {
        self.ensure_success()?;
        Ok(Ack {
            message: self.message,
        })
    }
}

impl<R> Envelope<Vec<R>> {
    /// A list response. Missing pagination is treated as a single page
    /// holding everything that came back.
    pub fn into_page(self, limit: u32) -> ClientResult<ListPage<R>> {
        self.ensure_success()?;
        let rows = self.data.unwrap_or_default();
        let pagination = self.pagination.unwrap_or_else(|| Pagination {
            page: 1,
            limit,
            total: rows.len() as u64,
            total_pages: u32::from(!rows.is_empty()),
        });
        Ok(ListPage {
            rows,
            pagination,
            stats: self.stats,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Maps a non-2xx status to an error that keeps the server's message when
/// the body carried one.
pub fn check_status(status: u16, body: &str) -> ClientResult<()> {
    if status == 401 {
        return Err(ClientError::Unauthorized);
    }
    if !(200..300).contains(&status) {
        return Err(ClientError::Server {
            status: Some(status),
            message: error_message(body),
        });
    }
    Ok(())
}

pub fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

pub fn decode_envelope<T: DeserializeOwned>(status: u16, body: &str) -> ClientResult<Envelope<T>> {
    check_status(status, body)?;
    serde_json::from_str(body).map_err(|e| ClientError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Parent, Registration};

    #[test]
    fn list_envelope_with_pagination() {
        let body = r#"{
            "success": true,
            "data": [{"_id": "p1", "name": "Lal Group", "status": true, "registrationCount": 4}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
        }"#;
        let page = decode_envelope::<Vec<Parent>>(200, body)
            .unwrap()
            .into_page(10)
            .unwrap();
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].registration_count, 4);
        assert_eq!(page.pagination.total_pages, 1);
        assert!(page.stats.is_none());
    }

    #[test]
    fn list_envelope_with_stats() {
        let body = r#"{
            "success": true,
            "data": [{"_id": "r1", "labName": "Lal PathLabs", "status": false}],
            "pagination": {"page": 1, "limit": 10, "total": 1, "totalPages": 1},
            "stats": {
                "types": [{"label": "Diagnostic", "value": "Diagnostic", "count": 1}],
                "status": [{"label": "Inactive", "value": false, "count": 1}],
                "individualCount": 1,
                "parentCount": 0
            }
        }"#;
        let page = decode_envelope::<Vec<Registration>>(200, body)
            .unwrap()
            .into_page(10)
            .unwrap();
        assert_eq!(page.rows[0].lab_name, "Lal PathLabs");
        assert!(!page.rows[0].status);
        let stats = page.stats.unwrap();
        assert_eq!(stats.types[0].count, 1);
        assert_eq!(stats.status[0].value, "false");
        assert_eq!(stats.individual_count, 1);
    }

    #[test]
    fn business_failure_keeps_message() {
        let body = r#"{"success": false, "message": "Parent not found"}"#;
        let err = decode_envelope::<Vec<Parent>>(200, body)
            .unwrap()
            .into_page(10)
            .unwrap_err();
        assert_eq!(err.user_message(), Some("Parent not found"));
    }

    #[test]
    fn http_error_status_reads_message_body() {
        let err = decode_envelope::<serde_json::Value>(500, r#"{"message": "boom"}"#).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Server {
                status: Some(500),
                ..
            }
        ));
        assert_eq!(err.user_message(), Some("boom"));

        let err = decode_envelope::<serde_json::Value>(502, "<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.user_message(), None);
    }

    #[test]
    fn unauthorized_is_distinct() {
        let err = decode_envelope::<serde_json::Value>(401, "{}").unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));
    }

    #[test]
    fn ack_carries_message() {
        let ack = decode_envelope::<serde_json::Value>(
            200,
            r#"{"success": true, "message": "Status updated"}"#,
        )
        .unwrap()
        .into_ack()
        .unwrap();
        assert_eq!(ack.message.as_deref(), Some("Status updated"));
    }
}
