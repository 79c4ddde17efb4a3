//! Remote leaderboard API store.
//!
//! Talks to a server exposing `GET /api/leaderboard` (all entries) and
//! `POST /api/leaderboard` (one submission, stamped and trimmed server-side).

use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use bloomquiz_core::error::StoreError;
use bloomquiz_core::leaderboard::{LeaderboardEntry, Submission};
use bloomquiz_core::traits::LeaderboardStore;

use crate::records::decode_entries;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Leaderboard hosted behind an HTTP API.
pub struct RemoteStore {
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
    client: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, StoreError> {
        Self::with_timeout(base_url, api_key, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            timeout_secs,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/api/leaderboard", self.base_url)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn transport_error(&self, e: reqwest::Error) -> StoreError {
        if e.is_timeout() {
            StoreError::Timeout(self.timeout_secs)
        } else if e.is_connect() {
            StoreError::Unavailable(format!(
                "leaderboard API not reachable at {}",
                self.base_url
            ))
        } else {
            StoreError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl LeaderboardStore for RemoteStore {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn list_entries(&self) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let response = self
            .authorize(self.client.get(self.endpoint()))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status,
                message: body,
            });
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(format!("failed to parse response: {e}")))?;
        decode_entries(raw, &self.base_url)
    }

    #[instrument(skip(self, entry), fields(base_url = %self.base_url))]
    async fn append_entry(&self, entry: &LeaderboardEntry) -> Result<(), StoreError> {
        // The server stamps its own date.
        let body = Submission::new(entry.name.clone(), entry.score as f64, entry.percent);

        let response = self
            .authorize(self.client.post(self.endpoint()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        if status == 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected(body));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status,
                message: body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn entry() -> LeaderboardEntry {
        LeaderboardEntry {
            name: "Ana".into(),
            score: 640,
            percent: 80.0,
            date: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn lists_entries_and_skips_bad_records() {
        let server = MockServer::start().await;

        let response_body = json!([
            {"name": "Ana", "score": 640, "percent": 80.0, "date": 1_700_000_000_000_i64},
            {"name": "Old", "score": 10, "accuracy": 50},
            {"name": "Bo", "score": 900, "percent": 95.5, "date": 1_700_000_100_000_i64}
        ]);

        Mock::given(method("GET"))
            .and(path("/api/leaderboard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), None).unwrap();
        let entries = store.list_entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Bo");
        assert_eq!(entries[1].percent, 95.5);
    }

    #[tokio::test]
    async fn posts_the_submission_with_bearer_key() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/leaderboard"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({"name": "Ana", "score": 640.0, "percent": 80.0})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let store = RemoteStore::new(&format!("{}/", server.uri()), Some("secret".into())).unwrap();
        store.append_entry(&entry()).await.unwrap();
    }

    #[tokio::test]
    async fn bad_request_is_a_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/leaderboard"))
            .respond_with(ResponseTemplate::new(400).set_body_string("Bad Request"))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), None).unwrap();
        let err = store.append_entry(&entry()).await.unwrap_err();
        assert!(matches!(err, StoreError::Rejected(ref m) if m == "Bad Request"));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn server_errors_are_retryable() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/leaderboard"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let store = RemoteStore::new(&server.uri(), None).unwrap();
        let err = store.list_entries().await.unwrap_err();
        assert!(matches!(err, StoreError::Api { status: 503, .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn unreachable_server_is_unavailable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let uri = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let store = RemoteStore::new(&uri, None).unwrap();
        let err = store.append_entry(&entry()).await.unwrap_err();
        assert!(err.is_retryable());
        assert!(matches!(
            err,
            StoreError::Unavailable(_) | StoreError::Timeout(_)
        ));
    }
}
