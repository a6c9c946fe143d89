//! HTTP client for the OpenValve API.
//!
//! Endpoints (all relative to the configured base URL):
//! - `GET  /api/status`
//! - `GET  /api/user?steamid=<id>`
//! - `GET  /api/friends?steamid=<id>`
//! - `GET  /api/games?steamid=<id>` | `?appid=<id>` | `?limit=<n>`
//! - `POST /api/console/sql`

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{ApiError, CatalogApi, ServerStatus};
use crate::config::ResolvedConfig;
use crate::domain::{AccountProfile, RawEntry};

/// OpenValve API client
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    /// Create from resolved configuration
    pub fn from_config(config: &ResolvedConfig) -> Result<Self, ApiError> {
        Self::new(
            config.api.base_url.clone(),
            Duration::from_secs(config.api.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build an endpoint URL
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint(path);
        debug!(%url, ?query, "GET");

        let response = self.client.get(&url).query(query).send().await?;
        read_json(response).await
    }
}

/// Turn a response into JSON, mapping non-success statuses to errors
async fn read_json(response: reqwest::Response) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(status_error(status, &text));
    }

    Ok(serde_json::from_str(&text)?)
}

/// The API reports failures as `{ "error": "..." }`.
///
/// A failure body that is not JSON at all (a proxy error page, say) is a
/// decode error rather than an API refusal.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let body: Value = match serde_json::from_str(body) {
        Ok(body) => body,
        Err(e) => return ApiError::Decode(e),
    };

    let message = body
        .get("error")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

/// Profiles from a friends payload; anything unusable is skipped
fn parse_profiles(value: &Value) -> Vec<AccountProfile> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| AccountProfile::deserialize(item).ok())
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn status(&self) -> Result<ServerStatus, ApiError> {
        let body = self.get_json("api/status", &[]).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn user_summary(&self, steam_id: &str) -> Result<AccountProfile, ApiError> {
        let body = self
            .get_json("api/user", &[("steamid", steam_id.to_string())])
            .await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn friends(&self, steam_id: &str) -> Result<Vec<AccountProfile>, ApiError> {
        let body = self
            .get_json("api/friends", &[("steamid", steam_id.to_string())])
            .await?;
        Ok(parse_profiles(&body))
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Value, ApiError> {
        self.get_json("api/games", &[("steamid", steam_id.to_string())])
            .await
    }

    async fn game_by_appid(&self, appid: &str) -> Result<Vec<RawEntry>, ApiError> {
        let body = self
            .get_json("api/games", &[("appid", appid.to_string())])
            .await?;
        Ok(RawEntry::parse_list(&body))
    }

    async fn random_games(&self, limit: usize) -> Result<Vec<RawEntry>, ApiError> {
        let body = self
            .get_json("api/games", &[("limit", limit.to_string())])
            .await?;
        Ok(RawEntry::parse_list(&body))
    }

    async fn run_sql(&self, query: &str) -> Result<Value, ApiError> {
        let url = self.endpoint("api/console/sql");
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await?;
        read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint() {
        let client = ApiClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.endpoint("/api/games"),
            "http://localhost:5000/api/games"
        );

        let client = ApiClient::new("http://localhost:5000", Duration::from_secs(5)).unwrap();
        assert_eq!(client.endpoint("api/status"), "http://localhost:5000/api/status");
    }

    #[test]
    fn test_parse_profiles() {
        let profiles = parse_profiles(&json!([
            { "steamid": "1", "personaname": "Alice" },
            { "personaname": "no id" },
            { "steamid": "2", "personaname": "Bob" }
        ]));
        let names: Vec<&str> = profiles.iter().map(|p| p.personaname.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);

        assert!(parse_profiles(&json!({ "error": "private" })).is_empty());
    }

    #[test]
    fn test_status_error_keeps_api_message() {
        let err = status_error(StatusCode::NOT_FOUND, r#"{"error": "Game not found in database"}"#);
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(err.api_message(), Some("Game not found in database"));

        let err = status_error(StatusCode::BAD_REQUEST, "{}");
        assert_eq!(err.api_message(), Some("Bad Request"));

        let err = status_error(StatusCode::BAD_REQUEST, r#"{"error": 7}"#);
        assert_eq!(err.api_message(), Some("Bad Request"));
    }

    #[test]
    fn test_status_error_with_non_json_body_is_decode_error() {
        let err = status_error(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>");
        assert!(matches!(err, ApiError::Decode(_)));
        assert!(err.api_message().is_none());

        let err = status_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is not expected to run an HTTP server
        let client = ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.status().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(err.api_message().is_none());
    }
}
