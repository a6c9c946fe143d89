//! Adapter interfaces for the OpenValve API.
//!
//! The dashboard and console talk to the API through the [`CatalogApi`]
//! trait so they can be driven by an in-process fake in tests.

pub mod api_client;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::{AccountProfile, RawEntry};

// Re-export the HTTP client
pub use api_client::ApiClient;

/// Errors talking to the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("{message} (HTTP {status})")]
    Status { status: u16, message: String },

    /// The body was not the JSON we expected
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// The message the API gave for a failed request, if it answered at all
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Health response from `/api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerStatus {
    pub status: String,
    #[serde(default)]
    pub backend: String,
}

/// Operations the OpenValve API offers
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Check the API is reachable
    async fn status(&self) -> Result<ServerStatus, ApiError>;

    /// Profile for a Steam ID or vanity name
    async fn user_summary(&self, steam_id: &str) -> Result<AccountProfile, ApiError>;

    /// Public friends of an account
    async fn friends(&self, steam_id: &str) -> Result<Vec<AccountProfile>, ApiError>;

    /// Owned games, as sent. Callers decide what to do with a non-array body.
    async fn owned_games(&self, steam_id: &str) -> Result<Value, ApiError>;

    /// Database lookup of a single game
    async fn game_by_appid(&self, appid: &str) -> Result<Vec<RawEntry>, ApiError>;

    /// Random sample of games from the database
    async fn random_games(&self, limit: usize) -> Result<Vec<RawEntry>, ApiError>;

    /// Read-only query through the console endpoint
    async fn run_sql(&self, query: &str) -> Result<Value, ApiError>;
}
