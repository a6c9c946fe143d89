//! In-process stand-in for the OpenValve API.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use openvalve::adapters::{ApiError, CatalogApi, ServerStatus};
use openvalve::domain::{AccountProfile, RawEntry};
use serde_json::{json, Value};

fn not_found(message: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: message.to_string(),
    }
}

/// An error with no API message, as a dropped connection would produce
pub fn network_error() -> ApiError {
    ApiError::Decode(serde_json::from_str::<Value>("{").unwrap_err())
}

#[derive(Default)]
pub struct FakeApi {
    vanity: HashMap<String, String>,
    profiles: HashMap<String, AccountProfile>,
    games: HashMap<String, Value>,
    friends: HashMap<String, Vec<AccountProfile>>,
    database: Vec<RawEntry>,
    sql: Option<Value>,
    offline: bool,
    game_requests: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account with its games payload
    pub fn with_account(mut self, steamid: &str, name: &str, games: Value) -> Self {
        self.profiles
            .insert(steamid.to_string(), AccountProfile::new(steamid, name));
        self.games.insert(steamid.to_string(), games);
        self
    }

    /// An account whose library cannot be read
    pub fn with_private_account(mut self, steamid: &str, name: &str) -> Self {
        self.profiles
            .insert(steamid.to_string(), AccountProfile::new(steamid, name));
        self
    }

    pub fn with_vanity(mut self, vanity: &str, steamid: &str) -> Self {
        self.vanity.insert(vanity.to_string(), steamid.to_string());
        self
    }

    pub fn with_friends(mut self, steamid: &str, friend_ids: &[&str]) -> Self {
        let friends = friend_ids
            .iter()
            .filter_map(|id| self.profiles.get(*id).cloned())
            .collect();
        self.friends.insert(steamid.to_string(), friends);
        self
    }

    pub fn with_database(mut self, games: Vec<RawEntry>) -> Self {
        self.database = games;
        self
    }

    pub fn with_sql_result(mut self, rows: Value) -> Self {
        self.sql = Some(rows);
        self
    }

    pub fn offline(mut self) -> Self {
        self.offline = true;
        self
    }

    /// Identifiers passed to `owned_games`, in call order
    pub fn game_requests(&self) -> Vec<String> {
        self.game_requests.lock().unwrap().clone()
    }

    fn resolve(&self, identifier: &str) -> String {
        self.vanity
            .get(identifier)
            .cloned()
            .unwrap_or_else(|| identifier.to_string())
    }
}

#[async_trait]
impl CatalogApi for FakeApi {
    async fn status(&self) -> Result<ServerStatus, ApiError> {
        if self.offline {
            return Err(network_error());
        }
        Ok(ServerStatus {
            status: "online".to_string(),
            backend: "Fake".to_string(),
        })
    }

    async fn user_summary(&self, steam_id: &str) -> Result<AccountProfile, ApiError> {
        if self.offline {
            return Err(network_error());
        }
        self.profiles
            .get(&self.resolve(steam_id))
            .cloned()
            .ok_or_else(|| not_found("User not found or private"))
    }

    async fn friends(&self, steam_id: &str) -> Result<Vec<AccountProfile>, ApiError> {
        if self.offline {
            return Err(network_error());
        }
        self.friends.get(steam_id).cloned().ok_or_else(|| ApiError::Status {
            status: 500,
            message: "Failed to fetch friends. Profile might be private.".to_string(),
        })
    }

    async fn owned_games(&self, steam_id: &str) -> Result<Value, ApiError> {
        self.game_requests.lock().unwrap().push(steam_id.to_string());
        if self.offline {
            return Err(network_error());
        }
        self.games
            .get(&self.resolve(steam_id))
            .cloned()
            .ok_or_else(|| not_found("User not found"))
    }

    async fn game_by_appid(&self, appid: &str) -> Result<Vec<RawEntry>, ApiError> {
        if self.offline {
            return Err(network_error());
        }
        let found: Vec<RawEntry> = self
            .database
            .iter()
            .filter(|g| g.appid.to_string() == appid)
            .cloned()
            .collect();
        if found.is_empty() {
            Err(not_found("Game not found in database"))
        } else {
            Ok(found)
        }
    }

    async fn random_games(&self, limit: usize) -> Result<Vec<RawEntry>, ApiError> {
        Ok(self.database.iter().take(limit).cloned().collect())
    }

    async fn run_sql(&self, _query: &str) -> Result<Value, ApiError> {
        if self.offline {
            return Err(network_error());
        }
        match &self.sql {
            Some(rows) => Ok(rows.clone()),
            None => Err(ApiError::Status {
                status: 400,
                message: "Only SELECT queries are allowed".to_string(),
            }),
        }
    }
}

/// Games payload in the shape the API returns
pub fn games(items: &[(u64, &str)]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|(appid, name)| json!({ "appid": appid, "name": name }))
            .collect(),
    )
}
