//! Account profiles as returned by the user and friends endpoints.

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Public profile summary for one account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountProfile {
    /// 64-bit Steam ID, as a string
    pub steamid: String,

    /// Display name, used as the owner label in the shared library
    #[serde(default)]
    pub personaname: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profileurl: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatarfull: Option<String>,

    #[serde(default)]
    pub personastate: i64,

    /// Name of the game currently being played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gameextrainfo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realname: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loccountrycode: Option<String>,

    /// Account creation time (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timecreated: Option<i64>,

    /// Last logoff time (unix seconds)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastlogoff: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountProfile {
    pub fn new(steamid: impl Into<String>, personaname: impl Into<String>) -> Self {
        Self {
            steamid: steamid.into(),
            personaname: personaname.into(),
            profileurl: None,
            avatarfull: None,
            personastate: 0,
            gameextrainfo: None,
            realname: None,
            loccountrycode: None,
            timecreated: None,
            lastlogoff: None,
            extra: Map::new(),
        }
    }

    /// Human-readable presence, e.g. "Online" or "Playing: Dota 2"
    pub fn status_label(&self) -> String {
        match self.in_game() {
            Some(game) => format!("Playing: {}", game),
            None => PersonaState::from_code(self.personastate).label().to_string(),
        }
    }

    pub fn status_class(&self) -> StatusClass {
        if self.in_game().is_some() {
            StatusClass::InGame
        } else if self.personastate == 0 {
            StatusClass::Offline
        } else {
            StatusClass::Online
        }
    }

    pub fn member_since(&self) -> String {
        format_date(self.timecreated)
    }

    fn in_game(&self) -> Option<&str> {
        self.gameextrainfo.as_deref().filter(|g| !g.is_empty())
    }
}

/// Presence code reported by the profile endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonaState {
    Offline,
    Online,
    Busy,
    Away,
    Snooze,
    LookingToTrade,
    LookingToPlay,
}

impl PersonaState {
    /// Unknown codes are reported as online
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => PersonaState::Offline,
            2 => PersonaState::Busy,
            3 => PersonaState::Away,
            4 => PersonaState::Snooze,
            5 => PersonaState::LookingToTrade,
            6 => PersonaState::LookingToPlay,
            _ => PersonaState::Online,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PersonaState::Offline => "Offline",
            PersonaState::Online => "Online",
            PersonaState::Busy => "Busy",
            PersonaState::Away => "Away",
            PersonaState::Snooze => "Snooze",
            PersonaState::LookingToTrade => "Looking to Trade",
            PersonaState::LookingToPlay => "Looking to Play",
        }
    }
}

/// Coarse presence bucket used for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    InGame,
    Online,
    Offline,
}

/// Format unix seconds as e.g. "Sep 12, 2003"; missing or zero is "N/A"
pub fn format_date(timestamp: Option<i64>) -> String {
    timestamp
        .filter(|ts| *ts != 0)
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
