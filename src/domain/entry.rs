//! Catalog entries as received from the API and as held in the shared library.
//!
//! The API is loose about shapes: prices arrive as numbers or numeric
//! strings, release dates as text or as `{ "coming_soon", "date" }` objects,
//! and rows from the database may carry empty strings where a value is
//! missing. Metadata is therefore kept exactly as received, and whether a
//! field counts as set is decided by [`is_truthy`] on the received value.

use std::fmt;

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A game as returned by the catalog API, before ownership is attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    /// Store application identifier
    pub appid: u64,

    /// Display name
    #[serde(default, deserialize_with = "name_or_default")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Classification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genres: Option<Classification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Classification>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<Value>,

    #[serde(rename = "userScore", default, skip_serializing_if = "Option::is_none")]
    pub user_score: Option<Value>,

    /// Everything else the API sent (playtime, header image, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RawEntry {
    /// Create an entry with only an identifier and a name
    pub fn new(appid: u64, name: impl Into<String>) -> Self {
        Self {
            appid,
            name: name.into(),
            tags: None,
            genres: None,
            categories: None,
            description: None,
            price: None,
            release_date: None,
            user_score: None,
            extra: Map::new(),
        }
    }

    /// Parse a JSON payload into entries.
    ///
    /// A payload that is not an array yields nothing. Items without an
    /// integer `appid` (or that are not objects at all) are skipped.
    pub fn parse_list(value: &Value) -> Vec<RawEntry> {
        match value.as_array() {
            Some(items) => items
                .iter()
                .filter_map(|item| RawEntry::deserialize(item).ok())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn with_tags(mut self, tags: Classification) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn with_genres(mut self, genres: Classification) -> Self {
        self.genres = Some(genres);
        self
    }

    pub fn with_price(mut self, price: impl Into<Price>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Value::String(description.into()));
        self
    }

    pub fn description_text(&self) -> Option<String> {
        self.description.as_ref().and_then(display_text)
    }

    pub fn release_date_text(&self) -> Option<String> {
        self.release_date.as_ref().and_then(display_text)
    }

    pub fn user_score_text(&self) -> Option<String> {
        self.user_score.as_ref().and_then(display_text)
    }

    /// Labels of the requested classification field
    pub fn labels(&self, field: ClassificationField) -> Vec<String> {
        let classification = match field {
            ClassificationField::Tags => self.tags.as_ref(),
            ClassificationField::Genres => self.genres.as_ref(),
            ClassificationField::Categories => self.categories.as_ref(),
        };
        classification.map(Classification::labels).unwrap_or_default()
    }
}

/// A game in the shared library, with the accounts that own it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(flatten)]
    pub game: RawEntry,

    /// Owner labels in order of first appearance
    #[serde(default)]
    pub owners: Vec<String>,
}

impl CatalogEntry {
    /// Start a library entry owned by a single account
    pub fn from_raw(game: RawEntry, owner: impl Into<String>) -> Self {
        Self {
            game,
            owners: vec![owner.into()],
        }
    }

    pub fn appid(&self) -> u64 {
        self.game.appid
    }

    pub fn name(&self) -> &str {
        &self.game.name
    }

    /// Whether the given label is among the owners
    pub fn is_owned_by(&self, owner: &str) -> bool {
        self.owners.iter().any(|o| o == owner)
    }
}

/// Which classification field to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassificationField {
    Tags,
    Genres,
    Categories,
}

/// Tags, genres or categories in any of the shapes the API produces.
///
/// - `["Action", "Indie"]`
/// - `[{ "id": 1, "description": "Action" }]`
/// - `{ "FPS": 100, "Action": 50 }` (weighted; the keys are the labels)
///
/// Anything else is kept verbatim as `Other` and yields no labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Classification {
    List(Vec<Value>),
    Weighted(Map<String, Value>),
    Other(Value),
}

impl Classification {
    /// Build a plain list from string labels
    pub fn from_labels(labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Classification::List(labels.into_iter().map(|l| Value::String(l.into())).collect())
    }

    /// Normalise into display labels.
    ///
    /// Array items that are neither strings nor objects with a non-empty
    /// `description` are ignored.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Classification::List(items) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Object(obj) => obj
                        .get("description")
                        .and_then(Value::as_str)
                        .filter(|d| !d.is_empty())
                        .map(str::to_string),
                    _ => None,
                })
                .collect(),
            Classification::Weighted(map) => map.keys().cloned().collect(),
            Classification::Other(_) => Vec::new(),
        }
    }

    /// Arrays and mappings count as set even when empty
    pub fn is_set(&self) -> bool {
        match self {
            Classification::List(_) | Classification::Weighted(_) => true,
            Classification::Other(value) => is_truthy(value),
        }
    }
}

/// Price as received: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Value);

impl Price {
    /// Numeric amount, when the value parses as one
    pub fn amount(&self) -> Option<f64> {
        match &self.0 {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    pub fn is_free(&self) -> bool {
        self.amount() == Some(0.0)
    }

    /// Whether the received value is truthy (`"0.00"` is, `0` is not)
    pub fn is_set(&self) -> bool {
        is_truthy(&self.0)
    }
}

impl From<f64> for Price {
    fn from(amount: f64) -> Self {
        Self(Value::from(amount))
    }
}

impl From<&str> for Price {
    fn from(text: &str) -> Self {
        Self(Value::String(text.to_string()))
    }
}

/// `FREE` for a zero amount, otherwise the received text after `$`.
/// A value that is not a price at all displays as `N/A`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            return write!(f, "FREE");
        }
        match (&self.0, self.amount()) {
            (Value::String(s), Some(_)) => write!(f, "${}", s.trim()),
            (Value::Number(n), Some(_)) => write!(f, "${}", n),
            _ => write!(f, "N/A"),
        }
    }
}

/// JavaScript truthiness of a JSON value.
///
/// `null`, `false`, `0` and `""` are falsy; every array and object is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0 && !v.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text for a metadata value: strings and numbers as-is, and the `date` of
/// a store release-date object
fn display_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(obj) => obj
            .get("date")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .map(str::to_string),
        _ => None,
    }
}

/// A name that is missing or not a string becomes empty
fn name_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}
