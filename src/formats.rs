use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One element of the catalog document as it appears on the wire.
///
/// Every field is optional and loosely typed; `book::BookRecord::normalize`
/// turns it into the typed record the rest of the crate works with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawBookRecord {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub authors: Option<Value>,
    #[serde(default)]
    pub year: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
    #[serde(default)]
    pub rating: Option<Value>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub publisher: Option<Value>,
    #[serde(default)]
    pub img: Option<Value>,
}

/// Persisted client preferences. Only the theme flag is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
}
