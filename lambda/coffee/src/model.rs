use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// A single coffee tasting entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoffeeRecord {
    pub id: String,
    pub roaster: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masl: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub varietals: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<Vec<String>>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// What a field accepts when it appears in a request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Non-empty string, mandatory on create.
    RequiredText,
    /// Any string, blank allowed.
    Text,
    Number,
    StringList,
}

/// The attributes a caller may set. `id` and `createdAt` are never in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum MutableField {
    Roaster,
    Country,
    Name,
    Producer,
    Processing,
    Masl,
    Varietals,
    Notes,
}

impl MutableField {
    /// Validation order; the first failing field decides the error message.
    pub const ALL: [MutableField; 8] = [
        Self::Roaster,
        Self::Country,
        Self::Name,
        Self::Producer,
        Self::Processing,
        Self::Masl,
        Self::Varietals,
        Self::Notes,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Roaster => "roaster",
            Self::Country => "country",
            Self::Name => "name",
            Self::Producer => "producer",
            Self::Processing => "processing",
            Self::Masl => "masl",
            Self::Varietals => "varietals",
            Self::Notes => "notes",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Self::Roaster | Self::Country => FieldKind::RequiredText,
            Self::Name | Self::Producer | Self::Processing => FieldKind::Text,
            Self::Masl => FieldKind::Number,
            Self::Varietals | Self::Notes => FieldKind::StringList,
        }
    }
}

/// Current time in epoch milliseconds.
pub(crate) fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Mints a new time-ordered record id.
pub(crate) fn new_id() -> String {
    Uuid::now_v7().to_string()
}
