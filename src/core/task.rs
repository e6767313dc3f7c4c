use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Format used for `created_at` timestamps.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One todo item. The position in the store is its only identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    #[serde(deserialize_with = "loose_field")]
    pub title: String,
    /// Free-form date/time text, normally `YYYY-MM-DD HH:MM`.
    #[serde(deserialize_with = "loose_field")]
    pub deadline: String,
    #[serde(deserialize_with = "loose_field")]
    pub description: String,
    #[serde(deserialize_with = "loose_field")]
    pub created_at: String,
}

/// Text for a loosely typed JSON field: `null` is empty, strings are taken
/// as-is and any other value keeps its JSON rendering.
pub fn loose_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn loose_field<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(|value| loose_text(&value))
}

impl TaskRecord {
    pub fn new(
        title: impl Into<String>,
        deadline: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            deadline: deadline.into(),
            description: description.into(),
            created_at: String::new(),
        }
    }

    pub fn stamp(&mut self, now: NaiveDateTime) {
        self.created_at = now.format(CREATED_AT_FORMAT).to_string();
    }

    /// Description collapsed onto one line for the list view.
    pub fn summary(&self) -> String {
        self.description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
