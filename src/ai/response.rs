use serde::Deserialize;
use serde_json::{Map, Value};

use super::ExtractError;
use crate::core::task::{TaskRecord, loose_text};

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the assistant text out of a chat-completion response body.
pub fn reply_content(body: &str) -> Result<String, ExtractError> {
    let response: ChatResponse = serde_json::from_str(body)?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(ExtractError::EmptyReply)
}

/// Decode the model's JSON reply into task records.
///
/// Accepts a top-level array, or an object whose `"tasks"` member (or
/// failing that, first array-valued member) holds the array.
pub fn decode_tasks(content: &str) -> Result<Vec<TaskRecord>, ExtractError> {
    let value: Value = serde_json::from_str(strip_code_fence(content))?;

    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => take_task_list(&mut map).ok_or(ExtractError::NoTaskList)?,
        _ => return Err(ExtractError::NoTaskList),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(record_from_fields(&fields)),
            other => {
                log::debug!("Skipping non-object task entry: {}", other);
                None
            }
        })
        .collect())
}

fn take_task_list(map: &mut Map<String, Value>) -> Option<Vec<Value>> {
    if let Some(Value::Array(items)) = map.get_mut("tasks") {
        return Some(std::mem::take(items));
    }
    // Members keep reply order (serde_json `preserve_order`).
    map.values_mut().find_map(|value| match value {
        Value::Array(items) => Some(std::mem::take(items)),
        _ => None,
    })
}

fn record_from_fields(fields: &Map<String, Value>) -> TaskRecord {
    TaskRecord::new(
        field_text(fields, "title"),
        field_text(fields, "deadline"),
        field_text(fields, "description"),
    )
}

fn field_text(fields: &Map<String, Value>, key: &str) -> String {
    match fields.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => loose_text(other),
        None => String::new(),
    }
}

/// Models sometimes wrap JSON in a markdown fence despite being asked not to.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
