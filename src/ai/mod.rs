//! Task extraction through an OpenAI-compatible chat-completion endpoint.

pub mod client;
pub mod keyring;
pub mod prompt;
pub mod request;
pub mod response;
pub mod screenshot;

use chrono::NaiveDateTime;

use crate::clipboard::ClipboardImage;
use crate::config::GleanConfig;
use crate::core::task::TaskRecord;
use client::ChatClient;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("API response had no message content")]
    EmptyReply,
    #[error("reply is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("reply has no task list")]
    NoTaskList,
    #[error("failed to encode screenshot: {0}")]
    Image(#[from] image::ImageError),
    #[error("image buffer of {len} bytes does not fit {width}x{height}")]
    ImageSize {
        width: usize,
        height: usize,
        len: usize,
    },
}

/// What to extract tasks from.
#[derive(Debug, Clone)]
pub enum ExtractInput {
    Text(String),
    Image(ClipboardImage),
}

impl ExtractInput {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Image(_) => "image",
        }
    }
}

/// Endpoint parameters for one request.
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl ChatSettings {
    pub fn from_config(config: &GleanConfig, api_key: Option<String>) -> Self {
        Self {
            base_url: config.api_base().to_string(),
            model: config.model.trim().to_string(),
            api_key,
        }
    }
}

/// Extract tasks from `input`, resolving relative dates against `now`.
///
/// Every failure is logged and yields an empty list.
pub async fn analyze(settings: &ChatSettings, input: ExtractInput, now: NaiveDateTime) -> Vec<TaskRecord> {
    let kind = input.kind();
    match try_analyze(settings, &input, now).await {
        Ok(tasks) => {
            log::info!("AI extracted {} tasks from {}", tasks.len(), kind);
            tasks
        }
        Err(e) => {
            log::error!("AI extraction from {} failed: {}", kind, e);
            Vec::new()
        }
    }
}

async fn try_analyze(
    settings: &ChatSettings,
    input: &ExtractInput,
    now: NaiveDateTime,
) -> Result<Vec<TaskRecord>, ExtractError> {
    let request = request::extraction_request(&settings.model, input, now)?;
    let content = ChatClient::new(settings).complete(&request).await?;
    log::debug!("AI reply: {}", content);
    response::decode_tasks(&content)
}

/// Verify the endpoint, model and key with a minimal request.
pub async fn test_connection(settings: &ChatSettings) -> Result<String, String> {
    let client = ChatClient::new(settings);
    match client.complete(&request::ping_request(&settings.model)).await {
        Ok(_) => Ok(format!("Connected to {}", settings.model)),
        Err(ExtractError::Status { status, .. }) if status.as_u16() == 401 => {
            Err("Invalid API key".to_string())
        }
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn settings_from_config_trim_values() {
        let config = GleanConfig {
            api_base_url: "http://localhost:11434/v1/".into(),
            model: " llava ".into(),
            ..GleanConfig::default()
        };
        let settings = ChatSettings::from_config(&config, None);
        assert_eq!(settings.base_url, "http://localhost:11434/v1");
        assert_eq!(settings.model, "llava");
    }

    #[tokio::test]
    async fn unreachable_endpoint_yields_no_tasks() {
        let settings = ChatSettings {
            // Port 9 (discard) on loopback refuses connections.
            base_url: "http://127.0.0.1:9/v1".into(),
            model: "m".into(),
            api_key: None,
        };
        let now = NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let tasks = analyze(&settings, ExtractInput::Text("call Bob".into()), now).await;
        assert!(tasks.is_empty());
    }

    #[test]
    fn input_kind_names() {
        assert_eq!(ExtractInput::Text(String::new()).kind(), "text");
        let image = ClipboardImage {
            width: 0,
            height: 0,
            rgba: Vec::new(),
        };
        assert_eq!(ExtractInput::Image(image).kind(), "image");
    }
}
