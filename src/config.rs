use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const CONFIG_VERSION: u64 = 1;

/// Poll interval used when the stored value is zero or absurdly small.
const MIN_POLL_MS: u64 = 250;

fn default_data_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("glean")
        .join("tasks.json")
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, CosmicConfigEntry)]
pub struct GleanConfig {
    /// JSON file holding the task list.
    pub data_file: PathBuf,
    /// Base URL of an OpenAI-compatible API, without the `/chat/completions` suffix.
    pub api_base_url: String,
    pub model: String,
    pub watch_clipboard: bool,
    pub clipboard_poll_ms: u64,
    pub notifications: bool,
    pub debug_logging: bool,
}

impl Default for GleanConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            api_base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            watch_clipboard: true,
            clipboard_poll_ms: 1500,
            notifications: true,
            debug_logging: false,
        }
    }
}

impl GleanConfig {
    pub fn clipboard_poll_interval(&self) -> Duration {
        Duration::from_millis(self.clipboard_poll_ms.max(MIN_POLL_MS))
    }

    /// The endpoint base with any trailing slash removed.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }

    /// Whether enough is configured to attempt an extraction request.
    pub fn ai_ready(&self) -> bool {
        !self.api_base().is_empty() && !self.model.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_interval_has_a_floor() {
        let mut config = GleanConfig::default();
        assert_eq!(config.clipboard_poll_interval(), Duration::from_millis(1500));
        config.clipboard_poll_ms = 0;
        assert_eq!(config.clipboard_poll_interval(), Duration::from_millis(MIN_POLL_MS));
    }

    #[test]
    fn api_base_strips_trailing_slash() {
        let config = GleanConfig {
            api_base_url: " https://llm.example.com/v1/ ".into(),
            ..GleanConfig::default()
        };
        assert_eq!(config.api_base(), "https://llm.example.com/v1");
        assert!(config.ai_ready());
    }

    #[test]
    fn blank_model_is_not_ready() {
        let config = GleanConfig {
            model: "  ".into(),
            ..GleanConfig::default()
        };
        assert!(!config.ai_ready());
    }

    #[test]
    fn default_data_file_lives_under_glean() {
        let config = GleanConfig::default();
        assert!(config.data_file.ends_with("glean/tasks.json"));
    }
}
