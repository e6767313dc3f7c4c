use super::request::ChatRequest;
use super::{ChatSettings, ExtractError, response};

/// Thin client for an OpenAI-compatible chat-completion endpoint.
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl ChatClient {
    pub fn new(settings: &ChatSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `request` and return the assistant message text.
    pub async fn complete(&self, request: &ChatRequest) -> Result<String, ExtractError> {
        log::debug!("POST {} (model {})", self.endpoint, request.model);

        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(ref key) = self.api_key {
            builder = builder.bearer_auth(key);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ExtractError::Status { status, body });
        }

        let body = resp.text().await?;
        response::reply_content(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: &str, api_key: Option<&str>) -> ChatSettings {
        ChatSettings {
            base_url: base_url.into(),
            model: "m".into(),
            api_key: api_key.map(String::from),
        }
    }

    #[test]
    fn endpoint_appends_chat_completions() {
        let client = ChatClient::new(&settings("https://llm.example.com/v1/", None));
        assert_eq!(client.endpoint(), "https://llm.example.com/v1/chat/completions");
    }

    #[test]
    fn blank_key_is_not_sent() {
        let client = ChatClient::new(&settings("http://localhost:11434/v1", Some("")));
        assert!(client.api_key.is_none());
    }
}
