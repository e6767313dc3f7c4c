use chrono::NaiveDateTime;
use serde::Serialize;

use super::{ExtractError, ExtractInput, prompt, screenshot};

/// Low temperature keeps date arithmetic deterministic.
const EXTRACT_TEMPERATURE: f64 = 0.1;

/// Body of an OpenAI-compatible `/chat/completions` request.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self { kind: "json_object" }
    }
}

/// Build the extraction request for `input`, anchored to `now`.
pub fn extraction_request(
    model: &str,
    input: &ExtractInput,
    now: NaiveDateTime,
) -> Result<ChatRequest, ExtractError> {
    let user = match input {
        ExtractInput::Text(text) => MessageContent::Text(prompt::text_instruction(text)),
        ExtractInput::Image(image) => MessageContent::Parts(vec![
            ContentPart::Text {
                text: prompt::IMAGE_INSTRUCTION.to_string(),
            },
            ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: screenshot::data_url(image)?,
                },
            },
        ]),
    };

    Ok(ChatRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: MessageContent::Text(prompt::system_prompt(now)),
            },
            ChatMessage {
                role: Role::User,
                content: user,
            },
        ],
        temperature: EXTRACT_TEMPERATURE,
        max_tokens: None,
        response_format: Some(ResponseFormat::json_object()),
    })
}

/// Smallest request that proves the endpoint, model and key work.
pub fn ping_request(model: &str) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![ChatMessage {
            role: Role::User,
            content: MessageContent::Text("Reply with OK".to_string()),
        }],
        temperature: 0.0,
        max_tokens: Some(4),
        response_format: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::ClipboardImage;
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn text_request_shape() {
        let input = ExtractInput::Text("call Bob tomorrow".into());
        let request = extraction_request("gpt-4o-mini", &input, now()).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["temperature"], json!(0.1));
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert!(value.get("max_tokens").is_none());

        let messages = value["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert!(messages[0]["content"].as_str().unwrap().contains("2026-10-19 (Monday)"));
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[1]["content"], "Analyze this text: call Bob tomorrow");
    }

    #[test]
    fn image_request_has_text_and_image_parts() {
        let image = ClipboardImage {
            width: 1,
            height: 1,
            rgba: vec![10, 20, 30, 0],
        };
        let request = extraction_request("vision", &ExtractInput::Image(image), now()).unwrap();
        let value = serde_json::to_value(&request).unwrap();

        let parts = value["messages"][1]["content"].as_array().unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[0]["text"], prompt::IMAGE_INSTRUCTION);
        assert_eq!(parts[1]["type"], "image_url");
        assert!(
            parts[1]["image_url"]["url"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
    }

    #[test]
    fn ping_request_skips_response_format() {
        let value = serde_json::to_value(ping_request("m")).unwrap();
        assert!(value.get("response_format").is_none());
        assert_eq!(value["max_tokens"], 4);
    }
}
