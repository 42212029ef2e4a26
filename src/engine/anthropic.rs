use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{Engine, EngineFactory, EngineInfo};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Settings shared by every handle a factory starts.
struct Settings {
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
    system: String,
}

/// Starts [`AnthropicEngine`] handles. All handles share one HTTP client
/// (and its connection pool) but nothing else.
pub struct AnthropicFactory {
    client: reqwest::Client,
    settings: Arc<Settings>,
}

impl AnthropicFactory {
    pub fn new(model: String, api_key: Option<String>, max_tokens: u32, system: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings: Arc::new(Settings {
                model,
                api_key,
                max_tokens,
                system,
            }),
        }
    }
}

impl EngineFactory for AnthropicFactory {
    fn start(&self) -> Box<dyn Engine> {
        Box::new(AnthropicEngine {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            transcript: Vec::new(),
        })
    }

    fn describe(&self) -> EngineInfo {
        EngineInfo {
            provider: "anthropic".to_string(),
            model: self.settings.model.clone(),
        }
    }
}

/// A conversation with the Anthropic Messages API.
///
/// The handle remembers every completed exchange and sends the whole
/// transcript with each question.
pub struct AnthropicEngine {
    client: reqwest::Client,
    settings: Arc<Settings>,
    transcript: Vec<Message>,
}

impl AnthropicEngine {
    fn build_request(&self) -> ApiRequest<'_> {
        ApiRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            system: &self.settings.system,
            messages: &self.transcript,
        }
    }

    async fn send(&self, api_key: &str) -> Result<String> {
        let resp = self
            .client
            .post(API_URL)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .header("x-api-key", api_key)
            .json(&self.build_request())
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            bail!("Anthropic API error ({}): {}", status, text);
        }

        let api_resp: ApiResponse = resp.json().await?;

        if let Some(usage) = &api_resp.usage {
            tracing::debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "anthropic usage"
            );
        }

        extract_text(&api_resp)
    }
}

#[async_trait]
impl Engine for AnthropicEngine {
    async fn ask(&mut self, query: &str) -> Result<String> {
        let api_key = self.settings.api_key.clone().ok_or_else(|| {
            anyhow!("no Anthropic API key found. Set ANTHROPIC_API_KEY or pass --api-key.")
        })?;

        self.transcript.push(Message::new("user", query));

        match self.send(&api_key).await {
            Ok(answer) => {
                self.transcript.push(Message::new("assistant", &answer));
                Ok(answer)
            }
            Err(e) => {
                // Keep the transcript alternating user/assistant.
                self.transcript.pop();
                Err(e)
            }
        }
    }
}

/// Join the text blocks of a response.
fn extract_text(resp: &ApiResponse) -> Result<String> {
    let text: String = resp
        .content
        .iter()
        .filter_map(|block| {
            if block.content_type == "text" {
                block.text.as_deref()
            } else {
                None
            }
        })
        .collect::<Vec<_>>()
        .join("");

    if text.is_empty() {
        bail!("Anthropic API returned empty response");
    }
    Ok(text)
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: &'a [Message],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

impl Message {
    fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(api_key: Option<&str>) -> AnthropicFactory {
        AnthropicFactory::new(
            "claude-test".to_string(),
            api_key.map(str::to_string),
            256,
            "be brief".to_string(),
        )
    }

    fn engine_with(transcript: Vec<Message>) -> AnthropicEngine {
        let factory = factory(Some("sk-test"));
        AnthropicEngine {
            client: factory.client.clone(),
            settings: Arc::clone(&factory.settings),
            transcript,
        }
    }

    #[test]
    fn describe_reports_model() {
        let info = factory(None).describe();
        assert_eq!(info.provider, "anthropic");
        assert_eq!(info.model, "claude-test");
    }

    #[tokio::test]
    async fn missing_key_fails() {
        let mut engine = factory(None).start();
        let err = engine.ask("hello").await.unwrap_err();
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));
    }

    #[test]
    fn request_carries_settings_and_transcript() {
        let engine = engine_with(vec![
            Message::new("user", "hi"),
            Message::new("assistant", "hello"),
            Message::new("user", "how are you?"),
        ]);

        let json = serde_json::to_value(engine.build_request()).unwrap();
        assert_eq!(json["model"], "claude-test");
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["system"], "be brief");
        assert_eq!(json["messages"].as_array().unwrap().len(), 3);
        assert_eq!(json["messages"][1]["role"], "assistant");
        assert_eq!(json["messages"][2]["content"], "how are you?");
    }

    #[test]
    fn fresh_handles_start_with_empty_transcript() {
        let engine = engine_with(vec![]);
        let json = serde_json::to_value(engine.build_request()).unwrap();
        assert!(json["messages"].as_array().unwrap().is_empty());
    }

    #[test]
    fn extract_text_joins_text_blocks() {
        let resp: ApiResponse = serde_json::from_str(
            r#"{
                "content": [
                    {"type": "text", "text": "Hello, "},
                    {"type": "tool_use", "id": "x"},
                    {"type": "text", "text": "world"}
                ],
                "usage": {"input_tokens": 10, "output_tokens": 3}
            }"#,
        )
        .unwrap();
        assert_eq!(extract_text(&resp).unwrap(), "Hello, world");
    }

    #[test]
    fn extract_text_keeps_whitespace() {
        let resp: ApiResponse =
            serde_json::from_str(r#"{"content": [{"type": "text", "text": "  42\n"}]}"#).unwrap();
        assert_eq!(extract_text(&resp).unwrap(), "  42\n");
    }

    #[test]
    fn extract_text_empty_fails() {
        let resp: ApiResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        let err = extract_text(&resp).unwrap_err();
        assert!(err.to_string().contains("empty response"));
    }
}
