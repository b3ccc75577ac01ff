//! Tool suggestion backends.

use super::models::{SuggestError, SuggestToolsOutput};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

const PROMPT_TEMPLATE: &str = "You are an expert tool rental assistant. A user has uploaded a \
document describing their project. Based on the document, suggest the most suitable tools for \
the user to rent.

Document Content: {document}

Reply with a JSON object of the form {\"suggestedTools\": [\"<tool name>\", ...]} and nothing else.

Suggest tools:
";

/// Suggests tool names for a project description.
#[async_trait]
pub trait ToolSuggestionService: Send + Sync {
    async fn suggest(&self, document: &str) -> Result<Vec<String>, SuggestError>;
}

pub fn render_prompt(document: &str) -> String {
    PROMPT_TEMPLATE.replace("{document}", document)
}

/// Validates a generated reply against [`SuggestToolsOutput`].
///
/// The JSON object may be surrounded by prose or a code fence.
pub fn parse_suggestions(reply: &str) -> Result<Vec<String>, SuggestError> {
    let json = match (reply.find('{'), reply.rfind('}')) {
        (Some(start), Some(end)) if start < end => &reply[start..=end],
        _ => return Err(SuggestError::Service("reply contains no JSON object".into())),
    };

    let output: SuggestToolsOutput = serde_json::from_str(json)
        .map_err(|e| SuggestError::Service(format!("reply does not match schema: {e}")))?;
    Ok(output.suggested_tools)
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

impl MessagesResponse {
    fn text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

/// Asks a messages-style completion endpoint for suggestions.
///
/// One round trip per call: no retry, no caching, no timeout.
#[derive(Debug, Clone)]
pub struct GenerativeSuggestionService {
    http: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    max_tokens: u32,
}

impl GenerativeSuggestionService {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
            max_tokens,
        }
    }

    pub fn from_config(config: &crate::config::Suggest) -> Self {
        Self::new(
            &config.endpoint,
            &config.model,
            config.api_key.clone(),
            config.max_tokens,
        )
    }

    async fn complete(&self, prompt: &str) -> Result<String, SuggestError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| SuggestError::Service("no API key configured".into()))?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let res = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| SuggestError::Service(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(SuggestError::Service(format!("http {}: {body}", status.as_u16())));
        }

        let response: MessagesResponse = res
            .json()
            .await
            .map_err(|e| SuggestError::Service(e.to_string()))?;
        response
            .text()
            .map(str::to_string)
            .ok_or_else(|| SuggestError::Service("no text content in reply".into()))
    }
}

#[async_trait]
impl ToolSuggestionService for GenerativeSuggestionService {
    async fn suggest(&self, document: &str) -> Result<Vec<String>, SuggestError> {
        if document.trim().is_empty() {
            return Err(SuggestError::EmptyInput);
        }

        let reply = self
            .complete(&render_prompt(document))
            .await
            .inspect_err(|e| warn!(error = %e, "tool suggestion request failed"))?;

        let tools = parse_suggestions(&reply)
            .inspect_err(|e| warn!(error = %e, "tool suggestion reply rejected"))?;
        debug!(count = tools.len(), "received tool suggestions");
        Ok(tools)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_document() {
        let prompt = render_prompt("Tile a bathroom floor");
        assert!(prompt.starts_with("You are an expert tool rental assistant."));
        assert!(prompt.contains("Document Content: Tile a bathroom floor"));
        assert!(prompt.contains("\"suggestedTools\""));
    }

    #[test]
    fn parses_fenced_reply() {
        let reply =
            "Here you go:\n```json\n{\"suggestedTools\": [\"Tile cutter\", \"Trowel\"]}\n```";
        assert_eq!(
            parse_suggestions(reply).unwrap(),
            vec!["Tile cutter".to_string(), "Trowel".to_string()]
        );
    }

    #[test]
    fn rejects_reply_without_json() {
        assert!(matches!(
            parse_suggestions("I suggest a hammer."),
            Err(SuggestError::Service(_))
        ));
    }

    #[test]
    fn rejects_reply_with_wrong_schema() {
        assert!(matches!(
            parse_suggestions(r#"{"tools": ["Hammer"]}"#),
            Err(SuggestError::Service(_))
        ));
        assert!(matches!(
            parse_suggestions(r#"{"suggestedTools": [1, 2]}"#),
            Err(SuggestError::Service(_))
        ));
    }

    #[tokio::test]
    async fn missing_api_key_is_a_service_error() {
        let service = GenerativeSuggestionService::new("http://127.0.0.1:9", "model", None, 64);
        assert!(matches!(
            service.suggest("Build a shed").await,
            Err(SuggestError::Service(_))
        ));
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_any_call() {
        let service = GenerativeSuggestionService::new("http://127.0.0.1:9", "model", None, 64);
        assert_eq!(service.suggest("   ").await, Err(SuggestError::EmptyInput));
    }
}
