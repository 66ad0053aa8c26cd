//! OpenRouter Provider
//!
//! OpenAI-compatible `chat/completions` endpoint. Tools are declared as
//! functions, tool requests come back as `tool_calls`, and results go back as
//! `tool` role messages.

use agent_core::{
    error::{AgentError, Result},
    message::{ContentBlock, Message, Role},
    provider::{Completion, CompletionRequest, FinishReason, LlmProvider, TokenUsage},
};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::http::{build_client, error_detail, read_body, transport_error};

/// OpenRouter API base URL
pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// OpenRouter provider configuration
#[derive(Clone, Debug)]
pub struct OpenRouterConfig {
    pub api_key: String,

    /// Base URL without the `/chat/completions` path
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OpenRouterConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: OPENROUTER_BASE_URL.into(),
            timeout_secs: 60,
        }
    }

    /// Read `OPENROUTER_API_KEY` and `OPENROUTER_BASE_URL`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENROUTER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("OPENROUTER_API_KEY not set".into()))?;

        let mut config = Self::new(api_key);
        if let Some(base_url) = lookup("OPENROUTER_BASE_URL") {
            config.base_url = base_url;
        }
        Ok(config)
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// OpenRouter LLM provider
pub struct OpenRouterProvider {
    client: Client,
    config: OpenRouterConfig,
}

impl OpenRouterProvider {
    /// Create from configuration
    pub fn from_config(config: OpenRouterConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            config,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body
    pub(crate) fn build_body(request: &CompletionRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system) = &request.options.system_prompt {
            messages.push(json!({"role": "system", "content": system}));
        }
        for message in &request.messages {
            convert_message(message, &mut messages);
        }

        let mut body = json!({
            "model": request.options.model,
            "max_tokens": request.options.max_tokens,
            "messages": messages,
        });

        if let Some(temperature) = request.options.temperature {
            body["temperature"] = json!(temperature);
        }
        if !request.tools.is_empty() {
            let tools: Vec<Value> = request
                .tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.input_schema,
                        }
                    })
                })
                .collect();
            body["tools"] = json!(tools);
        }

        body
    }

    /// Parse a response body into a completion
    pub(crate) fn parse_response(body: &str) -> Result<Completion> {
        let response: ChatResponse = serde_json::from_str(body)
            .map_err(|e| AgentError::Parse(format!("Unexpected OpenRouter response: {e}")))?;

        let Some(choice) = response.choices.into_iter().next() else {
            // OpenRouter reports some upstream failures with a 200 and an error object
            return Err(AgentError::Provider(error_detail(body)));
        };

        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            let input = serde_json::from_str(&call.function.arguments).unwrap_or_else(|e| {
                tracing::warn!(tool = %call.function.name, error = %e, "Unparseable tool arguments");
                json!({})
            });
            content.push(ContentBlock::ToolUse {
                id: call.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                name: call.function.name,
                input,
            });
        }

        let has_tool_calls = content.iter().any(|b| matches!(b, ContentBlock::ToolUse { .. }));
        let finish_reason = match choice.finish_reason.as_deref() {
            _ if has_tool_calls => FinishReason::ToolUse,
            Some("stop") | None => FinishReason::Stop,
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        };

        Ok(Completion {
            content,
            model: response.model,
            finish_reason,
            usage: response.usage.map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            }),
        })
    }
}

fn convert_message(message: &Message, out: &mut Vec<Value>) {
    match message.role {
        Role::User => out.push(json!({"role": "user", "content": message.text()})),
        Role::Assistant => {
            let tool_calls: Vec<Value> = message
                .tool_uses()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.name,
                            "arguments": Value::Object(call.arguments).to_string(),
                        }
                    })
                })
                .collect();

            let text = message.text();
            let content = if text.is_empty() { Value::Null } else { json!(text) };
            let mut wire = json!({"role": "assistant", "content": content});
            if !tool_calls.is_empty() {
                wire["tool_calls"] = json!(tool_calls);
            }
            out.push(wire);
        }
        Role::Tool => {
            for block in &message.content {
                if let ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    ..
                } = block
                {
                    out.push(json!({
                        "role": "tool",
                        "tool_call_id": tool_use_id,
                        "content": content,
                    }));
                }
            }
        }
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: WireFunction,
}

#[derive(Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Deserialize)]
struct WireUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        let body = Self::build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let text = read_body(response).await?;
        let completion = Self::parse_response(&text)?;

        tracing::debug!(
            model = %completion.model,
            finish_reason = ?completion.finish_reason,
            "OpenRouter completion received"
        );

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::provider::GenerationOptions;
    use agent_core::tool::{ToolResult, ToolSpec};

    #[test]
    fn test_body_uses_function_calling_shape() {
        let mut options = GenerationOptions::with_model("mistralai/mistral-7b-instruct:free");
        options.system_prompt = Some("Be brief.".into());

        let request = CompletionRequest::new(options)
            .with_tools(vec![ToolSpec::new("get_weather", "Weather").param(
                "city",
                "string",
                "City",
                true,
            )])
            .with_messages(vec![
                Message::user("Weather in Paris?"),
                Message::new(
                    Role::Assistant,
                    vec![ContentBlock::ToolUse {
                        id: "call_1".into(),
                        name: "get_weather".into(),
                        input: json!({"city": "Paris"}),
                    }],
                ),
                Message::tool_result(&ToolResult::success("get_weather", "+14°C").with_id("call_1")),
            ]);

        let body = OpenRouterProvider::build_body(&request);
        let messages = body["messages"].as_array().unwrap();

        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "Weather in Paris?");
        assert_eq!(messages[2]["content"], Value::Null);
        assert_eq!(messages[2]["tool_calls"][0]["function"]["arguments"], r#"{"city":"Paris"}"#);
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
        assert_eq!(body["tools"][0]["function"]["parameters"]["type"], "object");
    }

    #[test]
    fn test_parse_tool_calls() {
        let body = r#"{
            "model": "openai/gpt-oss-20b:free",
            "choices": [{
                "finish_reason": "tool_calls",
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"type": "function", "function": {"name": "calculate", "arguments": "{\"expression\":\"2 + 2\"}"}}
                    ]
                }
            }]
        }"#;

        let completion = OpenRouterProvider::parse_response(body).unwrap();
        assert_eq!(completion.finish_reason, FinishReason::ToolUse);
        let call = completion.first_tool_use().unwrap();
        assert!(!call.id.is_empty());
        assert_eq!(call.str_arg("expression"), Some("2 + 2"));
        assert!(completion.usage.is_none());
    }

    #[test]
    fn test_parse_error_object() {
        let body = r#"{"error": {"message": "No endpoints found", "code": 404}}"#;
        match OpenRouterProvider::parse_response(body).unwrap_err() {
            AgentError::Provider(msg) => assert_eq!(msg, "No endpoints found"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
