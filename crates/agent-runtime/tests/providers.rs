use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agent_core::provider::{CompletionRequest, FinishReason, GenerationOptions};
use agent_core::{AgentBuilder, AgentError, LlmProvider, Message};
use agent_runtime::{AnthropicConfig, AnthropicProvider, OpenRouterConfig, OpenRouterProvider};

fn anthropic(server: &MockServer) -> AnthropicProvider {
    let mut config = AnthropicConfig::new("sk-test");
    config.base_url = server.uri();
    AnthropicProvider::from_config(config).unwrap()
}

fn openrouter(server: &MockServer) -> OpenRouterProvider {
    let mut config = OpenRouterConfig::new("or-test");
    config.base_url = server.uri();
    OpenRouterProvider::from_config(config).unwrap()
}

fn hello_request() -> CompletionRequest {
    CompletionRequest::new(GenerationOptions::default()).with_messages(vec![Message::user("Hello")])
}

#[tokio::test]
async fn anthropic_sends_headers_and_parses_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "sk-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({"model": "claude-sonnet-4-20250514", "max_tokens": 1024})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "claude-sonnet-4-20250514",
            "stop_reason": "end_turn",
            "content": [{"type": "text", "text": "Hi there!"}],
            "usage": {"input_tokens": 8, "output_tokens": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = anthropic(&server).complete(&hello_request()).await.unwrap();
    assert_eq!(completion.text(), "Hi there!");
    assert_eq!(completion.finish_reason, FinishReason::Stop);
    assert_eq!(completion.usage.unwrap().total(), 12);
}

#[tokio::test]
async fn anthropic_maps_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": {"type": "authentication_error", "message": "invalid x-api-key"}
        })))
        .mount(&server)
        .await;

    let err = anthropic(&server).complete(&hello_request()).await.unwrap_err();
    assert!(matches!(err, AgentError::Auth(ref msg) if msg == "invalid x-api-key"));
}

#[tokio::test]
async fn anthropic_round_trip_with_calculator_tool() {
    use agent_core::tool::{Tool, ToolInvocation, ToolResult, ToolSpec};

    struct Adder;

    #[async_trait::async_trait]
    impl Tool for Adder {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("add", "Add two numbers")
                .param("a", "number", "First", true)
                .param("b", "number", "Second", true)
        }

        async fn execute(&self, call: &ToolInvocation) -> agent_core::Result<ToolResult> {
            let a = call.arguments["a"].as_f64().unwrap_or_default();
            let b = call.arguments["b"].as_f64().unwrap_or_default();
            Ok(ToolResult::success("add", format!("{}", a + b)))
        }
    }

    let server = MockServer::start().await;

    // Follow-up request carries the tool result
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "user"},
                {"role": "assistant"},
                {"role": "user", "content": [{"type": "tool_result", "tool_use_id": "toolu_7", "content": "5"}]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "m",
            "stop_reason": "end_turn",
            "content": [{"type": "text", "text": "2 + 3 = 5"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "m",
            "stop_reason": "tool_use",
            "content": [{"type": "tool_use", "id": "toolu_7", "name": "add", "input": {"a": 2, "b": 3}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let agent = AgentBuilder::new()
        .provider(Arc::new(anthropic(&server)))
        .tool(Adder)
        .build()
        .unwrap();

    let reply = agent.ask("What is 2 + 3?").await.unwrap();
    assert_eq!(reply.text, "2 + 3 = 5");
    assert_eq!(reply.used_tool(), Some("add"));
}

#[tokio::test]
async fn openrouter_uses_bearer_auth_and_reports_usage() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer or-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "mistralai/mistral-7b-instruct:free",
            "choices": [{"finish_reason": "stop", "message": {"role": "assistant", "content": "Bonjour"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        })))
        .mount(&server)
        .await;

    let completion = openrouter(&server).complete(&hello_request()).await.unwrap();
    assert_eq!(completion.text(), "Bonjour");
    assert_eq!(completion.usage.unwrap().total(), 7);
}

#[tokio::test]
async fn openrouter_server_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let err = openrouter(&server).complete(&hello_request()).await.unwrap_err();
    assert!(matches!(err, AgentError::ProviderUnavailable(_)));
}
