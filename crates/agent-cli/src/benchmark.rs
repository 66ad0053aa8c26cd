//! Provider benchmark
//!
//! Sends one prompt to several models in turn and reports latency, token
//! count and the answer. A failing model is reported in its own row and
//! does not stop the others.

use std::sync::Arc;
use std::time::{Duration, Instant};

use agent_core::{CompletionRequest, GenerationOptions, LlmProvider, Message};
use agent_runtime::{AnthropicProvider, OpenRouterProvider};

use crate::config::AppConfig;

/// Per-request timeout for benchmarked providers
pub const BENCH_TIMEOUT_SECS: u64 = 60;

/// Answer length cap for every model
pub const BENCH_MAX_TOKENS: u32 = 500;

/// OpenRouter models compared against the Anthropic default
pub const OPENROUTER_MODELS: [(&str, &str); 2] = [
    ("openai/gpt-oss-20b:free", "GPT-OSS 20B (OpenAI)"),
    ("mistralai/mistral-7b-instruct:free", "Mistral 7B (Mistral AI)"),
];

/// One model to benchmark
pub struct BenchTarget {
    /// Display name
    pub label: String,

    pub model: String,

    /// Provider, or why it could not be set up
    pub provider: Result<Arc<dyn LlmProvider>, String>,
}

impl BenchTarget {
    pub fn new(label: impl Into<String>, model: impl Into<String>, provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            provider: Ok(provider),
        }
    }

    pub fn unavailable(label: impl Into<String>, model: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            model: model.into(),
            provider: Err(reason.into()),
        }
    }
}

/// Outcome for one model
#[derive(Clone, Debug, PartialEq)]
pub struct BenchResult {
    pub label: String,
    pub elapsed: Duration,

    /// Reported usage, or an estimate from the answer text
    pub tokens: u32,

    /// Answer text, or the error shown in place of it
    pub response: Result<String, String>,
}

/// Anthropic plus the OpenRouter models, each with the benchmark timeout.
/// Missing credentials become unavailable targets.
pub fn default_targets(config: &AppConfig) -> Vec<BenchTarget> {
    let mut targets = Vec::new();

    let anthropic_model = config.generation.model.clone();
    let anthropic_label = format!("Claude ({anthropic_model})");
    targets.push(match config.require_anthropic() {
        Ok(settings) => match AnthropicProvider::from_config(settings.with_timeout(BENCH_TIMEOUT_SECS)) {
            Ok(provider) => BenchTarget::new(anthropic_label, anthropic_model, Arc::new(provider)),
            Err(e) => BenchTarget::unavailable(anthropic_label, anthropic_model, e.to_string()),
        },
        Err(e) => BenchTarget::unavailable(anthropic_label, anthropic_model, e.to_string()),
    });

    for (model, label) in OPENROUTER_MODELS {
        let provider = config
            .openrouter
            .clone()
            .ok_or_else(|| "OPENROUTER_API_KEY not set".to_string())
            .and_then(|settings| {
                OpenRouterProvider::from_config(settings.with_timeout(BENCH_TIMEOUT_SECS))
                    .map_err(|e| e.to_string())
            });
        targets.push(match provider {
            Ok(provider) => BenchTarget::new(label, model, Arc::new(provider)),
            Err(reason) => BenchTarget::unavailable(label, model, reason),
        });
    }

    targets
}

/// Run the prompt against one target
pub async fn run_one(target: &BenchTarget, prompt: &str) -> BenchResult {
    let provider = match &target.provider {
        Ok(provider) => provider,
        Err(reason) => {
            return BenchResult {
                label: target.label.clone(),
                elapsed: Duration::ZERO,
                tokens: 0,
                response: Err(reason.clone()),
            };
        }
    };

    let mut options = GenerationOptions::with_model(&target.model);
    options.max_tokens = BENCH_MAX_TOKENS;
    let request = CompletionRequest::new(options).with_messages(vec![Message::user(prompt)]);

    let started = Instant::now();
    let outcome = provider.complete(&request).await;
    let elapsed = started.elapsed();

    match outcome {
        Ok(completion) => {
            let text = completion.text();
            let tokens = completion
                .usage
                .map_or_else(|| provider.estimate_tokens(&text), |u| u.total());
            tracing::info!(model = %target.model, elapsed_secs = elapsed.as_secs_f64(), tokens, "Model answered");
            BenchResult {
                label: target.label.clone(),
                elapsed,
                tokens,
                response: Ok(text),
            }
        }
        Err(e) => {
            tracing::warn!(model = %target.model, error = %e, "Model failed");
            BenchResult {
                label: target.label.clone(),
                elapsed,
                tokens: 0,
                response: Err(e.user_message()),
            }
        }
    }
}

/// Run every target in order
pub async fn run_all(targets: &[BenchTarget], prompt: &str) -> Vec<BenchResult> {
    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        println!("{}...", target.label);
        results.push(run_one(target, prompt).await);
    }
    results
}

/// Per-model details: time, tokens and the full answer
pub fn render_details(results: &[BenchResult]) -> String {
    let rule = "=".repeat(80);
    let thin = "-".repeat(80);

    results
        .iter()
        .enumerate()
        .map(|(i, result)| {
            let answer = match &result.response {
                Ok(text) => text.clone(),
                Err(reason) => format!("ERROR: {reason}"),
            };
            format!(
                "\n{rule}\nModel {}: {}\nTime: {:.2} s\nTokens: {}\n\nANSWER:\n{thin}\n{answer}\n{thin}\n",
                i + 1,
                result.label,
                result.elapsed.as_secs_f64(),
                result.tokens,
            )
        })
        .collect()
}

/// Summary table: model, seconds, tokens
pub fn render_table(results: &[BenchResult]) -> String {
    let mut out = format!("{:<35} {:<15} {:<10}\n", "Model", "Time (s)", "Tokens");
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for result in results {
        let tokens = match result.response {
            Ok(_) => result.tokens.to_string(),
            Err(_) => "error".to_string(),
        };
        out.push_str(&format!(
            "{:<35} {:<15.2} {:<10}\n",
            result.label,
            result.elapsed.as_secs_f64(),
            tokens
        ));
    }

    out
}
