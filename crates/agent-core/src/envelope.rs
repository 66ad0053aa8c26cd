//! JSON Response Envelope
//!
//! Variant of the chat where the model is told to answer with a fixed JSON
//! object. Models still like to wrap it in a markdown fence, so the raw text
//! is unwrapped before parsing.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};

/// System instructions that ask for the envelope
pub const ENVELOPE_SYSTEM_PROMPT: &str = r#"You are an AI assistant that ALWAYS answers in JSON.

Response format:
{
  "answer": "answer text",
  "used_tool": "tool name or null",
  "confidence": "high/medium/low",
  "metadata": {}
}

CRITICAL:
- Return ONLY plain JSON
- Do NOT use markdown blocks (```json or ```)
- Do NOT add any text before or after the JSON
- Your response must start with { and end with }
- The fields answer, used_tool, confidence and metadata must ALWAYS be present

Example of a CORRECT response:
{"answer": "text", "used_tool": null, "confidence": "high", "metadata": {}}"#;

/// Parsed envelope
///
/// Models do not always honour the requested shape, so every field is read
/// leniently: missing fields are `None`, non-string scalars are rendered as
/// text and a null or absent `metadata` becomes `{}`. Only text that is not a
/// JSON object at all is rejected.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub answer: Option<String>,
    pub used_tool: Option<String>,
    pub confidence: Option<String>,
    pub metadata: Value,
}

impl ResponseEnvelope {
    /// Unwrap an optional code fence and parse the envelope
    pub fn parse(raw: &str) -> Result<Self> {
        let json = strip_code_fence(raw);
        let value: Value =
            serde_json::from_str(json).map_err(|e| AgentError::Envelope(e.to_string()))?;
        Self::from_value(value)
    }

    /// Read the envelope fields out of an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        let mut fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(AgentError::Envelope(format!(
                    "expected a JSON object, got {other}"
                )));
            }
        };

        let metadata = match fields.remove("metadata") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(other) => other,
        };

        Ok(Self {
            answer: fields.remove("answer").and_then(as_text),
            used_tool: fields.remove("used_tool").and_then(as_text),
            confidence: fields.remove("confidence").and_then(as_text),
            metadata,
        })
    }

    /// True when `metadata` carries nothing worth showing
    pub fn metadata_is_empty(&self) -> bool {
        match &self.metadata {
            Value::Object(map) => map.is_empty(),
            Value::Null => true,
            _ => false,
        }
    }
}

fn as_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    }
}

/// Strip a markdown code fence around the payload.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence; without any
/// fence the trimmed input is returned.
pub fn strip_code_fence(raw: &str) -> &str {
    const JSON_FENCE: &str = "```json";
    const FENCE: &str = "```";

    let text = raw.trim();

    if let Some(start) = text.find(JSON_FENCE) {
        let body = &text[start + JSON_FENCE.len()..];
        let end = body.find(FENCE).unwrap_or(body.len());
        return body[..end].trim();
    }

    let mut parts = text.split(FENCE);
    match (parts.next(), parts.next()) {
        (Some(_), Some(inner)) => inner.trim(),
        _ => text,
    }
}
