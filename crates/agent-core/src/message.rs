//! Conversation Messages
//!
//! Message format shared by the coordinator and every provider. Content is a
//! list of blocks so one assistant turn can carry text and a tool request
//! side by side.

use serde::{Deserialize, Serialize};

use crate::tool::{ToolInvocation, ToolResult};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result fed back to the model
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
            Self::Tool => write!(f, "tool"),
        }
    }
}

/// One block of message content
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    ToolUse {
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default)]
        is_error: bool,
    },
    /// Block types this crate does not model (thinking, images, ...)
    #[serde(other)]
    Unsupported,
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Convert a `tool_use` block into an invocation
    pub fn as_invocation(&self) -> Option<ToolInvocation> {
        match self {
            Self::ToolUse { id, name, input } => Some(ToolInvocation::from_input(
                id.clone(),
                name.clone(),
                input.clone(),
            )),
            _ => None,
        }
    }
}

/// A single message in a conversation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Content blocks in order
    pub content: Vec<ContentBlock>,
}

impl Message {
    /// Create a message from blocks
    pub const fn new(role: Role, content: Vec<ContentBlock>) -> Self {
        Self { role, content }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, vec![ContentBlock::text(text)])
    }

    /// Create an assistant text message
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, vec![ContentBlock::text(text)])
    }

    /// Create a tool result message
    pub fn tool_result(result: &ToolResult) -> Self {
        Self::new(
            Role::Tool,
            vec![ContentBlock::ToolResult {
                tool_use_id: result.invocation_id.clone(),
                content: result.payload.to_content(),
                is_error: !result.success,
            }],
        )
    }

    /// Concatenated text of all text blocks
    pub fn text(&self) -> String {
        join_text(&self.content)
    }

    /// Tool requests carried by this message, in order
    pub fn tool_uses(&self) -> impl Iterator<Item = ToolInvocation> + '_ {
        self.content.iter().filter_map(ContentBlock::as_invocation)
    }
}

pub(crate) fn join_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|b| match b {
            ContentBlock::Text { text } => Some(text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Append-only conversation history
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Add several messages in order
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    /// Get all messages
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Get the last message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), "Hello");
    }

    #[test]
    fn test_content_block_wire_format() {
        let block = ContentBlock::ToolUse {
            id: "toolu_01".into(),
            name: "calculate".into(),
            input: json!({"expression": "2 + 2"}),
        };
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({"type": "tool_use", "id": "toolu_01", "name": "calculate", "input": {"expression": "2 + 2"}})
        );

        let parsed: ContentBlock =
            serde_json::from_value(json!({"type": "thinking", "thinking": "hmm"})).unwrap();
        assert_eq!(parsed, ContentBlock::Unsupported);
    }

    #[test]
    fn test_tool_uses_in_order() {
        let msg = Message::new(
            Role::Assistant,
            vec![
                ContentBlock::text("Let me check."),
                ContentBlock::ToolUse {
                    id: "a".into(),
                    name: "get_weather".into(),
                    input: json!({"city": "Paris"}),
                },
                ContentBlock::ToolUse {
                    id: "b".into(),
                    name: "calculate".into(),
                    input: json!({"expression": "1"}),
                },
            ],
        );
        let names: Vec<_> = msg.tool_uses().map(|t| t.name).collect();
        assert_eq!(names, vec!["get_weather", "calculate"]);
        assert_eq!(msg.text(), "Let me check.");
    }

    #[test]
    fn test_conversation() {
        let mut conv = Conversation::new();
        conv.push(Message::user("Hi"));
        conv.push(Message::assistant("Hello!"));

        assert_eq!(conv.len(), 2);
        assert_eq!(conv.last().unwrap().role, Role::Assistant);
    }
}
