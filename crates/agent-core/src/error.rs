//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Completion service returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Completion service unreachable or overloaded
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Credentials rejected by the completion service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Tool not found in registry
    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    /// Tool arguments do not match the declared input schema
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Malformed completion response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Response did not contain a valid JSON envelope
    #[error("Failed to parse response JSON: {0}")]
    Envelope(String),
}

impl AgentError {
    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            Self::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            Self::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            Self::Auth(_) => {
                "Authentication failed. Check that the API key is correct and the account has credit."
                    .into()
            }
            Self::RateLimited(_) => "Too many requests. Please wait a moment.".into(),
            Self::Config(msg) => format!("Configuration problem: {msg}"),
            Self::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            Self::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            Self::ToolExecution(msg) => format!("Tool error: {msg}"),
            Self::Envelope(msg) => format!("Failed to parse response JSON: {msg}"),
            Self::Parse(_) => "The AI service returned a response that could not be read.".into(),
        }
    }
}
