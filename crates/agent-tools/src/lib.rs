//! # agent-tools
//!
//! Built-in tools for the chat agents and the stdio tool server.
//!
//! | Tool               | Input        | Output                                   |
//! |--------------------|--------------|------------------------------------------|
//! | `get_weather`      | `city`       | temperature and conditions               |
//! | `calculate`        | `expression` | `{result, success}` or `{error, ...}`    |
//! | `get_current_time` | none         | `{time, date, timestamp}`                |
//! | `read_file`        | `filepath`   | file contents, confined to a root dir    |
//!
//! ```rust,ignore
//! use agent_tools::{ToolContext, ToolKind};
//!
//! let tools = agent_tools::registry(&ToolKind::ALL, &ToolContext::default());
//! ```

pub mod error;
pub mod expr;
pub mod kind;
pub mod model;
pub mod svckit;
pub mod weather;

pub use error::EvalError;
pub use kind::{ToolContext, ToolKind, registry};
pub use model::WeatherReport;
pub use weather::{StaticWeather, WeatherSource};

/// Re-export tools for direct registration
pub mod tools {
    pub use crate::svckit::{CalculatorTool, ClockTool, FileReaderTool, WeatherLookupTool};
}

/// System prompt for the plain chat agent
pub const ASSISTANT_PROMPT: &str = "You are a helpful assistant. Use the available tools \
when a question needs current weather, arithmetic, the current time or the contents of a file. \
Answer concisely in the language of the question.";
