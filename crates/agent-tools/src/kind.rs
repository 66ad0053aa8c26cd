//! Tool Catalogue
//!
//! The closed set of built-in tools. Every name the binaries can advertise
//! maps to exactly one implementation through [`ToolKind::build`].

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use agent_core::{AgentError, Tool, ToolRegistry};

use crate::svckit::{CalculatorTool, ClockTool, FileReaderTool, WeatherLookupTool};
use crate::weather::{StaticWeather, WeatherSource};

/// Built-in tool identifiers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetWeather,
    Calculate,
    GetCurrentTime,
    ReadFile,
}

impl ToolKind {
    pub const ALL: [Self; 4] = [
        Self::GetWeather,
        Self::Calculate,
        Self::GetCurrentTime,
        Self::ReadFile,
    ];

    /// Name advertised to the model
    pub const fn name(self) -> &'static str {
        match self {
            Self::GetWeather => "get_weather",
            Self::Calculate => "calculate",
            Self::GetCurrentTime => "get_current_time",
            Self::ReadFile => "read_file",
        }
    }

    /// Instantiate the implementation
    pub fn build(self, ctx: &ToolContext) -> Arc<dyn Tool> {
        match self {
            Self::GetWeather => Arc::new(WeatherLookupTool::new(Arc::clone(&ctx.weather))),
            Self::Calculate => Arc::new(CalculatorTool),
            Self::GetCurrentTime => Arc::new(ClockTool),
            Self::ReadFile => Arc::new(FileReaderTool::new(ctx.file_root.clone())),
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ToolKind {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| AgentError::ToolNotFound(s.to_string()))
    }
}

/// Shared dependencies for building tools
#[derive(Clone)]
pub struct ToolContext {
    pub weather: Arc<dyn WeatherSource>,

    /// Directory `read_file` is confined to
    pub file_root: PathBuf,
}

impl Default for ToolContext {
    fn default() -> Self {
        Self {
            weather: Arc::new(StaticWeather::new()),
            file_root: PathBuf::from("."),
        }
    }
}

impl ToolContext {
    #[must_use]
    pub fn with_file_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.file_root = root.into();
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: Arc<dyn WeatherSource>) -> Self {
        self.weather = weather;
        self
    }
}

/// Registry holding the given tools, in order
pub fn registry(kinds: &[ToolKind], ctx: &ToolContext) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for kind in kinds {
        registry.register_arc(kind.build(ctx));
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_kind_builds_its_own_name() {
        let ctx = ToolContext::default();
        for kind in ToolKind::ALL {
            assert_eq!(kind.build(&ctx).spec().name, kind.name());
            assert_eq!(kind.name().parse::<ToolKind>().unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = "launch_rockets".parse::<ToolKind>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown tool: launch_rockets");
    }

    #[test]
    fn test_registry_preserves_order() {
        let registry = registry(
            &[ToolKind::Calculate, ToolKind::GetWeather],
            &ToolContext::default(),
        );
        assert_eq!(registry.names(), vec!["calculate", "get_weather"]);
    }
}
