//! Tool System
//!
//! Tools declare a [`ToolSpec`] that is sent to the completion service and
//! implement [`Tool::execute`] locally. The [`ToolRegistry`] is the dispatch
//! table the coordinator consults when the model asks for a tool; dispatch
//! never fails, every problem becomes a failed [`ToolResult`].

use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AgentError, Result};

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Opaque id supplied by the completion service
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolInvocation {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Build from a raw `input` value; anything but an object yields no arguments
    pub fn from_input(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        let arguments = match input {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self::new(id, name, arguments)
    }

    /// String argument by name
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(Value::as_str)
    }
}

/// Tool output: plain text or a structured value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolPayload {
    Text(String),
    Structured(Value),
}

impl ToolPayload {
    /// Render as the string content fed back to the model
    pub fn to_content(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Structured(value) => value.to_string(),
        }
    }
}

impl std::fmt::Display for ToolPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_content())
    }
}

impl From<String> for ToolPayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ToolPayload {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Value> for ToolPayload {
    fn from(value: Value) -> Self {
        Self::Structured(value)
    }
}

/// Result from tool execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Id of the invocation this answers
    pub invocation_id: String,

    /// Whether execution succeeded
    pub success: bool,

    /// Output (value or error description)
    pub payload: ToolPayload,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, payload: impl Into<ToolPayload>) -> Self {
        Self {
            name: name.into(),
            invocation_id: String::new(),
            success: true,
            payload: payload.into(),
        }
    }

    pub fn failure(name: impl Into<String>, payload: impl Into<ToolPayload>) -> Self {
        Self {
            name: name.into(),
            invocation_id: String::new(),
            success: false,
            payload: payload.into(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.invocation_id = id.into();
        self
    }
}

/// Declared property of a tool's input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// JSON Schema type (string, number, integer, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,

    /// Allowed values
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
}

fn object_type() -> String {
    "object".into()
}

/// JSON-Schema-like object describing tool input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type", default = "object_type")]
    pub schema_type: String,

    /// Parameters in declaration order
    #[serde(default)]
    pub properties: IndexMap<String, PropertySchema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Default for InputSchema {
    fn default() -> Self {
        Self {
            schema_type: object_type(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

impl InputSchema {
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Check required fields and declared primitive types
    pub fn validate(&self, arguments: &Map<String, Value>) -> Result<()> {
        for name in &self.required {
            match arguments.get(name) {
                None | Some(Value::Null) => {
                    return Err(AgentError::ToolValidation(format!(
                        "Missing required parameter: {name}"
                    )));
                }
                Some(_) => {}
            }
        }

        for (name, value) in arguments {
            let Some(property) = self.properties.get(name) else {
                continue;
            };
            if value.is_null() && !self.is_required(name) {
                continue;
            }
            let matches = match property.param_type.as_str() {
                "string" => value.is_string(),
                "number" => value.is_number(),
                "integer" => value.is_i64() || value.is_u64(),
                "boolean" => value.is_boolean(),
                "object" => value.is_object(),
                "array" => value.is_array(),
                _ => true,
            };
            if !matches {
                return Err(AgentError::ToolValidation(format!(
                    "Parameter '{name}' must be of type {}",
                    property.param_type
                )));
            }
        }

        Ok(())
    }
}

/// Static declaration of a callable capability
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Input schema
    #[serde(alias = "inputSchema", default)]
    pub input_schema: InputSchema,
}

impl ToolSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: InputSchema::default(),
        }
    }

    /// Declare a parameter
    #[must_use]
    pub fn param(
        mut self,
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
        required: bool,
    ) -> Self {
        let name = name.into();
        if required {
            self.input_schema.required.push(name.clone());
        }
        self.input_schema.properties.insert(
            name,
            PropertySchema {
                param_type: param_type.into(),
                description: description.into(),
                enum_values: None,
            },
        );
        self
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declaration sent to the completion service
    fn spec(&self) -> ToolSpec;

    /// Execute the tool with given arguments
    async fn execute(&self, call: &ToolInvocation) -> Result<ToolResult>;

    /// Validate arguments before execution
    fn validate(&self, call: &ToolInvocation) -> Result<()> {
        self.spec().input_schema.validate(&call.arguments)
    }
}

/// Dispatch table from tool name to implementation
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    /// Register a shared tool; a tool with the same name is replaced
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.spec().name;
        if let Some(&pos) = self.index.get(&name) {
            tracing::warn!(tool = %name, "Replacing previously registered tool");
            self.tools[pos] = tool;
        } else {
            self.index.insert(name, self.tools.len());
            self.tools.push(tool);
        }
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| Arc::clone(&self.tools[pos]))
    }

    /// Declarations in registration order
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|t| t.spec()).collect()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.spec().name).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Run an invocation. Unknown names, invalid arguments, tool errors and
    /// panics all come back as a failed result carrying the invocation id.
    pub async fn dispatch(&self, call: &ToolInvocation) -> ToolResult {
        let Some(tool) = self.get(&call.name) else {
            tracing::warn!(tool = %call.name, "Model requested an undeclared tool");
            let err = AgentError::ToolNotFound(call.name.clone());
            return ToolResult::failure(&call.name, err.to_string()).with_id(&call.id);
        };

        if let Err(e) = tool.validate(call) {
            tracing::debug!(tool = %call.name, error = %e, "Tool arguments rejected");
            return ToolResult::failure(&call.name, e.to_string()).with_id(&call.id);
        }

        let outcome = AssertUnwindSafe(tool.execute(call)).catch_unwind().await;
        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => ToolResult::failure(&call.name, e.to_string()),
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(ToString::to_string)
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".into());
                tracing::error!(tool = %call.name, %reason, "Tool panicked");
                let err = AgentError::ToolExecution(format!("tool panicked: {reason}"));
                ToolResult::failure(&call.name, err.to_string())
            }
        };

        result.with_id(&call.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("echo", "Echo the input back")
                .param("text", "string", "Text to echo", true)
                .param("times", "integer", "Repeat count", false)
        }

        async fn execute(&self, call: &ToolInvocation) -> Result<ToolResult> {
            let text = call.str_arg("text").unwrap_or_default();
            Ok(ToolResult::success("echo", text))
        }
    }

    struct BrokenTool;

    #[async_trait]
    impl Tool for BrokenTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("broken", "Always fails")
        }

        async fn execute(&self, _call: &ToolInvocation) -> Result<ToolResult> {
            Err(AgentError::ToolExecution("disk on fire".into()))
        }
    }

    struct PanickyTool;

    #[async_trait]
    impl Tool for PanickyTool {
        fn spec(&self) -> ToolSpec {
            ToolSpec::new("panicky", "Panics")
        }

        async fn execute(&self, _call: &ToolInvocation) -> Result<ToolResult> {
            panic!("boom");
        }
    }

    fn invocation(name: &str, args: Value) -> ToolInvocation {
        ToolInvocation::from_input("call_1", name, args)
    }

    #[test]
    fn test_spec_serializes_as_json_schema() {
        let value = serde_json::to_value(EchoTool.spec()).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "echo",
                "description": "Echo the input back",
                "input_schema": {
                    "type": "object",
                    "properties": {
                        "text": {"type": "string", "description": "Text to echo"},
                        "times": {"type": "integer", "description": "Repeat count"}
                    },
                    "required": ["text"]
                }
            })
        );
    }

    #[test]
    fn test_spec_accepts_camel_case_schema_key() {
        let spec: ToolSpec = serde_json::from_value(json!({
            "name": "get_current_time",
            "description": "Current time",
            "inputSchema": {"type": "object", "properties": {}}
        }))
        .unwrap();
        assert!(spec.input_schema.properties.is_empty());
        assert!(spec.input_schema.required.is_empty());
    }

    #[test]
    fn test_parameters_keep_declaration_order() {
        let spec = ToolSpec::new("convert", "Convert an amount")
            .param("value", "number", "Amount", true)
            .param("from", "string", "Source unit", true)
            .param("to", "string", "Target unit", false);

        let names: Vec<&str> = spec.input_schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["value", "from", "to"]);

        let encoded = serde_json::to_string(&spec).unwrap();
        let decoded: ToolSpec = serde_json::from_str(&encoded).unwrap();
        let names: Vec<&str> = decoded.input_schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["value", "from", "to"]);

        let through_value: ToolSpec =
            serde_json::from_value(serde_json::to_value(&spec).unwrap()).unwrap();
        let names: Vec<&str> = through_value.input_schema.properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["value", "from", "to"]);
    }

    #[test]
    fn test_validation() {
        let schema = EchoTool.spec().input_schema;
        assert!(schema.validate(json!({"text": "hi"}).as_object().unwrap()).is_ok());

        let err = schema.validate(&Map::new()).unwrap_err();
        assert!(err.to_string().contains("Missing required parameter: text"));

        let err = schema
            .validate(json!({"text": "hi", "times": "twice"}).as_object().unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("'times' must be of type integer"));
    }

    #[test]
    fn test_tool_registry() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(BrokenTool);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["echo", "broken"]);
        assert!(registry.get("echo").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_success_keeps_invocation_id() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let result = registry.dispatch(&invocation("echo", json!({"text": "hi"}))).await;
        assert!(result.success);
        assert_eq!(result.invocation_id, "call_1");
        assert_eq!(result.payload, ToolPayload::Text("hi".into()));
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_a_result() {
        let registry = ToolRegistry::new();
        let result = registry.dispatch(&invocation("teleport", json!({}))).await;
        assert!(!result.success);
        assert_eq!(result.invocation_id, "call_1");
        assert_eq!(result.payload.to_content(), "Unknown tool: teleport");
    }

    #[tokio::test]
    async fn test_dispatch_converts_errors_and_panics() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);
        registry.register(BrokenTool);
        registry.register(PanickyTool);

        let invalid = registry.dispatch(&invocation("echo", json!({}))).await;
        assert!(!invalid.success);

        let broken = registry.dispatch(&invocation("broken", json!({}))).await;
        assert!(!broken.success);
        assert!(broken.payload.to_content().contains("disk on fire"));

        let panicky = registry.dispatch(&invocation("panicky", json!({}))).await;
        assert!(!panicky.success);
        assert!(panicky.payload.to_content().contains("boom"));
    }

    #[test]
    fn test_structured_payload_keeps_unicode() {
        let payload = ToolPayload::from(json!({"condition": "солнечно"}));
        assert_eq!(payload.to_content(), r#"{"condition":"солнечно"}"#);
    }
}
