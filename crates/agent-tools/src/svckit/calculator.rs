//! Calculator Tool
//!
//! Arithmetic through the restricted evaluator in [`crate::expr`]; the
//! expression is never handed to anything that could run code.

use async_trait::async_trait;
use serde_json::{Value, json};

use agent_core::{Result, Tool, ToolInvocation, ToolResult, ToolSpec};

use crate::expr::{evaluate, number_value};
use crate::kind::ToolKind;

/// Tool for evaluating arithmetic expressions
#[derive(Clone, Copy, Debug, Default)]
pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(
            ToolKind::Calculate.name(),
            "Evaluate an arithmetic expression. Supports + - * / ** and parentheses.",
        )
        .param("expression", "string", "Expression to evaluate, e.g. '2 + 2 * 3'", true)
    }

    async fn execute(&self, call: &ToolInvocation) -> Result<ToolResult> {
        let name = ToolKind::Calculate.name();
        let expression = call.str_arg("expression").unwrap_or_default();

        match evaluate(expression) {
            Ok(value) => Ok(ToolResult::success(
                name,
                json!({
                    "expression": expression,
                    "result": number_value(value),
                    "success": true,
                }),
            )),
            Err(e) => {
                tracing::debug!(expression, error = %e, "Expression rejected");
                Ok(ToolResult::failure(
                    name,
                    json!({
                        "expression": expression,
                        "result": Value::Null,
                        "success": false,
                        "error": e.to_string(),
                    }),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::ToolPayload;

    async fn run(expression: &str) -> ToolResult {
        let call = ToolInvocation::from_input("c1", "calculate", json!({"expression": expression}));
        CalculatorTool.execute(&call).await.unwrap()
    }

    fn structured(result: ToolResult) -> Value {
        match result.payload {
            ToolPayload::Structured(value) => value,
            ToolPayload::Text(text) => panic!("expected structured payload, got {text}"),
        }
    }

    #[tokio::test]
    async fn test_two_plus_two() {
        let result = run("2 + 2").await;
        assert!(result.success);
        let value = structured(result);
        assert_eq!(value["result"], json!(4));
        assert_eq!(value["success"], true);
    }

    #[tokio::test]
    async fn test_fractional_result() {
        let value = structured(run("7 / 2").await);
        assert_eq!(value["result"], json!(3.5));
    }

    #[tokio::test]
    async fn test_failure_carries_error() {
        let result = run("1 / 0").await;
        assert!(!result.success);
        let value = structured(result);
        assert_eq!(value["result"], Value::Null);
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "division by zero");
    }
}
