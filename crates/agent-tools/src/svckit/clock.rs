//! Clock Tool

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use serde_json::{Value, json};

use agent_core::{Result, Tool, ToolInvocation, ToolResult, ToolSpec};

use crate::kind::ToolKind;

/// Tool reporting the local date and time
#[derive(Clone, Copy, Debug, Default)]
pub struct ClockTool;

/// `{time: HH:MM:SS, date: DD.MM.YYYY, timestamp: RFC 3339}`
pub(crate) fn snapshot<Tz: TimeZone>(now: &DateTime<Tz>) -> Value
where
    Tz::Offset: std::fmt::Display,
{
    json!({
        "time": now.format("%H:%M:%S").to_string(),
        "date": now.format("%d.%m.%Y").to_string(),
        "timestamp": now.to_rfc3339(),
    })
}

#[async_trait]
impl Tool for ClockTool {
    fn spec(&self) -> ToolSpec {
        ToolSpec::new(ToolKind::GetCurrentTime.name(), "Get the current local date and time.")
    }

    async fn execute(&self, _call: &ToolInvocation) -> Result<ToolResult> {
        Ok(ToolResult::success(
            ToolKind::GetCurrentTime.name(),
            snapshot(&Local::now()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_snapshot_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 9, 5, 2).unwrap();
        let value = snapshot(&at);
        assert_eq!(value["time"], "09:05:02");
        assert_eq!(value["date"], "07.03.2024");
        assert_eq!(value["timestamp"], "2024-03-07T09:05:02+00:00");
    }

    #[tokio::test]
    async fn test_execute_succeeds() {
        let call = ToolInvocation::from_input("t", "get_current_time", json!({}));
        let result = ClockTool.execute(&call).await.unwrap();
        assert!(result.success);
        assert!(result.payload.to_content().contains("timestamp"));
    }
}
