//! Periodic weather collector
//!
//! Asks the agent for the configured city's weather right away and then
//! once per interval, appending every answer to the history file, until the
//! shutdown future resolves.

use std::future::Future;

use agent_core::Agent;
use agent_notify::TelegramNotifier;

use crate::config::CollectorSettings;
use crate::history::{HistoryStore, WeatherRecord};

/// Collector state
pub struct Collector {
    agent: Agent,
    store: HistoryStore,
    notifier: TelegramNotifier,
    settings: CollectorSettings,
}

impl Collector {
    pub fn new(agent: Agent, notifier: TelegramNotifier, settings: CollectorSettings) -> Self {
        Self {
            agent,
            store: HistoryStore::new(&settings.history_path),
            notifier,
            settings,
        }
    }

    pub const fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub const fn store(&self) -> &HistoryStore {
        &self.store
    }

    /// Instruction sent to the agent each iteration
    pub fn prompt(city: &str) -> String {
        format!(
            "Get the current weather in {city} with the get_weather tool and answer with a \
             one-line summary: conditions and temperature."
        )
    }

    /// One collection: ask, append, optionally notify
    pub async fn collect_once(&self) -> anyhow::Result<WeatherRecord> {
        let city = &self.settings.city;
        let reply = self.agent.ask(&Self::prompt(city)).await?;

        let record = WeatherRecord::new(city, reply.text.trim(), reply.used_tool());
        let total = self.store.append(&record).await?;
        tracing::info!(city = %city, records = total, "Weather saved");

        if self.notifier.is_enabled() {
            let message = format!("<b>Weather in {city}</b>\n{}", record.report);
            self.notifier.send_message(&message).await;
        }

        Ok(record)
    }

    /// Collect until `shutdown` resolves; returns the number of collections
    /// attempted. A failed collection is logged and the schedule continues.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> usize {
        tokio::pin!(shutdown);
        let mut count = 0;

        loop {
            let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
            tokio::select! {
                outcome = self.collect_once() => {
                    count += 1;
                    match outcome {
                        Ok(record) => println!("[{stamp}] #{count} {}", record.report),
                        Err(e) => {
                            tracing::error!(error = %e, "Collection failed");
                            println!("[{stamp}] #{count} error: {e}");
                        }
                    }
                }
                () = &mut shutdown => break,
            }

            tokio::select! {
                () = tokio::time::sleep(self.settings.interval) => {}
                () = &mut shutdown => break,
            }
        }

        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use agent_core::testing::ScriptedProvider;
    use agent_core::{AgentBuilder, AgentError, Completion, ContentBlock, FinishReason};
    use agent_tools::{ToolContext, ToolKind};
    use serde_json::json;

    fn weather_script() -> Vec<agent_core::Result<Completion>> {
        vec![
            Ok(Completion {
                content: vec![ContentBlock::ToolUse {
                    id: "toolu_1".into(),
                    name: "get_weather".into(),
                    input: json!({"city": "Warsaw"}),
                }],
                model: "m".into(),
                finish_reason: FinishReason::ToolUse,
                usage: None,
            }),
            Ok(Completion::text_only("Partly cloudy, +18°C")),
        ]
    }

    fn collector(dir: &tempfile::TempDir, script: Vec<agent_core::Result<Completion>>) -> Collector {
        let agent = AgentBuilder::new()
            .provider(Arc::new(ScriptedProvider::new(script)))
            .tools(agent_tools::registry(&[ToolKind::GetWeather], &ToolContext::default()))
            .build()
            .unwrap();
        let settings = CollectorSettings {
            city: "Warsaw".into(),
            interval: Duration::from_secs(3600),
            history_path: dir.path().join("weather_history.json"),
        };
        Collector::new(agent, TelegramNotifier::disabled(), settings)
    }

    #[tokio::test]
    async fn test_successful_iteration_appends_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let collector = collector(&dir, weather_script());

        let record = collector.collect_once().await.unwrap();
        assert_eq!(record.city, "Warsaw");
        assert_eq!(record.report, "Partly cloudy, +18°C");
        assert_eq!(record.used_tool.as_deref(), Some("get_weather"));

        let saved = collector.store().load().await.unwrap();
        assert_eq!(saved, vec![record]);
    }

    #[tokio::test]
    async fn test_provider_failure_appends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let collector = collector(
            &dir,
            vec![Err(AgentError::ProviderUnavailable("connection refused".into()))],
        );

        assert!(collector.collect_once().await.is_err());
        assert!(collector.store().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_collects_immediately_then_stops() {
        let dir = tempfile::tempdir().unwrap();
        let collector = collector(&dir, weather_script());

        let count = collector
            .run(tokio::time::sleep(Duration::from_millis(500)))
            .await;

        assert_eq!(count, 1);
        assert_eq!(collector.store().load().await.unwrap().len(), 1);
    }
}
