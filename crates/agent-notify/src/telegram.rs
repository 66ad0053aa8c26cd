//! Telegram Bot API client

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{NotifyError, Result};

/// Bot API base URL
pub const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Message formatting understood by the Bot API
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[default]
    #[serde(rename = "HTML")]
    Html,
    #[serde(rename = "MarkdownV2")]
    MarkdownV2,
}

/// Telegram configuration
#[derive(Clone, Debug)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,

    /// Base URL without the `/bot<token>` path
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    pub parse_mode: ParseMode,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            api_base: TELEGRAM_API_BASE.into(),
            timeout_secs: 10,
            parse_mode: ParseMode::default(),
        }
    }

    /// Read `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID` and `TELEGRAM_API_BASE`.
    /// `None` when either credential is missing.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(present("TELEGRAM_BOT_TOKEN")?, present("TELEGRAM_CHAT_ID")?);
        if let Some(api_base) = present("TELEGRAM_API_BASE") {
            config.api_base = api_base;
        }
        Some(config)
    }
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: ParseMode,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    ok: bool,
    description: Option<String>,
}

struct Enabled {
    client: Client,
    config: TelegramConfig,
}

/// Telegram notifier; disabled notifiers print locally
pub struct TelegramNotifier {
    inner: Option<Enabled>,
}

impl TelegramNotifier {
    /// Create a notifier. `None` (or a client that cannot be built) gives a
    /// disabled notifier.
    pub fn new(config: Option<TelegramConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("Telegram token or chat id not set; notifications go to the console");
            return Self::disabled();
        };

        match Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
        {
            Ok(client) => Self {
                inner: Some(Enabled { client, config }),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to build Telegram client; notifications go to the console");
                Self::disabled()
            }
        }
    }

    pub const fn disabled() -> Self {
        Self { inner: None }
    }

    pub const fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Send through the Bot API
    pub async fn try_send(&self, text: &str) -> Result<()> {
        let Some(Enabled { client, config }) = &self.inner else {
            return Err(NotifyError::Disabled);
        };

        let url = format!(
            "{}/bot{}/sendMessage",
            config.api_base.trim_end_matches('/'),
            config.bot_token
        );
        let response = client
            .post(url)
            .json(&SendMessage {
                chat_id: &config.chat_id,
                text,
                parse_mode: config.parse_mode,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();

        match parsed {
            Some(api) if status.is_success() && api.ok => Ok(()),
            Some(api) => Err(NotifyError::Api {
                status: status.as_u16(),
                description: api.description.unwrap_or_else(|| "request rejected".into()),
            }),
            None => Err(NotifyError::Api {
                status: status.as_u16(),
                description: body,
            }),
        }
    }

    /// Send, falling back to printing the text locally. Returns whether the
    /// message reached Telegram.
    pub async fn send_message(&self, text: &str) -> bool {
        match self.try_send(text).await {
            Ok(()) => {
                tracing::info!("Message sent to Telegram");
                true
            }
            Err(NotifyError::Disabled) => {
                println!("\n[Telegram disabled - message printed locally]\n{text}");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Telegram send failed");
                println!("\n[Telegram send failed - message printed locally]\n{text}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_both_credentials() {
        let only_token = TelegramConfig::from_lookup(|k| match k {
            "TELEGRAM_BOT_TOKEN" => Some("123:abc".into()),
            _ => None,
        });
        assert!(only_token.is_none());

        let blank_chat = TelegramConfig::from_lookup(|k| match k {
            "TELEGRAM_BOT_TOKEN" => Some("123:abc".into()),
            "TELEGRAM_CHAT_ID" => Some("  ".into()),
            _ => None,
        });
        assert!(blank_chat.is_none());

        let config = TelegramConfig::from_lookup(|k| match k {
            "TELEGRAM_BOT_TOKEN" => Some("123:abc".into()),
            "TELEGRAM_CHAT_ID" => Some("42".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.api_base, TELEGRAM_API_BASE);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.parse_mode, ParseMode::Html);
    }

    #[test]
    fn test_parse_mode_wire_names() {
        assert_eq!(serde_json::to_value(ParseMode::Html).unwrap(), "HTML");
        assert_eq!(serde_json::to_value(ParseMode::MarkdownV2).unwrap(), "MarkdownV2");
    }

    #[tokio::test]
    async fn test_disabled_notifier_never_sends() {
        let notifier = TelegramNotifier::new(None);
        assert!(!notifier.is_enabled());
        assert!(matches!(notifier.try_send("hi").await, Err(NotifyError::Disabled)));
        assert!(!notifier.send_message("hi").await);
    }
}
