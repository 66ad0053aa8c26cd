//! # agent-notify
//!
//! Sends short reports to a Telegram chat through the Bot API. When the
//! bot token or chat id is missing, or a send fails, the text is printed
//! locally instead so nothing is lost.
//!
//! ```rust,ignore
//! use agent_notify::{TelegramConfig, TelegramNotifier};
//!
//! let notifier = TelegramNotifier::new(TelegramConfig::from_env());
//! notifier.send_message("<b>Weather</b>: +15°C").await;
//! ```

pub mod error;
pub mod telegram;

pub use error::{NotifyError, Result};
pub use telegram::{ParseMode, TELEGRAM_API_BASE, TelegramConfig, TelegramNotifier};
