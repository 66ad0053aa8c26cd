//! Send a test message through the Telegram notifier

use agent_cli::{AppConfig, logging};
use agent_notify::TelegramNotifier;

const TEST_MESSAGE: &str = "<b>Notification test</b>\n\nThis is a test message from your tool agent.\n\nTelegram works!";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("info");

    let config = AppConfig::from_env()?;
    let notifier = TelegramNotifier::new(config.telegram);

    if notifier.send_message(TEST_MESSAGE).await {
        println!("Message sent to Telegram.");
    }
    Ok(())
}
