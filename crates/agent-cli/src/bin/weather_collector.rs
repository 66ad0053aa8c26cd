//! Periodic weather collection into a JSON history file

use agent_cli::collector::Collector;
use agent_cli::{AppConfig, CHAT_TOOLS, build_agent, console, logging};
use agent_notify::TelegramNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("info");

    let config = AppConfig::from_env()?;
    let agent = build_agent(&config, &CHAT_TOOLS, agent_tools::ASSISTANT_PROMPT)?;
    let notifier = TelegramNotifier::new(config.telegram.clone());
    let collector = Collector::new(agent, notifier, config.collector.clone());

    let settings = collector.settings();
    console::banner("Weather collector");
    println!("City:     {}", settings.city);
    println!("Interval: {} s", settings.interval.as_secs());
    println!("Saves to: {}", settings.history_path.display());
    println!("{}\n", console::rule());

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    let count = collector.run(shutdown).await;

    println!("\n\nCollector stopped");
    println!("Collections: {count}\n");
    Ok(())
}
