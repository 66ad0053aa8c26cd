//! Tool-using chat agent

use agent_cli::console::{self, Console, Input};
use agent_cli::{AppConfig, CHAT_TOOLS, build_agent, logging};
use agent_core::Conversation;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let config = AppConfig::from_env()?;
    let agent = build_agent(&config, &CHAT_TOOLS, agent_tools::ASSISTANT_PROMPT)?;

    console::banner("Console AI agent with tools");
    println!("\nI can:");
    println!("  - answer questions");
    println!("  - look up the weather in a city");
    println!("  - do arithmetic");
    println!("  - tell the current date and time");
    println!("\nType 'exit' or 'quit' to leave.");

    let mut console = Console::stdin();
    let mut conversation = Conversation::new();

    while let Some(line) = console.read_line("\nYou: ").await? {
        let text = match console::classify(&line) {
            Input::Exit => break,
            Input::Empty => continue,
            Input::Text(text) => text,
        };

        match agent.send(&text, &mut conversation).await {
            Ok(reply) => {
                if let Some(exchange) = &reply.exchange {
                    console::print_exchange(exchange);
                }
                println!("\nAgent: {}", reply.text);
            }
            Err(e) => {
                tracing::error!(error = %e, "Round trip failed");
                println!("\nError: {}", e.user_message());
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
