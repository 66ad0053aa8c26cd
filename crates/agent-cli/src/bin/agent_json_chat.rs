//! Chat agent whose answers are shaped as a JSON envelope

use agent_cli::console::{self, Console, Input};
use agent_cli::{AppConfig, CHAT_TOOLS, build_agent, logging};
use agent_core::{Conversation, ENVELOPE_SYSTEM_PROMPT, ResponseEnvelope};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let config = AppConfig::from_env()?;
    let agent = build_agent(&config, &CHAT_TOOLS, ENVELOPE_SYSTEM_PROMPT)?;

    console::banner("AI agent with JSON answers");
    println!("Every answer arrives as {{answer, used_tool, confidence, metadata}}.");
    println!("Type 'exit' or 'quit' to leave.");

    let mut console = Console::stdin();
    let mut conversation = Conversation::new();

    while let Some(line) = console.read_line("\nYou: ").await? {
        let text = match console::classify(&line) {
            Input::Exit => break,
            Input::Empty => continue,
            Input::Text(text) => text,
        };

        let reply = match agent.send(&text, &mut conversation).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, "Round trip failed");
                println!("\nError: {}", e.user_message());
                continue;
            }
        };

        if let Some(exchange) = &reply.exchange {
            console::print_exchange(exchange);
        }

        match ResponseEnvelope::parse(&reply.text) {
            Ok(envelope) => {
                println!("\nJSON response:");
                println!("{}", serde_json::to_string_pretty(&envelope)?);
                println!("{}", console::rule());
                println!("Answer:     {}", envelope.answer.as_deref().unwrap_or("N/A"));
                println!("Used tool:  {}", envelope.used_tool.as_deref().unwrap_or("none"));
                println!("Confidence: {}", envelope.confidence.as_deref().unwrap_or("N/A"));
                if !envelope.metadata_is_empty() {
                    println!("Metadata:   {}", envelope.metadata);
                }
            }
            Err(e) => {
                println!("\nError: {e}");
                println!("Raw response:\n{}", reply.text);
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}
