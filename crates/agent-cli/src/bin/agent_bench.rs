//! Compare models on one prompt

use agent_cli::benchmark::{default_targets, render_details, render_table, run_all};
use agent_cli::console::Console;
use agent_cli::{AppConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let config = AppConfig::from_env()?;
    let rule = "=".repeat(80);

    println!("{rule}\nMODEL COMPARISON\n{rule}");

    let mut console = Console::stdin();
    let Some(prompt) = console.read_line("\nEnter your prompt:\n> ").await? else {
        return Ok(());
    };
    let prompt = prompt.trim();
    if prompt.is_empty() {
        println!("Empty prompt, nothing to do.");
        return Ok(());
    }

    println!("\n{rule}\nRunning models...\n{rule}");
    let targets = default_targets(&config);
    let results = run_all(&targets, prompt).await;

    println!("\n{rule}\nRESULTS\n{rule}");
    print!("{}", render_details(&results));

    println!("\n{rule}\nSUMMARY\n{rule}");
    print!("{}", render_table(&results));
    println!("\n{rule}");

    Ok(())
}
