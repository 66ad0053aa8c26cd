//! Interactive client for the tool server

use agent_cli::console::{self, Console};
use agent_cli::{AppConfig, logging};
use agent_core::ToolSpec;
use agent_mcp::ToolClient;
use serde_json::{Map, Value};
use tokio::io::AsyncBufRead;

/// Tool list with parameters, required ones marked
fn print_tools(tools: &[ToolSpec]) {
    for (i, tool) in tools.iter().enumerate() {
        println!("\n{}. {}", i + 1, tool.name);
        println!("   {}", tool.description);

        let schema = &tool.input_schema;
        if schema.properties.is_empty() {
            continue;
        }
        println!("   Parameters:");
        for (name, property) in &schema.properties {
            let required = if schema.is_required(name) { "required" } else { "optional" };
            let description = if property.description.is_empty() {
                "no description"
            } else {
                property.description.as_str()
            };
            println!("     - {name} ({required}): {description}");
        }
    }
}

/// Prompt for every parameter; blank optional values are left out
async fn read_arguments<R>(console: &mut Console<R>, tool: &ToolSpec) -> anyhow::Result<Option<Map<String, Value>>>
where
    R: AsyncBufRead + Unpin,
{
    let schema = &tool.input_schema;
    let mut arguments = Map::new();

    if !schema.properties.is_empty() {
        println!("\nEnter parameters:");
    }
    for (name, property) in &schema.properties {
        let required = schema.is_required(name);
        let mut prompt = format!("   {name}");
        if required {
            prompt.push_str(" (required)");
        }
        if !property.description.is_empty() {
            prompt.push_str(" - ");
            prompt.push_str(&property.description);
        }
        prompt.push_str(": ");

        let Some(value) = console.read_line(&prompt).await? else {
            return Ok(None);
        };
        let value = value.trim();
        if !value.is_empty() || required {
            arguments.insert(name.clone(), Value::String(value.to_string()));
        }
    }

    Ok(Some(arguments))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init("warn");

    let config = AppConfig::from_env()?;

    console::banner("CONNECTING TO TOOL SERVER");
    println!("Starting '{}'...", config.tool_server_cmd);

    let mut client = ToolClient::spawn(&config.tool_server_cmd, &[])?;
    let info = client.initialize().await?;
    println!("Connected.");
    println!("\nServer: {} {}", info.server_info.name, info.server_info.version);

    let tools = client.list_tools().await?;
    if tools.is_empty() {
        println!("The server offers no tools.");
        return Ok(());
    }

    println!();
    console::banner("AVAILABLE TOOLS");
    print_tools(&tools);
    println!("\n{}", console::rule());
    println!("Found {} tools", tools.len());

    let mut console = Console::stdin();
    loop {
        println!("\nTOOLS:");
        for (i, tool) in tools.iter().enumerate() {
            println!("{}. {} - {}", i + 1, tool.name, tool.description);
        }
        println!("0. Exit");

        let Some(choice) = console.read_line("\nChoose a tool (number): ").await? else {
            break;
        };
        let choice = choice.trim();
        if choice == "0" {
            break;
        }

        let Ok(index) = choice.parse::<usize>() else {
            println!("Please enter a number.");
            continue;
        };
        let Some(tool) = index.checked_sub(1).and_then(|i| tools.get(i)) else {
            println!("No tool with that number.");
            continue;
        };

        println!("\nSelected: {}", tool.name);
        let Some(arguments) = read_arguments(&mut console, tool).await? else {
            break;
        };

        println!("\nRunning...");
        match client.call_tool(&tool.name, arguments).await {
            Ok(result) => {
                println!("\n{}", console::rule());
                println!("{}", if result.is_error { "ERROR:" } else { "RESULT:" });
                println!("{}", console::rule());
                println!("{}", result.first_text().unwrap_or("(no content)"));
                println!("{}", console::rule());
            }
            Err(e) => println!("\nCall failed: {e}"),
        }
    }

    println!("\nBye!");
    client.shutdown().await?;
    Ok(())
}
