//! Console helpers shared by the interactive programs

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use agent_core::ToolExchange;

/// Words that end an interactive session
pub const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

const RULE_WIDTH: usize = 60;

/// What the user typed
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Exit,
    Empty,
    Text(String),
}

/// Classify one line of input
pub fn classify(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        Input::Empty
    } else if EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w)) {
        Input::Exit
    } else {
        Input::Text(line.to_string())
    }
}

/// Line reader with a prompt
pub struct Console<R> {
    lines: Lines<R>,
}

impl Console<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin> Console<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
        }
    }

    /// Print `prompt` and read a line; `None` at end of input
    pub async fn read_line(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }
}

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Title between two rules
pub fn banner(title: &str) {
    println!("{}", rule());
    println!("{title}");
    println!("{}", rule());
}

/// Tool name, arguments and result, as shown before an answer
pub fn print_exchange(exchange: &ToolExchange) {
    let arguments = serde_json::Value::Object(exchange.invocation.arguments.clone());
    println!("\n[tool] {}", exchange.invocation.name);
    println!("[args] {arguments}");
    let marker = if exchange.result.success { "result" } else { "failed" };
    println!("[{marker}] {}", exchange.result.payload);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify("  "), Input::Empty);
        assert_eq!(classify("exit"), Input::Exit);
        assert_eq!(classify(" QUIT "), Input::Exit);
        assert_eq!(classify("exit now"), Input::Text("exit now".into()));
        assert_eq!(classify(" hi "), Input::Text("hi".into()));
    }

    #[tokio::test]
    async fn test_read_line_until_eof() {
        let mut console = Console::new(&b"first\nsecond\n"[..]);
        assert_eq!(console.read_line("> ").await.unwrap().as_deref(), Some("first"));
        assert_eq!(console.read_line("> ").await.unwrap().as_deref(), Some("second"));
        assert_eq!(console.read_line("> ").await.unwrap(), None);
    }
}
