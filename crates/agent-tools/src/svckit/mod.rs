//! Service Kit - Agent Tools
//!
//! Tools that implement `agent_core::Tool` for the chat agents, the
//! benchmark and the tool server.

mod calculator;
mod clock;
mod file_reader;
mod weather_lookup;

pub use calculator::CalculatorTool;
pub use clock::ClockTool;
pub use file_reader::{DEFAULT_MAX_BYTES, FileReaderTool};
pub use weather_lookup::WeatherLookupTool;
