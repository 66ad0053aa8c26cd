//! Weather history file
//!
//! A JSON array of records. Appending rewrites the whole file through a
//! temporary sibling and a rename, so readers never see a partial write.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// History store errors
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("History file IO error ({path}): {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("History file is not a JSON array of records ({path}): {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One collected observation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub timestamp: DateTime<Local>,
    pub city: String,

    /// The agent's answer
    pub report: String,

    #[serde(default)]
    pub used_tool: Option<String>,
}

impl WeatherRecord {
    pub fn new(city: impl Into<String>, report: impl Into<String>, used_tool: Option<&str>) -> Self {
        Self {
            timestamp: Local::now(),
            city: city.into(),
            report: report.into(),
            used_tool: used_tool.map(ToString::to_string),
        }
    }
}

/// Append-only history in a single JSON file
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records; a missing file is an empty history
    pub async fn load(&self) -> Result<Vec<WeatherRecord>, HistoryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Append one record; returns the new number of records
    pub async fn append(&self, record: &WeatherRecord) -> Result<usize, HistoryError> {
        let mut records = self.load().await?;
        records.push(record.clone());

        let encoded = serde_json::to_string_pretty(&records).map_err(|source| HistoryError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, encoded)
            .await
            .map_err(|source| self.io_error(source))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| self.io_error(source))?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "History saved");
        Ok(records.len())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}
