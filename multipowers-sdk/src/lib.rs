//! Structured event records for multipowers workflow runs
//!
//! Workflow engines hand an [`EventRecord`] to an [`EventSink`]. The default sink
//! appends one JSON line per record to a dated log file (`<dir>/YYYY-MM-DD.jsonl`);
//! records are never read back by the engine.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Default directory for dated event logs, relative to the working directory
pub const DEFAULT_EVENT_LOG_DIR: &str = "outputs/runs";

/// One structured event, serialized as a single JSON object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub timestamp: DateTime<Local>,
    pub event: String,
    pub role: String,
    pub tool: String,
    pub exit_code: i32,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Free-form fields, flattened into the top-level object
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

impl EventRecord {
    /// Create a record stamped with the current local time
    pub fn new(event: impl Into<String>, role: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            event: event.into(),
            role: role.into(),
            tool: tool.into(),
            exit_code: 0,
            duration_ms: 0,
            request_id: None,
            metadata: Map::new(),
        }
    }

    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Attach a request id; blank ids are ignored
    pub fn with_request_id(mut self, request_id: Option<&str>) -> Self {
        self.request_id = request_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);
        self
    }

    /// Insert a metadata field; `null` values are dropped
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let value = value.into();
        if !value.is_null() {
            self.metadata.insert(key.into(), value);
        }
        self
    }
}

/// Destination for event records
pub trait EventSink: Send + Sync {
    fn append(&self, record: &EventRecord) -> io::Result<()>;
}

/// Appends records to `<dir>/<YYYY-MM-DD>.jsonl`
#[derive(Debug, Clone)]
pub struct JsonlEventSink {
    dir: PathBuf,
}

impl JsonlEventSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file for the day the record was stamped
    pub fn log_file_for(&self, record: &EventRecord) -> PathBuf {
        let day = record.timestamp.format("%Y-%m-%d");
        self.dir.join(format!("{}.jsonl", day))
    }
}

impl Default for JsonlEventSink {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_LOG_DIR)
    }
}

impl EventSink for JsonlEventSink {
    fn append(&self, record: &EventRecord) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let line = serde_json::to_string(record)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_file_for(record))?;
        writeln!(file, "{}", line)?;
        Ok(())
    }
}

/// Discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn append(&self, _record: &EventRecord) -> io::Result<()> {
        Ok(())
    }
}
