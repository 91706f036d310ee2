//! Operation log for backend calls.
//!
//! Every API operation appends one JSONL entry, best effort: a log
//! failure never surfaces to the operator. The log file path is
//! discovered through a fallback chain:
//! 1. `$PARADACTL_LOG_FILE` (explicit override)
//! 2. `$XDG_STATE_HOME/parada/ctl.jsonl`
//! 3. `~/.local/state/parada/ctl.jsonl`

use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;

use crate::client::ApiError;

/// One logged backend operation.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp.
    pub ts: String,

    /// Request ID (UUID).
    pub req_id: String,

    /// Operation name (`fetch_data`, `login`, ...).
    pub operation: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Success flag.
    pub ok: bool,

    /// Error details if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

impl LogEntry {
    /// Discover the log file path with the fallback chain.
    fn discover_log_path() -> Option<String> {
        if let Ok(path) = std::env::var("PARADACTL_LOG_FILE") {
            return Some(path);
        }
        if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
            return Some(format!("{}/parada/ctl.jsonl", xdg_state));
        }
        if let Ok(home) = std::env::var("HOME") {
            return Some(format!("{}/.local/state/parada/ctl.jsonl", home));
        }
        None
    }

    /// Append this entry to the discovered log file. Best effort.
    pub fn write(&self) {
        let Some(path) = Self::discover_log_path() else {
            return;
        };
        self.append_to(std::path::Path::new(&path));
    }

    /// Append this entry to a specific file. Best effort.
    pub fn append_to(&self, path: &std::path::Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let Ok(json) = serde_json::to_string(self) else {
            return;
        };
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
            let _ = writeln!(file, "{}", json);
        }
    }
}

/// Record one backend operation.
pub fn log_operation(operation: &str, ok: bool, duration_ms: u64, error: Option<&ApiError>) {
    let entry = LogEntry {
        ts: chrono::Utc::now().to_rfc3339(),
        req_id: uuid::Uuid::new_v4().to_string(),
        operation: operation.to_string(),
        duration_ms,
        ok,
        error: error.map(|e| ErrorDetails {
            code: e.code().to_string(),
            message: e.to_string(),
        }),
    };
    entry.write();
}
