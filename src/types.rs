// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Download records as reported by the daemon.
//!
//! aria2 encodes every integer as a decimal string and omits fields it does not
//! know yet, so every field here is optional and parsed leniently. A malformed
//! value becomes `None` rather than a deserialization error.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Keys requested from `tellActive`/`tellWaiting`/`tellStopped`/`tellStatus`.
pub const STATUS_KEYS: &[&str] = &[
    "gid",
    "status",
    "completedLength",
    "totalLength",
    "downloadSpeed",
    "files",
];

/// The three disjoint queues the daemon buckets downloads into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Queue {
    Active,
    Waiting,
    Stopped,
}

impl Queue {
    /// Whether an item with the given status label belongs to this queue.
    pub fn accepts(&self, status: &str) -> bool {
        match self {
            Queue::Active => status == "active",
            Queue::Waiting => matches!(status, "waiting" | "paused"),
            Queue::Stopped => matches!(status, "complete" | "error" | "removed"),
        }
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Queue::Active => write!(f, "active"),
            Queue::Waiting => write!(f, "waiting"),
            Queue::Stopped => write!(f, "stopped"),
        }
    }
}

/// One URI attached to a file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileUri {
    #[serde(default)]
    pub uri: String,
}

/// A file belonging to a download.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
    /// Local path; empty until the daemon has resolved the file name.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub uris: Vec<FileUri>,
}

impl FileEntry {
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            uris: Vec::new(),
        }
    }
}

/// A read-only snapshot of one download task.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadItem {
    #[serde(rename = "gid", default)]
    pub identifier: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub completed_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub download_speed: Option<u64>,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

impl DownloadItem {
    /// Create an item with just an identifier and status, mostly for tests.
    pub fn new(identifier: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// Set completed and total byte counts.
    pub fn with_progress(mut self, completed: u64, total: u64) -> Self {
        self.completed_length = Some(completed);
        self.total_length = Some(total);
        self
    }

    /// Set the current download speed in bytes per second.
    pub fn with_speed(mut self, speed: u64) -> Self {
        self.download_speed = Some(speed);
        self
    }

    /// Append a file with the given path.
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.files.push(FileEntry::with_path(path));
        self
    }

    /// Status label, or an empty string if the daemon did not report one.
    pub fn status_label(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }
}

/// Accept `"123"`, `123`, `null`, or garbage; only the first two yield a value.
fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_u64(),
        _ => None,
    })
}
