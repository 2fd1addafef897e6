// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turning download records into display rows.
//!
//! Formatting never fails: any field the daemon did not report degrades to the
//! `--` placeholder.

use byte_unit::{Byte, UnitType};

use crate::types::DownloadItem;

/// Placeholder for unknown or idle values.
pub const PLACEHOLDER: &str = "--";

/// One rendered table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub gid: String,
    pub file: String,
    pub status: String,
    pub completed: String,
    pub size: String,
    pub percent: u8,
    pub speed: String,
}

impl DisplayRow {
    /// The PROGRESS column, e.g. `1.5 MiB/3.0 MiB 50%`.
    pub fn progress(&self) -> String {
        format!("{}/{} {:02}%", self.completed, self.size, self.percent)
    }

    /// Cells in column order: GID, FILE, STATUS, PROGRESS, SPEED.
    pub fn cells(&self) -> [String; 5] {
        [
            self.gid.clone(),
            self.file.clone(),
            self.status.clone(),
            self.progress(),
            self.speed.clone(),
        ]
    }
}

/// Format a byte count with binary units (`512 B`, `1.5 KiB`, ...).
pub fn human_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let adjusted = Byte::from_u64(bytes).get_appropriate_unit(UnitType::Binary);
    format!("{:.1}", adjusted)
}

/// Format a transfer rate, e.g. `1.5 KiB/s`.
pub fn human_rate(bytes_per_sec: u64) -> String {
    format!("{}/s", human_bytes(bytes_per_sec))
}

/// Completion percentage in `[0, 100]`; zero when the total is unknown.
pub fn percent(completed: Option<u64>, total: Option<u64>) -> u8 {
    match (completed, total) {
        (Some(done), Some(total)) if total > 0 => {
            let pct = (done as u128 * 100) / total as u128;
            pct.min(100) as u8
        }
        _ => 0,
    }
}

/// Last path segment of the first file, falling back to its first URI.
fn display_name(item: &DownloadItem) -> String {
    let Some(first) = item.files.first() else {
        return PLACEHOLDER.to_string();
    };

    let source = if first.path.is_empty() {
        first.uris.first().map(|u| u.uri.as_str()).unwrap_or("")
    } else {
        first.path.as_str()
    };

    match source.trim_end_matches('/').rsplit('/').next() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Build the display row for one item.
pub fn format_item(item: &DownloadItem) -> DisplayRow {
    let completed = item
        .completed_length
        .map(human_bytes)
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let size = match item.total_length {
        Some(total) if total > 0 => human_bytes(total),
        _ => PLACEHOLDER.to_string(),
    };

    let speed = match item.download_speed {
        Some(speed) if speed > 0 => human_rate(speed),
        _ => PLACEHOLDER.to_string(),
    };

    let status = match item.status_label() {
        "" => PLACEHOLDER.to_string(),
        label => label.to_string(),
    };

    DisplayRow {
        gid: item.identifier.clone(),
        file: display_name(item),
        status,
        completed,
        size,
        percent: percent(item.completed_length, item.total_length),
        speed,
    }
}
