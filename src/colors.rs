// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Unified ANSI color code definitions
//!
//! Single source of truth for the styling used by the shell.
//!
//! Color usage conventions:
//! - RED = Errors/failures
//! - GREEN = Active downloads, confirmations
//! - YELLOW = Paused or waiting downloads
//! - CYAN = Info messages, prompts, table headers
//! - GRAY = Stopped downloads, hints, secondary text

use colored::{ColoredString, Colorize};

/// Reset all formatting
pub const RESET: &str = "\x1b[0m";

/// Bold text
pub const BOLD: &str = "\x1b[1m";

/// Dimmed/faint text
pub const DIM: &str = "\x1b[2m";

/// Red text (errors, failures)
pub const RED: &str = "\x1b[31m";

/// Yellow text (warnings, paused items)
pub const YELLOW: &str = "\x1b[33m";

/// Cyan text (info messages, prompts)
pub const CYAN: &str = "\x1b[36m";

/// Bright black (gray) for subtle secondary text
pub const GRAY: &str = "\x1b[90m";

/// Box drawing characters for the download table
pub mod box_chars {
    pub const HORIZONTAL: char = '─';
    pub const VERTICAL: char = '│';
    pub const TOP_LEFT: char = '┌';
    pub const TOP_RIGHT: char = '┐';
    pub const BOTTOM_LEFT: char = '└';
    pub const BOTTOM_RIGHT: char = '┘';
    pub const T_DOWN: char = '┬';
    pub const T_UP: char = '┴';
    pub const T_RIGHT: char = '├';
    pub const T_LEFT: char = '┤';
    pub const CROSS: char = '┼';
}

/// Symbols for status and feedback (Unicode only, no emoji)
pub mod symbols {
    pub const SUCCESS: &str = "[OK]";
    pub const ERROR: &str = "[X]";
    pub const WARNING: &str = "[!]";
    pub const INFO: &str = "[i]";
}

/// Color a status label by the queue it implies.
pub fn status_colored(status: &str) -> ColoredString {
    match status {
        "active" => status.green(),
        "waiting" | "paused" => status.yellow(),
        "error" => status.red(),
        "complete" => status.cyan(),
        _ => status.bright_black(),
    }
}

/// Render a separator line
pub fn separator(width: usize) -> String {
    format!("{}{}{}", DIM, box_chars::HORIZONTAL.to_string().repeat(width), RESET)
}
