// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Bordered table rendering for download listings.
//!
//! ```text
//! ┌──────────────────┬────────────┬────────┬─────────────────────┬───────────┐
//! │ GID              │ FILE       │ STATUS │ PROGRESS            │ SPEED     │
//! ├──────────────────┼────────────┼────────┼─────────────────────┼───────────┤
//! │ 2089b05ecca3d829 │ ubuntu.iso │ active │ 1.2 GiB/4.0 GiB 30% │ 5.1 MiB/s │
//! └──────────────────┴────────────┴────────┴─────────────────────┴───────────┘
//! ```

use unicode_width::UnicodeWidthStr;

use crate::colors::{box_chars, status_colored};
use crate::format::DisplayRow;

/// Column headers, in display order.
pub const HEADERS: [&str; 5] = ["GID", "FILE", "STATUS", "PROGRESS", "SPEED"];

/// Index of the STATUS column.
const STATUS_COLUMN: usize = 2;

/// Display width of a cell, ignoring ANSI color codes.
fn display_width(s: &str) -> usize {
    strip_ansi_escapes::strip_str(s).width()
}

fn border(widths: &[usize], left: char, mid: char, right: char) -> String {
    let mut line = String::new();
    line.push(left);
    for (i, width) in widths.iter().enumerate() {
        if i > 0 {
            line.push(mid);
        }
        line.push_str(&box_chars::HORIZONTAL.to_string().repeat(width + 2));
    }
    line.push(right);
    line
}

fn row_line<S: AsRef<str>>(cells: &[S], widths: &[usize]) -> String {
    let mut line = String::new();
    line.push(box_chars::VERTICAL);
    for (cell, width) in cells.iter().zip(widths) {
        let cell = cell.as_ref();
        let pad = width.saturating_sub(display_width(cell));
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push(box_chars::VERTICAL);
    }
    line
}

/// Render rows as a bordered table, one line per `\n`.
///
/// An empty slice still renders the header so callers decide whether to show
/// anything at all.
pub fn render_table(rows: &[DisplayRow]) -> String {
    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|row| {
            let mut cells = row.cells();
            cells[STATUS_COLUMN] = status_colored(&row.status).to_string();
            cells
        })
        .collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.width()).collect();
    for cells in &body {
        for (width, cell) in widths.iter_mut().zip(cells.iter()) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut out = String::new();
    out.push_str(&border(&widths, box_chars::TOP_LEFT, box_chars::T_DOWN, box_chars::TOP_RIGHT));
    out.push('\n');
    out.push_str(&row_line(&HEADERS, &widths));
    out.push('\n');
    out.push_str(&border(&widths, box_chars::T_RIGHT, box_chars::CROSS, box_chars::T_LEFT));
    out.push('\n');
    for cells in &body {
        out.push_str(&row_line(cells, &widths));
        out.push('\n');
    }
    out.push_str(&border(&widths, box_chars::BOTTOM_LEFT, box_chars::T_UP, box_chars::BOTTOM_RIGHT));
    out.push('\n');
    out
}
