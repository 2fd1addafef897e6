// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Prompt input for the shell.
//!
//! [`InteractiveInput`] wraps a rustyline editor with verb and identifier
//! completion. History lives only for the session; nothing is written to
//! disk. [`SimpleInput`] is the fallback when stdin is not a terminal.

use anyhow::{Context, Result};
use rustyline::history::DefaultHistory;
use rustyline::{ColorMode, CompletionType, Config, EditMode, Editor};
use std::io::{BufRead, Write};

use super::completer::ShellCompleter;

/// Maximum history entries to keep.
const MAX_HISTORY_ENTRIES: usize = 500;

/// Something that yields command lines.
pub trait LineReader {
    /// `Ok(Some(line))` on input, `Ok(None)` on EOF.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive input handler with tab completion and in-memory history.
pub struct InteractiveInput {
    editor: Editor<ShellCompleter, DefaultHistory>,
}

impl InteractiveInput {
    pub fn new(completer: ShellCompleter) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .history_ignore_dups(true)?
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .color_mode(ColorMode::Enabled)
            .auto_add_history(true)
            .max_history_size(MAX_HISTORY_ENTRIES)?
            .build();

        let mut editor = Editor::with_config(config).context("Failed to create input editor")?;
        editor.set_helper(Some(completer));

        Ok(Self { editor })
    }
}

impl LineReader for InteractiveInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            // Ctrl+C abandons the current line only
            Err(rustyline::error::ReadlineError::Interrupted) => Ok(Some(String::new())),
            Err(rustyline::error::ReadlineError::Eof) => Ok(None),
            Err(e) => Err(anyhow::anyhow!("Input error: {}", e)),
        }
    }
}

/// Plain line input for non-interactive stdin.
pub struct SimpleInput<R> {
    reader: R,
}

impl SimpleInput<std::io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self {
            reader: std::io::stdin().lock(),
        }
    }
}

impl<R: BufRead> SimpleInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineReader for SimpleInput<R> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        std::io::stdout().flush()?;

        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(line.trim_end().to_string())),
            Err(e) => Err(anyhow::anyhow!("Input error: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_simple_input_reads_until_eof() {
        let mut input = SimpleInput::new(Cursor::new("ls\r\npause g1\n"));
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("ls"));
        assert_eq!(input.read_line("").unwrap().as_deref(), Some("pause g1"));
        assert_eq!(input.read_line("").unwrap(), None);
    }
}
