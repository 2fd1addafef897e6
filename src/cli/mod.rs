// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Prompt handling for the interactive shell.
//!
//! - **Tab Completion**: verbs at the start of the line, download identifiers
//!   after verbs that take them
//! - **Hints**: the rest of a verb and its description once the prefix is unique
//! - **History**: arrow keys recall earlier lines in the same session

pub mod completer;
pub mod input;

pub use completer::{find_command, show_help, ArgValues, CommandInfo, ShellCompleter, COMMANDS};
pub use input::{InteractiveInput, LineReader, SimpleInput};
