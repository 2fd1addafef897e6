// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Tab completion and hints for shell verbs and download identifiers.
//!
//! ## Example UX
//!
//! ```text
//! aria> pa<Tab>
//!   paused [gid...] - List waiting and paused downloads
//!   pause [gid...]  - Pause downloads (all when no gid is given)
//!
//! aria> pause 2089<Tab>
//! aria> pause 2089b05ecca3d829
//! ```
//!
//! Identifier completion asks the daemon for every GID in the active, waiting
//! and stopped queues at the moment Tab is pressed and prefix-matches them
//! case-insensitively.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::{Hint, Hinter};
use rustyline::validate::Validator;
use rustyline::{Context, Helper, Result};
use std::borrow::Cow;
use std::io::{self, Write};
use std::rc::Rc;

use crate::colors::{BOLD, CYAN, GRAY, RED, RESET, YELLOW};
use crate::rpc::QueueClient;

/// What a verb accepts after its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgValues {
    /// No arguments
    None,
    /// Download identifiers, completed from the daemon
    Identifiers,
    /// Free-form URIs, not completed
    Uris,
}

/// Information about a shell verb.
#[derive(Debug, Clone)]
pub struct CommandInfo {
    /// Primary verb name (e.g., "pause")
    pub name: &'static str,
    /// Alternative aliases (e.g., ["q", "quit"])
    pub aliases: &'static [&'static str],
    /// Short description shown in completion and help
    pub description: &'static str,
    /// Arguments this verb accepts (for display)
    pub args: Option<&'static str>,
    pub arg_values: ArgValues,
}

impl CommandInfo {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            aliases: &[],
            description,
            args: None,
            arg_values: ArgValues::None,
        }
    }

    pub const fn with_aliases(
        name: &'static str,
        aliases: &'static [&'static str],
        description: &'static str,
    ) -> Self {
        Self {
            name,
            aliases,
            description,
            args: None,
            arg_values: ArgValues::None,
        }
    }

    /// Verb takes zero or more download identifiers.
    pub const fn with_identifiers(mut self) -> Self {
        self.args = Some("[gid...]");
        self.arg_values = ArgValues::Identifiers;
        self
    }

    /// Verb takes one or more URIs.
    pub const fn with_uris(mut self) -> Self {
        self.args = Some("<uri...>");
        self.arg_values = ArgValues::Uris;
        self
    }

    /// Check if this verb matches a partial input.
    pub fn matches(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name.starts_with(&input_lower) || self.aliases.iter().any(|a| a.starts_with(&input_lower))
    }

    /// Check if this verb exactly matches an input.
    pub fn exact_match(&self, input: &str) -> bool {
        let input_lower = input.to_lowercase();
        self.name == input_lower || self.aliases.iter().any(|a| *a == input_lower)
    }

    /// Get display string for completion menu.
    pub fn display_string(&self) -> String {
        if let Some(args) = self.args {
            format!("{} {} - {}", self.name, args, self.description)
        } else {
            format!("{} - {}", self.name, self.description)
        }
    }
}

/// All verbs understood by the shell.
pub static COMMANDS: &[CommandInfo] = &[
    CommandInfo::new("watch", "Live view of active and waiting downloads, any key stops"),
    CommandInfo::new("clear", "Clear the screen"),
    CommandInfo::new("version", "Show the aria2 version"),
    CommandInfo::new("ls", "List active and waiting downloads").with_identifiers(),
    CommandInfo::new("started", "List active downloads").with_identifiers(),
    CommandInfo::new("paused", "List waiting and paused downloads").with_identifiers(),
    CommandInfo::new("stopped", "List completed, failed and removed downloads").with_identifiers(),
    CommandInfo::new("add", "Queue one or more URIs").with_uris(),
    CommandInfo::new("pause", "Pause downloads (all when no gid is given)").with_identifiers(),
    CommandInfo::new("unpause", "Resume downloads (all when no gid is given)").with_identifiers(),
    CommandInfo::new("remove", "Remove downloads (all active and waiting when no gid is given)")
        .with_identifiers(),
    CommandInfo::new("purge", "Forget finished downloads (all when no gid is given)").with_identifiers(),
    CommandInfo::with_aliases("help", &["h", "?"], "Show all commands"),
    CommandInfo::with_aliases("exit", &["quit", "q"], "Leave the shell"),
];

/// Look a verb or alias up.
pub fn find_command(input: &str) -> Option<&'static CommandInfo> {
    COMMANDS.iter().find(|c| c.exact_match(input))
}

/// Completer for the shell prompt.
pub struct ShellCompleter {
    client: Option<Rc<dyn QueueClient>>,
}

impl ShellCompleter {
    /// Create a completer that queries `client` for identifiers.
    pub fn new(client: Rc<dyn QueueClient>) -> Self {
        Self { client: Some(client) }
    }

    /// Create a completer that only completes verbs.
    pub fn verbs_only() -> Self {
        Self { client: None }
    }

    /// Start of the word under the cursor, and the word itself.
    fn current_word(line: &str, pos: usize) -> (usize, &str) {
        let input = &line[..pos];
        let start = input
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map_or(0, |(i, c)| i + c.len_utf8());
        (start, &input[start..])
    }

    /// Get completions for a partial input.
    pub(crate) fn get_completions(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let (start, word) = Self::current_word(line, pos);
        let before = line[..start].trim();

        if before.is_empty() {
            return (start, self.complete_command(word));
        }

        let verb = before.split_whitespace().next().unwrap_or("");
        match find_command(verb) {
            Some(cmd) if cmd.arg_values == ArgValues::Identifiers => (start, self.complete_identifiers(word)),
            _ => (start, Vec::new()),
        }
    }

    /// Complete verb names.
    fn complete_command(&self, input: &str) -> Vec<Pair> {
        let input_lower = input.to_lowercase();
        COMMANDS
            .iter()
            .filter(|cmd| cmd.name.starts_with(&input_lower))
            .map(|cmd| Pair {
                display: cmd.display_string(),
                replacement: format!("{} ", cmd.name),
            })
            .collect()
    }

    /// Complete identifiers known to the daemon.
    fn complete_identifiers(&self, prefix: &str) -> Vec<Pair> {
        let Some(client) = &self.client else {
            return Vec::new();
        };

        let prefix_lower = prefix.to_lowercase();
        client
            .all_identifiers()
            .into_iter()
            .filter(|gid| gid.to_lowercase().starts_with(&prefix_lower))
            .map(|gid| Pair {
                display: gid.clone(),
                replacement: format!("{} ", gid),
            })
            .collect()
    }

    /// Get a hint for the current input (shown in dim text).
    fn get_hint(&self, line: &str) -> Option<CommandHint> {
        if line.is_empty() || line.contains(char::is_whitespace) {
            return None;
        }

        let typed = line.to_lowercase();
        let matches: Vec<_> = COMMANDS.iter().filter(|cmd| cmd.name.starts_with(&typed)).collect();
        if matches.len() != 1 {
            return None;
        }

        let cmd = matches[0];
        let remaining = &cmd.name[typed.len()..];
        let hint = match cmd.args {
            Some(args) => format!("{} {} - {}", remaining, args, cmd.description),
            None => format!("{} - {}", remaining, cmd.description),
        };
        Some(CommandHint {
            display: hint,
            completion: remaining.to_string(),
        })
    }
}

/// A hint displayed after the cursor in dim text.
#[derive(Debug, Clone)]
pub struct CommandHint {
    display: String,
    completion: String,
}

impl Hint for CommandHint {
    fn display(&self) -> &str {
        &self.display
    }

    fn completion(&self) -> Option<&str> {
        Some(&self.completion)
    }
}

impl Completer for ShellCompleter {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Result<(usize, Vec<Pair>)> {
        Ok(self.get_completions(line, pos))
    }
}

impl Hinter for ShellCompleter {
    type Hint = CommandHint;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<Self::Hint> {
        // Only show hint if cursor is at end of line
        if pos < line.len() {
            return None;
        }
        self.get_hint(line)
    }
}

impl Highlighter for ShellCompleter {
    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Cow::Owned(format!("{GRAY}{}{RESET}", hint))
    }

    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        let (verb, rest) = match line.split_once(' ') {
            Some((verb, rest)) => (verb, Some(rest)),
            None => (line, None),
        };
        if verb.is_empty() {
            return Cow::Borrowed(line);
        }

        let color = if find_command(verb).is_some() {
            CYAN
        } else if COMMANDS.iter().any(|c| c.matches(verb)) {
            YELLOW
        } else {
            RED
        };

        match rest {
            Some(rest) => Cow::Owned(format!("{color}{verb}{RESET} {rest}")),
            None => Cow::Owned(format!("{color}{verb}{RESET}")),
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Validator for ShellCompleter {}

impl Helper for ShellCompleter {}

/// Write the list of available verbs (for `help`).
pub fn show_help(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\n{BOLD}Available commands:{RESET}\n")?;
    for cmd in COMMANDS {
        let aliases = if cmd.aliases.is_empty() {
            String::new()
        } else {
            format!(" (aliases: {})", cmd.aliases.join(", "))
        };
        let args = cmd.args.map_or(String::new(), |a| format!(" {}", a));
        writeln!(out, "  {CYAN}{}{}{RESET}{} - {}", cmd.name, args, aliases, cmd.description)?;
    }
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{RpcError, RpcResult};
    use crate::types::DownloadItem;

    struct GidClient;

    impl QueueClient for GidClient {
        fn list_active(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Ok(vec![DownloadItem::new("2089B05ECCA3D829", "active")])
        }
        fn list_waiting(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Err(RpcError::Timeout("tellWaiting".into()))
        }
        fn list_stopped(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Ok(vec![
                DownloadItem::new("20ff000000000001", "complete"),
                DownloadItem::new("d270c8a2c3ab0de1", "error"),
            ])
        }
        fn add_uri(&self, _: &str) -> RpcResult<String> {
            unreachable!()
        }
        fn pause(&self, _: Option<&str>) -> RpcResult<String> {
            unreachable!()
        }
        fn unpause(&self, _: Option<&str>) -> RpcResult<String> {
            unreachable!()
        }
        fn remove(&self, _: Option<&str>) -> RpcResult<String> {
            unreachable!()
        }
        fn purge(&self, _: Option<&str>) -> RpcResult<String> {
            unreachable!()
        }
        fn version(&self) -> String {
            "1.37.0".into()
        }
    }

    fn replacements(pairs: &[Pair]) -> Vec<&str> {
        pairs.iter().map(|p| p.replacement.as_str()).collect()
    }

    #[test]
    fn test_command_matching() {
        let help = find_command("help").unwrap();
        assert!(help.matches("he"));
        assert!(help.matches("?"));
        assert!(!help.matches("pause"));
        assert_eq!(find_command("Q").unwrap().name, "exit");
        assert!(find_command("frobnicate").is_none());
    }

    #[test]
    fn test_complete_verbs() {
        let completer = ShellCompleter::verbs_only();
        let (start, pairs) = completer.get_completions("pa", 2);
        assert_eq!(start, 0);
        assert_eq!(replacements(&pairs), vec!["paused ", "pause "]);
    }

    #[test]
    fn test_complete_identifiers_case_insensitive() {
        let completer = ShellCompleter::new(Rc::new(GidClient));
        let line = "pause 20";
        let (start, pairs) = completer.get_completions(line, line.len());
        assert_eq!(start, 6);
        assert_eq!(replacements(&pairs), vec!["2089B05ECCA3D829 ", "20ff000000000001 "]);

        let line = "remove x 2089b";
        let (start, pairs) = completer.get_completions(line, line.len());
        assert_eq!(start, 9);
        assert_eq!(replacements(&pairs), vec!["2089B05ECCA3D829 "]);
    }

    #[test]
    fn test_complete_after_wide_space() {
        let completer = ShellCompleter::new(Rc::new(GidClient));
        let line = "pause\u{3000}20";
        let (start, pairs) = completer.get_completions(line, line.len());
        assert_eq!(start, "pause\u{3000}".len());
        assert_eq!(replacements(&pairs), vec!["2089B05ECCA3D829 ", "20ff000000000001 "]);

        let (start, pairs) = completer.get_completions("\u{3000}pa", "\u{3000}pa".len());
        assert_eq!(start, 3);
        assert_eq!(replacements(&pairs), vec!["paused ", "pause "]);
    }

    #[test]
    fn test_no_identifier_completion_for_add() {
        let completer = ShellCompleter::new(Rc::new(GidClient));
        let line = "add 20";
        let (_, pairs) = completer.get_completions(line, line.len());
        assert!(pairs.is_empty());
    }

    #[test]
    fn test_help_lists_every_verb() {
        let mut out = Vec::new();
        show_help(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        for cmd in COMMANDS {
            assert!(text.contains(cmd.name));
        }
    }

    #[test]
    fn test_hint_for_unique_verb() {
        let completer = ShellCompleter::verbs_only();
        let hint = completer.get_hint("wat").unwrap();
        assert_eq!(hint.completion, "ch");
        assert!(hint.display.starts_with("ch - "));
        assert!(completer.get_hint("p").is_none());
        assert!(completer.get_hint("pause ").is_none());
    }
}
