// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The interactive shell: parses verbs and runs them against the daemon.
//!
//! [`Shell`] is the session object. It is built once at startup with the
//! client and configuration and is the only owner of both; the completer gets
//! a shared handle to the same client.

use anyhow::{Context, Result};
use colored::Colorize;
use crossterm::{
    cursor,
    terminal::{Clear, ClearType},
    QueueableCommand,
};
use std::io::Write;
use std::rc::Rc;
use tracing::debug;

use crate::cli::{find_command, show_help, LineReader};
use crate::colors::symbols;
use crate::config::Config;
use crate::dispatch::{Dispatcher, ListView, Verb};
use crate::rpc::QueueClient;
use crate::watch::{watch_terminal, StopReason};

/// Prompt shown before each command.
pub const PROMPT: &str = "aria> ";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Watch,
    Clear,
    Version,
    List(ListView, Vec<String>),
    Add(Vec<String>),
    Mutate(Verb, Vec<String>),
    Help,
    Exit,
    /// Blank line.
    Empty,
    Unknown(String),
}

/// Parse one input line.
pub fn parse_line(line: &str) -> Command {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Command::Empty;
    };
    let args: Vec<String> = parts.map(str::to_string).collect();

    let Some(info) = find_command(word) else {
        return Command::Unknown(word.to_string());
    };

    match info.name {
        "watch" => Command::Watch,
        "clear" => Command::Clear,
        "version" => Command::Version,
        "ls" => Command::List(ListView::All, args),
        "started" => Command::List(ListView::Active, args),
        "paused" => Command::List(ListView::Waiting, args),
        "stopped" => Command::List(ListView::Stopped, args),
        "add" => Command::Add(args),
        "pause" => Command::Mutate(Verb::Pause, args),
        "unpause" => Command::Mutate(Verb::Unpause, args),
        "remove" => Command::Mutate(Verb::Remove, args),
        "purge" => Command::Mutate(Verb::Purge, args),
        "help" => Command::Help,
        "exit" => Command::Exit,
        other => Command::Unknown(other.to_string()),
    }
}

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Interactive shell session.
pub struct Shell {
    client: Rc<dyn QueueClient>,
    config: Config,
}

impl Shell {
    pub fn new(client: Rc<dyn QueueClient>, config: Config) -> Self {
        Self { client, config }
    }

    /// Shared handle to the client, for the completer.
    pub fn client(&self) -> Rc<dyn QueueClient> {
        Rc::clone(&self.client)
    }

    /// Run one command, writing its output to `out`.
    pub fn execute(&self, command: &Command, out: &mut dyn Write) -> Result<Flow> {
        let dispatcher = Dispatcher::new(self.client.as_ref());

        match command {
            Command::Empty => {}
            Command::Exit => return Ok(Flow::Exit),
            Command::Help => show_help(out)?,
            Command::Clear => {
                out.queue(Clear(ClearType::All))?.queue(cursor::MoveTo(0, 0))?;
            }
            Command::Version => dispatcher.version(out)?,
            Command::List(view, filters) => {
                dispatcher.list(*view, filters, out)?;
            }
            Command::Add(uris) => {
                if uris.is_empty() {
                    writeln!(out, "{} Usage: add <uri...>", symbols::WARNING.yellow())?;
                } else {
                    dispatcher.add(uris, out)?;
                }
            }
            Command::Mutate(verb, ids) => {
                dispatcher.mutate(*verb, ids, out)?;
            }
            Command::Watch => {
                out.flush()?;
                let report = watch_terminal(
                    self.client.as_ref(),
                    self.config.refresh_interval(),
                    self.config.tick(),
                )?;
                if report.reason == StopReason::Empty {
                    writeln!(out, "{} No active or waiting downloads.", symbols::INFO.bright_blue())?;
                }
            }
            Command::Unknown(word) => {
                writeln!(
                    out,
                    "{} Unknown command '{}'. Type 'help' for commands.",
                    symbols::WARNING.yellow(),
                    word
                )?;
            }
        }

        out.flush()?;
        Ok(Flow::Continue)
    }

    /// Read and execute lines until `exit` or EOF.
    ///
    /// A failing command prints one error line; the shell keeps running.
    pub fn run(&self, input: &mut dyn LineReader, out: &mut dyn Write) -> Result<()> {
        while let Some(line) = input.read_line(PROMPT)? {
            let command = parse_line(&line);
            debug!(?command, "execute");

            match self.execute(&command, out) {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    writeln!(out, "{} {:#}", symbols::ERROR.red(), e).context("Failed to write output")?;
                }
            }
        }
        Ok(())
    }
}
