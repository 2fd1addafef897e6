// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};
use tracing_subscriber::filter::LevelFilter;

use ariash::cli::{InteractiveInput, LineReader, ShellCompleter, SimpleInput};
use ariash::colors::{separator, symbols};
use ariash::config::{default_config_path, Config};
use ariash::error::unreachable_daemon;
use ariash::rpc::{Aria2Client, QueueClient};
use ariash::Shell;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Interactive shell for an aria2 download daemon.
#[derive(Parser, Debug)]
#[command(name = "ariash", version, about)]
struct Cli {
    /// JSON-RPC endpoint of the daemon
    #[arg(short, long)]
    url: Option<String>,

    /// Seconds between refreshes in `watch`
    #[arg(short, long)]
    interval: Option<u64>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Config file (defaults to ~/.ariash/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level for diagnostics on stderr (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Command-line flags win over the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.url {
            config.rpc_url = url.clone();
        }
        if let Some(interval) = self.interval {
            config.refresh_interval_secs = interval;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = timeout;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::WARN);
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn print_banner(url: &str, version: &str) {
    println!("{} v{} | aria2 {} at {}", "ariash".bright_cyan().bold(), VERSION, version, url);
    println!("{}", separator(60));
    println!(
        "{} Type {} for commands, Tab for completion, {} to quit\n",
        symbols::INFO.bright_blue(),
        "help".bright_cyan(),
        "exit".bright_cyan()
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };
    let mut config = Config::load_from(&config_path)?;
    cli.apply(&mut config);

    init_logging(&config.log_level);
    debug!(?config, path = %config_path.display(), "configuration loaded");

    if cli.save_config {
        config.save_to(&config_path)?;
        println!("{} Saved configuration to {}", symbols::SUCCESS.green(), config_path.display());
        return Ok(());
    }

    let aria2 = Aria2Client::new(&config.rpc_url, config.request_timeout())?;
    debug!(url = aria2.url(), "rpc client ready");
    let client: Rc<dyn QueueClient> = Rc::new(aria2);

    // Probe once so a missing daemon is explained up front; the shell still
    // starts and every command reports its own failure.
    if let Err(e) = client.list_active(None) {
        warn!(error = %e, "daemon probe failed");
        eprintln!("{}\n", unreachable_daemon(&config.rpc_url, &e).red());
    }

    print_banner(&config.rpc_url, &client.version());

    let shell = Shell::new(Rc::clone(&client), config);
    let mut stdout = io::stdout();

    let mut input: Box<dyn LineReader> = if io::stdin().is_terminal() {
        Box::new(
            InteractiveInput::new(ShellCompleter::new(shell.client()))
                .context("Failed to initialize interactive input")?,
        )
    } else {
        Box::new(SimpleInput::stdin())
    };

    shell.run(input.as_mut(), &mut stdout)
}
