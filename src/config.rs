// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Shell configuration.
//!
//! Stored as JSON at `~/.ariash/config.json`. Every field has a default, so a
//! missing file or a partial file is fine. Command-line flags override the
//! file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::rpc::DEFAULT_RPC_URL;

/// Config directory name under the home directory.
const CONFIG_DIR: &str = ".ariash";

/// Config file name.
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON-RPC endpoint of the daemon.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    /// Seconds between refreshes in `watch`.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Keypress polling granularity in `watch`, in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
    /// Per-request timeout for RPC calls.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// tracing level: error, warn, info, debug or trace.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_refresh_interval_secs() -> u64 {
    1
}

fn default_tick_millis() -> u64 {
    50
}

fn default_request_timeout_secs() -> u64 {
    5
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            refresh_interval_secs: default_refresh_interval_secs(),
            tick_millis: default_tick_millis(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis.clamp(1, 1000))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Load from a file, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Write to a file, creating the parent directory.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Default config file location.
pub fn default_config_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
}
