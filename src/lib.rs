// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! ariash - interactive shell for an aria2 download daemon
//!
//! Talks to aria2 over JSON-RPC, lists its queues as a table, queues and
//! mutates downloads, and offers a live `watch` view that refreshes until a
//! key is pressed or nothing is left to download.
//!
//! # Core Modules
//!
//! - [`rpc`] - The [`QueueClient`] capability set and the aria2 client
//! - [`types`] - Download records and queues
//! - [`format`] - Record to display row conversion
//! - [`aggregate`] - Queue merging
//! - [`table`] - Bordered table rendering
//! - [`dispatch`] - Listing, add and mutation commands
//! - [`watch`] - The live refresh loop
//! - [`shell`] - Verb parsing and the read-execute loop
//! - [`cli`] - Line editing and completion
//! - [`config`] - Configuration file handling
//! - [`error`] - Actionable error formatting

pub mod aggregate;
pub mod cli;
pub mod colors;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod format;
pub mod rpc;
pub mod shell;
pub mod table;
pub mod types;
pub mod watch;

pub use config::Config;
pub use dispatch::{Dispatcher, ListOutcome, ListView, Verb};
pub use format::{format_item, DisplayRow};
pub use rpc::{Aria2Client, QueueClient, RpcError, RpcResult};
pub use shell::{parse_line, Command, Shell};
pub use types::{DownloadItem, FileEntry, Queue};
pub use watch::{Clock, KeySource, RefreshLoop, RefreshState, Screen, StopReason, WatchReport};
