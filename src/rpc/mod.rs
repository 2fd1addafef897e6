// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Remote queue access.
//!
//! [`QueueClient`] is the capability set the shell needs from the daemon. The
//! shell, the dispatcher and the refresh loop only ever talk to this trait, so
//! tests can substitute a scripted client.
//!
//! [`Aria2Client`] is the real implementation over aria2's JSON-RPC interface.

mod aria2;

pub use aria2::{Aria2Client, DEFAULT_RPC_URL};

use crate::types::DownloadItem;

/// Errors from a single remote call.
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The daemon could not be reached at all.
    Unreachable(String),
    /// The request timed out.
    Timeout(String),
    /// Non-success HTTP status from the endpoint.
    Http(u16),
    /// The response was not valid JSON-RPC.
    Protocol(String),
    /// The daemon returned a JSON-RPC error object.
    Remote { code: i64, message: String },
}

impl std::fmt::Display for RpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable(msg) => write!(f, "Cannot reach daemon: {}", msg),
            Self::Timeout(msg) => write!(f, "Request timed out: {}", msg),
            Self::Http(status) => write!(f, "Daemon returned HTTP {}", status),
            Self::Protocol(msg) => write!(f, "Malformed response: {}", msg),
            Self::Remote { code, message } => write!(f, "Daemon error {}: {}", code, message),
        }
    }
}

impl std::error::Error for RpcError {}

pub type RpcResult<T> = std::result::Result<T, RpcError>;

/// Operations the shell issues against the remote download daemon.
///
/// The list operations take an optional identifier filter: with `Some(gid)`
/// the result holds at most that one item, and only if it currently sits in
/// the requested queue.
///
/// The mutating operations take an optional identifier: `None` selects the
/// "apply to all" form. On success they return the affected identifier (or the
/// daemon's acknowledgement for the all-form).
pub trait QueueClient {
    fn list_active(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>>;
    fn list_waiting(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>>;
    fn list_stopped(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>>;

    fn add_uri(&self, uri: &str) -> RpcResult<String>;

    fn pause(&self, gid: Option<&str>) -> RpcResult<String>;
    fn unpause(&self, gid: Option<&str>) -> RpcResult<String>;
    fn remove(&self, gid: Option<&str>) -> RpcResult<String>;
    fn purge(&self, gid: Option<&str>) -> RpcResult<String>;

    /// Daemon version, or `"unknown"` if it cannot be determined.
    fn version(&self) -> String;

    /// Every identifier currently known to the daemon, across all queues.
    ///
    /// Used for tab completion; unreachable queues contribute nothing.
    fn all_identifiers(&self) -> Vec<String> {
        [
            self.list_active(None),
            self.list_waiting(None),
            self.list_stopped(None),
        ]
        .into_iter()
        .flat_map(|res| res.unwrap_or_default())
        .map(|item| item.identifier)
        .collect()
    }
}
