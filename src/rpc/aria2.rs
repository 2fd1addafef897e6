// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! aria2 JSON-RPC client.
//!
//! # Example
//!
//! ```no_run
//! use ariash::rpc::{Aria2Client, QueueClient};
//! use std::time::Duration;
//!
//! let client = Aria2Client::new("http://localhost:6800/jsonrpc", Duration::from_secs(5))?;
//! for item in client.list_active(None)? {
//!     println!("{} {}", item.identifier, item.status_label());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{QueueClient, RpcError, RpcResult};
use crate::types::{DownloadItem, Queue, STATUS_KEYS};

/// Default aria2 RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "http://localhost:6800/jsonrpc";

/// Upper bound on items fetched from the waiting and stopped queues.
const MAX_LISTED: u32 = 1000;

/// Timeout for establishing the TCP connection (in seconds).
const CONNECT_TIMEOUT_SECS: u64 = 3;

/// JSON-RPC request id; the shell never has two calls in flight.
const REQUEST_ID: &str = "ariash";

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: Option<T>,
    error: Option<ErrorObject>,
}

#[derive(Debug, Deserialize)]
struct ErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    version: String,
}

/// Blocking client for an aria2 daemon.
#[derive(Debug, Clone)]
pub struct Aria2Client {
    url: String,
    client: reqwest::blocking::Client,
}

impl Aria2Client {
    /// Create a client for the given endpoint with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// The endpoint this client talks to.
    pub fn url(&self) -> &str {
        &self.url
    }

    fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        debug!(method, "rpc call");

        let body = json!({
            "jsonrpc": "2.0",
            "id": REQUEST_ID,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    RpcError::Timeout(format!("{} after no reply from {}", method, self.url))
                } else if e.is_connect() {
                    RpcError::Unreachable(self.url.clone())
                } else {
                    RpcError::Unreachable(e.to_string())
                }
            })?;

        // aria2 reports JSON-RPC errors with a 4xx status and an error body, so
        // the body is parsed before the status is judged.
        let status = response.status();
        let envelope: Envelope<T> = match response.json() {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(RpcError::Http(status.as_u16())),
            Err(e) => return Err(RpcError::Protocol(e.to_string())),
        };

        if let Some(err) = envelope.error {
            return Err(RpcError::Remote {
                code: err.code,
                message: err.message,
            });
        }

        envelope
            .result
            .ok_or_else(|| RpcError::Protocol(format!("{} returned no result", method)))
    }

    fn tell_status(&self, gid: &str) -> RpcResult<DownloadItem> {
        self.call("aria2.tellStatus", json!([gid, STATUS_KEYS]))
    }

    /// Look a single identifier up and keep it only if it sits in `queue`.
    fn lookup(&self, gid: &str, queue: Queue) -> RpcResult<Vec<DownloadItem>> {
        match self.tell_status(gid) {
            Ok(item) if queue.accepts(item.status_label()) => Ok(vec![item]),
            Ok(item) => {
                debug!(gid, %queue, status = item.status_label(), "identifier in another queue");
                Ok(Vec::new())
            }
            // Unknown GID: the daemon answers with an error object.
            Err(RpcError::Remote { message, .. }) => {
                debug!(gid, %message, "identifier not found");
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    fn mutate(&self, method: &str, all_method: &str, gid: Option<&str>) -> RpcResult<String> {
        match gid {
            Some(gid) => self.call(method, json!([gid])),
            None => self.call(all_method, json!([])),
        }
    }
}

impl QueueClient for Aria2Client {
    fn list_active(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        match filter {
            Some(gid) => self.lookup(gid, Queue::Active),
            None => self.call("aria2.tellActive", json!([STATUS_KEYS])),
        }
    }

    fn list_waiting(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        match filter {
            Some(gid) => self.lookup(gid, Queue::Waiting),
            None => self.call("aria2.tellWaiting", json!([0, MAX_LISTED, STATUS_KEYS])),
        }
    }

    fn list_stopped(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        match filter {
            Some(gid) => self.lookup(gid, Queue::Stopped),
            None => self.call("aria2.tellStopped", json!([0, MAX_LISTED, STATUS_KEYS])),
        }
    }

    fn add_uri(&self, uri: &str) -> RpcResult<String> {
        self.call("aria2.addUri", json!([[uri]]))
    }

    fn pause(&self, gid: Option<&str>) -> RpcResult<String> {
        self.mutate("aria2.pause", "aria2.pauseAll", gid)
    }

    fn unpause(&self, gid: Option<&str>) -> RpcResult<String> {
        self.mutate("aria2.unpause", "aria2.unpauseAll", gid)
    }

    fn remove(&self, gid: Option<&str>) -> RpcResult<String> {
        if let Some(gid) = gid {
            return self.call("aria2.remove", json!([gid]));
        }

        // aria2 has no removeAll; remove every active and waiting item and
        // report the first failure after attempting all of them.
        let mut items = self.list_active(None)?;
        items.extend(self.list_waiting(None)?);

        let mut first_error = None;
        for item in &items {
            if let Err(e) = self.call::<String>("aria2.remove", json!([item.identifier])) {
                warn!(gid = %item.identifier, error = %e, "remove failed");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok("OK".to_string()),
        }
    }

    fn purge(&self, gid: Option<&str>) -> RpcResult<String> {
        match gid {
            Some(gid) => self
                .call::<String>("aria2.removeDownloadResult", json!([gid]))
                .map(|_| gid.to_string()),
            None => self.call("aria2.purgeDownloadResult", json!([])),
        }
    }

    fn version(&self) -> String {
        match self.call::<VersionInfo>("aria2.getVersion", json!([])) {
            Ok(info) => info.version,
            Err(e) => {
                debug!(error = %e, "version lookup failed");
                "unknown".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_with_result() {
        let envelope: Envelope<String> =
            serde_json::from_str(r#"{"id":"ariash","jsonrpc":"2.0","result":"2089b05ecca3d829"}"#)
                .unwrap();
        assert_eq!(envelope.result.as_deref(), Some("2089b05ecca3d829"));
        assert!(envelope.error.is_none());
    }

    #[test]
    fn test_envelope_with_error() {
        let envelope: Envelope<String> = serde_json::from_str(
            r#"{"id":"ariash","jsonrpc":"2.0","error":{"code":1,"message":"GID 1 is not found"}}"#,
        )
        .unwrap();
        assert!(envelope.result.is_none());
        let err = envelope.error.unwrap();
        assert_eq!(err.code, 1);
        assert_eq!(err.message, "GID 1 is not found");
    }

    #[test]
    fn test_unreachable_daemon_is_transport_error() {
        // Port 9 (discard) is essentially never running an RPC server locally.
        let client = Aria2Client::new("http://127.0.0.1:9/jsonrpc", Duration::from_millis(500)).unwrap();
        assert_eq!(client.url(), "http://127.0.0.1:9/jsonrpc");
        let result = client.list_active(None);
        assert!(matches!(
            result,
            Err(RpcError::Unreachable(_)) | Err(RpcError::Timeout(_))
        ));
        assert_eq!(client.version(), "unknown");
    }
}
