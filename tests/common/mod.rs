// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! In-memory daemon double shared by the integration tests.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use ariash::{DownloadItem, QueueClient, RpcError, RpcResult};

/// Scripted daemon. Records every mutating call as `"op:gid"` (`*` for the
/// all-form) and fails any identifier or URI listed in `failing`.
#[derive(Default)]
pub struct MockDaemon {
    pub active: RefCell<Vec<DownloadItem>>,
    pub waiting: RefCell<Vec<DownloadItem>>,
    pub stopped: RefCell<Vec<DownloadItem>>,
    pub failing: Vec<String>,
    pub unreachable: Cell<bool>,
    pub next_gids: RefCell<VecDeque<String>>,
    pub calls: RefCell<Vec<String>>,
}

impl MockDaemon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active(self, items: Vec<DownloadItem>) -> Self {
        *self.active.borrow_mut() = items;
        self
    }

    pub fn with_waiting(self, items: Vec<DownloadItem>) -> Self {
        *self.waiting.borrow_mut() = items;
        self
    }

    pub fn with_gids(self, gids: &[&str]) -> Self {
        *self.next_gids.borrow_mut() = gids.iter().map(|g| g.to_string()).collect();
        self
    }

    pub fn failing_on(mut self, ids: &[&str]) -> Self {
        self.failing = ids.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn check(&self) -> RpcResult<()> {
        if self.unreachable.get() {
            return Err(RpcError::Unreachable("http://localhost:6800/jsonrpc".to_string()));
        }
        Ok(())
    }

    fn filtered(items: &[DownloadItem], filter: Option<&str>) -> Vec<DownloadItem> {
        items
            .iter()
            .filter(|item| filter.map_or(true, |gid| item.identifier == gid))
            .cloned()
            .collect()
    }

    fn record(&self, op: &str, gid: Option<&str>) -> RpcResult<String> {
        self.check()?;
        let gid = gid.unwrap_or("*");
        self.calls.borrow_mut().push(format!("{}:{}", op, gid));
        if self.failing.iter().any(|f| f == gid) {
            return Err(RpcError::Remote {
                code: 1,
                message: format!("GID {} is not found", gid),
            });
        }
        Ok(if gid == "*" { "OK".to_string() } else { gid.to_string() })
    }
}

impl QueueClient for MockDaemon {
    fn list_active(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        self.check()?;
        Ok(Self::filtered(&self.active.borrow(), filter))
    }

    fn list_waiting(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        self.check()?;
        Ok(Self::filtered(&self.waiting.borrow(), filter))
    }

    fn list_stopped(&self, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        self.check()?;
        Ok(Self::filtered(&self.stopped.borrow(), filter))
    }

    fn add_uri(&self, uri: &str) -> RpcResult<String> {
        self.check()?;
        self.calls.borrow_mut().push(format!("add:{}", uri));
        if self.failing.iter().any(|f| f == uri) {
            return Err(RpcError::Remote {
                code: 1,
                message: "No URI to download.".to_string(),
            });
        }
        self.next_gids
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RpcError::Protocol("no gid scripted".to_string()))
    }

    fn pause(&self, gid: Option<&str>) -> RpcResult<String> {
        self.record("pause", gid)
    }

    fn unpause(&self, gid: Option<&str>) -> RpcResult<String> {
        self.record("unpause", gid)
    }

    fn remove(&self, gid: Option<&str>) -> RpcResult<String> {
        self.record("remove", gid)
    }

    fn purge(&self, gid: Option<&str>) -> RpcResult<String> {
        self.record("purge", gid)
    }

    fn version(&self) -> String {
        if self.unreachable.get() {
            "unknown".to_string()
        } else {
            "1.37.0".to_string()
        }
    }
}

/// Strip color codes so assertions do not depend on the terminal.
pub fn plain(buf: &[u8]) -> String {
    strip_ansi_escapes::strip_str(String::from_utf8_lossy(buf))
}
