// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Multi-line startup diagnostics.
//!
//! Shell commands report failures as a single `[X]` line. Problems found at
//! startup get a longer message listing likely causes and next steps:
//!
//! ```text
//! [X] Cannot talk to aria2 at http://localhost:6800/jsonrpc
//!
//! Likely causes:
//!   * daemon unreachable at http://localhost:6800/jsonrpc
//!   * aria2c is not running, or was started without --enable-rpc
//!
//! Next steps:
//!   1. Start the daemon: aria2c --enable-rpc
//! ```

use std::fmt::Write;

use crate::colors::symbols;
use crate::rpc::{RpcError, DEFAULT_RPC_URL};

/// Collects a headline, its likely causes and the steps that fix it.
#[derive(Debug, Clone, Default)]
pub struct ErrorBuilder {
    headline: String,
    causes: Vec<String>,
    steps: Vec<String>,
}

impl ErrorBuilder {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Self::default()
        }
    }

    pub fn cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    pub fn fix(mut self, step: impl Into<String>) -> Self {
        self.steps.push(step.into());
        self
    }

    /// Render the message. Empty sections are omitted.
    pub fn build(&self) -> String {
        let mut out = format!("{} {}\n", symbols::ERROR, self.headline);

        if !self.causes.is_empty() {
            out.push_str("\nLikely causes:\n");
            for cause in &self.causes {
                let _ = writeln!(out, "  * {}", cause);
            }
        }

        if !self.steps.is_empty() {
            out.push_str("\nNext steps:\n");
            for (n, step) in self.steps.iter().enumerate() {
                let _ = writeln!(out, "  {}. {}", n + 1, step);
            }
        }

        out
    }
}

/// Startup message when the daemon does not answer.
pub fn unreachable_daemon(url: &str, err: &RpcError) -> String {
    let builder = ErrorBuilder::new(format!("Cannot talk to aria2 at {}", url)).cause(err.to_string());

    let builder = match err {
        RpcError::Unreachable(_) | RpcError::Timeout(_) => builder
            .cause("aria2c is not running, or was started without --enable-rpc")
            .cause("The daemon listens on a different host or port"),
        RpcError::Http(_) | RpcError::Protocol(_) => {
            builder.cause("The URL does not point at a JSON-RPC endpoint (it usually ends in /jsonrpc)")
        }
        RpcError::Remote { .. } => builder.cause("The daemon rejected the request (an RPC secret may be required)"),
    };

    builder
        .fix("Start the daemon: aria2c --enable-rpc")
        .fix(format!("Point the shell at it: ariash --url {}", DEFAULT_RPC_URL))
        .build()
}
