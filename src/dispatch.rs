// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Command handlers: listings, adds and per-identifier mutations.
//!
//! Every handler writes its user-visible output to the supplied writer and
//! never returns an error for a remote failure. Remote failures become either
//! a single error line (listings, all-forms) or a skipped item (batches).
//! The only error that escapes is a failure to write the output itself.

use colored::Colorize;
use std::io::{self, Write};
use tracing::{debug, warn};

use crate::aggregate::merge;
use crate::colors::symbols;
use crate::format::format_item;
use crate::rpc::{QueueClient, RpcError, RpcResult};
use crate::table::render_table;
use crate::types::DownloadItem;

/// Which queues a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListView {
    /// Active followed by waiting (`ls`).
    All,
    /// Active only (`started`).
    Active,
    /// Waiting and paused (`paused`).
    Waiting,
    /// Completed, failed and removed (`stopped`).
    Stopped,
}

/// Mutating verbs that accept zero or more identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Pause,
    Unpause,
    Remove,
    Purge,
}

impl Verb {
    /// Confirmation label printed before each affected identifier.
    pub fn confirmation(&self) -> &'static str {
        match self {
            Verb::Pause => "PAUSED",
            Verb::Unpause => "UNPAUSED",
            Verb::Remove => "REMOVED",
            Verb::Purge => "PURGED",
        }
    }

    fn apply(&self, client: &dyn QueueClient, gid: Option<&str>) -> RpcResult<String> {
        match self {
            Verb::Pause => client.pause(gid),
            Verb::Unpause => client.unpause(gid),
            Verb::Remove => client.remove(gid),
            Verb::Purge => client.purge(gid),
        }
    }
}

/// Result of a listing command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOutcome {
    /// The listing succeeded and rendered this many rows (possibly zero).
    Rows(usize),
    /// The daemon could not be queried; an error line was printed.
    Failed,
}

impl ListOutcome {
    /// Rows rendered; a failed listing rendered none.
    pub fn rows(&self) -> usize {
        match self {
            ListOutcome::Rows(n) => *n,
            ListOutcome::Failed => 0,
        }
    }
}

/// Per-identifier (or per-URI) outcome of a batch command.
pub type Outcome = (String, RpcResult<String>);

/// Dispatches commands against a [`QueueClient`].
pub struct Dispatcher<'a> {
    client: &'a dyn QueueClient,
}

impl<'a> Dispatcher<'a> {
    pub fn new(client: &'a dyn QueueClient) -> Self {
        Self { client }
    }

    /// Fetch the items a view shows, optionally narrowed to some identifiers.
    ///
    /// With identifiers, each is looked up in the view's queue(s) and results
    /// are concatenated in argument order.
    pub fn fetch(&self, view: ListView, filters: &[String]) -> RpcResult<Vec<DownloadItem>> {
        if filters.is_empty() {
            return self.fetch_one(view, None);
        }

        let mut items = Vec::new();
        for gid in filters {
            items.extend(self.fetch_one(view, Some(gid))?);
        }
        Ok(items)
    }

    fn fetch_one(&self, view: ListView, filter: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
        match view {
            ListView::All => {
                let active = self.client.list_active(filter)?;
                let waiting = self.client.list_waiting(filter)?;
                Ok(merge(active, Some(waiting)))
            }
            ListView::Active => self.client.list_active(filter),
            ListView::Waiting => self.client.list_waiting(filter),
            ListView::Stopped => self.client.list_stopped(filter),
        }
    }

    /// Render a listing as a table.
    ///
    /// Nothing is printed for an empty result.
    pub fn list(&self, view: ListView, filters: &[String], out: &mut dyn Write) -> io::Result<ListOutcome> {
        let items = match self.fetch(view, filters) {
            Ok(items) => items,
            Err(e) => {
                write_error(out, &e)?;
                return Ok(ListOutcome::Failed);
            }
        };

        debug!(?view, count = items.len(), "listing");
        if items.is_empty() {
            return Ok(ListOutcome::Rows(0));
        }

        let rows: Vec<_> = items.iter().map(format_item).collect();
        out.write_all(render_table(&rows).as_bytes())?;
        Ok(ListOutcome::Rows(rows.len()))
    }

    /// Queue each URI independently; failures are skipped.
    pub fn add(&self, uris: &[String], out: &mut dyn Write) -> io::Result<Vec<Outcome>> {
        let mut outcomes = Vec::with_capacity(uris.len());
        for uri in uris {
            let result = self.client.add_uri(uri);
            match &result {
                Ok(gid) => writeln!(out, "ADDED: {}", gid)?,
                Err(e) => warn!(%uri, error = %e, "add failed, skipping"),
            }
            outcomes.push((uri.clone(), result));
        }
        Ok(outcomes)
    }

    /// Apply a verb to each identifier, or once in its all-form when none are
    /// given.
    ///
    /// Each identifier is independent: a failure is logged and skipped and the
    /// remaining identifiers are still attempted.
    pub fn mutate(&self, verb: Verb, ids: &[String], out: &mut dyn Write) -> io::Result<Vec<Outcome>> {
        if ids.is_empty() {
            let result = verb.apply(self.client, None);
            match &result {
                Ok(_) => writeln!(out, "{}: ALL", verb.confirmation())?,
                Err(e) => write_error(out, e)?,
            }
            return Ok(vec![("ALL".to_string(), result)]);
        }

        ids.iter().try_fold(Vec::with_capacity(ids.len()), |mut outcomes, gid| -> io::Result<Vec<Outcome>> {
            let result = verb.apply(self.client, Some(gid));
            match &result {
                Ok(_) => writeln!(out, "{}: {}", verb.confirmation(), gid)?,
                Err(e) => warn!(%gid, ?verb, error = %e, "mutation failed, skipping"),
            }
            outcomes.push((gid.clone(), result));
            Ok(outcomes)
        })
    }

    /// Print the daemon version.
    pub fn version(&self, out: &mut dyn Write) -> io::Result<()> {
        writeln!(out, "aria2 version: {}", self.client.version())
    }
}

fn write_error(out: &mut dyn Write, err: &RpcError) -> io::Result<()> {
    writeln!(out, "{} {}", symbols::ERROR.red(), err)
}
