// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Live refresh of the download listing (`watch`).
//!
//! The loop is a small state machine:
//!
//! ```text
//!            key pending
//!  POLLING ──────────────────────────────► STOPPED
//!     │  ▲                                    ▲
//!     │  │ rows > 0                           │ zero rows / transport error
//!     ▼  │                                    │
//!  (interval elapsed) ──► RENDERED ───────────┘
//! ```
//!
//! Every tick starts with a non-blocking keypress check. The network is only
//! touched once per refresh interval, so cancellation stays responsive at tick
//! granularity. While a listing call is in flight the loop cannot be
//! cancelled; the client's request timeout bounds that window.
//!
//! Key input, time and the display surface are injected so the loop can be
//! driven deterministically in tests.

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    cursor,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, Clear, ClearType},
};
use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::colors::{DIM, RESET};
use crate::dispatch::{Dispatcher, ListOutcome, ListView};
use crate::rpc::QueueClient;

/// Non-blocking keypress detection.
pub trait KeySource {
    /// Return whether a key was pressed since the last check, consuming it.
    /// Must return immediately.
    fn key_pending(&mut self) -> bool;
}

/// Time source and cooperative yield.
pub trait Clock {
    fn now(&self) -> Instant;
    /// Yield between ticks.
    fn sleep(&mut self, duration: Duration);
}

/// The surface a refresh is drawn on.
pub trait Screen: Write {
    /// Clear everything and move the cursor to the origin.
    fn clear(&mut self) -> io::Result<()>;
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The user pressed a key.
    KeyPressed,
    /// The listing came back empty; nothing left to watch.
    Empty,
    /// The daemon could not be queried.
    TransportError,
}

/// Loop state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Polling,
    Rendered(ListOutcome),
    Stopped(StopReason),
}

/// Per-invocation refresh bookkeeping. Created on loop entry, dropped on exit.
#[derive(Debug, Clone)]
pub struct RefreshSession {
    last_refresh: Option<Instant>,
    interval: Duration,
}

impl RefreshSession {
    pub fn new(interval: Duration) -> Self {
        Self {
            last_refresh: None,
            interval,
        }
    }

    /// A refresh is due if none happened yet or the interval has elapsed.
    pub fn is_due(&self, now: Instant) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.interval,
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.last_refresh = Some(now);
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

/// Summary of one `watch` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchReport {
    /// Number of fetch-and-draw cycles performed.
    pub renders: usize,
    /// Number of polling ticks, including the one that stopped the loop.
    pub ticks: usize,
    pub reason: StopReason,
}

/// The refresh state machine.
pub struct RefreshLoop<'a, K, C, S> {
    dispatcher: Dispatcher<'a>,
    keys: K,
    clock: C,
    screen: S,
    session: RefreshSession,
    tick: Duration,
    state: RefreshState,
    renders: usize,
    ticks: usize,
}

impl<'a, K: KeySource, C: Clock, S: Screen> RefreshLoop<'a, K, C, S> {
    pub fn new(
        client: &'a dyn QueueClient,
        keys: K,
        clock: C,
        screen: S,
        interval: Duration,
        tick: Duration,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(client),
            keys,
            clock,
            screen,
            session: RefreshSession::new(interval),
            tick,
            state: RefreshState::Polling,
            renders: 0,
            ticks: 0,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    /// The display surface, for inspection after the loop ends.
    pub fn screen(&self) -> &S {
        &self.screen
    }

    /// Advance the machine by one transition.
    pub fn step(&mut self) -> io::Result<RefreshState> {
        self.state = match self.state {
            RefreshState::Polling => self.tick()?,
            RefreshState::Rendered(ListOutcome::Failed) => RefreshState::Stopped(StopReason::TransportError),
            RefreshState::Rendered(ListOutcome::Rows(0)) => RefreshState::Stopped(StopReason::Empty),
            RefreshState::Rendered(ListOutcome::Rows(_)) => RefreshState::Polling,
            stopped @ RefreshState::Stopped(_) => stopped,
        };
        Ok(self.state)
    }

    fn tick(&mut self) -> io::Result<RefreshState> {
        self.ticks += 1;

        if self.keys.key_pending() {
            return Ok(RefreshState::Stopped(StopReason::KeyPressed));
        }

        let now = self.clock.now();
        if !self.session.is_due(now) {
            self.clock.sleep(self.tick);
            return Ok(RefreshState::Polling);
        }

        self.session.mark(now);
        self.render().map(RefreshState::Rendered)
    }

    fn render(&mut self) -> io::Result<ListOutcome> {
        self.renders += 1;
        self.screen.clear()?;
        writeln!(
            self.screen,
            "{DIM}Refreshing every {}s, last update {} (press any key to stop){RESET}",
            self.session.interval().as_secs_f32(),
            Local::now().format("%H:%M:%S"),
        )?;
        let outcome = self.dispatcher.list(ListView::All, &[], &mut self.screen)?;
        self.screen.flush()?;
        debug!(render = self.renders, ?outcome, "refreshed");
        Ok(outcome)
    }

    /// Drive the machine until it stops.
    pub fn run(&mut self) -> io::Result<WatchReport> {
        loop {
            if let RefreshState::Stopped(reason) = self.step()? {
                return Ok(WatchReport {
                    renders: self.renders,
                    ticks: self.ticks,
                    reason,
                });
            }
        }
    }
}

/// Keypress detection on the real terminal. Requires raw mode.
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn key_pending(&mut self) -> bool {
        match event::poll(Duration::ZERO) {
            Ok(true) => match event::read() {
                Ok(Event::Key(key)) => key.kind == KeyEventKind::Press,
                Ok(_) => false,
                // A terminal we can no longer read from cannot cancel the loop.
                Err(_) => true,
            },
            Ok(false) => false,
            Err(_) => true,
        }
    }
}

/// Wall clock with a real sleep.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Stdout in raw mode: bare `\n` is translated to `\r\n`.
pub struct TerminalScreen {
    stdout: Stdout,
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self { stdout: io::stdout() }
    }
}

impl Default for TerminalScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for TerminalScreen {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut start = 0;
        for (i, byte) in buf.iter().enumerate() {
            if *byte == b'\n' {
                self.stdout.write_all(&buf[start..i])?;
                self.stdout.write_all(b"\r\n")?;
                start = i + 1;
            }
        }
        self.stdout.write_all(&buf[start..])?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }
}

impl Screen for TerminalScreen {
    fn clear(&mut self) -> io::Result<()> {
        execute!(self.stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

/// Raw mode for the lifetime of the guard.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("Failed to enable raw terminal mode")?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Run `watch` on the real terminal until a key is pressed or nothing is left.
pub fn watch_terminal(client: &dyn QueueClient, interval: Duration, tick: Duration) -> Result<WatchReport> {
    info!(interval_secs = interval.as_secs_f32(), "watch started");

    let report = {
        let _raw = RawModeGuard::enable()?;
        let mut refresh = RefreshLoop::new(
            client,
            TerminalKeys,
            SystemClock,
            TerminalScreen::new(),
            interval,
            tick,
        );
        refresh.run().context("Failed to draw refresh")?
    };

    info!(renders = report.renders, reason = ?report.reason, "watch stopped");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::{RpcError, RpcResult};
    use crate::types::DownloadItem;

    struct FixedClient {
        active: usize,
    }

    impl QueueClient for FixedClient {
        fn list_active(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Ok((0..self.active)
                .map(|i| DownloadItem::new(format!("a{}", i), "active").with_progress(1, 2))
                .collect())
        }
        fn list_waiting(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Ok(Vec::new())
        }
        fn list_stopped(&self, _: Option<&str>) -> RpcResult<Vec<DownloadItem>> {
            Ok(Vec::new())
        }
        fn add_uri(&self, _: &str) -> RpcResult<String> {
            Err(RpcError::Protocol("unused".into()))
        }
        fn pause(&self, _: Option<&str>) -> RpcResult<String> {
            Err(RpcError::Protocol("unused".into()))
        }
        fn unpause(&self, _: Option<&str>) -> RpcResult<String> {
            Err(RpcError::Protocol("unused".into()))
        }
        fn remove(&self, _: Option<&str>) -> RpcResult<String> {
            Err(RpcError::Protocol("unused".into()))
        }
        fn purge(&self, _: Option<&str>) -> RpcResult<String> {
            Err(RpcError::Protocol("unused".into()))
        }
        fn version(&self) -> String {
            "unknown".into()
        }
    }

    struct NoKeys;

    impl KeySource for NoKeys {
        fn key_pending(&mut self) -> bool {
            false
        }
    }

    struct FakeClock {
        base: Instant,
        elapsed: Duration,
    }

    impl Clock for FakeClock {
        fn now(&self) -> Instant {
            self.base + self.elapsed
        }
        fn sleep(&mut self, duration: Duration) {
            self.elapsed += duration;
        }
    }

    #[derive(Default)]
    struct NullScreen {
        clears: usize,
    }

    impl Write for NullScreen {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Screen for NullScreen {
        fn clear(&mut self) -> io::Result<()> {
            self.clears += 1;
            Ok(())
        }
    }

    fn fake_clock() -> FakeClock {
        FakeClock {
            base: Instant::now(),
            elapsed: Duration::ZERO,
        }
    }

    #[test]
    fn test_session_due() {
        let start = Instant::now();
        let mut session = RefreshSession::new(Duration::from_secs(2));
        assert!(session.is_due(start));
        session.mark(start);
        assert!(!session.is_due(start + Duration::from_millis(1999)));
        assert!(session.is_due(start + Duration::from_secs(2)));
    }

    #[test]
    fn test_state_transitions() {
        let client = FixedClient { active: 1 };
        let mut refresh = RefreshLoop::new(
            &client,
            NoKeys,
            fake_clock(),
            NullScreen::default(),
            Duration::from_secs(1),
            Duration::from_millis(500),
        );

        assert_eq!(refresh.state(), RefreshState::Polling);
        assert_eq!(refresh.step().unwrap(), RefreshState::Rendered(ListOutcome::Rows(1)));
        assert_eq!(refresh.step().unwrap(), RefreshState::Polling);
        // Interval not elapsed: the tick only yields.
        assert_eq!(refresh.step().unwrap(), RefreshState::Polling);
        assert_eq!(refresh.screen().clears, 1);
        assert_eq!(refresh.step().unwrap(), RefreshState::Polling);
        assert_eq!(refresh.step().unwrap(), RefreshState::Rendered(ListOutcome::Rows(1)));
        assert_eq!(refresh.screen().clears, 2);
    }

    #[test]
    fn test_empty_listing_stops_after_one_render() {
        let client = FixedClient { active: 0 };
        let mut refresh = RefreshLoop::new(
            &client,
            NoKeys,
            fake_clock(),
            NullScreen::default(),
            Duration::from_secs(1),
            Duration::from_millis(100),
        );

        let report = refresh.run().unwrap();
        assert_eq!(report.renders, 1);
        assert_eq!(report.reason, StopReason::Empty);
        assert_eq!(refresh.step().unwrap(), RefreshState::Stopped(StopReason::Empty));
    }
}
