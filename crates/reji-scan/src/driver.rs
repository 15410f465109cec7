//! # Scan Session Driver
//!
//! The tokio event loop around [`ScanSession`]. One task per session owns the
//! decode feed, the countdown deadline and the tablet banner delay, and
//! serializes every event against the machine.
//!
//! ## Event Serialization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      Driver Event Loop                              │
//! │                                                                     │
//! │   ScanHandle ──commands──▶ ┌─────────────────────────────┐          │
//! │   frame interval ──ticks──▶│    biased select! loop      │          │
//! │   countdown deadline ─────▶│  (one task, one event at a  │          │
//! │   banner delay ───────────▶│   time, in arm order)       │          │
//! │                            └──────────────┬──────────────┘          │
//! │                                           │                         │
//! │                            ScanSession + DecodeFeed + ScanSink      │
//! │                                                                     │
//! │  ARM ORDER = TIE-BREAK: the frame arm sits ABOVE the deadline arm,  │
//! │  so when a decodable frame and the countdown expire in the same     │
//! │  instant, the symbol is processed first and cancels the deadline    │
//! │  before the timeout arm can ever run. A session can never time out  │
//! │  and succeed at once.                                               │
//! │                                                                     │
//! │  After teardown the loop exits, so no late tick or timer can reach  │
//! │  a closed session.                                                  │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn, Instrument};
use uuid::Uuid;

use crate::capture::{CaptureDevice, Facing};
use crate::decoder::{DecodeFeed, DecodeSignal, FrameDecoder};
use crate::error::{ScanError, ScanResult};
use crate::session::{
    FaultOutcome, ScanConfig, ScanMode, ScanPhase, ScanSession, ScanSink, SymbolOutcome,
    TimeoutOutcome,
};

// =============================================================================
// Commands
// =============================================================================

/// What woke the event loop up. One wake is processed at a time, in arm
/// order - this is the whole concurrency model of a session.
#[derive(Debug)]
enum Wake {
    Command(Option<SessionCommand>),
    Frame,
    Deadline,
    Banner,
}

/// User/caller actions delivered into the event loop.
#[derive(Debug)]
enum SessionCommand {
    Start,
    Confirm,
    Reject,
    OpenManual,
    SubmitManual(String),
    BackToPreview,
    ValueRejected,
    Close,
}

// =============================================================================
// Scan Handle
// =============================================================================

/// Handle for interacting with a running scan session.
///
/// Cheap to clone; all methods enqueue a command for the session task.
/// Results of processing arrive through the [`ScanSink`] and the phase
/// watch channel, not through these methods.
#[derive(Clone, Debug)]
pub struct ScanHandle {
    cmd_tx: mpsc::Sender<SessionCommand>,
    phase_rx: watch::Receiver<ScanPhase>,
}

impl ScanHandle {
    /// Begins scanning (the register's "start scan" button).
    pub async fn start(&self) -> ScanResult<()> {
        self.send(SessionCommand::Start).await
    }

    /// Confirms the pending value; it is handed to the sink.
    pub async fn confirm(&self) -> ScanResult<()> {
        self.send(SessionCommand::Confirm).await
    }

    /// Rejects the pending value and returns to the preview.
    pub async fn reject(&self) -> ScanResult<()> {
        self.send(SessionCommand::Reject).await
    }

    /// Opens manual barcode entry (non-tablet, after a timeout).
    pub async fn open_manual(&self) -> ScanResult<()> {
        self.send(SessionCommand::OpenManual).await
    }

    /// Submits a manually keyed barcode.
    pub async fn submit_manual(&self, code: impl Into<String>) -> ScanResult<()> {
        self.send(SessionCommand::SubmitManual(code.into())).await
    }

    /// Returns to the live preview from a timeout/manual/not-found screen.
    pub async fn back_to_preview(&self) -> ScanResult<()> {
        self.send(SessionCommand::BackToPreview).await
    }

    /// Tells the session the handed-over value was not acceptable
    /// (e.g. the code is missing from the catalog).
    pub async fn value_rejected(&self) -> ScanResult<()> {
        self.send(SessionCommand::ValueRejected).await
    }

    /// Closes the session. Idempotent: closing an already-finished session
    /// is a no-op, and teardown side effects run at most once.
    pub async fn close(&self) {
        let _ = self.cmd_tx.send(SessionCommand::Close).await;
    }

    /// Current phase snapshot.
    pub fn phase(&self) -> ScanPhase {
        *self.phase_rx.borrow()
    }

    /// A watch receiver for awaiting phase changes.
    pub fn watch_phase(&self) -> watch::Receiver<ScanPhase> {
        self.phase_rx.clone()
    }

    async fn send(&self, cmd: SessionCommand) -> ScanResult<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ScanError::SessionClosed)
    }
}

// =============================================================================
// Scan Driver
// =============================================================================

/// Owns everything a running session touches and pumps its event loop.
pub struct ScanDriver {
    session: ScanSession,
    feed: DecodeFeed,
    sink: Arc<dyn ScanSink>,
    config: ScanConfig,
    cmd_rx: mpsc::Receiver<SessionCommand>,
    phase_tx: watch::Sender<ScanPhase>,
    /// Countdown expiry while Scanning.
    deadline: Option<Instant>,
    /// Tablet "not found" banner expiry after a timeout.
    banner_at: Option<Instant>,
}

impl ScanDriver {
    /// Opens the capture device and spawns the session task.
    ///
    /// Opening may prompt a permission gate; denial (or missing hardware)
    /// surfaces here as a [`ScanError::Device`] and no task is spawned.
    /// Tablet sessions autostart scanning; everything else waits in
    /// Preview for [`ScanHandle::start`].
    pub fn spawn(
        device: &dyn CaptureDevice,
        decoder: Box<dyn FrameDecoder>,
        sink: Arc<dyn ScanSink>,
        mode: ScanMode,
        tablet: bool,
        config: ScanConfig,
    ) -> ScanResult<ScanHandle> {
        let stream = device.open(Facing::Environment)?;

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (phase_tx, phase_rx) = watch::channel(ScanPhase::Preview);

        let driver = ScanDriver {
            session: ScanSession::new(mode, tablet, config.max_faults),
            feed: DecodeFeed::new(stream, decoder),
            sink,
            config,
            cmd_rx,
            phase_tx,
            deadline: None,
            banner_at: None,
        };

        let span = tracing::info_span!(
            "scan_session",
            id = %Uuid::new_v4(),
            ?mode,
            tablet,
        );
        tokio::spawn(driver.run().instrument(span));

        Ok(ScanHandle { cmd_tx, phase_rx })
    }

    /// Main session loop. Exits only through teardown.
    async fn run(mut self) {
        info!("scan session starting");

        if self.session.is_tablet() && self.session.begin_scan().is_ok() {
            self.arm_countdown();
        }

        let mut frames = time::interval(self.config.frame_interval);
        frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            self.publish_phase();

            let wake = tokio::select! {
                biased;

                cmd = self.cmd_rx.recv() => Wake::Command(cmd),

                // Frame arm ABOVE the deadline arm: symbol beats timeout on a tie.
                _ = frames.tick(), if self.session.is_scanning() => Wake::Frame,

                _ = Self::sleep(self.deadline), if self.deadline.is_some() => Wake::Deadline,

                _ = Self::sleep(self.banner_at), if self.banner_at.is_some() => Wake::Banner,
            };

            let shutdown = match wake {
                Wake::Command(Some(cmd)) => self.handle_command(cmd),
                // Every handle dropped: nobody can talk to us, tear down.
                Wake::Command(None) => {
                    self.teardown(true);
                    true
                }
                Wake::Frame => self.poll_frame(),
                Wake::Deadline => {
                    self.handle_timeout();
                    false
                }
                Wake::Banner => self.handle_banner_elapsed(),
            };

            if shutdown {
                break;
            }
        }

        self.publish_phase();
        info!("scan session finished");
    }

    /// Sleeps until the given instant, or forever when there is none.
    /// The select arm guard keeps the forever branch from being polled.
    async fn sleep(at: Option<Instant>) {
        match at {
            Some(at) => time::sleep_until(at).await,
            None => std::future::pending().await,
        }
    }

    fn arm_countdown(&mut self) {
        let timeout = self.config.timeout_for(self.session.is_tablet());
        self.deadline = Some(Instant::now() + timeout);
        debug!(?timeout, "countdown armed");
    }

    fn publish_phase(&self) {
        let phase = self.session.phase();
        if *self.phase_tx.borrow() != phase {
            let _ = self.phase_tx.send(phase);
        }
    }

    /// Processes one caller command. Returns true when the loop must exit.
    fn handle_command(&mut self, cmd: SessionCommand) -> bool {
        match cmd {
            SessionCommand::Start => {
                match self.session.begin_scan() {
                    Ok(()) => self.arm_countdown(),
                    // Double-taps and stale buttons are not errors.
                    Err(err) => debug!(%err, "start ignored"),
                }
                false
            }
            SessionCommand::Confirm => {
                match self.session.confirm() {
                    Ok(value) => self.sink.on_accepted(value),
                    Err(err) => debug!(%err, "confirm ignored"),
                }
                false
            }
            SessionCommand::Reject => {
                match self.session.reject() {
                    Ok(()) => self.feed.reset(),
                    Err(err) => debug!(%err, "reject ignored"),
                }
                false
            }
            SessionCommand::OpenManual => {
                if let Err(err) = self.session.open_manual() {
                    debug!(%err, "manual entry ignored");
                }
                false
            }
            SessionCommand::SubmitManual(code) => {
                // Validation failure is surfaced; the session stays in
                // manual entry for a corrected attempt.
                if let Err(err) = self.session.submit_manual(&code) {
                    self.sink.on_error(&err);
                }
                false
            }
            SessionCommand::BackToPreview => {
                match self.session.back_to_preview() {
                    Ok(()) => self.feed.reset(),
                    Err(err) => debug!(%err, "back-to-preview ignored"),
                }
                false
            }
            SessionCommand::ValueRejected => {
                if self.session.value_rejected() {
                    self.feed.reset();
                    info!("value rejected by caller, showing not-found");
                }
                false
            }
            SessionCommand::Close => {
                self.teardown(true);
                true
            }
        }
    }

    /// Pulls one frame through the feed. Returns true when the loop must exit.
    fn poll_frame(&mut self) -> bool {
        match self.feed.poll() {
            DecodeSignal::Symbol(symbol) => {
                match self.session.accept_symbol(&symbol) {
                    SymbolOutcome::Ignored => {}
                    SymbolOutcome::AwaitConfirm => {
                        // Cancel the countdown in the same event the symbol
                        // was recognized in; the timeout arm cannot fire for
                        // this scan anymore.
                        self.deadline = None;
                        self.feed.reset();
                    }
                    SymbolOutcome::Accept(value) => {
                        self.deadline = None;
                        self.feed.reset();
                        self.sink.on_accepted(value);
                    }
                }
                false
            }
            DecodeSignal::Idle => {
                self.session.clear_faults();
                false
            }
            DecodeSignal::Fault(fault) => match self.session.record_fault(fault) {
                FaultOutcome::Tolerated(streak) => {
                    warn!(streak, "decoder fault, continuing");
                    false
                }
                FaultOutcome::Fatal(err) => {
                    warn!(%err, "decoder fault budget exhausted");
                    self.sink.on_error(&err);
                    self.teardown(true);
                    true
                }
            },
            DecodeSignal::Device(err) => {
                let err = ScanError::Device(err);
                warn!(%err, "capture device failed");
                self.sink.on_error(&err);
                self.teardown(true);
                true
            }
        }
    }

    /// The countdown elapsed.
    fn handle_timeout(&mut self) {
        self.deadline = None;
        match self.session.timeout() {
            TimeoutOutcome::Ignored => {}
            TimeoutOutcome::AwaitRetry => {
                self.feed.reset();
                info!("scan timed out, preview restarted");
            }
            TimeoutOutcome::NotFoundDelay => {
                self.feed.reset();
                self.banner_at = Some(Instant::now() + self.config.not_found_delay);
                info!("scan timed out, not-found banner shown");
            }
        }
    }

    /// The tablet banner delay elapsed: notify and auto-close.
    /// Returns true when the loop must exit.
    fn handle_banner_elapsed(&mut self) -> bool {
        self.banner_at = None;
        if self.session.not_found_elapsed() {
            self.sink.on_timed_out();
            // Already notified through on_timed_out; teardown stays silent.
            self.teardown(false);
            true
        } else {
            false
        }
    }

    /// Stops timers, releases the feed, closes the machine. Runs its side
    /// effects at most once no matter how often it is reached.
    fn teardown(&mut self, notify_closed: bool) {
        self.deadline = None;
        self.banner_at = None;
        self.feed.close();
        if self.session.close() && notify_closed {
            self.sink.on_closed();
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
