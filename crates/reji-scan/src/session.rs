//! # Scan Session State Machine
//!
//! The pure core of scan acquisition: phases, acceptance policy, manual
//! fallback, fault budget. No I/O and no clocks live here - the [`crate::driver`]
//! owns the feed and the timers and calls into this machine serially.
//!
//! ## Phase Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ScanSession Phase Diagram                          │
//! │                                                                         │
//! │              construction                                               │
//! │                   │ (tablet flag: skip straight to Scanning)            │
//! │                   ▼                                                     │
//! │             ┌───────────┐  begin_scan   ┌────────────┐                  │
//! │      ┌─────▶│  Preview  │ ─────────────▶│  Scanning  │◀───────┐         │
//! │      │      └───────────┘               └─────┬──────┘        │         │
//! │      │                         usable symbol  │  countdown    │         │
//! │      │                       ┌────────────────┤  elapsed      │         │
//! │      │                       ▼                ▼               │         │
//! │      │ reject        ┌────────────┐     ┌───────────┐  begin_scan       │
//! │      ├───────────────│ Confirming │     │ TimedOut  │────────┘          │
//! │      │               └─────┬──────┘     └─────┬─────┘                   │
//! │      │              confirm│            open_manual (non-tablet)        │
//! │      │                     ▼                  ▼                         │
//! │      │               ┌───────────┐     ┌─────────────┐                  │
//! │      │               │ Succeeded │     │ ManualEntry │──valid code──▶   │
//! │      │               └─────┬─────┘     └─────────────┘   Confirming     │
//! │      │      value_rejected │                                            │
//! │      │                     ▼                                            │
//! │      │               ┌───────────┐          any phase ──close──▶        │
//! │      └───────────────│ NotFound  │            ┌───────────┐             │
//! │        begin_scan /  └───────────┘            │ Cancelled │             │
//! │        back_to_preview                        └───────────┘             │
//! │                                                                         │
//! │  Terminal: Succeeded (value handed off), Cancelled (torn down).         │
//! │  A Succeeded session still accepts value_rejected and close - the       │
//! │  caller may discover the code is not in the catalog only after          │
//! │  receiving it.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tablet mode differences: autostart (no Preview), 10-unit countdown
//! instead of 8, QR success skips Confirming, timeout shows a 2-unit
//! "not found" banner and then auto-closes, and there is no manual entry.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use reji_core::validation::validate_manual_code;

use crate::decoder::{DecodeFault, DecodedSymbol};
use crate::error::{ScanError, ScanResult};

// =============================================================================
// Scan Mode
// =============================================================================

/// What the session is scanning for. Determines the acceptance policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanMode {
    /// Product barcode for the cart. Digits extracted from the symbol text.
    Product,
    /// Barcode for an EC warehouse stock check. Same extraction as Product.
    EcStock,
    /// Payment QR. The raw symbol text IS the transport payload.
    Qr,
}

// =============================================================================
// Scan Phase
// =============================================================================

/// Current phase of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanPhase {
    /// Camera live, not decoding. Non-tablet sessions start here.
    Preview,
    /// Decode loop and countdown running.
    Scanning,
    /// A value was accepted; waiting for the cashier to confirm or rescan.
    Confirming,
    /// Countdown elapsed. Recoverable: rescan or (non-tablet) manual entry.
    TimedOut,
    /// Manual barcode entry open (non-tablet only).
    ManualEntry,
    /// The caller rejected the value (not in catalog). Recoverable.
    NotFound,
    /// Value handed to the caller.
    Succeeded,
    /// Session torn down.
    Cancelled,
}

// =============================================================================
// Scan Value
// =============================================================================

/// The value a session hands to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanValue {
    /// Extracted digit string (Product / EcStock modes, and manual entry).
    Code(String),
    /// Raw decoded text (QR mode) - a transport payload for reji-codec.
    Payload(String),
}

// =============================================================================
// Configuration
// =============================================================================

/// Timing and tolerance knobs for a scan session.
#[derive(Debug, Clone, Copy)]
pub struct ScanConfig {
    /// Countdown for a manually started (register) scan.
    pub normal_timeout: Duration,

    /// Countdown for an autostarted (tablet) scan.
    pub tablet_timeout: Duration,

    /// How long the tablet shows its "not found" banner before auto-closing.
    pub not_found_delay: Duration,

    /// Decode attempt cadence.
    pub frame_interval: Duration,

    /// Consecutive decoder faults tolerated before the session fails.
    pub max_faults: u32,
}

impl ScanConfig {
    /// Countdown duration for the given session flavor.
    pub fn timeout_for(&self, tablet: bool) -> Duration {
        if tablet {
            self.tablet_timeout
        } else {
            self.normal_timeout
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            normal_timeout: Duration::from_secs(8),
            tablet_timeout: Duration::from_secs(10),
            not_found_delay: Duration::from_secs(2),
            frame_interval: Duration::from_millis(100),
            max_faults: 5,
        }
    }
}

// =============================================================================
// Sink
// =============================================================================

/// Callbacks a session delivers to its caller.
pub trait ScanSink: Send + Sync {
    /// A value passed the acceptance policy and (where applicable) was
    /// confirmed.
    fn on_accepted(&self, value: ScanValue);

    /// The session finished tearing down.
    fn on_closed(&self);

    /// The tablet countdown elapsed and the banner delay passed.
    /// Falls back to the ordinary close callback when not overridden.
    fn on_timed_out(&self) {
        self.on_closed();
    }

    /// A recoverable or fatal error surfaced (device failure, fault cap,
    /// manual-entry validation).
    fn on_error(&self, error: &ScanError);
}

/// Sink that ignores everything. Useful in tests and throwaway sessions.
pub struct NoOpSink;

impl ScanSink for NoOpSink {
    fn on_accepted(&self, _value: ScanValue) {}
    fn on_closed(&self) {}
    fn on_error(&self, _error: &ScanError) {}
}

// =============================================================================
// Extraction Policy
// =============================================================================

/// Applies the Product/EcStock extraction policy to decoded symbol text:
/// strip every non-digit, reject empty and all-zero results.
///
/// Leading zeros are preserved - the digit string is the code.
pub fn extract_numeric_code(text: &str) -> Option<String> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.bytes().all(|b| b == b'0') {
        None
    } else {
        Some(digits)
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// What the driver must do after feeding a decoded symbol.
#[derive(Debug, PartialEq, Eq)]
pub enum SymbolOutcome {
    /// Not usable in this mode/phase. Countdown untouched, keep scanning.
    Ignored,
    /// Usable value captured; cancel the countdown, stop decoding, wait for
    /// confirm/reject.
    AwaitConfirm,
    /// Usable value, terminal (tablet QR): cancel the countdown, stop
    /// decoding, hand the value over immediately.
    Accept(ScanValue),
}

/// What the driver must do after the countdown elapsed.
#[derive(Debug, PartialEq, Eq)]
pub enum TimeoutOutcome {
    /// Stale or out-of-phase timer. Nothing happens.
    Ignored,
    /// Non-tablet: stop decoding, restart the preview, offer manual entry.
    AwaitRetry,
    /// Tablet: stop decoding, show the banner, schedule the auto-close delay.
    NotFoundDelay,
}

/// What the driver must do after a decoder fault.
#[derive(Debug, PartialEq, Eq)]
pub enum FaultOutcome {
    /// Under the cap: log and keep scanning.
    Tolerated(u32),
    /// Cap reached: fatal, surface and tear down.
    Fatal(ScanError),
}

// =============================================================================
// Scan Session
// =============================================================================

/// The scan acquisition state machine.
///
/// Every method is synchronous and total: events that do not apply to the
/// current phase are ignored or rejected, never panicked on. A `Cancelled`
/// session ignores everything - late events delivered after teardown have
/// no effect.
#[derive(Debug)]
pub struct ScanSession {
    mode: ScanMode,
    tablet: bool,
    phase: ScanPhase,
    /// Last accepted value, pending confirmation.
    pending: Option<ScanValue>,
    faults: u32,
    max_faults: u32,
}

impl ScanSession {
    /// Creates a session in `Preview`. The driver autostarts tablet
    /// sessions by calling [`begin_scan`](Self::begin_scan) immediately.
    pub fn new(mode: ScanMode, tablet: bool, max_faults: u32) -> Self {
        ScanSession {
            mode,
            tablet,
            phase: ScanPhase::Preview,
            pending: None,
            faults: 0,
            max_faults,
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn is_tablet(&self) -> bool {
        self.tablet
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    /// Whether the decode loop should be pulling frames right now.
    pub fn is_scanning(&self) -> bool {
        self.phase == ScanPhase::Scanning
    }

    /// The value waiting in `Confirming`, if any.
    pub fn pending_value(&self) -> Option<&ScanValue> {
        self.pending.as_ref()
    }

    /// Starts (or restarts) decoding. Allowed from `Preview`, `TimedOut`
    /// and `NotFound`.
    pub fn begin_scan(&mut self) -> ScanResult<()> {
        match self.phase {
            ScanPhase::Preview | ScanPhase::TimedOut | ScanPhase::NotFound => {
                self.phase = ScanPhase::Scanning;
                self.faults = 0;
                self.pending = None;
                Ok(())
            }
            phase => Err(ScanError::InvalidTransition {
                phase,
                action: "begin scan",
            }),
        }
    }

    /// Feeds a decoded symbol through the mode's acceptance policy.
    ///
    /// Only meaningful while `Scanning`; in any other phase the symbol is a
    /// late event and is ignored.
    pub fn accept_symbol(&mut self, symbol: &DecodedSymbol) -> SymbolOutcome {
        if self.phase != ScanPhase::Scanning {
            return SymbolOutcome::Ignored;
        }

        let value = match self.mode {
            ScanMode::Qr => ScanValue::Payload(symbol.text.clone()),
            ScanMode::Product | ScanMode::EcStock => match extract_numeric_code(&symbol.text) {
                Some(code) => ScanValue::Code(code),
                // No usable code: equivalent to no-symbol, keep scanning.
                None => return SymbolOutcome::Ignored,
            },
        };

        self.faults = 0;

        if self.tablet && self.mode == ScanMode::Qr {
            // Tablet QR success is terminal and immediate: no confirmation.
            self.phase = ScanPhase::Succeeded;
            SymbolOutcome::Accept(value)
        } else {
            self.phase = ScanPhase::Confirming;
            self.pending = Some(value);
            SymbolOutcome::AwaitConfirm
        }
    }

    /// A frame decoded cleanly (with or without a symbol): the fault streak
    /// is broken.
    pub fn clear_faults(&mut self) {
        self.faults = 0;
    }

    /// Records a decoder fault against the consecutive-fault budget.
    pub fn record_fault(&mut self, fault: DecodeFault) -> FaultOutcome {
        if self.phase == ScanPhase::Cancelled {
            return FaultOutcome::Tolerated(self.faults);
        }

        self.faults += 1;
        if self.faults >= self.max_faults {
            FaultOutcome::Fatal(ScanError::DecoderFailed {
                faults: self.faults,
                last: fault,
            })
        } else {
            FaultOutcome::Tolerated(self.faults)
        }
    }

    /// The countdown elapsed with no accepted symbol.
    ///
    /// Ignored unless `Scanning` - a timer that fires after a symbol was
    /// accepted is stale by definition.
    pub fn timeout(&mut self) -> TimeoutOutcome {
        if self.phase != ScanPhase::Scanning {
            return TimeoutOutcome::Ignored;
        }

        self.phase = ScanPhase::TimedOut;
        if self.tablet {
            TimeoutOutcome::NotFoundDelay
        } else {
            TimeoutOutcome::AwaitRetry
        }
    }

    /// The tablet's post-timeout banner delay elapsed. Returns true when the
    /// driver should notify and tear down.
    pub fn not_found_elapsed(&mut self) -> bool {
        self.tablet && self.phase == ScanPhase::TimedOut
    }

    /// The cashier confirmed the pending value.
    pub fn confirm(&mut self) -> ScanResult<ScanValue> {
        if self.phase != ScanPhase::Confirming {
            return Err(ScanError::InvalidTransition {
                phase: self.phase,
                action: "confirm",
            });
        }

        // Confirming always holds a pending value; both are set together in
        // accept_symbol/submit_manual.
        let value = self.pending.take().ok_or(ScanError::InvalidTransition {
            phase: self.phase,
            action: "confirm",
        })?;
        self.phase = ScanPhase::Succeeded;
        Ok(value)
    }

    /// The cashier rejected the pending value and wants to rescan.
    pub fn reject(&mut self) -> ScanResult<()> {
        if self.phase != ScanPhase::Confirming {
            return Err(ScanError::InvalidTransition {
                phase: self.phase,
                action: "reject",
            });
        }

        self.pending = None;
        self.phase = ScanPhase::Preview;
        Ok(())
    }

    /// Opens manual barcode entry from the timeout screen. Non-tablet only.
    pub fn open_manual(&mut self) -> ScanResult<()> {
        if self.tablet || self.phase != ScanPhase::TimedOut {
            return Err(ScanError::InvalidTransition {
                phase: self.phase,
                action: "open manual entry",
            });
        }

        self.phase = ScanPhase::ManualEntry;
        Ok(())
    }

    /// Submits a manually keyed code.
    ///
    /// A valid code behaves exactly like a confirmed-pending Product scan:
    /// the session moves to `Confirming` with the code as its value. An
    /// invalid code leaves the session in `ManualEntry`.
    pub fn submit_manual(&mut self, code: &str) -> ScanResult<()> {
        if self.phase != ScanPhase::ManualEntry {
            return Err(ScanError::InvalidTransition {
                phase: self.phase,
                action: "submit manual code",
            });
        }

        let code = validate_manual_code(code)?;
        self.pending = Some(ScanValue::Code(code));
        self.phase = ScanPhase::Confirming;
        Ok(())
    }

    /// Returns to the live preview from any recoverable detour.
    pub fn back_to_preview(&mut self) -> ScanResult<()> {
        match self.phase {
            ScanPhase::TimedOut
            | ScanPhase::ManualEntry
            | ScanPhase::NotFound
            | ScanPhase::Confirming => {
                self.pending = None;
                self.phase = ScanPhase::Preview;
                Ok(())
            }
            phase => Err(ScanError::InvalidTransition {
                phase,
                action: "return to preview",
            }),
        }
    }

    /// The caller found the handed-over value unacceptable (e.g. the code is
    /// not in the catalog). The session shows "not found" and stays open.
    ///
    /// Returns true when the rejection applied.
    pub fn value_rejected(&mut self) -> bool {
        match self.phase {
            ScanPhase::Confirming | ScanPhase::Succeeded => {
                self.pending = None;
                self.phase = ScanPhase::NotFound;
                true
            }
            _ => false,
        }
    }

    /// Tears the machine down. Returns true the first time, false on every
    /// later call - teardown side effects must run at most once.
    pub fn close(&mut self) -> bool {
        if self.phase == ScanPhase::Cancelled {
            return false;
        }

        self.pending = None;
        self.phase = ScanPhase::Cancelled;
        true
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::SymbolFormat;

    fn symbol(text: &str) -> DecodedSymbol {
        DecodedSymbol::new(text, SymbolFormat::Other)
    }

    fn scanning(mode: ScanMode, tablet: bool) -> ScanSession {
        let mut session = ScanSession::new(mode, tablet, 5);
        session.begin_scan().unwrap();
        session
    }

    // -------------------------------------------------------------------------
    // Extraction policy
    // -------------------------------------------------------------------------

    #[test]
    fn test_extraction_strips_non_digits() {
        assert_eq!(extract_numeric_code("ABC12-345XY"), Some("12345".into()));
        assert_eq!(
            extract_numeric_code("4901234567894"),
            Some("4901234567894".into())
        );
    }

    #[test]
    fn test_extraction_preserves_leading_zeros() {
        assert_eq!(extract_numeric_code("A0012B"), Some("0012".into()));
    }

    #[test]
    fn test_extraction_rejects_empty_and_zero() {
        assert_eq!(extract_numeric_code("no digits here"), None);
        assert_eq!(extract_numeric_code(""), None);
        assert_eq!(extract_numeric_code("00-00"), None);
    }

    // -------------------------------------------------------------------------
    // Acceptance
    // -------------------------------------------------------------------------

    #[test]
    fn test_product_symbol_awaits_confirmation() {
        let mut session = scanning(ScanMode::Product, false);

        let outcome = session.accept_symbol(&symbol("ABC12-345XY"));
        assert_eq!(outcome, SymbolOutcome::AwaitConfirm);
        assert_eq!(session.phase(), ScanPhase::Confirming);
        assert_eq!(
            session.pending_value(),
            Some(&ScanValue::Code("12345".into()))
        );
    }

    #[test]
    fn test_digit_free_symbol_keeps_scanning() {
        let mut session = scanning(ScanMode::Product, false);

        assert_eq!(session.accept_symbol(&symbol("hello")), SymbolOutcome::Ignored);
        assert_eq!(session.phase(), ScanPhase::Scanning);
    }

    #[test]
    fn test_tablet_qr_success_is_immediate() {
        let mut session = scanning(ScanMode::Qr, true);

        match session.accept_symbol(&symbol("cGF5bG9hZA==")) {
            SymbolOutcome::Accept(ScanValue::Payload(text)) => {
                assert_eq!(text, "cGF5bG9hZA==")
            }
            other => panic!("expected immediate accept, got {other:?}"),
        }
        assert_eq!(session.phase(), ScanPhase::Succeeded);
    }

    #[test]
    fn test_register_qr_mode_still_confirms() {
        let mut session = scanning(ScanMode::Qr, false);

        assert_eq!(
            session.accept_symbol(&symbol("payload-text")),
            SymbolOutcome::AwaitConfirm
        );
        assert_eq!(session.phase(), ScanPhase::Confirming);
    }

    #[test]
    fn test_symbol_outside_scanning_is_ignored() {
        let mut session = ScanSession::new(ScanMode::Product, false, 5);

        // Still in Preview: a stray decode result does nothing.
        assert_eq!(
            session.accept_symbol(&symbol("4901234567894")),
            SymbolOutcome::Ignored
        );
        assert_eq!(session.phase(), ScanPhase::Preview);
    }

    // -------------------------------------------------------------------------
    // Confirmation sub-state
    // -------------------------------------------------------------------------

    #[test]
    fn test_confirm_hands_value_over() {
        let mut session = scanning(ScanMode::Product, false);
        session.accept_symbol(&symbol("49012345"));

        let value = session.confirm().unwrap();
        assert_eq!(value, ScanValue::Code("49012345".into()));
        assert_eq!(session.phase(), ScanPhase::Succeeded);
        assert!(session.pending_value().is_none());
    }

    #[test]
    fn test_reject_returns_to_preview() {
        let mut session = scanning(ScanMode::Product, false);
        session.accept_symbol(&symbol("49012345"));

        session.reject().unwrap();
        assert_eq!(session.phase(), ScanPhase::Preview);
        assert!(session.pending_value().is_none());

        // And a new scan can start.
        session.begin_scan().unwrap();
        assert!(session.is_scanning());
    }

    #[test]
    fn test_confirm_without_pending_is_rejected() {
        let mut session = scanning(ScanMode::Product, false);
        assert!(matches!(
            session.confirm(),
            Err(ScanError::InvalidTransition { .. })
        ));
    }

    // -------------------------------------------------------------------------
    // Timeout
    // -------------------------------------------------------------------------

    #[test]
    fn test_timeout_by_flavor() {
        let mut register = scanning(ScanMode::Product, false);
        assert_eq!(register.timeout(), TimeoutOutcome::AwaitRetry);
        assert_eq!(register.phase(), ScanPhase::TimedOut);

        let mut tablet = scanning(ScanMode::Qr, true);
        assert_eq!(tablet.timeout(), TimeoutOutcome::NotFoundDelay);
        assert_eq!(tablet.phase(), ScanPhase::TimedOut);
        assert!(tablet.not_found_elapsed());
    }

    #[test]
    fn test_stale_timeout_after_acceptance_is_ignored() {
        let mut session = scanning(ScanMode::Product, false);
        session.accept_symbol(&symbol("49012345"));

        // The countdown was cancelled; a late expiry must not fight the
        // accepted symbol.
        assert_eq!(session.timeout(), TimeoutOutcome::Ignored);
        assert_eq!(session.phase(), ScanPhase::Confirming);
    }

    #[test]
    fn test_retry_after_timeout() {
        let mut session = scanning(ScanMode::Product, false);
        session.timeout();

        session.begin_scan().unwrap();
        assert!(session.is_scanning());
    }

    // -------------------------------------------------------------------------
    // Manual entry
    // -------------------------------------------------------------------------

    #[test]
    fn test_manual_entry_flow() {
        let mut session = scanning(ScanMode::Product, false);
        session.timeout();
        session.open_manual().unwrap();
        assert_eq!(session.phase(), ScanPhase::ManualEntry);

        // 7 digits: rejected, session stays put.
        let err = session.submit_manual("1234567").unwrap_err();
        assert!(matches!(err, ScanError::Validation(_)));
        assert_eq!(session.phase(), ScanPhase::ManualEntry);

        // 8 digits: accepted, treated as a successful Product scan.
        session.submit_manual("12345678").unwrap();
        assert_eq!(session.phase(), ScanPhase::Confirming);
        assert_eq!(
            session.confirm().unwrap(),
            ScanValue::Code("12345678".into())
        );
    }

    #[test]
    fn test_manual_entry_not_available_on_tablet() {
        let mut session = scanning(ScanMode::Qr, true);
        session.timeout();

        assert!(matches!(
            session.open_manual(),
            Err(ScanError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_manual_entry_back_to_preview() {
        let mut session = scanning(ScanMode::Product, false);
        session.timeout();
        session.open_manual().unwrap();

        session.back_to_preview().unwrap();
        assert_eq!(session.phase(), ScanPhase::Preview);
    }

    // -------------------------------------------------------------------------
    // External rejection
    // -------------------------------------------------------------------------

    #[test]
    fn test_value_rejected_after_handoff() {
        let mut session = scanning(ScanMode::Product, false);
        session.accept_symbol(&symbol("49012345"));
        session.confirm().unwrap();

        // The caller looked the code up and found nothing.
        assert!(session.value_rejected());
        assert_eq!(session.phase(), ScanPhase::NotFound);

        // Distinct from TimedOut and from Cancelled: scanning can resume.
        session.begin_scan().unwrap();
        assert!(session.is_scanning());
    }

    #[test]
    fn test_value_rejected_elsewhere_is_noop() {
        let mut session = scanning(ScanMode::Product, false);
        assert!(!session.value_rejected());
        assert_eq!(session.phase(), ScanPhase::Scanning);
    }

    // -------------------------------------------------------------------------
    // Fault budget
    // -------------------------------------------------------------------------

    #[test]
    fn test_fault_cap() {
        let mut session = scanning(ScanMode::Product, false);

        for expected in 1..5 {
            match session.record_fault(DecodeFault::new("glitch")) {
                FaultOutcome::Tolerated(n) => assert_eq!(n, expected),
                other => panic!("fault {expected} should be tolerated, got {other:?}"),
            }
        }
        assert!(matches!(
            session.record_fault(DecodeFault::new("glitch")),
            FaultOutcome::Fatal(ScanError::DecoderFailed { faults: 5, .. })
        ));
    }

    #[test]
    fn test_clean_frame_breaks_fault_streak() {
        let mut session = scanning(ScanMode::Product, false);

        for _ in 0..4 {
            session.record_fault(DecodeFault::new("glitch"));
        }
        session.clear_faults();

        assert!(matches!(
            session.record_fault(DecodeFault::new("glitch")),
            FaultOutcome::Tolerated(1)
        ));
    }

    // -------------------------------------------------------------------------
    // Teardown
    // -------------------------------------------------------------------------

    #[test]
    fn test_close_is_idempotent() {
        let mut session = scanning(ScanMode::Product, false);

        assert!(session.close());
        assert!(!session.close());
        assert!(!session.close());
        assert_eq!(session.phase(), ScanPhase::Cancelled);
    }

    #[test]
    fn test_cancelled_session_ignores_everything() {
        let mut session = scanning(ScanMode::Product, false);
        session.close();

        assert_eq!(
            session.accept_symbol(&symbol("49012345")),
            SymbolOutcome::Ignored
        );
        assert_eq!(session.timeout(), TimeoutOutcome::Ignored);
        assert!(!session.value_rejected());
        assert!(session.begin_scan().is_err());
        assert!(session.confirm().is_err());
        assert!(matches!(
            session.record_fault(DecodeFault::new("late")),
            FaultOutcome::Tolerated(_)
        ));
    }

    #[test]
    fn test_close_from_every_phase() {
        // Close must succeed no matter where the session is.
        let mut preview = ScanSession::new(ScanMode::Product, false, 5);
        assert!(preview.close());

        let mut confirming = scanning(ScanMode::Product, false);
        confirming.accept_symbol(&symbol("49012345"));
        assert!(confirming.close());

        let mut timed_out = scanning(ScanMode::Product, false);
        timed_out.timeout();
        assert!(timed_out.close());
    }

    // -------------------------------------------------------------------------
    // Config
    // -------------------------------------------------------------------------

    #[test]
    fn test_timeout_durations() {
        let config = ScanConfig::default();
        assert_eq!(config.timeout_for(false), Duration::from_secs(8));
        assert_eq!(config.timeout_for(true), Duration::from_secs(10));
        assert_eq!(config.not_found_delay, Duration::from_secs(2));
    }
}
