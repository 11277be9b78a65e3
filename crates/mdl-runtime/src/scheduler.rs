#![forbid(unsafe_code)]

//! Deferred rebuild scheduling.
//!
//! [`RebuildScheduler`] is the pending-rebuild flag as an explicit state
//! machine. It never runs anything itself; the label asks it what to do and
//! reports back when a rebuild starts and ends.
//!
//! # State Machine
//!
//! | From | Event | To |
//! |------|-------|----|
//! | `Idle` | `request()` | `Armed` |
//! | `Armed` | `request()` | `Armed` (coalesced) |
//! | any | `begin()` | `Rebuilding { rearmed: false }` |
//! | `Rebuilding { .. }` | `request()` | `Rebuilding { rearmed: true }` |
//! | `Rebuilding { rearmed }` | `finish()` | `Armed` if rearmed, else `Idle` |
//! | `Rebuilding { .. }` | `fail()` | `Idle` |
//!
//! # Invariants
//!
//! 1. At most one rebuild is pending at any time.
//! 2. A request made while rebuilding is never dropped: it re-arms.
//! 3. A failed rebuild always returns to `Idle` and is not retried.

use std::fmt;

/// Scheduler state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Nothing pending.
    #[default]
    Idle,
    /// A rebuild is due on the next tick.
    Armed,
    /// A rebuild is running. `rearmed` records a request made meanwhile.
    Rebuilding { rearmed: bool },
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Armed => f.write_str("armed"),
            Self::Rebuilding { rearmed: false } => f.write_str("rebuilding"),
            Self::Rebuilding { rearmed: true } => f.write_str("rebuilding (rearmed)"),
        }
    }
}

/// What a call to [`RebuildScheduler::request`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Newly armed; the host must be asked for a tick.
    Scheduled,
    /// Folded into a request that was already pending.
    Coalesced,
    /// Recorded during a running rebuild; another rebuild follows it.
    Deferred,
}

/// The pending-rebuild state machine plus counters.
#[derive(Debug, Clone, Default)]
pub struct RebuildScheduler {
    state: SchedulerState,
    scheduled: u64,
    coalesced: u64,
    deferred: u64,
}

impl RebuildScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether a rebuild is due after the current one (if any) completes.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(
            self.state,
            SchedulerState::Armed | SchedulerState::Rebuilding { rearmed: true }
        )
    }

    #[must_use]
    pub const fn is_rebuilding(&self) -> bool {
        matches!(self.state, SchedulerState::Rebuilding { .. })
    }

    /// Arm a rebuild. Idempotent while armed.
    pub fn request(&mut self) -> RequestOutcome {
        let (next, outcome) = match self.state {
            SchedulerState::Idle => (SchedulerState::Armed, RequestOutcome::Scheduled),
            SchedulerState::Armed => (SchedulerState::Armed, RequestOutcome::Coalesced),
            SchedulerState::Rebuilding { rearmed: false } => (
                SchedulerState::Rebuilding { rearmed: true },
                RequestOutcome::Deferred,
            ),
            SchedulerState::Rebuilding { rearmed: true } => (
                SchedulerState::Rebuilding { rearmed: true },
                RequestOutcome::Coalesced,
            ),
        };
        self.state = next;
        match outcome {
            RequestOutcome::Scheduled => self.scheduled += 1,
            RequestOutcome::Coalesced => self.coalesced += 1,
            RequestOutcome::Deferred => self.deferred += 1,
        }
        outcome
    }

    /// Enter `Rebuilding`, consuming any pending request.
    ///
    /// Valid from any state; a forced rebuild starts from `Idle` too.
    pub fn begin(&mut self) {
        self.state = SchedulerState::Rebuilding { rearmed: false };
    }

    /// Leave `Rebuilding` after success. Returns `true` when a request made
    /// during the rebuild left the scheduler armed again.
    pub fn finish(&mut self) -> bool {
        let rearmed = matches!(self.state, SchedulerState::Rebuilding { rearmed: true });
        self.state = if rearmed {
            SchedulerState::Armed
        } else {
            SchedulerState::Idle
        };
        rearmed
    }

    /// Leave `Rebuilding` after failure. Always idles.
    pub fn fail(&mut self) {
        self.state = SchedulerState::Idle;
    }

    /// Requests that armed the scheduler from idle.
    #[must_use]
    pub const fn scheduled_count(&self) -> u64 {
        self.scheduled
    }

    /// Requests folded into an already-pending rebuild.
    #[must_use]
    pub const fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    /// Requests made while a rebuild was running.
    #[must_use]
    pub const fn deferred_count(&self) -> u64 {
        self.deferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_schedules() {
        let mut s = RebuildScheduler::new();
        assert!(!s.is_pending());
        assert_eq!(s.request(), RequestOutcome::Scheduled);
        assert_eq!(s.state(), SchedulerState::Armed);
        assert!(s.is_pending());
    }

    #[test]
    fn further_requests_coalesce() {
        let mut s = RebuildScheduler::new();
        s.request();
        assert_eq!(s.request(), RequestOutcome::Coalesced);
        assert_eq!(s.request(), RequestOutcome::Coalesced);
        assert_eq!(s.scheduled_count(), 1);
        assert_eq!(s.coalesced_count(), 2);
    }

    #[test]
    fn rebuild_returns_to_idle() {
        let mut s = RebuildScheduler::new();
        s.request();
        s.begin();
        assert!(s.is_rebuilding());
        assert!(!s.is_pending());
        assert!(!s.finish());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn request_during_rebuild_rearms() {
        let mut s = RebuildScheduler::new();
        s.request();
        s.begin();
        assert_eq!(s.request(), RequestOutcome::Deferred);
        assert_eq!(s.request(), RequestOutcome::Coalesced);
        assert!(s.is_pending());
        assert!(s.finish());
        assert_eq!(s.state(), SchedulerState::Armed);
    }

    #[test]
    fn failure_idles_even_when_rearmed() {
        let mut s = RebuildScheduler::new();
        s.begin();
        s.request();
        s.fail();
        assert_eq!(s.state(), SchedulerState::Idle);
        assert!(!s.is_pending());
    }

    #[test]
    fn forced_rebuild_from_idle() {
        let mut s = RebuildScheduler::new();
        s.begin();
        assert!(!s.finish());
        assert_eq!(s.state(), SchedulerState::Idle);
    }

    #[test]
    fn display() {
        assert_eq!(SchedulerState::Rebuilding { rearmed: true }.to_string(), "rebuilding (rearmed)");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone, Copy)]
    enum Op {
        Request,
        Tick { reentrant: bool, fail: bool },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Request),
            1 => (any::<bool>(), any::<bool>()).prop_map(|(reentrant, fail)| Op::Tick { reentrant, fail }),
        ]
    }

    proptest! {
        #[test]
        fn pending_matches_a_single_flag(ops in prop::collection::vec(op(), 0..64)) {
            let mut s = RebuildScheduler::new();
            let mut pending = false;
            let mut rebuilds = 0u64;
            for op in ops {
                match op {
                    Op::Request => {
                        let outcome = s.request();
                        prop_assert_eq!(outcome == RequestOutcome::Scheduled, !pending);
                        pending = true;
                    }
                    Op::Tick { reentrant, fail } => {
                        if s.state() != SchedulerState::Armed {
                            continue;
                        }
                        s.begin();
                        rebuilds += 1;
                        prop_assert!(!s.is_pending());
                        if reentrant {
                            prop_assert_eq!(s.request(), RequestOutcome::Deferred);
                        }
                        if fail {
                            s.fail();
                            pending = false;
                        } else {
                            prop_assert_eq!(s.finish(), reentrant);
                            pending = reentrant;
                        }
                    }
                }
                prop_assert_eq!(s.is_pending(), pending);
                prop_assert!(!s.is_rebuilding());
            }
            prop_assert!(s.scheduled_count() <= rebuilds + 1);
        }
    }
}
