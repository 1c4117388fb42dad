// SPDX-FileCopyrightText: 2025 The Rollcall Authors
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use tokio::time::Instant;

/// How long a success confirmation stays on screen before the scanner re-arms
/// on its own.
pub(crate) const DWELL: Duration = Duration::from_secs(2);

#[derive(Debug)]
enum State {
    /// Accepting the next scan.
    Idle,
    /// A scan has been captured; further scans are ignored. `rearm_at` is set
    /// once the outcome has been displayed after a success, and stays unset
    /// after an error until the operator dismisses it.
    Pending { rearm_at: Option<Instant> },
}

/// Debounce for the scan station: a badge left in front of the scanner emits
/// the same identifier repeatedly, and only the first read of each
/// presentation may reach the service.
#[derive(Debug)]
pub(crate) struct Flow {
    state: State,
}

impl Flow {
    pub(crate) const fn new() -> Self {
        Self { state: State::Idle }
    }

    pub(crate) const fn is_pending(&self) -> bool {
        matches!(self.state, State::Pending { .. })
    }

    /// Captures a scan. Returns false while a prior scan is still being
    /// processed or displayed, in which case the event must be dropped.
    pub(crate) fn accept(&mut self) -> bool {
        match self.state {
            State::Idle => {
                self.state = State::Pending { rearm_at: None };
                true
            }
            State::Pending { .. } => false,
        }
    }

    /// A success has been displayed; schedule the automatic re-arm.
    pub(crate) fn dwell(&mut self, now: Instant) {
        self.state = State::Pending {
            rearm_at: Some(now + DWELL),
        };
    }

    /// An error has been displayed; hold until the operator dismisses it.
    pub(crate) fn hold(&mut self) {
        self.state = State::Pending { rearm_at: None };
    }

    pub(crate) fn rearm_at(&self) -> Option<Instant> {
        match self.state {
            State::Idle | State::Pending { rearm_at: None } => None,
            State::Pending {
                rearm_at: Some(at),
            } => Some(at),
        }
    }

    /// Returns to `Idle`, whether by the dwell deadline or the operator.
    pub(crate) fn rearm(&mut self) {
        self.state = State::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn accepts_only_while_idle() {
        let mut flow = Flow::new();

        assert!(flow.accept());
        assert!(!flow.accept());
        assert!(!flow.accept());

        flow.rearm();
        assert!(flow.accept());
    }

    #[tokio::test(start_paused = true)]
    async fn dwell_schedules_the_rearm_deadline() {
        let mut flow = Flow::new();
        assert!(flow.accept());
        assert_eq!(flow.rearm_at(), None);

        let now = Instant::now();
        flow.dwell(now);

        assert_eq!(flow.rearm_at(), Some(now + DWELL));
        assert!(flow.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn hold_has_no_deadline() {
        let mut flow = Flow::new();
        assert!(flow.accept());

        flow.hold();

        assert!(flow.is_pending());
        assert_eq!(flow.rearm_at(), None);

        flow.rearm();
        assert!(!flow.is_pending());
    }
}
