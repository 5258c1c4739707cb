//! Deferred fit-to-content: waits for the viewport to report a real size.
//!
//! The diagram subscribes once to viewport resize notifications; the first
//! usable size performs the fit. A single bounded fallback timer retries in
//! case no notification arrives.

use std::time::Duration;

/// Backoff between fallback attempts.
pub const FIT_RETRY_DELAYS: [Duration; 5] = [
    Duration::from_millis(50),
    Duration::from_millis(100),
    Duration::from_millis(200),
    Duration::from_millis(400),
    Duration::from_millis(800),
];

/// What the host should do after a fit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitStep {
    /// Fit applied, or nothing was pending.
    Done,
    /// Call the timer hook again after this delay.
    RetryAfter(Duration),
    /// Timer attempts exhausted; transform left unchanged.
    GaveUp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitScheduler {
    pending: bool,
    subscribed: bool,
    attempts: usize,
}

impl Default for FitScheduler {
    fn default() -> Self {
        Self::armed()
    }
}

impl FitScheduler {
    pub fn armed() -> Self {
        Self {
            pending: true,
            subscribed: true,
            attempts: 0,
        }
    }

    /// Request a fresh fit, e.g. after switching diagrams.
    pub fn rearm(&mut self) {
        *self = Self::armed();
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Whether resize notifications should still be delivered.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// The fit happened; stop listening.
    pub fn complete(&mut self) {
        self.pending = false;
        self.subscribed = false;
    }

    /// A timer attempt failed; schedule the next one or give up.
    pub fn retry(&mut self) -> FitStep {
        match FIT_RETRY_DELAYS.get(self.attempts) {
            Some(&delay) => {
                self.attempts += 1;
                FitStep::RetryAfter(delay)
            }
            None => {
                log::warn!(
                    "viewport still has no size after {} attempts; keeping current transform",
                    self.attempts
                );
                FitStep::GaveUp
            }
        }
    }

    pub fn teardown(&mut self) {
        self.pending = false;
        self.subscribed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_then_give_up() {
        let mut fit = FitScheduler::armed();
        let steps: Vec<FitStep> = (0..6).map(|_| fit.retry()).collect();
        assert_eq!(steps[0], FitStep::RetryAfter(Duration::from_millis(50)));
        assert_eq!(steps[4], FitStep::RetryAfter(Duration::from_millis(800)));
        assert_eq!(steps[5], FitStep::GaveUp);
        assert_eq!(fit.attempts(), 5);
        // Resize notifications may still complete it.
        assert!(fit.is_subscribed());
    }

    #[test]
    fn test_complete_unsubscribes() {
        let mut fit = FitScheduler::armed();
        fit.complete();
        assert!(!fit.is_pending());
        assert!(!fit.is_subscribed());
        fit.rearm();
        assert!(fit.is_pending());
        assert_eq!(fit.attempts(), 0);
    }
}
