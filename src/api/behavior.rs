//! Best-effort behavioral analytics hooks.
//!
//! The website adapts its presentation based on coarse usage signals. The API
//! layer only emits events; delivery is an injected concern with an explicit
//! connect/disconnect lifecycle so handlers never talk to an ambient global
//! connection. A failed connect downgrades to dropping events.

use anyhow::Result;
use tracing::debug;

/// Events the route handlers emit. All delivery is fire-and-forget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BehaviorEvent {
    LoginSucceeded,
    LoginFailed,
    SignupCompleted,
    SessionResumed,
    ContactSubmitted,
}

impl BehaviorEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LoginSucceeded => "login_succeeded",
            Self::LoginFailed => "login_failed",
            Self::SignupCompleted => "signup_completed",
            Self::SessionResumed => "session_resumed",
            Self::ContactSubmitted => "contact_submitted",
        }
    }
}

/// Sink for behavioral events.
///
/// `record` must never block or fail the request path.
pub trait BehaviorTracker: Send + Sync {
    /// Establish the upstream connection. Callers treat errors as "run
    /// without tracking", never as fatal.
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream sink is unreachable.
    fn connect(&self) -> Result<()>;

    fn record(&self, event: BehaviorEvent);

    fn disconnect(&self);
}

/// Fallback used when tracking is disabled or the connect failed.
#[derive(Clone, Debug)]
pub struct NoopBehaviorTracker;

impl BehaviorTracker for NoopBehaviorTracker {
    fn connect(&self) -> Result<()> {
        Ok(())
    }

    fn record(&self, _event: BehaviorEvent) {}

    fn disconnect(&self) {}
}

/// Local dev tracker that logs events instead of shipping them.
#[derive(Clone, Debug)]
pub struct LogBehaviorTracker;

impl BehaviorTracker for LogBehaviorTracker {
    fn connect(&self) -> Result<()> {
        debug!("behavior tracker connected (log sink)");
        Ok(())
    }

    fn record(&self, event: BehaviorEvent) {
        debug!(event = event.as_str(), "behavior event");
    }

    fn disconnect(&self) {
        debug!("behavior tracker disconnected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_names_are_stable() {
        assert_eq!(BehaviorEvent::LoginSucceeded.as_str(), "login_succeeded");
        assert_eq!(BehaviorEvent::ContactSubmitted.as_str(), "contact_submitted");
    }

    #[test]
    fn noop_tracker_full_lifecycle() {
        let tracker = NoopBehaviorTracker;
        assert!(tracker.connect().is_ok());
        tracker.record(BehaviorEvent::SignupCompleted);
        tracker.disconnect();
    }

    #[test]
    fn log_tracker_full_lifecycle() {
        let tracker = LogBehaviorTracker;
        assert!(tracker.connect().is_ok());
        tracker.record(BehaviorEvent::LoginFailed);
        tracker.disconnect();
    }
}
