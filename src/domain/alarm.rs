//! Alarm state model and propagation reporting.

use serde::Serialize;
use utoipa::ToSchema;

/// Observed state of a `(pool, apn)` pair.
///
/// Derived from the reporter count against the number of pool members
/// currently serving the APN; never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ApnState {
    /// No member declares the APN down.
    Up,
    /// At least one serving member, but not all, declares it down.
    PartiallyDown,
    /// Every serving member declares it down. Propagation is pointless:
    /// there is no up peer left to notify.
    FullyDown,
}

impl ApnState {
    /// Derives the state from the current reporter and server counts.
    #[must_use]
    pub const fn from_counts(reporters: usize, servers: usize) -> Self {
        if reporters == 0 {
            Self::Up
        } else if reporters < servers {
            Self::PartiallyDown
        } else {
            Self::FullyDown
        }
    }

    /// Returns the state as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::PartiallyDown => "partially_down",
            Self::FullyDown => "fully_down",
        }
    }
}

/// Outcome of a single `set_alarm` / `clear_alarm` call.
///
/// Partial propagation failure (peers skipped because authentication
/// failed) is a non-error result: the operation succeeds, but the caller
/// always learns how many peers were skipped.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PropagationSummary {
    /// Peers whose notice log was updated.
    pub peers_notified: u32,
    /// Peers skipped because authentication failed.
    pub peers_skipped: u32,
    /// Resulting state of the `(pool, apn)` pair.
    pub state: ApnState,
}

impl PropagationSummary {
    /// A summary describing an operation that touched no peer.
    #[must_use]
    pub const fn no_propagation(state: ApnState) -> Self {
        Self {
            peers_notified: 0,
            peers_skipped: 0,
            state,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn state_from_counts() {
        assert_eq!(ApnState::from_counts(0, 2), ApnState::Up);
        assert_eq!(ApnState::from_counts(1, 2), ApnState::PartiallyDown);
        assert_eq!(ApnState::from_counts(2, 2), ApnState::FullyDown);
        assert_eq!(ApnState::from_counts(1, 1), ApnState::FullyDown);
    }

    #[test]
    fn state_serializes_snake_case() {
        let json = serde_json::to_string(&ApnState::PartiallyDown).ok();
        assert_eq!(json.as_deref(), Some("\"partially_down\""));
    }

    #[test]
    fn no_propagation_summary_is_zeroed() {
        let summary = PropagationSummary::no_propagation(ApnState::FullyDown);
        assert_eq!(summary.peers_notified, 0);
        assert_eq!(summary.peers_skipped, 0);
        assert_eq!(summary.state, ApnState::FullyDown);
    }
}
