//! Alarm DTOs for raise/clear operations.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ApnName, ApnState, ElementName, PropagationSummary};

/// Request body for `POST /elements/{name}/alarms`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RaiseAlarmRequest {
    /// The APN the reporter declares down.
    pub apn: ApnName,
}

/// Response body for alarm raise and clear operations.
#[derive(Debug, Serialize, ToSchema)]
pub struct AlarmResponse {
    /// The reporting element.
    pub reporter: ElementName,
    /// The affected APN.
    pub apn: ApnName,
    /// Peers whose notice log was updated.
    pub peers_notified: u32,
    /// Peers skipped because authentication failed.
    pub peers_skipped: u32,
    /// Resulting state of the `(pool, apn)` pair.
    pub state: ApnState,
}

impl AlarmResponse {
    /// Builds a response from a propagation summary.
    #[must_use]
    pub fn from_summary(
        reporter: ElementName,
        apn: ApnName,
        summary: PropagationSummary,
    ) -> Self {
        Self {
            reporter,
            apn,
            peers_notified: summary.peers_notified,
            peers_skipped: summary.peers_skipped,
            state: summary.state,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    #[test]
    fn from_summary_copies_counts() {
        let summary = PropagationSummary {
            peers_notified: 2,
            peers_skipped: 1,
            state: ApnState::PartiallyDown,
        };
        let response = AlarmResponse::from_summary(
            ElementName::from("ne1"),
            ApnName::from("fast.example"),
            summary,
        );
        assert_eq!(response.peers_notified, 2);
        assert_eq!(response.peers_skipped, 1);
        assert_eq!(response.state, ApnState::PartiallyDown);
    }

    #[test]
    fn response_exposes_an_openapi_schema() {
        let json = serde_json::to_string(&AlarmResponse::schema()).unwrap_or_default();
        assert!(json.contains("peers_notified"));
        assert!(json.contains("peers_skipped"));
        assert!(json.contains("state"));
    }
}
