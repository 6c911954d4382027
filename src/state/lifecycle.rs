use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Lifecycle status of a match.
///
/// Transitions are monotonic: a match never regresses to an earlier status.
/// `Confirmed` is a legacy intermediate value kept for compatibility with
/// existing records; no operation produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Initial status right after creation.
    Scheduled,
    /// Legacy intermediate status; still cancelable.
    Confirmed,
    /// The creator kicked the match off; live score updates flow.
    InProgress,
    /// Terminal: the match was called off before starting.
    Canceled,
    /// Terminal: the match finished.
    Completed,
}

impl MatchStatus {
    /// Whether no further transition can leave this status.
    pub fn is_terminal(self) -> bool {
        matches!(self, MatchStatus::Canceled | MatchStatus::Completed)
    }
}

/// Events that drive the match lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// The creator starts the match.
    Start,
    /// The match is called off.
    Cancel,
    /// The match ends.
    Complete,
}

/// Error returned when an event cannot be applied to the current status.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while {from:?}")]
pub struct InvalidTransition {
    /// Status the match was in when the event arrived.
    pub from: MatchStatus,
    /// Event that is not valid from this status.
    pub event: MatchEvent,
}

/// Compute the status an event leads to, validating it against the current
/// status. Pure; persisting the result is the caller's job.
pub fn next_status(from: MatchStatus, event: MatchEvent) -> Result<MatchStatus, InvalidTransition> {
    let next = match (from, event) {
        (MatchStatus::Scheduled, MatchEvent::Start) => MatchStatus::InProgress,
        (MatchStatus::Scheduled | MatchStatus::Confirmed, MatchEvent::Cancel) => {
            MatchStatus::Canceled
        }
        (MatchStatus::InProgress, MatchEvent::Complete) => MatchStatus::Completed,
        (from, event) => return Err(InvalidTransition { from, event }),
    };

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_moves_scheduled_to_in_progress() {
        assert_eq!(
            next_status(MatchStatus::Scheduled, MatchEvent::Start),
            Ok(MatchStatus::InProgress)
        );
    }

    #[test]
    fn cancel_allowed_from_scheduled_and_confirmed() {
        assert_eq!(
            next_status(MatchStatus::Scheduled, MatchEvent::Cancel),
            Ok(MatchStatus::Canceled)
        );
        assert_eq!(
            next_status(MatchStatus::Confirmed, MatchEvent::Cancel),
            Ok(MatchStatus::Canceled)
        );
    }

    #[test]
    fn complete_requires_in_progress() {
        assert_eq!(
            next_status(MatchStatus::InProgress, MatchEvent::Complete),
            Ok(MatchStatus::Completed)
        );
        let err = next_status(MatchStatus::Scheduled, MatchEvent::Complete).unwrap_err();
        assert_eq!(err.from, MatchStatus::Scheduled);
        assert_eq!(err.event, MatchEvent::Complete);
    }

    #[test]
    fn start_rejected_outside_scheduled() {
        for from in [
            MatchStatus::Confirmed,
            MatchStatus::InProgress,
            MatchStatus::Canceled,
            MatchStatus::Completed,
        ] {
            let err = next_status(from, MatchEvent::Start).unwrap_err();
            assert_eq!(err.from, from);
        }
    }

    #[test]
    fn terminal_statuses_accept_no_event() {
        for from in [MatchStatus::Canceled, MatchStatus::Completed] {
            assert!(from.is_terminal());
            for event in [MatchEvent::Start, MatchEvent::Cancel, MatchEvent::Complete] {
                assert!(next_status(from, event).is_err());
            }
        }
    }

    #[test]
    fn transitions_never_regress() {
        // Relative progression of each status; terminal states share the top.
        fn rank(status: MatchStatus) -> u8 {
            match status {
                MatchStatus::Scheduled => 0,
                MatchStatus::Confirmed => 1,
                MatchStatus::InProgress => 2,
                MatchStatus::Canceled | MatchStatus::Completed => 3,
            }
        }

        let statuses = [
            MatchStatus::Scheduled,
            MatchStatus::Confirmed,
            MatchStatus::InProgress,
            MatchStatus::Canceled,
            MatchStatus::Completed,
        ];
        let events = [MatchEvent::Start, MatchEvent::Cancel, MatchEvent::Complete];

        for from in statuses {
            for event in events {
                if let Ok(next) = next_status(from, event) {
                    assert!(rank(next) > rank(from), "{from:?} -> {next:?} regressed");
                }
            }
        }
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&MatchStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let back: MatchStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(back, MatchStatus::Scheduled);
    }
}
