//! Borrowing request status machine.
//!
//! `PENDING` is the only initial state. `REJECTED` and `RETURNED` are
//! terminal. Every legal step moves exactly one edge; nothing skips ahead.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Borrowed,
    Returned,
}

impl RequestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Borrowed => "BORROWED",
            RequestStatus::Returned => "RETURNED",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Returned)
    }

    /// Actions accepted from this status.
    pub fn allowed_actions(self) -> &'static [RequestAction] {
        match self {
            RequestStatus::Pending => &[RequestAction::Approve, RequestAction::Reject],
            RequestStatus::Approved => &[RequestAction::Collect],
            RequestStatus::Borrowed => &[RequestAction::Return],
            RequestStatus::Rejected | RequestStatus::Returned => &[],
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(RequestStatus::Pending),
            "APPROVED" => Ok(RequestStatus::Approved),
            "REJECTED" => Ok(RequestStatus::Rejected),
            "BORROWED" => Ok(RequestStatus::Borrowed),
            "RETURNED" => Ok(RequestStatus::Returned),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestAction {
    Approve,
    Reject,
    Collect,
    Return,
}

impl RequestAction {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestAction::Approve => "approve",
            RequestAction::Reject => "reject",
            RequestAction::Collect => "collect",
            RequestAction::Return => "return",
        }
    }
}

impl fmt::Display for RequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "approve" => Ok(RequestAction::Approve),
            "reject" => Ok(RequestAction::Reject),
            "collect" => Ok(RequestAction::Collect),
            "return" => Ok(RequestAction::Return),
            other => Err(format!("unknown action: {}", other)),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("cannot {action} a request that is {from}")]
    InvalidTransition {
        from: RequestStatus,
        action: RequestAction,
    },
}

/// Pure transition function for the request lifecycle.
pub fn next_status(
    current: RequestStatus,
    action: RequestAction,
) -> Result<RequestStatus, TransitionError> {
    use RequestAction::*;
    use RequestStatus::*;

    match (current, action) {
        (Pending, Approve) => Ok(Approved),
        (Pending, Reject) => Ok(Rejected),
        (Approved, Collect) => Ok(Borrowed),
        (Borrowed, Return) => Ok(Returned),
        (from, action) => Err(TransitionError::InvalidTransition { from, action }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusTransition {
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub action: RequestAction,
    pub at: DateTime<Utc>,
}

/// A request's current status plus a bounded record of how it got there.
#[derive(Debug, Clone)]
pub struct RequestLifecycle {
    status: RequestStatus,
    history: Vec<StatusTransition>,
    max_history: usize,
}

impl RequestLifecycle {
    pub fn new(max_history: usize) -> Self {
        Self::resume(RequestStatus::Pending, max_history)
    }

    /// Start tracking from a status already known to the server.
    pub fn resume(status: RequestStatus, max_history: usize) -> Self {
        Self {
            status,
            history: Vec::new(),
            max_history,
        }
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }

    pub fn history(&self) -> &[StatusTransition] {
        &self.history
    }

    /// Apply `action`. On error the status and history are left untouched.
    pub fn apply(
        &mut self,
        action: RequestAction,
        at: DateTime<Utc>,
    ) -> Result<RequestStatus, TransitionError> {
        let to = next_status(self.status, action)?;
        self.history.push(StatusTransition {
            from: self.status,
            to,
            action,
            at,
        });
        if self.history.len() > self.max_history {
            self.history.remove(0);
        }
        tracing::debug!("Request transition {} --{}--> {}", self.status, action, to);
        self.status = to;
        Ok(to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATUSES: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Borrowed,
        RequestStatus::Returned,
    ];

    const ALL_ACTIONS: [RequestAction; 4] = [
        RequestAction::Approve,
        RequestAction::Reject,
        RequestAction::Collect,
        RequestAction::Return,
    ];

    #[test]
    fn test_happy_path() {
        let approved = next_status(RequestStatus::Pending, RequestAction::Approve).unwrap();
        assert_eq!(approved, RequestStatus::Approved);
        let borrowed = next_status(approved, RequestAction::Collect).unwrap();
        assert_eq!(borrowed, RequestStatus::Borrowed);
        let returned = next_status(borrowed, RequestAction::Return).unwrap();
        assert_eq!(returned, RequestStatus::Returned);
    }

    #[test]
    fn test_reject_pending() {
        assert_eq!(
            next_status(RequestStatus::Pending, RequestAction::Reject),
            Ok(RequestStatus::Rejected)
        );
    }

    #[test]
    fn test_collect_requires_approval() {
        assert_eq!(
            next_status(RequestStatus::Pending, RequestAction::Collect),
            Err(TransitionError::InvalidTransition {
                from: RequestStatus::Pending,
                action: RequestAction::Collect,
            })
        );
    }

    #[test]
    fn test_repeated_approve_is_rejected() {
        let err = next_status(RequestStatus::Approved, RequestAction::Approve).unwrap_err();
        assert_eq!(err.to_string(), "cannot approve a request that is APPROVED");
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for status in [RequestStatus::Rejected, RequestStatus::Returned] {
            assert!(status.is_terminal());
            for action in ALL_ACTIONS {
                assert!(next_status(status, action).is_err());
            }
        }
    }

    #[test]
    fn test_allowed_actions_match_transition_function() {
        for status in ALL_STATUSES {
            for action in ALL_ACTIONS {
                let allowed = status.allowed_actions().contains(&action);
                assert_eq!(allowed, next_status(status, action).is_ok());
                // Same input, same output.
                assert_eq!(next_status(status, action), next_status(status, action));
            }
        }
    }

    #[test]
    fn test_parse_action_and_status() {
        assert_eq!("collect".parse::<RequestAction>(), Ok(RequestAction::Collect));
        assert!("borrow".parse::<RequestAction>().is_err());
        assert_eq!("borrowed".parse::<RequestStatus>(), Ok(RequestStatus::Borrowed));
    }

    #[test]
    fn test_lifecycle_failure_leaves_state() {
        let mut lifecycle = RequestLifecycle::new(10);
        let now = Utc::now();
        assert!(lifecycle.apply(RequestAction::Return, now).is_err());
        assert_eq!(lifecycle.status(), RequestStatus::Pending);
        assert!(lifecycle.history().is_empty());

        lifecycle.apply(RequestAction::Approve, now).unwrap();
        lifecycle.apply(RequestAction::Collect, now).unwrap();
        assert_eq!(lifecycle.status(), RequestStatus::Borrowed);
        assert_eq!(lifecycle.history().len(), 2);
        assert_eq!(lifecycle.history()[1].from, RequestStatus::Approved);
    }

    #[test]
    fn test_lifecycle_history_is_bounded() {
        let mut lifecycle = RequestLifecycle::new(2);
        let now = Utc::now();
        lifecycle.apply(RequestAction::Approve, now).unwrap();
        lifecycle.apply(RequestAction::Collect, now).unwrap();
        lifecycle.apply(RequestAction::Return, now).unwrap();
        assert_eq!(lifecycle.history().len(), 2);
        assert_eq!(lifecycle.history()[0].action, RequestAction::Collect);
    }
}
