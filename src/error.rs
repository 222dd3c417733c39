use thiserror::Error;

use crate::lending::status::TransitionError;
use crate::lending::validator::ValidationError;

/// Broad classes of failure surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad input; the user corrects it and resubmits.
    Input,
    /// Wallet cannot cover the deposit; the user should top up.
    InsufficientBalance,
    /// Action not allowed from the current status; nothing was changed.
    IllegalTransition,
    /// Remote or network failure; the user may retry.
    Remote,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Invalid transition: {0}")]
    Transition(#[from] TransitionError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::Validation(ValidationError::InsufficientBalance { .. }) => {
                ErrorCategory::InsufficientBalance
            }
            AppError::Validation(_)
            | AppError::InvalidInput(_)
            | AppError::Unauthenticated
            | AppError::Forbidden(_)
            | AppError::Token(_)
            | AppError::Config(_) => ErrorCategory::Input,
            AppError::Transition(_) => ErrorCategory::IllegalTransition,
            AppError::NotFound(_)
            | AppError::Api { .. }
            | AppError::Http(_)
            | AppError::Decode(_) => ErrorCategory::Remote,
        }
    }

    /// Whether repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        self.category() == ErrorCategory::Remote
    }

    /// Map a non-success HTTP status from the API.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 => AppError::Unauthenticated,
            403 => AppError::Forbidden(message),
            404 => AppError::NotFound(message),
            _ => AppError::Api { status, message },
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lending::status::{RequestAction, RequestStatus};

    #[test]
    fn test_insufficient_balance_category() {
        let err = AppError::from(ValidationError::InsufficientBalance {
            required: 150_000,
            available: 100_000,
        });
        assert_eq!(err.category(), ErrorCategory::InsufficientBalance);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transition_category() {
        let err = AppError::from(TransitionError::InvalidTransition {
            from: RequestStatus::Pending,
            action: RequestAction::Collect,
        });
        assert_eq!(err.category(), ErrorCategory::IllegalTransition);
    }

    #[test]
    fn test_malformed_token_is_not_retryable() {
        let err = AppError::from(jsonwebtoken::decode_header("not-a-jwt").unwrap_err());
        assert_eq!(err.category(), ErrorCategory::Input);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            AppError::from_status(401, String::new()),
            AppError::Unauthenticated
        ));
        assert!(matches!(
            AppError::from_status(404, "kit".to_string()),
            AppError::NotFound(_)
        ));
        let err = AppError::from_status(503, "down".to_string());
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "API error (503): down");
    }
}
