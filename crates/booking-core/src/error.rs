//! # Error Types
//!
//! Typed failures for the two external calls a booking submission makes,
//! plus configuration errors raised while wiring the service together.

use serde::Serialize;
use thiserror::Error;

/// Failure persisting or fetching a booking in the booking store
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PersistenceError {
    /// Transport-level failure reaching the store (connect error, timeout)
    #[error("Booking store unreachable: {0}")]
    Unreachable(String),

    /// Store answered but refused the write (validation, conflict, duplicate)
    #[error("Booking store rejected request{}: {reason}", fmt_status(.status))]
    Rejected { status: Option<u16>, reason: String },
}

impl PersistenceError {
    /// Returns true if resubmitting the same request may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PersistenceError::Unreachable(_))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PersistenceError::Unreachable(_) => 503,
            PersistenceError::Rejected { .. } => 502,
        }
    }
}

/// Failure creating a payment session with the payment subsystem
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum PaymentError {
    /// Could not connect to the payment gateway
    #[error("Payment gateway unreachable: {0}")]
    GatewayUnreachable(String),

    /// Gateway refused the session (malformed amount, currency mismatch, ...)
    #[error("Payment gateway rejected request{}: {reason}", fmt_status(.status))]
    GatewayRejected { status: Option<u16>, reason: String },

    /// Gateway did not answer within the configured bound
    #[error("Payment gateway timed out: {0}")]
    Timeout(String),
}

impl PaymentError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentError::GatewayUnreachable(_) | PaymentError::Timeout(_)
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::GatewayUnreachable(_) => 502,
            PaymentError::GatewayRejected { .. } => 502,
            PaymentError::Timeout(_) => 504,
        }
    }
}

/// Errors raised while loading configuration or the tour catalog
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required setting not present
    #[error("Missing configuration: {0}")]
    Missing(String),

    /// Setting present but malformed
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// Tour catalog could not be read or parsed
    #[error("Tour catalog error: {0}")]
    Catalog(String),
}

fn fmt_status(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(PersistenceError::Unreachable("refused".into()).is_retryable());
        assert!(!PersistenceError::Rejected {
            status: Some(409),
            reason: "duplicate".into()
        }
        .is_retryable());

        assert!(PaymentError::Timeout("15s".into()).is_retryable());
        assert!(PaymentError::GatewayUnreachable("dns".into()).is_retryable());
        assert!(!PaymentError::GatewayRejected {
            status: Some(400),
            reason: "bad amount".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PersistenceError::Unreachable("x".into()).status_code(), 503);
        assert_eq!(PaymentError::Timeout("x".into()).status_code(), 504);
        assert_eq!(
            PaymentError::GatewayRejected {
                status: None,
                reason: "x".into()
            }
            .status_code(),
            502
        );
    }

    #[test]
    fn test_display_includes_status() {
        let err = PersistenceError::Rejected {
            status: Some(409),
            reason: "duplicate submission".into(),
        };
        assert_eq!(
            err.to_string(),
            "Booking store rejected request (HTTP 409): duplicate submission"
        );

        let err = PaymentError::GatewayRejected {
            status: None,
            reason: "currency mismatch".into(),
        };
        assert_eq!(
            err.to_string(),
            "Payment gateway rejected request: currency mismatch"
        );
    }
}
