//! # Submission Outcome
//!
//! States a submission attempt moves through and the single terminal
//! outcome reported to the caller.
//!
//! ```text
//! Idle ──► Validating ──► Persisting ──► InitiatingPayment ──► Completed
//!  │  │        │              │   ▲               │
//!  │  │        ▼              ▼   │ (resume)      ▼
//!  │  │  ValidationFailed  PersistenceFailed  PaymentInitiationFailed
//!  │  └─────────────────────────────┘
//!  └──► Unauthenticated
//! ```

use crate::booking::BookingId;
use crate::error::{PaymentError, PersistenceError};
use crate::session::RedirectTarget;
use crate::validation::FieldError;
use serde::Serialize;
use tracing::debug;

/// State of one coordination attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    Idle,
    Validating,
    Persisting,
    InitiatingPayment,
    Completed,
    ValidationFailed,
    PersistenceFailed,
    PaymentInitiationFailed,
    Unauthenticated,
}

impl SubmissionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Completed
                | SubmissionState::ValidationFailed
                | SubmissionState::PersistenceFailed
                | SubmissionState::PaymentInitiationFailed
                | SubmissionState::Unauthenticated
        )
    }

    /// Whether `next` is a legal successor. Transitions only move forward;
    /// there is no path from payment back to persistence.
    pub fn can_transition_to(&self, next: SubmissionState) -> bool {
        use SubmissionState::*;
        matches!(
            (self, next),
            (Idle, Validating)
                | (Idle, Unauthenticated)
                // resume loads an existing record instead of validating a form
                | (Idle, Persisting)
                | (Validating, Persisting)
                | (Validating, ValidationFailed)
                | (Persisting, InitiatingPayment)
                | (Persisting, PersistenceFailed)
                | (Persisting, Unauthenticated)
                | (InitiatingPayment, Completed)
                | (InitiatingPayment, PaymentInitiationFailed)
        )
    }
}

/// Tracks the current state of one attempt
#[derive(Debug)]
pub(crate) struct Attempt {
    state: SubmissionState,
}

impl Attempt {
    pub(crate) fn new() -> Self {
        Self {
            state: SubmissionState::Idle,
        }
    }

    pub(crate) fn state(&self) -> SubmissionState {
        self.state
    }

    pub(crate) fn advance(&mut self, next: SubmissionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        debug!(from = ?self.state, to = ?next, "submission state");
        self.state = next;
    }

    /// Move to the terminal state matching `outcome` and hand it back
    pub(crate) fn finish(&mut self, outcome: SubmissionOutcome) -> SubmissionOutcome {
        self.advance(outcome.state());
        outcome
    }
}

/// Terminal result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum SubmissionOutcome {
    /// Payment session created; the client should redirect
    Success { redirect: RedirectTarget },

    /// Request rejected before any side effect
    ValidationFailed { reasons: Vec<FieldError> },

    /// Booking could not be stored; nothing was charged
    PersistenceFailed { error: PersistenceError },

    /// Booking is stored but no payment session exists yet.
    /// Retry with the booking id instead of resubmitting the form.
    PaymentInitiationFailed {
        booking_id: BookingId,
        error: PaymentError,
    },

    /// No authenticated identity; nothing was touched
    Unauthenticated,
}

impl SubmissionOutcome {
    /// Terminal state this outcome corresponds to
    pub fn state(&self) -> SubmissionState {
        match self {
            SubmissionOutcome::Success { .. } => SubmissionState::Completed,
            SubmissionOutcome::ValidationFailed { .. } => SubmissionState::ValidationFailed,
            SubmissionOutcome::PersistenceFailed { .. } => SubmissionState::PersistenceFailed,
            SubmissionOutcome::PaymentInitiationFailed { .. } => {
                SubmissionState::PaymentInitiationFailed
            }
            SubmissionOutcome::Unauthenticated => SubmissionState::Unauthenticated,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionOutcome::Success { .. })
    }

    /// Booking id to resume payment with, if a booking was stored
    pub fn booking_id(&self) -> Option<&BookingId> {
        match self {
            SubmissionOutcome::Success { redirect } => Some(&redirect.booking_id),
            SubmissionOutcome::PaymentInitiationFailed { booking_id, .. } => Some(booking_id),
            _ => None,
        }
    }

    /// Whether the same form can be submitted again as-is
    pub fn can_resubmit_form(&self) -> bool {
        matches!(
            self,
            SubmissionOutcome::ValidationFailed { .. } | SubmissionOutcome::PersistenceFailed { .. }
        )
    }

    /// The one banner the presentation layer shows for this outcome
    pub fn banner(&self) -> Banner {
        match self {
            SubmissionOutcome::Success { .. } => Banner::Success,
            SubmissionOutcome::Unauthenticated => Banner::LoginRequired,
            _ => Banner::Failure,
        }
    }

    /// HTTP status code appropriate for this outcome
    pub fn status_code(&self) -> u16 {
        match self {
            SubmissionOutcome::Success { .. } => 200,
            SubmissionOutcome::ValidationFailed { .. } => 422,
            SubmissionOutcome::PersistenceFailed { error } => error.status_code(),
            SubmissionOutcome::PaymentInitiationFailed { error, .. } => error.status_code(),
            SubmissionOutcome::Unauthenticated => 401,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Banner {
    Success,
    Failure,
    LoginRequired,
}

impl Banner {
    pub fn message(&self) -> &'static str {
        match self {
            Banner::Success => "Booking Successful",
            Banner::Failure => "Failed to book. Please try again.",
            Banner::LoginRequired => "Please login to proceed with the booking.",
        }
    }
}
