//! # External Collaborators
//!
//! Traits for the two systems a booking submission talks to. The
//! Coordinator receives implementations at construction, so tests can swap
//! in fakes and production wires in the HTTP clients.
//!
//! ```text
//!                 ┌──────────────────────┐
//!                 │     Coordinator      │
//!                 └──────────┬───────────┘
//!            persist / fetch │ initiate
//!          ┌─────────────────┴─────────────────┐
//!  ┌───────┴────────┐                ┌─────────┴───────────────┐
//!  │  BookingStore  │                │ PaymentSessionInitiator │
//!  └────────────────┘                └─────────────────────────┘
//! ```

use crate::booking::{BookingId, BookingRecord, BookingRequest, Identity};
use crate::error::{PaymentError, PersistenceError};
use crate::session::{PaymentSessionHandle, PaymentSessionRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Durable storage for bookings.
///
/// Implementations return the first observed outcome and never retry.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persist a booking with the caller's credentials attached.
    /// Exactly one durable write on success.
    async fn persist(
        &self,
        identity: &Identity,
        request: &BookingRequest,
    ) -> Result<BookingRecord, PersistenceError>;

    /// Load a previously persisted booking
    async fn fetch(
        &self,
        identity: &Identity,
        id: &BookingId,
    ) -> Result<BookingRecord, PersistenceError>;
}

/// Creates payment sessions with the payment subsystem.
#[async_trait]
pub trait PaymentSessionInitiator: Send + Sync {
    /// Request a session for `request.amount`, scoped to `request.booking_id`.
    async fn initiate(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSessionHandle, PaymentError>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}

pub type BoxedBookingStore = Arc<dyn BookingStore>;
pub type BoxedPaymentInitiator = Arc<dyn PaymentSessionInitiator>;
