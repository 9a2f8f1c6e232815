//! # booking-core
//!
//! Core types and the booking-payment coordination flow for tour-booking.
//!
//! This crate provides:
//! - `pricing::compute` and `PriceBreakdown` for subtotal, service charge and total
//! - `TourCatalog`, the trusted source of per-person prices
//! - `BookingForm`, `BookingRequest` and `BookingRecord`
//! - `validation::validate` for field checks before any side effect
//! - `BookingStore` and `PaymentSessionInitiator` traits for external systems
//! - `Coordinator`, which sequences validation, persistence and payment
//!   initiation into a single `SubmissionOutcome`
//!
//! ## Example
//!
//! ```rust,ignore
//! use booking_core::{BookingForm, Coordinator};
//!
//! let coordinator = Coordinator::new(store, payments, catalog);
//!
//! let mut form = BookingForm::new("Westminster Bridge")
//!     .with_full_name("Alice Liddell")
//!     .with_phone("5550100")
//!     .with_date(date)
//!     .with_group_size(2);
//!
//! match coordinator.submit(Some(&identity), &mut form).await {
//!     SubmissionOutcome::Success { redirect } => {
//!         // hand redirect.session_id to the payment SDK
//!     }
//!     SubmissionOutcome::PaymentInitiationFailed { booking_id, .. } => {
//!         // booking is stored; retry payment without re-persisting
//!         coordinator.resume(Some(&identity), &booking_id).await;
//!     }
//!     other => println!("{}", other.banner().message()),
//! }
//! ```

pub mod booking;
pub mod coordinator;
pub mod error;
mod input;
pub mod memory;
pub mod outcome;
pub mod ports;
pub mod pricing;
pub mod session;
pub mod tour;
pub mod validation;

// Re-exports for convenience
pub use booking::{BookingForm, BookingId, BookingRecord, BookingRequest, Identity};
pub use coordinator::Coordinator;
pub use error::{ConfigError, PaymentError, PersistenceError};
pub use memory::InMemoryBookingStore;
pub use outcome::{Banner, SubmissionOutcome, SubmissionState};
pub use ports::{
    BookingStore, BoxedBookingStore, BoxedPaymentInitiator, PaymentSessionInitiator,
};
pub use pricing::{Price, PriceBreakdown};
pub use session::{PaymentSessionHandle, PaymentSessionRequest, RedirectTarget};
pub use tour::{Tour, TourCatalog};
pub use validation::{Field, FieldError, ValidationResult, MAX_GROUP_SIZE};
