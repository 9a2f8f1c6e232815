//! # booking-remote
//!
//! HTTP implementations of the booking store and payment session traits
//! for tour-booking.
//!
//! 1. **HttpBookingStore** - booking service REST API
//!    - `POST /booking` to persist, `GET /booking/{id}` to reload
//!    - Caller's session token sent as a bearer credential
//!
//! 2. **HttpPaymentInitiator** - payment API
//!    - `POST /create-checkout-session` with a two-decimal amount
//!    - Booking id sent as the idempotency key
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use booking_remote::{HttpBookingStore, HttpPaymentInitiator, RemoteConfig};
//!
//! let config = RemoteConfig::from_env()?;
//! let store = Arc::new(HttpBookingStore::new(&config)?);
//! let payments = Arc::new(HttpPaymentInitiator::new(&config)?);
//!
//! let coordinator = Coordinator::new(store, payments, catalog);
//! ```

pub mod config;
mod http;
pub mod payment;
pub mod store;

// Re-exports
pub use config::RemoteConfig;
pub use payment::HttpPaymentInitiator;
pub use store::HttpBookingStore;
