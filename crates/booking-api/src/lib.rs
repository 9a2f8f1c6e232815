//! # booking-api
//!
//! HTTP API layer for tour-booking.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/tours` | Tours open for booking |
//! | GET | `/api/v1/tours/{name}/quote?groupSize=N` | Live price estimate |
//! | POST | `/api/v1/bookings` | Submit a booking form |
//! | POST | `/api/v1/bookings/{id}/payment` | Retry payment for a stored booking |
//!
//! Booking endpoints read the caller from `Authorization: Bearer <token>`,
//! `X-User-Id` and `X-User-Email`, and answer with
//! `{"outcome": ..., "banner": ...}` plus the outcome's own fields.

pub mod auth;
pub mod handlers;
pub mod routes;
pub mod state;
