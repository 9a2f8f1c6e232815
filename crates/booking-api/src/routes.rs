//! # Routes
//!
//! Axum router configuration for the booking API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET  /health - Health check
///   - GET  /api/v1/tours - Tours open for booking
///   - GET  /api/v1/tours/{name}/quote - Live price estimate
///   - POST /api/v1/bookings - Submit a booking form
///   - POST /api/v1/bookings/{booking_id}/payment - Retry payment for a stored booking
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Tours
        .route("/tours", get(handlers::list_tours))
        .route("/tours/{tour_name}/quote", get(handlers::quote_tour))
        // Bookings
        .route("/bookings", post(handlers::submit_booking))
        .route("/bookings/{booking_id}/payment", post(handlers::resume_payment));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
