//! # Request Handlers
//!
//! Axum request handlers for the booking API. Every booking endpoint
//! answers with the Coordinator's outcome plus the banner to show.

use crate::auth::MaybeIdentity;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use booking_core::{
    BookingForm, BookingId, PriceBreakdown, SubmissionOutcome, Tour, MAX_GROUP_SIZE,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Query for the live estimate
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteParams {
    #[serde(default)]
    pub group_size: Option<i64>,
}

/// Outcome of a submit or resume, flattened next to the banner text
#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    #[serde(flatten)]
    pub outcome: SubmissionOutcome,
    pub banner: &'static str,
    /// Form state after the attempt; cleared once the booking was stored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form: Option<BookingForm>,
}

impl OutcomeResponse {
    fn new(outcome: SubmissionOutcome, form: Option<BookingForm>) -> Self {
        Self {
            banner: outcome.banner().message(),
            outcome,
            form,
        }
    }
}

impl IntoResponse for OutcomeResponse {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.outcome.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Tour listing response
#[derive(Debug, Serialize)]
pub struct ToursResponse {
    pub tours: Vec<Tour>,
    pub count: usize,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

fn error_response(
    status: StatusCode,
    error: impl Into<String>,
) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse::new(error, status.as_u16())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tour-booking",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// List tours currently open for booking
pub async fn list_tours(State(state): State<AppState>) -> Json<ToursResponse> {
    let tours: Vec<Tour> = state.coordinator.catalog().active_tours().cloned().collect();
    Json(ToursResponse {
        count: tours.len(),
        tours,
    })
}

/// Live price estimate for a tour. A missing or non-positive group size
/// is priced as one person.
pub async fn quote_tour(
    State(state): State<AppState>,
    Path(tour_name): Path<String>,
    Query(params): Query<QuoteParams>,
) -> Result<Json<PriceBreakdown>, (StatusCode, Json<ErrorResponse>)> {
    let party = match params.group_size {
        Some(n) if n > i64::from(MAX_GROUP_SIZE) => {
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("groupSize must be at most {}", MAX_GROUP_SIZE),
            ));
        }
        Some(n) if n >= 1 => n as u32,
        _ => 1,
    };

    state
        .coordinator
        .quote(&tour_name, party)
        .map(Json)
        .ok_or_else(|| {
            error_response(
                StatusCode::NOT_FOUND,
                format!("Tour not found: {}", tour_name),
            )
        })
}

/// Submit a booking form
#[instrument(skip_all)]
pub async fn submit_booking(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    form: Result<Json<BookingForm>, JsonRejection>,
) -> Result<OutcomeResponse, (StatusCode, Json<ErrorResponse>)> {
    let Json(mut form) = form.map_err(|rejection| {
        warn!("Unreadable booking body: {}", rejection.body_text());
        error_response(rejection.status(), rejection.body_text())
    })?;

    info!(tour = %form.tour_name, "Booking submitted");
    let outcome = state.coordinator.submit(identity.identity(), &mut form).await;
    log_outcome(&outcome);
    Ok(OutcomeResponse::new(outcome, Some(form)))
}

/// Retry payment for a booking that is already stored
#[instrument(skip(state, identity))]
pub async fn resume_payment(
    State(state): State<AppState>,
    identity: MaybeIdentity,
    Path(booking_id): Path<String>,
) -> OutcomeResponse {
    let booking_id = BookingId::new(booking_id);
    let outcome = state.coordinator.resume(identity.identity(), &booking_id).await;
    log_outcome(&outcome);
    OutcomeResponse::new(outcome, None)
}

fn log_outcome(outcome: &SubmissionOutcome) {
    match outcome {
        SubmissionOutcome::Success { redirect } => info!(
            "Payment session ready: booking={}, session={}",
            redirect.booking_id, redirect.session_id
        ),
        other => warn!("Booking attempt ended in {:?}", other.state()),
    }
}
