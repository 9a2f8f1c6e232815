//! # Booking-Payment Coordinator
//!
//! Sequences validation, persistence and payment-session creation for one
//! submission and reports a single [`SubmissionOutcome`].
//!
//! Persistence always happens before payment initiation. A payment failure
//! leaves the stored booking in place; the caller retries with
//! [`Coordinator::resume`] instead of submitting the form again.

use crate::booking::{BookingForm, BookingId, BookingRecord, BookingRequest, Identity};
use crate::error::PersistenceError;
use crate::outcome::{Attempt, SubmissionOutcome, SubmissionState};
use crate::ports::{BoxedBookingStore, BoxedPaymentInitiator};
use crate::pricing::PriceBreakdown;
use crate::session::{PaymentSessionHandle, PaymentSessionRequest};
use crate::tour::TourCatalog;
use crate::validation::{self, Field, FieldError, ValidationResult, MAX_GROUP_SIZE};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::{info, instrument, warn};

type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// How long an issued checkout session is handed back on resume.
/// Hosted checkout sessions expire after 24 hours by default.
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Session created for a booking, with the subject that owns it
#[derive(Debug, Clone)]
struct IssuedSession {
    subject: String,
    handle: PaymentSessionHandle,
}

impl IssuedSession {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.handle.created_at >= ttl
    }
}

pub struct Coordinator {
    store: BoxedBookingStore,
    payments: BoxedPaymentInitiator,
    catalog: TourCatalog,
    today: Clock,
    session_ttl: Duration,
    sessions: RwLock<HashMap<BookingId, IssuedSession>>,
    in_flight: SubjectLocks,
}

impl Coordinator {
    pub fn new(
        store: BoxedBookingStore,
        payments: BoxedPaymentInitiator,
        catalog: TourCatalog,
    ) -> Self {
        Self {
            store,
            payments,
            catalog,
            today: Arc::new(|| Utc::now().date_naive()),
            session_ttl: Duration::hours(DEFAULT_SESSION_TTL_HOURS),
            sessions: RwLock::new(HashMap::new()),
            in_flight: SubjectLocks::default(),
        }
    }

    /// Builder: replace the date source used for "not in the past" checks
    pub fn with_clock(mut self, today: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        self.today = Arc::new(today);
        self
    }

    /// Builder: how long an issued session is reused before a new one is created
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn catalog(&self) -> &TourCatalog {
        &self.catalog
    }

    /// Submit `form` on behalf of `identity`.
    ///
    /// The form's per-booking fields are cleared once the booking store has
    /// confirmed the write, and left untouched on any earlier failure.
    #[instrument(skip_all, fields(tour = %form.tour_name))]
    pub async fn submit(
        &self,
        identity: Option<&Identity>,
        form: &mut BookingForm,
    ) -> SubmissionOutcome {
        let mut attempt = Attempt::new();

        let Some(identity) = identity else {
            info!("Rejecting booking without an authenticated identity");
            return attempt.finish(SubmissionOutcome::Unauthenticated);
        };

        let _in_flight = self.in_flight.acquire(&identity.subject).await;
        attempt.advance(SubmissionState::Validating);

        let request = form.to_request(identity);
        if let Err(reasons) = self.check(&request, &form.input_errors) {
            info!(
                subject = %identity.subject,
                invalid = reasons.len(),
                "Booking failed validation"
            );
            return attempt.finish(SubmissionOutcome::ValidationFailed { reasons });
        }

        attempt.advance(SubmissionState::Persisting);
        let record = match self.store.persist(identity, &request).await {
            Ok(record) => record,
            Err(error) => {
                warn!(subject = %identity.subject, "Failed to persist booking: {}", error);
                return attempt.finish(SubmissionOutcome::PersistenceFailed { error });
            }
        };

        info!(booking_id = %record.id, subject = %identity.subject, "Booking persisted");
        form.reset();

        self.initiate_payment(attempt, identity, &record).await
    }

    /// Create (or return the existing) payment session for a stored booking.
    ///
    /// Never persists anything, so it is safe to call after a
    /// `PaymentInitiationFailed` outcome or after the caller abandoned a
    /// submission mid-flight.
    #[instrument(skip_all, fields(booking_id = %booking_id))]
    pub async fn resume(
        &self,
        identity: Option<&Identity>,
        booking_id: &BookingId,
    ) -> SubmissionOutcome {
        let mut attempt = Attempt::new();

        let Some(identity) = identity else {
            return attempt.finish(SubmissionOutcome::Unauthenticated);
        };

        let _in_flight = self.in_flight.acquire(&identity.subject).await;

        if let Some(issued) = self.issued_session(booking_id).await {
            if issued.subject != identity.subject {
                warn!(subject = %identity.subject, "Booking belongs to another user");
                return attempt.finish(SubmissionOutcome::Unauthenticated);
            }
            info!(session_id = %issued.handle.session_id, "Payment session already issued");
            attempt.advance(SubmissionState::Persisting);
            attempt.advance(SubmissionState::InitiatingPayment);
            return attempt.finish(SubmissionOutcome::Success {
                redirect: issued.handle.redirect(),
            });
        }

        attempt.advance(SubmissionState::Persisting);
        let record = match self.store.fetch(identity, booking_id).await {
            Ok(record) => record,
            Err(error) => {
                warn!("Failed to load booking: {}", error);
                return attempt.finish(SubmissionOutcome::PersistenceFailed { error });
            }
        };

        if !record.belongs_to(identity) {
            warn!(subject = %identity.subject, "Booking belongs to another user");
            return attempt.finish(SubmissionOutcome::Unauthenticated);
        }

        self.initiate_payment(attempt, identity, &record).await
    }

    /// Price a party for the live estimate shown next to the form.
    /// The party size is clamped to `1..=MAX_GROUP_SIZE`.
    pub fn quote(&self, tour_name: &str, party_size: u32) -> Option<PriceBreakdown> {
        self.catalog
            .bookable(tour_name)
            .map(|tour| tour.quote(party_size.clamp(1, MAX_GROUP_SIZE)))
    }

    /// Field validation plus catalog lookup. Pure apart from the clock.
    ///
    /// An unreadable input replaces the reason validation gave for the
    /// same field, so each field still reports one reason.
    fn check(
        &self,
        request: &BookingRequest,
        input_errors: &[FieldError],
    ) -> Result<(), Vec<FieldError>> {
        let mut reasons = match validation::validate(request, (self.today)()) {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid(reasons) => reasons,
        };

        for input in input_errors {
            match reasons.iter_mut().find(|r| r.field == input.field) {
                Some(reason) => *reason = input.clone(),
                None => reasons.push(input.clone()),
            }
        }

        let tour_reported = reasons.iter().any(|r| r.field == Field::TourName);
        if !tour_reported && self.catalog.bookable(&request.tour_name).is_none() {
            reasons.push(FieldError::new(
                Field::TourName,
                format!("'{}' is not available for booking", request.tour_name),
            ));
        }

        if reasons.is_empty() {
            Ok(())
        } else {
            Err(reasons)
        }
    }

    /// Charge for a stored booking, derived from the catalog price and the
    /// record's own party size.
    fn charge_for(&self, record: &BookingRecord) -> Result<PriceBreakdown, PersistenceError> {
        let tour = self.catalog.bookable(&record.request.tour_name).ok_or_else(|| {
            PersistenceError::Rejected {
                status: None,
                reason: format!(
                    "stored booking references unavailable tour '{}'",
                    record.request.tour_name
                ),
            }
        })?;

        let party_size = record.request.party_size().ok_or_else(|| PersistenceError::Rejected {
            status: None,
            reason: "stored booking has no valid group size".to_string(),
        })?;

        Ok(tour.quote(party_size))
    }

    /// Live session for `booking_id`. Expired sessions are dropped.
    async fn issued_session(&self, booking_id: &BookingId) -> Option<IssuedSession> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, issued| !issued.is_expired(now, self.session_ttl));
        sessions.get(booking_id).cloned()
    }

    /// Runs from the `Persisting` state with a stored record in hand
    async fn initiate_payment(
        &self,
        mut attempt: Attempt,
        identity: &Identity,
        record: &BookingRecord,
    ) -> SubmissionOutcome {
        let breakdown = match self.charge_for(record) {
            Ok(breakdown) => breakdown,
            Err(error) => {
                warn!(booking_id = %record.id, "Cannot price stored booking: {}", error);
                return attempt.finish(SubmissionOutcome::PersistenceFailed { error });
            }
        };

        attempt.advance(SubmissionState::InitiatingPayment);

        if let Some(issued) = self.issued_session(&record.id).await {
            return attempt.finish(SubmissionOutcome::Success {
                redirect: issued.handle.redirect(),
            });
        }

        let request = PaymentSessionRequest {
            booking_id: record.id.clone(),
            amount: breakdown.total,
            description: record.request.tour_name.clone(),
            user_id: identity.subject.clone(),
        };

        info!(
            booking_id = %record.id,
            provider = self.payments.provider_name(),
            total = %breakdown.total,
            "Initiating payment session"
        );

        match self.payments.initiate(&request).await {
            Ok(handle) => {
                let redirect = handle.redirect();
                {
                    let now = Utc::now();
                    let mut sessions = self.sessions.write().await;
                    sessions.retain(|_, issued| !issued.is_expired(now, self.session_ttl));
                    sessions.insert(
                        record.id.clone(),
                        IssuedSession {
                            subject: identity.subject.clone(),
                            handle,
                        },
                    );
                }
                attempt.finish(SubmissionOutcome::Success { redirect })
            }
            Err(error) => {
                warn!(
                    booking_id = %record.id,
                    state = ?attempt.state(),
                    retryable = error.is_retryable(),
                    "Payment initiation failed: {}",
                    error
                );
                attempt.finish(SubmissionOutcome::PaymentInitiationFailed {
                    booking_id: record.id.clone(),
                    error,
                })
            }
        }
    }
}

/// One async lock per subject so a requester has at most one attempt in
/// flight. Later attempts queue behind the current one.
#[derive(Default)]
struct SubjectLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SubjectLocks {
    async fn acquire(&self, subject: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // entries nobody holds or waits on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(subject.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
