//! # Booking Types
//!
//! Requester identity, the editable booking form, and the persisted record.

use crate::input::RawBookingForm;
use crate::pricing::{self, Price, PriceBreakdown};
use crate::validation::{FieldError, MAX_GROUP_SIZE};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated requester, supplied by the session layer.
///
/// The token is opaque to this crate and is only forwarded to the booking
/// store as the caller's credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    /// Subject identifier (username)
    pub subject: String,
    /// Contact email
    pub email: String,
    /// Session token
    pub token: String,
}

impl Identity {
    pub fn new(
        subject: impl Into<String>,
        email: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            email: email.into(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("subject", &self.subject)
            .field("email", &self.email)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Durable booking identifier assigned by the booking store
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub String);

impl BookingId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BookingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A booking request as sent to the booking store.
///
/// Field names follow the store's camelCase wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Requester subject identifier
    #[serde(default)]
    pub user_id: String,
    /// Requester contact email
    #[serde(default)]
    pub user_email: String,
    /// Offering being booked
    #[serde(default)]
    pub tour_name: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
    /// Requested date
    #[serde(default)]
    pub book_at: Option<NaiveDate>,
    /// Number of people; at least 1 once validated
    #[serde(default)]
    pub group_size: Option<i64>,
}

impl BookingRequest {
    /// Validated party size. `None` while the request is not yet valid.
    pub fn party_size(&self) -> Option<u32> {
        self.group_size
            .and_then(|n| u32::try_from(n).ok())
            .filter(|n| (1..=MAX_GROUP_SIZE).contains(n))
    }
}

/// Editable booking form held by the presentation layer between submits.
///
/// Identity fields are not part of the form; they are bound from the
/// authenticated identity when the form is submitted. Deserialization
/// accepts the string values browsers send; values that cannot be read
/// are kept in `input_errors` and reported as validation reasons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawBookingForm")]
pub struct BookingForm {
    pub tour_name: String,
    pub full_name: String,
    pub phone: String,
    pub book_at: Option<NaiveDate>,
    pub group_size: Option<i64>,
    /// Submitted values that could not be read
    #[serde(skip)]
    pub input_errors: Vec<FieldError>,
}

fn default_group_size() -> Option<i64> {
    Some(1)
}

impl BookingForm {
    /// Empty form for a tour, group size defaulting to one person
    pub fn new(tour_name: impl Into<String>) -> Self {
        Self {
            tour_name: tour_name.into(),
            full_name: String::new(),
            phone: String::new(),
            book_at: None,
            group_size: default_group_size(),
            input_errors: Vec::new(),
        }
    }

    pub fn with_full_name(mut self, name: impl Into<String>) -> Self {
        self.full_name = name.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.book_at = Some(date);
        self
    }

    pub fn with_group_size(mut self, size: i64) -> Self {
        self.group_size = Some(size);
        self
    }

    /// Build the store request for `identity`
    pub fn to_request(&self, identity: &Identity) -> BookingRequest {
        BookingRequest {
            user_id: identity.subject.clone(),
            user_email: identity.email.clone(),
            tour_name: self.tour_name.clone(),
            full_name: self.full_name.clone(),
            phone: self.phone.clone(),
            book_at: self.book_at,
            group_size: self.group_size,
        }
    }

    /// Clear the per-booking fields, keeping the selected tour
    pub fn reset(&mut self) {
        self.full_name.clear();
        self.phone.clear();
        self.book_at = None;
        self.group_size = default_group_size();
        self.input_errors.clear();
    }

    /// Live estimate for display. A missing or non-positive group size
    /// is shown as one person, an oversized one as the largest group.
    pub fn estimate(&self, unit_price: Price) -> PriceBreakdown {
        let party = match self.group_size {
            Some(n) if n > i64::from(MAX_GROUP_SIZE) => MAX_GROUP_SIZE,
            Some(n) if n >= 1 => n as u32,
            _ => 1,
        };
        pricing::compute(unit_price, party)
    }
}

/// A booking persisted by the booking store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: BookingId,
    #[serde(flatten)]
    pub request: BookingRequest,
    pub created_at: DateTime<Utc>,
}

impl BookingRecord {
    pub fn new(id: BookingId, request: BookingRequest) -> Self {
        Self {
            id,
            request,
            created_at: Utc::now(),
        }
    }

    /// Whether this booking was made by `identity`
    pub fn belongs_to(&self, identity: &Identity) -> bool {
        self.request.user_id == identity.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::new("alice", "alice@example.com", "tok_alice")
    }

    #[test]
    fn test_form_binds_identity() {
        let form = BookingForm::new("Bali, Indonesia")
            .with_full_name("Alice Liddell")
            .with_phone("5550100")
            .with_group_size(3);

        let request = form.to_request(&alice());

        assert_eq!(request.user_id, "alice");
        assert_eq!(request.user_email, "alice@example.com");
        assert_eq!(request.tour_name, "Bali, Indonesia");
        assert_eq!(request.party_size(), Some(3));
    }

    #[test]
    fn test_reset_keeps_tour() {
        let mut form = BookingForm::new("Bali, Indonesia")
            .with_full_name("Alice Liddell")
            .with_phone("5550100")
            .with_date(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .with_group_size(4);

        form.reset();

        assert_eq!(form, BookingForm::new("Bali, Indonesia"));
        assert_eq!(form.group_size, Some(1));
    }

    #[test]
    fn test_estimate_treats_missing_size_as_one() {
        let mut form = BookingForm::new("x");
        form.group_size = None;
        assert_eq!(form.estimate(Price::new(100.0)).total, Price::new(105.0));

        let form = BookingForm::new("x").with_group_size(0);
        assert_eq!(form.estimate(Price::new(100.0)).party_size, 1);

        let form = BookingForm::new("x").with_group_size(2);
        assert_eq!(form.estimate(Price::new(100.0)).total, Price::new(210.0));

        let form = BookingForm::new("x").with_group_size(i64::MAX);
        assert_eq!(form.estimate(Price::new(100.0)).party_size, MAX_GROUP_SIZE);
    }

    #[test]
    fn test_party_size_rejects_out_of_range() {
        let mut request = BookingForm::new("x").to_request(&alice());
        request.group_size = Some(0);
        assert_eq!(request.party_size(), None);
        request.group_size = Some(-2);
        assert_eq!(request.party_size(), None);
        request.group_size = None;
        assert_eq!(request.party_size(), None);
        request.group_size = Some(i64::from(MAX_GROUP_SIZE) + 1);
        assert_eq!(request.party_size(), None);
        request.group_size = Some(i64::from(MAX_GROUP_SIZE));
        assert_eq!(request.party_size(), Some(MAX_GROUP_SIZE));
    }

    #[test]
    fn test_request_wire_format() {
        let request = BookingForm::new("Bali, Indonesia")
            .with_full_name("Alice Liddell")
            .with_phone("5550100")
            .with_date(NaiveDate::from_ymd_opt(2030, 5, 17).unwrap())
            .to_request(&alice());

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["userId"], "alice");
        assert_eq!(json["tourName"], "Bali, Indonesia");
        assert_eq!(json["bookAt"], "2030-05-17");
        assert_eq!(json["groupSize"], 1);
    }

    #[test]
    fn test_identity_debug_redacts_token() {
        let debug = format!("{:?}", alice());
        assert!(debug.contains("alice@example.com"));
        assert!(!debug.contains("tok_alice"));
    }
}
