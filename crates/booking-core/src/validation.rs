//! # Booking Validation
//!
//! Field checks run before any side effect. Every field is checked; for each
//! field only the first failing rule is reported.

use crate::booking::BookingRequest;
use chrono::NaiveDate;
use serde::Serialize;

/// Largest party accepted for a single booking
pub const MAX_GROUP_SIZE: u32 = 100;

/// Request field a validation reason refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Phone,
    BookAt,
    GroupSize,
    TourName,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "fullName",
            Field::Phone => "phone",
            Field::BookAt => "bookAt",
            Field::GroupSize => "groupSize",
            Field::TourName => "tourName",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a field was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub reason: String,
}

impl FieldError {
    pub fn new(field: Field, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Validate `request` against `today`. Pure; performs no I/O.
pub fn validate(request: &BookingRequest, today: NaiveDate) -> ValidationResult {
    let mut errors = Vec::new();

    if request.full_name.trim().is_empty() {
        errors.push(FieldError::new(Field::FullName, "full name is required"));
    }

    if request.phone.trim().is_empty() {
        errors.push(FieldError::new(Field::Phone, "phone is required"));
    }

    match request.book_at {
        None => errors.push(FieldError::new(Field::BookAt, "date is required")),
        Some(date) if date < today => errors.push(FieldError::new(
            Field::BookAt,
            format!("date must not be earlier than {}", today),
        )),
        Some(_) => {}
    }

    match request.group_size {
        None => errors.push(FieldError::new(Field::GroupSize, "group size is required")),
        Some(n) if n < 1 => errors.push(FieldError::new(
            Field::GroupSize,
            "group size must be at least 1",
        )),
        Some(n) if n > i64::from(MAX_GROUP_SIZE) => errors.push(FieldError::new(
            Field::GroupSize,
            format!("group size must be at most {}", MAX_GROUP_SIZE),
        )),
        Some(_) => {}
    }

    if request.tour_name.trim().is_empty() {
        errors.push(FieldError::new(Field::TourName, "tour is required"));
    }

    if errors.is_empty() {
        ValidationResult::Valid
    } else {
        ValidationResult::Invalid(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{BookingForm, Identity};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn valid_request() -> BookingRequest {
        BookingForm::new("Bali, Indonesia")
            .with_full_name("Alice Liddell")
            .with_phone("5550100")
            .with_date(today())
            .with_group_size(2)
            .to_request(&Identity::new("alice", "alice@example.com", "tok"))
    }

    fn fields(result: ValidationResult) -> Vec<Field> {
        match result {
            ValidationResult::Valid => Vec::new(),
            ValidationResult::Invalid(errors) => errors.into_iter().map(|e| e.field).collect(),
        }
    }

    #[test]
    fn test_valid_request() {
        assert!(validate(&valid_request(), today()).is_valid());
    }

    #[test]
    fn test_all_fields_reported_in_order() {
        let mut request = valid_request();
        request.full_name = "   ".into();
        request.phone = String::new();
        request.book_at = None;
        request.group_size = Some(0);

        assert_eq!(
            fields(validate(&request, today())),
            vec![Field::FullName, Field::Phone, Field::BookAt, Field::GroupSize]
        );
    }

    #[test]
    fn test_past_date_rejected() {
        let mut request = valid_request();
        request.book_at = today().pred_opt();

        let result = validate(&request, today());
        assert_eq!(fields(result.clone()), vec![Field::BookAt]);
        if let ValidationResult::Invalid(errors) = result {
            assert!(errors[0].reason.contains("2026-10-17"));
        }
    }

    #[test]
    fn test_group_size_rules() {
        let mut request = valid_request();

        request.group_size = None;
        assert_eq!(fields(validate(&request, today())), vec![Field::GroupSize]);

        request.group_size = Some(-3);
        assert_eq!(fields(validate(&request, today())), vec![Field::GroupSize]);

        request.group_size = Some(i64::MAX);
        assert_eq!(fields(validate(&request, today())), vec![Field::GroupSize]);

        request.group_size = Some(i64::from(MAX_GROUP_SIZE) + 1);
        let result = validate(&request, today());
        assert_eq!(fields(result.clone()), vec![Field::GroupSize]);
        if let ValidationResult::Invalid(errors) = result {
            assert!(errors[0].reason.contains("at most 100"));
        }

        request.group_size = Some(i64::from(MAX_GROUP_SIZE));
        assert!(validate(&request, today()).is_valid());

        request.group_size = Some(1);
        assert!(validate(&request, today()).is_valid());
    }

    #[test]
    fn test_missing_tour() {
        let mut request = valid_request();
        request.tour_name = String::new();
        assert_eq!(fields(validate(&request, today())), vec![Field::TourName]);
    }
}
