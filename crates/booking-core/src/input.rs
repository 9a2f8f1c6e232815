//! Raw form inputs.
//!
//! Browsers submit form controls as strings: an untouched date input is
//! `""`, a number input becomes `"2"` once edited. Values are read leniently
//! here; anything that cannot be read is kept as a [`FieldError`] so the
//! submission still ends in a validation outcome.

use crate::booking::BookingForm;
use crate::validation::{Field, FieldError};
use chrono::NaiveDate;
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Any JSON scalar a form control may produce
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Wire shape of a submitted form, before interpretation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawBookingForm {
    #[serde(default)]
    tour_name: Option<RawValue>,
    #[serde(default)]
    full_name: Option<RawValue>,
    #[serde(default)]
    phone: Option<RawValue>,
    #[serde(default)]
    book_at: Option<RawValue>,
    /// Absent means the default of one person; `null` means cleared
    #[serde(default = "one_person")]
    group_size: Option<RawValue>,
}

fn one_person() -> Option<RawValue> {
    Some(RawValue::Int(1))
}

impl From<RawBookingForm> for BookingForm {
    fn from(raw: RawBookingForm) -> Self {
        let mut errors = Vec::new();

        let tour_name = read(&mut errors, Field::TourName, text(raw.tour_name));
        let full_name = read(&mut errors, Field::FullName, text(raw.full_name));
        let phone = read(&mut errors, Field::Phone, text(raw.phone));
        let book_at = read(&mut errors, Field::BookAt, date(raw.book_at));
        let group_size = read(&mut errors, Field::GroupSize, count(raw.group_size));

        BookingForm {
            tour_name,
            full_name,
            phone,
            book_at,
            group_size,
            input_errors: errors,
        }
    }
}

fn read<T: Default>(errors: &mut Vec<FieldError>, field: Field, value: Result<T, String>) -> T {
    value.unwrap_or_else(|reason| {
        errors.push(FieldError::new(field, reason));
        T::default()
    })
}

fn text(value: Option<RawValue>) -> Result<String, String> {
    match value {
        None => Ok(String::new()),
        Some(RawValue::Text(s)) => Ok(s),
        Some(RawValue::Int(n)) => Ok(n.to_string()),
        Some(RawValue::Float(f)) => Ok(f.to_string()),
        Some(RawValue::Other(_)) => Err("must be text".to_string()),
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part. Empty means unset.
fn date(value: Option<RawValue>) -> Result<Option<NaiveDate>, String> {
    match value {
        None => Ok(None),
        Some(RawValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawValue::Text(s)) => s
            .trim()
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Some)
            .ok_or_else(|| format!("'{}' is not a date (expected YYYY-MM-DD)", s)),
        Some(_) => Err("date must be a YYYY-MM-DD string".to_string()),
    }
}

/// Whole numbers, as numbers or numeric strings. Empty means unset.
fn count(value: Option<RawValue>) -> Result<Option<i64>, String> {
    let whole = |f: f64| {
        if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
            Some(f as i64)
        } else {
            None
        }
    };
    let not_whole = |shown: &dyn std::fmt::Display| format!("'{}' is not a whole number", shown);

    match value {
        None => Ok(None),
        Some(RawValue::Int(n)) => Ok(Some(n)),
        Some(RawValue::Float(f)) => whole(f).map(Some).ok_or_else(|| not_whole(&f)),
        Some(RawValue::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(whole))
                .map(Some)
                .ok_or_else(|| not_whole(&s))
        }
        Some(RawValue::Other(_)) => Err("must be a whole number".to_string()),
    }
}
