//! # Payment Sessions
//!
//! Handles returned by the payment subsystem and the redirect target handed
//! to the presentation layer.

use crate::booking::BookingId;
use crate::pricing::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the Coordinator asks the payment subsystem for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSessionRequest {
    /// Booking being paid for
    pub booking_id: BookingId,
    /// Charge total, always derived from the catalog price
    pub amount: Price,
    /// Human readable description (the tour name)
    pub description: String,
    /// Subject identifier of the payer
    pub user_id: String,
}

/// Payment session created for exactly one booking and one total
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSessionHandle {
    /// Provider's session ID
    pub session_id: String,

    /// Booking the session pays for
    pub booking_id: BookingId,

    /// Amount the session was created with
    pub amount: Price,

    /// Hosted checkout URL, when the provider returns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_url: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl PaymentSessionHandle {
    pub fn new(session_id: impl Into<String>, request: &PaymentSessionRequest) -> Self {
        Self {
            session_id: session_id.into(),
            booking_id: request.booking_id.clone(),
            amount: request.amount,
            checkout_url: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
        self.checkout_url = Some(url.into());
        self
    }

    /// Redirect target for the presentation layer
    pub fn redirect(&self) -> RedirectTarget {
        RedirectTarget {
            session_id: self.session_id.clone(),
            booking_id: self.booking_id.clone(),
            url: self.checkout_url.clone(),
        }
    }
}

/// Opaque reference used by the client to resume on the hosted checkout.
///
/// `session_id` is what the payment SDK's redirect call expects; `url` is
/// set when a direct hosted-checkout link is available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectTarget {
    pub session_id: String,
    pub booking_id: BookingId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_from_handle() {
        let request = PaymentSessionRequest {
            booking_id: BookingId::new("B1"),
            amount: Price::new(210.0),
            description: "Bali, Indonesia".into(),
            user_id: "alice".into(),
        };

        let handle = PaymentSessionHandle::new("cs_1", &request);
        let redirect = handle.redirect();

        assert_eq!(redirect.session_id, "cs_1");
        assert_eq!(redirect.booking_id, BookingId::new("B1"));
        assert!(redirect.url.is_none());

        let redirect = handle
            .with_checkout_url("https://checkout.example.com/c/cs_1")
            .redirect();
        assert_eq!(
            redirect.url.as_deref(),
            Some("https://checkout.example.com/c/cs_1")
        );
    }
}
