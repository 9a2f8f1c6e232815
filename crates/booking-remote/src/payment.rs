//! # HTTP Payment Session Initiator
//!
//! Creates checkout sessions through the payment API's
//! `POST {base}/create-checkout-session` endpoint. The returned session id
//! is what the client-side payment SDK redirects with.

use crate::config::RemoteConfig;
use crate::http::{build_client, endpoint, error_reason};
use async_trait::async_trait;
use booking_core::{
    ConfigError, PaymentError, PaymentSessionHandle, PaymentSessionInitiator,
    PaymentSessionRequest,
};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

pub struct HttpPaymentInitiator {
    base_url: Url,
    checkout_redirect_url: Option<Url>,
    client: Client,
}

impl HttpPaymentInitiator {
    pub fn new(config: &RemoteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.payment_api_url.clone(),
            checkout_redirect_url: config.checkout_redirect_url.clone(),
            client: build_client(config.payment_timeout)?,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&RemoteConfig::from_env()?)
    }

    /// Hosted checkout link for a session: the provider's own URL when it
    /// returned one, else the configured redirect page.
    fn checkout_url(&self, session_id: &str, provider_url: Option<String>) -> Option<String> {
        provider_url.or_else(|| {
            self.checkout_redirect_url.as_ref().map(|base| {
                let mut url = base.clone();
                url.query_pairs_mut().append_pair("session_id", session_id);
                url.to_string()
            })
        })
    }
}

#[async_trait]
impl PaymentSessionInitiator for HttpPaymentInitiator {
    #[instrument(
        skip(self, request),
        fields(booking_id = %request.booking_id, amount = %request.amount)
    )]
    async fn initiate(
        &self,
        request: &PaymentSessionRequest,
    ) -> Result<PaymentSessionHandle, PaymentError> {
        if !request.amount.is_positive() {
            return Err(PaymentError::GatewayRejected {
                status: None,
                reason: format!("amount must be positive, got {}", request.amount),
            });
        }

        let url = endpoint(&self.base_url, &["create-checkout-session"]).ok_or_else(|| {
            PaymentError::GatewayUnreachable(format!("invalid payment API URL {}", self.base_url))
        })?;

        let body = CheckoutSessionBody {
            amount: request.amount.to_amount_string(),
            tour_name: &request.description,
            user_id: &request.user_id,
            booking_id: request.booking_id.as_str(),
        };

        debug!("Creating checkout session: amount={}", body.amount);

        let response = self
            .client
            .post(url)
            .header("Idempotency-Key", request.booking_id.as_str())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            error!("Payment API error: status={}, body={}", status, text);
            return Err(PaymentError::GatewayRejected {
                status: Some(status.as_u16()),
                reason: error_reason(&text),
            });
        }

        let session: CheckoutSessionResponse =
            serde_json::from_str(&text).map_err(|e| PaymentError::GatewayRejected {
                status: Some(status.as_u16()),
                reason: format!("unreadable session response: {}", e),
            })?;

        if session.id.trim().is_empty() {
            return Err(PaymentError::GatewayRejected {
                status: Some(status.as_u16()),
                reason: "session response has an empty id".to_string(),
            });
        }

        info!("Created checkout session: id={}", session.id);

        let mut handle = PaymentSessionHandle::new(session.id, request);
        handle.checkout_url = self.checkout_url(&handle.session_id, session.url);
        Ok(handle)
    }

    fn provider_name(&self) -> &'static str {
        "checkout-api"
    }
}

fn transport_error(e: reqwest::Error) -> PaymentError {
    if e.is_timeout() {
        PaymentError::Timeout(e.to_string())
    } else {
        PaymentError::GatewayUnreachable(e.to_string())
    }
}

// =============================================================================
// Payment API Types
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutSessionBody<'a> {
    /// Two-decimal string, e.g. "210.00"
    amount: String,
    tour_name: &'a str,
    user_id: &'a str,
    booking_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    #[serde(default)]
    url: Option<String>,
}
