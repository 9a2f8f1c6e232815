//! # HTTP Booking Store
//!
//! `BookingStore` over the booking service's REST API.
//!
//! - `POST {base}/booking` with the request as JSON
//! - `GET {base}/booking/{id}` to load an existing booking
//!
//! The caller's session token is attached as a bearer credential.

use crate::config::RemoteConfig;
use crate::http::{build_client, endpoint, error_reason};
use async_trait::async_trait;
use booking_core::{
    BookingId, BookingRecord, BookingRequest, BookingStore, ConfigError, Identity,
    PersistenceError,
};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, Response, Url};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

pub struct HttpBookingStore {
    base_url: Url,
    client: Client,
}

impl HttpBookingStore {
    pub fn new(config: &RemoteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: config.booking_store_url.clone(),
            client: build_client(config.store_timeout)?,
        })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(&RemoteConfig::from_env()?)
    }

    fn url(&self, segments: &[&str]) -> Result<Url, PersistenceError> {
        endpoint(&self.base_url, segments).ok_or_else(|| {
            PersistenceError::Unreachable(format!("invalid booking store URL {}", self.base_url))
        })
    }

    /// Read a response into a record, or the store's refusal
    async fn read_record(
        response: Response,
        sent: Option<&BookingRequest>,
    ) -> Result<BookingRecord, PersistenceError> {
        let status = response.status();
        let body = response.text().await.map_err(unreachable)?;

        if !status.is_success() {
            error!("Booking store error: status={}, body={}", status, body);
            return Err(PersistenceError::Rejected {
                status: Some(status.as_u16()),
                reason: error_reason(&body),
            });
        }

        let envelope: RecordEnvelope = serde_json::from_str(&body).map_err(|e| {
            PersistenceError::Rejected {
                status: Some(status.as_u16()),
                reason: format!("unreadable booking record: {}", e),
            }
        })?;

        Ok(envelope.into_inner().into_record(sent))
    }
}

#[async_trait]
impl BookingStore for HttpBookingStore {
    #[instrument(
        skip(self, identity, request),
        fields(tour = %request.tour_name, subject = %identity.subject)
    )]
    async fn persist(
        &self,
        identity: &Identity,
        request: &BookingRequest,
    ) -> Result<BookingRecord, PersistenceError> {
        let url = self.url(&["booking"])?;
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .bearer_auth(&identity.token)
            .json(request)
            .send()
            .await
            .map_err(unreachable)?;

        let record = Self::read_record(response, Some(request)).await?;
        info!("Booking store accepted booking: id={}", record.id);
        Ok(record)
    }

    #[instrument(skip(self, identity), fields(booking_id = %id))]
    async fn fetch(
        &self,
        identity: &Identity,
        id: &BookingId,
    ) -> Result<BookingRecord, PersistenceError> {
        let url = self.url(&["booking", id.as_str()])?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&identity.token)
            .send()
            .await
            .map_err(unreachable)?;

        Self::read_record(response, None).await
    }
}

fn unreachable(e: reqwest::Error) -> PersistenceError {
    if e.is_timeout() {
        PersistenceError::Unreachable(format!("timed out: {}", e))
    } else {
        PersistenceError::Unreachable(e.to_string())
    }
}

// =============================================================================
// Booking Store API Types
// =============================================================================

/// The store answers either with the record itself or `{"data": record}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordEnvelope {
    Wrapped { data: StoreRecord },
    Bare(StoreRecord),
}

impl RecordEnvelope {
    fn into_inner(self) -> StoreRecord {
        match self {
            RecordEnvelope::Wrapped { data } => data,
            RecordEnvelope::Bare(record) => record,
        }
    }
}

/// Record as returned by the store. Fields the store leaves out are
/// filled from the request that was sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoreRecord {
    #[serde(alias = "_id")]
    id: String,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    user_email: Option<String>,
    #[serde(default)]
    tour_name: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    phone: Option<serde_json::Value>,
    #[serde(default)]
    book_at: Option<serde_json::Value>,
    #[serde(default)]
    group_size: Option<serde_json::Value>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl StoreRecord {
    fn into_record(self, sent: Option<&BookingRequest>) -> BookingRecord {
        let fallback = |pick: fn(&BookingRequest) -> String| sent.map(pick).unwrap_or_default();

        let request = BookingRequest {
            user_id: self.user_id.unwrap_or_else(|| fallback(|r| r.user_id.clone())),
            user_email: self
                .user_email
                .unwrap_or_else(|| fallback(|r| r.user_email.clone())),
            tour_name: self
                .tour_name
                .unwrap_or_else(|| fallback(|r| r.tour_name.clone())),
            full_name: self
                .full_name
                .unwrap_or_else(|| fallback(|r| r.full_name.clone())),
            phone: self
                .phone
                .as_ref()
                .and_then(lenient_string)
                .unwrap_or_else(|| fallback(|r| r.phone.clone())),
            book_at: self
                .book_at
                .as_ref()
                .and_then(lenient_date)
                .or_else(|| sent.and_then(|r| r.book_at)),
            group_size: self
                .group_size
                .as_ref()
                .and_then(lenient_int)
                .or_else(|| sent.and_then(|r| r.group_size)),
        };

        BookingRecord {
            id: BookingId::new(self.id),
            request,
            created_at: self.created_at.unwrap_or_else(Utc::now),
        }
    }
}

/// Numbers and numeric strings (form inputs arrive as strings)
fn lenient_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part
fn lenient_date(value: &serde_json::Value) -> Option<NaiveDate> {
    let s = value.as_str()?;
    let date = s.get(..10)?;
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
