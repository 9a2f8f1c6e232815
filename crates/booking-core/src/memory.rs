//! In-process `BookingStore`, used for local runs and tests.

use crate::booking::{BookingId, BookingRecord, BookingRequest, Identity};
use crate::error::PersistenceError;
use crate::ports::BookingStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe in-memory booking store.
///
/// An identical request from the same user is rejected as a duplicate
/// submission, the way a real store's uniqueness constraint would.
#[derive(Default, Clone)]
pub struct InMemoryBookingStore {
    records: Arc<RwLock<HashMap<BookingId, BookingRecord>>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of persisted bookings
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Insert an existing record as-is
    pub async fn insert(&self, record: BookingRecord) {
        self.records.write().await.insert(record.id.clone(), record);
    }
}

#[async_trait]
impl BookingStore for InMemoryBookingStore {
    async fn persist(
        &self,
        _identity: &Identity,
        request: &BookingRequest,
    ) -> Result<BookingRecord, PersistenceError> {
        let mut records = self.records.write().await;

        if records.values().any(|r| &r.request == request) {
            return Err(PersistenceError::Rejected {
                status: Some(409),
                reason: "duplicate submission".to_string(),
            });
        }

        let id = BookingId::new(Uuid::new_v4().to_string());
        let record = BookingRecord::new(id, request.clone());
        records.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn fetch(
        &self,
        _identity: &Identity,
        id: &BookingId,
    ) -> Result<BookingRecord, PersistenceError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| PersistenceError::Rejected {
                status: Some(404),
                reason: format!("booking {} not found", id),
            })
    }
}
