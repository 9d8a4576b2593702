//! In-memory store of completed request records
//!
//! Holds one `CacheRecord` per transport call, in insertion order, with
//! age-based expiry. The store never enforces a capacity itself; admission
//! control is the request gate's job.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cached API response
///
/// Created only by the fetch pipeline after a completed transport call and
/// never mutated in place; expiry removes the whole record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheRecord {
    /// The resolved request path plus query suffix, used as the
    /// deduplication key
    pub request_key: String,
    /// When the transport call completed
    pub timestamp: DateTime<Utc>,
    /// The HTTP status the provider answered with
    pub status_code: u16,
    /// The normalized response payload (empty array for non-2xx responses)
    pub payload: Value,
}

impl CacheRecord {
    /// Whether the record is older than the given time-to-live
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.timestamp > ttl
    }

    /// Number of top-level elements in the payload
    ///
    /// Arrays report their length, objects their key count, scalars 0.
    pub fn payload_size(&self) -> usize {
        match &self.payload {
            Value::Array(items) => items.len(),
            Value::Object(fields) => fields.len(),
            _ => 0,
        }
    }
}

/// Ordered collection of request records
///
/// Lookup is an exact-match linear scan over the request keys. Callers must
/// purge before looking up so that a hit is only ever reported against a
/// non-expired record.
#[derive(Debug, Default)]
pub struct CacheStore {
    records: Vec<CacheRecord>,
}

impl CacheStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Removes every record older than `ttl`, preserving insertion order
    pub fn purge_expired(&mut self, now: DateTime<Utc>, ttl: Duration) {
        self.records.retain(|record| !record.is_expired(now, ttl));
    }

    /// Finds the record with exactly this request key, if any
    pub fn lookup(&self, request_key: &str) -> Option<&CacheRecord> {
        self.records
            .iter()
            .find(|record| record.request_key == request_key)
    }

    /// Adds a record unconditionally
    pub fn append(&mut self, record: CacheRecord) {
        self.records.push(record);
    }

    /// Returns the records matching a predicate, in insertion order
    pub fn filter<P>(&self, predicate: P) -> Vec<&CacheRecord>
    where
        P: Fn(&CacheRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| predicate(record))
            .collect()
    }

    /// All records, in insertion order
    pub fn records(&self) -> &[CacheRecord] {
        &self.records
    }
}
