//! Cache module for completed API requests
//!
//! This module provides the in-memory request cache: one timestamped record
//! per completed transport call, purged on a TTL. The cache lives only for
//! the lifetime of the owning manager; there is no persistence across
//! process restarts.

mod store;

pub use store::{CacheRecord, CacheStore};
