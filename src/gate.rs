//! Admission policy for outbound requests
//!
//! Decides whether a desired request should go out or be short-circuited.
//! Skips are normal control-flow outcomes, not errors: each reason carries a
//! sentinel code (901/902/903) so callers can tell a skipped call apart from
//! a genuine HTTP status. The provider never answers with a 9xx code.

use std::fmt;

use crate::cache::CacheStore;

/// Why an outbound request was skipped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The manager is frozen; no transport call is allowed
    Frozen,
    /// A live record with the same request key is already cached
    CacheHit,
    /// The cache is at capacity; the call is skipped to avoid
    /// provider-side rate limiting
    Overloaded,
}

impl SkipReason {
    /// The out-of-band code reported to callers for this skip
    pub fn code(&self) -> u16 {
        match self {
            SkipReason::Frozen => 901,
            SkipReason::CacheHit => 902,
            SkipReason::Overloaded => 903,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Frozen => write!(f, "manager is frozen"),
            SkipReason::CacheHit => write!(f, "request found in cache"),
            SkipReason::Overloaded => write!(f, "request stack is at capacity"),
        }
    }
}

/// Outcome of the admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Perform the transport call
    Proceed,
    /// Skip the transport call for the given reason
    Skip(SkipReason),
}

/// Evaluates the admission rules for a desired request
///
/// Rules are checked in a fixed order, first match wins:
/// frozen, then cache hit, then capacity. The store must already be purged
/// of expired records, otherwise a stale entry can masquerade as a hit.
pub fn admit(
    frozen: bool,
    store: &CacheStore,
    capacity_limit: usize,
    request_key: &str,
) -> Verdict {
    if frozen {
        return Verdict::Skip(SkipReason::Frozen);
    }
    if store.lookup(request_key).is_some() {
        return Verdict::Skip(SkipReason::CacheHit);
    }
    if store.len() >= capacity_limit {
        return Verdict::Skip(SkipReason::Overloaded);
    }
    Verdict::Proceed
}

/// Whether `additional` more requests would fit under the capacity limit
///
/// Read-only pre-flight check for batches; mutates nothing.
pub fn can_handle(store: &CacheStore, capacity_limit: usize, additional: usize) -> bool {
    store.len() + additional <= capacity_limit
}
