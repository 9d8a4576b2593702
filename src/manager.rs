//! Fetch orchestrator for the metamob API
//!
//! `Manager` owns the cache store and the HTTP client and exposes the single
//! public operation "perform or short-circuit a request": purge expired
//! records, run the admission gate, and only then address the provider.
//! Skipped calls report a sentinel code; real calls report the provider's
//! HTTP status.

use std::env;
use std::fmt;

use chrono::{Duration, Utc};
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use crate::cache::{CacheRecord, CacheStore};
use crate::config::ManagerConfig;
use crate::endpoints::{Endpoint, EndpointError};
use crate::gate::{self, SkipReason, Verdict};
use crate::normalize;

/// The metamob API domain
pub const BASE_URL: &str = "https://api.metamob.fr";

/// Header carrying the API key on every request
const API_KEY_HEADER: &str = "HTTP-X-APIKEY";

/// Default query suffix for monster listings
pub const ARCHIMONSTER_FILTER: &str = "?type=archimonstre";

/// Errors that can occur during a fetch
///
/// Skipped calls are not errors; they come back as a [`FetchOutcome`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The transport call itself failed (connection, TLS, decoding)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint could not be resolved to a request path
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Result of a fetch: either a short-circuit or a completed transport call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The call was skipped; no request went out
    Skipped(SkipReason),
    /// The call went out; carries the provider's HTTP status
    Completed(u16),
}

impl FetchOutcome {
    /// The integer result code: 901/902/903 for skips, the real HTTP
    /// status otherwise
    pub fn code(&self) -> u16 {
        match self {
            FetchOutcome::Skipped(reason) => reason.code(),
            FetchOutcome::Completed(status) => *status,
        }
    }

    /// Whether the call was short-circuited
    pub fn is_skip(&self) -> bool {
        matches!(self, FetchOutcome::Skipped(_))
    }
}

/// Request-caching and rate-gating manager for the metamob API
///
/// Owns its cache exclusively; not designed for concurrent mutation. A
/// multi-threaded host must serialize the whole purge-check-append sequence
/// behind a lock, since splitting it reintroduces duplicate-cache races.
pub struct Manager {
    config: ManagerConfig,
    api_key: Option<String>,
    http_client: Client,
    base_url: String,
    store: CacheStore,
}

impl Manager {
    /// Creates a manager addressing the real metamob API
    ///
    /// The API key is read once from the environment variable named by
    /// `config.token_env_var`; use [`reload_token`](Self::reload_token) to
    /// re-read it later.
    pub fn new(config: ManagerConfig) -> Self {
        Self::with_base_url(config, BASE_URL)
    }

    /// Creates a manager addressing a custom base URL
    ///
    /// Useful for pointing the manager at a local test server.
    pub fn with_base_url(config: ManagerConfig, base_url: impl Into<String>) -> Self {
        let api_key = env::var(&config.token_env_var).ok();
        Self {
            config,
            api_key,
            http_client: Client::new(),
            base_url: base_url.into(),
            store: CacheStore::new(),
        }
    }

    fn ttl(&self) -> Duration {
        Duration::seconds(self.config.ttl_seconds as i64)
    }

    /// Whether the manager is refusing outbound calls
    pub fn is_frozen(&self) -> bool {
        self.config.freeze
    }

    /// Refrains the manager from sending requests and purging the cache
    pub fn freeze(&mut self) {
        self.config.freeze = true;
    }

    /// Lets the manager send requests again
    pub fn defreeze(&mut self) {
        self.config.freeze = false;
    }

    /// Re-reads the API key from a (possibly different) environment variable
    pub fn reload_token(&mut self, token_env_var: impl Into<String>) {
        self.config.token_env_var = token_env_var.into();
        self.api_key = env::var(&self.config.token_env_var).ok();
    }

    /// Maximum number of requests that can be cached
    pub fn capacity_limit(&self) -> usize {
        self.config.capacity_limit
    }

    /// Number of requests currently cached
    pub fn cached_len(&self) -> usize {
        self.store.len()
    }

    /// Whether `additional` more requests would fit under the capacity limit
    ///
    /// Read-only pre-flight check for a batch of fetches; mutates nothing.
    pub fn can_handle(&self, additional: usize) -> bool {
        gate::can_handle(&self.store, self.config.capacity_limit, additional)
    }

    /// Performs or short-circuits a request against the metamob API
    ///
    /// Pipeline: freeze check, purge of expired records, path resolution,
    /// admission gate, transport call, per-endpoint normalization, cache
    /// append. The freeze check comes first: a frozen manager performs no
    /// purge and no store mutation at all.
    ///
    /// # Arguments
    /// * `endpoint` - The resource to address
    /// * `filter` - Query suffix appended to the resolved path (may be empty)
    /// * `pseudo` - User pseudo for the user-scoped endpoints
    /// * `id` - Resource id for the id-scoped endpoints
    ///
    /// # Returns
    /// * `Ok(FetchOutcome::Skipped(_))` - Frozen (901), cache hit (902) or
    ///   over capacity (903); nothing was sent
    /// * `Ok(FetchOutcome::Completed(status))` - The provider's real HTTP
    ///   status; a record was appended to the cache (with an empty payload
    ///   for non-2xx responses)
    /// * `Err(FetchError)` - Unresolvable endpoint or transport failure;
    ///   nothing was cached
    pub async fn fetch(
        &mut self,
        endpoint: Endpoint,
        filter: &str,
        pseudo: Option<&str>,
        id: Option<u64>,
    ) -> Result<FetchOutcome, FetchError> {
        if self.config.freeze {
            debug!("manager is frozen, skipping {}", endpoint.name());
            return Ok(FetchOutcome::Skipped(SkipReason::Frozen));
        }

        let before = self.store.len();
        self.store.purge_expired(Utc::now(), self.ttl());
        debug!(
            "purged {} expired requests, {} left cached",
            before - self.store.len(),
            self.store.len()
        );

        let request_key = format!("{}{}", endpoint.resolve(pseudo, id)?, filter);

        match gate::admit(
            self.config.freeze,
            &self.store,
            self.config.capacity_limit,
            &request_key,
        ) {
            Verdict::Skip(reason) => {
                debug!("{}: skipping {}", reason, request_key);
                return Ok(FetchOutcome::Skipped(reason));
            }
            Verdict::Proceed => {}
        }

        let url = format!("{}{}", self.base_url, request_key);
        info!("addressing metamob API with GET {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(ref key) = self.api_key {
            request = request.header(API_KEY_HEADER, key.as_str());
        }
        let response = request.send().await?;

        let status = response.status();
        let fetched_at = Utc::now();
        debug!("metamob responded with status {}", status.as_u16());

        let payload = if status.is_success() {
            let raw: Value = response.json().await?;
            normalize::normalize(endpoint, raw)
        } else {
            Value::Array(Vec::new())
        };

        self.store.append(CacheRecord {
            request_key,
            timestamp: fetched_at,
            status_code: status.as_u16(),
            payload,
        });

        Ok(FetchOutcome::Completed(status.as_u16()))
    }

    /// Shortcut: fetch a user's profile
    pub async fn fetch_user(&mut self, pseudo: &str) -> Result<FetchOutcome, FetchError> {
        self.fetch(Endpoint::User, "", Some(pseudo), None).await
    }

    /// Shortcut: fetch a user's archmonster listing
    pub async fn fetch_user_monsters(&mut self, pseudo: &str) -> Result<FetchOutcome, FetchError> {
        self.fetch(Endpoint::UserMonsters, ARCHIMONSTER_FILTER, Some(pseudo), None)
            .await
    }

    /// Shortcut: fetch the kralamoure calendar for a server
    pub async fn fetch_krala(&mut self, server: &str) -> Result<FetchOutcome, FetchError> {
        let filter = format!("?serveur={}", server);
        self.fetch(Endpoint::Kralas, &filter, None, None).await
    }

    /// Shortcut: fetch the archmonster compendium
    pub async fn fetch_monsters(&mut self) -> Result<FetchOutcome, FetchError> {
        self.fetch(Endpoint::Monsters, ARCHIMONSTER_FILTER, None, None)
            .await
    }

    /// All cached records, in insertion order
    pub fn records(&self) -> &[CacheRecord] {
        self.store.records()
    }

    /// Cached payloads from the given user's monster listings
    pub fn user_monsters_data(&self, pseudo: &str) -> Vec<&Value> {
        let key = match Endpoint::UserMonsters.resolve(Some(pseudo), None) {
            Ok(key) => key,
            Err(_) => return Vec::new(),
        };
        self.payloads_matching(&key)
    }

    /// Cached payloads from kralamoure calendar requests
    pub fn krala_data(&self) -> Vec<&Value> {
        match Endpoint::Kralas.resolve(None, None) {
            Ok(key) => self.payloads_matching(&key),
            Err(_) => Vec::new(),
        }
    }

    /// Cached payloads from monster compendium requests
    pub fn monster_data(&self) -> Vec<&Value> {
        match Endpoint::Monsters.resolve(None, None) {
            Ok(key) => self.payloads_matching(&key),
            Err(_) => Vec::new(),
        }
    }

    fn payloads_matching(&self, key: &str) -> Vec<&Value> {
        self.store
            .filter(|record| record.request_key.contains(key))
            .into_iter()
            .map(|record| &record.payload)
            .collect()
    }
}

impl fmt::Display for Manager {
    /// Renders the cache as a table: request key, age in seconds (or
    /// `expired`), response status, payload size
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let now = Utc::now();
        write!(f, " --- METAMOB API --- ")?;
        write!(
            f,
            "\n\t{:<60}{:>7}{:>8}{:>8}",
            "url", "t", "resp", "size"
        )?;
        for record in self.store.records() {
            let age = if record.is_expired(now, self.ttl()) {
                "expired".to_string()
            } else {
                (now - record.timestamp).num_seconds().to_string()
            };
            write!(
                f,
                "\n\t{:<60}{:>7}{:>8}{:>8}",
                record.request_key,
                age,
                record.status_code,
                record.payload_size()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_manager(config: ManagerConfig) -> Manager {
        // Points at a closed port; tests below never reach the transport.
        Manager::with_base_url(config, "http://127.0.0.1:9")
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(FetchOutcome::Skipped(SkipReason::Frozen).code(), 901);
        assert_eq!(FetchOutcome::Skipped(SkipReason::CacheHit).code(), 902);
        assert_eq!(FetchOutcome::Skipped(SkipReason::Overloaded).code(), 903);
        assert_eq!(FetchOutcome::Completed(404).code(), 404);
        assert!(FetchOutcome::Skipped(SkipReason::Frozen).is_skip());
        assert!(!FetchOutcome::Completed(200).is_skip());
    }

    #[tokio::test]
    async fn test_frozen_manager_skips_without_touching_the_store() {
        let config = ManagerConfig {
            freeze: true,
            ..Default::default()
        };
        let mut manager = offline_manager(config);

        let outcome = manager.fetch_monsters().await.unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::Frozen));
        assert_eq!(manager.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_defreeze_reenables_the_pipeline() {
        let config = ManagerConfig {
            freeze: true,
            capacity_limit: 0,
            ..Default::default()
        };
        let mut manager = offline_manager(config);

        assert_eq!(manager.fetch_monsters().await.unwrap().code(), 901);

        // With capacity 0 the gate now answers instead of the freeze check.
        manager.defreeze();
        assert_eq!(manager.fetch_monsters().await.unwrap().code(), 903);

        manager.freeze();
        assert_eq!(manager.fetch_monsters().await.unwrap().code(), 901);
    }

    #[tokio::test]
    async fn test_zero_capacity_skips_before_transport() {
        let config = ManagerConfig {
            capacity_limit: 0,
            ..Default::default()
        };
        let mut manager = offline_manager(config);

        let outcome = manager.fetch_user("Garfunk").await.unwrap();

        assert_eq!(outcome, FetchOutcome::Skipped(SkipReason::Overloaded));
        assert_eq!(manager.cached_len(), 0);
    }

    #[tokio::test]
    async fn test_missing_parameter_surfaces_as_endpoint_error() {
        let mut manager = offline_manager(ManagerConfig::default());

        let err = manager
            .fetch(Endpoint::User, "", None, None)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Endpoint(_)));
        assert_eq!(manager.cached_len(), 0);
    }

    #[test]
    fn test_can_handle_against_capacity() {
        let config = ManagerConfig {
            capacity_limit: 4,
            ..Default::default()
        };
        let manager = offline_manager(config);

        assert!(manager.can_handle(4));
        assert!(!manager.can_handle(5));
    }

    #[test]
    fn test_reload_token_rereads_environment() {
        let mut manager = offline_manager(ManagerConfig::default());

        env::set_var("METAMOB_TEST_RELOAD_TOKEN", "s3cret");
        manager.reload_token("METAMOB_TEST_RELOAD_TOKEN");

        assert_eq!(manager.api_key.as_deref(), Some("s3cret"));
        env::remove_var("METAMOB_TEST_RELOAD_TOKEN");
    }

    #[test]
    fn test_display_renders_header_and_rows() {
        let mut manager = offline_manager(ManagerConfig::default());
        manager.store.append(CacheRecord {
            request_key: "/monstres?type=archimonstre".to_string(),
            timestamp: Utc::now(),
            status_code: 200,
            payload: serde_json::json!([{"name": "Bow Wow"}]),
        });

        let table = manager.to_string();

        assert!(table.contains("METAMOB API"));
        assert!(table.contains("/monstres?type=archimonstre"));
        assert!(table.contains("200"));
    }

    #[test]
    fn test_display_marks_expired_records() {
        let config = ManagerConfig {
            ttl_seconds: 60,
            ..Default::default()
        };
        let mut manager = offline_manager(config);
        manager.store.append(CacheRecord {
            request_key: "/serveurs".to_string(),
            timestamp: Utc::now() - Duration::seconds(3600),
            status_code: 200,
            payload: serde_json::json!([]),
        });

        assert!(manager.to_string().contains("expired"));
    }
}
