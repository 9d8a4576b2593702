//! Manager configuration

/// Configuration for a [`Manager`](crate::manager::Manager)
///
/// Immutable after construction except through the manager's explicit
/// state transitions (`freeze`, `defreeze`, `reload_token`).
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Name of the environment variable holding the metamob API key
    pub token_env_var: String,
    /// Whether the demo binary raises its log filter to debug
    pub verbose: bool,
    /// Whether the manager starts frozen (no outbound calls)
    pub freeze: bool,
    /// Maximum number of requests that can be cached at once
    pub capacity_limit: usize,
    /// Seconds a cached response stays live before it is purge-eligible
    pub ttl_seconds: u64,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            token_env_var: "MMTK".to_string(),
            verbose: false,
            freeze: false,
            capacity_limit: 60,
            ttl_seconds: 120,
        }
    }
}
