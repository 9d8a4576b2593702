//! Command-line interface parsing for the metamob demo binary
//!
//! Maps command-line flags onto a [`ManagerConfig`] and the demo's query
//! parameters.

use clap::Parser;

use crate::config::ManagerConfig;

/// Metamob CLI - cached, rate-gated queries against the metamob API
#[derive(Parser, Debug)]
#[command(name = "metamob")]
#[command(about = "Query the metamob API through a caching, rate-gating manager")]
#[command(version)]
pub struct Cli {
    /// Environment variable holding the metamob API key
    #[arg(long, value_name = "VAR", default_value = "MMTK")]
    pub token_var: String,

    /// Log the manager's decisions while it works
    #[arg(long)]
    pub verbose: bool,

    /// Start frozen: evaluate everything but send no requests
    #[arg(long)]
    pub frozen: bool,

    /// Maximum number of requests kept in the cache
    #[arg(long, value_name = "N", default_value_t = 60)]
    pub capacity: usize,

    /// Seconds before a cached response expires
    #[arg(long, value_name = "SECONDS", default_value_t = 120)]
    pub ttl: u64,

    /// Pseudo whose profile and monster listing are fetched
    #[arg(long, default_value = "Garfunk")]
    pub pseudo: String,

    /// Server name for the kralamoure calendar
    #[arg(long, default_value = "")]
    pub server: String,
}

impl Cli {
    /// Builds the manager configuration from the parsed flags
    pub fn to_config(&self) -> ManagerConfig {
        ManagerConfig {
            token_env_var: self.token_var.clone(),
            verbose: self.verbose,
            freeze: self.frozen,
            capacity_limit: self.capacity,
            ttl_seconds: self.ttl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_manager_defaults() {
        let cli = Cli::parse_from(["metamob"]);
        let config = cli.to_config();
        let defaults = ManagerConfig::default();

        assert_eq!(config.token_env_var, defaults.token_env_var);
        assert_eq!(config.verbose, defaults.verbose);
        assert_eq!(config.freeze, defaults.freeze);
        assert_eq!(config.capacity_limit, defaults.capacity_limit);
        assert_eq!(config.ttl_seconds, defaults.ttl_seconds);
    }

    #[test]
    fn test_cli_parses_all_flags() {
        let cli = Cli::parse_from([
            "metamob",
            "--token-var",
            "OTHER_TOKEN",
            "--verbose",
            "--frozen",
            "--capacity",
            "10",
            "--ttl",
            "30",
            "--pseudo",
            "Garfunk",
            "--server",
            "Tylezia",
        ]);

        assert_eq!(cli.token_var, "OTHER_TOKEN");
        assert!(cli.verbose);
        assert!(cli.frozen);
        assert_eq!(cli.capacity, 10);
        assert_eq!(cli.ttl, 30);
        assert_eq!(cli.pseudo, "Garfunk");
        assert_eq!(cli.server, "Tylezia");
    }

    #[test]
    fn test_to_config_carries_flags() {
        let cli = Cli::parse_from(["metamob", "--frozen", "--capacity", "5"]);
        let config = cli.to_config();

        assert!(config.freeze);
        assert_eq!(config.capacity_limit, 5);
    }
}
