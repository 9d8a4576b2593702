//! Metamob client library
//!
//! A request-caching and rate-gating manager in front of the read-only
//! metamob HTTP API, plus the tackle break-even helpers.

pub mod cache;
pub mod cli;
pub mod config;
pub mod endpoints;
pub mod gate;
pub mod manager;
pub mod normalize;
pub mod tackle;
