//! Periodic reachability monitoring for a fixed set of endpoints.

pub mod config;
pub mod monitoring;
