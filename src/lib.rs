//! Food-distribution sales assistant with rule-based message triage.
//!
//! The `triage` module decides when a customer message needs a human;
//! the `agent` module answers everything else from the catalog, the
//! canned FAQ and logistics texts, and the pricing rules. `http` exposes
//! both over a small axum service.

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod telemetry;
pub mod triage;
