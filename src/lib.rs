//! Guided solar + battery savings estimator.
//!
//! A three-step wizard collects a postcode, an array size and a battery
//! choice, then asks a remote estimation service for daily generation
//! and battery-dispatch savings in parallel and formats the combined result.

pub mod cli;
pub mod config;
/// Estimation service client, wire types and the request orchestrator.
pub mod estimate;
pub mod logging;
pub mod overlay;
pub mod present;
pub mod session;
#[cfg(feature = "tui")]
pub mod tui;
/// Step registry, wizard state machine and input parameters.
pub mod wizard;
