//! Client side of the remote estimation service.
//!
//! Two read-only endpoints are consumed:
//! - `GET /simulate?postcode&kwp` → daily generation
//! - `GET /dispatch?postcode&kwp&cap_kwh&pow_kw&eta` → battery savings

pub mod client;
pub mod orchestrator;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::wizard::InputParameters;

pub use client::HttpEstimator;
pub use orchestrator::{DispatchOrchestrator, DispatchOutcome, Estimate, GENERIC_FAILURE};

/// Query string for `/simulate`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulateQuery {
    pub postcode: String,
    pub kwp: f64,
}

/// Query string for `/dispatch`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchQuery {
    pub postcode: String,
    pub kwp: f64,
    pub cap_kwh: f64,
    pub pow_kw: f64,
    pub eta: f64,
}

impl From<&InputParameters> for SimulateQuery {
    fn from(p: &InputParameters) -> Self {
        Self {
            postcode: p.postcode.trim().to_string(),
            kwp: p.array_kwp,
        }
    }
}

impl From<&InputParameters> for DispatchQuery {
    fn from(p: &InputParameters) -> Self {
        Self {
            postcode: p.postcode.trim().to_string(),
            kwp: p.array_kwp,
            cap_kwh: p.capacity_kwh,
            pow_kw: p.power_kw,
            eta: p.efficiency,
        }
    }
}

/// `/simulate` response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationEstimate {
    /// Estimated generation over one day (kWh).
    pub daily_kwh: f64,
}

/// `/dispatch` response body.
///
/// The service echoes extra fields (battery settings, slot tables); they are
/// ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEstimate {
    pub money_saved: f64,
    pub baseline_cost: f64,
    pub with_batt_cost: f64,
    pub kwh_shifted: f64,
    /// Set when live pricing was unavailable and a fallback tariff was used.
    #[serde(default)]
    pub fallback: bool,
}

/// Which endpoint a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Simulate,
    Dispatch,
}

impl Endpoint {
    /// Request path relative to the service base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Simulate => "/simulate",
            Endpoint::Dispatch => "/dispatch",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Why an estimation call failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ServiceError {
    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },
    #[error("{endpoint} request failed: {message}")]
    Transport { endpoint: Endpoint, message: String },
    #[error("{endpoint} response could not be decoded: {message}")]
    Decode { endpoint: Endpoint, message: String },
    #[error("cannot build HTTP client: {0}")]
    Client(String),
}

/// Remote estimator consumed by [`DispatchOrchestrator`].
///
/// Implementations must be cheap to call concurrently: the orchestrator
/// issues both requests before awaiting either.
pub trait EstimationService {
    fn simulate(
        &self,
        query: &SimulateQuery,
    ) -> impl Future<Output = Result<GenerationEstimate, ServiceError>> + Send;

    fn dispatch(
        &self,
        query: &DispatchQuery,
    ) -> impl Future<Output = Result<DispatchEstimate, ServiceError>> + Send;
}
