//! Fan-out/fan-in over the two estimation endpoints.

use serde::Serialize;
use tracing::{info, warn};

use super::{DispatchQuery, EstimationService, SimulateQuery};
use crate::wizard::InputParameters;

/// Message shown for any estimation-service failure.
pub const GENERIC_FAILURE: &str = "Could not fetch an estimate. Please try again.";

/// Combined result of both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Estimate {
    /// Estimated daily PV generation (kWh).
    pub daily_generation_kwh: f64,
    /// `baseline_cost - with_battery_cost`.
    pub money_saved: f64,
    /// Daily cost without a battery.
    pub baseline_cost: f64,
    /// Daily cost with the battery dispatched.
    pub with_battery_cost: f64,
    /// Energy cycled through the battery (kWh).
    pub kwh_shifted: f64,
    /// The service priced the day with a fallback tariff.
    pub used_fallback_tariff: bool,
}

/// Outcome of one orchestration run.
///
/// Either both endpoints succeeded, or nothing numeric is exposed at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success(Estimate),
    Failure { message: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The estimate, if the run succeeded.
    pub fn estimate(&self) -> Option<&Estimate> {
        match self {
            Self::Success(e) => Some(e),
            Self::Failure { .. } => None,
        }
    }
}

/// Turns a parameter snapshot into a [`DispatchOutcome`].
///
/// Holds no state besides the service handle; every call to [`run`](Self::run)
/// is independent and never retried.
#[derive(Debug)]
pub struct DispatchOrchestrator<S> {
    service: S,
}

impl<S> DispatchOrchestrator<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &S {
        &self.service
    }
}

impl<S: EstimationService> DispatchOrchestrator<S> {
    /// Issues both estimation requests concurrently and joins them.
    ///
    /// Both futures are created before either is awaited and are polled on
    /// the same task, so wall time tracks the slower call. The run succeeds
    /// only if both calls succeed.
    pub async fn run(&self, params: InputParameters) -> DispatchOutcome {
        let simulate_q = SimulateQuery::from(&params);
        let dispatch_q = DispatchQuery::from(&params);

        let (generation, dispatch) = tokio::join!(
            self.service.simulate(&simulate_q),
            self.service.dispatch(&dispatch_q),
        );

        match (generation, dispatch) {
            (Ok(g), Ok(d)) => {
                info!(
                    daily_kwh = g.daily_kwh,
                    money_saved = d.money_saved,
                    fallback = d.fallback,
                    "estimate received"
                );
                DispatchOutcome::Success(Estimate {
                    daily_generation_kwh: g.daily_kwh,
                    money_saved: d.money_saved,
                    baseline_cost: d.baseline_cost,
                    with_battery_cost: d.with_batt_cost,
                    kwh_shifted: d.kwh_shifted,
                    used_fallback_tariff: d.fallback,
                })
            }
            (generation, dispatch) => {
                for err in [generation.err(), dispatch.err()].into_iter().flatten() {
                    warn!(error = %err, "estimation call failed");
                }
                DispatchOutcome::Failure {
                    message: GENERIC_FAILURE.to_string(),
                }
            }
        }
    }
}
