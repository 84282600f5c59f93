use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::DefaultsConfig;
use crate::wizard::InputParameters;

/// Solar + battery savings estimator.
#[derive(Debug, Parser)]
#[command(name = "sunsave", version)]
pub struct Cli {
    /// Load configuration from a TOML file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the log filter (e.g. `debug`, `sunsave=trace`).
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive wizard (default).
    Wizard(WizardArgs),
    /// Run one estimate non-interactively and print the result.
    Estimate(EstimateArgs),
}

#[derive(Debug, Clone, Args)]
pub struct WizardArgs {
    /// Page to start on: `/` for the base page, `/tool` for the open wizard.
    #[arg(long, default_value = "/tool")]
    pub route: String,
}

impl Default for WizardArgs {
    fn default() -> Self {
        Self {
            route: "/tool".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct EstimateArgs {
    /// Site postcode.
    #[arg(long)]
    pub postcode: Option<String>,
    /// Array size in kWp.
    #[arg(long)]
    pub kwp: Option<f64>,
    /// Battery capacity in kWh.
    #[arg(long)]
    pub cap_kwh: Option<f64>,
    /// Battery power limit in kW.
    #[arg(long)]
    pub pow_kw: Option<f64>,
    /// Round-trip efficiency (0.5-1.0).
    #[arg(long)]
    pub eta: Option<f64>,
    /// Print the raw outcome as JSON.
    #[arg(long)]
    pub json: bool,
}

impl EstimateArgs {
    /// Flags layered over configured defaults.
    pub fn params(&self, defaults: &DefaultsConfig) -> InputParameters {
        let base = defaults.to_params();
        InputParameters {
            postcode: self.postcode.clone().unwrap_or(base.postcode),
            array_kwp: self.kwp.unwrap_or(base.array_kwp),
            capacity_kwh: self.cap_kwh.unwrap_or(base.capacity_kwh),
            power_kw: self.pow_kw.unwrap_or(base.power_kw),
            efficiency: self.eta.unwrap_or(base.efficiency),
        }
    }
}
