//! Turns a [`DispatchOutcome`] into display strings.

use std::fmt;

use crate::estimate::DispatchOutcome;
use crate::wizard::{Completion, WizardView};

/// Banner shown when the service priced the day with its fallback tariff.
pub const FALLBACK_NOTICE: &str = "Live tariff unavailable: estimate uses a fallback tariff.";

/// A currency amount split by sign: negative values are money earned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Money {
    Earned(f64),
    Cost(f64),
}

impl Money {
    pub fn from_signed(value: f64) -> Self {
        if value < 0.0 {
            Money::Earned(value.abs())
        } else {
            Money::Cost(value.abs())
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Money::Earned(v) => write!(f, "earned {v:.2}"),
            Money::Cost(v) => write!(f, "cost {v:.2}"),
        }
    }
}

/// `-3.21` → `"earned 3.21"`, `4.5` → `"cost 4.50"`.
pub fn format_money(value: f64) -> String {
    Money::from_signed(value).to_string()
}

/// Energy moved through the battery, one decimal: `"3.1 kWh"`.
pub fn format_energy(kwh: f64) -> String {
    format!("{kwh:.1} kWh")
}

/// Daily generation, two decimals: `"14.20 kWh"`.
pub fn format_generation(kwh: f64) -> String {
    format!("{kwh:.2} kWh")
}

/// Expanded breakdown behind the detail toggle.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub baseline: String,
    pub with_battery: String,
    pub shifted: String,
}

/// Formatted successful result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyView {
    pub generation: String,
    pub extra_savings: String,
    pub fallback_notice: Option<&'static str>,
    /// Present only while the detail panel is open.
    pub details: Option<DetailView>,
}

/// What the results area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Pending,
    Failed { message: String },
    Ready(ReadyView),
}

/// Formats outcomes and owns the detail-panel toggle.
///
/// The toggle is pure view state: flipping it never touches the outcome or
/// the wizard.
#[derive(Debug, Clone, Default)]
pub struct ResultPresenter {
    details_open: bool,
}

impl ResultPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn details_open(&self) -> bool {
        self.details_open
    }

    pub fn toggle_details(&mut self) {
        self.details_open = !self.details_open;
    }

    /// Collapses the detail panel.
    pub fn reset(&mut self) {
        self.details_open = false;
    }

    /// The "extra savings" figure: the outcome's money-saved field, as is.
    pub fn extra_savings(outcome: &DispatchOutcome) -> Option<f64> {
        outcome.estimate().map(|e| e.money_saved)
    }

    pub fn present(&self, outcome: &DispatchOutcome) -> ResultView {
        match outcome {
            DispatchOutcome::Failure { message } => ResultView::Failed {
                message: message.clone(),
            },
            DispatchOutcome::Success(e) => ResultView::Ready(ReadyView {
                generation: format_generation(e.daily_generation_kwh),
                extra_savings: format_money(e.money_saved),
                fallback_notice: e.used_fallback_tariff.then_some(FALLBACK_NOTICE),
                details: self.details_open.then(|| DetailView {
                    baseline: format_money(e.baseline_cost),
                    with_battery: format_money(e.with_battery_cost),
                    shifted: format_energy(e.kwh_shifted),
                }),
            }),
        }
    }

    /// Result view for the wizard, or `None` while a step is still active.
    pub fn present_view(&self, view: WizardView<'_>) -> Option<ResultView> {
        match view {
            WizardView::Step { .. } => None,
            WizardView::Complete(Completion::Pending) => Some(ResultView::Pending),
            WizardView::Complete(Completion::Resolved(outcome)) => Some(self.present(outcome)),
        }
    }
}
