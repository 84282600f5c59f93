//! Ordered step definitions for the questionnaire.

use super::params::{Field, InputParameters};

/// Minimum trimmed postcode length accepted by the location step.
pub const MIN_POSTCODE_LEN: usize = 5;

/// Accepted round-trip efficiency range (inclusive).
pub const EFFICIENCY_RANGE: std::ops::RangeInclusive<f64> = 0.5..=1.0;

/// A single question: what to ask, which fields to edit, when to let the user on.
#[derive(Debug)]
pub struct StepDefinition {
    /// Question shown as the step heading.
    pub label: &'static str,
    /// One-line guidance under the heading.
    pub hint: &'static str,
    /// Fields the step's input renderer presents, in display order.
    pub fields: &'static [Field],
    validate: fn(&InputParameters) -> bool,
}

impl StepDefinition {
    /// Evaluates the step's validity predicate against current values.
    pub fn is_valid(&self, params: &InputParameters) -> bool {
        (self.validate)(params)
    }

    /// Returns `true` if `field` is edited on this step.
    pub fn edits(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

fn location_valid(p: &InputParameters) -> bool {
    p.postcode.trim().chars().count() >= MIN_POSTCODE_LEN
}

fn positive(v: f64) -> bool {
    v.is_finite() && v > 0.0
}

fn array_valid(p: &InputParameters) -> bool {
    positive(p.array_kwp)
}

fn battery_valid(p: &InputParameters) -> bool {
    positive(p.capacity_kwh) && positive(p.power_kw) && EFFICIENCY_RANGE.contains(&p.efficiency)
}

static STANDARD_STEPS: [StepDefinition; 3] = [
    StepDefinition {
        label: "Where is your home located?",
        hint: "Enter a UK postcode, e.g. EC2A 3AY.",
        fields: &[Field::Postcode],
        validate: location_valid,
    },
    StepDefinition {
        label: "How large is your solar array?",
        hint: "Nameplate rating in kilowatt-peak.",
        fields: &[Field::ArrayKwp],
        validate: array_valid,
    },
    StepDefinition {
        label: "What battery would you add?",
        hint: "Capacity and power must be positive; efficiency between 0.5 and 1.0.",
        fields: &[Field::CapacityKwh, Field::PowerKw, Field::Efficiency],
        validate: battery_valid,
    },
];

/// Fixed, ordered list of steps.
#[derive(Debug, Clone, Copy)]
pub struct StepRegistry {
    steps: &'static [StepDefinition],
}

impl StepRegistry {
    /// The location → array → battery questionnaire.
    pub fn standard() -> Self {
        Self {
            steps: &STANDARD_STEPS,
        }
    }

    /// Number of steps; also the index of the terminal state.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'static StepDefinition> {
        self.steps.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'static, StepDefinition> {
        self.steps.iter()
    }

    /// Button text for the step at `index`.
    pub fn action_label(&self, index: usize) -> &'static str {
        if index + 1 == self.len() {
            "Calculate"
        } else {
            "Next"
        }
    }

    /// Index of the first step whose predicate rejects `params`.
    pub fn first_invalid(&self, params: &InputParameters) -> Option<usize> {
        self.steps.iter().position(|s| !s.is_valid(params))
    }
}

impl Default for StepRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
