//! The five values the wizard collects, and the fields that edit them.

use std::fmt;

use serde::Serialize;

/// Inputs supplied to the estimation service.
///
/// Owned by [`WizardController`](super::controller::WizardController) and
/// edited only through the active step's fields. Values survive a restart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputParameters {
    /// UK postcode of the site.
    pub postcode: String,
    /// Solar array size (kWp).
    pub array_kwp: f64,
    /// Battery capacity (kWh).
    pub capacity_kwh: f64,
    /// Battery power limit (kW).
    pub power_kw: f64,
    /// Round-trip efficiency as a fraction.
    pub efficiency: f64,
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            postcode: "EC2A3AY".to_string(),
            array_kwp: 4.0,
            capacity_kwh: 5.0,
            power_kw: 3.0,
            efficiency: 0.92,
        }
    }
}

/// One editable input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Postcode,
    ArrayKwp,
    CapacityKwh,
    PowerKw,
    Efficiency,
}

impl Field {
    /// Every field, in wizard order.
    pub const ALL: [Field; 5] = [
        Field::Postcode,
        Field::ArrayKwp,
        Field::CapacityKwh,
        Field::PowerKw,
        Field::Efficiency,
    ];

    /// Label shown next to the input box.
    pub fn label(self) -> &'static str {
        match self {
            Field::Postcode => "Postcode",
            Field::ArrayKwp => "Array size (kWp)",
            Field::CapacityKwh => "Battery capacity (kWh)",
            Field::PowerKw => "Battery power (kW)",
            Field::Efficiency => "Round-trip efficiency",
        }
    }

    /// Returns `true` for fields holding a number rather than free text.
    pub fn is_numeric(self) -> bool {
        !matches!(self, Field::Postcode)
    }

    /// Current value of this field rendered as editable text.
    pub fn text(self, params: &InputParameters) -> String {
        match self {
            Field::Postcode => params.postcode.clone(),
            Field::ArrayKwp => params.array_kwp.to_string(),
            Field::CapacityKwh => params.capacity_kwh.to_string(),
            Field::PowerKw => params.power_kw.to_string(),
            Field::Efficiency => params.efficiency.to_string(),
        }
    }

    /// Writes raw text into the matching parameter.
    ///
    /// Numeric text that does not parse leaves NaN in the field, which no
    /// step predicate accepts, and reports [`InputError::NotANumber`].
    pub(crate) fn apply(self, params: &mut InputParameters, raw: &str) -> Result<(), InputError> {
        let slot = match self {
            Field::Postcode => {
                params.postcode = raw.to_string();
                return Ok(());
            }
            Field::ArrayKwp => &mut params.array_kwp,
            Field::CapacityKwh => &mut params.capacity_kwh,
            Field::PowerKw => &mut params.power_kw,
            Field::Efficiency => &mut params.efficiency,
        };
        match raw.trim().parse::<f64>() {
            Ok(v) => {
                *slot = v;
                Ok(())
            }
            Err(_) => {
                *slot = f64::NAN;
                Err(InputError::NotANumber {
                    field: self,
                    raw: raw.to_string(),
                })
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rejected edit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{field}: \"{raw}\" is not a number")]
    NotANumber { field: Field, raw: String },
    #[error("{0} is not editable on the current step")]
    NotEditable(Field),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_field_parses_trimmed_text() {
        let mut p = InputParameters::default();
        assert!(Field::ArrayKwp.apply(&mut p, " 6.5 ").is_ok());
        assert_eq!(p.array_kwp, 6.5);
    }

    #[test]
    fn unparseable_number_stores_nan() {
        let mut p = InputParameters::default();
        let err = Field::PowerKw.apply(&mut p, "abc").unwrap_err();
        assert!(matches!(err, InputError::NotANumber { field: Field::PowerKw, .. }));
        assert!(p.power_kw.is_nan());
    }

    #[test]
    fn postcode_is_stored_verbatim() {
        let mut p = InputParameters::default();
        Field::Postcode.apply(&mut p, "EC2A 3AY").unwrap();
        assert_eq!(p.postcode, "EC2A 3AY");
    }

    #[test]
    fn text_round_trips_defaults() {
        let p = InputParameters::default();
        assert_eq!(Field::Efficiency.text(&p), "0.92");
        assert_eq!(Field::ArrayKwp.text(&p), "4");
    }
}
