//! Guided questionnaire: step definitions, inputs, and the controller.

pub mod controller;
pub mod params;
pub mod steps;

pub use controller::{Advance, Completion, RunId, RunState, RunTicket, WizardController, WizardView};
pub use params::{Field, InputError, InputParameters};
pub use steps::{StepDefinition, StepRegistry};
