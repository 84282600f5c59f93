//! Step sequencing, validation gate, and run bookkeeping.

use std::fmt;

use tracing::{debug, info};

use super::params::{Field, InputError, InputParameters};
use super::steps::{StepDefinition, StepRegistry};
use crate::estimate::DispatchOutcome;

/// Identifies one orchestration run.
///
/// Monotonic per controller; restarts never reuse an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

/// Handed out once per completion: which run to start, with which inputs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTicket {
    pub id: RunId,
    /// Inputs frozen at the moment the terminal step was reached.
    pub params: InputParameters,
}

/// Result of [`WizardController::advance`].
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// The active step's predicate failed; nothing changed.
    Blocked,
    /// Moved to the step at this index.
    Moved(usize),
    /// Reached the terminal state; the caller must start exactly this run.
    Completed(RunTicket),
    /// Already complete; nothing changed and no new run is due.
    AlreadyComplete,
}

/// Lifecycle of the run belonging to the current completion.
#[derive(Debug, Clone, PartialEq)]
pub enum RunState {
    Idle,
    Pending(RunId),
    Resolved(RunId, DispatchOutcome),
}

/// What the completion screen should show.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Completion<'a> {
    Pending,
    Resolved(&'a DispatchOutcome),
}

/// Discriminated view of the wizard for renderers.
#[derive(Debug, Clone, Copy)]
pub enum WizardView<'a> {
    Step {
        index: usize,
        total: usize,
        step: &'static StepDefinition,
        values: &'a InputParameters,
    },
    Complete(Completion<'a>),
}

/// Owns the step index, the inputs, and the run belonging to the current completion.
///
/// Every transition is an explicit method call. The index only moves forward
/// one step at a time through [`advance`](Self::advance) and only goes back
/// to zero through [`restart`](Self::restart).
#[derive(Debug)]
pub struct WizardController {
    registry: StepRegistry,
    params: InputParameters,
    index: usize,
    run: RunState,
    next_run: u64,
}

impl WizardController {
    /// Creates a controller on the first step of the standard questionnaire.
    pub fn new(params: InputParameters) -> Self {
        Self::with_registry(StepRegistry::standard(), params)
    }

    pub fn with_registry(registry: StepRegistry, params: InputParameters) -> Self {
        Self {
            registry,
            params,
            index: 0,
            run: RunState::Idle,
            next_run: 0,
        }
    }

    pub fn registry(&self) -> StepRegistry {
        self.registry
    }

    /// Current step index; equals the step count when complete.
    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn params(&self) -> &InputParameters {
        &self.params
    }

    pub fn run_state(&self) -> &RunState {
        &self.run
    }

    /// The step currently collecting input, if any.
    pub fn active_step(&self) -> Option<&'static StepDefinition> {
        self.registry.get(self.index)
    }

    pub fn is_complete(&self) -> bool {
        self.index == self.registry.len()
    }

    /// Whether [`advance`](Self::advance) would move forward right now.
    pub fn can_advance(&self) -> bool {
        self.active_step().is_some_and(|s| s.is_valid(&self.params))
    }

    /// Fraction of steps done, in `[0.0, 1.0]`.
    pub fn progress(&self) -> f64 {
        if self.registry.is_empty() {
            return 1.0;
        }
        self.index as f64 / self.registry.len() as f64
    }

    /// Edits one field of the active step.
    ///
    /// # Errors
    ///
    /// `InputError::NotEditable` if the field is not on the active step (or
    /// the wizard is complete); `InputError::NotANumber` if numeric text does
    /// not parse, in which case the field now blocks its step.
    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<(), InputError> {
        match self.active_step() {
            Some(step) if step.edits(field) => field.apply(&mut self.params, raw),
            _ => Err(InputError::NotEditable(field)),
        }
    }

    /// Moves to the next step if the active one is valid.
    ///
    /// Reaching the terminal index issues a fresh [`RunTicket`] and marks the
    /// run pending. Calling again while complete returns
    /// [`Advance::AlreadyComplete`], so a completion never starts two runs.
    pub fn advance(&mut self) -> Advance {
        let Some(step) = self.active_step() else {
            return Advance::AlreadyComplete;
        };
        if !step.is_valid(&self.params) {
            debug!(index = self.index, "advance blocked by validation");
            return Advance::Blocked;
        }

        self.index += 1;
        if !self.is_complete() {
            return Advance::Moved(self.index);
        }

        let id = RunId(self.next_run);
        self.next_run += 1;
        self.run = RunState::Pending(id);
        info!(%id, postcode = %self.params.postcode, kwp = self.params.array_kwp, "wizard complete");
        Advance::Completed(RunTicket {
            id,
            params: self.params.clone(),
        })
    }

    /// Records the outcome of run `id`.
    ///
    /// Returns `false` and leaves state untouched unless `id` is the pending
    /// run; outcomes of runs superseded by a restart are dropped here.
    pub fn apply_outcome(&mut self, id: RunId, outcome: DispatchOutcome) -> bool {
        match self.run {
            RunState::Pending(pending) if pending == id => {
                info!(%id, success = outcome.is_success(), "run resolved");
                self.run = RunState::Resolved(id, outcome);
                true
            }
            _ => {
                debug!(%id, "stale outcome ignored");
                false
            }
        }
    }

    /// Back to the first step, discarding any outcome or pending run.
    ///
    /// Entered values are kept so the user can re-run with small changes.
    pub fn restart(&mut self) {
        self.index = 0;
        self.run = RunState::Idle;
    }

    /// `true` while a run for the current completion is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.run, RunState::Pending(_))
    }

    pub fn outcome(&self) -> Option<&DispatchOutcome> {
        match &self.run {
            RunState::Resolved(_, outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn view(&self) -> WizardView<'_> {
        match self.active_step() {
            Some(step) => WizardView::Step {
                index: self.index,
                total: self.registry.len(),
                step,
                values: &self.params,
            },
            None => WizardView::Complete(match self.outcome() {
                Some(outcome) => Completion::Resolved(outcome),
                None => Completion::Pending,
            }),
        }
    }
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new(InputParameters::default())
    }
}
