//! Wires the wizard to the orchestrator and the presenter.
//!
//! The session owns all mutable state and is driven from one place (the UI
//! loop or the CLI). Runs execute on spawned tasks and report back over a
//! channel; outcomes are applied only through the controller, which drops
//! those of superseded runs.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::estimate::{DispatchOrchestrator, DispatchOutcome, EstimationService};
use crate::present::{ResultPresenter, ResultView};
use crate::wizard::{
    Advance, Field, InputError, InputParameters, RunId, RunTicket, WizardController, WizardView,
};

type Resolved = (RunId, DispatchOutcome);

/// One wizard activation: controller, presenter, and run plumbing.
pub struct Session<S> {
    controller: WizardController,
    presenter: ResultPresenter,
    orchestrator: Arc<DispatchOrchestrator<S>>,
    tx: mpsc::UnboundedSender<Resolved>,
    rx: mpsc::UnboundedReceiver<Resolved>,
    launched: usize,
}

impl<S> Session<S>
where
    S: EstimationService + Send + Sync + 'static,
{
    pub fn new(params: InputParameters, service: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            controller: WizardController::new(params),
            presenter: ResultPresenter::new(),
            orchestrator: Arc::new(DispatchOrchestrator::new(service)),
            tx,
            rx,
            launched: 0,
        }
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<(), InputError> {
        self.controller.set_field(field, raw)
    }

    /// Advances the wizard; on completion starts the run on a new task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn advance(&mut self) -> Advance {
        let advance = self.controller.advance();
        if let Advance::Completed(ticket) = &advance {
            self.launch(ticket.clone());
        }
        advance
    }

    fn launch(&mut self, ticket: RunTicket) {
        self.launched += 1;
        info!(id = %ticket.id, "launching estimation run");
        let orchestrator = Arc::clone(&self.orchestrator);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.run(ticket.params).await;
            // The receiver only goes away with the session.
            let _ = tx.send((ticket.id, outcome));
        });
    }

    /// Returns to the first step. In-flight runs keep going; their results
    /// will be ignored.
    pub fn restart(&mut self) {
        self.controller.restart();
        self.presenter.reset();
    }

    pub fn toggle_details(&mut self) {
        self.presenter.toggle_details();
    }

    /// Applies every outcome already received, without waiting.
    ///
    /// Returns how many were accepted (stale ones are discarded).
    pub fn drain_outcomes(&mut self) -> usize {
        let mut applied = 0;
        while let Ok((id, outcome)) = self.rx.try_recv() {
            if self.controller.apply_outcome(id, outcome) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next finished run and applies it.
    ///
    /// Returns the run id and whether it was accepted.
    pub async fn next_outcome(&mut self) -> Option<(RunId, bool)> {
        let (id, outcome) = self.rx.recv().await?;
        Some((id, self.controller.apply_outcome(id, outcome)))
    }

    /// Waits until the current completion has an outcome.
    ///
    /// Returns immediately when nothing is pending.
    pub async fn settle(&mut self) {
        while self.controller.is_loading() {
            if self.next_outcome().await.is_none() {
                return;
            }
        }
    }
}

impl<S> Session<S> {
    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn presenter(&self) -> &ResultPresenter {
        &self.presenter
    }

    pub fn service(&self) -> &S {
        self.orchestrator.service()
    }

    /// Number of runs started over the session's lifetime.
    pub fn runs_launched(&self) -> usize {
        self.launched
    }

    pub fn view(&self) -> WizardView<'_> {
        self.controller.view()
    }

    /// Formatted results, or `None` while a step is active.
    pub fn result_view(&self) -> Option<ResultView> {
        self.presenter.present_view(self.controller.view())
    }
}
