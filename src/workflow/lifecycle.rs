use serde::{Deserialize, Serialize};
use statig::prelude::*;

use crate::errors::TransitionError;
use crate::workflow::types::ReportStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportEvent {
    Submit,
    OpenAnalystAdjustment,
    RecommendByAnalyst,
    RecommendByManager,
    Assess,
    ReturnToAnalyst,
    ReturnToManager,
    ReturnToSupplier,
}

impl ReportEvent {
    /// Event that moves a report into `target`
    pub fn leading_to(target: ReportStatus) -> Result<Self, TransitionError> {
        let event = match target {
            ReportStatus::Submitted => ReportEvent::Submit,
            ReportStatus::AnalystAdjustment => ReportEvent::OpenAnalystAdjustment,
            ReportStatus::RecommendedByAnalyst => ReportEvent::RecommendByAnalyst,
            ReportStatus::RecommendedByManager => ReportEvent::RecommendByManager,
            ReportStatus::Assessed => ReportEvent::Assess,
            ReportStatus::ReturnedToAnalyst => ReportEvent::ReturnToAnalyst,
            ReportStatus::ReturnedToManager => ReportEvent::ReturnToManager,
            ReportStatus::ReturnedToSupplier => ReportEvent::ReturnToSupplier,
            ReportStatus::Draft => return Err(TransitionError::UnreachableStatus(target)),
        };
        Ok(event)
    }
}

/// Lifecycle of a single report version. Events that a state does not
/// handle leave it untouched.
pub struct ReportLifecycle {
    pub chain_id: u64,
    pub version: u32,
    status: ReportStatus,
}

impl ReportLifecycle {
    pub fn new(chain_id: u64, version: u32) -> Self {
        Self {
            chain_id,
            version,
            status: ReportStatus::Draft,
        }
    }

    pub fn status(&self) -> ReportStatus {
        self.status
    }

    fn enter(&mut self, status: ReportStatus, event: &ReportEvent) {
        tracing::info!(
            chain_id = %self.chain_id,
            version = %self.version,
            from = %self.status,
            to = %status,
            event = ?event,
            "Report status changed"
        );
        self.status = status;
    }
}

#[state_machine(initial = "State::draft()")]
impl ReportLifecycle {
    #[state]
    fn draft(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::Submit => {
                self.enter(ReportStatus::Submitted, event);
                Transition(State::submitted())
            }
            ReportEvent::OpenAnalystAdjustment => {
                self.enter(ReportStatus::AnalystAdjustment, event);
                Transition(State::analyst_adjustment())
            }
            _ => Handled,
        }
    }

    #[state]
    fn returned_to_supplier(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::Submit => {
                self.enter(ReportStatus::Submitted, event);
                Transition(State::submitted())
            }
            _ => Handled,
        }
    }

    #[state]
    fn submitted(&mut self, event: &ReportEvent) -> Outcome<State> {
        self.analyst_review(event)
    }

    #[state]
    fn returned_to_analyst(&mut self, event: &ReportEvent) -> Outcome<State> {
        self.analyst_review(event)
    }

    #[state]
    fn analyst_adjustment(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::RecommendByAnalyst => {
                self.enter(ReportStatus::RecommendedByAnalyst, event);
                Transition(State::recommended_by_analyst())
            }
            _ => Handled,
        }
    }

    #[state]
    fn recommended_by_analyst(&mut self, event: &ReportEvent) -> Outcome<State> {
        self.manager_review(event)
    }

    #[state]
    fn returned_to_manager(&mut self, event: &ReportEvent) -> Outcome<State> {
        self.manager_review(event)
    }

    #[state]
    fn recommended_by_manager(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::Assess => {
                self.enter(ReportStatus::Assessed, event);
                Transition(State::assessed())
            }
            ReportEvent::ReturnToManager => {
                self.enter(ReportStatus::ReturnedToManager, event);
                Transition(State::returned_to_manager())
            }
            _ => Handled,
        }
    }

    #[state]
    fn assessed(&mut self, event: &ReportEvent) -> Outcome<State> {
        tracing::debug!(chain_id = %self.chain_id, event = ?event, "Assessed reports are final");
        Handled
    }
}

impl ReportLifecycle {
    fn analyst_review(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::RecommendByAnalyst => {
                self.enter(ReportStatus::RecommendedByAnalyst, event);
                Transition(State::recommended_by_analyst())
            }
            ReportEvent::ReturnToSupplier => {
                self.enter(ReportStatus::ReturnedToSupplier, event);
                Transition(State::returned_to_supplier())
            }
            _ => Handled,
        }
    }

    fn manager_review(&mut self, event: &ReportEvent) -> Outcome<State> {
        match event {
            ReportEvent::RecommendByManager => {
                self.enter(ReportStatus::RecommendedByManager, event);
                Transition(State::recommended_by_manager())
            }
            ReportEvent::ReturnToAnalyst => {
                self.enter(ReportStatus::ReturnedToAnalyst, event);
                Transition(State::returned_to_analyst())
            }
            // Directors may assess straight from the analyst's recommendation
            ReportEvent::Assess => {
                self.enter(ReportStatus::Assessed, event);
                Transition(State::assessed())
            }
            _ => Handled,
        }
    }
}

/// Drive a lifecycle machine and report whether the event was accepted
pub fn apply_event(
    machine: &mut StateMachine<ReportLifecycle>,
    event: ReportEvent,
) -> Result<ReportStatus, TransitionError> {
    let from = machine.inner().status();
    machine.handle(&event);
    let to = machine.inner().status();

    if from == to {
        tracing::warn!(from = %from, event = ?event, "Rejected report transition");
        return Err(TransitionError::InvalidTransition { from, event });
    }
    Ok(to)
}
