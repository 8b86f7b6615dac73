// Test doubles for the resolver's collaborators - no side effects

use anyhow::{anyhow, Result};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;

use crate::errors::TranslationError;
use crate::i18n::Catalog;
use crate::workflow::actions::{ActionMap, ModalDescriptor};
use crate::workflow::deadline::ComplianceDeadline;
use crate::workflow::resolver::ActionResolver;
use crate::workflow::traits::*;
use crate::workflow::types::*;

/// Calls received by `RecordingOperations`
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Update(FormData),
    Delete,
    CreateSupplemental,
    CreateAnalystAdjustment,
    CreateIdirSupplemental,
}

/// Report operations that only record what they were asked to do
#[derive(Debug, Default)]
pub struct RecordingOperations {
    pub calls: RefCell<Vec<RecordedCall>>,
    pub failure: RefCell<Option<String>>,
}

impl RecordingOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_with(&self, message: &str) {
        *self.failure.borrow_mut() = Some(message.to_string());
    }

    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: RecordedCall) -> Result<()> {
        self.calls.borrow_mut().push(call);
        match self.failure.borrow().as_ref() {
            Some(message) => Err(anyhow!("{message}")),
            None => Ok(()),
        }
    }
}

impl ReportOperations for RecordingOperations {
    fn update_compliance_report(&self, payload: &FormData) -> Result<()> {
        self.record(RecordedCall::Update(payload.clone()))
    }

    fn delete_compliance_report(&self) -> Result<()> {
        self.record(RecordedCall::Delete)
    }

    fn create_supplemental_report(&self) -> Result<()> {
        self.record(RecordedCall::CreateSupplemental)
    }

    fn create_analyst_adjustment(&self) -> Result<()> {
        self.record(RecordedCall::CreateAnalystAdjustment)
    }

    fn create_idir_supplemental_report(&self) -> Result<()> {
        self.record(RecordedCall::CreateIdirSupplemental)
    }
}

/// Presenter keeping every dialog it was asked to open
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub modals: Vec<ModalDescriptor>,
}

impl ModalPresenter for RecordingPresenter {
    fn set_modal_data(&mut self, modal: ModalDescriptor) {
        self.modals.push(modal);
    }
}

/// Translator that knows no keys at all
#[derive(Debug, Default)]
pub struct EmptyTranslator;

impl Translate for EmptyTranslator {
    fn translate(&self, key: &str, _params: &[(&str, &str)]) -> Result<String, TranslationError> {
        Err(TranslationError::MissingKey {
            key: key.to_string(),
        })
    }
}

pub fn clock_at(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap())
}

pub fn now_clock() -> FixedClock {
    let now: DateTime<Utc> = Utc::now();
    FixedClock(now)
}

pub fn english() -> Catalog {
    Catalog::english().unwrap()
}

/// Resolve with the English catalog and default deadline
pub fn resolve_with(report: &ReportContext, roles: &dyn RoleCheck, clock: &dyn Clock) -> ActionMap {
    let catalog = english();
    ActionResolver::new(&catalog, clock, ComplianceDeadline::default())
        .resolve(report, roles)
        .unwrap()
}

pub fn ids(actions: &ActionMap, status: ReportStatus) -> Vec<&'static str> {
    actions
        .get(&status)
        .map(|buttons| buttons.iter().map(|b| b.id).collect())
        .unwrap_or_default()
}
