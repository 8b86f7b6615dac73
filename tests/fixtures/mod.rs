//! Shared fixtures for integration tests

#![allow(dead_code)]

use anyhow::Result;
use chrono::{TimeZone, Utc};
use std::cell::RefCell;

use compliance_actions::workflow::{
    ActionButton, ActionMap, ActionResolver, ComplianceDeadline, FixedClock, FormData,
    ModalDescriptor, ReportContext, ReportOperations, ReportStatus, RoleCheck,
};
use compliance_actions::Catalog;

/// Every collaborator call, in order
#[derive(Debug, Default)]
pub struct CallLog {
    pub updates: RefCell<Vec<FormData>>,
    pub other: RefCell<Vec<&'static str>>,
}

impl ReportOperations for CallLog {
    fn update_compliance_report(&self, payload: &FormData) -> Result<()> {
        self.updates.borrow_mut().push(payload.clone());
        Ok(())
    }

    fn delete_compliance_report(&self) -> Result<()> {
        self.other.borrow_mut().push("delete");
        Ok(())
    }

    fn create_supplemental_report(&self) -> Result<()> {
        self.other.borrow_mut().push("create_supplemental");
        Ok(())
    }

    fn create_analyst_adjustment(&self) -> Result<()> {
        self.other.borrow_mut().push("create_analyst_adjustment");
        Ok(())
    }

    fn create_idir_supplemental_report(&self) -> Result<()> {
        self.other.borrow_mut().push("create_idir_supplemental");
        Ok(())
    }
}

pub fn clock_at(year: i32, month: u32, day: u32) -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(year, month, day, 10, 30, 0).unwrap())
}

pub fn resolve(report: &ReportContext, roles: &dyn RoleCheck, clock: &FixedClock) -> ActionMap {
    let catalog = Catalog::english().unwrap();
    ActionResolver::new(&catalog, clock, ComplianceDeadline::default())
        .resolve(report, roles)
        .unwrap()
}

pub fn current(
    report: &ReportContext,
    roles: &dyn RoleCheck,
    clock: &FixedClock,
) -> Vec<ActionButton> {
    let catalog = Catalog::english().unwrap();
    ActionResolver::new(&catalog, clock, ComplianceDeadline::default())
        .resolve_current(report, roles)
        .unwrap()
}

pub fn ids_for(actions: &ActionMap, status: ReportStatus) -> Vec<&'static str> {
    actions[&status].iter().map(|button| button.id).collect()
}

/// Click a button and return the dialog it opened
pub fn confirm(button: &ActionButton, form: FormData) -> ModalDescriptor {
    let mut modal: Option<ModalDescriptor> = None;
    assert!(button.click(form, &mut modal), "{} is disabled", button.id);
    modal.expect("confirmation dialog")
}
