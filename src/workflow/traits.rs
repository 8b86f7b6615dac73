// Traits for dependency injection - every collaborator of the resolver is explicit

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

use crate::errors::TranslationError;
use crate::workflow::actions::ModalDescriptor;
use crate::workflow::types::{FormData, Role};

/// Role capability checks for the current viewer
pub trait RoleCheck {
    /// Whether the viewer holds a single role
    fn has_role(&self, role: Role) -> bool;

    /// Whether the viewer holds every listed role
    fn has_roles(&self, roles: &[Role]) -> bool {
        roles.iter().all(|role| self.has_role(*role))
    }

    /// Whether the viewer holds at least one listed role
    fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }
}

/// Predicates such as `|role| role == Role::Director` work as role checks
impl<F> RoleCheck for F
where
    F: Fn(Role) -> bool,
{
    fn has_role(&self, role: Role) -> bool {
        self(role)
    }
}

/// Role set of an authenticated user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRoles(BTreeSet<Role>);

impl UserRoles {
    pub fn new(roles: impl IntoIterator<Item = Role>) -> Self {
        Self(roles.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl RoleCheck for UserRoles {
    fn has_role(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

/// User-visible copy lookup
pub trait Translate {
    fn translate(&self, key: &str, params: &[(&str, &str)]) -> Result<String, TranslationError>;
}

/// Mutating operations on the report a view is bound to.
/// Outcomes are surfaced by the caller, never by the resolver.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ReportOperations {
    fn update_compliance_report(&self, payload: &FormData) -> Result<()>;

    fn delete_compliance_report(&self) -> Result<()>;

    fn create_supplemental_report(&self) -> Result<()>;

    fn create_analyst_adjustment(&self) -> Result<()>;

    /// Government-initiated supplemental version
    fn create_idir_supplemental_report(&self) -> Result<()>;
}

/// Receives confirmation dialogs opened by action handlers
pub trait ModalPresenter {
    fn set_modal_data(&mut self, modal: ModalDescriptor);
}

/// Holds the most recently opened dialog
impl ModalPresenter for Option<ModalDescriptor> {
    fn set_modal_data(&mut self, modal: ModalDescriptor) {
        *self = Some(modal);
    }
}

/// Wall-clock source, read on every evaluation
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant, for replaying an evaluation as of a date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
