// Compliance report workflow - action resolution with dependency injection
//
// The resolver is a pure function of the report snapshot, the viewer's roles
// and the clock; every side effect goes through the collaborator traits.

pub mod types;
pub mod traits;
pub mod actions;
pub mod deadline;
pub mod resolver;
pub mod lifecycle;

#[cfg(test)]
pub mod mocks;


pub use actions::{
    ActionButton, ActionHandler, ActionMap, ModalDescriptor, PrimaryAction, ReportCommand,
};
pub use deadline::{reporting_quarter, ComplianceDeadline, Quarter};
pub use lifecycle::{ReportEvent, ReportLifecycle};
pub use resolver::ActionResolver;
pub use traits::{
    Clock, FixedClock, ModalPresenter, ReportOperations, RoleCheck, SystemClock, Translate,
    UserRoles,
};
pub use types::{FormData, ReportContext, ReportStatus, Role};
