// compliance-actions - workflow action resolution for compliance reports
// This exposes the core components for embedding and testing

pub mod workflow;
pub mod errors;
pub mod i18n;
pub mod store;
pub mod telemetry;
pub mod config;

// Re-export key types for easy access
pub use workflow::{
    ActionButton, ActionMap, ActionResolver, ComplianceDeadline, FixedClock, ModalDescriptor,
    ReportCommand, ReportContext, ReportOperations, ReportStatus, Role, RoleCheck, SystemClock,
    UserRoles,
};
pub use errors::{StoreError, TransitionError, TranslationError};
pub use i18n::Catalog;
pub use store::InMemoryReports;
pub use telemetry::{init_telemetry, generate_correlation_id, create_report_span};
pub use config::{ComplianceActionsConfig, config, init_config};
