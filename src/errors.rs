use thiserror::Error;

use crate::workflow::lifecycle::ReportEvent;
use crate::workflow::types::ReportStatus;

/// Message lookup failures. These indicate a deployment defect in the
/// catalog, so the resolver never swallows them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("Missing translation key: {key}")]
    MissingKey { key: String },
    #[error("Translation {key} requires parameter {param}")]
    MissingParam { key: String, param: String },
    #[error("Invalid message catalog: {0}")]
    InvalidCatalog(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid transition from {from} with event {event:?}")]
    InvalidTransition { from: ReportStatus, event: ReportEvent },
    #[error("No lifecycle event leads to status {0}")]
    UnreachableStatus(ReportStatus),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Report {chain} not found")]
    ChainNotFound { chain: u64 },
    #[error("Report {chain} version {version} not found")]
    ReportNotFound { chain: u64, version: u32 },
    #[error("Report {chain} already has a draft version {version}")]
    DraftSupplementalExists { chain: u64, version: u32 },
    #[error("Report {chain} has not been assessed yet")]
    NotAssessed { chain: u64 },
    #[error("Report in status {status} cannot be deleted")]
    NotDeletable { status: ReportStatus },
    #[error("Update payload has no usable status: {0}")]
    InvalidPayload(String),
    #[error(transparent)]
    Transition(#[from] TransitionError),
}
