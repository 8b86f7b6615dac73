//! In-memory report chains
//!
//! A chain is every version of one supplier's report for a compliance
//! period: the original, supplier supplementals, government supplementals
//! and analyst adjustments. Status changes are validated by the report
//! lifecycle; the view-level flags the resolver needs are derived from the
//! chain rather than stored.

use anyhow::Result;
use statig::prelude::*;
use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::errors::StoreError;
use crate::workflow::lifecycle::{apply_event, ReportEvent, ReportLifecycle};
use crate::workflow::traits::ReportOperations;
use crate::workflow::types::{FormData, ReportContext, ReportStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionKind {
    Original,
    Supplemental,
    GovernmentSupplemental,
    AnalystAdjustment,
}

struct StoredVersion {
    kind: VersionKind,
    machine: StateMachine<ReportLifecycle>,
    is_non_assessment: bool,
    signing_authority_declared: bool,
    reached_assessment: bool,
}

impl StoredVersion {
    fn new(chain_id: u64, version: u32, kind: VersionKind) -> Self {
        Self {
            kind,
            machine: ReportLifecycle::new(chain_id, version).state_machine(),
            is_non_assessment: false,
            signing_authority_declared: false,
            reached_assessment: false,
        }
    }

    fn status(&self) -> ReportStatus {
        self.machine.inner().status()
    }
}

struct ReportChain {
    compliance_period: String,
    early_issuance: bool,
    versions: BTreeMap<u32, StoredVersion>,
}

impl ReportChain {
    fn draft_version(&self) -> Option<u32> {
        self.versions
            .iter()
            .find(|(_, stored)| stored.status().is_draft_like())
            .map(|(version, _)| *version)
    }

    fn next_version(&self) -> u32 {
        self.versions.keys().next_back().map_or(0, |latest| latest + 1)
    }
}

#[derive(Default)]
pub struct InMemoryReports {
    chains: RefCell<BTreeMap<u64, ReportChain>>,
    next_chain_id: RefCell<u64>,
}

impl InMemoryReports {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new chain with an original draft; returns the chain id
    pub fn create_report(&self, compliance_period: &str, early_issuance: bool) -> u64 {
        let chain_id = {
            let mut next = self.next_chain_id.borrow_mut();
            *next += 1;
            *next
        };

        let mut versions = BTreeMap::new();
        versions.insert(0, StoredVersion::new(chain_id, 0, VersionKind::Original));
        self.chains.borrow_mut().insert(
            chain_id,
            ReportChain {
                compliance_period: compliance_period.to_string(),
                early_issuance,
                versions,
            },
        );

        tracing::info!(chain_id, compliance_period, "Created compliance report");
        chain_id
    }

    /// Operations bound to one report version
    pub fn operations(&self, chain_id: u64, version: u32) -> ReportHandle<'_> {
        ReportHandle {
            store: self,
            chain_id,
            version,
        }
    }

    pub fn declare_signing_authority(&self, chain_id: u64, version: u32) -> Result<(), StoreError> {
        self.with_version(chain_id, version, |stored| {
            stored.signing_authority_declared = true;
            Ok(())
        })
    }

    pub fn status(&self, chain_id: u64, version: u32) -> Result<ReportStatus, StoreError> {
        self.with_version(chain_id, version, |stored| Ok(stored.status()))
    }

    /// Version numbers of a chain, oldest first
    pub fn versions(&self, chain_id: u64) -> Vec<u32> {
        self.chains
            .borrow()
            .get(&chain_id)
            .map(|chain| chain.versions.keys().copied().collect())
            .unwrap_or_default()
    }

    pub fn latest_version(&self, chain_id: u64) -> Option<u32> {
        self.versions(chain_id).last().copied()
    }

    /// Resolver input for one version, derived from the whole chain
    pub fn context(&self, chain_id: u64, version: u32) -> Result<ReportContext, StoreError> {
        let chains = self.chains.borrow();
        let chain = chains
            .get(&chain_id)
            .ok_or(StoreError::ReportNotFound { chain: chain_id, version })?;
        let stored = chain
            .versions
            .get(&version)
            .ok_or(StoreError::ReportNotFound { chain: chain_id, version })?;

        Ok(ReportContext {
            current_status: Some(stored.status()),
            compliance_period: chain.compliance_period.clone(),
            report_version: version,
            is_original_report: stored.kind == VersionKind::Original,
            is_early_issuance: chain.early_issuance,
            is_analyst_adjustment: stored.kind == VersionKind::AnalystAdjustment,
            is_non_assessment: stored.is_non_assessment,
            has_draft_supplemental: chain
                .draft_version()
                .is_some_and(|draft| draft > version),
            had_been_assessed: chain
                .versions
                .range(..=version)
                .any(|(_, earlier)| earlier.reached_assessment),
            is_signing_authority_declared: stored.signing_authority_declared,
        })
    }

    fn with_version<T>(
        &self,
        chain_id: u64,
        version: u32,
        f: impl FnOnce(&mut StoredVersion) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut chains = self.chains.borrow_mut();
        let stored = chains
            .get_mut(&chain_id)
            .and_then(|chain| chain.versions.get_mut(&version))
            .ok_or(StoreError::ReportNotFound { chain: chain_id, version })?;
        f(stored)
    }

    fn update(
        &self,
        chain_id: u64,
        version: u32,
        payload: &FormData,
    ) -> Result<ReportStatus, StoreError> {
        let target = payload
            .get("status")
            .and_then(|value| value.as_str())
            .ok_or_else(|| StoreError::InvalidPayload("missing status".to_string()))?
            .parse::<ReportStatus>()
            .map_err(StoreError::InvalidPayload)?;
        let event = ReportEvent::leading_to(target)?;

        self.with_version(chain_id, version, |stored| {
            let status = apply_event(&mut stored.machine, event)?;
            if let Some(non_assessment) = payload.get("isNonAssessment").and_then(|v| v.as_bool()) {
                stored.is_non_assessment = non_assessment;
            }
            if status == ReportStatus::Assessed {
                stored.reached_assessment = true;
            }
            Ok(status)
        })
    }

    fn delete(&self, chain_id: u64, version: u32) -> Result<(), StoreError> {
        let mut chains = self.chains.borrow_mut();
        let chain = chains
            .get_mut(&chain_id)
            .ok_or(StoreError::ChainNotFound { chain: chain_id })?;
        let status = chain
            .versions
            .get(&version)
            .map(StoredVersion::status)
            .ok_or(StoreError::ReportNotFound { chain: chain_id, version })?;

        if !status.is_draft_like() {
            return Err(StoreError::NotDeletable { status });
        }
        chain.versions.remove(&version);
        if chain.versions.is_empty() {
            chains.remove(&chain_id);
        }
        tracing::info!(chain_id, version, "Deleted report version");
        Ok(())
    }

    fn create_version(&self, chain_id: u64, kind: VersionKind) -> Result<u32, StoreError> {
        let mut chains = self.chains.borrow_mut();
        let chain = chains
            .get_mut(&chain_id)
            .ok_or(StoreError::ChainNotFound { chain: chain_id })?;

        // An unassessed original is itself a draft, so assessment is checked first
        if !chain.versions.values().any(|stored| stored.reached_assessment) {
            return Err(StoreError::NotAssessed { chain: chain_id });
        }
        if let Some(draft) = chain.draft_version() {
            return Err(StoreError::DraftSupplementalExists {
                chain: chain_id,
                version: draft,
            });
        }

        let version = chain.next_version();
        let mut stored = StoredVersion::new(chain_id, version, kind);
        if kind == VersionKind::AnalystAdjustment {
            apply_event(&mut stored.machine, ReportEvent::OpenAnalystAdjustment)?;
        }
        chain.versions.insert(version, stored);

        tracing::info!(chain_id, version, kind = ?kind, "Created report version");
        Ok(version)
    }
}

/// `ReportOperations` for one version held by an `InMemoryReports`
pub struct ReportHandle<'s> {
    store: &'s InMemoryReports,
    chain_id: u64,
    version: u32,
}

impl ReportOperations for ReportHandle<'_> {
    fn update_compliance_report(&self, payload: &FormData) -> Result<()> {
        self.store.update(self.chain_id, self.version, payload)?;
        Ok(())
    }

    fn delete_compliance_report(&self) -> Result<()> {
        self.store.delete(self.chain_id, self.version)?;
        Ok(())
    }

    fn create_supplemental_report(&self) -> Result<()> {
        self.store.create_version(self.chain_id, VersionKind::Supplemental)?;
        Ok(())
    }

    fn create_analyst_adjustment(&self) -> Result<()> {
        self.store
            .create_version(self.chain_id, VersionKind::AnalystAdjustment)?;
        Ok(())
    }

    fn create_idir_supplemental_report(&self) -> Result<()> {
        self.store
            .create_version(self.chain_id, VersionKind::GovernmentSupplemental)?;
        Ok(())
    }
}
