// Core types for compliance report workflow evaluation

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of a compliance report version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum ReportStatus {
    #[serde(rename = "Draft")]
    Draft,
    #[serde(rename = "Submitted")]
    Submitted,
    /// Government-created version awaiting analyst review
    #[serde(rename = "Analyst adjustment")]
    AnalystAdjustment,
    #[serde(rename = "Recommended by analyst")]
    RecommendedByAnalyst,
    #[serde(rename = "Recommended by manager")]
    RecommendedByManager,
    #[serde(rename = "Assessed")]
    Assessed,
    #[serde(rename = "Return to analyst")]
    ReturnedToAnalyst,
    #[serde(rename = "Return to manager")]
    ReturnedToManager,
    #[serde(rename = "Return to supplier")]
    ReturnedToSupplier,
}

impl ReportStatus {
    pub const ALL: [ReportStatus; 9] = [
        ReportStatus::Draft,
        ReportStatus::Submitted,
        ReportStatus::AnalystAdjustment,
        ReportStatus::RecommendedByAnalyst,
        ReportStatus::RecommendedByManager,
        ReportStatus::Assessed,
        ReportStatus::ReturnedToAnalyst,
        ReportStatus::ReturnedToManager,
        ReportStatus::ReturnedToSupplier,
    ];

    /// Display and wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Draft => "Draft",
            ReportStatus::Submitted => "Submitted",
            ReportStatus::AnalystAdjustment => "Analyst adjustment",
            ReportStatus::RecommendedByAnalyst => "Recommended by analyst",
            ReportStatus::RecommendedByManager => "Recommended by manager",
            ReportStatus::Assessed => "Assessed",
            ReportStatus::ReturnedToAnalyst => "Return to analyst",
            ReportStatus::ReturnedToManager => "Return to manager",
            ReportStatus::ReturnedToSupplier => "Return to supplier",
        }
    }

    /// Versions in these statuses are still being prepared and block new supplementals
    pub fn is_draft_like(&self) -> bool {
        matches!(self, ReportStatus::Draft | ReportStatus::AnalystAdjustment)
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    /// Accepts "Recommended by analyst" as well as "RECOMMENDED_BY_ANALYST"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace('_', " ").to_lowercase();
        let status = match normalized.as_str() {
            "draft" => ReportStatus::Draft,
            "submitted" => ReportStatus::Submitted,
            "analyst adjustment" => ReportStatus::AnalystAdjustment,
            "recommended by analyst" => ReportStatus::RecommendedByAnalyst,
            "recommended by manager" => ReportStatus::RecommendedByManager,
            "assessed" => ReportStatus::Assessed,
            "return to analyst" | "returned to analyst" => ReportStatus::ReturnedToAnalyst,
            "return to manager" | "returned to manager" => ReportStatus::ReturnedToManager,
            "return to supplier" | "returned to supplier" => ReportStatus::ReturnedToSupplier,
            _ => return Err(format!("Unknown report status: {s}")),
        };
        Ok(status)
    }
}

impl<'de> Deserialize<'de> for ReportStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// User roles that gate workflow actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Government,
    Supplier,
    Analyst,
    ComplianceManager,
    Director,
    ComplianceReporting,
    SigningAuthority,
    Administrator,
    ReadOnly,
}

impl FromStr for Role {
    type Err = String;

    /// Accepts "signing_authority" as well as "Signing Authority"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace([' ', '-'], "_").to_lowercase();
        let role = match normalized.as_str() {
            "government" => Role::Government,
            "supplier" => Role::Supplier,
            "analyst" => Role::Analyst,
            "compliance_manager" => Role::ComplianceManager,
            "director" => Role::Director,
            "compliance_reporting" => Role::ComplianceReporting,
            "signing_authority" => Role::SigningAuthority,
            "administrator" => Role::Administrator,
            "read_only" => Role::ReadOnly,
            _ => return Err(format!("Unknown role: {s}")),
        };
        Ok(role)
    }
}

/// Snapshot of a report version as seen by the viewer, rebuilt for every evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportContext {
    /// `None` when the upstream status is missing or not recognised
    #[serde(default, deserialize_with = "lenient_status")]
    pub current_status: Option<ReportStatus>,
    #[serde(default, deserialize_with = "period_string")]
    pub compliance_period: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub report_version: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_original_report: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_early_issuance: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_analyst_adjustment: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_non_assessment: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub has_draft_supplemental: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub had_been_assessed: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_signing_authority_declared: bool,
}

impl ReportContext {
    pub fn new(status: ReportStatus, compliance_period: impl Into<String>) -> Self {
        Self {
            current_status: Some(status),
            compliance_period: compliance_period.into(),
            ..Default::default()
        }
    }

    /// Supplemental drafts can always be discarded; an original that has
    /// been through assessment cannot.
    pub fn is_deletable(&self) -> bool {
        self.report_version > 0 || !self.had_been_assessed
    }
}

/// Form values captured by the report view; merged into update payloads
pub type FormData = serde_json::Map<String, serde_json::Value>;

fn lenient_status<'de, D>(deserializer: D) -> Result<Option<ReportStatus>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

fn period_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
