// Workflow action resolver - maps a report snapshot to the actions a viewer may take
//
// Resolution is a pure function of the report context, the viewer's roles and
// the clock reading. Each status yields its buttons in a fixed order.

use crate::errors::TranslationError;
use crate::workflow::actions::{
    ActionButton, ActionHandler, ActionMap, Color, ConfirmationCopy, ReportCommand, Variant,
};
use crate::workflow::deadline::{reporting_quarter, ComplianceDeadline};
use crate::workflow::traits::{Clock, RoleCheck, Translate};
use crate::workflow::types::{ReportContext, ReportStatus, Role};

pub const SUBMIT_REPORT_BTN: &str = "submit-report-btn";
pub const DELETE_DRAFT_BTN: &str = "delete-draft-btn";
pub const DELETE_ANALYST_ADJUSTMENT_BTN: &str = "delete-analyst-adjustment-btn";
pub const RECOMMEND_ANALYST_BTN: &str = "recommend-report-analyst-btn";
pub const RECOMMEND_MANAGER_BTN: &str = "recommend-report-manager-btn";
pub const RETURN_TO_SUPPLIER_BTN: &str = "return-to-supplier-btn";
pub const RETURN_TO_ANALYST_BTN: &str = "return-to-analyst-btn";
pub const RETURN_TO_MANAGER_BTN: &str = "return-to-manager-btn";
pub const ISSUE_ASSESSMENT_BTN: &str = "issue-assessment-btn";
pub const CREATE_SUPPLEMENTAL_BTN: &str = "create-supplemental-btn";
pub const REASSESS_REPORT_BTN: &str = "reassess-report-btn";

type Buttons = Result<Vec<ActionButton>, TranslationError>;

pub struct ActionResolver<'a> {
    translator: &'a dyn Translate,
    clock: &'a dyn Clock,
    deadline: ComplianceDeadline,
}

impl<'a> ActionResolver<'a> {
    pub fn new(
        translator: &'a dyn Translate,
        clock: &'a dyn Clock,
        deadline: ComplianceDeadline,
    ) -> Self {
        Self {
            translator,
            clock,
            deadline,
        }
    }

    /// Actions for every status. Translation failures propagate.
    pub fn resolve(
        &self,
        report: &ReportContext,
        roles: &dyn RoleCheck,
    ) -> Result<ActionMap, TranslationError> {
        let evaluation = Evaluation {
            t: self.translator,
            report,
            roles,
            deadline_passed: self.deadline.is_past(&report.compliance_period, self.clock.now()),
            quarter: reporting_quarter(&report.compliance_period, self.clock.now())
                .map(|q| q.number()),
        };

        let mut actions = ActionMap::new();
        for status in ReportStatus::ALL {
            actions.insert(status, evaluation.buttons_for(status)?);
        }

        tracing::debug!(
            current_status = ?report.current_status,
            report_version = report.report_version,
            deadline_passed = evaluation.deadline_passed,
            current_actions = report
                .current_status
                .and_then(|status| actions.get(&status))
                .map_or(0, Vec::len),
            "Resolved report actions"
        );
        Ok(actions)
    }

    /// Actions for the current status only; empty when the status is unknown
    pub fn resolve_current(
        &self,
        report: &ReportContext,
        roles: &dyn RoleCheck,
    ) -> Result<Vec<ActionButton>, TranslationError> {
        let mut actions = self.resolve(report, roles)?;
        Ok(report
            .current_status
            .and_then(|status| actions.remove(&status))
            .unwrap_or_default())
    }
}

struct Evaluation<'e> {
    t: &'e dyn Translate,
    report: &'e ReportContext,
    roles: &'e dyn RoleCheck,
    deadline_passed: bool,
    quarter: Option<u8>,
}

impl Evaluation<'_> {
    fn buttons_for(&self, status: ReportStatus) -> Buttons {
        match status {
            ReportStatus::Draft => self.draft(true),
            ReportStatus::ReturnedToSupplier => self.draft(false),
            ReportStatus::Submitted | ReportStatus::ReturnedToAnalyst => self.submitted(),
            ReportStatus::AnalystAdjustment => self.analyst_adjustment(),
            ReportStatus::RecommendedByAnalyst | ReportStatus::ReturnedToManager => {
                self.recommended_by_analyst()
            }
            ReportStatus::RecommendedByManager => self.recommended_by_manager(),
            ReportStatus::Assessed => self.assessed(),
        }
    }

    fn draft(&self, allow_delete: bool) -> Buttons {
        let mut buttons = Vec::new();

        // Present even without a declaration so the view can explain why it is blocked
        if self.roles.has_roles(&[Role::SigningAuthority]) {
            buttons.push(self.submit_report()?);
        }
        if allow_delete
            && self
                .roles
                .has_any_role(&[Role::SigningAuthority, Role::ComplianceReporting])
            && self.report.is_deletable()
        {
            let label_key = if self.report.report_version == 0 {
                "report.actionBtns.deleteDraftBtn"
            } else {
                "report.actionBtns.deleteSupplementalBtn"
            };
            buttons.push(self.delete(DELETE_DRAFT_BTN, label_key)?);
        }
        Ok(buttons)
    }

    fn submitted(&self) -> Buttons {
        let mut buttons = Vec::new();
        if self.roles.has_roles(&[Role::Analyst]) {
            buttons.push(self.recommend(
                RECOMMEND_ANALYST_BTN,
                "report.actionBtns.recommendAnalystBtn",
                ReportStatus::RecommendedByAnalyst,
            )?);
            if self.report.is_original_report && !self.deadline_passed {
                buttons.push(self.return_to(
                    RETURN_TO_SUPPLIER_BTN,
                    "report.actionBtns.returnToSupplierBtn",
                    "report.recipients.supplier",
                    ReportStatus::ReturnedToSupplier,
                )?);
            }
        }
        Ok(buttons)
    }

    fn analyst_adjustment(&self) -> Buttons {
        let mut buttons = Vec::new();
        if self.roles.has_roles(&[Role::Analyst]) {
            buttons.push(self.recommend(
                RECOMMEND_ANALYST_BTN,
                "report.actionBtns.recommendAnalystBtn",
                ReportStatus::RecommendedByAnalyst,
            )?);
            buttons.push(self.delete(
                DELETE_ANALYST_ADJUSTMENT_BTN,
                "report.actionBtns.deleteAnalystAdjustmentBtn",
            )?);
        }
        Ok(buttons)
    }

    fn recommended_by_analyst(&self) -> Buttons {
        let mut buttons = Vec::new();
        if self.roles.has_roles(&[Role::ComplianceManager]) {
            buttons.push(self.recommend(
                RECOMMEND_MANAGER_BTN,
                "report.actionBtns.recommendManagerBtn",
                ReportStatus::RecommendedByManager,
            )?);
            buttons.push(self.return_to(
                RETURN_TO_ANALYST_BTN,
                "report.actionBtns.returnToAnalystBtn",
                "report.recipients.analyst",
                ReportStatus::ReturnedToAnalyst,
            )?);
        }
        if self.roles.has_roles(&[Role::Director]) && !self.report.has_draft_supplemental {
            buttons.push(self.issue_assessment()?);
        }
        Ok(buttons)
    }

    fn recommended_by_manager(&self) -> Buttons {
        // A newer draft supersedes this version; nothing may be assessed against it
        if self.report.has_draft_supplemental || !self.roles.has_roles(&[Role::Director]) {
            return Ok(Vec::new());
        }
        Ok(vec![
            self.issue_assessment()?,
            self.return_to(
                RETURN_TO_MANAGER_BTN,
                "report.actionBtns.returnToManagerBtn",
                "report.recipients.manager",
                ReportStatus::ReturnedToManager,
            )?,
        ])
    }

    fn assessed(&self) -> Buttons {
        let mut buttons = Vec::new();
        if self.report.has_draft_supplemental {
            return Ok(buttons);
        }

        if !self.roles.has_roles(&[Role::Government])
            && self
                .roles
                .has_any_role(&[Role::ComplianceReporting, Role::SigningAuthority])
        {
            let label = match (self.report.is_early_issuance, self.quarter) {
                (true, Some(quarter)) => self.t.translate(
                    "report.actionBtns.createQuarterlySupplementalBtn",
                    &[("quarter", quarter.to_string().as_str())],
                )?,
                _ => self.t.translate("report.actionBtns.createSupplementalBtn", &[])?,
            };
            buttons.push(ActionButton {
                id: CREATE_SUPPLEMENTAL_BTN,
                label,
                variant: Variant::Contained,
                color: Color::Primary,
                disabled: false,
                handler: ActionHandler::new(
                    self.confirmation(
                        "report.confirm.supplementalTitle",
                        "report.confirm.supplementalContent",
                        &[],
                        "report.confirm.createBtn",
                        Color::Primary,
                    )?,
                    ReportCommand::CreateSupplemental,
                ),
            });
        }

        if self.roles.has_roles(&[Role::Analyst]) {
            let command = if self.report.is_analyst_adjustment {
                ReportCommand::CreateAnalystAdjustment
            } else {
                ReportCommand::CreateIdirSupplemental
            };
            buttons.push(ActionButton {
                id: REASSESS_REPORT_BTN,
                label: self.t.translate("report.actionBtns.reassessReportBtn", &[])?,
                variant: Variant::Outlined,
                color: Color::Primary,
                disabled: false,
                handler: ActionHandler::new(
                    self.confirmation(
                        "report.confirm.reassessTitle",
                        "report.confirm.reassessContent",
                        &[],
                        "report.confirm.createBtn",
                        Color::Primary,
                    )?,
                    command,
                ),
            });
        }
        Ok(buttons)
    }

    fn submit_report(&self) -> Result<ActionButton, TranslationError> {
        Ok(ActionButton {
            id: SUBMIT_REPORT_BTN,
            label: self.t.translate("report.actionBtns.submitReportBtn", &[])?,
            variant: Variant::Contained,
            color: Color::Primary,
            disabled: !self.report.is_signing_authority_declared,
            handler: ActionHandler::new(
                self.confirmation(
                    "report.confirm.submitTitle",
                    "report.confirm.submitContent",
                    &[("period", self.report.compliance_period.as_str())],
                    "report.actionBtns.submitReportBtn",
                    Color::Primary,
                )?,
                ReportCommand::Update {
                    status: ReportStatus::Submitted,
                },
            ),
        })
    }

    fn delete(&self, id: &'static str, label_key: &str) -> Result<ActionButton, TranslationError> {
        Ok(ActionButton {
            id,
            label: self.t.translate(label_key, &[])?,
            variant: Variant::Outlined,
            color: Color::Error,
            disabled: false,
            handler: ActionHandler::new(
                self.confirmation(
                    "report.confirm.deleteTitle",
                    "report.confirm.deleteContent",
                    &[],
                    "report.confirm.deleteBtn",
                    Color::Error,
                )?,
                ReportCommand::Delete,
            ),
        })
    }

    fn recommend(
        &self,
        id: &'static str,
        label_key: &str,
        target: ReportStatus,
    ) -> Result<ActionButton, TranslationError> {
        Ok(ActionButton {
            id,
            label: self.t.translate(label_key, &[])?,
            variant: Variant::Contained,
            color: Color::Primary,
            disabled: false,
            handler: ActionHandler::new(
                self.confirmation(
                    "report.confirm.recommendTitle",
                    "report.confirm.recommendContent",
                    &[],
                    "report.confirm.recommendBtn",
                    Color::Primary,
                )?,
                ReportCommand::Update { status: target },
            ),
        })
    }

    fn return_to(
        &self,
        id: &'static str,
        label_key: &str,
        recipient_key: &str,
        target: ReportStatus,
    ) -> Result<ActionButton, TranslationError> {
        let recipient = self.t.translate(recipient_key, &[])?;
        Ok(ActionButton {
            id,
            label: self.t.translate(label_key, &[])?,
            variant: Variant::Outlined,
            color: Color::Primary,
            disabled: false,
            handler: ActionHandler::new(
                self.confirmation(
                    "report.confirm.returnTitle",
                    "report.confirm.returnContent",
                    &[("recipient", recipient.as_str())],
                    "report.confirm.returnBtn",
                    Color::Primary,
                )?,
                ReportCommand::Update { status: target },
            ),
        })
    }

    /// Label and confirmation copy differ for non-assessments; the target status does not
    fn issue_assessment(&self) -> Result<ActionButton, TranslationError> {
        let (label_key, title_key, content_key) = if self.report.is_non_assessment {
            (
                "report.actionBtns.issueNonAssessmentBtn",
                "report.confirm.nonAssessTitle",
                "report.confirm.nonAssessContent",
            )
        } else {
            (
                "report.actionBtns.issueAssessmentBtn",
                "report.confirm.assessTitle",
                "report.confirm.assessContent",
            )
        };

        Ok(ActionButton {
            id: ISSUE_ASSESSMENT_BTN,
            label: self.t.translate(label_key, &[])?,
            variant: Variant::Contained,
            color: Color::Primary,
            disabled: false,
            handler: ActionHandler::new(
                self.confirmation(
                    title_key,
                    content_key,
                    &[],
                    "report.confirm.assessBtn",
                    Color::Primary,
                )?,
                ReportCommand::Update {
                    status: ReportStatus::Assessed,
                },
            ),
        })
    }

    fn confirmation(
        &self,
        title_key: &str,
        content_key: &str,
        params: &[(&str, &str)],
        primary_key: &str,
        primary_color: Color,
    ) -> Result<ConfirmationCopy, TranslationError> {
        Ok(ConfirmationCopy {
            title: self.t.translate(title_key, &[])?,
            content: self.t.translate(content_key, params)?,
            primary_button_text: self.t.translate(primary_key, &[])?,
            primary_button_color: primary_color,
            secondary_button_text: self.t.translate("common.cancelBtn", &[])?,
        })
    }
}
