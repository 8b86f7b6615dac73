// Action descriptors produced by the resolver and the confirmation flow they drive

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::workflow::traits::{ModalPresenter, ReportOperations};
use crate::workflow::types::{FormData, ReportStatus};

/// Ordered actions per status. Only the list for the current status is usually rendered.
pub type ActionMap = BTreeMap<ReportStatus, Vec<ActionButton>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Contained,
    Outlined,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Primary,
    Error,
}

/// A clickable workflow action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionButton {
    /// Stable identifier used by automation hooks
    pub id: &'static str,
    pub label: String,
    pub variant: Variant,
    pub color: Color,
    pub disabled: bool,
    pub handler: ActionHandler,
}

impl ActionButton {
    /// Open this action's confirmation dialog. Disabled buttons do nothing.
    pub fn click(&self, form_data: FormData, presenter: &mut dyn ModalPresenter) -> bool {
        if self.disabled {
            tracing::debug!(button = self.id, "Ignoring click on disabled action");
            return false;
        }
        self.handler.handle(form_data, presenter);
        true
    }
}

/// Side-effecting operation an action ends in, once confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReportCommand {
    Update { status: ReportStatus },
    Delete,
    CreateSupplemental,
    CreateAnalystAdjustment,
    CreateIdirSupplemental,
}

/// Copy shown in the confirmation dialog, already translated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmationCopy {
    pub title: String,
    pub content: String,
    pub primary_button_text: String,
    pub primary_button_color: Color,
    pub secondary_button_text: String,
}

/// Deferred handler: confirmation first, command afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionHandler {
    pub confirmation: ConfirmationCopy,
    pub command: ReportCommand,
}

impl ActionHandler {
    pub fn new(confirmation: ConfirmationCopy, command: ReportCommand) -> Self {
        Self {
            confirmation,
            command,
        }
    }

    /// Publish the confirmation dialog. Nothing is mutated until the
    /// dialog's primary action is invoked.
    pub fn handle(&self, form_data: FormData, presenter: &mut dyn ModalPresenter) {
        let payload = match &self.command {
            ReportCommand::Update { status } => {
                let mut payload = form_data;
                payload.insert(
                    "status".to_string(),
                    serde_json::Value::String(status.as_str().to_string()),
                );
                payload
            }
            _ => form_data,
        };

        presenter.set_modal_data(ModalDescriptor {
            title: self.confirmation.title.clone(),
            content: self.confirmation.content.clone(),
            primary_button_text: self.confirmation.primary_button_text.clone(),
            primary_button_color: self.confirmation.primary_button_color,
            secondary_button_text: self.confirmation.secondary_button_text.clone(),
            primary_button_action: PrimaryAction {
                command: self.command.clone(),
                payload,
            },
        });
    }
}

/// Dialog contents handed to the modal presenter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModalDescriptor {
    pub title: String,
    pub content: String,
    pub primary_button_text: String,
    pub primary_button_color: Color,
    pub secondary_button_text: String,
    pub primary_button_action: PrimaryAction,
}

/// Command bound to its payload, run when the user confirms
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimaryAction {
    pub command: ReportCommand,
    pub payload: FormData,
}

impl PrimaryAction {
    pub fn invoke(&self, operations: &dyn ReportOperations) -> Result<()> {
        tracing::info!(command = ?self.command, "Running confirmed report action");
        match &self.command {
            ReportCommand::Update { .. } => operations.update_compliance_report(&self.payload),
            ReportCommand::Delete => operations.delete_compliance_report(),
            ReportCommand::CreateSupplemental => operations.create_supplemental_report(),
            ReportCommand::CreateAnalystAdjustment => operations.create_analyst_adjustment(),
            ReportCommand::CreateIdirSupplemental => operations.create_idir_supplemental_report(),
        }
    }
}
