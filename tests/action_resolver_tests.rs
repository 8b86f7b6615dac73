//! Action resolution through the public API
//!
//! These tests pin the behaviour report views depend on:
//! - deterministic, fixed-order button lists
//! - submit gating on the signing authority declaration
//! - the draft-supplemental conflict guard
//! - the compliance period deadline for returning reports to suppliers
//! - the assessment confirmation flow reaching the update operation

use chrono::{Datelike, Utc};
use serde_json::json;

use compliance_actions::workflow::{
    ActionResolver, ComplianceDeadline, FixedClock, FormData, ReportCommand, ReportContext,
    ReportStatus, Role, UserRoles,
};
use compliance_actions::{Catalog, TranslationError};

mod fixtures;
use fixtures::*;

#[test]
fn test_signing_authority_draft_scenario() {
    let report = ReportContext {
        is_signing_authority_declared: true,
        ..ReportContext::new(ReportStatus::Draft, "2024")
    };
    let signing_authority = |role: Role| role == Role::SigningAuthority;

    let actions = resolve(&report, &signing_authority, &clock_at(2024, 9, 1));
    let draft = ids_for(&actions, ReportStatus::Draft);

    assert!(draft.contains(&"submit-report-btn"));
    assert!(draft.contains(&"delete-draft-btn"));
    assert_eq!(draft, vec!["submit-report-btn", "delete-draft-btn"]);
}

#[test]
fn test_declaration_only_flips_disabled() {
    let undeclared = ReportContext::new(ReportStatus::Draft, "2024");
    let declared = ReportContext {
        is_signing_authority_declared: true,
        ..undeclared.clone()
    };
    let roles = UserRoles::new([Role::Supplier, Role::SigningAuthority]);
    let clock = clock_at(2024, 9, 1);

    let before = current(&undeclared, &roles, &clock);
    let after = current(&declared, &roles, &clock);

    assert_eq!(before.len(), after.len());
    assert!(before[0].disabled);
    assert!(!after[0].disabled);
    assert_eq!(before[0].label, after[0].label);
    assert_eq!(before[0].handler, after[0].handler);
    assert_eq!(before[1..], after[1..]);
}

#[test]
fn test_director_non_assessment_scenario() {
    let report = ReportContext {
        is_non_assessment: true,
        has_draft_supplemental: false,
        ..ReportContext::new(ReportStatus::RecommendedByManager, "2024")
    };
    let director = UserRoles::new([Role::Government, Role::Director]);
    let buttons = current(&report, &director, &clock_at(2025, 1, 20));

    let assess: Vec<_> = buttons
        .iter()
        .filter(|button| button.id == "issue-assessment-btn")
        .collect();
    assert_eq!(assess.len(), 1);
    assert_eq!(assess[0].label, "Issue non-assessment");

    let mut form = FormData::new();
    form.insert("isNonAssessment".to_string(), json!(true));
    let modal = confirm(assess[0], form);

    let calls = CallLog::default();
    modal.primary_button_action.invoke(&calls).unwrap();

    let updates = calls.updates.borrow();
    assert_eq!(updates.len(), 1);
    assert_eq!(
        serde_json::Value::Object(updates[0].clone()),
        json!({ "isNonAssessment": true, "status": "Assessed" })
    );
    assert!(calls.other.borrow().is_empty());
}

#[test]
fn test_null_non_assessment_reads_as_assessment() {
    let report: ReportContext = serde_json::from_value(json!({
        "currentStatus": "Recommended by manager",
        "compliancePeriod": "2024",
        "isNonAssessment": null
    }))
    .unwrap();

    let buttons = current(&report, &|role: Role| role == Role::Director, &clock_at(2025, 1, 20));
    assert_eq!(buttons[0].id, "issue-assessment-btn");
    assert_eq!(buttons[0].label, "Issue assessment");
    assert_eq!(
        buttons[0].handler.command,
        ReportCommand::Update {
            status: ReportStatus::Assessed
        }
    );
}

#[test]
fn test_conflict_guard_for_every_role_combination() {
    let report = ReportContext {
        has_draft_supplemental: true,
        ..ReportContext::new(ReportStatus::RecommendedByManager, "2024")
    };
    let all_roles = [
        Role::Government,
        Role::Supplier,
        Role::Analyst,
        Role::ComplianceManager,
        Role::Director,
        Role::ComplianceReporting,
        Role::SigningAuthority,
        Role::Administrator,
        Role::ReadOnly,
    ];
    let clock = clock_at(2024, 9, 1);

    // Every subset of roles
    for mask in 0u32..(1 << all_roles.len()) {
        let roles = UserRoles::new(
            all_roles
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1 << bit) != 0)
                .map(|(_, role)| *role),
        );
        let ids = ids_for(&resolve(&report, &roles, &clock), ReportStatus::RecommendedByManager);
        assert!(!ids.contains(&"issue-assessment-btn"), "mask {mask:b}");
        assert!(!ids.contains(&"return-to-manager-btn"), "mask {mask:b}");
    }
}

#[test]
fn test_return_to_supplier_respects_deadline() {
    let analyst = |role: Role| role == Role::Analyst;
    let now = Utc::now();
    let clock = FixedClock(now);

    let closed = ReportContext {
        is_original_report: true,
        ..ReportContext::new(ReportStatus::Submitted, "2020")
    };
    let closed_ids: Vec<_> = current(&closed, &analyst, &clock).iter().map(|b| b.id).collect();
    assert_eq!(closed_ids, vec!["recommend-report-analyst-btn"]);

    let open = ReportContext {
        compliance_period: now.year().to_string(),
        ..closed
    };
    let open_ids: Vec<_> = current(&open, &analyst, &clock).iter().map(|b| b.id).collect();
    assert_eq!(
        open_ids,
        vec!["recommend-report-analyst-btn", "return-to-supplier-btn"]
    );
}

#[test]
fn test_viewer_without_roles_sees_nothing() {
    let nobody = |_role: Role| false;
    let clock = clock_at(2024, 9, 1);

    for status in ReportStatus::ALL {
        let report = ReportContext {
            is_original_report: true,
            is_signing_authority_declared: true,
            ..ReportContext::new(status, "2024")
        };
        let actions = resolve(&report, &nobody, &clock);
        for (listed, buttons) in &actions {
            assert!(buttons.is_empty(), "{listed} has actions for a viewer with no roles");
        }
    }
}

#[test]
fn test_repeated_resolution_is_identical() {
    let report = ReportContext {
        is_original_report: true,
        is_early_issuance: true,
        ..ReportContext::new(ReportStatus::Assessed, "2024")
    };
    let roles = UserRoles::new([Role::Supplier, Role::SigningAuthority, Role::ComplianceReporting]);
    let clock = clock_at(2024, 11, 5);

    let first = resolve(&report, &roles, &clock);
    for _ in 0..5 {
        assert_eq!(resolve(&report, &roles, &clock), first);
    }
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&resolve(&report, &roles, &clock)).unwrap()
    );
}

#[test]
fn test_custom_catalog_copy_is_used() {
    let catalog = Catalog::english()
        .unwrap()
        .with_message("report.actionBtns.submitReportBtn", "Envoyer le rapport");
    let clock = clock_at(2024, 9, 1);
    let resolver = ActionResolver::new(&catalog, &clock, ComplianceDeadline::default());

    let buttons = resolver
        .resolve_current(
            &ReportContext::new(ReportStatus::Draft, "2024"),
            &|role: Role| role == Role::SigningAuthority,
        )
        .unwrap();
    assert_eq!(buttons[0].label, "Envoyer le rapport");
}

#[test]
fn test_broken_catalog_fails_loudly() {
    let catalog = Catalog::english().unwrap().without_message("common.cancelBtn");
    let clock = clock_at(2024, 9, 1);
    let resolver = ActionResolver::new(&catalog, &clock, ComplianceDeadline::default());

    let err = resolver
        .resolve(
            &ReportContext::new(ReportStatus::Submitted, "2024"),
            &|role: Role| role == Role::Analyst,
        )
        .unwrap_err();
    assert_eq!(
        err,
        TranslationError::MissingKey {
            key: "common.cancelBtn".to_string()
        }
    );
}
