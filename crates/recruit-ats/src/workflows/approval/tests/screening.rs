use super::common::*;
use crate::workflows::approval::error::WorkflowError;
use crate::workflows::approval::screening::{
    is_screening_complete, ScreeningCheck, ScreeningChecklist,
};

#[test]
fn empty_checklist_reports_every_mandatory_check_in_order() {
    match is_screening_complete(&ScreeningChecklist::default()) {
        Err(WorkflowError::ScreeningIncomplete { missing_fields }) => {
            assert_eq!(missing_fields, ScreeningCheck::MANDATORY.to_vec());
        }
        other => panic!("expected screening incomplete, got {other:?}"),
    }
}

#[test]
fn optional_checks_never_block_the_gate() {
    let checklist = complete_checklist();
    assert!(ScreeningCheck::OPTIONAL
        .iter()
        .all(|check| !checklist.is_checked(*check)));

    assert_eq!(is_screening_complete(&checklist), Ok(()));
}

#[test]
fn missing_rtr_is_the_only_gap_reported() {
    let mut checklist = complete_checklist();
    checklist.set(ScreeningCheck::RtrConfirmed, false);
    checklist.set(ScreeningCheck::SkillsVerified, true);

    match is_screening_complete(&checklist) {
        Err(WorkflowError::ScreeningIncomplete { missing_fields }) => {
            assert_eq!(missing_fields, vec![ScreeningCheck::RtrConfirmed]);
        }
        other => panic!("expected screening incomplete, got {other:?}"),
    }
}

#[test]
fn completed_count_includes_optional_checks() {
    let mut checklist = complete_checklist();
    assert_eq!(checklist.completed_count(), 6);

    checklist.set(ScreeningCheck::CommuteDiscussed, true);
    assert_eq!(checklist.completed_count(), 7);
}

#[test]
fn incomplete_error_lists_field_names() {
    let mut checklist = complete_checklist();
    checklist.set(ScreeningCheck::PhoneScreenDone, false);
    checklist.set(ScreeningCheck::VisaStatusChecked, false);

    let error = is_screening_complete(&checklist).expect_err("gate fails");
    assert_eq!(
        error.to_string(),
        "screening incomplete, missing: phone_screen_done, visa_status_checked"
    );
    assert_eq!(error.kind(), "screening_incomplete");
}

#[test]
fn checklist_deserializes_with_missing_fields_defaulted() {
    let checklist: ScreeningChecklist = serde_json::from_value(serde_json::json!({
        "phone_screen_done": true,
        "rate_discussed": true,
        "notes": "prefers remote"
    }))
    .expect("partial checklist parses");

    assert!(checklist.is_checked(ScreeningCheck::PhoneScreenDone));
    assert!(!checklist.is_checked(ScreeningCheck::RtrConfirmed));
    assert_eq!(checklist.missing_mandatory().len(), 4);
    assert_eq!(checklist.notes.as_deref(), Some("prefers remote"));
}
