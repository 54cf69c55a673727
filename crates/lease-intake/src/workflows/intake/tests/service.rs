use super::common::*;
use crate::workflows::intake::domain::StepKind;
use crate::workflows::intake::session::{RepositoryError, SessionId, SessionRepository};
use crate::workflows::intake::validation::MessageCode;
use crate::workflows::intake::{IntakeServiceError, IntakeWorkflowService, StepOutcome};
use std::sync::Arc;

#[test]
fn start_session_allocates_distinct_ids() {
    let (service, sessions, _) = build_service();

    let first = service.start_session().expect("session starts");
    let second = service.start_session().expect("session starts");

    assert_ne!(first.id, second.id);
    assert!(first.id.0.starts_with("intake-"));
    assert!(sessions.fetch(&first.id).expect("fetch").is_some());
}

#[test]
fn accepted_applicant_is_stored_and_audited() {
    let (service, sessions, audit) = build_service();
    let session = service.start_session().expect("session starts");

    let outcome = service
        .submit_applicant(&session.id, applicant())
        .expect("submission handled");

    assert_eq!(
        outcome,
        StepOutcome::Accepted {
            step: StepKind::Applicant,
            next_step: Some(StepKind::VehiclePreference),
        }
    );
    let stored = sessions
        .fetch(&session.id)
        .expect("fetch succeeds")
        .expect("session present");
    assert_eq!(stored.applicant, Some(applicant()));

    let entries = audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].step, StepKind::Applicant);
    assert_eq!(
        entries[0].message,
        "Applicant info collected for: Dana Whitaker (Email: dana.whitaker@example.com)"
    );
}

#[test]
fn rejected_applicant_leaves_session_untouched() {
    let (service, sessions, audit) = build_service();
    let session = service.start_session().expect("session starts");
    let mut record = applicant();
    record.ssn = Some("123-45-6789".to_string());

    let outcome = service
        .submit_applicant(&session.id, record)
        .expect("submission handled");

    match outcome {
        StepOutcome::Rejected { step, errors } => {
            assert_eq!(step, StepKind::Applicant);
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].code, MessageCode::SsnInvalid);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    let stored = sessions
        .fetch(&session.id)
        .expect("fetch succeeds")
        .expect("session present");
    assert!(stored.applicant.is_none());
    assert!(audit.entries().is_empty());
}

#[test]
fn resubmitting_applicant_replaces_record() {
    let (service, _, audit) = build_service();
    let session = service.start_session().expect("session starts");
    service
        .submit_applicant(&session.id, applicant())
        .expect("first submission");

    let mut corrected = applicant();
    corrected.city = Some("Los Angeles".to_string());
    service
        .submit_applicant(&session.id, corrected.clone())
        .expect("second submission");

    let stored = service.get(&session.id).expect("session present");
    assert_eq!(stored.applicant, Some(corrected));
    assert_eq!(audit.entries().len(), 2);
}

#[test]
fn vehicle_step_requires_applicant_first() {
    let (service, _, audit) = build_service();
    let session = service.start_session().expect("session starts");

    match service.submit_vehicle_preference(&session.id, vehicle_preference()) {
        Err(IntakeServiceError::StepOutOfOrder {
            requested: StepKind::VehiclePreference,
            required: StepKind::Applicant,
        }) => {}
        other => panic!("expected step out of order, got {other:?}"),
    }
    assert!(audit.entries().is_empty());
}

#[test]
fn full_walkthrough_completes_session() {
    let (service, _, audit) = build_service();
    let session = service.start_session().expect("session starts");
    service
        .submit_applicant(&session.id, applicant())
        .expect("applicant accepted");

    let outcome = service
        .submit_vehicle_preference(&session.id, vehicle_preference())
        .expect("vehicle handled");
    assert_eq!(
        outcome,
        StepOutcome::Accepted {
            step: StepKind::VehiclePreference,
            next_step: None,
        }
    );

    let stored = service.get(&session.id).expect("session present");
    assert_eq!(stored.current_step(), None);
    let entries = audit.entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(
        entries[1].message,
        "Vehicle preferences collected for: Dana Whitaker (Truck: Sleeper Cab, Trailer: Reefer)"
    );
}

#[test]
fn rejected_vehicle_step_reports_trailer_range() {
    let (service, _, _) = build_service();
    let session = service.start_session().expect("session starts");
    service
        .submit_applicant(&session.id, applicant())
        .expect("applicant accepted");
    let mut record = vehicle_preference();
    record.number_of_trailers = Some("0".to_string());

    let outcome = service
        .submit_vehicle_preference(&session.id, record)
        .expect("vehicle handled");

    match outcome {
        StepOutcome::Rejected { errors, .. } => {
            assert_eq!(errors[0].code, MessageCode::Range);
            assert_eq!(errors[0].args, vec!["1".to_string(), "10".to_string()]);
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    let stored = service.get(&session.id).expect("session present");
    assert!(stored.vehicle_preference.is_none());
}

#[test]
fn age_checks_follow_the_injected_clock() {
    fn far_future() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2070, 1, 15).expect("valid date")
    }
    let sessions = Arc::new(MemorySessions::default());
    let audit = Arc::new(MemoryAudit::default());
    let service = IntakeWorkflowService::new(sessions, audit).with_clock(far_future);
    let session = service.start_session().expect("session starts");

    let outcome = service
        .submit_applicant(&session.id, applicant())
        .expect("submission handled");

    match outcome {
        StepOutcome::Rejected { errors, .. } => {
            assert_eq!(errors[0].code, MessageCode::AgeMaximum);
        }
        other => panic!("expected age rejection, got {other:?}"),
    }
}

#[test]
fn unknown_session_is_not_found() {
    let (service, _, _) = build_service();
    let missing = SessionId("intake-missing".to_string());

    match service.submit_applicant(&missing, applicant()) {
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
    match service.get(&missing) {
        Err(IntakeServiceError::Repository(RepositoryError::NotFound)) => {}
        other => panic!("expected not found, got {other:?}"),
    }
}

#[test]
fn repository_failures_propagate() {
    let service = IntakeWorkflowService::new(
        Arc::new(ReadOnlySessions::default()),
        Arc::new(MemoryAudit::default()),
    )
    .with_clock(reference_date);
    let session = service.start_session().expect("session starts");

    match service.submit_applicant(&session.id, applicant()) {
        Err(IntakeServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected repository failure, got {other:?}"),
    }
}

#[test]
fn audit_failures_propagate() {
    let service =
        IntakeWorkflowService::new(Arc::new(MemorySessions::default()), Arc::new(OfflineAudit))
            .with_clock(reference_date);
    let session = service.start_session().expect("session starts");

    match service.submit_applicant(&session.id, applicant()) {
        Err(IntakeServiceError::Audit(_)) => {}
        other => panic!("expected audit failure, got {other:?}"),
    }
    let stored = service.get(&session.id).expect("session present");
    assert_eq!(stored.applicant, Some(applicant()));
    assert_eq!(stored.current_step(), Some(StepKind::VehiclePreference));
}

#[test]
fn interleaved_write_rejects_stale_vehicle_submission() {
    let sessions = Arc::new(RacingSessions::default());
    let audit = Arc::new(MemoryAudit::default());
    let service =
        IntakeWorkflowService::new(sessions.clone(), audit.clone()).with_clock(reference_date);
    let session = service.start_session().expect("session starts");
    service
        .submit_applicant(&session.id, applicant())
        .expect("applicant accepted");

    let mut corrected = applicant();
    corrected.first_name = Some("Danielle".to_string());
    sessions.interleave(corrected.clone());

    match service.submit_vehicle_preference(&session.id, vehicle_preference()) {
        Err(IntakeServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }

    let stored = service.get(&session.id).expect("session present");
    assert_eq!(stored.applicant, Some(corrected));
    assert!(stored.vehicle_preference.is_none());
    assert_eq!(stored.version, 2);
    assert_eq!(audit.entries().len(), 1);

    let outcome = service
        .submit_vehicle_preference(&session.id, vehicle_preference())
        .expect("retry handled");
    assert!(outcome.is_accepted());
    let messages: Vec<_> = audit.entries().into_iter().map(|entry| entry.message).collect();
    assert_eq!(
        messages[1],
        "Vehicle preferences collected for: Danielle Whitaker (Truck: Sleeper Cab, Trailer: Reefer)"
    );
}

#[test]
fn pinned_reference_date_overrides_clock() {
    let (service, _, _) = build_service();
    let service = service.with_reference_date(chrono::NaiveDate::from_ymd_opt(2006, 7, 3));
    let session = service.start_session().expect("session starts");

    let outcome = service
        .submit_applicant(&session.id, applicant())
        .expect("submission handled");

    match outcome {
        StepOutcome::Rejected { errors, .. } => {
            assert_eq!(errors[0].code, MessageCode::AgeMinimum);
            assert_eq!(errors[0].args, vec!["21".to_string()]);
        }
        other => panic!("expected age rejection, got {other:?}"),
    }
}
