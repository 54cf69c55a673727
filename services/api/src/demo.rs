use crate::infra::{InMemoryAuditLog, InMemorySessionRepository};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, ValueEnum};
use lease_intake::error::AppError;
use lease_intake::workflows::intake::{
    validate_step_as_of, ApplicantRecord, FieldError, IntakeWorkflowService, StepKind,
    StepOutcome, StepSubmission, VehiclePreferenceRecord,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Date used for applicant age checks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Submit a flawed applicant page first to show field-level rejections.
    #[arg(long)]
    pub(crate) show_rejections: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum StepArg {
    Applicant,
    Vehicle,
}

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Which form page the payload belongs to
    #[arg(long, value_enum)]
    pub(crate) step: StepArg,
    /// JSON file holding the page's fields (camelCase keys)
    pub(crate) path: PathBuf,
    /// Date used for applicant age checks (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ValidationReport {
    pub(crate) step: StepKind,
    pub(crate) valid: bool,
    pub(crate) errors: Vec<FieldError>,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let ValidateArgs { step, path, today } = args;
    let raw = std::fs::read_to_string(&path)?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let report = validate_payload(step, &raw, today)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

pub(crate) fn validate_payload(
    step: StepArg,
    raw: &str,
    today: NaiveDate,
) -> Result<ValidationReport, AppError> {
    let submission = match step {
        StepArg::Applicant => StepSubmission::Applicant(serde_json::from_str(raw)?),
        StepArg::Vehicle => StepSubmission::VehiclePreference(serde_json::from_str(raw)?),
    };

    let result = validate_step_as_of(&submission, today);
    Ok(ValidationReport {
        step: submission.kind(),
        valid: result.is_valid(),
        errors: result.into_errors(),
    })
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        today,
        show_rejections,
    } = args;

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let repository = Arc::new(InMemorySessionRepository::default());
    let audit = Arc::new(InMemoryAuditLog::default());
    let service = IntakeWorkflowService::new(repository, audit.clone())
        .with_reference_date(Some(today));

    println!("Truck lease intake demo (evaluated {today}, sensitive fields redacted)");
    let session = service.start_session()?;
    println!("- Started session {}", session.id.0);

    if show_rejections {
        let outcome = service.submit_applicant(&session.id, flawed_applicant())?;
        render_outcome(&outcome);
    }

    let outcome = service.submit_applicant(&session.id, demo_applicant(today))?;
    render_outcome(&outcome);
    if !outcome.is_accepted() {
        return Ok(());
    }

    let outcome = service.submit_vehicle_preference(&session.id, demo_vehicle_preference())?;
    render_outcome(&outcome);

    let view = service.get(&session.id)?.summary_view();
    println!("  Session summary:\n{}", serde_json::to_string_pretty(&view)?);

    let entries = audit.entries();
    if entries.is_empty() {
        println!("  Audit trail: empty");
    } else {
        println!("  Audit trail:");
        for entry in entries {
            println!("    - [{}] {}", entry.step.label(), entry.message);
        }
    }

    Ok(())
}

fn render_outcome(outcome: &StepOutcome) {
    match outcome {
        StepOutcome::Accepted { step, next_step } => {
            let next = next_step.map(StepKind::label).unwrap_or("complete");
            println!("- {} accepted -> next: {}", step.label(), next);
        }
        StepOutcome::Rejected { step, errors } => {
            println!("- {} rejected with {} error(s)", step.label(), errors.len());
            for error in errors {
                let args = if error.args.is_empty() {
                    String::new()
                } else {
                    format!(" {:?}", error.args)
                };
                println!("    - {}: {}{}", error.field.key(), error.code.key(), args);
            }
        }
    }
}

fn demo_applicant(today: NaiveDate) -> ApplicantRecord {
    let birth_year = today.year() - 38;

    ApplicantRecord {
        first_name: Some("Dana".to_string()),
        last_name: Some("Whitaker".to_string()),
        email: Some("dana.whitaker@example.com".to_string()),
        phone: Some("5595550142".to_string()),
        ssn: Some("219-09-9999".to_string()),
        date_of_birth: Some(format!("01/01/{birth_year}")),
        address: Some("4410 N Blackstone Ave".to_string()),
        city: Some("Fresno".to_string()),
        state: Some("CA".to_string()),
        zip_code: Some("90704".to_string()),
        license_number: Some("D4417702".to_string()),
        license_state: Some("CA".to_string()),
        has_cdl: true,
    }
}

fn flawed_applicant() -> ApplicantRecord {
    ApplicantRecord {
        first_name: Some("Dana".to_string()),
        email: Some("dana.whitaker@".to_string()),
        ssn: Some("666-12-3456".to_string()),
        state: Some("TX".to_string()),
        zip_code: Some("90704".to_string()),
        ..ApplicantRecord::default()
    }
}

fn demo_vehicle_preference() -> VehiclePreferenceRecord {
    VehiclePreferenceRecord {
        truck_type: Some("Sleeper Cab".to_string()),
        trailer_type: Some("Reefer".to_string()),
        intended_use: Some("Long Haul".to_string()),
        ..VehiclePreferenceRecord::default()
    }
}
