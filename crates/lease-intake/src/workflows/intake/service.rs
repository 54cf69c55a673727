use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::domain::{ApplicantRecord, StepKind, VehiclePreferenceRecord};
use super::session::{
    display_name, AuditEntry, AuditError, AuditLog, IntakeSession, RepositoryError, SessionId,
    SessionRepository,
};
use super::validation::format::{non_blank, sanitize};
use super::validation::{
    validate_applicant_step_as_of, validate_vehicle_step, FieldError, ValidationResult,
};

/// Source of the calendar date used for applicant age checks.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Workflow controller for the intake form: validates each submitted page, and on success
/// stores it in the session and records an audit entry.
pub struct IntakeWorkflowService<R, A> {
    repository: Arc<R>,
    audit: Arc<A>,
    clock: Clock,
    reference_date: Option<NaiveDate>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("intake-{id:06}"))
}

/// Result of submitting one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Accepted {
        step: StepKind,
        #[serde(skip_serializing_if = "Option::is_none")]
        next_step: Option<StepKind>,
    },
    Rejected {
        step: StepKind,
        errors: Vec<FieldError>,
    },
}

impl StepOutcome {
    fn from_validation(step: StepKind, result: ValidationResult) -> Self {
        if result.is_valid() {
            StepOutcome::Accepted {
                step,
                next_step: step.next(),
            }
        } else {
            StepOutcome::Rejected {
                step,
                errors: result.into_errors(),
            }
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, StepOutcome::Accepted { .. })
    }

    pub fn step(&self) -> StepKind {
        match self {
            StepOutcome::Accepted { step, .. } | StepOutcome::Rejected { step, .. } => *step,
        }
    }
}

impl<R, A> IntakeWorkflowService<R, A>
where
    R: SessionRepository + 'static,
    A: AuditLog + 'static,
{
    pub fn new(repository: Arc<R>, audit: Arc<A>) -> Self {
        Self {
            repository,
            audit,
            clock: local_today,
            reference_date: None,
        }
    }

    /// Replace the clock used for age checks.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Pin the date used for age checks. `None` falls back to the clock.
    pub fn with_reference_date(mut self, reference_date: Option<NaiveDate>) -> Self {
        self.reference_date = reference_date;
        self
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(self.clock)
    }

    pub fn start_session(&self) -> Result<IntakeSession, IntakeServiceError> {
        let session = IntakeSession::new(next_session_id(), Utc::now());
        let stored = self.repository.insert(session)?;
        info!(session = %stored.id.0, "intake session started");
        Ok(stored)
    }

    /// Validate and store the applicant page. Resubmitting replaces the stored record.
    pub fn submit_applicant(
        &self,
        session_id: &SessionId,
        record: ApplicantRecord,
    ) -> Result<StepOutcome, IntakeServiceError> {
        let mut session = self.get(session_id)?;

        let result = validate_applicant_step_as_of(&record, self.today());
        let outcome = StepOutcome::from_validation(StepKind::Applicant, result);
        if !outcome.is_accepted() {
            log_rejection(session_id, &outcome);
            return Ok(outcome);
        }

        let message = format!(
            "Applicant info collected for: {} (Email: {})",
            display_name(&record),
            non_blank(record.email.as_deref())
                .map(sanitize)
                .unwrap_or_default()
        );
        session.applicant = Some(record);
        self.persist(session, StepKind::Applicant, message)?;

        Ok(outcome)
    }

    /// Validate and store the vehicle page. Refused until the applicant page has been accepted.
    pub fn submit_vehicle_preference(
        &self,
        session_id: &SessionId,
        record: VehiclePreferenceRecord,
    ) -> Result<StepOutcome, IntakeServiceError> {
        let mut session = self.get(session_id)?;
        let Some(applicant) = session.applicant.as_ref() else {
            return Err(IntakeServiceError::StepOutOfOrder {
                requested: StepKind::VehiclePreference,
                required: StepKind::Applicant,
            });
        };

        let result = validate_vehicle_step(&record);
        let outcome = StepOutcome::from_validation(StepKind::VehiclePreference, result);
        if !outcome.is_accepted() {
            log_rejection(session_id, &outcome);
            return Ok(outcome);
        }

        let message = format!(
            "Vehicle preferences collected for: {} (Truck: {}, Trailer: {})",
            display_name(applicant),
            non_blank(record.truck_type.as_deref())
                .map(sanitize)
                .unwrap_or_default(),
            non_blank(record.trailer_type.as_deref())
                .map(sanitize)
                .unwrap_or_default()
        );
        session.vehicle_preference = Some(record);
        self.persist(session, StepKind::VehiclePreference, message)?;

        Ok(outcome)
    }

    pub fn get(&self, session_id: &SessionId) -> Result<IntakeSession, IntakeServiceError> {
        let session = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session)
    }

    /// Writes the session back, then appends the audit entry. A stale write fails before
    /// anything is audited; an audit failure leaves the step stored and is still reported.
    fn persist(
        &self,
        session: IntakeSession,
        step: StepKind,
        message: String,
    ) -> Result<(), IntakeServiceError> {
        let session_id = session.id.clone();
        self.repository.update(session)?;
        self.audit.append(AuditEntry {
            session_id: session_id.clone(),
            step,
            message,
            recorded_at: Utc::now(),
        })?;
        info!(session = %session_id.0, step = step.label(), "intake step accepted");
        Ok(())
    }
}

fn log_rejection(session_id: &SessionId, outcome: &StepOutcome) {
    if let StepOutcome::Rejected { step, errors } = outcome {
        warn!(
            session = %session_id.0,
            step = step.label(),
            error_count = errors.len(),
            "intake step rejected"
        );
    }
}

/// Error raised by the intake workflow service. Validation failures are not errors; they
/// come back as [`StepOutcome::Rejected`].
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("{requested:?} cannot be submitted before {required:?} is complete")]
    StepOutOfOrder {
        requested: StepKind,
        required: StepKind,
    },
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Audit(#[from] AuditError),
}
