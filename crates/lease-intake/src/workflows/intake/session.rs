use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, StepKind, VehiclePreferenceRecord};
use super::validation::format::{digits_only, format_phone, format_ssn, non_blank, sanitize};

/// Identifier wrapper for an applicant's pass through the intake form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SessionId(pub String);

/// Everything captured for one applicant so far. Only records that passed validation are
/// ever stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeSession {
    pub id: SessionId,
    pub started_at: DateTime<Utc>,
    pub applicant: Option<ApplicantRecord>,
    pub vehicle_preference: Option<VehiclePreferenceRecord>,
    /// Bumped on every stored update; a write carrying an older value is stale.
    #[serde(default)]
    pub version: u64,
}

impl IntakeSession {
    pub fn new(id: SessionId, started_at: DateTime<Utc>) -> Self {
        Self {
            id,
            started_at,
            applicant: None,
            vehicle_preference: None,
            version: 0,
        }
    }

    /// Compare-and-swap step for repositories: replaces `self` with `next` when `next` was
    /// read at the current version, then bumps the version.
    pub fn supersede(&mut self, next: IntakeSession) -> Result<(), RepositoryError> {
        if next.version != self.version {
            return Err(RepositoryError::Conflict);
        }
        *self = next;
        self.version += 1;
        Ok(())
    }

    pub fn completed_steps(&self) -> Vec<StepKind> {
        let mut steps = Vec::new();
        if self.applicant.is_some() {
            steps.push(StepKind::Applicant);
        }
        if self.vehicle_preference.is_some() {
            steps.push(StepKind::VehiclePreference);
        }
        steps
    }

    /// First step still waiting for a valid submission.
    pub fn current_step(&self) -> Option<StepKind> {
        if self.applicant.is_none() {
            Some(StepKind::Applicant)
        } else if self.vehicle_preference.is_none() {
            Some(StepKind::VehiclePreference)
        } else {
            None
        }
    }

    pub fn summary_view(&self) -> IntakeSessionView {
        IntakeSessionView {
            session_id: self.id.clone(),
            started_at: self.started_at,
            completed_steps: self.completed_steps(),
            current_step: self.current_step(),
            applicant: self.applicant.as_ref().map(ApplicantSummary::from_record),
            vehicle_preference: self
                .vehicle_preference
                .as_ref()
                .map(VehicleSummary::from_record),
        }
    }
}

/// Sanitized representation of a session for display. SSNs are masked to the last four.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeSessionView {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub completed_steps: Vec<StepKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<StepKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applicant: Option<ApplicantSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_preference: Option<VehicleSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicantSummary {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ssn: Option<String>,
    pub location: Option<String>,
    pub has_cdl: bool,
}

impl ApplicantSummary {
    fn from_record(record: &ApplicantRecord) -> Self {
        Self {
            name: display_name(record),
            email: non_blank(record.email.as_deref()).map(sanitize),
            phone: non_blank(record.phone.as_deref()).map(format_phone),
            ssn: non_blank(record.ssn.as_deref()).map(mask_ssn),
            location: location(record),
            has_cdl: record.has_cdl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleSummary {
    pub truck_type: Option<String>,
    pub trailer_type: Option<String>,
    pub number_of_trailers: Option<String>,
    pub intended_use: Option<String>,
}

impl VehicleSummary {
    fn from_record(record: &VehiclePreferenceRecord) -> Self {
        let clean = |value: &Option<String>| non_blank(value.as_deref()).map(sanitize);
        Self {
            truck_type: clean(&record.truck_type),
            trailer_type: clean(&record.trailer_type),
            number_of_trailers: clean(&record.number_of_trailers),
            intended_use: clean(&record.intended_use),
        }
    }
}

/// `First Last` with injection characters stripped.
pub(crate) fn display_name(record: &ApplicantRecord) -> String {
    [record.first_name.as_deref(), record.last_name.as_deref()]
        .into_iter()
        .filter_map(non_blank)
        .map(|part| sanitize(part.trim()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn location(record: &ApplicantRecord) -> Option<String> {
    let city = non_blank(record.city.as_deref()).map(|city| sanitize(city.trim()));
    let state = non_blank(record.state.as_deref()).map(|state| state.trim().to_ascii_uppercase());
    match (city, state) {
        (Some(city), Some(state)) => Some(format!("{city}, {state}")),
        (city, state) => city.or(state),
    }
}

fn mask_ssn(ssn: &str) -> String {
    let formatted = format_ssn(ssn);
    let digits = digits_only(&formatted);
    if digits.len() != 9 {
        return "***-**-****".to_string();
    }
    format!("***-**-{}", &digits[5..])
}

/// Persistence abstraction for intake sessions, one record per session id.
///
/// `update` must be atomic per session: it stores the session only when the stored copy still
/// has the same `version` ([`IntakeSession::supersede`]), and reports a stale write as
/// [`RepositoryError::Conflict`].
pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError>;
    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists or was changed concurrently")]
    Conflict,
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only trail of accepted steps.
pub trait AuditLog: Send + Sync {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub session_id: SessionId,
    pub step: StepKind,
    pub message: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit transport unavailable: {0}")]
    Transport(String),
}
