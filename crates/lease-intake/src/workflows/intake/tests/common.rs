use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::intake::domain::{ApplicantRecord, VehiclePreferenceRecord};
use crate::workflows::intake::session::{
    AuditEntry, AuditError, AuditLog, IntakeSession, RepositoryError, SessionId,
    SessionRepository,
};
use crate::workflows::intake::{intake_router, IntakeWorkflowService};

pub(super) fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid date")
}

pub(super) fn applicant() -> ApplicantRecord {
    ApplicantRecord {
        first_name: Some("Dana".to_string()),
        last_name: Some("Whitaker".to_string()),
        email: Some("dana.whitaker@example.com".to_string()),
        phone: Some("(559) 555-0142".to_string()),
        ssn: Some("219-09-9999".to_string()),
        date_of_birth: Some("07/04/1985".to_string()),
        address: Some("4410 N Blackstone Ave".to_string()),
        city: Some("Fresno".to_string()),
        state: Some("CA".to_string()),
        zip_code: Some("90704".to_string()),
        license_number: Some("D4417702".to_string()),
        license_state: Some("CA".to_string()),
        has_cdl: true,
    }
}

pub(super) fn vehicle_preference() -> VehiclePreferenceRecord {
    VehiclePreferenceRecord {
        truck_type: Some("Sleeper Cab".to_string()),
        preferred_make: Some("Freightliner".to_string()),
        max_model_year: Some("2022".to_string()),
        trailer_type: Some("Reefer".to_string()),
        trailer_length: Some("53".to_string()),
        number_of_trailers: Some("2".to_string()),
        intended_use: Some("Long Haul".to_string()),
        miles_per_year: Some("120000".to_string()),
        special_requirements: None,
    }
}

pub(super) fn build_service() -> (
    IntakeWorkflowService<MemorySessions, MemoryAudit>,
    Arc<MemorySessions>,
    Arc<MemoryAudit>,
) {
    let sessions = Arc::new(MemorySessions::default());
    let audit = Arc::new(MemoryAudit::default());
    let service =
        IntakeWorkflowService::new(sessions.clone(), audit.clone()).with_clock(reference_date);
    (service, sessions, audit)
}

#[derive(Default, Clone)]
pub(super) struct MemorySessions {
    pub(super) sessions: Arc<Mutex<HashMap<SessionId, IntakeSession>>>,
}

impl SessionRepository for MemorySessions {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError> {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        let stored = guard
            .get_mut(&session.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.supersede(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryAudit {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl MemoryAudit {
    pub(super) fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().expect("audit mutex poisoned").clone()
    }
}

impl AuditLog for MemoryAudit {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

/// Accepts new sessions but fails every subsequent write.
#[derive(Default)]
pub(super) struct ReadOnlySessions {
    inner: MemorySessions,
}

impl SessionRepository for ReadOnlySessions {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        self.inner.insert(session)
    }

    fn update(&self, _session: IntakeSession) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        self.inner.fetch(id)
    }
}

/// Lands a competing applicant write between the service's read and its write-back, the way
/// a second request on the same session would.
#[derive(Default)]
pub(super) struct RacingSessions {
    inner: MemorySessions,
    rival: Mutex<Option<ApplicantRecord>>,
}

impl RacingSessions {
    pub(super) fn interleave(&self, applicant: ApplicantRecord) {
        *self.rival.lock().expect("rival mutex poisoned") = Some(applicant);
    }
}

impl SessionRepository for RacingSessions {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        self.inner.insert(session)
    }

    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError> {
        self.inner.update(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        let snapshot = self.inner.fetch(id)?;
        let rival = self.rival.lock().expect("rival mutex poisoned").take();
        if let (Some(applicant), Some(current)) = (rival, snapshot.as_ref()) {
            let mut competing = current.clone();
            competing.applicant = Some(applicant);
            self.inner.update(competing)?;
        }
        Ok(snapshot)
    }
}

pub(super) struct OfflineAudit;

impl AuditLog for OfflineAudit {
    fn append(&self, _entry: AuditEntry) -> Result<(), AuditError> {
        Err(AuditError::Transport("audit sink offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn router_with_service(
    service: IntakeWorkflowService<MemorySessions, MemoryAudit>,
) -> axum::Router {
    intake_router(Arc::new(service))
}
