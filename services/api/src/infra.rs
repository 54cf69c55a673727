use chrono::NaiveDate;
use lease_intake::workflows::intake::{
    AuditEntry, AuditError, AuditLog, IntakeSession, RepositoryError, SessionId,
    SessionRepository,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    sessions: Arc<Mutex<HashMap<SessionId, IntakeSession>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, session: IntakeSession) -> Result<IntakeSession, RepositoryError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))?;
        if guard.contains_key(&session.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(session.id.clone(), session.clone());
        Ok(session)
    }

    fn update(&self, session: IntakeSession) -> Result<(), RepositoryError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))?;
        let stored = guard
            .get_mut(&session.id)
            .ok_or(RepositoryError::NotFound)?;
        stored.supersede(session)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<IntakeSession>, RepositoryError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|_| RepositoryError::Unavailable("session mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }
}

/// Keeps audit entries in memory and mirrors each one to the tracing pipeline.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditLog {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditLog for InMemoryAuditLog {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        tracing::debug!(
            session = %entry.session_id.0,
            step = entry.step.label(),
            "audit entry recorded"
        );
        let mut guard = self
            .entries
            .lock()
            .map_err(|_| AuditError::Transport("audit mutex poisoned".to_string()))?;
        guard.push(entry);
        Ok(())
    }
}

impl InMemoryAuditLog {
    pub(crate) fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
