//! Multi-step intake for commercial truck lease applications.
//!
//! The validation core decides whether each submitted page may advance; the service and router
//! wrap it with session storage and an audit trail supplied by the caller.

pub mod domain;
pub mod router;
pub mod service;
pub mod session;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    ApplicantRecord, FormField, StepKind, StepSubmission, VehiclePreferenceRecord,
    DEFAULT_NUMBER_OF_TRAILERS,
};
pub use router::intake_router;
pub use service::{Clock, IntakeServiceError, IntakeWorkflowService, StepOutcome};
pub use session::{
    ApplicantSummary, AuditEntry, AuditError, AuditLog, IntakeSession, IntakeSessionView,
    RepositoryError, SessionId, SessionRepository, VehicleSummary,
};
pub use validation::{
    validate_applicant_step, validate_applicant_step_as_of, validate_step, validate_step_as_of,
    validate_vehicle_step, FieldError, MessageCode, ValidationResult,
};
