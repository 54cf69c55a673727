//! Step validation for the intake form.
//!
//! Validation never fails as a control-flow error: every problem becomes a [`FieldError`]
//! keyed by the form field that caused it, and a step may advance only when the
//! accumulated [`ValidationResult`] is empty. Field checks run first in declaration order,
//! followed (applicant page only) by the cross-field rules.

mod fields;
pub mod format;
pub mod lookup;
mod rules;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::domain::{ApplicantRecord, FormField, StepKind, StepSubmission, VehiclePreferenceRecord};

pub use format::{
    calculate_age, calculate_age_on, format_phone, format_ssn, is_blank, is_valid_email,
    is_valid_phone, is_valid_ssn, sanitize,
};
pub use lookup::{
    is_valid_license_number, is_valid_state_zip, LicensePatternTable, LicenseRule, StateZipTable,
};

/// Stable message keys consumed by the message-formatting layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageCode {
    #[serde(rename = "error.required")]
    Required,
    #[serde(rename = "error.invalid")]
    Invalid,
    #[serde(rename = "error.range")]
    Range,
    #[serde(rename = "error.age.minimum")]
    AgeMinimum,
    #[serde(rename = "error.age.maximum")]
    AgeMaximum,
    #[serde(rename = "error.ssn.invalid")]
    SsnInvalid,
    #[serde(rename = "error.state.zip.mismatch")]
    StateZipMismatch,
}

impl MessageCode {
    pub const fn key(self) -> &'static str {
        match self {
            MessageCode::Required => "error.required",
            MessageCode::Invalid => "error.invalid",
            MessageCode::Range => "error.range",
            MessageCode::AgeMinimum => "error.age.minimum",
            MessageCode::AgeMaximum => "error.age.maximum",
            MessageCode::SsnInvalid => "error.ssn.invalid",
            MessageCode::StateZipMismatch => "error.state.zip.mismatch",
        }
    }
}

/// One failed check, attached to the field it should be rendered beside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: FormField,
    pub code: MessageCode,
    /// Interpolation arguments for the message template, in template order.
    pub args: Vec<String>,
}

impl FieldError {
    pub fn new(field: FormField, code: MessageCode, args: Vec<String>) -> Self {
        Self { field, code, args }
    }

    pub fn required(field: FormField) -> Self {
        Self::new(field, MessageCode::Required, vec![field.label().to_string()])
    }

    pub fn invalid(field: FormField) -> Self {
        Self::new(field, MessageCode::Invalid, vec![field.label().to_string()])
    }

    pub fn range(field: FormField, min: i32, max: i32) -> Self {
        Self::new(
            field,
            MessageCode::Range,
            vec![min.to_string(), max.to_string()],
        )
    }
}

/// Ordered errors produced for one submission. Insertion order is rule evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn errors_for(&self, field: FormField) -> impl Iterator<Item = &FieldError> + '_ {
        self.errors.iter().filter(move |error| error.field == field)
    }

    /// Distinct fields with at least one error, in first-failure order.
    pub fn fields(&self) -> Vec<FormField> {
        let mut fields = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.errors.push(error);
    }
}

/// Validates the applicant page against the local calendar date.
pub fn validate_applicant_step(record: &ApplicantRecord) -> ValidationResult {
    validate_applicant_step_as_of(record, Local::now().date_naive())
}

/// Validates the applicant page, computing ages as of `today`.
pub fn validate_applicant_step_as_of(
    record: &ApplicantRecord,
    today: NaiveDate,
) -> ValidationResult {
    let mut result = ValidationResult::default();
    fields::check_applicant_fields(record, &mut result);
    rules::check_applicant_rules(record, today, &mut result);
    result
}

pub fn validate_vehicle_step(record: &VehiclePreferenceRecord) -> ValidationResult {
    let mut result = ValidationResult::default();
    fields::check_vehicle_fields(record, &mut result);
    result
}

/// Dispatches on the submitted page, computing ages as of `today`.
pub fn validate_step_as_of(submission: &StepSubmission, today: NaiveDate) -> ValidationResult {
    match submission {
        StepSubmission::Applicant(record) => validate_applicant_step_as_of(record, today),
        StepSubmission::VehiclePreference(record) => validate_vehicle_step(record),
    }
}

pub fn validate_step(submission: &StepSubmission) -> ValidationResult {
    validate_step_as_of(submission, Local::now().date_naive())
}

/// Fields whose errors can appear for a step.
pub fn fields_for(step: StepKind) -> impl Iterator<Item = FormField> {
    ALL_FIELDS.into_iter().filter(move |field| field.step() == step)
}

const ALL_FIELDS: [FormField; 22] = [
    FormField::FirstName,
    FormField::LastName,
    FormField::Email,
    FormField::Phone,
    FormField::Ssn,
    FormField::DateOfBirth,
    FormField::Address,
    FormField::City,
    FormField::State,
    FormField::ZipCode,
    FormField::LicenseNumber,
    FormField::LicenseState,
    FormField::HasCdl,
    FormField::TruckType,
    FormField::PreferredMake,
    FormField::MaxModelYear,
    FormField::TrailerType,
    FormField::TrailerLength,
    FormField::NumberOfTrailers,
    FormField::IntendedUse,
    FormField::MilesPerYear,
    FormField::SpecialRequirements,
];
