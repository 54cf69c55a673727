use chrono::NaiveDate;

use super::super::domain::{ApplicantRecord, FormField};
use super::format::{calculate_age_on, digits_only, non_blank};
use super::lookup::StateZipTable;
use super::{FieldError, MessageCode, ValidationResult};

pub(crate) const MINIMUM_AGE: i32 = 21;
pub(crate) const MAXIMUM_AGE: i32 = 80;

/// Placeholder SSNs rejected by the application layer. Narrower than
/// [`super::format::is_valid_ssn`]: no `900` area and no length check.
const BLACKLISTED_SSNS: [&str; 2] = ["123456789", "000000000"];
const BLACKLISTED_SSN_AREA: &str = "666";

/// Business rules that span fields or need derived values. Runs regardless of how the
/// field checks went, in a fixed order: age, SSN blacklist, state/ZIP.
pub(crate) fn check_applicant_rules(
    record: &ApplicantRecord,
    today: NaiveDate,
    result: &mut ValidationResult,
) {
    if let Some(error) = age_bounds(record, today) {
        result.push(error);
    }
    if let Some(error) = ssn_blacklist(record) {
        result.push(error);
    }
    if let Some(error) = state_zip_correlation(record, StateZipTable::standard()) {
        result.push(error);
    }
}

/// A birth date that cannot be read at all counts as under age, so a non-blank date never
/// passes without an age verdict.
fn age_bounds(record: &ApplicantRecord, today: NaiveDate) -> Option<FieldError> {
    let date_of_birth = non_blank(record.date_of_birth.as_deref())?;
    let age = calculate_age_on(date_of_birth, today);

    if age.map_or(true, |age| age < MINIMUM_AGE) {
        Some(FieldError::new(
            FormField::DateOfBirth,
            MessageCode::AgeMinimum,
            vec![MINIMUM_AGE.to_string()],
        ))
    } else if age.is_some_and(|age| age > MAXIMUM_AGE) {
        Some(FieldError::new(
            FormField::DateOfBirth,
            MessageCode::AgeMaximum,
            vec![MAXIMUM_AGE.to_string()],
        ))
    } else {
        None
    }
}

fn ssn_blacklist(record: &ApplicantRecord) -> Option<FieldError> {
    let ssn = non_blank(record.ssn.as_deref())?;
    let digits = digits_only(ssn);

    let blacklisted = BLACKLISTED_SSNS.contains(&digits.as_str())
        || digits.starts_with(BLACKLISTED_SSN_AREA);
    blacklisted.then(|| FieldError::new(FormField::Ssn, MessageCode::SsnInvalid, Vec::new()))
}

fn state_zip_correlation(record: &ApplicantRecord, table: &StateZipTable) -> Option<FieldError> {
    let state = non_blank(record.state.as_deref())?;
    let zip_code = non_blank(record.zip_code.as_deref())?;

    (!table.accepts(state, zip_code)).then(|| {
        FieldError::new(
            FormField::ZipCode,
            MessageCode::StateZipMismatch,
            Vec::new(),
        )
    })
}
