use super::super::domain::{ApplicantRecord, FormField, VehiclePreferenceRecord};
use super::format::{is_blank, is_valid_email, matches_phone_shape, matches_ssn_shape, non_blank};
use super::{FieldError, ValidationResult};

pub(crate) const MIN_TRAILERS: i32 = 1;
pub(crate) const MAX_TRAILERS: i32 = 10;

type ShapeCheck = fn(&str) -> bool;

/// Required fields on the applicant page in declaration order, with the shape check the form
/// applies once a value is present.
const APPLICANT_FIELDS: [(FormField, Option<ShapeCheck>); 12] = [
    (FormField::FirstName, None),
    (FormField::LastName, None),
    (FormField::Email, Some(is_valid_email)),
    (FormField::Phone, Some(matches_phone_shape)),
    (FormField::Ssn, Some(matches_ssn_shape)),
    (FormField::DateOfBirth, None),
    (FormField::Address, None),
    (FormField::City, None),
    (FormField::State, None),
    (FormField::ZipCode, None),
    (FormField::LicenseNumber, None),
    (FormField::LicenseState, None),
];

const VEHICLE_REQUIRED_FIELDS: [FormField; 3] = [
    FormField::TruckType,
    FormField::TrailerType,
    FormField::IntendedUse,
];

fn applicant_value(record: &ApplicantRecord, field: FormField) -> Option<&str> {
    let value = match field {
        FormField::FirstName => &record.first_name,
        FormField::LastName => &record.last_name,
        FormField::Email => &record.email,
        FormField::Phone => &record.phone,
        FormField::Ssn => &record.ssn,
        FormField::DateOfBirth => &record.date_of_birth,
        FormField::Address => &record.address,
        FormField::City => &record.city,
        FormField::State => &record.state,
        FormField::ZipCode => &record.zip_code,
        FormField::LicenseNumber => &record.license_number,
        FormField::LicenseState => &record.license_state,
        _ => return None,
    };
    value.as_deref()
}

fn vehicle_value(record: &VehiclePreferenceRecord, field: FormField) -> Option<&str> {
    let value = match field {
        FormField::TruckType => &record.truck_type,
        FormField::PreferredMake => &record.preferred_make,
        FormField::MaxModelYear => &record.max_model_year,
        FormField::TrailerType => &record.trailer_type,
        FormField::TrailerLength => &record.trailer_length,
        FormField::NumberOfTrailers => &record.number_of_trailers,
        FormField::IntendedUse => &record.intended_use,
        FormField::MilesPerYear => &record.miles_per_year,
        FormField::SpecialRequirements => &record.special_requirements,
        _ => return None,
    };
    value.as_deref()
}

/// Required and shape checks for the applicant page. A field yields either `required` or
/// `invalid`, never both. `hasCDL` is a checkbox and carries no rule.
pub(crate) fn check_applicant_fields(record: &ApplicantRecord, result: &mut ValidationResult) {
    for (field, shape) in APPLICANT_FIELDS {
        match non_blank(applicant_value(record, field)) {
            None => result.push(FieldError::required(field)),
            Some(value) => {
                if let Some(check) = shape {
                    if !check(value) {
                        result.push(FieldError::invalid(field));
                    }
                }
            }
        }
    }
}

/// Required checks for the vehicle page plus the trailer count window.
pub(crate) fn check_vehicle_fields(
    record: &VehiclePreferenceRecord,
    result: &mut ValidationResult,
) {
    for field in VEHICLE_REQUIRED_FIELDS {
        if is_blank(vehicle_value(record, field)) {
            result.push(FieldError::required(field));
        }
    }

    let trailers = vehicle_value(record, FormField::NumberOfTrailers);
    if let Some(raw) = non_blank(trailers) {
        match raw.parse::<i32>() {
            Ok(count) if (MIN_TRAILERS..=MAX_TRAILERS).contains(&count) => {}
            Ok(_) => result.push(FieldError::range(
                FormField::NumberOfTrailers,
                MIN_TRAILERS,
                MAX_TRAILERS,
            )),
            Err(_) => result.push(FieldError::invalid(FormField::NumberOfTrailers)),
        }
    }
}
