use serde::{Deserialize, Serialize};

/// Default trailer count applied whenever a vehicle-preference record is constructed.
pub const DEFAULT_NUMBER_OF_TRAILERS: &str = "1";

/// Step one of the intake form: who is applying and which license they hold.
///
/// Text fields stay optional strings because they arrive verbatim from the form; absence and
/// whitespace are both judged by the validators rather than by deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantRecord {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub ssn: Option<String>,
    /// `MM/DD/YYYY`
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub license_number: Option<String>,
    pub license_state: Option<String>,
    #[serde(rename = "hasCDL")]
    pub has_cdl: bool,
}

/// Step two of the intake form: the equipment the applicant wants to lease.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehiclePreferenceRecord {
    pub truck_type: Option<String>,
    pub preferred_make: Option<String>,
    pub max_model_year: Option<String>,
    pub trailer_type: Option<String>,
    pub trailer_length: Option<String>,
    pub number_of_trailers: Option<String>,
    pub intended_use: Option<String>,
    pub miles_per_year: Option<String>,
    pub special_requirements: Option<String>,
}

impl Default for VehiclePreferenceRecord {
    fn default() -> Self {
        Self {
            truck_type: None,
            preferred_make: None,
            max_model_year: None,
            trailer_type: None,
            trailer_length: None,
            number_of_trailers: Some(DEFAULT_NUMBER_OF_TRAILERS.to_string()),
            intended_use: None,
            miles_per_year: None,
            special_requirements: None,
        }
    }
}

/// Every input on both intake pages. Errors are keyed by these so collaborators can render
/// them inline next to the matching control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    FirstName,
    LastName,
    Email,
    Phone,
    Ssn,
    DateOfBirth,
    Address,
    City,
    State,
    ZipCode,
    LicenseNumber,
    LicenseState,
    #[serde(rename = "hasCDL")]
    HasCdl,
    TruckType,
    PreferredMake,
    MaxModelYear,
    TrailerType,
    TrailerLength,
    NumberOfTrailers,
    IntendedUse,
    MilesPerYear,
    SpecialRequirements,
}

impl FormField {
    /// Record key as submitted by the form.
    pub const fn key(self) -> &'static str {
        match self {
            FormField::FirstName => "firstName",
            FormField::LastName => "lastName",
            FormField::Email => "email",
            FormField::Phone => "phone",
            FormField::Ssn => "ssn",
            FormField::DateOfBirth => "dateOfBirth",
            FormField::Address => "address",
            FormField::City => "city",
            FormField::State => "state",
            FormField::ZipCode => "zipCode",
            FormField::LicenseNumber => "licenseNumber",
            FormField::LicenseState => "licenseState",
            FormField::HasCdl => "hasCDL",
            FormField::TruckType => "truckType",
            FormField::PreferredMake => "preferredMake",
            FormField::MaxModelYear => "maxModelYear",
            FormField::TrailerType => "trailerType",
            FormField::TrailerLength => "trailerLength",
            FormField::NumberOfTrailers => "numberOfTrailers",
            FormField::IntendedUse => "intendedUse",
            FormField::MilesPerYear => "milesPerYear",
            FormField::SpecialRequirements => "specialRequirements",
        }
    }

    /// Human label interpolated into `required` and `invalid` messages.
    pub const fn label(self) -> &'static str {
        match self {
            FormField::FirstName => "First Name",
            FormField::LastName => "Last Name",
            FormField::Email => "Email Address",
            FormField::Phone => "Phone Number",
            FormField::Ssn => "Social Security Number",
            FormField::DateOfBirth => "Date of Birth",
            FormField::Address => "Address",
            FormField::City => "City",
            FormField::State => "State",
            FormField::ZipCode => "ZIP Code",
            FormField::LicenseNumber => "Driver's License Number",
            FormField::LicenseState => "License State",
            FormField::HasCdl => "Commercial Driver's License",
            FormField::TruckType => "Truck Type",
            FormField::PreferredMake => "Preferred Make",
            FormField::MaxModelYear => "Maximum Model Year",
            FormField::TrailerType => "Trailer Type",
            FormField::TrailerLength => "Trailer Length",
            FormField::NumberOfTrailers => "Number of Trailers",
            FormField::IntendedUse => "Primary Use",
            FormField::MilesPerYear => "Miles per Year",
            FormField::SpecialRequirements => "Special Requirements",
        }
    }

    /// Page that owns the field.
    pub const fn step(self) -> StepKind {
        match self {
            FormField::TruckType
            | FormField::PreferredMake
            | FormField::MaxModelYear
            | FormField::TrailerType
            | FormField::TrailerLength
            | FormField::NumberOfTrailers
            | FormField::IntendedUse
            | FormField::MilesPerYear
            | FormField::SpecialRequirements => StepKind::VehiclePreference,
            _ => StepKind::Applicant,
        }
    }
}

/// Pages of the multi-step intake form, in the order applicants walk them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Applicant,
    VehiclePreference,
}

impl StepKind {
    pub const fn label(self) -> &'static str {
        match self {
            StepKind::Applicant => "applicant_info",
            StepKind::VehiclePreference => "vehicle_preference",
        }
    }

    /// Form route rendered for the step.
    pub const fn route(self) -> &'static str {
        match self {
            StepKind::Applicant => "/applicant-info",
            StepKind::VehiclePreference => "/vehicle-preference",
        }
    }

    /// Step that follows a successful submission. Later pages (financial information,
    /// background check) are handled outside this crate.
    pub const fn next(self) -> Option<StepKind> {
        match self {
            StepKind::Applicant => Some(StepKind::VehiclePreference),
            StepKind::VehiclePreference => None,
        }
    }
}

/// A submitted page tagged with the step it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "record", rename_all = "snake_case")]
pub enum StepSubmission {
    Applicant(ApplicantRecord),
    VehiclePreference(VehiclePreferenceRecord),
}

impl StepSubmission {
    pub const fn kind(&self) -> StepKind {
        match self {
            StepSubmission::Applicant(_) => StepKind::Applicant,
            StepSubmission::VehiclePreference(_) => StepKind::VehiclePreference,
        }
    }
}
