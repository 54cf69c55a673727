//! Single-value shape checks and display helpers.
//!
//! Two families live here. The `matches_*_shape` functions are the patterns the form layer
//! applies to a field as typed. The `is_valid_*` predicates are the stricter utility checks
//! (digit counts, SSN blacklist) used by the application layer. They disagree on purpose in
//! places and must not be folded into each other.

use chrono::{Datelike, Days, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9+_.-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

// ASCII whitespace only, like the form layer's `\s`.
static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9 \t\n\x0B\x0C\r\-()+.]{10,}$").expect("phone pattern compiles")
});

static SSN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-?[0-9]{2}-?[0-9]{4}$").expect("ssn pattern compiles"));

// Anything after the year is ignored.
static BIRTH_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]+)/([0-9]+)/([0-9]+)").expect("birth date pattern compiles")
});

const SANITIZED_CHARACTERS: [char; 10] = ['<', '>', '"', '\'', '%', ';', '(', ')', '&', '+'];

/// Trims spaces and ASCII control characters (everything up to U+0020) from both ends.
/// Other Unicode whitespace such as NBSP is kept.
pub fn trim_form_value(value: &str) -> &str {
    value.trim_matches(|ch: char| ch <= ' ')
}

/// True when the value is absent or only spaces and control characters.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |raw| trim_form_value(raw).is_empty())
}

/// The value itself when it carries something other than spaces and control characters.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|raw| !trim_form_value(raw).is_empty())
}

/// Keeps only ASCII digits.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Form-layer phone shape: ten or more digits, spaces, hyphens, parentheses, plus signs or dots.
pub fn matches_phone_shape(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Form-layer SSN shape: `XXX-XX-XXXX` with optional hyphens.
pub fn matches_ssn_shape(value: &str) -> bool {
    SSN_PATTERN.is_match(value)
}

/// Utility phone check: 10 digits, or 11 with a country code, once punctuation is dropped.
pub fn is_valid_phone(value: &str) -> bool {
    if is_blank(Some(value)) {
        return false;
    }
    matches!(digits_only(value).len(), 10 | 11)
}

/// Utility SSN check: exactly nine digits that are not a known placeholder and do not use an
/// unassigned area number (`666`, `900`).
pub fn is_valid_ssn(value: &str) -> bool {
    if is_blank(Some(value)) {
        return false;
    }

    let digits = digits_only(value);
    if digits.len() != 9 {
        return false;
    }

    !(digits == "123456789"
        || digits == "000000000"
        || digits.starts_with("666")
        || digits.starts_with("900"))
}

/// Parses a `MM/DD/YYYY` birth date the lenient way the form always has: surrounding
/// whitespace and text after the year are ignored, and out-of-range months and days roll
/// over (`02/30/2010` is March 2, `13/01/2009` is January 1 2010).
pub fn parse_birth_date(value: &str) -> Option<NaiveDate> {
    let captures = BIRTH_DATE_PATTERN.captures(trim_form_value(value))?;
    let month: i64 = captures[1].parse().ok()?;
    let day: u64 = captures[2].parse().ok()?;
    let year: i64 = captures[3].parse().ok()?;

    let months = year.checked_mul(12)?.checked_add(month - 1)?;
    let first_of_month = NaiveDate::from_ymd_opt(
        i32::try_from(months.div_euclid(12)).ok()?,
        u32::try_from(months.rem_euclid(12) + 1).ok()?,
        1,
    )?;

    match day {
        0 => first_of_month.checked_sub_days(Days::new(1)),
        day => first_of_month.checked_add_days(Days::new(day - 1)),
    }
}

/// Age in whole years on `today`, or `None` when the date does not parse.
///
/// The birthday test compares day-of-year ordinals rather than month and day, so around
/// Feb 29 in leap years the result can be a year off. Age limits were calibrated against
/// this arithmetic.
pub fn calculate_age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let birth = parse_birth_date(date_of_birth)?;

    let mut age = today.year() - birth.year();
    if today.ordinal() < birth.ordinal() {
        age -= 1;
    }
    Some(age)
}

/// [`calculate_age_on`] against the local calendar date.
pub fn calculate_age(date_of_birth: &str) -> Option<i32> {
    calculate_age_on(date_of_birth, Local::now().date_naive())
}

/// Strips characters commonly abused for markup or query injection. Display and storage
/// hardening only; never consulted when deciding whether a step passes.
pub fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !SANITIZED_CHARACTERS.contains(ch))
        .collect()
}

/// `(XXX) XXX-XXXX` for ten-digit numbers; anything else is returned as given.
pub fn format_phone(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() != 10 {
        return value.to_string();
    }
    format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
}

/// `XXX-XX-XXXX` for nine-digit values; anything else is returned as given.
pub fn format_ssn(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() != 9 {
        return value.to_string();
    }
    format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..])
}
