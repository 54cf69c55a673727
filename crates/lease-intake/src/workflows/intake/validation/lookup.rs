//! Static reference data consulted by the cross-field rules.
//!
//! Both tables are deliberately partial. A state missing from [`StateZipTable`] is not a gap
//! to fill in silently: it means "no constraint known", and every ZIP is accepted for it.

use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use once_cell::sync::Lazy;
use regex::Regex;

use super::format::is_blank;

const STATE_ZIP_RANGES: &[(&str, &[RangeInclusive<u16>])] = &[
    ("CA", &[900..=908]),
    ("TX", &[733..=739, 750..=785]),
    ("FL", &[320..=339]),
    ("NY", &[100..=149]),
];

/// State code (upper case) to the three-digit ZIP prefixes issued for it.
#[derive(Debug)]
pub struct StateZipTable {
    prefixes: BTreeMap<&'static str, Vec<String>>,
}

static STATE_ZIP_TABLE: Lazy<StateZipTable> = Lazy::new(|| {
    let prefixes = STATE_ZIP_RANGES
        .iter()
        .map(|(state, ranges)| {
            let listed: Vec<String> = ranges
                .iter()
                .flat_map(|range| range.clone())
                .map(|prefix| format!("{prefix:03}"))
                .collect();
            (*state, listed)
        })
        .collect();
    StateZipTable { prefixes }
});

impl StateZipTable {
    pub fn standard() -> &'static StateZipTable {
        &STATE_ZIP_TABLE
    }

    /// Prefixes for `state`, or `None` when the table places no constraint on it.
    pub fn prefixes(&self, state: &str) -> Option<&[String]> {
        self.prefixes
            .get(state.to_ascii_uppercase().as_str())
            .map(Vec::as_slice)
    }

    pub fn states(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.prefixes.keys().copied()
    }

    /// Unknown states always pass. Otherwise the first three characters of the ZIP (all of it
    /// when shorter) must begin with a listed prefix, so a two-character ZIP never matches.
    pub fn accepts(&self, state: &str, zip_code: &str) -> bool {
        let Some(listed) = self.prefixes(state) else {
            return true;
        };

        let zip_prefix: String = zip_code.chars().take(3).collect();
        listed
            .iter()
            .any(|prefix| zip_prefix.starts_with(prefix.as_str()))
    }
}

/// Blank state or ZIP never validates; see [`StateZipTable::accepts`] for the rest.
pub fn is_valid_state_zip(state: &str, zip_code: &str) -> bool {
    if is_blank(Some(state)) || is_blank(Some(zip_code)) {
        return false;
    }
    StateZipTable::standard().accepts(state, zip_code)
}

const UNLISTED_LICENSE_LENGTH: RangeInclusive<usize> = 5..=15;

/// Shape a driver's license number must take for a given issuing state.
#[derive(Debug)]
pub enum LicenseRule {
    Pattern(Regex),
    Length(RangeInclusive<usize>),
}

impl LicenseRule {
    pub fn permits(&self, license_number: &str) -> bool {
        match self {
            LicenseRule::Pattern(pattern) => pattern.is_match(license_number),
            LicenseRule::Length(bounds) => bounds.contains(&license_number.chars().count()),
        }
    }
}

/// State code to license number format. Unlisted states fall back to a length window.
#[derive(Debug)]
pub struct LicensePatternTable {
    rules: BTreeMap<&'static str, LicenseRule>,
    fallback: LicenseRule,
}

static LICENSE_PATTERN_TABLE: Lazy<LicensePatternTable> = Lazy::new(|| {
    let patterns = [
        ("CA", r"^[A-Z][0-9]{7}$"),
        ("TX", r"^[0-9]{8}$"),
        ("FL", r"^[A-Z][0-9]{12}$"),
        ("NY", r"^[0-9]{9}$"),
    ];
    let rules: BTreeMap<_, _> = patterns
        .into_iter()
        .map(|(state, pattern)| {
            let compiled = Regex::new(pattern).expect("license pattern compiles");
            (state, LicenseRule::Pattern(compiled))
        })
        .collect();

    LicensePatternTable {
        rules,
        fallback: LicenseRule::Length(UNLISTED_LICENSE_LENGTH),
    }
});

impl LicensePatternTable {
    pub fn standard() -> &'static LicensePatternTable {
        &LICENSE_PATTERN_TABLE
    }

    pub fn rule_for(&self, state: &str) -> &LicenseRule {
        self.rules
            .get(state.to_ascii_uppercase().as_str())
            .unwrap_or(&self.fallback)
    }
}

/// License format check for the issuing state. Not part of any step's gating.
pub fn is_valid_license_number(license_number: &str, state: &str) -> bool {
    if is_blank(Some(license_number)) || is_blank(Some(state)) {
        return false;
    }
    LicensePatternTable::standard()
        .rule_for(state)
        .permits(license_number)
}
