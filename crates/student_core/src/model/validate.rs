//! Field validators for the student entity.
//!
//! # Responsibility
//! - Own every field-level rule (id, names, address, phone, hours).
//! - Keep the two generations of address/phone rules as explicit regimes.
//!
//! # Invariants
//! - Validators return the normalized value; callers store only that value.
//! - `ValidationRegime::Structured` is the regime used by entity construction.
//! - `ValidationRegime::Legacy` is never applied implicitly.

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const LEGACY_ADDRESS_MIN_CHARS: usize = 10;
const LEGACY_ADDRESS_KEYWORDS: &[&str] = &[
    "ул.", "улица", "д.", "дом", "кв.", "квартира", "пр.", "проспект",
];

static NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-zА-Яа-яЁё]+(?:-[A-Za-zА-Яа-яЁё]+)*$").expect("valid name regex")
});
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\+7\d{10}$").expect("valid phone regex"));
static LEGACY_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+\d{11}$").expect("valid legacy phone regex"));
static REGION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:Респ\.|Край|Обл\.)").expect("valid region regex"));
static LOCALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:г\.|с\.|ст-ца|а\.)").expect("valid locality regex"));
static STREET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:ул\.|улица|пр\.|проспект|бульвар|б-р|переулок|пер\.|аллея|шоссе)")
        .expect("valid street regex")
});
static HOUSE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:д\.|дом)\s*\d+").expect("valid house regex"));

/// Field-level rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Id is not a positive integer that fits `StudentId`.
    InvalidId(i64),
    /// Required name field is empty after trimming.
    EmptyName(&'static str),
    /// Name contains characters other than letters and internal hyphens.
    InvalidName { field: &'static str, value: String },
    EmptyAddress,
    AddressTooShort(String),
    MissingAddressKeyword(String),
    /// More than one region marker (`Респ.`, `Край`, `Обл.`).
    ConflictingRegionMarkers(Vec<String>),
    /// More than one locality marker (`г.`, `с.`, `ст-ца`, `а.`).
    ConflictingLocalityMarkers(Vec<String>),
    MissingStreet(String),
    MissingHouseNumber(String),
    InvalidPhone(String),
    /// Hours are negative or do not fit `u32`.
    InvalidHours(i64),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(value) => write!(f, "student id must be a positive integer, got {value}"),
            Self::EmptyName(field) => write!(f, "{field} must be a non-empty string"),
            Self::InvalidName { field, value } => {
                write!(f, "{field} has invalid format: `{value}`")
            }
            Self::EmptyAddress => write!(f, "address must be a non-empty string"),
            Self::AddressTooShort(value) => {
                write!(f, "address is too short to be valid: `{value}`")
            }
            Self::MissingAddressKeyword(value) => write!(
                f,
                "address has no typical address component (ул., д., кв., ...): `{value}`"
            ),
            Self::ConflictingRegionMarkers(found) => write!(
                f,
                "address names more than one region: {}",
                found.join(", ")
            ),
            Self::ConflictingLocalityMarkers(found) => write!(
                f,
                "address names more than one locality: {}",
                found.join(", ")
            ),
            Self::MissingStreet(value) => write!(f, "address has no street: `{value}`"),
            Self::MissingHouseNumber(value) => {
                write!(f, "address has no house number: `{value}`")
            }
            Self::InvalidPhone(value) => write!(
                f,
                "phone must be `+7` followed by exactly 10 digits, got `{value}`"
            ),
            Self::InvalidHours(value) => write!(
                f,
                "min required facultative hours must be a non-negative integer, got {value}"
            ),
        }
    }
}

impl Error for ValidationError {}

/// Versioned address/phone rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ValidationRegime {
    /// Keyword-substring address check and `+` with 11 digits phone check.
    Legacy,
    /// Region/locality exclusivity plus street and house tokens; `+7` phones.
    #[default]
    Structured,
}

impl ValidationRegime {
    /// Regime applied by every entity constructor and mutator.
    pub const CURRENT: Self = Self::Structured;

    /// Validates and trims an address under this regime.
    pub fn validate_address(self, address: &str) -> Result<String, ValidationError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(ValidationError::EmptyAddress);
        }

        match self {
            Self::Legacy => validate_legacy_address(address)?,
            Self::Structured => validate_structured_address(address)?,
        }
        Ok(address.to_string())
    }

    /// Validates and trims a phone number under this regime.
    pub fn validate_phone(self, phone: &str) -> Result<String, ValidationError> {
        let phone = phone.trim();
        let pattern = match self {
            Self::Legacy => &*LEGACY_PHONE_RE,
            Self::Structured => &*PHONE_RE,
        };
        if !pattern.is_match(phone) {
            return Err(ValidationError::InvalidPhone(phone.to_string()));
        }
        Ok(phone.to_string())
    }
}

fn validate_legacy_address(address: &str) -> Result<(), ValidationError> {
    if address.chars().count() < LEGACY_ADDRESS_MIN_CHARS {
        return Err(ValidationError::AddressTooShort(address.to_string()));
    }
    let lowered = address.to_lowercase();
    if !LEGACY_ADDRESS_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        return Err(ValidationError::MissingAddressKeyword(address.to_string()));
    }
    Ok(())
}

fn validate_structured_address(address: &str) -> Result<(), ValidationError> {
    let regions = marker_occurrences(&REGION_RE, address);
    if regions.len() > 1 {
        return Err(ValidationError::ConflictingRegionMarkers(regions));
    }
    let localities = marker_occurrences(&LOCALITY_RE, address);
    if localities.len() > 1 {
        return Err(ValidationError::ConflictingLocalityMarkers(localities));
    }
    if !STREET_RE.is_match(address) {
        return Err(ValidationError::MissingStreet(address.to_string()));
    }
    if !HOUSE_RE.is_match(address) {
        return Err(ValidationError::MissingHouseNumber(address.to_string()));
    }
    Ok(())
}

fn marker_occurrences(pattern: &Regex, address: &str) -> Vec<String> {
    pattern
        .find_iter(address)
        .map(|found| found.as_str().to_string())
        .collect()
}

/// Validates a caller-supplied id.
pub fn validate_id(value: i64) -> Result<u32, ValidationError> {
    match u32::try_from(value) {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidId(value)),
    }
}

/// Validates a required name field and returns it in title case.
pub fn validate_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName(field));
    }
    check_name_format(field, trimmed)
}

/// Validates an optional patronymic. Blank input normalizes to `None`.
pub fn validate_patronymic(value: Option<&str>) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(trimmed) => check_name_format("patronymic", trimmed).map(Some),
    }
}

/// Validates the required facultative hours.
pub fn validate_hours(value: i64) -> Result<u32, ValidationError> {
    u32::try_from(value).map_err(|_| ValidationError::InvalidHours(value))
}

fn check_name_format(field: &'static str, value: &str) -> Result<String, ValidationError> {
    if !NAME_RE.is_match(value) {
        return Err(ValidationError::InvalidName {
            field,
            value: value.to_string(),
        });
    }
    Ok(title_case(value))
}

fn title_case(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if at_word_start {
            result.extend(c.to_uppercase());
        } else {
            result.extend(c.to_lowercase());
        }
        at_word_start = !c.is_alphabetic();
    }
    result
}
