//! Student domain model.
//!
//! # Responsibility
//! - Define the validated `Student` value object and its canonical record.
//! - Provide the single validation path shared by every input shape.
//!
//! # Invariants
//! - A `Student` is never observably invalid: fields are private and every
//!   mutator validates before it assigns.
//! - Equality compares all seven fields.

use crate::model::ingest::{StudentError, StudentInput};
use crate::model::validate::{
    validate_hours, validate_id, validate_name, validate_patronymic, ValidationError,
    ValidationRegime,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Repository-assigned student identifier. Always positive.
pub type StudentId = u32;

/// Canonical structured form of student data before validation.
///
/// Integer fields are wide and signed so that out-of-range input reaches the
/// validator instead of failing as a parse error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub student_id: i64,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub patronymic: Option<String>,
    pub address: String,
    pub phone: String,
    #[serde(default)]
    pub min_required_facultative_hours: i64,
}

/// Validated student entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    first_name: String,
    last_name: String,
    patronymic: Option<String>,
    address: String,
    phone: String,
    min_required_facultative_hours: u32,
}

impl Student {
    /// Normalizes any supported input shape and validates it.
    pub fn parse(input: StudentInput) -> Result<Self, StudentError> {
        let record = input.into_record()?;
        Ok(Self::from_record(&record)?)
    }

    /// Validates a canonical record.
    ///
    /// # Errors
    /// - Returns the first field rule violated, in canonical field order.
    pub fn from_record(record: &StudentRecord) -> Result<Self, ValidationError> {
        let regime = ValidationRegime::CURRENT;
        Ok(Self {
            id: validate_id(record.student_id)?,
            first_name: validate_name("first_name", &record.first_name)?,
            last_name: validate_name("last_name", &record.last_name)?,
            patronymic: validate_patronymic(record.patronymic.as_deref())?,
            address: regime.validate_address(&record.address)?,
            phone: regime.validate_phone(&record.phone)?,
            min_required_facultative_hours: validate_hours(
                record.min_required_facultative_hours,
            )?,
        })
    }

    /// Returns the canonical record for this entity.
    pub fn to_record(&self) -> StudentRecord {
        StudentRecord {
            student_id: i64::from(self.id),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            patronymic: self.patronymic.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            min_required_facultative_hours: i64::from(self.min_required_facultative_hours),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn patronymic(&self) -> Option<&str> {
        self.patronymic.as_deref()
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn min_required_facultative_hours(&self) -> u32 {
        self.min_required_facultative_hours
    }

    pub fn set_id(&mut self, value: i64) -> Result<(), ValidationError> {
        self.id = validate_id(value)?;
        Ok(())
    }

    pub fn set_first_name(&mut self, value: &str) -> Result<(), ValidationError> {
        self.first_name = validate_name("first_name", value)?;
        Ok(())
    }

    pub fn set_last_name(&mut self, value: &str) -> Result<(), ValidationError> {
        self.last_name = validate_name("last_name", value)?;
        Ok(())
    }

    /// Replaces the patronymic. `None` or blank input clears it.
    pub fn set_patronymic(&mut self, value: Option<&str>) -> Result<(), ValidationError> {
        self.patronymic = validate_patronymic(value)?;
        Ok(())
    }

    pub fn set_address(&mut self, value: &str) -> Result<(), ValidationError> {
        self.address = ValidationRegime::CURRENT.validate_address(value)?;
        Ok(())
    }

    pub fn set_phone(&mut self, value: &str) -> Result<(), ValidationError> {
        self.phone = ValidationRegime::CURRENT.validate_phone(value)?;
        Ok(())
    }

    pub fn set_min_required_facultative_hours(
        &mut self,
        value: i64,
    ) -> Result<(), ValidationError> {
        self.min_required_facultative_hours = validate_hours(value)?;
        Ok(())
    }

    /// Short listing form: `last first [patronymic]`.
    pub fn brief_summary(&self) -> String {
        match &self.patronymic {
            Some(patronymic) => format!("{} {} {}", self.last_name, self.first_name, patronymic),
            None => format!("{} {}", self.last_name, self.first_name),
        }
    }

    /// Multi-line description with every field.
    pub fn full_summary(&self) -> String {
        format!(
            "Student information:\nID: {}\nName: {}\nAddress: {}\nPhone: {}\nFacultative hours: {}",
            self.id,
            self.brief_summary(),
            self.address,
            self.phone,
            self.min_required_facultative_hours
        )
    }

    /// Ordering key by last name, first name, then patronymic (absent as empty).
    pub fn name_key(&self) -> (&str, &str, &str) {
        (
            self.last_name.as_str(),
            self.first_name.as_str(),
            self.patronymic.as_deref().unwrap_or(""),
        )
    }
}

impl Display for Student {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.brief_summary())
    }
}

impl TryFrom<StudentRecord> for Student {
    type Error = ValidationError;

    fn try_from(value: StudentRecord) -> Result<Self, Self::Error> {
        Self::from_record(&value)
    }
}

impl Serialize for Student {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Student {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = StudentRecord::deserialize(deserializer)?;
        Self::from_record(&record).map_err(serde::de::Error::custom)
    }
}
