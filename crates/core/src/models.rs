//! Domain records: staff accounts, patients and patient search filters.

use crate::constants::DATE_OF_BIRTH_FORMAT;
use crate::{RegistryError, RegistryResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A staff account, unique per `(username, hospital)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Staff {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub hospital: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A patient demographic record.
///
/// `id` is `None` for values that have not been stored yet, such as a record freshly
/// mapped from a hospital API response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Patient {
    pub id: Option<Uuid>,
    pub first_name_th: String,
    pub middle_name_th: String,
    pub last_name_th: String,
    pub first_name_en: String,
    pub middle_name_en: String,
    pub last_name_en: String,
    pub date_of_birth: NaiveDate,
    pub patient_hn: String,
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub phone_number: String,
    pub email: String,
    pub gender: String,
}

impl Patient {
    /// Creates an unsaved patient with only a date of birth set.
    pub fn new(date_of_birth: NaiveDate) -> Self {
        Self {
            id: None,
            first_name_th: String::new(),
            middle_name_th: String::new(),
            last_name_th: String::new(),
            first_name_en: String::new(),
            middle_name_en: String::new(),
            last_name_en: String::new(),
            date_of_birth,
            patient_hn: String::new(),
            national_id: None,
            passport_id: None,
            phone_number: String::new(),
            email: String::new(),
            gender: String::new(),
        }
    }
}

/// Sparse set of patient search constraints.
///
/// Every present field must match. Name fields match partially and case-insensitively
/// against both the Thai and Latin variants; everything else matches exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientFilter {
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl PatientFilter {
    /// Returns a copy with text values trimmed and blank values dropped.
    pub fn normalised(self) -> Self {
        Self {
            national_id: non_blank(self.national_id),
            passport_id: non_blank(self.passport_id),
            first_name: non_blank(self.first_name),
            middle_name: non_blank(self.middle_name),
            last_name: non_blank(self.last_name),
            date_of_birth: self.date_of_birth,
            phone_number: non_blank(self.phone_number),
            email: non_blank(self.email),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The identifier used to consult a remote hospital when the local search misses.
    ///
    /// National id takes precedence over passport id.
    pub fn remote_identifier(&self) -> Option<&str> {
        self.national_id
            .as_deref()
            .filter(|v| !v.is_empty())
            .or_else(|| self.passport_id.as_deref().filter(|v| !v.is_empty()))
    }
}

/// Maps a blank string to `None`, trimming anything else.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses a `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(value: &str) -> RegistryResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_OF_BIRTH_FORMAT).map_err(|e| {
        RegistryError::Validation(format!(
            "date_of_birth must be YYYY-MM-DD, got '{}': {}",
            value, e
        ))
    })
}
