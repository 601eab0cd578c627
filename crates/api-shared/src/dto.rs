//! Request and response bodies of the registry API.

use agnos_core::models::{non_blank, parse_date_of_birth};
use agnos_core::{Patient, PatientFilter, RegistryResult};
use agnos_types::{NonEmptyText, TextError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct CreateStaffReq {
    pub username: String,
    pub password: String,
    pub hospital: String,
}

/// Registration input with every field checked for blankness.
#[derive(Clone, Debug)]
pub struct StaffRegistration {
    pub username: NonEmptyText,
    pub password: NonEmptyText,
    pub hospital: NonEmptyText,
}

impl CreateStaffReq {
    pub fn validate(self) -> Result<StaffRegistration, TextError> {
        Ok(StaffRegistration {
            username: NonEmptyText::new("username", self.username)?,
            password: NonEmptyText::new_untrimmed("password", self.password)?,
            hospital: NonEmptyText::new("hospital", self.hospital)?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateStaffRes {
    pub message: String,
    pub staff_id: Uuid,
}

#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginReq {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginQuery {
    /// Hospital the staff member belongs to
    pub hospital: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRes {
    pub access_token: String,
}

/// Patient search constraints. Blank and absent fields are ignored.
#[derive(Clone, Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PatientSearchReq {
    pub national_id: Option<String>,
    pub passport_id: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// `YYYY-MM-DD`
    pub date_of_birth: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

impl PatientSearchReq {
    /// Converts the request into a [`PatientFilter`].
    ///
    /// Fails with a validation error if `date_of_birth` is present but not `YYYY-MM-DD`.
    pub fn to_filter(self) -> RegistryResult<PatientFilter> {
        let date_of_birth = non_blank(self.date_of_birth)
            .map(|v| parse_date_of_birth(&v))
            .transpose()?;

        Ok(PatientFilter {
            national_id: self.national_id,
            passport_id: self.passport_id,
            first_name: self.first_name,
            middle_name: self.middle_name,
            last_name: self.last_name,
            date_of_birth,
            phone_number: self.phone_number,
            email: self.email,
        }
        .normalised())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
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

impl From<Patient> for PatientRes {
    fn from(p: Patient) -> Self {
        Self {
            id: p.id,
            first_name_th: p.first_name_th,
            middle_name_th: p.middle_name_th,
            last_name_th: p.last_name_th,
            first_name_en: p.first_name_en,
            middle_name_en: p.middle_name_en,
            last_name_en: p.last_name_en,
            date_of_birth: p.date_of_birth,
            patient_hn: p.patient_hn,
            national_id: p.national_id,
            passport_id: p.passport_id,
            phone_number: p.phone_number,
            email: p.email,
            gender: p.gender,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientSearchRes {
    pub patients: Vec<PatientRes>,
    pub count: usize,
}

impl From<Vec<Patient>> for PatientSearchRes {
    fn from(patients: Vec<Patient>) -> Self {
        let patients: Vec<PatientRes> = patients.into_iter().map(PatientRes::from).collect();
        Self {
            count: patients.len(),
            patients,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use agnos_core::RegistryError;

    #[test]
    fn test_create_staff_req_requires_every_field() {
        let req = CreateStaffReq {
            username: "  alice ".into(),
            password: " pw ".into(),
            hospital: "hospital-a".into(),
        };
        let valid = req.validate().expect("validate should succeed");
        assert_eq!(valid.username.as_str(), "alice");
        assert_eq!(valid.password.as_str(), " pw ");

        let err = CreateStaffReq {
            username: "alice".into(),
            password: "pw".into(),
            hospital: "   ".into(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, TextError::Empty { field: "hospital" });

        let missing: CreateStaffReq = serde_json::from_str(r#"{"username": "alice"}"#).unwrap();
        assert!(missing.validate().is_err());
    }

    #[test]
    fn test_search_req_drops_blank_fields() {
        let req: PatientSearchReq = serde_json::from_str(
            r#"{"national_id": " 999 ", "passport_id": "", "first_name": "  ", "date_of_birth": ""}"#,
        )
        .unwrap();
        let filter = req.to_filter().expect("filter should build");

        assert_eq!(
            filter,
            PatientFilter {
                national_id: Some("999".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_search_req_parses_date_of_birth() {
        let req: PatientSearchReq =
            serde_json::from_str(r#"{"date_of_birth": "1990-01-15"}"#).unwrap();
        assert_eq!(
            req.to_filter().unwrap().date_of_birth,
            NaiveDate::from_ymd_opt(1990, 1, 15)
        );

        let bad: PatientSearchReq =
            serde_json::from_str(r#"{"date_of_birth": "15/01/1990"}"#).unwrap();
        assert!(matches!(bad.to_filter(), Err(RegistryError::Validation(_))));
    }

    #[test]
    fn test_search_res_counts_patients() {
        let dob = NaiveDate::from_ymd_opt(1990, 1, 15).unwrap();
        let res = PatientSearchRes::from(vec![Patient::new(dob), Patient::new(dob)]);
        assert_eq!(res.count, 2);

        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["patients"][0]["date_of_birth"], "1990-01-15");
        assert_eq!(json["count"], 2);
    }
}
