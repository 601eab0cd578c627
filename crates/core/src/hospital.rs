//! Remote hospital APIs, the systems of record consulted when a local search misses.
//!
//! Hospitals form a closed set ([`Hospital`]). Each one maps to a base URL in
//! [`HospitalEndpoints`], so pointing a hospital at a different server is a configuration
//! change. Remote patients are fetched from `GET <base>/patient/search/<identifier>`.

use crate::constants::{DATE_OF_BIRTH_FORMAT, HOSPITAL_A_DEFAULT_URL};
use crate::models::{non_blank, Patient};
use crate::{RegistryError, RegistryResult};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Hospitals with a remote patient API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Hospital {
    HospitalA,
}

impl Hospital {
    pub const ALL: &'static [Hospital] = &[Hospital::HospitalA];

    pub fn as_str(&self) -> &'static str {
        match self {
            Hospital::HospitalA => "hospital-a",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Hospital::HospitalA => HOSPITAL_A_DEFAULT_URL,
        }
    }

    /// Environment variable that overrides this hospital's base URL.
    pub fn base_url_env_var(&self) -> &'static str {
        match self {
            Hospital::HospitalA => "HOSPITAL_A_API_URL",
        }
    }
}

impl fmt::Display for Hospital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hospital {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hospital::ALL
            .iter()
            .copied()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| RegistryError::UnsupportedHospital(s.to_string()))
    }
}

/// Base URL per hospital.
#[derive(Clone, Debug, Default)]
pub struct HospitalEndpoints {
    endpoints: HashMap<Hospital, Url>,
}

impl HospitalEndpoints {
    /// Every hospital at its default base URL.
    pub fn defaults() -> RegistryResult<Self> {
        let mut endpoints = Self::default();
        for hospital in Hospital::ALL {
            endpoints.insert(*hospital, hospital.default_base_url())?;
        }
        Ok(endpoints)
    }

    /// Sets the base URL for `hospital`, replacing any previous one.
    pub fn insert(&mut self, hospital: Hospital, base_url: &str) -> RegistryResult<()> {
        let url = Url::parse(base_url).map_err(|e| {
            RegistryError::Validation(format!(
                "invalid base URL for {}: '{}': {}",
                hospital, base_url, e
            ))
        })?;
        if url.cannot_be_a_base() {
            return Err(RegistryError::Validation(format!(
                "base URL for {} cannot carry a path: '{}'",
                hospital, base_url
            )));
        }
        self.endpoints.insert(hospital, url);
        Ok(())
    }

    pub fn base_url(&self, hospital: Hospital) -> Option<&Url> {
        self.endpoints.get(&hospital)
    }

    /// Resolves the patient lookup URL for `identifier` at the hospital named `hospital`.
    ///
    /// The identifier is percent-encoded as a single path segment.
    pub fn patient_url(&self, hospital: &str, identifier: &str) -> RegistryResult<Url> {
        let parsed: Hospital = hospital.parse()?;
        let mut url = self
            .base_url(parsed)
            .cloned()
            .ok_or_else(|| RegistryError::UnsupportedHospital(hospital.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| RegistryError::UnsupportedHospital(hospital.to_string()))?
            .pop_if_empty()
            .extend(["patient", "search", identifier]);
        Ok(url)
    }
}

/// Fetches a patient record from a hospital's own API.
#[async_trait]
pub trait HospitalClient: Send + Sync {
    /// Returns an unsaved [`Patient`] (no id) mapped from the hospital's response.
    async fn fetch_patient(&self, hospital: &str, identifier: &str) -> RegistryResult<Patient>;
}

/// Patient as returned by a hospital API. Absent fields decode as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HospitalPatientPayload {
    pub first_name_th: String,
    pub middle_name_th: String,
    pub last_name_th: String,
    pub first_name_en: String,
    pub middle_name_en: String,
    pub last_name_en: String,
    pub date_of_birth: String,
    pub patient_hn: String,
    pub national_id: String,
    pub passport_id: String,
    pub phone_number: String,
    pub email: String,
    pub gender: String,
}

impl TryFrom<HospitalPatientPayload> for Patient {
    type Error = RegistryError;

    fn try_from(payload: HospitalPatientPayload) -> Result<Self, Self::Error> {
        let date_of_birth = NaiveDate::parse_from_str(&payload.date_of_birth, DATE_OF_BIRTH_FORMAT)
            .map_err(|e| {
                RegistryError::MalformedResponse(format!(
                    "unparsable date_of_birth '{}': {}",
                    payload.date_of_birth, e
                ))
            })?;

        Ok(Patient {
            id: None,
            first_name_th: payload.first_name_th,
            middle_name_th: payload.middle_name_th,
            last_name_th: payload.last_name_th,
            first_name_en: payload.first_name_en,
            middle_name_en: payload.middle_name_en,
            last_name_en: payload.last_name_en,
            date_of_birth,
            patient_hn: payload.patient_hn,
            national_id: non_blank(Some(payload.national_id)),
            passport_id: non_blank(Some(payload.passport_id)),
            phone_number: payload.phone_number,
            email: payload.email,
            gender: payload.gender,
        })
    }
}

/// [`HospitalClient`] over HTTP with a per-call timeout.
#[derive(Clone, Debug)]
pub struct HttpHospitalClient {
    http: reqwest::Client,
    endpoints: HospitalEndpoints,
}

impl HttpHospitalClient {
    pub fn new(endpoints: HospitalEndpoints, timeout: Duration) -> RegistryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RegistryError::Validation(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, endpoints })
    }
}

#[async_trait]
impl HospitalClient for HttpHospitalClient {
    async fn fetch_patient(&self, hospital: &str, identifier: &str) -> RegistryResult<Patient> {
        let url = self.endpoints.patient_url(hospital, identifier)?;
        tracing::debug!("fetching patient from {}", url);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RegistryError::RemoteUnavailable(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RegistryError::RemoteError {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RegistryError::RemoteUnavailable(e.to_string()))?;
        let payload: HospitalPatientPayload = serde_json::from_slice(&body)
            .map_err(|e| RegistryError::MalformedResponse(e.to_string()))?;

        Patient::try_from(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::StatusCode as AxumStatus, routing::get, Router};

    const PAYLOAD: &str = r#"{
        "first_name_th": "สมชาย",
        "middle_name_th": "",
        "last_name_th": "ใจดี",
        "first_name_en": "Somchai",
        "middle_name_en": "",
        "last_name_en": "Jaidee",
        "date_of_birth": "1990-01-15",
        "patient_hn": "HN-001",
        "national_id": "999",
        "passport_id": "",
        "phone_number": "0812345678",
        "email": "somchai@example.com",
        "gender": "M"
    }"#;

    /// Serves a stand-in hospital API on a random local port and returns its base URL.
    async fn spawn_hospital(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: &str) -> HttpHospitalClient {
        let mut endpoints = HospitalEndpoints::default();
        endpoints.insert(Hospital::HospitalA, base_url).unwrap();
        HttpHospitalClient::new(endpoints, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_hospital_parse_round_trips() {
        assert_eq!("hospital-a".parse::<Hospital>().unwrap(), Hospital::HospitalA);
        assert_eq!(Hospital::HospitalA.to_string(), "hospital-a");
        assert!(matches!(
            "hospital-z".parse::<Hospital>(),
            Err(RegistryError::UnsupportedHospital(h)) if h == "hospital-z"
        ));
    }

    #[test]
    fn test_patient_url_uses_default_endpoint() {
        let endpoints = HospitalEndpoints::defaults().unwrap();
        let url = endpoints.patient_url("hospital-a", "1234567890123").unwrap();
        assert_eq!(
            url.as_str(),
            "https://hospital-a.api.co.th/patient/search/1234567890123"
        );
    }

    #[test]
    fn test_patient_url_keeps_base_path_and_encodes_identifier() {
        let mut endpoints = HospitalEndpoints::default();
        endpoints
            .insert(Hospital::HospitalA, "http://localhost:9000/api/")
            .unwrap();
        let url = endpoints.patient_url("hospital-a", "a/b c").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:9000/api/patient/search/a%2Fb%20c"
        );
    }

    #[test]
    fn test_patient_url_rejects_unknown_or_unconfigured_hospital() {
        let endpoints = HospitalEndpoints::default();
        assert!(matches!(
            endpoints.patient_url("hospital-a", "1"),
            Err(RegistryError::UnsupportedHospital(_))
        ));
        let endpoints = HospitalEndpoints::defaults().unwrap();
        assert!(matches!(
            endpoints.patient_url("hospital-b", "1"),
            Err(RegistryError::UnsupportedHospital(_))
        ));
    }

    #[test]
    fn test_insert_rejects_invalid_url() {
        let mut endpoints = HospitalEndpoints::default();
        assert!(matches!(
            endpoints.insert(Hospital::HospitalA, "not a url"),
            Err(RegistryError::Validation(_))
        ));
    }

    #[test]
    fn test_payload_with_missing_fields_maps_to_empty_values() {
        let payload: HospitalPatientPayload =
            serde_json::from_str(r#"{"date_of_birth": "2000-02-29", "passport_id": "AA1"}"#)
                .unwrap();
        let patient = Patient::try_from(payload).unwrap();

        assert_eq!(patient.id, None);
        assert_eq!(patient.first_name_en, "");
        assert_eq!(patient.national_id, None);
        assert_eq!(patient.passport_id.as_deref(), Some("AA1"));
        assert_eq!(
            patient.date_of_birth,
            NaiveDate::from_ymd_opt(2000, 2, 29).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_patient_maps_remote_payload() {
        let router = Router::new().route(
            "/patient/search/:id",
            get(|Path(id): Path<String>| async move {
                assert_eq!(id, "999");
                ([("content-type", "application/json")], PAYLOAD)
            }),
        );
        let client = client_for(&spawn_hospital(router).await);

        let patient = client
            .fetch_patient("hospital-a", "999")
            .await
            .expect("fetch should succeed");

        assert_eq!(patient.id, None);
        assert_eq!(patient.first_name_th, "สมชาย");
        assert_eq!(patient.last_name_en, "Jaidee");
        assert_eq!(patient.patient_hn, "HN-001");
        assert_eq!(patient.national_id.as_deref(), Some("999"));
        assert_eq!(patient.passport_id, None);
        assert_eq!(patient.gender, "M");
        assert_eq!(
            patient.date_of_birth,
            NaiveDate::from_ymd_opt(1990, 1, 15).unwrap()
        );
    }

    #[tokio::test]
    async fn test_fetch_patient_non_ok_status_is_remote_error() {
        let router = Router::new().route(
            "/patient/search/:id",
            get(|| async { (AxumStatus::NOT_FOUND, "no such patient") }),
        );
        let client = client_for(&spawn_hospital(router).await);

        let err = client.fetch_patient("hospital-a", "404").await.unwrap_err();
        assert!(
            matches!(err, RegistryError::RemoteError { status: 404 }),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn test_fetch_patient_rejects_undecodable_body() {
        let router = Router::new().route(
            "/patient/search/:id",
            get(|| async { "this is not json" }),
        );
        let client = client_for(&spawn_hospital(router).await);

        let err = client.fetch_patient("hospital-a", "1").await.unwrap_err();
        assert!(matches!(err, RegistryError::MalformedResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_patient_rejects_unparsable_date_of_birth() {
        let router = Router::new().route(
            "/patient/search/:id",
            get(|| async { r#"{"national_id": "999", "date_of_birth": "not-a-date"}"# }),
        );
        let client = client_for(&spawn_hospital(router).await);

        let err = client.fetch_patient("hospital-a", "999").await.unwrap_err();
        assert!(matches!(err, RegistryError::MalformedResponse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_patient_unreachable_host_is_remote_unavailable() {
        // Bind then drop a listener to get a local port that refuses connections.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(&format!("http://{}", addr));

        let err = client.fetch_patient("hospital-a", "1").await.unwrap_err();
        assert!(matches!(err, RegistryError::RemoteUnavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_fetch_patient_unsupported_hospital_makes_no_call() {
        let client = client_for("http://127.0.0.1:9");
        let err = client.fetch_patient("hospital-z", "1").await.unwrap_err();
        assert!(matches!(err, RegistryError::UnsupportedHospital(_)));
    }
}
