//! Patient search with fallback to the requesting hospital's own API.
//!
//! Search is local-first. When the local store has nothing and the caller searched by
//! national id or passport id, the hospital API of the *requesting* staff member is consulted
//! and a hit is written back locally, so the next identical search is served from storage.
//! Remote failures and failed write-backs never fail the search; they only mean fewer results.

use crate::error::{RegistryError, RegistryResult};
use crate::hospital::HospitalClient;
use crate::models::{Patient, PatientFilter};
use crate::repositories::PatientRepository;
use std::sync::Arc;
use uuid::Uuid;

/// Pure patient data operations - no API concerns
#[derive(Clone)]
pub struct PatientService {
    patients: Arc<dyn PatientRepository>,
    hospitals: Arc<dyn HospitalClient>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientRepository>, hospitals: Arc<dyn HospitalClient>) -> Self {
        Self {
            patients,
            hospitals,
        }
    }

    /// Searches local storage, falling back to `requesting_hospital`'s API on an identifier miss.
    ///
    /// # Returns
    ///
    /// Local matches in storage order, plus at most one remote patient appended last.
    ///
    /// # Errors
    ///
    /// Only a failure of the local search is returned. An empty result is not an error.
    pub async fn search_patients(
        &self,
        filter: &PatientFilter,
        requesting_hospital: &str,
    ) -> RegistryResult<Vec<Patient>> {
        let mut patients = self.patients.search(filter).await?;
        if !patients.is_empty() {
            return Ok(patients);
        }

        let Some(identifier) = filter.remote_identifier() else {
            return Ok(patients);
        };

        match self
            .get_patient_from_hospital_api(identifier, requesting_hospital)
            .await
        {
            Ok(remote) => patients.push(self.backfill(remote).await),
            Err(e) => {
                tracing::warn!(
                    hospital = %requesting_hospital,
                    "hospital API fallback failed: {}",
                    e
                );
            }
        }

        Ok(patients)
    }

    /// Fetches a patient from `hospital`'s API by national id or passport id.
    ///
    /// The returned patient has no id; it is not stored.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::UnsupportedHospital`] if the hospital has no registered endpoint.
    /// - [`RegistryError::RemoteUnavailable`] on transport failure or timeout.
    /// - [`RegistryError::RemoteError`] on a non-200 status.
    /// - [`RegistryError::MalformedResponse`] on an undecodable payload or date of birth.
    pub async fn get_patient_from_hospital_api(
        &self,
        identifier: &str,
        hospital: &str,
    ) -> RegistryResult<Patient> {
        let patient = self.hospitals.fetch_patient(hospital, identifier).await?;
        tracing::info!(hospital = %hospital, "patient fetched from hospital API");
        Ok(patient)
    }

    /// Stores a remotely fetched patient, ignoring the outcome.
    ///
    /// The id is assigned before the write, so the caller gets an identified record even when
    /// the write fails. A `Conflict` means a concurrent search already stored this patient.
    async fn backfill(&self, mut patient: Patient) -> Patient {
        patient.id.get_or_insert_with(Uuid::new_v4);

        match self.patients.create(patient.clone()).await {
            Ok(stored) => stored,
            Err(RegistryError::Conflict(reason)) => {
                tracing::debug!("patient already stored by a concurrent search: {}", reason);
                patient
            }
            Err(e) => {
                tracing::warn!("failed to store patient from hospital API: {}", e);
                patient
            }
        }
    }
}
