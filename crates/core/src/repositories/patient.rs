//! Patient record storage and filtered search.

use crate::error::{RegistryError, RegistryResult};
use crate::models::{Patient, PatientFilter};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const PATIENT_COLUMNS: &str = "id, first_name_th, middle_name_th, last_name_th, \
     first_name_en, middle_name_en, last_name_en, date_of_birth, patient_hn, \
     national_id, passport_id, phone_number, email, gender";

#[async_trait]
pub trait PatientRepository: Send + Sync {
    /// Stores a patient, assigning a fresh id if it has none, and returns the stored record.
    ///
    /// Fails with [`RegistryError::Conflict`] if the national id or passport id is taken.
    async fn create(&self, patient: Patient) -> RegistryResult<Patient>;

    /// Returns every patient matching all present filters, in storage order.
    async fn search(&self, filter: &PatientFilter) -> RegistryResult<Vec<Patient>>;

    async fn get_by_id(&self, id: Uuid) -> RegistryResult<Patient>;
}

#[derive(Clone, Debug)]
pub struct SqlitePatientRepository {
    pool: SqlitePool,
}

impl SqlitePatientRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PatientRepository for SqlitePatientRepository {
    async fn create(&self, mut patient: Patient) -> RegistryResult<Patient> {
        let id = *patient.id.get_or_insert_with(Uuid::new_v4);
        // Blank identifiers are stored as NULL so they never collide.
        patient.national_id = patient.national_id.filter(|v| !v.is_empty());
        patient.passport_id = patient.passport_id.filter(|v| !v.is_empty());

        sqlx::query(
            "INSERT INTO tbl_patients (id, first_name_th, middle_name_th, last_name_th,
                 first_name_en, middle_name_en, last_name_en, date_of_birth, patient_hn,
                 national_id, passport_id, phone_number, email, gender)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&patient.first_name_th)
        .bind(&patient.middle_name_th)
        .bind(&patient.last_name_th)
        .bind(&patient.first_name_en)
        .bind(&patient.middle_name_en)
        .bind(&patient.last_name_en)
        .bind(patient.date_of_birth)
        .bind(&patient.patient_hn)
        .bind(&patient.national_id)
        .bind(&patient.passport_id)
        .bind(&patient.phone_number)
        .bind(&patient.email)
        .bind(&patient.gender)
        .execute(&self.pool)
        .await?;

        Ok(patient)
    }

    async fn search(&self, filter: &PatientFilter) -> RegistryResult<Vec<Patient>> {
        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM tbl_patients WHERE 1 = 1",
            PATIENT_COLUMNS
        ));

        if let Some(national_id) = &filter.national_id {
            query.push(" AND national_id = ").push_bind(national_id.clone());
        }
        if let Some(passport_id) = &filter.passport_id {
            query.push(" AND passport_id = ").push_bind(passport_id.clone());
        }
        if let Some(first_name) = &filter.first_name {
            push_name_match(&mut query, "first_name", first_name);
        }
        if let Some(middle_name) = &filter.middle_name {
            push_name_match(&mut query, "middle_name", middle_name);
        }
        if let Some(last_name) = &filter.last_name {
            push_name_match(&mut query, "last_name", last_name);
        }
        if let Some(date_of_birth) = filter.date_of_birth {
            query.push(" AND date_of_birth = ").push_bind(date_of_birth);
        }
        if let Some(phone_number) = &filter.phone_number {
            query.push(" AND phone_number = ").push_bind(phone_number.clone());
        }
        if let Some(email) = &filter.email {
            query.push(" AND email = ").push_bind(email.clone());
        }
        query.push(" ORDER BY seq");

        let patients = query
            .build_query_as::<Patient>()
            .fetch_all(&self.pool)
            .await?;
        Ok(patients)
    }

    async fn get_by_id(&self, id: Uuid) -> RegistryResult<Patient> {
        sqlx::query_as::<_, Patient>(&format!(
            "SELECT {} FROM tbl_patients WHERE id = ?",
            PATIENT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound("patient"))
    }
}

/// Appends a partial, case-insensitive match on both the Thai and Latin column of a name.
fn push_name_match(query: &mut QueryBuilder<'_, Sqlite>, column: &str, value: &str) {
    let pattern = format!("%{}%", escape_like(value));
    query
        .push(format!(" AND ({column}_th LIKE "))
        .push_bind(pattern.clone())
        .push(format!(" ESCAPE '\\' OR {column}_en LIKE "))
        .push_bind(pattern)
        .push(" ESCAPE '\\')");
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
