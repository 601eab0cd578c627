//! Staff account storage.

use crate::error::{RegistryError, RegistryResult};
use crate::models::Staff;
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

#[async_trait]
pub trait StaffRepository: Send + Sync {
    /// Stores a new staff account.
    ///
    /// Fails with [`RegistryError::Conflict`] if `(username, hospital)` is already taken.
    async fn create(&self, staff: &Staff) -> RegistryResult<()>;

    async fn get_by_username_and_hospital(
        &self,
        username: &str,
        hospital: &str,
    ) -> RegistryResult<Staff>;

    async fn get_by_id(&self, id: Uuid) -> RegistryResult<Staff>;
}

#[derive(Clone, Debug)]
pub struct SqliteStaffRepository {
    pool: SqlitePool,
}

impl SqliteStaffRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StaffRepository for SqliteStaffRepository {
    async fn create(&self, staff: &Staff) -> RegistryResult<()> {
        sqlx::query(
            "INSERT INTO tbl_staff (id, username, password_hash, hospital, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(staff.id)
        .bind(&staff.username)
        .bind(&staff.password_hash)
        .bind(&staff.hospital)
        .bind(staff.created_at)
        .bind(staff.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_username_and_hospital(
        &self,
        username: &str,
        hospital: &str,
    ) -> RegistryResult<Staff> {
        sqlx::query_as::<_, Staff>(
            "SELECT id, username, password_hash, hospital, created_at, updated_at
             FROM tbl_staff WHERE username = ? AND hospital = ?",
        )
        .bind(username)
        .bind(hospital)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound("staff"))
    }

    async fn get_by_id(&self, id: Uuid) -> RegistryResult<Staff> {
        sqlx::query_as::<_, Staff>(
            "SELECT id, username, password_hash, hospital, created_at, updated_at
             FROM tbl_staff WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RegistryError::NotFound("staff"))
    }
}
