//! Staff registration and login.
//!
//! Login failures are deliberately generic: an unknown username and a wrong password both
//! produce [`RegistryError::InvalidCredentials`], and both pay for one bcrypt verification, so
//! callers cannot tell which accounts exist. Minting a session token for a successful login is the caller's job.

use crate::credentials::PasswordHasher;
use crate::error::{RegistryError, RegistryResult};
use crate::models::Staff;
use crate::repositories::StaffRepository;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

/// Verified against when the username is unknown.
const DUMMY_PASSWORD: &str = "agnos-unknown-staff";

#[derive(Clone)]
pub struct StaffService {
    staff: Arc<dyn StaffRepository>,
    hasher: PasswordHasher,
    dummy_hash: Arc<OnceCell<String>>,
}

impl StaffService {
    pub fn new(staff: Arc<dyn StaffRepository>, hasher: PasswordHasher) -> Self {
        Self {
            staff,
            hasher,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Registers a new staff account.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::AlreadyExists`] if `(username, hospital)` is taken, including when a
    ///   concurrent registration wins the race.
    /// - Any repository or hashing failure, unchanged.
    pub async fn create_staff(
        &self,
        username: &str,
        password: &str,
        hospital: &str,
    ) -> RegistryResult<Staff> {
        match self
            .staff
            .get_by_username_and_hospital(username, hospital)
            .await
        {
            Ok(_) => return Err(RegistryError::AlreadyExists),
            Err(RegistryError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        let password_hash = self.hasher.hash(password).await?;
        let now = Utc::now();
        let staff = Staff {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            hospital: hospital.to_string(),
            created_at: now,
            updated_at: now,
        };

        match self.staff.create(&staff).await {
            Ok(()) => {}
            Err(RegistryError::Conflict(_)) => return Err(RegistryError::AlreadyExists),
            Err(e) => return Err(e),
        }

        tracing::info!(staff_id = %staff.id, hospital = %staff.hospital, "staff created");
        Ok(staff)
    }

    /// Verifies credentials and returns the matching staff account.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
        hospital: &str,
    ) -> RegistryResult<Staff> {
        let staff = match self
            .staff
            .get_by_username_and_hospital(username, hospital)
            .await
        {
            Ok(staff) => staff,
            Err(RegistryError::NotFound(_)) => {
                self.verify_against_dummy(password).await?;
                return Err(RegistryError::InvalidCredentials);
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(password, &staff.password_hash).await? {
            return Err(RegistryError::InvalidCredentials);
        }

        Ok(staff)
    }

    /// Spends the same bcrypt work as a real verification. The dummy hash is made on first use
    /// at the configured cost.
    async fn verify_against_dummy(&self, password: &str) -> RegistryResult<()> {
        let hash = self
            .dummy_hash
            .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))
            .await?;
        self.hasher.verify(password, hash).await?;
        Ok(())
    }

    pub async fn get_staff_by_id(&self, id: Uuid) -> RegistryResult<Staff> {
        self.staff.get_by_id(id).await
    }
}
