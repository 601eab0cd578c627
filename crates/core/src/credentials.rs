//! One-way password hashing for staff credentials.
//!
//! Hashing and verification run on tokio's blocking pool.

use crate::{RegistryError, RegistryResult};

/// Lowest work factor bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Highest work factor bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// bcrypt ignores everything past this many bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

#[derive(Clone, Copy, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> RegistryResult<Self> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(RegistryError::Validation(format!(
                "bcrypt cost must be between {} and {}, got {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST, cost
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password`.
    ///
    /// Fails with [`RegistryError::Validation`] if the password is longer than
    /// [`MAX_PASSWORD_BYTES`].
    pub async fn hash(&self, password: &str) -> RegistryResult<String> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(RegistryError::Validation(format!(
                "password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }
        let cost = self.cost;
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await?
            .map_err(RegistryError::PasswordHash)
    }

    /// Returns `true` only if `password` matches `stored_hash`.
    ///
    /// A hash bcrypt cannot parse counts as a mismatch, and so does a password longer than
    /// [`MAX_PASSWORD_BYTES`], which could otherwise match on its prefix alone.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> RegistryResult<bool> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        let outcome =
            tokio::task::spawn_blocking(move || bcrypt::verify(password, &stored_hash)).await?;

        match outcome {
            Ok(matches) => Ok(matches),
            Err(e) => {
                tracing::warn!("stored password hash could not be verified: {}", e);
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range_cost() {
        assert!(PasswordHasher::new(3).is_err());
        assert!(PasswordHasher::new(32).is_err());
        assert_eq!(PasswordHasher::new(MIN_BCRYPT_COST).unwrap().cost(), 4);
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();
        let hash = hasher.hash("pw1").await.expect("hash should succeed");

        assert_ne!(hash, "pw1");
        assert!(hasher.verify("pw1", &hash).await.unwrap());
        assert!(!hasher.verify("wrong", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_treats_garbage_hash_as_mismatch() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();
        assert!(!hasher.verify("pw1", "not-a-bcrypt-hash").await.unwrap());
    }

    #[tokio::test]
    async fn test_password_past_bcrypt_limit_is_rejected() {
        let hasher = PasswordHasher::new(MIN_BCRYPT_COST).unwrap();
        let at_limit = "A".repeat(MAX_PASSWORD_BYTES);
        let hash = hasher.hash(&at_limit).await.expect("72 bytes should hash");

        let err = hasher
            .hash(&format!("{}x", at_limit))
            .await
            .expect_err("73 bytes should fail");
        assert!(matches!(err, RegistryError::Validation(_)));

        assert!(hasher.verify(&at_limit, &hash).await.unwrap());
        assert!(
            !hasher.verify(&format!("{}x", at_limit), &hash).await.unwrap(),
            "a longer password sharing the prefix must not match"
        );
    }
}
