//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_HOSPITAL_API_TIMEOUT, DEFAULT_MAX_CONNECTIONS,
};
use crate::credentials::PasswordHasher;
use crate::hospital::{Hospital, HospitalEndpoints};
use crate::{RegistryError, RegistryResult};
use std::time::Duration;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    database_url: String,
    max_connections: u32,
    password_hasher: PasswordHasher,
    hospital_endpoints: HospitalEndpoints,
    hospital_api_timeout: Duration,
}

impl CoreConfig {
    pub fn new(
        database_url: String,
        max_connections: u32,
        password_hasher: PasswordHasher,
        hospital_endpoints: HospitalEndpoints,
        hospital_api_timeout: Duration,
    ) -> RegistryResult<Self> {
        if database_url.trim().is_empty() {
            return Err(RegistryError::Validation(
                "database_url cannot be empty".into(),
            ));
        }
        if max_connections == 0 {
            return Err(RegistryError::Validation(
                "max_connections must be at least 1".into(),
            ));
        }
        if hospital_api_timeout.is_zero() {
            return Err(RegistryError::Validation(
                "hospital API timeout must be greater than zero".into(),
            ));
        }

        Ok(Self {
            database_url,
            max_connections,
            password_hasher,
            hospital_endpoints,
            hospital_api_timeout,
        })
    }

    /// Builds the configuration from process environment variables.
    pub fn from_env() -> RegistryResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from `lookup`, which maps a variable name to its value.
    ///
    /// Unset or blank variables fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> RegistryResult<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let max_connections =
            parse_number("DATABASE_MAX_CONNECTIONS", get("DATABASE_MAX_CONNECTIONS"))?
                .unwrap_or(DEFAULT_MAX_CONNECTIONS);

        let password_hasher = match parse_number("BCRYPT_COST", get("BCRYPT_COST"))? {
            Some(cost) => PasswordHasher::new(cost)?,
            None => PasswordHasher::default(),
        };

        let mut hospital_endpoints = HospitalEndpoints::defaults()?;
        for hospital in Hospital::ALL {
            if let Some(url) = get(hospital.base_url_env_var()) {
                hospital_endpoints.insert(*hospital, &url)?;
            }
        }

        let hospital_api_timeout =
            parse_number::<u64>("HOSPITAL_API_TIMEOUT_SECS", get("HOSPITAL_API_TIMEOUT_SECS"))?
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_HOSPITAL_API_TIMEOUT);

        Self::new(
            database_url,
            max_connections,
            password_hasher,
            hospital_endpoints,
            hospital_api_timeout,
        )
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_connections(&self) -> u32 {
        self.max_connections
    }

    pub fn password_hasher(&self) -> PasswordHasher {
        self.password_hasher
    }

    pub fn hospital_endpoints(&self) -> &HospitalEndpoints {
        &self.hospital_endpoints
    }

    pub fn hospital_api_timeout(&self) -> Duration {
        self.hospital_api_timeout
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: Option<String>) -> RegistryResult<Option<T>>
where
    T::Err: std::fmt::Display,
{
    value
        .map(|v| {
            v.parse::<T>().map_err(|e| {
                RegistryError::Validation(format!("{} must be a number, got '{}': {}", key, v, e))
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_nothing_is_set() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[])).expect("defaults should be valid");

        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(cfg.max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.password_hasher().cost(), bcrypt::DEFAULT_COST);
        assert_eq!(cfg.hospital_api_timeout(), Duration::from_secs(30));
        assert_eq!(
            cfg.hospital_endpoints()
                .base_url(Hospital::HospitalA)
                .map(|u| u.as_str()),
            Some("https://hospital-a.api.co.th/")
        );
    }

    #[test]
    fn test_overrides_are_applied() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "3"),
            ("BCRYPT_COST", "4"),
            ("HOSPITAL_A_API_URL", "http://localhost:9000"),
            ("HOSPITAL_API_TIMEOUT_SECS", "5"),
        ]))
        .expect("overrides should be valid");

        assert_eq!(cfg.database_url(), "sqlite::memory:");
        assert_eq!(cfg.max_connections(), 3);
        assert_eq!(cfg.password_hasher().cost(), 4);
        assert_eq!(cfg.hospital_api_timeout(), Duration::from_secs(5));
        assert_eq!(
            cfg.hospital_endpoints()
                .base_url(Hospital::HospitalA)
                .map(|u| u.as_str()),
            Some("http://localhost:9000/")
        );
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let cfg = CoreConfig::from_lookup(lookup_from(&[("DATABASE_URL", "   ")])).unwrap();
        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
    }

    #[test]
    fn test_invalid_values_fail_fast() {
        for pairs in [
            [("DATABASE_MAX_CONNECTIONS", "many")],
            [("DATABASE_MAX_CONNECTIONS", "0")],
            [("BCRYPT_COST", "2")],
            [("HOSPITAL_A_API_URL", "not a url")],
            [("HOSPITAL_API_TIMEOUT_SECS", "0")],
        ] {
            let result = CoreConfig::from_lookup(lookup_from(&pairs));
            assert!(
                matches!(result, Err(RegistryError::Validation(_))),
                "{:?} should be rejected",
                pairs
            );
        }
    }
}
