//! # Agnos Core
//!
//! Core business logic for the Agnos hospital patient registry.
//!
//! This crate contains the data operations behind the registry:
//! - Staff registration and credential checks ([`StaffService`])
//! - Patient search over local storage with fallback to hospital APIs ([`PatientService`])
//! - SQLite persistence ([`db`], [`repositories`]) and the outbound hospital client ([`hospital`])
//!
//! **No API concerns**: session tokens, HTTP routing and request binding belong in `api-shared`
//! and `api-rest`.

pub mod config;
pub mod constants;
pub mod credentials;
pub mod db;
pub mod error;
pub mod hospital;
pub mod models;
pub mod patient;
pub mod repositories;
pub mod staff;

pub use config::CoreConfig;
pub use credentials::PasswordHasher;
pub use error::{RegistryError, RegistryResult};
pub use hospital::{Hospital, HospitalClient, HospitalEndpoints, HttpHospitalClient};
pub use models::{Patient, PatientFilter, Staff};
pub use patient::PatientService;
pub use staff::StaffService;
