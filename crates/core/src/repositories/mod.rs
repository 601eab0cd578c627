//! Persistence for staff accounts and patient records.
//!
//! Each repository is a trait so services can be exercised against doubles; the
//! `Sqlite*` implementations are the production storage. Uniqueness (username per
//! hospital, national id, passport id) is enforced by the database's unique indexes,
//! which keeps conflict detection atomic under concurrent writers.

pub mod patient;
pub mod staff;

pub use patient::{PatientRepository, SqlitePatientRepository};
pub use staff::{SqliteStaffRepository, StaffRepository};
