//! Constants used throughout the agnos core crate.

use std::time::Duration;

/// Default database location when `DATABASE_URL` is not set.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://agnos.db";

/// Default connection pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Upper bound for a single call to a remote hospital API.
pub const DEFAULT_HOSPITAL_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Base URL of hospital-a's patient API.
pub const HOSPITAL_A_DEFAULT_URL: &str = "https://hospital-a.api.co.th";

/// Date format used for dates of birth on the wire and in storage.
pub const DATE_OF_BIRTH_FORMAT: &str = "%Y-%m-%d";
