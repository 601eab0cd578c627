use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Liveness report returned by the health routes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service shared by the HTTP API and the CLI
///
/// This service provides a standardised way to check the health status of the registry.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Static method to check health without creating an instance
    ///
    /// # Returns
    /// A `HealthRes` indicating the service is healthy.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "Agnos Hospital Middleware API".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_health_reports_ok() {
        let res = HealthService::check_health();
        assert!(res.ok);
        assert_eq!(res.message, "Agnos Hospital Middleware API");
    }
}
