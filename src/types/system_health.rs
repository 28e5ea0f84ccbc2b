use serde::{Deserialize, Serialize};

/// Status string the backend reports when it is ready.
pub const HEALTHY: &str = "healthy";

/// Result of `GET health/`.
///
/// Only `status` is required. The backend describes itself in `service`; a
/// synthetic result produced after a failed check uses `message` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemHealth {
    /// `"healthy"` when the backend is ready.
    pub status: String,

    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Name of the backend service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// Server-side timestamp, passed through as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Backend version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Connectivity of the backend to its model provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cerebras_status: Option<String>,

    /// Endpoints the backend advertises.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<String>,
}

impl SystemHealth {
    /// A health result with just a status and message.
    pub fn new(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: Some(message.into()),
            service: None,
            timestamp: None,
            version: None,
            cerebras_status: None,
            endpoints: Vec::new(),
        }
    }

    /// The result recorded when the health check itself fails.
    pub fn unavailable() -> Self {
        Self::new("error", "Backend unavailable")
    }

    /// True when the backend reported itself ready.
    pub fn is_healthy(&self) -> bool {
        self.status == HEALTHY
    }

    /// The best available description: `message`, then `service`.
    pub fn description(&self) -> Option<&str> {
        self.message.as_deref().or(self.service.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_backend_payload() {
        let health: SystemHealth = serde_json::from_value(json!({
            "status": "healthy",
            "service": "MoneyMitra Financial Coaching API - Production Ready",
            "timestamp": "2025-10-14T10:00:00.000000",
            "version": "2.0.0",
            "cerebras_status": "connected",
            "endpoints": ["/api/health/", "/api/quick-chat/"]
        }))
        .unwrap();
        assert!(health.is_healthy());
        assert_eq!(
            health.description(),
            Some("MoneyMitra Financial Coaching API - Production Ready")
        );
        assert_eq!(health.cerebras_status.as_deref(), Some("connected"));
        assert_eq!(health.endpoints.len(), 2);
    }

    #[test]
    fn deserialize_minimal_payload() {
        let health: SystemHealth =
            serde_json::from_value(json!({"status": "degraded", "message": "slow"})).unwrap();
        assert!(!health.is_healthy());
        assert_eq!(health.description(), Some("slow"));
    }

    #[test]
    fn unavailable_is_error() {
        let health = SystemHealth::unavailable();
        assert_eq!(health.status, "error");
        assert_eq!(health.description(), Some("Backend unavailable"));
        assert!(!health.is_healthy());
    }
}
