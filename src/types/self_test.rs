use serde::{Deserialize, Serialize};

/// Reply from the backend's `test/` diagnostics endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelfTestReport {
    /// Banner text.
    #[serde(default)]
    pub message: String,

    /// HTTP method the backend saw.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,

    /// Server-side timestamp, passed through as sent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Whether the backend could load its AI agent.
    #[serde(default)]
    pub agent_available: bool,

    /// `true`/`false` after a POST, or a hint string after a GET.
    #[serde(default)]
    pub cerebras_test: serde_json::Value,

    /// Overall status line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SelfTestReport {
    /// Result of the model connectivity probe, if one was run.
    pub fn model_reachable(&self) -> Option<bool> {
        self.cerebras_test.as_bool()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn get_report() {
        let report: SelfTestReport = serde_json::from_value(json!({
            "message": "MoneyMitra API - Production Ready! 🚀",
            "method": "GET",
            "agent_available": true,
            "cerebras_test": "run POST to test",
            "data_received": null,
            "status": "All systems operational"
        }))
        .unwrap();
        assert!(report.agent_available);
        assert_eq!(report.model_reachable(), None);
    }

    #[test]
    fn post_report() {
        let report: SelfTestReport = serde_json::from_value(json!({
            "message": "ok",
            "method": "POST",
            "agent_available": true,
            "cerebras_test": false
        }))
        .unwrap();
        assert_eq!(report.model_reachable(), Some(false));
    }
}
