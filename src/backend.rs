//! The seam between the chat session and the coaching API.
//!
//! [`ChatSession`](crate::chat::ChatSession) talks to a [`Backend`] rather than
//! to the HTTP client directly so conversations can be driven by scripted
//! backends in tests.

use async_trait::async_trait;

use crate::MoneyMitra;
use crate::error::Result;
use crate::observability::{HEALTH_CHECKS, HEALTH_FAILURES};
use crate::types::{
    AnalyzeSpendingRequest, AnalyzeSpendingResponse, FinancialAdviceRequest,
    FinancialAdviceResponse, QuickChatRequest, QuickChatResponse, SelfTestReport, SystemHealth,
};

/// Operations the chat front-end needs from the coaching service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Check whether the service is ready.
    async fn health(&self) -> Result<SystemHealth>;

    /// Answer a free-text question.
    async fn quick_chat(&self, request: &QuickChatRequest) -> Result<QuickChatResponse>;

    /// Produce comprehensive coaching for a profile.
    async fn financial_advice(
        &self,
        request: &FinancialAdviceRequest,
    ) -> Result<FinancialAdviceResponse>;

    /// Analyse logged expenses.
    async fn analyze_spending(
        &self,
        request: &AnalyzeSpendingRequest,
    ) -> Result<AnalyzeSpendingResponse>;

    /// Run the service's diagnostics.
    async fn self_test(&self, run_model_check: bool) -> Result<SelfTestReport>;

    /// Where the service lives, as shown in error replies (e.g. `localhost:8000`).
    fn endpoint_label(&self) -> String;
}

#[async_trait]
impl Backend for MoneyMitra {
    async fn health(&self) -> Result<SystemHealth> {
        MoneyMitra::health(self).await
    }

    async fn quick_chat(&self, request: &QuickChatRequest) -> Result<QuickChatResponse> {
        MoneyMitra::quick_chat(self, request).await
    }

    async fn financial_advice(
        &self,
        request: &FinancialAdviceRequest,
    ) -> Result<FinancialAdviceResponse> {
        MoneyMitra::financial_advice(self, request).await
    }

    async fn analyze_spending(
        &self,
        request: &AnalyzeSpendingRequest,
    ) -> Result<AnalyzeSpendingResponse> {
        MoneyMitra::analyze_spending(self, request).await
    }

    async fn self_test(&self, run_model_check: bool) -> Result<SelfTestReport> {
        MoneyMitra::self_test(self, run_model_check).await
    }

    fn endpoint_label(&self) -> String {
        self.host_label()
    }
}

/// Ping the backend and return its health, or [`SystemHealth::unavailable`]
/// if the check itself fails.
pub async fn check_health<B: Backend + ?Sized>(backend: &B) -> SystemHealth {
    HEALTH_CHECKS.click();
    match backend.health().await {
        Ok(health) => {
            if !health.is_healthy() {
                HEALTH_FAILURES.click();
            }
            health
        }
        Err(_) => {
            HEALTH_FAILURES.click();
            SystemHealth::unavailable()
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn health_reflects_latest_result() {
        let backend = ScriptedBackend::default();
        backend.health.lock().unwrap().extend([
            Ok(SystemHealth::new("healthy", "ok")),
            Err(Error::connection("refused", None)),
            Ok(SystemHealth::new("maintenance", "back soon")),
        ]);

        assert!(check_health(&backend).await.is_healthy());
        assert_eq!(check_health(&backend).await, SystemHealth::unavailable());
        let latest = check_health(&backend).await;
        assert_eq!(latest.status, "maintenance");
        assert!(!latest.is_healthy());
    }

    #[tokio::test]
    async fn health_works_through_trait_object() {
        let backend = ScriptedBackend::default();
        backend
            .health
            .lock()
            .unwrap()
            .push_back(Ok(SystemHealth::new("healthy", "ok")));
        let dynamic: &dyn Backend = &backend;
        assert!(check_health(dynamic).await.is_healthy());
    }
}
