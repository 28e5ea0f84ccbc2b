use std::env;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Method, StatusCode, header};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_DURATION, CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::types::{
    AnalyzeSpendingRequest, AnalyzeSpendingResponse, FinancialAdviceRequest,
    FinancialAdviceResponse, QuickChatRequest, QuickChatResponse, SelfTestReport, SystemHealth,
};

/// Base URL used when neither an option nor the environment provides one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";

/// Environment variable consulted by [`MoneyMitra::new`].
pub const API_URL_ENV: &str = "MONEYMITRA_API_URL";

/// Fixed client-side request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the MoneyMitra coaching API.
#[derive(Clone)]
pub struct MoneyMitra {
    client: ReqwestClient,
    base_url: Url,
    timeout: Duration,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl fmt::Debug for MoneyMitra {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoneyMitra")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl MoneyMitra {
    /// Create a new client.
    ///
    /// The base URL is read from the MONEYMITRA_API_URL environment variable,
    /// falling back to the local development server.
    pub fn new() -> Result<Self> {
        Self::with_options(env::var(API_URL_ENV).ok(), None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self> {
        let base_url = normalize_base_url(base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            client,
            base_url,
            timeout,
            logger: None,
        })
    }

    /// Attach a logger that sees every request and its outcome.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// The base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `host:port` of the backend, for user-facing messages.
    pub fn host_label(&self) -> String {
        let host = self.base_url.host_str().unwrap_or("localhost");
        match self.base_url.port_or_known_default() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        }
    }

    /// Check whether the backend is up.
    pub async fn health(&self) -> Result<SystemHealth> {
        self.execute(Method::GET, "health/", None).await
    }

    /// Ask a free-text question in the context of a user profile.
    pub async fn quick_chat(&self, request: &QuickChatRequest) -> Result<QuickChatResponse> {
        self.execute(Method::POST, "quick-chat/", Some(to_body(request)?))
            .await
    }

    /// Request comprehensive coaching for a profile.
    pub async fn financial_advice(
        &self,
        request: &FinancialAdviceRequest,
    ) -> Result<FinancialAdviceResponse> {
        self.execute(Method::POST, "financial-advice/", Some(to_body(request)?))
            .await
    }

    /// Analyse a list of expenses.
    pub async fn analyze_spending(
        &self,
        request: &AnalyzeSpendingRequest,
    ) -> Result<AnalyzeSpendingResponse> {
        self.execute(Method::POST, "analyze-spending/", Some(to_body(request)?))
            .await
    }

    /// Query the backend's diagnostics endpoint.
    ///
    /// With `run_model_check` the backend also probes its model provider,
    /// which takes noticeably longer.
    pub async fn self_test(&self, run_model_check: bool) -> Result<SelfTestReport> {
        if run_model_check {
            self.execute(Method::POST, "test/", Some(Value::Object(Default::default())))
                .await
        } else {
            self.execute(Method::GET, "test/", None).await
        }
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    /// Send one request and decode the reply, recording metrics and logs.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| Error::url(format!("Invalid endpoint {path}: {e}"), Some(e)))?;

        if let Some(logger) = &self.logger {
            logger.log_request(method.as_str(), url.as_str(), body.as_ref());
        }
        CLIENT_REQUESTS.click();
        let start = Instant::now();

        let result = self.round_trip(method, url.clone(), body).await;
        let elapsed = start.elapsed();
        CLIENT_REQUEST_DURATION.add(elapsed.as_secs_f64());

        let decoded = result.and_then(|(status, value)| {
            if let Some(logger) = &self.logger {
                logger.log_response(url.as_str(), status.as_u16(), elapsed, &value);
            }
            decode_success(status, value)
        });

        if let Err(err) = &decoded {
            CLIENT_REQUEST_ERRORS.click();
            if let Some(logger) = &self.logger {
                logger.log_error(url.as_str(), elapsed, err);
            }
        }
        decoded
    }

    async fn round_trip(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self
            .client
            .request(method, url.clone())
            .headers(self.default_headers());
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Request timed out: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else if e.is_connect() {
                Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
            } else {
                Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(
                    format!("Timed out reading response: {}", e),
                    Some(self.timeout.as_secs_f64()),
                )
            } else {
                Error::http_client(
                    format!("Failed to read response: {}", e),
                    Some(Box::new(e)),
                )
            }
        })?;

        if !status.is_success() {
            return Err(process_error_response(status, url.path(), &text));
        }

        let value = serde_json::from_str::<Value>(&text).map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })?;
        Ok((status, value))
    }
}

/// Make sure the base URL parses and ends in `/` so endpoint paths join
/// beneath it rather than replacing its last segment.
fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)?;
    if url.cannot_be_a_base() {
        return Err(Error::url(format!("Not a usable base URL: {trimmed}"), None));
    }
    Ok(url)
}

fn to_body<T: Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| {
        Error::serialization(
            format!("Failed to encode request: {}", e),
            Some(Box::new(e)),
        )
    })
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

/// Turn a 2xx JSON body into `T`, treating `"success": false` as a failure.
fn decode_success<T: DeserializeOwned>(status: StatusCode, value: Value) -> Result<T> {
    if let Ok(ErrorBody {
        success: Some(false),
        error,
    }) = ErrorBody::deserialize(&value)
    {
        return Err(Error::api(
            status.as_u16(),
            error.unwrap_or_else(|| "backend reported failure".to_string()),
        ));
    }
    serde_json::from_value(value).map_err(|e| {
        Error::serialization(
            format!("Failed to parse response: {}", e),
            Some(Box::new(e)),
        )
    })
}

/// Map a non-2xx reply to our Error type using the backend's
/// `{"success": false, "error": "..."}` body when present.
fn process_error_response(status: StatusCode, path: &str, body: &str) -> Error {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status.as_u16() {
        400 => Error::bad_request(message),
        404 => Error::not_found(message, Some(path.to_string())),
        408 => Error::timeout(message, None),
        500 => Error::internal_server(message),
        502..=504 => Error::service_unavailable(message),
        code => Error::api(code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Transaction, UserProfile};
    use serde_json::json;
    use std::sync::Mutex;
    use time::macros::date;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> MoneyMitra {
        MoneyMitra::with_options(Some(format!("{}/api", server.uri())), None).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = MoneyMitra::with_options(None, None).unwrap();
        assert_eq!(client.base_url().as_str(), DEFAULT_API_URL);
        assert_eq!(client.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(client.host_label(), "localhost:8000");

        let client = MoneyMitra::with_options(
            Some("https://coach.example.com/v2/api".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(client.base_url().as_str(), "https://coach.example.com/v2/api/");
        assert_eq!(client.timeout(), Duration::from_secs(5));
        assert_eq!(client.host_label(), "coach.example.com:443");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = MoneyMitra::with_options(Some("not a url".to_string()), None).unwrap_err();
        assert!(matches!(err, Error::Url { .. }));
    }

    #[test]
    fn test_error_mapping() {
        let body = r#"{"success": false, "error": "No question provided"}"#;
        let err = process_error_response(StatusCode::BAD_REQUEST, "/api/quick-chat/", body);
        assert!(err.is_bad_request());
        assert_eq!(err.to_string(), "Bad request: No question provided");

        let err = process_error_response(StatusCode::SERVICE_UNAVAILABLE, "/", r#"{"error": "x"}"#);
        assert!(matches!(err, Error::ServiceUnavailable { .. }));

        let err = process_error_response(StatusCode::INTERNAL_SERVER_ERROR, "/", "");
        assert_eq!(err.to_string(), "Internal server error: Internal Server Error");

        let err = process_error_response(StatusCode::NOT_FOUND, "/api/nope/", "<html>");
        assert_eq!(err.to_string(), "Not found: <html> [/api/nope/]");

        let err = process_error_response(StatusCode::IM_A_TEAPOT, "/", "short and stout");
        assert_eq!(err.status_code(), Some(418));
    }

    #[tokio::test]
    async fn test_health() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health/"))
            .and(header("accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "service": "MoneyMitra Financial Coaching API",
                "version": "2.0.0"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let health = assert_ok!(client_for(&server).health().await);
        assert!(health.is_healthy());
        assert_eq!(health.version.as_deref(), Some("2.0.0"));
    }

    #[tokio::test]
    async fn test_quick_chat_sends_question_and_context() {
        let server = MockServer::start().await;
        let request = QuickChatRequest::new("Emergency fund tips?", UserProfile::default());
        Mock::given(method("POST"))
            .and(path("/api/quick-chat/"))
            .and(body_json(json!({
                "question": "Emergency fund tips?",
                "context": {
                    "occupation": "Delivery driver (Zomato/Swiggy)",
                    "income": "18000-25000",
                    "expenses": "18000",
                    "location": "Mumbai"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "response": "Start with ₹50 a day.",
                "model": "Cerebras Llama3.1-8B"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = assert_ok!(client_for(&server).quick_chat(&request).await);
        assert_eq!(reply.response, "Start with ₹50 a day.");
        assert_eq!(reply.model.as_deref(), Some("Cerebras Llama3.1-8B"));
    }

    #[tokio::test]
    async fn test_quick_chat_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quick-chat/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "success": false,
                "error": "Financial agent not available. Please check configuration."
            })))
            .mount(&server)
            .await;

        let request = QuickChatRequest::new("hi", UserProfile::default());
        let err = assert_err!(client_for(&server).quick_chat(&request).await);
        assert!(err.is_server_error());
        assert!(err.to_string().contains("Financial agent not available"));
    }

    #[tokio::test]
    async fn test_success_false_on_ok_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/financial-advice/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "error": "No user data provided"
            })))
            .mount(&server)
            .await;

        let request = FinancialAdviceRequest::default();
        let err = assert_err!(client_for(&server).financial_advice(&request).await);
        assert_eq!(err.status_code(), Some(200));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).health().await);
        assert!(matches!(err, Error::Serialization { .. }));
    }

    #[tokio::test]
    async fn test_analyze_spending() {
        let server = MockServer::start().await;
        let transactions = vec![
            Transaction::new(500.0, "food", date!(2025 - 10 - 14)).unwrap(),
            Transaction::new(200.0, "fuel", date!(2025 - 10 - 14)).unwrap(),
        ];
        Mock::given(method("POST"))
            .and(path("/api/analyze-spending/"))
            .and(body_json(json!({
                "transactions": [
                    {"amount": 500.0, "category": "food", "date": "2025-10-14"},
                    {"amount": 200.0, "category": "fuel", "date": "2025-10-14"}
                ],
                "user_context": {
                    "occupation": "Delivery driver (Zomato/Swiggy)",
                    "income": "18000-25000",
                    "expenses": "18000",
                    "location": "Mumbai"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "basic_analysis": {
                    "total_spent": 700.0,
                    "category_breakdown": {"food": 500.0, "fuel": 200.0},
                    "transaction_count": 2,
                    "average_transaction": 350.0,
                    "top_categories": [["food", 500.0], ["fuel", 200.0]]
                },
                "ai_insights": "AI analysis not available. Showing basic spending breakdown.",
                "analysis_type": "basic_only"
            })))
            .mount(&server)
            .await;

        let request = AnalyzeSpendingRequest::new(transactions, UserProfile::default());
        let reply = assert_ok!(client_for(&server).analyze_spending(&request).await);
        assert_eq!(reply.basic_analysis.total_spent, 700.0);
        assert_eq!(reply.analysis_type.as_deref(), Some("basic_only"));
    }

    #[tokio::test]
    async fn test_self_test_methods() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/test/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ready",
                "method": "GET",
                "agent_available": true,
                "cerebras_test": "run POST to test"
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/test/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ready",
                "method": "POST",
                "agent_available": true,
                "cerebras_test": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let quick = assert_ok!(client.self_test(false).await);
        assert_eq!(quick.model_reachable(), None);
        let full = assert_ok!(client.self_test(true).await);
        assert_eq!(full.model_reachable(), Some(true));
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind and drop a listener to find a port nothing is serving.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client =
            MoneyMitra::with_options(Some(format!("http://127.0.0.1:{port}/api/")), None).unwrap();
        let err = assert_err!(client.health().await);
        assert!(err.is_connection());
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<String>>,
    }

    impl ClientLogger for RecordingLogger {
        fn log_request(&self, method: &str, url: &str, _body: Option<&Value>) {
            self.events
                .lock()
                .unwrap()
                .push(format!("request {method} {url}"));
        }

        fn log_response(&self, _url: &str, status: u16, _elapsed: Duration, _body: &Value) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response {status}"));
        }

        fn log_error(&self, _url: &str, _elapsed: Duration, error: &Error) {
            self.events
                .lock()
                .unwrap()
                .push(format!("error {:?}", error.status_code()));
        }
    }

    #[tokio::test]
    async fn test_logger_sees_requests_and_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "healthy"})))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/quick-chat/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "success": false,
                "error": "Agent error: boom"
            })))
            .mount(&server)
            .await;

        let logger = Arc::new(RecordingLogger::default());
        let client = client_for(&server).with_logger(logger.clone());
        assert_ok!(client.health().await);
        let request = QuickChatRequest::new("hi", UserProfile::default());
        assert_err!(client.quick_chat(&request).await);

        let events = logger.events.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                format!("request GET {}/api/health/", server.uri()),
                "response 200".to_string(),
                format!("request POST {}/api/quick-chat/", server.uri()),
                "error Some(500)".to_string(),
            ]
        );
    }
}
