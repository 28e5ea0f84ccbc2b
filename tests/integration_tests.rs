//! Integration tests for the MoneyMitra library.
//! These tests run the chat session against a mock backend over HTTP.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use moneymitra::chat::{
        ChatSession, QUICK_QUESTIONS, Renderer, WELCOME_MESSAGE, start_conversation,
    };
    use moneymitra::{
        ChatMessage, ClientLogger, Error, IncomeBand, JsonLinesLogger, MoneyMitra, Occupation,
        Sender, SystemHealth, Transaction, UserProfile, check_health,
    };
    use serde_json::{Value, json};
    use time::macros::date;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[derive(Default)]
    struct Transcript {
        lines: Vec<String>,
    }

    impl Renderer for Transcript {
        fn print_header(&mut self, profile: &UserProfile) {
            self.lines.push(moneymitra::render::profile_header(profile));
        }

        fn print_health(&mut self, health: &SystemHealth) {
            self.lines.push(moneymitra::render::health_badge(health));
        }

        fn print_message(&mut self, message: &ChatMessage) {
            self.lines.push(message.content.clone());
        }

        fn start_pending(&mut self) {
            self.lines.push("<thinking>".to_string());
        }

        fn finish_pending(&mut self) {
            self.lines.push("</thinking>".to_string());
        }

        fn print_quick_questions(&mut self, questions: &[&str]) {
            self.lines.extend(questions.iter().map(|q| q.to_string()));
        }

        fn print_error(&mut self, error: &str) {
            self.lines.push(format!("error: {error}"));
        }

        fn print_info(&mut self, info: &str) {
            self.lines.push(info.to_string());
        }
    }

    fn client_for(server: &MockServer) -> MoneyMitra {
        MoneyMitra::with_options(
            Some(format!("{}/api", server.uri())),
            Some(Duration::from_secs(5)),
        )
        .unwrap()
    }

    fn profile() -> UserProfile {
        UserProfile::new(
            Occupation::RideHailingDriver,
            IncomeBand::From25000To35000,
            "21000",
            "Pune",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn conversation_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quick-chat/"))
            .and(body_partial_json(json!({
                "question": "Emergency fund tips for irregular income?",
                "context": {
                    "occupation": "Uber/Ola driver",
                    "income": "25000-35000",
                    "expenses": "21000",
                    "location": "Pune"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "response": "Put aside ₹100 on every good day.",
                "model": "Cerebras Llama3.1-8B",
                "response_time_ms": 640.2,
                "powered_by": "Cerebras"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = ChatSession::new(client_for(&server), profile());
        let mut transcript = Transcript::default();
        session
            .send("Emergency fund tips for irregular income?", &mut transcript)
            .await
            .unwrap();

        let messages = session.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages[2].content, "Put aside ₹100 on every good day.");
        assert_eq!(messages[2].model.as_deref(), Some("Cerebras Llama3.1-8B"));
        assert_eq!(
            transcript.lines,
            vec![
                "Emergency fund tips for irregular income?".to_string(),
                "<thinking>".to_string(),
                "</thinking>".to_string(),
                "Put aside ₹100 on every good day.".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn conversation_opens_with_profile_header() {
        let server = MockServer::start().await;
        let session = ChatSession::new(client_for(&server), profile());
        let mut transcript = Transcript::default();
        start_conversation(&session, &mut transcript);

        let mut expected = vec![
            "Chatting as: Uber/Ola driver (₹25000-35000/month)".to_string(),
            "Type /help for commands, /quit to exit".to_string(),
            WELCOME_MESSAGE.to_string(),
        ];
        expected.extend(QUICK_QUESTIONS.iter().map(|q| q.to_string()));
        assert_eq!(transcript.lines, expected);
    }

    #[tokio::test]
    async fn backend_failure_becomes_error_reply() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/quick-chat/"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "success": false,
                "error": "AI agent not available. Please check configuration."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let label = client.host_label();
        let mut session = ChatSession::new(client, profile());
        let mut transcript = Transcript::default();
        session.send("Hello?", &mut transcript).await.unwrap();

        let reply = &session.messages()[2];
        assert!(reply.is_error);
        assert_eq!(
            reply.content,
            format!(
                "Sorry, I encountered an error. Please make sure the backend is running on {label}."
            )
        );
        assert!(!session.is_pending());
    }

    #[tokio::test]
    async fn unreachable_backend_reports_error_badge() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client =
            MoneyMitra::with_options(Some(format!("http://127.0.0.1:{port}/api/")), None).unwrap();
        let health = check_health(&client).await;
        assert_eq!(health, SystemHealth::unavailable());
        assert_eq!(moneymitra::render::health_badge(&health), "Backend: Error");
    }

    #[tokio::test]
    async fn health_badge_tracks_latest_check() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "healthy",
                "service": "MoneyMitra Financial Coach API",
                "version": "1.0.0",
                "cerebras_status": "connected",
                "endpoints": ["/api/quick-chat/", "/api/financial-advice/"]
            })))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = check_health(&client).await;
        assert!(first.is_healthy());
        assert_eq!(first.cerebras_status.as_deref(), Some("connected"));
        let second = check_health(&client).await;
        assert!(!second.is_healthy());
    }

    #[tokio::test]
    async fn spending_analysis_over_http_is_logged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/analyze-spending/"))
            .and(body_partial_json(json!({
                "transactions": [
                    {"amount": 450.0, "category": "fuel", "date": "2025-10-01"},
                    {"amount": 120.0, "category": "food", "date": "2025-10-02"}
                ],
                "user_context": {"location": "Pune"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "basic_analysis": {
                    "total_spent": 570.0,
                    "category_breakdown": {"fuel": 450.0, "food": 120.0},
                    "transaction_count": 2,
                    "average_transaction": 285.0,
                    "top_categories": [["fuel", 450.0], ["food", 120.0]]
                },
                "ai_insights": "Fuel dominates; try CNG.",
                "analysis_type": "ai_enhanced"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("client.jsonl");
        let logger: Arc<dyn ClientLogger> = Arc::new(JsonLinesLogger::create(&log_path).unwrap());
        let client = client_for(&server).with_logger(logger);

        let mut session = ChatSession::new(client, profile());
        session.add_transaction(Transaction::new(450.0, "Fuel", date!(2025 - 10 - 01)).unwrap());
        session.add_transaction(Transaction::new(120.0, "food", date!(2025 - 10 - 02)).unwrap());
        let mut transcript = Transcript::default();
        session.analyze_spending(&mut transcript).await.unwrap();

        let reply = &session.messages()[2];
        assert!(!reply.is_error);
        assert!(reply.content.contains("₹570.00"));
        assert!(reply.content.contains("Fuel dominates"));

        drop(session);
        let events: Vec<Value> = std::fs::read_to_string(&log_path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["event"], "request");
        assert_eq!(events[1]["event"], "response");
        assert_eq!(events[1]["status"], 200);
    }

    #[tokio::test]
    async fn session_rejects_overlapping_requests() {
        let server = MockServer::start().await;
        let mut session = ChatSession::new(client_for(&server), profile());
        let flag = session.pending_flag();
        flag.store(true, std::sync::atomic::Ordering::SeqCst);

        let mut transcript = Transcript::default();
        let err = session.send("Anyone there?", &mut transcript).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(session.message_count(), 1);
        assert!(transcript.lines.is_empty());
    }
}
