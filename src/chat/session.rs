//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns the conversation,
//! the user's profile, and the in-session spending log, and drives every
//! request to the coaching backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::backend::Backend;
use crate::error::{Error, Result};
use crate::observability::{CHAT_RESPONSE_TIME, CHAT_TURN_FAILURES, CHAT_TURNS};
use crate::render::Renderer;
use crate::types::{
    AnalyzeSpendingRequest, ChatMessage, FinancialAdviceRequest, QuickChatRequest, Transaction,
    UserProfile,
};

/// The greeting every conversation starts with.
pub const WELCOME_MESSAGE: &str = "Hi! I am MoneyMitra, your AI financial coach. I am here to help with budgeting, saving, and financial planning. Ask me anything! 💰";

/// Suggested first questions.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "How can I save ₹5000 in 3 months?",
    "Emergency fund tips for irregular income?",
    "Best way to track daily expenses?",
    "Investment options for ₹10,000?",
];

/// Model label used when the backend does not name one.
pub const DEFAULT_MODEL_LABEL: &str = "AI";

/// A chat session with the coaching backend.
///
/// The message list is append-only and always starts with the welcome message.
/// At most one request is outstanding at a time.
pub struct ChatSession<B: Backend> {
    backend: B,
    profile: UserProfile,
    messages: Vec<ChatMessage>,
    pending: Arc<AtomicBool>,
    transactions: Vec<Transaction>,
    request_count: u64,
    failure_count: u64,
    total_response_ms: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionStats {
    /// The profile in use.
    pub profile: UserProfile,
    /// The number of messages in the conversation, including the welcome.
    pub message_count: usize,
    /// Requests sent to the backend.
    pub total_requests: u64,
    /// Requests that ended in an error reply.
    pub failed_requests: u64,
    /// Mean wall-clock time of successful requests.
    pub average_response_ms: Option<u64>,
    /// Expenses logged this session.
    pub transaction_count: usize,
}

impl<B: Backend> ChatSession<B> {
    /// Creates a new chat session for `profile`.
    pub fn new(backend: B, profile: UserProfile) -> Self {
        Self {
            backend,
            profile,
            messages: vec![ChatMessage::bot(WELCOME_MESSAGE)],
            pending: Arc::new(AtomicBool::new(false)),
            transactions: Vec::new(),
            request_count: 0,
            failure_count: 0,
            total_response_ms: 0,
        }
    }

    /// The backend this session talks to.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// The active profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The conversation so far, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// True while a request is outstanding.
    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::SeqCst)
    }

    /// A shared handle on the pending flag.
    pub fn pending_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.pending)
    }

    /// Replace the profile and start a fresh conversation.
    ///
    /// The spending log is cleared along with the messages.
    pub fn reset(&mut self, profile: UserProfile) {
        self.profile = profile;
        self.messages = vec![ChatMessage::bot(WELCOME_MESSAGE)];
        self.transactions.clear();
    }

    /// Suggested questions, offered only before the user has said anything.
    pub fn quick_questions(&self) -> &'static [&'static str] {
        if self.messages.len() <= 1 {
            &QUICK_QUESTIONS
        } else {
            &[]
        }
    }

    /// The reply shown in place of an answer when a request fails.
    pub fn error_reply(&self) -> String {
        format!(
            "Sorry, I encountered an error. Please make sure the backend is running on {}.",
            self.backend.endpoint_label()
        )
    }

    /// Ask the coach a question.
    ///
    /// Appends the question and then exactly one reply: the answer, or the
    /// error reply if the request failed. Only blank input and input while a
    /// request is pending are reported as errors.
    pub async fn send(&mut self, question: &str, renderer: &mut dyn Renderer) -> Result<()> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::validation(
                "message is empty",
                Some("question".to_string()),
            ));
        }
        self.ensure_idle()?;
        self.push_user(question, renderer);

        let request = QuickChatRequest::new(question, self.profile.clone());
        let started = self.begin_request(renderer);
        let outcome = self
            .backend
            .quick_chat(&request)
            .await
            .map(|reply| (reply.response, reply.model));
        self.finish_request(started, outcome, renderer);
        Ok(())
    }

    /// Ask for a complete plan for the current profile.
    ///
    /// Logged expenses are sent along as recent transactions.
    pub async fn request_advice(
        &mut self,
        goals: Option<&str>,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        self.ensure_idle()?;
        let goals = goals.map(str::trim).filter(|g| !g.is_empty());
        let prompt = match goals {
            Some(goals) => format!("Please give me a complete financial plan. My goals: {goals}"),
            None => "Please give me a complete financial plan.".to_string(),
        };
        self.push_user(&prompt, renderer);

        let mut request = FinancialAdviceRequest::from_profile(&self.profile)
            .with_transactions(self.transactions.clone());
        if let Some(goals) = goals {
            request = request.with_goals(goals);
        }
        let started = self.begin_request(renderer);
        let outcome = self
            .backend
            .financial_advice(&request)
            .await
            .map(|reply| (reply.advice, reply.model));
        self.finish_request(started, outcome, renderer);
        Ok(())
    }

    /// Record an expense for later analysis.
    pub fn add_transaction(&mut self, transaction: Transaction) {
        self.transactions.push(transaction);
    }

    /// Expenses logged this session, in entry order.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Forget logged expenses.
    pub fn clear_transactions(&mut self) {
        self.transactions.clear();
    }

    /// Send the logged expenses for analysis.
    ///
    /// Fails with a validation error when nothing has been logged.
    pub async fn analyze_spending(&mut self, renderer: &mut dyn Renderer) -> Result<()> {
        if self.transactions.is_empty() {
            return Err(Error::validation(
                "no expenses logged; use /spend add first",
                Some("transactions".to_string()),
            ));
        }
        self.ensure_idle()?;
        let prompt = match self.transactions.len() {
            1 => "Please analyse my spending (1 expense).".to_string(),
            n => format!("Please analyse my spending ({n} expenses)."),
        };
        self.push_user(&prompt, renderer);

        let request = AnalyzeSpendingRequest::new(self.transactions.clone(), self.profile.clone());
        let started = self.begin_request(renderer);
        let outcome = self
            .backend
            .analyze_spending(&request)
            .await
            .map(|reply| (reply.summary(), None));
        self.finish_request(started, outcome, renderer);
        Ok(())
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        let successes = self.request_count - self.failure_count;
        SessionStats {
            profile: self.profile.clone(),
            message_count: self.message_count(),
            total_requests: self.request_count,
            failed_requests: self.failure_count,
            average_response_ms: (successes > 0).then(|| self.total_response_ms / successes),
            transaction_count: self.transactions.len(),
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_pending() {
            return Err(Error::validation("a request is already in progress", None));
        }
        Ok(())
    }

    fn push_user(&mut self, content: &str, renderer: &mut dyn Renderer) {
        let message = ChatMessage::user(content);
        renderer.print_message(&message);
        self.messages.push(message);
    }

    fn begin_request(&mut self, renderer: &mut dyn Renderer) -> Instant {
        self.pending.store(true, Ordering::SeqCst);
        self.request_count += 1;
        CHAT_TURNS.click();
        renderer.start_pending();
        Instant::now()
    }

    fn finish_request(
        &mut self,
        started: Instant,
        outcome: Result<(String, Option<String>)>,
        renderer: &mut dyn Renderer,
    ) {
        let elapsed = started.elapsed();
        self.pending.store(false, Ordering::SeqCst);
        renderer.finish_pending();

        let message = match outcome {
            Ok((content, model)) => {
                let ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                self.total_response_ms = self.total_response_ms.saturating_add(ms);
                CHAT_RESPONSE_TIME.add(elapsed.as_secs_f64());
                ChatMessage::bot_reply(
                    content,
                    ms,
                    model.unwrap_or_else(|| DEFAULT_MODEL_LABEL.to_string()),
                )
            }
            Err(_) => {
                self.failure_count += 1;
                CHAT_TURN_FAILURES.click();
                ChatMessage::error(self.error_reply())
            }
        };
        renderer.print_message(&message);
        self.messages.push(message);
    }
}

/// Show the chat header, the conversation so far, and any suggested questions.
pub fn start_conversation<B: Backend>(session: &ChatSession<B>, renderer: &mut dyn Renderer) {
    renderer.print_header(session.profile());
    renderer.print_info("Type /help for commands, /quit to exit");
    for message in session.messages() {
        renderer.print_message(message);
    }
    let questions = session.quick_questions();
    if !questions.is_empty() {
        renderer.print_quick_questions(questions);
    }
}
