//! Output rendering for the chat application.
//!
//! This module provides a trait-based rendering abstraction so the session
//! logic never writes to the terminal directly. The default implementation
//! uses ANSI escape codes for the health badge, message metadata, and error
//! replies.

use std::io::{self, Stdout, Write};

use crate::types::{ChatMessage, Sender, SystemHealth, UserProfile};
use crate::utils::time::clock_time;

/// ANSI escape code for dim text (used for metadata and the thinking indicator).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code for bold text (used for speaker names).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the coach's name).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for green text (used for a healthy badge).
const ANSI_GREEN: &str = "\x1b[32m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// ANSI escape code for yellow text (used for suggestions).
const ANSI_YELLOW: &str = "\x1b[33m";

/// ANSI sequence that returns to column 0 and erases the line.
const ANSI_CLEAR_LINE: &str = "\r\x1b[2K";

/// Text shown while a request is outstanding.
pub const THINKING_TEXT: &str = "MoneyMitra is thinking...";

/// Trait for rendering chat output.
pub trait Renderer: Send {
    /// Print the chat header for the active profile.
    fn print_header(&mut self, profile: &UserProfile);

    /// Print the backend readiness badge.
    fn print_health(&mut self, health: &SystemHealth);

    /// Print one conversation entry.
    fn print_message(&mut self, message: &ChatMessage);

    /// Called when a request is sent; shows the thinking indicator.
    fn start_pending(&mut self);

    /// Called when the request completes, successfully or not.
    fn finish_pending(&mut self);

    /// Print suggested first questions.
    fn print_quick_questions(&mut self, questions: &[&str]);

    /// Print an error message.
    fn print_error(&mut self, error: &str);

    /// Print an informational message.
    fn print_info(&mut self, info: &str);
}

/// Plain text renderer with optional ANSI styling.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    pending: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            pending: false,
        }
    }

    /// Flushes stdout so partial lines appear immediately.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn styled(&self, style: &str, text: &str) -> String {
        if self.use_color {
            format!("{style}{text}{ANSI_RESET}")
        } else {
            text.to_string()
        }
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn print_header(&mut self, profile: &UserProfile) {
        println!("{}", self.styled(ANSI_BOLD, &profile_header(profile)));
    }

    fn print_health(&mut self, health: &SystemHealth) {
        let dot_style = if health.is_healthy() {
            ANSI_GREEN
        } else {
            ANSI_RED
        };
        let mut line = format!("{} {}", self.styled(dot_style, "●"), health_badge(health));
        if let Some(detail) = health.description() {
            line.push_str(&self.styled(ANSI_DIM, &format!(" ({detail})")));
        }
        println!("{line}");
    }

    fn print_message(&mut self, message: &ChatMessage) {
        let (speaker, style) = match message.sender {
            Sender::User => ("You", ANSI_BOLD),
            Sender::Bot => ("MoneyMitra", ANSI_CYAN),
        };
        println!("{}", self.styled(style, &format!("{speaker}:")));
        if message.is_error {
            println!("{}", self.styled(ANSI_RED, &message.content));
        } else {
            println!("{}", message.content);
        }
        println!("{}", self.styled(ANSI_DIM, &format!("  {}", message_meta(message))));
        self.flush();
    }

    fn start_pending(&mut self) {
        self.pending = true;
        if self.use_color {
            print!("{ANSI_DIM}{THINKING_TEXT}{ANSI_RESET}");
        } else {
            println!("{THINKING_TEXT}");
        }
        self.flush();
    }

    fn finish_pending(&mut self) {
        if self.pending && self.use_color {
            print!("{ANSI_CLEAR_LINE}");
        }
        self.pending = false;
        self.flush();
    }

    fn print_quick_questions(&mut self, questions: &[&str]) {
        println!("Try asking (/try <n>):");
        for (idx, question) in questions.iter().enumerate() {
            println!("  {}", self.styled(ANSI_YELLOW, &format!("{}. {question}", idx + 1)));
        }
    }

    fn print_error(&mut self, error: &str) {
        self.finish_pending();
        eprintln!("{}", self.styled(ANSI_RED, &format!("Error: {error}")));
    }

    fn print_info(&mut self, info: &str) {
        println!("{info}");
    }
}

/// The readiness badge text: `Backend: Ready` or `Backend: Error`.
pub fn health_badge(health: &SystemHealth) -> String {
    if health.is_healthy() {
        "Backend: Ready".to_string()
    } else {
        "Backend: Error".to_string()
    }
}

/// The line identifying who is chatting.
pub fn profile_header(profile: &UserProfile) -> String {
    format!(
        "Chatting as: {} (₹{}/month)",
        profile.occupation.label(),
        profile.income.value()
    )
}

/// What the income band leaves after monthly expenses.
pub fn savings_headroom(profile: &UserProfile) -> String {
    let expenses = profile.expenses_amount();
    let low = f64::from(profile.income.lower_bound()) - expenses;
    match profile.income.upper_bound() {
        Some(high) => format!(
            "Left after expenses: ₹{low:.0} to ₹{:.0}/month",
            f64::from(high) - expenses
        ),
        None => format!("Left after expenses: ₹{low:.0}+/month"),
    }
}

/// Timestamp, response time, and model for a message, separated by `·`.
pub fn message_meta(message: &ChatMessage) -> String {
    let mut parts = vec![clock_time(&message.timestamp)];
    if let Some(ms) = message.response_time_ms {
        parts.push(format!("⚡ {ms}ms"));
    }
    if let Some(model) = &message.model {
        parts.push(model.clone());
    }
    parts.join(" · ")
}
