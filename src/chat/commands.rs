//! Slash command parsing for the chat application.
//!
//! This module handles parsing of special commands that start with `/`,
//! allowing users to manage their profile, spending log, and the session
//! without sending a question to the coach.

use time::Date;

use crate::utils::time::parse_iso_date;

/// An action on the in-session spending log.
#[derive(Debug, Clone, PartialEq)]
pub enum SpendAction {
    /// Record an expense; `date` defaults to today when omitted.
    Add {
        /// Amount in rupees.
        amount: f64,
        /// Spending category, e.g. `food` or `fuel`.
        category: String,
        /// Day of the expense.
        date: Option<Date>,
    },

    /// Show logged expenses.
    List,

    /// Forget logged expenses.
    Clear,

    /// Send logged expenses for analysis.
    Analyze,
}

/// A parsed chat command.
///
/// These commands control the chat session and are not sent as questions.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatCommand {
    /// Display help information.
    Help,

    /// Show the current profile.
    Profile,

    /// Change the profile and start a fresh conversation.
    Reset,

    /// Re-check backend health.
    Health,

    /// Send suggested question `n` (1-based).
    Try(usize),

    /// Ask for comprehensive advice, optionally with goals.
    Advice(Option<String>),

    /// Work with the spending log.
    Spend(SpendAction),

    /// Run backend diagnostics.
    Diagnose,

    /// Display session statistics.
    Stats,

    /// Exit the chat application.
    Quit,

    /// Report a parsing error back to the caller.
    Invalid(String),
}

/// Parses user input for slash commands.
///
/// Returns `Some(ChatCommand)` if the input is a command,
/// or `None` if it should be sent to the coach as a question.
///
/// # Examples
///
/// ```
/// # use moneymitra::chat::parse_command;
/// assert!(parse_command("/quit").is_some());
/// assert!(parse_command("/try 2").is_some());
/// assert!(parse_command("How do I save for Diwali?").is_none());
/// ```
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();

    if !input.starts_with('/') {
        return None;
    }

    let mut parts = input[1..].splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "help" | "?" => ChatCommand::Help,
        "profile" => ChatCommand::Profile,
        "reset" => ChatCommand::Reset,
        "health" => ChatCommand::Health,
        "try" => match argument.map(str::parse::<usize>) {
            Some(Ok(n)) if n > 0 => ChatCommand::Try(n),
            Some(_) => ChatCommand::Invalid("/try expects a question number".to_string()),
            None => ChatCommand::Invalid("/try requires a question number".to_string()),
        },
        "advice" => ChatCommand::Advice(argument.map(str::to_string)),
        "spend" => parse_spend_command(argument),
        "diagnose" | "test" => ChatCommand::Diagnose,
        "stats" | "status" => ChatCommand::Stats,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

fn parse_spend_command(argument: Option<&str>) -> ChatCommand {
    let Some(arg) = argument else {
        return ChatCommand::Invalid(
            "/spend requires 'add <amount> <category> [date]', 'list', 'clear', or 'analyze'"
                .to_string(),
        );
    };

    let mut parts = arg.split_whitespace();
    let action = parts.next().unwrap_or_default();
    match action.to_lowercase().as_str() {
        "add" => {
            let rest: Vec<&str> = parts.collect();
            parse_spend_add(&rest)
        }
        "list" => ChatCommand::Spend(SpendAction::List),
        "clear" => ChatCommand::Spend(SpendAction::Clear),
        "analyze" | "analyse" => ChatCommand::Spend(SpendAction::Analyze),
        _ => ChatCommand::Invalid(
            "Unrecognized /spend action (use add, list, clear, or analyze)".to_string(),
        ),
    }
}

fn parse_spend_add(args: &[&str]) -> ChatCommand {
    let [amount, category, rest @ ..] = args else {
        return ChatCommand::Invalid("/spend add requires an amount and a category".to_string());
    };
    let amount = match amount.trim_start_matches('₹').replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => return ChatCommand::Invalid("/spend add expects a positive amount".to_string()),
    };
    let date = match rest {
        [] => None,
        [date] => match parse_iso_date(date) {
            Some(date) => Some(date),
            None => {
                return ChatCommand::Invalid("/spend add expects dates as YYYY-MM-DD".to_string());
            }
        },
        _ => return ChatCommand::Invalid("/spend add takes at most one date".to_string()),
    };
    ChatCommand::Spend(SpendAction::Add {
        amount,
        category: category.to_string(),
        date,
    })
}

/// Returns help text describing available commands.
pub fn help_text() -> &'static str {
    r#"Available commands:
  /profile                     Show your profile
  /reset                       Change profile and start a new conversation
  /health                      Check whether the backend is ready
  /try <n>                     Ask suggested question n
  /advice [goals]              Get a full financial plan for your profile
  /spend add <amt> <category> [YYYY-MM-DD]
                               Log an expense for this session
  /spend list                  Show logged expenses
  /spend clear                 Forget logged expenses
  /spend analyze               Analyse logged expenses
  /diagnose                    Run backend diagnostics
  /stats                       Show session statistics
  /help                        Show this help message
  /quit                        Exit the chat"#
}
