//! Interactive financial coaching chat for gig workers.
//!
//! This binary checks that the MoneyMitra backend is up, asks for a short
//! profile, and then opens a REPL in which every question is answered in the
//! context of that profile.
//!
//! # Usage
//!
//! ```bash
//! # Talk to a backend on localhost:8000
//! moneymitra-chat
//!
//! # Point at another backend and skip the profile questions
//! moneymitra-chat --base-url http://10.0.0.5:8000/api/ --skip-setup \
//!     --occupation "Uber/Ola driver" --income 25000-35000
//!
//! # Load settings from a file and log every request
//! moneymitra-chat --config moneymitra.yaml --log-file requests.jsonl
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/reset` - Change profile and start over
//! - `/try <n>` - Ask a suggested question
//! - `/advice [goals]` - Get a complete financial plan
//! - `/spend add <amount> <category>` - Log an expense, then `/spend analyze`
//! - `/quit` - Exit the application

use std::env;
use std::sync::Arc;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use moneymitra::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, QUICK_QUESTIONS, Renderer,
    SpendAction, help_text, parse_command, run_profile_setup, start_conversation,
};
use moneymitra::client::API_URL_ENV;
use moneymitra::render::savings_headroom;
use moneymitra::utils::time::now;
use moneymitra::{Backend, JsonLinesLogger, MoneyMitra, Transaction, check_health};

/// Main entry point for the moneymitra-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("moneymitra-chat [OPTIONS]");
    let config = ChatConfig::from_args(args)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);

    let base_url = config.base_url.clone().or_else(|| env::var(API_URL_ENV).ok());
    let mut client = MoneyMitra::with_options(base_url, Some(config.timeout))?;
    if let Some(path) = &config.log_file {
        client = client.with_logger(Arc::new(JsonLinesLogger::create(path)?));
    }

    println!("MoneyMitra - AI financial coach for gig workers");
    renderer.print_health(&check_health(&client).await);

    let mut rl = DefaultEditor::new()?;
    let mut profile = config.profile.clone();
    if !config.skip_setup {
        match run_profile_setup(&mut rl, &mut renderer, &profile)? {
            Some(submitted) => profile = submitted,
            None => {
                println!("\nGoodbye!");
                return Ok(());
            }
        }
    }

    let mut session = ChatSession::new(client, profile);
    println!();
    start_conversation(&session, &mut renderer);

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Profile => print_profile(&session, &mut renderer),
                        ChatCommand::Reset => {
                            match run_profile_setup(&mut rl, &mut renderer, session.profile()) {
                                Ok(Some(profile)) => {
                                    session.reset(profile);
                                    println!();
                                    start_conversation(&session, &mut renderer);
                                }
                                Ok(None) => {
                                    println!();
                                    renderer.print_info("Profile unchanged.");
                                }
                                Err(err) => renderer.print_error(&err.to_string()),
                            }
                        }
                        ChatCommand::Health => {
                            let health = check_health(session.backend()).await;
                            renderer.print_health(&health);
                        }
                        ChatCommand::Try(n) => match QUICK_QUESTIONS.get(n - 1) {
                            Some(question) => send(&mut session, question, &mut renderer).await,
                            None => renderer.print_error(&format!(
                                "There are {} suggested questions",
                                QUICK_QUESTIONS.len()
                            )),
                        },
                        ChatCommand::Advice(goals) => {
                            if let Err(err) =
                                session.request_advice(goals.as_deref(), &mut renderer).await
                            {
                                renderer.print_error(&err.to_string());
                            }
                        }
                        ChatCommand::Spend(action) => {
                            handle_spend(&mut session, action, &mut renderer).await
                        }
                        ChatCommand::Diagnose => run_diagnostics(&session, &mut renderer).await,
                        ChatCommand::Stats => print_stats(&session),
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                send(&mut session, line, &mut renderer).await;
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

async fn send<B: Backend>(
    session: &mut ChatSession<B>,
    question: &str,
    renderer: &mut dyn Renderer,
) {
    if let Err(err) = session.send(question, renderer).await {
        renderer.print_error(&err.to_string());
    }
}

async fn handle_spend<B: Backend>(
    session: &mut ChatSession<B>,
    action: SpendAction,
    renderer: &mut dyn Renderer,
) {
    match action {
        SpendAction::Add {
            amount,
            category,
            date,
        } => {
            let date = date.unwrap_or_else(|| now().date());
            match Transaction::new(amount, &category, date) {
                Ok(transaction) => {
                    renderer.print_info(&format!(
                        "Logged ₹{:.2} on {} for {}.",
                        transaction.amount, transaction.category, transaction.date
                    ));
                    session.add_transaction(transaction);
                }
                Err(err) => renderer.print_error(&err.to_string()),
            }
        }
        SpendAction::List => {
            let transactions = session.transactions();
            if transactions.is_empty() {
                renderer.print_info("No expenses logged yet.");
                return;
            }
            for (idx, tx) in transactions.iter().enumerate() {
                println!("    {}. {}  {:<12} ₹{:.2}", idx + 1, tx.date, tx.category, tx.amount);
            }
            let total: f64 = transactions.iter().map(|tx| tx.amount).sum();
            println!("    Total: ₹{total:.2}");
        }
        SpendAction::Clear => {
            session.clear_transactions();
            renderer.print_info("Expense log cleared.");
        }
        SpendAction::Analyze => {
            if let Err(err) = session.analyze_spending(renderer).await {
                renderer.print_error(&err.to_string());
            }
        }
    }
}

async fn run_diagnostics(session: &ChatSession<MoneyMitra>, renderer: &mut dyn Renderer) {
    renderer.start_pending();
    let report = session.backend().self_test(true).await;
    renderer.finish_pending();
    match report {
        Ok(report) => {
            println!("    Diagnostics:");
            println!("      {}", report.message);
            println!(
                "      AI agent: {}",
                if report.agent_available {
                    "available"
                } else {
                    "unavailable"
                }
            );
            match report.model_reachable() {
                Some(true) => println!("      Model: reachable"),
                Some(false) => println!("      Model: unreachable"),
                None => println!("      Model: {}", report.cerebras_test),
            }
            if let Some(status) = report.status {
                println!("      Status: {status}");
            }
        }
        Err(err) => renderer.print_error(&format!("Diagnostics failed: {err}")),
    }
}

fn print_profile<B: Backend>(session: &ChatSession<B>, renderer: &mut dyn Renderer) {
    let profile = session.profile();
    renderer.print_header(profile);
    println!("    Occupation: {}", profile.occupation);
    println!("    Income: {}", profile.income.label());
    println!("    Expenses: ₹{}/month", profile.expenses);
    println!("    {}", savings_headroom(profile));
    println!("    Location: {}", profile.location);
}

fn print_stats<B: Backend>(session: &ChatSession<B>) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Backend: {}", session.backend().endpoint_label());
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    match stats.average_response_ms {
        Some(ms) => println!("      Average response: {ms}ms"),
        None => println!("      Average response: (none yet)"),
    }
    println!("      Expenses logged: {}", stats.transaction_count);
}
