//! Chat application module for conversations with the MoneyMitra coach.
//!
//! This module provides a REPL chat interface built on top of the
//! moneymitra client library. It supports:
//!
//! - A profile form that sets the context sent with every question
//! - Suggested first questions and slash commands
//! - Full financial plans and analysis of expenses logged in the session
//!
//! # Architecture
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing, the YAML config file, and resolution
//! - [`setup`]: The interactive profile form
//! - [`session`]: Conversation state and backend interaction
//! - [`commands`]: Slash command parsing

mod commands;
mod config;
mod session;
mod setup;

pub use crate::render::{PlainTextRenderer, Renderer};
pub use commands::{ChatCommand, SpendAction, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, ConfigFile, ProfileDefaults};
pub use session::{
    ChatSession, DEFAULT_MODEL_LABEL, QUICK_QUESTIONS, SessionStats, WELCOME_MESSAGE,
    start_conversation,
};
pub use setup::{Prompter, run_profile_setup};
