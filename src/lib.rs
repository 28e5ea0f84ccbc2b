//! Client library and terminal chat for the MoneyMitra financial-coaching API.
//!
//! [`MoneyMitra`] wraps the backend's HTTP endpoints; the [`chat`] module
//! builds the interactive coach on top of it.

// Public modules
pub mod backend;
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod observability;
pub mod render;
pub mod types;
pub mod utils;

// Re-exports
pub use backend::{Backend, check_health};
pub use client::MoneyMitra;
pub use client_logger::{ClientLogger, JsonLinesLogger};
pub use error::{Error, Result};
pub use observability::register_biometrics;
pub use types::*;
