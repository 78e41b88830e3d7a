//! Core module - shared infrastructure for agent-eval
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the crate.

pub mod config;
pub mod console;
pub mod error;
pub mod types;

pub use config::{Config, ProviderSettings};
pub use console::Console;
pub use error::{AgentError, Result};
pub use types::*;
