//! CLI module - interactive interface
//!
//! Contains the REPL and its commands.

pub mod commands;
pub mod repl;

pub use repl::Repl;
