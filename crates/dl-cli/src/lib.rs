//! Daily log reporter CLI library.
//!
//! This crate provides the CLI interface for the daily log reporter.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, LogArgs};
pub use config::{Config, EmailConfig, EmailTransport};
