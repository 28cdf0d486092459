//! CLI subcommand implementations.

pub mod email;
pub mod export;
pub mod report;
pub mod util;
