//! Command-line front end
//!
//! This crate provides the `eventdigest` command-line interface.

pub mod cli;
pub mod commands;
pub mod context;
pub mod error;

pub use cli::Cli;
pub use context::{Connection, Context};
pub use error::{CliError, CliResult};
