//! CLI module for postd
//!
//! - init: write a default config and create the data directory
//! - serve: load config, open the store and run the HTTP server

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, open_store, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
