//! Time study CLI library.
//!
//! This crate provides the command-line front end: configuration, argument
//! parsing and the interactive session shell.

mod cli;
pub mod commands;
mod config;
pub mod shell;

pub use cli::{Cli, Commands, SessionArgs, ShellCommand, ShellLine};
pub use config::Config;
