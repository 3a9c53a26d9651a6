//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Time study logger.
///
/// Times each element of a manual process, applies a performance rating and
/// derives normal time, producing a log that can be exported as CSV.
#[derive(Debug, Parser)]
#[command(name = "ts", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run an interactive time study.
    Session(SessionArgs),

    /// Print the resolved configuration as JSON.
    Config,
}

#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Register an element before the session starts (repeatable).
    #[arg(short, long = "element", value_name = "NAME")]
    pub elements: Vec<String>,

    /// Read shell commands from a file instead of stdin.
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,
}

/// Commands accepted by the session shell, one per line.
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Debug, Subcommand)]
pub enum ShellCommand {
    /// Register an element.
    Add {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// List registered elements and progress.
    Elements,

    /// Start timing an element, logging the running one.
    Start {
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        name: Vec<String>,
    },

    /// Start timing a delay, logging the running element.
    Delay,

    /// Pause both timers.
    Pause,

    /// Resume both timers.
    Resume,

    /// Log the running activity and stop both timers.
    Reset,

    /// Reset and discard every logged entry.
    Clear {
        /// Confirm that recorded data should be discarded.
        #[arg(long)]
        yes: bool,
    },

    /// Set the rating for the next entries (omit to use 100%).
    Rating {
        #[arg(allow_hyphen_values = true)]
        value: Option<String>,
    },

    /// Set the category for the next entries.
    Category {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Set notes for the next entry.
    Notes {
        #[arg(num_args = 0.., trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Print the study log.
    Show {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the timers once.
    Status,

    /// Print the timers repeatedly.
    Watch {
        /// Number of readouts.
        #[arg(default_value_t = 20)]
        ticks: u32,
    },

    /// Write the log to a dated CSV file.
    Export {
        /// Target directory (defaults to the configured export directory).
        dir: Option<PathBuf>,
    },

    /// Leave the session.
    #[command(alias = "exit")]
    Quit,
}
