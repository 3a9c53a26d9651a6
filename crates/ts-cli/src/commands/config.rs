//! Config command for printing the resolved configuration.

use std::io::Write;

use anyhow::{Context, Result};

use crate::Config;

pub fn run<W: Write>(writer: &mut W, config: &Config) -> Result<()> {
    let json = serde_json::to_string_pretty(config).context("failed to serialize config")?;
    writeln!(writer, "{json}")?;
    Ok(())
}
