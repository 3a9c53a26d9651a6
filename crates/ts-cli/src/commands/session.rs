//! Session command: runs the interactive time study shell.

use std::fs::File;
use std::io::{self, BufReader, IsTerminal};

use anyhow::{Context, Result};

use ts_core::{StudySession, SystemClock};

use crate::Config;
use crate::cli::SessionArgs;
use crate::shell::Shell;

/// Runs a study session against the system clock.
///
/// Commands come from `--script` when given, otherwise from stdin. The log
/// is discarded when the session ends.
pub fn run(args: &SessionArgs, config: &Config) -> Result<()> {
    let stdout = io::stdout();
    let mut shell = Shell::new(StudySession::new(SystemClock), config, stdout.lock());

    for name in &args.elements {
        shell.add_element(name)?;
    }

    if let Some(path) = &args.script {
        let file = File::open(path)
            .with_context(|| format!("failed to open script: {}", path.display()))?;
        shell.run(BufReader::new(file), false)?;
    } else {
        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        shell.run(stdin.lock(), interactive)?;
    }

    let entries = shell.session().log().len();
    if entries > 0 {
        tracing::info!(entries, "session ended; unexported entries are discarded");
    }
    Ok(())
}
