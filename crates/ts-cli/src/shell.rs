//! Line-oriented session shell.
//!
//! Each input line is parsed as a [`ShellCommand`] and applied to a
//! [`StudySession`]. Notifications queued by the session are printed after
//! every command.

use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration as StdDuration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;

use ts_core::{
    ActivityEvent, ActivityState, Clock, DELAY_ELEMENT, ElementStatus, ExportError, LogEntry, LogRow,
    Readout, StudySession, export_filename, format_duration,
};

use crate::cli::{ShellCommand, ShellLine};
use crate::config::Config;

/// Whether the shell should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Drives a [`StudySession`] from text commands.
pub struct Shell<'a, C: Clock, W: Write> {
    session: StudySession<C>,
    config: &'a Config,
    out: W,
}

impl<'a, C: Clock, W: Write> Shell<'a, C, W> {
    pub const fn new(session: StudySession<C>, config: &'a Config, out: W) -> Self {
        Self {
            session,
            config,
            out,
        }
    }

    pub const fn session(&self) -> &StudySession<C> {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Registers an element, reporting rejections instead of failing.
    pub fn add_element(&mut self, name: &str) -> Result<()> {
        match self.session.add_element(name) {
            Ok(name) => writeln!(self.out, "Added element \"{name}\"")?,
            Err(e) => writeln!(self.out, "error: {e}")?,
        }
        Ok(())
    }

    /// Reads commands until EOF or `quit`.
    ///
    /// `prompt` is printed before each line when reading from a terminal.
    pub fn run<R: BufRead>(&mut self, reader: R, prompt: bool) -> Result<()> {
        let mut lines = reader.lines();
        loop {
            if prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("failed to read command")?;
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Applies one command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let command = match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                write!(self.out, "{e}")?;
                return Ok(Flow::Continue);
            }
        };
        tracing::debug!(?command, "shell command");

        // Free text keeps its spacing; clap only sees it split into words
        let rest = line
            .split_once(char::is_whitespace)
            .map_or("", |(_, rest)| rest.trim_start());
        let flow = self.dispatch(command, rest)?;
        self.print_events()?;
        Ok(flow)
    }

    /// Applies a parsed command. `rest` is the raw text after the command word.
    fn dispatch(&mut self, command: ShellCommand, rest: &str) -> Result<Flow> {
        match command {
            ShellCommand::Add { name } => self.add_element(free_text(rest, &name))?,
            ShellCommand::Elements => self.print_elements()?,
            ShellCommand::Start { name } => {
                if let Err(e) = self.session.begin_activity(free_text(rest, &name)) {
                    writeln!(self.out, "error: {e}")?;
                }
            }
            ShellCommand::Delay => self.session.begin_delay(),
            ShellCommand::Pause => self.session.pause(),
            ShellCommand::Resume => self.session.resume(),
            ShellCommand::Reset => self.session.reset(),
            ShellCommand::Clear { yes } => {
                if yes {
                    self.session.clear();
                    writeln!(self.out, "All recorded data has been cleared")?;
                } else {
                    writeln!(
                        self.out,
                        "Clearing discards all recorded data; run `clear --yes` to confirm"
                    )?;
                }
            }
            ShellCommand::Rating { value } => {
                self.session.input.rating = value;
            }
            ShellCommand::Category { text } => {
                self.session.input.category = free_text(rest, &text).to_string();
            }
            ShellCommand::Notes { text } => {
                self.session.input.notes = free_text(rest, &text).to_string();
            }
            ShellCommand::Show { json } => self.print_log(json)?,
            ShellCommand::Status => {
                let line = render_readout(&self.session.readout());
                writeln!(self.out, "{line}")?;
            }
            ShellCommand::Watch { ticks } => self.watch(ticks)?,
            ShellCommand::Export { dir } => {
                let dir = dir.unwrap_or_else(|| self.config.export_dir.clone());
                self.export(&dir)?;
            }
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Prints `ticks` readouts, `tick_interval_ms` apart.
    ///
    /// Only reads the session.
    fn watch(&mut self, ticks: u32) -> Result<()> {
        let interval = StdDuration::from_millis(self.config.tick_interval_ms);
        let session = &self.session;
        for tick in 0..ticks {
            if tick > 0 {
                std::thread::sleep(interval);
            }
            writeln!(self.out, "{}", render_readout(&session.readout()))?;
        }
        Ok(())
    }

    fn export(&mut self, dir: &Path) -> Result<()> {
        let csv = match self.session.export_csv() {
            Ok(csv) => csv,
            Err(ExportError::Empty) => {
                writeln!(self.out, "No data to export!")?;
                return Ok(());
            }
            Err(e) => return Err(e).context("failed to render CSV"),
        };

        let path = dir.join(export_filename(Local::now().date_naive()));
        let written = std::fs::create_dir_all(dir)
            .and_then(|()| std::fs::write(&path, csv))
            .with_context(|| format!("failed to write {}", path.display()));
        match written {
            Ok(()) => {
                tracing::info!(path = %path.display(), "exported study log");
                writeln!(
                    self.out,
                    "Exported {} entries to {}",
                    self.session.log().len(),
                    path.display()
                )?;
            }
            // The log only lives in memory; keep the session alive so the
            // operator can retry elsewhere.
            Err(e) => writeln!(self.out, "error: {e:#}")?,
        }
        Ok(())
    }

    fn print_elements(&mut self) -> Result<()> {
        let statuses = self.session.element_statuses();
        if statuses.is_empty() {
            writeln!(self.out, "No elements registered.")?;
        }
        for (name, status) in statuses {
            let marker = match status {
                ElementStatus::Current => '>',
                ElementStatus::Completed => '*',
                ElementStatus::Pending => ' ',
            };
            writeln!(self.out, "{marker} {name}")?;
        }
        writeln!(self.out, "Progress: {}", self.session.progress())?;
        Ok(())
    }

    fn print_log(&mut self, json: bool) -> Result<()> {
        let rows: Vec<LogRow> = self
            .session
            .log()
            .entries()
            .iter()
            .map(LogEntry::row)
            .collect();
        if json {
            let json = serde_json::to_string_pretty(&rows).context("failed to serialize log")?;
            writeln!(self.out, "{json}")?;
        } else if rows.is_empty() {
            writeln!(self.out, "No entries recorded.")?;
        } else {
            write!(self.out, "{}", render_table(&rows))?;
        }
        Ok(())
    }

    fn print_events(&mut self) -> Result<()> {
        for event in self.session.take_events() {
            writeln!(self.out, "{}", describe_event(&event))?;
        }
        Ok(())
    }
}

/// The raw argument text for a command whose words clap parsed as `words`.
///
/// `rest` keeps the operator's spacing; it is empty exactly when `words` is.
fn free_text<'r>(rest: &'r str, words: &[String]) -> &'r str {
    if words.is_empty() { "" } else { rest }
}

/// One-line notification for an activity event.
pub fn describe_event(event: &ActivityEvent) -> String {
    match event {
        ActivityEvent::Switched { to, .. } if to == DELAY_ELEMENT => "Timing a delay".to_string(),
        ActivityEvent::Switched { to, .. } => format!("Now timing \"{to}\""),
        ActivityEvent::Logged { element, observed } => {
            format!("Finished timing \"{element}\" ({})", format_duration(*observed))
        }
        ActivityEvent::Paused { element } => {
            format!("Paused timing of \"{}\"", element.as_deref().unwrap_or("-"))
        }
        ActivityEvent::Resumed { element } => {
            format!("Resumed timing of \"{}\"", element.as_deref().unwrap_or("-"))
        }
        ActivityEvent::Reset => "Timers have been reset".to_string(),
    }
}

/// Status line for the display tick.
pub fn render_readout(readout: &Readout) -> String {
    let task = match (&readout.current, readout.state) {
        (None, _) => "None".to_string(),
        (Some(_), _) if readout.delay_active => "DELAY".to_string(),
        (Some(name), ActivityState::Paused) => format!("{name} (paused)"),
        (Some(name), _) => name.clone(),
    };
    format!(
        "Total {} | Current {} | Task: {} | Progress {}",
        format_duration(readout.session_elapsed),
        format_duration(readout.activity_elapsed),
        task,
        readout.progress
    )
}

/// Renders rows as a left-aligned text table.
fn render_table(rows: &[LogRow]) -> String {
    let cells: Vec<[&str; 8]> = rows
        .iter()
        .map(|r| {
            [
                r.element.as_str(),
                r.category.as_str(),
                r.start_time.as_str(),
                r.stop_time.as_str(),
                r.observed_time.as_str(),
                r.rating.as_str(),
                r.normal_time.as_str(),
                r.notes.as_str(),
            ]
        })
        .collect();

    let mut widths = ts_core::CSV_HEADERS.map(|h| h.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cols: &[&str; 8]| {
        let line = cols
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    };
    push_line(&ts_core::CSV_HEADERS);
    for row in &cells {
        push_line(row);
    }
    out
}
