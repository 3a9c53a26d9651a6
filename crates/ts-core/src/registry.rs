//! Registered process elements.

use thiserror::Error;

use crate::log::StudyLog;
use crate::logger::DELAY_ELEMENT;

/// Reasons an element name is rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The name was empty after trimming.
    #[error("element name cannot be empty")]
    Empty,

    /// The name is already registered.
    #[error("element already registered: {0}")]
    Duplicate(String),

    /// The name collides with the delay marker.
    #[error("element name is reserved: {0}")]
    Reserved(String),

    /// Commas would shift the unquoted CSV columns.
    #[error("element name cannot contain a comma: {0}")]
    Comma(String),

    /// The name was never registered.
    #[error("unknown element: {0}")]
    Unknown(String),
}

/// Where an element stands in the current study.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementStatus {
    /// Being timed right now.
    Current,
    /// Logged at least once.
    Completed,
    /// Not yet timed.
    Pending,
}

/// Ordered set of element names, kept in registration order.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    names: Vec<String>,
}

impl ElementRegistry {
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Registers a trimmed element name and returns it.
    pub fn add(&mut self, name: &str) -> Result<&str, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::Empty);
        }
        if name == DELAY_ELEMENT {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        if name.contains(',') {
            return Err(RegistryError::Comma(name.to_string()));
        }
        if self.contains(name) {
            return Err(RegistryError::Duplicate(name.to_string()));
        }
        self.names.push(name.to_string());
        Ok(self.names.last().map_or("", String::as_str))
    }

    /// Checks that `name` may be timed as an element.
    ///
    /// Delays go through their own path and are never started by name.
    pub fn check_startable(&self, name: &str) -> Result<(), RegistryError> {
        if name == DELAY_ELEMENT {
            return Err(RegistryError::Reserved(name.to_string()));
        }
        if !self.contains(name) {
            return Err(RegistryError::Unknown(name.to_string()));
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Pairs each element with its status.
    ///
    /// `current` wins over a completed entry in the log, matching what an
    /// operator expects to see highlighted.
    pub fn statuses<'a>(
        &'a self,
        current: Option<&str>,
        log: &StudyLog,
    ) -> Vec<(&'a str, ElementStatus)> {
        self.iter()
            .map(|name| {
                let status = if current == Some(name) {
                    ElementStatus::Current
                } else if log.entries().iter().any(|e| e.element() == name) {
                    ElementStatus::Completed
                } else {
                    ElementStatus::Pending
                };
                (name, status)
            })
            .collect()
    }
}
