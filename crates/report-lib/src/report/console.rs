//! Console log entries

use crate::models::ConsoleMessage;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleLevel {
    Error,
    Warning,
    Info,
    Log,
    Debug,
    Other,
}

impl ConsoleLevel {
    /// Map a browser console message type onto a level
    pub fn from_message_type(message_type: &str) -> Self {
        match message_type.to_ascii_lowercase().as_str() {
            "error" | "assert" => ConsoleLevel::Error,
            "warning" | "warn" => ConsoleLevel::Warning,
            "info" => ConsoleLevel::Info,
            "log" => ConsoleLevel::Log,
            "debug" | "trace" | "verbose" => ConsoleLevel::Debug,
            _ => ConsoleLevel::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleLevel::Error => "error",
            ConsoleLevel::Warning => "warning",
            ConsoleLevel::Info => "info",
            ConsoleLevel::Log => "log",
            ConsoleLevel::Debug => "debug",
            ConsoleLevel::Other => "other",
        }
    }
}

impl std::fmt::Display for ConsoleLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConsoleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(ConsoleLevel::Error),
            "warning" | "warn" => Ok(ConsoleLevel::Warning),
            "info" => Ok(ConsoleLevel::Info),
            "log" => Ok(ConsoleLevel::Log),
            "debug" => Ok(ConsoleLevel::Debug),
            "other" => Ok(ConsoleLevel::Other),
            other => Err(format!("unknown console level '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub level: ConsoleLevel,
    /// Message type as reported by the browser
    pub message_type: String,
    pub text: String,
    /// `url:line:column` when the browser reported a location
    pub source: Option<String>,
}

impl From<&ConsoleMessage> for ConsoleEntry {
    fn from(message: &ConsoleMessage) -> Self {
        let source = message
            .location
            .as_ref()
            .filter(|loc| !loc.url.is_empty())
            .map(|loc| match (loc.line_number, loc.column_number) {
                (Some(line), Some(column)) => format!("{}:{}:{}", loc.url, line, column),
                (Some(line), None) => format!("{}:{}", loc.url, line),
                _ => loc.url.clone(),
            });

        Self {
            level: ConsoleLevel::from_message_type(&message.message_type),
            message_type: message.message_type.clone(),
            text: message.text.clone(),
            source,
        }
    }
}

/// Message counts per level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSummary {
    pub total: usize,
    pub error: usize,
    pub warning: usize,
    pub info: usize,
    pub log: usize,
    pub debug: usize,
    pub other: usize,
}

impl ConsoleSummary {
    pub fn count(&self, level: ConsoleLevel) -> usize {
        match level {
            ConsoleLevel::Error => self.error,
            ConsoleLevel::Warning => self.warning,
            ConsoleLevel::Info => self.info,
            ConsoleLevel::Log => self.log,
            ConsoleLevel::Debug => self.debug,
            ConsoleLevel::Other => self.other,
        }
    }

    fn add(&mut self, level: ConsoleLevel) {
        self.total += 1;
        match level {
            ConsoleLevel::Error => self.error += 1,
            ConsoleLevel::Warning => self.warning += 1,
            ConsoleLevel::Info => self.info += 1,
            ConsoleLevel::Log => self.log += 1,
            ConsoleLevel::Debug => self.debug += 1,
            ConsoleLevel::Other => self.other += 1,
        }
    }
}

/// Normalize messages in capture order and count them
pub fn build_console(messages: &[ConsoleMessage]) -> (Vec<ConsoleEntry>, ConsoleSummary) {
    let mut summary = ConsoleSummary::default();
    let entries = messages
        .iter()
        .map(|m| {
            let entry = ConsoleEntry::from(m);
            summary.add(entry.level);
            entry
        })
        .collect();
    (entries, summary)
}
