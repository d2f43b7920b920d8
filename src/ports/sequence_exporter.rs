//! Sequence Diagram Exporter
//!
//! Renders an EventLog as js-sequence-diagrams text, one event per line.

use crate::domain::event::EventLog;
use crate::ports::TraceExporter;
use std::io::{Result, Write};

#[derive(Debug, Clone, Default)]
pub struct SequenceExporter {
    /// Optional `Title:` header line
    pub title: Option<String>,
}

impl SequenceExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(title: Option<String>) -> Self {
        Self { title }
    }

    /// Convert an EventLog to diagram text.
    pub fn to_text(&self, log: &EventLog) -> String {
        let mut lines = Vec::with_capacity(log.len() + 1);

        if let Some(title) = &self.title {
            lines.push(format!("Title: {}", Self::escape_title(title)));
        }

        for event in log {
            lines.push(event.to_string());
        }

        lines.join("\n")
    }

    // Titles must stay on one line.
    fn escape_title(title: &str) -> String {
        title.replace('\n', "\\n")
    }
}

impl TraceExporter for SequenceExporter {
    fn export(&self, log: &EventLog, out: &mut dyn Write) -> Result<()> {
        let text = self.to_text(log);
        if !text.is_empty() {
            out.write_all(text.as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}
