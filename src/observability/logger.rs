//! Structured JSON logger
//!
//! - One log line = one event
//! - `event` first, `severity` second, remaining fields sorted by key
//! - INFO / WARN / TRACE to stdout, ERROR / FATAL to stderr
//! - Synchronous, no buffering

use std::fmt;
use std::io::{self, Write};

use serde_json::{Map, Value};

use super::events::Event;

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Trace = 0,
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }

    fn to_stderr(self) -> bool {
        self >= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured logger that outputs one JSON object per line
pub struct Logger;

impl Logger {
    /// Log an event with an explicit severity
    pub fn log(severity: Severity, event: Event, fields: &[(&str, &str)]) {
        let line = Self::render(severity, event, fields);
        if severity.to_stderr() {
            Self::write_line(&mut io::stderr().lock(), &line);
        } else {
            Self::write_line(&mut io::stdout().lock(), &line);
        }
    }

    /// Log an event at its catalogue severity
    pub fn event(event: Event, fields: &[(&str, &str)]) {
        Self::log(event.severity(), event, fields);
    }

    pub fn trace(event: Event, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: Event, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: Event, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: Event, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    pub fn fatal(event: Event, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }

    /// Renders a log line without the trailing newline.
    ///
    /// Caller fields named `event` or `severity` are dropped.
    pub(crate) fn render(severity: Severity, event: Event, fields: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = fields
            .iter()
            .filter(|(k, _)| *k != "event" && *k != "severity")
            .collect();
        sorted.sort_by_key(|(k, _)| *k);

        let mut obj = Map::with_capacity(sorted.len() + 2);
        obj.insert("event".into(), Value::from(event.as_str()));
        obj.insert("severity".into(), Value::from(severity.as_str()));
        for (k, v) in sorted {
            obj.insert((*k).to_string(), Value::from(*v));
        }
        Value::Object(obj).to_string()
    }

    fn write_line<W: Write>(writer: &mut W, line: &str) {
        // A failed log write must never fail the caller
        let _ = writeln!(writer, "{}", line);
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error.to_stderr());
        assert!(!Severity::Warn.to_stderr());
    }

    #[test]
    fn test_render_is_json_with_event_first() {
        let line = Logger::render(Severity::Info, Event::Serving, &[("port", "3000")]);
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "SERVING");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["port"], "3000");
        assert!(line.starts_with("{\"event\":\"SERVING\",\"severity\":\"INFO\""));
    }

    #[test]
    fn test_render_sorts_fields() {
        let a = Logger::render(
            Severity::Info,
            Event::TableLoaded,
            &[("table", "Orders"), ("rows", "830"), ("elapsed_ms", "12")],
        );
        let b = Logger::render(
            Severity::Info,
            Event::TableLoaded,
            &[("rows", "830"), ("elapsed_ms", "12"), ("table", "Orders")],
        );
        assert_eq!(a, b);
        assert!(a.find("elapsed_ms").unwrap() < a.find("rows").unwrap());
        assert!(a.find("rows").unwrap() < a.find("table").unwrap());
    }

    #[test]
    fn test_render_escapes_and_stays_one_line() {
        let line = Logger::render(
            Severity::Error,
            Event::AuditWriteFailed,
            &[("reason", "bad \"quote\"\nnext")],
        );
        assert!(!line.contains('\n'));
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["reason"], "bad \"quote\"\nnext");
    }

    #[test]
    fn test_reserved_keys_are_not_overridden() {
        let line = Logger::render(Severity::Warn, Event::QueryRejected, &[("event", "X")]);
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["event"], "QUERY_REJECTED");
    }
}
