//! Diagnostics channel
//!
//! Compile errors and lifecycle faults accumulate here until the next
//! reload. The embedding environment reads them back either as one
//! multi-line string ([`DiagnosticLog::last_error`]) or as JSON.

use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Exception,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Exception => "exception",
        }
    }
}

/// One located message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub section: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
    pub message: String,
}

impl Diagnostic {
    pub fn new(section: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            line: 0,
            column: 0,
            severity,
            message: message.into(),
        }
    }

    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// `<section> (<line>, <column>) : <message>`
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}) : {}",
            self.section, self.line, self.column, self.message
        )
    }
}

/// Bounded log of diagnostics for the current module.
///
/// The entries reported by [`last_error`](Self::last_error) form the
/// current batch: everything since the last clear for compile errors, or
/// just the newest exception once a lifecycle hook has faulted.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<Diagnostic>,
    capacity: usize,
    batch_start: usize,
    dropped: usize,
}

impl DiagnosticLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            batch_start: 0,
            dropped: 0,
        }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        // A hook faulting every frame repeats itself; keep one copy.
        if self.entries.back() == Some(&diagnostic) {
            return;
        }
        if diagnostic.severity == Severity::Exception {
            self.batch_start = self.entries.len();
        }
        self.entries.push_back(diagnostic);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
            self.batch_start = self.batch_start.saturating_sub(1);
            self.dropped += 1;
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.batch_start = 0;
        self.dropped = 0;
    }

    /// Oldest first.
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &Diagnostic> + '_ {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Diagnostic> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries evicted because the log was full.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn has_severity(&self, severity: Severity) -> bool {
        self.entries.iter().any(|d| d.severity == severity)
    }

    /// The current batch, one diagnostic per line. Warnings are left out,
    /// so this is empty when nothing went wrong.
    pub fn last_error(&self) -> String {
        self.entries
            .range(self.batch_start..)
            .filter(|d| d.severity != Severity::Warning)
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(section: &str, line: u32, message: &str) -> Diagnostic {
        Diagnostic::new(section, Severity::Error, message).at(line, 1)
    }

    #[test]
    fn formats_one_line_per_diagnostic() {
        let mut log = DiagnosticLog::new(8);
        log.push(error("main.js", 3, "unexpected token"));
        log.push(error("util.js", 10, "missing )"));
        assert_eq!(
            log.last_error(),
            "main.js (3, 1) : unexpected token\nutil.js (10, 1) : missing )"
        );
    }

    #[test]
    fn exception_starts_a_new_batch() {
        let mut log = DiagnosticLog::new(8);
        log.push(Diagnostic::new("update", Severity::Exception, "boom").at(4, 9));
        log.push(Diagnostic::new("draw", Severity::Exception, "bang").at(7, 2));
        assert_eq!(log.len(), 2);
        assert_eq!(log.last_error(), "draw (7, 2) : bang");
    }

    #[test]
    fn warnings_are_not_errors() {
        let mut log = DiagnosticLog::new(8);
        log.push(Diagnostic::new("draw", Severity::Warning, "draw is not a function"));
        assert_eq!(log.len(), 1);
        assert!(log.last_error().is_empty());
        log.push(error("script", 1, "unexpected token"));
        assert_eq!(log.last_error(), "script (1, 1) : unexpected token");
    }

    #[test]
    fn repeated_faults_collapse() {
        let mut log = DiagnosticLog::new(8);
        let fault = Diagnostic::new("update", Severity::Exception, "boom").at(2, 5);
        for _ in 0..10 {
            log.push(fault.clone());
        }
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut log = DiagnosticLog::new(2);
        log.push(error("a", 1, "one"));
        log.push(error("b", 2, "two"));
        log.push(error("c", 3, "three"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.dropped(), 1);
        assert_eq!(log.entries().next().map(|d| d.section.as_str()), Some("b"));
        assert!(log.last_error().starts_with("b (2, 1)"));
    }

    #[test]
    fn full_log_keeps_the_newest_batch() {
        let mut log = DiagnosticLog::new(4);
        for line in 1..=100 {
            log.push(error("a", line, "compile"));
        }
        log.push(Diagnostic::new("update", Severity::Exception, "boom").at(1, 1));
        log.push(error("b", 1, "after"));
        assert_eq!(log.len(), 4);
        assert_eq!(log.dropped(), 98);
        assert_eq!(log.last_error(), "update (1, 1) : boom\nb (1, 1) : after");
        assert_eq!(log.entries().next_back().map(|d| d.section.as_str()), Some("b"));
    }

    #[test]
    fn clear_empties_last_error() {
        let mut log = DiagnosticLog::default();
        log.push(error("a", 1, "one"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last_error(), "");
    }

    #[test]
    fn json_uses_lowercase_severity() {
        let mut log = DiagnosticLog::default();
        log.push(Diagnostic::new("draw", Severity::Exception, "x is not defined").at(1, 2));
        let json = log.to_json().unwrap();
        assert!(json.contains("\"severity\": \"exception\""));
        assert!(json.contains("\"section\": \"draw\""));
    }
}
