//! A sink for human-readable diagnostics, independent of the `Result`-based
//! error types used by the rest of the crate.
//!
//! Every scanner/parser/composer error already carries a [`crate::Mark`];
//! this module exists for callers that want a uniform way to collect or
//! print problems (including non-fatal ones, should a future version add
//! warnings) rather than matching on each layer's error enum.

use std::fmt;

use crate::Mark;

/// How serious a [`Diagnostic`] is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Severity {
    /// A problem that does not prevent the current operation from
    /// completing, but that the caller likely wants to know about.
    Warning,
    /// A problem that aborted the current operation.
    Error,
}

/// One reported problem.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// The module that reported it (`"reader"`, `"scanner"`, `"parser"`,
    /// `"composer"`, `"emitter"`, ...).
    pub module: &'static str,
    /// The human-readable message.
    pub message: String,
    /// Where in the input the problem was found, if applicable.
    pub mark: Option<Mark>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        match self.mark {
            Some(mark) => write!(f, "{}: {}: {} ({})", self.module, level, self.message, mark),
            None => write!(f, "{}: {}: {}", self.module, level, self.message),
        }
    }
}

impl Diagnostic {
    /// Build an error-severity diagnostic.
    pub fn error(module: &'static str, message: impl Into<String>, mark: Option<Mark>) -> Self {
        Diagnostic {
            severity: Severity::Error,
            module,
            message: message.into(),
            mark,
        }
    }

    /// Build a warning-severity diagnostic.
    pub fn warning(module: &'static str, message: impl Into<String>, mark: Option<Mark>) -> Self {
        Diagnostic {
            severity: Severity::Warning,
            module,
            message: message.into(),
            mark,
        }
    }
}

/// Something that can receive [`Diagnostic`]s as they are produced.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// A sink that keeps every diagnostic it receives, in order.
#[derive(Default, Debug, Clone)]
pub struct CollectingDiagnosticSink {
    diagnostics: Vec<Diagnostic>,
}

impl CollectingDiagnosticSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The diagnostics collected so far, in report order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True if no diagnostic of [`Severity::Error`] has been reported.
    pub fn is_ok(&self) -> bool {
        !self
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }
}

impl DiagnosticSink for CollectingDiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// A sink that writes each diagnostic to `stderr` as it arrives, optionally
/// colorized with raw ANSI escapes (errors in bold red, warnings in bold
/// yellow). No terminal-color crate is pulled in for this: the escape
/// sequences are few enough to write out directly.
pub struct StderrDiagnosticSink {
    color: bool,
}

const RED_BOLD: &str = "\x1b[1;31m";
const YELLOW_BOLD: &str = "\x1b[1;33m";
const RESET: &str = "\x1b[0m";

impl StderrDiagnosticSink {
    /// Create a sink that writes plain text.
    pub fn new() -> Self {
        StderrDiagnosticSink { color: false }
    }

    /// Create a sink that writes ANSI-colorized text.
    pub fn with_color() -> Self {
        StderrDiagnosticSink { color: true }
    }
}

impl Default for StderrDiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for StderrDiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.color {
            let color = match diagnostic.severity {
                Severity::Warning => YELLOW_BOLD,
                Severity::Error => RED_BOLD,
            };
            eprintln!("{color}{diagnostic}{RESET}");
        } else {
            eprintln!("{diagnostic}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_tracks_errors() {
        let mut sink = CollectingDiagnosticSink::new();
        assert!(sink.is_ok());
        sink.report(Diagnostic::warning("scanner", "looks odd", None));
        assert!(sink.is_ok());
        sink.report(Diagnostic::error("parser", "unexpected token", None));
        assert!(!sink.is_ok());
        assert_eq!(sink.diagnostics().len(), 2);
    }

    #[test]
    fn display_includes_mark() {
        let mark = Mark {
            index: 3,
            line: 1,
            column: 2,
        };
        let diagnostic = Diagnostic::error("parser", "boom", Some(mark));
        assert_eq!(
            diagnostic.to_string(),
            "parser: error: boom (line 1 column 2)"
        );
    }
}
