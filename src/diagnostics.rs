//! Diagnostics reported while parsing formulas and reading MathML.
//!
//! The reader never aborts the host: every problem is classified with a
//! [`DiagnosticCode`], given a [`Severity`] and pushed into a
//! [`DiagnosticSink`]. [`ErrorLog`] is the in-memory sink used by default;
//! hosts with their own error log implement the trait instead.

use std::fmt;

/// Stable classification of a math diagnostic.
///
/// The numeric values follow the SBML validation numbering where one
/// exists. They are opaque to this crate: nothing branches on them apart
/// from tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DiagnosticCode {
    /// Unclassified internal failure
    InternalError = 1,
    /// Invalid parser or formatter configuration
    InvalidConfiguration = 2,
    /// Malformed infix formula
    FormulaSyntaxError = 3,
    /// XML that the tokenizer rejected
    NotSchemaConformant = 10102,
    /// Element that is not part of the permitted MathML subset
    InvalidMathElement = 10201,
    /// Permitted MathML element used where it is not allowed
    DisallowedMathMLSymbol = 10202,
    /// `encoding` attribute outside csymbol/semantics/annotation
    DisallowedMathMLEncodingUse = 10203,
    /// `definitionURL` attribute outside ci/csymbol/semantics
    DisallowedDefinitionURLUse = 10204,
    /// csymbol with an unknown definitionURL
    BadCsymbolDefinitionURLValue = 10205,
    /// `type` attribute outside cn
    DisallowedMathTypeAttributeUse = 10206,
    /// `type` attribute with an unknown value
    DisallowedMathTypeAttributeValue = 10207,
    /// Operator applied to the wrong number of arguments
    OpsNeedCorrectNumberOfArgs = 10218,
    /// `sbml:units` attribute outside cn
    DisallowedMathUnitsUse = 10220,
    /// Numeric content that cannot be parsed
    BadMathMLNumber = 10221,
    /// Generic malformed MathML structure
    BadMathML = 10223,
    /// No `<math>` content found
    MissingMathElement = 10224,
}

impl DiagnosticCode {
    /// Numeric value of the code.
    #[inline]
    pub fn value(self) -> u32 {
        self as u32
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// A single reported problem.
///
/// `line` and `column` are 1-based; `0` means the position is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl Diagnostic {
    /// Create a diagnostic without position information.
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            line: 0,
            column: 0,
        }
    }

    /// Attach a position.
    #[inline]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line > 0 {
            write!(
                f,
                "{} {} (line {}, column {}): {}",
                self.severity, self.code, self.line, self.column, self.message
            )
        } else {
            write!(f, "{} {}: {}", self.severity, self.code, self.message)
        }
    }
}

/// Receiver of diagnostics. Owned by the caller, borrowed by readers.
pub trait DiagnosticSink {
    /// Record one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

/// In-memory diagnostic log.
#[derive(Debug, Default, Clone)]
pub struct ErrorLog {
    entries: Vec<Diagnostic>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded diagnostics.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All diagnostics in report order.
    #[inline]
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// Diagnostic at `index`.
    pub fn get(&self, index: usize) -> Option<&Diagnostic> {
        self.entries.get(index)
    }

    /// Whether any diagnostic at or above `Severity::Error` was recorded.
    pub fn has_errors(&self) -> bool {
        self.entries.iter().any(|d| d.severity >= Severity::Error)
    }

    /// Whether a diagnostic with `code` was recorded.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.entries.iter().any(|d| d.code == code)
    }

    /// Remove all diagnostics.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl DiagnosticSink for ErrorLog {
    fn report(&mut self, diagnostic: Diagnostic) {
        tracing::debug!(
            code = diagnostic.code.value(),
            line = diagnostic.line,
            column = diagnostic.column,
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_tracks_severity_and_codes() {
        let mut log = ErrorLog::new();
        assert!(log.is_empty());
        log.report(Diagnostic::new(
            DiagnosticCode::DisallowedMathMLEncodingUse,
            Severity::Warning,
            "encoding on cn",
        ));
        assert!(!log.has_errors());
        log.report(
            Diagnostic::new(DiagnosticCode::BadMathMLNumber, Severity::Error, "bad cn").at(3, 5),
        );
        assert!(log.has_errors());
        assert!(log.contains(DiagnosticCode::BadMathMLNumber));
        assert_eq!(log.len(), 2);
        assert_eq!(
            log.get(1).map(|d| d.to_string()),
            Some("error 10221 (line 3, column 5): bad cn".to_string())
        );
        log.clear();
        assert!(log.is_empty());
    }
}
