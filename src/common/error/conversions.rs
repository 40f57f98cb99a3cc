//! Error conversion implementations.
//!
//! This module contains From trait implementations to convert from backend
//! error types to the unified Error type, and from Error into diagnostics.

use super::types::Error;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Severity};

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(format!("UTF-8 decoding error: {}", err))
    }
}

impl From<&Error> for Diagnostic {
    fn from(err: &Error) -> Self {
        let (line, column) = err.position().unwrap_or((0, 0));
        let code = match err {
            Error::Syntax { .. } => DiagnosticCode::FormulaSyntaxError,
            Error::Xml { .. } | Error::Encoding(_) => DiagnosticCode::NotSchemaConformant,
            Error::InvalidOperation(_) | Error::IndexOutOfRange { .. } => {
                DiagnosticCode::InternalError
            },
            Error::Config(_) => DiagnosticCode::InvalidConfiguration,
        };
        let message = match err {
            Error::Syntax { message, .. } | Error::Xml { message, .. } => message.clone(),
            other => other.to_string(),
        };
        Diagnostic::new(code, Severity::Error, message).at(line, column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_becomes_positioned_diagnostic() {
        let err = Error::syntax("unexpected ')'", 1, 7);
        let diag = Diagnostic::from(&err);
        assert_eq!(diag.code, DiagnosticCode::FormulaSyntaxError);
        assert_eq!(diag.line, 1);
        assert_eq!(diag.column, 7);
        assert_eq!(diag.message, "unexpected ')'");
    }

    #[test]
    fn config_error_has_no_position() {
        let diag = Diagnostic::from(&Error::Config("bad".to_string()));
        assert_eq!(diag.code, DiagnosticCode::InvalidConfiguration);
        assert_eq!((diag.line, diag.column), (0, 0));
    }
}
