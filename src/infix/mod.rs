//! Infix text formulas.
//!
//! Two dialects are supported. Level 1 text (`parse_formula` /
//! `formula_to_string`) knows only arithmetic and function calls. Level 3
//! text (`parse_l3_formula` / `formula_to_l3_string`) adds relational and
//! logical operators, `%`, units on numbers, rationals and the csymbols.
//!
//! # Examples
//!
//! ```rust
//! use sbml_math::infix::{formula_to_l3_string, parse_l3_formula};
//!
//! let node = parse_l3_formula("a - (b - c)").unwrap();
//! assert_eq!(formula_to_l3_string(&node), "a - (b - c)");
//! ```

mod builtins;
mod formatter;
mod l1;
mod l3;
mod lexer;
mod settings;

pub use formatter::{L3Formatter, format_l1};
pub use l1::parse_l1;
pub use l3::L3Parser;
pub use settings::{FormatterSettings, LogParsing, ModelNamespace, ModuloMode, ParserSettings};

pub(crate) use formatter::{format_integer, format_real};

use crate::ast::AstNode;
use crate::common::Result;
use crate::diagnostics::{Diagnostic, DiagnosticSink};

/// Parse a Level 1 formula.
#[inline]
pub fn parse_formula(text: &str) -> Result<AstNode> {
    parse_l1(text)
}

/// Parse a Level 3 formula with default settings.
#[inline]
pub fn parse_l3_formula(text: &str) -> Result<AstNode> {
    L3Parser::default().parse(text)
}

/// Parse a Level 3 formula.
pub fn parse_l3_formula_with_settings(text: &str, settings: &ParserSettings) -> Result<AstNode> {
    L3Parser::new(settings.clone()).parse(text)
}

/// Parse a Level 3 formula, reporting a failure to `sink` instead of
/// returning it.
pub fn parse_l3_formula_logged(
    text: &str,
    settings: &ParserSettings,
    sink: &mut dyn DiagnosticSink,
) -> Option<AstNode> {
    match parse_l3_formula_with_settings(text, settings) {
        Ok(node) => Some(node),
        Err(err) => {
            tracing::debug!(formula = text, error = %err, "formula rejected");
            sink.report(Diagnostic::from(&err));
            None
        },
    }
}

/// Format a tree as Level 1 text.
#[inline]
pub fn formula_to_string(node: &AstNode) -> String {
    format_l1(node)
}

/// Format a tree as Level 3 text with default settings.
#[inline]
pub fn formula_to_l3_string(node: &AstNode) -> String {
    L3Formatter::default().format(node)
}

/// Format a tree as Level 3 text.
#[inline]
pub fn formula_to_l3_string_with_settings(node: &AstNode, settings: &FormatterSettings) -> String {
    L3Formatter::new(*settings).format(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AstType;
    use crate::diagnostics::{DiagnosticCode, ErrorLog};

    #[test]
    fn canonical_layouts_survive_a_round_trip() {
        for text in [
            "1 + 2 * 3",
            "(1 - 2) * 3",
            "a - (b - c)",
            "a - b - c",
            "foo(1, bar, 2^-3)",
            "x % y",
        ] {
            let node = parse_l3_formula(text).unwrap();
            assert_eq!(formula_to_l3_string(&node), text);
        }
    }

    #[test]
    fn display_and_from_str_use_level3() {
        let node: AstNode = "a && (b || c)".parse().unwrap();
        assert_eq!(node.ty(), AstType::And);
        assert_eq!(node.to_string(), "a && (b || c)");
    }

    #[test]
    fn level1_and_level3_disagree_on_log() {
        let l1 = parse_formula("log(x)").unwrap();
        let l3 = parse_l3_formula("log(x)").unwrap();
        assert_eq!(l1.ty(), AstType::Ln);
        assert!(l3.is_log10());
        assert_eq!(formula_to_string(&l1), "log(x)");
        assert_eq!(formula_to_l3_string(&l1), "ln(x)");
        assert_eq!(formula_to_string(&l3), "log10(x)");
    }

    #[test]
    fn settings_flow_through() {
        let settings = ParserSettings::new()
            .with_collapse_minus(true)
            .with_parse_units(false);
        assert!(parse_l3_formula_with_settings("2 s", &settings).is_err());
        let node = parse_l3_formula_with_settings("--x", &settings).unwrap();
        assert_eq!(node.name(), Some("x"));

        let mut lit = AstNode::new_real(0.5);
        lit.set_units("second").unwrap();
        let shown = formula_to_l3_string(&lit);
        let hidden =
            formula_to_l3_string_with_settings(&lit, &FormatterSettings::from(&settings));
        assert_eq!(shown, "0.5 second");
        assert_eq!(hidden, "0.5");
    }

    #[test]
    fn logged_parse_reports_to_the_sink() {
        let mut log = ErrorLog::new();
        let settings = ParserSettings::default();
        assert!(parse_l3_formula_logged("1 +", &settings, &mut log).is_none());
        assert_eq!(log.len(), 1);
        let entry = log.get(0).unwrap();
        assert_eq!(entry.code, DiagnosticCode::FormulaSyntaxError);
        assert_eq!((entry.line, entry.column), (1, 4));

        assert!(parse_l3_formula_logged("1 + 2", &settings, &mut log).is_some());
        assert_eq!(log.len(), 1);
    }
}
