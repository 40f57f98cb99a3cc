//! sbml-math - mathematical expressions for SBML models
//!
//! This library provides the expression layer of SBML: an abstract syntax
//! tree for kinetic laws, rules and constraints, two infix dialects for
//! writing it by hand, and the Content MathML encoding used in model files.
//!
//! # Features
//!
//! - **Expression trees**: [`AstNode`] with typed numbers, names, csymbols,
//!   operators, lambdas, piecewise and semantics annotations
//! - **Infix parsing**: the SBML Level 1 dialect and the richer Level 3
//!   dialect, with configurable handling of `log`, `%`, units and model names
//! - **Formatting**: canonical infix text that parses back to the same tree
//! - **MathML**: reader and writer with diagnostics and extension packages
//!
//! # Example - Parsing and formatting
//!
//! ```rust
//! use sbml_math::{AstType, parse_l3_formula, formula_to_l3_string};
//!
//! let node = parse_l3_formula("Vmax * S / (Km + S)").unwrap();
//! assert_eq!(node.ty(), AstType::Divide);
//! assert_eq!(formula_to_l3_string(&node), "Vmax * S / (Km + S)");
//! ```
//!
//! # Example - MathML with diagnostics
//!
//! ```rust
//! use sbml_math::diagnostics::{DiagnosticCode, ErrorLog};
//! use sbml_math::read_mathml;
//!
//! let mut log = ErrorLog::new();
//! let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
//!   <apply><divide/><cn> 1 </cn></apply>
//! </math>"#;
//! let node = read_mathml(xml, &mut log);
//! assert!(node.is_some());
//! assert!(log.contains(DiagnosticCode::OpsNeedCorrectNumberOfArgs));
//! ```

pub mod ast;
pub mod common;
pub mod diagnostics;
pub mod infix;
pub mod mathml;

pub use ast::{AstNode, AstType, CsymbolKind};
pub use common::{Error, Result};
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, ErrorLog, Severity};
pub use infix::{
    L3Parser, ParserSettings, formula_to_l3_string, formula_to_string, parse_formula,
    parse_l3_formula,
};
pub use mathml::{MathMLSettings, read_mathml, write_mathml};
