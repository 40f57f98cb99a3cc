//! Unified error types for sbml-math.
//!
//! This module provides the error type shared by the infix parsers, the
//! MathML codec and the AST mutation API.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
