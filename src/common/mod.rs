//! Types and utilities shared by the expression, infix and MathML modules.

pub mod error;
pub mod xml;

pub use error::{Error, Result};
