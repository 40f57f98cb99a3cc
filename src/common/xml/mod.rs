//! XML text helpers shared by the MathML reader and writer.

mod escape;

pub use escape::{escape_xml, line_column, unescape_xml};
