//! MathML reading and writing.
//!
//! Content MathML is the persistent form of an expression. The reader
//! accepts the subset permitted in SBML (plus elements contributed by
//! registered [`MathExtension`]s) and reports every violation to a
//! [`DiagnosticSink`]; the writer emits an indented `<math>` document that
//! the reader maps back to an equal tree.
//!
//! # Examples
//!
//! ```rust
//! use sbml_math::diagnostics::ErrorLog;
//! use sbml_math::infix::parse_l3_formula;
//! use sbml_math::mathml::{read_mathml, write_mathml};
//!
//! let node = parse_l3_formula("k * S / (Km + S)").unwrap();
//! let xml = write_mathml(&node);
//! let mut log = ErrorLog::new();
//! assert_eq!(read_mathml(&xml, &mut log), Some(node));
//! assert!(log.is_empty());
//! ```

mod elements;
mod extension;
mod reader;
mod stream;
mod writer;

pub use elements::{MATHML_NS, SBML_L3_NS};
pub use extension::{ExtensionRegistry, MathExtension};
pub use reader::MathMLReader;
pub use stream::{XmlStream, XmlToken, XmlTokenKind};
pub use writer::MathMLWriter;

use crate::ast::AstNode;
use crate::diagnostics::DiagnosticSink;

/// Options shared by the reader and writer.
///
/// `level` and `version` select the SBML MathML subset; Level 3 Version 2
/// adds `max`, `min`, `quotient`, `rem`, `implies` and `rateOf`.
#[derive(Debug, Clone)]
pub struct MathMLSettings {
    pub level: u32,
    pub version: u32,
    pub extensions: ExtensionRegistry,
}

impl Default for MathMLSettings {
    fn default() -> Self {
        Self {
            level: 3,
            version: 2,
            extensions: ExtensionRegistry::default(),
        }
    }
}

impl MathMLSettings {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level_version(mut self, level: u32, version: u32) -> Self {
        self.level = level;
        self.version = version;
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionRegistry) -> Self {
        self.extensions = extensions;
        self
    }
}

/// Read a `<math>` document with default settings.
///
/// Returns `None` when the document could not be turned into a tree; the
/// reasons are in `sink`. A tree may also be returned alongside reported
/// problems that did not prevent building it.
pub fn read_mathml(xml: &str, sink: &mut dyn DiagnosticSink) -> Option<AstNode> {
    read_mathml_with_settings(xml, &MathMLSettings::default(), sink)
}

pub fn read_mathml_with_settings(
    xml: &str,
    settings: &MathMLSettings,
    sink: &mut dyn DiagnosticSink,
) -> Option<AstNode> {
    MathMLReader::new(settings).read(xml, sink)
}

/// Write `node` as a `<math>` document with default settings.
pub fn write_mathml(node: &AstNode) -> String {
    write_mathml_with_settings(node, &MathMLSettings::default())
}

pub fn write_mathml_with_settings(node: &AstNode, settings: &MathMLSettings) -> String {
    MathMLWriter::new(settings).write(node)
}
