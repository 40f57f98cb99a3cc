//! MathML extension packages.
//!
//! SBML packages may add elements to the permitted MathML subset. A package
//! implements [`MathExtension`] and is registered in an
//! [`ExtensionRegistry`]; the reader offers every element it does not know
//! to the registered packages in registration order, and the writer offers
//! every extension node back to the package that created it.
//!
//! # Examples
//!
//! ```rust
//! use sbml_math::diagnostics::ErrorLog;
//! use sbml_math::mathml::{ExtensionRegistry, MathExtension, MathMLSettings, read_mathml_with_settings};
//! use std::sync::Arc;
//!
//! struct Arrays;
//!
//! impl MathExtension for Arrays {
//!     fn package_name(&self) -> &str {
//!         "arrays"
//!     }
//!
//!     fn defines_element(&self, element: &str) -> bool {
//!         element == "selector"
//!     }
//! }
//!
//! let settings = MathMLSettings::new()
//!     .with_extensions(ExtensionRegistry::new().with(Arc::new(Arrays)));
//! let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML">
//!   <apply><selector/><ci> a </ci><cn type="integer"> 0 </cn></apply>
//! </math>"#;
//! let mut log = ErrorLog::new();
//! let node = read_mathml_with_settings(xml, &settings, &mut log).unwrap();
//! assert_eq!(node.package_name(), Some("arrays"));
//! assert_eq!(node.num_children(), 2);
//! ```

use crate::ast::AstNode;
use std::fmt;
use std::sync::Arc;

/// A package contributing MathML elements.
pub trait MathExtension: Send + Sync {
    /// Package name recorded on the nodes it creates.
    fn package_name(&self) -> &str;

    /// Whether `element` (a local name) belongs to this package.
    fn defines_element(&self, element: &str) -> bool;

    /// Build the node for `element` from its already-read children.
    ///
    /// The default creates a generic extension node. An `Err` message is
    /// reported as malformed MathML.
    fn read_element(&self, element: &str, children: Vec<AstNode>) -> Result<AstNode, String> {
        Ok(AstNode::new_extension(self.package_name(), element, children))
    }

    /// Whether `count` arguments are acceptable for `element`.
    fn accepts_arity(&self, _element: &str, _count: usize) -> bool {
        true
    }

    /// Write a node of this package as a MathML fragment, or `None` for the
    /// generic `<apply><element/>...</apply>` form.
    fn write_element(&self, _node: &AstNode) -> Option<String> {
        None
    }

    /// Human-readable description of an element, for messages.
    fn describe_element(&self, element: &str) -> String {
        format!("{}:{}", self.package_name(), element)
    }
}

/// Ordered set of registered packages.
#[derive(Clone, Default)]
pub struct ExtensionRegistry {
    extensions: Vec<Arc<dyn MathExtension>>,
}

impl ExtensionRegistry {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package. Earlier registrations win when two packages
    /// define the same element.
    pub fn register(&mut self, extension: Arc<dyn MathExtension>) {
        let package = extension.package_name();
        if self.find_package(package).is_some() {
            tracing::warn!(package, "MathML extension package registered twice");
        }
        tracing::debug!(package, "MathML extension registered");
        self.extensions.push(extension);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, extension: Arc<dyn MathExtension>) -> Self {
        self.register(extension);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// First package defining `element`.
    pub fn find_element(&self, element: &str) -> Option<&dyn MathExtension> {
        self.extensions
            .iter()
            .find(|ext| ext.defines_element(element))
            .map(Arc::as_ref)
    }

    /// Package registered under `name`.
    pub fn find_package(&self, name: &str) -> Option<&dyn MathExtension> {
        self.extensions
            .iter()
            .find(|ext| ext.package_name() == name)
            .map(Arc::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn MathExtension> {
        self.extensions.iter().map(Arc::as_ref)
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.extensions.iter().map(|ext| ext.package_name()))
            .finish()
    }
}
