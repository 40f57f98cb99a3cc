// Operator/function variant core

use super::node::AstNode;
use super::types::{AstType, ShapeClass};

/// Namespace of the SBML-defined csymbol definition URLs.
pub const SBML_SYMBOLS_URL: &str = "http://www.sbml.org/sbml/symbols/";

/// Externally defined symbols referenced through `<csymbol>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsymbolKind {
    Time,
    Avogadro,
    Delay,
    RateOf,
}

impl CsymbolKind {
    /// The `definitionURL` identifying this symbol.
    pub fn definition_url(self) -> &'static str {
        match self {
            CsymbolKind::Time => "http://www.sbml.org/sbml/symbols/time",
            CsymbolKind::Avogadro => "http://www.sbml.org/sbml/symbols/avogadro",
            CsymbolKind::Delay => "http://www.sbml.org/sbml/symbols/delay",
            CsymbolKind::RateOf => "http://www.sbml.org/sbml/symbols/rateOf",
        }
    }

    /// Identify a symbol from its `definitionURL`.
    pub fn from_url(url: &str) -> Option<Self> {
        match url.trim().strip_prefix(SBML_SYMBOLS_URL)? {
            "time" => Some(CsymbolKind::Time),
            "avogadro" => Some(CsymbolKind::Avogadro),
            "delay" => Some(CsymbolKind::Delay),
            "rateOf" => Some(CsymbolKind::RateOf),
            _ => None,
        }
    }

    pub fn ast_type(self) -> AstType {
        match self {
            CsymbolKind::Time => AstType::NameTime,
            CsymbolKind::Avogadro => AstType::NameAvogadro,
            CsymbolKind::Delay => AstType::Delay,
            CsymbolKind::RateOf => AstType::RateOf,
        }
    }

    pub fn from_type(ty: AstType) -> Option<Self> {
        match ty {
            AstType::NameTime => Some(CsymbolKind::Time),
            AstType::NameAvogadro => Some(CsymbolKind::Avogadro),
            AstType::Delay => Some(CsymbolKind::Delay),
            AstType::RateOf => Some(CsymbolKind::RateOf),
            _ => None,
        }
    }

    /// Name used when none was given in the source.
    pub fn default_name(self) -> &'static str {
        match self {
            CsymbolKind::Time => "time",
            CsymbolKind::Avogadro => "avogadro",
            CsymbolKind::Delay => "delay",
            CsymbolKind::RateOf => "rateOf",
        }
    }

    /// Whether the symbol is applied to arguments (`delay`, `rateOf`).
    #[inline]
    pub fn is_function(self) -> bool {
        matches!(self, CsymbolKind::Delay | CsymbolKind::RateOf)
    }
}

/// Closed set of function-shaped node variants.
///
/// Lambda bound variables and piecewise pieces are stored flat in the
/// owning [`FunctionNode`]'s children:
///
/// - lambda: `bvar_1 .. bvar_n, body`
/// - piecewise: `value_1, condition_1, .., value_n, condition_n [, otherwise]`
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionShape {
    Unary,
    Binary,
    Nary,
    UserFunction { name: String },
    Lambda,
    Piecewise,
    CSymbol { kind: CsymbolKind, name: String },
    Qualifier,
    Semantics { annotations: Vec<String> },
    Extension { package: String, element: String },
}

impl FunctionShape {
    /// Shape for `ty`, reusing `name` for name-carrying shapes.
    ///
    /// Returns `None` for leaf types.
    pub fn for_type(ty: AstType, name: Option<String>) -> Option<Self> {
        let shape = match ty.shape_class() {
            ShapeClass::Leaf => return None,
            ShapeClass::Unary => FunctionShape::Unary,
            ShapeClass::Binary => FunctionShape::Binary,
            ShapeClass::Nary => FunctionShape::Nary,
            ShapeClass::UserFunction => FunctionShape::UserFunction {
                name: name.unwrap_or_default(),
            },
            ShapeClass::Lambda => FunctionShape::Lambda,
            ShapeClass::Piecewise => FunctionShape::Piecewise,
            ShapeClass::CSymbol => {
                let kind = CsymbolKind::from_type(ty)?;
                FunctionShape::CSymbol {
                    kind,
                    name: name.unwrap_or_else(|| kind.default_name().to_string()),
                }
            },
            ShapeClass::Qualifier => FunctionShape::Qualifier,
            ShapeClass::Semantics => FunctionShape::Semantics {
                annotations: Vec::new(),
            },
            ShapeClass::Extension => FunctionShape::Extension {
                package: String::new(),
                element: name.unwrap_or_default(),
            },
        };
        Some(shape)
    }

    /// Name carried by the shape, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            FunctionShape::UserFunction { name } | FunctionShape::CSymbol { name, .. } => {
                Some(name)
            },
            FunctionShape::Extension { element, .. } => Some(element),
            _ => None,
        }
    }
}

/// Function node storage: a shape and its ordered, owned children.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionNode {
    pub(crate) shape: FunctionShape,
    pub(crate) children: Vec<AstNode>,
}

impl FunctionNode {
    pub fn new(shape: FunctionShape) -> Self {
        Self {
            shape,
            children: Vec::new(),
        }
    }

    pub fn with_children(shape: FunctionShape, children: Vec<AstNode>) -> Self {
        Self { shape, children }
    }

    #[inline]
    pub fn shape(&self) -> &FunctionShape {
        &self.shape
    }

    #[inline]
    pub fn children(&self) -> &[AstNode] {
        &self.children
    }
}
