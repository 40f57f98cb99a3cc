use super::function::{CsymbolKind, FunctionNode, FunctionShape};
use super::node::{AstNode, NodeValue};
use super::number::LeafValue;
use super::types::AstType;

/// Convenience constructors for building trees in code
impl AstNode {
    /// Create an integer literal
    pub fn new_integer(value: i64) -> Self {
        Self::from_parts(AstType::Integer, NodeValue::Leaf(LeafValue::Integer(value)))
    }

    /// Create a real literal
    pub fn new_real(value: f64) -> Self {
        Self::from_parts(AstType::Real, NodeValue::Leaf(LeafValue::Real(value)))
    }

    /// Create an e-notation literal
    pub fn new_real_with_exponent(mantissa: f64, exponent: i64) -> Self {
        Self::from_parts(
            AstType::RealE,
            NodeValue::Leaf(LeafValue::RealE { mantissa, exponent }),
        )
    }

    /// Create a rational literal
    pub fn new_rational(numerator: i64, denominator: i64) -> Self {
        Self::from_parts(
            AstType::Rational,
            NodeValue::Leaf(LeafValue::Rational {
                numerator,
                denominator,
            }),
        )
    }

    /// Create a name reference
    pub fn new_name(name: impl Into<String>) -> Self {
        Self::from_parts(AstType::Name, NodeValue::Leaf(LeafValue::Name(name.into())))
    }

    /// Create a csymbol node with its default name
    pub fn new_csymbol(kind: CsymbolKind) -> Self {
        Self::new(kind.ast_type())
    }

    /// Create a user-function call
    pub fn new_function(name: impl Into<String>, args: Vec<AstNode>) -> Self {
        Self::with_shape(
            AstType::Function,
            FunctionShape::UserFunction { name: name.into() },
            args,
        )
    }

    /// Create a node of type `ty` with one child
    pub fn new_unary(ty: AstType, child: AstNode) -> Self {
        Self::new_nary(ty, vec![child])
    }

    /// Create a node of type `ty` with two children
    pub fn new_binary(ty: AstType, left: AstNode, right: AstNode) -> Self {
        Self::new_nary(ty, vec![left, right])
    }

    /// Create a node of type `ty` with the given children.
    ///
    /// Leaf types ignore the children.
    pub fn new_nary(ty: AstType, children: Vec<AstNode>) -> Self {
        match FunctionShape::for_type(ty, None) {
            Some(shape) => Self::with_shape(ty, shape, children),
            None => Self::new(ty),
        }
    }

    /// Create a lambda from its bound variables and body
    pub fn new_lambda(bvars: Vec<AstNode>, body: AstNode) -> Self {
        let mut children = bvars;
        children.push(body);
        Self::with_shape(AstType::Lambda, FunctionShape::Lambda, children)
    }

    /// Create a piecewise from `(value, condition)` pairs and an optional
    /// otherwise value
    pub fn new_piecewise(pieces: Vec<(AstNode, AstNode)>, otherwise: Option<AstNode>) -> Self {
        let mut children = Vec::with_capacity(pieces.len() * 2 + 1);
        for (value, condition) in pieces {
            children.push(value);
            children.push(condition);
        }
        children.extend(otherwise);
        Self::with_shape(AstType::Piecewise, FunctionShape::Piecewise, children)
    }

    /// Create a node contributed by a MathML extension package
    pub fn new_extension(
        package: impl Into<String>,
        element: impl Into<String>,
        children: Vec<AstNode>,
    ) -> Self {
        Self::with_shape(
            AstType::OriginatesInPackage,
            FunctionShape::Extension {
                package: package.into(),
                element: element.into(),
            },
            children,
        )
    }

    pub(crate) fn with_shape(ty: AstType, shape: FunctionShape, mut children: Vec<AstNode>) -> Self {
        for child in &mut children {
            child.is_child = true;
        }
        Self::from_parts(
            ty,
            NodeValue::Function(FunctionNode::with_children(shape, children)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_produce_expected_types() {
        assert_eq!(AstNode::new_rational(1, 3).denominator(), 3);
        assert_eq!(AstNode::new_real_with_exponent(2.0, 3).real(), 2000.0);
        assert_eq!(
            AstNode::new_csymbol(CsymbolKind::Avogadro).name(),
            Some("avogadro")
        );

        let call = AstNode::new_function("f", vec![AstNode::new_integer(1)]);
        assert!(call.is_user_function());
        assert_eq!(call.name(), Some("f"));
        assert!(call.child(0).is_some_and(AstNode::is_child));

        let leaf = AstNode::new_nary(AstType::Integer, vec![AstNode::new_integer(1)]);
        assert_eq!(leaf.num_children(), 0);
    }

    #[test]
    fn extension_node() {
        let node = AstNode::new_extension("arrays", "selector", vec![AstNode::new_name("a")]);
        assert!(node.is_extension());
        assert_eq!(node.package_name(), Some("arrays"));
        assert_eq!(node.name(), Some("selector"));
    }
}
