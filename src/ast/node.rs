// AST node facade

use super::function::{CsymbolKind, FunctionNode, FunctionShape};
use super::number::LeafValue;
use super::types::{AstType, ShapeClass};
use crate::common::{Error, Result};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque user data attached to a node and shared (not copied) by clones.
pub type UserData = Arc<dyn Any + Send + Sync>;

/// Attributes shared by every node variant.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeAttributes {
    pub(crate) id: Option<String>,
    pub(crate) class: Option<String>,
    pub(crate) style: Option<String>,
    pub(crate) units: Option<String>,
    pub(crate) definition_url: Option<String>,
    pub(crate) user_data: Option<UserData>,
}

// User data is opaque and does not take part in structural equality.
impl PartialEq for NodeAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.class == other.class
            && self.style == other.style
            && self.units == other.units
            && self.definition_url == other.definition_url
    }
}

/// Active representation of a node.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeValue {
    Leaf(LeafValue),
    Function(FunctionNode),
}

/// A node of a mathematical expression tree.
///
/// Every node holds exactly one representation: a leaf value (number,
/// name, constant) or a function node with owned children. The
/// [`AstType`] selects which, and the whole operation surface is available
/// on every node regardless of representation:
///
/// - child operations on leaves are no-ops returning `None`, `0` or an
///   error;
/// - value accessors on the wrong representation return sentinels (`0`,
///   `NaN`, `None`), so callers check the type first.
///
/// A node wrapped in `<semantics>` (see
/// [`add_semantics_annotation`](Self::add_semantics_annotation)) forwards
/// every operation to the node it wraps.
///
/// Cloning is a deep copy.
#[derive(Debug, Clone)]
pub struct AstNode {
    pub(crate) ty: AstType,
    pub(crate) value: NodeValue,
    pub(crate) attrs: NodeAttributes,
    pub(crate) is_child: bool,
}

impl Default for AstNode {
    fn default() -> Self {
        Self::new(AstType::Unknown)
    }
}

// Structural equality: type, value, attributes and children. The child
// flag and user data are ignored.
impl PartialEq for AstNode {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.value == other.value && self.attrs == other.attrs
    }
}

impl AstNode {
    /// Create a node of the given type with a zero value and no children.
    pub fn new(ty: AstType) -> Self {
        let value = match FunctionShape::for_type(ty, None) {
            Some(shape) => NodeValue::Function(FunctionNode::new(shape)),
            None => NodeValue::Leaf(LeafValue::default_for(ty)),
        };
        Self {
            ty,
            value,
            attrs: NodeAttributes::default(),
            is_child: false,
        }
    }

    pub(crate) fn from_parts(ty: AstType, value: NodeValue) -> Self {
        Self {
            ty,
            value,
            attrs: NodeAttributes::default(),
            is_child: false,
        }
    }

    /// Independent recursive copy. The copy is not flagged as a child.
    pub fn deep_copy(&self) -> AstNode {
        let mut copy = self.clone();
        copy.is_child = false;
        copy
    }

    // ---------------------------------------------------------------
    // semantics forwarding
    // ---------------------------------------------------------------

    /// Whether this node itself is a `<semantics>` wrapper.
    pub fn is_semantics(&self) -> bool {
        matches!(
            &self.value,
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::Semantics { .. },
                ..
            })
        )
    }

    /// Node that operations act on: the wrapped node for semantics
    /// wrappers, `self` otherwise.
    pub(crate) fn target(&self) -> &AstNode {
        match &self.value {
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::Semantics { .. },
                children,
            }) if !children.is_empty() => children[0].target(),
            _ => self,
        }
    }

    pub(crate) fn target_mut(&mut self) -> &mut AstNode {
        let wraps = matches!(
            &self.value,
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::Semantics { .. },
                children,
            }) if !children.is_empty()
        );
        if wraps {
            match &mut self.value {
                NodeValue::Function(f) => f.children[0].target_mut(),
                _ => unreachable!(),
            }
        } else {
            self
        }
    }

    // ---------------------------------------------------------------
    // type
    // ---------------------------------------------------------------

    /// Type of the node (of the wrapped node for semantics wrappers).
    #[inline]
    pub fn ty(&self) -> AstType {
        self.target().ty
    }

    /// Switch the node to `ty`.
    ///
    /// Leaf to leaf keeps the value where the new type can hold it.
    /// Function to function keeps the children. Any other transition
    /// discards the previous value and children; a name carried by the old
    /// representation is kept when the new one can hold a name.
    pub fn set_type(&mut self, ty: AstType) {
        self.target_mut().set_own_type(ty);
    }

    fn set_own_type(&mut self, ty: AstType) {
        if ty == self.ty {
            return;
        }
        let old = std::mem::replace(&mut self.value, NodeValue::Leaf(LeafValue::Constant));
        let name = match &old {
            NodeValue::Leaf(LeafValue::Name(name)) => Some(name.clone()),
            NodeValue::Function(f) => f.shape.name().map(str::to_string),
            NodeValue::Leaf(_) => None,
        };
        self.value = match FunctionShape::for_type(ty, name.clone()) {
            None => match old {
                NodeValue::Leaf(leaf) => NodeValue::Leaf(leaf.convert(ty)),
                NodeValue::Function(_) => match (ty, name) {
                    (AstType::Name, Some(name)) => NodeValue::Leaf(LeafValue::Name(name)),
                    _ => NodeValue::Leaf(LeafValue::default_for(ty)),
                },
            },
            Some(shape) => match old {
                NodeValue::Function(f) => {
                    NodeValue::Function(FunctionNode::with_children(shape, f.children))
                },
                NodeValue::Leaf(_) => NodeValue::Function(FunctionNode::new(shape)),
            },
        };
        self.ty = ty;
    }

    // ---------------------------------------------------------------
    // type queries
    // ---------------------------------------------------------------

    #[inline]
    pub fn is_unknown(&self) -> bool {
        self.ty() == AstType::Unknown
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.target().value, NodeValue::Leaf(_))
    }

    #[inline]
    pub fn is_number(&self) -> bool {
        self.ty().is_number()
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        self.ty() == AstType::Integer
    }

    /// Real, e-notation or rational literal.
    #[inline]
    pub fn is_real(&self) -> bool {
        self.ty().is_real()
    }

    #[inline]
    pub fn is_rational(&self) -> bool {
        self.ty() == AstType::Rational
    }

    /// Plain name, time or avogadro.
    #[inline]
    pub fn is_name(&self) -> bool {
        self.ty().is_name()
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.ty().is_constant()
    }

    #[inline]
    pub fn is_function(&self) -> bool {
        self.ty().is_function()
    }

    #[inline]
    pub fn is_operator(&self) -> bool {
        self.ty().is_operator()
    }

    #[inline]
    pub fn is_relational(&self) -> bool {
        self.ty().is_relational()
    }

    #[inline]
    pub fn is_logical(&self) -> bool {
        self.ty().is_logical()
    }

    #[inline]
    pub fn is_lambda(&self) -> bool {
        self.ty() == AstType::Lambda
    }

    #[inline]
    pub fn is_piecewise(&self) -> bool {
        self.ty() == AstType::Piecewise
    }

    #[inline]
    pub fn is_user_function(&self) -> bool {
        self.ty() == AstType::Function
    }

    #[inline]
    pub fn is_csymbol(&self) -> bool {
        self.ty().is_csymbol()
    }

    #[inline]
    pub fn is_qualifier(&self) -> bool {
        self.ty().is_qualifier()
    }

    #[inline]
    pub fn is_extension(&self) -> bool {
        self.ty() == AstType::OriginatesInPackage
    }

    /// Minus with a single operand.
    pub fn is_unary_minus(&self) -> bool {
        self.ty() == AstType::Minus && self.num_children() == 1
    }

    /// Plus with a single operand.
    pub fn is_unary_plus(&self) -> bool {
        self.ty() == AstType::Plus && self.num_children() == 1
    }

    /// Real literal holding NaN.
    pub fn is_nan(&self) -> bool {
        self.ty() == AstType::Real && self.real().is_nan()
    }

    /// Real literal holding positive infinity.
    pub fn is_infinity(&self) -> bool {
        self.ty() == AstType::Real && self.real() == f64::INFINITY
    }

    /// Real literal holding negative infinity, or unary minus applied to
    /// positive infinity.
    pub fn is_neg_infinity(&self) -> bool {
        match self.ty() {
            AstType::Real => self.real() == f64::NEG_INFINITY,
            AstType::Minus => {
                self.num_children() == 1 && self.child(0).is_some_and(AstNode::is_infinity)
            },
            _ => false,
        }
    }

    /// Square root: a root without degree or with degree 2.
    pub fn is_sqrt(&self) -> bool {
        if self.ty() != AstType::Root {
            return false;
        }
        match self.num_children() {
            1 => true,
            2 => self
                .child(0)
                .is_some_and(|d| d.is_integer() && d.integer() == 2),
            _ => false,
        }
    }

    /// Base-10 logarithm: a log without base or with base 10.
    pub fn is_log10(&self) -> bool {
        if self.ty() != AstType::Log {
            return false;
        }
        match self.num_children() {
            1 => true,
            2 => self
                .child(0)
                .is_some_and(|b| b.is_integer() && b.integer() == 10),
            _ => false,
        }
    }

    // ---------------------------------------------------------------
    // leaf values
    // ---------------------------------------------------------------

    pub(crate) fn leaf(&self) -> Option<&LeafValue> {
        match &self.target().value {
            NodeValue::Leaf(leaf) => Some(leaf),
            NodeValue::Function(_) => None,
        }
    }

    pub(crate) fn leaf_mut(&mut self) -> Option<&mut LeafValue> {
        match &mut self.target_mut().value {
            NodeValue::Leaf(leaf) => Some(leaf),
            NodeValue::Function(_) => None,
        }
    }

    pub(crate) fn function(&self) -> Option<&FunctionNode> {
        match &self.target().value {
            NodeValue::Function(f) => Some(f),
            NodeValue::Leaf(_) => None,
        }
    }

    pub(crate) fn function_mut(&mut self) -> Option<&mut FunctionNode> {
        match &mut self.target_mut().value {
            NodeValue::Function(f) => Some(f),
            NodeValue::Leaf(_) => None,
        }
    }

    fn set_leaf(&mut self, ty: AstType, value: LeafValue) {
        let target = self.target_mut();
        target.ty = ty;
        target.value = NodeValue::Leaf(value);
    }

    /// Make this node an integer literal.
    pub fn set_integer(&mut self, value: i64) {
        self.set_leaf(AstType::Integer, LeafValue::Integer(value));
    }

    /// Make this node a real literal.
    pub fn set_real(&mut self, value: f64) {
        self.set_leaf(AstType::Real, LeafValue::Real(value));
    }

    /// Make this node an e-notation literal `mantissa * 10^exponent`.
    pub fn set_real_with_exponent(&mut self, mantissa: f64, exponent: i64) {
        self.set_leaf(AstType::RealE, LeafValue::RealE { mantissa, exponent });
    }

    /// Make this node a rational literal.
    pub fn set_rational(&mut self, numerator: i64, denominator: i64) {
        self.set_leaf(
            AstType::Rational,
            LeafValue::Rational {
                numerator,
                denominator,
            },
        );
    }

    /// Make this node a constant (`ConstantPi`, `ConstantE`, `ConstantTrue`
    /// or `ConstantFalse`). Other types are ignored and return false.
    pub fn set_constant(&mut self, ty: AstType) -> bool {
        if !matches!(
            ty,
            AstType::ConstantE | AstType::ConstantPi | AstType::ConstantTrue | AstType::ConstantFalse
        ) {
            return false;
        }
        self.set_leaf(ty, LeafValue::Constant);
        true
    }

    /// Set the name of the node.
    ///
    /// Names, csymbols and user functions keep their type. Built-in
    /// function and operator nodes become user-function calls keeping
    /// their children. Any other node becomes a plain name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        let target = self.target_mut();
        match &mut target.value {
            NodeValue::Leaf(LeafValue::Name(current)) => *current = name,
            NodeValue::Leaf(_) => {
                target.ty = AstType::Name;
                target.value = NodeValue::Leaf(LeafValue::Name(name));
            },
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::UserFunction { name: current },
                ..
            })
            | NodeValue::Function(FunctionNode {
                shape: FunctionShape::CSymbol { name: current, .. },
                ..
            })
            | NodeValue::Function(FunctionNode {
                shape: FunctionShape::Extension { element: current, .. },
                ..
            }) => *current = name,
            NodeValue::Function(f) => {
                f.shape = FunctionShape::UserFunction { name };
                target.ty = AstType::Function;
            },
        }
    }

    /// Integer value; `0` for non-integers.
    pub fn integer(&self) -> i64 {
        match self.leaf() {
            Some(LeafValue::Integer(v)) => *v,
            _ => 0,
        }
    }

    /// Numeric value of any number literal or of the constants π and e;
    /// `NaN` otherwise.
    pub fn real(&self) -> f64 {
        match self.ty() {
            AstType::ConstantPi => std::f64::consts::PI,
            AstType::ConstantE => std::f64::consts::E,
            _ => self.leaf().map_or(f64::NAN, LeafValue::as_f64),
        }
    }

    /// Numerator of a rational (value of an integer); `0` otherwise.
    pub fn numerator(&self) -> i64 {
        match self.leaf() {
            Some(LeafValue::Rational { numerator, .. }) => *numerator,
            Some(LeafValue::Integer(v)) => *v,
            _ => 0,
        }
    }

    /// Denominator of a rational; `1` otherwise.
    pub fn denominator(&self) -> i64 {
        match self.leaf() {
            Some(LeafValue::Rational { denominator, .. }) => *denominator,
            _ => 1,
        }
    }

    /// Mantissa of an e-notation literal (value of a real); `0.0` otherwise.
    pub fn mantissa(&self) -> f64 {
        match self.leaf() {
            Some(LeafValue::RealE { mantissa, .. }) => *mantissa,
            Some(LeafValue::Real(v)) => *v,
            _ => 0.0,
        }
    }

    /// Exponent of an e-notation literal; `0` otherwise.
    pub fn exponent(&self) -> i64 {
        match self.leaf() {
            Some(LeafValue::RealE { exponent, .. }) => *exponent,
            _ => 0,
        }
    }

    /// Name of names, csymbols, user functions and extension elements, or
    /// the canonical spelling of a constant; `None` otherwise.
    pub fn name(&self) -> Option<&str> {
        let target = self.target();
        match &target.value {
            NodeValue::Leaf(LeafValue::Name(name)) => Some(name),
            NodeValue::Leaf(LeafValue::Constant) => target.ty.mathml_name(),
            NodeValue::Leaf(_) => None,
            NodeValue::Function(f) => f.shape.name(),
        }
    }

    /// Which csymbol the node refers to, if any.
    pub fn csymbol_kind(&self) -> Option<CsymbolKind> {
        match self.function()?.shape {
            FunctionShape::CSymbol { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Package of an extension node.
    pub fn package_name(&self) -> Option<&str> {
        match &self.function()?.shape {
            FunctionShape::Extension { package, .. } => Some(package),
            _ => None,
        }
    }

    /// Shape of a function node.
    pub fn shape(&self) -> Option<&FunctionShape> {
        self.function().map(FunctionNode::shape)
    }

    // ---------------------------------------------------------------
    // attributes
    // ---------------------------------------------------------------

    pub fn id(&self) -> Option<&str> {
        self.target().attrs.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.target_mut().attrs.id = Some(id.into());
    }

    pub fn unset_id(&mut self) {
        self.target_mut().attrs.id = None;
    }

    pub fn class(&self) -> Option<&str> {
        self.target().attrs.class.as_deref()
    }

    pub fn set_class(&mut self, class: impl Into<String>) {
        self.target_mut().attrs.class = Some(class.into());
    }

    pub fn unset_class(&mut self) {
        self.target_mut().attrs.class = None;
    }

    pub fn style(&self) -> Option<&str> {
        self.target().attrs.style.as_deref()
    }

    pub fn set_style(&mut self, style: impl Into<String>) {
        self.target_mut().attrs.style = Some(style.into());
    }

    pub fn unset_style(&mut self) {
        self.target_mut().attrs.style = None;
    }

    /// Units of a number literal.
    pub fn units(&self) -> Option<&str> {
        self.target().attrs.units.as_deref()
    }

    /// Attach units. Only number literals carry units.
    pub fn set_units(&mut self, units: impl Into<String>) -> Result<()> {
        let target = self.target_mut();
        if !target.ty.is_number() {
            return Err(Error::InvalidOperation("non-numeric"));
        }
        target.attrs.units = Some(units.into());
        Ok(())
    }

    pub fn unset_units(&mut self) {
        self.target_mut().attrs.units = None;
    }

    /// Whether the node or any descendant carries units.
    pub fn has_units(&self) -> bool {
        self.units().is_some() || self.children().iter().any(AstNode::has_units)
    }

    /// `definitionURL` of a ci, csymbol or semantics node.
    pub fn definition_url(&self) -> Option<&str> {
        self.target().attrs.definition_url.as_deref()
    }

    pub fn set_definition_url(&mut self, url: impl Into<String>) {
        self.target_mut().attrs.definition_url = Some(url.into());
    }

    pub fn unset_definition_url(&mut self) {
        self.target_mut().attrs.definition_url = None;
    }

    /// Opaque user data; shared by clones.
    pub fn user_data(&self) -> Option<&UserData> {
        self.attrs.user_data.as_ref()
    }

    pub fn set_user_data(&mut self, data: UserData) {
        self.attrs.user_data = Some(data);
    }

    pub fn unset_user_data(&mut self) {
        self.attrs.user_data = None;
    }

    /// Whether the node is currently owned by another node.
    #[inline]
    pub fn is_child(&self) -> bool {
        self.is_child
    }

    // ---------------------------------------------------------------
    // children
    // ---------------------------------------------------------------

    /// Number of children; `0` for leaves.
    pub fn num_children(&self) -> usize {
        self.function().map_or(0, |f| f.children.len())
    }

    /// Children in order; empty for leaves.
    pub fn children(&self) -> &[AstNode] {
        self.function().map_or(&[], |f| f.children.as_slice())
    }

    /// Child at `index`.
    pub fn child(&self, index: usize) -> Option<&AstNode> {
        self.function()?.children.get(index)
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut AstNode> {
        self.function_mut()?.children.get_mut(index)
    }

    /// First child.
    pub fn left_child(&self) -> Option<&AstNode> {
        self.child(0)
    }

    /// Last child, when there is more than one.
    pub fn right_child(&self) -> Option<&AstNode> {
        let children = self.children();
        if children.len() > 1 {
            children.last()
        } else {
            None
        }
    }

    fn children_vec_mut(&mut self) -> Result<&mut Vec<AstNode>> {
        self.function_mut()
            .map(|f| &mut f.children)
            .ok_or(Error::InvalidOperation("leaf"))
    }

    /// Append a child.
    pub fn add_child(&mut self, mut child: AstNode) -> Result<()> {
        let children = self.children_vec_mut()?;
        child.is_child = true;
        children.push(child);
        Ok(())
    }

    /// Insert a child before all others.
    pub fn prepend_child(&mut self, child: AstNode) -> Result<()> {
        self.insert_child(0, child)
    }

    /// Insert a child at `index` (`index == num_children()` appends).
    pub fn insert_child(&mut self, index: usize, mut child: AstNode) -> Result<()> {
        let children = self.children_vec_mut()?;
        if index > children.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: children.len(),
            });
        }
        child.is_child = true;
        children.insert(index, child);
        Ok(())
    }

    /// Replace the child at `index`, returning the previous child.
    pub fn replace_child(&mut self, index: usize, mut child: AstNode) -> Result<AstNode> {
        let children = self.children_vec_mut()?;
        let len = children.len();
        let slot = children
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        child.is_child = true;
        let mut old = std::mem::replace(slot, child);
        old.is_child = false;
        Ok(old)
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<AstNode> {
        let children = self.function_mut().map(|f| &mut f.children)?;
        if index >= children.len() {
            return None;
        }
        let mut removed = children.remove(index);
        removed.is_child = false;
        Some(removed)
    }

    /// Exchange the complete child lists of two function nodes.
    pub fn swap_children(&mut self, other: &mut AstNode) -> Result<()> {
        let (Some(mine), Some(theirs)) = (self.function_mut(), other.function_mut()) else {
            return Err(Error::InvalidOperation("leaf"));
        };
        std::mem::swap(&mut mine.children, &mut theirs.children);
        Ok(())
    }

    /// Take all children out of the node, leaving it without children.
    pub fn take_children(&mut self) -> Vec<AstNode> {
        let mut children = self
            .function_mut()
            .map(|f| std::mem::take(&mut f.children))
            .unwrap_or_default();
        for child in &mut children {
            child.is_child = false;
        }
        children
    }

    /// Replace the whole child list of a function node.
    pub(crate) fn set_children(&mut self, mut children: Vec<AstNode>) {
        if let Some(f) = self.function_mut() {
            for child in &mut children {
                child.is_child = true;
            }
            f.children = children;
        }
    }

    // ---------------------------------------------------------------
    // lambda and piecewise helpers
    // ---------------------------------------------------------------

    /// Number of bound variables of a lambda; `0` otherwise.
    pub fn num_bvars(&self) -> usize {
        if self.is_lambda() {
            self.num_children().saturating_sub(1)
        } else {
            0
        }
    }

    /// Body of a lambda (its last child).
    pub fn lambda_body(&self) -> Option<&AstNode> {
        if self.is_lambda() {
            self.children().last()
        } else {
            None
        }
    }

    /// Number of value/condition pairs of a piecewise; `0` otherwise.
    pub fn num_pieces(&self) -> usize {
        if self.is_piecewise() {
            self.num_children() / 2
        } else {
            0
        }
    }

    /// Whether a piecewise has an `otherwise` value.
    pub fn has_otherwise(&self) -> bool {
        self.is_piecewise() && self.num_children() % 2 == 1
    }

    /// The `otherwise` value of a piecewise.
    pub fn otherwise(&self) -> Option<&AstNode> {
        if self.has_otherwise() {
            self.children().last()
        } else {
            None
        }
    }

    // ---------------------------------------------------------------
    // semantics annotations
    // ---------------------------------------------------------------

    /// Attach an opaque XML annotation fragment.
    ///
    /// A node that is not yet a semantics wrapper is promoted in place: its
    /// content moves into a new inner node and this node becomes the
    /// wrapper. Type, value, attributes and children stay reachable through
    /// this node.
    pub fn add_semantics_annotation(&mut self, annotation: impl Into<String>) {
        self.promote_to_semantics();
        if let NodeValue::Function(FunctionNode {
            shape: FunctionShape::Semantics { annotations },
            ..
        }) = &mut self.value
        {
            annotations.push(annotation.into());
        }
    }

    /// Wrap the node in an annotation-free semantics node; a node that is
    /// already one is left alone.
    pub(crate) fn promote_to_semantics(&mut self) {
        if self.is_semantics() {
            return;
        }
        let mut inner = std::mem::take(self);
        let is_child = inner.is_child;
        let user_data = inner.attrs.user_data.take();
        inner.is_child = true;
        *self = AstNode {
            ty: AstType::Semantics,
            value: NodeValue::Function(FunctionNode::with_children(
                FunctionShape::Semantics {
                    annotations: Vec::new(),
                },
                vec![inner],
            )),
            attrs: NodeAttributes {
                user_data,
                ..NodeAttributes::default()
            },
            is_child,
        };
    }

    /// Number of annotations on a semantics wrapper; `0` otherwise.
    pub fn num_semantics_annotations(&self) -> usize {
        self.semantics_annotations().len()
    }

    /// Annotation at `index`.
    pub fn semantics_annotation(&self, index: usize) -> Option<&str> {
        self.semantics_annotations().get(index).map(String::as_str)
    }

    /// All annotations of a semantics wrapper.
    pub fn semantics_annotations(&self) -> &[String] {
        match &self.value {
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::Semantics { annotations },
                ..
            }) => annotations,
            _ => &[],
        }
    }

    /// The node wrapped by a semantics wrapper.
    pub fn semantics_inner(&self) -> Option<&AstNode> {
        match &self.value {
            NodeValue::Function(FunctionNode {
                shape: FunctionShape::Semantics { .. },
                children,
            }) => children.first(),
            _ => None,
        }
    }

    /// Remove the semantics wrapper (and its annotations), keeping the
    /// wrapped node in place.
    pub fn strip_semantics(&mut self) {
        while let NodeValue::Function(FunctionNode {
            shape: FunctionShape::Semantics { .. },
            children,
        }) = &mut self.value
        {
            // The wrapper's own child, not the children of the wrapped node.
            let mut wrapped = std::mem::take(children);
            if wrapped.is_empty() {
                return;
            }
            let mut inner = wrapped.swap_remove(0);
            let is_child = self.is_child;
            let user_data = self.attrs.user_data.take();
            inner.is_child = is_child;
            if inner.attrs.user_data.is_none() {
                inner.attrs.user_data = user_data;
            }
            *self = inner;
        }
    }

    /// Class of the node's representation.
    pub fn shape_class(&self) -> ShapeClass {
        self.ty().shape_class()
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::infix::formula_to_l3_string(self))
    }
}

impl std::str::FromStr for AstNode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::infix::parse_l3_formula(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::testing;
    use proptest::prelude::*;

    fn x() -> AstNode {
        AstNode::new_name("x")
    }

    #[test]
    fn bare_node_is_unknown() {
        let node = AstNode::default();
        assert!(node.is_unknown());
        assert_eq!(node.num_children(), 0);
        assert_eq!(node.name(), None);
    }

    #[test]
    fn sentinels_on_wrong_representation() {
        let name = x();
        assert_eq!(name.integer(), 0);
        assert!(name.real().is_nan());
        assert_eq!(name.numerator(), 0);
        assert_eq!(name.denominator(), 1);
        assert_eq!(name.mantissa(), 0.0);
        assert_eq!(name.exponent(), 0);

        let plus = AstNode::new(AstType::Plus);
        assert_eq!(plus.name(), None);
        assert!(plus.real().is_nan());

        let int = AstNode::new_integer(7);
        assert_eq!(int.name(), None);
        assert_eq!(int.numerator(), 7);
        assert_eq!(int.real(), 7.0);
    }

    #[test]
    fn child_operations_on_leaf_are_noops() {
        let mut leaf = AstNode::new_integer(1);
        assert!(leaf.add_child(x()).is_err());
        assert!(leaf.remove_child(0).is_none());
        assert!(leaf.child(0).is_none());
        assert_eq!(leaf.num_children(), 0);
        assert_eq!(leaf.integer(), 1);
    }

    #[test]
    fn child_mutation_order_and_flags() {
        let mut plus = AstNode::new(AstType::Plus);
        plus.add_child(AstNode::new_name("b")).unwrap();
        plus.prepend_child(AstNode::new_name("a")).unwrap();
        plus.insert_child(2, AstNode::new_name("d")).unwrap();
        plus.insert_child(2, AstNode::new_name("c")).unwrap();
        let names: Vec<_> = plus.children().iter().filter_map(AstNode::name).collect();
        assert_eq!(names, ["a", "b", "c", "d"]);
        assert!(plus.children().iter().all(AstNode::is_child));

        let old = plus.replace_child(1, AstNode::new_integer(2)).unwrap();
        assert_eq!(old.name(), Some("b"));
        assert!(!old.is_child());

        let removed = plus.remove_child(0).unwrap();
        assert_eq!(removed.name(), Some("a"));
        assert!(!removed.is_child());
        assert_eq!(plus.num_children(), 3);
        assert!(matches!(
            plus.insert_child(9, x()),
            Err(Error::IndexOutOfRange { index: 9, len: 3 })
        ));
        assert!(plus.replace_child(3, x()).is_err());
    }

    #[test]
    fn left_and_right_child() {
        let mut minus = AstNode::new(AstType::Minus);
        minus.add_child(x()).unwrap();
        assert_eq!(minus.left_child().and_then(AstNode::name), Some("x"));
        assert!(minus.right_child().is_none());
        minus.add_child(AstNode::new_name("y")).unwrap();
        assert_eq!(minus.right_child().and_then(AstNode::name), Some("y"));
    }

    #[test]
    fn set_type_switches_representation() {
        let mut node = AstNode::new_integer(5);
        node.set_type(AstType::Real);
        assert_eq!(node.real(), 5.0);

        node.set_type(AstType::Plus);
        assert!(!node.is_leaf());
        assert!(node.real().is_nan());
        node.add_child(x()).unwrap();
        node.add_child(x()).unwrap();

        node.set_type(AstType::Times);
        assert_eq!(node.num_children(), 2);

        node.set_type(AstType::Integer);
        assert_eq!(node.num_children(), 0);
        assert_eq!(node.integer(), 0);
    }

    #[test]
    fn set_type_carries_names() {
        let mut node = AstNode::new_name("f");
        node.set_type(AstType::Function);
        assert_eq!(node.name(), Some("f"));
        node.set_type(AstType::Name);
        assert_eq!(node.name(), Some("f"));
    }

    #[test]
    fn set_name_behaviour() {
        let mut node = AstNode::new_integer(3);
        node.set_name("k");
        assert_eq!(node.ty(), AstType::Name);
        assert_eq!(node.name(), Some("k"));

        let mut sin = AstNode::new(AstType::Sin);
        sin.add_child(x()).unwrap();
        sin.set_name("g");
        assert_eq!(sin.ty(), AstType::Function);
        assert_eq!(sin.num_children(), 1);

        let mut time = AstNode::new(AstType::NameTime);
        assert_eq!(time.name(), Some("time"));
        time.set_name("t");
        assert_eq!(time.ty(), AstType::NameTime);
        assert_eq!(time.name(), Some("t"));
    }

    #[test]
    fn constants() {
        let mut node = AstNode::default();
        assert!(node.set_constant(AstType::ConstantPi));
        assert_eq!(node.real(), std::f64::consts::PI);
        assert_eq!(node.name(), Some("pi"));
        assert!(!node.set_constant(AstType::Plus));
        assert_eq!(node.ty(), AstType::ConstantPi);
    }

    #[test]
    fn units_only_on_numbers() {
        let mut num = AstNode::new_real(1.1);
        num.set_units("mL").unwrap();
        assert_eq!(num.units(), Some("mL"));
        assert!(x().set_units("mL").is_err());

        let mut plus = AstNode::new(AstType::Plus);
        plus.add_child(num).unwrap();
        assert!(plus.has_units());
    }

    #[test]
    fn deep_copy_is_independent() {
        let mut tree = AstNode::new(AstType::Plus);
        tree.add_child(x()).unwrap();
        tree.add_child(AstNode::new_integer(1)).unwrap();
        tree.set_user_data(Arc::new(42_u32));

        let mut copy = tree.deep_copy();
        assert_eq!(copy, tree);
        assert!(!copy.is_child());
        copy.child_mut(0).unwrap().set_name("y");
        copy.child_mut(1).unwrap().set_integer(2);

        assert_eq!(tree.child(0).and_then(AstNode::name), Some("x"));
        assert_eq!(tree.child(1).map(AstNode::integer), Some(1));
        assert_ne!(copy, tree);
        let data = copy.user_data().and_then(|d| d.downcast_ref::<u32>());
        assert_eq!(data, Some(&42));
    }

    fn mark_all(node: &mut AstNode, id: &str) {
        node.set_id(id);
        for i in 0..node.num_children() {
            if let Some(child) = node.child_mut(i) {
                mark_all(child, id);
            }
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn deep_copies_share_nothing(tree in testing::tree()) {
            let before = tree.clone();
            let mut copy = tree.deep_copy();
            prop_assert_eq!(&copy, &tree);

            mark_all(&mut copy, "copied");
            prop_assert_eq!(&tree, &before);
            prop_assert_ne!(&copy, &tree);
            prop_assert_eq!(copy.num_children(), tree.num_children());
        }
    }

    #[test]
    fn swap_children_exchanges_lists() {
        let mut a = AstNode::new(AstType::Plus);
        a.add_child(x()).unwrap();
        let mut b = AstNode::new(AstType::Times);
        b.add_child(AstNode::new_integer(1)).unwrap();
        b.add_child(AstNode::new_integer(2)).unwrap();
        a.swap_children(&mut b).unwrap();
        assert_eq!(a.num_children(), 2);
        assert_eq!(b.child(0).and_then(AstNode::name), Some("x"));
        assert!(a.swap_children(&mut AstNode::new_integer(0)).is_err());
    }

    #[test]
    fn semantics_promotion_preserves_content() {
        let mut node = AstNode::new(AstType::Plus);
        node.add_child(x()).unwrap();
        node.add_child(AstNode::new_integer(1)).unwrap();
        node.set_id("p1");
        assert_eq!(node.num_semantics_annotations(), 0);

        node.add_semantics_annotation("<annotation>a</annotation>");
        assert!(node.is_semantics());
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(node.num_children(), 2);
        assert_eq!(node.id(), Some("p1"));
        assert_eq!(node.num_semantics_annotations(), 1);

        node.add_semantics_annotation("<annotation>b</annotation>");
        assert_eq!(node.num_semantics_annotations(), 2);
        assert_eq!(
            node.semantics_annotation(1),
            Some("<annotation>b</annotation>")
        );
        assert!(node.semantics_inner().is_some());

        node.add_child(AstNode::new_integer(2)).unwrap();
        assert_eq!(node.semantics_inner().map(AstNode::num_children), Some(3));

        node.strip_semantics();
        assert!(!node.is_semantics());
        assert_eq!(node.num_children(), 3);
        assert_eq!(node.id(), Some("p1"));
    }

    #[test]
    fn strip_semantics_keeps_wrapped_operator() {
        let mut node = AstNode::new_binary(AstType::Plus, x(), AstNode::new_integer(1));
        node.add_semantics_annotation("<annotation>a</annotation>");
        node.strip_semantics();
        assert!(!node.is_semantics());
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(node.num_children(), 2);
        assert_eq!(node.child(0).and_then(AstNode::name), Some("x"));
        assert_eq!(node.child(1).map(AstNode::integer), Some(1));

        let mut leaf = x();
        leaf.add_semantics_annotation("<annotation>b</annotation>");
        leaf.strip_semantics();
        assert_eq!(leaf, x());
    }

    #[test]
    fn set_name_by_representation() {
        let mut ext = AstNode::new_extension("arrays", "selector", vec![x()]);
        ext.set_name("vector");
        assert_eq!(ext.ty(), AstType::OriginatesInPackage);
        assert_eq!(ext.name(), Some("vector"));
        assert_eq!(ext.package_name(), Some("arrays"));

        let mut sin = AstNode::new_unary(AstType::Sin, x());
        sin.set_name("f");
        assert!(sin.is_user_function());
        assert_eq!(sin.num_children(), 1);

        let mut num = AstNode::new_integer(3);
        num.set_name("k");
        assert_eq!(num.ty(), AstType::Name);

        let mut time = AstNode::new(AstType::NameTime);
        time.set_name("t");
        assert_eq!((time.ty(), time.name()), (AstType::NameTime, Some("t")));
    }

    #[test]
    fn lambda_and_piecewise_helpers() {
        let lambda = AstNode::new_lambda(vec![x(), AstNode::new_name("y")], x());
        assert_eq!(lambda.num_bvars(), 2);
        assert_eq!(lambda.lambda_body().and_then(AstNode::name), Some("x"));

        let pw = AstNode::new_piecewise(
            vec![(AstNode::new_integer(1), AstNode::new(AstType::ConstantTrue))],
            Some(AstNode::new_integer(0)),
        );
        assert_eq!(pw.num_pieces(), 1);
        assert!(pw.has_otherwise());
        assert_eq!(pw.otherwise().map(AstNode::integer), Some(0));
    }

    #[test]
    fn special_reals() {
        assert!(AstNode::new_real(f64::NAN).is_nan());
        assert!(AstNode::new_real(f64::INFINITY).is_infinity());
        assert!(AstNode::new_real(f64::NEG_INFINITY).is_neg_infinity());
        let neg = AstNode::new_unary(AstType::Minus, AstNode::new_real(f64::INFINITY));
        assert!(neg.is_neg_infinity());
        assert!(neg.is_unary_minus());
    }

    #[test]
    fn sqrt_and_log10_detection() {
        let sqrt = AstNode::new_binary(AstType::Root, AstNode::new_integer(2), x());
        assert!(sqrt.is_sqrt());
        let cube = AstNode::new_binary(AstType::Root, AstNode::new_integer(3), x());
        assert!(!cube.is_sqrt());
        let log = AstNode::new_binary(AstType::Log, AstNode::new_integer(10), x());
        assert!(log.is_log10());
        assert!(AstNode::new_unary(AstType::Log, x()).is_log10());
    }
}
