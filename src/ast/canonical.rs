// Conversion of generic name and function nodes into typed nodes

use super::function::{FunctionNode, FunctionShape};
use super::node::{AstNode, NodeValue};
use super::number::LeafValue;
use super::types::AstType;
use phf::phf_map;

/// Level 1 function names, matched case-insensitively.
///
/// `log` is the natural logarithm in Level 1. `log10`, `sqr` and `sqrt`
/// are rewritten structurally (see [`rewrite_l1_args`]).
pub(crate) static L1_FUNCTIONS: phf::Map<&'static str, AstType> = phf_map! {
    "abs" => AstType::Abs,
    "acos" => AstType::Arccos,
    "asin" => AstType::Arcsin,
    "atan" => AstType::Arctan,
    "ceil" => AstType::Ceiling,
    "cos" => AstType::Cos,
    "exp" => AstType::Exp,
    "floor" => AstType::Floor,
    "log" => AstType::Ln,
    "log10" => AstType::Log,
    "pow" => AstType::FunctionPower,
    "sqr" => AstType::Power,
    "sqrt" => AstType::Root,
    "sin" => AstType::Sin,
    "tan" => AstType::Tan,
};

/// MathML content function names.
pub(crate) static MATHML_FUNCTIONS: phf::Map<&'static str, AstType> = phf_map! {
    "abs" => AstType::Abs,
    "arccos" => AstType::Arccos,
    "arccosh" => AstType::Arccosh,
    "arccot" => AstType::Arccot,
    "arccoth" => AstType::Arccoth,
    "arccsc" => AstType::Arccsc,
    "arccsch" => AstType::Arccsch,
    "arcsec" => AstType::Arcsec,
    "arcsech" => AstType::Arcsech,
    "arcsin" => AstType::Arcsin,
    "arcsinh" => AstType::Arcsinh,
    "arctan" => AstType::Arctan,
    "arctanh" => AstType::Arctanh,
    "ceiling" => AstType::Ceiling,
    "cos" => AstType::Cos,
    "cosh" => AstType::Cosh,
    "cot" => AstType::Cot,
    "coth" => AstType::Coth,
    "csc" => AstType::Csc,
    "csch" => AstType::Csch,
    "exp" => AstType::Exp,
    "factorial" => AstType::Factorial,
    "floor" => AstType::Floor,
    "ln" => AstType::Ln,
    "log" => AstType::Log,
    "piecewise" => AstType::Piecewise,
    "power" => AstType::Power,
    "root" => AstType::Root,
    "sec" => AstType::Sec,
    "sech" => AstType::Sech,
    "sin" => AstType::Sin,
    "sinh" => AstType::Sinh,
    "tan" => AstType::Tan,
    "tanh" => AstType::Tanh,
    "max" => AstType::Max,
    "min" => AstType::Min,
    "quotient" => AstType::Quotient,
    "rem" => AstType::Rem,
    "implies" => AstType::Implies,
};

pub(crate) static LOGICAL_FUNCTIONS: phf::Map<&'static str, AstType> = phf_map! {
    "and" => AstType::And,
    "not" => AstType::Not,
    "or" => AstType::Or,
    "xor" => AstType::Xor,
};

pub(crate) static RELATIONAL_FUNCTIONS: phf::Map<&'static str, AstType> = phf_map! {
    "eq" => AstType::Eq,
    "geq" => AstType::Geq,
    "gt" => AstType::Gt,
    "leq" => AstType::Leq,
    "lt" => AstType::Lt,
    "neq" => AstType::Neq,
};

/// Constant names, matched case-insensitively.
pub(crate) static CONSTANT_NAMES: phf::Map<&'static str, AstType> = phf_map! {
    "exponentiale" => AstType::ConstantE,
    "pi" => AstType::ConstantPi,
    "true" => AstType::ConstantTrue,
    "false" => AstType::ConstantFalse,
};

/// Resolve a function name the way [`AstNode::canonicalize`] does.
pub fn canonical_function_type(name: &str) -> Option<AstType> {
    let lower = name.to_ascii_lowercase();
    L1_FUNCTIONS
        .get(lower.as_str())
        .or_else(|| MATHML_FUNCTIONS.get(name))
        .or_else(|| LOGICAL_FUNCTIONS.get(name))
        .or_else(|| RELATIONAL_FUNCTIONS.get(name))
        .copied()
}

/// Level 1 helpers that are rewritten into a different structure.
fn is_rewritten_l1_call(lower: &str) -> bool {
    matches!(lower, "sqr" | "sqrt" | "log10")
}

/// Apply the structural rewrite of a single-argument Level 1 helper:
/// `sqr(x)` is `x^2`, `sqrt(x)` is the root of degree 2 and `log10(x)` the
/// log of base 10.
fn rewrite_l1_args(lower: &str, args: &mut Vec<AstNode>) {
    match lower {
        "sqr" => args.push(AstNode::new_integer(2)),
        "sqrt" => args.insert(0, AstNode::new_integer(2)),
        "log10" => args.insert(0, AstNode::new_integer(10)),
        _ => {},
    }
}

impl AstNode {
    /// Convert generic names and user-function calls whose names denote
    /// built-ins into typed nodes, recursively.
    ///
    /// Returns whether anything changed. Canonical nodes are left alone, so
    /// a second call returns `false`.
    pub fn canonicalize(&mut self) -> bool {
        let mut changed = self.canonicalize_self();
        if let Some(f) = self.function_mut() {
            for child in &mut f.children {
                changed |= child.canonicalize();
            }
        }
        changed
    }

    fn canonicalize_self(&mut self) -> bool {
        let target = self.target_mut();
        match &target.value {
            NodeValue::Leaf(LeafValue::Name(name)) if target.ty == AstType::Name => {
                let Some(ty) = CONSTANT_NAMES.get(name.to_ascii_lowercase().as_str()).copied()
                else {
                    return false;
                };
                tracing::trace!(name = %name, "name canonicalized to constant");
                target.ty = ty;
                target.value = NodeValue::Leaf(LeafValue::Constant);
                true
            },
            NodeValue::Function(f) => {
                let FunctionShape::UserFunction { name } = &f.shape else {
                    return false;
                };
                let Some(ty) = canonical_function_type(name) else {
                    return false;
                };
                let lower = name.to_ascii_lowercase();
                let rewrite = is_rewritten_l1_call(&lower);
                if rewrite && f.children.len() != 1 {
                    return false;
                }
                let Some(shape) = FunctionShape::for_type(ty, None) else {
                    return false;
                };
                tracing::trace!(name = %name, ty = ?ty, "function canonicalized");

                let mut args = target.take_children();
                if rewrite {
                    rewrite_l1_args(&lower, &mut args);
                }
                for arg in &mut args {
                    arg.is_child = true;
                }
                target.ty = ty;
                target.value = NodeValue::Function(FunctionNode::with_children(shape, args));
                true
            },
            NodeValue::Leaf(_) => false,
        }
    }
}
