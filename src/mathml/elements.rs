use crate::ast::AstType;
use phf::phf_map;

/// MathML namespace.
pub const MATHML_NS: &str = "http://www.w3.org/1998/Math/MathML";

/// Namespace of the SBML Level 3 core, used for `sbml:units`.
pub const SBML_L3_NS: &str = "http://www.sbml.org/sbml/level3/version1/core";

/// Role of an element in the permitted MathML subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MathElement {
    Math,
    Cn,
    Ci,
    Csymbol,
    Sep,
    Apply,
    Lambda,
    Bvar,
    Degree,
    Logbase,
    Piecewise,
    Piece,
    Otherwise,
    Semantics,
    Annotation,
    AnnotationXml,
    Infinity,
    NotANumber,
    /// `<pi/>`, `<true/>` and the other constant elements
    Constant(AstType),
    /// Empty element naming the operator of an `apply`
    Operator(AstType),
}

/// Element local name to role
pub(crate) static ELEMENTS: phf::Map<&'static str, MathElement> = phf_map! {
    "math" => MathElement::Math,
    "cn" => MathElement::Cn,
    "ci" => MathElement::Ci,
    "csymbol" => MathElement::Csymbol,
    "sep" => MathElement::Sep,
    "apply" => MathElement::Apply,
    "lambda" => MathElement::Lambda,
    "bvar" => MathElement::Bvar,
    "degree" => MathElement::Degree,
    "logbase" => MathElement::Logbase,
    "piecewise" => MathElement::Piecewise,
    "piece" => MathElement::Piece,
    "otherwise" => MathElement::Otherwise,
    "semantics" => MathElement::Semantics,
    "annotation" => MathElement::Annotation,
    "annotation-xml" => MathElement::AnnotationXml,
    "infinity" => MathElement::Infinity,
    "notanumber" => MathElement::NotANumber,

    // Constants
    "pi" => MathElement::Constant(AstType::ConstantPi),
    "exponentiale" => MathElement::Constant(AstType::ConstantE),
    "true" => MathElement::Constant(AstType::ConstantTrue),
    "false" => MathElement::Constant(AstType::ConstantFalse),

    // Arithmetic
    "plus" => MathElement::Operator(AstType::Plus),
    "minus" => MathElement::Operator(AstType::Minus),
    "times" => MathElement::Operator(AstType::Times),
    "divide" => MathElement::Operator(AstType::Divide),
    "power" => MathElement::Operator(AstType::Power),
    "root" => MathElement::Operator(AstType::Root),
    "abs" => MathElement::Operator(AstType::Abs),
    "exp" => MathElement::Operator(AstType::Exp),
    "ln" => MathElement::Operator(AstType::Ln),
    "log" => MathElement::Operator(AstType::Log),
    "floor" => MathElement::Operator(AstType::Floor),
    "ceiling" => MathElement::Operator(AstType::Ceiling),
    "factorial" => MathElement::Operator(AstType::Factorial),
    "quotient" => MathElement::Operator(AstType::Quotient),
    "rem" => MathElement::Operator(AstType::Rem),
    "max" => MathElement::Operator(AstType::Max),
    "min" => MathElement::Operator(AstType::Min),

    // Logical
    "and" => MathElement::Operator(AstType::And),
    "or" => MathElement::Operator(AstType::Or),
    "xor" => MathElement::Operator(AstType::Xor),
    "not" => MathElement::Operator(AstType::Not),
    "implies" => MathElement::Operator(AstType::Implies),

    // Relational
    "eq" => MathElement::Operator(AstType::Eq),
    "neq" => MathElement::Operator(AstType::Neq),
    "gt" => MathElement::Operator(AstType::Gt),
    "lt" => MathElement::Operator(AstType::Lt),
    "geq" => MathElement::Operator(AstType::Geq),
    "leq" => MathElement::Operator(AstType::Leq),

    // Trigonometric
    "sin" => MathElement::Operator(AstType::Sin),
    "cos" => MathElement::Operator(AstType::Cos),
    "tan" => MathElement::Operator(AstType::Tan),
    "sec" => MathElement::Operator(AstType::Sec),
    "csc" => MathElement::Operator(AstType::Csc),
    "cot" => MathElement::Operator(AstType::Cot),
    "sinh" => MathElement::Operator(AstType::Sinh),
    "cosh" => MathElement::Operator(AstType::Cosh),
    "tanh" => MathElement::Operator(AstType::Tanh),
    "sech" => MathElement::Operator(AstType::Sech),
    "csch" => MathElement::Operator(AstType::Csch),
    "coth" => MathElement::Operator(AstType::Coth),
    "arcsin" => MathElement::Operator(AstType::Arcsin),
    "arccos" => MathElement::Operator(AstType::Arccos),
    "arctan" => MathElement::Operator(AstType::Arctan),
    "arcsec" => MathElement::Operator(AstType::Arcsec),
    "arccsc" => MathElement::Operator(AstType::Arccsc),
    "arccot" => MathElement::Operator(AstType::Arccot),
    "arcsinh" => MathElement::Operator(AstType::Arcsinh),
    "arccosh" => MathElement::Operator(AstType::Arccosh),
    "arctanh" => MathElement::Operator(AstType::Arctanh),
    "arcsech" => MathElement::Operator(AstType::Arcsech),
    "arccsch" => MathElement::Operator(AstType::Arccsch),
    "arccoth" => MathElement::Operator(AstType::Arccoth),
};

/// Look up the role of an element by local name.
#[inline]
pub(crate) fn element(name: &str) -> Option<MathElement> {
    ELEMENTS.get(name).copied()
}

/// Operators that first appear in SBML Level 3 Version 2.
#[inline]
pub(crate) fn is_l3v2_operator(ty: AstType) -> bool {
    matches!(
        ty,
        AstType::Max | AstType::Min | AstType::Quotient | AstType::Rem | AstType::Implies
    )
}
