// AST type discriminator and per-type classification tables

use serde::{Deserialize, Serialize};

/// Discriminator for every kind of math node.
///
/// The type decides which representation a node holds (leaf or function),
/// how many children it accepts and how it is written in MathML and infix
/// text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AstType {
    // Arithmetic operators
    Plus,
    Minus,
    Times,
    Divide,
    Power,

    // Numbers
    Integer,
    Real,
    RealE,
    Rational,

    // Names
    Name,
    NameAvogadro,
    NameTime,

    // Constants
    ConstantE,
    ConstantFalse,
    ConstantPi,
    ConstantTrue,

    Lambda,

    /// Call of a user-defined function
    Function,

    // Built-in functions
    Abs,
    Arccos,
    Arccosh,
    Arccot,
    Arccoth,
    Arccsc,
    Arccsch,
    Arcsec,
    Arcsech,
    Arcsin,
    Arcsinh,
    Arctan,
    Arctanh,
    Ceiling,
    Cos,
    Cosh,
    Cot,
    Coth,
    Csc,
    Csch,
    Delay,
    Exp,
    Factorial,
    Floor,
    Ln,
    Log,
    Piecewise,
    /// `pow(a, b)` spelled as a function rather than `^`
    FunctionPower,
    Root,
    Sec,
    Sech,
    Sin,
    Sinh,
    Tan,
    Tanh,
    RateOf,
    Max,
    Min,
    Quotient,
    Rem,

    // Logical operators
    And,
    Not,
    Or,
    Xor,
    Implies,

    // Relational operators
    Eq,
    Geq,
    Gt,
    Leq,
    Lt,
    Neq,

    // Qualifiers and constructors
    QualifierBvar,
    QualifierDegree,
    QualifierLogbase,
    ConstructorPiece,
    ConstructorOtherwise,

    Semantics,

    /// Node contributed by a MathML extension
    OriginatesInPackage,

    #[default]
    Unknown,
}

/// Number of children a type accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    Between(usize, usize),
    AtLeast(usize),
}

impl Arity {
    /// Whether `count` children satisfy this arity.
    #[inline]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

/// Representation class of a type, used when switching node variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeClass {
    Leaf,
    Unary,
    Binary,
    Nary,
    UserFunction,
    Lambda,
    Piecewise,
    CSymbol,
    Qualifier,
    Semantics,
    Extension,
}

impl AstType {
    /// Map an infix operator character to its type.
    pub fn from_operator_char(c: char) -> Option<AstType> {
        match c {
            '+' => Some(AstType::Plus),
            '-' => Some(AstType::Minus),
            '*' => Some(AstType::Times),
            '/' => Some(AstType::Divide),
            '^' => Some(AstType::Power),
            _ => None,
        }
    }

    /// Infix operator character of an arithmetic operator type.
    pub fn operator_char(self) -> Option<char> {
        match self {
            AstType::Plus => Some('+'),
            AstType::Minus => Some('-'),
            AstType::Times => Some('*'),
            AstType::Divide => Some('/'),
            AstType::Power => Some('^'),
            _ => None,
        }
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            AstType::Plus | AstType::Minus | AstType::Times | AstType::Divide | AstType::Power
        )
    }

    #[inline]
    pub fn is_number(self) -> bool {
        matches!(
            self,
            AstType::Integer | AstType::Real | AstType::RealE | AstType::Rational
        )
    }

    /// Real-valued literal (real, e-notation or rational).
    #[inline]
    pub fn is_real(self) -> bool {
        matches!(self, AstType::Real | AstType::RealE | AstType::Rational)
    }

    #[inline]
    pub fn is_name(self) -> bool {
        matches!(
            self,
            AstType::Name | AstType::NameAvogadro | AstType::NameTime
        )
    }

    /// Mathematical or boolean constant. Avogadro's number counts as a
    /// constant as well as a name.
    #[inline]
    pub fn is_constant(self) -> bool {
        matches!(
            self,
            AstType::ConstantE
                | AstType::ConstantFalse
                | AstType::ConstantPi
                | AstType::ConstantTrue
                | AstType::NameAvogadro
        )
    }

    #[inline]
    pub fn is_boolean_constant(self) -> bool {
        matches!(self, AstType::ConstantTrue | AstType::ConstantFalse)
    }

    /// Built-in or user function (everything written as a call in MathML).
    pub fn is_function(self) -> bool {
        use AstType::*;
        matches!(
            self,
            Function
                | Abs
                | Arccos
                | Arccosh
                | Arccot
                | Arccoth
                | Arccsc
                | Arccsch
                | Arcsec
                | Arcsech
                | Arcsin
                | Arcsinh
                | Arctan
                | Arctanh
                | Ceiling
                | Cos
                | Cosh
                | Cot
                | Coth
                | Csc
                | Csch
                | Delay
                | Exp
                | Factorial
                | Floor
                | Ln
                | Log
                | Piecewise
                | FunctionPower
                | Root
                | Sec
                | Sech
                | Sin
                | Sinh
                | Tan
                | Tanh
                | RateOf
                | Max
                | Min
                | Quotient
                | Rem
        )
    }

    #[inline]
    pub fn is_logical(self) -> bool {
        matches!(
            self,
            AstType::And | AstType::Not | AstType::Or | AstType::Xor | AstType::Implies
        )
    }

    #[inline]
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            AstType::Eq | AstType::Geq | AstType::Gt | AstType::Leq | AstType::Lt | AstType::Neq
        )
    }

    #[inline]
    pub fn is_qualifier(self) -> bool {
        matches!(
            self,
            AstType::QualifierBvar
                | AstType::QualifierDegree
                | AstType::QualifierLogbase
                | AstType::ConstructorPiece
                | AstType::ConstructorOtherwise
        )
    }

    /// Types written as `<csymbol>` in MathML.
    #[inline]
    pub fn is_csymbol(self) -> bool {
        matches!(
            self,
            AstType::NameTime | AstType::NameAvogadro | AstType::Delay | AstType::RateOf
        )
    }

    /// Trigonometric and hyperbolic functions and their inverses.
    pub fn is_trigonometric(self) -> bool {
        use AstType::*;
        matches!(
            self,
            Arccos
                | Arccosh
                | Arccot
                | Arccoth
                | Arccsc
                | Arccsch
                | Arcsec
                | Arcsech
                | Arcsin
                | Arcsinh
                | Arctan
                | Arctanh
                | Cos
                | Cosh
                | Cot
                | Coth
                | Csc
                | Csch
                | Sec
                | Sech
                | Sin
                | Sinh
                | Tan
                | Tanh
        )
    }

    /// Representation class used by `AstNode::set_type`.
    pub fn shape_class(self) -> ShapeClass {
        use AstType::*;
        match self {
            Integer | Real | RealE | Rational | Name | ConstantE | ConstantFalse | ConstantPi
            | ConstantTrue => ShapeClass::Leaf,
            NameTime | NameAvogadro | Delay | RateOf => ShapeClass::CSymbol,
            Function => ShapeClass::UserFunction,
            Lambda => ShapeClass::Lambda,
            Piecewise => ShapeClass::Piecewise,
            QualifierBvar | QualifierDegree | QualifierLogbase | ConstructorPiece
            | ConstructorOtherwise => ShapeClass::Qualifier,
            Semantics => ShapeClass::Semantics,
            OriginatesInPackage => ShapeClass::Extension,
            Divide | Power | FunctionPower | Root | Log | Quotient | Rem | Implies | Neq => {
                ShapeClass::Binary
            },
            Plus | Minus | Times | And | Or | Xor | Eq | Geq | Gt | Leq | Lt | Max | Min
            | Unknown => ShapeClass::Nary,
            _ => ShapeClass::Unary,
        }
    }

    /// Accepted child count.
    pub fn arity(self) -> Arity {
        use AstType::*;
        match self.shape_class() {
            ShapeClass::Leaf => Arity::Exactly(0),
            ShapeClass::Unary => Arity::Exactly(1),
            ShapeClass::UserFunction | ShapeClass::Piecewise | ShapeClass::Extension => {
                Arity::AtLeast(0)
            },
            ShapeClass::Lambda => Arity::AtLeast(1),
            ShapeClass::Semantics => Arity::Exactly(1),
            ShapeClass::Qualifier => match self {
                ConstructorPiece => Arity::Exactly(2),
                _ => Arity::Exactly(1),
            },
            ShapeClass::CSymbol => match self {
                Delay => Arity::Exactly(2),
                RateOf => Arity::Exactly(1),
                _ => Arity::Exactly(0),
            },
            ShapeClass::Binary => match self {
                Root | Log => Arity::Between(1, 2),
                _ => Arity::Exactly(2),
            },
            ShapeClass::Nary => match self {
                Minus => Arity::Between(1, 2),
                Eq | Geq | Gt | Leq | Lt | Max | Min => Arity::AtLeast(1),
                _ => Arity::AtLeast(0),
            },
        }
    }

    /// MathML element name, for types written as an element of their own.
    pub fn mathml_name(self) -> Option<&'static str> {
        use AstType::*;
        let name = match self {
            Plus => "plus",
            Minus => "minus",
            Times => "times",
            Divide => "divide",
            Power | FunctionPower => "power",
            ConstantE => "exponentiale",
            ConstantFalse => "false",
            ConstantPi => "pi",
            ConstantTrue => "true",
            Lambda => "lambda",
            Abs => "abs",
            Arccos => "arccos",
            Arccosh => "arccosh",
            Arccot => "arccot",
            Arccoth => "arccoth",
            Arccsc => "arccsc",
            Arccsch => "arccsch",
            Arcsec => "arcsec",
            Arcsech => "arcsech",
            Arcsin => "arcsin",
            Arcsinh => "arcsinh",
            Arctan => "arctan",
            Arctanh => "arctanh",
            Ceiling => "ceiling",
            Cos => "cos",
            Cosh => "cosh",
            Cot => "cot",
            Coth => "coth",
            Csc => "csc",
            Csch => "csch",
            Exp => "exp",
            Factorial => "factorial",
            Floor => "floor",
            Ln => "ln",
            Log => "log",
            Piecewise => "piecewise",
            Root => "root",
            Sec => "sec",
            Sech => "sech",
            Sin => "sin",
            Sinh => "sinh",
            Tan => "tan",
            Tanh => "tanh",
            Max => "max",
            Min => "min",
            Quotient => "quotient",
            Rem => "rem",
            And => "and",
            Not => "not",
            Or => "or",
            Xor => "xor",
            Implies => "implies",
            Eq => "eq",
            Geq => "geq",
            Gt => "gt",
            Leq => "leq",
            Lt => "lt",
            Neq => "neq",
            QualifierBvar => "bvar",
            QualifierDegree => "degree",
            QualifierLogbase => "logbase",
            ConstructorPiece => "piece",
            ConstructorOtherwise => "otherwise",
            Semantics => "semantics",
            _ => return None,
        };
        Some(name)
    }

    /// Operators that are associative and may be flattened into one n-ary node.
    #[inline]
    pub fn is_associative(self) -> bool {
        matches!(
            self,
            AstType::Plus | AstType::Times | AstType::And | AstType::Or | AstType::Xor
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_is_disjoint_for_leaves() {
        for ty in [AstType::Integer, AstType::Real, AstType::Name, AstType::ConstantPi] {
            assert_eq!(ty.shape_class(), ShapeClass::Leaf);
            assert!(!ty.is_function());
            assert!(ty.arity().accepts(0));
            assert!(!ty.arity().accepts(1));
        }
    }

    #[test]
    fn binary_operators_need_two_children() {
        for ty in [AstType::Divide, AstType::Power, AstType::Neq, AstType::Quotient] {
            assert!(!ty.arity().accepts(0));
            assert!(!ty.arity().accepts(1));
            assert!(ty.arity().accepts(2));
            assert!(!ty.arity().accepts(3));
        }
        assert!(AstType::Root.arity().accepts(1));
        assert!(AstType::Minus.arity().accepts(1));
        assert!(!AstType::Minus.arity().accepts(3));
    }

    #[test]
    fn operator_chars_roundtrip() {
        for c in ['+', '-', '*', '/', '^'] {
            let ty = AstType::from_operator_char(c);
            assert_eq!(ty.and_then(AstType::operator_char), Some(c));
        }
        assert_eq!(AstType::from_operator_char('%'), None);
    }

    #[test]
    fn mathml_names() {
        assert_eq!(AstType::FunctionPower.mathml_name(), Some("power"));
        assert_eq!(AstType::Arcsinh.mathml_name(), Some("arcsinh"));
        assert_eq!(AstType::NameTime.mathml_name(), None);
        assert_eq!(AstType::Integer.mathml_name(), None);
    }
}
