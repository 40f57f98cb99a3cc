// Built-in names recognized by the Level 3 infix grammar

use crate::ast::{AstType, CsymbolKind};
use phf::phf_map;

/// What a built-in function name produces when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinFunction {
    /// A node of this type with the arguments as children
    Typed(AstType),
    /// `sqrt(x)`: root of degree 2
    Sqrt,
    /// `sqr(x)`: `x^2`
    Sqr,
    /// `log(x)` or `log(base, x)`
    Log,
    /// `log10(x)`
    Log10,
    /// `delay(x, t)` or `rateOf(x)`
    Csymbol(CsymbolKind),
}

/// What a built-in name produces when used without arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinValue {
    Constant(AstType),
    Csymbol(CsymbolKind),
    Infinity,
    NotANumber,
}

/// Function names keyed by lower case, with their canonical spelling.
pub(crate) static FUNCTIONS: phf::Map<&'static str, (&'static str, BuiltinFunction)> = phf_map! {
    "abs" => ("abs", BuiltinFunction::Typed(AstType::Abs)),
    "acos" => ("acos", BuiltinFunction::Typed(AstType::Arccos)),
    "arccos" => ("arccos", BuiltinFunction::Typed(AstType::Arccos)),
    "acosh" => ("acosh", BuiltinFunction::Typed(AstType::Arccosh)),
    "arccosh" => ("arccosh", BuiltinFunction::Typed(AstType::Arccosh)),
    "acot" => ("acot", BuiltinFunction::Typed(AstType::Arccot)),
    "arccot" => ("arccot", BuiltinFunction::Typed(AstType::Arccot)),
    "acoth" => ("acoth", BuiltinFunction::Typed(AstType::Arccoth)),
    "arccoth" => ("arccoth", BuiltinFunction::Typed(AstType::Arccoth)),
    "acsc" => ("acsc", BuiltinFunction::Typed(AstType::Arccsc)),
    "arccsc" => ("arccsc", BuiltinFunction::Typed(AstType::Arccsc)),
    "acsch" => ("acsch", BuiltinFunction::Typed(AstType::Arccsch)),
    "arccsch" => ("arccsch", BuiltinFunction::Typed(AstType::Arccsch)),
    "asec" => ("asec", BuiltinFunction::Typed(AstType::Arcsec)),
    "arcsec" => ("arcsec", BuiltinFunction::Typed(AstType::Arcsec)),
    "asech" => ("asech", BuiltinFunction::Typed(AstType::Arcsech)),
    "arcsech" => ("arcsech", BuiltinFunction::Typed(AstType::Arcsech)),
    "asin" => ("asin", BuiltinFunction::Typed(AstType::Arcsin)),
    "arcsin" => ("arcsin", BuiltinFunction::Typed(AstType::Arcsin)),
    "asinh" => ("asinh", BuiltinFunction::Typed(AstType::Arcsinh)),
    "arcsinh" => ("arcsinh", BuiltinFunction::Typed(AstType::Arcsinh)),
    "atan" => ("atan", BuiltinFunction::Typed(AstType::Arctan)),
    "arctan" => ("arctan", BuiltinFunction::Typed(AstType::Arctan)),
    "atanh" => ("atanh", BuiltinFunction::Typed(AstType::Arctanh)),
    "arctanh" => ("arctanh", BuiltinFunction::Typed(AstType::Arctanh)),
    "ceil" => ("ceil", BuiltinFunction::Typed(AstType::Ceiling)),
    "ceiling" => ("ceiling", BuiltinFunction::Typed(AstType::Ceiling)),
    "cos" => ("cos", BuiltinFunction::Typed(AstType::Cos)),
    "cosh" => ("cosh", BuiltinFunction::Typed(AstType::Cosh)),
    "cot" => ("cot", BuiltinFunction::Typed(AstType::Cot)),
    "coth" => ("coth", BuiltinFunction::Typed(AstType::Coth)),
    "csc" => ("csc", BuiltinFunction::Typed(AstType::Csc)),
    "csch" => ("csch", BuiltinFunction::Typed(AstType::Csch)),
    "exp" => ("exp", BuiltinFunction::Typed(AstType::Exp)),
    "factorial" => ("factorial", BuiltinFunction::Typed(AstType::Factorial)),
    "floor" => ("floor", BuiltinFunction::Typed(AstType::Floor)),
    "ln" => ("ln", BuiltinFunction::Typed(AstType::Ln)),
    "log" => ("log", BuiltinFunction::Log),
    "log10" => ("log10", BuiltinFunction::Log10),
    "piecewise" => ("piecewise", BuiltinFunction::Typed(AstType::Piecewise)),
    "pow" => ("pow", BuiltinFunction::Typed(AstType::FunctionPower)),
    "power" => ("power", BuiltinFunction::Typed(AstType::Power)),
    "root" => ("root", BuiltinFunction::Typed(AstType::Root)),
    "sqrt" => ("sqrt", BuiltinFunction::Sqrt),
    "sqr" => ("sqr", BuiltinFunction::Sqr),
    "sec" => ("sec", BuiltinFunction::Typed(AstType::Sec)),
    "sech" => ("sech", BuiltinFunction::Typed(AstType::Sech)),
    "sin" => ("sin", BuiltinFunction::Typed(AstType::Sin)),
    "sinh" => ("sinh", BuiltinFunction::Typed(AstType::Sinh)),
    "tan" => ("tan", BuiltinFunction::Typed(AstType::Tan)),
    "tanh" => ("tanh", BuiltinFunction::Typed(AstType::Tanh)),
    "max" => ("max", BuiltinFunction::Typed(AstType::Max)),
    "min" => ("min", BuiltinFunction::Typed(AstType::Min)),
    "quotient" => ("quotient", BuiltinFunction::Typed(AstType::Quotient)),
    "rem" => ("rem", BuiltinFunction::Typed(AstType::Rem)),
    "lambda" => ("lambda", BuiltinFunction::Typed(AstType::Lambda)),
    "delay" => ("delay", BuiltinFunction::Csymbol(CsymbolKind::Delay)),
    "rateof" => ("rateOf", BuiltinFunction::Csymbol(CsymbolKind::RateOf)),
    "and" => ("and", BuiltinFunction::Typed(AstType::And)),
    "or" => ("or", BuiltinFunction::Typed(AstType::Or)),
    "xor" => ("xor", BuiltinFunction::Typed(AstType::Xor)),
    "not" => ("not", BuiltinFunction::Typed(AstType::Not)),
    "implies" => ("implies", BuiltinFunction::Typed(AstType::Implies)),
    "eq" => ("eq", BuiltinFunction::Typed(AstType::Eq)),
    "neq" => ("neq", BuiltinFunction::Typed(AstType::Neq)),
    "geq" => ("geq", BuiltinFunction::Typed(AstType::Geq)),
    "gt" => ("gt", BuiltinFunction::Typed(AstType::Gt)),
    "leq" => ("leq", BuiltinFunction::Typed(AstType::Leq)),
    "lt" => ("lt", BuiltinFunction::Typed(AstType::Lt)),
    "plus" => ("plus", BuiltinFunction::Typed(AstType::Plus)),
    "minus" => ("minus", BuiltinFunction::Typed(AstType::Minus)),
    "times" => ("times", BuiltinFunction::Typed(AstType::Times)),
    "divide" => ("divide", BuiltinFunction::Typed(AstType::Divide)),
};

/// Constant and symbol names keyed by lower case, with their canonical
/// spelling.
pub(crate) static VALUES: phf::Map<&'static str, (&'static str, BuiltinValue)> = phf_map! {
    "pi" => ("pi", BuiltinValue::Constant(AstType::ConstantPi)),
    "exponentiale" => ("exponentiale", BuiltinValue::Constant(AstType::ConstantE)),
    "true" => ("true", BuiltinValue::Constant(AstType::ConstantTrue)),
    "false" => ("false", BuiltinValue::Constant(AstType::ConstantFalse)),
    "time" => ("time", BuiltinValue::Csymbol(CsymbolKind::Time)),
    "avogadro" => ("avogadro", BuiltinValue::Csymbol(CsymbolKind::Avogadro)),
    "inf" => ("INF", BuiltinValue::Infinity),
    "infinity" => ("infinity", BuiltinValue::Infinity),
    "nan" => ("NaN", BuiltinValue::NotANumber),
    "notanumber" => ("notanumber", BuiltinValue::NotANumber),
};

fn lookup<T: Copy>(
    table: &phf::Map<&'static str, (&'static str, T)>,
    name: &str,
    case_sensitive: bool,
) -> Option<T> {
    let (canonical, value) = table.get(name.to_ascii_lowercase().as_str())?;
    if case_sensitive && *canonical != name {
        return None;
    }
    Some(*value)
}

/// Resolve a called name.
pub(crate) fn function(name: &str, case_sensitive: bool) -> Option<BuiltinFunction> {
    lookup(&FUNCTIONS, name, case_sensitive)
}

/// Resolve a bare name.
pub(crate) fn value(name: &str, case_sensitive: bool) -> Option<BuiltinValue> {
    lookup(&VALUES, name, case_sensitive)
}
