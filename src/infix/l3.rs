//! Level 3 infix grammar.
//!
//! ```text
//! expr           := logical
//! logical        := relational (("&&" | "||") relational)*
//! relational     := additive (("==" | "!=" | "<" | "<=" | ">" | ">=") additive)*
//! additive       := multiplicative (("+" | "-") multiplicative)*
//! multiplicative := unary (("*" | "/" | "%") unary)*
//! unary          := ("-" | "!") unary
//!                 | power
//! power          := primary ("^" unary)?
//! primary        := NUMBER UNITS?
//!                 | "(" INTEGER "/" INTEGER ")" UNITS?
//!                 | "(" expr ")"
//!                 | IDENT "(" (expr ("," expr)*)? ")"
//!                 | IDENT
//! ```
//!
//! Runs of the same `+`, `*`, `&&`, `||` or relational operator (other
//! than `!=`) build a single n-ary node; everything else nests to the left,
//! except `^` which nests to the right.

use super::builtins::{self, BuiltinFunction, BuiltinValue};
use super::lexer::{MAX_NESTING, Token, TokenKind, tokenize};
use super::settings::{LogParsing, ModuloMode, ParserSettings};
use crate::ast::{AstNode, AstType, CsymbolKind};
use crate::common::{Error, Result};

/// Parser for the Level 3 infix grammar.
#[derive(Debug, Clone, Default)]
pub struct L3Parser {
    settings: ParserSettings,
}

impl L3Parser {
    pub fn new(settings: ParserSettings) -> Self {
        Self { settings }
    }

    #[inline]
    pub fn settings(&self) -> &ParserSettings {
        &self.settings
    }

    /// Parse a complete formula.
    pub fn parse(&self, text: &str) -> Result<AstNode> {
        let tokens = tokenize(text)?;
        let mut parser = ExprParser {
            tokens,
            pos: 0,
            depth: 0,
            settings: &self.settings,
        };
        if parser.peek().kind == TokenKind::Eof {
            return Err(parser.error_here("empty formula"));
        }

        let node = parser.parse_expr()?;

        // All tokens must be consumed for a valid formula.
        if parser.peek().kind != TokenKind::Eof {
            let found = parser.peek().kind.describe();
            return Err(parser.error_here(format!("unexpected {}", found)));
        }
        Ok(node)
    }
}

/// Build the piecewise expression `%` stands for when `rem` is not used:
/// `piecewise(x - y * ceil(x / y), xor(x < 0, y < 0), x - y * floor(x / y))`.
pub(crate) fn modulo_piecewise(x: &AstNode, y: &AstNode) -> AstNode {
    let rounded = |rounding: AstType| {
        let quotient = AstNode::new_binary(AstType::Divide, x.deep_copy(), y.deep_copy());
        AstNode::new_binary(
            AstType::Minus,
            x.deep_copy(),
            AstNode::new_binary(
                AstType::Times,
                y.deep_copy(),
                AstNode::new_unary(rounding, quotient),
            ),
        )
    };
    let condition = AstNode::new_binary(
        AstType::Xor,
        AstNode::new_binary(AstType::Lt, x.deep_copy(), AstNode::new_integer(0)),
        AstNode::new_binary(AstType::Lt, y.deep_copy(), AstNode::new_integer(0)),
    );
    AstNode::new_piecewise(
        vec![(rounded(AstType::Ceiling), condition)],
        Some(rounded(AstType::Floor)),
    )
}

/// Recognize a [`modulo_piecewise`] expansion, returning its operands.
pub(crate) fn match_modulo_piecewise(node: &AstNode) -> Option<(&AstNode, &AstNode)> {
    if !node.is_piecewise() || node.num_children() != 3 {
        return None;
    }
    let otherwise = node.child(2)?;
    if otherwise.ty() != AstType::Minus || otherwise.num_children() != 2 {
        return None;
    }
    let x = otherwise.child(0)?;
    let times = otherwise.child(1)?;
    if times.ty() != AstType::Times || times.num_children() != 2 {
        return None;
    }
    let y = times.child(0)?;
    (modulo_piecewise(x, y) == *node).then_some((x, y))
}

struct ExprParser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    /// Current nesting of groups, calls and prefix operators
    depth: usize,
    settings: &'s ParserSettings,
}

impl<'s> ExprParser<'s> {
    fn peek(&self) -> &Token {
        // The token list always ends with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind_at(&self, offset: usize) -> Option<&TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| &t.kind)
    }

    fn next(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: impl Into<String>) -> Error {
        let token = self.peek();
        Error::syntax(message, token.line, token.column)
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.peek().kind == kind {
            return Ok(self.next());
        }
        let found = self.peek().kind.describe();
        Err(self.error_here(format!("expected {} but found {}", what, found)))
    }

    fn supports_l3v2(&self) -> bool {
        self.settings.level > 3 || (self.settings.level == 3 && self.settings.version >= 2)
    }

    fn parse_expr(&mut self) -> Result<AstNode> {
        self.parse_logical()
    }

    /// Combine `node` with `rhs` under `ty`, extending `node` instead when it
    /// is a chain of the same operator built at this level.
    fn chain(node: AstNode, chained: &mut Option<AstType>, ty: AstType, rhs: AstNode) -> AstNode {
        if *chained == Some(ty) {
            let mut node = node;
            // Chains are function nodes.
            let _ = node.add_child(rhs);
            return node;
        }
        *chained = Some(ty);
        AstNode::new_binary(ty, node, rhs)
    }

    fn parse_logical(&mut self) -> Result<AstNode> {
        let mut node = self.parse_relational()?;
        let mut chained = None;
        loop {
            let ty = match self.peek().kind {
                TokenKind::AndAnd => AstType::And,
                TokenKind::OrOr => AstType::Or,
                _ => break,
            };
            self.next();
            let rhs = self.parse_relational()?;
            node = Self::chain(node, &mut chained, ty, rhs);
        }
        Ok(node)
    }

    fn parse_relational(&mut self) -> Result<AstNode> {
        let mut node = self.parse_additive()?;
        let mut chained = None;
        loop {
            let ty = match self.peek().kind {
                TokenKind::EqEq => AstType::Eq,
                TokenKind::NotEq => AstType::Neq,
                TokenKind::Lt => AstType::Lt,
                TokenKind::Le => AstType::Leq,
                TokenKind::Gt => AstType::Gt,
                TokenKind::Ge => AstType::Geq,
                _ => break,
            };
            self.next();
            let rhs = self.parse_additive()?;
            if ty == AstType::Neq {
                // `a != b != c` does not mean pairwise inequality.
                chained = None;
                node = AstNode::new_binary(ty, node, rhs);
            } else {
                node = Self::chain(node, &mut chained, ty, rhs);
            }
        }
        Ok(node)
    }

    fn parse_additive(&mut self) -> Result<AstNode> {
        let mut node = self.parse_multiplicative()?;
        let mut chained = None;
        loop {
            match self.peek().kind {
                TokenKind::Plus => {
                    self.next();
                    let rhs = self.parse_multiplicative()?;
                    node = Self::chain(node, &mut chained, AstType::Plus, rhs);
                },
                TokenKind::Minus => {
                    self.next();
                    let rhs = self.parse_multiplicative()?;
                    chained = None;
                    node = AstNode::new_binary(AstType::Minus, node, rhs);
                },
                _ => break,
            }
        }
        Ok(node)
    }

    fn parse_multiplicative(&mut self) -> Result<AstNode> {
        let mut node = self.parse_unary()?;
        let mut chained = None;
        loop {
            match self.peek().kind {
                TokenKind::Star => {
                    self.next();
                    let rhs = self.parse_unary()?;
                    node = Self::chain(node, &mut chained, AstType::Times, rhs);
                },
                TokenKind::Slash => {
                    self.next();
                    let rhs = self.parse_unary()?;
                    chained = None;
                    node = AstNode::new_binary(AstType::Divide, node, rhs);
                },
                TokenKind::Percent => {
                    self.next();
                    let rhs = self.parse_unary()?;
                    chained = None;
                    node = self.modulo(node, rhs);
                },
                _ => break,
            }
        }
        Ok(node)
    }

    fn modulo(&self, x: AstNode, y: AstNode) -> AstNode {
        match self.settings.modulo {
            ModuloMode::Rem if self.supports_l3v2() => AstNode::new_binary(AstType::Rem, x, y),
            _ => modulo_piecewise(&x, &y),
        }
    }

    fn parse_unary(&mut self) -> Result<AstNode> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(format!("formula nested deeper than {}", MAX_NESTING)));
        }
        self.depth += 1;
        let node = self.parse_prefixed();
        self.depth -= 1;
        node
    }

    fn parse_prefixed(&mut self) -> Result<AstNode> {
        match self.peek().kind {
            TokenKind::Minus => {
                self.next();
                let operand = self.parse_unary()?;
                Ok(self.negate(operand))
            },
            TokenKind::Bang => {
                self.next();
                let operand = self.parse_unary()?;
                Ok(AstNode::new_unary(AstType::Not, operand))
            },
            _ => self.parse_power(),
        }
    }

    fn negate(&self, mut operand: AstNode) -> AstNode {
        if self.settings.collapse_minus {
            if operand.is_number() {
                if let Some(leaf) = operand.leaf_mut() {
                    leaf.negate();
                }
                return operand;
            }
            if operand.is_unary_minus() {
                if let Some(inner) = operand.remove_child(0) {
                    return inner;
                }
            }
        }
        AstNode::new_unary(AstType::Minus, operand)
    }

    fn parse_power(&mut self) -> Result<AstNode> {
        let base = self.parse_primary()?;
        if self.peek().kind != TokenKind::Caret {
            return Ok(base);
        }
        self.next();
        let exponent = self.parse_unary()?;
        Ok(AstNode::new_binary(AstType::Power, base, exponent))
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Integer(v) => {
                self.next();
                self.with_units(AstNode::new_integer(v))
            },
            TokenKind::Real(v) => {
                self.next();
                self.with_units(AstNode::new_real(v))
            },
            TokenKind::RealE { mantissa, exponent } => {
                self.next();
                self.with_units(AstNode::new_real_with_exponent(mantissa, exponent))
            },
            TokenKind::LParen => {
                if let Some(rational) = self.try_rational() {
                    return self.with_units(rational);
                }
                self.next();
                let node = self.parse_expr()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(node)
            },
            TokenKind::Ident(ref name) => {
                let name = name.clone();
                self.next();
                if self.peek().kind == TokenKind::LParen {
                    let args = self.parse_args()?;
                    self.call(name, args, &token)
                } else {
                    Ok(self.value(name))
                }
            },
            other => Err(self.error_here(format!("unexpected {}", other.describe()))),
        }
    }

    /// `(n/d)` written without spaces is a rational literal; `(n / d)` is a
    /// division.
    fn try_rational(&mut self) -> Option<AstNode> {
        let window = self.tokens.get(self.pos..)?;
        let (negative, rest) = match window.get(1)?.kind {
            TokenKind::Minus => (true, window.get(1..)?),
            _ => (false, window),
        };
        let [_, num, slash, den, close, ..] = rest else {
            return None;
        };
        let (TokenKind::Integer(n), TokenKind::Slash, TokenKind::Integer(d), TokenKind::RParen) =
            (&num.kind, &slash.kind, &den.kind, &close.kind)
        else {
            return None;
        };
        let spans = if negative { &window[..6] } else { &window[..5] };
        if !spans.windows(2).all(|w| w[0].touches(&w[1])) {
            return None;
        }
        let numerator = if negative { -*n } else { *n };
        let node = AstNode::new_rational(numerator, *d);
        self.pos += spans.len();
        Some(node)
    }

    fn with_units(&mut self, mut node: AstNode) -> Result<AstNode> {
        if !self.settings.parse_units {
            return Ok(node);
        }
        let is_units = matches!(self.peek().kind, TokenKind::Ident(_))
            && self.peek_kind_at(1) != Some(&TokenKind::LParen);
        if is_units {
            if let TokenKind::Ident(units) = self.next().kind {
                node.set_units(units)?;
            }
        }
        Ok(node)
    }

    fn parse_args(&mut self) -> Result<Vec<AstNode>> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut args = Vec::new();
        if self.peek().kind == TokenKind::RParen {
            self.next();
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            match self.peek().kind {
                TokenKind::Comma => {
                    self.next();
                },
                TokenKind::RParen => {
                    self.next();
                    return Ok(args);
                },
                _ => {
                    let found = self.peek().kind.describe();
                    return Err(self.error_here(format!("expected ',' or ')' but found {}", found)));
                },
            }
        }
    }

    fn is_l3v2_only(ty: AstType) -> bool {
        matches!(
            ty,
            AstType::Max | AstType::Min | AstType::Quotient | AstType::Rem | AstType::Implies
        )
    }

    fn call(&self, name: String, mut args: Vec<AstNode>, at: &Token) -> Result<AstNode> {
        let arg_error = |message: String| Error::syntax(message, at.line, at.column);
        if self.settings.model_has_function(&name) {
            return Ok(AstNode::new_function(name, args));
        }
        let Some(builtin) = builtins::function(&name, self.settings.case_sensitive_builtins) else {
            tracing::trace!(name = %name, "call of user function");
            return Ok(AstNode::new_function(name, args));
        };

        let node = match builtin {
            BuiltinFunction::Typed(ty) if Self::is_l3v2_only(ty) && !self.supports_l3v2() => {
                AstNode::new_function(name, args)
            },
            BuiltinFunction::Csymbol(CsymbolKind::RateOf) if !self.supports_l3v2() => {
                AstNode::new_function(name, args)
            },
            BuiltinFunction::Typed(AstType::Lambda) => {
                let Some((body, bvars)) = args.split_last() else {
                    return Err(arg_error("lambda needs at least a body".to_string()));
                };
                if let Some(bad) = bvars.iter().find(|b| b.ty() != AstType::Name) {
                    return Err(arg_error(format!(
                        "lambda bound variable '{}' is not an identifier",
                        super::formula_to_l3_string(bad)
                    )));
                }
                AstNode::new_lambda(bvars.to_vec(), body.clone())
            },
            BuiltinFunction::Typed(ty) => AstNode::new_nary(ty, args),
            BuiltinFunction::Csymbol(kind) => {
                let mut node = AstNode::new_nary(kind.ast_type(), args);
                node.set_name(name);
                node
            },
            BuiltinFunction::Sqrt | BuiltinFunction::Sqr | BuiltinFunction::Log10
                if args.len() != 1 =>
            {
                return Err(arg_error(format!(
                    "{} takes exactly one argument, found {}",
                    name,
                    args.len()
                )));
            },
            BuiltinFunction::Sqrt => {
                args.insert(0, AstNode::new_integer(2));
                AstNode::new_nary(AstType::Root, args)
            },
            BuiltinFunction::Sqr => {
                args.push(AstNode::new_integer(2));
                AstNode::new_nary(AstType::Power, args)
            },
            BuiltinFunction::Log10 => {
                args.insert(0, AstNode::new_integer(10));
                AstNode::new_nary(AstType::Log, args)
            },
            BuiltinFunction::Log => match (args.len(), self.settings.parse_log) {
                (2, _) => AstNode::new_nary(AstType::Log, args),
                (1, LogParsing::AsLog10) => {
                    args.insert(0, AstNode::new_integer(10));
                    AstNode::new_nary(AstType::Log, args)
                },
                (1, LogParsing::AsLn) => AstNode::new_nary(AstType::Ln, args),
                (1, LogParsing::AsError) => {
                    return Err(arg_error(
                        "log with one argument is ambiguous; use log10 or ln".to_string(),
                    ));
                },
                (n, _) => {
                    return Err(arg_error(format!(
                        "log takes one or two arguments, found {}",
                        n
                    )));
                },
            },
        };
        Ok(node)
    }

    fn value(&self, name: String) -> AstNode {
        if self.settings.model_has_symbol(&name) {
            return AstNode::new_name(name);
        }
        match builtins::value(&name, self.settings.case_sensitive_builtins) {
            Some(BuiltinValue::Constant(ty)) => AstNode::new(ty),
            Some(BuiltinValue::Csymbol(CsymbolKind::Avogadro))
                if !self.settings.avogadro_is_csymbol =>
            {
                AstNode::new_name(name)
            },
            Some(BuiltinValue::Csymbol(kind)) => {
                let mut node = AstNode::new_csymbol(kind);
                node.set_name(name);
                node
            },
            Some(BuiltinValue::Infinity) => AstNode::new_real(f64::INFINITY),
            Some(BuiltinValue::NotANumber) => AstNode::new_real(f64::NAN),
            None => AstNode::new_name(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infix::ModelNamespace;
    use std::sync::Arc;

    fn parse(text: &str) -> AstNode {
        L3Parser::default().parse(text).unwrap()
    }

    fn parse_with(text: &str, settings: ParserSettings) -> Result<AstNode> {
        L3Parser::new(settings).parse(text)
    }

    fn names(node: &AstNode) -> Vec<&str> {
        node.children().iter().filter_map(AstNode::name).collect()
    }

    #[test]
    fn precedence_of_times_over_plus() {
        let node = parse("1 + 2 * 3");
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(node.child(0).map(AstNode::integer), Some(1));
        assert_eq!(node.child(1).map(AstNode::ty), Some(AstType::Times));
    }

    #[test]
    fn chains_become_nary() {
        let node = parse("a + b + c");
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(names(&node), ["a", "b", "c"]);

        let node = parse("a && b && c || d");
        assert_eq!(node.ty(), AstType::Or);
        assert_eq!(node.child(0).map(AstNode::num_children), Some(3));

        let node = parse("a < b < c");
        assert_eq!(node.ty(), AstType::Lt);
        assert_eq!(node.num_children(), 3);

        let node = parse("a != b != c");
        assert_eq!(node.ty(), AstType::Neq);
        assert_eq!(node.child(0).map(AstNode::ty), Some(AstType::Neq));
    }

    #[test]
    fn parenthesized_group_is_not_extended() {
        let node = parse("(a + b) + c");
        assert_eq!(node.num_children(), 2);
        assert_eq!(node.child(0).map(AstNode::ty), Some(AstType::Plus));
    }

    #[test]
    fn minus_nests_left() {
        let node = parse("a - b - c");
        assert_eq!(node.ty(), AstType::Minus);
        assert_eq!(node.child(0).map(AstNode::ty), Some(AstType::Minus));
        assert_eq!(node.child(1).and_then(AstNode::name), Some("c"));

        let node = parse("a - (b - c)");
        assert_eq!(node.child(0).and_then(AstNode::name), Some("a"));
        assert_eq!(node.child(1).map(AstNode::ty), Some(AstType::Minus));
    }

    #[test]
    fn power_is_right_associative_and_binds_tighter_than_unary() {
        let node = parse("a ^ b ^ c");
        assert_eq!(node.child(0).and_then(AstNode::name), Some("a"));
        assert_eq!(node.child(1).map(AstNode::ty), Some(AstType::Power));

        let node = parse("-a^2");
        assert!(node.is_unary_minus());
        assert_eq!(node.child(0).map(AstNode::ty), Some(AstType::Power));

        let node = parse("2^-3");
        assert_eq!(node.ty(), AstType::Power);
        assert!(node.child(1).is_some_and(AstNode::is_unary_minus));
    }

    #[test]
    fn user_function_call() {
        let node = parse("foo(1, bar, 2^-3)");
        assert!(node.is_user_function());
        assert_eq!(node.name(), Some("foo"));
        assert_eq!(node.num_children(), 3);
        assert_eq!(node.child(0).map(AstNode::integer), Some(1));
        assert_eq!(node.child(1).and_then(AstNode::name), Some("bar"));
        assert_eq!(node.child(2).map(AstNode::ty), Some(AstType::Power));
    }

    #[test]
    fn modulo_modes() {
        let node = parse("x % y");
        assert_eq!(node.ty(), AstType::Rem);

        let settings = ParserSettings::new().with_modulo(ModuloMode::Piecewise);
        let node = parse_with("x % y", settings).unwrap();
        assert!(node.is_piecewise());
        assert_eq!(node.num_pieces(), 1);
        assert!(node.has_otherwise());
        let (x, y) = match_modulo_piecewise(&node).unwrap();
        assert_eq!((x.name(), y.name()), (Some("x"), Some("y")));

        // Level 3 version 1 has no rem.
        let settings = ParserSettings::new().with_level_version(3, 1);
        assert!(parse_with("x % y", settings).unwrap().is_piecewise());
    }

    #[test]
    fn log_modes() {
        let node = parse("log(x)");
        assert!(node.is_log10());
        assert_eq!(node.num_children(), 2);

        let node = parse_with("log(x)", ParserSettings::new().with_parse_log(LogParsing::AsLn)).unwrap();
        assert_eq!(node.ty(), AstType::Ln);

        let err = parse_with("log(x)", ParserSettings::new().with_parse_log(LogParsing::AsError))
            .unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));

        let node = parse("log(2, x)");
        assert_eq!(node.child(0).map(AstNode::integer), Some(2));
        assert!(parse("log10(x)").is_log10());
    }

    #[test]
    fn sqrt_and_sqr() {
        let node = parse("sqrt(x)");
        assert!(node.is_sqrt());
        assert_eq!(node.child(0).map(AstNode::integer), Some(2));
        let node = parse("sqr(x)");
        assert_eq!(node.ty(), AstType::Power);
        assert_eq!(node.child(1).map(AstNode::integer), Some(2));
        assert!(L3Parser::default().parse("sqrt(x, y)").is_err());
    }

    #[test]
    fn numbers_units_and_rationals() {
        let node = parse("3 mL");
        assert_eq!(node.integer(), 3);
        assert_eq!(node.units(), Some("mL"));

        let node = parse("1.5e3");
        assert_eq!(node.ty(), AstType::RealE);
        assert_eq!((node.mantissa(), node.exponent()), (1.5, 3));

        let node = parse("(1/3)");
        assert!(node.is_rational());
        assert_eq!((node.numerator(), node.denominator()), (1, 3));

        let node = parse("(1 / 3)");
        assert_eq!(node.ty(), AstType::Divide);

        let node = parse("(-1/3) mole");
        assert_eq!(node.numerator(), -1);
        assert_eq!(node.units(), Some("mole"));

        let settings = ParserSettings::new().with_parse_units(false);
        assert!(parse_with("3 mL", settings).is_err());
    }

    #[test]
    fn special_values_and_constants() {
        assert!(parse("INF").is_infinity());
        assert!(parse("NaN").is_nan());
        assert!(parse("notanumber").is_nan());
        assert_eq!(parse("pi").ty(), AstType::ConstantPi);
        assert_eq!(parse("True").ty(), AstType::ConstantTrue);
        assert_eq!(parse("time").ty(), AstType::NameTime);
        assert_eq!(parse("avogadro").ty(), AstType::NameAvogadro);

        let settings = ParserSettings::new().with_avogadro_csymbol(false);
        assert_eq!(parse_with("avogadro", settings).unwrap().ty(), AstType::Name);

        let settings = ParserSettings::new().with_case_sensitive_builtins(true);
        assert_eq!(parse_with("PI", settings).unwrap().ty(), AstType::Name);
    }

    #[test]
    fn collapse_minus() {
        let node = parse("-3");
        assert!(node.is_unary_minus());

        let settings = ParserSettings::new().with_collapse_minus(true);
        let node = parse_with("-3", settings.clone()).unwrap();
        assert_eq!(node.integer(), -3);
        let node = parse_with("--x", settings.clone()).unwrap();
        assert_eq!(node.name(), Some("x"));
        assert!(!node.is_child());
        let node = parse_with("-INF", settings).unwrap();
        assert!(node.is_neg_infinity());
    }

    #[test]
    fn csymbol_functions_and_lambda() {
        let node = parse("delay(x, 2)");
        assert_eq!(node.ty(), AstType::Delay);
        assert_eq!(node.num_children(), 2);
        assert_eq!(parse("rateOf(s)").ty(), AstType::RateOf);

        let node = parse("lambda(x, y, x + y)");
        assert_eq!(node.num_bvars(), 2);
        assert_eq!(node.lambda_body().map(AstNode::ty), Some(AstType::Plus));
        assert!(L3Parser::default().parse("lambda(1, x)").is_err());

        let node = parse("piecewise(1, x > 0, 0)");
        assert_eq!(node.num_pieces(), 1);
        assert!(node.has_otherwise());
    }

    #[test]
    fn model_names_take_precedence() {
        struct Model;
        impl ModelNamespace for Model {
            fn has_function_definition(&self, id: &str) -> bool {
                id == "sin"
            }
            fn has_symbol(&self, id: &str) -> bool {
                id == "pi" || id == "time"
            }
        }
        let settings = ParserSettings::new().with_model(Arc::new(Model));
        let parser = L3Parser::new(settings);
        assert!(parser.parse("sin(x)").unwrap().is_user_function());
        assert_eq!(parser.parse("pi").unwrap().ty(), AstType::Name);
        assert_eq!(parser.parse("time").unwrap().ty(), AstType::Name);
        assert_eq!(parser.parse("cos(x)").unwrap().ty(), AstType::Cos);
    }

    #[test]
    fn syntax_errors_have_positions() {
        let parser = L3Parser::default();
        let err = parser.parse("1 + ").unwrap_err();
        assert_eq!(err.position(), Some((1, 5)));
        let err = parser.parse("f(1,\n  2").unwrap_err();
        assert_eq!(err.position().map(|p| p.0), Some(2));
        assert!(parser.parse("").is_err());
        assert!(parser.parse("(a + b").is_err());
        assert!(parser.parse("a b").is_err());
    }

    #[test]
    fn user_calls_keep_their_name() {
        let node = parse("kf(S, 2) + kr");
        let call = node.child(0).unwrap();
        assert!(call.is_user_function());
        assert_eq!(call.name(), Some("kf"));
        assert_eq!(call.num_children(), 2);
        assert_eq!(node.child(1).and_then(AstNode::name), Some("kr"));

        let err = L3Parser::default().parse("kf(S,)").unwrap_err();
        assert!(matches!(err, Error::Syntax { .. }));
    }

    #[test]
    fn nesting_is_bounded() {
        let parser = L3Parser::default();
        let deep = format!("{}x{}", "(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(parser.parse(&deep), Err(Error::Syntax { .. })));
        let negated = format!("{}x", "-".repeat(50_000));
        assert!(matches!(parser.parse(&negated), Err(Error::Syntax { .. })));
        let calls = format!("{}x{}", "f(".repeat(50_000), ")".repeat(50_000));
        assert!(matches!(parser.parse(&calls), Err(Error::Syntax { .. })));

        let shallow = format!("{}x{}", "(".repeat(50), ")".repeat(50));
        assert_eq!(parser.parse(&shallow).unwrap().name(), Some("x"));
    }
}
