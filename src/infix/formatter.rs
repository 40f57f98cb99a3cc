//! Infix formula formatters.
//!
//! [`L3Formatter`] is the inverse of [`L3Parser`](super::L3Parser): any tree
//! the parser produces formats to text that parses back to an equal tree.
//! [`format_l1`] writes the Level 1 dialect, where relational and logical
//! operators only exist as function calls.

use super::l3::match_modulo_piecewise;
use super::settings::{FormatterSettings, ModuloMode};
use crate::ast::{AstNode, AstType, LeafValue};
use std::borrow::Cow;

/// Precedence of an atom (number, name, call, parenthesized group).
const PRIMARY: u8 = 8;
/// Precedence of prefix `-` and `!` in Level 3.
const L3_PREFIX: u8 = 6;
/// Precedence of prefix `-` in Level 1.
const L1_PREFIX: u8 = 5;

/// Formatter for the Level 3 infix grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct L3Formatter {
    settings: FormatterSettings,
}

impl L3Formatter {
    pub fn new(settings: FormatterSettings) -> Self {
        Self { settings }
    }

    #[inline]
    pub fn settings(&self) -> &FormatterSettings {
        &self.settings
    }

    /// Format a tree as a Level 3 formula.
    pub fn format(&self, node: &AstNode) -> String {
        let mut out = String::with_capacity(64);
        self.write(node, &mut out);
        out
    }

    /// Apply `collapse_minus` to a node about to be written.
    fn simplify<'a>(&self, node: &'a AstNode) -> Cow<'a, AstNode> {
        if !self.settings.collapse_minus || !node.is_unary_minus() {
            return Cow::Borrowed(node);
        }
        let Some(operand) = node.child(0) else {
            return Cow::Borrowed(node);
        };
        if operand.is_unary_minus() {
            if let Some(inner) = operand.child(0) {
                return self.simplify(inner);
            }
        }
        if operand.is_number() {
            let mut negated = operand.deep_copy();
            if let Some(leaf) = negated.leaf_mut() {
                leaf.negate();
            }
            return Cow::Owned(negated);
        }
        Cow::Borrowed(node)
    }

    fn precedence(&self, node: &AstNode) -> u8 {
        let n = node.num_children();
        match node.ty() {
            AstType::And | AstType::Or if n >= 2 => 2,
            AstType::Eq | AstType::Geq | AstType::Gt | AstType::Leq | AstType::Lt if n >= 2 => 3,
            AstType::Neq if n == 2 => 3,
            AstType::Plus if n >= 2 => 4,
            AstType::Minus if n == 2 => 4,
            AstType::Times if n >= 2 => 5,
            AstType::Divide if n == 2 => 5,
            AstType::Rem if n == 2 && self.settings.modulo == ModuloMode::Rem => 5,
            AstType::Piecewise if match_modulo_piecewise(node).is_some() => 5,
            AstType::Minus | AstType::Not if n == 1 => L3_PREFIX,
            AstType::Power if n == 2 => 7,
            _ if is_negative_literal(node) => L3_PREFIX,
            _ => PRIMARY,
        }
    }

    fn write(&self, node: &AstNode, out: &mut String) {
        let simplified = self.simplify(node);
        let node: &AstNode = &simplified;
        let n = node.num_children();
        match node.ty() {
            AstType::And if n >= 2 => self.write_infix(node, node.children(), " && ", false, out),
            AstType::Or if n >= 2 => self.write_infix(node, node.children(), " || ", false, out),
            AstType::Eq if n >= 2 => self.write_infix(node, node.children(), " == ", false, out),
            AstType::Geq if n >= 2 => self.write_infix(node, node.children(), " >= ", false, out),
            AstType::Gt if n >= 2 => self.write_infix(node, node.children(), " > ", false, out),
            AstType::Leq if n >= 2 => self.write_infix(node, node.children(), " <= ", false, out),
            AstType::Lt if n >= 2 => self.write_infix(node, node.children(), " < ", false, out),
            AstType::Neq if n == 2 => self.write_infix(node, node.children(), " != ", false, out),
            AstType::Plus if n >= 2 => self.write_infix(node, node.children(), " + ", false, out),
            AstType::Minus if n == 2 => self.write_infix(node, node.children(), " - ", false, out),
            AstType::Times if n >= 2 => self.write_infix(node, node.children(), " * ", false, out),
            AstType::Divide if n == 2 => {
                self.write_infix(node, node.children(), " / ", false, out)
            },
            AstType::Rem if n == 2 && self.settings.modulo == ModuloMode::Rem => {
                self.write_infix(node, node.children(), " % ", false, out)
            },
            AstType::Power if n == 2 => self.write_infix(node, node.children(), "^", true, out),
            AstType::Minus if n == 1 => self.write_prefix(node, "-", out),
            AstType::Not if n == 1 => self.write_prefix(node, "!", out),
            AstType::Piecewise => match match_modulo_piecewise(node) {
                Some((x, y)) => {
                    let operands = [x.clone(), y.clone()];
                    self.write_infix(node, &operands, " % ", false, out);
                },
                None => self.write_call("piecewise", node.children(), out),
            },
            AstType::Log => match (n, node.is_log10()) {
                (2, true) => self.write_call("log10", &node.children()[1..], out),
                (_, true) => self.write_call("log10", node.children(), out),
                _ => self.write_call("log", node.children(), out),
            },
            AstType::Root => match (n, node.is_sqrt()) {
                (2, true) => self.write_call("sqrt", &node.children()[1..], out),
                (_, true) => self.write_call("sqrt", node.children(), out),
                _ => self.write_call("root", node.children(), out),
            },
            AstType::FunctionPower => self.write_call("pow", node.children(), out),
            AstType::NameTime | AstType::NameAvogadro => out.push_str(node.name().unwrap_or("")),
            ty if node.is_leaf() => write_leaf(node, ty, self.settings.show_units, out),
            ty => {
                let name = call_name(node, ty);
                self.write_call(&name, node.children(), out);
            },
        }
    }

    fn write_prefix(&self, node: &AstNode, op: &str, out: &mut String) {
        out.push_str(op);
        if let Some(operand) = node.child(0) {
            let operand = self.simplify(operand);
            let wrap = self.precedence(&operand) < L3_PREFIX;
            self.write_grouped(&operand, wrap, out);
        }
    }

    fn write_infix(
        &self,
        parent: &AstNode,
        operands: &[AstNode],
        op: &str,
        right_assoc: bool,
        out: &mut String,
    ) {
        let parent_prec = self.precedence(parent);
        for (i, child) in operands.iter().enumerate() {
            if i > 0 {
                out.push_str(op);
            }
            let child = self.simplify(child);
            let child_prec = self.precedence(&child);
            let wrap = needs_parens(
                parent.ty(),
                parent_prec,
                &child,
                child_prec,
                i,
                right_assoc,
                L3_PREFIX,
            );
            self.write_grouped(&child, wrap, out);
        }
    }

    fn write_grouped(&self, node: &AstNode, wrap: bool, out: &mut String) {
        if wrap {
            out.push('(');
            self.write(node, out);
            out.push(')');
        } else {
            self.write(node, out);
        }
    }

    fn write_call(&self, name: &str, args: &[AstNode], out: &mut String) {
        out.push_str(name);
        out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(arg, out);
        }
        out.push(')');
    }
}

/// Operators that the parser collects into one n-ary node.
fn is_chain(ty: AstType) -> bool {
    matches!(
        ty,
        AstType::Plus
            | AstType::Times
            | AstType::And
            | AstType::Or
            | AstType::Eq
            | AstType::Geq
            | AstType::Gt
            | AstType::Leq
            | AstType::Lt
    )
}

/// Grouping rule shared by both dialects.
///
/// A lower-precedence operand is wrapped. At equal precedence the right
/// operand is wrapped (the left one for right-associative operators), and
/// so is a left operand that the parser would otherwise merge into the
/// parent chain. Prefix operators are never wrapped on the right.
fn needs_parens(
    parent: AstType,
    parent_prec: u8,
    child: &AstNode,
    child_prec: u8,
    index: usize,
    right_assoc: bool,
    prefix_prec: u8,
) -> bool {
    if index > 0 && child_prec == prefix_prec {
        return false;
    }
    if child_prec != parent_prec {
        return child_prec < parent_prec;
    }
    if right_assoc {
        return index == 0;
    }
    index > 0 || (child.ty() == parent && is_chain(parent))
}

fn is_negative_literal(node: &AstNode) -> bool {
    match node.leaf() {
        Some(LeafValue::Rational { .. }) | None => false,
        Some(leaf) => leaf.is_negative(),
    }
}

/// Function name used when a node is written as a call.
fn call_name(node: &AstNode, ty: AstType) -> Cow<'_, str> {
    if let Some(name) = node.name() {
        return Cow::Borrowed(name);
    }
    match ty.mathml_name() {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Borrowed(""),
    }
}

pub(crate) fn format_real(value: f64, out: &mut String) {
    if value.is_nan() {
        out.push_str("NaN");
    } else if value.is_infinite() {
        out.push_str(if value > 0.0 { "INF" } else { "-INF" });
    } else {
        let mut buf = ryu::Buffer::new();
        out.push_str(buf.format_finite(value));
    }
}

/// Writes `mantissa` times ten to `exponent`, folding any exponent ryu
/// chose for the mantissa into the written one.
fn format_real_e(mantissa: f64, exponent: i64, out: &mut String) {
    if !mantissa.is_finite() {
        format_real(mantissa, out);
        return;
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(mantissa);
    let (digits, exponent) = match text.split_once('e') {
        Some((digits, own)) => {
            let own = own.parse::<i64>().unwrap_or(0);
            (digits, exponent.saturating_add(own))
        },
        None => (text, exponent),
    };
    out.push_str(digits.strip_suffix(".0").unwrap_or(digits));
    out.push('e');
    format_integer(exponent, out);
}

pub(crate) fn format_integer(value: i64, out: &mut String) {
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(value));
}

fn write_leaf(node: &AstNode, ty: AstType, show_units: bool, out: &mut String) {
    match node.leaf() {
        Some(LeafValue::Integer(v)) => format_integer(*v, out),
        Some(LeafValue::Real(v)) => format_real(*v, out),
        Some(LeafValue::RealE { mantissa, exponent }) => format_real_e(*mantissa, *exponent, out),
        Some(LeafValue::Rational {
            numerator,
            denominator,
        }) => {
            out.push('(');
            format_integer(*numerator, out);
            out.push('/');
            format_integer(*denominator, out);
            out.push(')');
        },
        Some(LeafValue::Name(name)) => out.push_str(name),
        Some(LeafValue::Constant) | None => out.push_str(ty.mathml_name().unwrap_or("")),
    }
    if show_units && ty.is_number() {
        if let Some(units) = node.units() {
            out.push(' ');
            out.push_str(units);
        }
    }
}

/// Format a tree in the Level 1 dialect.
pub fn format_l1(node: &AstNode) -> String {
    let mut out = String::with_capacity(64);
    write_l1(node, &mut out);
    out
}

fn l1_precedence(node: &AstNode) -> u8 {
    let n = node.num_children();
    match node.ty() {
        AstType::Plus if n >= 2 => 2,
        AstType::Minus if n == 2 => 2,
        AstType::Times if n >= 2 => 3,
        AstType::Divide if n == 2 => 3,
        AstType::Power if n == 2 => 4,
        AstType::Minus if n == 1 => L1_PREFIX,
        _ if is_negative_literal(node) => L1_PREFIX,
        _ => PRIMARY,
    }
}

fn write_l1(node: &AstNode, out: &mut String) {
    let n = node.num_children();
    let children = node.children();
    match node.ty() {
        AstType::Plus if n >= 2 => write_l1_infix(node, " + ", out),
        AstType::Minus if n == 2 => write_l1_infix(node, " - ", out),
        AstType::Times if n >= 2 => write_l1_infix(node, " * ", out),
        AstType::Divide if n == 2 => write_l1_infix(node, " / ", out),
        AstType::Power if n == 2 => write_l1_infix(node, "^", out),
        AstType::Minus if n == 1 => {
            out.push('-');
            let operand = &children[0];
            let wrap = l1_precedence(operand) < L1_PREFIX;
            write_l1_grouped(operand, wrap, out);
        },
        AstType::Ln => write_l1_call("log", children, out),
        AstType::Log => match (n, node.is_log10()) {
            (2, true) => write_l1_call("log10", &children[1..], out),
            (_, true) => write_l1_call("log10", children, out),
            _ => write_l1_call("log", children, out),
        },
        AstType::Root => match (n, node.is_sqrt()) {
            (2, true) => write_l1_call("sqrt", &children[1..], out),
            (_, true) => write_l1_call("sqrt", children, out),
            _ => write_l1_call("root", children, out),
        },
        AstType::Power | AstType::FunctionPower => write_l1_call("pow", children, out),
        AstType::NameTime | AstType::NameAvogadro => out.push_str(node.name().unwrap_or("")),
        ty if node.is_leaf() => write_leaf(node, ty, false, out),
        ty => {
            let name = call_name(node, ty);
            write_l1_call(&name, children, out);
        },
    }
}

fn write_l1_infix(node: &AstNode, op: &str, out: &mut String) {
    let parent_prec = l1_precedence(node);
    for (i, child) in node.children().iter().enumerate() {
        if i > 0 {
            out.push_str(op);
        }
        let child_prec = l1_precedence(child);
        // Level 1 nests every operator to the left, so no chain merging.
        let wrap = needs_parens(
            AstType::Unknown,
            parent_prec,
            child,
            child_prec,
            i,
            false,
            L1_PREFIX,
        );
        write_l1_grouped(child, wrap, out);
    }
}

fn write_l1_grouped(node: &AstNode, wrap: bool, out: &mut String) {
    if wrap {
        out.push('(');
        write_l1(node, out);
        out.push(')');
    } else {
        write_l1(node, out);
    }
}

fn write_l1_call(name: &str, args: &[AstNode], out: &mut String) {
    out.push_str(name);
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_l1(arg, out);
    }
    out.push(')');
}
