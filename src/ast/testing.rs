//! Proptest strategies for expression trees shared by the test modules.

use super::{AstNode, AstType, CsymbolKind};
use proptest::prelude::*;

fn name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,4}"
}

fn units() -> impl Strategy<Value = Option<&'static str>> {
    prop::option::of(prop::sample::select(vec!["mole", "second", "litre"]))
}

/// Every kind of number literal, with or without units. Negative infinity
/// is left out: MathML writes it as `-` applied to `<infinity/>`.
pub(crate) fn number() -> impl Strategy<Value = AstNode> {
    let value = prop_oneof![
        (-1000i64..1000).prop_map(AstNode::new_integer),
        (-1.0e6f64..1.0e6).prop_map(AstNode::new_real),
        prop::sample::select(vec![f64::NAN, f64::INFINITY, 1.0e-300, 6.02e23])
            .prop_map(AstNode::new_real),
        (-100.0f64..100.0, -30i64..30).prop_map(|(m, e)| AstNode::new_real_with_exponent(m, e)),
        (-50i64..50, 1i64..50).prop_map(|(n, d)| AstNode::new_rational(n, d)),
    ];
    (value, units()).prop_map(|(mut node, units)| {
        if let Some(units) = units {
            node.set_units(units).expect("numbers accept units");
        }
        node
    })
}

/// Names, constants, csymbols and numbers.
pub(crate) fn leaf() -> impl Strategy<Value = AstNode> {
    prop_oneof![
        3 => number(),
        3 => name().prop_map(AstNode::new_name),
        1 => prop::sample::select(vec![
            AstType::ConstantPi,
            AstType::ConstantE,
            AstType::ConstantTrue,
            AstType::ConstantFalse,
        ])
        .prop_map(AstNode::new),
        1 => prop::sample::select(vec![CsymbolKind::Time, CsymbolKind::Avogadro]).prop_map(
            |kind| {
                let mut node = AstNode::new_csymbol(kind);
                node.set_name(if kind == CsymbolKind::Time { "t" } else { "NA" });
                node
            }
        ),
    ]
}

/// Well-formed trees: operators get an arity they accept, and any node may
/// end up wrapped in a semantics annotation.
pub(crate) fn tree() -> impl Strategy<Value = AstNode> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        let node = prop_oneof![
            (
                prop::sample::select(vec![AstType::Plus, AstType::Times, AstType::And]),
                prop::collection::vec(inner.clone(), 2..4)
            )
                .prop_map(|(ty, children)| AstNode::new_nary(ty, children)),
            (
                prop::sample::select(vec![
                    AstType::Minus,
                    AstType::Divide,
                    AstType::Power,
                    AstType::Lt,
                ]),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(ty, a, b)| AstNode::new_binary(ty, a, b)),
            (
                prop::sample::select(vec![AstType::Minus, AstType::Sin, AstType::Not]),
                inner.clone()
            )
                .prop_map(|(ty, a)| AstNode::new_unary(ty, a)),
            (name(), prop::collection::vec(inner.clone(), 0..3))
                .prop_map(|(f, args)| AstNode::new_function(f, args)),
            (
                prop::collection::vec((inner.clone(), inner.clone()), 1..3),
                prop::option::of(inner)
            )
                .prop_map(|(pieces, otherwise)| AstNode::new_piecewise(pieces, otherwise)),
        ];
        (node, prop::option::of(0u8..10)).prop_map(|(mut node, note)| {
            if let Some(note) = note {
                node.add_semantics_annotation(format!(
                    r#"<annotation encoding="text">note {}</annotation>"#,
                    note
                ));
            }
            node
        })
    })
}
