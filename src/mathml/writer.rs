//! AST to MathML.

use super::MathMLSettings;
use super::elements::{MATHML_NS, SBML_L3_NS};
use crate::ast::{AstNode, AstType, CsymbolKind, LeafValue};
use crate::common::xml::escape_xml;
use crate::infix::{format_integer, format_real};

/// Writer producing indented `<math>` documents.
#[derive(Debug, Clone, Copy)]
pub struct MathMLWriter<'s> {
    settings: &'s MathMLSettings,
}

impl<'s> MathMLWriter<'s> {
    pub fn new(settings: &'s MathMLSettings) -> Self {
        Self { settings }
    }

    /// Write `node` as a complete document, XML declaration included.
    pub fn write(&self, node: &AstNode) -> String {
        let mut out = String::with_capacity(256);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<math xmlns=\"");
        out.push_str(MATHML_NS);
        out.push('"');
        if node.has_units() {
            out.push_str(" xmlns:sbml=\"");
            out.push_str(SBML_L3_NS);
            out.push('"');
        }
        out.push_str(">\n");
        self.write_node(node, 1, &mut out);
        out.push_str("</math>\n");
        out
    }

    fn write_node(&self, node: &AstNode, depth: usize, out: &mut String) {
        if node.is_semantics() {
            self.write_semantics(node, depth, out);
            return;
        }
        let n = node.num_children();
        match node.ty() {
            AstType::Integer | AstType::Real | AstType::RealE | AstType::Rational => {
                write_number(node, depth, out)
            },
            AstType::Name => {
                let mut tag = Tag::new("ci").presentation(node);
                if let Some(url) = node.definition_url() {
                    tag = tag.attr("definitionURL", url);
                }
                tag.text(node.name().unwrap_or_default(), depth, out);
            },
            AstType::NameTime | AstType::NameAvogadro => write_csymbol(node, depth, out),
            ty if ty.is_constant() => Tag::new(ty.mathml_name().unwrap_or_default())
                .presentation(node)
                .empty(depth, out),
            AstType::Lambda => {
                Tag::new("lambda").presentation(node).open(depth, out);
                let (bvars, body) = node.children().split_at(n.saturating_sub(1));
                for bvar in bvars {
                    Tag::new("bvar").open(depth + 1, out);
                    self.write_node(bvar, depth + 2, out);
                    close("bvar", depth + 1, out);
                }
                for b in body {
                    self.write_node(b, depth + 1, out);
                }
                close("lambda", depth, out);
            },
            AstType::Piecewise => {
                Tag::new("piecewise").presentation(node).open(depth, out);
                let mut pairs = node.children().chunks_exact(2);
                for pair in pairs.by_ref() {
                    Tag::new("piece").open(depth + 1, out);
                    self.write_node(&pair[0], depth + 2, out);
                    self.write_node(&pair[1], depth + 2, out);
                    close("piece", depth + 1, out);
                }
                if let [otherwise] = pairs.remainder() {
                    Tag::new("otherwise").open(depth + 1, out);
                    self.write_node(otherwise, depth + 2, out);
                    close("otherwise", depth + 1, out);
                }
                close("piecewise", depth, out);
            },
            AstType::Function => {
                Tag::new("apply").presentation(node).open(depth, out);
                let mut ci = Tag::new("ci");
                if let Some(url) = node.definition_url() {
                    ci = ci.attr("definitionURL", url);
                }
                ci.text(node.name().unwrap_or_default(), depth + 1, out);
                self.write_children(node.children(), depth + 1, out);
                close("apply", depth, out);
            },
            AstType::Delay | AstType::RateOf => {
                Tag::new("apply").presentation(node).open(depth, out);
                write_csymbol(node, depth + 1, out);
                self.write_children(node.children(), depth + 1, out);
                close("apply", depth, out);
            },
            AstType::OriginatesInPackage => self.write_extension(node, depth, out),
            ty if ty.is_qualifier() => {
                let name = ty.mathml_name().unwrap_or_default();
                Tag::new(name).open(depth, out);
                self.write_children(node.children(), depth + 1, out);
                close(name, depth, out);
            },
            AstType::Unknown => tracing::warn!("node of unknown type left out of MathML output"),
            ty => {
                let name = ty.mathml_name().unwrap_or_default();
                Tag::new("apply").presentation(node).open(depth, out);
                Tag::new(name).empty(depth + 1, out);
                let children = node.children();
                match (ty, children) {
                    (AstType::Root, [degree, rest @ ..]) if n == 2 => {
                        Tag::new("degree").open(depth + 1, out);
                        self.write_node(degree, depth + 2, out);
                        close("degree", depth + 1, out);
                        self.write_children(rest, depth + 1, out);
                    },
                    (AstType::Log, [base, rest @ ..]) if n == 2 => {
                        Tag::new("logbase").open(depth + 1, out);
                        self.write_node(base, depth + 2, out);
                        close("logbase", depth + 1, out);
                        self.write_children(rest, depth + 1, out);
                    },
                    _ => self.write_children(children, depth + 1, out),
                }
                close("apply", depth, out);
            },
        }
    }

    fn write_children(&self, children: &[AstNode], depth: usize, out: &mut String) {
        for child in children {
            self.write_node(child, depth, out);
        }
    }

    fn write_semantics(&self, node: &AstNode, depth: usize, out: &mut String) {
        let mut tag = Tag::new("semantics");
        // A ci or user function writes its own definitionURL.
        if let Some(url) = node.definition_url()
            && !matches!(node.ty(), AstType::Name | AstType::Function)
        {
            tag = tag.attr("definitionURL", url);
        }
        tag.open(depth, out);
        if let Some(inner) = node.semantics_inner() {
            self.write_node(inner, depth + 1, out);
        }
        for annotation in node.semantics_annotations() {
            indent(depth + 1, out);
            out.push_str(annotation);
            out.push('\n');
        }
        close("semantics", depth, out);
    }

    fn write_extension(&self, node: &AstNode, depth: usize, out: &mut String) {
        let package = node.package_name().unwrap_or_default();
        let custom = self
            .settings
            .extensions
            .find_package(package)
            .and_then(|ext| ext.write_element(node));
        if let Some(fragment) = custom {
            for line in fragment.lines() {
                indent(depth, out);
                out.push_str(line);
                out.push('\n');
            }
            return;
        }

        let element = node.name().unwrap_or_default();
        if node.num_children() == 0 {
            Tag::new(element).presentation(node).empty(depth, out);
            return;
        }
        Tag::new("apply").presentation(node).open(depth, out);
        Tag::new(element).empty(depth + 1, out);
        self.write_children(node.children(), depth + 1, out);
        close("apply", depth, out);
    }
}

fn indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn close(name: &str, depth: usize, out: &mut String) {
    indent(depth, out);
    out.push_str("</");
    out.push_str(name);
    out.push_str(">\n");
}

/// Start tag under construction.
struct Tag<'a> {
    name: &'a str,
    attributes: Vec<(&'static str, &'a str)>,
}

impl<'a> Tag<'a> {
    fn new(name: &'a str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
        }
    }

    fn attr(mut self, key: &'static str, value: &'a str) -> Self {
        self.attributes.push((key, value));
        self
    }

    /// Add `sbml:units` when `node` carries units.
    fn units(self, node: &'a AstNode) -> Self {
        match node.units() {
            Some(units) => self.attr("sbml:units", units),
            None => self,
        }
    }

    /// Add the `id`, `class` and `style` of `node`.
    fn presentation(mut self, node: &'a AstNode) -> Self {
        for (key, value) in [("id", node.id()), ("class", node.class()), ("style", node.style())] {
            if let Some(value) = value {
                self.attributes.push((key, value));
            }
        }
        self
    }

    fn write_start(&self, depth: usize, out: &mut String) {
        indent(depth, out);
        out.push('<');
        out.push_str(self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_xml(value));
            out.push('"');
        }
    }

    fn open(&self, depth: usize, out: &mut String) {
        self.write_start(depth, out);
        out.push_str(">\n");
    }

    fn empty(&self, depth: usize, out: &mut String) {
        self.write_start(depth, out);
        out.push_str("/>\n");
    }

    /// `<name> text </name>` on one line.
    fn text(&self, text: &str, depth: usize, out: &mut String) {
        self.write_start(depth, out);
        out.push_str("> ");
        out.push_str(&escape_xml(text));
        out.push_str(" </");
        out.push_str(self.name);
        out.push_str(">\n");
    }

    /// `<name> a <sep/> b </name>` on one line.
    fn parts(&self, first: &str, second: &str, depth: usize, out: &mut String) {
        self.write_start(depth, out);
        out.push_str("> ");
        out.push_str(first);
        out.push_str(" <sep/> ");
        out.push_str(second);
        out.push_str(" </");
        out.push_str(self.name);
        out.push_str(">\n");
    }
}

fn write_csymbol(node: &AstNode, depth: usize, out: &mut String) {
    let kind = node.csymbol_kind().unwrap_or(CsymbolKind::Time);
    let name = node.name().unwrap_or(kind.default_name());
    let tag = Tag::new("csymbol")
        .attr("encoding", "text")
        .attr("definitionURL", kind.definition_url());
    // Applied csymbols carry presentation attributes on their <apply>.
    let tag = if kind.is_function() { tag } else { tag.presentation(node) };
    tag.text(name, depth, out);
}

fn write_number(node: &AstNode, depth: usize, out: &mut String) {
    let mut buf = String::new();
    match node.leaf() {
        Some(LeafValue::Integer(v)) => {
            format_integer(*v, &mut buf);
            let tag = Tag::new("cn").attr("type", "integer").units(node).presentation(node);
            tag.text(&buf, depth, out);
        },
        // Special values with units stay a <cn> so the units have a home.
        Some(LeafValue::Real(v)) if v.is_nan() && node.units().is_none() => {
            Tag::new("notanumber").presentation(node).empty(depth, out);
        },
        Some(LeafValue::Real(v)) if v.is_infinite() && *v > 0.0 && node.units().is_none() => {
            Tag::new("infinity").presentation(node).empty(depth, out);
        },
        Some(LeafValue::Real(v)) if v.is_infinite() && node.units().is_none() => {
            Tag::new("apply").presentation(node).open(depth, out);
            Tag::new("minus").empty(depth + 1, out);
            Tag::new("infinity").empty(depth + 1, out);
            close("apply", depth, out);
        },
        Some(LeafValue::Real(v)) => {
            format_real(*v, &mut buf);
            Tag::new("cn").units(node).presentation(node).text(&buf, depth, out);
        },
        Some(LeafValue::RealE { mantissa, exponent }) => {
            format_real(*mantissa, &mut buf);
            let mut exp = String::new();
            format_integer(*exponent, &mut exp);
            let tag = Tag::new("cn").attr("type", "e-notation").units(node).presentation(node);
            tag.parts(&buf, &exp, depth, out);
        },
        Some(LeafValue::Rational {
            numerator,
            denominator,
        }) => {
            format_integer(*numerator, &mut buf);
            let mut den = String::new();
            format_integer(*denominator, &mut den);
            let tag = Tag::new("cn").attr("type", "rational").units(node).presentation(node);
            tag.parts(&buf, &den, depth, out);
        },
        _ => {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorLog;
    use crate::infix::parse_l3_formula;
    use crate::mathml::{read_mathml, write_mathml};
    use crate::ast::testing;
    use proptest::prelude::*;

    fn round_trip(node: &AstNode) -> AstNode {
        let xml = write_mathml(node);
        let mut log = ErrorLog::new();
        let back = read_mathml(&xml, &mut log);
        assert!(log.is_empty(), "{xml}\n{:?}", log.entries());
        back.unwrap()
    }

    #[test]
    fn layout() {
        let node = parse_l3_formula("x + 1").unwrap();
        assert_eq!(
            write_mathml(&node),
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <math xmlns=\"http://www.w3.org/1998/Math/MathML\">\n\
             \x20 <apply>\n\
             \x20   <plus/>\n\
             \x20   <ci> x </ci>\n\
             \x20   <cn type=\"integer\"> 1 </cn>\n\
             \x20 </apply>\n\
             </math>\n"
        );
    }

    #[test]
    fn formulas_survive_a_round_trip() {
        for text in [
            "a * (b + c) / 2.5 - -d",
            "piecewise(1, x > 0, x < -1, 0)",
            "lambda(x, y, x^y + sqrt(x))",
            "time * avogadro + delay(s, 1.5e-3) + rateOf(s)",
            "log(2, x) + log10(y) + ln(z) + root(3, w)",
            "f(x, (1/3), true) && !(a != b) || xor(p, q)",
            "max(a, b, c) + rem(a, b) + quotient(a, b)",
            "INF + NaN + exponentiale * pi",
        ] {
            let node = parse_l3_formula(text).unwrap();
            assert_eq!(round_trip(&node), node, "{text}");
        }
    }

    #[test]
    fn units_declare_the_sbml_namespace() {
        let node = parse_l3_formula("3 mole * x").unwrap();
        let xml = write_mathml(&node);
        assert!(xml.contains("xmlns:sbml=\"http://www.sbml.org/sbml/level3/version1/core\""));
        assert!(xml.contains("<cn type=\"integer\" sbml:units=\"mole\"> 3 </cn>"));
        assert_eq!(round_trip(&node), node);

        let plain = write_mathml(&parse_l3_formula("x").unwrap());
        assert!(!plain.contains("xmlns:sbml"));
    }

    #[test]
    fn special_values_keep_their_units() {
        for (value, text) in [(f64::NAN, "NaN"), (f64::INFINITY, "INF"), (f64::NEG_INFINITY, "-INF")] {
            let mut node = AstNode::new_real(value);
            node.set_units("mole").unwrap();
            let xml = write_mathml(&node);
            assert!(xml.contains(&format!("<cn sbml:units=\"mole\"> {} </cn>", text)));
            assert_eq!(round_trip(&node), node);
        }
        assert!(write_mathml(&AstNode::new_real(f64::NAN)).contains("<notanumber/>"));
        assert!(write_mathml(&AstNode::new_real(f64::INFINITY)).contains("<infinity/>"));
    }

    #[test]
    fn csymbols_keep_their_names() {
        let mut time = AstNode::new_csymbol(CsymbolKind::Time);
        time.set_name("t");
        let xml = write_mathml(&time);
        assert!(xml.contains(
            "<csymbol encoding=\"text\" definitionURL=\"http://www.sbml.org/sbml/symbols/time\"> t </csymbol>"
        ));
        assert_eq!(round_trip(&time), time);
        let avogadro = AstNode::new_csymbol(CsymbolKind::Avogadro);
        assert_eq!(round_trip(&avogadro), avogadro);
    }

    #[test]
    fn semantics_and_attributes() {
        let mut node = parse_l3_formula("a + b").unwrap();
        node.set_id("sum");
        node.add_semantics_annotation("<annotation encoding=\"text\">hello</annotation>");
        let xml = write_mathml(&node);
        assert!(xml.contains("<semantics>"));
        assert!(xml.contains("<apply id=\"sum\">"));
        let back = round_trip(&node);
        assert!(back.is_semantics());
        assert_eq!(back.id(), Some("sum"));
        assert_eq!(back.semantics_annotations(), node.semantics_annotations());
    }

    #[test]
    fn text_is_escaped() {
        let node = AstNode::new_function("a<b", vec![]);
        assert!(write_mathml(&node).contains("<ci> a&lt;b </ci>"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn mathml_write_then_read_is_identity(tree in testing::tree()) {
            let xml = write_mathml(&tree);
            let mut log = ErrorLog::new();
            let back = read_mathml(&xml, &mut log);
            prop_assert!(log.is_empty(), "{}\n{:?}", xml, log.entries());
            prop_assert_eq!(back, Some(tree), "{}", xml);
        }
    }
}
