//! MathML to AST.
//!
//! Reading never aborts on bad content. Every problem is reported to the
//! caller's [`DiagnosticSink`]; an element that cannot be read is skipped
//! up to its end tag and the expression containing it comes out as `None`,
//! while its siblings are still read so that their problems are reported
//! too.

use super::MathMLSettings;
use super::elements::{MathElement, element, is_l3v2_operator};
use super::stream::{XmlStream, XmlToken, XmlTokenKind};
use crate::ast::{AstNode, AstType, CsymbolKind};
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Severity};

/// Elements that may carry `encoding`.
const ENCODING_ELEMENTS: &[&str] = &["csymbol", "semantics", "annotation", "annotation-xml"];
/// Elements that may carry `definitionURL`.
const DEFINITION_URL_ELEMENTS: &[&str] = &["ci", "csymbol", "semantics"];

/// Reader for `<math>` documents.
#[derive(Debug, Clone, Copy)]
pub struct MathMLReader<'s> {
    settings: &'s MathMLSettings,
}

impl<'s> MathMLReader<'s> {
    pub fn new(settings: &'s MathMLSettings) -> Self {
        Self { settings }
    }

    /// Read the single expression of a `<math>` element.
    pub fn read(&self, xml: &str, sink: &mut dyn DiagnosticSink) -> Option<AstNode> {
        let mut stream = match XmlStream::new(xml) {
            Ok(stream) => stream,
            Err(err) => {
                tracing::debug!(error = %err, "MathML rejected by the XML tokenizer");
                sink.report(Diagnostic::from(&err));
                return None;
            },
        };
        let mut state = ReadState {
            settings: self.settings,
            stream: &mut stream,
            sink,
        };
        state.read_document()
    }
}

/// Operator position of an `apply`.
enum Head {
    Typed(AstType),
    User(AstNode),
    Csymbol(AstNode),
    Extension(String),
}

struct ReadState<'r, 'x> {
    settings: &'r MathMLSettings,
    stream: &'r mut XmlStream<'x>,
    sink: &'r mut dyn DiagnosticSink,
}

impl ReadState<'_, '_> {
    fn report(&mut self, code: DiagnosticCode, token: &XmlToken, message: impl Into<String>) {
        let (line, column) = self.stream.line_column(token);
        let diagnostic = Diagnostic::new(code, Severity::Error, message).at(line, column);
        tracing::debug!(%diagnostic, "MathML diagnostic");
        self.sink.report(diagnostic);
    }

    fn supports_l3v2(&self) -> bool {
        let s = self.settings;
        s.level > 3 || (s.level == 3 && s.version >= 2)
    }

    fn read_document(&mut self) -> Option<AstNode> {
        let Some(root) = self.stream.next() else {
            let diagnostic = Diagnostic::new(
                DiagnosticCode::MissingMathElement,
                Severity::Error,
                "document has no <math> element",
            );
            self.sink.report(diagnostic);
            return None;
        };
        if root.name() != Some("math") {
            let found = root.name().unwrap_or("text").to_string();
            self.report(
                DiagnosticCode::MissingMathElement,
                &root,
                format!("expected <math> but found <{}>", found),
            );
            return None;
        }

        if self.stream.at_end_of_element() {
            self.stream.next();
            self.report(
                DiagnosticCode::MissingMathElement,
                &root,
                "<math> contains no expression",
            );
            return None;
        }
        let node = self.read_expr();
        while !self.stream.at_end_of_element() {
            if let Some(extra) = self.stream.peek().cloned() {
                self.report(
                    DiagnosticCode::BadMathML,
                    &extra,
                    "<math> may contain only one expression",
                );
            }
            self.stream.skip_element();
            if self.stream.peek().is_some_and(|t| !t.is_start() && !t.is_end()) {
                self.stream.next();
            }
        }
        self.stream.next();
        node
    }

    /// Read one expression element, consuming it entirely.
    fn read_expr(&mut self) -> Option<AstNode> {
        let token = self.stream.next()?;
        let XmlTokenKind::Start { name, .. } = &token.kind else {
            if matches!(token.kind, XmlTokenKind::Text(_)) {
                self.report(DiagnosticCode::BadMathML, &token, "unexpected text content");
            }
            return None;
        };
        let name = name.clone();
        self.check_attributes(&name, &token);

        let node = match element(&name) {
            Some(MathElement::Cn) => self.read_cn(&token),
            Some(MathElement::Ci) => self.read_ci(&token),
            Some(MathElement::Csymbol) => self.read_csymbol(&token),
            Some(MathElement::Constant(ty)) => {
                self.expect_empty(&token);
                Some(AstNode::new(ty))
            },
            Some(MathElement::Infinity) => {
                self.expect_empty(&token);
                Some(AstNode::new_real(f64::INFINITY))
            },
            Some(MathElement::NotANumber) => {
                self.expect_empty(&token);
                Some(AstNode::new_real(f64::NAN))
            },
            Some(MathElement::Apply) => self.read_apply(&token),
            Some(MathElement::Lambda) => self.read_lambda(&token),
            Some(MathElement::Piecewise) => self.read_piecewise(&token),
            Some(MathElement::Semantics) => self.read_semantics(&token),
            Some(MathElement::Operator(_)) => {
                self.report(
                    DiagnosticCode::DisallowedMathMLSymbol,
                    &token,
                    format!("<{}> may only appear as the operator of an <apply>", name),
                );
                self.stream.skip_past_end();
                None
            },
            Some(_) => {
                self.report(
                    DiagnosticCode::DisallowedMathMLSymbol,
                    &token,
                    format!("<{}> is not allowed here", name),
                );
                self.stream.skip_past_end();
                None
            },
            None => self.read_extension_element(&name, &token),
        };

        node.map(|mut node| {
            apply_presentation_attributes(&mut node, &token);
            node
        })
    }

    fn check_attributes(&mut self, name: &str, token: &XmlToken) {
        for (key, value) in token.attributes() {
            let local = key.rsplit(':').next().unwrap_or(key);
            let (allowed, code) = match local {
                "encoding" => (
                    ENCODING_ELEMENTS.contains(&name),
                    DiagnosticCode::DisallowedMathMLEncodingUse,
                ),
                "definitionURL" => (
                    DEFINITION_URL_ELEMENTS.contains(&name),
                    DiagnosticCode::DisallowedDefinitionURLUse,
                ),
                "type" => (name == "cn", DiagnosticCode::DisallowedMathTypeAttributeUse),
                "units" if key.contains(':') => {
                    (name == "cn", DiagnosticCode::DisallowedMathUnitsUse)
                },
                _ => continue,
            };
            if !allowed {
                self.report(
                    code,
                    token,
                    format!("attribute {}=\"{}\" is not allowed on <{}>", key, value, name),
                );
            }
        }
    }

    /// Consume the end tag of an element that must be empty.
    fn expect_empty(&mut self, token: &XmlToken) {
        if !self.stream.peek().is_some_and(XmlToken::is_end) {
            let name = token.name().unwrap_or_default().to_string();
            self.report(
                DiagnosticCode::BadMathML,
                token,
                format!("<{}> must be empty", name),
            );
        }
        self.stream.skip_past_end();
    }

    fn read_cn(&mut self, token: &XmlToken) -> Option<AstNode> {
        // Text parts separated by <sep/>.
        let mut parts = vec![String::new()];
        while let Some(next) = self.stream.next() {
            match next.kind {
                XmlTokenKind::Text(ref text) => {
                    if let Some(last) = parts.last_mut() {
                        last.push_str(text);
                    }
                },
                XmlTokenKind::Start { ref name, .. } if name == "sep" => {
                    self.stream.skip_past_end();
                    parts.push(String::new());
                },
                XmlTokenKind::Start { ref name, .. } => {
                    let message = format!("<{}> is not allowed inside <cn>", name);
                    self.report(DiagnosticCode::BadMathML, &next, message);
                    self.stream.skip_past_end();
                },
                XmlTokenKind::End { .. } => break,
            }
        }

        let kind = token.attribute("type").unwrap_or("real");
        let parts: Vec<&str> = parts.iter().map(|p| p.trim()).collect();
        let bad_number = || format!("invalid <cn type=\"{}\"> content '{}'", kind, parts.join(" <sep/> "));
        let mut node = match (kind, parts.as_slice()) {
            ("integer", [text]) => match text.parse::<i64>() {
                Ok(v) => AstNode::new_integer(v),
                Err(_) => {
                    self.report(DiagnosticCode::BadMathMLNumber, token, bad_number());
                    return None;
                },
            },
            ("real", [text]) => match parse_real(text) {
                Some(v) => AstNode::new_real(v),
                None => {
                    self.report(DiagnosticCode::BadMathMLNumber, token, bad_number());
                    return None;
                },
            },
            ("e-notation", [mantissa, exponent]) => {
                match (parse_real(mantissa), exponent.parse::<i64>()) {
                    (Some(m), Ok(e)) => AstNode::new_real_with_exponent(m, e),
                    _ => {
                        self.report(DiagnosticCode::BadMathMLNumber, token, bad_number());
                        return None;
                    },
                }
            },
            ("rational", [numerator, denominator]) => {
                match (numerator.parse::<i64>(), denominator.parse::<i64>()) {
                    (Ok(n), Ok(d)) => AstNode::new_rational(n, d),
                    _ => {
                        self.report(DiagnosticCode::BadMathMLNumber, token, bad_number());
                        return None;
                    },
                }
            },
            ("integer" | "real" | "e-notation" | "rational", _) => {
                self.report(DiagnosticCode::BadMathMLNumber, token, bad_number());
                return None;
            },
            (other, _) => {
                let message = format!("unknown <cn> type \"{}\"", other);
                self.report(DiagnosticCode::DisallowedMathTypeAttributeValue, token, message);
                return None;
            },
        };

        let units = token
            .attributes()
            .iter()
            .find(|(key, _)| key.ends_with(":units"))
            .map(|(_, value)| value.clone());
        if let Some(units) = units {
            // Numbers always accept units.
            let _ = node.set_units(units);
        }
        Some(node)
    }

    fn read_ci(&mut self, token: &XmlToken) -> Option<AstNode> {
        let name = self.stream.read_text();
        let name = name.trim();
        if name.is_empty() {
            self.report(DiagnosticCode::BadMathML, token, "<ci> has no name");
            return None;
        }
        let mut node = AstNode::new_name(name);
        if let Some(url) = token.attribute("definitionURL") {
            node.set_definition_url(url);
        }
        Some(node)
    }

    fn read_csymbol(&mut self, token: &XmlToken) -> Option<AstNode> {
        let text = self.stream.read_text();
        let url = token.attribute("definitionURL").unwrap_or_default();
        let Some(kind) = CsymbolKind::from_url(url) else {
            self.report(
                DiagnosticCode::BadCsymbolDefinitionURLValue,
                token,
                format!("unknown csymbol definitionURL \"{}\"", url),
            );
            return None;
        };
        if kind == CsymbolKind::RateOf && !self.supports_l3v2() {
            self.report(
                DiagnosticCode::DisallowedMathMLSymbol,
                token,
                "rateOf requires SBML Level 3 Version 2",
            );
        }
        let mut node = AstNode::new_csymbol(kind);
        let name = text.trim();
        if !name.is_empty() {
            node.set_name(name);
        }
        Some(node)
    }

    fn read_apply(&mut self, token: &XmlToken) -> Option<AstNode> {
        let op = self.stream.next()?;
        if !op.is_start() {
            self.report(DiagnosticCode::BadMathML, token, "<apply> has no operator");
            if !op.is_end() {
                self.stream.skip_past_end();
            }
            return None;
        }
        let op_name = op.name().unwrap_or_default().to_string();
        self.check_attributes(&op_name, &op);

        let head = match element(&op_name) {
            Some(MathElement::Operator(ty)) => {
                if is_l3v2_operator(ty) && !self.supports_l3v2() {
                    self.report(
                        DiagnosticCode::DisallowedMathMLSymbol,
                        &op,
                        format!("<{}> requires SBML Level 3 Version 2", op_name),
                    );
                }
                self.expect_empty(&op);
                Some(Head::Typed(ty))
            },
            Some(MathElement::Ci) => self.read_ci(&op).map(Head::User),
            Some(MathElement::Csymbol) => match self.read_csymbol(&op) {
                Some(node) if node.csymbol_kind().is_some_and(CsymbolKind::is_function) => {
                    Some(Head::Csymbol(node))
                },
                Some(node) => {
                    let message = format!("csymbol '{}' cannot be applied", node.name().unwrap_or_default());
                    self.report(DiagnosticCode::DisallowedMathMLSymbol, &op, message);
                    None
                },
                None => None,
            },
            Some(_) => {
                let message = format!("<{}> cannot be the operator of an <apply>", op_name);
                self.report(DiagnosticCode::DisallowedMathMLSymbol, &op, message);
                self.stream.skip_past_end();
                None
            },
            None if self.settings.extensions.find_element(&op_name).is_some() => {
                tracing::trace!(element = %op_name, "apply of extension element");
                self.expect_empty(&op);
                Some(Head::Extension(op_name.clone()))
            },
            None => {
                tracing::debug!(element = %op_name, "unknown MathML operator");
                let message = format!("<{}> is not a permitted MathML element", op_name);
                self.report(DiagnosticCode::InvalidMathElement, &op, message);
                self.stream.skip_past_end();
                None
            },
        };

        let (args, qualifier, ok) = self.read_arguments(head.as_ref());
        let head = head?;
        if !ok {
            return None;
        }

        let node = match head {
            Head::Typed(ty) => {
                let mut children = args;
                if let Some(q) = qualifier {
                    children.insert(0, q);
                }
                AstNode::new_nary(ty, children)
            },
            Head::User(call) => {
                let mut node = AstNode::new_function(call.name().unwrap_or_default(), args);
                if let Some(url) = call.definition_url() {
                    node.set_definition_url(url);
                }
                node
            },
            Head::Csymbol(mut node) => {
                for arg in args {
                    // Csymbol functions are function nodes.
                    let _ = node.add_child(arg);
                }
                node
            },
            Head::Extension(element) => self.build_extension(&element, args, &op)?,
        };

        if !node.has_correct_number_arguments() {
            let message = format!(
                "<{}> applied to {} argument(s)",
                op_name,
                node.num_children()
            );
            self.report(DiagnosticCode::OpsNeedCorrectNumberOfArgs, token, message);
        }
        Some(node)
    }

    /// Read the arguments of an apply up to its end tag. Returns the
    /// arguments, the `degree`/`logbase` qualifier if any, and whether every
    /// argument was read.
    fn read_arguments(&mut self, head: Option<&Head>) -> (Vec<AstNode>, Option<AstNode>, bool) {
        let mut args = Vec::new();
        let mut qualifier = None;
        let mut ok = true;
        while let Some(next) = self.stream.peek() {
            if next.is_end() {
                self.stream.next();
                break;
            }
            let qualifier_ty = match next.name() {
                Some("degree") => Some(AstType::Root),
                Some("logbase") => Some(AstType::Log),
                _ => None,
            };
            let Some(expected) = qualifier_ty else {
                match self.read_expr() {
                    Some(arg) => args.push(arg),
                    None => ok = false,
                }
                continue;
            };

            let Some(q) = self.stream.next() else {
                break;
            };
            let name = q.name().unwrap_or_default().to_string();
            let allowed = matches!(head, Some(Head::Typed(ty)) if *ty == expected);
            if !allowed || qualifier.is_some() {
                let message = format!("<{}> is not allowed here", name);
                self.report(DiagnosticCode::DisallowedMathMLSymbol, &q, message);
                self.stream.skip_past_end();
                ok = false;
                continue;
            }
            match self.read_single_child(&q) {
                Some(value) => qualifier = Some(value),
                None => ok = false,
            }
        }
        (args, qualifier, ok)
    }

    /// Read the one expression inside a wrapper element (`degree`, `bvar`,
    /// `otherwise`) and consume the wrapper's end tag.
    fn read_single_child(&mut self, wrapper: &XmlToken) -> Option<AstNode> {
        let name = wrapper.name().unwrap_or_default().to_string();
        if self.stream.at_end_of_element() {
            self.stream.next();
            self.report(
                DiagnosticCode::BadMathML,
                wrapper,
                format!("<{}> is empty", name),
            );
            return None;
        }
        let value = self.read_expr();
        if !self.stream.at_end_of_element() {
            self.report(
                DiagnosticCode::BadMathML,
                wrapper,
                format!("<{}> must contain exactly one expression", name),
            );
            self.stream.skip_past_end();
            return None;
        }
        self.stream.next();
        value
    }

    fn build_extension(
        &mut self,
        element: &str,
        args: Vec<AstNode>,
        at: &XmlToken,
    ) -> Option<AstNode> {
        let settings = self.settings;
        let extension = settings.extensions.find_element(element)?;
        let count = args.len();
        let accepts = extension.accepts_arity(element, count);
        let description = extension.describe_element(element);
        let built = extension.read_element(element, args);
        if !accepts {
            self.report(
                DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                at,
                format!("{} applied to {} argument(s)", description, count),
            );
        }
        match built {
            Ok(node) => Some(node),
            Err(message) => {
                self.report(DiagnosticCode::BadMathML, at, message);
                None
            },
        }
    }

    fn read_extension_element(&mut self, name: &str, token: &XmlToken) -> Option<AstNode> {
        if self.settings.extensions.find_element(name).is_none() {
            tracing::debug!(element = name, "unknown MathML element");
            self.report(
                DiagnosticCode::InvalidMathElement,
                token,
                format!("<{}> is not a permitted MathML element", name),
            );
            self.stream.skip_past_end();
            return None;
        }
        let mut children = Vec::new();
        let mut ok = true;
        while !self.stream.at_end_of_element() {
            match self.read_expr() {
                Some(child) => children.push(child),
                None => ok = false,
            }
        }
        self.stream.next();
        if !ok {
            return None;
        }
        self.build_extension(name, children, token)
    }

    fn read_lambda(&mut self, token: &XmlToken) -> Option<AstNode> {
        let mut bvars = Vec::new();
        let mut body = None;
        let mut ok = true;
        while !self.stream.at_end_of_element() {
            let is_bvar = self.stream.peek().and_then(XmlToken::name) == Some("bvar");
            if is_bvar {
                let Some(bvar) = self.stream.next() else {
                    break;
                };
                if body.is_some() {
                    self.report(
                        DiagnosticCode::BadMathML,
                        &bvar,
                        "<bvar> must precede the lambda body",
                    );
                    self.stream.skip_past_end();
                    ok = false;
                    continue;
                }
                match self.read_single_child(&bvar) {
                    Some(var) if var.ty() == AstType::Name => bvars.push(var),
                    Some(_) => {
                        self.report(
                            DiagnosticCode::BadMathML,
                            &bvar,
                            "<bvar> must contain a <ci>",
                        );
                        ok = false;
                    },
                    None => ok = false,
                }
                continue;
            }

            let at = self.stream.peek().cloned();
            let expr = self.read_expr();
            if body.is_some() {
                if let Some(at) = at {
                    self.report(DiagnosticCode::BadMathML, &at, "<lambda> has more than one body");
                }
                ok = false;
                continue;
            }
            match expr {
                Some(expr) => body = Some(expr),
                None => {
                    // Mark the body as seen so later elements are rejected.
                    body = Some(AstNode::default());
                    ok = false;
                },
            }
        }
        self.stream.next();

        let Some(body) = body else {
            self.report(DiagnosticCode::BadMathML, token, "<lambda> has no body");
            return None;
        };
        ok.then(|| AstNode::new_lambda(bvars, body))
    }

    fn read_piecewise(&mut self, token: &XmlToken) -> Option<AstNode> {
        let mut pieces = Vec::new();
        let mut otherwise = None;
        let mut ok = true;
        while !self.stream.at_end_of_element() {
            let Some(next) = self.stream.next() else {
                break;
            };
            match next.name() {
                Some("piece") => match self.read_piece(&next) {
                    Some(piece) => pieces.push(piece),
                    None => ok = false,
                },
                Some("otherwise") if otherwise.is_none() => match self.read_single_child(&next) {
                    Some(value) => otherwise = Some(value),
                    None => ok = false,
                },
                Some("otherwise") => {
                    self.report(
                        DiagnosticCode::BadMathML,
                        &next,
                        "<piecewise> has more than one <otherwise>",
                    );
                    self.stream.skip_past_end();
                    ok = false;
                },
                Some(name) => {
                    let message = format!("<{}> is not allowed inside <piecewise>", name);
                    self.report(DiagnosticCode::DisallowedMathMLSymbol, &next, message);
                    self.stream.skip_past_end();
                    ok = false;
                },
                None => {
                    self.report(DiagnosticCode::BadMathML, &next, "unexpected text content");
                    ok = false;
                },
            }
        }
        self.stream.next();
        if !ok {
            return None;
        }
        let node = AstNode::new_piecewise(pieces, otherwise);
        if node.num_children() == 0 {
            self.report(DiagnosticCode::BadMathML, token, "<piecewise> is empty");
        }
        Some(node)
    }

    fn read_piece(&mut self, piece: &XmlToken) -> Option<(AstNode, AstNode)> {
        let mut parts = Vec::with_capacity(2);
        let mut ok = true;
        while !self.stream.at_end_of_element() {
            match self.read_expr() {
                Some(part) => parts.push(part),
                None => ok = false,
            }
        }
        self.stream.next();
        if !ok {
            return None;
        }
        let count = parts.len();
        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(value), Some(condition), None) => Some((value, condition)),
            _ => {
                self.report(
                    DiagnosticCode::OpsNeedCorrectNumberOfArgs,
                    piece,
                    format!("<piece> needs a value and a condition, found {} element(s)", count),
                );
                None
            },
        }
    }

    fn read_semantics(&mut self, token: &XmlToken) -> Option<AstNode> {
        if self.stream.at_end_of_element() {
            self.stream.next();
            self.report(DiagnosticCode::BadMathML, token, "<semantics> is empty");
            return None;
        }
        let inner = self.read_expr();
        let mut annotations = Vec::new();
        while !self.stream.at_end_of_element() {
            let Some(next) = self.stream.next() else {
                break;
            };
            match next.name() {
                Some("annotation" | "annotation-xml") => {
                    let end = self.stream.skip_past_end();
                    annotations.push(self.stream.slice(next.start, end).to_string());
                },
                Some(name) => {
                    let message = format!("<{}> is not allowed inside <semantics>", name);
                    self.report(DiagnosticCode::DisallowedMathMLSymbol, &next, message);
                    self.stream.skip_past_end();
                },
                None => {},
            }
        }
        self.stream.next();

        let mut node = inner?;
        // An annotation-free wrapper is kept so its definitionURL survives.
        node.promote_to_semantics();
        for annotation in annotations {
            node.add_semantics_annotation(annotation);
        }
        if let Some(url) = token.attribute("definitionURL") {
            node.set_definition_url(url);
        }
        Some(node)
    }
}

/// Reals as written in `<cn>`, including the special values.
fn parse_real(text: &str) -> Option<f64> {
    match text {
        "INF" | "inf" | "Infinity" => Some(f64::INFINITY),
        "-INF" | "-inf" | "-Infinity" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        _ if text.is_empty() => None,
        _ => fast_float2::parse(text).ok(),
    }
}

fn apply_presentation_attributes(node: &mut AstNode, token: &XmlToken) {
    if let Some(id) = token.attribute("id") {
        node.set_id(id);
    }
    if let Some(class) = token.attribute("class") {
        node.set_class(class);
    }
    if let Some(style) = token.attribute("style") {
        node.set_style(style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::ErrorLog;
    use crate::mathml::{read_mathml, write_mathml};

    fn math(body: &str) -> String {
        format!(r#"<math xmlns="http://www.w3.org/1998/Math/MathML">{}</math>"#, body)
    }

    fn read(body: &str) -> (Option<AstNode>, ErrorLog) {
        let settings = MathMLSettings::default();
        let mut log = ErrorLog::new();
        let node = MathMLReader::new(&settings).read(&math(body), &mut log);
        (node, log)
    }

    fn read_ok(body: &str) -> AstNode {
        let (node, log) = read(body);
        assert!(log.is_empty(), "{:?}", log.entries());
        node.unwrap()
    }

    #[test]
    fn numbers() {
        assert_eq!(read_ok(r#"<cn type="integer"> 42 </cn>"#).integer(), 42);
        assert_eq!(read_ok("<cn> 2.5 </cn>").real(), 2.5);
        let node = read_ok(r#"<cn type="e-notation"> 1.5 <sep/> 3 </cn>"#);
        assert_eq!((node.mantissa(), node.exponent()), (1.5, 3));
        let node = read_ok(r#"<cn type="rational"> 1 <sep/> 3 </cn>"#);
        assert_eq!((node.numerator(), node.denominator()), (1, 3));
        assert!(read_ok("<infinity/>").is_infinity());
        assert!(read_ok("<notanumber/>").is_nan());
        assert!(read_ok("<apply><minus/><infinity/></apply>").is_neg_infinity());
    }

    #[test]
    fn units_attribute() {
        let xml = r#"<math xmlns="http://www.w3.org/1998/Math/MathML" xmlns:sbml="http://www.sbml.org/sbml/level3/version1/core">
            <cn sbml:units="mole" type="integer"> 3 </cn>
        </math>"#;
        let mut log = ErrorLog::new();
        let node = super::super::read_mathml(xml, &mut log).unwrap();
        assert_eq!(node.units(), Some("mole"));

        let (_, log) = read(r#"<ci sbml:units="mole"> x </ci>"#);
        assert!(log.contains(DiagnosticCode::DisallowedMathUnitsUse));
    }

    #[test]
    fn names_and_csymbols() {
        let node = read_ok("<ci> k1 </ci>");
        assert_eq!(node.name(), Some("k1"));
        let node = read_ok(
            r#"<csymbol encoding="text" definitionURL="http://www.sbml.org/sbml/symbols/time"> t </csymbol>"#,
        );
        assert_eq!(node.ty(), AstType::NameTime);
        assert_eq!(node.name(), Some("t"));

        let node = read_ok(
            r#"<apply><csymbol encoding="text" definitionURL="http://www.sbml.org/sbml/symbols/delay"> delay </csymbol><ci> x </ci><cn> 0.1 </cn></apply>"#,
        );
        assert_eq!(node.ty(), AstType::Delay);
        assert_eq!(node.num_children(), 2);
    }

    #[test]
    fn apply_forms() {
        let node = read_ok("<apply><plus/><ci> a </ci><ci> b </ci><ci> c </ci></apply>");
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(node.num_children(), 3);

        let node = read_ok("<apply><ci> f </ci><ci> x </ci></apply>");
        assert!(node.is_user_function());
        assert_eq!(node.name(), Some("f"));

        let node = read_ok(
            r#"<apply><root/><degree><cn type="integer"> 3 </cn></degree><ci> x </ci></apply>"#,
        );
        assert_eq!(node.num_children(), 2);
        assert_eq!(node.child(0).map(AstNode::integer), Some(3));

        let node = read_ok("<apply><log/><ci> x </ci></apply>");
        assert!(node.is_log10());
        assert_eq!(node.num_children(), 1);
    }

    #[test]
    fn lambda_and_piecewise() {
        let node = read_ok(
            "<lambda><bvar><ci> x </ci></bvar><bvar><ci> y </ci></bvar><apply><times/><ci> x </ci><ci> y </ci></apply></lambda>",
        );
        assert_eq!(node.num_bvars(), 2);
        assert_eq!(node.lambda_body().map(AstNode::ty), Some(AstType::Times));

        let node = read_ok(
            "<piecewise><piece><cn> 1 </cn><apply><gt/><ci> x </ci><cn> 0 </cn></apply></piece><otherwise><cn> 0 </cn></otherwise></piecewise>",
        );
        assert_eq!(node.num_pieces(), 1);
        assert!(node.has_otherwise());
        assert_eq!(node.child(1).map(AstNode::ty), Some(AstType::Gt));
    }

    #[test]
    fn semantics_keeps_annotations() {
        let node = read_ok(
            r#"<semantics><ci> x </ci><annotation encoding="text">note</annotation></semantics>"#,
        );
        assert!(node.is_semantics());
        assert_eq!(node.ty(), AstType::Name);
        assert_eq!(
            node.semantics_annotation(0),
            Some(r#"<annotation encoding="text">note</annotation>"#)
        );
    }

    #[test]
    fn bare_semantics_keeps_its_definition_url() {
        let node = read_ok(
            r#"<semantics definitionURL="http://example.org/rate"><apply><plus/><ci> a </ci><cn type="integer"> 1 </cn></apply></semantics>"#,
        );
        assert!(node.is_semantics());
        assert!(node.semantics_annotations().is_empty());
        assert_eq!(node.ty(), AstType::Plus);
        assert_eq!(node.definition_url(), Some("http://example.org/rate"));

        let written = write_mathml(&node);
        assert!(written.contains(r#"<semantics definitionURL="http://example.org/rate">"#));
        assert_eq!(read_mathml(&written, &mut ErrorLog::new()), Some(node));
    }

    #[test]
    fn presentation_attributes_are_kept() {
        let node = read_ok(r#"<ci id="n1" class="c" style="s"> x </ci>"#);
        assert_eq!((node.id(), node.class(), node.style()), (Some("n1"), Some("c"), Some("s")));
    }

    #[test]
    fn error_codes() {
        let cases = [
            ("<mrow/>", DiagnosticCode::InvalidMathElement),
            ("<plus/>", DiagnosticCode::DisallowedMathMLSymbol),
            (r#"<cn type="integer"> 1.5 </cn>"#, DiagnosticCode::BadMathMLNumber),
            (r#"<cn type="complex"> 1 </cn>"#, DiagnosticCode::DisallowedMathTypeAttributeValue),
            (
                r#"<csymbol definitionURL="http://example.org/x"> x </csymbol>"#,
                DiagnosticCode::BadCsymbolDefinitionURLValue,
            ),
            (r#"<ci type="real"> x </ci>"#, DiagnosticCode::DisallowedMathTypeAttributeUse),
            (r#"<ci encoding="text"> x </ci>"#, DiagnosticCode::DisallowedMathMLEncodingUse),
            (
                r#"<cn definitionURL="http://example.org"> 1 </cn>"#,
                DiagnosticCode::DisallowedDefinitionURLUse,
            ),
            ("<apply><divide/><ci> x </ci></apply>", DiagnosticCode::OpsNeedCorrectNumberOfArgs),
            ("<apply><plus/><ci>a</ci></apply><ci> b </ci>", DiagnosticCode::BadMathML),
            ("", DiagnosticCode::MissingMathElement),
        ];
        for (body, code) in cases {
            let (_, log) = read(body);
            assert!(log.contains(code), "{body}: {:?}", log.entries());
        }

        let mut log = ErrorLog::new();
        assert!(super::super::read_mathml("<math><ci>x</math>", &mut log).is_none());
        assert!(log.contains(DiagnosticCode::NotSchemaConformant));
    }

    #[test]
    fn failed_element_spoils_parent_but_siblings_are_read() {
        let (node, log) = read(
            r#"<apply><plus/><mrow/><cn type="integer"> x </cn><ci> ok </ci></apply>"#,
        );
        assert!(node.is_none());
        assert!(log.contains(DiagnosticCode::InvalidMathElement));
        assert!(log.contains(DiagnosticCode::BadMathMLNumber));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn level3_version1_rejects_newer_operators() {
        let settings = MathMLSettings::new().with_level_version(3, 1);
        let mut log = ErrorLog::new();
        let node = MathMLReader::new(&settings)
            .read(&math("<apply><max/><ci> a </ci><ci> b </ci></apply>"), &mut log);
        assert!(node.is_some());
        assert!(log.contains(DiagnosticCode::DisallowedMathMLSymbol));
    }
}
