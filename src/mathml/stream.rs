//! Token stream over a MathML document.
//!
//! The document is tokenized up front with quick-xml into start, end and
//! text tokens. Empty elements (`<plus/>`) become a start token directly
//! followed by its end token, so readers never special-case them.
//! Whitespace-only text is dropped; entity and character references are
//! resolved and merged into the surrounding text.

use crate::common::xml::{line_column, unescape_xml};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::VecDeque;

/// Maximum element nesting accepted by the tokenizer
const MAX_DEPTH: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub enum XmlTokenKind {
    /// Opening tag with local name and `(qualified key, value)` attributes
    Start {
        name: String,
        attributes: Vec<(String, String)>,
    },
    /// Closing tag
    End { name: String },
    /// Unescaped character data
    Text(String),
}

/// A token with the byte span it covers in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlToken {
    pub kind: XmlTokenKind,
    pub start: usize,
    pub end: usize,
}

impl XmlToken {
    /// Local name of a start or end tag.
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            XmlTokenKind::Start { name, .. } | XmlTokenKind::End { name } => Some(name),
            XmlTokenKind::Text(_) => None,
        }
    }

    #[inline]
    pub fn is_start(&self) -> bool {
        matches!(self.kind, XmlTokenKind::Start { .. })
    }

    #[inline]
    pub fn is_end(&self) -> bool {
        matches!(self.kind, XmlTokenKind::End { .. })
    }

    /// Attributes of a start tag.
    pub fn attributes(&self) -> &[(String, String)] {
        match &self.kind {
            XmlTokenKind::Start { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Value of the attribute with exactly this qualified key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Pull interface over the tokens of one document.
#[derive(Debug, Clone)]
pub struct XmlStream<'a> {
    source: &'a str,
    tokens: VecDeque<XmlToken>,
}

impl<'a> XmlStream<'a> {
    /// Tokenize `source`. Malformed XML fails as a whole.
    pub fn new(source: &'a str) -> Result<Self> {
        let tokens = tokenize(source)?;
        Ok(Self { source, tokens })
    }

    #[inline]
    pub fn source(&self) -> &'a str {
        self.source
    }

    #[inline]
    pub fn peek(&self) -> Option<&XmlToken> {
        self.tokens.front()
    }

    #[inline]
    pub fn next(&mut self) -> Option<XmlToken> {
        self.tokens.pop_front()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Whether the next token closes the current element (or nothing is left).
    pub fn at_end_of_element(&self) -> bool {
        self.peek().is_none_or(XmlToken::is_end)
    }

    /// After a start token has been consumed, consume everything up to and
    /// including its matching end token. Returns the byte offset just past
    /// that end tag.
    pub fn skip_past_end(&mut self) -> usize {
        let mut depth = 0usize;
        while let Some(token) = self.next() {
            match token.kind {
                XmlTokenKind::Start { .. } => depth += 1,
                XmlTokenKind::End { .. } if depth == 0 => return token.end,
                XmlTokenKind::End { .. } => depth -= 1,
                XmlTokenKind::Text(_) => {},
            }
        }
        self.source.len()
    }

    /// Consume the next element (start, content and end) if one is next.
    pub fn skip_element(&mut self) {
        if self.peek().is_some_and(XmlToken::is_start) {
            self.next();
            self.skip_past_end();
        }
    }

    /// Concatenated text up to the end of the current element; nested
    /// elements are skipped. The end token is consumed.
    pub fn read_text(&mut self) -> String {
        let mut text = String::new();
        while let Some(token) = self.next() {
            match token.kind {
                XmlTokenKind::Text(t) => text.push_str(&t),
                XmlTokenKind::Start { .. } => {
                    self.skip_past_end();
                },
                XmlTokenKind::End { .. } => break,
            }
        }
        text
    }

    /// Source text between two byte offsets.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or("")
    }

    /// 1-based line and column where `token` starts.
    pub fn line_column(&self, token: &XmlToken) -> (usize, usize) {
        line_column(self.source, token.start)
    }
}

fn xml_error(source: &str, offset: u64, message: impl Into<String>) -> Error {
    let (line, column) = line_column(source, offset as usize);
    Error::Xml {
        message: message.into(),
        line,
        column,
    }
}

fn start_token(source: &str, e: &BytesStart, end: usize) -> Result<XmlToken> {
    let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| xml_error(source, end as u64, err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
        let value = unescape_xml(std::str::from_utf8(&attr.value)?);
        attributes.push((key, value));
    }
    // Attribute values cannot contain a raw '<', so the last one before the
    // end of the tag opens it.
    let start = memchr::memrchr(b'<', &source.as_bytes()[..end]).unwrap_or(0);
    Ok(XmlToken {
        kind: XmlTokenKind::Start { name, attributes },
        start,
        end,
    })
}

/// Character for an entity or character reference name (`amp`, `#x3C;`).
fn resolve_reference(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = name.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        },
    }
}

fn push_text(tokens: &mut VecDeque<XmlToken>, text: &str, start: usize, end: usize) {
    if let Some(XmlToken {
        kind: XmlTokenKind::Text(previous),
        end: previous_end,
        ..
    }) = tokens.back_mut()
    {
        if *previous_end == start {
            previous.push_str(text);
            *previous_end = end;
            return;
        }
    }
    tokens.push_back(XmlToken {
        kind: XmlTokenKind::Text(text.to_string()),
        start,
        end,
    });
}

fn tokenize(source: &str) -> Result<VecDeque<XmlToken>> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(256);
    let mut tokens = VecDeque::new();
    let mut depth = 0usize;

    loop {
        buf.clear();
        let before = reader.buffer_position() as usize;
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|e| xml_error(source, reader.error_position() as u64, e.to_string()))?;
        let after = reader.buffer_position() as usize;
        match event {
            Event::Start(ref e) => {
                depth += 1;
                if depth > MAX_DEPTH {
                    return Err(xml_error(
                        source,
                        before as u64,
                        format!("maximum nesting depth {} exceeded", MAX_DEPTH),
                    ));
                }
                tokens.push_back(start_token(source, e, after)?);
            },
            Event::Empty(ref e) => {
                let token = start_token(source, e, after)?;
                let name = token.name().unwrap_or_default().to_string();
                tokens.push_back(token);
                tokens.push_back(XmlToken {
                    kind: XmlTokenKind::End { name },
                    start: after,
                    end: after,
                });
            },
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let name = std::str::from_utf8(e.local_name().as_ref())?.to_string();
                let start = memchr::memrchr(b'<', &source.as_bytes()[..after]).unwrap_or(before);
                tokens.push_back(XmlToken {
                    kind: XmlTokenKind::End { name },
                    start,
                    end: after,
                });
            },
            Event::Text(ref e) => {
                let raw = std::str::from_utf8(e)?;
                // Whitespace between references belongs to the text.
                let continues_text = matches!(
                    tokens.back(),
                    Some(XmlToken { kind: XmlTokenKind::Text(_), end, .. }) if *end == before
                );
                if continues_text || !raw.trim().is_empty() {
                    push_text(&mut tokens, &unescape_xml(raw), before, after);
                }
            },
            Event::CData(ref e) => {
                let raw = std::str::from_utf8(e)?;
                push_text(&mut tokens, raw, before, after);
            },
            Event::GeneralRef(ref e) => {
                let name = std::str::from_utf8(e)?;
                let Some(c) = resolve_reference(name) else {
                    return Err(xml_error(
                        source,
                        before as u64,
                        format!("unknown entity '&{};'", name),
                    ));
                };
                let mut utf8 = [0u8; 4];
                push_text(&mut tokens, c.encode_utf8(&mut utf8), before, after);
            },
            Event::Eof => break,
            // Declarations, comments and processing instructions carry no math.
            _ => {},
        }
    }

    if depth != 0 {
        return Err(xml_error(
            source,
            source.len() as u64,
            "unclosed element at end of document",
        ));
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_elements_expand_to_start_and_end() {
        let mut stream = XmlStream::new("<apply><plus/><ci> x </ci></apply>").unwrap();
        let names: Vec<_> = std::iter::from_fn(|| stream.next())
            .map(|t| match t.kind {
                XmlTokenKind::Start { name, .. } => format!("<{}>", name),
                XmlTokenKind::End { name } => format!("</{}>", name),
                XmlTokenKind::Text(text) => text,
            })
            .collect();
        assert_eq!(
            names,
            ["<apply>", "<plus>", "</plus>", "<ci>", " x ", "</ci>", "</apply>"]
        );
    }

    #[test]
    fn attributes_and_references() {
        let mut stream =
            XmlStream::new(r#"<ci definitionURL="a&amp;b"> x &lt; y&#x41; </ci>"#).unwrap();
        let start = stream.next().unwrap();
        assert_eq!(start.attribute("definitionURL"), Some("a&b"));
        assert_eq!(stream.read_text().trim(), "x < yA");
        assert!(stream.is_empty());
    }

    #[test]
    fn skipping_and_slicing() {
        let src = "<semantics><ci>x</ci><annotation encoding=\"text\">note</annotation></semantics>";
        let mut stream = XmlStream::new(src).unwrap();
        stream.next();
        stream.skip_element();
        let annotation = stream.next().unwrap();
        let end = stream.skip_past_end();
        assert_eq!(
            stream.slice(annotation.start, end),
            "<annotation encoding=\"text\">note</annotation>"
        );
        assert!(stream.at_end_of_element());
    }

    #[test]
    fn positions() {
        let src = "<math>\n  <cn>1</cn>\n</math>";
        let mut stream = XmlStream::new(src).unwrap();
        stream.next();
        let cn = stream.next().unwrap();
        assert_eq!(stream.line_column(&cn), (2, 3));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        assert!(matches!(
            XmlStream::new("<apply><plus/></times>"),
            Err(Error::Xml { .. })
        ));
        assert!(XmlStream::new("<apply>").is_err());
    }
}
