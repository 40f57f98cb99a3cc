//! Tokenizer shared by the Level 1 and Level 3 infix parsers.

use crate::common::{Error, Result};

/// Deepest nesting of groups, calls and prefix operators a parser accepts.
pub(crate) const MAX_NESTING: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Integer(i64),
    Real(f64),
    RealE { mantissa: f64, exponent: i64 },
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    LParen,
    RParen,
    Comma,
    Bang,
    AndAnd,
    OrOr,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Eof,
}

impl TokenKind {
    /// Text used in error messages.
    pub(crate) fn describe(&self) -> String {
        let s = match self {
            TokenKind::Integer(v) => return format!("number '{}'", v),
            TokenKind::Real(v) => return format!("number '{}'", v),
            TokenKind::RealE { mantissa, exponent } => {
                return format!("number '{}e{}'", mantissa, exponent);
            },
            TokenKind::Ident(name) => return format!("'{}'", name),
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Percent => "'%'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Bang => "'!'",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::Eof => "end of formula",
        };
        s.to_string()
    }
}

/// A token with its 1-based position and byte span.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Token {
    /// Whether `next` starts exactly where this token ends.
    #[inline]
    pub(crate) fn touches(&self, next: &Token) -> bool {
        self.end == next.start
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

/// Split a formula into tokens. The last token is always `Eof`.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer {
        src,
        pos: 0,
        line: 1,
        column: 1,
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let eof = token.kind == TokenKind::Eof;
        tokens.push(token);
        if eof {
            return Ok(tokens);
        }
    }
}

impl<'a> Lexer<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();
        let (line, column, start) = (self.line, self.column, self.pos);
        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                line,
                column,
                start,
                end: start,
            });
        };

        let starts_number =
            c.is_ascii_digit() || (c == '.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()));
        let kind = if starts_number {
            self.number(line, column)?
        } else if c.is_alphabetic() || c == '_' {
            self.identifier()
        } else {
            self.bump();
            match c {
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '^' => TokenKind::Caret,
                '%' => TokenKind::Percent,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                ',' => TokenKind::Comma,
                '!' if self.eat('=') => TokenKind::NotEq,
                '!' => TokenKind::Bang,
                '&' if self.eat('&') => TokenKind::AndAnd,
                '|' if self.eat('|') => TokenKind::OrOr,
                '=' if self.eat('=') => TokenKind::EqEq,
                '<' if self.eat('=') => TokenKind::Le,
                '<' => TokenKind::Lt,
                '>' if self.eat('=') => TokenKind::Ge,
                '>' => TokenKind::Gt,
                other => {
                    return Err(Error::syntax(
                        format!("unexpected character '{}'", other),
                        line,
                        column,
                    ));
                },
            }
        };
        Ok(Token {
            kind,
            line,
            column,
            start,
            end: self.pos,
        })
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn identifier(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        TokenKind::Ident(self.src[start..self.pos].to_string())
    }

    fn digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
    }

    fn number(&mut self, line: usize, column: usize) -> Result<TokenKind> {
        let src = self.src;
        let start = self.pos;
        self.digits();
        let mut is_real = false;
        if self.peek() == Some('.') {
            is_real = true;
            self.bump();
            self.digits();
        }
        let mantissa_end = self.pos;

        // An exponent needs at least one digit; otherwise `e` starts the
        // next token (units, for example).
        let has_exponent = matches!(self.peek(), Some('e' | 'E'))
            && match self.peek_at(1) {
                Some(d) if d.is_ascii_digit() => true,
                Some('+' | '-') => self.peek_at(2).is_some_and(|d| d.is_ascii_digit()),
                _ => false,
            };

        let mantissa_text = &src[start..mantissa_end];
        let bad_number =
            || Error::syntax(format!("malformed number '{}'", mantissa_text), line, column);

        if has_exponent {
            self.bump();
            let exp_start = self.pos;
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.digits();
            let exponent_text = &src[exp_start..self.pos];
            let mantissa: f64 = fast_float2::parse(mantissa_text).map_err(|_| bad_number())?;
            let exponent: i64 = exponent_text.parse().map_err(|_| {
                Error::syntax(
                    format!("exponent '{}' out of range", exponent_text),
                    line,
                    column,
                )
            })?;
            return Ok(TokenKind::RealE { mantissa, exponent });
        }

        if is_real {
            return fast_float2::parse(mantissa_text)
                .map(TokenKind::Real)
                .map_err(|_| bad_number());
        }
        match mantissa_text.parse::<i64>() {
            Ok(v) => Ok(TokenKind::Integer(v)),
            // Integers beyond i64 are kept as reals.
            Err(_) => fast_float2::parse(mantissa_text)
                .map(TokenKind::Real)
                .map_err(|_| bad_number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("a<=b && !c || d != e % 2"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Le,
                TokenKind::Ident("b".into()),
                TokenKind::AndAnd,
                TokenKind::Bang,
                TokenKind::Ident("c".into()),
                TokenKind::OrOr,
                TokenKind::Ident("d".into()),
                TokenKind::NotEq,
                TokenKind::Ident("e".into()),
                TokenKind::Percent,
                TokenKind::Integer(2),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(kinds("42")[0], TokenKind::Integer(42));
        assert_eq!(kinds("4.25")[0], TokenKind::Real(4.25));
        assert_eq!(kinds(".5")[0], TokenKind::Real(0.5));
        assert_eq!(
            kinds("1.5e-3")[0],
            TokenKind::RealE {
                mantissa: 1.5,
                exponent: -3
            }
        );
        assert_eq!(
            kinds("2e"),
            vec![
                TokenKind::Integer(2),
                TokenKind::Ident("e".into()),
                TokenKind::Eof
            ]
        );
        assert_eq!(kinds("99999999999999999999")[0], TokenKind::Real(1e20));
    }

    #[test]
    fn positions_and_adjacency() {
        let tokens = tokenize("x +\n  (1/2)").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].column), (2, 3));
        assert!(tokens[2].touches(&tokens[3]));
        assert!(!tokens[0].touches(&tokens[1]));
    }

    #[test]
    fn bad_characters_are_syntax_errors() {
        let err = tokenize("a = b").unwrap_err();
        assert_eq!(err.position(), Some((1, 3)));
        assert!(tokenize("a & b").is_err());
        assert!(tokenize("a $ b").is_err());
    }
}
