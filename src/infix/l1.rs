//! Level 1 infix grammar.
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := factor (("*" | "/") factor)*
//! factor  := unary ("^" unary)*
//! unary   := "-" unary | primary
//! primary := NUMBER | IDENT "(" (expr ("," expr)*)? ")" | IDENT | "(" expr ")"
//! ```
//!
//! Every binary operator nests to the left, `^` included, and unary minus
//! binds tighter than `^`. Calls and names are built generically and then
//! canonicalized, so `log(x)` is the natural logarithm here.

use super::lexer::{MAX_NESTING, Token, TokenKind, tokenize};
use crate::ast::{AstNode, AstType};
use crate::common::{Error, Result};

/// Parse a Level 1 formula.
pub fn parse_l1(text: &str) -> Result<AstNode> {
    let mut parser = Parser {
        tokens: tokenize(text)?,
        pos: 0,
        depth: 0,
    };
    if parser.peek().kind == TokenKind::Eof {
        return Err(parser.error_here("empty formula"));
    }
    let mut node = parser.parse_expr()?;
    if parser.peek().kind != TokenKind::Eof {
        let found = parser.peek().kind.describe();
        return Err(parser.error_here(format!("unexpected {}", found)));
    }
    node.canonicalize();
    Ok(node)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
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

    fn parse_expr(&mut self) -> Result<AstNode> {
        let mut node = self.parse_term()?;
        loop {
            let ty = match self.peek().kind {
                TokenKind::Plus => AstType::Plus,
                TokenKind::Minus => AstType::Minus,
                _ => return Ok(node),
            };
            self.next();
            let rhs = self.parse_term()?;
            node = AstNode::new_binary(ty, node, rhs);
        }
    }

    fn parse_term(&mut self) -> Result<AstNode> {
        let mut node = self.parse_factor()?;
        loop {
            let ty = match self.peek().kind {
                TokenKind::Star => AstType::Times,
                TokenKind::Slash => AstType::Divide,
                _ => return Ok(node),
            };
            self.next();
            let rhs = self.parse_factor()?;
            node = AstNode::new_binary(ty, node, rhs);
        }
    }

    fn parse_factor(&mut self) -> Result<AstNode> {
        let mut node = self.parse_unary()?;
        while self.peek().kind == TokenKind::Caret {
            self.next();
            let rhs = self.parse_unary()?;
            node = AstNode::new_binary(AstType::Power, node, rhs);
        }
        Ok(node)
    }

    /// Every nested group and prefix operator passes through here.
    fn parse_unary(&mut self) -> Result<AstNode> {
        if self.depth >= MAX_NESTING {
            return Err(self.error_here(format!("formula nested deeper than {}", MAX_NESTING)));
        }
        self.depth += 1;
        let node = if self.peek().kind == TokenKind::Minus {
            self.next();
            self.parse_unary()
                .map(|operand| AstNode::new_unary(AstType::Minus, operand))
        } else {
            self.parse_primary()
        };
        self.depth -= 1;
        node
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        let token = self.next();
        match token.kind {
            TokenKind::Integer(v) => Ok(AstNode::new_integer(v)),
            TokenKind::Real(v) => Ok(AstNode::new_real(v)),
            TokenKind::RealE { mantissa, exponent } => {
                Ok(AstNode::new_real_with_exponent(mantissa, exponent))
            },
            TokenKind::LParen => {
                let node = self.parse_expr()?;
                if self.peek().kind != TokenKind::RParen {
                    let found = self.peek().kind.describe();
                    return Err(self.error_here(format!("expected ')' but found {}", found)));
                }
                self.next();
                Ok(node)
            },
            TokenKind::Ident(name) => {
                if self.peek().kind != TokenKind::LParen {
                    return Ok(AstNode::new_name(name));
                }
                self.next();
                let args = self.parse_args()?;
                Ok(AstNode::new_function(name, args))
            },
            other => Err(Error::syntax(
                format!("unexpected {}", other.describe()),
                token.line,
                token.column,
            )),
        }
    }

    /// Arguments after the opening parenthesis, through the closing one.
    fn parse_args(&mut self) -> Result<Vec<AstNode>> {
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
}
