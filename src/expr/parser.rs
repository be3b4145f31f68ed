//! Recursive-descent parser with precedence climbing.
//!
//! # Grammar
//!
//! ```text
//! rule      := 'return'? expr ';'? EOF
//! script    := statement? (';' statement?)* EOF
//! statement := 'return'? (path '=' expr | expr)
//! expr      := unary (binop unary)*            precedence: || < && < ==,!= < <,<=,>,>=
//! unary     := '!' unary | '-' unary | primary
//! primary   := number | string | true | false | null
//!            | path ('(' (expr (',' expr)*)? ')')?
//!            | '(' expr ')'
//! path      := ident ('.' ident)*
//! ```

use crate::expr::lexer::{tokenize, Token, TokenKind};
use crate::expr::ExprError;
use crate::store::path::StorePath;
use crate::store::value::Value;

/// Name the interacted element is bound to inside action scripts.
pub const CONTEXT_PARAM: &str = "o";

/// Deepest expression tree the parser will build. Every unary operator,
/// binary operator, call and parenthesised group counts as one level.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinaryOp {
    const fn precedence(self) -> u8 {
        match self {
            Self::Or => 1,
            Self::And => 2,
            Self::Eq | Self::Ne => 3,
            Self::Lt | Self::Le | Self::Gt | Self::Ge => 4,
        }
    }

    fn from_token(kind: &TokenKind) -> Option<Self> {
        Some(match kind {
            TokenKind::OrOr => Self::Or,
            TokenKind::AndAnd => Self::And,
            TokenKind::EqEq => Self::Eq,
            TokenKind::NotEq => Self::Ne,
            TokenKind::Lt => Self::Lt,
            TokenKind::Le => Self::Le,
            TokenKind::Gt => Self::Gt,
            TokenKind::Ge => Self::Ge,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Path(StorePath),
    /// The interacted element (`o`).
    Context,
    Not(Box<Expr>),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Assign { target: StorePath, value: Expr },
    Eval(Expr),
}

/// Parses a visibility rule. A leading `return` is optional and does not
/// change the result.
pub fn parse_rule(source: &str) -> Result<Expr, ExprError> {
    let mut parser = Parser::new(source)?;
    parser.eat(&TokenKind::Return);
    let expr = parser.expression(0)?;
    parser.eat(&TokenKind::Semicolon);
    parser.expect_end()?;
    Ok(expr)
}

/// Parses an action script into statements. An empty script parses to no
/// statements.
pub fn parse_script(source: &str) -> Result<Vec<Statement>, ExprError> {
    let mut parser = Parser::new(source)?;
    let mut statements = Vec::new();
    loop {
        if parser.eat(&TokenKind::Semicolon) {
            continue;
        }
        if parser.peek() == &TokenKind::Eof {
            return Ok(statements);
        }
        statements.push(parser.statement()?);
        if !parser.eat(&TokenKind::Semicolon) {
            parser.expect_end()?;
            return Ok(statements);
        }
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn new(source: &str) -> Result<Self, ExprError> {
        Ok(Self {
            tokens: tokenize(source)?,
            pos: 0,
            depth: 0,
        })
    }

    fn current(&self) -> &Token {
        // tokenize always ends with Eof and the parser never advances past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, what: &str) -> Result<(), ExprError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        if self.peek() == &TokenKind::Eof {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        let token = self.current();
        let found = match &token.kind {
            TokenKind::Eof => "end of input".to_string(),
            other => format!("{other:?}"),
        };
        ExprError::at(token.offset, format!("expected {expected}, found {found}"))
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        if self.depth >= MAX_DEPTH {
            return Err(ExprError::at(
                self.current().offset,
                "expression nested too deeply",
            ));
        }
        self.depth += 1;
        Ok(())
    }

    fn statement(&mut self) -> Result<Statement, ExprError> {
        self.eat(&TokenKind::Return);
        let expr = self.expression(0)?;
        if self.peek() == &TokenKind::Assign {
            let offset = self.current().offset;
            self.advance();
            let Expr::Path(target) = expr else {
                return Err(ExprError::at(offset, "left side of `=` must be a store path"));
            };
            let value = self.expression(0)?;
            return Ok(Statement::Assign { target, value });
        }
        Ok(Statement::Eval(expr))
    }

    fn expression(&mut self, min_prec: u8) -> Result<Expr, ExprError> {
        let entered = self.depth;
        let mut left = self.unary()?;
        while let Some(op) = BinaryOp::from_token(self.peek()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            // each operator deepens the left-leaning tree by one
            self.descend()?;
            let right = self.expression(prec + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }
        self.depth = entered;
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.eat(&TokenKind::Bang) {
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner)));
        }
        if self.eat(&TokenKind::Minus) {
            self.descend()?;
            let inner = self.unary()?;
            self.depth -= 1;
            return Ok(Expr::Neg(Box::new(inner)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        let start = self.pos;
        let token = self.advance();
        match token.kind {
            TokenKind::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            TokenKind::Str(s) => Ok(Expr::Literal(Value::Text(s))),
            TokenKind::True => Ok(Expr::Literal(Value::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Value::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Value::Null)),
            TokenKind::LParen => {
                self.descend()?;
                let inner = self.expression(0)?;
                self.depth -= 1;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::Ident(first) => self.path_or_call(first, token.offset),
            _ => {
                self.pos = start;
                Err(self.unexpected("a value"))
            }
        }
    }

    fn path_or_call(&mut self, first: String, offset: usize) -> Result<Expr, ExprError> {
        let mut segments = vec![first];
        while self.eat(&TokenKind::Dot) {
            if let TokenKind::Ident(segment) = self.peek() {
                segments.push(segment.clone());
                self.advance();
            } else {
                return Err(self.unexpected("a property name after `.`"));
            }
        }

        if self.eat(&TokenKind::LParen) {
            self.descend()?;
            let mut args = Vec::new();
            if !self.eat(&TokenKind::RParen) {
                loop {
                    args.push(self.expression(0)?);
                    if self.eat(&TokenKind::RParen) {
                        break;
                    }
                    self.expect(&TokenKind::Comma, "`,` or `)`")?;
                }
            }
            self.depth -= 1;
            return Ok(Expr::Call {
                name: segments.join("."),
                args,
            });
        }

        if segments.len() == 1 && segments[0] == CONTEXT_PARAM {
            return Ok(Expr::Context);
        }
        if segments[0] == CONTEXT_PARAM {
            return Err(ExprError::at(
                offset,
                format!("properties of `{CONTEXT_PARAM}` are not accessible"),
            ));
        }
        Ok(Expr::Path(StorePath::from_segments(segments)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(s: &str) -> Expr {
        Expr::Path(s.parse().unwrap())
    }

    #[test]
    fn return_prefix_is_equivalent() {
        assert_eq!(parse_rule("a.b && !c").unwrap(), parse_rule("return a.b && !c;").unwrap());
    }

    #[test]
    fn and_binds_tighter_than_or() {
        let expr = parse_rule("a || b && c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(path("a")),
                right: Box::new(Expr::Binary {
                    op: BinaryOp::And,
                    left: Box::new(path("b")),
                    right: Box::new(path("c")),
                }),
            }
        );
    }

    #[test]
    fn comparison_binds_tighter_than_equality() {
        let expr = parse_rule("a < 3 == true").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn parentheses_override_precedence() {
        let expr = parse_rule("(a || b) && c").unwrap();
        assert!(matches!(expr, Expr::Binary { op: BinaryOp::And, .. }));
    }

    #[test]
    fn rejects_trailing_garbage_and_dangling_operators() {
        assert!(parse_rule("a b").is_err());
        assert!(parse_rule("a &&").is_err());
        assert!(parse_rule("").is_err());
        assert!(parse_rule("(a").is_err());
        assert!(parse_rule("a.").is_err());
    }

    #[test]
    fn script_statements() {
        let statements = parse_script("audio.music = !audio.music; close(o, 'menu');").unwrap();
        assert_eq!(statements.len(), 2);
        assert!(matches!(&statements[0], Statement::Assign { target, .. } if target.to_string() == "audio.music"));
        match &statements[1] {
            Statement::Eval(Expr::Call { name, args }) => {
                assert_eq!(name, "close");
                assert_eq!(args, &vec![Expr::Context, Expr::Literal(Value::from("menu"))]);
            }
            other => panic!("unexpected statement {other:?}"),
        }
    }

    #[test]
    fn empty_script_has_no_statements() {
        assert!(parse_script("").unwrap().is_empty());
        assert!(parse_script(" ; ; ").unwrap().is_empty());
    }

    #[test]
    fn assignment_target_must_be_path() {
        assert!(parse_script("1 = 2").is_err());
        assert!(parse_script("a = ").is_err());
    }

    #[test]
    fn nesting_is_capped() {
        let shallow = format!("{}true", "!".repeat(MAX_DEPTH));
        assert!(parse_rule(&shallow).is_ok());

        for source in [
            format!("{}true", "!".repeat(MAX_DEPTH + 1)),
            format!("{}1", "-".repeat(200_000)),
            format!("{}a{}", "(".repeat(200_000), ")".repeat(200_000)),
            format!("a{}", " || a".repeat(200_000)),
        ] {
            let err = parse_rule(&source).unwrap_err();
            assert!(err.message.contains("nested too deeply"), "{err}");
        }

        let script = format!("{}o{}", "f(".repeat(200_000), ")".repeat(200_000));
        assert!(parse_script(&script).is_err());
    }

    #[test]
    fn long_flat_scripts_are_not_nesting() {
        let script = "a = 1;".repeat(MAX_DEPTH * 2);
        assert_eq!(parse_script(&script).unwrap().len(), MAX_DEPTH * 2);
    }

    #[test]
    fn context_properties_rejected() {
        assert!(parse_script("o.visible = false").is_err());
    }
}
