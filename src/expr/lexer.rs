//! Tokenizer for rule and action expressions.

use crate::expr::ExprError;
use crate::store::path::{is_ident_continue, is_ident_start};

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Str(String),
    Ident(String),
    True,
    False,
    Null,
    Return,
    Dot,
    Comma,
    Semicolon,
    LParen,
    RParen,
    Bang,
    Minus,
    Assign,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Eof,
}

/// A token and the byte offset it starts at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Splits `source` into tokens, ending with [`TokenKind::Eof`].
///
/// `===` and `!==` are accepted as spellings of `==` and `!=`.
pub fn tokenize(source: &str) -> Result<Vec<Token>, ExprError> {
    let mut lexer = Lexer {
        source,
        chars: source.char_indices().peekable(),
    };
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

struct Lexer<'a> {
    source: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
}

impl Lexer<'_> {
    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek().map(|&(_, c)| c) == Some(expected) {
            self.chars.next();
            true
        } else {
            false
        }
    }

    fn next_token(&mut self) -> Result<Token, ExprError> {
        while self.chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
            self.chars.next();
        }

        let Some((offset, c)) = self.chars.next() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset: self.source.len(),
            });
        };

        let kind = match c {
            '.' if self.chars.peek().is_some_and(|&(_, n)| n.is_ascii_digit()) => {
                self.number(offset)?
            }
            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '-' => TokenKind::Minus,
            '!' if self.eat('=') => {
                self.eat('=');
                TokenKind::NotEq
            }
            '!' => TokenKind::Bang,
            '=' if self.eat('=') => {
                self.eat('=');
                TokenKind::EqEq
            }
            '=' => TokenKind::Assign,
            '<' if self.eat('=') => TokenKind::Le,
            '<' => TokenKind::Lt,
            '>' if self.eat('=') => TokenKind::Ge,
            '>' => TokenKind::Gt,
            '&' if self.eat('&') => TokenKind::AndAnd,
            '|' if self.eat('|') => TokenKind::OrOr,
            '"' | '\'' => self.string(offset, c)?,
            c if c.is_ascii_digit() => self.number(offset)?,
            c if is_ident_start(c) => self.word(offset),
            other => {
                return Err(ExprError::at(offset, format!("unexpected character `{other}`")));
            }
        };

        Ok(Token { kind, offset })
    }

    fn number(&mut self, start: usize) -> Result<TokenKind, ExprError> {
        let mut end = start + 1;
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        let text = &self.source[start..end];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| ExprError::at(start, format!("invalid number `{text}`")))
    }

    fn string(&mut self, start: usize, quote: char) -> Result<TokenKind, ExprError> {
        let mut value = String::new();
        while let Some((_, c)) = self.chars.next() {
            match c {
                c if c == quote => return Ok(TokenKind::Str(value)),
                '\\' => match self.chars.next() {
                    Some((_, 'n')) => value.push('\n'),
                    Some((_, 't')) => value.push('\t'),
                    Some((_, escaped)) => value.push(escaped),
                    None => break,
                },
                c => value.push(c),
            }
        }
        Err(ExprError::at(start, "unterminated string literal"))
    }

    fn word(&mut self, start: usize) -> TokenKind {
        let mut end = start + 1;
        while let Some(&(i, c)) = self.chars.peek() {
            if is_ident_continue(c) {
                end = i + c.len_utf8();
                self.chars.next();
            } else {
                break;
            }
        }
        match &self.source[start..end] {
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "null" | "undefined" => TokenKind::Null,
            "return" => TokenKind::Return,
            ident => TokenKind::Ident(ident.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_operators() {
        assert_eq!(
            kinds("!a == b !== c && d || e <= 1"),
            vec![
                TokenKind::Bang,
                TokenKind::Ident("a".into()),
                TokenKind::EqEq,
                TokenKind::Ident("b".into()),
                TokenKind::NotEq,
                TokenKind::Ident("c".into()),
                TokenKind::AndAnd,
                TokenKind::Ident("d".into()),
                TokenKind::OrOr,
                TokenKind::Ident("e".into()),
                TokenKind::Le,
                TokenKind::Number(1.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn keywords_are_whole_words() {
        assert_eq!(
            kinds("return returned"),
            vec![
                TokenKind::Return,
                TokenKind::Ident("returned".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn strings_support_both_quotes_and_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "two""#),
            vec![
                TokenKind::Str("it's".into()),
                TokenKind::Str("two".into()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn numbers_with_fractions() {
        assert_eq!(
            kinds("1.5 .25"),
            vec![TokenKind::Number(1.5), TokenKind::Number(0.25), TokenKind::Eof]
        );
    }

    #[test]
    fn rejects_single_ampersand_and_stray_characters() {
        assert!(tokenize("a & b").is_err());
        assert!(tokenize("a # b").is_err());
        assert!(tokenize("'open").is_err());
    }

    #[test]
    fn records_offsets() {
        let tokens = tokenize("  ab").unwrap();
        assert_eq!(tokens[0].offset, 2);
        assert_eq!(tokens[1].offset, 4);
    }
}
