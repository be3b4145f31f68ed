//! Sandboxed expression language for visibility rules and row actions.
//!
//! Rules are single boolean expressions over store paths. Actions are
//! `;`-separated statements that may assign store paths or call handlers
//! registered by the host. Nothing outside the store and the registry is
//! reachable from either.
//!
//! Text is tokenized by [`lexer`], parsed by [`parser`] and turned into
//! closures by [`compile`] once, at build time.

pub mod compile;
pub mod lexer;
pub mod parser;

pub use compile::{CompiledRule, CompiledScript, Scope};
pub use parser::{parse_rule, parse_script, Expr, Statement};

use thiserror::Error;

/// Failure to tokenize, parse, compile or evaluate an expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}{}", .offset.map(|o| format!(" (at offset {o})")).unwrap_or_default())]
pub struct ExprError {
    pub offset: Option<usize>,
    pub message: String,
}

impl ExprError {
    /// An error tied to a byte offset in the source text.
    pub fn at(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset: Some(offset),
            message: message.into(),
        }
    }

    /// An error raised while evaluating, with no source position.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            offset: None,
            message: message.into(),
        }
    }
}
