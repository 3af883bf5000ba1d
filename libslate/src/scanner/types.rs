//! Definitions of types used in the libslate scanner.

use crate::common::Span;
use core::fmt;

/// The category of a scanned token. The five categories are mutually
/// exclusive; every character run of the export belongs to at most one.
#[derive(PartialEq, Clone, Debug)]
pub enum TokenKind {
    /// A decimal number, optionally signed, optionally carrying the
    /// imaginary-unit marker.
    Number {
        /// The numeric text, sign included, marker excluded.
        text: String,
        /// Whether the imaginary-unit marker followed the number.
        imaginary: bool,
    },
    /// A multi-character name, which the equation editor exports with a
    /// trailing separator, optionally followed by a subscript.
    MultiName {
        /// The name, separator stripped.
        name: String,
        /// The raw subscript, leading underscore included.
        subscript: Option<String>,
    },
    /// A single-character name with an optional attached subscript.
    SingleName {
        /// The single letter.
        name: String,
        /// The raw subscript, leading underscore included.
        subscript: Option<String>,
    },
    /// One of the arithmetic operators `+ - * /` or the exponent `^`.
    Op(char),
    /// `(` or `)`.
    Paren(char),
}

/// A token scanned from an equation-field export.
#[derive(PartialEq, Clone, Debug)]
pub struct Token {
    /// The category and payload of the token.
    pub kind: TokenKind,
    /// The source span of the token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new<S: Into<Span>>(kind: TokenKind, span: S) -> Self {
        Self {
            kind,
            span: span.into(),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Number { text, imaginary } => {
                write!(f, "{}{}", text, if *imaginary { "i" } else { "" })
            }
            TokenKind::MultiName { name, subscript } | TokenKind::SingleName { name, subscript } => {
                match subscript {
                    Some(sub) => write!(f, "{}{}", name, sub),
                    None => write!(f, "{}", name),
                }
            }
            TokenKind::Op(c) | TokenKind::Paren(c) => write!(f, "{}", c),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}
