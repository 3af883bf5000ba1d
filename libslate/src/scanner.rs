//! Tokenization of live equation-field exports.
//!
//! The equation editor exports a definition as plain text in the shape
//! `f(z)=z+1`. One anchored pattern splits the declaration from the body;
//! a second pattern cuts the body into the five mutually exclusive token
//! categories the walker consumes. A purely lexical post-pass re-splits
//! the sign of a negative number that directly follows an operand, so
//! `x-2` subtracts instead of scanning the literal `-2`.

pub mod types;
pub use types::{Token, TokenKind};

use crate::common::Span;
use crate::diagnostics::{Diagnostic, ParseError};

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Matches a function definition in the form `f(z)=z+1`, capturing the
    // function name, the parameter name, and the body text. Names are
    // letter/backslash sequences with an optional subscript.
    static ref DEFINITION: Regex = Regex::new(
        r"^([a-zA-Z\\]+(?:_[a-zA-Z0-9,]+)?)\*? ?\(([a-zA-Z\\]+(?:_[a-zA-Z0-9,\\]+)?)\) ?= ?(.*)$"
    )
    .unwrap();

    // Matches one body token, capturing exactly one of:
    //   1 - a decimal number (2 - its imaginary-unit marker, if any)
    //   3 - a multi-character name with its exported trailing separator
    //   4 - a single-character name with an optional subscript
    //   5 - an arithmetic operator or the exponent
    //   6 - a parenthesis
    static ref TOKEN: Regex = Regex::new(
        r"(-?\d+(?:\.\d+)?)(\*i)?|([a-zA-Z0-9]{2,} (?:_\([^)]+\)|_[a-zA-Z0-9])?)|([a-zA-Z](?:_\([^)]+\)|_[a-zA-Z0-9])?)|([+\-*/^])|([()])"
    )
    .unwrap();
}

/// A scanned function definition: the declared names plus the body tokens.
#[derive(Clone, Debug, PartialEq)]
pub struct ScannedDefinition {
    /// The declared function name.
    pub name: String,
    /// The declared parameter name.
    pub parameter: String,
    /// The tokenized body. Token spans index into the original input.
    pub body: Vec<Token>,
}

/// Splits an equation-field export into its declaration and body tokens.
pub fn scan_definition(text: &str) -> Result<ScannedDefinition, Diagnostic> {
    let captures = DEFINITION
        .captures(text)
        .ok_or_else(|| Diagnostic::new(ParseError::MalformedDefinition))?;
    match (captures.get(1), captures.get(2), captures.get(3)) {
        (Some(name), Some(parameter), Some(body)) => Ok(ScannedDefinition {
            name: name.as_str().to_string(),
            parameter: parameter.as_str().to_string(),
            body: scan_at(body.as_str(), body.start()),
        }),
        _ => Err(Diagnostic::new(ParseError::MalformedDefinition)),
    }
}

/// Tokenizes a bare expression fragment. Used for the body of a scanned
/// definition and for re-entrant sub-parses of raw fraction and exponent
/// text.
pub fn scan_fragment(text: &str) -> Vec<Token> {
    scan_at(text, 0)
}

fn scan_at(text: &str, offset: usize) -> Vec<Token> {
    let mut tokens = Vec::new();
    for captures in TOKEN.captures_iter(text) {
        let span = match captures.get(0) {
            Some(whole) => Span::from(whole.start()..whole.end()).offset(offset),
            None => continue,
        };
        let kind = if let Some(number) = captures.get(1) {
            TokenKind::Number {
                text: number.as_str().to_string(),
                imaginary: captures.get(2).is_some(),
            }
        } else if let Some(multi) = captures.get(3) {
            let mut parts = multi.as_str().splitn(2, ' ');
            let name = parts.next().unwrap_or_default().to_string();
            let subscript = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
            TokenKind::MultiName { name, subscript }
        } else if let Some(single) = captures.get(4) {
            let raw = single.as_str();
            let name = raw[..1].to_string();
            let subscript = if raw.len() > 1 {
                Some(raw[1..].to_string())
            } else {
                None
            };
            TokenKind::SingleName { name, subscript }
        } else if let Some(op) = captures.get(5).and_then(|m| m.as_str().chars().next()) {
            TokenKind::Op(op)
        } else if let Some(paren) = captures.get(6).and_then(|m| m.as_str().chars().next()) {
            TokenKind::Paren(paren)
        } else {
            continue;
        };
        tokens.push(Token::new(kind, span));
    }
    resplit_signs(tokens)
}

/// Splits the sign off a signed number that directly follows an operand or
/// a closing parenthesis, turning it back into a binary operator token.
fn resplit_signs(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        let split = match (&token.kind, out.last().map(|t| &t.kind)) {
            (TokenKind::Number { text, .. }, Some(prev)) if text.starts_with('-') => matches!(
                prev,
                TokenKind::Number { .. }
                    | TokenKind::MultiName { .. }
                    | TokenKind::SingleName { .. }
                    | TokenKind::Paren(')')
            ),
            _ => false,
        };
        if let (true, TokenKind::Number { text, imaginary }) = (split, &token.kind) {
            out.push(Token::new(
                TokenKind::Op('-'),
                token.span.lo..token.span.lo + 1,
            ));
            out.push(Token::new(
                TokenKind::Number {
                    text: text[1..].to_string(),
                    imaginary: *imaginary,
                },
                token.span.lo + 1..token.span.hi,
            ));
        } else {
            out.push(token);
        }
    }
    out
}
