//! The live-edit token walk: postfix emission directly from scanned
//! tokens.
//!
//! The walk keeps one index cursor with one-token lookahead and lookback.
//! Binary operators emit continuation-style (walk the rest, then push the
//! operator); unary rewrites and unary operator names take exactly one
//! operand extent (an atom, an adjacent name run, or a balanced group), so
//! `-x + 1` multiplies only `x` by -1 and `sin(x)+1` applies `sin` to `x`
//! alone. On a closing parenthesis the walk records a skip target so the
//! frame that descended into the group resumes after it instead of
//! re-descending.

use crate::common::Span;
use crate::diagnostics::{Diagnostic, ParseError};
use crate::scanner::{Token, TokenKind};
use crate::stack::StackObject;
use crate::symbols::{self, SymbolTable};

use log::trace;

/// Identifier validation context: the declared parameter plus the known
/// global symbols. Re-entrant fragment walks run without one.
pub(crate) struct Validation<'a> {
    pub(crate) parameter: &'a str,
    pub(crate) symbols: &'a SymbolTable,
}

/// Walks a scanned token stream into a postfix stack.
pub(crate) fn walk<'a>(
    tokens: &'a [Token],
    validation: Option<&'a Validation<'a>>,
) -> Result<Vec<StackObject>, Diagnostic> {
    let mut walker = Walker {
        tokens,
        validation,
        out: Vec::new(),
        symbol: String::new(),
        skip_to: None,
    };
    walker.walk_from(0)?;
    Ok(walker.out)
}

struct Walker<'a> {
    tokens: &'a [Token],
    validation: Option<&'a Validation<'a>>,
    out: Vec<StackObject>,
    /// Letters accumulated towards a multi-character unary operator name.
    symbol: String,
    /// Resume target recorded by a closing parenthesis.
    skip_to: Option<usize>,
}

impl<'a> Walker<'a> {
    fn walk_from(&mut self, i: usize) -> Result<(), Diagnostic> {
        let token = match self.tokens.get(i) {
            Some(token) => token,
            None => return Ok(()),
        };

        match &token.kind {
            TokenKind::Paren(')') => {
                self.skip_to = Some(i + 1);
                Ok(())
            }
            TokenKind::Paren('(') => {
                if self.group_extent(i).is_none() {
                    return Err(Diagnostic::spanned(ParseError::MalformedBracket, token.span));
                }
                self.walk_from(i + 1)?;
                self.continue_from(i + 1)
            }
            TokenKind::Paren(_) => {
                Err(Diagnostic::spanned(ParseError::MalformedBracket, token.span))
            }
            TokenKind::Number { text, imaginary } => self.visit_number(i, text, *imaginary),
            TokenKind::MultiName { name, subscript } => {
                self.visit_multi_name(i, name, subscript.as_deref(), token.span)
            }
            TokenKind::SingleName { name, subscript } => {
                let next_accumulates = subscript.is_none()
                    && matches!(
                        self.tokens.get(i + 1).map(|t| &t.kind),
                        Some(TokenKind::SingleName {
                            subscript: None,
                            ..
                        })
                    );
                if next_accumulates {
                    self.symbol.push_str(name);
                    self.continue_from(i + 1)
                } else if !self.symbol.is_empty() {
                    self.visit_multisymbol(i, name, token.span)
                } else {
                    let full = match subscript {
                        Some(sub) => format!("{}{}", name, sub),
                        None => name.clone(),
                    };
                    self.visit_identifier(&full, token.span)?;
                    self.continue_from(i + 1)
                }
            }
            TokenKind::Op(op) => {
                let prev = i.checked_sub(1).and_then(|p| self.tokens.get(p));

                if *op == '-' && !operand_ends(prev.map(|t| &t.kind)) {
                    // unary minus at an expression boundary rewrites to a
                    // multiplication by -1
                    if let Some(extent) = self.operand_extent(i + 1) {
                        trace!("rewriting unary minus at {}", token.span);
                        self.out.push(StackObject::number("-1"));
                        self.subwalk(i + 1, i + 1 + extent)?;
                        self.out.push(StackObject::operator("*"));
                        return self.continue_from(i + 1 + extent);
                    }
                }

                if prev.is_none() || self.tokens.get(i + 1).is_none() {
                    return Err(Diagnostic::spanned(
                        ParseError::IncompleteBinaryOperation,
                        token.span,
                    ));
                }
                self.walk_from(i + 1)?;
                self.out.push(StackObject::operator(op.to_string()));
                Ok(())
            }
        }
    }

    /// The continuation point every non-returning case funnels into: if a
    /// closing parenthesis recorded a skip target, resume there, else at
    /// `next`.
    fn continue_from(&mut self, next: usize) -> Result<(), Diagnostic> {
        match self.skip_to.take() {
            Some(resume) if resume < self.tokens.len() => self.walk_from(resume),
            Some(_) => Ok(()),
            None => self.walk_from(next),
        }
    }

    fn visit_number(&mut self, i: usize, text: &str, imaginary: bool) -> Result<(), Diagnostic> {
        // signed complex coalescing: `a (+|-) b·i` becomes one NUMBER
        if !imaginary {
            if let (Some(sign), Some(imaginary_part)) =
                (self.sign_at(i + 1), self.imaginary_number_at(i + 2))
            {
                let value = format!("{}{}{}i", text, sign, imaginary_part);
                trace!("coalesced complex literal {}", value);
                self.out.push(StackObject::number(value));
                return self.continue_from(i + 3);
            }
        }

        let value = if imaginary {
            format!("{}i", text)
        } else {
            text.to_string()
        };
        self.out.push(StackObject::number(value));

        // a number directly followed by an operand multiplies it
        if let Some(extent) = self.operand_extent(i + 1) {
            self.subwalk(i + 1, i + 1 + extent)?;
            self.out.push(StackObject::operator("*"));
            return self.continue_from(i + 1 + extent);
        }
        self.continue_from(i + 1)
    }

    fn visit_multi_name(
        &mut self,
        i: usize,
        name: &str,
        subscript: Option<&str>,
        span: Span,
    ) -> Result<(), Diagnostic> {
        let full = match subscript {
            Some(sub) => format!("{}{}", name, sub),
            None => name.to_string(),
        };
        let recognized = self
            .validation
            .map(|v| full == v.parameter || v.symbols.is_global(&full))
            .unwrap_or(false);

        if recognized {
            self.visit_identifier(&full, span)?;
            self.continue_from(i + 1)
        } else if let Some((op, rem)) = symbols::match_unary_prefix(name) {
            if rem.is_empty() {
                self.apply_unary(op, i + 1)
            } else {
                // the editor fused the operator with its operand, e.g.
                // `sinGamma`: the remainder is the operand
                let rem_full = match subscript {
                    Some(sub) => format!("{}{}", rem, sub),
                    None => rem.to_string(),
                };
                self.visit_identifier(&rem_full, span)?;
                self.out.push(StackObject::operator(op));
                self.continue_from(i + 1)
            }
        } else if self.validation.is_none() {
            self.visit_identifier(&full, span)?;
            self.continue_from(i + 1)
        } else {
            Err(Diagnostic::spanned(ParseError::IllegalUnaryOperator, span))
        }
    }

    /// Resolves the accumulated letter run against the unary operator
    /// table, `last` included.
    fn visit_multisymbol(&mut self, i: usize, last: &str, span: Span) -> Result<(), Diagnostic> {
        self.symbol.push_str(last);
        let symbol = std::mem::take(&mut self.symbol);
        trace!("resolving accumulated symbol {:?}", symbol);
        match symbols::match_unary_prefix(&symbol) {
            Some((op, rem)) if rem.is_empty() => self.apply_unary(op, i + 1),
            Some((op, rem)) => {
                let rem = rem.to_string();
                self.visit_identifier(&rem, span)?;
                self.out.push(StackObject::operator(op));
                self.continue_from(i + 1)
            }
            None => Err(Diagnostic::spanned(ParseError::IllegalUnaryOperator, span)),
        }
    }

    /// Emits a unary operator over the operand extent starting at `next`.
    fn apply_unary(&mut self, op: &str, next: usize) -> Result<(), Diagnostic> {
        match self.operand_extent(next) {
            Some(extent) => {
                self.subwalk(next, next + extent)?;
                self.out.push(StackObject::operator(op));
                self.continue_from(next + extent)
            }
            None => {
                // nothing follows; the operator stands alone
                self.out.push(StackObject::operator(op));
                self.continue_from(next)
            }
        }
    }

    /// Walks a sub-range through a nested walker and appends its output.
    fn subwalk(&mut self, lo: usize, hi: usize) -> Result<(), Diagnostic> {
        let emitted = walk(&self.tokens[lo..hi], self.validation)?;
        self.out.extend(emitted);
        Ok(())
    }

    fn visit_identifier(&mut self, id: &str, span: Span) -> Result<(), Diagnostic> {
        if let Some(validation) = self.validation {
            if id != validation.parameter && !validation.symbols.is_global(id) {
                return Err(Diagnostic::spanned(ParseError::UnrecognizedSymbol, span));
            }
        }
        self.out.push(StackObject::identifier(id));
        Ok(())
    }

    fn sign_at(&self, i: usize) -> Option<char> {
        match self.tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::Op(op)) if *op == '+' || *op == '-' => Some(*op),
            _ => None,
        }
    }

    fn imaginary_number_at(&self, i: usize) -> Option<&'a str> {
        match self.tokens.get(i).map(|t| &t.kind) {
            Some(TokenKind::Number {
                text,
                imaginary: true,
            }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The number of tokens making up one operand starting at `j`: a
    /// number, a run of single names (optionally applied to a group), a
    /// multi-character name (ditto), or a balanced group.
    fn operand_extent(&self, j: usize) -> Option<usize> {
        match self.tokens.get(j).map(|t| &t.kind)? {
            TokenKind::Number { .. } => Some(1),
            TokenKind::MultiName { .. } => Some(1 + self.group_extent(j + 1).unwrap_or(0)),
            TokenKind::SingleName { .. } => {
                let mut run = 1;
                while matches!(
                    self.tokens.get(j + run).map(|t| &t.kind),
                    Some(TokenKind::SingleName { .. })
                ) {
                    run += 1;
                }
                Some(run + self.group_extent(j + run).unwrap_or(0))
            }
            TokenKind::Paren('(') => self.group_extent(j),
            _ => None,
        }
    }

    /// The length of the balanced group starting at an opening
    /// parenthesis, delimiters included.
    fn group_extent(&self, j: usize) -> Option<usize> {
        if !matches!(self.tokens.get(j).map(|t| &t.kind), Some(TokenKind::Paren('('))) {
            return None;
        }
        let mut depth = 0usize;
        for (k, token) in self.tokens[j..].iter().enumerate() {
            match token.kind {
                TokenKind::Paren('(') => depth += 1,
                TokenKind::Paren(')') => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(k + 1);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

fn operand_ends(kind: Option<&TokenKind>) -> bool {
    matches!(
        kind,
        Some(TokenKind::Number { .. })
            | Some(TokenKind::MultiName { .. })
            | Some(TokenKind::SingleName { .. })
            | Some(TokenKind::Paren(')'))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan_fragment;

    fn walk_body(body: &str, parameter: &str) -> Result<String, Diagnostic> {
        let symbols = SymbolTable::new();
        let validation = Validation {
            parameter,
            symbols: &symbols,
        };
        let tokens = scan_fragment(body);
        let stack = walk(&tokens, Some(&validation))?;
        Ok(stack
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" "))
    }

    macro_rules! walker_tests {
        ($($name:ident: $body:expr, $stack:expr,)*) => {
        $(
            #[test]
            fn $name() {
                assert_eq!(walk_body($body, "x").unwrap(), $stack);
            }
        )*
        }
    }

    macro_rules! walker_error_tests {
        ($($name:ident: $body:expr, $error:expr,)*) => {
        $(
            #[test]
            fn $name() {
                assert_eq!(walk_body($body, "x").unwrap_err().error, $error);
            }
        )*
        }
    }

    walker_tests! {
        parameter: "x", "IDENTIFIER:x",
        number: "2.5", "NUMBER:2.5",
        sum: "x+1", "IDENTIFIER:x NUMBER:1 OPERATOR:+",
        difference: "x-2", "IDENTIFIER:x NUMBER:2 OPERATOR:-",
        product: "x*2", "IDENTIFIER:x NUMBER:2 OPERATOR:*",
        exponent: "2^x", "NUMBER:2 IDENTIFIER:x OPERATOR:^",
        implicit_multiplication: "2x", "NUMBER:2 IDENTIFIER:x OPERATOR:*",
        implicit_group: "2(x+1)", "NUMBER:2 IDENTIFIER:x NUMBER:1 OPERATOR:+ OPERATOR:*",
        group_resumes_after: "(x+1)*2", "IDENTIFIER:x NUMBER:1 OPERATOR:+ NUMBER:2 OPERATOR:*",
        nested_groups: "((x))", "IDENTIFIER:x",
        unary_minus: "-x", "NUMBER:-1 IDENTIFIER:x OPERATOR:*",
        unary_minus_before_sum: "-x+1",
            "NUMBER:-1 IDENTIFIER:x OPERATOR:* NUMBER:1 OPERATOR:+",
        unary_minus_group: "-(x+1)",
            "NUMBER:-1 IDENTIFIER:x NUMBER:1 OPERATOR:+ OPERATOR:*",
        unary_minus_after_exponent: "2^-x",
            "NUMBER:2 NUMBER:-1 IDENTIFIER:x OPERATOR:* OPERATOR:^",
        negative_literal_after_operator: "x*-2", "IDENTIFIER:x NUMBER:-2 OPERATOR:*",
        imaginary_literal: "2*i", "NUMBER:2i",
        adjacent_imaginary: "3i", "NUMBER:3 IDENTIFIER:i OPERATOR:*",
        complex_coalescing: "3+2*i", "NUMBER:3+2i",
        complex_difference: "3-2*i", "NUMBER:3-2i",
        imaginary_sum_is_not_coalesced: "2*i+3*i",
            "NUMBER:2i NUMBER:3i OPERATOR:+",
        global_constant: "e^x", "IDENTIFIER:e IDENTIFIER:x OPERATOR:^",
        sine_of_group: "sin(x)", "IDENTIFIER:x OPERATOR:sin",
        sinh_prefers_longest_match: "sinh(x)", "IDENTIFIER:x OPERATOR:sinh",
        sine_then_sum: "sin(x)+1", "IDENTIFIER:x OPERATOR:sin NUMBER:1 OPERATOR:+",
        sum_of_sine: "1+sin(x)", "NUMBER:1 IDENTIFIER:x OPERATOR:sin OPERATOR:+",
        separated_operator_name: "sin x", "IDENTIFIER:x OPERATOR:sin",
        coefficient_on_sine: "2sin(x)", "NUMBER:2 IDENTIFIER:x OPERATOR:sin OPERATOR:*",
        empty_body: "", "",
    }

    walker_error_tests! {
        unknown_identifier: "y", ParseError::UnrecognizedSymbol,
        adjacent_identifiers_do_not_multiply: "xy", ParseError::IllegalUnaryOperator,
        unknown_operator_name: "log(x)", ParseError::IllegalUnaryOperator,
        trailing_operator: "x+", ParseError::IncompleteBinaryOperation,
        leading_operator: "*x", ParseError::IncompleteBinaryOperation,
        unbalanced_group: "(x", ParseError::MalformedBracket,
    }

    #[test]
    fn subscripted_parameter() {
        assert_eq!(walk_body("x_1+1", "x_1").unwrap(), "IDENTIFIER:x_1 NUMBER:1 OPERATOR:+");
    }

    #[test]
    fn fragment_walks_skip_validation() {
        let tokens = scan_fragment("y+1");
        let stack = walk(&tokens, None).unwrap();
        let rendered = stack
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(rendered, "IDENTIFIER:y NUMBER:1 OPERATOR:+");
    }
}
