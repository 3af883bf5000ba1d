//! Postfix emission: the one shared semantic policy that turns the common
//! expression shape into an ordered instruction stack.
//!
//! Both tree adapters end up here. Right-nested [Expr::Pair] nodes go
//! through the branch rules; flat [Expr::Sequence] rows go through the
//! sibling-adjacency walk. The policies agree on the load-bearing cases
//! (implicit multiplication, signed continuations, complex literals) but
//! keep their adapter-specific coalescing behavior.

use super::walker;
use crate::diagnostics::{Diagnostic, ParseError};
use crate::grammar::{Expr, FractionPart};
use crate::scanner;
use crate::stack::StackObject;
use crate::symbols::SymbolTable;

use log::trace;

/// The multiplication morpheme emitted for adjacent terms.
pub(crate) const CDOT: &str = "\\cdot";

fn is_minus_glyph(op: &str) -> bool {
    op == "-" || op == "\u{2212}"
}

fn binary_token(op: &str) -> &str {
    if op == "\u{2212}" {
        "-"
    } else {
        op
    }
}

/// Whether `text` is a plain decimal literal (optional sign, digits, at
/// most one point).
pub(crate) fn parses_as_decimal(text: &str) -> bool {
    let rest = text.strip_prefix('-').unwrap_or(text);
    !rest.is_empty()
        && rest.chars().all(|c| c.is_ascii_digit() || c == '.')
        && rest.chars().filter(|&c| c == '.').count() <= 1
        && rest.chars().any(|c| c.is_ascii_digit())
}

/// Walks a body tree and accumulates its instruction stack.
///
/// Visits thread `Result`: the first error abandons the emitter and its
/// partial stack wholesale, so callers never observe an inconsistent
/// stack next to an error.
pub(crate) struct Emitter<'a> {
    symbols: &'a SymbolTable,
    out: Vec<StackObject>,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(symbols: &'a SymbolTable) -> Self {
        Self {
            symbols,
            out: Vec::new(),
        }
    }

    pub(crate) fn finish(self) -> Vec<StackObject> {
        self.out
    }

    pub(crate) fn visit(&mut self, expr: &Expr) -> Result<(), Diagnostic> {
        match expr {
            Expr::Pair(first, second) => match first.as_ref() {
                // An arbitrary-constant marker heading a pair injects its
                // token as the operator of the remaining operand.
                Expr::Operator(op) => {
                    self.visit(second)?;
                    self.out.push(StackObject::operator(binary_token(op)));
                    Ok(())
                }
                _ => self.visit_branch(first, second),
            },
            Expr::Sequence(children) => match children.as_slice() {
                [] => Ok(()),
                [only] => self.visit(only),
                _ => self.visit_siblings(children),
            },
            Expr::Negated(inner) => {
                self.visit(inner)?;
                self.out.push(StackObject::operator("-"));
                Ok(())
            }
            Expr::Fraction {
                numerator,
                denominator,
            } => {
                self.visit_fraction_part(numerator)?;
                self.visit_fraction_part(denominator)?;
                self.out.push(StackObject::operator("/"));
                Ok(())
            }
            Expr::Literal(text) => {
                self.push_literal(text);
                Ok(())
            }
            Expr::Scripted { base, sub, sup } => {
                self.visit_scripted(base, sub.as_deref(), sup.as_deref())
            }
            Expr::Bracket {
                left,
                middle,
                right,
            } => {
                let middle = match middle {
                    Some(middle) if !left.is_empty() && !right.is_empty() => middle,
                    _ => return Err(ParseError::IncompleteBracket.into()),
                };
                if left == "(" && right == ")" {
                    self.visit(middle)
                } else {
                    Err(ParseError::UnrecognizedBracket.into())
                }
            }
            Expr::Unary { op, arg } => match arg {
                Some(arg) => {
                    self.visit(arg)?;
                    self.out.push(StackObject::operator(op.as_str()));
                    Ok(())
                }
                None => Err(ParseError::NotAUnaryOperation.into()),
            },
            Expr::Operator(_) | Expr::Apply => Err(ParseError::NotABranch.into()),
        }
    }

    /// Resolves a two-child composition. The rule order is load-bearing;
    /// see the module documentation.
    fn visit_branch(&mut self, left: &Expr, right: &Expr) -> Result<(), Diagnostic> {
        if !left.is_operand() {
            return Err(ParseError::NotABranch.into());
        }

        if let Expr::Pair(first, second) = right {
            // left-associative chained sum/difference with an implicit
            // product prefix: `2x + 1` arrives as (2, (x, (+, 1)))
            if matches!(second.leading_char(), Some('+') | Some('-')) {
                self.visit_binary(left, CDOT, first)?;
                return self.visit(second);
            }
        }

        // explicit negative right-hand side resolves to subtraction
        if let Expr::Negated(inner) = right {
            return self.visit_binary(left, "-", inner);
        }

        // a coefficient adjacent to `i` is a complex literal
        if left.atom_text().is_some() && right.to_string() == "i" {
            trace!("complex literal {}i", left);
            if let Some(coefficient) = left.atom_text() {
                self.push_literal(coefficient);
            }
            self.push_literal("i");
            self.out.push(StackObject::operator(CDOT));
            return Ok(());
        }

        // an arbitrary-constant marker heading the right side supplies the
        // operator between the two operands
        if let Expr::Pair(first, second) = right {
            if let Expr::Operator(op) = first.as_ref() {
                return self.visit_binary(left, binary_token(op), second);
            }
        }

        // two adjacent terms: implied multiplication
        self.visit_binary(left, CDOT, right)
    }

    fn visit_binary(&mut self, left: &Expr, op: &str, right: &Expr) -> Result<(), Diagnostic> {
        self.visit(left)?;
        self.visit(right)?;
        self.out.push(StackObject::operator(op));
        Ok(())
    }

    fn visit_scripted(
        &mut self,
        base: &Expr,
        sub: Option<&str>,
        sup: Option<&str>,
    ) -> Result<(), Diagnostic> {
        match (sub, sup) {
            (sub, Some(sup)) => {
                // exponentiation: the base, then the independently
                // re-parsed exponent, then `^`
                match (sub, base.atom_text()) {
                    (Some(sub), Some(text)) => {
                        let combined = format!("{}_{}", text, sub);
                        self.push_literal(&combined);
                    }
                    _ => self.visit(base)?,
                }
                let exponent: String = sup.chars().filter(|c| *c != '{' && *c != '}').collect();
                self.visit_fragment(&exponent, ParseError::IncompleteSuperscript)?;
                self.out.push(StackObject::operator("^"));
                Ok(())
            }
            (Some(sub), None) => match base.atom_text() {
                Some(text) => {
                    self.push_literal(&format!("{}_{}", text, sub));
                    Ok(())
                }
                None => Err(ParseError::IllegalSubscript.into()),
            },
            (None, None) => Err(ParseError::NotAScript.into()),
        }
    }

    fn visit_fraction_part(&mut self, part: &FractionPart) -> Result<(), Diagnostic> {
        match part {
            FractionPart::Parsed(expr) => self.visit(expr),
            FractionPart::Raw(text) => self.visit_fragment(text, ParseError::IncompleteFraction),
        }
    }

    /// Re-entrant sub-parse of raw surface text: the text is re-tokenized
    /// and walked by a nested token walker. Identifier validation is the
    /// token adapter's concern, not the tree adapters', so the nested walk
    /// runs without it.
    fn visit_fragment(&mut self, text: &str, empty_error: ParseError) -> Result<(), Diagnostic> {
        let tokens = scanner::scan_fragment(text);
        if tokens.is_empty() {
            return Err(empty_error.into());
        }
        let emitted = walker::walk(&tokens, None)?;
        self.out.extend(emitted);
        Ok(())
    }

    /// Walks a flat adjacency row: operators appear infix between operand
    /// units, adjacent units multiply implicitly.
    fn visit_siblings(&mut self, children: &[Expr]) -> Result<(), Diagnostic> {
        let mut i = 0;
        let mut have_left = false;
        while i < children.len() {
            match &children[i] {
                Expr::Operator(op) if !have_left && is_minus_glyph(op) => {
                    // no left operand: coalesce into a multiplication by -1
                    trace!("coalescing leading minus");
                    let consumed = self.visit_unit(children, i + 1)?;
                    self.out.push(StackObject::number("-1"));
                    self.out.push(StackObject::operator(CDOT));
                    have_left = true;
                    i += 1 + consumed;
                }
                Expr::Operator(op) if !have_left && op == "+" => {
                    // a leading plus is a no-op sign
                    i += 1;
                }
                Expr::Operator(op) => {
                    if !have_left || i + 1 >= children.len() {
                        return Err(ParseError::IncompleteBinaryOperation.into());
                    }
                    let consumed = self.visit_unit_run(children, i + 1)?;
                    self.out.push(StackObject::operator(binary_token(op)));
                    i += 1 + consumed;
                }
                Expr::Apply => return Err(ParseError::NotABranch.into()),
                _ => {
                    if have_left {
                        // adjacent to what's already emitted: implied product
                        let consumed = self.visit_unit(children, i)?;
                        self.out.push(StackObject::operator(CDOT));
                        i += consumed;
                    } else {
                        let consumed = self.visit_unit_run(children, i)?;
                        have_left = true;
                        i += consumed;
                    }
                }
            }
        }
        Ok(())
    }

    /// Emits a maximal run of adjacent operand units, chaining them with
    /// implicit multiplication. Returns the number of siblings consumed.
    fn visit_unit_run(&mut self, children: &[Expr], start: usize) -> Result<usize, Diagnostic> {
        let mut consumed = self.visit_unit(children, start)?;
        while let Some(next) = children.get(start + consumed) {
            if matches!(next, Expr::Operator(_) | Expr::Apply) {
                break;
            }
            consumed += self.visit_unit(children, start + consumed)?;
            self.out.push(StackObject::operator(CDOT));
        }
        Ok(consumed)
    }

    /// Emits one operand unit starting at `start`. Returns the number of
    /// siblings consumed.
    fn visit_unit(&mut self, children: &[Expr], start: usize) -> Result<usize, Diagnostic> {
        let cur = children
            .get(start)
            .ok_or(ParseError::IncompleteBinaryOperation)?;

        // `name ⁡ argument`: function application
        if let Some(Expr::Apply) = children.get(start + 1) {
            if let Some(name) = cur.atom_text() {
                if children.get(start + 2).is_none() {
                    return Err(ParseError::NotAUnaryOperation.into());
                }
                let name = name.to_string();
                let arg_consumed = self.visit_unit(children, start + 2)?;
                let object = if self.symbols.is_function(&name) {
                    StackObject::function_call(name)
                } else {
                    StackObject::operator(name)
                };
                self.out.push(object);
                return Ok(2 + arg_consumed);
            }
        }

        // a number directly followed by `i` coalesces into one complex
        // NUMBER token
        if let (Some(num), Some(next)) = (cur.atom_text(), children.get(start + 1)) {
            if parses_as_decimal(num) && next.atom_text() == Some("i") {
                self.out.push(StackObject::number(format!("{}i", num)));
                return Ok(2);
            }
        }

        self.visit(cur)?;
        Ok(1)
    }

    fn push_literal(&mut self, text: &str) {
        if parses_as_decimal(text) {
            self.out.push(StackObject::number(text));
        } else {
            self.out.push(StackObject::identifier(text));
        }
    }
}
