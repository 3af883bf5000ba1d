//! The markup-language notation adapter.
//!
//! Markup input arrives as a node tree rooted at a row. Normalization
//! rewrites it into the generic [Expr] shape the postfix generator walks:
//! rows become bracket groups or adjacency sequences, parenthesis glyph
//! leaves are dropped (grouping is carried by the row structure, not the
//! glyphs), superscripts and fractions become synthetic sequences carrying
//! `^` and `/`, and the function-application marker becomes a dedicated
//! node.

use crate::diagnostics::{Diagnostic, ParseError};
use crate::grammar::Expr;

/// The invisible marker glyph the markup language inserts between a unary
/// operator name and its argument.
pub const APPLY_GLYPH: char = '\u{2061}';

/// The minus glyph the markup language renders for subtraction and
/// negation.
pub const MINUS_GLYPH: char = '\u{2212}';

/// A node of the markup notation tree, as delivered by the surrounding
/// application's document model.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkupNode {
    /// A row grouping node.
    Row(Vec<MarkupNode>),
    /// A number leaf.
    Number(String),
    /// An identifier leaf.
    Identifier(String),
    /// An operator leaf, parenthesis glyphs and the application marker
    /// included.
    Operator(String),
    /// A subscripted base.
    Sub(Box<MarkupNode>, Box<MarkupNode>),
    /// A superscripted base.
    Sup(Box<MarkupNode>, Box<MarkupNode>),
    /// A fraction.
    Frac(Box<MarkupNode>, Box<MarkupNode>),
}

impl MarkupNode {
    /// Creates a row node.
    pub fn row(children: Vec<MarkupNode>) -> Self {
        MarkupNode::Row(children)
    }

    /// Creates a number leaf.
    pub fn number<S: Into<String>>(text: S) -> Self {
        MarkupNode::Number(text.into())
    }

    /// Creates an identifier leaf.
    pub fn identifier<S: Into<String>>(text: S) -> Self {
        MarkupNode::Identifier(text.into())
    }

    /// Creates an operator leaf.
    pub fn operator<S: Into<String>>(text: S) -> Self {
        MarkupNode::Operator(text.into())
    }

    /// Creates the function-application marker.
    pub fn apply() -> Self {
        MarkupNode::Operator(APPLY_GLYPH.to_string())
    }

    /// Creates a subscripted base.
    pub fn sub(base: MarkupNode, subscript: MarkupNode) -> Self {
        MarkupNode::Sub(Box::new(base), Box::new(subscript))
    }

    /// Creates a superscripted base.
    pub fn sup(base: MarkupNode, exponent: MarkupNode) -> Self {
        MarkupNode::Sup(Box::new(base), Box::new(exponent))
    }

    /// Creates a fraction.
    pub fn frac(numerator: MarkupNode, denominator: MarkupNode) -> Self {
        MarkupNode::Frac(Box::new(numerator), Box::new(denominator))
    }

    fn is_paren_glyph(&self) -> bool {
        matches!(self, MarkupNode::Operator(glyph) if glyph == "(" || glyph == ")")
    }
}

/// Normalizes a markup tree into the generic expression shape.
pub(crate) fn normalize(node: &MarkupNode) -> Result<Expr, Diagnostic> {
    match node {
        MarkupNode::Row(children) => normalize_row(children),
        MarkupNode::Number(text) | MarkupNode::Identifier(text) => Ok(Expr::literal(text.clone())),
        MarkupNode::Operator(glyph) if glyph == "\u{2061}" => Ok(Expr::Apply),
        MarkupNode::Operator(glyph) => Ok(Expr::operator(glyph.clone())),
        MarkupNode::Sub(base, subscript) => match base.as_ref() {
            MarkupNode::Identifier(name) => {
                let subscript = normalize(subscript)?;
                Ok(Expr::literal(format!("{}_{}", name, subscript)))
            }
            _ => Err(ParseError::IllegalSubscript.into()),
        },
        MarkupNode::Sup(base, exponent) => Ok(Expr::sequence(vec![
            normalize(base)?,
            Expr::operator("^"),
            normalize(exponent)?,
        ])),
        MarkupNode::Frac(numerator, denominator) => Ok(Expr::sequence(vec![
            normalize(numerator)?,
            Expr::operator("/"),
            normalize(denominator)?,
        ])),
    }
}

fn normalize_row(children: &[MarkupNode]) -> Result<Expr, Diagnostic> {
    let is_group = children.len() >= 2
        && matches!(children.first(), Some(MarkupNode::Operator(glyph)) if glyph == "(")
        && matches!(children.last(), Some(MarkupNode::Operator(glyph)) if glyph == ")");

    let inner: Vec<Expr> = children
        .iter()
        .filter(|child| !child.is_paren_glyph())
        .map(normalize)
        .collect::<Result<_, _>>()?;

    if is_group {
        let mut inner = inner;
        let middle = match inner.len() {
            0 => None,
            1 => inner.pop().map(Box::new),
            _ => Some(Box::new(Expr::sequence(inner))),
        };
        Ok(Expr::Bracket {
            left: "(".into(),
            middle,
            right: ")".into(),
        })
    } else {
        Ok(Expr::sequence(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paren_row_becomes_bracket_group() {
        let row = MarkupNode::row(vec![
            MarkupNode::operator("("),
            MarkupNode::identifier("x"),
            MarkupNode::operator(")"),
        ]);
        assert_eq!(normalize(&row).unwrap(), Expr::parens(Expr::literal("x")));
    }

    #[test]
    fn paren_glyphs_are_dropped_everywhere() {
        let row = MarkupNode::row(vec![
            MarkupNode::number("2"),
            MarkupNode::operator(")"),
            MarkupNode::identifier("x"),
        ]);
        assert_eq!(
            normalize(&row).unwrap(),
            Expr::sequence(vec![Expr::literal("2"), Expr::literal("x")])
        );
    }

    #[test]
    fn apply_marker_becomes_dedicated_node() {
        let row = MarkupNode::row(vec![
            MarkupNode::identifier("sin"),
            MarkupNode::apply(),
            MarkupNode::identifier("x"),
        ]);
        assert_eq!(
            normalize(&row).unwrap(),
            Expr::sequence(vec![Expr::literal("sin"), Expr::Apply, Expr::literal("x")])
        );
    }

    #[test]
    fn superscript_synthesizes_exponentiation() {
        let sup = MarkupNode::sup(MarkupNode::identifier("x"), MarkupNode::number("2"));
        assert_eq!(
            normalize(&sup).unwrap(),
            Expr::sequence(vec![
                Expr::literal("x"),
                Expr::operator("^"),
                Expr::literal("2"),
            ])
        );
    }

    #[test]
    fn fraction_synthesizes_division() {
        let frac = MarkupNode::frac(MarkupNode::number("1"), MarkupNode::identifier("x"));
        assert_eq!(
            normalize(&frac).unwrap(),
            Expr::sequence(vec![
                Expr::literal("1"),
                Expr::operator("/"),
                Expr::literal("x"),
            ])
        );
    }

    #[test]
    fn subscripted_identifier_fuses() {
        let sub = MarkupNode::sub(MarkupNode::identifier("x"), MarkupNode::number("1"));
        assert_eq!(normalize(&sub).unwrap(), Expr::literal("x_1"));
    }

    #[test]
    fn subscripted_number_is_illegal() {
        let sub = MarkupNode::sub(MarkupNode::number("2"), MarkupNode::number("1"));
        assert_eq!(
            normalize(&sub).unwrap_err().error,
            ParseError::IllegalSubscript
        );
    }
}
