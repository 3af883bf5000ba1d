//! The generic expression tree shared by the notation adapters.
//!
//! The surface notations this crate accepts describe expression nodes with
//! structurally-optional fields; here every node shape is an explicit
//! variant of one sum type, so unreachable shape combinations fail to
//! compile instead of falling through at runtime. Two grouping variants
//! exist on purpose: [Expr::Pair] is the right-nested two-child shape
//! produced by generic math-markup parsers, [Expr::Sequence] is the flat
//! sibling row produced by markup normalization (and, with one child, the
//! transparent wrapper both notations use).

use core::fmt;

/// A fraction part: either an already-parsed subtree, or raw surface text
/// that must be re-tokenized before it can be walked.
#[derive(Clone, Debug, PartialEq)]
pub enum FractionPart {
    /// A parsed subtree.
    Parsed(Box<Expr>),
    /// Raw text to re-tokenize on visit.
    Raw(String),
}

/// A node of the generic expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A terminal atom: a decimal literal or an identifier.
    Literal(String),
    /// An exact operator token (`+`, `=`, `\cdot`, an arbitrary-constant
    /// marker, ...).
    Operator(String),
    /// The function-application marker separating a function name from its
    /// argument in markup notation.
    Apply,
    /// A two-child composition; which operation it denotes is resolved by
    /// the branch rules of the postfix generator.
    Pair(Box<Expr>, Box<Expr>),
    /// A flat adjacency row; with one child, a transparent wrapper.
    Sequence(Vec<Expr>),
    /// A bracketed group. `middle` is `None` for an empty group.
    Bracket {
        /// The opening delimiter glyph.
        left: String,
        /// The grouped contents.
        middle: Option<Box<Expr>>,
        /// The closing delimiter glyph.
        right: String,
    },
    /// A unary operator applied to an argument. The argument is `None` when
    /// the source node was missing it.
    Unary {
        /// The operator token, e.g. `sin`.
        op: String,
        /// The operand.
        arg: Option<Box<Expr>>,
    },
    /// A fraction; numerator and denominator are re-entrant-parsed
    /// independently.
    Fraction {
        /// The part above the bar.
        numerator: FractionPart,
        /// The part below the bar.
        denominator: FractionPart,
    },
    /// A base with attached sub/superscript text. Script payloads are raw
    /// surface text: superscripts are re-parsed as their own expressions,
    /// subscripts fuse with a literal base.
    Scripted {
        /// The base expression.
        base: Box<Expr>,
        /// Raw subscript text.
        sub: Option<String>,
        /// Raw superscript text.
        sup: Option<String>,
    },
    /// A term flagged with a leading dash.
    Negated(Box<Expr>),
}

impl Expr {
    /// Creates a literal atom.
    pub fn literal<S: Into<String>>(text: S) -> Self {
        Expr::Literal(text.into())
    }

    /// Creates an exact operator atom.
    pub fn operator<S: Into<String>>(token: S) -> Self {
        Expr::Operator(token.into())
    }

    /// Creates a two-child composition.
    pub fn pair(first: Expr, second: Expr) -> Self {
        Expr::Pair(Box::new(first), Box::new(second))
    }

    /// Creates an adjacency row.
    pub fn sequence(children: Vec<Expr>) -> Self {
        Expr::Sequence(children)
    }

    /// Creates a parenthesized group.
    pub fn parens(middle: Expr) -> Self {
        Expr::Bracket {
            left: "(".into(),
            middle: Some(Box::new(middle)),
            right: ")".into(),
        }
    }

    /// Creates a unary application.
    pub fn unary<S: Into<String>>(op: S, arg: Expr) -> Self {
        Expr::Unary {
            op: op.into(),
            arg: Some(Box::new(arg)),
        }
    }

    /// Creates a fraction over two parsed parts.
    pub fn fraction(numerator: Expr, denominator: Expr) -> Self {
        Expr::Fraction {
            numerator: FractionPart::Parsed(Box::new(numerator)),
            denominator: FractionPart::Parsed(Box::new(denominator)),
        }
    }

    /// Creates a fraction over raw, not-yet-tokenized parts.
    pub fn fraction_raw<S: Into<String>>(numerator: S, denominator: S) -> Self {
        Expr::Fraction {
            numerator: FractionPart::Raw(numerator.into()),
            denominator: FractionPart::Raw(denominator.into()),
        }
    }

    /// Creates an exponentiation: `base` with raw superscript text.
    pub fn pow<S: Into<String>>(base: Expr, sup: S) -> Self {
        Expr::Scripted {
            base: Box::new(base),
            sub: None,
            sup: Some(sup.into()),
        }
    }

    /// Creates a subscripted base.
    pub fn subscripted<S: Into<String>>(base: Expr, sub: S) -> Self {
        Expr::Scripted {
            base: Box::new(base),
            sub: Some(sub.into()),
            sup: None,
        }
    }

    /// Creates a dash-flagged term.
    pub fn negated(inner: Expr) -> Self {
        Expr::Negated(Box::new(inner))
    }

    /// The text of a bare atom, if this is one.
    pub(crate) fn atom_text(&self) -> Option<&str> {
        match self {
            Expr::Literal(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node is operand-shaped for branch resolution purposes.
    pub(crate) fn is_operand(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_) | Expr::Scripted { .. } | Expr::Bracket { .. } | Expr::Fraction { .. }
        )
    }

    /// The first character of this node's surface text, used by the
    /// chained-sign branch rule.
    pub(crate) fn leading_char(&self) -> Option<char> {
        match self {
            Expr::Literal(text) | Expr::Operator(text) => text.chars().next(),
            Expr::Apply => None,
            Expr::Pair(first, _) => first.leading_char(),
            Expr::Sequence(children) => children.iter().find_map(Expr::leading_char),
            Expr::Bracket { left, .. } => left.chars().next(),
            Expr::Unary { op, .. } => op.chars().next(),
            Expr::Fraction { .. } => Some('\\'),
            Expr::Scripted { base, .. } => base.leading_char(),
            Expr::Negated(_) => Some('-'),
        }
    }
}

impl fmt::Display for FractionPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FractionPart::Parsed(expr) => write!(f, "{}", expr),
            FractionPart::Raw(text) => write!(f, "{}", text),
        }
    }
}

/// Reconstructs an approximation of the node's surface text. Used for
/// parameter-name extraction and debugging; not guaranteed to round-trip.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(text) | Expr::Operator(text) => write!(f, "{}", text),
            Expr::Apply => Ok(()),
            Expr::Pair(first, second) => write!(f, "{}{}", first, second),
            Expr::Sequence(children) => {
                for child in children {
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
            Expr::Bracket { left, middle, right } => match middle {
                Some(middle) => write!(f, "{}{}{}", left, middle, right),
                None => write!(f, "{}{}", left, right),
            },
            Expr::Unary { op, arg } => match arg {
                Some(arg) => write!(f, "{}{}", op, arg),
                None => write!(f, "{}", op),
            },
            Expr::Fraction {
                numerator,
                denominator,
            } => write!(f, "\\frac{{{}}}{{{}}}", numerator, denominator),
            Expr::Scripted { base, sub, sup } => {
                write!(f, "{}", base)?;
                if let Some(sub) = sub {
                    write!(f, "_{{{}}}", sub)?;
                }
                if let Some(sup) = sup {
                    write!(f, "^{{{}}}", sup)?;
                }
                Ok(())
            }
            Expr::Negated(inner) => write!(f, "-{}", inner),
        }
    }
}
