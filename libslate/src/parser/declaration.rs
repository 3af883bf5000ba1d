//! Locating the `name(parameter) = body` declaration at the top of a
//! parsed expression tree.

use crate::diagnostics::ParseError;
use crate::grammar::Expr;

/// The split of a recognized declaration.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Declaration {
    pub(crate) name: String,
    pub(crate) parameter: String,
    pub(crate) body: Expr,
}

/// Finds the declaration pattern at the top of `expr` and splits it into
/// name, parameter, and body subtree.
pub(crate) fn extract(expr: &Expr) -> Result<Declaration, ParseError> {
    match expr {
        // transparent wrapper
        Expr::Sequence(children) if children.len() == 1 => extract(&children[0]),
        Expr::Pair(head, right) => extract_pair(head, right),
        Expr::Sequence(children) if children.len() >= 2 => extract_row(children),
        _ => Err(ParseError::EmptyEquation),
    }
}

fn extract_pair(head: &Expr, right: &Expr) -> Result<Declaration, ParseError> {
    match head {
        // Generic math parsers treat short names like `f` as built-in
        // unary operator tokens, so `f(x)` arrives as a unary application
        // of `f` to the bracket group.
        Expr::Unary { op, arg: Some(arg) } => {
            if let Expr::Bracket {
                middle: Some(parameter),
                ..
            } = arg.as_ref()
            {
                if let Expr::Pair(eq, body) = right {
                    if is_equals(eq) {
                        return Ok(Declaration {
                            name: op.clone(),
                            parameter: parameter.to_string(),
                            body: body.as_ref().clone(),
                        });
                    }
                }
            }
            Err(ParseError::MissingDeclaration)
        }
        // plain atom head immediately applied to a bracket:
        // (name, ((parameter), (=, body)))
        Expr::Literal(name) => {
            if let Expr::Pair(bracket, rhs) = right {
                if let Expr::Bracket {
                    middle: Some(parameter),
                    ..
                } = bracket.as_ref()
                {
                    if let Expr::Pair(eq, body) = rhs.as_ref() {
                        if is_equals(eq) {
                            return Ok(Declaration {
                                name: name.clone(),
                                parameter: parameter.to_string(),
                                body: body.as_ref().clone(),
                            });
                        }
                    }
                }
            }
            Err(ParseError::MissingDeclaration)
        }
        Expr::Unary { arg: None, .. } => Err(ParseError::MissingDeclaration),
        _ => Err(ParseError::IllegalFunctionName),
    }
}

/// The flat infix shape markup normalization produces:
/// `[name, (parameter), =, body...]`.
fn extract_row(children: &[Expr]) -> Result<Declaration, ParseError> {
    if let [head, Expr::Bracket {
        middle: Some(parameter),
        ..
    }, eq, body @ ..] = children
    {
        if is_equals(eq) {
            let name = match head {
                Expr::Literal(name) => name.clone(),
                _ => return Err(ParseError::IllegalFunctionName),
            };
            if body.is_empty() {
                return Err(ParseError::EmptyEquation);
            }
            let body = if body.len() == 1 {
                body[0].clone()
            } else {
                Expr::sequence(body.to_vec())
            };
            return Ok(Declaration {
                name,
                parameter: parameter.to_string(),
                body,
            });
        }
    }
    Err(ParseError::MissingDeclaration)
}

fn is_equals(expr: &Expr) -> bool {
    matches!(expr, Expr::Operator(op) if op == "=")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `f(x) = x`, as a generic parser delivers it: `f` is a unary head.
    fn unary_head_declaration(body: Expr) -> Expr {
        Expr::pair(
            Expr::unary("f", Expr::parens(Expr::literal("x"))),
            Expr::pair(Expr::operator("="), body),
        )
    }

    /// `g(z) = z`, with a plain literal head.
    fn literal_head_declaration(body: Expr) -> Expr {
        Expr::pair(
            Expr::literal("g"),
            Expr::pair(
                Expr::parens(Expr::literal("z")),
                Expr::pair(Expr::operator("="), body),
            ),
        )
    }

    #[test]
    fn unary_head() {
        let declaration = extract(&unary_head_declaration(Expr::literal("x"))).unwrap();
        assert_eq!(declaration.name, "f");
        assert_eq!(declaration.parameter, "x");
        assert_eq!(declaration.body, Expr::literal("x"));
    }

    #[test]
    fn literal_head() {
        let declaration = extract(&literal_head_declaration(Expr::literal("z"))).unwrap();
        assert_eq!(declaration.name, "g");
        assert_eq!(declaration.parameter, "z");
    }

    #[test]
    fn wrapper_unwraps() {
        let wrapped = Expr::sequence(vec![unary_head_declaration(Expr::literal("x"))]);
        assert!(extract(&wrapped).is_ok());
    }

    #[test]
    fn flat_markup_row() {
        let row = Expr::sequence(vec![
            Expr::literal("f"),
            Expr::parens(Expr::literal("x")),
            Expr::operator("="),
            Expr::literal("2"),
            Expr::literal("x"),
        ]);
        let declaration = extract(&row).unwrap();
        assert_eq!(declaration.name, "f");
        assert_eq!(declaration.parameter, "x");
        assert_eq!(
            declaration.body,
            Expr::sequence(vec![Expr::literal("2"), Expr::literal("x")])
        );
    }

    #[test]
    fn bare_atom_is_empty_equation() {
        assert_eq!(
            extract(&Expr::literal("x")).unwrap_err(),
            ParseError::EmptyEquation
        );
    }

    #[test]
    fn empty_markup_body_is_empty_equation() {
        let row = Expr::sequence(vec![
            Expr::literal("f"),
            Expr::parens(Expr::literal("x")),
            Expr::operator("="),
        ]);
        assert_eq!(extract(&row).unwrap_err(), ParseError::EmptyEquation);
    }

    #[test]
    fn non_name_head_is_illegal() {
        let declared = Expr::pair(
            Expr::fraction(Expr::literal("1"), Expr::literal("2")),
            Expr::pair(
                Expr::parens(Expr::literal("x")),
                Expr::pair(Expr::operator("="), Expr::literal("x")),
            ),
        );
        assert_eq!(
            extract(&declared).unwrap_err(),
            ParseError::IllegalFunctionName
        );
    }

    #[test]
    fn missing_equals_is_missing_declaration() {
        let declared = Expr::pair(
            Expr::literal("g"),
            Expr::pair(
                Expr::parens(Expr::literal("z")),
                Expr::pair(Expr::operator("+"), Expr::literal("z")),
            ),
        );
        assert_eq!(
            extract(&declared).unwrap_err(),
            ParseError::MissingDeclaration
        );
    }
}
