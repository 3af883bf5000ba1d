//! Known symbols: the built-in global constants, registered user-defined
//! functions, and the unary operator table.

use std::collections::HashSet;

/// The global constants every definition body may reference.
const GLOBAL_CONSTANTS: &[&str] = &["e", "\\pi", "i"];

/// Recognized unary operator names.
///
/// Order matters: a name that is a textual prefix of another must come
/// after it, so prefix matching resolves `sinh` before `sin`.
pub const UNARY_OPERATORS: &[&str] = &[
    "sinh", "cosh", "tanh", "sech", "csch", "coth", "sin", "cos", "tan", "sec", "csc", "cot",
    "arg",
];

/// Matches `symbol` against the unary operator table, returning the
/// operator and the remainder after stripping it.
pub(crate) fn match_unary_prefix(symbol: &str) -> Option<(&'static str, &str)> {
    UNARY_OPERATORS
        .iter()
        .find(|op| symbol.starts_with(*op))
        .map(|op| (*op, &symbol[op.len()..]))
}

/// The known-symbol environment a parse validates identifiers against.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    functions: HashSet<String>,
}

impl SymbolTable {
    /// Creates a table with no registered functions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is a built-in global constant.
    pub fn is_global(&self, name: &str) -> bool {
        GLOBAL_CONSTANTS.contains(&name)
    }

    /// Registers a user-defined function name for FUNCTION_CALL resolution.
    pub fn register_function<S: Into<String>>(&mut self, name: S) {
        self.functions.insert(name.into());
    }

    /// Whether `name` is a registered user-defined function.
    pub fn is_function(&self, name: &str) -> bool {
        self.functions.contains(name)
    }
}
