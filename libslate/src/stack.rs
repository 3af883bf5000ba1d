//! The typed instruction stack emitted for a compiled function definition.

use core::fmt;
use serde::{Deserialize, Serialize};

/// The kind of a [StackObject].
///
/// The discriminant values are stable: they are the ordinals used by the
/// identity serialization, which downstream caching depends on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StackObjectKind {
    /// A numeric literal, real (`2.5`) or complex (`3+2i`).
    Number = 0,
    /// The declared parameter, a global constant, or a combined
    /// base-subscript name.
    Identifier = 1,
    /// A binary or unary operator consuming the operands below it.
    Operator = 2,
    /// A call to a registered user-defined function.
    FunctionCall = 3,
}

impl StackObjectKind {
    /// The stable ordinal used in the identity serialization.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for StackObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use StackObjectKind::*;
        write!(
            f,
            "{}",
            match self {
                Number => "NUMBER",
                Identifier => "IDENTIFIER",
                Operator => "OPERATOR",
                FunctionCall => "FUNCTION_CALL",
            }
        )
    }
}

/// One instruction unit of a compiled function.
///
/// A stack is evaluated left to right with a working stack: operands push
/// themselves, operators pop the values they consume. Objects are immutable
/// once emitted.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StackObject {
    /// The surface value of the instruction.
    pub value: String,
    /// What the value is.
    pub kind: StackObjectKind,
}

impl StackObject {
    /// Creates a NUMBER object.
    pub fn number<V: Into<String>>(value: V) -> Self {
        Self {
            value: value.into(),
            kind: StackObjectKind::Number,
        }
    }

    /// Creates an IDENTIFIER object.
    pub fn identifier<V: Into<String>>(value: V) -> Self {
        Self {
            value: value.into(),
            kind: StackObjectKind::Identifier,
        }
    }

    /// Creates an OPERATOR object.
    pub fn operator<V: Into<String>>(value: V) -> Self {
        Self {
            value: value.into(),
            kind: StackObjectKind::Operator,
        }
    }

    /// Creates a FUNCTION_CALL object.
    pub fn function_call<V: Into<String>>(value: V) -> Self {
        Self {
            value: value.into(),
            kind: StackObjectKind::FunctionCall,
        }
    }

    /// The `<kind-ordinal>:<value>` form the identity digest is built from.
    /// This exact textual shape is a compatibility surface.
    pub fn key_component(&self) -> String {
        format!("{}:{}", self.kind.ordinal(), self.value)
    }
}

impl fmt::Display for StackObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}
