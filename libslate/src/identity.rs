//! Deterministic function identities, used as compiled-artifact cache
//! keys.

use crate::parser::FunctionKind;
use crate::stack::StackObject;

use sha2::{Digest, Sha256};

/// Marker prefix of every generated identity.
const MARKER: &str = "__jit_";

/// Hex digits of the digest kept in the identity.
const DIGEST_PREFIX_LEN: usize = 16;

/// Derives the deterministic identity of a compiled function.
///
/// The digest input concatenates the kind ordinal, name, and parameter,
/// followed by the stack serialized as `<kind-ordinal>:<value>` items
/// joined with `_`. Identical `(kind, name, parameter, stack)` tuples
/// always produce the identical string; any single differing stack
/// element produces a different one.
pub fn function_identity(
    kind: FunctionKind,
    name: &str,
    parameter: &str,
    stack: &[StackObject],
) -> String {
    let serialized = stack
        .iter()
        .map(StackObject::key_component)
        .collect::<Vec<_>>()
        .join("_");
    let raw = format!("{}_{}_{}{}", kind.ordinal(), name, parameter, serialized);
    let digest = hex::encode(Sha256::digest(raw.as_bytes()));
    format!("{}{}", MARKER, &digest[..DIGEST_PREFIX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> Vec<StackObject> {
        vec![
            StackObject::number("2"),
            StackObject::identifier("x"),
            StackObject::operator("*"),
        ]
    }

    #[test]
    fn deterministic() {
        let a = function_identity(FunctionKind::RealToComplex, "f", "x", &stack());
        let b = function_identity(FunctionKind::RealToComplex, "f", "x", &stack());
        assert_eq!(a, b);
    }

    #[test]
    fn shape() {
        let identity = function_identity(FunctionKind::RealToComplex, "f", "x", &stack());
        assert!(identity.starts_with("__jit_"));
        assert_eq!(identity.len(), "__jit_".len() + 16);
        assert!(identity["__jit_".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn sensitive_to_every_input() {
        let base = function_identity(FunctionKind::RealToComplex, "f", "x", &stack());
        assert_ne!(
            base,
            function_identity(FunctionKind::ComplexToComplex, "f", "x", &stack())
        );
        assert_ne!(
            base,
            function_identity(FunctionKind::RealToComplex, "g", "x", &stack())
        );
        assert_ne!(
            base,
            function_identity(FunctionKind::RealToComplex, "f", "z", &stack())
        );

        let mut changed = stack();
        changed[0] = StackObject::number("3");
        assert_ne!(
            base,
            function_identity(FunctionKind::RealToComplex, "f", "x", &changed)
        );
    }

    #[test]
    fn sensitive_to_object_kind() {
        let a = function_identity(FunctionKind::RealToComplex, "f", "x", &[
            StackObject::identifier("g"),
        ]);
        let b = function_identity(FunctionKind::RealToComplex, "f", "x", &[
            StackObject::function_call("g"),
        ]);
        assert_ne!(a, b);
    }
}
