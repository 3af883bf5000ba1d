//! libslate compiles a typed math function definition into a flat,
//! ordered stack of typed instructions for a downstream native compiler.
//!
//! Three notation adapters feed one semantic model:
//!
//! - an already-parsed generic expression tree ([Expr]), walked directly;
//! - a live equation-field plain-text export, tokenized by the [scanner]
//!   and walked with one cursor and single-token lookahead;
//! - a markup node tree ([MarkupNode]), normalized into the generic shape
//!   first.
//!
//! Every adapter resolves the same surface ambiguities (implicit
//! multiplication, unary minus, complex literals, exponent and subscript
//! attachment) with deterministic tie-break rules, and every successful
//! parse yields a [FunctionStack]: the declared signature, the postfix
//! instruction stack, and a deterministic identity digest used to key
//! compiled artifacts.

pub mod common;
pub mod diagnostics;

pub mod scanner;
pub use scanner::{scan_definition, scan_fragment, ScannedDefinition, Token, TokenKind};

mod grammar;
pub use grammar::{Expr, FractionPart};

mod markup;
pub use markup::{MarkupNode, APPLY_GLYPH, MINUS_GLYPH};

mod stack;
pub use stack::{StackObject, StackObjectKind};

mod symbols;
pub use symbols::{SymbolTable, UNARY_OPERATORS};

mod parser;
pub use parser::{
    parse_editor_line, parse_markup, parse_tree, FunctionKind, FunctionParser, FunctionSignature,
    FunctionStack,
};

mod identity;
pub use identity::function_identity;

mod emit;
pub use emit::{Emit, EmitFormat};

mod compiler;
pub use compiler::{ArtifactCache, StackCompiler};
