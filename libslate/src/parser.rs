//! Parsing of function definitions into postfix instruction stacks.
//!
//! One [FunctionParser] serves one input, whatever notation it arrives in:
//! an already-parsed generic expression tree, a live equation-field
//! export, or a markup node tree. Each entry point splits the declaration
//! off, emits the body as an ordered stack, and returns the combined
//! [FunctionStack]. A parser whose signature is already populated rejects
//! further declarations; there is no resume.

mod declaration;
mod postfix;
mod walker;

use crate::diagnostics::{Diagnostic, ParseError};
use crate::grammar::Expr;
use crate::identity;
use crate::markup::{self, MarkupNode};
use crate::scanner;
use crate::stack::StackObject;
use crate::symbols::SymbolTable;

use core::fmt;
use log::debug;
use serde::{Deserialize, Serialize};

/// The evaluation domain of a declared function.
///
/// The discriminant values are stable; they participate in the identity
/// serialization.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    /// A constant definition.
    #[serde(rename = "C")]
    Constant = 0,
    /// A real-to-complex function.
    #[serde(rename = "R2C")]
    RealToComplex = 1,
    /// A complex-to-complex function.
    #[serde(rename = "C2C")]
    ComplexToComplex = 2,
}

impl FunctionKind {
    /// The stable ordinal used in the identity serialization.
    pub fn ordinal(&self) -> u8 {
        *self as u8
    }
}

impl Default for FunctionKind {
    fn default() -> Self {
        FunctionKind::RealToComplex
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use FunctionKind::*;
        write!(
            f,
            "{}",
            match self {
                Constant => "C",
                RealToComplex => "R2C",
                ComplexToComplex => "C2C",
            }
        )
    }
}

/// The identity of a successfully parsed declaration. Produced once per
/// parse; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSignature {
    /// The declared function name.
    #[serde(rename = "functionName")]
    pub name: String,
    /// The declared parameter name.
    #[serde(rename = "parameterName")]
    pub parameter: String,
    /// The evaluation domain.
    pub kind: FunctionKind,
}

/// A successfully compiled function definition: its signature plus the
/// ordered postfix instruction stack the external compiler consumes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionStack {
    /// The declared identity.
    #[serde(flatten)]
    pub signature: FunctionSignature,
    /// The instruction stack, in evaluation order.
    pub stack: Vec<StackObject>,
}

impl FunctionStack {
    /// The deterministic identity digest used as the compiled-artifact
    /// cache key.
    pub fn identity(&self) -> String {
        identity::function_identity(
            self.signature.kind,
            &self.signature.name,
            &self.signature.parameter,
            &self.stack,
        )
    }
}

/// Parses one function definition into its instruction stack.
pub struct FunctionParser {
    kind: FunctionKind,
    symbols: SymbolTable,
    signature: Option<FunctionSignature>,
}

impl FunctionParser {
    /// Creates a parser for one definition of the given kind.
    pub fn new(kind: FunctionKind) -> Self {
        Self::with_symbols(kind, SymbolTable::new())
    }

    /// Creates a parser that resolves identifiers and function calls
    /// against `symbols`.
    pub fn with_symbols(kind: FunctionKind, symbols: SymbolTable) -> Self {
        Self {
            kind,
            symbols,
            signature: None,
        }
    }

    /// The signature extracted by a successful parse, if any.
    pub fn signature(&self) -> Option<&FunctionSignature> {
        self.signature.as_ref()
    }

    /// Compiles an already-parsed generic expression tree.
    pub fn parse_tree(&mut self, expr: &Expr) -> Result<FunctionStack, Diagnostic> {
        self.guard()?;
        let declaration = declaration::extract(expr)?;
        self.finish_tree(declaration)
    }

    /// Compiles a live equation-field plain-text export.
    pub fn parse_editor_line(&mut self, text: &str) -> Result<FunctionStack, Diagnostic> {
        self.guard()?;
        let scanned = scanner::scan_definition(text)?;
        let signature = self.declare(scanned.name, scanned.parameter);
        let validation = walker::Validation {
            parameter: &signature.parameter,
            symbols: &self.symbols,
        };
        let stack = walker::walk(&scanned.body, Some(&validation))?;
        debug!(
            "compiled {}({}) from editor text: {} instructions",
            signature.name,
            signature.parameter,
            stack.len()
        );
        Ok(FunctionStack { signature, stack })
    }

    /// Compiles a markup notation tree rooted at a row node.
    pub fn parse_markup(&mut self, root: &MarkupNode) -> Result<FunctionStack, Diagnostic> {
        self.guard()?;
        let normalized = markup::normalize(root)?;
        let declaration = declaration::extract(&normalized)?;
        self.finish_tree(declaration)
    }

    fn finish_tree(
        &mut self,
        declaration: declaration::Declaration,
    ) -> Result<FunctionStack, Diagnostic> {
        let signature = self.declare(declaration.name, declaration.parameter);
        let mut emitter = postfix::Emitter::new(&self.symbols);
        emitter.visit(&declaration.body)?;
        let stack = emitter.finish();
        debug!(
            "compiled {}({}): {} instructions",
            signature.name,
            signature.parameter,
            stack.len()
        );
        Ok(FunctionStack { signature, stack })
    }

    fn declare(&mut self, name: String, parameter: String) -> FunctionSignature {
        let signature = FunctionSignature {
            name,
            parameter,
            kind: self.kind,
        };
        self.signature = Some(signature.clone());
        signature
    }

    fn guard(&self) -> Result<(), Diagnostic> {
        if self.signature.is_some() {
            Err(ParseError::DuplicateDefinition.into())
        } else {
            Ok(())
        }
    }
}

/// Compiles an already-parsed generic expression tree with a fresh parser.
pub fn parse_tree(expr: &Expr, kind: FunctionKind) -> Result<FunctionStack, Diagnostic> {
    FunctionParser::new(kind).parse_tree(expr)
}

/// Compiles a live equation-field export with a fresh parser.
pub fn parse_editor_line(text: &str, kind: FunctionKind) -> Result<FunctionStack, Diagnostic> {
    FunctionParser::new(kind).parse_editor_line(text)
}

/// Compiles a markup notation tree with a fresh parser.
pub fn parse_markup(root: &MarkupNode, kind: FunctionKind) -> Result<FunctionStack, Diagnostic> {
    FunctionParser::new(kind).parse_markup(root)
}
