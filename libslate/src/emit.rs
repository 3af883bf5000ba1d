//! Emit strategies for compiled function stacks.

use crate::parser::FunctionStack;
use crate::stack::StackObject;

use core::fmt;

/// The format in which a compiled function should be emitted.
#[derive(Copy, Clone, Debug)]
pub enum EmitFormat {
    /// Human-readable form: signature line, one instruction per line, and
    /// the identity digest.
    Pretty,
    /// JSON, using the external interface's field names.
    Json,
    /// Internal debug form. This form is not stable, and no assumptions
    /// should be made about it.
    Debug,
}

impl From<&str> for EmitFormat {
    fn from(s: &str) -> Self {
        match s {
            "json" => EmitFormat::Json,
            "debug" => EmitFormat::Debug,
            _ => EmitFormat::Pretty,
        }
    }
}

/// Implements the emission of a type in an [EmitFormat].
pub trait Emit
where
    Self: fmt::Debug,
{
    /// Emit `self` with the given [EmitFormat].
    fn emit(&self, form: EmitFormat) -> String {
        match form {
            EmitFormat::Pretty => self.emit_pretty(),
            EmitFormat::Json => self.emit_json(),
            EmitFormat::Debug => self.emit_debug(),
        }
    }

    /// Emit `self` with the [pretty emit format][EmitFormat::Pretty].
    fn emit_pretty(&self) -> String;

    /// Emit `self` with the [JSON emit format][EmitFormat::Json].
    fn emit_json(&self) -> String;

    /// Emit `self` with the [debug emit format][EmitFormat::Debug].
    fn emit_debug(&self) -> String {
        format!("{:#?}", self)
    }
}

impl Emit for StackObject {
    fn emit_pretty(&self) -> String {
        format!("{:<13} {}", self.kind.to_string(), self.value)
    }

    fn emit_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Emit for FunctionStack {
    fn emit_pretty(&self) -> String {
        let mut out = String::with_capacity(128);
        out.push_str(&format!(
            "{}({}) [{}]\n",
            self.signature.name, self.signature.parameter, self.signature.kind
        ));
        for object in &self.stack {
            out.push_str(&format!("  {}\n", object.emit_pretty()));
        }
        out.push_str(&format!("identity: {}", self.identity()));
        out
    }

    fn emit_json(&self) -> String {
        let mut value = serde_json::to_value(self).unwrap_or_default();
        value["identity"] = serde_json::Value::String(self.identity());
        value.to_string()
    }
}
