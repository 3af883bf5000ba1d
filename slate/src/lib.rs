//! The slate app: compiles a typed function definition into the postfix
//! instruction stack a native compiler consumes. For an overview of the
//! semantic front-end, see [libslate's documentation](libslate).

mod diagnostics;
use diagnostics::{emit_slate_diagnostic, sanitize_source_for_diagnostics};

use libslate::diagnostics::ParseError;
use libslate::{parse_editor_line, Emit, EmitFormat, FunctionKind};

/// Options to run slate with.
pub struct Opts {
    /// The function definition to compile, in equation-field export form.
    pub program: String,
    /// How the compiled stack should be emitted.
    pub emit_format: String,
    /// The declared function kind.
    pub kind: String,
    /// When [Some](Option::Some) diagnostic code, explains that code.
    pub explain_diagnostic: Option<String>,
    /// When true, diagnostics are colored.
    pub color: bool,
}

/// Output of a slate execution.
#[derive(Default)]
pub struct SlateResult {
    /// Exit code.
    pub code: i32,
    /// Emit for stdout.
    pub stdout: String,
    /// Emit for stderr.
    pub stderr: String,
}

fn parse_kind(kind: &str) -> FunctionKind {
    match kind {
        "C" => FunctionKind::Constant,
        "C2C" => FunctionKind::ComplexToComplex,
        _ => FunctionKind::RealToComplex,
    }
}

/// Runs slate end-to-end.
pub fn run_slate(opts: Opts) -> SlateResult {
    let mut result = SlateResult::default();

    if let Some(code) = opts.explain_diagnostic {
        let explanations = ParseError::codes_with_explanations();
        return match explanations.iter().find(|(c, _)| *c == code) {
            Some((_, explanation)) => {
                result.stdout.push_str(explanation);
                result
            }
            None => {
                result
                    .stderr
                    .push_str(&format!("{} is not a diagnostic code", code));
                result.code = 1;
                result
            }
        };
    }

    match parse_editor_line(&opts.program, parse_kind(&opts.kind)) {
        Ok(function) => {
            result
                .stdout
                .push_str(&function.emit(EmitFormat::from(&*opts.emit_format)));
        }
        Err(diagnostic) => {
            let sanitized = sanitize_source_for_diagnostics(&opts.program);
            result
                .stderr
                .push_str(&emit_slate_diagnostic(&sanitized, &diagnostic, opts.color));
            result.code = 1;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(program: &str) -> SlateResult {
        run_slate(Opts {
            program: program.into(),
            emit_format: "pretty".into(),
            kind: "R2C".into(),
            explain_diagnostic: None,
            color: false,
        })
    }

    #[test]
    fn compiles_a_definition() {
        let result = run("f(x)=2x+1");
        assert_eq!(result.code, 0);
        assert!(result.stdout.contains("f(x) [R2C]"));
        assert!(result.stdout.contains("identity: __jit_"));
        assert!(result.stderr.is_empty());
    }

    #[test]
    fn reports_diagnostics_on_stderr() {
        let result = run("f(x)=y");
        assert_eq!(result.code, 1);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.contains("unrecognized symbol"));
        assert!(result.stderr.contains("E0016"));
    }

    #[test]
    fn explains_diagnostic_codes() {
        let result = run_slate(Opts {
            program: String::new(),
            emit_format: "pretty".into(),
            kind: "R2C".into(),
            explain_diagnostic: Some("E0015".into()),
            color: false,
        });
        assert_eq!(result.code, 0);
        assert!(result.stdout.contains("unary operator"));
    }

    #[test]
    fn rejects_unknown_diagnostic_codes() {
        let result = run_slate(Opts {
            program: String::new(),
            emit_format: "pretty".into(),
            kind: "R2C".into(),
            explain_diagnostic: Some("E9999".into()),
            color: false,
        });
        assert_eq!(result.code, 1);
    }
}
