//! User-facing slate diagnostics.
//!
//! Demarshalls [libslate diagnostics][libslate::diagnostics] into a form
//! pleasant for standard output: annotated snippets when the error carries
//! a source span, a one-line report otherwise.

use libslate::diagnostics::Diagnostic;

use annotate_snippets::{
    display_list::{DisplayList, FormatOptions},
    snippet::{Annotation, AnnotationType, Slice, Snippet, SourceAnnotation},
};

pub fn sanitize_source_for_diagnostics(source: &str) -> String {
    let source = source.to_owned();
    source + " " // a diagnostic may point at the end of the input
}

pub fn emit_slate_diagnostic(source: &str, diagnostic: &Diagnostic, color: bool) -> String {
    let title = diagnostic.message();
    match diagnostic.span {
        Some(span) => {
            let snippet = Snippet {
                title: Some(Annotation {
                    label: Some(&title),
                    id: Some(diagnostic.error.code()),
                    annotation_type: AnnotationType::Error,
                }),
                footer: vec![],
                slices: vec![Slice {
                    source,
                    line_start: 1,
                    origin: None,
                    fold: true,
                    annotations: vec![SourceAnnotation {
                        label: &title,
                        annotation_type: AnnotationType::Error,
                        range: span.into(),
                    }],
                }],
                opt: FormatOptions {
                    color,
                    ..Default::default()
                },
            };
            format!("{}", DisplayList::from(snippet))
        }
        None => format!("error[{}]: {}", diagnostic.error.code(), title),
    }
}
