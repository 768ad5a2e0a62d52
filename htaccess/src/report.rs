//! Source-annotated diagnostic output for `check`

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use htaccess_parser::{Diagnostic, DiagnosticKind};
use std::io::IsTerminal;

/// Print every diagnostic against `source` to stderr.
///
/// Diagnostic spans are byte offsets into the normalized source.
pub fn print_diagnostics(
    path: &str,
    source: &str,
    diagnostics: &[Diagnostic],
) -> std::io::Result<()> {
    let config = Config::default()
        .with_color(std::io::stderr().is_terminal())
        .with_index_type(IndexType::Byte);
    let mut cache = (path, Source::from(source));

    for diagnostic in diagnostics {
        let span = diagnostic.span.start..diagnostic.span.end;
        let (kind, label) = match &diagnostic.kind {
            DiagnosticKind::DroppedLine { .. } => (ReportKind::Warning, "this line was skipped"),
            DiagnosticKind::MismatchedClose { .. } => {
                (ReportKind::Warning, "closes the innermost block anyway")
            }
            DiagnosticKind::StrayClose { .. } => (ReportKind::Warning, "ignored"),
            DiagnosticKind::UnclosedBlock { .. } => (ReportKind::Error, "opened here"),
        };

        Report::build(kind, (path, span.clone()))
            .with_config(config)
            .with_message(diagnostic.kind.to_string())
            .with_label(
                Label::new((path, span))
                    .with_message(label)
                    .with_color(Color::Yellow),
            )
            .finish()
            .eprint(&mut cache)?;
    }
    Ok(())
}
