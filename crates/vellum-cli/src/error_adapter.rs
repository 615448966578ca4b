//! Error adapter for converting Vellum errors and diagnostics to miette reports.
//!
//! This module provides the bridge between the library's error types and
//! miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`vellum_parser::error::ParseError`] contains multiple diagnostics,
//! each diagnostic is rendered independently. Translation warnings are
//! rendered the same way, against the style string they point into.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use vellum::VellumError;
use vellum_parser::error::{Diagnostic, Severity};

/// Adapter for a single vellum diagnostic.
pub struct DiagnosticAdapter<'a> {
    diag: &'a Diagnostic,
    /// Source the labels point into; empty when unknown
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    /// Adapts a translation warning, using its style snippet as source.
    pub fn for_warning(diag: &'a Diagnostic) -> Self {
        Self::new(diag, diag.snippet().unwrap_or_default())
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diag.element() {
            Some(element) => write!(f, "{} (at `{element}`)", self.diag.message()),
            None => write!(f, "{}", self.diag.message()),
        }
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        if self.src.is_empty() {
            return None;
        }
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() || self.src.is_empty() {
            return None;
        }

        let len = self.src.len();
        Some(Box::new(labels.iter().map(move |label| {
            let span = span_to_miette(label.span(), len);
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for non-diagnostic [`VellumError`] variants.
pub struct ErrorAdapter<'a>(pub &'a VellumError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            VellumError::Io(_) => "vellum::io",
            VellumError::Document { .. } => return None,
            VellumError::Config(_) => "vellum::config",
            VellumError::Export(_) => "vellum::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error or warning that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(_) => Some(miette::Severity::Error),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Converts a vellum [`Span`](vellum_parser::Span) into a miette [`SourceSpan`]
/// clamped to a source of `len` bytes.
fn span_to_miette(span: vellum_parser::Span, len: usize) -> SourceSpan {
    let start = span.start().min(len);
    SourceSpan::new(start.into(), span.len().min(len - start))
}

/// Convert a [`VellumError`] into a list of reportable errors.
///
/// For [`VellumError::Document`], this returns one [`Reportable`] for each
/// diagnostic in the error. For other error variants, this returns a single
/// [`Reportable`].
pub fn to_reportables(err: &VellumError) -> Vec<Reportable<'_>> {
    match err {
        VellumError::Document {
            err: parse_err,
            src,
        } => parse_err
            .diagnostics()
            .iter()
            .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d, src)))
            .collect(),
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Renders a reportable with miette's graphical handler.
///
/// Falls back to the plain message if rendering fails.
pub fn render(reportable: &Reportable<'_>) -> String {
    let reporter = miette::GraphicalReportHandler::new();
    let mut writer = String::new();
    match reporter.render_report(&mut writer, reportable) {
        Ok(()) => writer,
        Err(_) => reportable.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use vellum_parser::{
        Span,
        error::{ErrorCode, ParseError},
    };

    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let diag = Diagnostic::error("unparsable document")
            .with_code(ErrorCode::E400)
            .with_label(Span::new(0..5), "here")
            .with_help("check the JSON syntax");
        let err = VellumError::new_document_error(ParseError::from(diag), "hello");

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);

        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "unparsable document");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_multiple_diagnostics() {
        let diags = vec![
            Diagnostic::error("first error")
                .with_code(ErrorCode::E400)
                .with_label(Span::new(0..5), "first"),
            Diagnostic::error("second error").with_label(Span::new(10..15), "second"),
        ];
        let err = VellumError::new_document_error(ParseError::from(diags), "source code here...");

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 2);
        assert_eq!(reportables[0].to_string(), "first error");
        assert_eq!(reportables[1].to_string(), "second error");
    }

    #[test]
    fn test_non_document_error() {
        let err = VellumError::Config("bad dpi".to_string());

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad dpi");
                assert_eq!(e.code().unwrap().to_string(), "vellum::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warning_uses_style_snippet() {
        let diag = Diagnostic::warning("invalid color `#12`")
            .with_code(ErrorCode::E002)
            .with_label(Span::new(10..13), "not a color")
            .with_element("box".into())
            .with_snippet("fillColor=#12;");

        let adapter = DiagnosticAdapter::for_warning(&diag);

        assert_eq!(adapter.severity(), Some(miette::Severity::Warning));
        assert_eq!(adapter.to_string(), "invalid color `#12` (at `box`)");
        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels[0].offset(), 10);
        assert_eq!(labels[0].len(), 3);
    }

    #[test]
    fn test_labels_are_clamped_to_source() {
        let diag = Diagnostic::warning("out of range").with_label(Span::new(8..20), "here");

        let adapter = DiagnosticAdapter::new(&diag, "0123456789");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels[0].offset(), 8);
        assert_eq!(labels[0].len(), 2);
        assert!(labels[0].primary());
    }

    #[test]
    fn test_warning_without_snippet_has_no_labels() {
        let diag = Diagnostic::warning("edge dropped").with_label(Span::new(0..3), "here");
        let adapter = DiagnosticAdapter::for_warning(&diag);

        assert!(adapter.source_code().is_none());
        assert!(adapter.labels().is_none());
        assert!(render(&Reportable::Diagnostic(adapter)).contains("edge dropped"));
    }
}
