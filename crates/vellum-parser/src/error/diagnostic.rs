//! The core diagnostic type for the Vellum error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, labeled spans, help text, the id of the node it concerns and
//! the source text the spans point into.

use std::fmt;

use vellum_core::identifier::Id;

use crate::{
    error::{DiagnosticKind, ErrorCode, Label, Severity},
    span::Span,
};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// warning[E002]: invalid color `#12`
///   --> node `a`
///    |
///  1 | rounded=1;fillColor=#12;
///    |                     ^^^ not a color
///    |
///    = help: use `#RGB`, `#RRGGBB` or `rgb(r,g,b)`
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
    element: Option<Id>,
    snippet: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use vellum_parser::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("expected value at line 1 column 2")
    ///     .with_code(ErrorCode::E400);
    /// assert!(diag.severity().is_error());
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use vellum_parser::error::Diagnostic;
    /// # use vellum_parser::Span;
    /// let diag = Diagnostic::warning("unknown marker `sparkle`")
    ///     .with_label(Span::new(9..16), "not a marker")
    ///     .with_help("a classic arrow is drawn instead");
    /// assert!(diag.severity().is_warning());
    /// ```
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the taxonomy category, if the diagnostic carries a code.
    pub fn kind(&self) -> Option<DiagnosticKind> {
        self.code.map(|code| code.kind())
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Get the id of the node this diagnostic concerns.
    pub fn element(&self) -> Option<Id> {
        self.element
    }

    /// Get the source text the labels point into.
    pub fn snippet(&self) -> Option<&str> {
        self.snippet.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attach the node this diagnostic concerns.
    pub fn with_element(mut self, element: Id) -> Self {
        self.element = Some(element);
        self
    }

    /// Attach the source text the labels point into.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
            element: None,
            snippet: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[E002]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(element) = self.element {
            write!(f, " (node `{element}`)")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}
