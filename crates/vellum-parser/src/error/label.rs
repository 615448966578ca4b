//! Source annotations attached to diagnostics.

use crate::span::Span;

/// Marks a byte range of a style string or document and says what is wrong
/// there. A diagnostic has at most one primary label, pointing at the token
/// that triggered it; secondary labels point at related tokens, such as the
/// earlier occurrence of a repeated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    span: Span,
    message: String,
    primary: bool,
}

impl Label {
    fn with_role(span: Span, message: impl Into<String>, primary: bool) -> Self {
        Self {
            span,
            message: message.into(),
            primary,
        }
    }

    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::with_role(span, message, true)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::with_role(span, message, false)
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.primary
    }

    pub fn is_secondary(&self) -> bool {
        !self.primary
    }
}
