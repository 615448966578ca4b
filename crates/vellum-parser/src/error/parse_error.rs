//! The error of a document that could not be translated at all.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// Fatal diagnostics of one document.
///
/// Displays as the first diagnostic, with a count of the rest.
#[derive(Debug, Clone)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Codes of the wrapped diagnostics, in order
    pub fn codes(&self) -> impl Iterator<Item = ErrorCode> + '_ {
        self.diagnostics.iter().filter_map(Diagnostic::code)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.diagnostics.split_first() else {
            return f.write_str("document could not be translated");
        };
        write!(f, "{first}")?;
        if !rest.is_empty() {
            write!(f, " (+{} more)", rest.len())?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_counts_the_rest() {
        let err = ParseError::from(vec![
            Diagnostic::error("unparsable document").with_code(ErrorCode::E400),
            Diagnostic::error("trailing characters"),
        ]);

        assert_eq!(err.to_string(), "error[E400]: unparsable document (+1 more)");
        assert_eq!(err.codes().collect::<Vec<_>>(), vec![ErrorCode::E400]);
        assert_eq!(err.into_diagnostics().len(), 2);
    }

    #[test]
    fn test_empty_error_still_displays() {
        assert_eq!(
            ParseError::new(Vec::new()).to_string(),
            "document could not be translated"
        );
    }
}
