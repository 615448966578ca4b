//! Error types for Vellum operations.
//!
//! This module provides the main error type [`VellumError`]. Per-node
//! problems never surface here; they are collected as diagnostics next to
//! the translated pages. A [`VellumError`] aborts only the document it
//! belongs to.

use std::io;

use thiserror::Error;

use vellum_parser::error::ParseError;

/// The main error type for Vellum operations.
///
/// # Diagnostic Variants
///
/// The `Document` variant carries the diagnostics of an unparsable document
/// together with its source text, which is enough for rich error reporting.
#[derive(Debug, Error)]
pub enum VellumError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Document { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::export::Error> for VellumError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl VellumError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}
