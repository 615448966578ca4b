//! Export functionality for Vellum render lists.
//!
//! This module provides the [`Exporter`] trait that defines the interface for
//! writing a translated page into an output format. It is the final stage in
//! the Vellum pipeline and a pure consumer of [`PageRender`] values.
//!
//! # Pipeline Position
//!
//! ```text
//! Input Tree (JSON)
//!     ↓ style parsing, tree ordering
//! Page Models
//!     ↓ geometry, connections, routing, compositing
//! Render Lists (PageRender)
//!     ↓ export (this module)
//! Output File
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG preview via [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], covering rendering failures and I/O
//! errors. [`Error`] converts into [`VellumError::Export`] at the crate
//! boundary.
//!
//! [`VellumError::Export`]: crate::VellumError::Export

/// SVG preview backend.
pub mod svg;

use crate::render::PageRender;

/// Abstraction for render list export backends.
pub trait Exporter {
    /// Exports one translated page to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the page cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_page(&mut self, page: &PageRender) -> Result<(), Error>;
}

/// Errors that can occur while writing a page.
///
/// Converted into [`VellumError::Export`] by [`crate::error`].
///
/// [`VellumError::Export`]: crate::VellumError::Export
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The page could not be converted to the target format.
    #[error("Render error: {0}")]
    Render(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
