//! Diagnostic system for Vellum.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans into the offending style string or document source
//! - Severity levels and the taxonomy category of each code
//! - Diagnostic collector for accumulating per-node diagnostics
//!
//! # Overview
//!
//! Conversion never aborts on malformed nodes. Every non-fatal condition is
//! recorded as a warning [`Diagnostic`] and returned next to the result;
//! only an unparsable document produces an error, wrapped in [`ParseError`].
//!
//! # Example
//!
//! ```
//! # use vellum_parser::error::{Diagnostic, DiagnosticKind, ErrorCode};
//! # use vellum_parser::Span;
//! let diag = Diagnostic::warning("invalid color `#12`")
//!     .with_code(ErrorCode::E002)
//!     .with_label(Span::new(10..13), "not a color")
//!     .with_help("use `#RGB`, `#RRGGBB` or `rgb(r,g,b)`");
//!
//! assert_eq!(diag.kind(), Some(DiagnosticKind::MalformedStyle));
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::{DiagnosticKind, ErrorCode};
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
