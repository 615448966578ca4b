//! # Vellum Parser
//!
//! Style descriptor parsing and the diagnostic system shared by every
//! Vellum phase.
//!
//! ## Usage
//!
//! ```
//! # use vellum_core::style::StyleDefaults;
//! # use vellum_parser::{error::ErrorCode, parse_style};
//! let parsed = parse_style("ellipse;fillColor=#dae8fc;strokeWidth=oops", &StyleDefaults::default());
//!
//! assert_eq!(parsed.attributes.shape.as_deref(), Some("ellipse"));
//! assert_eq!(parsed.diagnostics[0].code(), Some(ErrorCode::E003));
//! ```

pub mod error;
mod span;
mod style;

pub use span::Span;
pub use style::{ParsedStyle, parse_style};
