//! Error codes for the Vellum diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Style descriptor errors
//! - `E1xx` - Shape and marker vocabulary errors
//! - `E2xx` - Reference errors
//! - `E3xx` - Geometry errors
//! - `E4xx` - Document errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Style Errors (E0xx)
    // =========================================================================
    /// Malformed style token.
    ///
    /// A token has an empty key, such as `=1` or a stray `=`.
    E001,

    /// Invalid color.
    ///
    /// A color value is not `#RGB`, `#RRGGBB`, `rgb(r,g,b)`, `light-dark(a, b)`,
    /// `none` or `default`. The default color is used instead.
    E002,

    /// Invalid number.
    ///
    /// A numeric key carries a value that is not a finite number.
    E003,

    /// Value out of range.
    ///
    /// A numeric value lies outside the documented range and was clamped.
    E004,

    /// Invalid boolean.
    ///
    /// Boolean keys accept `1`, `0`, `true`, `false` or an empty value.
    E005,

    /// Unknown enumerated value.
    ///
    /// An enumerated key (`edgeStyle`, `direction`, `align`, ...) carries a
    /// value outside its vocabulary.
    E006,

    // =========================================================================
    // Vocabulary Errors (E1xx)
    // =========================================================================
    /// Unsupported shape kind.
    ///
    /// The shape name has no matching family; a rectangle is drawn instead.
    E100,

    /// Unsupported marker.
    ///
    /// The marker name is not in the marker vocabulary; a classic arrow is
    /// drawn instead.
    E101,

    // =========================================================================
    // Reference Errors (E2xx)
    // =========================================================================
    /// Dangling reference.
    ///
    /// An edge endpoint names a node that does not exist or is not a shape.
    E200,

    /// Edge dropped.
    ///
    /// An endpoint could not be resolved and the edge has no literal
    /// coordinates to fall back to.
    E201,

    /// Dangling parent.
    ///
    /// A node names a parent that does not exist; it is attached to the root.
    E202,

    /// Duplicate node id.
    ///
    /// A node id appears more than once on a page; the later node is skipped.
    E203,

    // =========================================================================
    // Geometry Errors (E3xx)
    // =========================================================================
    /// Degenerate geometry.
    ///
    /// A shape has zero or non-finite width or height.
    E300,

    /// Invalid image data.
    ///
    /// An embedded image URI could not be decoded or rasterized.
    E301,

    // =========================================================================
    // Document Errors (E4xx)
    // =========================================================================
    /// Unparsable document.
    ///
    /// The document source is not a valid input tree.
    E400,

    /// Invalid page dimensions.
    ///
    /// Page width, height or scale is not a positive finite number.
    E401,
}

/// The taxonomy category of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// Token ignored, default substituted
    MalformedStyle,
    /// Rectangle fallback
    UnsupportedShapeKind,
    /// Edge dropped or rendered from literal coordinates
    DanglingReference,
    /// Center-point fallback
    DegenerateGeometry,
    /// Fatal for the affected document only
    UnparsableDocument,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Style errors
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            // Vocabulary errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            // Reference errors
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            // Geometry errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            // Document errors
            ErrorCode::E400 => "E400",
            ErrorCode::E401 => "E401",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "malformed style token",
            ErrorCode::E002 => "invalid color",
            ErrorCode::E003 => "invalid number",
            ErrorCode::E004 => "value out of range",
            ErrorCode::E005 => "invalid boolean",
            ErrorCode::E006 => "unknown enumerated value",
            ErrorCode::E100 => "unsupported shape kind",
            ErrorCode::E101 => "unsupported marker",
            ErrorCode::E200 => "dangling reference",
            ErrorCode::E201 => "edge dropped",
            ErrorCode::E202 => "dangling parent",
            ErrorCode::E203 => "duplicate node id",
            ErrorCode::E300 => "degenerate geometry",
            ErrorCode::E301 => "invalid image data",
            ErrorCode::E400 => "unparsable document",
            ErrorCode::E401 => "invalid page dimensions",
        }
    }

    /// Returns the taxonomy category of this code.
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            ErrorCode::E001
            | ErrorCode::E002
            | ErrorCode::E003
            | ErrorCode::E004
            | ErrorCode::E005
            | ErrorCode::E006
            | ErrorCode::E101
            | ErrorCode::E301 => DiagnosticKind::MalformedStyle,
            ErrorCode::E100 => DiagnosticKind::UnsupportedShapeKind,
            ErrorCode::E200 | ErrorCode::E201 | ErrorCode::E202 | ErrorCode::E203 => {
                DiagnosticKind::DanglingReference
            }
            ErrorCode::E300 | ErrorCode::E401 => DiagnosticKind::DegenerateGeometry,
            ErrorCode::E400 => DiagnosticKind::UnparsableDocument,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MalformedStyle => "malformed style",
            DiagnosticKind::UnsupportedShapeKind => "unsupported shape kind",
            DiagnosticKind::DanglingReference => "dangling reference",
            DiagnosticKind::DegenerateGeometry => "degenerate geometry",
            DiagnosticKind::UnparsableDocument => "unparsable document",
        };
        f.write_str(name)
    }
}
