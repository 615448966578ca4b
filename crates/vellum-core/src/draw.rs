//! Visual definitions for resolved diagram elements.
//!
//! - [`shape`]: the shape geometry library ([`ShapeKind`])
//! - [`outline`]: unit-square paths and anchors ([`GeometryOutline`])
//! - [`stroke`], [`fill`]: paint definitions
//! - [`marker`]: arrow-marker vocabularies and open-marker emulation
//! - [`text`]: text runs and label size estimation

pub mod fill;
pub mod marker;
pub mod outline;
pub mod shape;
pub mod stroke;
pub mod text;

pub use fill::FillDefinition;
pub use marker::{MarkerEnd, MarkerKind, MarkerShape, MarkerSize, MarkerSpec, OpenMarkerOverlay};
pub use outline::{
    Anchor, AnchorName, GeometryOutline, PathCommand, PathSegment, Subpath,
    closest_point_on_segment,
};
pub use shape::{ShapeKind, UnsupportedShape};
pub use stroke::{StrokeDefinition, StrokeJoin, StrokeStyle, parse_dash_pattern};
pub use text::{LabelMetrics, TextBlock, TextRun};
