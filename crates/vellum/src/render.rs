//! Output render lists.
//!
//! A [`PageRender`] is the final product of translating one page: its size
//! and the [`RenderRecord`]s in drawing order. Every record carries absolute
//! geometry, paint and text, so emitters are pure consumers.

use std::sync::Arc;

use base64::Engine as _;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use vellum_core::{
    draw::{
        FillDefinition, MarkerSpec, PathCommand, ShapeKind, StrokeDefinition, TextBlock,
    },
    geometry::{Bounds, Point},
    identifier::Id,
};

/// The render list of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageRender {
    pub id: String,
    pub name: String,
    pub width: f32,
    pub height: f32,
    /// Records sorted by z-index; labels follow their connector
    pub records: Vec<RenderRecord>,
}

impl PageRender {
    /// Union of all record bounds
    pub fn content_bounds(&self) -> Option<Bounds> {
        self.records
            .iter()
            .filter_map(|record| record.element.bounds())
            .reduce(|acc, bounds| acc.merge(&bounds))
    }

    pub fn page_bounds(&self) -> Bounds {
        Bounds::new_from_top_left(
            Point::default(),
            vellum_core::geometry::Size::new(self.width, self.height),
        )
    }

    /// Moves every record by `offset`.
    pub fn translate(&mut self, offset: Point) {
        for record in &mut self.records {
            record.element.translate(offset);
        }
    }
}

/// One emitted drawing unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRecord {
    pub id: Id,
    pub z_index: usize,
    #[serde(flatten)]
    pub element: RenderElement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderElement {
    Shape(ShapeRecord),
    Connector(ConnectorRecord),
    Label(LabelRecord),
}

impl RenderElement {
    /// Page-space extent of the element
    pub fn bounds(&self) -> Option<Bounds> {
        match self {
            RenderElement::Shape(shape) => Bounds::from_points(commands_points(&shape.path)),
            RenderElement::Connector(connector) => {
                let overlays = connector
                    .overlays
                    .iter()
                    .flat_map(|overlay| commands_points(&overlay.path));
                let bounds = Bounds::from_points(connector.points.iter().copied().chain(overlays));
                match (&connector.label, bounds) {
                    (Some(label), Some(bounds)) => Some(bounds.merge(&label.bounds)),
                    (Some(label), None) => Some(label.bounds),
                    (None, bounds) => bounds,
                }
            }
            RenderElement::Label(label) => Some(label.bounds),
        }
    }

    pub fn translate(&mut self, offset: Point) {
        match self {
            RenderElement::Shape(shape) => {
                shape.bounds = shape.bounds.translate(offset);
                translate_commands(&mut shape.path, offset);
                for detail in &mut shape.details {
                    translate_commands(detail, offset);
                }
            }
            RenderElement::Connector(connector) => {
                for point in &mut connector.points {
                    *point = point.add_point(offset);
                }
                for overlay in &mut connector.overlays {
                    translate_commands(&mut overlay.path, offset);
                }
                if let Some(label) = &mut connector.label {
                    label.bounds = label.bounds.translate(offset);
                }
            }
            RenderElement::Label(label) => label.bounds = label.bounds.translate(offset),
        }
    }
}

fn commands_points(commands: &[PathCommand]) -> impl Iterator<Item = Point> + '_ {
    commands.iter().flat_map(PathCommand::points)
}

fn translate_commands(commands: &mut [PathCommand], offset: Point) {
    for command in commands {
        *command = command.translate(offset);
    }
}

/// A resolved shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapeRecord {
    pub kind: ShapeKind,
    /// The unrotated box
    pub bounds: Bounds,
    pub rotation: f32,
    pub flip_h: bool,
    pub flip_v: bool,
    /// Closed boundary in page space
    pub path: Vec<PathCommand>,
    /// Decorative subpaths in page space
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<Vec<PathCommand>>,
    pub fill: FillDefinition,
    pub stroke: Option<StrokeDefinition>,
    pub shadow: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageData>,
    /// Style keys without a typed meaning, in source order
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub passthrough: IndexMap<String, Option<String>>,
}

/// A routed connector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectorRecord {
    /// Drawn polyline, already trimmed for emulated markers
    pub points: Vec<Point>,
    /// The points are control points of a smooth curve
    pub curved: bool,
    pub stroke: Option<StrokeDefinition>,
    pub start_marker: Option<MarkerSpec>,
    pub end_marker: Option<MarkerSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overlays: Vec<MarkerOverlayRecord>,
    /// The connector's own text, centered on the path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelRecord>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub passthrough: IndexMap<String, Option<String>>,
}

/// An unfilled shape drawn over a connector end in place of a native marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOverlayRecord {
    pub kind: ShapeKind,
    pub path: Vec<PathCommand>,
}

/// A text box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRecord {
    pub bounds: Bounds,
    pub text: TextBlock,
}

/// Embedded image content of a shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageData {
    pub media_type: String,
    /// `true` when `bytes` holds the rasterizer output instead of the source
    pub rasterized: bool,
    #[serde(serialize_with = "serialize_base64")]
    pub bytes: Arc<Vec<u8>>,
}

fn serialize_base64<S: Serializer>(bytes: &Arc<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&base64::engine::general_purpose::STANDARD.encode(bytes.as_slice()))
}
