//! Input document tree.
//!
//! The raw types ([`Document`], [`Page`], [`RawNode`]) mirror the JSON input
//! one-to-one. After style parsing and ordering, each page becomes a
//! [`PageModel`] holding immutable typed nodes: [`ShapeNode`], [`EdgeNode`]
//! and [`EdgeLabelNode`].
//!
//! ```
//! # use vellum_core::document::{Document, NodeKind};
//! let json = r#"{"pages": [{"nodes": [
//!     {"id": "0"},
//!     {"id": "a", "parent": "0", "kind": "vertex",
//!      "geometry": {"x": 0, "y": 0, "width": 10, "height": 10}}
//! ]}]}"#;
//! let document: Document = serde_json::from_str(json).unwrap();
//! assert_eq!(document.pages[0].nodes[1].kind, Some(NodeKind::Vertex));
//! ```

use serde::{Deserialize, Serialize};

use crate::{
    draw::{ShapeKind, TextRun, text::runs_from_label},
    geometry::{Bounds, Point, Size},
    identifier::Id,
    style::StyleAttributes,
};

/// A multi-page diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub pages: Vec<Page>,
}

fn default_scale() -> f32 {
    1.0
}

/// One page of the input document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// Page width in pixels; defaults to the content bounds
    #[serde(default)]
    pub width: Option<f32>,
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default = "default_scale")]
    pub scale: f32,
    #[serde(default)]
    pub nodes: Vec<RawNode>,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            id: None,
            name: None,
            width: None,
            height: None,
            scale: default_scale(),
            nodes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Vertex,
    Edge,
}

/// Node geometry as stored in the input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Set on edge labels: `x` is the position along the edge (-1..1) and
    /// `y` the perpendicular distance
    pub relative: bool,
    pub offset: Option<Point>,
}

impl RawGeometry {
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_top_left(Point::new(self.x, self.y), Size::new(self.width, self.height))
    }
}

/// Node text, either a plain label or pre-split runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawText {
    Plain(String),
    Runs(Vec<TextRun>),
}

impl RawText {
    /// Converts to runs, stripping HTML from plain labels when `html` is set.
    pub fn into_runs(self, html: bool) -> Vec<TextRun> {
        match self {
            RawText::Plain(text) => runs_from_label(&text, html),
            RawText::Runs(runs) => runs,
        }
    }
}

/// A node exactly as it appears in the input.
///
/// Nodes without `kind` are structural roots and emit nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawNode {
    pub id: String,
    pub parent: Option<String>,
    pub kind: Option<NodeKind>,
    pub style: String,
    pub geometry: Option<RawGeometry>,
    pub text: Option<RawText>,
    pub source: Option<String>,
    pub target: Option<String>,
    pub waypoints: Vec<Point>,
    pub source_point: Option<Point>,
    pub target_point: Option<Point>,
    /// draw.io `arrows` edge default: an implicit classic end marker
    pub arrows: Option<bool>,
    /// Explicit sibling order
    pub ordinal: Option<u64>,
}

impl RawNode {
    pub fn is_vertex(&self) -> bool {
        self.kind == Some(NodeKind::Vertex)
    }

    pub fn is_edge(&self) -> bool {
        self.kind == Some(NodeKind::Edge)
    }
}

/// A resolved shape node. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeNode {
    pub id: Id,
    pub kind: ShapeKind,
    /// Absolute box; already squared for fixed-aspect families
    pub bounds: Bounds,
    pub rotation: f32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub style: StyleAttributes,
    pub parent: Option<Id>,
    pub text: Vec<TextRun>,
    /// Dense source pre-order index
    pub ordinal: usize,
}

/// A resolved connector node. Immutable after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeNode {
    pub id: Id,
    pub source: Option<Id>,
    pub target: Option<Id>,
    pub waypoints: Vec<Point>,
    pub source_point: Option<Point>,
    pub target_point: Option<Point>,
    pub style: StyleAttributes,
    pub text: Vec<TextRun>,
    pub arrows: bool,
    pub ordinal: usize,
}

/// A label vertex attached to an edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLabelNode {
    pub id: Id,
    pub edge: Id,
    /// Position along the edge, `-1.0` at the source and `1.0` at the target
    pub position: f32,
    /// Perpendicular distance from the edge path
    pub distance: f32,
    /// Extra pixel offset
    pub offset: Point,
    pub style: StyleAttributes,
    pub text: Vec<TextRun>,
    pub ordinal: usize,
}

/// The typed nodes of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageModel {
    pub id: String,
    pub name: String,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub scale: f32,
    pub shapes: Vec<ShapeNode>,
    pub edges: Vec<EdgeNode>,
    pub labels: Vec<EdgeLabelNode>,
}

impl PageModel {
    pub fn shape(&self, id: Id) -> Option<&ShapeNode> {
        self.shapes.iter().find(|shape| shape.id == id)
    }

    /// Number of nodes that produce output
    pub fn node_count(&self) -> usize {
        self.shapes.len() + self.edges.len() + self.labels.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_node() {
        let json = r#"{
            "id": "e", "parent": "1", "kind": "edge", "style": "endArrow=classic;",
            "source": "a", "target": "b",
            "waypoints": [{"x": 200, "y": 40}],
            "target_point": {"x": 5, "y": 6},
            "arrows": true, "ordinal": 3,
            "text": [{"text": "bold", "bold": true}, {"text": "plain"}]
        }"#;
        let node: RawNode = serde_json::from_str(json).unwrap();

        assert!(node.is_edge());
        assert_eq!(node.waypoints, vec![Point::new(200.0, 40.0)]);
        assert_eq!(node.target_point, Some(Point::new(5.0, 6.0)));
        assert_eq!(node.arrows, Some(true));
        assert_eq!(node.ordinal, Some(3));

        let runs = node.text.unwrap().into_runs(false);
        assert_eq!(runs.len(), 2);
        assert!(runs[0].bold);
        assert!(!runs[1].bold);
    }

    #[test]
    fn test_structural_root_has_no_kind() {
        let node: RawNode = serde_json::from_str(r#"{"id": "0"}"#).unwrap();
        assert_eq!(node.kind, None);
        assert!(!node.is_vertex() && !node.is_edge());
    }

    #[test]
    fn test_page_defaults() {
        let page: Page = serde_json::from_str("{}").unwrap();
        assert_eq!(page.scale, 1.0);
        assert!(page.nodes.is_empty());
        assert_eq!(page.width, None);
    }

    #[test]
    fn test_plain_text_html() {
        let text = RawText::Plain("a<br>b".to_string());
        assert_eq!(text.clone().into_runs(true), vec![TextRun::plain("a\nb")]);
        assert_eq!(text.into_runs(false), vec![TextRun::plain("a<br>b")]);
    }

    #[test]
    fn test_label_geometry() {
        let json = r#"{"x": -0.5, "y": 10, "relative": true, "offset": {"x": 2, "y": 3}}"#;
        let geometry: RawGeometry = serde_json::from_str(json).unwrap();
        assert!(geometry.relative);
        assert_eq!(geometry.offset, Some(Point::new(2.0, 3.0)));
        assert_eq!(geometry.width, 0.0);
    }
}
