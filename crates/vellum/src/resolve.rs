//! Shape geometry resolution.
//!
//! The first translation phase turns every [`ShapeNode`] into a
//! [`ResolvedShape`]: the family outline mapped from unit space onto the
//! node's box, flip and rotation. Connection resolution and routing only
//! ever read these values.

use vellum_core::{
    document::ShapeNode,
    draw::{GeometryOutline, ShapeKind, closest_point_on_segment},
    geometry::{Bounds, Point, Size, Transform},
    identifier::Id,
    style::{StyleAttributes, StyleDefaults},
};

/// A shape whose outline has been placed on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedShape {
    id: Id,
    kind: ShapeKind,
    bounds: Bounds,
    rotation: f32,
    transform: Transform,
    orientation: Transform,
    local: GeometryOutline,
    outline: GeometryOutline,
    ordinal: usize,
    degenerate: bool,
}

impl ResolvedShape {
    /// Generates and places the outline of `node`.
    ///
    /// Boxes with zero or non-finite sides still get a rectangle outline so
    /// that later phases can fall back to the box center.
    pub fn resolve(node: &ShapeNode, defaults: &StyleDefaults) -> Self {
        let degenerate = node.bounds.to_size().is_degenerate();
        let local = if degenerate {
            ShapeKind::Rectangle.outline(Size::new(1.0, 1.0), &StyleAttributes::default(), defaults)
        } else {
            node.kind.outline(node.bounds.to_size(), &node.style, defaults)
        };
        let transform = Transform::for_box(node.bounds, node.rotation, node.flip_h, node.flip_v);
        let outline = local.map_points(|p| transform.apply(p));
        let orientation = Transform::orientation(node.rotation, node.flip_h, node.flip_v);

        Self {
            id: node.id,
            kind: node.kind,
            bounds: node.bounds,
            rotation: node.rotation,
            transform,
            orientation,
            local,
            outline,
            ordinal: node.ordinal,
            degenerate,
        }
    }

    pub fn id(&self) -> Id {
        self.id
    }

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    /// The unrotated box
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Unit space to page space
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Flip and rotation without scale, for pixel offsets
    pub fn orientation(&self) -> &Transform {
        &self.orientation
    }

    /// The outline in unit space
    pub fn local(&self) -> &GeometryOutline {
        &self.local
    }

    /// The outline in page space
    pub fn outline(&self) -> &GeometryOutline {
        &self.outline
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Nearest boundary point to `target` and the outward normal there.
    ///
    /// Segments are scanned in outline order and the first minimum wins, so
    /// ties resolve to the earliest segment.
    pub fn nearest_point(&self, target: Point) -> Option<(Point, Point)> {
        let clockwise = self.outline.boundary().signed_area() >= 0.0;
        let mut best: Option<(f32, Point, Point)> = None;

        for (a, b) in self.outline.boundary().flat_segments() {
            let candidate = closest_point_on_segment(target, a, b);
            let distance = candidate.distance(target);
            if best.is_none_or(|(d, _, _)| distance < d) {
                best = Some((distance, candidate, outward_normal(a, b, clockwise)));
            }
        }
        best.map(|(_, point, normal)| (point, normal))
    }

    /// Outward normal of the boundary segment nearest to `point`.
    pub fn normal_at(&self, point: Point) -> Point {
        self.nearest_point(point)
            .map(|(_, normal)| normal)
            .unwrap_or_default()
    }
}

/// Unit normal pointing away from the interior of a boundary edge.
fn outward_normal(a: Point, b: Point, clockwise: bool) -> Point {
    let edge = b.sub_point(a);
    let normal = if clockwise {
        Point::new(edge.y(), -edge.x())
    } else {
        Point::new(-edge.y(), edge.x())
    };
    normal.normalize()
}

/// A plain shape node for tests in this crate.
#[cfg(test)]
pub(crate) fn shape_node(id: &str, kind: ShapeKind, bounds: Bounds, ordinal: usize) -> ShapeNode {
    ShapeNode {
        id: Id::new(id),
        kind,
        bounds,
        rotation: 0.0,
        flip_h: false,
        flip_v: false,
        style: StyleAttributes::default(),
        parent: None,
        text: Vec::new(),
        ordinal,
    }
}
