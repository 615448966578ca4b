//! Connection point resolution.
//!
//! Every connector end that references a shape is resolved to an absolute
//! point on that shape's outline plus the outward direction at that point.
//!
//! - An explicit port (`exitX`/`exitY`, `entryX`/`entryY`) is placed in the
//!   unrotated unit square, projected onto the outline when it falls inside
//!   it, then transformed with the shape.
//! - Without a port, the end goes to the boundary point nearest to the
//!   opposite reference.
//! - Orthogonal connectors without any port attach to side midpoints.

use vellum_core::{
    draw::{AnchorName, ShapeKind, closest_point_on_segment},
    geometry::Point,
    style::PortAttributes,
};

use crate::resolve::ResolvedShape;

/// Distance in unit space under which a fraction counts as lying on the outline.
const ON_OUTLINE_TOLERANCE: f32 = 1e-3;

/// The resolved end of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResolvedConnection {
    pub point: Point,
    /// Unit outward direction; zero for degenerate shapes and floating ends
    pub normal: Point,
}

impl ResolvedConnection {
    pub fn new(point: Point, normal: Point) -> Self {
        Self { point, normal }
    }

    /// A floating end without direction.
    pub fn floating(point: Point) -> Self {
        Self::new(point, Point::default())
    }
}

/// Side of the unit square a port fraction sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    Left,
    Right,
    Top,
    Bottom,
}

impl PortSide {
    /// Infers the side from a fraction; `None` at the exact center.
    pub fn infer(x: f32, y: f32) -> Option<Self> {
        let dx = x - 0.5;
        let dy = y - 0.5;
        if dx.abs() < f32::EPSILON && dy.abs() < f32::EPSILON {
            return None;
        }
        let side = if dx.abs() >= dy.abs() {
            if dx < 0.0 { Self::Left } else { Self::Right }
        } else if dy < 0.0 {
            Self::Top
        } else {
            Self::Bottom
        };
        Some(side)
    }

    /// Outward direction in unit space
    fn normal(self) -> Point {
        match self {
            Self::Left => Point::new(-1.0, 0.0),
            Self::Right => Point::new(1.0, 0.0),
            Self::Top => Point::new(0.0, -1.0),
            Self::Bottom => Point::new(0.0, 1.0),
        }
    }
}

/// Resolves an explicit port, or returns `None` when the port carries no fraction.
pub fn resolve_port(shape: &ResolvedShape, port: &PortAttributes) -> Option<ResolvedConnection> {
    let (fx, fy) = port.fraction()?;
    if shape.is_degenerate() {
        return Some(ResolvedConnection::floating(shape.center()));
    }

    let requested = Point::new(fx, fy);
    let unit = if port.perimeter.unwrap_or(true) {
        project_onto_outline(shape, requested)
    } else {
        requested
    };

    let (dx, dy) = port.offset();
    let offset = shape.orientation().apply_vector(Point::new(dx, dy));
    let on_outline = shape.transform().apply(unit);
    let point = on_outline.add_point(offset);

    let side = PortSide::infer(unit.x(), unit.y()).filter(|_| is_rectangular(shape.kind()));
    let normal = match side {
        Some(side) => shape.transform().apply_vector(side.normal()).normalize(),
        None => shape.normal_at(on_outline),
    };

    Some(ResolvedConnection::new(point, normal))
}

/// Resolves an end without a port to the boundary point nearest to `toward`.
pub fn resolve_nearest(shape: &ResolvedShape, toward: Point) -> ResolvedConnection {
    if shape.is_degenerate() {
        return ResolvedConnection::floating(shape.center());
    }
    shape
        .nearest_point(toward)
        .map(|(point, normal)| ResolvedConnection::new(point, normal))
        .unwrap_or_else(|| ResolvedConnection::floating(shape.center()))
}

/// Resolves an orthogonal end to the side midpoint facing `toward`.
///
/// The side is picked by the dominant axis of the center displacement;
/// horizontal wins when both axes are equal.
pub fn resolve_side_midpoint(shape: &ResolvedShape, toward: Point) -> ResolvedConnection {
    if shape.is_degenerate() {
        return ResolvedConnection::floating(shape.center());
    }
    let center = shape.center();
    let displacement = toward.sub_point(center);

    let mut best: Option<(f32, Point)> = None;
    for name in [
        AnchorName::East,
        AnchorName::West,
        AnchorName::South,
        AnchorName::North,
    ] {
        let Some(anchor) = shape.outline().anchor(name) else {
            continue;
        };
        let score = anchor.sub_point(center).normalize().dot(displacement);
        if best.is_none_or(|(s, _)| score > s) {
            best = Some((score, anchor));
        }
    }

    match best {
        Some((_, anchor)) => {
            ResolvedConnection::new(anchor, anchor.sub_point(center).normalize())
        }
        None => resolve_nearest(shape, toward),
    }
}

/// Families whose ports snap to the sides of the box.
fn is_rectangular(kind: ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Rectangle
            | ShapeKind::Square
            | ShapeKind::Text
            | ShapeKind::Image
            | ShapeKind::Swimlane
            | ShapeKind::PredefinedProcess
    )
}

/// Moves a unit-space fraction onto the unit-space outline.
fn project_onto_outline(shape: &ResolvedShape, fraction: Point) -> Point {
    let local = shape.local();
    let nearest = |target: Point| {
        local
            .boundary()
            .flat_segments()
            .into_iter()
            .map(|(a, b)| closest_point_on_segment(target, a, b))
            .fold(None::<Point>, |best, candidate| match best {
                Some(b) if b.distance(target) <= candidate.distance(target) => Some(b),
                _ => Some(candidate),
            })
            .unwrap_or(target)
    };

    let closest = nearest(fraction);
    if closest.distance(fraction) <= ON_OUTLINE_TOLERANCE {
        return closest;
    }

    if is_rectangular(shape.kind()) {
        return nearest(snap_to_square_edge(fraction));
    }

    let center = Point::new(0.5, 0.5);
    local
        .ray_hit(center, fraction.sub_point(center))
        .unwrap_or(closest)
}

/// Clamps a fraction into the unit square and pushes interior points to the
/// nearest side.
fn snap_to_square_edge(fraction: Point) -> Point {
    let x = fraction.x().clamp(0.0, 1.0);
    let y = fraction.y().clamp(0.0, 1.0);
    let sides = [
        (x, Point::new(0.0, y)),
        (1.0 - x, Point::new(1.0, y)),
        (y, Point::new(x, 0.0)),
        (1.0 - y, Point::new(x, 1.0)),
    ];
    sides
        .into_iter()
        .fold(None::<(f32, Point)>, |best, (distance, point)| match best {
            Some((d, _)) if d <= distance => best,
            _ => Some((distance, point)),
        })
        .map(|(_, point)| point)
        .unwrap_or(fraction)
}
