//! Shape outlines in unit-square space.
//!
//! Every shape family produces a [`GeometryOutline`] whose coordinates live
//! in `[0,1]×[0,1]` (control points of curves may overshoot slightly). The
//! outline is mapped onto a page by a [`Transform`] built from the node's
//! box, rotation and flip flags.
//!
//! # Overview
//!
//! - [`PathSegment`] - Line, elliptical arc or cubic curve
//! - [`Subpath`] - A start point plus segments, optionally closed
//! - [`GeometryOutline`] - Closed boundary, decorative detail subpaths and named anchors
//! - [`PathCommand`] - Absolute drawing commands for emitters
//!
//! Boundaries are wound clockwise on screen (y-down), which gives them a
//! positive signed area. A mirroring transform reverses the winding.

use serde::Serialize;

use crate::geometry::{Bounds, EPSILON, Point, Transform};

/// Number of line pieces used when flattening one cubic curve.
pub const CURVE_FLATTEN_STEPS: usize = 16;

/// One segment of a subpath, starting where the previous segment ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathSegment {
    LineTo(Point),
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    /// Elliptical arc. Angles are in degrees measured clockwise from +x on
    /// screen; the arc starts at `start_angle` on the ellipse and sweeps by
    /// `sweep_angle` (positive is clockwise).
    ArcTo {
        center: Point,
        rx: f32,
        ry: f32,
        start_angle: f32,
        sweep_angle: f32,
    },
}

impl PathSegment {
    /// Quadratic curve expressed as the equivalent cubic
    pub fn quad_to(from: Point, ctrl: Point, to: Point) -> Self {
        PathSegment::CubicTo {
            ctrl1: from.lerp(ctrl, 2.0 / 3.0),
            ctrl2: to.lerp(ctrl, 2.0 / 3.0),
            to,
        }
    }

    /// The point where the segment ends
    pub fn end_point(&self) -> Point {
        match *self {
            PathSegment::LineTo(to) | PathSegment::CubicTo { to, .. } => to,
            PathSegment::ArcTo {
                center,
                rx,
                ry,
                start_angle,
                sweep_angle,
            } => ellipse_point(center, rx, ry, start_angle + sweep_angle),
        }
    }

    /// Converts an arc to cubic curves of at most a quarter turn each; other
    /// segments are returned unchanged.
    pub fn to_cubics(&self) -> Vec<PathSegment> {
        let PathSegment::ArcTo {
            center,
            rx,
            ry,
            start_angle,
            sweep_angle,
        } = *self
        else {
            return vec![*self];
        };

        let pieces = (sweep_angle.abs() / 90.0).ceil().max(1.0) as usize;
        let step = sweep_angle / pieces as f32;
        let k = 4.0 / 3.0 * (step.to_radians() / 4.0).tan();

        (0..pieces)
            .map(|i| {
                let a0 = start_angle + step * i as f32;
                let a1 = a0 + step;
                let p0 = ellipse_point(center, rx, ry, a0);
                let p1 = ellipse_point(center, rx, ry, a1);
                PathSegment::CubicTo {
                    ctrl1: p0.add_point(ellipse_tangent(rx, ry, a0).scale(k)),
                    ctrl2: p1.sub_point(ellipse_tangent(rx, ry, a1).scale(k)),
                    to: p1,
                }
            })
            .collect()
    }
}

fn ellipse_point(center: Point, rx: f32, ry: f32, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(center.x() + rx * cos, center.y() + ry * sin)
}

fn ellipse_tangent(rx: f32, ry: f32, degrees: f32) -> Point {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Point::new(-rx * sin, ry * cos)
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x() + b * c1.x() + c * c2.x() + d * p1.x(),
        a * p0.y() + b * c1.y() + c * c2.y() + d * p1.y(),
    )
}

/// A connected run of segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Subpath {
    start: Point,
    segments: Vec<PathSegment>,
    closed: bool,
}

impl Subpath {
    pub fn new(start: Point) -> Self {
        Self {
            start,
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Closed polygon through the given vertices.
    ///
    /// An empty vertex list yields a degenerate subpath at the origin.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new(points.first().copied().unwrap_or_default());
        for &p in points.iter().skip(1) {
            path.line_to(p);
        }
        path.close();
        path
    }

    /// Open polyline through the given points.
    pub fn polyline(points: &[Point]) -> Self {
        let mut path = Self::new(points.first().copied().unwrap_or_default());
        for &p in points.iter().skip(1) {
            path.line_to(p);
        }
        path
    }

    pub fn line_to(&mut self, to: Point) -> &mut Self {
        self.segments.push(PathSegment::LineTo(to));
        self
    }

    pub fn cubic_to(&mut self, ctrl1: Point, ctrl2: Point, to: Point) -> &mut Self {
        self.segments.push(PathSegment::CubicTo { ctrl1, ctrl2, to });
        self
    }

    pub fn quad_to(&mut self, ctrl: Point, to: Point) -> &mut Self {
        let from = self.end_point();
        self.segments.push(PathSegment::quad_to(from, ctrl, to));
        self
    }

    pub fn arc_to(
        &mut self,
        center: Point,
        rx: f32,
        ry: f32,
        start_angle: f32,
        sweep_angle: f32,
    ) -> &mut Self {
        self.segments.push(PathSegment::ArcTo {
            center,
            rx,
            ry,
            start_angle,
            sweep_angle,
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The current end point of the subpath
    pub fn end_point(&self) -> Point {
        self.segments
            .last()
            .map(PathSegment::end_point)
            .unwrap_or(self.start)
    }

    /// The same subpath with arcs replaced by cubic curves.
    pub fn without_arcs(&self) -> Self {
        Self {
            start: self.start,
            segments: self
                .segments
                .iter()
                .flat_map(PathSegment::to_cubics)
                .collect(),
            closed: self.closed,
        }
    }

    /// Maps every point through `f`. Arcs are converted to cubics first, so
    /// the result is exact for affine maps.
    pub fn map_points(&self, f: impl Fn(Point) -> Point) -> Self {
        let flat = self.without_arcs();
        Self {
            start: f(flat.start),
            segments: flat
                .segments
                .iter()
                .map(|segment| match *segment {
                    PathSegment::LineTo(to) => PathSegment::LineTo(f(to)),
                    PathSegment::CubicTo { ctrl1, ctrl2, to } => PathSegment::CubicTo {
                        ctrl1: f(ctrl1),
                        ctrl2: f(ctrl2),
                        to: f(to),
                    },
                    arc @ PathSegment::ArcTo { .. } => arc,
                })
                .collect(),
            closed: flat.closed,
        }
    }

    pub fn transform(&self, transform: &Transform) -> Self {
        self.map_points(|p| transform.apply(p))
    }

    /// Approximates the subpath by a polyline.
    ///
    /// The first point is the start point. For closed subpaths the start is
    /// not repeated at the end, and a final segment ending back on the start
    /// is dropped.
    pub fn flatten(&self) -> Vec<Point> {
        let mut points = vec![self.start];
        let mut current = self.start;
        for segment in &self.segments {
            for piece in segment.to_cubics() {
                match piece {
                    PathSegment::LineTo(to) => points.push(to),
                    PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                        for step in 1..=CURVE_FLATTEN_STEPS {
                            let t = step as f32 / CURVE_FLATTEN_STEPS as f32;
                            points.push(cubic_point(current, ctrl1, ctrl2, to, t));
                        }
                    }
                    PathSegment::ArcTo { .. } => {}
                }
                current = piece.end_point();
            }
        }
        points.dedup_by(|a, b| a.approx_eq(*b));
        if self.closed && points.len() > 1 && points[points.len() - 1].approx_eq(self.start) {
            points.pop();
        }
        points
    }

    /// Flattened segments as `(from, to)` pairs, including the closing edge.
    pub fn flat_segments(&self) -> Vec<(Point, Point)> {
        let points = self.flatten();
        let mut pairs: Vec<(Point, Point)> = points.windows(2).map(|w| (w[0], w[1])).collect();
        if self.closed && points.len() > 2 {
            pairs.push((points[points.len() - 1], points[0]));
        }
        pairs
    }

    /// Shoelace area of the flattened subpath. Positive for clockwise (y-down).
    pub fn signed_area(&self) -> f32 {
        let points = self.flatten();
        if points.len() < 3 {
            return 0.0;
        }
        let n = points.len();
        let twice: f32 = (0..n)
            .map(|i| points[i].cross(points[(i + 1) % n]))
            .sum();
        twice / 2.0
    }

    /// Whether the flattened closed subpath has no self-intersections.
    ///
    /// Adjacent edges may touch at their shared vertex only.
    pub fn is_simple(&self) -> bool {
        let edges = self.flat_segments();
        let n = edges.len();
        if n < 3 {
            return false;
        }
        for i in 0..n {
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (self.closed && i == 0 && j == n - 1);
                if adjacent {
                    continue;
                }
                if segments_intersect(edges[i], edges[j]) {
                    return false;
                }
            }
        }
        true
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.flatten())
    }

    /// Absolute drawing commands for this subpath.
    pub fn to_commands(&self) -> Vec<PathCommand> {
        let flat = self.without_arcs();
        let mut commands = Vec::with_capacity(flat.segments.len() + 2);
        commands.push(PathCommand::MoveTo(flat.start));
        for segment in &flat.segments {
            match *segment {
                PathSegment::LineTo(to) => commands.push(PathCommand::LineTo(to)),
                PathSegment::CubicTo { ctrl1, ctrl2, to } => {
                    commands.push(PathCommand::CubicTo { ctrl1, ctrl2, to })
                }
                PathSegment::ArcTo { .. } => {}
            }
        }
        if flat.closed {
            commands.push(PathCommand::Close);
        }
        commands
    }
}

fn orientation(a: Point, b: Point, c: Point) -> f32 {
    b.sub_point(a).cross(c.sub_point(a))
}

/// Proper or touching intersection test, with a small tolerance for
/// numerically coincident endpoints.
fn segments_intersect((p1, p2): (Point, Point), (q1, q2): (Point, Point)) -> bool {
    let tol = 1e-7;
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);
    if ((d1 > tol && d2 < -tol) || (d1 < -tol && d2 > tol))
        && ((d3 > tol && d4 < -tol) || (d3 < -tol && d4 > tol))
    {
        return true;
    }
    let on_segment = |a: Point, b: Point, p: Point| {
        p.x() >= a.x().min(b.x()) - tol
            && p.x() <= a.x().max(b.x()) + tol
            && p.y() >= a.y().min(b.y()) - tol
            && p.y() <= a.y().max(b.y()) + tol
    };
    (d1.abs() <= tol && on_segment(q1, q2, p1))
        || (d2.abs() <= tol && on_segment(q1, q2, p2))
        || (d3.abs() <= tol && on_segment(p1, p2, q1))
        || (d4.abs() <= tol && on_segment(p1, p2, q2))
}

/// Closest point to `p` on the segment `a`–`b`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b.sub_point(a);
    let len_sq = ab.dot(ab);
    if len_sq <= f32::EPSILON {
        return a;
    }
    let t = (p.sub_point(a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a.lerp(b, t)
}

/// Name of an anchor point on an outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorName {
    North,
    East,
    South,
    West,
    /// A distinguished vertex (triangle apex, star point, arrow tip), numbered
    /// in outline order
    Apex(usize),
}

/// A named point on the outline, in unit space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub name: AnchorName,
    pub point: Point,
}

/// The normalized outline of a shape.
///
/// # Examples
///
/// ```
/// # use vellum_core::draw::{AnchorName, GeometryOutline, Subpath};
/// # use vellum_core::geometry::Point;
/// let square = Subpath::polygon(&[
///     Point::new(0.0, 0.0),
///     Point::new(1.0, 0.0),
///     Point::new(1.0, 1.0),
///     Point::new(0.0, 1.0),
/// ]);
/// let outline = GeometryOutline::new(square);
/// assert_eq!(outline.anchor(AnchorName::East), Some(Point::new(1.0, 0.5)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryOutline {
    boundary: Subpath,
    details: Vec<Subpath>,
    anchors: Vec<Anchor>,
}

impl GeometryOutline {
    /// Creates an outline with compass anchors derived from the boundary.
    pub fn new(boundary: Subpath) -> Self {
        let anchors = [
            (AnchorName::North, Point::new(0.0, -1.0)),
            (AnchorName::East, Point::new(1.0, 0.0)),
            (AnchorName::South, Point::new(0.0, 1.0)),
            (AnchorName::West, Point::new(-1.0, 0.0)),
        ]
        .into_iter()
        .filter_map(|(name, direction)| {
            ray_hit(&boundary, Point::new(0.5, 0.5), direction).map(|point| Anchor { name, point })
        })
        .collect();

        Self {
            boundary,
            details: Vec::new(),
            anchors,
        }
    }

    pub fn with_detail(mut self, detail: Subpath) -> Self {
        self.details.push(detail);
        self
    }

    /// Adds apex anchors in the given order.
    pub fn with_apexes(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        let first = self
            .anchors
            .iter()
            .filter(|a| matches!(a.name, AnchorName::Apex(_)))
            .count();
        self.anchors
            .extend(points.into_iter().enumerate().map(|(idx, point)| Anchor {
                name: AnchorName::Apex(first + idx),
                point,
            }));
        self
    }

    pub fn boundary(&self) -> &Subpath {
        &self.boundary
    }

    pub fn details(&self) -> &[Subpath] {
        &self.details
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn anchor(&self, name: AnchorName) -> Option<Point> {
        self.anchors
            .iter()
            .find(|anchor| anchor.name == name)
            .map(|anchor| anchor.point)
    }

    /// Applies a unit-space map to every path and anchor.
    pub fn map_points(&self, f: impl Fn(Point) -> Point + Copy) -> Self {
        Self {
            boundary: self.boundary.map_points(f),
            details: self.details.iter().map(|d| d.map_points(f)).collect(),
            anchors: self
                .anchors
                .iter()
                .map(|anchor| Anchor {
                    name: anchor.name,
                    point: f(anchor.point),
                })
                .collect(),
        }
    }

    /// Point where a ray from `origin` along `direction` leaves the boundary.
    pub fn ray_hit(&self, origin: Point, direction: Point) -> Option<Point> {
        ray_hit(&self.boundary, origin, direction)
    }
}

/// Farthest intersection of a ray with the flattened boundary.
fn ray_hit(boundary: &Subpath, origin: Point, direction: Point) -> Option<Point> {
    if direction.hypot() < EPSILON {
        return None;
    }
    let mut best: Option<f32> = None;
    for (a, b) in boundary.flat_segments() {
        let edge = b.sub_point(a);
        let denom = direction.cross(edge);
        if denom.abs() < f32::EPSILON {
            continue;
        }
        let diff = a.sub_point(origin);
        let t = diff.cross(edge) / denom;
        let u = diff.cross(direction) / denom;
        if t >= 0.0 && (-1e-6..=1.0 + 1e-6).contains(&u) && best.is_none_or(|b| t > b) {
            best = Some(t);
        }
    }
    best.map(|t| origin.add_point(direction.scale(t)))
}

/// Absolute path command.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    CubicTo { ctrl1: Point, ctrl2: Point, to: Point },
    Close,
}

impl PathCommand {
    /// Points carried by the command, control points included
    pub fn points(&self) -> Vec<Point> {
        match *self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => vec![p],
            PathCommand::CubicTo { ctrl1, ctrl2, to } => vec![ctrl1, ctrl2, to],
            PathCommand::Close => Vec::new(),
        }
    }

    pub fn translate(&self, offset: Point) -> Self {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(p.add_point(offset)),
            PathCommand::LineTo(p) => PathCommand::LineTo(p.add_point(offset)),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => PathCommand::CubicTo {
                ctrl1: ctrl1.add_point(offset),
                ctrl2: ctrl2.add_point(offset),
                to: to.add_point(offset),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}
