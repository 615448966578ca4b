//! Connector routing.
//!
//! Turns two resolved ends and the explicit waypoints of an edge into the
//! polyline that is drawn, and places the pieces that hang off it: emulated
//! open markers and edge labels.
//!
//! # Path modes
//!
//! - Straight: the ends joined through the waypoints in source order.
//!   Curved edges use the same control polyline and are only flagged.
//! - Orthogonal: every segment is axis-aligned. Each end departs along the
//!   axis of its outward normal when that normal is axis-aligned; otherwise
//!   the `elbow` attribute or the dominant displacement axis decides.

use vellum_core::{
    draw::{OpenMarkerOverlay, PathCommand, ShapeKind},
    geometry::{Bounds, EPSILON, Point, Size, Transform},
    style::{ElbowAxis, HorizontalAlign, StyleAttributes, StyleDefaults},
};

use crate::connect::ResolvedConnection;

/// Largest fraction of the last segment a trim may consume.
const MAX_PARTIAL_TRIM: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    fn dominant(from: Point, to: Point) -> Self {
        let delta = to.sub_point(from);
        if delta.x().abs() >= delta.y().abs() {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Axis of an axis-aligned normal, `None` for slanted or zero normals.
    fn of_normal(normal: Point) -> Option<Self> {
        let horizontal = normal.x().abs() > EPSILON;
        let vertical = normal.y().abs() > EPSILON;
        match (horizontal, vertical) {
            (true, false) => Some(Axis::Horizontal),
            (false, true) => Some(Axis::Vertical),
            _ => None,
        }
    }
}

impl From<ElbowAxis> for Axis {
    fn from(elbow: ElbowAxis) -> Self {
        match elbow {
            ElbowAxis::Horizontal => Axis::Horizontal,
            ElbowAxis::Vertical => Axis::Vertical,
        }
    }
}

/// Straight path through the waypoints.
pub fn straight(start: Point, waypoints: &[Point], end: Point) -> Vec<Point> {
    let mut points = Vec::with_capacity(waypoints.len() + 2);
    points.push(start);
    points.extend_from_slice(waypoints);
    points.push(end);
    points.dedup_by(|a, b| a.approx_eq(*b));
    if points.len() == 1 {
        points.push(end);
    }
    points
}

/// Axis-aligned path between two ends.
///
/// Without waypoints at most two bends are inserted. With waypoints every
/// consecutive pair is joined by one bend; the first pair departs along the
/// start axis and the last pair arrives along the end axis.
pub fn orthogonal(
    start: &ResolvedConnection,
    waypoints: &[Point],
    end: &ResolvedConnection,
    elbow: Option<ElbowAxis>,
) -> Vec<Point> {
    let dominant = Axis::dominant(start.point, end.point);
    let preferred = elbow.map(Axis::from).unwrap_or(dominant);
    let start_axis = Axis::of_normal(start.normal).unwrap_or(preferred);
    let end_axis = Axis::of_normal(end.normal).unwrap_or(preferred);

    let mut points = vec![start.point];
    if waypoints.is_empty() {
        points.extend(elbow_bends(start.point, start_axis, end.point, end_axis));
        points.push(end.point);
    } else {
        let stops: Vec<Point> = waypoints
            .iter()
            .copied()
            .chain(std::iter::once(end.point))
            .collect();
        let last = stops.len() - 1;
        let mut from = start.point;
        for (idx, &to) in stops.iter().enumerate() {
            let axis = if idx == 0 {
                start_axis
            } else if idx == last {
                match end_axis {
                    // Arriving horizontally means the bend comes first.
                    Axis::Horizontal => Axis::Vertical,
                    Axis::Vertical => Axis::Horizontal,
                }
            } else {
                Axis::dominant(from, to)
            };
            if let Some(corner) = single_bend(from, to, axis) {
                points.push(corner);
            }
            points.push(to);
            from = to;
        }
    }

    collapse_collinear(points)
}

/// Bends between two ends without waypoints, excluding the ends.
fn elbow_bends(from: Point, from_axis: Axis, to: Point, to_axis: Axis) -> Vec<Point> {
    if is_aligned(from, to) {
        return Vec::new();
    }
    match (from_axis, to_axis) {
        (Axis::Horizontal, Axis::Horizontal) => {
            let mid_x = (from.x() + to.x()) / 2.0;
            vec![Point::new(mid_x, from.y()), Point::new(mid_x, to.y())]
        }
        (Axis::Vertical, Axis::Vertical) => {
            let mid_y = (from.y() + to.y()) / 2.0;
            vec![Point::new(from.x(), mid_y), Point::new(to.x(), mid_y)]
        }
        (Axis::Horizontal, Axis::Vertical) => vec![Point::new(to.x(), from.y())],
        (Axis::Vertical, Axis::Horizontal) => vec![Point::new(from.x(), to.y())],
    }
}

/// Corner joining two points, leaving `from` along `axis`.
fn single_bend(from: Point, to: Point, axis: Axis) -> Option<Point> {
    if is_aligned(from, to) {
        return None;
    }
    Some(match axis {
        Axis::Horizontal => Point::new(to.x(), from.y()),
        Axis::Vertical => Point::new(from.x(), to.y()),
    })
}

fn is_aligned(a: Point, b: Point) -> bool {
    (a.x() - b.x()).abs() <= EPSILON || (a.y() - b.y()).abs() <= EPSILON
}

/// Removes repeated points and interior points on a straight run.
pub fn collapse_collinear(points: Vec<Point>) -> Vec<Point> {
    let mut result: Vec<Point> = Vec::with_capacity(points.len());
    for point in points {
        if result.last().is_some_and(|last| last.approx_eq(point)) {
            continue;
        }
        if result.len() >= 2 {
            let a = result[result.len() - 2];
            let b = result[result.len() - 1];
            let cross = b.sub_point(a).cross(point.sub_point(b));
            if cross.abs() <= EPSILON {
                result.pop();
            }
        }
        result.push(point);
    }
    result
}

/// Shortens the polyline at its end by `distance`.
///
/// Whole segments are consumed first; the last partial step moves the end
/// at most [`MAX_PARTIAL_TRIM`] of the way along its segment. At least two
/// points are always kept.
pub fn trim_end(points: &[Point], distance: f32) -> Vec<Point> {
    if points.len() < 2 || distance <= 0.0 {
        return points.to_vec();
    }
    let mut trimmed = points.to_vec();
    let mut remaining = distance;

    while trimmed.len() > 2 {
        let n = trimmed.len();
        let length = trimmed[n - 1].distance(trimmed[n - 2]);
        if length > remaining {
            break;
        }
        remaining -= length;
        trimmed.pop();
    }

    let n = trimmed.len();
    let (from, to) = (trimmed[n - 2], trimmed[n - 1]);
    let length = from.distance(to);
    if length > EPSILON {
        let t = (remaining / length).min(MAX_PARTIAL_TRIM);
        trimmed[n - 1] = to.lerp(from, t);
    }
    trimmed
}

/// Shortens the polyline at its start by `distance`.
pub fn trim_start(points: &[Point], distance: f32) -> Vec<Point> {
    let reversed: Vec<Point> = points.iter().rev().copied().collect();
    let mut trimmed = trim_end(&reversed, distance);
    trimmed.reverse();
    trimmed
}

/// Unit direction in which the path leaves through its last point.
pub fn terminal_direction(points: &[Point]) -> Point {
    let Some(&tip) = points.last() else {
        return Point::default();
    };
    points
        .iter()
        .rev()
        .skip(1)
        .find(|p| !p.approx_eq(tip))
        .map(|p| tip.sub_point(*p).normalize())
        .unwrap_or_default()
}

/// Outline of an open marker overlay at `tip`, pointing along `direction`.
///
/// Ovals are centered on the tip; the other overlays end with their point on
/// it.
pub fn overlay_outline(
    overlay: &OpenMarkerOverlay,
    tip: Point,
    direction: Point,
    defaults: &StyleDefaults,
) -> Vec<PathCommand> {
    let diameter = overlay.diameter;
    let size = Size::new(diameter, diameter);
    let center = if overlay.is_centered() {
        tip
    } else {
        tip.sub_point(direction.scale(diameter / 2.0))
    };
    let angle = direction.y().atan2(direction.x()).to_degrees();
    // Triangles are generated apex up; the rhombus already points east.
    let rotation = match overlay.kind {
        ShapeKind::IsoscelesTriangle => angle + 90.0,
        _ => angle,
    };

    let bounds = Bounds::new_from_center(center, size);
    let transform = Transform::for_box(bounds, rotation, false, false);
    overlay
        .kind
        .outline(size, &StyleAttributes::default(), defaults)
        .boundary()
        .transform(&transform)
        .to_commands()
}

/// Point at `fraction` of the polyline length, with the direction of the
/// segment it falls on.
pub fn point_along(points: &[Point], fraction: f32) -> Option<(Point, Point)> {
    let first = *points.first()?;
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= EPSILON {
        let direction = points
            .last()
            .map(|last| last.sub_point(first))
            .unwrap_or_default();
        return Some((first, direction));
    }

    let mut remaining = fraction.clamp(0.0, 1.0) * total;
    let mut last = (first, Point::default());
    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let length = a.distance(b);
        if length <= EPSILON {
            continue;
        }
        let direction = b.sub_point(a);
        if remaining <= length {
            return Some((a.lerp(b, remaining / length), direction));
        }
        remaining -= length;
        last = (b, direction);
    }
    Some(last)
}

/// Where an edge label sits relative to its edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabelPlacement {
    /// Position along the edge, `-1.0` at the source and `1.0` at the target
    pub position: f32,
    /// Distance perpendicular to the edge
    pub distance: f32,
    /// Extra pixel offset
    pub offset: Point,
}

impl LabelPlacement {
    /// Anchor point of the label on the page.
    ///
    /// Orthogonal edges push labels to a fixed side of each segment: above
    /// horizontal runs heading right, to the right of vertical runs heading
    /// down. Other edges use the left-hand normal of the segment.
    pub fn anchor(&self, points: &[Point], orthogonal: bool) -> Option<Point> {
        let fraction = 0.5 + self.position / 2.0;
        let (base, direction) = point_along(points, fraction)?;

        let normal = if orthogonal {
            if direction.x().abs() >= direction.y().abs() {
                if direction.x() >= 0.0 {
                    Point::new(0.0, -1.0)
                } else {
                    Point::new(0.0, 1.0)
                }
            } else if direction.y() >= 0.0 {
                Point::new(1.0, 0.0)
            } else {
                Point::new(-1.0, 0.0)
            }
        } else {
            Point::new(-direction.y(), direction.x()).normalize()
        };

        Some(
            base.add_point(normal.scale(self.distance))
                .add_point(self.offset),
        )
    }

    /// The label box around `anchor`.
    ///
    /// Labels near the source end can hang left of the anchor and labels near
    /// the target end right of it; everything else is centered.
    pub fn label_box(&self, anchor: Point, size: Size, align: HorizontalAlign) -> Bounds {
        let left = match align {
            HorizontalAlign::Left if self.position <= -0.5 => anchor.x(),
            HorizontalAlign::Right if self.position >= 0.5 => anchor.x() - size.width(),
            _ => anchor.x() - size.width() / 2.0,
        };
        Bounds::new_from_top_left(Point::new(left, anchor.y() - size.height() / 2.0), size)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use proptest::prelude::*;

    use vellum_core::{
        draw::{MarkerEnd, MarkerKind},
        style::MarkerAttributes,
    };

    use super::*;

    fn end(x: f32, y: f32, nx: f32, ny: f32) -> ResolvedConnection {
        ResolvedConnection::new(Point::new(x, y), Point::new(nx, ny))
    }

    fn is_axis_aligned(points: &[Point]) -> bool {
        points.windows(2).all(|w| {
            (w[0].x() - w[1].x()).abs() <= 1e-3 || (w[0].y() - w[1].y()).abs() <= 1e-3
        })
    }

    #[test]
    fn test_straight_through_waypoints() {
        let points = straight(
            Point::new(0.0, 0.0),
            &[Point::new(50.0, 10.0)],
            Point::new(100.0, 0.0),
        );
        assert_eq!(points.len(), 3);
        assert_eq!(points[1], Point::new(50.0, 10.0));
    }

    #[test]
    fn test_orthogonal_facing_sides_bend_twice() {
        let points = orthogonal(
            &end(100.0, 50.0, 1.0, 0.0),
            &[],
            &end(300.0, 150.0, -1.0, 0.0),
            None,
        );
        assert_eq!(
            points,
            vec![
                Point::new(100.0, 50.0),
                Point::new(200.0, 50.0),
                Point::new(200.0, 150.0),
                Point::new(300.0, 150.0),
            ]
        );
    }

    #[test]
    fn test_orthogonal_mixed_axes_bend_once() {
        let points = orthogonal(
            &end(100.0, 50.0, 1.0, 0.0),
            &[],
            &end(300.0, 200.0, 0.0, -1.0),
            None,
        );
        assert_eq!(
            points,
            vec![
                Point::new(100.0, 50.0),
                Point::new(300.0, 50.0),
                Point::new(300.0, 200.0),
            ]
        );
    }

    #[test]
    fn test_orthogonal_aligned_ends_stay_straight() {
        let points = orthogonal(
            &end(0.0, 50.0, 1.0, 0.0),
            &[],
            &end(200.0, 50.0, -1.0, 0.0),
            None,
        );
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn test_orthogonal_slanted_normals_use_elbow() {
        let points = orthogonal(
            &end(0.0, 0.0, 0.7, 0.7),
            &[],
            &end(100.0, 300.0, -0.7, -0.7),
            Some(ElbowAxis::Horizontal),
        );
        assert_eq!(points[1], Point::new(50.0, 0.0));
        assert!(is_axis_aligned(&points));
    }

    #[test]
    fn test_orthogonal_with_waypoints() {
        let points = orthogonal(
            &end(0.0, 0.0, 1.0, 0.0),
            &[Point::new(100.0, 100.0), Point::new(200.0, 50.0)],
            &end(300.0, 200.0, 0.0, -1.0),
            None,
        );
        assert!(is_axis_aligned(&points));
        assert_eq!(points.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(points.last(), Some(&Point::new(300.0, 200.0)));
        // Departs horizontally, arrives vertically.
        assert_eq!(points[1].y(), 0.0);
        assert_eq!(points[points.len() - 2].x(), 300.0);
    }

    #[test]
    fn test_collapse_collinear() {
        let points = collapse_collinear(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(20.0, 0.0),
            Point::new(20.0, 10.0),
        ]);
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 0.0),
                Point::new(20.0, 0.0),
                Point::new(20.0, 10.0)
            ]
        );
    }

    #[test]
    fn test_trim_consumes_whole_segments() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0, 4.0),
        ];
        let trimmed = trim_end(&points, 10.0);
        assert_eq!(trimmed.len(), 2);
        assert_approx_eq!(f32, trimmed[1].x(), 94.0);
    }

    #[test]
    fn test_trim_is_capped_and_keeps_two_points() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let trimmed = trim_end(&points, 50.0);
        assert_eq!(trimmed.len(), 2);
        assert_approx_eq!(f32, trimmed[1].x(), 1.0, epsilon = 1e-5);

        let trimmed = trim_start(&points, 2.0);
        assert_approx_eq!(f32, trimmed[0].x(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_oval_overlay_is_centered_on_tip() {
        let attrs = MarkerAttributes {
            kind: Some(MarkerKind::Oval),
            fill: Some(false),
            size: None,
        };
        let defaults = StyleDefaults::default();
        let Some(MarkerEnd::Emulated(overlay)) = MarkerEnd::resolve(&attrs, None, 1.0, &defaults)
        else {
            panic!("unfilled oval should be emulated");
        };

        let commands = overlay_outline(&overlay, Point::new(50.0, 50.0), Point::new(1.0, 0.0), &defaults);
        let points: Vec<Point> = commands.iter().flat_map(PathCommand::points).collect();
        let bounds = Bounds::from_points(points).unwrap();
        assert_approx_eq!(f32, bounds.center().x(), 50.0, epsilon = 0.1);
        assert_approx_eq!(f32, bounds.width(), overlay.diameter, epsilon = 0.1);
    }

    #[test]
    fn test_triangle_overlay_points_along_path() {
        let attrs = MarkerAttributes {
            kind: Some(MarkerKind::Block),
            fill: Some(false),
            size: Some(10.0),
        };
        let defaults = StyleDefaults::default();
        let Some(MarkerEnd::Emulated(overlay)) = MarkerEnd::resolve(&attrs, None, 1.0, &defaults)
        else {
            panic!("unfilled block should be emulated");
        };

        let commands = overlay_outline(&overlay, Point::new(100.0, 0.0), Point::new(1.0, 0.0), &defaults);
        let points: Vec<Point> = commands.iter().flat_map(PathCommand::points).collect();
        let bounds = Bounds::from_points(points).unwrap();
        assert_approx_eq!(f32, bounds.max_x(), 100.0, epsilon = 1e-3);
        assert_approx_eq!(f32, bounds.min_x(), 100.0 - overlay.diameter, epsilon = 1e-3);
    }

    #[test]
    fn test_label_anchor_on_orthogonal_edge() {
        let points = [Point::new(0.0, 0.0), Point::new(100.0, 0.0)];
        let placement = LabelPlacement {
            position: 0.0,
            distance: 10.0,
            offset: Point::new(0.0, 0.0),
        };
        assert_eq!(
            placement.anchor(&points, true),
            Some(Point::new(50.0, -10.0))
        );

        let placement = LabelPlacement {
            position: -1.0,
            distance: 0.0,
            offset: Point::new(3.0, 4.0),
        };
        assert_eq!(placement.anchor(&points, false), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_label_box_alignment() {
        let size = Size::new(40.0, 10.0);
        let anchor = Point::new(100.0, 100.0);
        let near_source = LabelPlacement {
            position: -0.8,
            ..LabelPlacement::default()
        };

        let left = near_source.label_box(anchor, size, HorizontalAlign::Left);
        assert_eq!(left.min_x(), 100.0);

        let centered = near_source.label_box(anchor, size, HorizontalAlign::Right);
        assert_eq!(centered.min_x(), 80.0);
    }

    mod proptest_tests {
        use super::*;

        // ===================================================================
        // Strategies
        // ===================================================================

        fn coordinate() -> impl Strategy<Value = f32> {
            -500.0f32..500.0
        }

        fn point_strategy() -> impl Strategy<Value = Point> {
            (coordinate(), coordinate()).prop_map(|(x, y)| Point::new(x, y))
        }

        fn normal_strategy() -> impl Strategy<Value = Point> {
            prop_oneof![
                Just(Point::new(1.0, 0.0)),
                Just(Point::new(-1.0, 0.0)),
                Just(Point::new(0.0, 1.0)),
                Just(Point::new(0.0, -1.0)),
                Just(Point::new(0.0, 0.0)),
                (0.0f32..360.0).prop_map(|deg| {
                    let (sin, cos) = deg.to_radians().sin_cos();
                    Point::new(cos, sin)
                }),
            ]
        }

        // ===================================================================
        // Property Test Functions
        // ===================================================================

        fn check_orthogonal_is_axis_aligned(
            start: ResolvedConnection,
            end: ResolvedConnection,
            waypoints: Vec<Point>,
        ) -> Result<(), TestCaseError> {
            let points = orthogonal(&start, &waypoints, &end, None);
            prop_assert!(is_axis_aligned(&points), "slanted segment in {points:?}");
            prop_assert!(points.first().unwrap().approx_eq(start.point));
            prop_assert!(points.last().unwrap().approx_eq(end.point));
            Ok(())
        }

        fn check_bends_without_waypoints(
            start: ResolvedConnection,
            end: ResolvedConnection,
        ) -> Result<(), TestCaseError> {
            let points = orthogonal(&start, &[], &end, None);
            prop_assert!(points.len() <= 4, "more than two bends: {points:?}");
            Ok(())
        }

        fn check_trim_keeps_two_points(
            points: Vec<Point>,
            distance: f32,
        ) -> Result<(), TestCaseError> {
            let trimmed = trim_end(&points, distance);
            prop_assert!(trimmed.len() >= 2);
            prop_assert_eq!(trimmed[0], points[0]);
            Ok(())
        }

        // ===================================================================
        // Proptest Wrappers
        // ===================================================================

        proptest! {
            #[test]
            fn orthogonal_is_axis_aligned(
                a in point_strategy(),
                na in normal_strategy(),
                b in point_strategy(),
                nb in normal_strategy(),
                waypoints in prop::collection::vec(point_strategy(), 0..4),
            ) {
                check_orthogonal_is_axis_aligned(
                    ResolvedConnection::new(a, na),
                    ResolvedConnection::new(b, nb),
                    waypoints,
                )?;
            }

            #[test]
            fn bends_without_waypoints(
                a in point_strategy(),
                na in normal_strategy(),
                b in point_strategy(),
                nb in normal_strategy(),
            ) {
                check_bends_without_waypoints(
                    ResolvedConnection::new(a, na),
                    ResolvedConnection::new(b, nb),
                )?;
            }

            #[test]
            fn trim_keeps_two_points(
                points in prop::collection::vec(point_strategy(), 2..6),
                distance in 0.0f32..200.0,
            ) {
                check_trim_keeps_two_points(points, distance)?;
            }
        }
    }
}
