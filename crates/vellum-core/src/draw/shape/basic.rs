//! Rectangles, ellipses, triangles, regular polygons, stars and the cross.

use std::f32::consts::PI;

use super::{Figure, Params, p};
use crate::{draw::outline::Subpath, geometry::Point};

pub(super) fn rectangle(params: &Params) -> Figure {
    if !params.attrs.is_rounded() {
        return Figure::polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);
    }

    let min_side = params.min_side();
    let arc = params.attrs.arc_size(params.defaults).clamp(0.0, 50.0);
    let radius = (min_side * arc / 100.0).min(min_side / 2.0);
    let rx = params.unit_x(radius);
    let ry = params.unit_y(radius);
    if rx <= 0.0 || ry <= 0.0 {
        return Figure::polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]);
    }

    let mut path = Subpath::new(p(rx, 0.0));
    path.line_to(p(1.0 - rx, 0.0))
        .arc_to(p(1.0 - rx, ry), rx, ry, -90.0, 90.0)
        .line_to(p(1.0, 1.0 - ry))
        .arc_to(p(1.0 - rx, 1.0 - ry), rx, ry, 0.0, 90.0)
        .line_to(p(rx, 1.0))
        .arc_to(p(rx, 1.0 - ry), rx, ry, 90.0, 90.0)
        .line_to(p(0.0, ry))
        .arc_to(p(rx, ry), rx, ry, 180.0, 90.0)
        .close();
    Figure::new(path)
}

pub(super) fn ellipse() -> Figure {
    let mut path = Subpath::new(p(0.5, 0.0));
    path.arc_to(p(0.5, 0.5), 0.5, 0.5, -90.0, 360.0).close();
    Figure::new(path)
}

pub(super) fn rhombus() -> Figure {
    let vertices = [p(0.5, 0.0), p(1.0, 0.5), p(0.5, 1.0), p(0.0, 0.5)];
    Figure::polygon(&vertices).with_apexes(vertices)
}

pub(super) fn triangle() -> Figure {
    Figure::polygon(&[p(0.0, 0.0), p(1.0, 0.5), p(0.0, 1.0)]).with_apexes([p(1.0, 0.5)])
}

pub(super) fn isosceles_triangle() -> Figure {
    Figure::polygon(&[p(0.5, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).with_apexes([p(0.5, 0.0)])
}

pub(super) fn merge() -> Figure {
    Figure::polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(0.5, 1.0)]).with_apexes([p(0.5, 1.0)])
}

pub(super) fn right_triangle() -> Figure {
    Figure::polygon(&[p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).with_apexes([p(0.0, 1.0)])
}

/// Regular polygon with a vertex at the top, stretched to fill the unit square.
pub(super) fn regular_polygon(sides: u32) -> Figure {
    let sides = sides.clamp(3, 32);
    let raw: Vec<Point> = (0..sides)
        .map(|i| {
            let angle = -PI / 2.0 + 2.0 * PI * i as f32 / sides as f32;
            p(0.5 + 0.5 * angle.cos(), 0.5 + 0.5 * angle.sin())
        })
        .collect();

    let (min_x, max_x, min_y, max_y) = raw.iter().fold(
        (f32::MAX, f32::MIN, f32::MAX, f32::MIN),
        |(min_x, max_x, min_y, max_y), v| {
            (
                min_x.min(v.x()),
                max_x.max(v.x()),
                min_y.min(v.y()),
                max_y.max(v.y()),
            )
        },
    );
    let span_x = (max_x - min_x).max(f32::EPSILON);
    let span_y = (max_y - min_y).max(f32::EPSILON);
    let vertices: Vec<Point> = raw
        .iter()
        .map(|v| p((v.x() - min_x) / span_x, (v.y() - min_y) / span_y))
        .collect();

    Figure::polygon(&vertices).with_apexes(vertices.iter().copied())
}

/// Default inner radius ratio for a star with `points` points.
pub(super) fn default_star_ratio(points: u32) -> f32 {
    match points {
        4 | 5 => 0.38,
        6 => 0.58,
        8 => 0.71,
        _ => 0.5,
    }
}

/// Star with `2·points` vertices alternating outer and inner radius,
/// starting at the top apex and winding clockwise.
pub(super) fn star(points: u32, params: &Params) -> Figure {
    let points = points.clamp(3, 32);
    let ratio = params
        .attrs
        .geometry
        .size
        .filter(|value| value.is_finite() && *value > 0.0)
        .unwrap_or_else(|| default_star_ratio(points))
        .clamp(0.1, 0.9);

    let center = p(0.5, 0.5);
    let vertices: Vec<Point> = (0..points * 2)
        .map(|i| {
            let angle = -PI / 2.0 + PI * i as f32 / points as f32;
            let radius = if i % 2 == 0 { 0.5 } else { 0.5 * ratio };
            p(
                center.x() + radius * angle.cos(),
                center.y() + radius * angle.sin(),
            )
        })
        .collect();

    let outer: Vec<Point> = vertices.iter().step_by(2).copied().collect();
    Figure::polygon(&vertices).with_apexes(outer)
}

/// Plus sign; `size` is the arm thickness as a fraction of the shorter side.
pub(super) fn cross(params: &Params) -> Figure {
    let thickness = params.size_fraction(0.2, 0.9).max(0.05) * params.min_side();
    let tx = (params.unit_x(thickness) / 2.0).min(0.45);
    let ty = (params.unit_y(thickness) / 2.0).min(0.45);
    let (l, r, t, b) = (0.5 - tx, 0.5 + tx, 0.5 - ty, 0.5 + ty);

    Figure::polygon(&[
        p(l, 0.0),
        p(r, 0.0),
        p(r, t),
        p(1.0, t),
        p(1.0, b),
        p(r, b),
        p(r, 1.0),
        p(l, 1.0),
        p(l, b),
        p(0.0, b),
        p(0.0, t),
        p(l, t),
    ])
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::style::{StyleAttributes, StyleDefaults};

    fn params<'a>(
        width: f32,
        height: f32,
        attrs: &'a StyleAttributes,
        defaults: &'a StyleDefaults,
    ) -> Params<'a> {
        Params {
            width,
            height,
            attrs,
            defaults,
        }
    }

    #[test]
    fn test_regular_polygon_fills_unit_square() {
        let figure = regular_polygon(5);
        let bounds = figure.boundary.bounds().unwrap();
        assert_approx_eq!(f32, bounds.min_x(), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.max_x(), 1.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.min_y(), 0.0, epsilon = 1e-5);
        assert_approx_eq!(f32, bounds.max_y(), 1.0, epsilon = 1e-5);
        assert_eq!(figure.apexes.len(), 5);
    }

    #[test]
    fn test_regular_polygon_clamps_sides() {
        assert_eq!(regular_polygon(1).boundary.flatten().len(), 3);
        assert_eq!(regular_polygon(100).boundary.flatten().len(), 32);
    }

    #[test]
    fn test_star_ratio_defaults() {
        assert_eq!(default_star_ratio(4), 0.38);
        assert_eq!(default_star_ratio(6), 0.58);
        assert_eq!(default_star_ratio(8), 0.71);
        assert_eq!(default_star_ratio(12), 0.5);
    }

    #[test]
    fn test_star_ratio_override_is_clamped() {
        let mut attrs = StyleAttributes::default();
        attrs.geometry.size = Some(0.01);
        let defaults = StyleDefaults::default();
        let figure = star(5, &params(100.0, 100.0, &attrs, &defaults));

        let inner = figure.boundary.flatten()[1];
        assert_approx_eq!(f32, inner.distance(p(0.5, 0.5)), 0.05, epsilon = 1e-5);
    }

    #[test]
    fn test_rounded_rectangle_uses_arc_size_percent() {
        let mut attrs = StyleAttributes::default();
        attrs.geometry.rounded = Some(true);
        attrs.geometry.arc_size = Some(10.0);
        let defaults = StyleDefaults::default();
        let figure = rectangle(&params(200.0, 100.0, &attrs, &defaults));

        // radius = 10% of 100px = 10px
        assert_approx_eq!(f32, figure.boundary.start().x(), 10.0 / 200.0);
    }

    #[test]
    fn test_cross_arms_meet_edges() {
        let attrs = StyleAttributes::default();
        let defaults = StyleDefaults::default();
        let figure = cross(&params(100.0, 100.0, &attrs, &defaults));
        let vertices = figure.boundary.flatten();
        assert_eq!(vertices.len(), 12);
        assert_approx_eq!(f32, vertices[0].x(), 0.4);
        assert_approx_eq!(f32, vertices[1].x(), 0.6);
    }
}
