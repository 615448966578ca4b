//! Flowchart families: skewed quads, cylinder, cloud, document, tape and friends.

use super::{Figure, Params, p};
use crate::draw::outline::Subpath;

/// Upper bound for skew-style `size` fractions.
const MAX_SKEW: f32 = 0.48;

pub(super) fn parallelogram(params: &Params) -> Figure {
    let s = params.size_fraction(0.2, MAX_SKEW);
    Figure::polygon(&[p(s, 0.0), p(1.0, 0.0), p(1.0 - s, 1.0), p(0.0, 1.0)])
}

pub(super) fn trapezoid(params: &Params) -> Figure {
    let s = params.size_fraction(0.2, MAX_SKEW);
    Figure::polygon(&[p(s, 0.0), p(1.0 - s, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
}

/// Quad with a sloped top edge; `size` is the drop of the left corner.
pub(super) fn manual_input(params: &Params) -> Figure {
    let s = params.size_fraction(0.2, MAX_SKEW);
    Figure::polygon(&[p(0.0, s), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
}

pub(super) fn hexagon(params: &Params) -> Figure {
    let s = params.size_fraction(0.2, MAX_SKEW);
    Figure::polygon(&[
        p(s, 0.0),
        p(1.0 - s, 0.0),
        p(1.0, 0.5),
        p(1.0 - s, 1.0),
        p(s, 1.0),
        p(0.0, 0.5),
    ])
}

/// Octagon with corners cut at `size` of each side.
pub(super) fn octagon(params: &Params) -> Figure {
    let c = params.size_fraction(0.3, MAX_SKEW);
    Figure::polygon(&[
        p(c, 0.0),
        p(1.0 - c, 0.0),
        p(1.0, c),
        p(1.0, 1.0 - c),
        p(1.0 - c, 1.0),
        p(c, 1.0),
        p(0.0, 1.0 - c),
        p(0.0, c),
    ])
}

/// Chevron pointing east.
pub(super) fn step(params: &Params) -> Figure {
    let s = params.size_fraction(0.2, MAX_SKEW);
    Figure::polygon(&[
        p(0.0, 0.0),
        p(1.0 - s, 0.0),
        p(1.0, 0.5),
        p(1.0 - s, 1.0),
        p(0.0, 1.0),
        p(s, 0.5),
    ])
    .with_apexes([p(1.0, 0.5)])
}

/// Cylinder; `size` is the cap height in pixels (default 15, at most half the height).
pub(super) fn cylinder(params: &Params) -> Figure {
    let cap = params.size_px(15.0, params.height / 2.0);
    let dy = params.unit_y(cap).min(0.5);

    let mut body = Subpath::new(p(0.0, dy));
    body.cubic_to(p(0.0, -dy / 3.0), p(1.0, -dy / 3.0), p(1.0, dy))
        .line_to(p(1.0, 1.0 - dy))
        .cubic_to(p(1.0, 1.0 + dy / 3.0), p(0.0, 1.0 + dy / 3.0), p(0.0, 1.0 - dy))
        .close();

    let mut rim = Subpath::new(p(0.0, dy));
    rim.cubic_to(p(0.0, 2.0 * dy), p(1.0, 2.0 * dy), p(1.0, dy));

    Figure::new(body).with_detail(rim)
}

pub(super) fn cloud() -> Figure {
    let mut path = Subpath::new(p(0.25, 0.25));
    path.cubic_to(p(0.3, 0.05), p(0.5, 0.05), p(0.625, 0.2))
        .cubic_to(p(0.8, 0.1), p(1.0, 0.3), p(0.875, 0.5))
        .cubic_to(p(1.0, 0.6), p(1.0, 0.8), p(0.8, 0.8))
        .cubic_to(p(0.7, 1.0), p(0.4, 1.0), p(0.31, 0.8))
        .cubic_to(p(0.18, 0.9), p(0.0, 0.66), p(0.16, 0.55))
        .cubic_to(p(0.0, 0.5), p(0.05, 0.25), p(0.25, 0.25))
        .close();
    Figure::new(path)
}

/// Page with a wavy bottom edge; `size` is the wave height fraction (default 0.3).
pub(super) fn document(params: &Params) -> Figure {
    let dy = params.size_fraction(0.3, 0.5);
    let fy = 1.4;

    let mut path = Subpath::new(p(0.0, 0.0));
    path.line_to(p(1.0, 0.0))
        .line_to(p(1.0, 1.0 - dy / 2.0))
        .quad_to(p(0.75, 1.0 - dy * fy), p(0.5, 1.0 - dy / 2.0))
        .quad_to(p(0.25, 1.0 - dy * (1.0 - fy)), p(0.0, 1.0 - dy / 2.0))
        .close();
    Figure::new(path)
}

/// Punched tape with wavy top and bottom; `size` is the wave height (default 0.4).
pub(super) fn tape(params: &Params) -> Figure {
    let dy = params.size_fraction(0.4, 0.5);
    let fy = 1.4;

    let mut path = Subpath::new(p(0.0, dy / 2.0));
    path.quad_to(p(0.25, dy * fy), p(0.5, dy / 2.0))
        .quad_to(p(0.75, dy * (1.0 - fy)), p(1.0, dy / 2.0))
        .line_to(p(1.0, 1.0 - dy / 2.0))
        .quad_to(p(0.75, 1.0 - dy * fy), p(0.5, 1.0 - dy / 2.0))
        .quad_to(p(0.25, 1.0 - dy * (1.0 - fy)), p(0.0, 1.0 - dy / 2.0))
        .close();
    Figure::new(path)
}

/// Rectangle with two inner vertical bars at `size` from each side.
pub(super) fn predefined_process(params: &Params) -> Figure {
    let s = params.size_fraction(0.1, 0.45);
    Figure::polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)])
        .with_detail(Subpath::polyline(&[p(s, 0.0), p(s, 1.0)]))
        .with_detail(Subpath::polyline(&[p(1.0 - s, 0.0), p(1.0 - s, 1.0)]))
}

/// Pentagon pointing south.
pub(super) fn off_page_connector(params: &Params) -> Figure {
    let s = params.size_fraction(0.375, 0.9);
    Figure::polygon(&[
        p(0.0, 0.0),
        p(1.0, 0.0),
        p(1.0, 1.0 - s),
        p(0.5, 1.0),
        p(0.0, 1.0 - s),
    ])
    .with_apexes([p(0.5, 1.0)])
}

/// Convex left side, concave right side.
pub(super) fn data_storage(params: &Params) -> Figure {
    let s = params.size_fraction(0.1, 0.45);
    let mut path = Subpath::new(p(s, 0.0));
    path.line_to(p(1.0, 0.0))
        .quad_to(p(1.0 - 2.0 * s, 0.5), p(1.0, 1.0))
        .line_to(p(s, 1.0))
        .quad_to(p(-s, 0.5), p(s, 0.0))
        .close();
    Figure::new(path)
}

/// Rectangle with the top-left corner cut; `size` is the cut in pixels (default 30).
pub(super) fn card(params: &Params) -> Figure {
    let cut = params.size_px(30.0, params.min_side() * 0.49);
    let sx = params.unit_x(cut);
    let sy = params.unit_y(cut);
    Figure::polygon(&[p(sx, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, sy)])
}
