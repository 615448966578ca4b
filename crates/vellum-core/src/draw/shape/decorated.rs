//! Families with inner detail paths: callout, cube, smiley and swimlane.

use super::{DEFAULT_SWIMLANE_HEADER, Figure, Params, basic, p};
use crate::draw::outline::Subpath;

/// Speech bubble with a tail below the body; `size` is the tail height in pixels.
pub(super) fn callout(params: &Params) -> Figure {
    let tail = params.size_px(30.0, params.height * 0.5);
    let base = 20.0_f32.min(params.width * 0.5);
    let yb = 1.0 - params.unit_y(tail);
    let bx = params.unit_x(base);

    Figure::polygon(&[
        p(0.0, 0.0),
        p(1.0, 0.0),
        p(1.0, yb),
        p((0.5 + bx).min(1.0), yb),
        p(0.5, 1.0),
        p(0.5, yb),
        p(0.0, yb),
    ])
    .with_apexes([p(0.5, 1.0)])
}

/// Box in oblique projection; `size` is the depth in pixels.
pub(super) fn cube(params: &Params) -> Figure {
    let depth = params.size_px(20.0, params.min_side() * 0.49);
    let sx = params.unit_x(depth);
    let sy = params.unit_y(depth);

    Figure::polygon(&[
        p(sx, 0.0),
        p(1.0, 0.0),
        p(1.0, 1.0 - sy),
        p(1.0 - sx, 1.0),
        p(0.0, 1.0),
        p(0.0, sy),
    ])
    .with_detail(Subpath::polyline(&[p(0.0, sy), p(1.0 - sx, sy), p(1.0, 0.0)]))
    .with_detail(Subpath::polyline(&[p(1.0 - sx, sy), p(1.0 - sx, 1.0)]))
}

pub(super) fn smiley() -> Figure {
    let eye = |cx: f32| {
        let mut path = Subpath::new(p(cx, 0.3));
        path.arc_to(p(cx, 0.35), 0.05, 0.05, -90.0, 360.0).close();
        path
    };
    let mouth_start = 20.0_f32.to_radians();
    let mut mouth = Subpath::new(p(
        0.5 + 0.3 * mouth_start.cos(),
        0.5 + 0.3 * mouth_start.sin(),
    ));
    mouth.arc_to(p(0.5, 0.5), 0.3, 0.3, 20.0, 140.0);

    basic::ellipse()
        .with_detail(eye(0.35))
        .with_detail(eye(0.65))
        .with_detail(mouth)
}

/// Container with a header band; `startSize` is the header depth in pixels.
///
/// Horizontal swimlanes stack the header on top, vertical ones
/// (`horizontal=0`) put it on the left.
pub(super) fn swimlane(params: &Params) -> Figure {
    let figure = basic::rectangle(params);
    let header = params
        .attrs
        .connector
        .start
        .size
        .filter(|value| value.is_finite() && *value >= 0.0)
        .unwrap_or(DEFAULT_SWIMLANE_HEADER);

    if params.attrs.text.horizontal.unwrap_or(true) {
        if header <= 0.0 || header >= params.height {
            return figure;
        }
        let y = params.unit_y(header);
        figure.with_detail(Subpath::polyline(&[p(0.0, y), p(1.0, y)]))
    } else {
        if header <= 0.0 || header >= params.width {
            return figure;
        }
        let x = params.unit_x(header);
        figure.with_detail(Subpath::polyline(&[p(x, 0.0), p(x, 1.0)]))
    }
}
