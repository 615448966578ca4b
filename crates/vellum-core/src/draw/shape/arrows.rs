//! Block arrows pointing east; `direction` rotates them after generation.
//!
//! `dy` is the shaft thickness as a fraction of the height and `dx` the head
//! length in pixels.

use super::{Figure, Params, p};

/// Top and bottom edges of the shaft.
fn shaft(params: &Params) -> (f32, f32) {
    let thickness = params
        .attrs
        .geometry
        .dy
        .filter(|value| value.is_finite())
        .unwrap_or(0.6)
        .clamp(0.1, 1.0);
    (0.5 - thickness / 2.0, 0.5 + thickness / 2.0)
}

/// Head length in pixels, at most `max_fraction` of the width.
fn head_px(params: &Params, default: f32, max_fraction: f32) -> f32 {
    params
        .attrs
        .geometry
        .dx
        .filter(|value| value.is_finite())
        .unwrap_or(default)
        .clamp(0.0, params.width.max(0.0) * max_fraction)
}

pub(super) fn right_arrow(params: &Params) -> Figure {
    let (top, bot) = shaft(params);
    let hx = 1.0 - params.unit_x(head_px(params, 40.0, 0.9));

    Figure::polygon(&[
        p(0.0, top),
        p(hx, top),
        p(hx, 0.0),
        p(1.0, 0.5),
        p(hx, 1.0),
        p(hx, bot),
        p(0.0, bot),
    ])
    .with_apexes([p(1.0, 0.5)])
}

/// Right arrow with a V-notch cut into the tail.
pub(super) fn notched_right_arrow(params: &Params) -> Figure {
    let (top, bot) = shaft(params);
    let hx = 1.0 - params.unit_x(head_px(params, 40.0, 0.9));
    let notch = (0.5 * (1.0 - hx)).min(0.5 * hx);

    Figure::polygon(&[
        p(0.0, top),
        p(hx, top),
        p(hx, 0.0),
        p(1.0, 0.5),
        p(hx, 1.0),
        p(hx, bot),
        p(0.0, bot),
        p(notch, 0.5),
    ])
    .with_apexes([p(1.0, 0.5)])
}

/// Arrow with heads at both ends.
pub(super) fn double_arrow(params: &Params) -> Figure {
    let (top, bot) = shaft(params);
    let hl = params.unit_x(head_px(params, 20.0, 0.45));

    Figure::polygon(&[
        p(0.0, 0.5),
        p(hl, 0.0),
        p(hl, top),
        p(1.0 - hl, top),
        p(1.0 - hl, 0.0),
        p(1.0, 0.5),
        p(1.0 - hl, 1.0),
        p(1.0 - hl, bot),
        p(hl, bot),
        p(hl, 1.0),
    ])
    .with_apexes([p(1.0, 0.5), p(0.0, 0.5)])
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::style::{StyleAttributes, StyleDefaults};

    fn figure_for(
        build: fn(&Params) -> Figure,
        dx: Option<f32>,
        dy: Option<f32>,
        width: f32,
    ) -> Figure {
        let mut attrs = StyleAttributes::default();
        attrs.geometry.dx = dx;
        attrs.geometry.dy = dy;
        let defaults = StyleDefaults::default();
        build(&Params {
            width,
            height: 50.0,
            attrs: &attrs,
            defaults: &defaults,
        })
    }

    #[test]
    fn test_right_arrow_head_in_pixels() {
        let figure = figure_for(right_arrow, None, None, 200.0);
        let vertices = figure.boundary.flatten();
        assert_approx_eq!(f32, vertices[1].x(), 0.8);
        assert_approx_eq!(f32, vertices[0].y(), 0.2);
        assert_eq!(figure.apexes, vec![p(1.0, 0.5)]);
    }

    #[test]
    fn test_right_arrow_head_clamped_to_width() {
        let figure = figure_for(right_arrow, Some(1000.0), Some(0.2), 100.0);
        let vertices = figure.boundary.flatten();
        assert_approx_eq!(f32, vertices[1].x(), 0.1, epsilon = 1e-5);
        assert_approx_eq!(f32, vertices[0].y(), 0.4);
    }

    #[test]
    fn test_notch_stays_behind_head() {
        let figure = figure_for(notched_right_arrow, Some(80.0), None, 100.0);
        let notch = figure.boundary.flatten()[7];
        assert!(notch.x() < 0.2 + 1e-6);
        assert!(figure.boundary.is_simple());
    }

    #[test]
    fn test_double_arrow_has_two_tips() {
        let figure = figure_for(double_arrow, None, None, 100.0);
        assert_eq!(figure.apexes.len(), 2);
        assert_eq!(figure.boundary.flatten().len(), 10);
    }
}
