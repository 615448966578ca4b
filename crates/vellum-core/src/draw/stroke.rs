//! Stroke and line-style definitions.
//!
//! # Overview
//!
//! Exported types:
//! - [`StrokeDefinition`]: color, width, opacity, pattern and corner join
//! - [`StrokeStyle`]: Line patterns (solid, dashed, dotted, etc.)
//! - [`StrokeJoin`]: How line corners are rendered; `rounded=1` rounds them
//!
//! Dash patterns are expressed in multiples of the stroke width, the unit
//! presentation formats use for preset dashes. [`StrokeDefinition::dash_lengths`]
//! scales them to absolute lengths.
//!
//! ```
//! use vellum_core::draw::{StrokeDefinition, StrokeStyle};
//! use vellum_core::color::Color;
//!
//! let stroke = StrokeDefinition::new(Color::default(), 2.0).with_style(StrokeStyle::Dashed);
//! assert_eq!(stroke.dash_lengths(), Some(vec![8.0, 6.0]));
//! ```

use serde::Serialize;

use crate::{
    color::{Color, ColorValue},
    style::{StyleAttributes, StyleDefaults},
};

/// Line pattern of a stroke.
///
/// | Variant      | Dash array (× stroke width) |
/// |--------------|-----------------------------|
/// | `Solid`      | none                        |
/// | `Dashed`     | `4 3`                       |
/// | `Dotted`     | `1 3`                       |
/// | `DashDot`    | `8 3 1 3`                   |
/// | `DashDotDot` | `8 3 1 3 1 3`               |
/// | `Custom`     | as given                    |
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    DashDot,
    DashDotDot,
    /// Explicit dash/gap lengths in multiples of the stroke width
    Custom(Vec<f32>),
}

/// Parses a space or comma separated list of positive dash lengths.
pub fn parse_dash_pattern(s: &str) -> Result<Vec<f32>, String> {
    let values = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f32>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
                .ok_or_else(|| format!("invalid dash length `{part}`"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() || values.iter().all(|value| *value == 0.0) {
        return Err(format!("invalid dash pattern `{s}`"));
    }
    Ok(values)
}

impl StrokeStyle {
    /// The dash array in multiples of the stroke width, or `None` for solid lines
    pub fn dash_array(&self) -> Option<Vec<f32>> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(vec![4.0, 3.0]),
            Self::Dotted => Some(vec![1.0, 3.0]),
            Self::DashDot => Some(vec![8.0, 3.0, 1.0, 3.0]),
            Self::DashDotDot => Some(vec![8.0, 3.0, 1.0, 3.0, 1.0, 3.0]),
            Self::Custom(pattern) => Some(pattern.clone()),
        }
    }

    pub fn is_solid(&self) -> bool {
        matches!(self, Self::Solid)
    }

    /// Recognizes the preset patterns, otherwise keeps the pattern as given.
    pub fn from_pattern(pattern: Vec<f32>) -> Self {
        [
            Self::Dashed,
            Self::Dotted,
            Self::DashDot,
            Self::DashDotDot,
        ]
        .into_iter()
        .find(|preset| preset.dash_array().as_deref() == Some(pattern.as_slice()))
        .unwrap_or(Self::Custom(pattern))
    }
}

/// How line corners are rendered.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrokeJoin {
    #[default]
    Miter,
    /// `rounded=1`
    Round,
}

impl StrokeJoin {
    /// Returns the SVG stroke-linejoin value
    pub fn to_svg_value(&self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
        }
    }
}

/// A resolved stroke for an outline or connector.
///
/// # Examples
///
/// ```
/// use vellum_core::draw::{StrokeDefinition, StrokeJoin, StrokeStyle};
/// use vellum_core::style::{StyleAttributes, StyleDefaults};
///
/// let mut attrs = StyleAttributes::default();
/// attrs.stroke.dashed = Some(true);
/// attrs.geometry.rounded = Some(true);
///
/// let stroke = StrokeDefinition::from_style(&attrs, &StyleDefaults::default(), true).unwrap();
/// assert_eq!(*stroke.style(), StrokeStyle::Dashed);
/// assert_eq!(stroke.join(), StrokeJoin::Round);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    opacity: f32,
    style: StrokeStyle,
    join: StrokeJoin,
}

impl StrokeDefinition {
    /// Creates a new solid stroke with the given color and width.
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Self::default()
        }
    }

    /// Resolves the stroke of a shape or connector.
    ///
    /// Returns `None` when `strokeColor=none`, or when the color is unset and
    /// `stroked_by_default` is false. `dashPattern` only applies to dashed
    /// strokes. `rounded=1` rounds the corners of the line.
    pub fn from_style(
        attrs: &StyleAttributes,
        defaults: &StyleDefaults,
        stroked_by_default: bool,
    ) -> Option<Self> {
        let color = match attrs.stroke.color {
            ColorValue::None => return None,
            ColorValue::Value(color) => color,
            ColorValue::Default if stroked_by_default => defaults.stroke_color,
            ColorValue::Default => return None,
        };

        let style = if attrs.is_dashed() {
            attrs
                .stroke
                .dash_pattern
                .clone()
                .map_or(StrokeStyle::Dashed, StrokeStyle::from_pattern)
        } else {
            StrokeStyle::Solid
        };

        let join = if attrs.is_rounded() {
            StrokeJoin::Round
        } else {
            StrokeJoin::Miter
        };

        Some(
            Self::new(color, attrs.stroke_width(defaults))
                .with_opacity(attrs.effective_opacity(attrs.stroke.opacity))
                .with_style(style)
                .with_join(join),
        )
    }

    /// Returns the stroke color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Returns the stroke width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Returns the stroke opacity in `0.0..=1.0`.
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Returns the stroke style.
    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    /// Returns the stroke join style.
    pub fn join(&self) -> StrokeJoin {
        self.join
    }

    /// Absolute dash lengths (pattern × width), `None` for solid strokes.
    ///
    /// Hairline strokes scale as if they were one unit wide.
    pub fn dash_lengths(&self) -> Option<Vec<f32>> {
        let unit = self.width.max(1.0);
        self.style
            .dash_array()
            .map(|pattern| pattern.into_iter().map(|len| len * unit).collect())
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.set_opacity(opacity);
        self
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_join(mut self, join: StrokeJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self {
            color: Color::default(),
            width: 1.0,
            opacity: 1.0,
            style: StrokeStyle::default(),
            join: StrokeJoin::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_default() {
        let stroke = StrokeDefinition::default();
        assert_eq!(stroke.width(), 1.0);
        assert_eq!(stroke.opacity(), 1.0);
        assert_eq!(stroke.color().to_hex(), "#000000");
        assert_eq!(*stroke.style(), StrokeStyle::Solid);
        assert_eq!(stroke.join(), StrokeJoin::Miter);
        assert_eq!(stroke.dash_lengths(), None);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let stroke = StrokeDefinition::new(Color::from_rgb8(0, 128, 0), 2.5).with_opacity(1.7);

        assert_eq!(stroke.color().to_hex(), "#008000");
        assert_eq!(stroke.width(), 2.5);
        assert_eq!(stroke.opacity(), 1.0);
    }

    #[test]
    fn test_stroke_style_dash_array() {
        assert_eq!(StrokeStyle::Solid.dash_array(), None);
        assert_eq!(StrokeStyle::Dashed.dash_array(), Some(vec![4.0, 3.0]));
        assert_eq!(StrokeStyle::Dotted.dash_array(), Some(vec![1.0, 3.0]));
        assert_eq!(
            StrokeStyle::DashDot.dash_array(),
            Some(vec![8.0, 3.0, 1.0, 3.0])
        );
        assert_eq!(
            StrokeStyle::DashDotDot.dash_array(),
            Some(vec![8.0, 3.0, 1.0, 3.0, 1.0, 3.0])
        );
    }

    #[test]
    fn test_dash_lengths_scale_with_width() {
        let stroke = StrokeDefinition::new(Color::default(), 3.0).with_style(StrokeStyle::Dashed);
        assert_eq!(stroke.dash_lengths(), Some(vec![12.0, 9.0]));

        let hairline = StrokeDefinition::new(Color::default(), 0.5).with_style(StrokeStyle::Dotted);
        assert_eq!(hairline.dash_lengths(), Some(vec![1.0, 3.0]));
    }

    #[test]
    fn test_parse_dash_pattern_rejects_empty_and_zero() {
        assert!(parse_dash_pattern("").is_err());
        assert!(parse_dash_pattern("0 0").is_err());
        assert!(parse_dash_pattern("3 -1").is_err());
        assert_eq!(parse_dash_pattern("  5  2 "), Ok(vec![5.0, 2.0]));
        assert_eq!(parse_dash_pattern("8 4,1 4"), Ok(vec![8.0, 4.0, 1.0, 4.0]));
    }

    #[test]
    fn test_stroke_from_style() {
        let defaults = StyleDefaults::default();
        let mut attrs = StyleAttributes::default();

        let stroke = StrokeDefinition::from_style(&attrs, &defaults, true).unwrap();
        assert_eq!(stroke.width(), defaults.stroke_width);
        assert!(stroke.style().is_solid());
        assert_eq!(StrokeDefinition::from_style(&attrs, &defaults, false), None);

        attrs.stroke.dashed = Some(true);
        attrs.stroke.width = Some(2.0);
        let stroke = StrokeDefinition::from_style(&attrs, &defaults, true).unwrap();
        assert_eq!(stroke.dash_lengths(), Some(vec![8.0, 6.0]));

        attrs.stroke.dash_pattern = Some(vec![1.0, 3.0]);
        let stroke = StrokeDefinition::from_style(&attrs, &defaults, true).unwrap();
        assert_eq!(*stroke.style(), StrokeStyle::Dotted);

        attrs.stroke.color = ColorValue::None;
        assert_eq!(StrokeDefinition::from_style(&attrs, &defaults, true), None);
    }

    #[test]
    fn test_rounded_style_rounds_joins() {
        let defaults = StyleDefaults::default();
        let mut attrs = StyleAttributes::default();
        assert_eq!(
            StrokeDefinition::from_style(&attrs, &defaults, true).unwrap().join(),
            StrokeJoin::Miter
        );

        attrs.geometry.rounded = Some(true);
        let stroke = StrokeDefinition::from_style(&attrs, &defaults, true).unwrap();
        assert_eq!(stroke.join(), StrokeJoin::Round);
        assert_eq!(stroke.join().to_svg_value(), "round");
    }

    #[test]
    fn test_from_pattern_keeps_custom() {
        assert_eq!(
            StrokeStyle::from_pattern(vec![8.0, 3.0, 1.0, 3.0]),
            StrokeStyle::DashDot
        );
        assert_eq!(
            StrokeStyle::from_pattern(vec![2.0, 2.0]),
            StrokeStyle::Custom(vec![2.0, 2.0])
        );
    }
}
