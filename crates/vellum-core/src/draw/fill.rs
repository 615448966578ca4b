//! Fill definitions.

use serde::Serialize;

use crate::{
    color::{Color, ColorValue},
    style::{Direction, StyleAttributes, StyleDefaults},
};

/// A resolved fill.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FillDefinition {
    #[default]
    None,
    Solid {
        color: Color,
        opacity: f32,
    },
    /// Linear gradient from `from` to `to`, running towards `direction`
    Gradient {
        from: Color,
        to: Color,
        direction: Direction,
        opacity: f32,
    },
}

impl FillDefinition {
    pub fn solid(color: Color) -> Self {
        Self::Solid {
            color,
            opacity: 1.0,
        }
    }

    /// Resolves the fill of a shape.
    ///
    /// `filled_by_default` selects between the global fill color and no fill
    /// when `fillColor` is not set.
    pub fn from_style(
        attrs: &StyleAttributes,
        defaults: &StyleDefaults,
        filled_by_default: bool,
    ) -> Self {
        let base = match attrs.fill.color {
            ColorValue::None => return Self::None,
            ColorValue::Value(color) => color,
            ColorValue::Default if filled_by_default => defaults.fill_color,
            ColorValue::Default => return Self::None,
        };
        let opacity = attrs.effective_opacity(attrs.fill.opacity);

        match attrs.fill.gradient_color.color() {
            Some(to) => Self::Gradient {
                from: base,
                to,
                direction: attrs.fill.gradient_direction.unwrap_or(Direction::South),
                opacity,
            },
            None => Self::Solid {
                color: base,
                opacity,
            },
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The primary color, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::None => None,
            Self::Solid { color, .. } => Some(*color),
            Self::Gradient { from, .. } => Some(*from),
        }
    }

    pub fn opacity(&self) -> f32 {
        match self {
            Self::None => 0.0,
            Self::Solid { opacity, .. } | Self::Gradient { opacity, .. } => *opacity,
        }
    }
}
