//! Typed style attributes.
//!
//! A draw.io style string is an open bag of `key=value` tokens. Vellum keeps
//! the keys it understands in a fixed schema of typed optional fields and
//! retains everything else verbatim in an insertion-ordered passthrough map.
//!
//! # Overview
//!
//! - [`StyleAttributes`] - The parsed style of one node
//! - [`StyleDefaults`] - Global defaults, threaded explicitly through resolution
//! - Enumerations for the closed vocabularies: [`EdgeStyle`], [`Direction`],
//!   [`ElbowAxis`], [`HorizontalAlign`], [`VerticalAlign`]
//!
//! Every field is optional (`None` or [`ColorValue::Default`] means "not set").
//! Resolution order is explicit value, then family default, then
//! [`StyleDefaults`]; the accessor methods on [`StyleAttributes`] take the
//! fallback as an argument.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    color::{Color, ColorValue},
    draw::MarkerKind,
};

/// Global style defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub stroke_color: Color,
    pub fill_color: Color,
    pub font_color: Color,
    pub stroke_width: f32,
    pub font_size: f32,
    pub font_family: String,
    pub arc_size: f32,
    pub marker_size: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            stroke_color: Color::default(),
            fill_color: Color::from_rgb8(255, 255, 255),
            font_color: Color::default(),
            stroke_width: 1.0,
            font_size: 12.0,
            font_family: "Helvetica".to_string(),
            arc_size: 10.0,
            marker_size: 6.0,
        }
    }
}

/// Fill related attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillAttributes {
    /// `fillColor`
    pub color: ColorValue,
    /// `fillOpacity`, percent
    pub opacity: Option<f32>,
    /// `gradientColor`
    pub gradient_color: ColorValue,
    /// `gradientDirection`
    pub gradient_direction: Option<Direction>,
    /// `swimlaneFillColor`, body fill of swimlanes
    pub swimlane_color: ColorValue,
    /// `shadow`
    pub shadow: Option<bool>,
}

/// Stroke related attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeAttributes {
    /// `strokeColor`
    pub color: ColorValue,
    /// `strokeWidth`
    pub width: Option<f32>,
    /// `strokeOpacity`, percent
    pub opacity: Option<f32>,
    /// `dashed`
    pub dashed: Option<bool>,
    /// `dashPattern`, in multiples of the stroke width
    pub dash_pattern: Option<Vec<f32>>,
}

/// Bit field carried by `fontStyle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
}

impl FontStyle {
    /// Decodes the draw.io bit field: 1 bold, 2 italic, 4 underline, 8 strikethrough.
    pub fn from_bits(bits: u32) -> Self {
        Self {
            bold: bits & 1 != 0,
            italic: bits & 2 != 0,
            underline: bits & 4 != 0,
            strikethrough: bits & 8 != 0,
        }
    }
}

/// Text related attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAttributes {
    /// `fontColor`
    pub font_color: ColorValue,
    /// `fontSize`
    pub font_size: Option<f32>,
    /// `fontFamily`
    pub font_family: Option<String>,
    /// `fontStyle`
    pub font_style: Option<FontStyle>,
    /// `align`
    pub align: Option<HorizontalAlign>,
    /// `verticalAlign`
    pub vertical_align: Option<VerticalAlign>,
    /// `labelBackgroundColor`
    pub label_background: ColorValue,
    /// `whiteSpace=wrap`
    pub wrap: Option<bool>,
    /// `html`
    pub html: Option<bool>,
    /// `horizontal=0` renders text vertically
    pub horizontal: Option<bool>,
}

/// Attributes that shape the outline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeometryAttributes {
    /// `rotation`, degrees clockwise, normalized to `0..360`
    pub rotation: Option<f32>,
    /// `flipH`
    pub flip_h: Option<bool>,
    /// `flipV`
    pub flip_v: Option<bool>,
    /// `direction`
    pub direction: Option<Direction>,
    /// `rounded`
    pub rounded: Option<bool>,
    /// `arcSize`, percent of the shorter side
    pub arc_size: Option<f32>,
    /// `size`, family specific
    pub size: Option<f32>,
    /// `dx`
    pub dx: Option<f32>,
    /// `dy`
    pub dy: Option<f32>,
    /// `starPoints`
    pub star_points: Option<u32>,
    /// `sides`
    pub sides: Option<u32>,
    /// `backgroundOutline`
    pub background_outline: Option<bool>,
    /// `perimeterSpacing`
    pub perimeter_spacing: Option<f32>,
}

/// Marker attributes for one connector end (`startArrow`/`startFill`/`startSize`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerAttributes {
    pub kind: Option<MarkerKind>,
    pub fill: Option<bool>,
    pub size: Option<f32>,
}

/// Fractional port for one connector end (`exitX`/`exitY`/`exitDx`/`exitDy`).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PortAttributes {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub dx: Option<f32>,
    pub dy: Option<f32>,
    /// `exitPerimeter`/`entryPerimeter`
    pub perimeter: Option<bool>,
}

impl PortAttributes {
    /// The explicit fraction, when both coordinates are present
    pub fn fraction(&self) -> Option<(f32, f32)> {
        Some((self.x?, self.y?))
    }

    /// The pixel offset, zero when absent
    pub fn offset(&self) -> (f32, f32) {
        (self.dx.unwrap_or(0.0), self.dy.unwrap_or(0.0))
    }
}

/// Connector related attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectorAttributes {
    /// `edgeStyle`
    pub edge_style: Option<EdgeStyle>,
    /// `curved`
    pub curved: Option<bool>,
    /// `elbow`
    pub elbow: Option<ElbowAxis>,
    /// `startArrow`/`startFill`/`startSize`
    pub start: MarkerAttributes,
    /// `endArrow`/`endFill`/`endSize`
    pub end: MarkerAttributes,
    /// `exitX`/`exitY`/`exitDx`/`exitDy`
    pub exit: PortAttributes,
    /// `entryX`/`entryY`/`entryDx`/`entryDy`
    pub entry: PortAttributes,
}

/// The parsed style of one node.
///
/// # Examples
///
/// ```
/// # use vellum_core::style::{StyleAttributes, StyleDefaults};
/// let attrs = StyleAttributes::default();
/// let defaults = StyleDefaults::default();
/// assert_eq!(attrs.stroke_width(&defaults), 1.0);
/// assert!(!attrs.is_rounded());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleAttributes {
    /// `shape`, or the leading bare token
    pub shape: Option<String>,
    /// `opacity`, percent, applies to fill and stroke
    pub opacity: Option<f32>,
    pub fill: FillAttributes,
    pub stroke: StrokeAttributes,
    pub text: TextAttributes,
    pub geometry: GeometryAttributes,
    pub connector: ConnectorAttributes,
    /// `image`
    pub image: Option<String>,
    /// Unrecognized keys, in source order. `None` marks a bare `key` token.
    pub passthrough: IndexMap<String, Option<String>>,
}

impl StyleAttributes {
    pub fn stroke_width(&self, defaults: &StyleDefaults) -> f32 {
        self.stroke.width.unwrap_or(defaults.stroke_width)
    }

    pub fn font_size(&self, defaults: &StyleDefaults) -> f32 {
        self.text.font_size.unwrap_or(defaults.font_size)
    }

    pub fn font_family<'a>(&'a self, defaults: &'a StyleDefaults) -> &'a str {
        self.text
            .font_family
            .as_deref()
            .unwrap_or(&defaults.font_family)
    }

    pub fn arc_size(&self, defaults: &StyleDefaults) -> f32 {
        self.geometry.arc_size.unwrap_or(defaults.arc_size)
    }

    /// Rotation in degrees, `0.0` when unset
    pub fn rotation(&self) -> f32 {
        self.geometry.rotation.unwrap_or(0.0)
    }

    pub fn flip_h(&self) -> bool {
        self.geometry.flip_h.unwrap_or(false)
    }

    pub fn flip_v(&self) -> bool {
        self.geometry.flip_v.unwrap_or(false)
    }

    pub fn is_rounded(&self) -> bool {
        self.geometry.rounded.unwrap_or(false)
    }

    pub fn is_dashed(&self) -> bool {
        self.stroke.dashed.unwrap_or(false)
    }

    /// Combined opacity of `opacity` and a specific `*Opacity` key, as `0.0..=1.0`
    pub fn effective_opacity(&self, specific: Option<f32>) -> f32 {
        let overall = self.opacity.unwrap_or(100.0) / 100.0;
        let own = specific.unwrap_or(100.0) / 100.0;
        (overall * own).clamp(0.0, 1.0)
    }

    /// Edge path mode, folding `curved=1` into [`EdgeStyle::Curved`]
    pub fn edge_style(&self) -> EdgeStyle {
        if self.connector.curved.unwrap_or(false) {
            return EdgeStyle::Curved;
        }
        self.connector.edge_style.unwrap_or(EdgeStyle::Straight)
    }

    /// Looks up a passthrough key
    pub fn passthrough_value(&self, key: &str) -> Option<&str> {
        self.passthrough.get(key).and_then(|value| value.as_deref())
    }
}

/// Error for values outside a closed vocabulary
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} `{value}`")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Connector path mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeStyle {
    #[default]
    Straight,
    Orthogonal,
    /// Rendered as straight segments through the control points
    Curved,
}

impl FromStr for EdgeStyle {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Self::Straight),
            "orthogonalEdgeStyle"
            | "elbowEdgeStyle"
            | "entityRelationEdgeStyle"
            | "segmentEdgeStyle"
            | "isometricEdgeStyle" => Ok(Self::Orthogonal),
            _ => Err(UnknownVariant {
                kind: "edge style",
                value: s.to_string(),
            }),
        }
    }
}

/// Compass direction used by `direction` and `gradientDirection`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    East,
    South,
    West,
    North,
}

impl Direction {
    /// Clockwise rotation from the default east-facing orientation
    pub fn degrees(self) -> f32 {
        match self {
            Direction::East => 0.0,
            Direction::South => 90.0,
            Direction::West => 180.0,
            Direction::North => 270.0,
        }
    }

    /// Number of clockwise quarter turns from east
    pub fn quarter_turns(self) -> u8 {
        match self {
            Direction::East => 0,
            Direction::South => 1,
            Direction::West => 2,
            Direction::North => 3,
        }
    }
}

impl FromStr for Direction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "east" => Ok(Self::East),
            "south" => Ok(Self::South),
            "west" => Ok(Self::West),
            "north" => Ok(Self::North),
            _ => Err(UnknownVariant {
                kind: "direction",
                value: s.to_string(),
            }),
        }
    }
}

/// `elbow` axis preference for elbow edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElbowAxis {
    Horizontal,
    Vertical,
}

impl FromStr for ElbowAxis {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "horizontal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            _ => Err(UnknownVariant {
                kind: "elbow",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizontalAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl FromStr for HorizontalAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            _ => Err(UnknownVariant {
                kind: "alignment",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl FromStr for VerticalAlign {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "middle" => Ok(Self::Middle),
            "bottom" => Ok(Self::Bottom),
            _ => Err(UnknownVariant {
                kind: "vertical alignment",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_style_from_str() {
        assert_eq!("none".parse::<EdgeStyle>(), Ok(EdgeStyle::Straight));
        assert_eq!(
            "orthogonalEdgeStyle".parse::<EdgeStyle>(),
            Ok(EdgeStyle::Orthogonal)
        );
        assert_eq!(
            "entityRelationEdgeStyle".parse::<EdgeStyle>(),
            Ok(EdgeStyle::Orthogonal)
        );
        assert!("zigzag".parse::<EdgeStyle>().is_err());
    }

    #[test]
    fn test_curved_flag_wins() {
        let mut attrs = StyleAttributes::default();
        attrs.connector.edge_style = Some(EdgeStyle::Orthogonal);
        assert_eq!(attrs.edge_style(), EdgeStyle::Orthogonal);

        attrs.connector.curved = Some(true);
        assert_eq!(attrs.edge_style(), EdgeStyle::Curved);
    }

    #[test]
    fn test_direction_degrees() {
        assert_eq!(Direction::East.degrees(), 0.0);
        assert_eq!(Direction::South.degrees(), 90.0);
        assert_eq!(Direction::West.degrees(), 180.0);
        assert_eq!(Direction::North.degrees(), 270.0);
        assert_eq!("north".parse::<Direction>().map(Direction::quarter_turns), Ok(3));
    }

    #[test]
    fn test_font_style_bits() {
        let style = FontStyle::from_bits(5);
        assert!(style.bold);
        assert!(!style.italic);
        assert!(style.underline);
        assert_eq!(FontStyle::from_bits(0), FontStyle::default());
    }

    #[test]
    fn test_resolution_falls_back_to_defaults() {
        let defaults = StyleDefaults {
            stroke_width: 3.0,
            font_size: 18.0,
            ..StyleDefaults::default()
        };
        let mut attrs = StyleAttributes::default();
        assert_eq!(attrs.stroke_width(&defaults), 3.0);
        assert_eq!(attrs.font_size(&defaults), 18.0);
        assert_eq!(attrs.font_family(&defaults), "Helvetica");

        attrs.stroke.width = Some(0.5);
        attrs.text.font_family = Some("Courier".to_string());
        assert_eq!(attrs.stroke_width(&defaults), 0.5);
        assert_eq!(attrs.font_family(&defaults), "Courier");
    }

    #[test]
    fn test_effective_opacity() {
        let mut attrs = StyleAttributes::default();
        assert_eq!(attrs.effective_opacity(None), 1.0);

        attrs.opacity = Some(50.0);
        assert_eq!(attrs.effective_opacity(Some(50.0)), 0.25);
    }

    #[test]
    fn test_port_fraction_requires_both_axes() {
        let mut port = PortAttributes {
            x: Some(1.0),
            ..PortAttributes::default()
        };
        assert_eq!(port.fraction(), None);

        port.y = Some(0.5);
        port.dx = Some(4.0);
        assert_eq!(port.fraction(), Some((1.0, 0.5)));
        assert_eq!(port.offset(), (4.0, 0.0));
    }
}
