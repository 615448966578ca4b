//! Arrow markers.
//!
//! draw.io names its line ends from a wide source vocabulary ([`MarkerKind`]);
//! slide formats only offer a handful of line-end shapes ([`MarkerShape`]) in
//! three sizes ([`MarkerSize`]). [`MarkerEnd::resolve`] maps one onto the
//! other. Unfilled markers the target vocabulary cannot express are emulated
//! with an [`OpenMarkerOverlay`]: a small unfilled shape drawn over the line
//! end, with the line trimmed so it stops at the overlay boundary.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    draw::ShapeKind,
    style::{MarkerAttributes, StyleDefaults, UnknownVariant},
};

/// Marker size above which a marker is medium.
const SMALL_MAX: f32 = 6.0;
/// Marker size above which a marker is large.
const MEDIUM_MAX: f32 = 10.0;
/// Stroke width that selects large markers when no size is given.
const HEAVY_STROKE: f32 = 2.5;

/// Source marker vocabulary (`startArrow` / `endArrow`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerKind {
    None,
    Classic,
    ClassicThin,
    Block,
    BlockThin,
    Open,
    OpenThin,
    OpenAsync,
    Async,
    Oval,
    Diamond,
    DiamondThin,
    Dash,
    Cross,
    Circle,
    CirclePlus,
    HalfCircle,
    Box,
    DoubleBlock,
    ErOne,
    ErMandOne,
    ErMany,
    ErOneToMany,
    ErZeroToOne,
    ErZeroToMany,
}

impl FromStr for MarkerKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Self::None,
            "classic" => Self::Classic,
            "classicthin" => Self::ClassicThin,
            "block" => Self::Block,
            "blockthin" => Self::BlockThin,
            "open" => Self::Open,
            "openthin" => Self::OpenThin,
            "openasync" => Self::OpenAsync,
            "async" => Self::Async,
            "oval" => Self::Oval,
            "diamond" => Self::Diamond,
            "diamondthin" => Self::DiamondThin,
            "dash" => Self::Dash,
            "cross" => Self::Cross,
            "circle" => Self::Circle,
            "circleplus" => Self::CirclePlus,
            "halfcircle" => Self::HalfCircle,
            "box" => Self::Box,
            "doubleblock" => Self::DoubleBlock,
            "erone" => Self::ErOne,
            "ermandone" => Self::ErMandOne,
            "ermany" => Self::ErMany,
            "eronetomany" => Self::ErOneToMany,
            "erzerotoone" => Self::ErZeroToOne,
            "erzerotomany" => Self::ErZeroToMany,
            _ => {
                return Err(UnknownVariant {
                    kind: "marker",
                    value: s.to_string(),
                });
            }
        };
        Ok(kind)
    }
}

impl MarkerKind {
    /// Target line-end shape, `None` for [`MarkerKind::None`]
    pub fn target_shape(self) -> Option<MarkerShape> {
        let shape = match self {
            Self::None => return None,
            Self::Classic | Self::ClassicThin | Self::Block | Self::BlockThin | Self::DoubleBlock => {
                MarkerShape::Triangle
            }
            Self::Async | Self::OpenAsync => MarkerShape::Stealth,
            Self::Open
            | Self::OpenThin
            | Self::Dash
            | Self::Cross
            | Self::ErOne
            | Self::ErMandOne
            | Self::ErMany
            | Self::ErOneToMany
            | Self::ErZeroToOne
            | Self::ErZeroToMany => MarkerShape::Arrow,
            Self::Diamond | Self::DiamondThin | Self::Box => MarkerShape::Diamond,
            Self::Oval | Self::Circle | Self::CirclePlus | Self::HalfCircle => MarkerShape::Oval,
        };
        Some(shape)
    }

    /// Overlay family used when the marker is unfilled and has no target equivalent
    fn open_overlay(self) -> Option<ShapeKind> {
        match self {
            Self::Oval => Some(ShapeKind::Ellipse),
            Self::Diamond | Self::DiamondThin => Some(ShapeKind::Rhombus),
            Self::Classic | Self::ClassicThin | Self::Block | Self::BlockThin => {
                Some(ShapeKind::IsoscelesTriangle)
            }
            _ => None,
        }
    }
}

/// Target line-end shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    Triangle,
    Stealth,
    /// Open chevron
    Arrow,
    Diamond,
    Oval,
}

/// Target line-end sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerSize {
    Small,
    Medium,
    Large,
}

impl MarkerSize {
    /// Buckets a marker size in pixels.
    ///
    /// Without an explicit size, heavy strokes get large markers so the head
    /// stays visible next to the line.
    pub fn from_px(size: Option<f32>, stroke_width: f32, default_size: f32) -> Self {
        let px = match size {
            Some(px) => px,
            None if stroke_width >= HEAVY_STROKE => return Self::Large,
            None => default_size,
        };
        if px <= SMALL_MAX {
            Self::Small
        } else if px <= MEDIUM_MAX {
            Self::Medium
        } else {
            Self::Large
        }
    }
}

/// A native line-end marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub shape: MarkerShape,
    pub size: MarkerSize,
}

/// An unfilled shape drawn over a connector end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpenMarkerOverlay {
    /// Overlay family; triangles point along the path direction
    pub kind: ShapeKind,
    /// Overlay extent in pixels
    pub diameter: f32,
    /// Distance the connector line is shortened at this end
    pub trim: f32,
}

impl OpenMarkerOverlay {
    fn new(kind: ShapeKind, size: Option<f32>, stroke_width: f32, default_size: f32) -> Self {
        let base = size.unwrap_or(default_size).max(1.0);
        let diameter = base.max(6.0 + 1.25 * stroke_width);
        let reach = if kind == ShapeKind::Ellipse {
            diameter / 2.0
        } else {
            diameter
        };
        Self {
            kind,
            diameter,
            trim: (reach - stroke_width / 2.0).max(0.0),
        }
    }

    /// Ovals are centered on the end point, the other overlays end with their tip on it
    pub fn is_centered(&self) -> bool {
        self.kind == ShapeKind::Ellipse
    }
}

/// How one connector end is decorated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerEnd {
    Native(MarkerSpec),
    Emulated(OpenMarkerOverlay),
}

impl MarkerEnd {
    /// Resolves the decoration of one connector end.
    ///
    /// `implicit` is the marker used when the style names none (the draw.io
    /// `arrows` edge default). Returns `None` for undecorated ends.
    pub fn resolve(
        attrs: &MarkerAttributes,
        implicit: Option<MarkerKind>,
        stroke_width: f32,
        defaults: &StyleDefaults,
    ) -> Option<Self> {
        let kind = attrs.kind.or(implicit)?;
        let shape = kind.target_shape()?;

        let open_overlay = if attrs.fill.unwrap_or(true) {
            None
        } else {
            kind.open_overlay()
        };
        if let Some(overlay) = open_overlay {
            return Some(Self::Emulated(OpenMarkerOverlay::new(
                overlay,
                attrs.size,
                stroke_width,
                defaults.marker_size,
            )));
        }

        Some(Self::Native(MarkerSpec {
            shape,
            size: MarkerSize::from_px(attrs.size, stroke_width, defaults.marker_size),
        }))
    }

    /// Trim distance for this end; zero for native markers
    pub fn trim(&self) -> f32 {
        match self {
            Self::Native(_) => 0.0,
            Self::Emulated(overlay) => overlay.trim,
        }
    }
}
