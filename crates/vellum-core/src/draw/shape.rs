//! Shape geometry library.
//!
//! [`ShapeKind`] is the closed set of shape families Vellum can draw. Each
//! family generates its outline in unit-square space from the node's pixel
//! size and style attributes; the resolver then maps it onto the page.
//!
//! # Overview
//!
//! - [`ShapeKind::from_style`] normalizes draw.io shape names into a family
//! - [`ShapeKind::outline`] generates the [`GeometryOutline`]
//! - [`ShapeKind::normalize_box`] squares the box of fixed-aspect families
//!
//! # Example
//!
//! ```
//! # use vellum_core::draw::ShapeKind;
//! # use vellum_core::geometry::Size;
//! # use vellum_core::style::{StyleAttributes, StyleDefaults};
//! let mut attrs = StyleAttributes::default();
//! attrs.shape = Some("mxgraph.basic.star".to_string());
//!
//! let kind = ShapeKind::from_style(&attrs).unwrap();
//! let outline = kind.outline(Size::new(80.0, 80.0), &attrs, &StyleDefaults::default());
//! assert_eq!(outline.boundary().flatten().len(), 10);
//! ```

use std::fmt;

use log::trace;
use serde::{Serialize, Serializer};

use crate::{
    draw::outline::{GeometryOutline, Subpath},
    geometry::{Bounds, Point, Size},
    style::{StyleAttributes, StyleDefaults},
};

mod arrows;
mod basic;
mod decorated;
mod flowchart;

/// Default swimlane header height in pixels.
pub const DEFAULT_SWIMLANE_HEADER: f32 = 26.0;

/// Shape families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Plain or rounded (`rounded=1`) rectangle
    Rectangle,
    Square,
    Ellipse,
    Circle,
    /// Flowchart decision
    Rhombus,
    /// Apex pointing east, rotated by `direction`
    Triangle,
    /// Apex pointing north (flowchart extract)
    IsoscelesTriangle,
    /// Apex pointing south (flowchart merge)
    Merge,
    RightTriangle,
    Parallelogram,
    Trapezoid,
    ManualInput,
    Hexagon,
    Pentagon,
    Octagon,
    Polygon {
        sides: u32,
    },
    Star {
        points: u32,
    },
    Cylinder,
    Cloud,
    Document,
    Tape,
    /// Step / chevron
    Step,
    PredefinedProcess,
    OffPageConnector,
    DataStorage,
    Card,
    Callout,
    RightArrow,
    NotchedRightArrow,
    DoubleArrow,
    Cross,
    Cube,
    Smiley,
    Swimlane,
    /// Invisible rectangle carrying text
    Text,
    /// Rectangle frame around an image
    Image,
}

/// A shape name with no matching family.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported shape `{0}`")]
pub struct UnsupportedShape(pub String);

impl ShapeKind {
    /// Every family, with representative parameters for the parameterized ones.
    pub const ALL: [ShapeKind; 36] = [
        ShapeKind::Rectangle,
        ShapeKind::Square,
        ShapeKind::Ellipse,
        ShapeKind::Circle,
        ShapeKind::Rhombus,
        ShapeKind::Triangle,
        ShapeKind::IsoscelesTriangle,
        ShapeKind::Merge,
        ShapeKind::RightTriangle,
        ShapeKind::Parallelogram,
        ShapeKind::Trapezoid,
        ShapeKind::ManualInput,
        ShapeKind::Hexagon,
        ShapeKind::Pentagon,
        ShapeKind::Octagon,
        ShapeKind::Polygon { sides: 7 },
        ShapeKind::Star { points: 5 },
        ShapeKind::Cylinder,
        ShapeKind::Cloud,
        ShapeKind::Document,
        ShapeKind::Tape,
        ShapeKind::Step,
        ShapeKind::PredefinedProcess,
        ShapeKind::OffPageConnector,
        ShapeKind::DataStorage,
        ShapeKind::Card,
        ShapeKind::Callout,
        ShapeKind::RightArrow,
        ShapeKind::NotchedRightArrow,
        ShapeKind::DoubleArrow,
        ShapeKind::Cross,
        ShapeKind::Cube,
        ShapeKind::Smiley,
        ShapeKind::Swimlane,
        ShapeKind::Text,
        ShapeKind::Image,
    ];

    /// Resolves the family of a node from its style.
    ///
    /// Nodes without a shape name are rectangles, or images when an `image`
    /// attribute is present.
    pub fn from_style(attrs: &StyleAttributes) -> Result<Self, UnsupportedShape> {
        let Some(name) = attrs.shape.as_deref().filter(|name| !name.is_empty()) else {
            return Ok(if attrs.image.is_some() {
                ShapeKind::Image
            } else {
                ShapeKind::Rectangle
            });
        };
        Self::from_name(name, attrs).ok_or_else(|| UnsupportedShape(name.to_string()))
    }

    /// Maps a draw.io shape name onto a family.
    ///
    /// Names are compared case-insensitively; the `mxgraph.basic.` and
    /// `mxgraph.flowchart.` prefixes share one vocabulary.
    pub fn from_name(name: &str, attrs: &StyleAttributes) -> Option<Self> {
        let lower = name.trim().to_ascii_lowercase();
        let key = lower
            .strip_prefix("mxgraph.basic.")
            .or_else(|| lower.strip_prefix("mxgraph.flowchart."))
            .unwrap_or(&lower);
        let fixed_aspect = attrs.passthrough_value("aspect") == Some("fixed");
        let star_points = attrs.geometry.star_points;

        let kind = match key {
            "rect" | "rectangle" | "label" | "terminator" | "annotation_1" => {
                if fixed_aspect {
                    ShapeKind::Square
                } else {
                    ShapeKind::Rectangle
                }
            }
            "process" => {
                let has_bars = attrs.geometry.background_outline.unwrap_or(false)
                    || attrs.geometry.size.is_some_and(|size| size > 0.0);
                if has_bars {
                    ShapeKind::PredefinedProcess
                } else {
                    ShapeKind::Rectangle
                }
            }
            "square" => ShapeKind::Square,
            "ellipse" | "oval" | "doubleellipse" | "on-page_reference" | "start_1" | "start_2" => {
                if fixed_aspect {
                    ShapeKind::Circle
                } else {
                    ShapeKind::Ellipse
                }
            }
            "circle" => ShapeKind::Circle,
            "rhombus" | "decision" | "mxgraph.bpmn.shape" => ShapeKind::Rhombus,
            "triangle" => ShapeKind::Triangle,
            "isoscelestriangle" | "acute_triangle" | "extract_or_measurement" => {
                ShapeKind::IsoscelesTriangle
            }
            "merge" | "merge_or_storage" => ShapeKind::Merge,
            "righttriangle" | "orthogonal_triangle" => ShapeKind::RightTriangle,
            "parallelogram" | "data" => ShapeKind::Parallelogram,
            "trapezoid" | "manual_operation" => ShapeKind::Trapezoid,
            "manualinput" | "manual_input" => ShapeKind::ManualInput,
            "hexagon" | "preparation" => ShapeKind::Hexagon,
            "pentagon" => ShapeKind::Pentagon,
            "octagon" | "octagon2" => ShapeKind::Octagon,
            "polygon" | "regularpolygon" => ShapeKind::Polygon {
                sides: attrs.geometry.sides.unwrap_or(6),
            },
            "star" => ShapeKind::Star {
                points: star_points.unwrap_or(5),
            },
            "4_point_star" | "4_point_star_2" => ShapeKind::Star {
                points: star_points.unwrap_or(4),
            },
            "6_point_star" => ShapeKind::Star {
                points: star_points.unwrap_or(6),
            },
            "8_point_star" => ShapeKind::Star {
                points: star_points.unwrap_or(8),
            },
            "cylinder" | "cylinder2" | "cylinder3" | "database" | "datastore" => {
                ShapeKind::Cylinder
            }
            "cloud" => ShapeKind::Cloud,
            "document" => ShapeKind::Document,
            "tape" | "paper_tape" => ShapeKind::Tape,
            "step" | "chevron" => ShapeKind::Step,
            "predefined_process" | "predefinedprocess" => ShapeKind::PredefinedProcess,
            "offpageconnector" | "off-page_reference" => ShapeKind::OffPageConnector,
            "datastorage" | "stored_data" => ShapeKind::DataStorage,
            "card" => ShapeKind::Card,
            "callout" | "rectangular_callout" => ShapeKind::Callout,
            "singlearrow" | "mxgraph.arrows2.arrow" | "arrow" => ShapeKind::RightArrow,
            "mxgraph.arrows2.stylisedarrow" | "mxgraph.arrows2.notchedarrow" => {
                ShapeKind::NotchedRightArrow
            }
            "doublearrow" | "mxgraph.arrows2.twowayarrow" => ShapeKind::DoubleArrow,
            "cross" | "plus" => ShapeKind::Cross,
            "cube" | "mxgraph.infographic.shadedcube" => ShapeKind::Cube,
            "smiley" => ShapeKind::Smiley,
            "swimlane" => ShapeKind::Swimlane,
            "text" => ShapeKind::Text,
            "image" => ShapeKind::Image,
            _ => return None,
        };
        Some(kind)
    }

    /// Snake-case family name
    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Rectangle => "rectangle",
            ShapeKind::Square => "square",
            ShapeKind::Ellipse => "ellipse",
            ShapeKind::Circle => "circle",
            ShapeKind::Rhombus => "rhombus",
            ShapeKind::Triangle => "triangle",
            ShapeKind::IsoscelesTriangle => "isosceles_triangle",
            ShapeKind::Merge => "merge",
            ShapeKind::RightTriangle => "right_triangle",
            ShapeKind::Parallelogram => "parallelogram",
            ShapeKind::Trapezoid => "trapezoid",
            ShapeKind::ManualInput => "manual_input",
            ShapeKind::Hexagon => "hexagon",
            ShapeKind::Pentagon => "pentagon",
            ShapeKind::Octagon => "octagon",
            ShapeKind::Polygon { .. } => "polygon",
            ShapeKind::Star { .. } => "star",
            ShapeKind::Cylinder => "cylinder",
            ShapeKind::Cloud => "cloud",
            ShapeKind::Document => "document",
            ShapeKind::Tape => "tape",
            ShapeKind::Step => "step",
            ShapeKind::PredefinedProcess => "predefined_process",
            ShapeKind::OffPageConnector => "off_page_connector",
            ShapeKind::DataStorage => "data_storage",
            ShapeKind::Card => "card",
            ShapeKind::Callout => "callout",
            ShapeKind::RightArrow => "right_arrow",
            ShapeKind::NotchedRightArrow => "notched_right_arrow",
            ShapeKind::DoubleArrow => "double_arrow",
            ShapeKind::Cross => "cross",
            ShapeKind::Cube => "cube",
            ShapeKind::Smiley => "smiley",
            ShapeKind::Swimlane => "swimlane",
            ShapeKind::Text => "text",
            ShapeKind::Image => "image",
        }
    }

    /// Families drawn with a square box
    pub fn is_fixed_aspect(&self) -> bool {
        matches!(self, ShapeKind::Square | ShapeKind::Circle)
    }

    /// Families whose outline follows the `direction` attribute
    pub fn is_directional(&self) -> bool {
        matches!(
            self,
            ShapeKind::Triangle
                | ShapeKind::Step
                | ShapeKind::RightArrow
                | ShapeKind::NotchedRightArrow
                | ShapeKind::DoubleArrow
        )
    }

    /// Whether the family fills its outline when `fillColor` is not set
    pub fn has_default_fill(&self) -> bool {
        !matches!(self, ShapeKind::Text | ShapeKind::Image)
    }

    /// Whether the family strokes its outline when `strokeColor` is not set
    pub fn has_default_stroke(&self) -> bool {
        !matches!(self, ShapeKind::Text | ShapeKind::Image)
    }

    /// Squares the box of fixed-aspect families around its original center.
    pub fn normalize_box(&self, bounds: Bounds) -> Bounds {
        if !self.is_fixed_aspect() {
            return bounds;
        }
        let side = bounds.width().min(bounds.height());
        Bounds::new_from_center(bounds.center(), Size::new(side, side))
    }

    /// Generates the unit-square outline for a box of the given pixel size.
    pub fn outline(
        &self,
        size: Size,
        attrs: &StyleAttributes,
        defaults: &StyleDefaults,
    ) -> GeometryOutline {
        let turns = if self.is_directional() {
            attrs
                .geometry
                .direction
                .map(|direction| direction.quarter_turns())
                .unwrap_or(0)
        } else {
            0
        };
        // Pixel parameters are measured along the unrotated family axes.
        let (width, height) = if turns % 2 == 1 {
            (size.height(), size.width())
        } else {
            (size.width(), size.height())
        };
        trace!(kind = self.name(), width, height, turns; "Generating outline");
        let params = Params {
            width,
            height,
            attrs,
            defaults,
        };

        let figure = match *self {
            ShapeKind::Rectangle | ShapeKind::Square | ShapeKind::Text | ShapeKind::Image => {
                basic::rectangle(&params)
            }
            ShapeKind::Ellipse | ShapeKind::Circle => basic::ellipse(),
            ShapeKind::Rhombus => basic::rhombus(),
            ShapeKind::Triangle => basic::triangle(),
            ShapeKind::IsoscelesTriangle => basic::isosceles_triangle(),
            ShapeKind::Merge => basic::merge(),
            ShapeKind::RightTriangle => basic::right_triangle(),
            ShapeKind::Pentagon => basic::regular_polygon(5),
            ShapeKind::Polygon { sides } => basic::regular_polygon(sides),
            ShapeKind::Star { points } => basic::star(points, &params),
            ShapeKind::Cross => basic::cross(&params),
            ShapeKind::Parallelogram => flowchart::parallelogram(&params),
            ShapeKind::Trapezoid => flowchart::trapezoid(&params),
            ShapeKind::ManualInput => flowchart::manual_input(&params),
            ShapeKind::Hexagon => flowchart::hexagon(&params),
            ShapeKind::Octagon => flowchart::octagon(&params),
            ShapeKind::Step => flowchart::step(&params),
            ShapeKind::Cylinder => flowchart::cylinder(&params),
            ShapeKind::Cloud => flowchart::cloud(),
            ShapeKind::Document => flowchart::document(&params),
            ShapeKind::Tape => flowchart::tape(&params),
            ShapeKind::PredefinedProcess => flowchart::predefined_process(&params),
            ShapeKind::OffPageConnector => flowchart::off_page_connector(&params),
            ShapeKind::DataStorage => flowchart::data_storage(&params),
            ShapeKind::Card => flowchart::card(&params),
            ShapeKind::RightArrow => arrows::right_arrow(&params),
            ShapeKind::NotchedRightArrow => arrows::notched_right_arrow(&params),
            ShapeKind::DoubleArrow => arrows::double_arrow(&params),
            ShapeKind::Callout => decorated::callout(&params),
            ShapeKind::Cube => decorated::cube(&params),
            ShapeKind::Smiley => decorated::smiley(),
            ShapeKind::Swimlane => decorated::swimlane(&params),
        };

        figure.rotated(turns).into_outline()
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ShapeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Inputs shared by the family generators.
struct Params<'a> {
    width: f32,
    height: f32,
    attrs: &'a StyleAttributes,
    defaults: &'a StyleDefaults,
}

impl Params<'_> {
    /// `size` as a fraction, clamped to `0..=max`
    fn size_fraction(&self, default: f32, max: f32) -> f32 {
        self.attrs
            .geometry
            .size
            .filter(|value| value.is_finite())
            .unwrap_or(default)
            .clamp(0.0, max)
    }

    /// `size` in pixels, clamped to `0..=max`
    fn size_px(&self, default: f32, max: f32) -> f32 {
        self.size_fraction(default, max.max(0.0))
    }

    fn min_side(&self) -> f32 {
        self.width.min(self.height).max(0.0)
    }

    /// Pixel length along x as a unit fraction
    fn unit_x(&self, px: f32) -> f32 {
        if self.width > 0.0 { px / self.width } else { 0.0 }
    }

    /// Pixel length along y as a unit fraction
    fn unit_y(&self, px: f32) -> f32 {
        if self.height > 0.0 { px / self.height } else { 0.0 }
    }
}

/// A family outline before compass anchors are derived.
struct Figure {
    boundary: Subpath,
    details: Vec<Subpath>,
    apexes: Vec<Point>,
}

impl Figure {
    fn new(boundary: Subpath) -> Self {
        Self {
            boundary,
            details: Vec::new(),
            apexes: Vec::new(),
        }
    }

    fn polygon(points: &[Point]) -> Self {
        Self::new(Subpath::polygon(points))
    }

    fn with_detail(mut self, detail: Subpath) -> Self {
        self.details.push(detail);
        self
    }

    fn with_apexes(mut self, apexes: impl IntoIterator<Item = Point>) -> Self {
        self.apexes.extend(apexes);
        self
    }

    /// Rotates the figure clockwise by quarter turns inside the unit square.
    fn rotated(self, turns: u8) -> Self {
        if turns % 4 == 0 {
            return self;
        }
        let quarter = |p: Point| Point::new(1.0 - p.y(), p.x());
        let rotate = move |p: Point| (0..turns % 4).fold(p, |acc, _| quarter(acc));
        Self {
            boundary: self.boundary.map_points(rotate),
            details: self.details.iter().map(|d| d.map_points(rotate)).collect(),
            apexes: self.apexes.into_iter().map(rotate).collect(),
        }
    }

    fn into_outline(self) -> GeometryOutline {
        let outline = self
            .details
            .into_iter()
            .fold(GeometryOutline::new(self.boundary), GeometryOutline::with_detail);
        outline.with_apexes(self.apexes)
    }
}

fn p(x: f32, y: f32) -> Point {
    Point::new(x, y)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::style::Direction;

    // ===================
    // Strategies
    // ===================

    fn kind_strategy() -> impl Strategy<Value = ShapeKind> {
        prop_oneof![
            prop::sample::select(ShapeKind::ALL.to_vec()),
            (3u32..=32).prop_map(|sides| ShapeKind::Polygon { sides }),
            (3u32..=32).prop_map(|points| ShapeKind::Star { points }),
        ]
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (1.0f32..600.0, 1.0f32..600.0).prop_map(|(w, h)| Size::new(w, h))
    }

    fn direction_strategy() -> impl Strategy<Value = Option<Direction>> {
        prop::option::of(prop::sample::select(vec![
            Direction::East,
            Direction::South,
            Direction::West,
            Direction::North,
        ]))
    }

    fn attrs_strategy() -> impl Strategy<Value = StyleAttributes> {
        (
            prop::option::of(0.0f32..=1.0),
            any::<bool>(),
            0.0f32..=50.0,
            direction_strategy(),
            prop::option::of(0.0f32..=200.0),
        )
            .prop_map(|(size, rounded, arc_size, direction, start_size)| {
                let mut attrs = StyleAttributes::default();
                attrs.geometry.size = size;
                attrs.geometry.rounded = Some(rounded);
                attrs.geometry.arc_size = Some(arc_size);
                attrs.geometry.direction = direction;
                attrs.connector.start.size = start_size;
                attrs
            })
    }

    // ===================
    // Property Test Functions
    // ===================

    /// Every family produces a closed, non-self-intersecting boundary.
    fn check_outline_is_closed_and_simple(
        kind: ShapeKind,
        size: Size,
        attrs: StyleAttributes,
    ) -> Result<(), TestCaseError> {
        let outline = kind.outline(size, &attrs, &StyleDefaults::default());
        let boundary = outline.boundary();

        prop_assert!(boundary.is_closed(), "{kind} boundary is open");
        prop_assert!(boundary.is_simple(), "{kind} boundary self-intersects");
        prop_assert!(boundary.signed_area() > 0.0, "{kind} does not wind clockwise");
        Ok(())
    }

    /// Outline vertices stay inside the unit square.
    fn check_outline_within_unit_square(
        kind: ShapeKind,
        size: Size,
        attrs: StyleAttributes,
    ) -> Result<(), TestCaseError> {
        let outline = kind.outline(size, &attrs, &StyleDefaults::default());
        for point in outline.boundary().flatten() {
            prop_assert!((-1e-3..=1.001).contains(&point.x()), "{kind}: {point:?}");
            prop_assert!((-1e-3..=1.001).contains(&point.y()), "{kind}: {point:?}");
        }
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn outline_is_closed_and_simple(kind in kind_strategy(), size in size_strategy(), attrs in attrs_strategy()) {
            check_outline_is_closed_and_simple(kind, size, attrs)?;
        }

        #[test]
        fn outline_within_unit_square(kind in kind_strategy(), size in size_strategy(), attrs in attrs_strategy()) {
            check_outline_within_unit_square(kind, size, attrs)?;
        }
    }
}
