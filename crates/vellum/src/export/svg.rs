//! SVG preview of translated pages.

use std::{fs::File, io::Write};

use base64::Engine as _;
use indexmap::IndexMap;
use log::{debug, error, info};
use svg::{
    Document,
    node::{Text as SvgText, element as svg_element},
};

use vellum_core::{
    color::Color,
    draw::{FillDefinition, MarkerShape, MarkerSize, MarkerSpec, PathCommand, TextBlock, TextRun},
    geometry::{Bounds, Point},
    style::{Direction, HorizontalAlign, VerticalAlign},
};

use crate::{
    export,
    render::{ConnectorRecord, LabelRecord, PageRender, RenderElement, ShapeRecord},
};

/// Applies a stroke definition's attributes to an SVG element.
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let stroke = $stroke;
        let mut elem = $element
            .set("stroke", stroke.color().to_string())
            .set("stroke-opacity", stroke.opacity() * stroke.color().alpha())
            .set("stroke-width", stroke.width())
            .set("stroke-linejoin", stroke.join().to_svg_value());

        if let Some(dashes) = stroke.dash_lengths() {
            let dasharray: Vec<String> = dashes.iter().map(f32::to_string).collect();
            elem = elem.set("stroke-dasharray", dasharray.join(","));
        }

        elem
    }};
}

const SHADOW_OFFSET: f32 = 3.0;

/// SVG exporter for one page.
pub struct Svg {
    file_name: String,
    background: Option<Color>,
}

impl Svg {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            background: None,
        }
    }

    pub fn with_background(mut self, background: Option<Color>) -> Self {
        self.background = background;
        self
    }

    /// Renders a page into an SVG document, records drawn in list order.
    pub fn render_page(&self, page: &PageRender) -> Document {
        let mut doc = Document::new()
            .set("viewBox", format!("0 0 {} {}", page.width, page.height))
            .set("width", page.width)
            .set("height", page.height);

        if let Some(background) = self.background {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("width", page.width)
                    .set("height", page.height)
                    .set("fill", background.to_string())
                    .set("fill-opacity", background.alpha()),
            );
        }

        let mut defs = Definitions::default();
        let mut content = svg_element::Group::new();
        for (idx, record) in page.records.iter().enumerate() {
            let id = record.id.to_string();
            content = match &record.element {
                RenderElement::Shape(shape) => {
                    content.add(self.render_shape(&id, idx, shape, &mut defs))
                }
                RenderElement::Connector(connector) => {
                    content.add(self.render_connector(&id, connector, &mut defs))
                }
                RenderElement::Label(label) => content.add(render_label(label)),
            };
        }

        debug!(records = page.records.len(), definitions = defs.len(); "SVG page rendered");
        doc.add(defs.into_element()).add(content)
    }

    fn render_shape(
        &self,
        id: &str,
        idx: usize,
        shape: &ShapeRecord,
        defs: &mut Definitions,
    ) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("id", id);

        if shape.shadow {
            let offset = Point::new(SHADOW_OFFSET, SHADOW_OFFSET);
            let shadow_path: Vec<PathCommand> =
                shape.path.iter().map(|command| command.translate(offset)).collect();
            group = group.add(
                svg_element::Path::new()
                    .set("d", path_data(&shadow_path))
                    .set("fill", "#000000")
                    .set("fill-opacity", 0.25),
            );
        }

        let mut outline = svg_element::Path::new().set("d", path_data(&shape.path));
        outline = match &shape.fill {
            FillDefinition::None => outline.set("fill", "none"),
            FillDefinition::Solid { color, opacity } => outline
                .set("fill", color.to_string())
                .set("fill-opacity", opacity * color.alpha()),
            FillDefinition::Gradient {
                from,
                to,
                direction,
                opacity,
            } => {
                let gradient_id = format!("gradient-{idx}");
                defs.add_gradient(&gradient_id, *from, *to, *direction);
                outline
                    .set("fill", format!("url(#{gradient_id})"))
                    .set("fill-opacity", *opacity)
            }
        };
        outline = match &shape.stroke {
            Some(stroke) => apply_stroke!(outline, stroke),
            None => outline.set("stroke", "none"),
        };
        group = group.add(outline);

        for detail in &shape.details {
            let mut path = svg_element::Path::new()
                .set("d", path_data(detail))
                .set("fill", "none");
            if let Some(stroke) = &shape.stroke {
                path = apply_stroke!(path, stroke);
            }
            group = group.add(path);
        }

        let placement = box_transform(shape);
        if let Some(image) = &shape.image {
            let href = format!(
                "data:{};base64,{}",
                image.media_type,
                base64::engine::general_purpose::STANDARD.encode(image.bytes.as_slice())
            );
            let mut element = svg_element::Image::new()
                .set("x", shape.bounds.min_x())
                .set("y", shape.bounds.min_y())
                .set("width", shape.bounds.width())
                .set("height", shape.bounds.height())
                .set("href", href);
            if let Some(transform) = &placement {
                element = element.set("transform", transform.clone());
            }
            group = group.add(element);
        }

        if let Some(text) = &shape.text {
            let mut rendered = render_text(text, shape.bounds);
            if let Some(transform) = placement {
                rendered = rendered.set("transform", transform);
            }
            group = group.add(rendered);
        }

        group
    }

    fn render_connector(
        &self,
        id: &str,
        connector: &ConnectorRecord,
        defs: &mut Definitions,
    ) -> svg_element::Group {
        let mut group = svg_element::Group::new().set("id", id);
        let color = connector
            .stroke
            .as_ref()
            .map(|stroke| stroke.color())
            .unwrap_or_default();

        let mut path = svg_element::Path::new()
            .set("d", polyline_data(&connector.points, connector.curved))
            .set("fill", "none");
        path = match &connector.stroke {
            Some(stroke) => apply_stroke!(path, stroke),
            None => path.set("stroke", "none"),
        };
        if let Some(marker) = connector.start_marker {
            path = path.set("marker-start", defs.marker_url(marker, color));
        }
        if let Some(marker) = connector.end_marker {
            path = path.set("marker-end", defs.marker_url(marker, color));
        }
        group = group.add(path);

        for overlay in &connector.overlays {
            let mut element = svg_element::Path::new()
                .set("d", path_data(&overlay.path))
                .set("fill", "none");
            if let Some(stroke) = &connector.stroke {
                element = element
                    .set("stroke", stroke.color().to_string())
                    .set("stroke-width", stroke.width());
            }
            group = group.add(element);
        }

        if let Some(label) = &connector.label {
            group = group.add(render_label(label));
        }

        group
    }

    /// Writes an SVG document to the configured file
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(&f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_page(&mut self, page: &PageRender) -> Result<(), export::Error> {
        if !(page.width.is_finite() && page.height.is_finite()) {
            return Err(export::Error::Render(format!(
                "page `{}` has no finite size",
                page.id
            )));
        }
        let doc = self.render_page(page);
        self.write_document(doc)
    }
}

/// Marker and gradient definitions shared by one document.
#[derive(Default)]
struct Definitions {
    markers: IndexMap<String, svg_element::Marker>,
    gradients: Vec<svg_element::LinearGradient>,
}

impl Definitions {
    fn len(&self) -> usize {
        self.markers.len() + self.gradients.len()
    }

    fn marker_url(&mut self, marker: MarkerSpec, color: Color) -> String {
        let id = format!(
            "marker-{}-{}-{}",
            marker_shape_name(marker.shape),
            marker_size_name(marker.size),
            color.to_hex().trim_start_matches('#')
        );
        if !self.markers.contains_key(&id) {
            let element = marker_element(&id, marker, color);
            self.markers.insert(id.clone(), element);
        }
        format!("url(#{id})")
    }

    fn add_gradient(&mut self, id: &str, from: Color, to: Color, direction: Direction) {
        let (x1, y1, x2, y2) = match direction {
            Direction::East => (0, 0, 1, 0),
            Direction::West => (1, 0, 0, 0),
            Direction::South => (0, 0, 0, 1),
            Direction::North => (0, 1, 0, 0),
        };
        let stop = |offset: i32, color: Color| {
            svg_element::Stop::new()
                .set("offset", offset)
                .set("stop-color", color.to_string())
                .set("stop-opacity", color.alpha())
        };
        self.gradients.push(
            svg_element::LinearGradient::new()
                .set("id", id)
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .add(stop(0, from))
                .add(stop(1, to)),
        );
    }

    fn into_element(self) -> svg_element::Definitions {
        let mut defs = svg_element::Definitions::new();
        for (_, marker) in self.markers {
            defs = defs.add(marker);
        }
        for gradient in self.gradients {
            defs = defs.add(gradient);
        }
        defs
    }
}

fn marker_shape_name(shape: MarkerShape) -> &'static str {
    match shape {
        MarkerShape::Triangle => "triangle",
        MarkerShape::Stealth => "stealth",
        MarkerShape::Arrow => "arrow",
        MarkerShape::Diamond => "diamond",
        MarkerShape::Oval => "oval",
    }
}

fn marker_size_name(size: MarkerSize) -> &'static str {
    match size {
        MarkerSize::Small => "small",
        MarkerSize::Medium => "medium",
        MarkerSize::Large => "large",
    }
}

fn marker_element(id: &str, marker: MarkerSpec, color: Color) -> svg_element::Marker {
    let extent = match marker.size {
        MarkerSize::Small => 6,
        MarkerSize::Medium => 9,
        MarkerSize::Large => 12,
    };
    let (d, filled) = match marker.shape {
        MarkerShape::Triangle => ("M 0 0 L 10 5 L 0 10 z", true),
        MarkerShape::Stealth => ("M 0 0 L 10 5 L 0 10 L 3 5 z", true),
        MarkerShape::Arrow => ("M 0 0 L 10 5 L 0 10", false),
        MarkerShape::Diamond => ("M 0 5 L 5 0 L 10 5 L 5 10 z", true),
        MarkerShape::Oval => ("M 0 5 A 5 5 0 1 1 10 5 A 5 5 0 1 1 0 5 z", true),
    };
    let mut shape = svg_element::Path::new().set("d", d);
    shape = if filled {
        shape
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha())
    } else {
        shape
            .set("fill", "none")
            .set("stroke", color.to_string())
            .set("stroke-width", 1.5)
    };

    svg_element::Marker::new()
        .set("id", id)
        .set("viewBox", "0 0 10 10")
        .set("refX", 9)
        .set("refY", 5)
        .set("markerUnits", "userSpaceOnUse")
        .set("markerWidth", extent)
        .set("markerHeight", extent)
        .set("orient", "auto-start-reverse")
        .add(shape)
}

fn path_data(commands: &[PathCommand]) -> String {
    let parts: Vec<String> = commands
        .iter()
        .map(|command| match *command {
            PathCommand::MoveTo(p) => format!("M {} {}", p.x(), p.y()),
            PathCommand::LineTo(p) => format!("L {} {}", p.x(), p.y()),
            PathCommand::CubicTo { ctrl1, ctrl2, to } => format!(
                "C {} {}, {} {}, {} {}",
                ctrl1.x(),
                ctrl1.y(),
                ctrl2.x(),
                ctrl2.y(),
                to.x(),
                to.y()
            ),
            PathCommand::Close => "Z".to_string(),
        })
        .collect();
    parts.join(" ")
}

/// Polyline path data; curved connectors are smoothed through midpoints.
fn polyline_data(points: &[Point], curved: bool) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut data = format!("M {} {}", first.x(), first.y());
    if curved && rest.len() > 1 {
        for pair in rest.windows(2) {
            let mid = pair[0].midpoint(pair[1]);
            data.push_str(&format!(" Q {} {} {} {}", pair[0].x(), pair[0].y(), mid.x(), mid.y()));
        }
        if let Some(last) = rest.last() {
            data.push_str(&format!(" L {} {}", last.x(), last.y()));
        }
    } else {
        for point in rest {
            data.push_str(&format!(" L {} {}", point.x(), point.y()));
        }
    }
    data
}

/// Rotation and mirroring of a shape box about its center, if any.
fn box_transform(shape: &ShapeRecord) -> Option<String> {
    if shape.rotation == 0.0 && !shape.flip_h && !shape.flip_v {
        return None;
    }
    let center = shape.bounds.center();
    let sx = if shape.flip_h { -1 } else { 1 };
    let sy = if shape.flip_v { -1 } else { 1 };
    Some(format!(
        "translate({} {}) rotate({}) scale({sx} {sy}) translate({} {})",
        center.x(),
        center.y(),
        shape.rotation,
        -center.x(),
        -center.y()
    ))
}

fn render_label(label: &LabelRecord) -> svg_element::Group {
    let mut group = svg_element::Group::new();
    if let Some(background) = label.text.background {
        group = group.add(
            svg_element::Rectangle::new()
                .set("x", label.bounds.min_x())
                .set("y", label.bounds.min_y())
                .set("width", label.bounds.width())
                .set("height", label.bounds.height())
                .set("fill", background.to_string())
                .set("fill-opacity", background.alpha()),
        );
    }
    group.add(render_text(&label.text, label.bounds))
}

fn render_text(block: &TextBlock, bounds: Bounds) -> svg_element::Text {
    let font_size = block.max_font_size().unwrap_or(12.0);
    let line_height = font_size * 1.2;
    let line_count = block.plain_text().split('\n').count().max(1);
    let block_height = line_height * line_count as f32;
    let center = bounds.center();

    let (x, anchor) = match block.align {
        HorizontalAlign::Left => (bounds.min_x(), "start"),
        HorizontalAlign::Center => (center.x(), "middle"),
        HorizontalAlign::Right => (bounds.max_x(), "end"),
    };
    let top = match block.vertical_align {
        VerticalAlign::Top => bounds.min_y(),
        VerticalAlign::Middle => center.y() - block_height / 2.0,
        VerticalAlign::Bottom => bounds.max_y() - block_height,
    };

    let mut text = svg_element::Text::new("")
        .set("x", x)
        .set("y", top)
        .set("text-anchor", anchor)
        .set("dominant-baseline", "hanging");
    if !block.horizontal {
        text = text.set(
            "transform",
            format!("rotate(-90 {} {})", center.x(), center.y()),
        );
    }

    let mut line = 0usize;
    let mut line_start = true;
    for run in &block.runs {
        for (idx, piece) in run.text.split('\n').enumerate() {
            if idx > 0 {
                line += 1;
                line_start = true;
            }
            if piece.is_empty() {
                continue;
            }
            let mut tspan = svg_element::TSpan::new("").add(SvgText::new(piece));
            if line_start {
                tspan = tspan
                    .set("x", x)
                    .set("y", top + line as f32 * line_height);
                line_start = false;
            }
            text = text.add(apply_run(tspan, run));
        }
    }
    text
}

fn apply_run(mut tspan: svg_element::TSpan, run: &TextRun) -> svg_element::TSpan {
    if let Some(size) = run.font_size {
        tspan = tspan.set("font-size", size);
    }
    if let Some(family) = &run.font_family {
        tspan = tspan.set("font-family", family.as_str());
    }
    if let Some(color) = run.color {
        tspan = tspan
            .set("fill", color.to_string())
            .set("fill-opacity", color.alpha());
    }
    if run.bold {
        tspan = tspan.set("font-weight", "bold");
    }
    if run.italic {
        tspan = tspan.set("font-style", "italic");
    }
    if run.underline {
        tspan = tspan.set("text-decoration", "underline");
    }
    tspan
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use indexmap::IndexMap;

    use vellum_core::{
        draw::{ShapeKind, StrokeDefinition, StrokeJoin, StrokeStyle},
        geometry::Size,
        identifier::Id,
    };

    use super::*;
    use crate::render::{ImageData, RenderRecord};

    fn square_path() -> Vec<PathCommand> {
        vec![
            PathCommand::MoveTo(Point::new(0.0, 0.0)),
            PathCommand::LineTo(Point::new(10.0, 0.0)),
            PathCommand::LineTo(Point::new(10.0, 10.0)),
            PathCommand::Close,
        ]
    }

    fn page(records: Vec<RenderRecord>) -> PageRender {
        PageRender {
            id: "p".to_string(),
            name: "Page".to_string(),
            width: 100.0,
            height: 80.0,
            records,
        }
    }

    fn shape_record() -> RenderRecord {
        RenderRecord {
            id: Id::new("s"),
            z_index: 0,
            element: RenderElement::Shape(ShapeRecord {
                kind: ShapeKind::Rectangle,
                bounds: Bounds::new_from_top_left(Point::new(0.0, 0.0), Size::new(10.0, 10.0)),
                rotation: 0.0,
                flip_h: false,
                flip_v: false,
                path: square_path(),
                details: Vec::new(),
                fill: FillDefinition::Gradient {
                    from: Color::from_rgb8(255, 0, 0),
                    to: Color::from_rgb8(0, 0, 255),
                    direction: Direction::South,
                    opacity: 1.0,
                },
                stroke: Some(StrokeDefinition::new(Color::default(), 2.0).with_style(StrokeStyle::Dashed)),
                shadow: true,
                text: None,
                image: Some(ImageData {
                    media_type: "image/png".to_string(),
                    rasterized: false,
                    bytes: Arc::new(vec![1, 2, 3]),
                }),
                passthrough: IndexMap::new(),
            }),
        }
    }

    fn connector_record() -> RenderRecord {
        let marker = MarkerSpec {
            shape: MarkerShape::Triangle,
            size: MarkerSize::Small,
        };
        RenderRecord {
            id: Id::new("e"),
            z_index: 1,
            element: RenderElement::Connector(ConnectorRecord {
                points: vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(50.0, 40.0)],
                curved: false,
                stroke: Some(StrokeDefinition::new(Color::default(), 1.0).with_join(StrokeJoin::Round)),
                start_marker: Some(marker),
                end_marker: Some(marker),
                overlays: Vec::new(),
                label: None,
                passthrough: IndexMap::new(),
            }),
        }
    }

    #[test]
    fn test_render_page() {
        let svg = Svg::new("unused.svg").with_background(Some(Color::from_rgb8(255, 255, 255)));
        let doc = svg
            .render_page(&page(vec![shape_record(), connector_record()]))
            .to_string();

        assert!(doc.contains(r#"viewBox="0 0 100 80""#));
        assert!(doc.contains("gradient-0"));
        assert!(doc.contains("stroke-dasharray"));
        assert!(doc.contains(r#"stroke-linejoin="miter""#));
        assert!(doc.contains(r#"stroke-linejoin="round""#));
        assert!(doc.contains("data:image/png;base64,AQID"));
        assert!(doc.contains("M 0 0 L 50 0 L 50 40"));
        // One definition serves both ends
        assert_eq!(doc.matches("<marker").count(), 1);
    }

    #[test]
    fn test_curved_polyline_is_smoothed() {
        let points = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)];
        assert_eq!(polyline_data(&points, false), "M 0 0 L 10 0 L 10 10");
        assert!(polyline_data(&points, true).contains(" Q 10 0 10 5"));
        assert_eq!(polyline_data(&[], true), "");
    }

    #[test]
    fn test_write_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.svg");
        let mut svg = Svg::new(path.to_str().unwrap());

        export::Exporter::export_page(&mut svg, &page(vec![connector_record()])).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("<svg"));
    }
}
