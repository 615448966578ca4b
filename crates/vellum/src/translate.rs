//! Document translation.
//!
//! Each page goes through three phases with a barrier between them:
//!
//! 1. every shape outline is resolved and turned into a shape record;
//! 2. every edge end is resolved against the finished outlines, then the
//!    edge is routed and decorated;
//! 3. shapes, connectors and labels are composited into one z-ordered
//!    render list.
//!
//! Pages share no mutable state and are translated in parallel. Per-node
//! problems are collected as diagnostics and never abort a page.

use std::collections::HashMap;

use log::{debug, trace};
use rayon::prelude::*;

use vellum_core::{
    document::{Document, EdgeLabelNode, EdgeNode, Page, PageModel, ShapeNode},
    draw::{FillDefinition, MarkerEnd, MarkerKind, MarkerSpec, StrokeDefinition, TextBlock},
    geometry::Point,
    identifier::Id,
    style::{EdgeStyle, PortAttributes, StyleDefaults},
};
use vellum_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};

use crate::{
    compose::{ZEntry, assign_z_order},
    config::RenderConfig,
    connect::{ResolvedConnection, resolve_nearest, resolve_port, resolve_side_midpoint},
    image_cache::ImageCache,
    render::{
        ConnectorRecord, LabelRecord, MarkerOverlayRecord, PageRender, RenderElement,
        RenderRecord, ShapeRecord,
    },
    resolve::ResolvedShape,
    route::{self, LabelPlacement},
    structure::build_page,
};

/// Read-only inputs shared by every page of a translation run.
#[derive(Debug, Clone, Copy)]
pub struct TranslateContext<'a> {
    pub defaults: &'a StyleDefaults,
    pub render: &'a RenderConfig,
    pub images: &'a ImageCache,
}

/// Translates all pages of `document`, in page order.
pub fn translate_pages(
    document: &Document,
    ctx: TranslateContext<'_>,
) -> (Vec<PageRender>, Vec<Diagnostic>) {
    let results: Vec<(PageRender, Vec<Diagnostic>)> = document
        .pages
        .par_iter()
        .enumerate()
        .map(|(index, page)| translate_page(page, index, ctx))
        .collect();

    let mut pages = Vec::with_capacity(results.len());
    let mut diagnostics = Vec::new();
    for (page, page_diagnostics) in results {
        pages.push(page);
        diagnostics.extend(page_diagnostics);
    }
    (pages, diagnostics)
}

/// Translates one page into its render list.
pub fn translate_page(
    page: &Page,
    index: usize,
    ctx: TranslateContext<'_>,
) -> (PageRender, Vec<Diagnostic>) {
    let (model, structure_diagnostics) = build_page(page, index, ctx.defaults);
    let mut diagnostics = DiagnosticCollector::new();
    diagnostics.extend(structure_diagnostics);

    let shapes = resolve_shapes(&model, ctx, &mut diagnostics);
    let edges = route_edges(&model, &shapes, ctx, &mut diagnostics);
    let labels = place_labels(&model, &edges, ctx);
    let records = composite(shapes, edges, labels);

    let mut render = PageRender {
        id: model.id.clone(),
        name: model.name.clone(),
        width: 0.0,
        height: 0.0,
        records,
    };
    size_page(&mut render, &model, &mut diagnostics);
    if ctx.render.normalize_offpage() {
        normalize_offpage(&mut render);
    }

    debug!(
        page = render.id,
        records = render.records.len(),
        diagnostics = diagnostics.len();
        "Translated page"
    );
    (render, diagnostics.into_diagnostics())
}

/// A shape after phase 1.
struct ShapeEntry {
    resolved: ResolvedShape,
    record: ShapeRecord,
}

/// An edge after phase 2.
struct EdgeEntry {
    id: Id,
    ordinal: usize,
    source: Option<usize>,
    target: Option<usize>,
    /// Untrimmed route, used to place labels
    route: Vec<Point>,
    orthogonal: bool,
    record: ConnectorRecord,
}

/// A standalone label after phase 2, attached to the edge at `edge` in the edge list.
struct LabelEntry {
    id: Id,
    edge: usize,
    ordinal: usize,
    record: LabelRecord,
}

fn resolve_shapes(
    model: &PageModel,
    ctx: TranslateContext<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<ShapeEntry> {
    model
        .shapes
        .iter()
        .map(|node| {
            let resolved = ResolvedShape::resolve(node, ctx.defaults);
            if resolved.is_degenerate() {
                diagnostics.emit(
                    Diagnostic::warning(format!("shape `{}` has a degenerate box", node.id))
                        .with_code(ErrorCode::E300)
                        .with_element(node.id)
                        .with_help("connections to it fall back to the box center"),
                );
            }
            let record = shape_record(node, &resolved, ctx, diagnostics);
            ShapeEntry { resolved, record }
        })
        .collect()
}

fn shape_record(
    node: &ShapeNode,
    resolved: &ResolvedShape,
    ctx: TranslateContext<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> ShapeRecord {
    let style = &node.style;
    let image = style
        .image
        .as_deref()
        .and_then(|uri| match ctx.images.load(uri) {
            Ok(image) => Some(image),
            Err(err) => {
                diagnostics.emit(
                    Diagnostic::warning(format!("cannot load image of `{}`: {err}", node.id))
                        .with_code(ErrorCode::E301)
                        .with_element(node.id),
                );
                None
            }
        });

    ShapeRecord {
        kind: node.kind,
        bounds: node.bounds,
        rotation: node.rotation,
        flip_h: node.flip_h,
        flip_v: node.flip_v,
        path: resolved.outline().boundary().to_commands(),
        details: resolved
            .outline()
            .details()
            .iter()
            .map(|detail| detail.to_commands())
            .collect(),
        fill: FillDefinition::from_style(style, ctx.defaults, node.kind.has_default_fill()),
        stroke: StrokeDefinition::from_style(style, ctx.defaults, node.kind.has_default_stroke()),
        shadow: style.fill.shadow.unwrap_or(false),
        text: TextBlock::resolve(node.text.clone(), style, ctx.defaults),
        image,
        passthrough: style.passthrough.clone(),
    }
}

/// One end of an edge before resolution.
#[derive(Clone, Copy)]
enum EndRef<'a> {
    Shape(usize, &'a ResolvedShape),
    Point(Point),
}

impl EndRef<'_> {
    /// The point the opposite end aims at
    fn reference(&self) -> Point {
        match self {
            EndRef::Shape(_, shape) => shape.center(),
            EndRef::Point(point) => *point,
        }
    }

    fn shape_index(&self) -> Option<usize> {
        match self {
            EndRef::Shape(idx, _) => Some(*idx),
            EndRef::Point(_) => None,
        }
    }

    fn resolve(&self, port: &PortAttributes, toward: Point, side_midpoint: bool) -> ResolvedConnection {
        match self {
            EndRef::Point(point) => ResolvedConnection::floating(*point),
            EndRef::Shape(_, shape) => resolve_port(shape, port).unwrap_or_else(|| {
                if side_midpoint {
                    resolve_side_midpoint(shape, toward)
                } else {
                    resolve_nearest(shape, toward)
                }
            }),
        }
    }
}

fn route_edges(
    model: &PageModel,
    shapes: &[ShapeEntry],
    ctx: TranslateContext<'_>,
    diagnostics: &mut DiagnosticCollector,
) -> Vec<EdgeEntry> {
    let by_id: HashMap<Id, usize> = shapes
        .iter()
        .enumerate()
        .map(|(idx, shape)| (shape.resolved.id(), idx))
        .collect();

    let mut routed = Vec::with_capacity(model.edges.len());
    for edge in &model.edges {
        let source = end_ref(edge, End::Source, shapes, &by_id, diagnostics);
        let target = end_ref(edge, End::Target, shapes, &by_id, diagnostics);
        let (Some(source), Some(target)) = (source, target) else {
            diagnostics.emit(
                Diagnostic::warning(format!("edge `{}` has no usable end and is dropped", edge.id))
                    .with_code(ErrorCode::E201)
                    .with_element(edge.id),
            );
            continue;
        };
        routed.push(route_edge(edge, source, target, ctx));
    }
    routed
}

#[derive(Debug, Clone, Copy)]
enum End {
    Source,
    Target,
}

/// Looks up one end of `edge`. A missing shape falls back to the literal
/// end point when the edge has one.
fn end_ref<'a>(
    edge: &EdgeNode,
    end: End,
    shapes: &'a [ShapeEntry],
    by_id: &HashMap<Id, usize>,
    diagnostics: &mut DiagnosticCollector,
) -> Option<EndRef<'a>> {
    let (reference, literal, role) = match end {
        End::Source => (edge.source, edge.source_point, "source"),
        End::Target => (edge.target, edge.target_point, "target"),
    };
    let fallback = literal.map(EndRef::Point);
    let Some(id) = reference else {
        return fallback;
    };
    if let Some(&idx) = by_id.get(&id) {
        return Some(EndRef::Shape(idx, &shapes[idx].resolved));
    }

    let help = if fallback.is_some() {
        "the literal end point is used instead"
    } else {
        "the edge is dropped"
    };
    diagnostics.emit(
        Diagnostic::warning(format!("edge `{}` references missing {role} `{id}`", edge.id))
            .with_code(ErrorCode::E200)
            .with_element(edge.id)
            .with_help(help),
    );
    fallback
}

fn route_edge(
    edge: &EdgeNode,
    source: EndRef<'_>,
    target: EndRef<'_>,
    ctx: TranslateContext<'_>,
) -> EdgeEntry {
    let style = &edge.style;
    let connector = &style.connector;
    let defaults = ctx.defaults;
    let edge_style = style.edge_style();
    let orthogonal = edge_style == EdgeStyle::Orthogonal;
    let side_midpoint =
        orthogonal && connector.exit.fraction().is_none() && connector.entry.fraction().is_none();

    let source_toward = edge
        .waypoints
        .first()
        .copied()
        .unwrap_or_else(|| target.reference());
    let target_toward = edge
        .waypoints
        .last()
        .copied()
        .unwrap_or_else(|| source.reference());
    let start = source.resolve(&connector.exit, source_toward, side_midpoint);
    let end = target.resolve(&connector.entry, target_toward, side_midpoint);

    let route = if orthogonal {
        route::orthogonal(&start, &edge.waypoints, &end, connector.elbow)
    } else {
        route::straight(start.point, &edge.waypoints, end.point)
    };
    trace!(edge = edge.id.to_string(), points = route.len(); "Routed edge");

    let stroke_width = style.stroke_width(defaults);
    let start_marker = MarkerEnd::resolve(&connector.start, None, stroke_width, defaults);
    let end_marker = MarkerEnd::resolve(
        &connector.end,
        edge.arrows.then_some(MarkerKind::Classic),
        stroke_width,
        defaults,
    );

    let mut overlays = Vec::new();
    if let Some(MarkerEnd::Emulated(overlay)) = start_marker {
        let reversed: Vec<Point> = route.iter().rev().copied().collect();
        overlays.push(MarkerOverlayRecord {
            kind: overlay.kind,
            path: route::overlay_outline(
                &overlay,
                start.point,
                route::terminal_direction(&reversed),
                defaults,
            ),
        });
    }
    if let Some(MarkerEnd::Emulated(overlay)) = end_marker {
        overlays.push(MarkerOverlayRecord {
            kind: overlay.kind,
            path: route::overlay_outline(
                &overlay,
                end.point,
                route::terminal_direction(&route),
                defaults,
            ),
        });
    }

    let trim_start = start_marker.map_or(0.0, |marker| marker.trim());
    let trim_end = end_marker.map_or(0.0, |marker| marker.trim());
    let points = route::trim_start(&route::trim_end(&route, trim_end), trim_start);

    let label = TextBlock::resolve(edge.text.clone(), style, defaults).and_then(|text| {
        label_record(
            &LabelPlacement::default(),
            &route,
            orthogonal,
            text,
            style.font_size(defaults),
            ctx.render,
        )
    });

    EdgeEntry {
        id: edge.id,
        ordinal: edge.ordinal,
        source: source.shape_index(),
        target: target.shape_index(),
        orthogonal,
        record: ConnectorRecord {
            points,
            curved: edge_style == EdgeStyle::Curved,
            stroke: StrokeDefinition::from_style(style, defaults, true),
            start_marker: native(start_marker),
            end_marker: native(end_marker),
            overlays,
            label,
            passthrough: style.passthrough.clone(),
        },
        route,
    }
}

fn native(marker: Option<MarkerEnd>) -> Option<MarkerSpec> {
    match marker {
        Some(MarkerEnd::Native(spec)) => Some(spec),
        _ => None,
    }
}

fn label_record(
    placement: &LabelPlacement,
    route: &[Point],
    orthogonal: bool,
    text: TextBlock,
    font_size: f32,
    render: &RenderConfig,
) -> Option<LabelRecord> {
    let anchor = placement.anchor(route, orthogonal)?;
    let size = render
        .label_metrics()
        .estimate(&text.plain_text(), text.max_font_size().unwrap_or(font_size));
    Some(LabelRecord {
        bounds: placement.label_box(anchor, size, text.align),
        text,
    })
}

/// Places standalone labels on their routed edges. Labels of dropped edges
/// are dropped with them.
fn place_labels(model: &PageModel, edges: &[EdgeEntry], ctx: TranslateContext<'_>) -> Vec<LabelEntry> {
    let by_id: HashMap<Id, usize> = edges
        .iter()
        .enumerate()
        .map(|(idx, edge)| (edge.id, idx))
        .collect();

    model
        .labels
        .iter()
        .filter_map(|label| {
            let &edge_idx = by_id.get(&label.edge)?;
            let edge = &edges[edge_idx];
            let record = standalone_label(label, edge, ctx)?;
            Some(LabelEntry {
                id: label.id,
                edge: edge_idx,
                ordinal: label.ordinal,
                record,
            })
        })
        .collect()
}

fn standalone_label(
    label: &EdgeLabelNode,
    edge: &EdgeEntry,
    ctx: TranslateContext<'_>,
) -> Option<LabelRecord> {
    let text = TextBlock::resolve(label.text.clone(), &label.style, ctx.defaults)?;
    let placement = LabelPlacement {
        position: label.position,
        distance: label.distance,
        offset: label.offset,
    };
    label_record(
        &placement,
        &edge.route,
        edge.orthogonal,
        text,
        label.style.font_size(ctx.defaults),
        ctx.render,
    )
}

/// Phase 3: z-order and flatten into render records.
fn composite(
    shapes: Vec<ShapeEntry>,
    edges: Vec<EdgeEntry>,
    labels: Vec<LabelEntry>,
) -> Vec<RenderRecord> {
    let shape_ordinal = |idx: Option<usize>| idx.map(|idx| shapes[idx].resolved.ordinal());
    let entries: Vec<ZEntry> = shapes
        .iter()
        .map(|shape| ZEntry::Shape {
            ordinal: shape.resolved.ordinal(),
        })
        .chain(edges.iter().map(|edge| ZEntry::Edge {
            ordinal: edge.ordinal,
            source: shape_ordinal(edge.source),
            target: shape_ordinal(edge.target),
        }))
        .collect();
    let z_indices = assign_z_order(&entries);
    let (shape_z, edge_z) = z_indices.split_at(shapes.len());

    // Labels sort right after their edge, in label order.
    let mut keyed: Vec<((usize, Option<usize>), RenderRecord)> =
        Vec::with_capacity(shapes.len() + edges.len() + labels.len());
    for label in labels {
        let z_index = edge_z[label.edge];
        keyed.push((
            (z_index, Some(label.ordinal)),
            RenderRecord {
                id: label.id,
                z_index,
                element: RenderElement::Label(label.record),
            },
        ));
    }
    for (shape, &z_index) in shapes.into_iter().zip(shape_z) {
        keyed.push((
            (z_index, None),
            RenderRecord {
                id: shape.resolved.id(),
                z_index,
                element: RenderElement::Shape(shape.record),
            },
        ));
    }
    for (edge, &z_index) in edges.into_iter().zip(edge_z) {
        keyed.push((
            (z_index, None),
            RenderRecord {
                id: edge.id,
                z_index,
                element: RenderElement::Connector(edge.record),
            },
        ));
    }

    keyed.sort_by_key(|(key, _)| *key);
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Page size times the page scale. A dimension that is absent or invalid
/// is taken from the content extent.
fn size_page(render: &mut PageRender, model: &PageModel, diagnostics: &mut DiagnosticCollector) {
    let scale = if model.scale.is_finite() && model.scale > 0.0 {
        model.scale
    } else {
        diagnostics.emit(
            Diagnostic::warning(format!("page `{}` has invalid scale {}", model.id, model.scale))
                .with_code(ErrorCode::E401)
                .with_help("a scale of 1 is used"),
        );
        1.0
    };
    let content = render.content_bounds();

    let mut dimension = |declared: Option<f32>, name: &str, extent: f32| match declared {
        Some(value) if value.is_finite() && value > 0.0 => value * scale,
        Some(value) => {
            diagnostics.emit(
                Diagnostic::warning(format!("page `{}` has invalid {name} {value}", model.id))
                    .with_code(ErrorCode::E401)
                    .with_help("the content extent is used"),
            );
            extent * scale
        }
        None => extent * scale,
    };
    render.width = dimension(
        model.width,
        "width",
        content.map_or(0.0, |bounds| bounds.max_x().max(0.0)),
    );
    render.height = dimension(
        model.height,
        "height",
        content.map_or(0.0, |bounds| bounds.max_y().max(0.0)),
    );
}

/// Recenters the content when no record touches the page rectangle.
fn normalize_offpage(render: &mut PageRender) {
    if render.width <= 0.0 || render.height <= 0.0 {
        return;
    }
    let Some(content) = render.content_bounds() else {
        return;
    };
    let page = render.page_bounds();
    let visible = render
        .records
        .iter()
        .filter_map(|record| record.element.bounds())
        .any(|bounds| bounds.intersects(&page));
    if visible {
        return;
    }

    let offset = page.center().sub_point(content.center());
    debug!(page = render.id, dx = offset.x(), dy = offset.y(); "Recentering off-page content");
    render.translate(offset);
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use vellum_core::draw::{PathCommand, ShapeKind};

    use super::*;

    fn translate_json(json: &str, render: &RenderConfig) -> (Vec<PageRender>, Vec<Diagnostic>) {
        let document: Document = serde_json::from_str(json).unwrap();
        let defaults = StyleDefaults::default();
        let images = ImageCache::new(render.image_dpi());
        let ctx = TranslateContext {
            defaults: &defaults,
            render,
            images: &images,
        };
        translate_pages(&document, ctx)
    }

    fn translate(json: &str) -> (Vec<PageRender>, Vec<Diagnostic>) {
        translate_json(json, &RenderConfig::default())
    }

    fn ids(page: &PageRender) -> Vec<String> {
        page.records.iter().map(|r| r.id.to_string()).collect()
    }

    fn connector<'a>(page: &'a PageRender, id: &str) -> &'a ConnectorRecord {
        page.records
            .iter()
            .find_map(|record| match &record.element {
                RenderElement::Connector(connector) if record.id == id => Some(connector),
                _ => None,
            })
            .unwrap()
    }

    const TWO_BOXES: &str = r#"{"pages": [{"id": "p", "width": 400, "height": 300, "nodes": [
        {"id": "0"},
        {"id": "1", "parent": "0"},
        {"id": "a", "parent": "1", "kind": "vertex",
         "geometry": {"x": 0, "y": 0, "width": 100, "height": 100}},
        {"id": "e", "parent": "1", "kind": "edge", "source": "a", "target": "b"},
        {"id": "b", "parent": "1", "kind": "vertex",
         "geometry": {"x": 200, "y": 0, "width": 100, "height": 100}}
    ]}]}"#;

    #[test]
    fn test_promoted_edge_and_nearest_ends() {
        let (pages, diagnostics) = translate(TWO_BOXES);

        assert!(diagnostics.is_empty());
        let page = &pages[0];
        assert_eq!(ids(page), vec!["a", "b", "e"]);
        let z: Vec<usize> = page.records.iter().map(|r| r.z_index).collect();
        assert_eq!(z, vec![0, 1, 2]);

        let edge = connector(page, "e");
        assert_eq!(edge.points.len(), 2);
        assert_approx_eq!(f32, edge.points[0].x(), 100.0, epsilon = 1e-3);
        assert_approx_eq!(f32, edge.points[0].y(), 50.0, epsilon = 1e-3);
        assert_approx_eq!(f32, edge.points[1].x(), 200.0, epsilon = 1e-3);
        assert!(edge.end_marker.is_some());
        assert!(edge.start_marker.is_none());
        assert_eq!(page.width, 400.0);
    }

    #[test]
    fn test_dangling_target_drops_edge_only() {
        let json = TWO_BOXES.replace(r#""target": "b""#, r#""target": "ghost""#);
        let (pages, diagnostics) = translate(&json);

        assert_eq!(ids(&pages[0]), vec!["a", "b"]);
        let codes: Vec<_> = diagnostics.iter().filter_map(Diagnostic::code).collect();
        assert_eq!(codes, vec![ErrorCode::E200, ErrorCode::E201]);
    }

    #[test]
    fn test_literal_end_point_keeps_edge() {
        let json = TWO_BOXES.replace(
            r#""target": "b""#,
            r#""target": "ghost", "target_point": {"x": 150, "y": 200}"#,
        );
        let (pages, diagnostics) = translate(&json);

        assert_eq!(diagnostics.len(), 1);
        let edge = connector(&pages[0], "e");
        assert_eq!(edge.points.last().copied(), Some(Point::new(150.0, 200.0)));
    }

    #[test]
    fn test_orthogonal_edge_uses_side_midpoints() {
        let json = r#"{"pages": [{"nodes": [
            {"id": "a", "kind": "vertex",
             "geometry": {"x": 0, "y": 0, "width": 100, "height": 100}},
            {"id": "b", "kind": "vertex",
             "geometry": {"x": 300, "y": 200, "width": 100, "height": 100}},
            {"id": "e", "kind": "edge", "source": "a", "target": "b",
             "style": "edgeStyle=orthogonalEdgeStyle;"}
        ]}]}"#;
        let (pages, _) = translate(json);

        let edge = connector(&pages[0], "e");
        assert_eq!(edge.points.first().copied(), Some(Point::new(100.0, 50.0)));
        assert_eq!(edge.points.last().copied(), Some(Point::new(300.0, 250.0)));
        for pair in edge.points.windows(2) {
            assert!(pair[0].x() == pair[1].x() || pair[0].y() == pair[1].y());
        }
    }

    #[test]
    fn test_open_marker_is_emulated() {
        let json = TWO_BOXES.replace(
            r#""source": "a", "target": "b""#,
            r#""source": "a", "target": "b", "style": "endArrow=oval;endFill=0;""#,
        );
        let (pages, _) = translate(&json);

        let edge = connector(&pages[0], "e");
        assert!(edge.end_marker.is_none());
        assert_eq!(edge.overlays.len(), 1);
        assert_eq!(edge.overlays[0].kind, ShapeKind::Ellipse);
        assert!(edge.points[1].x() < 200.0);
        assert!(matches!(edge.overlays[0].path[0], PathCommand::MoveTo(_)));
    }

    #[test]
    fn test_standalone_label_shares_edge_z() {
        let json = TWO_BOXES.replace(
            r#""source": "a", "target": "b"}"#,
            r#""source": "a", "target": "b"},
            {"id": "l", "parent": "e", "kind": "vertex", "text": "calls",
             "geometry": {"x": 0, "y": 0, "relative": true}}"#,
        );
        let (pages, _) = translate(&json);

        let page = &pages[0];
        assert_eq!(ids(page), vec!["a", "b", "e", "l"]);
        assert_eq!(page.records[2].z_index, page.records[3].z_index);
        let RenderElement::Label(label) = &page.records[3].element else {
            panic!("expected a label");
        };
        assert_approx_eq!(f32, label.bounds.center().x(), 150.0, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate_shape_is_reported() {
        let json = r#"{"pages": [{"nodes": [
            {"id": "a", "kind": "vertex", "geometry": {"x": 10, "y": 10}},
            {"id": "b", "kind": "vertex",
             "geometry": {"x": 100, "y": 0, "width": 20, "height": 20}},
            {"id": "e", "kind": "edge", "source": "a", "target": "b"}
        ]}]}"#;
        let (pages, diagnostics) = translate(json);

        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E300));
        let edge = connector(&pages[0], "e");
        assert_eq!(edge.points[0], Point::new(10.0, 10.0));
    }

    #[test]
    fn test_page_size_defaults_and_scale() {
        let json = r#"{"pages": [
            {"nodes": [{"id": "a", "kind": "vertex",
              "geometry": {"x": 10, "y": 20, "width": 30, "height": 40}}]},
            {"width": 100, "height": -5, "scale": 2, "nodes": []},
            {"scale": 2, "nodes": [{"id": "b", "kind": "vertex",
              "geometry": {"x": 10, "y": 20, "width": 30, "height": 40}}]},
            {"width": -1, "scale": 2, "nodes": [{"id": "c", "kind": "vertex",
              "geometry": {"x": 10, "y": 20, "width": 30, "height": 40}}]}
        ]}"#;
        let (pages, diagnostics) = translate(json);

        assert_eq!((pages[0].width, pages[0].height), (40.0, 60.0));
        assert_eq!(pages[1].width, 200.0);
        assert_eq!(pages[1].height, 0.0);
        assert_eq!((pages[2].width, pages[2].height), (80.0, 120.0));
        assert_eq!((pages[3].width, pages[3].height), (80.0, 120.0));
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E401));
        assert_eq!(pages[1].id, "page-2");
    }

    #[test]
    fn test_offpage_content_is_recentered() {
        let json = r#"{"pages": [{"width": 100, "height": 100, "nodes": [
            {"id": "a", "kind": "vertex",
             "geometry": {"x": 1000, "y": 1000, "width": 20, "height": 20}}
        ]}]}"#;
        let (pages, _) = translate(json);
        let bounds = pages[0].content_bounds().unwrap();
        assert_approx_eq!(f32, bounds.center().x(), 50.0, epsilon = 1e-3);

        let render: RenderConfig = serde_json::from_str(r#"{"normalize_offpage": false}"#).unwrap();
        let (pages, _) = translate_json(json, &render);
        let bounds = pages[0].content_bounds().unwrap();
        assert_eq!(bounds.min_x(), 1000.0);
    }

    #[test]
    fn test_record_count_matches_kept_nodes() {
        let json = TWO_BOXES.replace(
            r#"{"id": "0"},"#,
            r#"{"id": "0"},
            {"id": "lost", "parent": "1", "kind": "edge", "source": "a"},"#,
        );
        let (pages, _) = translate(&json);
        assert_eq!(pages[0].records.len(), 3);
    }
}
