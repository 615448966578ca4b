//! Page model construction.
//!
//! Turns the raw node list of one [`Page`] into an immutable [`PageModel`]:
//! nodes are arranged into their parent tree, siblings are ordered, dense
//! ordinals are assigned by a pre-order walk and every style string is
//! parsed. Structural problems such as duplicate ids, dangling parents or
//! unknown shapes become diagnostics; nothing here fails.

use std::collections::HashMap;

use log::trace;

use vellum_core::{
    document::{EdgeLabelNode, EdgeNode, NodeKind, Page, PageModel, RawNode, ShapeNode},
    draw::{ShapeKind, TextRun},
    geometry::Point,
    identifier::Id,
    style::{StyleAttributes, StyleDefaults},
};
use vellum_parser::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode},
    parse_style,
};

/// Builds the typed model of one page.
///
/// `index` is the zero-based page position, used to name pages without an id.
pub fn build_page(
    page: &Page,
    index: usize,
    defaults: &StyleDefaults,
) -> (PageModel, Vec<Diagnostic>) {
    let mut builder = PageBuilder::new(page, defaults);
    builder.index_nodes();
    let order = builder.pre_order();
    for idx in order {
        builder.add_node(idx);
    }

    let mut model = builder.model;
    model.id = page
        .id
        .clone()
        .unwrap_or_else(|| format!("page-{}", index + 1));
    model.name = page
        .name
        .clone()
        .unwrap_or_else(|| format!("Page-{}", index + 1));
    model.width = page.width;
    model.height = page.height;
    model.scale = page.scale;

    trace!(
        page = model.id,
        shapes = model.shapes.len(),
        edges = model.edges.len(),
        labels = model.labels.len();
        "Built page model"
    );
    (model, builder.diagnostics.into_diagnostics())
}

struct PageBuilder<'a> {
    nodes: &'a [RawNode],
    defaults: &'a StyleDefaults,
    /// First node index per id
    by_id: HashMap<&'a str, usize>,
    /// Skipped duplicates
    duplicate: Vec<bool>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    next_ordinal: usize,
    model: PageModel,
    diagnostics: DiagnosticCollector,
}

impl<'a> PageBuilder<'a> {
    fn new(page: &'a Page, defaults: &'a StyleDefaults) -> Self {
        let count = page.nodes.len();
        Self {
            nodes: &page.nodes,
            defaults,
            by_id: HashMap::with_capacity(count),
            duplicate: vec![false; count],
            children: vec![Vec::new(); count],
            roots: Vec::new(),
            next_ordinal: 0,
            model: PageModel::default(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn index_nodes(&mut self) {
        let nodes = self.nodes;
        for (idx, node) in nodes.iter().enumerate() {
            if self.by_id.contains_key(node.id.as_str()) {
                self.duplicate[idx] = true;
                self.diagnostics.emit(
                    Diagnostic::warning(format!("duplicate node id `{}`", node.id))
                        .with_code(ErrorCode::E203)
                        .with_element(Id::new(&node.id))
                        .with_help("the first node with this id is kept"),
                );
            } else {
                self.by_id.insert(node.id.as_str(), idx);
            }
        }

        for (idx, node) in nodes.iter().enumerate() {
            if self.duplicate[idx] {
                continue;
            }
            let parent = node
                .parent
                .as_deref()
                .filter(|parent| *parent != node.id);
            match parent {
                None => self.roots.push(idx),
                Some(parent) => match self.by_id.get(parent) {
                    Some(&parent_idx) => self.children[parent_idx].push(idx),
                    None => {
                        self.diagnostics.emit(dangling_parent(node, "does not exist"));
                        self.roots.push(idx);
                    }
                },
            }
        }

        let key = |idx: &usize| (nodes[*idx].ordinal.unwrap_or(*idx as u64), *idx);
        self.roots.sort_by_key(key);
        for children in &mut self.children {
            children.sort_by_key(key);
        }
    }

    /// Node indices in pre-order. Nodes only reachable through a parent
    /// cycle are walked as extra roots, in list order.
    fn pre_order(&mut self) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        let walk = |root: usize, visited: &mut Vec<bool>, order: &mut Vec<usize>| {
            let mut stack = vec![root];
            while let Some(idx) = stack.pop() {
                if visited[idx] {
                    continue;
                }
                visited[idx] = true;
                order.push(idx);
                stack.extend(self.children[idx].iter().rev().copied());
            }
        };

        for &root in &self.roots {
            walk(root, &mut visited, &mut order);
        }

        let mut cyclic = Vec::new();
        for idx in 0..self.nodes.len() {
            if !visited[idx] && !self.duplicate[idx] {
                cyclic.push(idx);
                walk(idx, &mut visited, &mut order);
            }
        }
        for idx in cyclic {
            self.diagnostics
                .emit(dangling_parent(&self.nodes[idx], "forms a cycle"));
        }

        order
    }

    fn add_node(&mut self, idx: usize) {
        let nodes = self.nodes;
        let node = &nodes[idx];
        let Some(kind) = node.kind else {
            return;
        };
        let id = Id::new(&node.id);
        let parsed = parse_style(&node.style, self.defaults);
        self.diagnostics.extend(
            parsed
                .diagnostics
                .into_iter()
                .map(|diagnostic| diagnostic.with_element(id)),
        );
        let style = parsed.attributes;

        match kind {
            NodeKind::Edge => self.add_edge(node, id, style),
            NodeKind::Vertex => {
                let parent_edge = node
                    .parent
                    .as_deref()
                    .and_then(|parent| self.by_id.get(parent))
                    .filter(|&&parent_idx| nodes[parent_idx].is_edge())
                    .map(|&parent_idx| Id::new(&nodes[parent_idx].id));
                match parent_edge {
                    Some(edge) => self.add_edge_label(node, id, edge, style),
                    None => self.add_shape(node, id, style),
                }
            }
        }
    }

    fn take_ordinal(&mut self) -> usize {
        let ordinal = self.next_ordinal;
        self.next_ordinal += 1;
        ordinal
    }

    fn add_shape(&mut self, node: &RawNode, id: Id, style: StyleAttributes) {
        let kind = match ShapeKind::from_style(&style) {
            Ok(kind) => kind,
            Err(err) => {
                self.diagnostics.emit(
                    Diagnostic::warning(err.to_string())
                        .with_code(ErrorCode::E100)
                        .with_element(id)
                        .with_snippet(node.style.clone())
                        .with_help("a rectangle is drawn instead"),
                );
                ShapeKind::Rectangle
            }
        };

        // A missing box is reported as degenerate once outlines are resolved.
        let bounds = node
            .geometry
            .map(|geometry| geometry.bounds())
            .unwrap_or_default();

        let ordinal = self.take_ordinal();
        self.model.shapes.push(ShapeNode {
            id,
            kind,
            bounds: kind.normalize_box(bounds),
            rotation: style.rotation(),
            flip_h: style.flip_h(),
            flip_v: style.flip_v(),
            parent: node.parent.as_deref().map(Id::new),
            text: text_runs(node, &style),
            style,
            ordinal,
        });
    }

    fn add_edge(&mut self, node: &RawNode, id: Id, style: StyleAttributes) {
        let ordinal = self.take_ordinal();
        self.model.edges.push(EdgeNode {
            id,
            source: node.source.as_deref().map(Id::new),
            target: node.target.as_deref().map(Id::new),
            waypoints: node.waypoints.clone(),
            source_point: node.source_point,
            target_point: node.target_point,
            text: text_runs(node, &style),
            arrows: node.arrows.unwrap_or(true),
            style,
            ordinal,
        });
    }

    fn add_edge_label(&mut self, node: &RawNode, id: Id, edge: Id, style: StyleAttributes) {
        let text = text_runs(node, &style);
        if text.iter().all(|run| run.text.trim().is_empty()) {
            return;
        }
        let geometry = node.geometry.unwrap_or_default();
        let (position, distance) = if geometry.relative {
            (geometry.x.clamp(-1.0, 1.0), geometry.y)
        } else {
            (0.0, 0.0)
        };

        let ordinal = self.take_ordinal();
        self.model.labels.push(EdgeLabelNode {
            id,
            edge,
            position,
            distance,
            offset: geometry.offset.unwrap_or_else(Point::default),
            style,
            text,
            ordinal,
        });
    }
}

fn text_runs(node: &RawNode, style: &StyleAttributes) -> Vec<TextRun> {
    node.text
        .clone()
        .map(|text| text.into_runs(style.text.html.unwrap_or(false)))
        .unwrap_or_default()
}

fn dangling_parent(node: &RawNode, reason: &str) -> Diagnostic {
    Diagnostic::warning(format!(
        "parent `{}` of node `{}` {reason}",
        node.parent.as_deref().unwrap_or_default(),
        node.id
    ))
    .with_code(ErrorCode::E202)
    .with_element(Id::new(&node.id))
    .with_help("the node is attached to the page root")
}

#[cfg(test)]
mod tests {
    use vellum_core::{
        document::{Document, RawGeometry},
        geometry::Bounds,
    };

    use super::*;

    fn vertex(id: &str, parent: &str, x: f32) -> RawNode {
        RawNode {
            id: id.to_string(),
            parent: Some(parent.to_string()),
            kind: Some(NodeKind::Vertex),
            geometry: Some(RawGeometry {
                x,
                y: 0.0,
                width: 40.0,
                height: 20.0,
                ..RawGeometry::default()
            }),
            ..RawNode::default()
        }
    }

    fn edge(id: &str, parent: &str, source: &str, target: &str) -> RawNode {
        RawNode {
            id: id.to_string(),
            parent: Some(parent.to_string()),
            kind: Some(NodeKind::Edge),
            source: Some(source.to_string()),
            target: Some(target.to_string()),
            ..RawNode::default()
        }
    }

    fn roots() -> Vec<RawNode> {
        vec![
            RawNode {
                id: "0".to_string(),
                ..RawNode::default()
            },
            RawNode {
                id: "1".to_string(),
                parent: Some("0".to_string()),
                ..RawNode::default()
            },
        ]
    }

    fn page(nodes: Vec<RawNode>) -> Page {
        Page {
            nodes,
            ..Page::default()
        }
    }

    fn codes(diagnostics: &[Diagnostic]) -> Vec<ErrorCode> {
        diagnostics.iter().filter_map(Diagnostic::code).collect()
    }

    #[test]
    fn test_pre_order_ordinals() {
        let mut nodes = roots();
        nodes.push(vertex("a", "1", 0.0));
        nodes.push(edge("e", "1", "a", "b"));
        nodes.push(vertex("b", "1", 100.0));
        nodes.push(vertex("a-child", "a", 10.0));

        let (model, diagnostics) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert!(diagnostics.is_empty());
        let shape_ordinals: Vec<(String, usize)> = model
            .shapes
            .iter()
            .map(|s| (s.id.to_string(), s.ordinal))
            .collect();
        assert_eq!(
            shape_ordinals,
            vec![
                ("a".to_string(), 0),
                ("a-child".to_string(), 1),
                ("b".to_string(), 3)
            ]
        );
        assert_eq!(model.edges[0].ordinal, 2);
        assert!(model.edges[0].arrows);
        assert_eq!(model.id, "page-1");
        assert_eq!(model.name, "Page-1");
    }

    #[test]
    fn test_explicit_ordinal_orders_siblings() {
        let mut nodes = roots();
        let mut late = vertex("late", "1", 0.0);
        late.ordinal = Some(9);
        let mut early = vertex("early", "1", 0.0);
        early.ordinal = Some(1);
        nodes.push(late);
        nodes.push(early);

        let (model, _) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert_eq!(model.shapes[0].id, "early");
        assert_eq!(model.shapes[1].id, "late");
    }

    #[test]
    fn test_duplicate_and_dangling_parent() {
        let mut nodes = roots();
        nodes.push(vertex("a", "1", 0.0));
        nodes.push(vertex("a", "1", 50.0));
        nodes.push(vertex("orphan", "missing", 0.0));

        let (model, diagnostics) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert_eq!(model.shapes.len(), 2);
        assert_eq!(model.shapes[0].bounds.min_x(), 0.0);
        assert_eq!(codes(&diagnostics), vec![ErrorCode::E203, ErrorCode::E202]);
    }

    #[test]
    fn test_parent_cycle_is_reported_and_kept() {
        let mut nodes = roots();
        nodes.push(vertex("x", "y", 0.0));
        nodes.push(vertex("y", "x", 0.0));

        let (model, diagnostics) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert_eq!(model.shapes.len(), 2);
        assert_eq!(codes(&diagnostics), vec![ErrorCode::E202]);
    }

    #[test]
    fn test_unsupported_shape_falls_back() {
        let mut nodes = roots();
        let mut odd = vertex("odd", "1", 0.0);
        odd.style = "shape=mxgraph.aws4.lambda;".to_string();
        odd.geometry = None;
        nodes.push(odd);

        let (model, diagnostics) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert_eq!(model.shapes[0].kind, ShapeKind::Rectangle);
        assert_eq!(codes(&diagnostics), vec![ErrorCode::E100]);
        assert_eq!(model.shapes[0].bounds, Bounds::default());
        assert_eq!(diagnostics[0].element(), Some(Id::new("odd")));
    }

    #[test]
    fn test_vertex_under_edge_is_label() {
        let json = r#"{"pages": [{"id": "p", "nodes": [
            {"id": "0"},
            {"id": "1", "parent": "0"},
            {"id": "a", "parent": "1", "kind": "vertex",
             "geometry": {"x": 0, "y": 0, "width": 10, "height": 10}},
            {"id": "b", "parent": "1", "kind": "vertex",
             "geometry": {"x": 100, "y": 0, "width": 10, "height": 10}},
            {"id": "e", "parent": "1", "kind": "edge", "source": "a", "target": "b"},
            {"id": "l", "parent": "e", "kind": "vertex", "text": "yes",
             "geometry": {"x": -0.5, "y": 8, "relative": true}},
            {"id": "empty", "parent": "e", "kind": "vertex", "text": " ",
             "geometry": {"relative": true}}
        ]}]}"#;
        let document: Document = serde_json::from_str(json).unwrap();

        let (model, _) = build_page(&document.pages[0], 0, &StyleDefaults::default());

        assert_eq!(model.shapes.len(), 2);
        assert_eq!(model.labels.len(), 1);
        let label = &model.labels[0];
        assert_eq!(label.edge, "e");
        assert_eq!(label.position, -0.5);
        assert_eq!(label.distance, 8.0);
        assert_eq!(model.id, "p");
    }

    #[test]
    fn test_style_diagnostics_carry_element() {
        let mut nodes = roots();
        let mut bad = vertex("bad", "1", 0.0);
        bad.style = "fillColor=#12;".to_string();
        nodes.push(bad);

        let (_, diagnostics) = build_page(&page(nodes), 0, &StyleDefaults::default());

        assert_eq!(codes(&diagnostics), vec![ErrorCode::E002]);
        assert_eq!(diagnostics[0].element(), Some(Id::new("bad")));
    }

    #[test]
    fn test_fixed_aspect_box_is_squared() {
        let mut nodes = roots();
        let mut circle = vertex("c", "1", 0.0);
        circle.style = "shape=ellipse;aspect=fixed;".to_string();
        nodes.push(circle);

        let (model, _) = build_page(&page(nodes), 0, &StyleDefaults::default());

        let bounds = model.shapes[0].bounds;
        assert_eq!(bounds.width(), bounds.height());
    }
}
