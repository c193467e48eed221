use log::{debug, trace};

use super::classify::{ClassifiedEdges, classify};
use super::label::{LabelCache, format_concrete_value};
use super::primitive::{BoxStyle, Connective, Node, NodeId, NodeKind, Point, Size, node_bounds};
use super::route::{Anchor, Marker, Route, route};
use crate::fonts::TextMeasure;
use crate::model::{Concept, DiagramOptions, Relationship, UngroupedAttributeIndex, View};

/// Canvas before any edge is counted.
pub const BASE_CANVAS: Size = Size {
    width: 700.0,
    height: 350.0,
};
/// Pre-allocated growth per is-a edge.
pub const ISA_GROWTH: Size = Size {
    width: 80.0,
    height: 50.0,
};
/// Pre-allocated growth per attribute edge.
pub const ATTRIBUTE_GROWTH: Size = Size {
    width: 110.0,
    height: 65.0,
};

pub const ORIGIN: Point = Point { x: 10.0, y: 10.0 };
pub const ROOT_GAP_Y: f32 = 40.0;
pub const ROOT_INDENT_X: f32 = 90.0;
pub const CONNECTIVE_ADVANCE_X: f32 = 70.0;
pub const CONJUNCTION_ADVANCE_X: f32 = 60.0;
/// Stands in for the missing connective cluster so attributes line up the
/// same way with or without parents.
pub const NO_PARENT_NUDGE: Point = Point { x: 20.0, y: 3.0 };
pub const ROW_GAP: f32 = 35.0;
pub const CHAIN_GAP: f32 = 35.0;
pub const EXTENT_PADDING: f32 = 50.0;
pub const GROUPS_GAP: f32 = 30.0;
pub const GROUP_CONJUNCTION_OFFSET: f32 = 75.0;
pub const GROUP_ROLE_OFFSET: f32 = 130.0;
pub const GROUP_ROW_GAP: f32 = 25.0;
pub const CANVAS_MARGIN_BOTTOM: f32 = 50.0;
/// Generous on purpose: width tracking only follows box extents.
pub const CANVAS_MARGIN_RIGHT: f32 = 400.0;

/// What a connector stands for in the normal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Root concept to its definition connective.
    Definition,
    /// Into a conjunction node.
    Conjunction,
    /// Conjunction to a parent concept.
    IsA,
    /// Conjunction to a role group or self-group circle.
    Group,
    /// Into an attribute (role type) box.
    Role,
    /// Role type to its target concept or literal.
    Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub from: NodeId,
    pub to: NodeId,
    pub route: Route,
    pub marker: Option<Marker>,
    pub kind: LinkKind,
}

/// A fully positioned diagram.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub concept_id: String,
    pub view: View,
    /// Nodes in placement order; the root box is always first.
    pub nodes: Vec<Node>,
    pub connectors: Vec<Connector>,
    /// Upper-bound estimate made before layout.
    pub preallocated: Size,
    /// Final surface size after fitting to content.
    pub canvas: Size,
}

impl Drawing {
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> Option<&Node> {
        self.nodes.first()
    }

    pub fn count(&self, predicate: impl Fn(&NodeKind) -> bool) -> usize {
        self.nodes.iter().filter(|node| predicate(&node.kind)).count()
    }
}

/// Cheap upper bound on the surface size, computed from edge counts alone.
pub fn preallocate(edges: &ClassifiedEdges<'_>) -> Size {
    let isa = edges.isa.len() as f32;
    let attributes = edges.attributes.len() as f32;
    Size::new(
        BASE_CANVAS.width + isa * ISA_GROWTH.width + attributes * ATTRIBUTE_GROWTH.width,
        BASE_CANVAS.height + isa * ISA_GROWTH.height + attributes * ATTRIBUTE_GROWTH.height,
    )
}

/// Final surface size: the cursor height and tracked width plus margins,
/// never smaller than the content itself.
pub fn fit_canvas(cursor_y: f32, max_x: f32, nodes: &[Node]) -> Size {
    let (right, bottom) = nodes.iter().fold((0.0_f32, 0.0_f32), |(r, b), node| {
        (r.max(node.bounds.right()), b.max(node.bounds.bottom()))
    });
    Size::new(
        (max_x + CANVAS_MARGIN_RIGHT).max(right),
        (cursor_y + CANVAS_MARGIN_BOTTOM).max(bottom),
    )
}

/// Single-pass cursor layout of a concept's normal form.
pub struct LayoutEngine<'a, T: TextMeasure> {
    measure: &'a mut T,
    labels: LabelCache<'a>,
    ungrouped: &'a UngroupedAttributeIndex,
    view: View,
    nodes: Vec<Node>,
    connectors: Vec<Connector>,
    cursor: Point,
    max_x: f32,
}

impl<'a, T: TextMeasure> LayoutEngine<'a, T> {
    pub fn new(
        measure: &'a mut T,
        options: &'a DiagramOptions,
        ungrouped: &'a UngroupedAttributeIndex,
    ) -> Self {
        Self {
            measure,
            labels: LabelCache::new(&options.default_language),
            ungrouped,
            view: options.view,
            nodes: Vec::new(),
            connectors: Vec::new(),
            cursor: ORIGIN,
            max_x: ORIGIN.x,
        }
    }

    pub fn layout(mut self, concept: &Concept) -> Drawing {
        let edges = classify(concept, self.view);
        let preallocated = preallocate(&edges);

        let root_label = self.labels.term(Some(concept));
        let root = self.place(
            NodeKind::Concept {
                label: root_label,
                sctid: concept.concept_id.clone(),
                style: definition_style(concept),
            },
            ORIGIN,
        );
        let root_height = self.nodes[root.0].bounds.height;
        self.cursor = Point::new(ORIGIN.x + ROOT_INDENT_X, ORIGIN.y + root_height + ROOT_GAP_Y);

        let hub = if self.draws_connective(&edges) {
            Some(self.place_connective(root, concept))
        } else {
            None
        };

        if edges.isa.is_empty() {
            self.cursor.x += NO_PARENT_NUDGE.x;
            self.cursor.y += NO_PARENT_NUDGE.y;
        }
        self.track(self.cursor.x);

        for rel in &edges.isa {
            self.place_parent(hub, rel);
        }
        for rel in edges.ungrouped() {
            self.place_ungrouped(hub, rel);
        }

        let groups = edges.group_ids();
        if !groups.is_empty() {
            self.cursor.y += GROUPS_GAP;
        }
        for group_id in groups {
            self.place_group(hub, &edges, group_id);
        }

        let canvas = fit_canvas(self.cursor.y, self.max_x, &self.nodes);
        debug!(
            concept_id = concept.concept_id.as_str(),
            nodes = self.nodes.len(),
            connectors = self.connectors.len(),
            width = canvas.width,
            height = canvas.height;
            "Concept diagram laid out"
        );

        Drawing {
            concept_id: concept.concept_id.clone(),
            view: self.view,
            nodes: self.nodes,
            connectors: self.connectors,
            preallocated,
            canvas,
        }
    }

    /// The inferred view always shows the definition connective when there is
    /// anything to hang from it; the stated view only when parents exist.
    fn draws_connective(&self, edges: &ClassifiedEdges<'_>) -> bool {
        match self.view {
            View::Inferred => !edges.is_empty(),
            View::Stated => !edges.isa.is_empty(),
        }
    }

    /// Connective circle fused to a conjunction disc. Returns the disc, which
    /// every parent and attribute hangs from.
    fn place_connective(&mut self, root: NodeId, concept: &Concept) -> NodeId {
        let glyph = if concept.is_primitive() {
            Connective::SubsumedBy
        } else {
            Connective::EquivalentTo
        };
        let connective = self.place(NodeKind::Connective(glyph), self.cursor);
        self.connect(
            root,
            Anchor::BottomShifted,
            connective,
            Anchor::Left,
            Some(Marker::Filled),
            LinkKind::Definition,
        );

        self.cursor.x += CONNECTIVE_ADVANCE_X;
        let conjunction = self.place(NodeKind::Conjunction, self.cursor);
        self.connect(
            connective,
            Anchor::Right,
            conjunction,
            Anchor::Center,
            None,
            LinkKind::Conjunction,
        );
        self.cursor.x += CONJUNCTION_ADVANCE_X;
        conjunction
    }

    fn place_parent(&mut self, hub: Option<NodeId>, rel: &Relationship) {
        let kind = self.object_box(rel);
        let parent = self.place(kind, self.cursor);
        if let Some(hub) = hub {
            self.connect(
                hub,
                Anchor::Center,
                parent,
                Anchor::Left,
                Some(Marker::Clear),
                LinkKind::IsA,
            );
        }
        self.finish_row(parent, ROW_GAP);
    }

    fn place_ungrouped(&mut self, hub: Option<NodeId>, rel: &Relationship) {
        let row_y = self.cursor.y;

        let (source, role_x) = if self.ungrouped.contains(&rel.kind.concept_id) {
            (hub.map(|hub| (hub, Anchor::Center, None)), self.cursor.x)
        } else {
            let circle = self.place(NodeKind::AttributeGroup, self.cursor);
            if let Some(hub) = hub {
                self.connect(
                    hub,
                    Anchor::Center,
                    circle,
                    Anchor::Left,
                    Some(Marker::Filled),
                    LinkKind::Group,
                );
            }
            let role_x = self.nodes[circle.0].bounds.right() + CHAIN_GAP;
            (Some((circle, Anchor::Right, Some(Marker::Filled))), role_x)
        };

        let kind = role_box(&mut self.labels, rel);
        let role = self.place(kind, Point::new(role_x, row_y));
        if let Some((from, anchor, marker)) = source {
            self.connect(from, anchor, role, Anchor::Left, marker, LinkKind::Role);
        }
        let value = self.place_value(role, rel);
        self.finish_row(value, ROW_GAP);
    }

    fn place_group(&mut self, hub: Option<NodeId>, edges: &ClassifiedEdges<'_>, group_id: u32) {
        let group_x = self.cursor.x;
        let group = self.place(NodeKind::AttributeGroup, self.cursor);
        if let Some(hub) = hub {
            self.connect(
                hub,
                Anchor::Center,
                group,
                Anchor::Left,
                Some(Marker::Filled),
                LinkKind::Group,
            );
        }
        let conjunction = self.place(
            NodeKind::Conjunction,
            Point::new(group_x + GROUP_CONJUNCTION_OFFSET, self.cursor.y),
        );
        self.connect(
            group,
            Anchor::Right,
            conjunction,
            Anchor::Left,
            Some(Marker::Filled),
            LinkKind::Conjunction,
        );
        trace!(group_id = group_id; "Role group opened");

        for rel in edges.group(group_id) {
            let kind = role_box(&mut self.labels, rel);
            let role = self.place(kind, Point::new(group_x + GROUP_ROLE_OFFSET, self.cursor.y));
            self.connect(
                conjunction,
                Anchor::Center,
                role,
                Anchor::Left,
                Some(Marker::Filled),
                LinkKind::Role,
            );
            let value = self.place_value(role, rel);
            self.finish_row(value, GROUP_ROW_GAP);
        }
    }

    /// Target box chained to the right of a role box.
    fn place_value(&mut self, role: NodeId, rel: &Relationship) -> NodeId {
        let role_bounds = self.nodes[role.0].bounds;
        let kind = self.object_box(rel);
        let value = self.place(
            kind,
            Point::new(role_bounds.right() + CHAIN_GAP, role_bounds.y),
        );
        self.connect(
            role,
            Anchor::Right,
            value,
            Anchor::Left,
            Some(Marker::Filled),
            LinkKind::Value,
        );
        value
    }

    fn object_box(&mut self, rel: &Relationship) -> NodeKind {
        let label = match &rel.concrete_value {
            Some(value) => format_concrete_value(value),
            None => self.labels.term(rel.object()),
        };
        NodeKind::Concept {
            label,
            sctid: rel.object_id().to_string(),
            style: object_style(rel),
        }
    }

    fn place(&mut self, kind: NodeKind, origin: Point) -> NodeId {
        let id = NodeId(self.nodes.len());
        let bounds = node_bounds(&mut *self.measure, &kind, origin);
        trace!(node = id.0, x = bounds.x, y = bounds.y, width = bounds.width; "Node placed");
        if matches!(kind, NodeKind::Concept { .. }) {
            self.track(bounds.right() + EXTENT_PADDING);
        }
        self.nodes.push(Node {
            id,
            kind,
            origin,
            bounds,
        });
        id
    }

    fn connect(
        &mut self,
        from: NodeId,
        from_anchor: Anchor,
        to: NodeId,
        to_anchor: Anchor,
        marker: Option<Marker>,
        kind: LinkKind,
    ) {
        let route = route(
            &self.nodes[from.0].bounds,
            from_anchor,
            &self.nodes[to.0].bounds,
            to_anchor,
        );
        self.connectors.push(Connector {
            from,
            to,
            route,
            marker,
            kind,
        });
    }

    fn finish_row(&mut self, last: NodeId, gap: f32) {
        self.cursor.y += self.nodes[last.0].bounds.height + gap;
    }

    fn track(&mut self, x: f32) {
        self.max_x = self.max_x.max(x);
    }
}

fn role_box(labels: &mut LabelCache<'_>, rel: &Relationship) -> NodeKind {
    NodeKind::Concept {
        label: labels.term(Some(&rel.kind)),
        sctid: rel.kind.concept_id.clone(),
        style: BoxStyle::Attribute,
    }
}

fn definition_style(concept: &Concept) -> BoxStyle {
    if concept.is_primitive() {
        BoxStyle::Primitive
    } else {
        BoxStyle::Defined
    }
}

/// Literal values get the concrete-domain class; otherwise the object
/// concept's definition status decides.
fn object_style(rel: &Relationship) -> BoxStyle {
    if rel.concrete_value.is_some() {
        BoxStyle::ConcreteDomain
    } else if rel.object().is_some_and(Concept::is_primitive) {
        BoxStyle::Primitive
    } else {
        BoxStyle::Defined
    }
}
