//! Node primitives and their measured geometry.
//!
//! Every primitive is placed at a translate origin and owns a bounding box in
//! absolute coordinates. The box is what connectors anchor to, so it has to
//! match what the serializer draws: circles keep the offsets of their glyph
//! inside the group, concept boxes start at the origin.

use crate::fonts::TextMeasure;

pub const ID_FONT_SIZE: f32 = 10.0;
pub const LABEL_FONT_SIZE: f32 = 12.0;
pub const TEXT_INSET_X: f32 = 10.0;
pub const ID_BASELINE: f32 = 16.0;
pub const LABEL_BASELINE: f32 = 33.0;
pub const BOX_PADDING: f32 = 10.0;
/// Two text lines plus padding.
pub const BOX_HEIGHT: f32 = 45.0;
pub const ATTRIBUTE_RADIUS: f32 = 18.0;
pub const INNER_BORDER_OFFSET: f32 = 3.0;

pub const CONNECTIVE_RADIUS: f32 = 25.0;
pub const CONJUNCTION_RADIUS: f32 = 10.0;
pub const GROUP_RADIUS: f32 = 20.0;
/// Vertical centre shared by every circle so they line up on one row.
pub const CIRCLE_CENTER_Y: f32 = 25.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned box in drawing coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Visual class of a concept-bearing box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxStyle {
    Primitive,
    Defined,
    /// Pill-shaped role type box.
    Attribute,
    /// Literal value in place of a target concept.
    ConcreteDomain,
}

impl BoxStyle {
    pub fn css_class(self) -> &'static str {
        match self {
            BoxStyle::Primitive => "sct-primitive-concept",
            BoxStyle::Defined => "sct-defined-concept",
            BoxStyle::Attribute => "sct-attribute",
            BoxStyle::ConcreteDomain => "concrete-domain",
        }
    }

    /// Defined concepts and attributes get a second, inset border.
    pub fn has_double_border(self) -> bool {
        matches!(self, BoxStyle::Defined | BoxStyle::Attribute)
    }

    pub fn corner_radius(self) -> f32 {
        if self == BoxStyle::Attribute {
            ATTRIBUTE_RADIUS
        } else {
            0.0
        }
    }
}

/// Glyph drawn inside the definition connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `⊑` for primitive concepts.
    SubsumedBy,
    /// `≡` for fully defined concepts.
    EquivalentTo,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Concept {
        label: String,
        sctid: String,
        style: BoxStyle,
    },
    Connective(Connective),
    /// Small solid disc.
    Conjunction,
    /// Open circle heading a role group or a self-grouped attribute.
    AttributeGroup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Translate origin of the node's group.
    pub origin: Point,
    pub bounds: Bounds,
}

impl Node {
    pub fn is_concept_box(&self) -> bool {
        matches!(self.kind, NodeKind::Concept { .. })
    }

    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Concept { label, .. } => Some(label),
            _ => None,
        }
    }
}

/// Measured size of a concept box: the sctid line over the label line.
pub fn concept_box_size<T: TextMeasure>(measure: &mut T, label: &str, sctid: &str) -> Size {
    let (id_width, _) = measure.measure_text(sctid, ID_FONT_SIZE);
    let (label_width, _) = measure.measure_text(label, LABEL_FONT_SIZE);
    Size::new(id_width.max(label_width) + BOX_PADDING * 2.0, BOX_HEIGHT)
}

/// Bounding box of a node kind placed at `origin`, relative to the drawing.
pub fn node_bounds<T: TextMeasure>(measure: &mut T, kind: &NodeKind, origin: Point) -> Bounds {
    let circle = |cx: f32, r: f32| {
        Bounds::new(
            origin.x + cx - r,
            origin.y + CIRCLE_CENTER_Y - r,
            r * 2.0,
            r * 2.0,
        )
    };

    match kind {
        NodeKind::Concept { label, sctid, .. } => {
            let size = concept_box_size(measure, label, sctid);
            Bounds::new(origin.x, origin.y, size.width, size.height)
        }
        NodeKind::Connective(_) => circle(CONNECTIVE_RADIUS, CONNECTIVE_RADIUS),
        NodeKind::Conjunction => circle(CONJUNCTION_RADIUS, CONJUNCTION_RADIUS),
        NodeKind::AttributeGroup => circle(GROUP_RADIUS, GROUP_RADIUS),
    }
}
