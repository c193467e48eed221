//! Concept normal-form diagrams: edge classification, measured layout,
//! connector routing and SVG serialization.

pub mod classify;
pub mod label;
pub mod layout;
pub mod primitive;
pub mod route;
pub mod svg;

pub use classify::{ClassifiedEdges, classify};
pub use layout::{Connector, Drawing, LayoutEngine, LinkKind};
pub use primitive::{BoxStyle, Connective, Node, NodeId, NodeKind, Point, Size};
pub use route::{Anchor, Marker, Route};
pub use svg::to_svg;

use crate::fonts::TextMeasure;
use crate::model::{Concept, DiagramOptions, UngroupedAttributeIndex};

/// Lays out `concept` for the view and language in `options`.
///
/// Never fails: missing terms and targets degrade to placeholders.
pub fn render<T: TextMeasure>(
    concept: &Concept,
    options: &DiagramOptions,
    ungrouped: &UngroupedAttributeIndex,
    measure: &mut T,
) -> Drawing {
    LayoutEngine::new(measure, options, ungrouped).layout(concept)
}
