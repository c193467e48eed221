//! Serializes a laid-out [`Drawing`] into a live SVG document.
//!
//! The document only carries class names and the few inline styles the
//! shapes depend on; exporters inline the theme stylesheet.

use std::fmt::Write as _;

use super::layout::{Connector, Drawing};
use super::primitive::{
    BoxStyle, CIRCLE_CENTER_Y, CONJUNCTION_RADIUS, CONNECTIVE_RADIUS, Connective, GROUP_RADIUS,
    ID_BASELINE, ID_FONT_SIZE, INNER_BORDER_OFFSET, LABEL_BASELINE, LABEL_FONT_SIZE, Node,
    NodeKind, TEXT_INSET_X,
};
use super::route::Marker;
use crate::xml::escape_xml;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Half-width of the connective glyph strokes.
const GLYPH_HALF_WIDTH: f32 = 12.0;
const GLYPH_STROKE: f32 = 2.0;
const MARKER_PATH: &str = "M 0 0 L 10 5 L 0 10 z";

pub fn to_svg(drawing: &Drawing) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="{ns}" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}" data-concept-id="{id}" data-view="{view}">"#,
        ns = SVG_NS,
        w = drawing.canvas.width,
        h = drawing.canvas.height,
        id = escape_xml(&drawing.concept_id),
        view = drawing.view.as_str(),
    );
    svg.push_str(&defs());
    for connector in &drawing.connectors {
        svg.push_str(&connector_path(connector));
    }
    for node in &drawing.nodes {
        svg.push_str(&node_group(node));
    }
    svg.push_str("</svg>");
    svg
}

fn defs() -> String {
    let marker = |marker: Marker, style: &str| {
        format!(
            r#"<marker id="{}" refX="10" refY="5" markerWidth="10" markerHeight="10" orient="auto"><path d="{}" style="{}"/></marker>"#,
            marker.id(),
            MARKER_PATH,
            style
        )
    };
    format!(
        "<defs>{}{}</defs>",
        marker(Marker::Filled, "fill: black;"),
        marker(Marker::Clear, "fill: white; stroke: black;")
    )
}

fn connector_path(connector: &Connector) -> String {
    let marker_attr = connector
        .marker
        .map(|m| format!(r#" marker-end="url(#{})""#, m.id()))
        .unwrap_or_default();
    format!(
        r#"<path class="link-line" d="{}"{}/>"#,
        connector.route.path_data(),
        marker_attr
    )
}

fn node_group(node: &Node) -> String {
    let (class, body) = match &node.kind {
        NodeKind::Concept {
            label,
            sctid,
            style,
        } => (
            format!("sct-box {}", style.css_class()),
            concept_box(label, sctid, *style, node.bounds.width, node.bounds.height),
        ),
        NodeKind::Connective(glyph) => ("isa-node".to_string(), connective(*glyph)),
        NodeKind::Conjunction => (
            "conjunction-node".to_string(),
            format!(
                r#"<circle r="{r}" cx="{r}" cy="{cy}" style="fill: black; stroke: none;"/>"#,
                r = CONJUNCTION_RADIUS,
                cy = CIRCLE_CENTER_Y
            ),
        ),
        NodeKind::AttributeGroup => (
            "attribute-group-node".to_string(),
            format!(
                r#"<circle r="{r}" cx="{r}" cy="{cy}" style="fill: white; stroke: black;"/>"#,
                r = GROUP_RADIUS,
                cy = CIRCLE_CENTER_Y
            ),
        ),
    };
    format!(
        r#"<g class="{}" transform="translate({:.2}, {:.2})">{}</g>"#,
        class, node.origin.x, node.origin.y, body
    )
}

fn concept_box(label: &str, sctid: &str, style: BoxStyle, width: f32, height: f32) -> String {
    let radius = style.corner_radius();
    let mut body = String::new();

    if style.has_double_border() {
        let offset = INNER_BORDER_OFFSET;
        let inner_radius = (radius - offset).max(0.0);
        let _ = write!(
            body,
            r#"<rect rx="{radius}" ry="{radius}" width="{width:.2}" height="{height:.2}" style="fill: white;"/>"#,
        );
        let _ = write!(
            body,
            r#"<rect class="inner-rect" rx="{inner_radius}" ry="{inner_radius}" x="{offset}" y="{offset}" width="{:.2}" height="{:.2}" style="stroke-width: 1px;"/>"#,
            width - offset * 2.0,
            height - offset * 2.0,
        );
    } else {
        let _ = write!(
            body,
            r#"<rect rx="{radius}" ry="{radius}" width="{width:.2}" height="{height:.2}"/>"#,
        );
    }

    let _ = write!(
        body,
        r#"<text class="sct-id" x="{x}" y="{ID_BASELINE}" style="font-size: {ID_FONT_SIZE}px;">{}</text>"#,
        escape_xml(sctid),
        x = TEXT_INSET_X,
    );
    let _ = write!(
        body,
        r#"<text class="sct-label" x="{x}" y="{LABEL_BASELINE}" style="font-size: {LABEL_FONT_SIZE}px;">{}</text>"#,
        escape_xml(label),
        x = TEXT_INSET_X,
    );
    body
}

fn connective(glyph: Connective) -> String {
    let c = CONNECTIVE_RADIUS;
    let s = GLYPH_HALF_WIDTH;
    let mut body = format!(r#"<circle r="{c}" cx="{c}" cy="{c}"/>"#);
    let mut line = |x1: f32, y1: f32, x2: f32, y2: f32| {
        let _ = write!(
            body,
            r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="black" stroke-width="{GLYPH_STROKE}"/>"#
        );
    };

    match glyph {
        Connective::SubsumedBy => {
            line(c - s, c - 7.0, c + s, c - 7.0);
            line(c - s, c + 5.0, c + s, c + 5.0);
            line(c - s, c - 7.0, c - s, c + 5.0);
            line(c - s, c + 10.0, c + s, c + 10.0);
        }
        Connective::EquivalentTo => {
            line(c - s, c - 7.0, c + s, c - 7.0);
            line(c - s, c, c + s, c);
            line(c - s, c + 7.0, c + s, c + 7.0);
        }
    }
    body
}
