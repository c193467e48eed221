use log::info;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::{Artifact, ExportError, artifact_name};
use crate::diagram::{Drawing, to_svg};
use crate::theme::Theme;

pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" standalone=\"no\"?>\r\n";
pub const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Copy of the live document with the theme stylesheet inlined as the first
/// child of the root element and an XML declaration in front.
///
/// The drawing itself is left untouched.
pub fn styled_svg(drawing: &Drawing, theme: &Theme) -> Result<String, ExportError> {
    let live = to_svg(drawing);
    let css = theme.stylesheet();

    let mut reader = Reader::from_str(&live);
    let mut writer = Writer::new(Vec::with_capacity(live.len() + css.len() + 64));
    let mut inlined = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExportError::Xml(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(root) if !inlined && root.name().as_ref() == b"svg" => {
                write(&mut writer, Event::Start(root))?;
                write(&mut writer, Event::Start(BytesStart::new("style")))?;
                write(&mut writer, Event::Text(BytesText::new(&css)))?;
                write(&mut writer, Event::End(BytesEnd::new("style")))?;
                inlined = true;
            }
            event => write(&mut writer, event)?,
        }
    }

    let body =
        String::from_utf8(writer.into_inner()).map_err(|e| ExportError::Xml(e.to_string()))?;
    Ok(format!("{}{}", XML_DECLARATION, body))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), ExportError> {
    writer
        .write_event(event)
        .map_err(|e| ExportError::Xml(e.to_string()))
}

pub fn export_vector(drawing: &Drawing, theme: &Theme) -> Result<Artifact, ExportError> {
    let svg = styled_svg(drawing, theme)?;
    let artifact = Artifact {
        file_name: artifact_name(&drawing.concept_id, "svg"),
        media_type: SVG_MEDIA_TYPE,
        bytes: svg.into_bytes(),
    };
    info!(file = artifact.file_name.as_str(), bytes = artifact.bytes.len(); "Vector export ready");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::render;
    use crate::fonts::CharWidthMeasure;
    use crate::model::{Concept, DiagramOptions, Term, UngroupedAttributeIndex};

    fn drawing(id: &str, fsn: &str) -> Drawing {
        let concept = Concept {
            concept_id: id.to_string(),
            fsn: Some(Term {
                term: fsn.to_string(),
                lang: "en".to_string(),
            }),
            ..Concept::default()
        };
        render(
            &concept,
            &DiagramOptions::default(),
            &UngroupedAttributeIndex::new(),
            &mut CharWidthMeasure::default(),
        )
    }

    #[test]
    fn stylesheet_is_the_first_child_of_the_root() {
        let svg = styled_svg(&drawing("71620000", "Fracture of femur"), &Theme::default())
            .expect("styled svg");

        assert!(svg.starts_with("<?xml version=\"1.0\" standalone=\"no\"?>\r\n<svg "));
        let root_end = svg.find('>').and_then(|decl| svg[decl + 1..].find('>').map(|i| decl + 1 + i));
        let after_root = &svg[root_end.expect("root tag") + 1..];
        assert!(after_root.starts_with("<style>"), "{after_root}");
        assert!(svg.contains(".link-line { fill: none; stroke: black; stroke-width: 2px; }"));
        assert_eq!(svg.matches("<style>").count(), 1);
    }

    #[test]
    fn escaped_text_survives_the_copy() {
        let svg = styled_svg(&drawing("1", "Salt & pepper"), &Theme::default()).expect("styled svg");
        assert!(svg.contains(">Salt &amp; pepper</text>"));
    }

    #[test]
    fn live_drawing_is_not_modified() {
        let drawing = drawing("1", "x");
        let before = to_svg(&drawing);
        let _ = export_vector(&drawing, &Theme::default()).expect("export");
        assert_eq!(to_svg(&drawing), before);
        assert!(!before.contains("<style>"));
    }

    #[test]
    fn artifact_is_named_after_the_concept() {
        let artifact = export_vector(&drawing("404684003", "x"), &Theme::default()).expect("export");
        assert_eq!(artifact.file_name, "diagram-404684003.svg");
        assert_eq!(artifact.media_type, "image/svg+xml");

        let blank = export_vector(&drawing("", "x"), &Theme::default()).expect("export");
        assert_eq!(blank.file_name, "diagram-concept.svg");
    }
}
