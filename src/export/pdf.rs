use log::info;

use super::fonts::pdf_fonts;
use super::vector::styled_svg;
use super::{Artifact, ExportError, artifact_name};
use crate::diagram::Drawing;
use crate::theme::Theme;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Single-page PDF of the styled document. Text is converted to paths so the
/// output does not depend on font embedding.
pub fn export_pdf(drawing: &Drawing, theme: &Theme) -> Result<Artifact, ExportError> {
    let svg = styled_svg(drawing, theme)?;

    let mut opts = svg2pdf::usvg::Options::default();
    opts.fontdb = pdf_fonts();
    let tree = svg2pdf::usvg::Tree::from_str(&svg, &opts)
        .map_err(|e| ExportError::Svg(e.to_string()))?;

    let mut options = svg2pdf::ConversionOptions::default();
    options.embed_text = false;
    let bytes = svg2pdf::to_pdf(&tree, options, svg2pdf::PageOptions::default())
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    let artifact = Artifact {
        file_name: artifact_name(&drawing.concept_id, "pdf"),
        media_type: PDF_MEDIA_TYPE,
        bytes,
    };
    info!(file = artifact.file_name.as_str(), bytes = artifact.bytes.len(); "PDF export ready");
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::render;
    use crate::fonts::CharWidthMeasure;
    use crate::model::{Concept, DiagramOptions, UngroupedAttributeIndex};

    #[test]
    fn produces_a_pdf_document() {
        let concept = Concept {
            concept_id: "404684003".into(),
            ..Concept::default()
        };
        let drawing = render(
            &concept,
            &DiagramOptions::default(),
            &UngroupedAttributeIndex::new(),
            &mut CharWidthMeasure::default(),
        );

        let artifact = export_pdf(&drawing, &Theme::default()).expect("pdf");

        assert!(artifact.bytes.starts_with(b"%PDF-"));
        assert_eq!(artifact.file_name, "diagram-404684003.pdf");
    }
}
