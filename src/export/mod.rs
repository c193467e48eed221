//! Self-contained artifacts built from a finished drawing.

mod fonts;
pub mod pdf;
pub mod raster;
pub mod vector;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;

pub use pdf::export_pdf;
pub use raster::{RasterOptions, export_raster};
pub use vector::{export_vector, styled_svg};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to inline stylesheet: {0}")]
    Xml(String),

    #[error("Failed to parse SVG: {0}")]
    Svg(String),

    #[error("Failed to create {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("Failed to encode PNG: {0}")]
    Png(String),

    #[error("Failed to convert SVG to PDF: {0}")]
    Pdf(String),
}

/// A downloadable export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Artifact {
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// `diagram-<id>.<extension>`, with a stand-in when the id is blank.
pub fn artifact_name(concept_id: &str, extension: &str) -> String {
    let id = concept_id.trim();
    let id = if id.is_empty() { "concept" } else { id };
    format!("diagram-{}.{}", id, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_follow_the_concept_id() {
        assert_eq!(artifact_name("71620000", "svg"), "diagram-71620000.svg");
        assert_eq!(artifact_name("  ", "png"), "diagram-concept.png");
    }

    #[test]
    fn data_uri_is_base64() {
        let artifact = Artifact {
            file_name: "diagram-1.svg".into(),
            media_type: "image/svg+xml",
            bytes: b"<svg/>".to_vec(),
        };
        assert_eq!(artifact.data_uri(), "data:image/svg+xml;base64,PHN2Zy8+");
    }
}
