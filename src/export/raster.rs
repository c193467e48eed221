use log::{debug, info};
use resvg::usvg;
use tiny_skia::{Color, Pixmap, Transform};

use super::fonts::raster_fonts;
use super::vector::styled_svg;
use super::{Artifact, ExportError, artifact_name};
use crate::diagram::{Drawing, Size};
use crate::theme::Theme;

pub const PNG_MEDIA_TYPE: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterOptions {
    /// Laid-out size of the drawing as displayed; the canvas when `None`.
    pub bounds: Option<Size>,
    /// Pixel density multiplier.
    pub scale: f32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            bounds: None,
            scale: 1.0,
        }
    }
}

/// PNG of the styled document on a white background.
///
/// The bitmap is sized from the display bounds, not the document's own
/// width and height. The document is drawn at its natural size from the
/// top-left corner.
pub fn export_raster(
    drawing: &Drawing,
    theme: &Theme,
    options: RasterOptions,
) -> Result<Artifact, ExportError> {
    let bounds = options.bounds.unwrap_or(drawing.canvas);
    let png = {
        let svg = styled_svg(drawing, theme)?;
        rasterize(&svg, bounds, options.scale)?
    };

    let artifact = Artifact {
        file_name: artifact_name(&drawing.concept_id, "png"),
        media_type: PNG_MEDIA_TYPE,
        bytes: png,
    };
    info!(file = artifact.file_name.as_str(), bytes = artifact.bytes.len(); "Raster export ready");
    Ok(artifact)
}

fn rasterize(svg: &str, bounds: Size, scale: f32) -> Result<Vec<u8>, ExportError> {
    // NaN and negative sizes saturate to zero and fail pixmap creation
    let width = (bounds.width * scale).ceil() as u32;
    let height = (bounds.height * scale).ceil() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or(ExportError::Pixmap { width, height })?;
    pixmap.fill(Color::WHITE);

    let mut opts = usvg::Options::default();
    opts.fontdb = raster_fonts();
    let tree = usvg::Tree::from_str(svg, &opts).map_err(|e| ExportError::Svg(e.to_string()))?;

    // Natural size: larger bounds pad with white, smaller ones clip.
    let transform = Transform::from_scale(scale, scale);
    debug!(width = width, height = height; "Rasterizing diagram");
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ExportError::Png(e.to_string()))
}
