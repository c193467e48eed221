use log::warn;

use crate::diagram::{self, Drawing};
use crate::export::{self, Artifact, RasterOptions};
use crate::fonts::TextMeasure;
use crate::model::{Concept, DiagramOptions, UngroupedAttributeIndex};
use crate::theme::Theme;

/// Render target that owns the most recent drawing.
///
/// Rendering replaces whatever was drawn before. Exports read the current
/// drawing and yield nothing when there is none or the export fails.
pub struct DiagramSurface<T: TextMeasure> {
    measure: T,
    theme: Theme,
    drawing: Option<Drawing>,
}

impl<T: TextMeasure> DiagramSurface<T> {
    pub fn new(measure: T, theme: Theme) -> Self {
        Self {
            measure,
            theme,
            drawing: None,
        }
    }

    /// Draws `concept`, or clears the surface when there is no concept.
    pub fn render(
        &mut self,
        concept: Option<&Concept>,
        options: &DiagramOptions,
        ungrouped: &UngroupedAttributeIndex,
    ) -> Option<&Drawing> {
        self.drawing =
            concept.map(|concept| diagram::render(concept, options, ungrouped, &mut self.measure));
        self.drawing.as_ref()
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    pub fn clear(&mut self) {
        self.drawing = None;
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    /// Live document without the inlined stylesheet.
    pub fn svg(&self) -> Option<String> {
        self.drawing.as_ref().map(diagram::to_svg)
    }

    pub fn export_vector(&self) -> Option<Artifact> {
        let drawing = self.drawing.as_ref()?;
        export::export_vector(drawing, &self.theme)
            .inspect_err(|e| warn!(error:% = e; "Vector export aborted"))
            .ok()
    }

    pub fn export_raster(&self, options: RasterOptions) -> Option<Artifact> {
        let drawing = self.drawing.as_ref()?;
        export::export_raster(drawing, &self.theme, options)
            .inspect_err(|e| warn!(error:% = e; "Raster export aborted"))
            .ok()
    }

    pub fn export_pdf(&self) -> Option<Artifact> {
        let drawing = self.drawing.as_ref()?;
        export::export_pdf(drawing, &self.theme)
            .inspect_err(|e| warn!(error:% = e; "PDF export aborted"))
            .ok()
    }
}
