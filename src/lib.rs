//! SNOMED CT concept diagrams.
//!
//! A concept's stated or inferred definition is classified into subsumption
//! and attribute edges, laid out with measured text on a fixed cursor grid,
//! and serialized as SVG. Exports inline a themeable stylesheet and can be
//! rasterized to PNG or converted to PDF.

pub mod diagram;
pub mod error;
pub mod export;
pub mod fonts;
pub mod model;
pub mod surface;
pub mod theme;
mod xml;

pub use diagram::{Drawing, render, to_svg};
pub use error::Error;
pub use export::{Artifact, ExportError, RasterOptions};
pub use fonts::{CharWidthMeasure, CosmicTextMeasure, TextMeasure};
pub use model::{Concept, DiagramOptions, UngroupedAttributeIndex, View};
pub use surface::DiagramSurface;
pub use theme::Theme;
