use std::path::Path;
use std::sync::Arc;

use log::info;
use parking_lot::{Mutex, const_mutex};
use resvg::usvg::fontdb;

/// Directory scanned for bundled fonts next to the working directory.
const LOCAL_FONTS_DIR: &str = "fonts";

static RASTER_FONTS: Mutex<Option<Arc<fontdb::Database>>> = const_mutex(None);
static PDF_FONTS: Mutex<Option<Arc<svg2pdf::usvg::fontdb::Database>>> = const_mutex(None);

/// Generic families resolved against whatever is installed.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FallbackFamilies {
    pub sans: Option<String>,
    pub serif: Option<String>,
    pub mono: Option<String>,
}

pub(crate) fn pick_fallbacks<'f>(families: impl IntoIterator<Item = &'f str>) -> FallbackFamilies {
    let mut sans: Option<&str> = None;
    let mut serif: Option<&str> = None;
    let mut mono: Option<&str> = None;
    let mut first: Option<&str> = None;

    for family in families {
        first.get_or_insert(family);
        let lower = family.to_ascii_lowercase();
        if sans.is_none() && lower.contains("sans") {
            sans = Some(family);
        }
        if serif.is_none() && lower.contains("serif") {
            serif = Some(family);
        }
        if mono.is_none() && (lower.contains("mono") || lower.contains("code")) {
            mono = Some(family);
        }
    }

    FallbackFamilies {
        sans: sans.or(first).map(str::to_string),
        serif: serif.or(first).map(str::to_string),
        mono: mono.or(sans).or(first).map(str::to_string),
    }
}

// resvg and svg2pdf pin different usvg releases, so the database types differ.
macro_rules! load_database {
    ($db:ty) => {{
        let mut db = <$db>::new();
        db.load_system_fonts();
        let local = Path::new(LOCAL_FONTS_DIR);
        if local.is_dir() {
            db.load_fonts_dir(local);
        }

        let fallbacks = pick_fallbacks(
            db.faces()
                .flat_map(|face| face.families.iter().map(|(family, _)| family.as_str())),
        );
        if let Some(family) = fallbacks.sans {
            db.set_sans_serif_family(family);
        }
        if let Some(family) = fallbacks.serif {
            db.set_serif_family(family);
        }
        if let Some(family) = fallbacks.mono {
            db.set_monospace_family(family);
        }
        info!(faces = db.len(); "Font database loaded");
        Arc::new(db)
    }};
}

/// System font database for rasterization, loaded on first use.
pub(crate) fn raster_fonts() -> Arc<fontdb::Database> {
    let mut slot = RASTER_FONTS.lock();
    slot.get_or_insert_with(|| load_database!(fontdb::Database))
        .clone()
}

pub(crate) fn pdf_fonts() -> Arc<svg2pdf::usvg::fontdb::Database> {
    let mut slot = PDF_FONTS.lock();
    slot.get_or_insert_with(|| load_database!(svg2pdf::usvg::fontdb::Database))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_named_generic_families() {
        let picked = pick_fallbacks(["Cantarell", "DejaVu Sans", "DejaVu Serif", "Fira Code"]);
        assert_eq!(picked.sans.as_deref(), Some("DejaVu Sans"));
        // "DejaVu Sans" doesn't contain "serif"
        assert_eq!(picked.serif.as_deref(), Some("DejaVu Serif"));
        assert_eq!(picked.mono.as_deref(), Some("Fira Code"));
    }

    #[test]
    fn falls_back_to_the_first_family() {
        let picked = pick_fallbacks(["Cantarell", "Ubuntu"]);
        assert_eq!(picked.sans.as_deref(), Some("Cantarell"));
        assert_eq!(picked.serif.as_deref(), Some("Cantarell"));
        assert_eq!(picked.mono.as_deref(), Some("Cantarell"));
        assert_eq!(pick_fallbacks([]), FallbackFamilies::default());
    }
}
