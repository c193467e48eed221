use std::num::NonZeroUsize;

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::info;
use lru::LruCache;

const MEASURE_CACHE_SIZE: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1023);

/// Measures text before anything is placed, so layout never has to ask a
/// live rendering backend for a bounding box.
pub trait TextMeasure {
    /// Returns `(width, height)` of a single run of `text` at `font_size`.
    fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32);
}

impl<T: TextMeasure + ?Sized> TextMeasure for &mut T {
    fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        (**self).measure_text(text, font_size)
    }
}

#[derive(Hash, PartialEq, Eq, Clone)]
struct MeasureKey {
    text: String,
    font_size_bits: u32,
}

/// Shapes text with the system sans-serif family.
pub struct CosmicTextMeasure {
    font_system: FontSystem,
    cache: LruCache<MeasureKey, (f32, f32)>,
}

impl CosmicTextMeasure {
    pub fn new() -> Self {
        info!("Initializing FontSystem");
        Self {
            font_system: FontSystem::new(),
            cache: LruCache::new(MEASURE_CACHE_SIZE),
        }
    }
}

impl Default for CosmicTextMeasure {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasure for CosmicTextMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        let key = MeasureKey {
            text: crate::xml::sanitize_xml_text(text),
            font_size_bits: font_size.to_bits(),
        };

        if let Some(cached) = self.cache.get(&key) {
            return *cached;
        }

        let mut buffer = Buffer::new(
            &mut self.font_system,
            Metrics {
                font_size,
                line_height: font_size * 1.2,
            },
        );
        buffer.set_size(&mut self.font_system, None, None);

        let attrs = Attrs::new().family(Family::SansSerif);
        buffer.set_text(
            &mut self.font_system,
            &key.text,
            &attrs,
            Shaping::Advanced,
            None,
        );

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            width = width.max(run.line_w);
            height += run.line_height;
        }

        let measured = (width, height);
        self.cache.put(key, measured);
        measured
    }
}

/// Estimates extents from a fixed average advance per character.
///
/// Deterministic and font-free: useful for headless rendering and for
/// reproducible geometry in tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthMeasure {
    /// Average glyph advance as a fraction of the font size.
    pub advance: f32,
}

impl Default for CharWidthMeasure {
    fn default() -> Self {
        Self { advance: 0.55 }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn measure_text(&mut self, text: &str, font_size: f32) -> (f32, f32) {
        let chars = crate::xml::sanitized_char_count(text) as f32;
        (chars * font_size * self.advance, font_size * 1.2)
    }
}

#[cfg(test)]
mod tests {
    use super::{CharWidthMeasure, TextMeasure};

    #[test]
    fn char_width_scales_with_length_and_size() {
        let mut measure = CharWidthMeasure { advance: 0.5 };

        assert_eq!(measure.measure_text("Fracture", 10.0).0, 40.0);
        assert_eq!(measure.measure_text("Fracture", 12.0).0, 48.0);
        assert_eq!(measure.measure_text("", 12.0).0, 0.0);
    }

    #[test]
    fn char_width_ignores_invalid_xml_chars() {
        let mut measure = CharWidthMeasure { advance: 1.0 };
        assert_eq!(measure.measure_text("ab\u{0007}", 10.0).0, 20.0);
    }

    #[test]
    fn measure_works_through_mutable_reference() {
        fn width_of(mut measure: impl TextMeasure) -> f32 {
            measure.measure_text("abcd", 10.0).0
        }

        let mut measure = CharWidthMeasure { advance: 1.0 };
        assert_eq!(width_of(&mut measure), 40.0);
    }
}
