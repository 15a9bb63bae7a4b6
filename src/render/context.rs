//! Rendering context: font registry, text measurement and its cache.
//!
//! Font lookup is carried by this value and passed to each stage; there is no
//! process-wide font table.

use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use super::metrics::{StandardFontMetrics, TextMeasurer};
use crate::types::FontVariant;

const MEASURE_CACHE_CAPACITY: usize = 8192;

/// Maps each font variant to the face name a backend should draw with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontRegistry {
    family: String,
    faces: HashMap<FontVariant, String>,
}

impl FontRegistry {
    /// The four standard Helvetica faces.
    pub fn standard() -> Self {
        let mut faces = HashMap::new();
        faces.insert(FontVariant::Regular, "Helvetica".to_string());
        faces.insert(FontVariant::Bold, "Helvetica-Bold".to_string());
        faces.insert(FontVariant::Italic, "Helvetica-Oblique".to_string());
        faces.insert(FontVariant::BoldItalic, "Helvetica-BoldOblique".to_string());
        Self {
            family: "Helvetica".to_string(),
            faces,
        }
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    /// Register (or replace) the face used for a variant.
    pub fn register(&mut self, variant: FontVariant, face: impl Into<String>) {
        self.faces.insert(variant, face.into());
    }

    /// Face name for a variant, falling back to the regular face.
    pub fn face(&self, variant: FontVariant) -> &str {
        self.faces
            .get(&variant)
            .or_else(|| self.faces.get(&FontVariant::Regular))
            .map_or(self.family.as_str(), String::as_str)
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

/// Face and size a width was measured at. Sizes compare by bit pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct FaceSize {
    font: FontVariant,
    size_bits: u64,
}

impl FaceSize {
    fn new(font: FontVariant, size: f64) -> Self {
        Self {
            font,
            size_bits: size.to_bits(),
        }
    }
}

/// Bounded memo of measured widths, evicted oldest first.
struct MeasureCache {
    widths: HashMap<FaceSize, HashMap<Rc<str>, f64>>,
    order: VecDeque<(FaceSize, Rc<str>)>,
    capacity: usize,
    len: usize,
}

impl MeasureCache {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            widths: HashMap::new(),
            order: VecDeque::new(),
            capacity,
            len: 0,
        }
    }

    fn lookup(&self, key: FaceSize, text: &str) -> Option<f64> {
        self.widths.get(&key)?.get(text).copied()
    }

    /// Remember a width; an existing entry for the same key is kept.
    fn store(&mut self, key: FaceSize, text: &str, width: f64) {
        if self.capacity == 0 {
            return;
        }
        let texts = self.widths.entry(key).or_default();
        if texts.contains_key(text) {
            return;
        }
        let text: Rc<str> = Rc::from(text);
        texts.insert(Rc::clone(&text), width);
        self.order.push_back((key, text));
        self.len += 1;

        while self.len > self.capacity {
            let Some((key, text)) = self.order.pop_front() else {
                break;
            };
            if let Some(texts) = self.widths.get_mut(&key) {
                if texts.remove(&text).is_some() {
                    self.len = self.len.saturating_sub(1);
                }
                if texts.is_empty() {
                    self.widths.remove(&key);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Everything the layout stages need to know about fonts.
pub struct RenderContext {
    pub fonts: FontRegistry,
    measurer: Box<dyn TextMeasurer>,
    cache: MeasureCache,
}

impl RenderContext {
    /// Standard Helvetica faces and metrics.
    pub fn new() -> Self {
        Self::with_measurer(FontRegistry::standard(), Box::new(StandardFontMetrics))
    }

    /// Use custom faces and a custom measurer (e.g. metrics of an embedded font).
    pub fn with_measurer(fonts: FontRegistry, measurer: Box<dyn TextMeasurer>) -> Self {
        Self {
            fonts,
            measurer,
            cache: MeasureCache::with_capacity(MEASURE_CACHE_CAPACITY),
        }
    }

    /// Width of `text` in points, memoized per font variant and size.
    pub fn measure_text(&mut self, text: &str, font: FontVariant, size: f64) -> f64 {
        if text.is_empty() {
            return 0.0;
        }
        let key = FaceSize::new(font, size);
        if let Some(width) = self.cache.lookup(key, text) {
            return width;
        }
        let width = self.measurer.text_width(text, font, size);
        self.cache.store(key, text, width);
        width
    }

    /// Number of memoized measurements.
    pub fn cached_measurements(&self) -> usize {
        self.cache.len()
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("fonts", &self.fonts)
            .field("cached_measurements", &self.cache.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingMeasurer {
        calls: Rc<Cell<usize>>,
    }

    impl TextMeasurer for CountingMeasurer {
        fn text_width(&self, text: &str, _font: FontVariant, size: f64) -> f64 {
            self.calls.set(self.calls.get() + 1);
            text.len() as f64 * size
        }
    }

    #[test]
    fn cache_keeps_first_width() {
        let bold = FaceSize::new(FontVariant::Bold, 11.0);
        let mut cache = MeasureCache::with_capacity(4);
        assert_eq!(cache.lookup(bold, "Total"), None);
        cache.store(bold, "Total", 27.5);
        cache.store(bold, "Total", 99.0);
        assert_eq!(cache.lookup(bold, "Total"), Some(27.5));
        assert_eq!(cache.lookup(FaceSize::new(FontVariant::Bold, 12.0), "Total"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn cache_evicts_oldest_across_faces() {
        let regular = FaceSize::new(FontVariant::Regular, 10.0);
        let italic = FaceSize::new(FontVariant::Italic, 10.0);
        let mut cache = MeasureCache::with_capacity(2);
        cache.store(regular, "Q1", 11.0);
        cache.store(italic, "Q2", 12.0);
        cache.store(regular, "Q3", 13.0);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.lookup(regular, "Q1"), None);
        assert_eq!(cache.lookup(italic, "Q2"), Some(12.0));
        assert_eq!(cache.lookup(regular, "Q3"), Some(13.0));

        cache.store(regular, "Q4", 14.0);
        assert_eq!(cache.lookup(italic, "Q2"), None);
        assert!(!cache.widths.contains_key(&italic));
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let key = FaceSize::new(FontVariant::Regular, 11.0);
        let mut cache = MeasureCache::with_capacity(0);
        cache.store(key, "n/a", 1.0);
        assert_eq!(cache.lookup(key, "n/a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn measure_text_memoizes_per_face_and_size() {
        let calls = Rc::new(Cell::new(0));
        let mut ctx = RenderContext::with_measurer(
            FontRegistry::standard(),
            Box::new(CountingMeasurer {
                calls: Rc::clone(&calls),
            }),
        );
        assert_eq!(ctx.measure_text("abc", FontVariant::Regular, 10.0), 30.0);
        assert_eq!(ctx.measure_text("abc", FontVariant::Regular, 10.0), 30.0);
        assert_eq!(calls.get(), 1);
        ctx.measure_text("abc", FontVariant::Bold, 10.0);
        ctx.measure_text("abc", FontVariant::Regular, 12.0);
        assert_eq!(calls.get(), 3);
        assert_eq!(ctx.cached_measurements(), 3);
        assert_eq!(ctx.measure_text("", FontVariant::Regular, 12.0), 0.0);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn registry_falls_back_to_regular_face() {
        let mut fonts = FontRegistry::standard();
        assert_eq!(fonts.face(FontVariant::BoldItalic), "Helvetica-BoldOblique");
        fonts.register(FontVariant::Bold, "Inter-Bold");
        assert_eq!(fonts.face(FontVariant::Bold), "Inter-Bold");
        assert_eq!(fonts.family(), "Helvetica");

        let sparse = FontRegistry {
            family: "Inter".to_string(),
            faces: HashMap::from([(FontVariant::Regular, "Inter-Regular".to_string())]),
        };
        assert_eq!(sparse.face(FontVariant::Italic), "Inter-Regular");
    }
}
