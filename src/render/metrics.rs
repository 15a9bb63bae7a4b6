//! Text width measurement.
//!
//! Layout never touches a real font file. Widths come from a [`TextMeasurer`];
//! the default one uses the standard Helvetica advance widths (1/1000 em),
//! which is what page backends fall back to when no font is embedded.

use crate::types::FontVariant;

/// Measures the advance width of a single line of text, in points.
pub trait TextMeasurer {
    fn text_width(&self, text: &str, font: FontVariant, size: f64) -> f64;
}

/// Advance widths for printable ASCII (`' '..='~'`), regular weight.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Advance widths for printable ASCII, bold weight.
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

/// Standard Helvetica metrics. Oblique faces share the upright widths.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardFontMetrics;

impl StandardFontMetrics {
    fn advance(ch: char, bold: bool) -> u16 {
        let table = if bold {
            &HELVETICA_BOLD_WIDTHS
        } else {
            &HELVETICA_WIDTHS
        };
        u32::from(ch)
            .checked_sub(32)
            .and_then(|i| usize::try_from(i).ok())
            .and_then(|i| table.get(i))
            .copied()
            .unwrap_or(FALLBACK_WIDTH)
    }
}

impl TextMeasurer for StandardFontMetrics {
    fn text_width(&self, text: &str, font: FontVariant, size: f64) -> f64 {
        let bold = matches!(font, FontVariant::Bold | FontVariant::BoldItalic);
        let units: u32 = text.chars().map(|ch| u32::from(Self::advance(ch, bold))).sum();
        f64::from(units) * size / 1000.0
    }
}
