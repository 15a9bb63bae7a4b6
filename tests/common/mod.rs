//! Common test utilities and assertion helpers.
//!
//! Helpers here run the full pipeline and pull typed views out of the
//! resulting paint plan so tests can assert on geometry directly.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use xlplan::{
    convert, FontVariant, HAlign, LayoutConfig, PaintCommand, PaintPlan, Rect, RenderContext,
    SheetData,
};

pub const EPSILON: f64 = 1e-6;

/// Run the full pipeline with standard fonts. Panics on error.
pub fn plan(sheet: &SheetData, config: &LayoutConfig) -> PaintPlan {
    convert(sheet, config, &mut RenderContext::new()).expect("conversion failed")
}

pub fn plan_default(sheet: &SheetData) -> PaintPlan {
    plan(sheet, &LayoutConfig::default())
}

/// Owned view of a `drawText` command.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDraw {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub align: HAlign,
    pub color: String,
    pub font: FontVariant,
    pub font_name: String,
    pub font_size: f64,
}

/// Every `drawText` in plan order.
pub fn text_draws(plan: &PaintPlan) -> Vec<TextDraw> {
    text_draws_in(&plan.commands)
}

pub fn text_draws_in(commands: &[PaintCommand]) -> Vec<TextDraw> {
    commands
        .iter()
        .filter_map(|c| match c {
            PaintCommand::DrawText {
                text,
                x,
                y,
                width,
                align,
                color,
                font,
                font_name,
                font_size,
            } => Some(TextDraw {
                text: text.clone(),
                x: *x,
                y: *y,
                width: *width,
                align: *align,
                color: color.clone(),
                font: *font,
                font_name: font_name.clone(),
                font_size: *font_size,
            }),
            _ => None,
        })
        .collect()
}

/// The single `drawText` for `text`. Panics if absent or repeated.
pub fn find_text(plan: &PaintPlan, text: &str) -> TextDraw {
    let matches: Vec<_> = text_draws(plan)
        .into_iter()
        .filter(|t| t.text == text)
        .collect();
    assert_eq!(matches.len(), 1, "expected exactly one drawText for {text:?}");
    matches.into_iter().next().unwrap()
}

/// Rectangles of every `fillRect`, in plan order.
pub fn fill_rects(plan: &PaintPlan) -> Vec<(Rect, String)> {
    plan.commands
        .iter()
        .filter_map(|c| match c {
            PaintCommand::FillRect { rect, color } => Some((*rect, color.clone())),
            _ => None,
        })
        .collect()
}

/// `(image_id, rect)` of every `placeImage` in `commands`.
pub fn placed_images(commands: &[PaintCommand]) -> Vec<(String, Rect)> {
    commands
        .iter()
        .filter_map(|c| match c {
            PaintCommand::PlaceImage { image_id, rect, .. } => Some((image_id.clone(), *rect)),
            _ => None,
        })
        .collect()
}

/// The `op` tag of each command, as serialized.
pub fn ops(commands: &[PaintCommand]) -> Vec<String> {
    commands
        .iter()
        .map(|c| {
            serde_json::to_value(c).unwrap()["op"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

/// Text boxes on the same line must not overlap horizontally.
pub fn assert_no_horizontal_overlap(draws: &[TextDraw]) {
    for (i, a) in draws.iter().enumerate() {
        for b in draws.iter().skip(i + 1) {
            if (a.y - b.y).abs() > EPSILON {
                continue;
            }
            let disjoint = a.x + a.width <= b.x + EPSILON || b.x + b.width <= a.x + EPSILON;
            assert!(disjoint, "{:?} overlaps {:?}", a.text, b.text);
        }
    }
}
