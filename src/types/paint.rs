use serde::{Deserialize, Serialize};

use super::HAlign;

/// Font face selected from a cell's bold/italic flags.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FontVariant {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontVariant {
    pub fn from_flags(bold: bool, italic: bool) -> Self {
        match (bold, italic) {
            (true, true) => Self::BoldItalic,
            (true, false) => Self::Bold,
            (false, true) => Self::Italic,
            (false, false) => Self::Regular,
        }
    }
}

/// Absolute rectangle in points, origin at the page's top-left corner.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A single drawing operation for a page-based rendering surface.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum PaintCommand {
    /// Begin a new page. Every page in a plan starts with exactly one marker.
    #[serde(rename_all = "camelCase")]
    StartPage {
        number: u32,
        width: f64,
        height: f64,
    },
    FillRect { rect: Rect, color: String },
    #[serde(rename_all = "camelCase")]
    StrokeLine {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
        color: String,
    },
    /// Single-line text. `x`/`width` bound the horizontal placement box that
    /// `align` applies to; `y` is the top of the text line.
    #[serde(rename_all = "camelCase")]
    DrawText {
        text: String,
        x: f64,
        y: f64,
        width: f64,
        align: HAlign,
        color: String,
        font: FontVariant,
        font_name: String,
        font_size: f64,
    },
    #[serde(rename_all = "camelCase")]
    PlaceImage {
        image_id: String,
        mime_type: String,
        rect: Rect,
    },
}

/// The ordered paint commands for a whole sheet, partitioned into pages by
/// [`PaintCommand::StartPage`] markers.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaintPlan {
    pub page_width: f64,
    pub page_height: f64,
    pub commands: Vec<PaintCommand>,
}

impl PaintPlan {
    /// Split the command stream into pages; each slice starts with its marker.
    pub fn pages(&self) -> Vec<&[PaintCommand]> {
        let mut pages = Vec::new();
        let mut start = None;
        for (i, cmd) in self.commands.iter().enumerate() {
            if matches!(cmd, PaintCommand::StartPage { .. }) {
                if let Some(s) = start {
                    if let Some(page) = self.commands.get(s..i) {
                        pages.push(page);
                    }
                }
                start = Some(i);
            }
        }
        if let Some(page) = start.and_then(|s| self.commands.get(s..)) {
            pages.push(page);
        }
        pages
    }

    pub fn page_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PaintCommand::StartPage { .. }))
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn marker(number: u32) -> PaintCommand {
        PaintCommand::StartPage {
            number,
            width: 100.0,
            height: 100.0,
        }
    }

    fn fill() -> PaintCommand {
        PaintCommand::FillRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: "#FF0000".to_string(),
        }
    }

    #[test]
    fn pages_split_on_markers() {
        let plan = PaintPlan {
            page_width: 100.0,
            page_height: 100.0,
            commands: vec![marker(1), fill(), fill(), marker(2), fill()],
        };
        let pages = plan.pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].len(), 3);
        assert_eq!(pages[1].len(), 2);
        assert_eq!(plan.page_count(), 2);
    }

    #[test]
    fn font_variant_from_flags() {
        assert_eq!(FontVariant::from_flags(true, true), FontVariant::BoldItalic);
        assert_eq!(FontVariant::from_flags(true, false), FontVariant::Bold);
        assert_eq!(FontVariant::from_flags(false, true), FontVariant::Italic);
        assert_eq!(FontVariant::from_flags(false, false), FontVariant::Regular);
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let json = serde_json::to_value(fill()).unwrap();
        assert_eq!(json["op"], "fillRect");
        assert_eq!(json["color"], "#FF0000");
    }
}
