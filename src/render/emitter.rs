//! Placements to paint commands.

use crate::cell_text::DisplayGrid;
use crate::config::LayoutConfig;
use crate::layout::{PageLayout, PlacedCell};
use crate::types::{BorderSide, CellStyle, PaintCommand, PaintPlan, Rect, SheetData};

use super::colors::{palette, resolve_color};
use super::RenderContext;

/// Turn a planned layout into an ordered paint plan.
///
/// Each page emits its `StartPage` marker, then its images, then every placed
/// cell as fill, borders (top, right, bottom, left) and text, in that order.
pub fn emit_paint_plan(
    sheet: &SheetData,
    texts: &DisplayGrid,
    layout: &PageLayout,
    ctx: &RenderContext,
    config: &LayoutConfig,
) -> PaintPlan {
    let geometry = layout.geometry;
    let mut commands = Vec::new();

    for page in &layout.pages {
        commands.push(PaintCommand::StartPage {
            number: page.number,
            width: geometry.width,
            height: geometry.height,
        });

        commands.extend(page.images.iter().map(|image| PaintCommand::PlaceImage {
            image_id: image.image_id.clone(),
            mime_type: image.mime_type.clone(),
            rect: image.rect,
        }));

        for placed in &page.cells {
            let Some(cell) = sheet.grid.cell(placed.row, placed.col) else {
                continue;
            };
            emit_cell(
                &mut commands,
                placed,
                &cell.style,
                texts.text(placed.row, placed.col),
                ctx,
                config,
            );
        }
    }

    log::debug!(
        "emitted {} paint commands over {} page(s)",
        commands.len(),
        layout.pages.len()
    );

    PaintPlan {
        page_width: geometry.width,
        page_height: geometry.height,
        commands,
    }
}

fn emit_cell(
    commands: &mut Vec<PaintCommand>,
    placed: &PlacedCell,
    style: &CellStyle,
    text: &str,
    ctx: &RenderContext,
    config: &LayoutConfig,
) {
    let rect = placed.rect;

    if let Some(fill) = style.fill.as_deref().filter(|f| !f.trim().is_empty()) {
        commands.push(PaintCommand::FillRect {
            rect,
            color: resolve_color(Some(fill), palette::BLACK),
        });
    }

    let border = &style.border;
    let (left, top, right, bottom) = (rect.x, rect.y, rect.right(), rect.bottom());
    let sides = [
        (&border.top, (left, top), (right, top)),
        (&border.right, (right, top), (right, bottom)),
        (&border.bottom, (left, bottom), (right, bottom)),
        (&border.left, (left, top), (left, bottom)),
    ];
    for (side, from, to) in sides {
        if let Some(side) = side.as_ref().filter(|s| s.is_visible()) {
            commands.push(stroke(side, from, to));
        }
    }

    if text.is_empty() {
        return;
    }
    let font = style.font_variant();
    let font_size = style.font_size_or(config.default_font_size);
    let (x, y, width) = text_box(&rect, font_size, config.padding);
    commands.push(PaintCommand::DrawText {
        text: text.to_string(),
        x,
        y,
        width,
        align: style.align_h,
        color: resolve_color(style.font.color.as_deref(), palette::BLACK),
        font,
        font_name: ctx.fonts.face(font).to_string(),
        font_size,
    });
}

fn stroke(side: &BorderSide, from: (f64, f64), to: (f64, f64)) -> PaintCommand {
    PaintCommand::StrokeLine {
        x1: from.0,
        y1: from.1,
        x2: to.0,
        y2: to.1,
        line_width: side.style.width(),
        color: resolve_color(side.color.as_deref(), palette::BLACK),
    }
}

/// Text box inside a cell rectangle: left edge, top of the line, and the
/// width alignment applies to. The line is centered vertically.
pub fn text_box(rect: &Rect, font_size: f64, padding: f64) -> (f64, f64, f64) {
    (
        rect.x + padding / 2.0,
        rect.y + (rect.height - font_size) / 2.0,
        rect.width - padding,
    )
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
    use crate::layout::{plan_layout, ColumnWidths, MergeMap};
    use crate::types::{BorderStyle, Borders, Cell, FontVariant, Grid, HAlign, MergeRegion};

    fn emit(sheet: &SheetData, widths: Vec<f64>, config: &LayoutConfig) -> PaintPlan {
        let merges = MergeMap::build(&sheet.merges, &sheet.grid);
        let texts = DisplayGrid::resolve(&sheet.grid, config.fixed_decimal_places);
        let widths = ColumnWidths::from_vec(widths);
        let layout = plan_layout(sheet, &merges, &widths, config);
        emit_paint_plan(sheet, &texts, &layout, &RenderContext::new(), config)
    }

    #[test]
    fn test_styled_cell_command_order() {
        let style = CellStyle {
            fill: Some("FFFFFF00".to_string()),
            border: Borders::all(BorderSide::new(BorderStyle::Medium)),
            align_h: HAlign::Right,
            ..CellStyle::bold()
        };
        let sheet = SheetData::new(Grid::new(vec![vec![Cell::text("Total").with_style(style)]]));
        let plan = emit(&sheet, vec![80.0], &LayoutConfig::default());

        let ops: Vec<_> = plan
            .commands
            .iter()
            .map(|c| serde_json::to_value(c).unwrap()["op"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(
            ops,
            [
                "startPage",
                "fillRect",
                "strokeLine",
                "strokeLine",
                "strokeLine",
                "strokeLine",
                "drawText"
            ]
        );

        assert_eq!(
            plan.commands[1],
            PaintCommand::FillRect {
                rect: Rect::new(30.0, 30.0, 80.0, 20.0),
                color: "#FFFF00".to_string(),
            }
        );
        // right edge
        assert_eq!(
            plan.commands[3],
            PaintCommand::StrokeLine {
                x1: 110.0,
                y1: 30.0,
                x2: 110.0,
                y2: 50.0,
                line_width: 2.0,
                color: "#000000".to_string(),
            }
        );
        match &plan.commands[6] {
            PaintCommand::DrawText {
                text,
                x,
                y,
                width,
                align,
                font,
                font_name,
                font_size,
                ..
            } => {
                assert_eq!(text, "Total");
                assert_eq!(*x, 35.0);
                assert_eq!(*y, 34.5);
                assert_eq!(*width, 70.0);
                assert_eq!(*align, HAlign::Right);
                assert_eq!(*font, FontVariant::Bold);
                assert_eq!(font_name, "Helvetica-Bold");
                assert_eq!(*font_size, 11.0);
            }
            other => panic!("expected drawText, got {other:?}"),
        }
    }

    #[test]
    fn test_none_borders_and_empty_text_emit_nothing() {
        let style = CellStyle {
            border: Borders {
                top: Some(BorderSide::new(BorderStyle::None)),
                bottom: Some(BorderSide {
                    style: BorderStyle::Thick,
                    color: Some("#FF0000".to_string()),
                }),
                ..Borders::default()
            },
            ..CellStyle::default()
        };
        let sheet = SheetData::new(Grid::new(vec![vec![Cell::default().with_style(style)]]));
        let plan = emit(&sheet, vec![50.0], &LayoutConfig::default());
        assert_eq!(plan.commands.len(), 2);
        assert!(matches!(
            &plan.commands[1],
            PaintCommand::StrokeLine { line_width, color, y1, .. }
                if *line_width == 3.0 && color == "#FF0000" && *y1 == 50.0
        ));
    }

    #[test]
    fn test_merged_anchor_text_spans_region() {
        let mut sheet = SheetData::new(Grid::new(vec![
            vec![Cell::text("Header"), Cell::text("hidden")],
            vec![Cell::text("a"), Cell::text("b")],
        ]));
        sheet.merges.push(MergeRegion::new(1, 1, 1, 2));
        let plan = emit(&sheet, vec![40.0, 60.0], &LayoutConfig::default());

        let texts: Vec<_> = plan
            .commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::DrawText { text, width, .. } => Some((text.as_str(), *width)),
                _ => None,
            })
            .collect();
        assert_eq!(texts, vec![("Header", 90.0), ("a", 30.0), ("b", 50.0)]);
    }

    #[test]
    fn test_font_size_and_color() {
        let mut style = CellStyle::default();
        style.font.size = Some(20.0);
        style.font.italic = true;
        style.font.color = Some("FF0000FF".to_string());
        let sheet = SheetData::new(Grid::new(vec![vec![Cell::text("x").with_style(style)]]));
        let plan = emit(&sheet, vec![50.0], &LayoutConfig::default());
        match &plan.commands[1] {
            PaintCommand::DrawText {
                y,
                color,
                font,
                font_name,
                font_size,
                ..
            } => {
                assert_eq!(*y, 30.0);
                assert_eq!(color, "#0000FF");
                assert_eq!(*font, FontVariant::Italic);
                assert_eq!(font_name, "Helvetica-Oblique");
                assert_eq!(*font_size, 20.0);
            }
            other => panic!("expected drawText, got {other:?}"),
        }
    }

    #[test]
    fn test_text_box() {
        let (x, y, w) = text_box(&Rect::new(30.0, 30.0, 80.0, 20.0), 11.0, 10.0);
        assert_eq!((x, y, w), (35.0, 34.5, 70.0));
    }
}
