//! Render backend trait for page-based rendering surfaces.
//!
//! A paint plan is replayed into any [`RenderBackend`] with [`render_plan`].
//! Document writers (PDF, SVG, a canvas bridge) implement the trait;
//! [`RecordingBackend`] simply captures what it is asked to draw.

use crate::error::{Result, XlplanError};
use crate::types::{FontVariant, HAlign, PaintCommand, PaintPlan, Rect};

/// A single line of text to draw, borrowed from a [`PaintCommand::DrawText`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Left edge of the alignment box
    pub x: f64,
    /// Top of the text line
    pub y: f64,
    /// Width of the alignment box
    pub width: f64,
    pub align: HAlign,
    pub color: &'a str,
    pub font: FontVariant,
    pub font_name: &'a str,
    pub font_size: f64,
}

/// Trait for render backends
///
/// Implementations handle the actual drawing operations for different
/// output formats. Coordinates are absolute points with the origin at the
/// top-left corner of the current page.
pub trait RenderBackend {
    /// Error reported by the backend; wrapped as [`XlplanError::RenderBackend`].
    type Error: std::fmt::Display;

    /// Begin a new page. Called once before any drawing on that page.
    fn start_page(&mut self, number: u32, width: f64, height: f64)
        -> std::result::Result<(), Self::Error>;

    fn fill_rect(&mut self, rect: &Rect, color: &str) -> std::result::Result<(), Self::Error>;

    fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        line_width: f64,
        color: &str,
    ) -> std::result::Result<(), Self::Error>;

    fn draw_text(&mut self, run: &TextRun<'_>) -> std::result::Result<(), Self::Error>;

    /// Place an embedded image. `image_id` refers to the sheet's image list.
    fn place_image(
        &mut self,
        image_id: &str,
        mime_type: &str,
        rect: &Rect,
    ) -> std::result::Result<(), Self::Error>;

    /// Called once after the last command.
    fn finish(&mut self) -> std::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// Replay every command of a plan, in order, then finish the document.
///
/// Stops at the first backend error.
pub fn render_plan<B: RenderBackend>(plan: &PaintPlan, backend: &mut B) -> Result<()> {
    for (index, command) in plan.commands.iter().enumerate() {
        replay(command, backend).map_err(|e| {
            XlplanError::RenderBackend(format!("command {index} ({}): {e}", command_name(command)))
        })?;
    }
    backend
        .finish()
        .map_err(|e| XlplanError::RenderBackend(format!("finish: {e}")))
}

fn replay<B: RenderBackend>(
    command: &PaintCommand,
    backend: &mut B,
) -> std::result::Result<(), B::Error> {
    match command {
        PaintCommand::StartPage {
            number,
            width,
            height,
        } => backend.start_page(*number, *width, *height),
        PaintCommand::FillRect { rect, color } => backend.fill_rect(rect, color),
        PaintCommand::StrokeLine {
            x1,
            y1,
            x2,
            y2,
            line_width,
            color,
        } => backend.stroke_line((*x1, *y1), (*x2, *y2), *line_width, color),
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
        } => backend.draw_text(&TextRun {
            text,
            x: *x,
            y: *y,
            width: *width,
            align: *align,
            color,
            font: *font,
            font_name,
            font_size: *font_size,
        }),
        PaintCommand::PlaceImage {
            image_id,
            mime_type,
            rect,
        } => backend.place_image(image_id, mime_type, rect),
    }
}

fn command_name(command: &PaintCommand) -> &'static str {
    match command {
        PaintCommand::StartPage { .. } => "startPage",
        PaintCommand::FillRect { .. } => "fillRect",
        PaintCommand::StrokeLine { .. } => "strokeLine",
        PaintCommand::DrawText { .. } => "drawText",
        PaintCommand::PlaceImage { .. } => "placeImage",
    }
}

/// Backend that records every call as a [`PaintCommand`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingBackend {
    commands: Vec<PaintCommand>,
    finished: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<PaintCommand> {
        self.commands
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl RenderBackend for RecordingBackend {
    type Error = std::convert::Infallible;

    fn start_page(
        &mut self,
        number: u32,
        width: f64,
        height: f64,
    ) -> std::result::Result<(), Self::Error> {
        self.commands.push(PaintCommand::StartPage {
            number,
            width,
            height,
        });
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rect, color: &str) -> std::result::Result<(), Self::Error> {
        self.commands.push(PaintCommand::FillRect {
            rect: *rect,
            color: color.to_string(),
        });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        from: (f64, f64),
        to: (f64, f64),
        line_width: f64,
        color: &str,
    ) -> std::result::Result<(), Self::Error> {
        self.commands.push(PaintCommand::StrokeLine {
            x1: from.0,
            y1: from.1,
            x2: to.0,
            y2: to.1,
            line_width,
            color: color.to_string(),
        });
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun<'_>) -> std::result::Result<(), Self::Error> {
        self.commands.push(PaintCommand::DrawText {
            text: run.text.to_string(),
            x: run.x,
            y: run.y,
            width: run.width,
            align: run.align,
            color: run.color.to_string(),
            font: run.font,
            font_name: run.font_name.to_string(),
            font_size: run.font_size,
        });
        Ok(())
    }

    fn place_image(
        &mut self,
        image_id: &str,
        mime_type: &str,
        rect: &Rect,
    ) -> std::result::Result<(), Self::Error> {
        self.commands.push(PaintCommand::PlaceImage {
            image_id: image_id.to_string(),
            mime_type: mime_type.to_string(),
            rect: *rect,
        });
        Ok(())
    }

    fn finish(&mut self) -> std::result::Result<(), Self::Error> {
        self.finished = true;
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn sample_plan() -> PaintPlan {
        PaintPlan {
            page_width: 100.0,
            page_height: 80.0,
            commands: vec![
                PaintCommand::StartPage {
                    number: 1,
                    width: 100.0,
                    height: 80.0,
                },
                PaintCommand::FillRect {
                    rect: Rect::new(10.0, 10.0, 40.0, 20.0),
                    color: "#FFFF00".to_string(),
                },
                PaintCommand::StrokeLine {
                    x1: 10.0,
                    y1: 10.0,
                    x2: 50.0,
                    y2: 10.0,
                    line_width: 1.0,
                    color: "#000000".to_string(),
                },
                PaintCommand::DrawText {
                    text: "Hi".to_string(),
                    x: 15.0,
                    y: 14.5,
                    width: 30.0,
                    align: HAlign::Center,
                    color: "#000000".to_string(),
                    font: FontVariant::Bold,
                    font_name: "Helvetica-Bold".to_string(),
                    font_size: 11.0,
                },
                PaintCommand::PlaceImage {
                    image_id: "img".to_string(),
                    mime_type: "image/png".to_string(),
                    rect: Rect::new(10.0, 30.0, 15.0, 15.0),
                },
            ],
        }
    }

    #[test]
    fn test_recording_backend_replays_exactly() {
        let plan = sample_plan();
        let mut backend = RecordingBackend::new();
        render_plan(&plan, &mut backend).unwrap();
        assert!(backend.is_finished());
        assert_eq!(backend.into_commands(), plan.commands);
    }

    /// Rejects every text run.
    struct NoText {
        pages: u32,
    }

    impl RenderBackend for NoText {
        type Error = String;

        fn start_page(&mut self, _: u32, _: f64, _: f64) -> std::result::Result<(), String> {
            self.pages += 1;
            Ok(())
        }
        fn fill_rect(&mut self, _: &Rect, _: &str) -> std::result::Result<(), String> {
            Ok(())
        }
        fn stroke_line(
            &mut self,
            _: (f64, f64),
            _: (f64, f64),
            _: f64,
            _: &str,
        ) -> std::result::Result<(), String> {
            Ok(())
        }
        fn draw_text(&mut self, run: &TextRun<'_>) -> std::result::Result<(), String> {
            Err(format!("no glyphs for {:?}", run.font_name))
        }
        fn place_image(&mut self, _: &str, _: &str, _: &Rect) -> std::result::Result<(), String> {
            Ok(())
        }
    }

    #[test]
    fn test_backend_error_is_wrapped() {
        let mut backend = NoText { pages: 0 };
        let err = render_plan(&sample_plan(), &mut backend).unwrap_err();
        match err {
            XlplanError::RenderBackend(msg) => {
                assert!(msg.contains("command 3 (drawText)"));
                assert!(msg.contains("Helvetica-Bold"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(backend.pages, 1);
    }
}
