//! Page sizing, row placement and page breaks.
//!
//! The planner walks rows top to bottom, assigning each drawn cell an absolute
//! rectangle on a page. Nothing is drawn here; [`crate::render::emit_paint_plan`]
//! turns the resulting [`PageLayout`] into paint commands.

use crate::config::LayoutConfig;
use crate::error::{Result, XlplanError};
use crate::types::{EmbeddedImage, ImageFormat, MergeRegion, Rect, SheetData};

use super::{ColumnWidths, MergeMap, MergeMembership};

/// Points per CSS pixel.
pub const PX_TO_PT: f64 = 0.75;

/// Row-walk state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Placing,
    NewPage,
}

/// Final page dimensions, shared by every page of a plan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    /// Rows are split across pages. Set either by configuration or because
    /// the content did not fit the maximum page height.
    pub paginate: bool,
}

impl PageGeometry {
    /// Size pages for a table of `total_rows` rows and `table_width` points.
    pub fn compute(total_rows: usize, table_width: f64, config: &LayoutConfig) -> Self {
        let content_width = table_width + 2.0 * config.margin;
        let content_height = total_rows as f64 * config.row_height + 2.0 * config.margin;

        let mut width = content_width.min(config.max_page_width);
        let (mut height, paginate) = if config.enable_pagination {
            (config.max_page_height, true)
        } else if content_height > config.max_page_height {
            log::info!(
                "content height {content_height:.2}pt exceeds the maximum page height {:.2}pt, paginating",
                config.max_page_height
            );
            (config.max_page_height, true)
        } else {
            (content_height, false)
        };

        if config.enforce_minimum_size {
            width = width.max(config.min_page_width);
            height = height.max(config.min_page_height);
        }

        Self {
            width,
            height,
            paginate,
        }
    }
}

/// A drawn cell (or merge anchor) with its absolute rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    /// 1-based grid position
    pub row: u32,
    pub col: u32,
    pub rect: Rect,
    /// Region this cell anchors, if merged.
    pub merge: Option<MergeRegion>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedImage {
    pub image_id: String,
    pub mime_type: String,
    pub rect: Rect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPage {
    /// 1-based page number
    pub number: u32,
    pub images: Vec<PlacedImage>,
    pub cells: Vec<PlacedCell>,
    rows: usize,
}

impl PlannedPage {
    fn new(number: u32) -> Self {
        Self {
            number,
            images: Vec::new(),
            cells: Vec::new(),
            rows: 0,
        }
    }

    /// Number of grid rows placed on this page.
    pub fn row_count(&self) -> usize {
        self.rows
    }
}

/// Where a grid row landed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowOrigin {
    /// Index into [`PageLayout::pages`]
    pub page: usize,
    pub y: f64,
}

/// Output of the planner: page geometry plus per-page placements.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub geometry: PageGeometry,
    /// Always holds at least one page.
    pub pages: Vec<PlannedPage>,
    /// One entry per grid row, in row order.
    pub row_origins: Vec<RowOrigin>,
}

impl PageLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Every placed cell across all pages, in placement order.
    pub fn cells(&self) -> impl Iterator<Item = &PlacedCell> {
        self.pages.iter().flat_map(|p| p.cells.iter())
    }
}

/// Place every row, cell and image of a sheet.
pub fn plan_layout(
    sheet: &SheetData,
    merges: &MergeMap,
    widths: &ColumnWidths,
    config: &LayoutConfig,
) -> PageLayout {
    let grid = &sheet.grid;
    let geometry = PageGeometry::compute(grid.total_rows(), widths.total(), config);
    let row_height = config.row_height;
    let bottom_limit = geometry.height - config.margin;

    let last_row = u32::try_from(grid.total_rows()).unwrap_or(u32::MAX);

    let mut pages = vec![PlannedPage::new(1)];
    let mut row_origins = Vec::with_capacity(grid.total_rows());
    let mut state = PlacementState::Placing;
    let mut y = config.margin;

    for (row_cells, row) in grid.rows().iter().zip(1u32..) {
        let page_has_rows = pages.last().is_some_and(|p| p.rows > 0);
        if geometry.paginate && y + row_height > bottom_limit && page_has_rows {
            state = PlacementState::NewPage;
        }
        if state == PlacementState::NewPage {
            let number = u32::try_from(pages.len() + 1).unwrap_or(u32::MAX);
            pages.push(PlannedPage::new(number));
            y = config.margin;
            state = PlacementState::Placing;
        }

        let page_index = pages.len().saturating_sub(1);
        let Some(page) = pages.last_mut() else {
            break;
        };

        let mut x = config.margin;
        for (_, col) in row_cells.iter().zip(1u32..) {
            let col_width = widths.width(col);
            let placed = match merges.membership(row, col) {
                Some(MergeMembership::Secondary(_)) => None,
                Some(MergeMembership::Anchor(region)) => {
                    let spanned_rows = region.bottom_row.min(last_row).saturating_sub(row) + 1;
                    Some(PlacedCell {
                        row,
                        col,
                        rect: Rect::new(
                            x,
                            y,
                            widths.span_width(region.left_col, region.right_col),
                            row_height * f64::from(spanned_rows),
                        ),
                        merge: Some(*region),
                    })
                }
                None => Some(PlacedCell {
                    row,
                    col,
                    rect: Rect::new(x, y, col_width, row_height),
                    merge: None,
                }),
            };
            if let Some(cell) = placed {
                page.cells.push(cell);
            }
            x += col_width;
        }

        page.rows += 1;
        row_origins.push(RowOrigin {
            page: page_index,
            y,
        });
        y += row_height;
    }

    for image in &sheet.images {
        match place_image(image, widths, &row_origins, config) {
            Ok((page_index, placed)) => {
                if let Some(page) = pages.get_mut(page_index) {
                    page.images.push(placed);
                }
            }
            Err(e) => log::warn!("skipping image {:?}: {e}", image.id),
        }
    }

    log::debug!(
        "planned {} rows on {} page(s) of {:.2}x{:.2}pt",
        row_origins.len(),
        pages.len(),
        geometry.width,
        geometry.height
    );

    PageLayout {
        geometry,
        pages,
        row_origins,
    }
}

/// Position an image at its anchor cell's top-left corner.
fn place_image(
    image: &EmbeddedImage,
    widths: &ColumnWidths,
    row_origins: &[RowOrigin],
    config: &LayoutConfig,
) -> Result<(usize, PlacedImage)> {
    let anchor = image.anchor;
    let origin = usize::try_from(anchor.row)
        .ok()
        .and_then(|r| row_origins.get(r))
        .ok_or_else(|| {
            XlplanError::ImagePlacement(format!("anchor row {} is outside the grid", anchor.row))
        })?;
    if usize::try_from(anchor.col).map_or(true, |c| c >= widths.len()) {
        return Err(XlplanError::ImagePlacement(format!(
            "anchor column {} is outside the grid",
            anchor.col
        )));
    }

    let (width_px, height_px) = match (image.width_px, image.height_px) {
        (Some(w), Some(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(XlplanError::ImagePlacement(
                "missing or zero pixel extent".to_string(),
            ))
        }
    };

    let bytes = image
        .decode_data()
        .map_err(|e| XlplanError::ImagePlacement(format!("invalid base64 data: {e}")))?;
    let format = match image.mime_type.as_deref().map(ImageFormat::from_mime_type) {
        Some(known) if known != ImageFormat::Unknown => known,
        _ => ImageFormat::from_magic_bytes(&bytes),
    };
    if format == ImageFormat::Unknown {
        return Err(XlplanError::ImagePlacement(
            "unrecognized image format".to_string(),
        ));
    }

    // 0-based anchor column: columns before it are 1..=anchor.col
    let x = config.margin + widths.offset(anchor.col.saturating_add(1));
    let rect = Rect::new(
        x,
        origin.y,
        f64::from(width_px) * PX_TO_PT,
        f64::from(height_px) * PX_TO_PT,
    );

    Ok((
        origin.page,
        PlacedImage {
            image_id: image.id.clone(),
            mime_type: format.mime_type().to_string(),
            rect,
        },
    ))
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
    use crate::types::{Cell, Grid, ImageAnchor};

    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn sheet(rows: usize, cols: usize) -> SheetData {
        let grid = Grid::new(
            (0..rows)
                .map(|r| (0..cols).map(|c| Cell::text(format!("{r}:{c}"))).collect())
                .collect(),
        );
        SheetData::new(grid)
    }

    fn widths(cols: usize, w: f64) -> ColumnWidths {
        ColumnWidths::from_vec(vec![w; cols])
    }

    fn small_pages() -> LayoutConfig {
        LayoutConfig {
            enable_pagination: true,
            max_page_height: 100.0,
            margin: 10.0,
            row_height: 20.0,
            ..LayoutConfig::default()
        }
    }

    #[test]
    fn test_geometry_fits_content() {
        let config = LayoutConfig::default();
        let geometry = PageGeometry::compute(3, 200.0, &config);
        assert_eq!(geometry.width, 260.0);
        assert_eq!(geometry.height, 120.0);
        assert!(!geometry.paginate);
    }

    #[test]
    fn test_geometry_caps_and_forces_pagination() {
        let config = LayoutConfig {
            max_page_width: 500.0,
            max_page_height: 300.0,
            ..LayoutConfig::default()
        };
        let geometry = PageGeometry::compute(100, 1000.0, &config);
        assert_eq!(geometry.width, 500.0);
        assert_eq!(geometry.height, 300.0);
        assert!(geometry.paginate);
    }

    #[test]
    fn test_geometry_enforces_minimum() {
        let config = LayoutConfig {
            enforce_minimum_size: true,
            ..LayoutConfig::default()
        };
        let geometry = PageGeometry::compute(1, 50.0, &config);
        assert_eq!(geometry.width, crate::config::A4_WIDTH);
        assert_eq!(geometry.height, crate::config::A4_HEIGHT);
    }

    #[test]
    fn test_pagination_breaks_after_four_rows() {
        // Usable height 100 - 2*10 = 80 holds four 20pt rows.
        let sheet = sheet(9, 1);
        let merges = MergeMap::default();
        let layout = plan_layout(&sheet, &merges, &widths(1, 50.0), &small_pages());

        assert_eq!(layout.page_count(), 3);
        let counts: Vec<_> = layout.pages.iter().map(PlannedPage::row_count).collect();
        assert_eq!(counts, vec![4, 4, 1]);
        assert_eq!(layout.row_origins[4].page, 1);
        assert_eq!(layout.row_origins[4].y, 10.0);
        assert_eq!(layout.row_origins[3].y, 70.0);
        let numbers: Vec<_> = layout.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_oversized_row_does_not_open_empty_page() {
        let config = LayoutConfig {
            row_height: 200.0,
            ..small_pages()
        };
        let layout = plan_layout(&sheet(2, 1), &MergeMap::default(), &widths(1, 50.0), &config);
        assert_eq!(layout.page_count(), 2);
        assert!(layout.pages.iter().all(|p| p.row_count() == 1));
    }

    #[test]
    fn test_unpaginated_is_single_page() {
        let layout = plan_layout(
            &sheet(50, 2),
            &MergeMap::default(),
            &widths(2, 40.0),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.page_count(), 1);
        assert_eq!(layout.pages[0].cells.len(), 100);
        assert_eq!(layout.row_origins[49].y, 30.0 + 49.0 * 20.0);
    }

    #[test]
    fn test_empty_grid_has_one_page() {
        let layout = plan_layout(
            &SheetData::default(),
            &MergeMap::default(),
            &ColumnWidths::default(),
            &LayoutConfig::default(),
        );
        assert_eq!(layout.page_count(), 1);
        assert!(layout.pages[0].cells.is_empty());
        assert_eq!(layout.geometry.width, 60.0);
    }

    #[test]
    fn test_merge_anchor_rect_and_skipped_secondaries() {
        let mut sheet = sheet(3, 3);
        let region = MergeRegion::new(1, 1, 2, 2);
        sheet.merges.push(region);
        let merges = MergeMap::build(&sheet.merges, &sheet.grid);
        let widths = ColumnWidths::from_vec(vec![30.0, 40.0, 50.0]);
        let layout = plan_layout(&sheet, &merges, &widths, &LayoutConfig::default());

        // 9 cells - 3 secondaries
        assert_eq!(layout.pages[0].cells.len(), 6);
        let anchor = &layout.pages[0].cells[0];
        assert_eq!(anchor.merge, Some(region));
        assert_eq!(anchor.rect, Rect::new(30.0, 30.0, 70.0, 40.0));

        // C1 still starts after both spanned columns
        let c1 = layout.cells().find(|c| c.row == 1 && c.col == 3).unwrap();
        assert_eq!(c1.rect.x, 100.0);
        let c2 = layout.cells().find(|c| c.row == 2 && c.col == 3).unwrap();
        assert_eq!(c2.rect, Rect::new(100.0, 50.0, 50.0, 20.0));
        assert!(layout.cells().all(|c| !(c.row == 2 && c.col < 3)));
    }

    fn png(anchor: ImageAnchor) -> EmbeddedImage {
        EmbeddedImage::from_bytes("xl/media/image1.png", &PNG_HEADER, anchor).with_size(40, 20)
    }

    #[test]
    fn test_image_placement() {
        let mut sheet = sheet(3, 3);
        sheet.images.push(png(ImageAnchor { row: 2, col: 1 }));
        let layout = plan_layout(
            &sheet,
            &MergeMap::default(),
            &widths(3, 50.0),
            &LayoutConfig::default(),
        );
        let image = &layout.pages[0].images[0];
        assert_eq!(image.rect, Rect::new(80.0, 70.0, 30.0, 15.0));
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_image_follows_its_row_to_later_page() {
        let mut sheet = sheet(6, 1);
        sheet.images.push(png(ImageAnchor { row: 5, col: 0 }));
        let layout = plan_layout(&sheet, &MergeMap::default(), &widths(1, 50.0), &small_pages());
        assert!(layout.pages[0].images.is_empty());
        let image = &layout.pages[1].images[0];
        assert_eq!(image.rect.y, 30.0);
    }

    #[test]
    fn test_unplaceable_images_are_skipped() {
        let mut sheet = sheet(2, 2);
        sheet.images.push(png(ImageAnchor { row: 9, col: 0 }));
        sheet.images.push(png(ImageAnchor { row: 0, col: 9 }));
        let mut no_size = png(ImageAnchor { row: 0, col: 0 });
        no_size.width_px = None;
        sheet.images.push(no_size);
        let mut bad_data = png(ImageAnchor { row: 0, col: 0 });
        bad_data.data = "***".to_string();
        sheet.images.push(bad_data);
        let unknown = EmbeddedImage::from_bytes("blob", b"nope", ImageAnchor { row: 0, col: 0 })
            .with_size(1, 1);
        sheet.images.push(unknown);

        let layout = plan_layout(
            &sheet,
            &MergeMap::default(),
            &widths(2, 50.0),
            &LayoutConfig::default(),
        );
        assert!(layout.pages[0].images.is_empty());
        assert_eq!(layout.pages[0].cells.len(), 4);
    }

    #[test]
    fn test_image_format_sniffed_when_mime_missing() {
        let widths = widths(1, 50.0);
        let origins = [RowOrigin { page: 0, y: 30.0 }];
        let mut image = png(ImageAnchor { row: 0, col: 0 });
        image.mime_type = None;
        let (_, placed) = place_image(&image, &widths, &origins, &LayoutConfig::default()).unwrap();
        assert_eq!(placed.mime_type, "image/png");
    }
}
