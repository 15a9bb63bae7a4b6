//! xlplan - spreadsheet grid to page paint plan
//!
//! Lays out a decoded spreadsheet sheet for page-based output:
//! - Cell display text from values, formula results and number format hints
//! - Merged regions, drawn once by their anchor cell
//! - Column widths sized to the measured text
//! - Fixed-size pages with optional row pagination
//! - Embedded images anchored to cells
//!
//! The result is a [`PaintPlan`]: an ordered list of absolute-coordinate
//! paint commands that any [`RenderBackend`] can replay.
//!
//! # Usage (Rust)
//!
//! ```no_run
//! use xlplan::{convert, LayoutConfig, RenderContext, SheetData};
//!
//! # fn main() -> xlplan::error::Result<()> {
//! let sheet: SheetData = serde_json::from_str(r#"{"grid": [[{"value": {"type": "text", "data": "Hi"}}]]}"#)?;
//! let plan = convert(&sheet, &LayoutConfig::default(), &mut RenderContext::new())?;
//! assert_eq!(plan.page_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { plan_sheet_json } from 'xlplan';
//! await init();
//! const plan = JSON.parse(plan_sheet_json(sheetJson, JSON.stringify({ enablePagination: true })));
//! ```

pub mod cell_ref;
pub mod cell_text;
pub mod config;
pub mod error;
pub mod layout;
pub mod numfmt;
pub mod render;
pub mod types;

use wasm_bindgen::prelude::*;

pub use config::LayoutConfig;
pub use error::XlplanError;
pub use render::{render_plan, RecordingBackend, RenderBackend, RenderContext};
pub use types::*;

use cell_text::DisplayGrid;
use error::Result;
use layout::{plan_layout, solve_column_widths, MergeMap};
use render::emit_paint_plan;

/// Lay out a sheet and produce its paint plan.
///
/// Runs every stage in order: display text and merge map, column widths,
/// page placement, command emission. `ctx` is mutable only for its text
/// measurement cache, so reusing one context across sheets saves work.
///
/// # Errors
/// Returns [`XlplanError::InvalidConfig`] if `config` fails validation.
pub fn convert(
    sheet: &SheetData,
    config: &LayoutConfig,
    ctx: &mut RenderContext,
) -> Result<PaintPlan> {
    config.validate()?;

    let merges = MergeMap::build(&sheet.merges, &sheet.grid);
    let texts = DisplayGrid::resolve(&sheet.grid, config.fixed_decimal_places);
    let widths = solve_column_widths(&sheet.grid, &texts, &merges, ctx, config);
    let layout = plan_layout(sheet, &merges, &widths, config);
    Ok(emit_paint_plan(sheet, &texts, &layout, ctx, config))
}

/// Lay out a sheet and replay the plan into `backend`.
///
/// # Errors
/// Fails on an invalid config, or with [`XlplanError::RenderBackend`] when the
/// backend rejects a command. Nothing is replayed if layout fails.
pub fn render_sheet<B: RenderBackend>(
    sheet: &SheetData,
    config: &LayoutConfig,
    ctx: &mut RenderContext,
    backend: &mut B,
) -> Result<PaintPlan> {
    let plan = convert(sheet, config, ctx)?;
    render_plan(&plan, backend)?;
    Ok(plan)
}

/// Parse a sheet from JSON and return its paint plan as JSON.
///
/// # Errors
/// Returns [`XlplanError::UpstreamParse`] if the sheet JSON is malformed.
pub fn plan_from_json(json: &str, config: &LayoutConfig) -> Result<String> {
    let sheet: SheetData =
        serde_json::from_str(json).map_err(|e| XlplanError::upstream("sheet JSON", e))?;
    let plan = convert(&sheet, config, &mut RenderContext::new())?;
    Ok(serde_json::to_string(&plan)?)
}

fn parse_config_json(config_json: Option<&str>) -> Result<LayoutConfig> {
    match config_json.map(str::trim).filter(|s| !s.is_empty()) {
        Some(json) => {
            serde_json::from_str(json).map_err(|e| XlplanError::upstream("layout config JSON", e))
        }
        None => Ok(LayoutConfig::default()),
    }
}

/// Plan a sheet given as JSON and return the paint plan as a JSON string
///
/// # Arguments
/// * `json` - The decoded sheet (`{grid, merges?, images?}`)
/// * `config_json` - Optional partial `LayoutConfig`; missing fields use defaults
///
/// # Errors
/// Returns an error if either JSON document is invalid or the config is rejected.
#[wasm_bindgen]
pub fn plan_sheet_json(
    json: &str,
    config_json: Option<String>,
) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();
    let config =
        parse_config_json(config_json.as_deref()).map_err(|e| JsValue::from_str(&e.to_string()))?;
    plan_from_json(json, &config).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Plan a sheet given as a JS object and return the paint plan as a `JsValue`
///
/// This skips JSON string round-trips when the caller already holds objects.
/// Pass `undefined` or `null` for `config` to use defaults.
///
/// # Errors
/// Returns an error if the sheet or config object has the wrong shape.
#[wasm_bindgen]
pub fn plan_sheet_to_js(
    sheet: JsValue,
    config: JsValue,
) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let sheet: SheetData = serde_wasm_bindgen::from_value(sheet)
        .map_err(|e| JsValue::from_str(&format!("Invalid sheet data: {e}")))?;
    let config: LayoutConfig = if config.is_undefined() || config.is_null() {
        LayoutConfig::default()
    } else {
        serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid layout config: {e}")))?
    };

    let plan = convert(&sheet, &config, &mut RenderContext::new())
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&plan)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config_json() {
        assert_eq!(parse_config_json(None).unwrap(), LayoutConfig::default());
        assert_eq!(parse_config_json(Some("  ")).unwrap(), LayoutConfig::default());
        let config = parse_config_json(Some(r#"{"margin": 5}"#)).unwrap();
        assert!((config.margin - 5.0).abs() < f64::EPSILON);
        assert!(matches!(
            parse_config_json(Some("{")),
            Err(XlplanError::UpstreamParse { .. })
        ));
    }

    #[test]
    fn test_convert_rejects_invalid_config() {
        let config = LayoutConfig {
            row_height: 0.0,
            ..LayoutConfig::default()
        };
        let err = convert(&SheetData::default(), &config, &mut RenderContext::new()).unwrap_err();
        assert!(matches!(err, XlplanError::InvalidConfig(_)));
    }

    #[test]
    fn test_render_sheet_replays_plan() {
        let sheet = SheetData::new(Grid::new(vec![vec![Cell::text("a")]]));
        let mut backend = RecordingBackend::new();
        let plan = render_sheet(
            &sheet,
            &LayoutConfig::default(),
            &mut RenderContext::new(),
            &mut backend,
        )
        .unwrap();
        assert_eq!(backend.commands(), plan.commands.as_slice());
    }

    #[test]
    fn test_version() {
        assert_eq!(version(), env!("CARGO_PKG_VERSION"));
    }
}
