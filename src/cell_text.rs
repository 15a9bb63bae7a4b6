//! Display text resolution for raw cell values.
//!
//! The resolver is a strict priority chain: formula errors beat formula
//! results, results beat cached text, and so on down to stringifying whatever
//! the reading collaborator could not classify.

use crate::numfmt::{format_iso_date, format_number};
use crate::types::{plain_text, Cell, CellValue, FormulaCell, FormulaValue, Grid};

/// Placeholder for shared-formula dependents that arrive without any text.
pub const SHARED_FORMULA_PLACEHOLDER: &str = "0";

/// Resolve the exact string a cell displays.
pub fn resolve_display_text(cell: &Cell, default_decimals: usize) -> String {
    match &cell.value {
        CellValue::Empty => String::new(),
        CellValue::Formula(formula) => {
            resolve_formula(formula, cell.rendered.as_deref(), default_decimals)
        }
        CellValue::Number { value, format } => format_number(*value, format, default_decimals),
        CellValue::RichText(runs) => plain_text(runs),
        CellValue::Hyperlink { text, .. } => text.clone(),
        CellValue::Date(iso) => format_iso_date(iso),
        CellValue::Other { text, raw } => match text.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => stringify_raw(raw),
        },
        CellValue::Text(s) => s.clone(),
        CellValue::Boolean(b) => bool_text(*b).to_string(),
    }
}

/// Display text of every grid cell, resolved once and shared by the width
/// solver and the emitter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayGrid {
    rows: Vec<Vec<String>>,
}

impl DisplayGrid {
    pub fn resolve(grid: &Grid, default_decimals: usize) -> Self {
        let rows = grid
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| resolve_display_text(cell, default_decimals))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Text at a 1-based position; empty outside the grid.
    pub fn text(&self, row: u32, col: u32) -> &str {
        let lookup = || {
            let r = usize::try_from(row).ok()?.checked_sub(1)?;
            let c = usize::try_from(col).ok()?.checked_sub(1)?;
            self.rows.get(r)?.get(c)
        };
        lookup().map_or("", String::as_str)
    }
}

fn resolve_formula(
    formula: &FormulaCell,
    rendered: Option<&str>,
    default_decimals: usize,
) -> String {
    if let Some(code) = formula.error.as_deref().filter(|c| !c.is_empty()) {
        return format!("#{}", code.trim_start_matches('#').to_uppercase());
    }

    match &formula.result {
        Some(FormulaValue::Number(n)) => format_number(*n, &formula.format, default_decimals),
        Some(FormulaValue::Text(s)) => s.clone(),
        Some(FormulaValue::Boolean(b)) => bool_text(*b).to_string(),
        None => {
            log::debug!(
                "formula ={} has no evaluated result, using fallback text",
                formula.formula
            );
            let cached = formula
                .cached_text
                .as_deref()
                .filter(|t| !t.is_empty())
                .or_else(|| rendered.filter(|t| !t.is_empty()));
            match cached {
                Some(text) => text.to_string(),
                None if formula.shared => SHARED_FORMULA_PLACEHOLDER.to_string(),
                None => format!("={}", formula.formula),
            }
        }
    }
}

fn bool_text(b: bool) -> &'static str {
    if b {
        "TRUE"
    } else {
        "FALSE"
    }
}

fn stringify_raw(raw: &serde_json::Value) -> String {
    match raw {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map_or_else(|| n.to_string(), crate::numfmt::format_natural),
        other => other.to_string(),
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
    use crate::types::RichTextRun;
    use serde_json::json;

    fn formula(f: &str) -> FormulaCell {
        FormulaCell {
            formula: f.to_string(),
            ..FormulaCell::default()
        }
    }

    fn resolve(value: CellValue) -> String {
        resolve_display_text(&Cell::new(value), 2)
    }

    #[test]
    fn test_empty() {
        assert_eq!(resolve(CellValue::Empty), "");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(resolve_display_text(&Cell::number(700.0, "0.00"), 2), "700.00");
        assert_eq!(resolve_display_text(&Cell::number(700.0, ""), 2), "700");
        assert_eq!(resolve_display_text(&Cell::number(3.5, ""), 2), "3.5");
    }

    #[test]
    fn test_formula_error_wins_over_result() {
        let mut f = formula("1/0");
        f.error = Some("div/0!".to_string());
        f.result = Some(FormulaValue::Number(1.0));
        assert_eq!(resolve(CellValue::Formula(f)), "#DIV/0!");

        let mut f = formula("A1");
        f.error = Some("#ref!".to_string());
        assert_eq!(resolve(CellValue::Formula(f)), "#REF!");
    }

    #[test]
    fn test_formula_numeric_result_uses_format() {
        let mut f = formula("SUM(A1:A3)");
        f.result = Some(FormulaValue::Number(12.5));
        f.format = "0.000".to_string();
        assert_eq!(resolve(CellValue::Formula(f.clone())), "12.500");

        f.format = String::new();
        assert_eq!(resolve(CellValue::Formula(f)), "12.5");
    }

    #[test]
    fn test_formula_non_numeric_result() {
        let mut f = formula("CONCAT(A1,B1)");
        f.result = Some(FormulaValue::Text("ab".to_string()));
        assert_eq!(resolve(CellValue::Formula(f)), "ab");

        let mut f = formula("A1>1");
        f.result = Some(FormulaValue::Boolean(true));
        assert_eq!(resolve(CellValue::Formula(f)), "TRUE");
    }

    #[test]
    fn test_formula_without_result_fallbacks() {
        let mut f = formula("A1*2");
        f.cached_text = Some("84".to_string());
        assert_eq!(resolve(CellValue::Formula(f)), "84");

        let cell = Cell {
            rendered: Some("42".to_string()),
            ..Cell::new(CellValue::Formula(formula("A1*2")))
        };
        assert_eq!(resolve_display_text(&cell, 2), "42");

        let mut shared = formula("A1*2");
        shared.shared = true;
        shared.cached_text = Some(String::new());
        assert_eq!(resolve(CellValue::Formula(shared)), SHARED_FORMULA_PLACEHOLDER);

        assert_eq!(resolve(CellValue::Formula(formula("A1*2"))), "=A1*2");
    }

    #[test]
    fn test_rich_text_concatenates_runs() {
        let runs = vec![
            RichTextRun::plain("Hello"),
            RichTextRun::plain(", "),
            RichTextRun::plain("world"),
        ];
        assert_eq!(resolve(CellValue::RichText(runs)), "Hello, world");
    }

    #[test]
    fn test_hyperlink_and_date() {
        let link = CellValue::Hyperlink {
            text: "Docs".to_string(),
            target: Some("https://example.com".to_string()),
        };
        assert_eq!(resolve(link), "Docs");
        let date = CellValue::Date("2023-07-04T00:00:00.000Z".to_string());
        assert_eq!(resolve(date), "7/4/2023");
        assert_eq!(resolve(CellValue::Date("garbage".to_string())), "garbage");
    }

    #[test]
    fn test_other_values() {
        let with_text = CellValue::Other {
            text: Some("shown".to_string()),
            raw: json!({"text": "shown", "x": 1}),
        };
        assert_eq!(resolve(with_text), "shown");

        let empty_text = CellValue::Other {
            text: Some(String::new()),
            raw: json!(12),
        };
        assert_eq!(resolve(empty_text), "12");

        let object = CellValue::Other {
            text: None,
            raw: json!({"a": 1}),
        };
        assert_eq!(resolve(object), r#"{"a":1}"#);
    }

    #[test]
    fn test_display_grid() {
        let grid = Grid::new(vec![
            vec![Cell::text("Name"), Cell::number(2.0, "0.0")],
            vec![Cell::new(CellValue::Boolean(true))],
        ]);
        let texts = DisplayGrid::resolve(&grid, 2);
        assert_eq!(texts.text(1, 1), "Name");
        assert_eq!(texts.text(1, 2), "2.0");
        assert_eq!(texts.text(2, 1), "TRUE");
        assert_eq!(texts.text(2, 2), "");
        assert_eq!(texts.text(0, 1), "");
        assert_eq!(texts.text(9, 9), "");
    }

    #[test]
    fn test_plain_text_and_boolean() {
        assert_eq!(resolve(CellValue::Text("abc".to_string())), "abc");
        assert_eq!(resolve(CellValue::Boolean(false)), "FALSE");
    }
}
