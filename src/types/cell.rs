use serde::{Deserialize, Serialize};

use super::{CellStyle, RichTextRun};

/// A single cell's raw value and style, as handed over by the reading collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    #[serde(default)]
    pub value: CellValue,
    #[serde(default)]
    pub style: CellStyle,
    /// Text the reading collaborator already rendered for this cell, if any.
    /// Only consulted for formulas that carry no evaluated result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rendered: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::new(CellValue::Text(s.into()))
    }

    pub fn number(value: f64, format: impl Into<String>) -> Self {
        Self::new(CellValue::Number {
            value,
            format: format.into(),
        })
    }
}

/// Raw cell value. Exactly one kind is active at a time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    /// A number with its number-format hint (e.g. `"0.00"`, empty for General).
    Number {
        value: f64,
        #[serde(default)]
        format: String,
    },
    Boolean(bool),
    RichText(Vec<RichTextRun>),
    Formula(FormulaCell),
    Hyperlink {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target: Option<String>,
    },
    /// ISO 8601 timestamp (`YYYY-MM-DDTHH:mm:ss.sssZ`).
    Date(String),
    /// Any other object-shaped value the collaborator could not classify.
    Other {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        #[serde(default)]
        raw: serde_json::Value,
    },
}

/// A formula cell with whatever the collaborator managed to evaluate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormulaCell {
    /// Formula source without the leading `=`.
    pub formula: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<FormulaValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cached_text: Option<String>,
    /// Error code such as `"div/0!"` or `"#REF!"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number-format hint applied to numeric results.
    #[serde(default)]
    pub format: String,
    /// Whether this cell is a dependent of a shared formula.
    #[serde(default)]
    pub shared: bool,
}

/// Evaluated result of a formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormulaValue {
    Number(f64),
    Boolean(bool),
    Text(String),
}
