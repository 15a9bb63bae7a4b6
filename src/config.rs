//! Layout configuration.
//!
//! All lengths are in points. Every field has a default so a partial JSON
//! object (or `{}`) deserializes into a usable config.

use serde::{Deserialize, Serialize};

use crate::error::{Result, XlplanError};

/// Largest page edge most PDF consumers accept (200 in).
pub const DEFAULT_MAX_PAGE_EDGE: f64 = 14_400.0;
/// A4 portrait width.
pub const A4_WIDTH: f64 = 595.28;
/// A4 portrait height.
pub const A4_HEIGHT: f64 = 841.89;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LayoutConfig {
    /// Split rows across fixed-height pages.
    pub enable_pagination: bool,
    /// Decimal places for fixed-decimal formats without an explicit zero run.
    pub fixed_decimal_places: usize,
    pub max_page_width: f64,
    pub max_page_height: f64,
    pub min_page_width: f64,
    pub min_page_height: f64,
    /// Raise page dimensions to the configured minimum.
    pub enforce_minimum_size: bool,
    pub margin: f64,
    pub row_height: f64,
    /// Horizontal padding inside a cell; also the initial width of every column.
    pub padding: f64,
    /// Extra slack added to each measured text width.
    pub extra_space: f64,
    pub default_font_size: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            enable_pagination: false,
            fixed_decimal_places: 2,
            max_page_width: DEFAULT_MAX_PAGE_EDGE,
            max_page_height: DEFAULT_MAX_PAGE_EDGE,
            min_page_width: A4_WIDTH,
            min_page_height: A4_HEIGHT,
            enforce_minimum_size: false,
            margin: 30.0,
            row_height: 20.0,
            padding: 10.0,
            extra_space: 10.0,
            default_font_size: 11.0,
        }
    }
}

impl LayoutConfig {
    pub fn paginated(mut self) -> Self {
        self.enable_pagination = true;
        self
    }

    /// Reject configurations the planner cannot lay out.
    pub fn validate(&self) -> Result<()> {
        let lengths = [
            ("maxPageWidth", self.max_page_width),
            ("maxPageHeight", self.max_page_height),
            ("minPageWidth", self.min_page_width),
            ("minPageHeight", self.min_page_height),
            ("margin", self.margin),
            ("rowHeight", self.row_height),
            ("padding", self.padding),
            ("extraSpace", self.extra_space),
            ("defaultFontSize", self.default_font_size),
        ];
        for (name, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(XlplanError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.row_height <= 0.0 {
            return Err(XlplanError::InvalidConfig(
                "rowHeight must be positive".to_string(),
            ));
        }
        if self.enforce_minimum_size
            && (self.max_page_width < self.min_page_width
                || self.max_page_height < self.min_page_height)
        {
            return Err(XlplanError::InvalidConfig(
                "maximum page size is smaller than the minimum".to_string(),
            ));
        }
        Ok(())
    }
}
