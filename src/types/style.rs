use serde::{Deserialize, Serialize};

use super::FontVariant;

/// Resolved cell style
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CellStyle {
    pub font: FontStyle,
    /// Background fill color
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    pub border: Borders,
    pub align_h: HAlign,
}

impl CellStyle {
    /// Face selected from the bold/italic flags.
    pub fn font_variant(&self) -> FontVariant {
        FontVariant::from_flags(self.font.bold, self.font.italic)
    }

    /// Font size, or `default` when unset or not a usable size.
    pub fn font_size_or(&self, default: f64) -> f64 {
        self.font
            .size
            .filter(|s| s.is_finite() && *s > 0.0)
            .unwrap_or(default)
    }

    pub fn bold() -> Self {
        Self {
            font: FontStyle {
                bold: true,
                ..FontStyle::default()
            },
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FontStyle {
    /// Font family requested by the workbook. Layout always uses the
    /// rendering context's family; this is carried through for backends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
    pub bold: bool,
    pub italic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// The four independently styled sides of a cell border
#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Borders {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<BorderSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<BorderSide>,
}

impl Borders {
    /// Same side on all four edges.
    pub fn all(side: BorderSide) -> Self {
        Self {
            top: Some(side.clone()),
            right: Some(side.clone()),
            bottom: Some(side.clone()),
            left: Some(side),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BorderSide {
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl BorderSide {
    pub fn new(style: BorderStyle) -> Self {
        Self { style, color: None }
    }

    /// A side is drawn unless its style is `none`.
    pub fn is_visible(&self) -> bool {
        self.style != BorderStyle::None
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
    Dashed,
    Dotted,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderStyle {
    /// Stroke width in points
    pub fn width(self) -> f64 {
        match self {
            Self::Thin | Self::Hair => 1.0,
            Self::Medium => 2.0,
            Self::Thick | Self::Double => 3.0,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum HAlign {
    #[default]
    Left,
    Center,
    Right,
}
