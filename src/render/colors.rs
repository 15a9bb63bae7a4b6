//! Color normalization for paint commands.
//!
//! Readers hand over colors as `#RRGGBB`, bare `RRGGBB`, the `AARRGGBB` form
//! stored in workbook styles, or CSS `rgb()`/`rgba()` strings. Paint commands
//! always carry either `#RRGGBB` or `rgba(...)`.

/// A CSS color string (e.g., "#FF0000", "rgba(255, 0, 0, 0.50)")
pub type CssColor = String;

/// Parse a color string and normalize it to CSS format.
///
/// Supports formats:
/// - "#RRGGBB" (hex without alpha)
/// - "#AARRGGBB" (alpha first)
/// - "RRGGBB" / "AARRGGBB" (no # prefix)
/// - "rgb(r, g, b)" and "rgba(r, g, b, a)" (validated, passed through)
pub fn parse_color(s: &str) -> Option<CssColor> {
    let s = s.trim();
    if s.starts_with("rgb") {
        return parse_rgb_function(s).then(|| s.to_string());
    }
    parse_hex_color(s.strip_prefix('#').unwrap_or(s))
}

/// Color for a paint command: the normalized value, the raw string when it is
/// not in a known notation (e.g. a named color), or `fallback` when unset.
pub fn resolve_color(raw: Option<&str>, fallback: &str) -> CssColor {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => fallback.to_string(),
        Some(s) => parse_color(s).unwrap_or_else(|| {
            log::debug!("passing through unrecognized color {s:?}");
            s.to_string()
        }),
    }
}

fn parse_hex_color(hex: &str) -> Option<CssColor> {
    let byte = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|h| u8::from_str_radix(h, 16).ok())
    };
    match hex.len() {
        6 => Some(format!("#{:02X}{:02X}{:02X}", byte(0..2)?, byte(2..4)?, byte(4..6)?)),
        8 => {
            let a = byte(0..2)?;
            let (r, g, b) = (byte(2..4)?, byte(4..6)?, byte(6..8)?);
            if a == 255 {
                Some(format!("#{r:02X}{g:02X}{b:02X}"))
            } else {
                Some(format!("rgba({r}, {g}, {b}, {:.2})", f64::from(a) / 255.0))
            }
        }
        _ => None,
    }
}

fn parse_rgb_function(s: &str) -> bool {
    let (inner, arity) = if let Some(rest) = s.strip_prefix("rgba(") {
        (rest, 4)
    } else if let Some(rest) = s.strip_prefix("rgb(") {
        (rest, 3)
    } else {
        return false;
    };
    let Some(inner) = inner.strip_suffix(')') else {
        return false;
    };
    let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
    if parts.len() != arity {
        return false;
    }
    parts.iter().enumerate().all(|(i, p)| {
        if i == 3 {
            p.parse::<f64>().is_ok_and(|a| (0.0..=1.0).contains(&a))
        } else {
            p.parse::<u8>().is_ok()
        }
    })
}

/// Fixed colors used by the emitter.
pub mod palette {
    pub const BLACK: &str = "#000000";
}
