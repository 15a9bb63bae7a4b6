use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

/// An embedded picture anchored at a cell's top-left corner
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    /// Unique identifier for the image (usually the path within the archive)
    pub id: String,
    /// MIME type reported by the reader (e.g., "image/png")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    /// Base64-encoded image data
    pub data: String,
    /// Width in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    /// Height in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<u32>,
    /// Top-left anchor cell
    pub anchor: ImageAnchor,
}

/// 0-indexed anchor cell of an image, as stored in drawing parts.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ImageAnchor {
    pub row: u32,
    pub col: u32,
}

impl EmbeddedImage {
    /// Decode the base64 payload.
    pub fn decode_data(&self) -> Result<Vec<u8>, base64::DecodeError> {
        BASE64.decode(self.data.trim())
    }

    /// Encode raw image bytes into an image record.
    pub fn from_bytes(id: impl Into<String>, bytes: &[u8], anchor: ImageAnchor) -> Self {
        let format = ImageFormat::from_magic_bytes(bytes);
        Self {
            id: id.into(),
            mime_type: Some(format.mime_type().to_string()),
            data: BASE64.encode(bytes),
            width_px: None,
            height_px: None,
            anchor,
        }
    }

    pub fn with_size(mut self, width_px: u32, height_px: u32) -> Self {
        self.width_px = Some(width_px);
        self.height_px = Some(height_px);
        self
    }
}

/// Image format/MIME type detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Unknown,
}

impl ImageFormat {
    /// Detect image format from magic bytes
    #[must_use]
    pub fn from_magic_bytes(data: &[u8]) -> Self {
        if data.len() < 4 {
            return Self::Unknown;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Self::Png;
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Self::Jpeg;
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Self::Gif;
        }

        if data.starts_with(b"BM") {
            return Self::Bmp;
        }

        Self::Unknown
    }

    /// Resolve from a MIME type such as `"image/png"`.
    #[must_use]
    pub fn from_mime_type(mime: &str) -> Self {
        match mime.trim().to_lowercase().as_str() {
            "image/png" => Self::Png,
            "image/jpeg" | "image/jpg" => Self::Jpeg,
            "image/gif" => Self::Gif,
            "image/bmp" => Self::Bmp,
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
            Self::Unknown => "application/octet-stream",
        }
    }
}
