//! Structured error types for xlplan.

/// All errors that can occur while planning or replaying a sheet layout.
#[derive(Debug, thiserror::Error)]
pub enum XlplanError {
    /// Malformed cell reference or range string.
    #[error("Invalid cell reference: {0:?}")]
    InvalidReference(String),

    /// The decoded sheet handed over by the reading collaborator could not be parsed.
    #[error("Failed to read sheet data ({context}): {source}")]
    UpstreamParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The rendering collaborator rejected a paint command.
    #[error("Render backend failed: {0}")]
    RenderBackend(String),

    /// An embedded image could not be placed. Absorbed by the planner.
    #[error("Image placement failed: {0}")]
    ImagePlacement(String),

    /// Layout configuration is inconsistent.
    #[error("Invalid layout config: {0}")]
    InvalidConfig(String),

    /// JSON serialization of the paint plan.
    #[error("JSON serialization: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlplanError>;

impl XlplanError {
    /// Wrap a deserialization failure from upstream sheet data with context.
    pub fn upstream(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::UpstreamParse {
            context: context.into(),
            source,
        }
    }
}

#[cfg(target_arch = "wasm32")]
impl From<XlplanError> for wasm_bindgen::JsValue {
    fn from(e: XlplanError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
