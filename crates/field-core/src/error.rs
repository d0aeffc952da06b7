use thiserror::Error;

/// Failure while fetching or decoding vector artwork.
///
/// None of these stop the scene: the affected glyph or heart template is
/// simply never shown.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid svg: {0}")]
    Svg(String),
    #[error("artwork has no drawable paths")]
    Empty,
}

/// Construction-time errors for the field itself.
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("message list is empty")]
    NoMessages,
    #[error("invalid raster size {width}x{height}")]
    RasterSize { width: u32, height: u32 },
}
