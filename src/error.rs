use thiserror::Error;

/// Errors surfaced at the crate's collaborator boundaries (ingestion, OCR, export).
///
/// Store operations never produce these; they degrade to "nothing changed".
#[derive(Debug, Error)]
pub enum RedactError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("page rasterization failed: {0}")]
    Rasterize(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("export failed: {0}")]
    Export(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("font could not be loaded: {0}")]
    Font(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RedactError>;
