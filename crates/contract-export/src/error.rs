use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to launch render surface: {0}")]
    Launch(String),

    #[error("Off-screen render failed: {0}")]
    Render(String),

    #[error("Rendered content has zero height")]
    ZeroHeight,

    #[error("Raster processing failed: {0}")]
    Raster(String),

    #[error("Document write failed: {0}")]
    Document(String),
}
