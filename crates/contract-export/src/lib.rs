//! Contract export pipeline.
//!
//! Turns assembled contract HTML into downloadable documents, in two
//! variants:
//! - a paginated raster PDF: the HTML is rendered off-screen in a headless
//!   browser at A4 width, captured as one tall raster, sliced into page
//!   bands and written out one band per page;
//! - a word-processor `.doc` wrapper around the same HTML.
//!
//! The band math in [`geometry`] and the writers in [`pdf`] and [`doc`] are
//! pure and testable without a browser; only [`surface`] talks to Chrome.

pub mod doc;
pub mod error;
pub mod geometry;
pub mod pdf;
pub mod surface;

pub use doc::export_doc;
pub use error::ExportError;
pub use pdf::{build_pdf, encode_bands, PageBand, PdfMetadata};
pub use surface::RenderSurface;

/// Full raster-PDF pipeline: render, slice, write.
pub async fn export_pdf(
    surface: &RenderSurface,
    html: &str,
    meta: &PdfMetadata,
) -> Result<Vec<u8>, ExportError> {
    let raster = surface.rasterize(html).await?;
    let bands = pdf::encode_bands(&raster)?;
    pdf::build_pdf(bands, meta)
}
