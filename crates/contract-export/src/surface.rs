//! Off-screen render surface.
//!
//! Wraps a headless browser behind a scoped-resource discipline: each
//! rasterization opens a scratch page, renders into it, measures, captures,
//! and closes the page again on success and failure alike. Nothing about
//! the surface leaks between exports.

use std::time::Duration;

use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::emulation::SetDeviceMetricsOverrideParams;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use futures::StreamExt;
use image::RgbImage;
use tracing::{debug, info, instrument};

use crate::error::ExportError;
use crate::geometry::{DEVICE_SCALE, VIEWPORT_WIDTH_CSS};

/// Nominal A4 height in CSS pixels, used before the real height is known.
const INITIAL_VIEWPORT_HEIGHT_CSS: i64 = 1123;

const MEASURE_HEIGHT_JS: &str =
    "Math.max(document.body ? document.body.scrollHeight : 0, document.documentElement.scrollHeight)";

/// A headless browser dedicated to off-screen contract rendering.
pub struct RenderSurface {
    browser: Browser,
    _handle: tokio::task::JoinHandle<()>,
}

impl RenderSurface {
    /// Launch a surface with the default headless configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use contract_export::surface::RenderSurface;
    ///
    /// # async fn example() -> Result<(), contract_export::ExportError> {
    /// let surface = RenderSurface::launch().await?;
    /// let raster = surface.rasterize("<html><body>Bonjour</body></html>").await?;
    /// surface.close().await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn launch() -> Result<Self, ExportError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| ExportError::Launch(e.to_string()))?;
        Self::with_config(config).await
    }

    /// Launch a surface with a custom browser configuration.
    pub async fn with_config(config: BrowserConfig) -> Result<Self, ExportError> {
        info!("Launching render surface");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| ExportError::Launch(e.to_string()))?;

        // Spawn handler to process browser events
        let handle = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(Self {
            browser,
            _handle: handle,
        })
    }

    /// Render `html` at the fixed viewport width and capture the full
    /// document as one tall raster.
    ///
    /// Fails with [`ExportError::ZeroHeight`] when the content did not
    /// paint; a blank page must never be emitted silently.
    #[instrument(skip(self, html), fields(html_len = html.len()))]
    pub async fn rasterize(&self, html: &str) -> Result<RgbImage, ExportError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| ExportError::Render(format!("Failed to open scratch page: {}", e)))?;

        let result = self.rasterize_on(&page, html).await;

        // The scratch page goes away on success and failure alike.
        let _ = page.close().await;

        result
    }

    async fn rasterize_on(&self, page: &Page, html: &str) -> Result<RgbImage, ExportError> {
        // Lay out at the target width before content is set, so the
        // measured height matches what gets captured.
        self.set_metrics(page, INITIAL_VIEWPORT_HEIGHT_CSS).await?;

        page.set_content(html)
            .await
            .map_err(|e| ExportError::Render(format!("Failed to set content: {}", e)))?;

        // Inline images decode asynchronously; give layout a moment to settle.
        tokio::time::sleep(Duration::from_millis(120)).await;

        let height_css: u64 = page
            .evaluate(MEASURE_HEIGHT_JS)
            .await
            .map_err(|e| ExportError::Render(format!("Failed to measure content: {}", e)))?
            .into_value()
            .map_err(|e| ExportError::Render(format!("Invalid height measurement: {}", e)))?;

        debug!(height_css, "Measured off-screen content");

        if height_css == 0 {
            return Err(ExportError::ZeroHeight);
        }

        // Grow the surface to the full document so the capture spans
        // every row at the configured density.
        self.set_metrics(page, height_css as i64).await?;

        let png = page
            .screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
            )
            .await
            .map_err(|e| ExportError::Render(format!("Capture failed: {}", e)))?;

        let raster = image::load_from_memory(&png)
            .map_err(|e| ExportError::Raster(e.to_string()))?
            .to_rgb8();

        if raster.height() == 0 {
            return Err(ExportError::ZeroHeight);
        }

        debug!(
            width = raster.width(),
            height = raster.height(),
            "Captured contract raster"
        );
        Ok(raster)
    }

    async fn set_metrics(&self, page: &Page, height_css: i64) -> Result<(), ExportError> {
        let params = SetDeviceMetricsOverrideParams::builder()
            .width(VIEWPORT_WIDTH_CSS as i64)
            .height(height_css)
            .device_scale_factor(DEVICE_SCALE)
            .mobile(false)
            .build()
            .map_err(|e| ExportError::Render(format!("Failed to build metrics params: {}", e)))?;

        page.execute(params)
            .await
            .map_err(|e| ExportError::Render(format!("Failed to apply metrics: {}", e)))?;
        Ok(())
    }

    /// Shut the browser down. Teardown errors are ignored; a browser that
    /// is already gone counts as closed.
    pub async fn close(mut self) -> Result<(), ExportError> {
        debug!("Closing render surface");
        let _ = self.browser.close().await;
        let _ = self.browser.wait().await;
        Ok(())
    }
}
