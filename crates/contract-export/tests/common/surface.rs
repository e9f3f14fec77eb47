//! Render-surface helpers for browser-backed tests.

use contract_export::{ExportError, RenderSurface};

/// Check if browser tests should be skipped (when Chrome isn't available)
pub fn should_skip() -> bool {
    std::env::var("SKIP_BROWSER_TESTS").is_ok()
}

/// Macro to skip test if Chrome isn't available
#[macro_export]
macro_rules! skip_if_no_chrome {
    () => {
        if surface::should_skip() {
            eprintln!("Skipping test: SKIP_BROWSER_TESTS is set");
            return;
        }
    };
}

/// Try to launch a surface, skip the test if Chrome is not installed
pub async fn require_surface() -> Option<RenderSurface> {
    match RenderSurface::launch().await {
        Ok(surface) => Some(surface),
        Err(ExportError::Launch(msg)) if msg.contains("Could not auto detect") => {
            eprintln!("Skipping: Chrome not installed ({})", msg);
            None
        }
        Err(e) => panic!("Unexpected surface error: {}", e),
    }
}
