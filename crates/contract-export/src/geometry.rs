//! Page geometry and band math for the raster exporter.
//!
//! The contract is rendered once at a fixed viewport width, then the tall
//! raster is cut into consecutive horizontal bands, one band per output
//! page. All slicing decisions live here as pure integer math so they can
//! be tested without a browser.

/// CSS pixel width of the off-screen viewport. 210mm at 96dpi.
pub const VIEWPORT_WIDTH_CSS: u32 = 794;

/// Raster density multiplier applied on top of the CSS viewport.
pub const DEVICE_SCALE: f64 = 2.0;

/// A4 portrait in PDF points.
pub const PAGE_WIDTH_PT: f64 = 595.28;
pub const PAGE_HEIGHT_PT: f64 = 841.89;

/// Uniform page margin.
pub const MARGIN_MM: f64 = 10.0;

/// Printable area: A4 (210mm x 297mm) minus the margin on each side.
pub const PRINTABLE_WIDTH_MM: f64 = 190.0;
pub const PRINTABLE_HEIGHT_MM: f64 = 277.0;

pub fn mm_to_pt(mm: f64) -> f64 {
    mm * 72.0 / 25.4
}

/// One horizontal slice of the full-height raster, destined for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    /// First raster row of the band.
    pub y: u32,
    /// Band height in raster rows. Equal to the page band height for every
    /// band except possibly the last.
    pub height: u32,
}

/// Raster rows that fit one page's printable height, given the raster
/// width. The band keeps the printable area's aspect ratio so the image is
/// never stretched; rounding goes down so a band never overflows the page.
pub fn band_height_px(raster_width: u32) -> u32 {
    (raster_width as f64 * PRINTABLE_HEIGHT_MM / PRINTABLE_WIDTH_MM).floor() as u32
}

/// Number of pages needed to consume `raster_height` rows: `ceil(H / P)`.
pub fn page_count(raster_height: u32, band_px: u32) -> u32 {
    if band_px == 0 {
        return 0;
    }
    raster_height.div_ceil(band_px)
}

/// Cuts `raster_height` rows into consecutive bands of at most `band_px`
/// rows. Concatenating the bands top to bottom reconstructs the raster
/// exactly. Zero sizes are rejected upstream; here they yield an empty plan.
pub fn band_plan(raster_height: u32, band_px: u32) -> Vec<Band> {
    if band_px == 0 || raster_height == 0 {
        return Vec::new();
    }
    let mut bands = Vec::with_capacity(page_count(raster_height, band_px) as usize);
    let mut y = 0;
    while y < raster_height {
        let height = band_px.min(raster_height - y);
        bands.push(Band { y, height });
        y += height;
    }
    bands
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // 794 CSS px at device scale 2
    const RASTER_WIDTH: u32 = 1588;

    #[test]
    fn test_mm_to_pt() {
        assert!((mm_to_pt(25.4) - 72.0).abs() < 1e-9);
        assert!((mm_to_pt(MARGIN_MM) - 28.346_456_692_913_385).abs() < 1e-9);
    }

    #[test]
    fn test_band_height_for_default_raster() {
        // 1588 * 277 / 190 = 2315.13..., floored
        assert_eq!(band_height_px(RASTER_WIDTH), 2315);
    }

    #[test]
    fn test_page_count_is_ceiling() {
        assert_eq!(page_count(1, 2315), 1);
        assert_eq!(page_count(2315, 2315), 1);
        assert_eq!(page_count(2316, 2315), 2);
        assert_eq!(page_count(4630, 2315), 2);
        assert_eq!(page_count(4631, 2315), 3);
    }

    #[test]
    fn test_short_content_is_a_single_band() {
        let plan = band_plan(1000, 2315);
        assert_eq!(plan, vec![Band { y: 0, height: 1000 }]);
    }

    #[test]
    fn test_plan_covers_height_exactly() {
        let plan = band_plan(5000, 2315);
        assert_eq!(
            plan,
            vec![
                Band { y: 0, height: 2315 },
                Band { y: 2315, height: 2315 },
                Band { y: 4630, height: 370 },
            ]
        );
    }

    #[test]
    fn test_exact_multiple_has_no_stub_band() {
        let plan = band_plan(4630, 2315);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[1].height, 2315);
    }

    #[test]
    fn test_zero_height_yields_empty_plan() {
        assert!(band_plan(0, 2315).is_empty());
        assert_eq!(page_count(0, 2315), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn plan_reconstructs_raster_exactly(
                height in 1u32..200_000,
                band_px in 1u32..5_000,
            ) {
                let plan = band_plan(height, band_px);

                prop_assert_eq!(plan.len() as u32, page_count(height, band_px));

                // Contiguous, full-height coverage
                let mut expected_y = 0;
                for band in &plan {
                    prop_assert_eq!(band.y, expected_y);
                    prop_assert!(band.height <= band_px);
                    expected_y += band.height;
                }
                prop_assert_eq!(expected_y, height);

                // Only the final band may fall short of the page height
                for band in &plan[..plan.len() - 1] {
                    prop_assert_eq!(band.height, band_px);
                }
            }
        }
    }
}
