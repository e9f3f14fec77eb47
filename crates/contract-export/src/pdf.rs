//! Raster-band PDF writer.
//!
//! Slices the full-height contract raster into page bands, JPEG-encodes
//! each band and writes one A4 page per band with the image drawn flush to
//! the margin origin.

use chrono::NaiveDate;
use image::codecs::jpeg::JpegEncoder;
use image::{imageops, ImageEncoder, RgbImage};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::ExportError;
use crate::geometry::{
    band_height_px, band_plan, mm_to_pt, MARGIN_MM, PAGE_HEIGHT_PT, PAGE_WIDTH_PT,
    PRINTABLE_WIDTH_MM,
};

const JPEG_QUALITY: u8 = 90;

/// One encoded page band, ready to embed.
pub struct PageBand {
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Document info dictionary values.
#[derive(Debug, Clone)]
pub struct PdfMetadata {
    pub title: String,
    pub author: String,
    pub creator: String,
    pub created: NaiveDate,
}

/// Cuts the raster into page bands and JPEG-encodes each one.
pub fn encode_bands(raster: &RgbImage) -> Result<Vec<PageBand>, ExportError> {
    let band_px = band_height_px(raster.width());
    let plan = band_plan(raster.height(), band_px);
    if plan.is_empty() {
        return Err(ExportError::ZeroHeight);
    }

    let mut bands = Vec::with_capacity(plan.len());
    for band in plan {
        let view = imageops::crop_imm(raster, 0, band.y, raster.width(), band.height).to_image();
        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
            .write_image(view.as_raw(), view.width(), view.height(), image::ColorType::Rgb8)
            .map_err(|e| ExportError::Raster(e.to_string()))?;
        bands.push(PageBand {
            jpeg,
            width: view.width(),
            height: view.height(),
        });
    }
    Ok(bands)
}

/// Writes the paginated PDF: one page per band, A4 with fixed margins,
/// plus an info dictionary.
pub fn build_pdf(bands: Vec<PageBand>, meta: &PdfMetadata) -> Result<Vec<u8>, ExportError> {
    if bands.is_empty() {
        return Err(ExportError::ZeroHeight);
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let margin_pt = mm_to_pt(MARGIN_MM);
    let printable_w_pt = mm_to_pt(PRINTABLE_WIDTH_MM);
    let page_total = bands.len();

    let mut page_ids = Vec::with_capacity(page_total);
    for band in bands {
        let image_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"XObject".to_vec())),
            ("Subtype", Object::Name(b"Image".to_vec())),
            ("Width", Object::Integer(band.width as i64)),
            ("Height", Object::Integer(band.height as i64)),
            ("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            ("BitsPerComponent", Object::Integer(8)),
            ("Filter", Object::Name(b"DCTDecode".to_vec())),
        ]);
        // JPEG data is already compressed; lopdf must not deflate it again.
        let image_id =
            doc.add_object(Stream::new(image_dict, band.jpeg).with_compression(false));

        // Drawn at the printable width; the height keeps the band's aspect
        // ratio, so a short final band is short on the page, not stretched.
        let drawn_h_pt = printable_w_pt * band.height as f64 / band.width as f64;
        let y_pt = PAGE_HEIGHT_PT - margin_pt - drawn_h_pt;

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Real(printable_w_pt as f32),
                        Object::Real(0.0),
                        Object::Real(0.0),
                        Object::Real(drawn_h_pt as f32),
                        Object::Real(margin_pt as f32),
                        Object::Real(y_pt as f32),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Band".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            content
                .encode()
                .map_err(|e| ExportError::Document(e.to_string()))?,
        ));

        let resources = Dictionary::from_iter(vec![(
            "XObject",
            Object::Dictionary(Dictionary::from_iter(vec![(
                "Band",
                Object::Reference(image_id),
            )])),
        )]);

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(PAGE_WIDTH_PT as f32),
                    Object::Real(PAGE_HEIGHT_PT as f32),
                ]),
            ),
            ("Resources", Object::Dictionary(resources)),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_total as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let info = Dictionary::from_iter(vec![
        ("Title", text_string(&meta.title)),
        ("Author", text_string(&meta.author)),
        ("Creator", text_string(&meta.creator)),
        (
            "CreationDate",
            Object::string_literal(format!("D:{}000000Z", meta.created.format("%Y%m%d"))),
        ),
    ]);
    let info_id = doc.add_object(info);
    doc.trailer.set("Info", Object::Reference(info_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ExportError::Document(format!("Save failed: {}", e)))?;
    Ok(buffer)
}

// PDF text strings are PDFDocEncoding unless marked UTF-16BE with a BOM;
// anything beyond ASCII takes the UTF-16 route.
fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        return Object::string_literal(s);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, lopdf::StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use pretty_assertions::assert_eq;

    fn meta() -> PdfMetadata {
        PdfMetadata {
            title: "Contrat de location - Jean Dupont".to_string(),
            author: "Residence Les Oliviers".to_string(),
            creator: "gestloc".to_string(),
            created: NaiveDate::from_ymd_opt(2026, 8, 24).unwrap(),
        }
    }

    // 200px wide raster: band height is floor(200 * 277 / 190) = 291 rows
    fn raster(height: u32) -> RgbImage {
        RgbImage::from_pixel(200, height, Rgb([240, 240, 250]))
    }

    #[test]
    fn test_encode_bands_covers_raster() {
        let bands = encode_bands(&raster(1000)).unwrap();
        assert_eq!(bands.len(), 4);
        assert_eq!(
            bands.iter().map(|b| b.height).collect::<Vec<_>>(),
            vec![291, 291, 291, 127]
        );
        assert!(bands.iter().all(|b| b.width == 200));
        assert!(bands.iter().all(|b| !b.jpeg.is_empty()));
    }

    #[test]
    fn test_build_pdf_one_page_per_band() {
        let bands = encode_bands(&raster(1000)).unwrap();
        let pdf = build_pdf(bands, &meta()).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 4);
    }

    #[test]
    fn test_short_content_is_one_page() {
        let bands = encode_bands(&raster(100)).unwrap();
        assert_eq!(bands.len(), 1);
        let pdf = build_pdf(bands, &meta()).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn test_no_bands_fails() {
        let result = build_pdf(Vec::new(), &meta());
        assert!(matches!(result, Err(ExportError::ZeroHeight)));
    }

    #[test]
    fn test_metadata_is_written() {
        let bands = encode_bands(&raster(100)).unwrap();
        let pdf = build_pdf(bands, &meta()).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();

        let info_id = match doc.trailer.get(b"Info").unwrap() {
            Object::Reference(id) => *id,
            other => panic!("Info should be a reference, got {:?}", other),
        };
        let info = doc.get_object(info_id).unwrap().as_dict().unwrap();
        let title = match info.get(b"Title").unwrap() {
            Object::String(bytes, _) => String::from_utf8(bytes.clone()).unwrap(),
            other => panic!("Title should be a string, got {:?}", other),
        };
        assert!(title.contains("Jean Dupont"));
    }

    #[test]
    fn test_ascii_metadata_stays_literal() {
        match text_string("Jean Dupont") {
            Object::String(bytes, lopdf::StringFormat::Literal) => {
                assert_eq!(bytes, b"Jean Dupont".to_vec());
            }
            other => panic!("expected literal string, got {:?}", other),
        }
    }

    #[test]
    fn test_accented_metadata_uses_utf16_bom() {
        match text_string("Résidence") {
            Object::String(bytes, _) => {
                assert_eq!(&bytes[..2], &[0xFE, 0xFF]);
            }
            other => panic!("expected string, got {:?}", other),
        }
    }
}
