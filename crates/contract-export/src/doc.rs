//! Word-processor export.
//!
//! Wraps the contract HTML in a multipart/related MIME envelope that word
//! processors open as a single document. Class-based styling is rewritten
//! inline because the format does not reliably honor a `<style>` block,
//! and the logo is already an inline data URI, so a single HTML part keeps
//! the file self-contained.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use contract_engine::PAGE_BREAK_HTML;

const BOUNDARY: &str = "CONTRACT-PART-BOUNDARY";
const PAGE_BREAK_INLINE: &str = r#"<div style="page-break-before: always;"></div>"#;

/// Builds the `.doc`-compatible document. Serve it as `application/msword`.
pub fn export_doc(html: &str) -> Vec<u8> {
    let inline = html.replace(PAGE_BREAK_HTML, PAGE_BREAK_INLINE);
    // Base64 keeps the accented French text safe from transfer mangling.
    let encoded = BASE64.encode(inline.as_bytes());

    let mut out = String::with_capacity(encoded.len() + encoded.len() / 38 + 512);
    out.push_str("MIME-Version: 1.0\r\n");
    out.push_str(&format!(
        "Content-Type: multipart/related; boundary=\"{}\"\r\n\r\n",
        BOUNDARY
    ));
    out.push_str(&format!("--{}\r\n", BOUNDARY));
    out.push_str("Content-Location: file:///C:/contrat/document.html\r\n");
    out.push_str("Content-Transfer-Encoding: base64\r\n");
    out.push_str("Content-Type: text/html; charset=\"utf-8\"\r\n\r\n");

    // Base64 output is ASCII, so byte offsets are char boundaries.
    let mut i = 0;
    while i < encoded.len() {
        let end = (i + 76).min(encoded.len());
        out.push_str(&encoded[i..end]);
        out.push_str("\r\n");
        i = end;
    }

    out.push_str(&format!("\r\n--{}--\r\n", BOUNDARY));
    out.into_bytes()
}
