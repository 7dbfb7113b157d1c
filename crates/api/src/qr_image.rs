//! QR code rendering for scan URLs.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;

/// Minimum rendered edge length, in SVG user units.
const MIN_DIMENSION: u32 = 256;

/// Render `content` as a QR code and wrap the SVG in a `data:` URL.
pub fn svg_data_url(content: &str) -> Result<String, qrcode::types::QrError> {
    let code = QrCode::new(content.as_bytes())?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();
    Ok(format!("data:image/svg+xml;base64,{}", STANDARD.encode(image)))
}
