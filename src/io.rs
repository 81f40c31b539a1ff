use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::FileList;
use image::{ImageFormat, ImageError};
use image::codecs::jpeg::JpegEncoder;
use std::io::Cursor;
use base64::{Engine as _, engine::general_purpose};
use crate::error::{PaintError, Result};
use crate::scene::BackgroundImage;

const DATA_URL_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Splits a `data:<mime>;base64,<payload>` URL into its mime type and bytes.
pub fn parse_data_url(url: &str) -> Result<(String, Vec<u8>)> {
    let rest = url.trim().strip_prefix(DATA_URL_PREFIX).ok_or(PaintError::InvalidDataUrl)?;
    let (mime, payload) = rest.split_once(BASE64_MARKER).ok_or(PaintError::InvalidDataUrl)?;
    let bytes = general_purpose::STANDARD.decode(payload)?;
    Ok((mime.to_string(), bytes))
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("{}{}{}{}", DATA_URL_PREFIX, mime, BASE64_MARKER, general_purpose::STANDARD.encode(bytes))
}

pub fn guess_mime(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Png) => "image/png",
        Ok(ImageFormat::Jpeg) => "image/jpeg",
        Ok(ImageFormat::Gif) => "image/gif",
        Ok(ImageFormat::WebP) => "image/webp",
        Ok(ImageFormat::Bmp) => "image/bmp",
        _ => "application/octet-stream",
    }
}

pub fn probe_image_size(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = image::io::Reader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(ImageError::IoError)?;
    Ok(reader.into_dimensions()?)
}

/// Builds a background from a picture the user supplied, sized to its pixels.
///
/// Formats the decoder does not know (SVG and friends) are left to the
/// browser; their size stays unknown until the image element has loaded.
pub fn background_from_data_url(url: &str) -> Result<BackgroundImage> {
    let (mime, bytes) = parse_data_url(url)?;
    if !mime.starts_with("image/") {
        return Err(PaintError::NotAnImage(mime));
    }
    let src = url.trim().to_string();
    match probe_image_size(&bytes) {
        Ok((width, height)) => Ok(BackgroundImage::new(src, width as f64, height as f64)),
        Err(PaintError::Image(ImageError::Unsupported(_))) => {
            log::debug!("{} not probed locally, sizing from the browser", mime);
            Ok(BackgroundImage::r#unsized(src))
        }
        Err(e) => Err(e),
    }
}

/// Encodes an RGBA buffer as a JPEG data URL. Transparent pixels are
/// composited over white since JPEG carries no alpha.
pub fn encode_jpeg_data_url(rgba: &[u8], width: u32, height: u32, quality: u8) -> Result<String> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(PaintError::PixelBuffer { expected, actual: rgba.len() });
    }
    let mut rgb = Vec::with_capacity(expected / 4 * 3);
    for px in rgba.chunks_exact(4) {
        let alpha = px[3] as u32;
        for &c in &px[..3] {
            rgb.push(((c as u32 * alpha + 255 * (255 - alpha)) / 255) as u8);
        }
    }
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality.clamp(1, 100))
        .encode(&rgb, width, height, image::ColorType::Rgb8)?;
    Ok(encode_data_url("image/jpeg", &jpeg))
}

/// Reads the first selected file as a data URL. Resolves to `null` when nothing was picked.
#[wasm_bindgen]
pub async fn read_file_as_data_url(files: Option<FileList>) -> std::result::Result<JsValue, JsValue> {
    let Some(file) = files.and_then(|list| list.get(0)) else {
        return Ok(JsValue::NULL);
    };
    let buffer = JsFuture::from(file.array_buffer()).await?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    let declared = file.type_();
    let mime = if declared.is_empty() { guess_mime(&bytes).to_string() } else { declared };
    log::debug!("read {} ({} bytes, {})", file.name(), bytes.len(), mime);
    Ok(JsValue::from_str(&encode_data_url(&mime, &bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageOutputFormat, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::new(width, height));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png).unwrap();
        out
    }

    #[test]
    fn data_url_parses_mime_and_payload() {
        let url = encode_data_url("image/png", b"abc");
        let (mime, bytes) = parse_data_url(&url).unwrap();
        assert_eq!(mime, "image/png");
        assert_eq!(bytes, b"abc");
    }

    #[test]
    fn non_data_urls_are_rejected() {
        assert!(matches!(parse_data_url("https://example.com/a.png"), Err(PaintError::InvalidDataUrl)));
        assert!(matches!(parse_data_url("data:image/png,rawtext"), Err(PaintError::InvalidDataUrl)));
        assert!(matches!(parse_data_url("data:image/png;base64,@@@"), Err(PaintError::Base64(_))));
    }

    #[test]
    fn background_is_sized_from_the_picture() {
        let url = encode_data_url("image/png", &png_bytes(7, 3));
        let bg = background_from_data_url(&url).unwrap();
        assert_eq!((bg.width, bg.height, bg.angle), (7.0, 3.0, 0.0));
        assert_eq!(bg.src, url);
        assert_eq!(guess_mime(&png_bytes(1, 1)), "image/png");
    }

    // Smallest valid GIF89a: one transparent pixel.
    const GIF_1X1: &[u8] = &[
        0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00,
        0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x21, 0xf9, 0x04, 0x01, 0x00, 0x00, 0x00,
        0x00, 0x2c, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02,
        0x44, 0x01, 0x00, 0x3b,
    ];

    #[test]
    fn gif_background_is_sized() {
        let url = encode_data_url("image/gif", GIF_1X1);
        let bg = background_from_data_url(&url).unwrap();
        assert_eq!((bg.width, bg.height), (1.0, 1.0));
        assert!(bg.has_size());
        assert_eq!(guess_mime(GIF_1X1), "image/gif");
    }

    #[test]
    fn svg_background_is_left_to_the_browser() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="20" height="10"></svg>"#;
        let url = encode_data_url("image/svg+xml", svg);
        let bg = background_from_data_url(&url).unwrap();
        assert!(!bg.has_size());
        assert_eq!(bg.src, url);
    }

    #[test]
    fn truncated_png_background_is_an_image_error() {
        let mut bytes = png_bytes(2, 2);
        bytes.truncate(20);
        let url = encode_data_url("image/png", &bytes);
        assert!(matches!(background_from_data_url(&url), Err(PaintError::Image(_))));
    }

    #[test]
    fn non_image_payload_is_rejected() {
        let url = encode_data_url("text/plain", b"hello");
        assert!(matches!(background_from_data_url(&url), Err(PaintError::NotAnImage(m)) if m == "text/plain"));
    }

    #[test]
    fn jpeg_export_round_trips_dimensions() {
        let rgba = vec![128u8; 4 * 2 * 4];
        let url = encode_jpeg_data_url(&rgba, 4, 2, 80).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let (_, bytes) = parse_data_url(&url).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 2));
    }

    #[test]
    fn jpeg_export_checks_buffer_length() {
        assert!(matches!(
            encode_jpeg_data_url(&[0u8; 10], 2, 2, 80),
            Err(PaintError::PixelBuffer { expected: 16, actual: 10 })
        ));
    }
}
