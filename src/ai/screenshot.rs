use base64::Engine;
use image::{DynamicImage, ImageFormat, RgbaImage};

use super::ExtractError;
use crate::clipboard::ClipboardImage;

/// Encode a clipboard bitmap as an opaque RGB PNG.
///
/// The alpha channel is dropped, not composited.
pub fn encode_png(image: &ClipboardImage) -> Result<Vec<u8>, ExtractError> {
    let size_error = || ExtractError::ImageSize {
        width: image.width,
        height: image.height,
        len: image.rgba.len(),
    };
    let width = u32::try_from(image.width).map_err(|_| size_error())?;
    let height = u32::try_from(image.height).map_err(|_| size_error())?;
    let rgba = RgbaImage::from_raw(width, height, image.rgba.clone()).ok_or_else(size_error)?;

    let rgb = DynamicImage::ImageRgba8(rgba).to_rgb8();
    let mut buf = std::io::Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// `data:` URL suitable for an `image_url` content part.
pub fn data_url(image: &ClipboardImage) -> Result<String, ExtractError> {
    let png = encode_png(image)?;
    let encoded = base64::engine::general_purpose::STANDARD.encode(png);
    Ok(format!("data:image/png;base64,{}", encoded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translucent(width: usize, height: usize) -> ClipboardImage {
        let mut rgba = Vec::with_capacity(width * height * 4);
        for i in 0..width * height {
            rgba.extend_from_slice(&[200, (i % 256) as u8, 40, 64]);
        }
        ClipboardImage { width, height, rgba }
    }

    #[test]
    fn png_is_opaque_rgb() {
        let png = encode_png(&translucent(3, 2)).unwrap();
        let decoded = image::load_from_memory_with_format(&png, ImageFormat::Png).unwrap();
        assert_eq!(decoded.color(), image::ColorType::Rgb8);

        let rgb = decoded.to_rgb8();
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(1, 0).0, [200, 1, 40]);
    }

    #[test]
    fn data_url_round_trips_through_base64() {
        let url = data_url(&translucent(2, 2)).unwrap();
        let payload = url.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn short_buffer_is_rejected() {
        let image = ClipboardImage {
            width: 4,
            height: 4,
            rgba: vec![0; 10],
        };
        assert!(matches!(
            encode_png(&image),
            Err(ExtractError::ImageSize { width: 4, height: 4, len: 10 })
        ));
    }
}
