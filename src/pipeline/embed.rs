//! Image loading: file on disk → pixel stream ready for a PDF image XObject.
//!
//! JPEGs stored as RGB or grayscale are passed through untouched as
//! `DCTDecode` streams: PDF viewers decode them natively, so re-encoding
//! would only cost time and quality. Every other input (PNG, CMYK JPEG, or
//! any image that was enhanced) is decoded, converted to 8-bit RGB and
//! zlib-compressed. A non-opaque alpha channel becomes a separate soft mask.
//!
//! Failures here are never fatal to a render; they come back as
//! [`ImageError`] and the report is produced without the image.

use crate::error::ImageError;
use crate::pipeline::enhance;
use image::codecs::jpeg::JpegDecoder;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use miniz_oxide::deflate::compress_to_vec_zlib;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const ZLIB_LEVEL: u8 = 6;

/// How the pixel data is stored in the PDF.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageEncoding {
    /// Original JPEG bytes; `components` is 1 (gray) or 3 (RGB).
    Dct { data: Vec<u8>, components: u8 },
    /// zlib-compressed 8-bit RGB samples plus an optional zlib-compressed
    /// 8-bit alpha mask.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// A decoded image ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedImage {
    pub pixel_width: u32,
    pub pixel_height: u32,
    pub encoding: ImageEncoding,
}

impl EmbeddedImage {
    /// `height / width`, the factor the layout scales by.
    pub fn aspect(&self) -> f32 {
        self.pixel_height as f32 / self.pixel_width.max(1) as f32
    }
}

/// Read and prepare the image at `path`.
pub fn load_image(path: &Path, enhance_pixels: bool) -> Result<EmbeddedImage, ImageError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ImageError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ImageError::Unreadable {
                path: path.to_path_buf(),
                detail: e.to_string(),
            }
        }
    })?;
    prepare(path, bytes, enhance_pixels)
}

fn prepare(path: &Path, bytes: Vec<u8>, enhance_pixels: bool) -> Result<EmbeddedImage, ImageError> {
    let decode_err = |detail: String| ImageError::Decode {
        path: path.to_path_buf(),
        detail,
    };

    let reader = ImageReader::new(Cursor::new(bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| decode_err(e.to_string()))?;
    let format = reader.format();
    let decoded = reader.decode().map_err(|e| decode_err(e.to_string()))?;

    let (w, h) = (decoded.width(), decoded.height());
    if w == 0 || h == 0 {
        return Err(ImageError::EmptyImage {
            path: path.to_path_buf(),
            width: w,
            height: h,
        });
    }
    debug!(
        "Decoded image {} → {}x{} {:?} ({:?})",
        path.display(),
        w,
        h,
        decoded.color(),
        format
    );

    if enhance_pixels {
        let enhanced = enhance::enhance(&decoded.to_rgb8());
        return Ok(flate_rgb(&DynamicImage::ImageRgb8(enhanced)));
    }

    if format == Some(ImageFormat::Jpeg) {
        if let Some(components) = jpeg_passthrough_components(&bytes) {
            return Ok(EmbeddedImage {
                pixel_width: w,
                pixel_height: h,
                encoding: ImageEncoding::Dct {
                    data: bytes,
                    components,
                },
            });
        }
    }

    Ok(flate_rgb(&decoded))
}

/// Component count of a JPEG that can be embedded as-is, judged from the
/// colour space stored in the file. The decoder converts CMYK and YCCK to
/// RGB, so the decoded colour type cannot be trusted here.
fn jpeg_passthrough_components(bytes: &[u8]) -> Option<u8> {
    let decoder = JpegDecoder::new(Cursor::new(bytes)).ok()?;
    match decoder.original_color_type() {
        ExtendedColorType::L8 => Some(1),
        ExtendedColorType::Rgb8 => Some(3),
        other => {
            debug!("JPEG colour space {:?} is re-encoded", other);
            None
        }
    }
}

fn flate_rgb(img: &DynamicImage) -> EmbeddedImage {
    let alpha = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        rgba.pixels()
            .any(|p| p.0[3] < u8::MAX)
            .then(|| rgba.pixels().map(|p| p.0[3]).collect::<Vec<u8>>())
            .map(|a| compress_to_vec_zlib(&a, ZLIB_LEVEL))
    } else {
        None
    };

    let rgb = img.to_rgb8();
    EmbeddedImage {
        pixel_width: rgb.width(),
        pixel_height: rgb.height(),
        encoding: ImageEncoding::Flate {
            rgb: compress_to_vec_zlib(rgb.as_raw(), ZLIB_LEVEL),
            alpha,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn save(dir: &tempfile::TempDir, name: &str, img: &DynamicImage) -> std::path::PathBuf {
        let path = dir.path().join(name);
        img.save(&path).expect("fixture should save");
        path
    }

    #[test]
    fn png_is_flate_encoded() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 4, Rgb([10, 20, 30])));
        let path = save(&dir, "scan.png", &img);

        let e = load_image(&path, false).unwrap();
        assert_eq!((e.pixel_width, e.pixel_height), (8, 4));
        assert!((e.aspect() - 0.5).abs() < 1e-6);
        match e.encoding {
            ImageEncoding::Flate { alpha, .. } => assert!(alpha.is_none()),
            other => panic!("expected Flate, got {other:?}"),
        }
    }

    #[test]
    fn translucent_png_gets_soft_mask() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([0, 0, 0, 128])));
        let path = save(&dir, "alpha.png", &img);
        match load_image(&path, false).unwrap().encoding {
            ImageEncoding::Flate { alpha, .. } => assert!(alpha.is_some()),
            other => panic!("expected Flate, got {other:?}"),
        }
    }

    #[test]
    fn opaque_rgba_has_no_mask() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([5, 5, 5, 255])));
        let path = save(&dir, "opaque.png", &img);
        match load_image(&path, false).unwrap().encoding {
            ImageEncoding::Flate { alpha, .. } => assert!(alpha.is_none()),
            other => panic!("expected Flate, got {other:?}"),
        }
    }

    #[test]
    fn jpeg_is_passed_through() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 8, Luma([200])));
        let path = save(&dir, "xray.jpg", &img);
        let raw = std::fs::read(&path).unwrap();

        match load_image(&path, false).unwrap().encoding {
            ImageEncoding::Dct { data, components } => {
                assert_eq!(components, 1);
                assert_eq!(data, raw);
            }
            other => panic!("expected Dct, got {other:?}"),
        }
    }

    #[test]
    fn cmyk_jpeg_is_reencoded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cmyk.jpg");
        let (w, h) = (16u16, 8u16);
        let cmyk: Vec<u8> = (0..usize::from(w) * usize::from(h))
            .flat_map(|i| [(i % 256) as u8, 40, 200, 10])
            .collect();
        let mut buf = Vec::new();
        jpeg_encoder::Encoder::new(&mut buf, 90)
            .encode(&cmyk, w, h, jpeg_encoder::ColorType::Cmyk)
            .unwrap();
        std::fs::write(&path, &buf).unwrap();

        let e = load_image(&path, false).unwrap();
        assert_eq!((e.pixel_width, e.pixel_height), (16, 8));
        match e.encoding {
            ImageEncoding::Flate { alpha, .. } => assert!(alpha.is_none()),
            other => panic!("expected Flate, got {other:?}"),
        }
    }

    #[test]
    fn rgb_jpeg_passes_through_with_three_components() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 8, Rgb([120, 90, 60])));
        let path = save(&dir, "color.jpg", &img);
        match load_image(&path, false).unwrap().encoding {
            ImageEncoding::Dct { components, .. } => assert_eq!(components, 3),
            other => panic!("expected Dct, got {other:?}"),
        }
    }

    #[test]
    fn enhanced_jpeg_is_reencoded() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(16, 8, Rgb([120, 90, 60])));
        let path = save(&dir, "photo.jpg", &img);
        let e = load_image(&path, true).unwrap();
        assert!(matches!(e.encoding, ImageEncoding::Flate { .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = load_image(Path::new("/definitely/not/here.png"), false).unwrap_err();
        assert!(matches!(err, ImageError::NotFound { .. }), "got {err:?}");
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"not an image at all").unwrap();
        let err = load_image(&path, false).unwrap_err();
        assert!(matches!(err, ImageError::Decode { .. }), "got {err:?}");
    }
}
