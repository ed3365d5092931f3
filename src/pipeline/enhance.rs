//! Lightweight photo enhancement applied before embedding.
//!
//! Three passes, in order:
//! 1. per-channel autocontrast (stretch each channel's min..max to 0..255)
//! 2. sharpness ×1.2 (extrapolate away from a 3×3 smoothed copy)
//! 3. contrast ×1.05 (extrapolate away from the mean luminance)
//!
//! Each pass is a pure `&RgbImage → RgbImage` function so they can be tested
//! in isolation.

use image::{Rgb, RgbImage};

pub const SHARPNESS_FACTOR: f32 = 1.2;
pub const CONTRAST_FACTOR: f32 = 1.05;

/// Run the full enhancement chain.
pub fn enhance(img: &RgbImage) -> RgbImage {
    let img = autocontrast(img);
    let img = sharpness(&img, SHARPNESS_FACTOR);
    contrast(&img, CONTRAST_FACTOR)
}

/// Stretch every channel so its darkest value maps to 0 and its brightest
/// to 255. Flat channels are left unchanged.
pub fn autocontrast(img: &RgbImage) -> RgbImage {
    let mut lo = [u8::MAX; 3];
    let mut hi = [u8::MIN; 3];
    for px in img.pixels() {
        for c in 0..3 {
            lo[c] = lo[c].min(px.0[c]);
            hi[c] = hi[c].max(px.0[c]);
        }
    }

    let luts: Vec<[u8; 256]> = (0..3)
        .map(|c| {
            let mut lut = [0u8; 256];
            for (i, slot) in lut.iter_mut().enumerate() {
                *slot = if hi[c] <= lo[c] {
                    i as u8
                } else {
                    let scale = 255.0 / f32::from(hi[c] - lo[c]);
                    clamp_u8((i as f32 - f32::from(lo[c])) * scale)
                };
            }
            lut
        })
        .collect();

    let mut out = img.clone();
    for px in out.pixels_mut() {
        for c in 0..3 {
            px.0[c] = luts[c][px.0[c] as usize];
        }
    }
    out
}

/// Blend `img` with a 3×3 smoothed copy: `factor > 1` sharpens, `< 1`
/// blurs. Border pixels of the smoothed copy equal the original.
pub fn sharpness(img: &RgbImage, factor: f32) -> RgbImage {
    let smoothed = smooth3x3(img);
    blend(&smoothed, img, factor)
}

/// Blend `img` with a flat gray of its mean luminance.
pub fn contrast(img: &RgbImage, factor: f32) -> RgbImage {
    let (w, h) = img.dimensions();
    let count = u64::from(w) * u64::from(h);
    if count == 0 {
        return img.clone();
    }
    let sum: u64 = img.pixels().map(|px| u64::from(luma(px))).sum();
    let mean = ((sum as f64 / count as f64) + 0.5) as u8;
    let gray = RgbImage::from_pixel(w, h, Rgb([mean; 3]));
    blend(&gray, img, factor)
}

/// `base + factor * (img - base)`, clamped per channel.
fn blend(base: &RgbImage, img: &RgbImage, factor: f32) -> RgbImage {
    RgbImage::from_fn(img.width(), img.height(), |x, y| {
        let b = base.get_pixel(x, y).0;
        let p = img.get_pixel(x, y).0;
        Rgb(std::array::from_fn(|c| {
            clamp_u8(f32::from(b[c]) + factor * (f32::from(p[c]) - f32::from(b[c])))
        }))
    })
}

/// Smoothing kernel `[1 1 1; 1 5 1; 1 1 1] / 13`, applied to interior pixels
/// only. Edge pixels are copied unchanged, so sharpening never alters the
/// one-pixel frame. `imageops::filter3x3` clamps at the edges instead, which
/// would blend the frame.
fn smooth3x3(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    RgbImage::from_fn(w, h, |x, y| {
        if x == 0 || y == 0 || x + 1 >= w || y + 1 >= h {
            return *img.get_pixel(x, y);
        }
        let mut acc = [0u32; 3];
        for dy in 0..3 {
            for dx in 0..3 {
                let weight = if dx == 1 && dy == 1 { 5 } else { 1 };
                let p = img.get_pixel(x + dx - 1, y + dy - 1).0;
                for c in 0..3 {
                    acc[c] += weight * u32::from(p[c]);
                }
            }
        }
        Rgb(std::array::from_fn(|c| ((acc[c] + 6) / 13) as u8))
    })
}

/// ITU-R 601-2 luma.
fn luma(px: &Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    ((u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000) as u8
}

fn clamp_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
