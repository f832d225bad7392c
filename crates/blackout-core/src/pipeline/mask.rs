//! Near-black background removal.
//!
//! Turns an RGB image into RGBA by classifying near-black pixels as
//! background:
//!
//! ```text
//! threshold → background mask → dilate (optional) → invert → feather (optional) → compose
//! ```
//!
//! Dilation runs on the background mask, before inversion, so it grows the
//! transparent region into dark object edges rather than growing the
//! foreground.

use image::{imageops, GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};
use imageproc::distance_transform::Norm;
use imageproc::map::{map_colors, map_colors2};
use imageproc::morphology;

use crate::config::{MaskConfig, MAX_FEATHER};
use crate::error::{PipelineError, PipelineResult};

/// Mask value for background pixels (before inversion).
pub const BACKGROUND: u8 = 255;
/// Mask value for foreground pixels (before inversion).
pub const FOREGROUND: u8 = 0;

/// Fixed kernels used for small sizes when sigma is derived automatically.
const SMALL_KERNELS: [&[f32]; 4] = [
    &[1.0],
    &[0.25, 0.5, 0.25],
    &[0.0625, 0.25, 0.375, 0.25, 0.0625],
    &[
        0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125,
    ],
];

/// Computes an alpha channel for an image from its near-black pixels.
#[derive(Debug, Clone, Copy)]
pub struct PixelMasker {
    settings: MaskConfig,
}

impl PixelMasker {
    /// Create a masker with the given settings.
    pub fn new(settings: MaskConfig) -> Self {
        Self { settings }
    }

    /// Run the full pipeline on one image.
    pub fn apply(&self, image: &RgbImage) -> PipelineResult<RgbaImage> {
        remove_background(image, &self.settings)
    }
}

/// Remove the near-black background of `image`, returning an RGBA copy.
///
/// Color channels are copied unchanged; only alpha is computed.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyImage`] when the image has no pixels.
pub fn remove_background(image: &RgbImage, settings: &MaskConfig) -> PipelineResult<RgbaImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::EmptyImage);
    }

    let mut mask = background_mask(image, settings.threshold);
    if settings.dilate > 0 {
        mask = dilate_mask(&mask, settings.dilate);
    }

    let mut alpha = invert_mask(mask);
    if settings.feather_enabled() {
        alpha = feather_alpha(&alpha, settings.feather);
    }

    Ok(compose_alpha(image, &alpha))
}

/// Binary mask: [`BACKGROUND`] where every channel is `<= threshold`.
pub fn background_mask(image: &RgbImage, threshold: u8) -> GrayImage {
    map_colors(image, |Rgb([r, g, b])| {
        if r <= threshold && g <= threshold && b <= threshold {
            Luma([BACKGROUND])
        } else {
            Luma([FOREGROUND])
        }
    })
}

/// Grow the background by `iterations` passes of a 3x3 square element.
///
/// `k` passes of a 3x3 square equal one pass with a Chebyshev radius of `k`,
/// so the work is done in radius steps of at most `u8::MAX`. A radius past
/// the longer image side reaches every pixel, so larger counts are clamped.
pub fn dilate_mask(mask: &GrayImage, iterations: u32) -> GrayImage {
    let mut dilated = mask.clone();
    let (width, height) = mask.dimensions();
    let mut remaining = iterations.min(width.max(height));
    while remaining > 0 {
        let step = remaining.min(u8::MAX as u32);
        dilated = morphology::dilate(&dilated, Norm::LInf, step as u8);
        remaining -= step;
    }
    dilated
}

/// Flip a background mask into an alpha channel (background → 0).
pub fn invert_mask(mut mask: GrayImage) -> GrayImage {
    imageops::invert(&mut mask);
    mask
}

/// Gaussian-blur an alpha channel with an odd kernel size.
///
/// The blur is separable with reflect-101 borders (`dcb|abcd|cba`).
/// Sizes of zero or even sizes return the input unchanged; sizes above
/// [`MAX_FEATHER`] are clamped to it.
pub fn feather_alpha(alpha: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size == 0 || kernel_size % 2 == 0 {
        return alpha.clone();
    }
    let kernel = gaussian_kernel(kernel_size.min(MAX_FEATHER));
    let (width, height) = alpha.dimensions();
    let (w, h) = (width as usize, height as usize);
    let radius = (kernel.len() / 2) as isize;
    let src = alpha.as_raw();

    let mut horizontal = vec![0f32; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - radius, w);
                acc += weight * row[sx] as f32;
            }
            horizontal[y * w + x] = acc;
        }
    }

    let mut out = GrayImage::new(width, height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0f32;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - radius, h);
                acc += weight * horizontal[sy * w + x];
            }
            out.put_pixel(x as u32, y as u32, Luma([acc.round().clamp(0.0, 255.0) as u8]));
        }
    }
    out
}

/// Normalized 1-D Gaussian weights for an odd `size`.
///
/// Sigma is derived from the size as `0.3 * ((size - 1) / 2 - 1) + 0.8`;
/// sizes up to 7 use the fixed binomial-style kernels.
pub fn gaussian_kernel(size: u32) -> Vec<f32> {
    debug_assert!(size % 2 == 1, "kernel size must be odd");
    if let Some(fixed) = SMALL_KERNELS.get((size / 2) as usize) {
        return fixed.to_vec();
    }

    let sigma = 0.3 * ((size as f64 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size as f64 - 1.0) * 0.5;
    let scale = -0.5 / (sigma * sigma);
    let raw: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (scale * d * d).exp()
        })
        .collect();
    let sum: f64 = raw.iter().sum();
    raw.into_iter().map(|w| (w / sum) as f32).collect()
}

/// Reflect an out-of-range index without repeating the edge sample.
fn reflect_101(index: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let len = len as isize;
    let period = 2 * (len - 1);
    let mut i = index.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as usize
}

/// Attach `alpha` to the color channels of `image`.
///
/// Both images must have the same dimensions.
pub fn compose_alpha(image: &RgbImage, alpha: &GrayImage) -> RgbaImage {
    map_colors2(image, alpha, |Rgb([r, g, b]), Luma([a])| Rgba([r, g, b, a]))
}
