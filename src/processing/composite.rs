//! Stamping the logo onto an image

use std::borrow::Cow;
use image::imageops::FilterType;
use image::{Rgba, Rgba32FImage, RgbaImage};
use tracing::debug;

use crate::processing::asset::{ImageAsset, LogoAsset};
use crate::processing::placement::PlacementDecision;

/// Resizes the logo per image and alpha-blends it in place
#[derive(Debug, Clone, Copy)]
pub struct Compositor {
    filter: FilterType,
}

/// Output of one compositing step
#[derive(Debug, Clone)]
pub struct Composite {
    pub pixels: RgbaImage,
    pub placement: PlacementDecision,
}

impl Compositor {
    /// Create a compositor using Lanczos3 resampling
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }

    /// Stamp `logo` onto `image` at `percentage` of the image width.
    ///
    /// The image is consumed and its buffer reused. When the placement does
    /// not fit, the pixels come back untouched.
    pub fn composite(&self, image: ImageAsset, logo: &LogoAsset, percentage: u32) -> Composite {
        let placement = PlacementDecision::compute(
            image.width(),
            image.height(),
            logo.width(),
            logo.height(),
            percentage,
        );

        debug!(
            "Placement for {}x{}: logo {}x{} at ({}, {}), fits: {}",
            image.width(),
            image.height(),
            placement.logo_width,
            placement.logo_height,
            placement.offset_x,
            placement.offset_y,
            placement.fits
        );

        let mut pixels = image.pixels;
        if placement.fits {
            let stamp = self.resize_logo(logo, &placement);
            overlay(&mut pixels, &stamp, placement.offset_x, placement.offset_y);
        }

        Composite { pixels, placement }
    }

    fn resize_logo<'a>(&self, logo: &'a LogoAsset, placement: &PlacementDecision) -> Cow<'a, RgbaImage> {
        let (width, height) = placement.logo_size();
        if (width, height) == (logo.width(), logo.height()) {
            return Cow::Borrowed(logo.pixels());
        }
        let resized = image::imageops::resize(logo.premultiplied(), width, height, self.filter);
        Cow::Owned(unpremultiply(&resized))
    }
}

/// Back to straight 8-bit RGBA. Pixels whose alpha rounds to zero come out
/// fully transparent.
fn unpremultiply(pixels: &Rgba32FImage) -> RgbaImage {
    let to_u8 = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;

    let mut out = RgbaImage::new(pixels.width(), pixels.height());
    for (src, dst) in pixels.pixels().zip(out.pixels_mut()) {
        let alpha = src[3];
        if to_u8(alpha) == 0 {
            continue;
        }
        *dst = Rgba([
            to_u8(src[0] / alpha),
            to_u8(src[1] / alpha),
            to_u8(src[2] / alpha),
            to_u8(alpha),
        ]);
    }
    out
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Blend `top` over `base` with its top-left corner at `(x, y)`.
///
/// The caller guarantees `top` lies within `base`.
pub fn overlay(base: &mut RgbaImage, top: &RgbaImage, x: u32, y: u32) {
    for (tx, ty, top_px) in top.enumerate_pixels() {
        let base_px = base.get_pixel_mut(x + tx, y + ty);
        blend_pixel(base_px, top_px);
    }
}

/// Mix `top` into `base` using `top`'s alpha as the weight of every channel,
/// alpha included.
pub fn blend_pixel(base: &mut Rgba<u8>, top: &Rgba<u8>) {
    match top[3] {
        0 => {}
        255 => *base = *top,
        alpha => {
            let alpha = u32::from(alpha);
            for channel in 0..4 {
                base[channel] = blend_channel(base[channel], top[channel], alpha);
            }
        }
    }
}

fn blend_channel(base: u8, top: u8, alpha: u32) -> u8 {
    let mixed = u32::from(top) * alpha + u32::from(base) * (255 - alpha);
    ((mixed + 127) / 255) as u8
}
