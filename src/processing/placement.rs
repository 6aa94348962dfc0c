//! Logo geometry: how big the logo is on a given image and whether it fits

use serde::Serialize;

/// Fixed distance of the logo's top-left corner from the image's top-left corner
pub const LOGO_OFFSET: (u32, u32) = (10, 10);

/// Where and how large the logo goes on one image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementDecision {
    pub logo_width: u32,
    pub logo_height: u32,
    pub offset_x: u32,
    pub offset_y: u32,
    /// The logo lies entirely inside the image
    pub fits: bool,
    /// The proportional size collapsed to zero and the native logo size was used
    pub used_fallback: bool,
}

impl PlacementDecision {
    /// Size the logo for an image `image_width` x `image_height`.
    ///
    /// The logo width is `floor(image_width * percentage / 100)` and the height
    /// follows the logo's own aspect ratio, rounded to the nearest pixel.
    ///
    /// When either side comes out as zero the logo's native size is used
    /// instead of skipping the overlay. This keeps compatibility with the
    /// behavior users already rely on, but it is suspect: a tiny image then
    /// gets a full-size logo, which usually fails the bounds check anyway.
    pub fn compute(
        image_width: u32,
        image_height: u32,
        logo_width: u32,
        logo_height: u32,
        percentage: u32,
    ) -> Self {
        let target_width = u64::from(image_width) * u64::from(percentage) / 100;
        let target_width = u32::try_from(target_width).unwrap_or(u32::MAX);

        let target_height = if logo_width == 0 {
            0
        } else {
            let scale = f64::from(target_width) / f64::from(logo_width);
            (f64::from(logo_height) * scale).round() as u32
        };

        let (logo_width, logo_height, used_fallback) = if target_width == 0 || target_height == 0 {
            (logo_width, logo_height, true)
        } else {
            (target_width, target_height, false)
        };

        let (offset_x, offset_y) = LOGO_OFFSET;
        let fits = u64::from(offset_x) + u64::from(logo_width) <= u64::from(image_width)
            && u64::from(offset_y) + u64::from(logo_height) <= u64::from(image_height);

        Self {
            logo_width,
            logo_height,
            offset_x,
            offset_y,
            fits,
            used_fallback,
        }
    }

    /// Logo dimensions as a `(width, height)` pair
    pub fn logo_size(&self) -> (u32, u32) {
        (self.logo_width, self.logo_height)
    }
}
