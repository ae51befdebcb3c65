//! Radial falloff kernels sampled from a weight pixmap.
//!
//! A [`FalloffKernel`] attenuates a brush's effect with distance from its
//! center. The weight comes from a grayscale image: the query offset is
//! normalized against the brush radius and mapped onto the pixmap around its
//! center pixel, so the same image serves every brush radius.

use cgmath::{InnerSpace, Vector2};
use image::{DynamicImage, GrayImage, Luma};

/// A square 2D weight pixmap indexed by normalized offset from its center.
#[derive(Debug)]
pub struct FalloffKernel {
    pixels: GrayImage,
    center: u32,
}

impl FalloffKernel {
    /// Build a kernel from any brush pixmap; the luma channel is the weight.
    pub fn from_image(image: &DynamicImage) -> Self {
        let pixels = image.to_luma8();
        let center = pixels.width() / 2;
        Self { pixels, center }
    }

    /// Procedurally generated smooth radial falloff: full weight at the
    /// center, smoothstep fade to zero at the rim. `size` should be odd so
    /// the center lands on a pixel.
    pub fn smooth(size: u32) -> Self {
        assert!(size >= 3, "kernel needs at least 3x3 pixels");
        let center = size / 2;
        let pixels = GrayImage::from_fn(size, size, |x, y| {
            let dx = x as f32 - center as f32;
            let dy = y as f32 - center as f32;
            let d = ((dx * dx + dy * dy).sqrt() / center as f32).min(1.0);
            let w = 1.0 - d;
            let w = w * w * (3.0 - 2.0 * w);
            Luma([(w * 255.0).round() as u8])
        });
        Self { pixels, center }
    }

    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Weight of the center pixel, the maximum a sample can return for this
    /// kernel image.
    pub fn center_weight(&self) -> f32 {
        self.pixels.get_pixel(self.center, self.center).0[0] as f32 / 255.0
    }

    /// Sample the falloff weight for a horizontal-plane `offset` from the
    /// brush center, given the brush `radius`.
    ///
    /// `progress = |offset| / radius` locates the sample along the offset
    /// direction, `center * progress` pixels out from the center pixel.
    /// Pixel coordinates are clamped to the image bounds, so rim queries
    /// (and callers that pass offsets slightly beyond the radius) can never
    /// index outside the pixmap. Returns a weight in `[0, 1]`.
    pub fn sample(&self, offset: Vector2<f32>, radius: f32) -> f32 {
        if radius <= 0.0 {
            return 0.0;
        }
        let length = offset.magnitude();
        let progress = length / radius;
        let direction = if length > 0.0 {
            offset / length
        } else {
            Vector2::new(0.0, 0.0)
        };
        let v = direction * (self.center as f32 * progress);
        let x = (self.center as i64 + v.x as i64).clamp(0, self.pixels.width() as i64 - 1);
        let y = (self.center as i64 + v.y as i64).clamp(0, self.pixels.height() as i64 - 1);
        self.pixels.get_pixel(x as u32, y as u32).0[0] as f32 / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_sample_is_full_weight() {
        let kernel = FalloffKernel::smooth(65);
        assert_eq!(kernel.center_weight(), 1.0);
        assert_eq!(kernel.sample(Vector2::new(0.0, 0.0), 2.0), 1.0);
    }

    #[test]
    fn weight_decreases_outward() {
        let kernel = FalloffKernel::smooth(65);
        let near = kernel.sample(Vector2::new(0.2, 0.0), 1.0);
        let far = kernel.sample(Vector2::new(0.8, 0.0), 1.0);
        assert!(near > far, "expected {} > {}", near, far);
    }

    #[test]
    fn rim_and_beyond_stay_in_bounds() {
        let kernel = FalloffKernel::smooth(33);
        for scale in [1.0, 1.5, 10.0] {
            let w = kernel.sample(Vector2::new(scale, scale), 1.0);
            assert!((0.0..=1.0).contains(&w));
        }
    }

    #[test]
    fn zero_radius_yields_no_weight() {
        let kernel = FalloffKernel::smooth(33);
        assert_eq!(kernel.sample(Vector2::new(0.5, 0.5), 0.0), 0.0);
    }

    #[test]
    fn kernel_from_uniform_image_is_flat() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(17, 17, Luma([128])));
        let kernel = FalloffKernel::from_image(&img);
        let w = 128.0 / 255.0;
        assert_eq!(kernel.sample(Vector2::new(0.0, 0.0), 1.0), w);
        assert_eq!(kernel.sample(Vector2::new(0.9, 0.0), 1.0), w);
    }
}
