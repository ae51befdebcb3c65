//! Splat-weight paint map for terrain texturing.
//!
//! A [`PaintMap`] stores per-pixel blend weights across four texture
//! channels, at a resolution independent of the height grid. The brush
//! paints uniform disks into a single channel; a texture collaborator reads
//! the raw pixels back out whenever the map is flagged dirty.

use image::RgbaImage;
use log::warn;

/// One of the four splat channels a paint map blends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplatChannel {
    R,
    G,
    B,
    A,
}

impl SplatChannel {
    fn offset(self) -> usize {
        match self {
            SplatChannel::R => 0,
            SplatChannel::G => 1,
            SplatChannel::B => 2,
            SplatChannel::A => 3,
        }
    }
}

/// Per-pixel channel weights backing the terrain's splat texture.
///
/// Blend policy: additive with saturation. Painting adds
/// `strength * 255` to the selected channel and clamps at full weight;
/// the other channels are left untouched. Repeated strokes are monotone.
#[derive(Debug)]
pub struct PaintMap {
    pixels: RgbaImage,
    dirty: bool,
}

impl PaintMap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            dirty: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Blend `strength` into `channel` for every pixel within `radius` of
    /// `(cx, cy)`.
    ///
    /// The disk is uniform (plain pixel-distance test, no falloff). Pixels
    /// outside the map are skipped silently; brushes near the terrain edge
    /// partially overlap it as a matter of course.
    pub fn paint_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: i32,
        strength: f32,
        channel: SplatChannel,
    ) {
        if radius <= 0 {
            warn!("ignoring paint with non-positive radius {}", radius);
            return;
        }
        let delta = (strength.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (width, height) = (self.pixels.width() as i32, self.pixels.height() as i32);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy > radius * radius {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= width || y >= height {
                    continue;
                }
                let pixel = self.pixels.get_pixel_mut(x as u32, y as u32);
                let slot = &mut pixel.0[channel.offset()];
                *slot = slot.saturating_add(delta);
            }
        }
    }

    /// Normalized weight of one channel at a pixel, or `None` out of bounds.
    pub fn channel_weight(&self, x: u32, y: u32, channel: SplatChannel) -> Option<f32> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| p.0[channel.offset()] as f32 / 255.0)
    }

    /// Flag the derived splat texture as stale. Called by the brush after a
    /// batch of paints, matching the geometry-dirty protocol on the height
    /// field.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Return and clear the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Raw RGBA bytes for texture upload.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }
}
