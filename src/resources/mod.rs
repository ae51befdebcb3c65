//! Loading of brush pixmaps and heightmaps from external files.

use anyhow::ensure;
use cgmath::Vector3;

use crate::{brush::kernel::FalloffKernel, terrain::HeightField};

/// Load a brush falloff kernel from an image file. The luma channel of the
/// image becomes the weight pixmap.
pub fn load_kernel(file_name: &str) -> anyhow::Result<FalloffKernel> {
    let image = image::open(file_name)?;
    let kernel = FalloffKernel::from_image(&image);
    log::info!(
        "loaded brush kernel {} ({}x{} px)",
        file_name,
        kernel.size(),
        kernel.size()
    );
    Ok(kernel)
}

/// Load a height field from a heightmap image.
///
/// The image must be square; its side length becomes the vertex resolution.
/// Luma values scale linearly into `[0, max_height]` world units.
pub fn load_height_field(
    file_name: &str,
    position: Vector3<f32>,
    width: f32,
    depth: f32,
    max_height: f32,
) -> anyhow::Result<HeightField> {
    let image = image::open(file_name)?.to_luma8();
    ensure!(
        image.width() == image.height(),
        "heightmap {} must be square, got {}x{}",
        file_name,
        image.width(),
        image.height()
    );
    ensure!(
        image.width() >= 2,
        "heightmap {} is too small ({}x{})",
        file_name,
        image.width(),
        image.height()
    );
    let resolution = image.width() as usize;
    let heights = image
        .pixels()
        .map(|p| p.0[0] as f32 / 255.0 * max_height)
        .collect();
    log::info!(
        "loaded heightmap {} ({} vertices per side)",
        file_name,
        resolution
    );
    Ok(HeightField::from_heights(
        position, width, depth, resolution, heights,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_are_errors() {
        assert!(load_kernel("does-not-exist.png").is_err());
        assert!(
            load_height_field(
                "does-not-exist.png",
                Vector3::new(0.0, 0.0, 0.0),
                10.0,
                10.0,
                5.0
            )
            .is_err()
        );
    }
}
