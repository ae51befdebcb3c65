//! Terrain state: the height field and its paint map.
//!
//! - `height_field` is the mutable elevation grid with grid/world mapping
//!   and ray intersection
//! - `paint_map` is the splat-weight buffer for surface texturing
//!
//! [`Terrain`] pairs the two into the single target a brush binds to, the
//! same pair of buffers the mesh and texture collaborators refresh from.

pub mod height_field;
pub mod paint_map;

pub use height_field::{HeightField, TerrainError};
pub use paint_map::{PaintMap, SplatChannel};

use cgmath::Vector3;

/// A terrain patch: elevation grid plus splat weights.
#[derive(Debug)]
pub struct Terrain {
    pub height_field: HeightField,
    pub paint: PaintMap,
}

impl Terrain {
    /// Create a flat terrain patch with a zeroed paint map.
    ///
    /// `vertex_resolution` is the height-grid side length; the paint map has
    /// its own, independent pixel resolution.
    pub fn new(
        position: Vector3<f32>,
        width: f32,
        depth: f32,
        vertex_resolution: usize,
        paint_resolution: (u32, u32),
    ) -> Self {
        Self {
            height_field: HeightField::new(position, width, depth, vertex_resolution),
            paint: PaintMap::new(paint_resolution.0, paint_resolution.1),
        }
    }

    /// Flag derived geometry as stale after a batch of height edits.
    pub fn invalidate(&mut self) {
        self.height_field.invalidate();
    }
}
