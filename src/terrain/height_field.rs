//! Height-field terrain state and grid/world coordinate mapping.
//!
//! A [`HeightField`] is a square grid of elevation samples with a world-space
//! placement and extent. It owns the mutable height buffer the brush writes
//! into, the grid-to-world mapping both the brush and the mesh collaborator
//! rely on, and the ray intersection query that turns pointer picks into
//! world positions on the surface.

use cgmath::{InnerSpace, Point3, Vector3};
use thiserror::Error;

use crate::context::Ray;

#[derive(Debug, Error)]
pub enum TerrainError {
    #[error("grid index ({x}, {z}) out of range for resolution {resolution}")]
    IndexOutOfRange {
        x: usize,
        z: usize,
        resolution: usize,
    },
}

/// A square grid of height samples over a world-space patch.
///
/// The buffer holds `resolution * resolution` samples, row-major with
/// `index = z * resolution + x`. It is allocated once and never resized; the
/// brush mutates samples in place and flags the field dirty so the mesh
/// collaborator knows to refresh derived geometry.
#[derive(Debug)]
pub struct HeightField {
    position: Vector3<f32>,
    width: f32,
    depth: f32,
    vertex_resolution: usize,
    height_data: Vec<f32>,
    dirty: bool,
}

impl HeightField {
    /// Create a flat patch at elevation zero.
    pub fn new(position: Vector3<f32>, width: f32, depth: f32, vertex_resolution: usize) -> Self {
        assert!(
            vertex_resolution >= 2,
            "a height field needs at least 2x2 vertices"
        );
        Self {
            position,
            width,
            depth,
            vertex_resolution,
            height_data: vec![0.0; vertex_resolution * vertex_resolution],
            dirty: false,
        }
    }

    /// Create a patch from an existing height buffer (e.g. a loaded
    /// heightmap). The buffer length must match the resolution.
    pub fn from_heights(
        position: Vector3<f32>,
        width: f32,
        depth: f32,
        vertex_resolution: usize,
        height_data: Vec<f32>,
    ) -> Self {
        assert!(
            vertex_resolution >= 2,
            "a height field needs at least 2x2 vertices"
        );
        assert_eq!(
            height_data.len(),
            vertex_resolution * vertex_resolution,
            "height buffer length must equal resolution squared"
        );
        Self {
            position,
            width,
            depth,
            vertex_resolution,
            height_data,
            dirty: false,
        }
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn depth(&self) -> f32 {
        self.depth
    }

    pub fn vertex_resolution(&self) -> usize {
        self.vertex_resolution
    }

    /// Flat buffer index of the cell `(x, z)`.
    pub fn index(&self, x: usize, z: usize) -> Result<usize, TerrainError> {
        if x >= self.vertex_resolution || z >= self.vertex_resolution {
            return Err(TerrainError::IndexOutOfRange {
                x,
                z,
                resolution: self.vertex_resolution,
            });
        }
        Ok(z * self.vertex_resolution + x)
    }

    pub fn height(&self, x: usize, z: usize) -> Result<f32, TerrainError> {
        Ok(self.height_data[self.index(x, z)?])
    }

    pub fn set_height(&mut self, x: usize, z: usize, height: f32) -> Result<(), TerrainError> {
        let i = self.index(x, z)?;
        self.height_data[i] = height;
        Ok(())
    }

    /// World-space position of the grid cell `(x, z)`: linear interpolation
    /// across the patch extents, elevation from the height buffer. Exact
    /// inverse of [`world_to_grid`](Self::world_to_grid).
    pub fn vertex_position(&self, x: usize, z: usize) -> Result<Vector3<f32>, TerrainError> {
        let i = self.index(x, z)?;
        let step = 1.0 / (self.vertex_resolution - 1) as f32;
        Ok(Vector3::new(
            self.position.x + x as f32 * step * self.width,
            self.position.y + self.height_data[i],
            self.position.z + z as f32 * step * self.depth,
        ))
    }

    /// Nearest grid cell under a world-space position, or `None` outside the
    /// patch.
    pub fn world_to_grid(&self, world_x: f32, world_z: f32) -> Option<(usize, usize)> {
        if !self.is_on_terrain(world_x, world_z) {
            return None;
        }
        let n = (self.vertex_resolution - 1) as f32;
        let x = ((world_x - self.position.x) / self.width * n).round() as usize;
        let z = ((world_z - self.position.z) / self.depth * n).round() as usize;
        Some((
            x.min(self.vertex_resolution - 1),
            z.min(self.vertex_resolution - 1),
        ))
    }

    /// Whether a world-space position lies within the patch's horizontal
    /// bounds.
    pub fn is_on_terrain(&self, world_x: f32, world_z: f32) -> bool {
        world_x >= self.position.x
            && world_x <= self.position.x + self.width
            && world_z >= self.position.z
            && world_z <= self.position.z + self.depth
    }

    /// Surface elevation under a world-space position, bilinearly
    /// interpolated between the four surrounding samples. `None` outside the
    /// patch.
    pub fn height_at_world(&self, world_x: f32, world_z: f32) -> Option<f32> {
        if !self.is_on_terrain(world_x, world_z) {
            return None;
        }
        let n = (self.vertex_resolution - 1) as f32;
        let gx = (world_x - self.position.x) / self.width * n;
        let gz = (world_z - self.position.z) / self.depth * n;
        let x0 = (gx.floor() as usize).min(self.vertex_resolution - 2);
        let z0 = (gz.floor() as usize).min(self.vertex_resolution - 2);
        let tx = gx - x0 as f32;
        let tz = gz - z0 as f32;
        let stride = self.vertex_resolution;
        let h00 = self.height_data[z0 * stride + x0];
        let h10 = self.height_data[z0 * stride + x0 + 1];
        let h01 = self.height_data[(z0 + 1) * stride + x0];
        let h11 = self.height_data[(z0 + 1) * stride + x0 + 1];
        let top = h00 + (h10 - h00) * tx;
        let bottom = h01 + (h11 - h01) * tx;
        Some(self.position.y + top + (bottom - top) * tz)
    }

    /// World point where a ray first meets the surface, or `None` if it
    /// misses the patch.
    ///
    /// Stepped march along the ray in fixed increments until a sample drops
    /// below the interpolated surface, then one linear refinement between the
    /// straddling samples. Deterministic for identical inputs.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Point3<f32>> {
        let diagonal = (self.width * self.width + self.depth * self.depth).sqrt();
        let center = Point3::new(
            self.position.x + self.width / 2.0,
            self.position.y,
            self.position.z + self.depth / 2.0,
        );
        let reach = (center - ray.origin).magnitude() + diagonal;
        let step = diagonal / (4.0 * self.vertex_resolution as f32);
        let direction = ray.direction.normalize();

        let mut previous: Option<(f32, f32)> = None;
        let mut t = 0.0;
        while t <= reach {
            let p = ray.origin + direction * t;
            if let Some(surface) = self.height_at_world(p.x, p.z) {
                let clearance = p.y - surface;
                if clearance <= 0.0 {
                    let t_hit = match previous {
                        Some((pt, pc)) if pc > 0.0 => pt + (t - pt) * pc / (pc - clearance),
                        _ => t,
                    };
                    let hit = ray.origin + direction * t_hit;
                    let y = self.height_at_world(hit.x, hit.z).unwrap_or(hit.y);
                    return Some(Point3::new(hit.x, y, hit.z));
                }
                previous = Some((t, clearance));
            } else {
                previous = None;
            }
            t += step;
        }
        None
    }

    /// The raw sample buffer, row-major.
    pub fn heights_raw(&self) -> &[f32] {
        &self.height_data
    }

    /// The sample buffer as bytes, for upload by the mesh collaborator.
    pub fn height_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.height_data)
    }

    /// Flag derived geometry (mesh, normals) as stale.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Return and clear the geometry-dirty flag. The mesh collaborator polls
    /// this once per frame and regenerates when it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> HeightField {
        HeightField::new(Vector3::new(0.0, 0.0, 0.0), 10.0, 10.0, 11)
    }

    #[test]
    fn index_is_row_major() {
        let hf = field();
        assert_eq!(hf.index(0, 0).unwrap(), 0);
        assert_eq!(hf.index(3, 2).unwrap(), 2 * 11 + 3);
        assert!(hf.index(11, 0).is_err());
        assert!(hf.index(0, 11).is_err());
    }

    #[test]
    fn grid_world_roundtrip_covers_every_cell() {
        let hf = HeightField::new(Vector3::new(-4.0, 1.0, 7.5), 24.0, 12.0, 9);
        for z in 0..9 {
            for x in 0..9 {
                let world = hf.vertex_position(x, z).unwrap();
                let (gx, gz) = hf.world_to_grid(world.x, world.z).unwrap();
                assert_eq!((gx, gz), (x, z));
            }
        }
    }

    #[test]
    fn bilinear_height_on_a_slope() {
        let mut hf = field();
        for z in 0..11 {
            for x in 0..11 {
                hf.set_height(x, z, x as f32).unwrap();
            }
        }
        // Cell spacing is 1 world unit, heights ramp 0..10 along x.
        let h = hf.height_at_world(2.5, 5.0).unwrap();
        assert!((h - 2.5).abs() < 1e-4);
    }

    #[test]
    fn vertical_ray_hits_the_surface() {
        let mut hf = field();
        for z in 0..11 {
            for x in 0..11 {
                hf.set_height(x, z, 2.0).unwrap();
            }
        }
        let ray = Ray::new(Point3::new(5.0, 50.0, 5.0), Vector3::new(0.0, -1.0, 0.0));
        let hit = hf.ray_intersection(&ray).unwrap();
        assert!((hit.x - 5.0).abs() < 1e-3);
        assert!((hit.z - 5.0).abs() < 1e-3);
        assert!((hit.y - 2.0).abs() < 0.05);
    }

    #[test]
    fn ray_outside_the_patch_misses() {
        let hf = field();
        let ray = Ray::new(
            Point3::new(50.0, 10.0, 50.0),
            Vector3::new(0.0, -1.0, 0.0),
        );
        assert!(hf.ray_intersection(&ray).is_none());
    }

    #[test]
    fn dirty_flag_is_taken_once() {
        let mut hf = field();
        assert!(!hf.take_dirty());
        hf.invalidate();
        assert!(hf.take_dirty());
        assert!(!hf.take_dirty());
    }
}
