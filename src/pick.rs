//! Pointer picking against the terrain surface.
//!
//! Picking resolves what lies under the pointer: the camera collaborator
//! unprojects the screen position into a world-space ray, and the ray is
//! intersected with the height field. The result drives the brush center
//! while the user drags across the terrain.

use cgmath::{Point3, Vector2};

use crate::{context::RayProvider, terrain::HeightField};

/// World point on the terrain surface under a screen position, or `None`
/// when the pick ray misses the patch.
pub fn pick_terrain_point(
    camera: &dyn RayProvider,
    screen: Vector2<f32>,
    height_field: &HeightField,
) -> Option<Point3<f32>> {
    let ray = camera.pick_ray(screen);
    let hit = height_field.ray_intersection(&ray);
    if let Some(point) = hit {
        log::debug!(
            "picked terrain point ({:.2}, {:.2}, {:.2})",
            point.x,
            point.y,
            point.z
        );
    }
    hit
}
