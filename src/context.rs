//! Input and camera seams for the editing core.
//!
//! The core is driven synchronously, once per tick, by a host that owns the
//! window, the camera and the input plumbing. This module defines the data
//! that crosses that boundary: a per-tick [`PointerState`] snapshot, the
//! [`Ray`] type and the [`RayProvider`] camera contract used to unproject
//! pointer positions into the scene.

use cgmath::{Point3, Vector2, Vector3};

/// Snapshot of the pointer for one tick: screen position plus the two
/// control bits the brush resolves its action from.
#[derive(Clone, Copy, Debug)]
pub struct PointerState {
    pub coords: Vector2<f32>,
    pub primary_held: bool,
    pub secondary_held: bool,
}

impl PointerState {
    pub fn new(coords: Vector2<f32>, primary_held: bool, secondary_held: bool) -> Self {
        Self {
            coords,
            primary_held,
            secondary_held,
        }
    }
}

/// A world-space ray: origin plus direction.
///
/// The direction does not have to be normalized; consumers that need unit
/// steps normalize themselves.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Point3<f32>, direction: Vector3<f32>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f32) -> Point3<f32> {
        self.origin + self.direction * t
    }
}

/// Camera collaborator boundary: unprojects a screen position into a pick
/// ray through the scene.
pub trait RayProvider {
    fn pick_ray(&self, screen: Vector2<f32>) -> Ray;
}
