use cgmath::{Point3, Vector2, Vector3};
use terra_ngin::context::{Ray, RayProvider};
use terra_ngin::terrain::Terrain;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Camera stub that casts straight-down pick rays; screen coordinates map
/// directly onto world x/z, which keeps brush placement in tests exact.
pub struct TopDownCamera;

impl RayProvider for TopDownCamera {
    fn pick_ray(&self, screen: Vector2<f32>) -> Ray {
        Ray::new(
            Point3::new(screen.x, 100.0, screen.y),
            Vector3::new(0.0, -1.0, 0.0),
        )
    }
}

/// A flat 10x10 world-unit patch at the origin with one grid cell per world
/// unit and a 100x100 paint map.
pub fn flat_terrain() -> Terrain {
    Terrain::new(Vector3::new(0.0, 0.0, 0.0), 10.0, 10.0, 11, (100, 100))
}
