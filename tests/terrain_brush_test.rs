use cgmath::{Vector2, Vector3};
use terra_ngin::brush::kernel::FalloffKernel;
use terra_ngin::brush::{BrushMode, TerrainBrush};
use terra_ngin::context::PointerState;
use terra_ngin::terrain::SplatChannel;

use crate::common::test_utils::{TopDownCamera, flat_terrain, init_logger};

mod common;

fn primary(x: f32, y: f32) -> PointerState {
    PointerState::new(Vector2::new(x, y), true, false)
}

fn secondary(x: f32, y: f32) -> PointerState {
    PointerState::new(Vector2::new(x, y), true, true)
}

#[test]
fn raise_accumulates_and_stationary_ticks_are_suppressed() {
    init_logger();
    let mut terrain = flat_terrain();
    let mut brush = TerrainBrush::sphere(FalloffKernel::smooth(65));
    brush.scale(4.0); // radius 2 world units

    brush.pointer_moved(Vector2::new(5.0, 5.0), &TopDownCamera, Some(&terrain));
    let center_weight = brush.kernel().center_weight();

    brush.act(&primary(5.0, 5.0), Some(&mut terrain)).unwrap();
    let after_one = terrain.height_field.height(5, 5).unwrap();
    assert!((after_one - center_weight).abs() < 1e-5);

    // Same pointer position: the tick is suppressed.
    brush.act(&primary(5.0, 5.0), Some(&mut terrain)).unwrap();
    assert_eq!(terrain.height_field.height(5, 5).unwrap(), after_one);

    // Pointer moved: the same delta is added again.
    brush.act(&primary(5.0, 5.01), Some(&mut terrain)).unwrap();
    let after_two = terrain.height_field.height(5, 5).unwrap();
    assert!((after_two - 2.0 * center_weight).abs() < 1e-5);

    // Falloff: closer cells gain more, cells beyond the radius are untouched.
    let near = terrain.height_field.height(6, 5).unwrap();
    assert!(near > 0.0 && near < after_two);
    assert_eq!(terrain.height_field.height(8, 5).unwrap(), 0.0);

    assert!(terrain.height_field.take_dirty());
}

#[test]
fn secondary_action_lowers_the_terrain() {
    init_logger();
    let mut terrain = flat_terrain();
    let mut brush = TerrainBrush::sphere(FalloffKernel::smooth(65));
    brush.scale(4.0);
    brush.pointer_moved(Vector2::new(5.0, 5.0), &TopDownCamera, Some(&terrain));

    brush.act(&secondary(5.0, 5.0), Some(&mut terrain)).unwrap();
    let lowered = terrain.height_field.height(5, 5).unwrap();
    assert!((lowered + brush.kernel().center_weight()).abs() < 1e-5);
}

#[test]
fn flatten_overwrites_in_radius_cells_with_the_sampled_height() {
    init_logger();
    let mut terrain = flat_terrain();
    terrain.height_field.set_height(5, 5, 2.0).unwrap();
    terrain.height_field.set_height(4, 5, 5.0).unwrap();
    terrain.height_field.set_height(6, 5, -1.0).unwrap();

    let mut brush = TerrainBrush::sphere(FalloffKernel::smooth(65));
    brush.set_mode(BrushMode::Flatten).unwrap();
    brush.scale(4.0);
    brush.pointer_moved(Vector2::new(5.0, 5.0), &TopDownCamera, Some(&terrain));

    // Pick-height gesture: samples the brush elevation, edits nothing.
    brush.act(&secondary(5.0, 5.0), Some(&mut terrain)).unwrap();
    assert!((brush.height_sample() - 2.0).abs() < 1e-4);
    assert_eq!(terrain.height_field.height(4, 5).unwrap(), 5.0);

    brush.act(&primary(5.1, 5.0), Some(&mut terrain)).unwrap();
    // Every in-radius cell lands on the sample, above or below alike.
    for (x, z) in [(5, 5), (4, 5), (6, 5), (5, 7)] {
        let h = terrain.height_field.height(x, z).unwrap();
        assert!(
            (h - brush.height_sample()).abs() < 1e-4,
            "cell ({}, {}) was not flattened: {}",
            x,
            z,
            h
        );
    }
    // Out of radius: untouched.
    assert_eq!(terrain.height_field.height(5, 8).unwrap(), 0.0);
    assert!(terrain.height_field.take_dirty());
}

#[test]
fn paint_fills_a_disk_in_the_selected_channel() {
    init_logger();
    let mut terrain = flat_terrain();
    let mut brush = TerrainBrush::sphere(FalloffKernel::smooth(65));
    brush.set_mode(BrushMode::Paint).unwrap();
    brush.set_paint_channel(SplatChannel::G);
    brush.scale(4.0); // world radius 2 => 20 paint pixels

    brush.pointer_moved(Vector2::new(5.0, 5.0), &TopDownCamera, Some(&terrain));
    brush.act(&primary(5.0, 5.0), Some(&mut terrain)).unwrap();

    let expected = (0.5f32 * 255.0).round() / 255.0;
    let weight = |x, y| terrain.paint.channel_weight(x, y, SplatChannel::G).unwrap();
    assert!((weight(50, 50) - expected).abs() < 1e-5);
    assert!((weight(50, 69) - expected).abs() < 1e-5);
    // Farther than the radius: untouched.
    assert_eq!(weight(50, 71), 0.0);
    assert_eq!(weight(71, 50), 0.0);
    // Other channels untouched.
    assert_eq!(
        terrain.paint.channel_weight(50, 50, SplatChannel::R),
        Some(0.0)
    );

    // Painting flags the texture, not the geometry.
    assert!(terrain.paint.take_dirty());
    assert!(!terrain.height_field.take_dirty());
    assert!(terrain.height_field.heights_raw().iter().all(|&h| h == 0.0));
}

#[test]
fn smooth_pulls_a_spike_toward_its_neighborhood() {
    init_logger();
    let mut terrain = flat_terrain();
    terrain.height_field.set_height(5, 5, 10.0).unwrap();

    let mut brush = TerrainBrush::full(FalloffKernel::smooth(65));
    brush.set_mode(BrushMode::Smooth).unwrap();
    brush.scale(4.0);
    brush.pointer_moved(Vector2::new(5.0, 5.0), &TopDownCamera, Some(&terrain));

    brush.act(&primary(5.0, 5.0), Some(&mut terrain)).unwrap();

    // The spike moves halfway to its (flat) neighborhood at strength 0.5.
    let peak = terrain.height_field.height(5, 5).unwrap();
    assert!((peak - 5.0).abs() < 1e-4);
    // Neighbors were pulled up from the snapshot average, not from the
    // already-smoothed spike.
    let shoulder = terrain.height_field.height(4, 5).unwrap();
    assert!(shoulder > 0.5 && shoulder < 1.0);
    assert!(terrain.height_field.take_dirty());
}

#[test]
fn indicator_follows_the_brush_and_hides_off_terrain() {
    init_logger();
    let terrain = flat_terrain();
    let mut brush = TerrainBrush::sphere(FalloffKernel::smooth(65));

    brush.pointer_moved(Vector2::new(3.0, 7.0), &TopDownCamera, Some(&terrain));
    assert_eq!(brush.indicator().position, brush.position());
    assert!(brush.indicator_visible(&terrain));

    // A pick ray that misses leaves the center (and visibility) unchanged.
    brush.pointer_moved(Vector2::new(-5.0, 7.0), &TopDownCamera, Some(&terrain));
    assert!(brush.indicator_visible(&terrain));

    brush.set_position(Vector3::new(-5.0, 0.0, 7.0));
    assert!(!brush.indicator_visible(&terrain));
}
