//! Terrain brushes: per-tick editing of the height field and paint map.
//!
//! A [`TerrainBrush`] modifies the terrain in various ways ([`BrushMode`]):
//! raising/lowering and flattening vertices of the height grid, smoothing,
//! and painting the splat map. Each tick the host feeds it the current
//! [`PointerState`]; the brush resolves the gesture into a [`BrushAction`],
//! sweeps the grid cells under its falloff kernel and writes the edit
//! through to the bound terrain.
//!
//! - `kernel` holds the radial falloff pixmap brushes sample their
//!   per-cell weight from

pub mod kernel;

use cgmath::{EuclideanSpace, InnerSpace, Vector2, Vector3};
use instant::Instant;
use log::debug;
use thiserror::Error;

use crate::{
    context::{PointerState, RayProvider},
    data_structures::transform::Transform,
    pick::pick_terrain_point,
    terrain::{HeightField, SplatChannel, Terrain, TerrainError},
};

use kernel::FalloffKernel;

/// Defines the draw mode of a brush.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushMode {
    /// Raises or lowers the terrain height.
    RaiseLower,
    /// Sets all vertices of the selection to a sampled reference height.
    Flatten,
    /// Moves vertices of the selection toward their neighborhood average.
    Smooth,
    /// Paints on the splat map of the terrain.
    Paint,
}

impl std::fmt::Display for BrushMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BrushMode::RaiseLower => "RAISE_LOWER",
            BrushMode::Flatten => "FLATTEN",
            BrushMode::Smooth => "SMOOTH",
            BrushMode::Paint => "PAINT",
        };
        f.write_str(name)
    }
}

/// The resolved user gesture driving one tick.
///
/// RAISE_LOWER raises on PRIMARY and lowers on SECONDARY; FLATTEN edits on
/// PRIMARY and samples the reference height on SECONDARY.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BrushAction {
    Primary,
    Secondary,
}

#[derive(Debug, Error)]
pub enum BrushError {
    /// The brush was set to a mode it does not support. The current mode is
    /// left unchanged.
    #[error("{brush} does not support {mode}")]
    ModeNotSupported {
        brush: &'static str,
        mode: BrushMode,
    },
}

const SPHERE_MODES: &[BrushMode] = &[BrushMode::RaiseLower, BrushMode::Flatten, BrushMode::Paint];
const FULL_MODES: &[BrushMode] = &[
    BrushMode::RaiseLower,
    BrushMode::Flatten,
    BrushMode::Smooth,
    BrushMode::Paint,
];

/// A terrain brush: per-tick editing state machine over a bound terrain.
///
/// The brush owns its falloff kernel and a visual indicator transform. The
/// indicator's scale and the logical radius are both derived from one
/// accumulated scale factor, so they cannot diverge.
#[derive(Debug)]
pub struct TerrainBrush {
    name: &'static str,
    supported_modes: &'static [BrushMode],
    mode: BrushMode,
    kernel: FalloffKernel,

    // brush settings
    position: Vector3<f32>,
    radius: f32,
    strength: f32,
    height_sample: f32,
    paint_channel: SplatChannel,

    // indicator coupling
    indicator: Transform,
    reference_width: f32,
    scale_factor: f32,

    // pointer position of the last edit, used to skip redundant ticks
    last_edit: Option<Vector2<f32>>,
}

impl TerrainBrush {
    /// Create a brush with an explicit capability set. The initial mode is
    /// the first supported one.
    pub fn new(
        name: &'static str,
        supported_modes: &'static [BrushMode],
        kernel: FalloffKernel,
    ) -> Self {
        assert!(
            !supported_modes.is_empty(),
            "a brush must support at least one mode"
        );
        let mut brush = Self {
            name,
            supported_modes,
            mode: supported_modes[0],
            kernel,
            position: Vector3::new(0.0, 0.0, 0.0),
            radius: 0.0,
            strength: 0.5,
            height_sample: 0.0,
            paint_channel: SplatChannel::R,
            indicator: Transform::new(),
            reference_width: 1.0,
            scale_factor: 1.0,
            last_edit: None,
        };
        // Establish the radius from the initial scale factor.
        brush.scale(1.0);
        brush
    }

    /// The standard sphere brush: raise/lower, flatten and paint.
    pub fn sphere(kernel: FalloffKernel) -> Self {
        Self::new("Sphere brush", SPHERE_MODES, kernel)
    }

    /// A brush supporting every mode, smoothing included.
    pub fn full(kernel: FalloffKernel) -> Self {
        Self::new("Full brush", FULL_MODES, kernel)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn supports_mode(&self, mode: BrushMode) -> bool {
        self.supported_modes.contains(&mode)
    }

    /// Switch the brush mode. Validated before any state changes; an
    /// unsupported mode leaves the current mode untouched.
    pub fn set_mode(&mut self, mode: BrushMode) -> Result<(), BrushError> {
        if !self.supports_mode(mode) {
            return Err(BrushError::ModeNotSupported {
                brush: self.name,
                mode,
            });
        }
        self.mode = mode;
        Ok(())
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    /// Reposition the brush center directly (e.g. when restoring tool
    /// state); the indicator follows.
    pub fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.indicator.position = position;
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.clamp(0.0, 1.0);
    }

    pub fn paint_channel(&self) -> SplatChannel {
        self.paint_channel
    }

    pub fn set_paint_channel(&mut self, channel: SplatChannel) {
        self.paint_channel = channel;
    }

    pub fn height_sample(&self) -> f32 {
        self.height_sample
    }

    pub fn kernel(&self) -> &FalloffKernel {
        &self.kernel
    }

    /// The visual indicator's world transform, for the render collaborator.
    pub fn indicator(&self) -> &Transform {
        &self.indicator
    }

    /// Whether the indicator should be drawn: only while the brush center
    /// lies within the terrain's horizontal bounds.
    pub fn indicator_visible(&self, terrain: &Terrain) -> bool {
        terrain
            .height_field
            .is_on_terrain(self.position.x, self.position.z)
    }

    /// Grow or shrink the brush by `factor`.
    ///
    /// The indicator scale and the logical radius are recomputed from the
    /// same accumulated factor: `radius = reference_width * scale_factor / 2`.
    pub fn scale(&mut self, factor: f32) {
        self.indicator.scale = self.indicator.scale * factor;
        self.scale_factor *= factor;
        self.radius = (self.reference_width * self.scale_factor) / 2.0;
    }

    /// Scroll gesture: shrink on scroll-down, grow on scroll-up.
    pub fn scrolled(&mut self, amount: f32) {
        if amount < 0.0 {
            self.scale(0.9);
        } else {
            self.scale(1.1);
        }
    }

    /// Resolve the tick's gesture from the raw input bits: SECONDARY only
    /// while both controls are held, PRIMARY while the primary control alone
    /// is held, nothing otherwise.
    pub fn resolve_action(pointer: &PointerState) -> Option<BrushAction> {
        match (pointer.primary_held, pointer.secondary_held) {
            (true, true) => Some(BrushAction::Secondary),
            (true, false) => Some(BrushAction::Primary),
            _ => None,
        }
    }

    /// Pointer-move/drag handler: re-pick the brush center on the terrain
    /// surface under the pointer and reposition the indicator.
    ///
    /// Without a bound terrain the center stays where it was; the indicator
    /// is still (re)positioned to it, matching the unconditional indicator
    /// update of the drag path.
    pub fn pointer_moved(
        &mut self,
        screen: Vector2<f32>,
        camera: &dyn RayProvider,
        terrain: Option<&Terrain>,
    ) {
        if let Some(terrain) = terrain {
            if let Some(hit) = pick_terrain_point(camera, screen, &terrain.height_field) {
                self.position = hit.to_vec();
            }
        }
        self.indicator.position = self.position;
    }

    /// Apply one brush tick against the bound terrain.
    ///
    /// No gesture, no bound terrain, or a pointer that has not moved since
    /// the last edit all make this a no-op. The FLATTEN height-sampling
    /// gesture (SECONDARY while in FLATTEN) is checked before the
    /// stationary-pointer guard so height picking always works.
    pub fn act(
        &mut self,
        pointer: &PointerState,
        terrain: Option<&mut Terrain>,
    ) -> Result<(), TerrainError> {
        let Some(action) = Self::resolve_action(pointer) else {
            return Ok(());
        };
        let Some(terrain) = terrain else {
            return Ok(());
        };

        // Sample height: a pick gesture, not an edit.
        if action == BrushAction::Secondary && self.mode == BrushMode::Flatten {
            self.height_sample = self.position.y;
            return Ok(());
        }

        // Only act if the pointer has moved since the last edit.
        if self.last_edit == Some(pointer.coords) {
            return Ok(());
        }

        let started = Instant::now();
        if self.mode == BrushMode::Paint {
            self.paint(terrain);
        } else {
            self.shape(action, &mut terrain.height_field)?;
            terrain.invalidate();
        }
        debug!(
            "{} {} tick took {:?}",
            self.name,
            self.mode,
            started.elapsed()
        );
        self.last_edit = Some(pointer.coords);
        Ok(())
    }

    /// Paint a uniform disk into the splat map. The brush's world center and
    /// radius are mapped into pixel space by the ratio of map resolution to
    /// terrain extent.
    fn paint(&self, terrain: &mut Terrain) {
        let hf = &terrain.height_field;
        let map = &mut terrain.paint;
        let origin = hf.position();
        let splat_x = (self.position.x - origin.x) / hf.width() * map.width() as f32;
        let splat_y = (self.position.z - origin.z) / hf.depth() * map.height() as f32;
        let splat_radius = self.radius / hf.width() * map.width() as f32;
        map.paint_circle(
            splat_x as i32,
            splat_y as i32,
            splat_radius as i32,
            self.strength,
            self.paint_channel,
        );
        map.mark_dirty();
    }

    /// Sweep the height-affecting modes over the grid cells inside the
    /// brush disk.
    ///
    /// Iteration is restricted to the cell bounding box of
    /// `[center - radius, center + radius]`; cells outside it cannot pass
    /// the distance test, so the output is identical to a full-grid sweep.
    fn shape(&self, action: BrushAction, hf: &mut HeightField) -> Result<(), TerrainError> {
        let n = hf.vertex_resolution();
        let nx = (n - 1) as f32;
        let origin = hf.position();
        let (width, depth) = (hf.width(), hf.depth());
        let cell_x = move |world: f32| (world - origin.x) / width * nx;
        let cell_z = move |world: f32| (world - origin.z) / depth * nx;
        let x0 = cell_x(self.position.x - self.radius).floor().max(0.0) as usize;
        let x1 = (cell_x(self.position.x + self.radius).ceil().max(0.0) as usize).min(n - 1);
        let z0 = cell_z(self.position.z - self.radius).floor().max(0.0) as usize;
        let z1 = (cell_z(self.position.z + self.radius).ceil().max(0.0) as usize).min(n - 1);
        if x0 > x1 || z0 > z1 {
            return Ok(());
        }

        match self.mode {
            BrushMode::RaiseLower | BrushMode::Flatten => {
                for z in z0..=z1 {
                    for x in x0..=x1 {
                        let vertex = hf.vertex_position(x, z)?;
                        let offset = Vector2::new(
                            vertex.x - self.position.x,
                            vertex.z - self.position.z,
                        );
                        if offset.magnitude() > self.radius {
                            continue;
                        }
                        if self.mode == BrushMode::RaiseLower {
                            let weight = self.kernel.sample(offset, self.radius);
                            let delta = match action {
                                BrushAction::Primary => weight,
                                BrushAction::Secondary => -weight,
                            };
                            let current = hf.height(x, z)?;
                            hf.set_height(x, z, current + delta)?;
                        } else {
                            hf.set_height(x, z, self.height_sample)?;
                        }
                    }
                }
            }
            BrushMode::Smooth => {
                // Smooth against a snapshot of the affected region (one cell
                // of margin for the neighbor reads) so the result does not
                // depend on sweep order.
                let rx0 = x0.saturating_sub(1);
                let rz0 = z0.saturating_sub(1);
                let rx1 = (x1 + 1).min(n - 1);
                let rz1 = (z1 + 1).min(n - 1);
                let region_width = rx1 - rx0 + 1;
                let mut region = Vec::with_capacity(region_width * (rz1 - rz0 + 1));
                for z in rz0..=rz1 {
                    for x in rx0..=rx1 {
                        region.push(hf.height(x, z)?);
                    }
                }
                let snapshot = |x: usize, z: usize| region[(z - rz0) * region_width + (x - rx0)];
                for z in z0..=z1 {
                    for x in x0..=x1 {
                        let vertex = hf.vertex_position(x, z)?;
                        let offset = Vector2::new(
                            vertex.x - self.position.x,
                            vertex.z - self.position.z,
                        );
                        if offset.magnitude() > self.radius {
                            continue;
                        }
                        let mut sum = 0.0;
                        let mut count = 0.0;
                        if x > 0 {
                            sum += snapshot(x - 1, z);
                            count += 1.0;
                        }
                        if x + 1 < n {
                            sum += snapshot(x + 1, z);
                            count += 1.0;
                        }
                        if z > 0 {
                            sum += snapshot(x, z - 1);
                            count += 1.0;
                        }
                        if z + 1 < n {
                            sum += snapshot(x, z + 1);
                            count += 1.0;
                        }
                        let average = sum / count;
                        let t = (self.strength * self.kernel.sample(offset, self.radius))
                            .clamp(0.0, 1.0);
                        let current = snapshot(x, z);
                        hf.set_height(x, z, current + (average - current) * t)?;
                    }
                }
            }
            BrushMode::Paint => unreachable!("paint is handled before the grid sweep"),
        }
        Ok(())
    }
}
