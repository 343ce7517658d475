//! Scene assembly and the per-frame coordinator.
//!
//! Everything time-varying lives in [`SceneState`] and is advanced by one
//! explicit [`SceneState::update`] call per rendered frame, so the whole
//! animation is testable without a rendering surface.

use glam::{Vec2, Vec3};
use rand::prelude::*;

use crate::camera::OrbitCamera;
use crate::constants::{camera_target_vec3, fire_light_position_vec3, FLOOR_Y, SNOW_COUNT};
use crate::flame::{FlameConfigError, FlameEnvelopeConfig, FlameSurface, LookTarget};
use crate::garland::{build_garland, Garland, GarlandParams};
use crate::lights::{fire_light_intensity, tree_bulbs, FireLight, TreeLightParams, TwinkleBulb};
use crate::presents::{place_presents, Present, PresentParams};
use crate::snow::{SnowField, SnowParams, WindowRegion};
use crate::derive_seed;

/// Normalized control values from the input collaborator. Device tilt takes
/// precedence over the pointer once available.
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlInput {
    pub pointer: Vec2,
    pub tilt: Option<Vec2>,
}

impl ControlInput {
    #[inline]
    pub fn drive(&self) -> Vec2 {
        let v = self.tilt.unwrap_or(self.pointer);
        v.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
    }
}

/// An axis-aligned colored box of the static scene (fireplace masonry, logs,
/// tree tiers, room shell). Built once; the renderer instances these.
#[derive(Clone, Copy, Debug)]
pub struct StaticBox {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub color: [f32; 3],
}

#[derive(Clone, Debug)]
pub struct SceneState {
    pub camera: OrbitCamera,
    pub flames: Vec<FlameSurface>,
    pub fire_light: FireLight,
    pub garlands: Vec<Garland>,
    /// All twinkle bulbs, garland and tree strands flattened together.
    pub bulbs: Vec<TwinkleBulb>,
    pub presents: Vec<Present>,
    pub snow: SnowField,
    pub decor: Vec<StaticBox>,
    /// Runtime stream for snow respawns.
    rng: StdRng,
}

impl SceneState {
    /// Build the whole scene from one seed. Placement runs here, once; the
    /// per-frame coordinator only mutates what [`update`](Self::update)
    /// touches.
    pub fn build(seed: u64) -> Result<Self, FlameConfigError> {
        let camera = OrbitCamera::new(camera_target_vec3());

        let mut flames = Vec::new();
        // Hearth flame tracks the camera.
        flames.push(FlameSurface::new(
            FlameEnvelopeConfig::hearth()?,
            Vec3::new(0.0, 0.35, -0.55),
            LookTarget::Camera,
        ));
        // Log flames converge on a shared visual center above the logs.
        let log_focus = Vec3::new(0.0, 0.8, 1.6);
        for tip in [
            Vec3::new(-0.55, 0.15, 0.2),
            Vec3::new(0.55, 0.1, 0.2),
            Vec3::new(0.0, 0.2, -0.25),
        ] {
            flames.push(FlameSurface::new(
                FlameEnvelopeConfig::log_tip()?,
                tip,
                LookTarget::Fixed(log_focus),
            ));
        }
        for side in [Vec3::new(-0.3, -0.15, 0.55), Vec3::new(0.35, -0.2, 0.5)] {
            flames.push(FlameSurface::new(
                FlameEnvelopeConfig::log_side()?,
                side,
                LookTarget::Fixed(log_focus),
            ));
        }

        let mut garland_rng = StdRng::seed_from_u64(derive_seed(seed, 1));
        let mut garlands = Vec::new();
        let mut bulbs = Vec::new();
        // Main strand across the mantel, one smaller strand per side window.
        let (g, b) = build_garland(&GarlandParams::default(), &mut garland_rng);
        garlands.push(g);
        bulbs.extend(b);
        for x in [-4.5_f32, 4.5] {
            let params = GarlandParams {
                span: 2.4,
                height: 1.9,
                center: Vec3::new(x, 0.0, -4.3),
                anchors: (4, 5),
                bulbs: (4, 7),
                ..GarlandParams::default()
            };
            let (g, b) = build_garland(&params, &mut garland_rng);
            garlands.push(g);
            bulbs.extend(b);
        }

        let mut tree_rng = StdRng::seed_from_u64(derive_seed(seed, 4));
        bulbs.extend(tree_bulbs(&TreeLightParams::default(), &mut tree_rng));

        let mut present_rng = StdRng::seed_from_u64(derive_seed(seed, 2));
        let presents = place_presents(&PresentParams::default(), &mut present_rng);

        let mut snow_rng = StdRng::seed_from_u64(derive_seed(seed, 3));
        let snow = SnowField::new(
            SnowParams::new(SNOW_COUNT, FLOOR_Y - 0.1, window_regions()),
            &mut snow_rng,
        );

        log::info!(
            "scene built: {} flames, {} garlands, {} bulbs, {} presents, {} snow flakes",
            flames.len(),
            garlands.len(),
            bulbs.len(),
            presents.len(),
            snow.flakes.len()
        );

        Ok(Self {
            camera,
            flames,
            fire_light: FireLight::new(fire_light_position_vec3()),
            garlands,
            bulbs,
            presents,
            snow,
            decor: build_decor(),
            rng: StdRng::seed_from_u64(derive_seed(seed, 5)),
        })
    }

    /// Advance all time-varying state by one frame. Order is load-bearing:
    /// the camera moves first, so flame quads face this frame's eye.
    pub fn update(&mut self, t: f32, dt: f32, input: &ControlInput) {
        self.camera.update(input.drive());

        let eye = self.camera.eye;
        for flame in &mut self.flames {
            flame.time = t;
            flame.orient(eye);
        }

        self.fire_light.intensity = fire_light_intensity(t);

        for bulb in &mut self.bulbs {
            bulb.update(t);
        }

        self.snow.update(t, dt, &mut self.rng);
    }

    /// Push a new viewport size into every flame surface.
    pub fn set_resolution(&mut self, width: f32, height: f32) {
        let res = Vec2::new(width.max(1.0), height.max(1.0));
        for flame in &mut self.flames {
            flame.resolution = res;
        }
    }
}

/// The two back-wall windows that seed snow.
pub fn window_regions() -> Vec<WindowRegion> {
    vec![
        WindowRegion { x_min: -5.4, x_max: -3.6, z_min: -4.7, z_max: -4.3 },
        WindowRegion { x_min: 3.6, x_max: 5.4, z_min: -4.7, z_max: -4.3 },
    ]
}

/// Static masonry, logs, tree tiers and room shell. Fixed literal
/// dimensions carried over from the hearth layout; no algorithmic weight.
fn build_decor() -> Vec<StaticBox> {
    let brick = [0.48, 0.26, 0.2];
    let stone = [0.11, 0.11, 0.14];
    let wood = [0.29, 0.17, 0.09];
    let pine = [0.1, 0.32, 0.16];
    let mut boxes = vec![
        // Hearth slab, jambs, mantel, back panel, inner shelf.
        StaticBox { center: Vec3::new(0.0, -1.25, 0.0), half_extents: Vec3::new(3.3, 0.25, 1.1), color: brick },
        StaticBox { center: Vec3::new(-3.05, 0.2, 0.0), half_extents: Vec3::new(0.35, 1.6, 1.1), color: brick },
        StaticBox { center: Vec3::new(3.05, 0.2, 0.0), half_extents: Vec3::new(0.35, 1.6, 1.1), color: brick },
        StaticBox { center: Vec3::new(0.0, 2.1, 0.0), half_extents: Vec3::new(3.3, 0.3, 1.2), color: brick },
        StaticBox { center: Vec3::new(0.0, 0.4, -1.1), half_extents: Vec3::new(2.6, 1.6, 0.175), color: stone },
        StaticBox { center: Vec3::new(0.0, -0.8, 0.1), half_extents: Vec3::new(2.7, 0.175, 1.0), color: stone },
        // Teepee logs, approximated as upright boxes.
        StaticBox { center: Vec3::new(-0.65, -0.8, 0.2), half_extents: Vec3::new(0.22, 0.75, 0.22), color: wood },
        StaticBox { center: Vec3::new(0.65, -0.85, 0.2), half_extents: Vec3::new(0.22, 0.75, 0.22), color: wood },
        StaticBox { center: Vec3::new(0.0, -0.78, -0.32), half_extents: Vec3::new(0.22, 0.75, 0.22), color: wood },
        StaticBox { center: Vec3::new(0.0, -0.82, 0.75), half_extents: Vec3::new(0.22, 0.75, 0.22), color: wood },
        // Floor.
        StaticBox { center: Vec3::new(0.0, -1.55, 0.0), half_extents: Vec3::new(7.0, 0.05, 5.0), color: [0.06, 0.06, 0.09] },
        // Back wall with window cutout approximated by three slabs.
        StaticBox { center: Vec3::new(0.0, 1.0, -4.8), half_extents: Vec3::new(2.8, 2.6, 0.1), color: [0.09, 0.1, 0.14] },
        StaticBox { center: Vec3::new(-6.2, 1.0, -4.8), half_extents: Vec3::new(0.8, 2.6, 0.1), color: [0.09, 0.1, 0.14] },
        StaticBox { center: Vec3::new(6.2, 1.0, -4.8), half_extents: Vec3::new(0.8, 2.6, 0.1), color: [0.09, 0.1, 0.14] },
    ];
    // Tree: three stacked pine tiers plus a trunk, matching the light spiral.
    let tree_base = Vec3::new(3.6, -1.5, 0.6);
    boxes.push(StaticBox {
        center: tree_base + Vec3::new(0.0, 0.25, 0.0),
        half_extents: Vec3::new(0.12, 0.25, 0.12),
        color: wood,
    });
    for (i, (h, r)) in [(0.7_f32, 0.95_f32), (1.4, 0.7), (2.05, 0.45)].iter().enumerate() {
        boxes.push(StaticBox {
            center: tree_base + Vec3::new(0.0, *h, 0.0),
            half_extents: Vec3::new(*r, 0.38 - i as f32 * 0.04, *r),
            color: pine,
        });
    }
    boxes
}
