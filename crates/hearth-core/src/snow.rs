//! Fixed-pool snow field. Flakes spawn inside window volumes, fall past the
//! floor and are reset in place; the pool never reallocates.

use glam::Vec3;
use rand::prelude::*;

use crate::constants::{
    SNOW_SPEED_MAX, SNOW_SPEED_MIN, SNOW_SPREAD_HEIGHT, SNOW_SWAY_AMP, SNOW_SWAY_PHASE_STEP,
    SNOW_SWAY_RATE, SNOW_TOP_OFFSET,
};

/// Horizontal bounds of one snow source region ("window").
#[derive(Clone, Copy, Debug)]
pub struct WindowRegion {
    pub x_min: f32,
    pub x_max: f32,
    pub z_min: f32,
    pub z_max: f32,
}

impl WindowRegion {
    #[inline]
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x_min && x <= self.x_max
    }
}

#[derive(Clone, Debug)]
pub struct SnowParams {
    pub count: usize,
    pub floor_y: f32,
    /// Respawn height is `top_offset + rand * spread_height`.
    pub top_offset: f32,
    pub spread_height: f32,
    pub windows: Vec<WindowRegion>,
    pub speed: (f32, f32),
}

impl SnowParams {
    pub fn new(count: usize, floor_y: f32, windows: Vec<WindowRegion>) -> Self {
        assert!(!windows.is_empty(), "snow needs at least one source window");
        Self {
            count,
            floor_y,
            top_offset: SNOW_TOP_OFFSET,
            spread_height: SNOW_SPREAD_HEIGHT,
            windows,
            speed: (SNOW_SPEED_MIN, SNOW_SPEED_MAX),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SnowFlake {
    pub position: Vec3,
    pub speed: f32,
}

/// Fixed-capacity particle pool.
#[derive(Clone, Debug)]
pub struct SnowField {
    pub params: SnowParams,
    pub flakes: Vec<SnowFlake>,
}

impl SnowField {
    /// Seed the pool, drawing source windows round-robin so each contributes
    /// an equal share. Initial heights fill the whole fall column so the
    /// field does not start as a sheet.
    pub fn new(params: SnowParams, rng: &mut StdRng) -> Self {
        assert!(!params.windows.is_empty(), "snow needs at least one source window");
        let top = params.top_offset + params.spread_height;
        let mut flakes = Vec::with_capacity(params.count);
        for i in 0..params.count {
            let w = &params.windows[i % params.windows.len()];
            flakes.push(SnowFlake {
                position: Vec3::new(
                    rng.gen_range(w.x_min..w.x_max),
                    rng.gen_range(params.floor_y..top),
                    rng.gen_range(w.z_min..w.z_max),
                ),
                speed: rng.gen_range(params.speed.0..params.speed.1),
            });
        }
        Self { params, flakes }
    }

    /// Integrate one frame. A flake crossing the floor is respawned in place
    /// within the same call: height re-randomized into the top band, x/z
    /// reseeded from a randomly chosen window.
    pub fn update(&mut self, t: f32, dt: f32, rng: &mut StdRng) {
        for (i, flake) in self.flakes.iter_mut().enumerate() {
            flake.position.y -= flake.speed * dt;
            flake.position.x +=
                (SNOW_SWAY_RATE * t + i as f32 * SNOW_SWAY_PHASE_STEP).sin() * SNOW_SWAY_AMP * dt;
            if flake.position.y < self.params.floor_y {
                let w = &self.params.windows[rng.gen_range(0..self.params.windows.len())];
                flake.position.x = rng.gen_range(w.x_min..w.x_max);
                flake.position.z = rng.gen_range(w.z_min..w.z_max);
                flake.position.y =
                    self.params.top_offset + rng.gen::<f32>() * self.params.spread_height;
            }
        }
    }
}
