use glam::Vec3;

// Shared visual tuning constants used by both web and native frontends.

// Room layout
pub const FLOOR_Y: f32 = -1.5; // world-space floor height

// Camera orbit
pub const CAMERA_TARGET: [f32; 3] = [0.0, 1.0, 0.0];
pub const CAMERA_RADIUS: f32 = 6.0;
pub const CAMERA_HEIGHT: f32 = 1.6;
pub const CAMERA_YAW_SPAN: f32 = 0.55; // radians of orbit per unit of input
pub const CAMERA_HEIGHT_SPAN: f32 = 0.9;
// Fixed-rate exponential approach toward the desired eye, applied once per
// rendered frame. Deliberately not time-scaled, so the settle speed tracks
// the display refresh rate.
pub const CAMERA_SMOOTHING: f32 = 0.06;

// Fire light flicker (kept correlated with, but distinct from, the shader's
// own flicker term)
pub const FIRE_LIGHT_BASE: f32 = 1.35;
pub const FIRE_LIGHT_AMP_A: f32 = 0.15;
pub const FIRE_LIGHT_AMP_B: f32 = 0.10;
pub const FIRE_LIGHT_POSITION: [f32; 3] = [0.0, 1.1, 1.2];

// Twinkle bulbs never go fully dark
pub const TWINKLE_MIN_INTENSITY: f32 = 0.3;

// Snow
pub const SNOW_COUNT: usize = 400;
pub const SNOW_TOP_OFFSET: f32 = 2.0;
pub const SNOW_SPREAD_HEIGHT: f32 = 7.0;
pub const SNOW_SPEED_MIN: f32 = 1.2;
pub const SNOW_SPEED_MAX: f32 = 2.2;
pub const SNOW_SWAY_RATE: f32 = 0.6;
pub const SNOW_SWAY_AMP: f32 = 0.25;
pub const SNOW_SWAY_PHASE_STEP: f32 = 0.37;

// Bulb palette shared by garlands and the tree
pub const BULB_PALETTE: [[f32; 3]; 5] = [
    [1.0, 0.85, 0.55], // warm white
    [0.95, 0.25, 0.2], // red
    [1.0, 0.7, 0.2],   // gold
    [0.3, 0.85, 0.4],  // green
    [0.35, 0.55, 1.0], // blue
];

#[inline]
pub fn camera_target_vec3() -> Vec3 {
    Vec3::from(CAMERA_TARGET)
}

#[inline]
pub fn fire_light_position_vec3() -> Vec3 {
    Vec3::from(FIRE_LIGHT_POSITION)
}
