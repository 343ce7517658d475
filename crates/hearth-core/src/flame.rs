//! Flame surface generation: one shaded quad per visual role (hearth flame,
//! log-tip flame, log-side flame), all driven by the same envelope logic.
//!
//! The per-pixel algorithm here is the CPU reference for
//! `shaders/flame.wgsl` and is what the tests exercise; the renderer uploads
//! the same envelope values as uniforms and lets the GPU evaluate it.

use glam::{Mat4, Vec2, Vec3};
use thiserror::Error;

use crate::noise::{fbm, mix, smoothstep};

/// Color ramp anchors, coldest to hottest. The ramp is applied as four
/// nested smoothstep blends in this order; reordering changes the look.
pub const DEEP_RED: Vec3 = Vec3::new(0.35, 0.07, 0.05);
pub const EMBER: Vec3 = Vec3::new(0.85, 0.25, 0.08);
pub const ORANGE: Vec3 = Vec3::new(1.0, 0.55, 0.15);
pub const YELLOW: Vec3 = Vec3::new(1.0, 0.86, 0.25);
pub const WHITE_HOT: Vec3 = Vec3::new(1.0, 0.97, 0.86);

/// Smallest allowed extent of the fire sub-window. The UV remap divides by
/// `fire_max - fire_min`, so degenerate windows are rejected at construction.
pub const MIN_WINDOW_EXTENT: f32 = 1e-3;

#[derive(Debug, Error, PartialEq)]
pub enum FlameConfigError {
    #[error("fire window is degenerate on {axis}: extent {extent} below minimum")]
    DegenerateWindow { axis: &'static str, extent: f32 },
    #[error("quad dimensions must be positive, got {width}x{height}")]
    NonPositiveQuad { width: f32, height: f32 },
}

/// Immutable envelope parameters for one flame surface. Built once at scene
/// construction via [`FlameEnvelopeConfig::new`], which validates the window.
#[derive(Clone, Copy, Debug)]
pub struct FlameEnvelopeConfig {
    /// Quad size in world units.
    pub width: f32,
    pub height: f32,
    /// Rectangular UV sub-window where fire is drawn; alpha is exactly zero
    /// outside it.
    pub fire_min: Vec2,
    pub fire_max: Vec2,
    pub alpha_scale: f32,
    pub intensity_cap: f32,
    /// Additive intensity boost near `cone_center`.
    pub cone_center: Vec2,
    pub cone_boost: f32,
    /// Width of the alpha cone mask that narrows the flame toward its base.
    pub cone_spread: f32,
    /// Elliptical alpha falloff.
    pub round_center: Vec2,
    pub round_scale: Vec2,
    /// x: base intensity at the flame root, y: falloff per unit of height.
    pub base_params: Vec2,
    /// Smoothstep windows (start, end) over fire-local UV.
    pub fade_top: Vec2,
    pub fade_bottom: Vec2,
    pub fade_side: Vec2,
}

impl FlameEnvelopeConfig {
    pub fn new(width: f32, height: f32, fire_min: Vec2, fire_max: Vec2) -> Result<Self, FlameConfigError> {
        if width <= 0.0 || height <= 0.0 {
            return Err(FlameConfigError::NonPositiveQuad { width, height });
        }
        let extent = fire_max - fire_min;
        if extent.x < MIN_WINDOW_EXTENT {
            return Err(FlameConfigError::DegenerateWindow { axis: "x", extent: extent.x });
        }
        if extent.y < MIN_WINDOW_EXTENT {
            return Err(FlameConfigError::DegenerateWindow { axis: "y", extent: extent.y });
        }
        Ok(Self {
            width,
            height,
            fire_min,
            fire_max,
            alpha_scale: 1.0,
            intensity_cap: 1.35,
            cone_center: Vec2::new(0.5, -0.05),
            cone_boost: 0.5,
            cone_spread: 0.9,
            round_center: Vec2::new(0.5, 0.45),
            round_scale: Vec2::new(0.75, 0.8),
            base_params: Vec2::new(1.15, 1.0),
            fade_top: Vec2::new(0.82, 1.0),
            fade_bottom: Vec2::new(0.0, 0.08),
            fade_side: Vec2::new(0.0, 0.05),
        })
    }

    /// The main fire filling the hearth opening.
    pub fn hearth() -> Result<Self, FlameConfigError> {
        Self::new(3.1, 2.8, Vec2::new(0.08, 0.0), Vec2::new(0.92, 0.92))
    }

    /// Small flame licking up from the tip of one log.
    pub fn log_tip() -> Result<Self, FlameConfigError> {
        let mut cfg = Self::new(0.9, 1.1, Vec2::new(0.18, 0.0), Vec2::new(0.82, 0.88))?;
        cfg.alpha_scale = 0.85;
        cfg.intensity_cap = 1.25;
        cfg.cone_boost = 0.65;
        cfg.cone_spread = 0.7;
        cfg.base_params = Vec2::new(1.05, 1.1);
        Ok(cfg)
    }

    /// Low, wide flame hugging the side of a log.
    pub fn log_side() -> Result<Self, FlameConfigError> {
        let mut cfg = Self::new(1.4, 0.7, Vec2::new(0.1, 0.0), Vec2::new(0.9, 0.8))?;
        cfg.alpha_scale = 0.6;
        cfg.intensity_cap = 1.1;
        cfg.cone_boost = 0.3;
        cfg.cone_spread = 1.3;
        cfg.round_scale = Vec2::new(0.9, 0.6);
        cfg.base_params = Vec2::new(1.0, 0.9);
        Ok(cfg)
    }

    #[inline]
    fn in_window(&self, uv: Vec2) -> bool {
        uv.x >= self.fire_min.x
            && uv.x <= self.fire_max.x
            && uv.y >= self.fire_min.y
            && uv.y <= self.fire_max.y
    }

    #[inline]
    fn fire_uv(&self, uv: Vec2) -> Vec2 {
        (uv - self.fire_min) / (self.fire_max - self.fire_min)
    }

    /// Scalar flame intensity at `uv`, clamped to `[0, intensity_cap]`.
    pub fn intensity(&self, uv: Vec2, time: f32, resolution: Vec2) -> f32 {
        if !self.in_window(uv) {
            return 0.0;
        }
        let fire_uv = self.fire_uv(uv);
        let res_scale = resolution / resolution.x.min(resolution.y).max(1.0);

        // Time-advected flow coordinate: taller than wide, drifting upward,
        // with a horizontal wobble keyed to height.
        let mut flow = fire_uv * Vec2::new(1.0, 1.35);
        flow.y += time * 0.65;
        flow.x += (fire_uv.y * 8.0 + time * 1.6).sin() * 0.12;

        let body = fbm(flow * 3.4 * res_scale + Vec2::new(0.0, time * 0.9));
        let wisps = fbm(fire_uv * 10.0 * res_scale + Vec2::new(time * 2.8, -time * 2.2));

        let base = self.base_params.x - fire_uv.y * self.base_params.y;
        let edge_taper = smoothstep(0.0, 0.2, (fire_uv.x - 0.5).abs());
        let cone = 1.0
            - smoothstep(
                0.0,
                0.2,
                ((fire_uv - self.cone_center) * Vec2::new(0.9, 1.6)).length(),
            );

        let mut intensity = base + body * 0.75 + wisps * 0.22;
        intensity *= mix(1.0, 0.6, edge_taper);
        intensity += cone * self.cone_boost;
        intensity.clamp(0.0, self.intensity_cap)
    }

    /// Alpha at `uv`: the product of the top/bottom/side fades, the cone
    /// mask, the round mask and the global alpha scale. Exactly zero outside
    /// the fire window.
    pub fn alpha(&self, uv: Vec2) -> f32 {
        if !self.in_window(uv) {
            return 0.0;
        }
        let fire_uv = self.fire_uv(uv);
        let fade_top = 1.0 - smoothstep(self.fade_top.x, self.fade_top.y, fire_uv.y);
        let fade_bottom = smoothstep(self.fade_bottom.x, self.fade_bottom.y, fire_uv.y);
        let fade_sides = smoothstep(self.fade_side.x, self.fade_side.y, fire_uv.x)
            * smoothstep(self.fade_side.x, self.fade_side.y, 1.0 - fire_uv.x);
        let cone = 1.0
            - smoothstep(
                0.0,
                self.cone_spread,
                (fire_uv.x - 0.5).abs() / (fire_uv.y + 0.1),
            );
        let round_d = ((fire_uv - self.round_center) / self.round_scale).length();
        let round = 1.0 - smoothstep(0.7, 1.0, round_d);
        fade_top * fade_bottom * fade_sides * cone * round * self.alpha_scale
    }

    /// Full per-pixel evaluation: `(color, alpha)` for one UV sample.
    pub fn shade(&self, uv: Vec2, time: f32, resolution: Vec2) -> (Vec3, f32) {
        let alpha = self.alpha(uv);
        if alpha <= 0.0 {
            return (Vec3::ZERO, 0.0);
        }
        let fire_uv = self.fire_uv(uv);
        let intensity = self.intensity(uv, time, resolution);
        let mut color = flame_color(intensity);

        let smoke = smoothstep(0.6, 1.0, fire_uv.y);
        color *= 1.0 - smoke * 0.35;
        color *= flame_flicker(time);
        (color, alpha)
    }
}

/// Map scalar intensity to the deep-red → white-hot ramp. Monotonically
/// "hotter" with increasing intensity.
pub fn flame_color(intensity: f32) -> Vec3 {
    let t1 = smoothstep(0.05, 0.45, intensity);
    let t2 = smoothstep(0.3, 0.7, intensity);
    let t3 = smoothstep(0.55, 0.95, intensity);
    let t4 = smoothstep(0.75, 1.2, intensity);
    let mut color = DEEP_RED.lerp(EMBER, t1);
    color = color.lerp(ORANGE, t2);
    color = color.lerp(YELLOW, t3);
    color.lerp(WHITE_HOT, t4)
}

/// Global brightness flicker. Two incommensurate frequencies so the pattern
/// does not read as periodic over short windows.
#[inline]
pub fn flame_flicker(time: f32) -> f32 {
    1.0 + 0.035 * (time * 6.0).sin() + 0.045 * (time * 11.0).sin()
}

/// Where a flame quad points each frame.
#[derive(Clone, Copy, Debug)]
pub enum LookTarget {
    /// Face the active camera (hearth flame).
    Camera,
    /// Face a fixed world-space point, so e.g. all side flames converge on a
    /// shared visual center instead of tracking the moving camera.
    Fixed(Vec3),
}

/// One flame quad: envelope config plus the two uniforms mutated per frame.
#[derive(Clone, Debug)]
pub struct FlameSurface {
    pub config: FlameEnvelopeConfig,
    pub position: Vec3,
    pub look_at: LookTarget,
    /// Elapsed scene time, pushed every frame.
    pub time: f32,
    /// Viewport size in pixels, pushed on resize.
    pub resolution: Vec2,
    /// Horizontal facing direction, recomputed each frame from `look_at`.
    pub facing: Vec3,
}

impl FlameSurface {
    pub fn new(config: FlameEnvelopeConfig, position: Vec3, look_at: LookTarget) -> Self {
        Self {
            config,
            position,
            look_at,
            time: 0.0,
            resolution: Vec2::new(640.0, 480.0),
            facing: Vec3::Z,
        }
    }

    /// Re-orient toward the look-at target using this frame's camera eye.
    /// Only yaw is applied; flame quads stay upright.
    pub fn orient(&mut self, camera_eye: Vec3) {
        let target = match self.look_at {
            LookTarget::Camera => camera_eye,
            LookTarget::Fixed(p) => p,
        };
        let mut dir = target - self.position;
        dir.y = 0.0;
        if dir.length_squared() > 1e-8 {
            self.facing = dir.normalize();
        }
    }

    /// Upright billboard model matrix for the quad.
    pub fn model_matrix(&self) -> Mat4 {
        let yaw = self.facing.x.atan2(self.facing.z);
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(yaw)
            * Mat4::from_scale(Vec3::new(self.config.width, self.config.height, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_window_is_rejected() {
        let err = FlameEnvelopeConfig::new(1.0, 1.0, Vec2::new(0.5, 0.0), Vec2::new(0.5, 0.9));
        assert_eq!(
            err.unwrap_err(),
            FlameConfigError::DegenerateWindow { axis: "x", extent: 0.0 }
        );
        let err = FlameEnvelopeConfig::new(1.0, 1.0, Vec2::new(0.1, 0.9), Vec2::new(0.9, 0.9));
        assert!(matches!(err, Err(FlameConfigError::DegenerateWindow { axis: "y", .. })));
    }

    #[test]
    fn non_positive_quad_is_rejected() {
        let err = FlameEnvelopeConfig::new(0.0, 1.0, Vec2::ZERO, Vec2::ONE);
        assert!(matches!(err, Err(FlameConfigError::NonPositiveQuad { .. })));
    }

    #[test]
    fn presets_validate() {
        assert!(FlameEnvelopeConfig::hearth().is_ok());
        assert!(FlameEnvelopeConfig::log_tip().is_ok());
        assert!(FlameEnvelopeConfig::log_side().is_ok());
    }

    #[test]
    fn surface_faces_fixed_target_horizontally() {
        let cfg = FlameEnvelopeConfig::log_side().unwrap();
        let mut s = FlameSurface::new(
            cfg,
            Vec3::new(1.0, 0.0, 0.0),
            LookTarget::Fixed(Vec3::new(1.0, 5.0, 2.0)),
        );
        s.orient(Vec3::new(-10.0, 0.0, -10.0)); // camera must be ignored
        assert!((s.facing - Vec3::Z).length() < 1e-6);
        assert_eq!(s.facing.y, 0.0);
    }
}
