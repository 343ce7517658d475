//! Twinkle bulbs and the flickering fire light.

use glam::Vec3;
use rand::prelude::*;

use crate::constants::{
    BULB_PALETTE, FIRE_LIGHT_AMP_A, FIRE_LIGHT_AMP_B, FIRE_LIGHT_BASE, TWINKLE_MIN_INTENSITY,
};

/// A point-like light-emitting decoration. Garland bulbs carry one color;
/// tree bulbs carry two and blend between them over time.
#[derive(Clone, Debug)]
pub struct TwinkleBulb {
    pub position: Vec3,
    pub color: Vec3,
    pub second_color: Option<Vec3>,
    pub base_intensity: f32,
    pub amplitude: f32,
    pub speed: f32,
    pub phase: f32,
    /// Output of the last coordinator step.
    pub intensity: f32,
    pub current_color: Vec3,
}

impl TwinkleBulb {
    pub fn new(position: Vec3, color: Vec3, rng: &mut StdRng) -> Self {
        Self {
            position,
            color,
            second_color: None,
            base_intensity: rng.gen_range(1.2..2.2),
            amplitude: rng.gen_range(0.4..0.9),
            speed: rng.gen_range(1.2..2.6),
            phase: rng.gen_range(0.0..std::f32::consts::TAU),
            intensity: 0.0,
            current_color: color,
        }
    }

    /// Advance one frame: slow pulse plus faster flicker, floored so bulbs
    /// never go fully dark; two-color bulbs blend on a third oscillator.
    pub fn update(&mut self, t: f32) {
        self.intensity = twinkle_intensity(
            t,
            self.base_intensity,
            self.amplitude,
            self.speed,
            self.phase,
        );
        if let Some(b) = self.second_color {
            let w = 0.5 + 0.5 * (self.speed * 0.6 * t + self.phase * 2.3).sin();
            self.current_color = self.color.lerp(b, w);
        }
    }
}

/// Slow pulse + faster flicker, floored at [`TWINKLE_MIN_INTENSITY`].
#[inline]
pub fn twinkle_intensity(t: f32, base: f32, amp: f32, speed: f32, phase: f32) -> f32 {
    let pulse = (speed * t + phase).sin();
    let flicker = (speed * 3.1 * t + phase * 1.7 + 1.3).sin();
    (base + amp * (0.7 * pulse + 0.3 * flicker)).max(TWINKLE_MIN_INTENSITY)
}

/// Point-light flicker for the hearth. Correlated with, but not identical
/// to, the shader's flicker term.
#[inline]
pub fn fire_light_intensity(t: f32) -> f32 {
    FIRE_LIGHT_BASE + FIRE_LIGHT_AMP_A * (t * 6.0).sin() + FIRE_LIGHT_AMP_B * (t * 11.0).sin()
}

/// The hearth's animated point light.
#[derive(Clone, Debug)]
pub struct FireLight {
    pub position: Vec3,
    pub intensity: f32,
}

impl FireLight {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            intensity: FIRE_LIGHT_BASE,
        }
    }
}

/// Parameters for the tree-light spiral.
#[derive(Clone, Copy, Debug)]
pub struct TreeLightParams {
    pub base: Vec3,
    pub height: f32,
    pub base_radius: f32,
    pub turns: f32,
    pub count: usize,
}

impl Default for TreeLightParams {
    fn default() -> Self {
        Self {
            base: Vec3::new(3.6, -1.5, 0.6),
            height: 2.6,
            base_radius: 0.95,
            turns: 5.0,
            count: 48,
        }
    }
}

/// Wind a strand of two-color bulbs up a cone.
pub fn tree_bulbs(params: &TreeLightParams, rng: &mut StdRng) -> Vec<TwinkleBulb> {
    let mut bulbs = Vec::with_capacity(params.count);
    for i in 0..params.count {
        let u = (i as f32 + 0.5) / params.count as f32;
        let angle = u * params.turns * std::f32::consts::TAU + rng.gen_range(-0.12..0.12);
        let radius = params.base_radius * (1.0 - u * 0.85);
        let pos = params.base
            + Vec3::new(
                angle.cos() * radius,
                u * params.height,
                angle.sin() * radius,
            );
        let color = Vec3::from(BULB_PALETTE[rng.gen_range(0..BULB_PALETTE.len())]);
        let second = Vec3::from(BULB_PALETTE[rng.gen_range(0..BULB_PALETTE.len())]);
        let mut bulb = TwinkleBulb::new(pos, color, rng);
        bulb.second_color = Some(second);
        bulbs.push(bulb);
    }
    bulbs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn tree_bulbs_carry_two_colors_and_sit_on_the_cone() {
        let params = TreeLightParams::default();
        let mut rng = StdRng::seed_from_u64(7);
        let bulbs = tree_bulbs(&params, &mut rng);
        assert_eq!(bulbs.len(), params.count);
        for b in &bulbs {
            assert!(b.second_color.is_some());
            let rel = b.position - params.base;
            assert!(rel.y >= 0.0 && rel.y <= params.height);
            let r = (rel.x * rel.x + rel.z * rel.z).sqrt();
            assert!(r <= params.base_radius + 1e-4);
        }
    }
}
