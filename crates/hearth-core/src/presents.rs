//! Present placement by rejection sampling within a floor region.

use glam::{Vec2, Vec3};
use rand::prelude::*;

#[derive(Clone, Copy, Debug)]
pub struct PresentParams {
    /// Inclusive count range for the first pass.
    pub count: (usize, usize),
    /// Floor region (x/z) the presents may occupy.
    pub region_min: Vec2,
    pub region_max: Vec2,
    pub floor_y: f32,
    /// Minimum gap between bounding circles.
    pub clearance: f32,
    /// Attempt budget per present before accepting overlap. Tunable; the
    /// fallback is a deliberate degrade rather than an error.
    pub max_attempts: usize,
    /// Whether the secondary pass stacks one present on a random base.
    pub stack_extra: bool,
    pub half_extents_min: Vec3,
    pub half_extents_max: Vec3,
}

impl Default for PresentParams {
    fn default() -> Self {
        Self {
            count: (5, 7),
            region_min: Vec2::new(-5.6, 1.0),
            region_max: Vec2::new(-2.2, 3.4),
            floor_y: -1.5,
            clearance: 0.12,
            max_attempts: 20,
            stack_extra: true,
            half_extents_min: Vec3::new(0.18, 0.14, 0.18),
            half_extents_max: Vec3::new(0.42, 0.34, 0.42),
        }
    }
}

/// One placed present. `fallback` records that the attempt budget ran out
/// and the position may overlap a neighbour.
#[derive(Clone, Copy, Debug)]
pub struct Present {
    pub position: Vec3,
    pub half_extents: Vec3,
    pub radius: f32,
    pub color: [f32; 3],
    pub fallback: bool,
    /// Set on the stacked present from the secondary pass.
    pub stacked: bool,
}

const PRESENT_COLORS: [[f32; 3]; 6] = [
    [0.85, 0.2, 0.2],
    [0.2, 0.55, 0.3],
    [0.85, 0.7, 0.25],
    [0.3, 0.4, 0.8],
    [0.8, 0.45, 0.65],
    [0.9, 0.9, 0.9],
];

fn random_half_extents(params: &PresentParams, rng: &mut StdRng) -> Vec3 {
    Vec3::new(
        rng.gen_range(params.half_extents_min.x..params.half_extents_max.x),
        rng.gen_range(params.half_extents_min.y..params.half_extents_max.y),
        rng.gen_range(params.half_extents_min.z..params.half_extents_max.z),
    )
}

/// Place presents in the region. Each one tries up to `max_attempts` random
/// positions and accepts the first that clears every previously placed
/// present's bounding circle plus `clearance`; exhaustion accepts the last
/// candidate anyway.
pub fn place_presents(params: &PresentParams, rng: &mut StdRng) -> Vec<Present> {
    let count = rng.gen_range(params.count.0..=params.count.1);
    let mut placed: Vec<Present> = Vec::with_capacity(count + 1);

    for _ in 0..count {
        let half = random_half_extents(params, rng);
        let radius = half.x.max(half.z);
        let color = PRESENT_COLORS[rng.gen_range(0..PRESENT_COLORS.len())];

        let mut candidate = Vec2::ZERO;
        let mut accepted = false;
        for _ in 0..params.max_attempts.max(1) {
            candidate = Vec2::new(
                rng.gen_range(params.region_min.x..params.region_max.x),
                rng.gen_range(params.region_min.y..params.region_max.y),
            );
            let clear = placed.iter().all(|p| {
                let d = (candidate - Vec2::new(p.position.x, p.position.z)).length();
                d > radius + p.radius + params.clearance
            });
            if clear {
                accepted = true;
                break;
            }
        }
        if !accepted {
            log::debug!(
                "present placement fell back to overlapping position after {} attempts",
                params.max_attempts
            );
        }
        placed.push(Present {
            position: Vec3::new(candidate.x, params.floor_y + half.y, candidate.y),
            half_extents: half,
            radius,
            color,
            fallback: !accepted,
            stacked: false,
        });
    }

    if params.stack_extra && !placed.is_empty() {
        let base_idx = rng.gen_range(0..placed.len());
        let base = placed[base_idx];
        let mut half = random_half_extents(params, rng);
        half *= 0.6; // stacked box stays smaller than its base
        let color = PRESENT_COLORS[rng.gen_range(0..PRESENT_COLORS.len())];
        placed.push(Present {
            position: base.position + Vec3::new(0.0, base.half_extents.y + half.y, 0.0),
            half_extents: half,
            radius: half.x.max(half.z),
            color,
            fallback: false,
            stacked: true,
        });
    }

    placed
}
