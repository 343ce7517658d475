//! Garland construction: a sagging strand spline with foliage clusters and
//! twinkle bulbs sampled along it.

use glam::Vec3;
use rand::prelude::*;
use smallvec::SmallVec;

use crate::constants::BULB_PALETTE;
use crate::lights::TwinkleBulb;

/// One spline control point. `sag` is the downward offset already applied to
/// `position.y`; endpoints are pinned so their sag is zero.
#[derive(Clone, Copy, Debug)]
pub struct GarlandAnchor {
    pub position: Vec3,
    pub sag: f32,
}

/// Smooth interpolating curve through the anchors (uniform Catmull-Rom with
/// clamped end tangents). Immutable after construction.
#[derive(Clone, Debug)]
pub struct GarlandCurve {
    pub anchors: SmallVec<[GarlandAnchor; 8]>,
}

impl GarlandCurve {
    /// Sample the curve at parametric `u` in [0,1].
    pub fn sample(&self, u: f32) -> Vec3 {
        let n = self.anchors.len();
        debug_assert!(n >= 2);
        let u = u.clamp(0.0, 1.0);
        let segs = (n - 1) as f32;
        let x = u * segs;
        let i = (x.floor() as usize).min(n - 2);
        let t = x - i as f32;

        let p = |idx: isize| -> Vec3 {
            let clamped = idx.clamp(0, (n - 1) as isize) as usize;
            self.anchors[clamped].position
        };
        let p0 = p(i as isize - 1);
        let p1 = p(i as isize);
        let p2 = p(i as isize + 1);
        let p3 = p(i as isize + 2);

        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * ((2.0 * p1)
            + (p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (3.0 * p1 - 3.0 * p2 + p0 - p3) * t3)
    }
}

/// A foliage sprig placed along the strand.
#[derive(Clone, Copy, Debug)]
pub struct LeafInstance {
    pub position: Vec3,
    /// Euler rotation, radians.
    pub rotation: Vec3,
    pub scale: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct GarlandParams {
    /// Horizontal span covered by the strand.
    pub span: f32,
    /// Height of the pinned endpoints.
    pub height: f32,
    /// Center of the strand.
    pub center: Vec3,
    /// Inclusive anchor count range; smaller for secondary strands.
    pub anchors: (usize, usize),
    pub sag: (f32, f32),
    pub jitter: f32,
    /// Parametric step between foliage clusters.
    pub leaf_step: f32,
    pub leaves_per_cluster: (usize, usize),
    /// Inclusive bulb count range.
    pub bulbs: (usize, usize),
    pub bulb_jitter: f32,
}

impl Default for GarlandParams {
    fn default() -> Self {
        Self {
            span: 6.2,
            height: 2.45,
            center: Vec3::new(0.0, 0.0, 1.25),
            anchors: (5, 7),
            sag: (0.18, 0.5),
            jitter: 0.08,
            leaf_step: 0.035,
            leaves_per_cluster: (2, 4),
            bulbs: (9, 14),
            bulb_jitter: 0.25,
        }
    }
}

/// A constructed garland: the curve plus its static foliage. Bulbs are
/// returned separately so the scene can flatten them into one animated list.
#[derive(Clone, Debug)]
pub struct Garland {
    pub curve: GarlandCurve,
    pub leaves: Vec<LeafInstance>,
}

/// Draw from `[-j, j)`, tolerating `j = 0` (a straight, unjittered strand).
fn jitter(rng: &mut StdRng, j: f32) -> f32 {
    if j > 0.0 {
        rng.gen_range(-j..j)
    } else {
        0.0
    }
}

/// Build one strand. Endpoints are pinned (sag = 0); interior anchors are
/// jittered and pulled down by a random sag.
pub fn build_garland(params: &GarlandParams, rng: &mut StdRng) -> (Garland, Vec<TwinkleBulb>) {
    let n = rng.gen_range(params.anchors.0..=params.anchors.1).max(2);
    let half = params.span * 0.5;
    let mut anchors: SmallVec<[GarlandAnchor; 8]> = SmallVec::with_capacity(n);
    for i in 0..n {
        let u = i as f32 / (n - 1) as f32;
        let endpoint = i == 0 || i == n - 1;
        let (x, sag, jy, jz) = if endpoint {
            (-half + params.span * u, 0.0, 0.0, 0.0)
        } else {
            (
                -half + params.span * u + jitter(rng, params.jitter),
                rng.gen_range(params.sag.0..=params.sag.1),
                jitter(rng, params.jitter),
                jitter(rng, params.jitter),
            )
        };
        anchors.push(GarlandAnchor {
            position: params.center + Vec3::new(x, params.height + jy - sag, jz),
            sag,
        });
    }
    let curve = GarlandCurve { anchors };

    // Foliage clusters at fixed parametric intervals.
    let mut leaves = Vec::new();
    let mut u = 0.0;
    while u <= 1.0 {
        let at = curve.sample(u);
        let count = rng.gen_range(params.leaves_per_cluster.0..=params.leaves_per_cluster.1);
        for _ in 0..count {
            leaves.push(LeafInstance {
                position: at
                    + Vec3::new(
                        rng.gen_range(-0.09..0.09),
                        rng.gen_range(-0.1..0.04),
                        rng.gen_range(-0.09..0.09),
                    ),
                rotation: Vec3::new(
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                    rng.gen_range(0.0..std::f32::consts::TAU),
                ),
                scale: rng.gen_range(0.08..0.16),
            });
        }
        u += params.leaf_step;
    }

    // Bulbs at evenly spaced parametric points with jitter.
    let bulb_count = rng.gen_range(params.bulbs.0..=params.bulbs.1);
    let mut bulbs = Vec::with_capacity(bulb_count);
    for i in 0..bulb_count {
        let base_u = (i as f32 + 0.5) / bulb_count as f32;
        let ju = jitter(rng, params.bulb_jitter) / bulb_count as f32;
        let at = curve.sample(base_u + ju) + Vec3::new(0.0, -0.07, 0.0);
        let color = Vec3::from(BULB_PALETTE[rng.gen_range(0..BULB_PALETTE.len())]);
        bulbs.push(TwinkleBulb::new(at, color, rng));
    }

    (Garland { curve, leaves }, bulbs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn curve_passes_through_its_anchors() {
        let anchors: SmallVec<[GarlandAnchor; 8]> = smallvec::smallvec![
            GarlandAnchor { position: Vec3::new(-1.0, 2.0, 0.0), sag: 0.0 },
            GarlandAnchor { position: Vec3::new(0.0, 1.6, 0.0), sag: 0.4 },
            GarlandAnchor { position: Vec3::new(1.0, 2.0, 0.0), sag: 0.0 },
        ];
        let curve = GarlandCurve { anchors: anchors.clone() };
        for (i, a) in anchors.iter().enumerate() {
            let u = i as f32 / (anchors.len() - 1) as f32;
            assert!((curve.sample(u) - a.position).length() < 1e-4, "anchor {i}");
        }
    }

    #[test]
    fn straight_strand_with_zero_jitter_builds() {
        let mut rng = StdRng::seed_from_u64(9);
        let params = GarlandParams {
            jitter: 0.0,
            bulb_jitter: 0.0,
            sag: (0.3, 0.3),
            ..Default::default()
        };
        let (g, bulbs) = build_garland(&params, &mut rng);
        assert!(!bulbs.is_empty());
        let n = g.curve.anchors.len();
        for a in &g.curve.anchors[1..n - 1] {
            assert!((a.sag - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn sample_clamps_parameter() {
        let mut rng = StdRng::seed_from_u64(3);
        let (g, _) = build_garland(&GarlandParams::default(), &mut rng);
        assert_eq!(g.curve.sample(-1.0), g.curve.sample(0.0));
        assert_eq!(g.curve.sample(2.0), g.curve.sample(1.0));
    }
}
