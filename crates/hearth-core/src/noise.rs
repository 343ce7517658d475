//! Value-noise/FBM kernel shared by every flame surface.
//!
//! This is the CPU mirror of the kernel in `shaders/flame.wgsl`; the two are
//! kept structurally identical so tests written against this module describe
//! the shader. All randomness is a deterministic function of the input
//! coordinate, so animation comes purely from offsetting `p` with time.

use glam::Vec2;

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// Cubic 0..1 transition with zero derivative at both ends. Edges may be
/// given in reverse order for a descending transition.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Deterministic lattice hash. Not cryptographic; it only needs to look
/// uncorrelated between neighbouring integer lattice points.
#[inline]
pub fn hash(p: Vec2) -> f32 {
    fract((p.dot(Vec2::new(127.1, 311.7))).sin() * 43758.545_3)
}

/// C1-continuous value noise in [0,1]: bilinear blend of the four corner
/// hashes with a smoothstep weight on the fractional part.
pub fn value_noise(p: Vec2) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec2::splat(3.0) - 2.0 * f);
    let a = hash(i);
    let b = hash(i + Vec2::new(1.0, 0.0));
    let c = hash(i + Vec2::new(0.0, 1.0));
    let d = hash(i + Vec2::new(1.0, 1.0));
    mix(mix(a, b, u.x), mix(c, d, u.x), u.y)
}

/// Four octaves of value noise, frequency doubling and amplitude attenuating
/// by 0.55 per octave. Nominally can exceed 1 but empirically stays near
/// [0,1]; callers clamp downstream.
pub fn fbm(p: Vec2) -> f32 {
    let mut p = p;
    let mut v = 0.0;
    let mut amp = 0.5;
    for _ in 0..4 {
        v += amp * value_noise(p);
        p *= 2.0;
        amp *= 0.55;
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let p = Vec2::new(12.7, -3.2);
        assert_eq!(hash(p), hash(p));
    }

    #[test]
    fn value_noise_stays_in_unit_range() {
        for ix in -20..20 {
            for iy in -20..20 {
                let p = Vec2::new(ix as f32 * 0.37, iy as f32 * 0.73);
                let n = value_noise(p);
                assert!((0.0..=1.0).contains(&n), "noise({p:?}) = {n} out of range");
            }
        }
    }

    #[test]
    fn value_noise_is_continuous_across_lattice_boundaries() {
        // Sample just either side of integer lattice lines; the smoothstep
        // blend weight is zero there so both sides must agree closely.
        let eps = 1e-4_f32;
        for k in -5..5 {
            let x = k as f32;
            for y in [0.25_f32, 0.5, 1.75, -2.3] {
                let lo = value_noise(Vec2::new(x - eps, y));
                let hi = value_noise(Vec2::new(x + eps, y));
                assert!(
                    (lo - hi).abs() < 1e-2,
                    "discontinuity at x={x}, y={y}: {lo} vs {hi}"
                );
                let lo = value_noise(Vec2::new(y, x - eps));
                let hi = value_noise(Vec2::new(y, x + eps));
                assert!(
                    (lo - hi).abs() < 1e-2,
                    "discontinuity at y={x}, x={y}: {lo} vs {hi}"
                );
            }
        }
    }

    #[test]
    fn fbm_is_bounded_in_practice() {
        for ix in 0..50 {
            for iy in 0..50 {
                let p = Vec2::new(ix as f32 * 0.19, iy as f32 * 0.41);
                let v = fbm(p);
                assert!(v >= 0.0 && v < 1.3, "fbm({p:?}) = {v}");
            }
        }
    }

    #[test]
    fn smoothstep_clamps_and_interpolates() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }
}
