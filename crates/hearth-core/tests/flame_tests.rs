// Flame envelope properties: window discard, alpha, color ramp ordering.

use glam::{Vec2, Vec3};
use hearth_core::{flame_color, FlameEnvelopeConfig, DEEP_RED, WHITE_HOT};

fn luminance(c: Vec3) -> f32 {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

#[test]
fn alpha_is_zero_outside_the_fire_window() {
    let cfg = FlameEnvelopeConfig::new(
        3.0,
        3.0,
        Vec2::new(0.2, 0.0),
        Vec2::new(0.8, 0.9),
    )
    .unwrap();
    let eps = 1e-4;
    assert_eq!(cfg.alpha(Vec2::new(0.2 - eps, 0.5)), 0.0);
    assert_eq!(cfg.alpha(Vec2::new(0.8 + eps, 0.5)), 0.0);
    assert_eq!(cfg.alpha(Vec2::new(0.5, -eps)), 0.0);
    assert_eq!(cfg.alpha(Vec2::new(0.5, 0.9 + eps)), 0.0);
    // and shade agrees
    for t in [0.0_f32, 1.3, 17.9, 240.0] {
        let (_, a) = cfg.shade(Vec2::new(0.5, 0.95), t, Vec2::new(640.0, 480.0));
        assert_eq!(a, 0.0, "outside uv must be transparent at t={t}");
    }
}

#[test]
fn alpha_is_positive_inside_the_window_for_any_time() {
    let cfg = FlameEnvelopeConfig::new(
        3.0,
        3.0,
        Vec2::new(0.2, 0.0),
        Vec2::new(0.8, 0.9),
    )
    .unwrap();
    let uv = Vec2::new(0.5, 0.45);
    for i in 0..200 {
        let t = i as f32 * 0.73;
        let (_, a) = cfg.shade(uv, t, Vec2::new(640.0, 480.0));
        assert!(a > 0.0, "alpha should be positive at t={t}, got {a}");
    }
}

#[test]
fn intensity_respects_the_cap() {
    let mut cfg = FlameEnvelopeConfig::hearth().unwrap();
    cfg.intensity_cap = 1.35;
    let res = Vec2::new(640.0, 480.0);
    for ix in 0..30 {
        for iy in 0..30 {
            let uv = Vec2::new(
                0.08 + 0.84 * ix as f32 / 29.0,
                0.92 * iy as f32 / 29.0,
            );
            let v = cfg.intensity(uv, 3.7, res);
            assert!(
                (0.0..=1.35).contains(&v),
                "intensity {v} out of range at {uv:?}"
            );
        }
    }
}

#[test]
fn color_ramp_gets_monotonically_hotter() {
    let mut prev = luminance(flame_color(0.0));
    for i in 1..=270 {
        let intensity = i as f32 * 0.005; // 0..1.35
        let lum = luminance(flame_color(intensity));
        assert!(
            lum >= prev - 1e-5,
            "luminance regressed at intensity {intensity}: {lum} < {prev}"
        );
        prev = lum;
    }
}

#[test]
fn color_ramp_endpoints_match_palette() {
    assert!((flame_color(0.0) - DEEP_RED).length() < 1e-3);
    // Any cap >= 1.2 saturates every threshold, landing on white-hot.
    assert!((flame_color(1.2) - WHITE_HOT).length() < 1e-3);
    assert!((flame_color(1.35) - WHITE_HOT).length() < 1e-3);
}
