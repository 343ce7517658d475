// Construction-time placement properties: garland sag, present separation,
// snow seeding.

use glam::Vec2;
use hearth_core::{
    build_garland, place_presents, window_regions, GarlandParams, PresentParams, SnowField,
    SnowParams,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn garland_endpoints_are_pinned_and_interior_sags() {
    for seed in 0..40_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = GarlandParams::default();
        let (garland, _) = build_garland(&params, &mut rng);
        let anchors = &garland.curve.anchors;
        assert!(
            (params.anchors.0..=params.anchors.1).contains(&anchors.len()),
            "anchor count {} outside configured range",
            anchors.len()
        );
        assert_eq!(anchors.first().unwrap().sag, 0.0, "seed {seed}: first anchor sags");
        assert_eq!(anchors.last().unwrap().sag, 0.0, "seed {seed}: last anchor sags");
        for (i, a) in anchors[1..anchors.len() - 1].iter().enumerate() {
            assert!(a.sag > 0.0, "seed {seed}: interior anchor {i} has no sag");
        }
        // Endpoint height is the configured base height exactly.
        let first = anchors.first().unwrap().position;
        let last = anchors.last().unwrap().position;
        assert!((first.y - (params.center.y + params.height)).abs() < 1e-6);
        assert!((last.y - (params.center.y + params.height)).abs() < 1e-6);
    }
}

#[test]
fn garland_bulb_count_stays_in_range() {
    for seed in 0..40_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = GarlandParams::default();
        let (_, bulbs) = build_garland(&params, &mut rng);
        assert!(
            (params.bulbs.0..=params.bulbs.1).contains(&bulbs.len()),
            "seed {seed}: bulb count {} outside range",
            bulbs.len()
        );
    }
}

#[test]
fn accepted_presents_keep_their_clearance() {
    for seed in 0..60_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = PresentParams::default();
        let presents = place_presents(&params, &mut rng);
        for i in 0..presents.len() {
            if presents[i].fallback || presents[i].stacked {
                continue;
            }
            for j in 0..i {
                if presents[j].stacked {
                    continue;
                }
                let a = Vec2::new(presents[i].position.x, presents[i].position.z);
                let b = Vec2::new(presents[j].position.x, presents[j].position.z);
                let min_dist = presents[i].radius + presents[j].radius + params.clearance;
                assert!(
                    (a - b).length() > min_dist - 1e-5,
                    "seed {seed}: presents {i} and {j} closer than clearance"
                );
            }
        }
    }
}

#[test]
fn single_present_always_succeeds_without_fallback() {
    for seed in 0..100_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = PresentParams {
            count: (1, 1),
            stack_extra: false,
            ..PresentParams::default()
        };
        let presents = place_presents(&params, &mut rng);
        assert_eq!(presents.len(), 1);
        assert!(!presents[0].fallback, "seed {seed}: single present fell back");
    }
}

#[test]
fn crowded_region_degrades_to_overlap_instead_of_failing() {
    let mut rng = StdRng::seed_from_u64(9);
    // A region far too small for seven presents: fallback must kick in, not
    // panic or drop presents.
    let params = PresentParams {
        count: (7, 7),
        region_min: Vec2::new(0.0, 0.0),
        region_max: Vec2::new(0.4, 0.4),
        stack_extra: false,
        ..PresentParams::default()
    };
    let presents = place_presents(&params, &mut rng);
    assert_eq!(presents.len(), 7);
    assert!(presents.iter().any(|p| p.fallback));
}

#[test]
fn stacked_present_sits_on_its_base() {
    for seed in 0..30_u64 {
        let mut rng = StdRng::seed_from_u64(seed);
        let params = PresentParams::default();
        let presents = place_presents(&params, &mut rng);
        let stacked: Vec<_> = presents.iter().filter(|p| p.stacked).collect();
        assert_eq!(stacked.len(), 1);
        let top = stacked[0];
        let base = presents
            .iter()
            .find(|p| {
                !p.stacked
                    && (p.position.x - top.position.x).abs() < 1e-5
                    && (p.position.z - top.position.z).abs() < 1e-5
            })
            .expect("stacked present has no base under it");
        assert!(top.position.y > base.position.y);
    }
}

#[test]
fn snow_seeds_every_flake_inside_a_window() {
    let mut rng = StdRng::seed_from_u64(5);
    let windows = window_regions();
    let field = SnowField::new(SnowParams::new(200, -1.6, windows.clone()), &mut rng);
    assert_eq!(field.flakes.len(), 200);
    for (i, f) in field.flakes.iter().enumerate() {
        let inside = windows.iter().any(|w| {
            f.position.x >= w.x_min
                && f.position.x <= w.x_max
                && f.position.z >= w.z_min
                && f.position.z <= w.z_max
        });
        assert!(inside, "flake {i} seeded outside every window: {:?}", f.position);
        assert!(f.speed >= 1.2 && f.speed <= 2.2);
    }
}

#[test]
#[should_panic(expected = "at least one source window")]
fn snow_without_source_windows_is_rejected() {
    SnowParams::new(100, -1.6, Vec::new());
}
