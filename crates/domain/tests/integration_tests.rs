//! Integration tests for ship-domain.

use approx::assert_relative_eq;
use ship_domain::{
    build_domain_polygon, compute_radii, detect_overlap, domain_coefficients, DomainPolygon,
    DomainRadii, FailurePolicy, KinematicSample, ScenarioConfig, ScenarioDriver, Track,
    VesselRegistry,
};
use std::f64::consts::{FRAC_PI_2, PI};

fn radii(length: f64, speed: f64) -> DomainRadii {
    compute_radii(length, speed).unwrap()
}

fn domain(x: f64, y: f64, r: &DomainRadii, heading: f64) -> DomainPolygon {
    build_domain_polygon(x, y, r, heading, 100).unwrap()
}

mod radii_tests {
    use super::*;

    #[test]
    fn test_reference_vessel() {
        let c = domain_coefficients(10.0).unwrap();
        assert_relative_eq!(c.k_ad, 2.8464, max_relative = 1e-3);
        assert_relative_eq!(c.k_dt, 2.9147, max_relative = 1e-3);

        let r = radii(100.0, 10.0);
        assert_relative_eq!(r.fore, 528.51, max_relative = 1e-3);
        assert_relative_eq!(r.aft, 314.25, max_relative = 1e-3);
        assert_relative_eq!(r.starboard, 311.47, max_relative = 1e-3);
        assert_relative_eq!(r.port, 238.61, max_relative = 1e-3);
    }

    #[test]
    fn test_ordering_holds_across_speeds() {
        for speed in [0.5, 1.0, 4.0, 10.0, 18.0, 30.0] {
            let r = radii(150.0, speed);
            assert!(r.fore > r.aft, "speed {}", speed);
            assert!(r.starboard > r.port, "speed {}", speed);
        }
    }

    #[test]
    fn test_faster_means_larger() {
        let slow = radii(100.0, 5.0);
        let fast = radii(100.0, 15.0);
        assert!(fast.fore > slow.fore);
        assert!(fast.aft > slow.aft);
        assert!(fast.starboard > slow.starboard);
        assert!(fast.port > slow.port);
    }
}

mod polygon_tests {
    use super::*;

    #[test]
    fn test_vertex_count_and_closure() {
        let r = radii(100.0, 10.0);
        for n in [1, 10, 100] {
            let p = build_domain_polygon(12.0, -7.0, &r, 1.1, n).unwrap();
            assert_eq!(p.len(), 4 * n);
            assert_eq!(p.edges().count(), p.len());

            let (first, last) = (p.vertices()[0], p.vertices()[p.len() - 1]);
            let closing = p.edges().last().unwrap();
            assert_eq!(closing, (last, first));
        }
    }

    #[test]
    fn test_rotation_commutes_with_heading() {
        let r = radii(120.0, 14.0);
        let (cx, cy) = (350.0, -120.0);
        let north = domain(cx, cy, &r, 0.0);

        for theta in [0.3, FRAC_PI_2, 2.0, PI, 4.5] {
            let rotated = domain(cx, cy, &r, theta);
            let (sin, cos) = (-theta).sin_cos();

            for (&(x, y), &(ex, ey)) in north.vertices().iter().zip(rotated.vertices()) {
                let (dx, dy) = (x - cx, y - cy);
                let rx = cx + dx * cos - dy * sin;
                let ry = cy + dx * sin + dy * cos;
                assert_relative_eq!(rx, ex, epsilon = 1e-6);
                assert_relative_eq!(ry, ey, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_bow_follows_heading() {
        let r = radii(100.0, 10.0);
        let east = domain(0.0, 0.0, &r, FRAC_PI_2);
        let (bx, by) = east.bow_point();
        assert_relative_eq!(bx, r.fore, epsilon = 1e-6);
        assert_relative_eq!(by, 0.0, epsilon = 1e-6);
    }
}

mod overlap_tests {
    use super::*;

    #[test]
    fn test_self_overlap() {
        let r = radii(100.0, 10.0);
        let p = domain(1000.0, 2000.0, &r, 0.7);

        let result = detect_overlap(&p, &p).unwrap();
        assert!(result.is_overlapping);
        assert_relative_eq!(result.area, p.area(), max_relative = 1e-3);
    }

    #[test]
    fn test_far_apart_never_overlap() {
        let rp = radii(100.0, 10.0);
        let rq = radii(60.0, 20.0);
        let reach = (rp.fore + rq.fore) * 1.01;
        let p = domain(0.0, 0.0, &rp, 0.0);

        for i in 0..12 {
            let bearing = i as f64 * PI / 6.0;
            for heading in [0.0, FRAC_PI_2, PI, 4.0] {
                let q = domain(reach * bearing.sin(), reach * bearing.cos(), &rq, heading);
                let result = detect_overlap(&p, &q).unwrap();
                assert!(!result.is_overlapping);
                assert!(result.rings.is_empty());
                assert_eq!(result.area, 0.0);
            }
        }
    }

    #[test]
    fn test_symmetric() {
        let rp = radii(100.0, 10.0);
        let rq = radii(200.0, 6.0);
        let p = domain(0.0, 0.0, &rp, 0.2);
        let q = domain(300.0, 450.0, &rq, 3.9);

        let pq = detect_overlap(&p, &q).unwrap();
        let qp = detect_overlap(&q, &p).unwrap();
        assert!(pq.is_overlapping);
        assert_eq!(pq.is_overlapping, qp.is_overlapping);
        assert_relative_eq!(pq.area, qp.area, max_relative = 1e-6);
        assert_relative_eq!(pq.distance, qp.distance);
    }

    /// Area and centroid of a ring, independent of its starting vertex.
    fn ring_signature(ring: &[(f64, f64)]) -> (f64, f64, f64) {
        let n = ring.len();
        let (mut a2, mut cx, mut cy) = (0.0, 0.0, 0.0);
        for i in 0..n {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            let cross = x0 * y1 - x1 * y0;
            a2 += cross;
            cx += (x0 + x1) * cross;
            cy += (y0 + y1) * cross;
        }
        (a2.abs() / 2.0, cx / (3.0 * a2), cy / (3.0 * a2))
    }

    fn signatures(rings: &[Vec<(f64, f64)>]) -> Vec<(f64, f64, f64)> {
        let mut sigs: Vec<_> = rings.iter().map(|r| ring_signature(r)).collect();
        sigs.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.2.total_cmp(&b.2)));
        sigs
    }

    #[test]
    fn test_symmetric_with_several_rings() {
        let r = radii(100.0, 10.0);
        // A "U" open to the north and a bar crossing both arms.
        let u_shape = DomainPolygon::from_vertices(
            (15.0, 10.0),
            0.0,
            r,
            vec![
                (0.0, 0.0),
                (30.0, 0.0),
                (30.0, 30.0),
                (20.0, 30.0),
                (20.0, 10.0),
                (10.0, 10.0),
                (10.0, 30.0),
                (0.0, 30.0),
            ],
        );
        let bar = DomainPolygon::from_vertices(
            (15.0, 20.0),
            0.0,
            r,
            vec![(-5.0, 15.0), (35.0, 15.0), (35.0, 25.0), (-5.0, 25.0)],
        );

        let ub = detect_overlap(&u_shape, &bar).unwrap();
        let bu = detect_overlap(&bar, &u_shape).unwrap();
        assert_eq!(ub.ring_count(), 2);
        assert_eq!(ub.ring_count(), bu.ring_count());
        assert_eq!(ub.is_overlapping, bu.is_overlapping);
        assert_relative_eq!(ub.area, bu.area, max_relative = 1e-9);

        let expected = [(100.0, 5.0, 20.0), (100.0, 25.0, 20.0)];
        for sigs in [signatures(&ub.rings), signatures(&bu.rings)] {
            for (got, want) in sigs.iter().zip(expected.iter()) {
                assert_relative_eq!(got.0, want.0, max_relative = 1e-6);
                assert_relative_eq!(got.1, want.1, epsilon = 1e-6);
                assert_relative_eq!(got.2, want.2, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_rings_are_inside_both_domains() {
        let r = radii(100.0, 10.0);
        let p = domain(0.0, 0.0, &r, 0.0);
        let q = domain(0.0, 700.0, &r, PI);

        let result = detect_overlap(&p, &q).unwrap();
        assert_eq!(result.ring_count(), 1);
        for &(_, y) in &result.rings[0] {
            assert!(y <= r.fore + 1e-6);
            assert!(y >= 700.0 - r.fore - 1e-6);
        }
    }
}

mod scenario_tests {
    use super::*;

    /// Two vessels on reciprocal courses approaching along the y axis.
    fn head_on(separations: &[f64]) -> ScenarioDriver {
        let registry: VesselRegistry = [("A", 100.0), ("B", 80.0)].into_iter().collect();
        let a = Track::new(
            "A",
            separations
                .iter()
                .enumerate()
                .map(|(i, _)| KinematicSample::planar(0.0, 0.0, 10.0, 0.0, i as i64))
                .collect(),
        );
        let b = Track::new(
            "B",
            separations
                .iter()
                .enumerate()
                .map(|(i, &d)| KinematicSample::planar(0.0, d, 12.0, 180.0, i as i64))
                .collect(),
        );
        ScenarioDriver::new(registry, a, b, ScenarioConfig::default()).unwrap()
    }

    #[test]
    fn test_monotonic_boundary_crossing() {
        let reach = radii(100.0, 10.0).fore + radii(80.0, 12.0).fore;
        let factors = [2.0, 1.5, 1.1, 1.01, 0.99, 0.9, 0.5, 0.1];
        let separations: Vec<f64> = factors.iter().map(|f| f * reach).collect();

        let run = head_on(&separations).run();
        assert!(run.failures.is_empty());

        let flags: Vec<bool> = run.frames.iter().map(|f| f.overlap.is_overlapping).collect();
        assert_eq!(
            flags,
            vec![false, false, false, false, true, true, true, true]
        );
        assert_eq!(run.first_overlap(), Some(4));

        // Overlap grows as the bows pass each other
        let areas: Vec<f64> = run.frames[3..7].iter().map(|f| f.overlap.area).collect();
        assert!(areas.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_parallel_run_matches() {
        let separations: Vec<f64> = (0..64).map(|i| 2000.0 - i as f64 * 30.0).collect();
        let driver = head_on(&separations);

        let sequential = driver.run();
        let parallel = driver.run_parallel();
        assert_eq!(sequential.frames, parallel.frames);
        assert_eq!(sequential.overlapping_frames(), parallel.overlapping_frames());
    }

    #[test]
    fn test_skip_policy_reports_bad_samples() {
        let registry: VesselRegistry = [("A", 100.0)].into_iter().collect();
        let a = Track::new(
            "A",
            vec![
                KinematicSample::planar(0.0, 0.0, 10.0, 0.0, 0),
                KinematicSample::planar(0.0, 0.0, f64::NAN, 0.0, 1),
                KinematicSample::planar(0.0, 0.0, 10.0, 0.0, 2),
            ],
        );
        let b = Track::new(
            "B",
            vec![KinematicSample::planar(0.0, 5000.0, 10.0, 180.0, 0); 3],
        );
        let config = ScenarioConfig::default()
            .with_default_length(50.0)
            .with_failure_policy(FailurePolicy::Skip);
        let driver = ScenarioDriver::new(registry, a, b, config).unwrap();

        let items: Vec<_> = driver.frames().collect();
        assert_eq!(items.len(), 3);
        assert!(items[0].is_ok() && items[2].is_ok());
        assert_eq!(items[1].as_ref().unwrap_err().index, 1);
    }
}
