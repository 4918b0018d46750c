//! Properties every log curve must hold.
//!
//! Reference middle-gray code values are taken from the vendors' own
//! white papers.

use logdev_transfer::LogCurve;

/// (curve, published 18% gray code value)
const MIDDLE_GRAY: &[(LogCurve, f32)] = &[
    (LogCurve::FLog, 0.459),
    (LogCurve::FLog2, 0.391),
    (LogCurve::VLog, 0.423),
    (LogCurve::NLog, 0.364),
    (LogCurve::CanonLog2, 0.398),
    (LogCurve::CanonLog3, 0.343),
    (LogCurve::SLog3, 0.4106),
    (LogCurve::LogC3, 0.391),
    (LogCurve::LogC4, 0.278),
    (LogCurve::Log3G10, 0.333),
];

#[test]
fn middle_gray_matches_reference() {
    for &(curve, expected) in MIDDLE_GRAY {
        let got = curve.middle_gray();
        assert!(
            (got - expected).abs() < 2e-3,
            "{curve}: 18% gray encodes to {got}, expected {expected}"
        );
    }
}

#[test]
fn every_curve_is_monotonic() {
    // Dense near black where the piecewise joins live, sparse up to +8 stops.
    let mut samples: Vec<f32> = (0..20_000).map(|i| 1e-6 + i as f32 * 2.5e-5).collect();
    samples.extend((0..2_000).map(|i| 0.5 + i as f32 * 0.05));

    for curve in LogCurve::ALL {
        let mut prev = curve.encode(0.0);
        for &x in &samples {
            let y = curve.encode(x);
            assert!(y.is_finite(), "{curve}: non-finite at {x}");
            assert!(y >= prev, "{curve}: decreases at {x}: {y} < {prev}");
            prev = y;
        }
    }
}

#[test]
fn decode_inverts_encode() {
    for curve in LogCurve::ALL {
        for &x in &[0.02f32, 0.18, 1.0, 6.0] {
            let back = curve.decode(curve.encode(x));
            assert!(
                (back - x).abs() <= x * 2e-3,
                "{curve}: {x} -> {back}"
            );
        }
    }
}

#[test]
fn names_are_unique() {
    let mut names: Vec<_> = LogCurve::ALL.iter().map(|c| c.name()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), LogCurve::ALL.len());
}
