//! Database file to corrected image, through the public API.

use logdev_core::{Image, LensMetadata};
use logdev_lens::{LensCorrector, LensError, LensToggles, ProfileCorrector};

const DB: &str = r#"<lensdatabase version="2">
    <lens>
        <maker>Nikon</maker>
        <model>Nikkor Z 24-70mm f/4 S</model>
        <mount>Nikon Z</mount>
        <calibration>
            <distortion model="ptlens" focal="24" a="0.012" b="-0.041" c="0.002"/>
            <distortion model="ptlens" focal="70" a="0.003" b="-0.004" c="0"/>
            <vignetting model="pa" focal="24" aperture="4" distance="10" k1="-0.55" k2="0.21" k3="-0.08"/>
        </calibration>
    </lens>
</lensdatabase>"#;

fn meta(lens: &str) -> LensMetadata {
    LensMetadata {
        camera_maker: Some("Nikon".into()),
        camera_model: Some("Z 6II".into()),
        lens_maker: None,
        lens_model: Some(lens.into()),
        focal_length_mm: Some(35.0),
        f_number: Some(5.6),
    }
}

fn corrector() -> (tempfile::TempDir, ProfileCorrector) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nikon.xml");
    std::fs::write(&path, DB).unwrap();
    let corrector = ProfileCorrector::open(Some(&path));
    (dir, corrector)
}

#[test]
fn corrects_with_custom_database() {
    let (_dir, corrector) = corrector();
    let img = Image::filled(32, 24, [0.2, 0.2, 0.2]);
    let out = corrector
        .correct(&img, &meta("NIKKOR Z 24-70mm f/4 S"), &LensToggles::default())
        .unwrap();

    assert_eq!(out.dimensions(), (32, 24));
    // Flat field: geometry leaves it flat, devignetting lifts the corners.
    assert!(out.pixel(0, 0)[1] > out.pixel(16, 12)[1]);
    assert!(out.data().iter().all(|v| v.is_finite() && *v >= 0.2 - 1e-4));
}

#[test]
fn geometry_only_keeps_flat_field() {
    let (_dir, corrector) = corrector();
    let img = Image::filled(20, 20, [0.4, 0.3, 0.2]);
    let toggles = LensToggles { vignetting: false, ..Default::default() };
    let out = corrector.correct(&img, &meta("Nikkor Z 24-70mm f/4 S"), &toggles).unwrap();
    for px in out.pixels() {
        assert!((px[0] - 0.4).abs() < 1e-5);
        assert!((px[2] - 0.2).abs() < 1e-5);
    }
}

#[test]
fn unknown_lens_is_reported() {
    let (_dir, corrector) = corrector();
    let err = corrector
        .correct(&Image::new(4, 4), &meta("Samyang AF 85mm"), &LensToggles::default())
        .unwrap_err();
    assert!(matches!(err, LensError::ProfileNotFound(_)));
}

#[test]
fn unreadable_database_is_reported_per_call() {
    let corrector = ProfileCorrector::open(Some(std::path::Path::new("/nonexistent/lensfun.xml")));
    assert!(corrector.database().is_none());
    let err = corrector
        .correct(&Image::new(4, 4), &meta("Nikkor Z 24-70mm f/4 S"), &LensToggles::default())
        .unwrap_err();
    assert!(matches!(err, LensError::NoDatabase(_)));
}
