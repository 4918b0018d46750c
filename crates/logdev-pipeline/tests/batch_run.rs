//! Batch orchestration over a directory of stand-in camera files.

mod common;

use std::collections::HashSet;

use logdev_core::LensMetadata;
use logdev_io::{FormatWriter, OutputFormat};
use logdev_pipeline::{
    plan, run, ChannelSink, Collaborators, Exposure, Pipeline, PipelineError, PipelineSettings, Plan,
};
use tempfile::TempDir;
use tracing::Level;

use common::{write_raw, CountingLens, FixedMetadata, FlatDecoder, LensBehaviour};

fn tiff_pipeline() -> Pipeline {
    let settings = PipelineSettings {
        exposure: Exposure::Manual(0.5),
        ..Default::default()
    };
    let collaborators = Collaborators {
        decoder: Box::new(FlatDecoder::default()),
        metadata: Box::new(FixedMetadata(LensMetadata::default())),
        lens: Box::new(CountingLens {
            behaviour: LensBehaviour::Panic,
            calls: Default::default(),
        }),
        encoder: Box::new(FormatWriter {
            fallback: OutputFormat::Tiff,
        }),
    };
    Pipeline::new(settings, collaborators).unwrap()
}

#[test]
fn one_corrupt_file_does_not_sink_the_batch() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("card");
    std::fs::create_dir(&input).unwrap();
    for name in ["A001.dng", "A002.NEF", "A003.raf"] {
        write_raw(&input, name, b"fine");
    }
    write_raw(&input, "A004.arw", b"corrupt");
    write_raw(&input, "notes.txt", b"ignored");

    let output = dir.path().join("graded");
    let work = plan(&input, &output, "tif").unwrap();
    assert_eq!(work.units().len(), 4);

    let (sink, rx) = ChannelSink::new();
    let report = run(&tiff_pipeline(), work, 3, &sink).unwrap();

    assert_eq!(report.reports.len(), 4);
    assert_eq!(report.succeeded().count(), 3);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].unit.id, "A004.arw");

    for stem in ["A001", "A002", "A003"] {
        let path = output.join(format!("{stem}.tif"));
        assert!(path.is_file(), "{} missing", path.display());
    }
    assert!(!output.join("A004.tif").exists());

    let records: Vec<_> = rx.try_iter().collect();
    assert!(records
        .iter()
        .any(|r| r.level == Level::ERROR && r.unit.as_deref() == Some("A004.arw")));
    assert!(report.summary().starts_with("3 succeeded, 1 failed"));
}

#[test]
fn every_unit_reported_once_with_one_worker() {
    let dir = TempDir::new().unwrap();
    for i in 0..6 {
        write_raw(dir.path(), &format!("IMG_{i:04}.CR2"), b"ok");
    }
    let output = dir.path().join("out");
    let work = plan(dir.path(), &output, "png").unwrap();

    let (sink, _rx) = ChannelSink::new();
    let report = run(&tiff_pipeline(), work, 0, &sink).unwrap();

    let ids: HashSet<_> = report.reports.iter().map(|r| r.unit.id.clone()).collect();
    assert_eq!(ids.len(), 6);
    assert_eq!(report.failed().count(), 0);
    assert!(output.join("IMG_0005.png").is_file());
}

#[test]
fn reports_arrive_in_completion_order() {
    let dir = TempDir::new().unwrap();
    write_raw(dir.path(), "A001.dng", b"slow");
    for name in ["A002.dng", "A003.dng", "A004.dng"] {
        write_raw(dir.path(), name, b"fine");
    }
    let work = plan(dir.path(), &dir.path().join("out"), "tif").unwrap();
    assert_eq!(work.units()[0].id, "A001.dng");

    let (sink, _rx) = ChannelSink::new();
    let report = run(&tiff_pipeline(), work, 2, &sink).unwrap();

    let ids: Vec<_> = report.reports.iter().map(|r| r.unit.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert_ne!(ids[0], "A001.dng");
    assert_eq!(ids[3], "A001.dng");
    assert_eq!(report.failed().count(), 0);
}

#[test]
fn single_file_failure_is_fatal() {
    let dir = TempDir::new().unwrap();
    let input = write_raw(dir.path(), "solo.dng", b"corrupt");
    let work = plan(&input, &dir.path().join("solo.tif"), "tif").unwrap();
    assert!(matches!(work, Plan::Single(_)));

    let (sink, _rx) = ChannelSink::new();
    let err = run(&tiff_pipeline(), work, 4, &sink).unwrap_err();
    match err {
        PipelineError::Unit { unit, .. } => assert_eq!(unit, "solo.dng"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn single_file_success() {
    let dir = TempDir::new().unwrap();
    let input = write_raw(dir.path(), "solo.dng", b"fine");
    let out_dir = dir.path().join("out");
    std::fs::create_dir(&out_dir).unwrap();

    let work = plan(&input, &out_dir, "tif").unwrap();
    let (sink, _rx) = ChannelSink::new();
    let report = run(&tiff_pipeline(), work, 4, &sink).unwrap();

    assert_eq!(report.reports.len(), 1);
    let summary = report.reports[0].outcome.as_ref().unwrap();
    assert!((summary.gain - 2f32.sqrt()).abs() < 1e-5);
    assert!(out_dir.join("solo.tif").is_file());
}
