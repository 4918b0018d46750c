//! Settings file loading and flag overrides.

use std::path::Path;

use anyhow::{Context, Result};
use logdev_pipeline::{Exposure, PipelineSettings};

use crate::Cli;

/// Reads a YAML settings file. Missing keys keep their defaults.
pub fn load(path: &Path) -> Result<PipelineSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("Invalid settings file {}", path.display()))
}

/// Settings from `--config` (or defaults) with every explicit flag applied.
pub fn resolve(cli: &Cli) -> Result<PipelineSettings> {
    let mut s = match &cli.config {
        Some(path) => load(path)?,
        None => PipelineSettings::default(),
    };
    apply_flags(&mut s, cli);
    Ok(s)
}

fn apply_flags(s: &mut PipelineSettings, cli: &Cli) {
    if let Some(name) = &cli.log_space {
        s.log_space = name.clone();
    }
    if let Some(lut) = &cli.lut {
        s.lut = Some(lut.clone());
    }
    // Manual stops beat any metering choice.
    match (cli.exposure, cli.metering) {
        (Some(stops), _) => s.exposure = Exposure::Manual(stops),
        (None, Some(mode)) => s.exposure = Exposure::Metered(mode),
        (None, None) => {}
    }
    if cli.no_lens_correct {
        s.lens.enabled = false;
    }
    if cli.no_distortion {
        s.lens.toggles.distortion = false;
    }
    if cli.no_tca {
        s.lens.toggles.tca = false;
    }
    if cli.no_vignetting {
        s.lens.toggles.vignetting = false;
    }
    if let Some(db) = &cli.lens_db {
        s.lens.database = Some(db.clone());
    }
    if let Some(name) = &cli.adaptation {
        s.adaptation = name.clone();
    }
    if let Some(jobs) = cli.jobs {
        s.jobs = jobs.max(1);
    }
    if let Some(format) = cli.format {
        s.format = format;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use logdev_io::OutputFormat;
    use logdev_pipeline::MeteringMode;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("logdev").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let s = resolve(&cli(&["in.raf", "out.tif"])).unwrap();
        assert_eq!(s, PipelineSettings::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("show.yaml");
        std::fs::write(
            &path,
            "log_space: V-Log\nexposure: average\njobs: 2\nformat: png\nlens:\n  tca: false\n",
        )
        .unwrap();

        let config = path.to_str().unwrap();
        let s = resolve(&cli(&["in", "out", "--config", config, "-j", "6", "--no-vignetting"])).unwrap();
        assert_eq!(s.log_space, "V-Log");
        assert_eq!(s.exposure, Exposure::Metered(MeteringMode::Average));
        assert_eq!(s.jobs, 6);
        assert_eq!(s.format, OutputFormat::Png);
        assert!(!s.lens.toggles.tca);
        assert!(!s.lens.toggles.vignetting);
        assert!(s.lens.toggles.distortion);
    }

    #[test]
    fn test_manual_exposure_wins() {
        let s = resolve(&cli(&["in", "out", "--metering", "average", "--exposure", "-1.5"])).unwrap();
        assert_eq!(s.exposure, Exposure::Manual(-1.5));
    }

    #[test]
    fn test_metering_and_lens_flags() {
        let s = resolve(&cli(&[
            "in",
            "out",
            "-m",
            "highlight-safe",
            "--no-lens-correct",
            "--lens-db",
            "/db",
            "-s",
            "S-Log3.Cine",
            "-f",
            "png",
        ]))
        .unwrap();
        assert_eq!(s.exposure, Exposure::Metered(MeteringMode::HighlightSafe));
        assert!(!s.lens.enabled);
        assert_eq!(s.lens.database.as_deref(), Some(Path::new("/db")));
        assert_eq!(s.log_space, "S-Log3.Cine");
        assert_eq!(s.format, OutputFormat::Png);
    }

    #[test]
    fn test_list_without_paths() {
        let c = cli(&["--list-log-spaces"]);
        assert!(c.list_log_spaces);
        assert!(c.input.is_none());
        assert!(Cli::try_parse_from(["logdev"]).is_err());
    }

    #[test]
    fn test_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "jobs: many\n").unwrap();
        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.yaml"));
    }
}
