//! logdev - develop camera RAW files into log-encoded 16-bit rasters

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use logdev_color::LogSpace;
use logdev_io::OutputFormat;
use logdev_pipeline::{plan, run, MeteringMode, Pipeline, TracingSink};
use tracing::{debug, info};

mod logging;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "logdev")]
#[command(author, version, about = "Develop camera RAW files into log-encoded 16-bit rasters")]
#[command(long_about = "
Develops camera RAW files into a camera log space (F-Log2, S-Log3, LogC3, ...)
with automatic exposure, lens correction and an optional LUT.

A directory input processes every camera file directly inside it in parallel
and writes one raster per file into the output directory.

Examples:
  logdev DSCF0001.RAF out.tif                    # F-Log2, hybrid metering
  logdev card/ graded/ --log-space S-Log3 -j 8   # whole directory
  logdev a.NEF a.png --exposure -0.5 --no-lens-correct
  logdev card/ graded/ --lut look.cube --metering highlight-safe
  logdev card/ graded/ --config show.yaml
  logdev --list-log-spaces
")]
pub struct Cli {
    /// Camera file or directory of camera files
    #[arg(required_unless_present = "list_log_spaces")]
    pub input: Option<PathBuf>,

    /// Output file, or directory for directory inputs
    #[arg(required_unless_present = "list_log_spaces")]
    pub output: Option<PathBuf>,

    /// Target log space (see --list-log-spaces)
    #[arg(short = 's', long)]
    pub log_space: Option<String>,

    /// .cube LUT applied after log encoding
    #[arg(short, long)]
    pub lut: Option<PathBuf>,

    /// Manual exposure in stops; disables metering
    #[arg(short, long, allow_hyphen_values = true)]
    pub exposure: Option<f32>,

    /// Metering mode: average, center-weighted, highlight-safe, hybrid
    #[arg(short, long)]
    pub metering: Option<MeteringMode>,

    /// Disable lens correction
    #[arg(long)]
    pub no_lens_correct: bool,

    /// Skip distortion correction
    #[arg(long)]
    pub no_distortion: bool,

    /// Skip chromatic aberration correction
    #[arg(long)]
    pub no_tca: bool,

    /// Skip vignetting correction
    #[arg(long)]
    pub no_vignetting: bool,

    /// Lensfun database file or directory
    #[arg(long)]
    pub lens_db: Option<PathBuf>,

    /// Chromatic adaptation: bradford, cat02, von-kries
    #[arg(long)]
    pub adaptation: Option<String>,

    /// Parallel workers for directory inputs
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Output format when the output path does not say: tif, png
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// YAML settings file; flags override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the supported log spaces and exit
    #[arg(long)]
    pub list_log_spaces: bool,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Also write the log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(cli.verbose, cli.log_file.as_deref())?;

    if cli.list_log_spaces {
        for space in LogSpace::all() {
            println!("{:<12} {:<20} {}", space.name, space.gamut.name, space.curve);
        }
        return Ok(());
    }

    let (Some(input), Some(output)) = (cli.input.as_deref(), cli.output.as_deref()) else {
        anyhow::bail!("INPUT and OUTPUT are required");
    };

    let settings = settings::resolve(&cli)?;
    debug!(?settings, "resolved settings");
    let jobs = settings.jobs;
    let extension = settings.format.extension();

    let pipeline = Pipeline::standard(settings).context("Invalid settings")?;
    let work = plan(input, output, extension)
        .with_context(|| format!("Cannot plan {} -> {}", input.display(), output.display()))?;
    info!(units = work.units().len(), log_space = %pipeline.log_space(), "starting");

    let report = run(&pipeline, work, jobs, &TracingSink)?;

    for r in report.failed() {
        if let Err(e) = &r.outcome {
            eprintln!("Failed: {}: {}", r.unit.input.display(), e);
        }
    }
    println!("{}", report.summary());
    Ok(())
}
