//! Work planning and the batch orchestrator.
//!
//! [`plan`] turns an input/output pair into work units. [`run`] executes a
//! single unit synchronously on the calling thread, or fans a batch out to a
//! fixed rayon pool and collects [`UnitReport`]s over a channel in the order
//! units finish.

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::Level;

use crate::pipeline::{Pipeline, UnitSummary};
use crate::sink::{LogSink, UnitLog};
use crate::{panic_message, PipelineError, PipelineResult};

/// Camera file extensions picked up by directory discovery, lowercase.
pub const RAW_EXTENSIONS: &[&str] = &[
    "dng", "cr2", "cr3", "nef", "arw", "rw2", "raf", "orf", "pef", "srw",
];

/// One input file and where its result goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkUnit {
    /// Identity used in logs and reports (the input file name).
    pub id: String,
    /// Camera file.
    pub input: PathBuf,
    /// Raster to write.
    pub output: PathBuf,
}

impl WorkUnit {
    /// Unit for `input`, identified by its file name.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let id = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| input.display().to_string());
        Self {
            id,
            input,
            output: output.into(),
        }
    }
}

/// Planned work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// A single file, run synchronously.
    Single(WorkUnit),
    /// Every camera file of a directory.
    Batch(Vec<WorkUnit>),
}

impl Plan {
    /// Units in submission order.
    pub fn units(&self) -> &[WorkUnit] {
        match self {
            Self::Single(unit) => std::slice::from_ref(unit),
            Self::Batch(units) => units,
        }
    }
}

/// True when `path` has one of the [`RAW_EXTENSIONS`], in any case.
pub fn is_raw_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| RAW_EXTENSIONS.iter().any(|r| r.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Plans the work for `input` -> `output`.
///
/// A file input writes to `output`, or to `<stem>.<extension>` inside it
/// when `output` is an existing directory. A directory input requires a
/// directory output, created if missing, and yields one unit per camera
/// file directly inside it, sorted by name.
pub fn plan(input: &Path, output: &Path, extension: &str) -> PipelineResult<Plan> {
    if !input.exists() {
        return Err(PipelineError::InputNotFound(input.to_path_buf()));
    }

    if !input.is_dir() {
        let dest = if output.is_dir() {
            output.join(output_name(input, extension))
        } else {
            output.to_path_buf()
        };
        return Ok(Plan::Single(WorkUnit::new(input, dest)));
    }

    if output.exists() && !output.is_dir() {
        return Err(PipelineError::OutputNotDirectory(output.to_path_buf()));
    }
    let mut inputs = Vec::new();
    for entry in fs::read_dir(input).map_err(|e| PipelineError::fs(input, e))? {
        let path = entry.map_err(|e| PipelineError::fs(input, e))?.path();
        if path.is_file() && is_raw_file(&path) {
            inputs.push(path);
        }
    }
    if inputs.is_empty() {
        return Err(PipelineError::NoInputs(input.to_path_buf()));
    }
    inputs.sort();
    fs::create_dir_all(output).map_err(|e| PipelineError::fs(output, e))?;

    let units = inputs
        .into_iter()
        .map(|path| {
            let dest = output.join(output_name(&path, extension));
            WorkUnit::new(path, dest)
        })
        .collect();
    Ok(Plan::Batch(units))
}

fn output_name(input: &Path, extension: &str) -> PathBuf {
    let stem = input.file_stem().unwrap_or(input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(extension);
    PathBuf::from(name)
}

/// Outcome of one unit.
#[derive(Debug)]
pub struct UnitReport {
    /// The unit.
    pub unit: WorkUnit,
    /// Summary, or why it failed.
    pub outcome: PipelineResult<UnitSummary>,
    /// Wall time spent.
    pub elapsed: Duration,
}

impl UnitReport {
    /// True when the unit produced an output.
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Runs one unit, turning a panic into [`PipelineError::Panicked`].
///
/// Failures are logged under the unit's identity before being returned.
pub fn run_unit(pipeline: &Pipeline, unit: WorkUnit, sink: &dyn LogSink) -> UnitReport {
    let start = Instant::now();
    let log = UnitLog::new(sink, &unit.id);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pipeline.process(&unit, &log)))
        .unwrap_or_else(|payload| Err(PipelineError::Panicked(panic_message(payload.as_ref()))));
    let elapsed = start.elapsed();

    match &outcome {
        Ok(summary) => log.info(&format!(
            "done in {:.2}s -> {}",
            elapsed.as_secs_f64(),
            summary.output.display()
        )),
        Err(e) => log.error(&format!("failed: {e}")),
    }
    UnitReport {
        unit,
        outcome,
        elapsed,
    }
}

/// Per-unit results of a batch, in completion order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One report per unit.
    pub reports: Vec<UnitReport>,
    /// Wall time of the whole batch.
    pub elapsed: Duration,
}

impl BatchReport {
    /// Reports of units that produced an output.
    pub fn succeeded(&self) -> impl Iterator<Item = &UnitReport> {
        self.reports.iter().filter(|r| r.is_ok())
    }

    /// Reports of units that failed.
    pub fn failed(&self) -> impl Iterator<Item = &UnitReport> {
        self.reports.iter().filter(|r| !r.is_ok())
    }

    /// One-line summary.
    pub fn summary(&self) -> String {
        format!(
            "{} succeeded, {} failed, {:.2}s",
            self.succeeded().count(),
            self.failed().count(),
            self.elapsed.as_secs_f64()
        )
    }
}

/// Runs `units` on `jobs` workers (at least one).
///
/// Reports arrive in completion order. A failing or panicking unit never
/// affects its siblings; the only error is a pool that cannot start.
pub fn run_batch(
    pipeline: &Pipeline,
    units: Vec<WorkUnit>,
    jobs: usize,
    sink: &dyn LogSink,
) -> PipelineResult<BatchReport> {
    let jobs = jobs.max(1);
    let total = units.len();
    let start = Instant::now();
    sink.log(
        None,
        Level::INFO,
        &format!("processing {total} files with {jobs} workers"),
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|i| format!("logdev-worker-{i}"))
        .build()
        .map_err(|e| PipelineError::Pool(e.to_string()))?;

    let (tx, rx) = crossbeam_channel::unbounded::<UnitReport>();
    let mut reports = Vec::with_capacity(total);
    pool.in_place_scope(|scope| {
        for unit in units {
            let tx = tx.clone();
            scope.spawn(move |_| {
                let _ = tx.send(run_unit(pipeline, unit, sink));
            });
        }
        drop(tx);

        for report in rx.iter() {
            let done = reports.len() + 1;
            let status = if report.is_ok() { "ok" } else { "failed" };
            sink.log(
                Some(&report.unit.id),
                Level::DEBUG,
                &format!("[{done}/{total}] {status}"),
            );
            reports.push(report);
        }
    });

    let report = BatchReport {
        reports,
        elapsed: start.elapsed(),
    };
    let failed: Vec<_> = report.failed().collect();
    if !failed.is_empty() {
        sink.log(None, Level::WARN, &format!("{} files failed:", failed.len()));
        for r in failed {
            if let Err(e) = &r.outcome {
                sink.log(Some(&r.unit.id), Level::WARN, &e.to_string());
            }
        }
    }
    sink.log(None, Level::INFO, &format!("batch finished: {}", report.summary()));
    Ok(report)
}

/// Executes a plan.
///
/// A single unit runs on the calling thread and its failure is returned as
/// [`PipelineError::Unit`]. A batch always completes with per-unit reports.
pub fn run(pipeline: &Pipeline, plan: Plan, jobs: usize, sink: &dyn LogSink) -> PipelineResult<BatchReport> {
    match plan {
        Plan::Single(unit) => {
            let report = run_unit(pipeline, unit, sink);
            let elapsed = report.elapsed;
            match report.outcome {
                Err(e) => Err(PipelineError::Unit {
                    unit: report.unit.id,
                    source: Box::new(e),
                }),
                Ok(_) => Ok(BatchReport {
                    reports: vec![report],
                    elapsed,
                }),
            }
        }
        Plan::Batch(units) => run_batch(pipeline, units, jobs, sink),
    }
}
