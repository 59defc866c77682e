//! Batch circle-cropping of a directory tree.
//!
//! Walks a source directory, plans one output PNG per supported image
//! (mirroring the relative directory layout), and crops them in parallel
//! using [rayon](https://docs.rs/rayon). Progress is reported through an
//! optional channel of [`BatchEvent`]s so the CLI can print while workers run.
//!
//! A file that fails to decode or encode does not abort the batch; it is
//! reported as [`BatchEvent::Failed`] and counted in the summary. So is a
//! file whose output path was already claimed by an earlier file (`face.jpg`
//! and `face.png` in one folder both map to `face.png`).

use crate::imaging::{self, CircleCropParams, Dimensions, ImagingError};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// One planned unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Earlier source that already maps to `output`. Such a job is not run.
    pub duplicate_of: Option<PathBuf>,
}

/// Progress notifications emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    Written {
        source: PathBuf,
        output: PathBuf,
        original: Dimensions,
        diameter: u32,
    },
    Failed {
        source: PathBuf,
        reason: String,
    },
}

/// Counts after a batch finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: usize,
    pub failed: usize,
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} written, {} failed", self.written, self.failed)
    }
}

/// Plan output paths for every supported image under `source_root`.
///
/// `a/b/face.jpg` under the root becomes `<output_root>/a/b/face.png`.
/// Jobs are sorted by source path so runs are reproducible. When two sources
/// map to the same output, the first in that order keeps it and the later
/// one is marked with [`BatchJob::duplicate_of`].
pub fn plan_batch(source_root: &Path, output_root: &Path) -> Result<Vec<BatchJob>, BatchError> {
    if !source_root.is_dir() {
        return Err(BatchError::NotADirectory(source_root.to_path_buf()));
    }

    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut jobs = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !imaging::decode::is_supported_input(path) {
            continue;
        }
        let relative = path.strip_prefix(source_root).unwrap_or(path);
        let output = output_root.join(relative).with_extension("png");
        let duplicate_of = claimed.get(&output).cloned();
        match &duplicate_of {
            Some(first) => {
                warn!(
                    source = %path.display(),
                    first = %first.display(),
                    output = %output.display(),
                    "output path already claimed"
                );
            }
            None => {
                claimed.insert(output.clone(), path.to_path_buf());
            }
        }
        jobs.push(BatchJob {
            source: path.to_path_buf(),
            output,
            duplicate_of,
        });
    }

    debug!(count = jobs.len(), root = %source_root.display(), "planned batch");
    Ok(jobs)
}

/// Circle-crop one file to its planned output.
fn run_job(job: &BatchJob, params: &CircleCropParams) -> Result<Dimensions, ImagingError> {
    let img = imaging::load_file(&job.source)?;
    let original = Dimensions {
        width: img.width(),
        height: img.height(),
    };
    let avatar = imaging::circle_crop(&img, params);
    if let Some(parent) = job.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    imaging::save_image(&avatar, &job.output)?;
    Ok(original)
}

/// Run all jobs in parallel on the current rayon pool.
pub fn run_batch(
    jobs: &[BatchJob],
    params: &CircleCropParams,
    events: Option<Sender<BatchEvent>>,
) -> BatchSummary {
    let results: Vec<bool> = jobs
        .par_iter()
        .map(|job| {
            let result = match &job.duplicate_of {
                Some(first) => Err(format!(
                    "output {} already written from {}",
                    job.output.display(),
                    first.display()
                )),
                None => run_job(job, params).map_err(|e| e.to_string()),
            };
            let event = match result {
                Ok(original) => BatchEvent::Written {
                    source: job.source.clone(),
                    output: job.output.clone(),
                    original,
                    diameter: params.diameter.get(),
                },
                Err(reason) => {
                    warn!(source = %job.source.display(), error = %reason, "skipping image");
                    BatchEvent::Failed {
                        source: job.source.clone(),
                        reason,
                    }
                }
            };
            let ok = matches!(event, BatchEvent::Written { .. });
            if let Some(tx) = &events {
                // Receiver gone just means nobody is listening any more.
                tx.send(event).ok();
            }
            ok
        })
        .collect();

    let written = results.iter().filter(|ok| **ok).count();
    BatchSummary {
        written,
        failed: results.len() - written,
    }
}
