//! Directory batch processing.
//!
//! Every `*.json` glyph dump in the input directory yields one outline file
//! of the same name in the output directory. A document that cannot be
//! extracted still gets an output file, with an error title and an empty
//! outline, and the batch moves on.

use crate::document::GlyphDocument;
use crate::error::{Error, Result};
use crate::outline::OutlineResult;
use crate::pipeline::OutlineEngine;
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// One output file: the outline plus optional timing.
#[derive(Debug, Serialize)]
struct OutputRecord {
    #[serde(flatten)]
    result: OutlineResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_taken_seconds: Option<f64>,
}

/// Counts and output paths of a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchSummary {
    /// Documents outlined successfully
    pub processed: usize,
    /// Documents that produced a placeholder or no output
    pub failed: usize,
    /// Output files written, in input order
    pub outputs: Vec<PathBuf>,
}

/// Result of handling one input file.
struct FileOutcome {
    output: PathBuf,
    extracted: bool,
}

/// Runs the engine over a directory of glyph dumps.
pub struct BatchRunner {
    engine: OutlineEngine,
    input_dir: PathBuf,
    output_dir: PathBuf,
    include_timing: bool,
    parallel: bool,
}

impl BatchRunner {
    /// Create a runner. Documents are processed in parallel by default.
    pub fn new(
        engine: OutlineEngine,
        input_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            engine,
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            include_timing: false,
            parallel: true,
        }
    }

    /// Add `time_taken_seconds` to every output file.
    pub fn with_timing(mut self, include_timing: bool) -> Self {
        self.include_timing = include_timing;
        self
    }

    /// Process documents on the rayon thread pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Glyph dumps in the input directory, sorted by file name.
    pub fn discover(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.input_dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }

    /// Process the whole input directory.
    pub fn run(&self) -> Result<BatchSummary> {
        if !self.input_dir.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "input directory {} does not exist",
                self.input_dir.display()
            )));
        }
        fs::create_dir_all(&self.output_dir)?;
        if fs::canonicalize(&self.input_dir)? == fs::canonicalize(&self.output_dir)? {
            return Err(Error::InvalidConfig(
                "input and output directories must differ".to_string(),
            ));
        }

        let paths = self.discover()?;
        if paths.is_empty() {
            log::warn!("no glyph dumps found in {}", self.input_dir.display());
            return Ok(BatchSummary::default());
        }
        log::info!(
            "processing {} documents from {} ({})",
            paths.len(),
            self.input_dir.display(),
            self.engine.describe()
        );

        let outcomes: Vec<(PathBuf, Result<FileOutcome>)> = if self.parallel {
            paths
                .par_iter()
                .map(|p| (p.clone(), self.process_file(p)))
                .collect()
        } else {
            paths
                .iter()
                .map(|p| (p.clone(), self.process_file(p)))
                .collect()
        };

        let mut summary = BatchSummary::default();
        for (path, outcome) in outcomes {
            match outcome {
                Ok(outcome) => {
                    if outcome.extracted {
                        summary.processed += 1;
                    } else {
                        summary.failed += 1;
                    }
                    summary.outputs.push(outcome.output);
                },
                Err(e) => {
                    log::error!("could not write output for {}: {}", path.display(), e);
                    summary.failed += 1;
                },
            }
        }

        log::info!(
            "batch complete: {} processed, {} failed",
            summary.processed,
            summary.failed
        );
        Ok(summary)
    }

    /// Outline one file and write its output.
    ///
    /// Extraction failures become a placeholder output; only a failure to
    /// write the output itself is returned as an error.
    fn process_file(&self, path: &Path) -> Result<FileOutcome> {
        let start = Instant::now();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (result, extracted) =
            match GlyphDocument::open(path).and_then(|doc| self.engine.process(&doc)) {
                Ok(result) => (result, true),
                Err(e) => {
                    log::error!("error processing {}: {}", file_name, e);
                    (placeholder(&file_name), false)
                },
            };

        let elapsed = start.elapsed().as_secs_f64();
        log::info!(
            "{}: {} headings in {:.3}s",
            file_name,
            result.outline.len(),
            elapsed
        );

        let record = OutputRecord {
            result,
            time_taken_seconds: self.include_timing.then_some(elapsed),
        };
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.clone());
        let output = self.output_dir.join(format!("{}.json", stem));
        fs::write(&output, serde_json::to_string_pretty(&record)?)?;

        Ok(FileOutcome { output, extracted })
    }
}

/// Output for a document that could not be extracted.
pub fn placeholder(file_name: &str) -> OutlineResult {
    OutlineResult {
        title: format!("Error processing {}", file_name),
        outline: Vec::new(),
    }
}
