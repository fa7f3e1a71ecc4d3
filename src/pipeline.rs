//! Turns pages into one print-ready PDF through external tools.
//!
//! Every page side is rendered to `{scratch}/{page}{a|b}.svg`, converted to a
//! PDF next to it, and the PDFs are merged as `1a, 1b, 2a, 2b, ...` so each
//! sheet's front is directly followed by its back.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::deck::Page;
use crate::qr::{CodeError, CodeGenerator};
use crate::sheet::{SheetLayout, Side, render_page};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("PDF was not generated: {} (page {page}, side {side})", path.display())]
    MissingConversionOutput {
        page: usize,
        side: char,
        path: PathBuf,
    },
    #[error("every page failed to convert; nothing to merge")]
    NothingToMerge,
    #[error(transparent)]
    CodeGeneration(#[from] CodeError),
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed (exit code {exit_code:?}): {stderr}")]
    ToolFailed {
        program: String,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Converts one SVG drawing into one PDF document.
pub trait DocumentConverter {
    fn convert(&self, svg: &Path, pdf: &Path) -> Result<(), PipelineError>;
}

/// Concatenates PDF documents in the given order.
pub trait DocumentMerger {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), PipelineError>;
}

/// Inkscape command-line export with a forced white background.
#[derive(Debug, Clone)]
pub struct Inkscape {
    pub program: String,
}

impl Default for Inkscape {
    fn default() -> Self {
        Self {
            program: "inkscape".to_string(),
        }
    }
}

impl DocumentConverter for Inkscape {
    fn convert(&self, svg: &Path, pdf: &Path) -> Result<(), PipelineError> {
        let mut export = std::ffi::OsString::from("--export-filename=");
        export.push(pdf);
        let mut cmd = Command::new(&self.program);
        cmd.arg(svg)
            .arg("--export-type=pdf")
            .arg(export)
            .arg("--export-background=white");
        run_tool(&self.program, &mut cmd)
    }
}

/// `pdfunite` from poppler-utils: `pdfunite <inputs...> <output>`.
#[derive(Debug, Clone)]
pub struct PdfUnite {
    pub program: String,
}

impl Default for PdfUnite {
    fn default() -> Self {
        Self {
            program: "pdfunite".to_string(),
        }
    }
}

impl DocumentMerger for PdfUnite {
    fn merge(&self, inputs: &[PathBuf], output: &Path) -> Result<(), PipelineError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(inputs).arg(output);
        run_tool(&self.program, &mut cmd)
    }
}

fn run_tool(program: &str, cmd: &mut Command) -> Result<(), PipelineError> {
    let output = cmd.output().map_err(|source| PipelineError::Spawn {
        program: program.to_string(),
        source,
    })?;
    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            program: program.to_string(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(())
}

/// Bounded polling: `attempts` sleeps of `interval`, with a check before
/// each sleep and one after the last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 20,
            interval: Duration::from_millis(100),
        }
    }
}

impl RetryPolicy {
    /// Returns `true` as soon as `ready` does.
    ///
    /// Every failed attempt is followed by one `interval` of sleep and a last
    /// check happens after the final sleep, so the full window is
    /// `attempts * interval`.
    pub fn wait_until(&self, mut ready: impl FnMut() -> bool) -> bool {
        for _ in 0..self.attempts {
            if ready() {
                return true;
            }
            thread::sleep(self.interval);
        }
        ready()
    }
}

/// What to do when a converted page never shows up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingPagePolicy {
    /// Fail the whole run.
    #[default]
    Abort,
    /// Leave the page (both sides) out of the merged deck.
    Skip,
}

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub scratch_dir: PathBuf,
    pub output: PathBuf,
    pub poll: RetryPolicy,
    /// Pause before merging, for converters that exit before their output
    /// is fully flushed.
    pub settle: Duration,
    pub on_missing_page: MissingPagePolicy,
    pub keep_scratch: bool,
}

impl PipelineOptions {
    pub fn new(scratch_dir: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            output: output.into(),
            poll: RetryPolicy::default(),
            settle: Duration::from_secs(15),
            on_missing_page: MissingPagePolicy::Abort,
            keep_scratch: false,
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Merged PDF, absent when there were no pages.
    pub output: Option<PathBuf>,
    pub pages_merged: usize,
    /// 1-based page numbers left out under [`MissingPagePolicy::Skip`].
    pub pages_skipped: Vec<usize>,
}

/// One page side on disk.
#[derive(Debug, Clone)]
struct SideFiles {
    page: usize,
    side: Side,
    svg: PathBuf,
    pdf: PathBuf,
}

/// Drives rendering, conversion and merging of a paginated deck.
pub struct SheetPipeline<'a> {
    pub layout: &'a SheetLayout,
    pub codes: &'a dyn CodeGenerator,
    pub converter: &'a dyn DocumentConverter,
    pub merger: &'a dyn DocumentMerger,
    pub options: PipelineOptions,
}

impl SheetPipeline<'_> {
    pub fn run(&self, pages: &[Page]) -> Result<PipelineReport, PipelineError> {
        if pages.is_empty() {
            tracing::info!("no pages to print, skipping card generation");
            return Ok(PipelineReport {
                output: None,
                pages_merged: 0,
                pages_skipped: Vec::new(),
            });
        }

        let scratch = &self.options.scratch_dir;
        fs::create_dir_all(scratch).map_err(|source| io_error(scratch, source))?;

        let files = self.render_all(pages)?;
        let skipped = self.convert_all(&files)?;
        let merged: Vec<&SideFiles> = files
            .iter()
            .filter(|f| !skipped.contains(&f.page))
            .collect();
        if merged.is_empty() {
            return Err(PipelineError::NothingToMerge);
        }

        if !self.options.settle.is_zero() {
            tracing::info!(
                secs = self.options.settle.as_secs_f64(),
                "waiting for converted PDFs to settle before merging"
            );
            thread::sleep(self.options.settle);
        }

        let inputs: Vec<PathBuf> = merged.iter().map(|f| f.pdf.clone()).collect();
        let output = &self.options.output;
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
        }
        tracing::info!(output = %output.display(), documents = inputs.len(), "merging PDFs");
        self.merger.merge(&inputs, output)?;

        if !self.options.keep_scratch {
            cleanup(scratch, &files);
        }

        Ok(PipelineReport {
            output: Some(output.clone()),
            pages_merged: pages.len() - skipped.len(),
            pages_skipped: skipped,
        })
    }

    fn render_all(&self, pages: &[Page]) -> Result<Vec<SideFiles>, PipelineError> {
        let mut files = Vec::with_capacity(pages.len() * 2);
        for (i, page) in pages.iter().enumerate() {
            let number = i + 1;
            for side in [Side::Title, Side::Code] {
                let stem = format!("{number}{}", side.suffix());
                let svg = self.options.scratch_dir.join(format!("{stem}.svg"));
                let pdf = self.options.scratch_dir.join(format!("{stem}.pdf"));
                let drawing = render_page(page, self.layout, side, &stem, self.codes)?;
                fs::write(&svg, drawing).map_err(|source| io_error(&svg, source))?;
                tracing::debug!(path = %svg.display(), cards = page.len(), "rendered page side");
                files.push(SideFiles {
                    page: number,
                    side,
                    svg,
                    pdf,
                });
            }
        }
        Ok(files)
    }

    /// Convert every side, returning the page numbers that were skipped.
    fn convert_all(&self, files: &[SideFiles]) -> Result<Vec<usize>, PipelineError> {
        let mut skipped: Vec<usize> = Vec::new();
        for file in files {
            if skipped.contains(&file.page) {
                continue;
            }
            tracing::info!(
                svg = %file.svg.display(),
                pdf = %file.pdf.display(),
                "converting page side"
            );
            remove_stale(&file.pdf)?;
            self.converter.convert(&file.svg, &file.pdf)?;
            if self.options.poll.wait_until(|| file.pdf.is_file()) {
                continue;
            }
            match self.options.on_missing_page {
                MissingPagePolicy::Abort => {
                    return Err(PipelineError::MissingConversionOutput {
                        page: file.page,
                        side: file.side.suffix(),
                        path: file.pdf.clone(),
                    });
                }
                MissingPagePolicy::Skip => {
                    tracing::warn!(
                        page = file.page,
                        path = %file.pdf.display(),
                        "PDF was not generated, leaving page out of the deck"
                    );
                    skipped.push(file.page);
                }
            }
        }
        Ok(skipped)
    }
}

/// Remove the files this run created. Failures are only logged.
fn cleanup(scratch: &Path, files: &[SideFiles]) {
    for file in files {
        for path in [&file.svg, &file.pdf] {
            if !path.exists() {
                continue;
            }
            if let Err(err) = fs::remove_file(path) {
                tracing::warn!(path = %path.display(), error = %err, "could not remove scratch file");
            }
        }
    }
    // Only succeeds once the directory is empty, which leaves unrelated files alone.
    if let Err(err) = fs::remove_dir(scratch) {
        tracing::debug!(path = %scratch.display(), error = %err, "scratch directory kept");
    }
}

/// Drop a PDF left over from an earlier run so it cannot pass for fresh output.
fn remove_stale(pdf: &Path) -> Result<(), PipelineError> {
    match fs::remove_file(pdf) {
        Ok(()) => {
            tracing::debug!(path = %pdf.display(), "removed stale PDF");
            Ok(())
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(io_error(pdf, source)),
    }
}

fn io_error(path: &Path, source: std::io::Error) -> PipelineError {
    PipelineError::Io {
        path: path.to_path_buf(),
        source,
    }
}
