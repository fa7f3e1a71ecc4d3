//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use hitsdeck::{
    Config, Inkscape, PdfUnite, PipelineReport, PlayerPage, QrCodeGenerator, SheetPipeline, Track,
    load_texts, load_tracks, paginate, write_site,
};

/// Load and validate the configuration file.
pub fn load_config(path: &Path) -> Result<Config> {
    Config::load(path).with_context(|| format!("failed to load configuration {}", path.display()))
}

/// Load every track of the configured tracks directory in deck order.
pub fn load_deck(config: &Config) -> Result<Vec<Track>> {
    let tracks = load_tracks(&config.tracks_dir, &config.url_prefix)
        .with_context(|| format!("failed to load tracks from {}", config.tracks_dir.display()))?;
    tracing::info!(tracks = tracks.len(), "deck loaded");
    Ok(tracks)
}

/// Write `index.json` and the player page for `tracks`.
pub fn generate_site(config: &Config, tracks: &[Track]) -> Result<()> {
    let texts = load_texts(&config.translations_dir, &config.language)
        .context("failed to load translations")?;
    let page = PlayerPage {
        language: &config.language,
        title: config.title.as_deref(),
        emoji: &config.emoji,
        texts: &texts,
    };
    write_site(&config.out_dir, tracks, &page)
        .with_context(|| format!("failed to write site into {}", config.out_dir.display()))
}

/// Paginate `tracks` and run the sheet pipeline with the configured tools.
pub fn generate_cards(config: &Config, tracks: Vec<Track>) -> Result<PipelineReport> {
    let layout = config.sheet_layout();
    let pages = paginate(tracks, layout.capacity());
    let codes = QrCodeGenerator::default();
    let converter = Inkscape {
        program: config.pipeline.converter.clone(),
    };
    let merger = PdfUnite {
        program: config.pipeline.merger.clone(),
    };
    let pipeline = SheetPipeline {
        layout: &layout,
        codes: &codes,
        converter: &converter,
        merger: &merger,
        options: config.pipeline_options(),
    };
    let report = pipeline.run(&pages).context("card generation failed")?;
    for line in summary(&report) {
        println!("{line}");
    }
    Ok(report)
}

/// User-facing lines describing a finished card run.
fn summary(report: &PipelineReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(output) = &report.output {
        lines.push(format!(
            "Done! Output is {} ({} pages).",
            output.display(),
            report.pages_merged
        ));
    }
    if !report.pages_skipped.is_empty() {
        lines.push(format!("Pages left out: {:?}", report.pages_skipped));
    }
    lines
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[test]
    fn summary_names_the_merged_deck() {
        let report = PipelineReport {
            output: Some(PathBuf::from("out/cards.pdf")),
            pages_merged: 2,
            pages_skipped: vec![3],
        };
        assert_eq!(
            summary(&report),
            vec![
                "Done! Output is out/cards.pdf (2 pages).".to_string(),
                "Pages left out: [3]".to_string(),
            ]
        );
    }

    #[test]
    fn empty_run_has_no_summary() {
        let report = PipelineReport {
            output: None,
            pages_merged: 0,
            pages_skipped: Vec::new(),
        };
        assert!(summary(&report).is_empty());
    }
}
