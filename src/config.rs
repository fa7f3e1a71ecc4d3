//! `config.toml` loading and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::pipeline::{MissingPagePolicy, PipelineOptions, RetryPolicy};
use crate::sheet::{CARD_SIDE_MM, PAGE_HEIGHT_MM, PAGE_WIDTH_MM, SheetLayout};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Prefix of the URLs encoded on the cards, e.g. `https://hits.example/`.
    pub url_prefix: String,
    pub font: String,
    #[serde(default = "yes")]
    pub grid: bool,
    #[serde(default = "yes")]
    pub crop_marks: bool,
    #[serde(default = "default_language")]
    pub language: String,
    /// Page title of the player; falls back to the translation's title.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default = "default_emoji")]
    pub emoji: String,
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_tracks_dir")]
    pub tracks_dir: PathBuf,
    #[serde(default = "default_translations_dir")]
    pub translations_dir: PathBuf,
    #[serde(default = "default_bitrate")]
    pub audio_bitrate: String,
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub pipeline: PipelineSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutSection {
    pub columns: usize,
    pub rows: usize,
    pub card_side_mm: f64,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            columns: 3,
            rows: 4,
            card_side_mm: CARD_SIDE_MM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSection {
    pub scratch_dir: PathBuf,
    pub converter: String,
    pub merger: String,
    pub poll_attempts: u32,
    pub poll_interval_ms: u64,
    pub settle_secs: u64,
    pub on_missing_page: MissingPage,
    pub keep_scratch: bool,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            scratch_dir: PathBuf::from("temp"),
            converter: "inkscape".to_string(),
            merger: "pdfunite".to_string(),
            poll_attempts: 20,
            poll_interval_ms: 100,
            settle_secs: 15,
            on_missing_page: MissingPage::Abort,
            keep_scratch: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPage {
    #[default]
    Abort,
    Skip,
}

impl From<MissingPage> for MissingPagePolicy {
    fn from(value: MissingPage) -> Self {
        match value {
            MissingPage::Abort => MissingPagePolicy::Abort,
            MissingPage::Skip => MissingPagePolicy::Skip,
        }
    }
}

fn yes() -> bool {
    true
}

fn default_language() -> String {
    "en".to_string()
}

fn default_emoji() -> String {
    "🎸".to_string()
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("out")
}

fn default_tracks_dir() -> PathBuf {
    PathBuf::from("tracks")
}

fn default_translations_dir() -> PathBuf {
    PathBuf::from("translations")
}

fn default_bitrate() -> String {
    "128k".to_string()
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let layout = &self.layout;
        if layout.columns == 0 || layout.rows == 0 {
            return Err(ConfigError::Invalid(
                "layout needs at least one column and one row".to_string(),
            ));
        }
        if !(layout.card_side_mm > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "card_side_mm must be positive, got {}",
                layout.card_side_mm
            )));
        }
        let width = layout.card_side_mm * layout.columns as f64;
        if width > PAGE_WIDTH_MM {
            return Err(ConfigError::Invalid(format!(
                "{} columns of {}mm do not fit on a {PAGE_WIDTH_MM}mm wide page",
                layout.columns, layout.card_side_mm
            )));
        }
        let sheet = self.sheet_layout();
        if sheet.vertical_margin() + sheet.table_height() > PAGE_HEIGHT_MM {
            return Err(ConfigError::Invalid(format!(
                "{} rows of {}mm do not fit on a {PAGE_HEIGHT_MM}mm high page",
                layout.rows, layout.card_side_mm
            )));
        }
        if self.pipeline.poll_attempts == 0 {
            return Err(ConfigError::Invalid(
                "poll_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn sheet_layout(&self) -> SheetLayout {
        SheetLayout {
            card_side_mm: self.layout.card_side_mm,
            columns: self.layout.columns,
            rows: self.layout.rows,
            font: self.font.clone(),
            grid: self.grid,
            crop_marks: self.crop_marks,
            ..SheetLayout::default()
        }
    }

    /// Pipeline settings writing the merged deck to `{out_dir}/cards.pdf`.
    pub fn pipeline_options(&self) -> PipelineOptions {
        let p = &self.pipeline;
        PipelineOptions {
            scratch_dir: p.scratch_dir.clone(),
            output: self.out_dir.join("cards.pdf"),
            poll: RetryPolicy {
                attempts: p.poll_attempts,
                interval: Duration::from_millis(p.poll_interval_ms),
            },
            settle: Duration::from_secs(p.settle_secs),
            on_missing_page: p.on_missing_page.into(),
            keep_scratch: p.keep_scratch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MINIMAL: &str = r#"
url_prefix = "https://hits.example/"
font = "Cantarell"
"#;

    fn parse(raw: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("config.toml"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.language, "en");
        assert_eq!(config.title, None);
        assert_eq!(config.out_dir, PathBuf::from("out"));
        assert_eq!(config.audio_bitrate, "128k");
        assert!(config.grid && config.crop_marks);
        assert_eq!(config.layout, LayoutSection::default());
        assert_eq!(config.pipeline, PipelineSection::default());

        let layout = config.sheet_layout();
        assert_eq!(layout.capacity(), 12);
        assert_eq!(layout.font, "Cantarell");

        let options = config.pipeline_options();
        assert_eq!(options.output, PathBuf::from("out/cards.pdf"));
        assert_eq!(options.poll, RetryPolicy::default());
        assert_eq!(options.settle, Duration::from_secs(15));
        assert_eq!(options.on_missing_page, MissingPagePolicy::Abort);
    }

    #[test]
    fn sections_override_defaults() {
        let raw = format!(
            "{MINIMAL}grid = false\n\
             [layout]\ncolumns = 2\nrows = 3\ncard_side_mm = 80\n\
             [pipeline]\non_missing_page = \"skip\"\nsettle_secs = 0\npoll_interval_ms = 5\n"
        );
        let config = parse(&raw).unwrap();
        let layout = config.sheet_layout();
        assert_eq!((layout.columns, layout.rows), (2, 3));
        assert_eq!(layout.horizontal_margin(), 25.0);
        assert!(!layout.grid);
        let options = config.pipeline_options();
        assert_eq!(options.on_missing_page, MissingPagePolicy::Skip);
        assert_eq!(options.settle, Duration::ZERO);
        assert_eq!(options.poll.interval, Duration::from_millis(5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let raw = format!("{MINIMAL}mp3_bitrate = \"190k\"\n");
        assert!(matches!(parse(&raw), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn required_keys_are_enforced() {
        let err = parse("font = \"x\"\n").unwrap_err();
        assert!(err.to_string().contains("url_prefix"), "{err}");
    }

    #[test]
    fn layout_must_fit_the_page() {
        let too_wide = format!("{MINIMAL}[layout]\ncolumns = 4\n");
        let err = parse(&too_wide).unwrap_err();
        assert!(err.to_string().contains("do not fit"), "{err}");

        let too_tall = format!("{MINIMAL}[layout]\nrows = 5\n");
        assert!(parse(&too_tall).is_err());

        let empty = format!("{MINIMAL}[layout]\nrows = 0\n");
        assert!(matches!(parse(&empty), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn example_config_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config.example.toml");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.layout, LayoutSection::default());
        assert_eq!(config.pipeline, PipelineSection::default());
    }

    #[test]
    fn load_reports_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));

        fs::write(&path, MINIMAL).unwrap();
        assert_eq!(Config::load(&path).unwrap().font, "Cantarell");
    }
}
