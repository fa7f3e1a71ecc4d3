//! The public side of the deck: `index.json` and the player page.

use std::fs;
use std::path::{Path, PathBuf};

use htmlize::escape_all_quotes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::track::{IndexEntry, Track};

const PLAYER_TEMPLATE: &str = include_str!("../assets/player.html");
const FALLBACK_LANGUAGE: &str = "en";
const DEFAULT_TITLE: &str = "Hits!";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid translation file {}: {source}", path.display())]
    Translation {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// User-facing strings of the player page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Texts {
    #[serde(default)]
    pub title: Option<String>,
    pub button_play: String,
    pub button_pause: String,
    pub no_song_detected: String,
}

/// Load `{dir}/{language}.json`, falling back to English when it is missing.
pub fn load_texts(dir: &Path, language: &str) -> Result<Texts, SiteError> {
    let mut path = dir.join(format!("{language}.json"));
    if !path.is_file() && language != FALLBACK_LANGUAGE {
        tracing::warn!(
            language,
            "translation file not found, falling back to English"
        );
        path = dir.join(format!("{FALLBACK_LANGUAGE}.json"));
    }
    let raw = fs::read_to_string(&path).map_err(|source| SiteError::Io {
        path: path.clone(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| SiteError::Translation { path, source })
}

/// Serialize the index with four-space indentation and unescaped UTF-8.
pub fn index_json(tracks: &[Track]) -> Result<String, SiteError> {
    let entries: Vec<IndexEntry<'_>> = tracks.iter().map(IndexEntry::from).collect();
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut ser)?;
    // serde_json only ever writes UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// What the player page shows besides the translated strings.
#[derive(Debug, Clone)]
pub struct PlayerPage<'a> {
    pub language: &'a str,
    pub title: Option<&'a str>,
    pub emoji: &'a str,
    pub texts: &'a Texts,
}

impl PlayerPage<'_> {
    /// Configured title, then the translated one, then a generic default.
    pub fn resolved_title(&self) -> &str {
        self.title
            .or(self.texts.title.as_deref())
            .unwrap_or(DEFAULT_TITLE)
    }

    pub fn render(&self) -> Result<String, SiteError> {
        let emoji = escape_all_quotes(self.emoji);
        let play = escape_all_quotes(self.texts.button_play.as_str());
        let pause = escape_all_quotes(self.texts.button_pause.as_str());
        let play_html = format!(r#"<span class="icon">{emoji}</span> {play}"#);
        let pause_html = format!(r#"<span class="icon">{emoji}</span> {pause}"#);

        let values = [
            ("lang", escape_all_quotes(self.language).into_owned()),
            ("title", escape_all_quotes(self.resolved_title()).into_owned()),
            ("emoji", emoji.into_owned()),
            ("button_play", play.into_owned()),
            ("play_html", js_literal(&play_html)?),
            ("pause_html", js_literal(&pause_html)?),
            ("no_song", js_literal(&self.texts.no_song_detected)?),
        ];
        Ok(fill_template(PLAYER_TEMPLATE, &values))
    }
}

/// Replace every `{{name}}` in one left-to-right pass.
///
/// Inserted values are never scanned again; unknown placeholders are kept.
fn fill_template(template: &str, values: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let name = &after[..end];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// A JSON string is a valid JS literal; `</` is split so it cannot close the
/// surrounding script element.
fn js_literal(value: &str) -> Result<String, SiteError> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Write `index.json` and `index.html` into `out_dir`.
pub fn write_site(out_dir: &Path, tracks: &[Track], page: &PlayerPage<'_>) -> Result<(), SiteError> {
    fs::create_dir_all(out_dir).map_err(|source| SiteError::Io {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let json_path = out_dir.join("index.json");
    write(&json_path, &index_json(tracks)?)?;
    tracing::info!(path = %json_path.display(), tracks = tracks.len(), "JSON index generated");

    let html_path = out_dir.join("index.html");
    write(&html_path, &page.render()?)?;
    tracing::info!(path = %html_path.display(), "player page generated");
    Ok(())
}

fn write(path: &Path, content: &str) -> Result<(), SiteError> {
    fs::write(path, content).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
