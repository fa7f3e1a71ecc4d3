use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use serde::Serialize;
use thiserror::Error;

/// Checksum metaflac reports for files encoded without `-f8`.
const EMPTY_MD5: &str = "00000000000000000000000000000000";

#[derive(Debug, Error)]
pub enum TrackError {
    #[error("{0}: no embedded md5sum, re-encode with -f8")]
    MissingChecksum(PathBuf),
    #[error("{file}: no {tag} tag present")]
    MissingTag { file: PathBuf, tag: &'static str },
    #[error("{file}: cannot derive a year from date '{date}'")]
    InvalidDate { file: PathBuf, date: String },
}

/// One song in the deck.
///
/// Field order drives the derived ordering: tracks sort by year first and the
/// remaining fields only break ties, so the deck order is stable across runs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Track {
    pub year: i32,
    pub source: PathBuf,
    pub title: String,
    pub artist: String,
    pub md5sum: String,
    pub url: String,
}

impl Track {
    /// Build a track from the audio checksum and the Vorbis comments of `source`.
    ///
    /// Tag keys are expected upper-cased. `MAINARTIST` wins over `ARTIST` and
    /// `ORIGINALDATE` over `DATE`.
    pub fn from_tags(
        url_prefix: &str,
        source: &Path,
        md5sum: &str,
        tags: &HashMap<String, String>,
    ) -> Result<Self, TrackError> {
        if md5sum == EMPTY_MD5 {
            return Err(TrackError::MissingChecksum(source.to_path_buf()));
        }
        let title = tags.get("TITLE").ok_or_else(|| TrackError::MissingTag {
            file: source.to_path_buf(),
            tag: "TITLE",
        })?;
        let artist = tags
            .get("MAINARTIST")
            .or_else(|| tags.get("ARTIST"))
            .ok_or_else(|| TrackError::MissingTag {
                file: source.to_path_buf(),
                tag: "ARTIST",
            })?;
        let date = tags
            .get("ORIGINALDATE")
            .or_else(|| tags.get("DATE"))
            .ok_or_else(|| TrackError::MissingTag {
                file: source.to_path_buf(),
                tag: "ORIGINALDATE or DATE",
            })?;
        let year = parse_year(date).ok_or_else(|| TrackError::InvalidDate {
            file: source.to_path_buf(),
            date: date.clone(),
        })?;
        if year > Utc::now().year() {
            tracing::warn!(file = %source.display(), year, "track is dated in the future");
        }

        Ok(Self {
            year,
            source: source.to_path_buf(),
            title: title.clone(),
            artist: artist.clone(),
            md5sum: md5sum.to_string(),
            url: format!("{url_prefix}{md5sum}.mp4"),
        })
    }

    /// Name of the transcoded file, unpredictable but reproducible.
    pub fn out_file_name(&self) -> String {
        format!("{}.mp4", self.md5sum)
    }

    pub fn decade(&self) -> i32 {
        self.year.div_euclid(10) * 10
    }
}

/// Entry of the public `index.json`.
#[derive(Debug, Serialize)]
pub struct IndexEntry<'a> {
    pub year: i32,
    pub title: &'a str,
    pub artist: &'a str,
    pub md5sum: &'a str,
    pub url: &'a str,
    pub filename: String,
}

impl<'a> From<&'a Track> for IndexEntry<'a> {
    fn from(track: &'a Track) -> Self {
        Self {
            year: track.year,
            title: &track.title,
            artist: &track.artist,
            md5sum: &track.md5sum,
            url: &track.url,
            filename: track.out_file_name(),
        }
    }
}

fn parse_year(date: &str) -> Option<i32> {
    let prefix = date.get(0..4)?;
    if !prefix.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    prefix.parse().ok()
}
