//! metaflac/ffmpeg invocations used to read tags and publish audio.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::track::{Track, TrackError};

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} failed on {file} (exit code {exit_code:?}): {stderr}")]
    ExecutionFailed {
        program: &'static str,
        file: PathBuf,
        exit_code: Option<i32>,
        stderr: String,
    },
    #[error("{0}: metaflac produced no output")]
    EmptyOutput(PathBuf),
    #[error(transparent)]
    Track(#[from] TrackError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Split `metaflac --show-md5sum --export-tags-to=-` output into the checksum
/// and the tag map. Keys are upper-cased and later duplicates win.
pub fn parse_metaflac_output(output: &str) -> Option<(String, HashMap<String, String>)> {
    let mut lines = output.lines();
    let md5sum = lines.next()?.trim().to_string();
    let tags = lines
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.to_uppercase(), value.to_string()))
        .collect();
    Some((md5sum, tags))
}

/// Read the checksum and tags of a FLAC file through metaflac.
pub fn read_tags(file: &Path) -> Result<(String, HashMap<String, String>), AudioError> {
    let output = Command::new("metaflac")
        .args(["--show-md5sum", "--export-tags-to=-"])
        .arg(file)
        .output()
        .map_err(|source| AudioError::Spawn {
            program: "metaflac",
            source,
        })?;
    if !output.status.success() {
        return Err(AudioError::ExecutionFailed {
            program: "metaflac",
            file: file.to_path_buf(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_metaflac_output(&stdout).ok_or_else(|| AudioError::EmptyOutput(file.to_path_buf()))
}

/// Load every `*.flac` file directly inside `dir`, sorted into deck order.
pub fn load_tracks(dir: &Path, url_prefix: &str) -> Result<Vec<Track>, AudioError> {
    let entries = fs::read_dir(dir).map_err(|source| AudioError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| AudioError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.extension().is_some_and(|ext| ext == "flac") {
            files.push(path);
        }
    }
    files.sort();

    let mut tracks = Vec::with_capacity(files.len());
    for file in files {
        let (md5sum, tags) = read_tags(&file)?;
        let track = Track::from_tags(url_prefix, &file, &md5sum, &tags)?;
        tracing::debug!(file = %file.display(), year = track.year, "loaded track");
        tracks.push(track);
    }
    tracks.sort();
    Ok(tracks)
}

/// Transcode a track to mono AAC in MP4 under `{out_dir}/songs`, stripping all
/// metadata. Existing outputs are left alone.
pub fn encode_track(track: &Track, out_dir: &Path, bitrate: &str) -> Result<PathBuf, AudioError> {
    let songs_dir = out_dir.join("songs");
    fs::create_dir_all(&songs_dir).map_err(|source| AudioError::Io {
        path: songs_dir.clone(),
        source,
    })?;
    let out_path = songs_dir.join(track.out_file_name());
    if out_path.is_file() {
        tracing::debug!(path = %out_path.display(), "audio already encoded");
        return Ok(out_path);
    }

    tracing::info!(source = %track.source.display(), "encoding audio");
    let output = Command::new("ffmpeg")
        .arg("-i")
        .arg(&track.source)
        .args([
            "-map",
            "0:a",
            "-map_metadata",
            "-1",
            "-movflags",
            "faststart",
            "-c:a",
            "aac",
            "-b:a",
            bitrate,
            "-profile:a",
            "aac_low",
            "-ac",
            "1",
            "-ar",
            "44100",
        ])
        .arg(&out_path)
        .output()
        .map_err(|source| AudioError::Spawn {
            program: "ffmpeg",
            source,
        })?;
    if !output.status.success() {
        return Err(AudioError::ExecutionFailed {
            program: "ffmpeg",
            file: track.source.clone(),
            exit_code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(out_path)
}
