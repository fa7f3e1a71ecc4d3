//! Full deck build (`hitsdeck build`).

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use hitsdeck::{DeckStats, encode_track, fingerprint};

use crate::cli::utils::{generate_cards, generate_site, load_config, load_deck};

/// Args for `hitsdeck build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Do not transcode audio into the output directory.
    #[arg(long)]
    pub skip_audio: bool,
    /// Do not print card sheets.
    #[arg(long)]
    pub skip_cards: bool,
}

/// Execute a full build.
///
/// A card failure does not hide the statistics: they are printed first and
/// the command fails afterwards.
pub fn handle(config_path: &Path, args: BuildArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let tracks = load_deck(&config)?;

    if !args.skip_audio {
        for track in &tracks {
            encode_track(track, &config.out_dir, &config.audio_bitrate)
                .with_context(|| format!("failed to encode {}", track.source.display()))?;
        }
    }

    generate_site(&config, &tracks)?;
    println!("Website generated in {}", config.out_dir.display());

    let stats = DeckStats::collect(&tracks);
    let hash = fingerprint(&tracks);
    let cards = if args.skip_cards {
        Ok(())
    } else {
        generate_cards(&config, tracks).map(|_| ())
    };
    if let Err(err) = &cards {
        tracing::warn!(error = %format!("{err:#}"), "cards generation failed");
    }

    println!();
    println!("{stats}");
    println!("Fingerprint: {hash}");
    cards
}
