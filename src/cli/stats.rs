//! Deck statistics (`hitsdeck stats`).

use std::path::Path;

use anyhow::Result;
use hitsdeck::{DeckStats, fingerprint, paginate};

use crate::cli::utils::{load_config, load_deck};

/// Print the year/decade histograms, page count and deck fingerprint.
pub fn handle(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let tracks = load_deck(&config)?;
    let layout = config.sheet_layout();
    let pages = paginate(tracks.iter().cloned(), layout.capacity());

    println!("{}", DeckStats::collect(&tracks));
    println!("Pages: {} ({} cards per page)", pages.len(), layout.capacity());
    println!("Fingerprint: {}", fingerprint(&tracks));
    Ok(())
}
