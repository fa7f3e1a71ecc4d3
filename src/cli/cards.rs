//! Card sheet generation (`hitsdeck cards`).

use std::path::Path;

use anyhow::Result;

use crate::cli::utils::{generate_cards, load_config, load_deck};

/// Load the deck and print the sheets.
pub fn handle(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let tracks = load_deck(&config)?;
    let report = generate_cards(&config, tracks)?;
    if report.output.is_none() {
        println!("No tracks found, nothing to print");
    }
    Ok(())
}
