//! Website generation (`hitsdeck site`).

use std::path::Path;

use anyhow::Result;

use crate::cli::utils::{generate_site, load_config, load_deck};

/// Write `index.json` and the player page.
pub fn handle(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let tracks = load_deck(&config)?;
    generate_site(&config, &tracks)?;
    println!(
        "JSON index and website generated in {}",
        config.out_dir.display()
    );
    Ok(())
}
