//! Single page rendering (`hitsdeck render`).

use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use clap::Args;
use hitsdeck::{Page, QrCodeGenerator, Side, paginate, render_page};

use crate::cli::common::SideArg;
use crate::cli::utils::{load_config, load_deck, write_output};

/// Args for `hitsdeck render`.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    pub page: usize,
    /// Which side of the sheet to draw.
    #[arg(long, default_value_t = SideArg::Title, value_enum)]
    pub side: SideArg,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
}

/// Render one page side to SVG.
pub fn handle(config_path: &Path, args: RenderArgs) -> Result<()> {
    let config = load_config(config_path)?;
    let tracks = load_deck(&config)?;
    let layout = config.sheet_layout();
    let pages = paginate(tracks, layout.capacity());
    let page = select_page(&pages, args.page)?;

    let side = Side::from(args.side);
    let footer = format!("{}{}", args.page, side.suffix());
    let svg = render_page(page, &layout, side, &footer, &QrCodeGenerator::default())?;
    write_output(&args.output, &svg)
}

/// Look up a 1-based page number.
fn select_page(pages: &[Page], number: usize) -> Result<&Page> {
    if pages.is_empty() {
        return Err(anyhow!("deck has no pages: no tracks were found"));
    }
    if number == 0 || number > pages.len() {
        return Err(anyhow!(
            "page {} out of range 1..{}",
            number,
            pages.len()
        ));
    }
    Ok(&pages[number - 1])
}
