//! Label fitting preview (`hitsdeck fit`).

use anyhow::Result;
use clap::Args;
use hitsdeck::fit_lines;

/// Args for `hitsdeck fit`.
#[derive(Args, Debug)]
pub struct FitArgs {
    /// Title or artist to break over card lines.
    #[arg(required = true)]
    pub text: Vec<String>,
}

/// Print one fitted line per output line.
pub fn handle(args: FitArgs) -> Result<()> {
    let text = args.text.join(" ");
    for line in fit_lines(&text) {
        println!("{line}");
    }
    Ok(())
}
