//! Command-line interface wiring for the `hitsdeck` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per command.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod build;
pub mod cards;
pub mod common;
pub mod fit;
pub mod render;
pub mod site;
pub mod stats;
pub mod utils;

/// Parsed CLI entrypoint for the `hitsdeck` binary.
#[derive(Parser, Debug)]
#[command(
    name = "hitsdeck",
    version,
    about = "Music-quiz card deck and player site builder"
)]
pub struct Cli {
    /// Configuration file.
    #[arg(short = 'c', long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Log debug details (overridden by RUST_LOG).
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode audio, write the site and print the cards.
    Build(build::BuildArgs),
    /// Print the card sheets only.
    Cards,
    /// Write `index.json` and the player page only.
    Site,
    /// Show year and decade distribution of the deck.
    Stats,
    /// Render a single page side as SVG.
    Render(render::RenderArgs),
    /// Show how a label would be broken over card lines.
    Fit(fit::FitArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Build(args) => build::handle(&cli.config, args),
        Command::Cards => cards::handle(&cli.config),
        Command::Site => site::handle(&cli.config),
        Command::Stats => stats::handle(&cli.config),
        Command::Render(args) => render::handle(&cli.config, args),
        Command::Fit(args) => fit::handle(args),
    }
}
