use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so `render -o -` can stream SVG on stdout.
    let default_filter = if cli.verbose {
        "hitsdeck=debug"
    } else {
        "hitsdeck=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli)
}
