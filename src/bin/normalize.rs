use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Normalize a Cobertura coverage report in place and generate a coverage
/// badge from its overall line rate.
#[derive(Parser)]
#[command(name = "covform-normalize", version, about)]
struct Cli {
    /// Path to the Cobertura XML report (rewritten in place).
    file: PathBuf,

    /// Where to write the SVG coverage badge.
    #[arg(long, default_value = "badge.svg")]
    badge: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let out = covform::cli::cmd_normalize(&cli.file, &cli.badge)?;
    print!("{out}");
    Ok(())
}
