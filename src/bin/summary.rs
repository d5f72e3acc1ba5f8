use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

/// Print a per-file markdown coverage summary for a Cobertura report, and
/// append it to the GitHub Actions job summary when GITHUB_STEP_SUMMARY is
/// set.
#[derive(Parser)]
#[command(name = "covform-summary", version, about)]
struct Cli {
    /// Path to the Cobertura XML report.
    file: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let append_to = std::env::var_os("GITHUB_STEP_SUMMARY").map(PathBuf::from);
    let out = covform::cli::cmd_summary(&cli.file, append_to.as_deref())?;
    println!("{out}");
    Ok(())
}
