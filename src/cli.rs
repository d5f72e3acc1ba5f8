//! Command handler functions for the covform binaries.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout. File paths and the optional CI summary
//! sink are passed in; environment lookups stay in the binaries.

use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::badge::Badge;
use crate::{loader, normalize, summary};

/// Render the badge from the report's overall line-rate, then normalize
/// the report in place. The badge is written before the structural pass so
/// it still appears when the document has no `<packages>` container.
pub fn cmd_normalize(file: &Path, badge_path: &Path) -> Result<String> {
    let mut doc = loader::load_file(file)?;

    let mut out = String::new();

    let badge = Badge::from_rate(doc.attrs.get("line-rate").unwrap_or("0"));
    std::fs::write(badge_path, badge.to_svg())
        .with_context(|| format!("Failed to write badge to {}", badge_path.display()))?;
    writeln!(
        out,
        "Generated badge: {} ({})",
        badge_path.display(),
        badge.value_text()
    )
    .unwrap();

    let count = normalize::normalize(&mut doc)?;
    let xml = normalize::to_canonical_xml(&doc)?;
    std::fs::write(file, xml).with_context(|| format!("Failed to write {}", file.display()))?;
    writeln!(
        out,
        "Successfully transformed {}: Split {} classes into separate packages.",
        file.display(),
        count
    )
    .unwrap();

    Ok(out)
}

/// Render the markdown summary. When `append_to` is given (the CI job
/// summary file), the report is also appended there.
pub fn cmd_summary(file: &Path, append_to: Option<&Path>) -> Result<String> {
    let doc = loader::load_file(file)?;
    let markdown = summary::render(&doc);

    if let Some(path) = append_to {
        let mut sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open summary sink {}", path.display()))?;
        write!(sink, "\n{markdown}\n")
            .with_context(|| format!("Failed to append to {}", path.display()))?;
    }

    Ok(markdown)
}
