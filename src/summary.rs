//! Markdown coverage summary rendering.
//!
//! Produces the per-file table posted to the CI job summary: overall
//! line/branch statistics from the root attributes, then one row per class
//! with an icon tier, formatted percentages and the uncovered lines
//! compressed into closed ranges. Works on both raw and normalized
//! documents (one or many classes per package).

use std::fmt::Write;

use crate::document::{ClassEntry, CoverageDocument};

const ICON_GREEN: &str = "🟢";
const ICON_YELLOW: &str = "🟡";
const ICON_RED: &str = "🔴";

/// Icon tier for a file's line rate. Strictly greater-than: a rate of
/// exactly 0.95 is yellow, not green.
fn icon_for(line_rate: f64) -> &'static str {
    if line_rate > 0.95 {
        ICON_GREEN
    } else if line_rate > 0.90 {
        ICON_YELLOW
    } else {
        ICON_RED
    }
}

/// Render the markdown report for a coverage document.
#[must_use]
pub fn render(doc: &CoverageDocument) -> String {
    let total_line_rate = doc.attrs.get_f64("line-rate") * 100.0;
    let total_branch_rate = doc.attrs.get_f64("branch-rate") * 100.0;
    let lines_covered = doc.attrs.get_count("lines-covered");
    let lines_valid = doc.attrs.get_count("lines-valid");
    let branches_covered = doc.attrs.get_count("branches-covered");
    let branches_valid = doc.attrs.get_count("branches-valid");

    let mut md = String::new();
    md.push_str("# 📊 Code Coverage Report\n\n");
    md.push_str("### 📈 Overall Statistics\n");
    writeln!(
        md,
        "- **Total Line Coverage:** `{total_line_rate:.1}%` ({lines_covered}/{lines_valid})"
    )
    .unwrap();
    writeln!(
        md,
        "- **Total Branch Coverage:** `{total_branch_rate:.1}%` ({branches_covered}/{branches_valid})"
    )
    .unwrap();
    md.push('\n');

    md.push_str("### 📄 Detailed Per-File Coverage\n\n");
    md.push_str("| File | Line Coverage | Branch Coverage | Uncovered Lines |\n");
    md.push_str("| :--- | :---: | :---: | :--- |\n");

    for class in doc.classes() {
        let filename = class.filename();
        let line_rate = class.line_rate();
        let branch_rate = class.branch_rate();
        let line_pct = line_rate * 100.0;
        let branch_pct = branch_rate * 100.0;
        let icon = icon_for(line_rate);
        let uncovered = uncovered_ranges(class);
        writeln!(
            md,
            "| {icon} `{filename}` | {line_pct:.1}% | {branch_pct:.1}% | `{uncovered}` |"
        )
        .unwrap();
    }

    md
}

/// The uncovered-lines cell for one class: "N/A" when the class has no
/// `<lines>` element, "None" when every line is hit, otherwise the
/// compressed range list.
fn uncovered_ranges(class: &ClassEntry) -> String {
    let Some(lines) = class.lines.as_ref() else {
        return "N/A".to_string();
    };

    let mut uncovered: Vec<u32> = lines
        .iter()
        .filter(|l| l.hits() == 0)
        .filter_map(|l| l.number())
        .collect();

    if uncovered.is_empty() {
        return "None".to_string();
    }

    uncovered.sort_unstable();
    format_line_ranges(&uncovered)
}

/// Format line numbers into compact range notation, merging consecutive
/// integers into closed ranges: `{5,6,7,10,12,13}` → `"5-7, 10, 12-13"`.
///
/// The input slice must be sorted in ascending order.
#[must_use]
pub fn format_line_ranges(lines: &[u32]) -> String {
    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut iter = lines.iter().copied();

    if let Some(first) = iter.next() {
        let mut start = first;
        let mut end = first;
        for line in iter {
            if line == end + 1 {
                end = line;
            } else {
                ranges.push((start, end));
                start = line;
                end = line;
            }
        }
        ranges.push((start, end));
    }

    ranges
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;

    #[test]
    fn test_icon_boundaries() {
        // Strict greater-than on both boundaries.
        assert_eq!(icon_for(0.951), ICON_GREEN);
        assert_eq!(icon_for(0.95), ICON_YELLOW);
        assert_eq!(icon_for(0.901), ICON_YELLOW);
        assert_eq!(icon_for(0.90), ICON_RED);
        assert_eq!(icon_for(0.0), ICON_RED);
    }

    #[test]
    fn test_format_line_ranges_empty() {
        assert_eq!(format_line_ranges(&[]), "");
    }

    #[test]
    fn test_format_line_ranges_singleton() {
        assert_eq!(format_line_ranges(&[3]), "3");
    }

    #[test]
    fn test_format_line_ranges_run() {
        assert_eq!(format_line_ranges(&[3, 4, 5]), "3-5");
    }

    #[test]
    fn test_format_line_ranges_mixed() {
        assert_eq!(format_line_ranges(&[1, 3, 4, 6]), "1, 3-4, 6");
        assert_eq!(format_line_ranges(&[5, 6, 7, 10, 12, 13]), "5-7, 10, 12-13");
    }

    const SAMPLE: &[u8] = br#"<coverage line-rate="0.9" branch-rate="0.5" lines-covered="18" lines-valid="20" branches-covered="1" branches-valid="2">
  <packages>
    <package name="app">
      <classes>
        <class name="a.py" filename="src/a.py" line-rate="0.8" branch-rate="0">
          <lines>
            <line number="1" hits="1"/>
            <line number="2" hits="1"/>
            <line number="5" hits="0"/>
            <line number="6" hits="0.0"/>
            <line number="9" hits="0"/>
          </lines>
        </class>
        <class name="b.py" filename="src/b.py" line-rate="1" branch-rate="1">
          <lines>
            <line number="1" hits="4"/>
            <line number="2" hits="4"/>
          </lines>
        </class>
        <class name="c.py" filename="src/c.py" line-rate="0.93"/>
      </classes>
    </package>
  </packages>
</coverage>"#;

    #[test]
    fn test_render_overall_statistics() {
        let doc = loader::load(SAMPLE).unwrap();
        let md = render(&doc);

        assert!(md.starts_with("# 📊 Code Coverage Report\n"));
        assert!(md.contains("- **Total Line Coverage:** `90.0%` (18/20)"));
        assert!(md.contains("- **Total Branch Coverage:** `50.0%` (1/2)"));
    }

    #[test]
    fn test_render_table_rows() {
        let doc = loader::load(SAMPLE).unwrap();
        let md = render(&doc);

        // Fractional hits strings ("0.0") count as uncovered.
        assert!(md.contains("| 🔴 `src/a.py` | 80.0% | 0.0% | `5-6, 9` |"));
        assert!(md.contains("| 🟢 `src/b.py` | 100.0% | 100.0% | `None` |"));
        // No <lines> element at all.
        assert!(md.contains("| 🟡 `src/c.py` | 93.0% | 0.0% | `N/A` |"));
    }

    #[test]
    fn test_render_tolerates_missing_root_attrs() {
        let doc = loader::load(b"<coverage><packages/></coverage>").unwrap();
        let md = render(&doc);
        assert!(md.contains("- **Total Line Coverage:** `0.0%` (0/0)"));
    }

    #[test]
    fn test_render_normalized_and_raw_agree() {
        let doc = loader::load(SAMPLE).unwrap();
        let raw = render(&doc);

        let mut doc = loader::load(SAMPLE).unwrap();
        crate::normalize::normalize(&mut doc).unwrap();
        let normalized = render(&doc);

        // Filenames carry no build-root prefix here, so the rows match.
        assert_eq!(raw, normalized);
    }
}
