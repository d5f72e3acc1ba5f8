//! SVG coverage badge rendering.
//!
//! Mirrors the shields.io flat style: a gray "Coverage" label block next to
//! a colored percentage block, with a glossy gradient overlay and embossed
//! text (a shadow copy drawn under each foreground copy). Text coordinates
//! are scaled by 10 and drawn with an explicit textLength so the badge
//! renders identically across font stacks.

const LABEL: &str = "Coverage";

/// Rendered width of the "Coverage" label in Verdana 11px.
const LABEL_WIDTH: u32 = 61;

const COLOR_BRIGHTGREEN: &str = "#4c1";
const COLOR_GREEN: &str = "#97ca00";
const COLOR_YELLOW: &str = "#dfb317";
const COLOR_ORANGE: &str = "#fe7d37";
const COLOR_RED: &str = "#e05d44";

/// Map a coverage percentage to its badge color, first match wins.
fn color_for(coverage: f64) -> &'static str {
    if coverage >= 95.0 {
        COLOR_BRIGHTGREEN
    } else if coverage >= 90.0 {
        COLOR_GREEN
    } else if coverage >= 75.0 {
        COLOR_YELLOW
    } else if coverage >= 50.0 {
        COLOR_ORANGE
    } else {
        COLOR_RED
    }
}

/// A coverage badge: percentage, color tier and text geometry.
#[derive(Debug)]
pub struct Badge {
    percent: i64,
    color: &'static str,
    value_width: u32,
}

impl Badge {
    /// Build a badge from a decimal line-rate string in [0, 1]. Unparsable
    /// input falls back to 0.0 so the badge always renders, as the
    /// worst-case color.
    #[must_use]
    pub fn from_rate(line_rate: &str) -> Self {
        let coverage = line_rate
            .trim()
            .parse::<f64>()
            .map(|rate| rate * 100.0)
            .unwrap_or(0.0);

        let percent = coverage as i64;
        let value_len = format!("{percent}%").len();
        let value_width = (value_len as f64 * 8.5) as u32 + 10;

        Badge {
            percent,
            color: color_for(coverage),
            value_width,
        }
    }

    #[must_use]
    pub fn color(&self) -> &'static str {
        self.color
    }

    /// The percentage text drawn in the value block, e.g. "85%".
    #[must_use]
    pub fn value_text(&self) -> String {
        format!("{}%", self.percent)
    }

    /// Render the self-contained SVG image.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let label = LABEL;
        let value = self.value_text();
        let color = self.color;
        let label_width = LABEL_WIDTH;
        let value_width = self.value_width;
        let total_width = label_width + value_width;

        // Text centers, scaled by 10 for sub-pixel accuracy.
        let label_x = (label_width as f64 / 2.0 * 10.0) as u32;
        let value_x = ((label_width as f64 + value_width as f64 / 2.0) * 10.0) as u32;
        let label_tl = label_width * 10 - 100;
        let value_tl = value_width * 10 - 100;

        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{total_width}" height="20" role="img" aria-label="{label}: {value}">
    <title>{label}: {value}</title>
    <linearGradient id="s" x2="0" y2="100%">
        <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
        <stop offset="1" stop-opacity=".1"/>
    </linearGradient>
    <clipPath id="r">
        <rect width="{total_width}" height="20" rx="3" fill="#fff"/>
    </clipPath>
    <g clip-path="url(#r)">
        <rect width="{label_width}" height="20" fill="#555"/>
        <rect x="{label_width}" width="{value_width}" height="20" fill="{color}"/>
        <rect width="{total_width}" height="20" fill="url(#s)"/>
    </g>
    <g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" text-rendering="geometricPrecision" font-size="110">
        <text aria-hidden="true" x="{label_x}" y="150" fill="#010101" fill-opacity=".3" transform="scale(.1)" textLength="{label_tl}">{label}</text>
        <text x="{label_x}" y="140" transform="scale(.1)" fill="#fff" textLength="{label_tl}">{label}</text>
        <text aria-hidden="true" x="{value_x}" y="150" fill="#010101" fill-opacity=".3" transform="scale(.1)" textLength="{value_tl}">{value}</text>
        <text x="{value_x}" y="140" transform="scale(.1)" fill="#fff" textLength="{value_tl}">{value}</text>
    </g>
</svg>"##
        )
    }
}
