//! Flat two-tone SVG badges.
//!
//! Label and count are interpolated as-is, callers must not pass markup.

/// Accent colour of the count segment.
pub const DEFAULT_COLOR: &str = "007ec6";

const LABEL_COLOR: &str = "555";
const HEIGHT: u32 = 20;
const CHAR_WIDTH: u32 = 7;
const MIN_SEGMENT_WIDTH: u32 = 20;

/// Width in pixels of a segment holding `text`.
pub fn segment_width(text: &str) -> u32 {
    let chars = text.chars().count() as u32;
    (CHAR_WIDTH * chars).max(MIN_SEGMENT_WIDTH)
}

pub fn render_badge(label: &str, count: &str) -> String {
    render_badge_with_color(label, count, DEFAULT_COLOR)
}

/// Renders a badge whose count segment is filled with `color`, a hex value without `#`.
pub fn render_badge_with_color(label: &str, count: &str, color: &str) -> String {
    let label_width = segment_width(label);
    let count_width = segment_width(count);
    let total_width = label_width + count_width;

    // f64 keeps the half pixel of odd widths and prints whole numbers without a fraction
    let label_x = f64::from(label_width) / 2.0;
    let count_x = f64::from(label_width) + f64::from(count_width) / 2.0;

    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{total_width}" height="{HEIGHT}" role="img" aria-label="{label}: {count}">
  <title>{label}: {count}</title>
  <linearGradient id="s" x2="0" y2="100%">
    <stop offset="0" stop-color="#bbb" stop-opacity=".1"/>
    <stop offset="1" stop-opacity=".1"/>
  </linearGradient>
  <clipPath id="r">
    <rect width="{total_width}" height="{HEIGHT}" rx="3" fill="#fff"/>
  </clipPath>
  <g clip-path="url(#r)">
    <rect width="{label_width}" height="{HEIGHT}" fill="#{LABEL_COLOR}"/>
    <rect x="{label_width}" width="{count_width}" height="{HEIGHT}" fill="#{color}"/>
    <rect width="{total_width}" height="{HEIGHT}" fill="url(#s)"/>
  </g>
  <g fill="#fff" text-anchor="middle" font-family="Verdana,Geneva,DejaVu Sans,sans-serif" text-rendering="geometricPrecision" font-size="11">
    <text x="{label_x}" y="15" fill="#fff">{label}</text>
    <text x="{count_x}" y="15" fill="#fff">{count}</text>
  </g>
</svg>"##
    )
}

/// Formats `n` with a comma between every group of three digits.
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(digit);
    }

    formatted
}
