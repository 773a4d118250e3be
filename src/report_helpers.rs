use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Compute the max display width of `names`, with a minimum of `min`.
pub fn max_name_width<'a>(names: impl Iterator<Item = &'a str>, min: usize) -> usize {
    names.map(UnicodeWidthStr::width).max().unwrap_or(min).max(min)
}

/// Left-align `s` in a column `width` terminal cells wide.
///
/// `format!` pads by char count, which misaligns wide (CJK, emoji) names.
pub fn pad_right(s: &str, width: usize) -> String {
    let pad = width.saturating_sub(s.width());
    format!("{s}{}", " ".repeat(pad))
}

/// Print a horizontal separator of box-drawing chars.
pub fn separator(width: usize) -> String {
    "\u{2500}".repeat(width)
}

/// Share of `part` in `total` as a percentage; 0 when `total` is 0.
pub fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}

/// Serialize to pretty JSON and print to stdout.
pub fn print_json_stdout(value: &impl Serialize) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "report_helpers_test.rs"]
mod tests;
