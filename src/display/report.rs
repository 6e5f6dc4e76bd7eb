//! Formatting helpers shared by the report views

use crate::models::{GuidelineStatus, Money};

const RESET: &str = "\x1b[0m";

/// Wrap text in the color of a guideline status
///
/// Yellow below the guideline, green within it, red above it.
pub fn colorize_status(text: &str, status: GuidelineStatus) -> String {
    let color = match status {
        GuidelineStatus::Under => "\x1b[33m",
        GuidelineStatus::Within => "\x1b[32m",
        GuidelineStatus::Over => "\x1b[31m",
    };
    format!("{}{}{}", color, text, RESET)
}

pub fn bold(text: &str) -> String {
    format!("\x1b[1m{}{}", text, RESET)
}

pub fn italic(text: &str) -> String {
    format!("\x1b[3m{}{}", text, RESET)
}

pub fn red(text: &str) -> String {
    format!("\x1b[31m{}{}", text, RESET)
}

/// Format a ratio (0.25) as a percentage with two decimals ("25.00%")
pub fn format_percentage(ratio: f64) -> String {
    if ratio.is_infinite() {
        "∞%".to_string()
    } else {
        format!("{:.2}%", ratio * 100.0)
    }
}

/// Format an amount followed by its share of the income
pub fn format_with_percentage(amount: Money, ratio: f64, symbol: &str) -> String {
    format!(
        "{} ({})",
        amount.format_with_symbol(symbol),
        format_percentage(ratio)
    )
}

/// Left label and right-aligned amount on one line
pub fn row(label: &str, amount: &str, width: usize) -> String {
    let label_width = visible_width(label);
    let amount_width = visible_width(amount);
    let padding = width.saturating_sub(label_width + amount_width).max(2);
    format!("{}{}{}\n", label, " ".repeat(padding), amount)
}

/// Number of characters, ignoring ANSI escape sequences
pub fn visible_width(text: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in text.chars() {
        if in_escape {
            if c == 'm' {
                in_escape = false;
            }
        } else if c == '\x1b' {
            in_escape = true;
        } else {
            width += 1;
        }
    }
    width
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(0.6), "60.00%");
        assert_eq!(format_percentage(0.0), "0.00%");
        assert_eq!(format_percentage(0.12345), "12.35%");
        assert_eq!(format_percentage(f64::INFINITY), "∞%");
    }

    #[test]
    fn test_colors_by_status() {
        assert!(colorize_status("x", GuidelineStatus::Under).starts_with("\x1b[33m"));
        assert!(colorize_status("x", GuidelineStatus::Within).starts_with("\x1b[32m"));
        assert!(colorize_status("x", GuidelineStatus::Over).starts_with("\x1b[31m"));
    }

    #[test]
    fn test_visible_width_ignores_escapes() {
        assert_eq!(visible_width(&bold("Total")), 5);
        assert_eq!(visible_width("10.00€"), 6);
    }

    #[test]
    fn test_row_alignment() {
        let line = row("Rent", "800.00€", 20);
        assert_eq!(visible_width(line.trim_end_matches('\n')), 20);
        assert!(line.starts_with("Rent "));
    }
}
