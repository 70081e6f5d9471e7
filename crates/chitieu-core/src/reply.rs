//! # Replies
//!
//! Constant strings and format functions for every message the bot sends.
//! Amounts are shown as whole numbers; any fraction is truncated.

use crate::models::{Comparison, MonthSummary, Period};

pub const HELP_TEXT: &str = "Hi! I keep track of your expenses.\n\
\n\
How to use:\n\
- Record an expense: `chi 12000 an trua` or `12000 cafe` (`12k` works too).\n\
- This month's stats: `thong ke` or `stats`.\n\
- Stats for a given month: `thong ke 2025-10`.\n\
- Compare two months: `so sanh 2025-10 2025-09` (format YYYY-MM).";

pub const AMOUNT_NOT_RECOGNIZED: &str =
    "Could not recognize an amount. Please resend it like `chi 12000 an trua`.";

pub const COMPARE_MISSING: &str = "Missing months. Use: `so sanh YYYY-MM YYYY-MM`.";

pub const COMPARE_MALFORMED: &str =
    "Wrong format. Use: `so sanh YYYY-MM YYYY-MM` (for example: so sanh 2025-10 2025-09).";

pub const NOT_UNDERSTOOD: &str = "I did not understand that. Send /start to see the instructions.";

pub const INTERNAL_ERROR: &str = "Sorry, something went wrong. Please try again in a moment.";

/// Whole-number rendering of an amount (fraction truncated toward zero)
pub fn format_amount(amount: f64) -> String {
    let whole = amount.trunc();
    // -0.4 truncates to -0
    let whole = if whole == 0.0 { 0.0 } else { whole };
    format!("{:.0}", whole)
}

pub fn saved(amount: f64, category: &str) -> String {
    format!("Saved: {} — {}", format_amount(amount), category)
}

pub fn stats(period: Period, summary: &MonthSummary) -> String {
    let mut lines = vec![
        format!("Stats {period}:"),
        format!("Total: {}", format_amount(summary.total)),
        "By category:".to_string(),
    ];
    lines.extend(
        summary
            .categories_by_amount()
            .into_iter()
            .map(|(category, amount)| format!("- {}: {}", category, format_amount(amount))),
    );
    lines.join("\n")
}

pub fn comparison(comparison: &Comparison) -> String {
    let first = comparison.first.period;
    let second = comparison.second.period;

    let change = match comparison.percent_change {
        Some(pct) => format!("- Change: {pct:.1}%"),
        None if comparison.second.total == 0.0 => {
            "- Cannot compute % (comparison month total is 0)".to_string()
        }
        None => "- Cannot compute %".to_string(),
    };

    [
        format!("Compare {first} vs {second}:"),
        format!("- {first}: {}", format_amount(comparison.first.total)),
        format!("- {second}: {}", format_amount(comparison.second.total)),
        format!("- Difference: {}", format_amount(comparison.difference)),
        change,
    ]
    .join("\n")
}
