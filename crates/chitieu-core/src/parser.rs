//! Command parser for chat messages
//!
//! Messages are matched on a lower-cased, trimmed copy of the text. The
//! command surface is small:
//!
//! | Message                                   | Command         |
//! |-------------------------------------------|-----------------|
//! | `/start`, `hi`, `hello`                   | Greeting        |
//! | `chi 12000 an trua`, `add 12k cafe`, `12000 cafe`, `-12000 cafe` | RecordExpense |
//! | `thong ke [YYYY-MM]`, `stats [YYYY-MM]`   | Stats           |
//! | `so sanh YYYY-MM YYYY-MM`, `compare ...`  | Compare         |
//!
//! Everything here is pure: identical input always yields identical output.

use serde::Serialize;

use crate::error::Result;
use crate::models::{Period, DEFAULT_CATEGORY};

const GREETING_PREFIXES: &[&str] = &["/start", "hi", "hello"];
const RECORD_PREFIXES: &[&str] = &["chi", "add", "-"];
const STATS_PREFIXES: &[&str] = &["thong ke", "thống kê", "stats"];
const COMPARE_PREFIXES: &[&str] = &["so sanh", "so sánh", "compare"];

/// Classified purpose of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    RecordExpense,
    Stats,
    Compare,
    Unknown,
}

/// Amount and category extracted from a record-expense message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AmountAndCategory {
    /// `None` when no token looks like an amount
    pub amount: Option<f64>,
    pub category: String,
}

/// Arguments of a compare command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareArgs {
    Periods(Period, Period),
    /// Fewer than two period tokens
    Missing,
    /// Two tokens, at least one not `YYYY-MM`
    Malformed,
}

/// A fully parsed command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    Greeting,
    RecordExpense {
        amount: Option<f64>,
        category: String,
    },
    /// `None` means the current month (no period given, or not `YYYY-MM`)
    Stats {
        period: Option<Period>,
    },
    Compare {
        args: CompareArgs,
    },
    Unknown,
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn strip_any_prefix<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|prefix| text.strip_prefix(prefix))
}

fn classify_normalized(text: &str) -> Intent {
    if strip_any_prefix(text, GREETING_PREFIXES).is_some() {
        Intent::Greeting
    } else if strip_any_prefix(text, RECORD_PREFIXES).is_some()
        || text.starts_with(|c: char| c.is_ascii_digit())
    {
        Intent::RecordExpense
    } else if strip_any_prefix(text, STATS_PREFIXES).is_some() {
        Intent::Stats
    } else if strip_any_prefix(text, COMPARE_PREFIXES).is_some() {
        Intent::Compare
    } else {
        Intent::Unknown
    }
}

/// Classify a message. Matching is case-insensitive and the first rule wins.
pub fn classify(text: &str) -> Intent {
    classify_normalized(&normalize(text))
}

/// Extract the amount and category from a record-expense message
///
/// Tokens are tried in textual order and the first one that reads as a
/// number decides the amount:
/// - all digits: `12000`
/// - thousands shorthand: `12k`, `12.5k`
/// - any other number: `12.5`, `1e3`
///
/// A first number that is negative or not finite is rejected rather than
/// skipped. The category is whatever follows the amount token.
pub fn parse_amount_and_category(text: &str) -> AmountAndCategory {
    let normalized = normalize(text).replace(',', "");
    let mut tokens: Vec<&str> = normalized.split_whitespace().collect();

    // `-12000 cafe`: the dash marks the command, it is not a sign
    if let Some(first) = tokens.first_mut() {
        let token: &str = *first;
        *first = token.strip_prefix('-').unwrap_or(token);
    }

    let found = tokens
        .iter()
        .enumerate()
        .find_map(|(idx, token)| parse_number_token(token).map(|value| (idx, value)));

    match found {
        Some((idx, amount)) if amount.is_finite() && amount >= 0.0 => {
            let rest = &tokens[idx + 1..];
            let category = if rest.is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                rest.join(" ")
            };
            AmountAndCategory {
                amount: Some(amount),
                category,
            }
        }
        _ => AmountAndCategory {
            amount: None,
            category: DEFAULT_CATEGORY.to_string(),
        },
    }
}

/// Read a token as a number, without judging whether it is a valid amount
fn parse_number_token(token: &str) -> Option<f64> {
    if is_digits(token) {
        token.parse::<f64>().ok()
    } else if let Some(value) = token
        .strip_suffix('k')
        .filter(|prefix| is_decimal(prefix))
        .and_then(|prefix| prefix.parse::<f64>().ok())
    {
        Some(value * 1000.0)
    } else {
        token.parse::<f64>().ok()
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Digits with at most one decimal point, e.g. `12`, `12.5`, `.5`
fn is_decimal(s: &str) -> bool {
    let digits = s.bytes().filter(|b| b.is_ascii_digit()).count();
    let dots = s.bytes().filter(|&b| b == b'.').count();
    digits > 0 && dots <= 1 && digits + dots == s.len()
}

/// Parse a `YYYY-MM` period token
pub fn parse_period(token: &str) -> Result<Period> {
    token.trim().parse()
}

/// Parse a message into a command with its arguments
pub fn parse_command(text: &str) -> Command {
    let normalized = normalize(text);

    match classify_normalized(&normalized) {
        Intent::Greeting => Command::Greeting,
        Intent::RecordExpense => {
            let AmountAndCategory { amount, category } = parse_amount_and_category(&normalized);
            Command::RecordExpense { amount, category }
        }
        Intent::Stats => {
            let period = command_args(&normalized, STATS_PREFIXES)
                .first()
                .and_then(|token| parse_period(token).ok());
            Command::Stats { period }
        }
        Intent::Compare => {
            let tokens = command_args(&normalized, COMPARE_PREFIXES);
            let args = match tokens.as_slice() {
                [first, second, ..] => match (parse_period(first), parse_period(second)) {
                    (Ok(first), Ok(second)) => CompareArgs::Periods(first, second),
                    _ => CompareArgs::Malformed,
                },
                _ => CompareArgs::Missing,
            };
            Command::Compare { args }
        }
        Intent::Unknown => Command::Unknown,
    }
}

/// Whitespace-separated tokens after the command keyword
fn command_args<'a>(text: &'a str, prefixes: &[&str]) -> Vec<&'a str> {
    strip_any_prefix(text, prefixes)
        .unwrap_or_default()
        .split_whitespace()
        .collect()
}
