//! Domain models for Chitieu

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category recorded when the message carries none
pub const DEFAULT_CATEGORY: &str = "uncategorized";

/// A recorded expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// New expense for insertion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: String,
    pub amount: f64,
    pub category: String,
    /// Defaults to today when not provided
    pub date: Option<NaiveDate>,
}

/// A calendar month, e.g. `2025-10`
///
/// Always holds the first day of the month, so the range helpers cannot fail.
/// Years are limited to 1..=9999 to keep dates in their four-digit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Period {
    first_day: NaiveDate,
}

impl Period {
    pub const MIN_YEAR: i32 = 1;
    pub const MAX_YEAR: i32 = 9999;

    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
            return Err(Error::InvalidPeriod(format!("{}-{}", year, month)));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|first_day| Self { first_day })
            .ok_or_else(|| Error::InvalidPeriod(format!("{}-{}", year, month)))
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first_day: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> u32 {
        self.first_day.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.first_day
    }

    /// First day of the following month (December rolls over to January)
    pub fn next_first_day(&self) -> NaiveDate {
        self.first_day + Months::new(1)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.next_first_day() - Days::new(1)
    }

    /// Half-open range `[first day, first day of next month)`
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_day(), self.next_first_day())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.date_range();
        date >= start && date < end
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl std::str::FromStr for Period {
    type Err = Error;

    /// Parse `YYYY-MM`: exactly two integer halves separated by `-`
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidPeriod(s.to_string());

        let mut parts = s.split('-');
        let (year, month) = match (parts.next(), parts.next(), parts.next()) {
            (Some(year), Some(month), None) => (year, month),
            _ => return Err(invalid()),
        };

        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

impl TryFrom<String> for Period {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// Spending for one month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthSummary {
    pub total: f64,
    /// Category -> summed amount
    pub by_category: BTreeMap<String, f64>,
}

impl MonthSummary {
    /// Sum `(amount, category)` rows
    pub fn from_rows<I, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = (f64, S)>,
        S: Into<String>,
    {
        let mut summary = Self::default();
        for (amount, category) in rows {
            summary.total += amount;
            *summary.by_category.entry(category.into()).or_insert(0.0) += amount;
        }
        summary
    }

    /// Categories ordered by amount (largest first), ties by name
    pub fn categories_by_amount(&self) -> Vec<(&str, f64)> {
        let mut categories: Vec<(&str, f64)> = self
            .by_category
            .iter()
            .map(|(name, amount)| (name.as_str(), *amount))
            .collect();
        categories.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        categories
    }
}

/// Total spending for one period
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotal {
    pub period: Period,
    pub total: f64,
}

/// Comparison of two months' totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub first: PeriodTotal,
    pub second: PeriodTotal,
    /// `first.total - second.total`
    pub difference: f64,
    /// Change relative to `second`; `None` when `second.total` is zero or
    /// the result is not finite (not computable, which is not the same as 0%)
    pub percent_change: Option<f64>,
}

impl Comparison {
    pub fn new(first: PeriodTotal, second: PeriodTotal) -> Self {
        let difference = first.total - second.total;
        let percent_change = if second.total != 0.0 {
            Some(difference / second.total * 100.0).filter(|pct| pct.is_finite())
        } else {
            None
        };

        Self {
            first,
            second,
            difference,
            percent_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_parse() {
        let period: Period = "2025-10".parse().unwrap();
        assert_eq!(period.year(), 2025);
        assert_eq!(period.month(), 10);
        assert_eq!(period.to_string(), "2025-10");

        // Single-digit month is accepted and normalized on display
        let period: Period = "2025-3".parse().unwrap();
        assert_eq!(period.to_string(), "2025-03");
    }

    #[test]
    fn test_period_parse_rejects_malformed() {
        for input in ["", "2025", "2025-", "-10", "2025-10-01", "abcd-10", "2025-xx", "2025-13", "2025-0", "0-05"] {
            assert!(
                input.parse::<Period>().is_err(),
                "{:?} should not parse as a period",
                input
            );
        }
    }

    #[test]
    fn test_period_range() {
        let period = Period::new(2025, 10).unwrap();
        assert_eq!(period.date_range(), (date(2025, 10, 1), date(2025, 11, 1)));
        assert_eq!(period.last_day(), date(2025, 10, 31));
    }

    #[test]
    fn test_period_december_rollover() {
        let period = Period::new(2025, 12).unwrap();
        assert_eq!(period.next_first_day(), date(2026, 1, 1));
        assert_eq!(period.last_day(), date(2025, 12, 31));
    }

    #[test]
    fn test_period_february_leap_year() {
        assert_eq!(Period::new(2024, 2).unwrap().last_day(), date(2024, 2, 29));
        assert_eq!(Period::new(2025, 2).unwrap().last_day(), date(2025, 2, 28));
    }

    #[test]
    fn test_period_contains_is_half_open() {
        let period = Period::new(2025, 10).unwrap();
        assert!(period.contains(date(2025, 10, 1)));
        assert!(period.contains(date(2025, 10, 31)));
        assert!(!period.contains(date(2025, 11, 1)));
        assert!(!period.contains(date(2025, 9, 30)));
    }

    #[test]
    fn test_period_containing() {
        assert_eq!(
            Period::containing(date(2025, 10, 19)),
            Period::new(2025, 10).unwrap()
        );
    }

    #[test]
    fn test_period_serde_as_string() {
        let period = Period::new(2025, 1).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2025-01\"");
        let back: Period = serde_json::from_str(&json).unwrap();
        assert_eq!(back, period);
    }

    #[test]
    fn test_month_summary_from_rows() {
        let summary = MonthSummary::from_rows(vec![
            (12000.0, "an trua"),
            (30000.0, "cafe"),
            (8000.0, "an trua"),
        ]);
        assert_eq!(summary.total, 50000.0);
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.by_category["an trua"], 20000.0);
        assert_eq!(summary.by_category["cafe"], 30000.0);

        let ordered = summary.categories_by_amount();
        assert_eq!(ordered[0], ("cafe", 30000.0));
        assert_eq!(ordered[1], ("an trua", 20000.0));
    }

    #[test]
    fn test_month_summary_empty() {
        let summary = MonthSummary::from_rows(Vec::<(f64, String)>::new());
        assert_eq!(summary.total, 0.0);
        assert!(summary.by_category.is_empty());
    }

    #[test]
    fn test_comparison_percent() {
        let oct = Period::new(2025, 10).unwrap();
        let sep = Period::new(2025, 9).unwrap();
        let comparison = Comparison::new(
            PeriodTotal { period: oct, total: 150.0 },
            PeriodTotal { period: sep, total: 100.0 },
        );
        assert_eq!(comparison.difference, 50.0);
        assert_eq!(comparison.percent_change, Some(50.0));
    }

    #[test]
    fn test_comparison_zero_second_total_is_not_computable() {
        let oct = Period::new(2025, 10).unwrap();
        let sep = Period::new(2025, 9).unwrap();
        let comparison = Comparison::new(
            PeriodTotal { period: oct, total: 150.0 },
            PeriodTotal { period: sep, total: 0.0 },
        );
        assert_eq!(comparison.difference, 150.0);
        assert_eq!(comparison.percent_change, None);
    }

    #[test]
    fn test_comparison_overflowing_percent_is_not_computable() {
        let oct = Period::new(2025, 10).unwrap();
        let sep = Period::new(2025, 9).unwrap();
        let comparison = Comparison::new(
            PeriodTotal { period: oct, total: f64::MAX },
            PeriodTotal { period: sep, total: 1.0 },
        );
        assert!(comparison.difference.is_finite());
        assert_eq!(comparison.percent_change, None);
    }
}
