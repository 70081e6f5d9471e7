//! Monthly summaries and month-over-month comparisons

use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::{Comparison, MonthSummary, Period, PeriodTotal};

impl Database {
    /// Total and per-category spending of a user for one month
    ///
    /// Covers `[first day of the month, first day of the next month)`.
    pub fn month_summary(&self, user_id: &str, period: Period) -> Result<MonthSummary> {
        // BETWEEN is inclusive, so query up to the last day of the month
        let expenses = self.list_expenses_between(user_id, period.first_day(), period.last_day())?;

        let summary = MonthSummary::from_rows(
            expenses
                .into_iter()
                .map(|expense| (expense.amount, expense.category)),
        );

        debug!(
            user_id,
            period = %period,
            total = summary.total,
            categories = summary.by_category.len(),
            "Computed month summary"
        );
        Ok(summary)
    }

    /// Compare a user's total spending in `first` against `second`
    pub fn compare_periods(&self, user_id: &str, first: Period, second: Period) -> Result<Comparison> {
        let first_total = self.month_summary(user_id, first)?.total;
        let second_total = self.month_summary(user_id, second)?.total;

        Ok(Comparison::new(
            PeriodTotal {
                period: first,
                total: first_total,
            },
            PeriodTotal {
                period: second,
                total: second_total,
            },
        ))
    }
}
