//! Command processing
//!
//! `ExpenseBot` turns one chat message into a `CommandOutcome`: it parses the
//! text, writes or reads expenses, and leaves delivery to the caller.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::db::Database;
use crate::error::Result;
use crate::models::{Comparison, Expense, MonthSummary, NewExpense, Period};
use crate::parser::{parse_command, Command, CompareArgs};
use crate::reply;

/// Why a compare command could not run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareProblem {
    Missing,
    Malformed,
}

/// Result of processing one message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum CommandOutcome {
    Help,
    Saved(Expense),
    AmountNotRecognized,
    Summary {
        period: Period,
        summary: MonthSummary,
    },
    Comparison(Comparison),
    CompareUsage(CompareProblem),
    NotUnderstood,
}

impl CommandOutcome {
    /// Text sent back to the user
    pub fn reply_text(&self) -> String {
        match self {
            CommandOutcome::Help => reply::HELP_TEXT.to_string(),
            CommandOutcome::Saved(expense) => reply::saved(expense.amount, &expense.category),
            CommandOutcome::AmountNotRecognized => reply::AMOUNT_NOT_RECOGNIZED.to_string(),
            CommandOutcome::Summary { period, summary } => reply::stats(*period, summary),
            CommandOutcome::Comparison(comparison) => reply::comparison(comparison),
            CommandOutcome::CompareUsage(CompareProblem::Missing) => {
                reply::COMPARE_MISSING.to_string()
            }
            CommandOutcome::CompareUsage(CompareProblem::Malformed) => {
                reply::COMPARE_MALFORMED.to_string()
            }
            CommandOutcome::NotUnderstood => reply::NOT_UNDERSTOOD.to_string(),
        }
    }
}

/// Expense bot backed by a database
#[derive(Clone)]
pub struct ExpenseBot {
    db: Database,
}

impl ExpenseBot {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Process a message from `user_id`
    ///
    /// `today` decides the current month for stats and the date of recorded
    /// expenses.
    pub fn process(&self, user_id: &str, text: &str, today: NaiveDate) -> Result<CommandOutcome> {
        let command = parse_command(text);
        debug!(user_id, ?command, "Parsed command");

        let outcome = match command {
            Command::Greeting => CommandOutcome::Help,
            Command::RecordExpense { amount: None, .. } => CommandOutcome::AmountNotRecognized,
            Command::RecordExpense {
                amount: Some(amount),
                category,
            } => {
                let expense = self.db.insert_expense(&NewExpense {
                    user_id: user_id.to_string(),
                    amount,
                    category,
                    date: Some(today),
                })?;
                info!(
                    user_id,
                    id = expense.id,
                    amount = expense.amount,
                    category = %expense.category,
                    "Saved expense"
                );
                CommandOutcome::Saved(expense)
            }
            Command::Stats { period } => {
                let period = period.unwrap_or_else(|| Period::containing(today));
                let summary = self.db.month_summary(user_id, period)?;
                CommandOutcome::Summary { period, summary }
            }
            Command::Compare {
                args: CompareArgs::Periods(first, second),
            } => CommandOutcome::Comparison(self.db.compare_periods(user_id, first, second)?),
            Command::Compare {
                args: CompareArgs::Missing,
            } => CommandOutcome::CompareUsage(CompareProblem::Missing),
            Command::Compare {
                args: CompareArgs::Malformed,
            } => CommandOutcome::CompareUsage(CompareProblem::Malformed),
            Command::Unknown => CommandOutcome::NotUnderstood,
        };

        Ok(outcome)
    }
}
