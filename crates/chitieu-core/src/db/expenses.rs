//! Expense operations

use chrono::{Local, NaiveDate};
use rusqlite::params;
use tracing::debug;

use super::{parse_date, parse_datetime, Database, DbConn};
use crate::error::{Error, Result};
use crate::models::{Expense, NewExpense, Period, DEFAULT_CATEGORY};

impl Database {
    /// Record an expense
    ///
    /// Rejects empty user ids, negative or non-finite amounts, and amounts
    /// that would make the month total overflow. A missing date defaults to
    /// today, an empty category to the default category.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<Expense> {
        if expense.user_id.trim().is_empty() {
            return Err(Error::InvalidData("Expense user id is empty".into()));
        }
        if !expense.amount.is_finite() || expense.amount < 0.0 {
            return Err(Error::InvalidData(format!(
                "Expense amount must be a non-negative number, got {}",
                expense.amount
            )));
        }

        let date = expense.date.unwrap_or_else(|| Local::now().date_naive());
        let category = if expense.category.trim().is_empty() {
            DEFAULT_CATEGORY
        } else {
            expense.category.as_str()
        };

        let conn = self.conn()?;

        // Keep every month total representable
        let period = Period::containing(date);
        let month_total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM expenses WHERE user_id = ? AND date BETWEEN ? AND ?",
            params![
                expense.user_id,
                period.first_day().to_string(),
                period.last_day().to_string()
            ],
            |row| row.get(0),
        )?;
        if !(month_total + expense.amount).is_finite() {
            return Err(Error::InvalidData(format!(
                "Expense amount {} overflows the {} total",
                expense.amount, period
            )));
        }

        conn.execute(
            "INSERT INTO expenses (user_id, amount, category, date) VALUES (?, ?, ?, ?)",
            params![expense.user_id, expense.amount, category, date.to_string()],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, user_id = %expense.user_id, amount = expense.amount, "Inserted expense");

        fetch_expense(&conn, id)?
            .ok_or_else(|| Error::InvalidData(format!("Expense {} vanished after insert", id)))
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        fetch_expense(&conn, id)
    }

    /// List a user's expenses dated between `from` and `to` (both inclusive),
    /// oldest first
    pub fn list_expenses_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Expense>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, amount, category, date, created_at
            FROM expenses
            WHERE user_id = ?1 AND date BETWEEN ?2 AND ?3
            ORDER BY date, id
            "#,
        )?;

        let raw = stmt
            .query_map(
                params![user_id, from.to_string(), to.to_string()],
                row_to_raw,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.into_iter().map(RawExpense::into_expense).collect()
    }

    /// Count a user's expenses
    pub fn count_expenses(&self, user_id: &str) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM expenses WHERE user_id = ?",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Row as stored, before date parsing
struct RawExpense {
    id: i64,
    user_id: String,
    amount: f64,
    category: String,
    date: String,
    created_at: String,
}

impl RawExpense {
    fn into_expense(self) -> Result<Expense> {
        Ok(Expense {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            category: self.category,
            date: parse_date(&self.date)?,
            created_at: parse_datetime(&self.created_at),
        })
    }
}

// Reuses the caller's connection: in-memory pools hold a single one
fn fetch_expense(conn: &DbConn, id: i64) -> Result<Option<Expense>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, amount, category, date, created_at FROM expenses WHERE id = ?",
    )?;

    let mut rows = stmt.query_map(params![id], row_to_raw)?;
    match rows.next() {
        Some(row) => Ok(Some(row?.into_expense()?)),
        None => Ok(None),
    }
}

fn row_to_raw(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawExpense> {
    Ok(RawExpense {
        id: row.get(0)?,
        user_id: row.get(1)?,
        amount: row.get(2)?,
        category: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
    })
}
