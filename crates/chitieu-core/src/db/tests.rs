//! Database tests

use super::*;
use crate::models::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add(db: &Database, user: &str, amount: f64, category: &str, on: NaiveDate) -> Expense {
    db.insert_expense(&NewExpense {
        user_id: user.to_string(),
        amount,
        category: category.to_string(),
        date: Some(on),
    })
    .unwrap()
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.path(), ":memory:");
    assert_eq!(db.count_expenses("u1").unwrap(), 0);
}

#[test]
fn test_expenses_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('expenses') WHERE name IN ('id', 'user_id', 'amount', 'category', 'date', 'created_at')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 6, "expenses table should have 6 expected columns");
}

#[test]
fn test_on_disk_pragmas() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pragmas.db");
    let db = Database::new(path.to_str().unwrap()).unwrap();
    let conn = db.conn().unwrap();

    let journal_mode: String = conn
        .query_row("PRAGMA journal_mode", [], |row| row.get(0))
        .unwrap();
    assert_eq!(journal_mode, "wal");

    // The schema has no foreign keys, so enforcement is left at SQLite's default
    let foreign_keys: i64 = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .unwrap();
    assert_eq!(foreign_keys, 0);
}

#[test]
fn test_on_disk_db_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chitieu.db");
    let path = path.to_str().unwrap();

    {
        let db = Database::new(path).unwrap();
        add(&db, "u1", 12000.0, "cafe", date(2025, 10, 3));
    }

    let db = Database::from_url(&format!("sqlite:///{}", path)).unwrap();
    assert_eq!(db.count_expenses("u1").unwrap(), 1);
}

#[test]
fn test_sqlite_path_from_url() {
    // Four slashes: absolute path
    assert_eq!(
        sqlite_path_from_url("sqlite:////tmp/chitieu.sqlite3").unwrap(),
        "/tmp/chitieu.sqlite3"
    );
    // Three slashes: relative path
    assert_eq!(sqlite_path_from_url("sqlite:///data.db").unwrap(), "data.db");
    assert_eq!(
        sqlite_path_from_url("sqlite:///data/chitieu.db").unwrap(),
        "data/chitieu.db"
    );
    assert_eq!(sqlite_path_from_url("data/chitieu.db").unwrap(), "data/chitieu.db");
    assert!(sqlite_path_from_url("postgres://localhost/chitieu").is_err());
    assert!(sqlite_path_from_url("sqlite://chitieu.db").is_err());
    assert!(sqlite_path_from_url("sqlite:///").is_err());
    assert!(sqlite_path_from_url("  ").is_err());
}

#[test]
fn test_insert_expense() {
    let db = Database::in_memory().unwrap();
    let expense = add(&db, "u1", 12000.0, "an trua", date(2025, 10, 3));

    assert!(expense.id > 0);
    assert_eq!(expense.user_id, "u1");
    assert_eq!(expense.amount, 12000.0);
    assert_eq!(expense.category, "an trua");
    assert_eq!(expense.date, date(2025, 10, 3));

    let fetched = db.get_expense(expense.id).unwrap().unwrap();
    assert_eq!(fetched, expense);
}

#[test]
fn test_insert_expense_defaults() {
    let db = Database::in_memory().unwrap();
    let expense = db
        .insert_expense(&NewExpense {
            user_id: "u1".to_string(),
            amount: 5000.0,
            category: "  ".to_string(),
            date: None,
        })
        .unwrap();

    assert_eq!(expense.category, DEFAULT_CATEGORY);
    assert_eq!(expense.date, chrono::Local::now().date_naive());
}

#[test]
fn test_insert_expense_rejects_invalid() {
    let db = Database::in_memory().unwrap();

    let base = NewExpense {
        user_id: "u1".to_string(),
        amount: 1000.0,
        category: "cafe".to_string(),
        date: Some(date(2025, 10, 1)),
    };

    let empty_user = NewExpense {
        user_id: "".to_string(),
        ..base.clone()
    };
    assert!(matches!(
        db.insert_expense(&empty_user),
        Err(Error::InvalidData(_))
    ));

    let negative = NewExpense {
        amount: -1.0,
        ..base.clone()
    };
    assert!(matches!(
        db.insert_expense(&negative),
        Err(Error::InvalidData(_))
    ));

    let not_finite = NewExpense {
        amount: f64::NAN,
        ..base
    };
    assert!(matches!(
        db.insert_expense(&not_finite),
        Err(Error::InvalidData(_))
    ));

    assert_eq!(db.count_expenses("u1").unwrap(), 0);
}

#[test]
fn test_insert_expense_rejects_month_total_overflow() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 1e308, "big", date(2025, 10, 1));

    let overflow = NewExpense {
        user_id: "u1".to_string(),
        amount: 1e308,
        category: "big".to_string(),
        date: Some(date(2025, 10, 2)),
    };
    assert!(matches!(
        db.insert_expense(&overflow),
        Err(Error::InvalidData(_))
    ));

    // Other months and other users are unaffected
    add(&db, "u1", 1e308, "big", date(2025, 11, 1));
    add(&db, "u2", 1e308, "big", date(2025, 10, 1));

    let summary = db
        .month_summary("u1", Period::new(2025, 10).unwrap())
        .unwrap();
    assert_eq!(summary.total, 1e308);
}

#[test]
fn test_get_missing_expense() {
    let db = Database::in_memory().unwrap();
    assert!(db.get_expense(42).unwrap().is_none());
}

#[test]
fn test_list_expenses_between_is_scoped_by_user() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 100.0, "cafe", date(2025, 10, 2));
    add(&db, "u2", 999.0, "cafe", date(2025, 10, 2));
    add(&db, "u1", 200.0, "taxi", date(2025, 10, 1));

    let rows = db
        .list_expenses_between("u1", date(2025, 10, 1), date(2025, 10, 31))
        .unwrap();
    assert_eq!(rows.len(), 2);
    // Oldest first
    assert_eq!(rows[0].category, "taxi");
    assert_eq!(rows[1].category, "cafe");
    assert!(rows.iter().all(|e| e.user_id == "u1"));
}

#[test]
fn test_month_summary() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 12000.0, "an trua", date(2025, 10, 1));
    add(&db, "u1", 30000.0, "cafe", date(2025, 10, 15));
    add(&db, "u1", 8000.0, "an trua", date(2025, 10, 31));

    let summary = db
        .month_summary("u1", Period::new(2025, 10).unwrap())
        .unwrap();
    assert_eq!(summary.total, 50000.0);
    assert_eq!(summary.by_category.len(), 2);
    assert_eq!(summary.by_category["an trua"], 20000.0);
    assert_eq!(summary.by_category["cafe"], 30000.0);
}

#[test]
fn test_month_summary_excludes_rows_outside_range() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 1.0, "before", date(2025, 9, 30));
    add(&db, "u1", 10.0, "inside", date(2025, 10, 1));
    add(&db, "u1", 100.0, "inside", date(2025, 10, 31));
    // First day of the next month is outside the half-open range
    add(&db, "u1", 1000.0, "after", date(2025, 11, 1));

    let summary = db
        .month_summary("u1", Period::new(2025, 10).unwrap())
        .unwrap();
    assert_eq!(summary.total, 110.0);
    assert_eq!(summary.by_category.len(), 1);
    assert_eq!(summary.by_category["inside"], 110.0);
}

#[test]
fn test_month_summary_december_rollover() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 50.0, "gifts", date(2025, 12, 31));
    add(&db, "u1", 70.0, "gifts", date(2026, 1, 1));

    let december = Period::new(2025, 12).unwrap();
    assert_eq!(december.next_first_day(), date(2026, 1, 1));

    let summary = db.month_summary("u1", december).unwrap();
    assert_eq!(summary.total, 50.0);

    let january = db
        .month_summary("u1", Period::new(2026, 1).unwrap())
        .unwrap();
    assert_eq!(january.total, 70.0);
}

#[test]
fn test_month_summary_empty() {
    let db = Database::in_memory().unwrap();
    let summary = db
        .month_summary("nobody", Period::new(2025, 10).unwrap())
        .unwrap();
    assert_eq!(summary.total, 0.0);
    assert!(summary.by_category.is_empty());
}

#[test]
fn test_month_summary_matches_synthetic_rows() {
    let db = Database::in_memory().unwrap();
    let period = Period::new(2024, 2).unwrap();

    let mut expected = 0.0;
    let mut day = date(2024, 1, 20);
    let mut amount = 1.0;
    while day < date(2024, 3, 10) {
        add(&db, "u1", amount, "misc", day);
        if period.contains(day) {
            expected += amount;
        }
        day = day.succ_opt().unwrap();
        amount += 1.0;
    }

    let summary = db.month_summary("u1", period).unwrap();
    assert_eq!(summary.total, expected);
}

#[test]
fn test_compare_periods() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 150.0, "cafe", date(2025, 10, 5));
    add(&db, "u1", 100.0, "cafe", date(2025, 9, 5));

    let oct = Period::new(2025, 10).unwrap();
    let sep = Period::new(2025, 9).unwrap();
    let comparison = db.compare_periods("u1", oct, sep).unwrap();

    assert_eq!(comparison.first.period, oct);
    assert_eq!(comparison.first.total, 150.0);
    assert_eq!(comparison.second.period, sep);
    assert_eq!(comparison.second.total, 100.0);
    assert_eq!(comparison.difference, 50.0);
    assert_eq!(comparison.percent_change, Some(50.0));
}

#[test]
fn test_compare_periods_zero_second_total() {
    let db = Database::in_memory().unwrap();
    add(&db, "u1", 150.0, "cafe", date(2025, 10, 5));

    let comparison = db
        .compare_periods(
            "u1",
            Period::new(2025, 10).unwrap(),
            Period::new(2025, 9).unwrap(),
        )
        .unwrap();

    assert_eq!(comparison.difference, 150.0);
    assert_eq!(comparison.percent_change, None);
}
