//! Chitieu Core Library
//!
//! Shared functionality for the Chitieu expense-tracking chat bot:
//! - Command parser for short chat messages
//! - Database access, migrations and monthly reports
//! - Reply templates and command processing
//! - Pluggable outbound messaging backends (Zalo OA, mock)

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod messaging;
pub mod models;
pub mod parser;
pub mod reply;

/// Test utilities including a mock message API server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use bot::{CommandOutcome, CompareProblem, ExpenseBot};
pub use config::{BotConfig, MessengerKind};
pub use db::Database;
pub use error::{Error, Result};
pub use messaging::{Messenger, MessagingClient, MockMessenger, ZaloMessenger};
pub use models::{Comparison, Expense, MonthSummary, NewExpense, Period, PeriodTotal};
pub use parser::{classify, parse_amount_and_category, parse_command, parse_period, Command, Intent};
