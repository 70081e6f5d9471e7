//! Local message command

use anyhow::{Context, Result};
use chitieu_core::bot::ExpenseBot;
use chitieu_core::config::BotConfig;
use chitieu_core::db::Database;
use chrono::{Local, NaiveDate};

use super::open_db;

/// Process one message and return the reply text
pub fn send_message(db: Database, user: &str, text: &str, today: NaiveDate) -> Result<String> {
    let outcome = ExpenseBot::new(db)
        .process(user, text, today)
        .context("Failed to process message")?;
    Ok(outcome.reply_text())
}

pub fn cmd_send(
    config: &BotConfig,
    user: &str,
    date: Option<NaiveDate>,
    text: &[String],
) -> Result<()> {
    let db = open_db(config)?;
    let today = date.unwrap_or_else(|| Local::now().date_naive());

    let reply = send_message(db, user, &text.join(" "), today)?;
    println!("{}", reply);

    Ok(())
}
