//! CLI argument definitions using clap
//!
//! This module contains the clap structs for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Chitieu - Track expenses by chatting
#[derive(Parser)]
#[command(name = "chitieu")]
#[command(about = "Expense-tracking chat bot webhook", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database URL or path (overrides DATABASE_URL)
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the webhook server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (defaults to PORT, then 5000)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run a message through the bot and print the reply
    Send {
        /// User id the message comes from
        #[arg(short, long)]
        user: String,

        /// Date of the message (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Message text
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },
}
