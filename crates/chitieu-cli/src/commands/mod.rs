//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Database commands (init) and shared utilities (open_db)
//! - `send` - Local message processing
//! - `serve` - Webhook server command

pub mod core;
pub mod send;
pub mod serve;

pub use self::core::*;
pub use send::*;
pub use serve::*;
