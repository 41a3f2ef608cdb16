//! Lovechat - companion-chat backend core
//!
//! This library implements the message-processing and relationship-state
//! pipeline of a companion-chat product: persona catalog, rule-based
//! message classification, response resolution (quick phrases, cache,
//! generative calls), conversation state, and daily usage quotas.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `chat`: Orchestration, response resolution, quotas, and state triggers
//! - `classifier`: Rule-based importance/topic/sentiment analysis
//! - `personas`: Static persona catalog (prompts, phrases, sampling)
//! - `providers`: Generative provider abstraction and implementations
//! - `models`: User, conversation, and message records
//! - `storage`: SQLite persistence
//! - `cache`: Injectable response cache backends
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use lovechat::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     // Service wiring would go here
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod chat;
pub mod classifier;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod personas;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use chat::{ChatOutcome, ChatService};
pub use config::Config;
pub use error::{LovechatError, Result};
pub use personas::PersonaId;

#[cfg(test)]
pub mod test_utils;
