//! Command-line interface definition for Lovechat
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat, history browsing, the
//! persona catalog, and usage analytics.

use clap::{Parser, Subcommand};

/// Lovechat - companion-chat backend core
///
/// Drive the message-processing pipeline interactively against a local
/// SQLite store.
#[derive(Parser, Debug, Clone)]
#[command(name = "lovechat")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Override the database path
    #[arg(long)]
    pub db_path: Option<String>,

    /// Override the provider API base URL
    #[arg(long)]
    pub api_base: Option<String>,

    /// Override the provider model
    #[arg(long)]
    pub model: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Lovechat
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Persona to chat with
        #[arg(short, long, default_value = "emma")]
        persona: String,

        /// Chat as this user id (a local dev user is created if omitted)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Browse stored conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// List the persona catalog
    Personas,

    /// Show per-persona usage analytics
    Analytics {
        /// User id to report on (defaults to the local dev user)
        #[arg(short, long)]
        user: Option<String>,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List conversations, most recently active first
    List {
        /// User id (defaults to the local dev user)
        #[arg(short, long)]
        user: Option<String>,

        /// Maximum conversations to list
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },

    /// Show a conversation transcript
    Show {
        /// Conversation id
        id: String,

        /// User id (defaults to the local dev user)
        #[arg(short, long)]
        user: Option<String>,

        /// Maximum messages to show
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
