//! History browsing commands

use crate::chat::ChatService;
use crate::cli::HistoryCommand;
use crate::commands::resolve_user_id;
use crate::error::Result;
use crate::storage::SqliteStorage;
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

/// Handle history commands
pub fn handle_history(
    storage: &Arc<SqliteStorage>,
    service: &ChatService,
    command: HistoryCommand,
) -> Result<()> {
    match command {
        HistoryCommand::List { user, limit } => {
            let user_id = resolve_user_id(storage, user)?;
            let summaries = service.list_conversations(&user_id, limit)?;

            if summaries.is_empty() {
                println!("{}", "No conversations found.".yellow());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "Persona".bold(),
                "Messages".bold(),
                "Level".bold(),
                "Last Active".bold()
            ]);

            for summary in summaries {
                let id_short = &summary.id[..8.min(summary.id.len())];
                let last_active = summary.last_activity.format("%Y-%m-%d %H:%M").to_string();

                table.add_row(prettytable::row![
                    id_short.cyan(),
                    summary.title,
                    summary.persona.as_str(),
                    summary.message_count,
                    summary.relationship_level,
                    last_active
                ]);
            }

            println!("\nConversations:");
            table.printstd();
            println!();
            println!(
                "Use {} to read a transcript.",
                "lovechat history show <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id, user, limit } => {
            let user_id = resolve_user_id(storage, user)?;
            let messages = service.get_conversation_history(&user_id, &id, limit)?;

            if messages.is_empty() {
                println!("{}", "No messages in this conversation.".yellow());
                return Ok(());
            }

            println!();
            for message in messages {
                let when = message.timestamp.format("%Y-%m-%d %H:%M");
                println!("{} {}", format!("[{}] you:", when).dimmed(), message.user_text);
                println!(
                    "{} {}",
                    format!("[{}] {}:", when, message.persona).magenta(),
                    message.response_text
                );
                if let Some(rating) = message.user_rating {
                    println!("{}", format!("  rated {}/5", rating).dimmed());
                }
            }
            println!();
        }
    }

    Ok(())
}
