//! Usage analytics command

use crate::chat::ChatService;
use crate::commands::resolve_user_id;
use crate::error::Result;
use crate::storage::SqliteStorage;
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

/// Prints per-persona usage analytics for a user
pub fn show_analytics(
    storage: &Arc<SqliteStorage>,
    service: &ChatService,
    user: Option<String>,
) -> Result<()> {
    let user_id = resolve_user_id(storage, user)?;
    let analytics = service.get_user_analytics(&user_id)?;

    println!();
    println!("{}", "Overview".bold());
    println!("  Total messages:  {}", analytics.total_messages);
    println!(
        "  Streak:          {} (best {})",
        analytics.current_streak, analytics.longest_streak
    );
    println!(
        "  Relationship:    {:.1} ({})",
        analytics.relationship_level, analytics.relationship_status
    );
    println!("  Favorite:        {}", analytics.favorite_persona.magenta());
    println!("  Joined:          {}", analytics.joined_at.format("%Y-%m-%d"));

    if analytics.conversations.is_empty() {
        println!();
        println!("{}", "No conversations yet.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "Persona".bold(),
        "Conversations".bold(),
        "Messages".bold(),
        "Avg Score".bold()
    ]);

    for usage in &analytics.conversations {
        table.add_row(prettytable::row![
            usage.persona,
            usage.conversation_count,
            usage.total_messages,
            format!("{:.1}", usage.avg_relationship_score)
        ]);
    }

    println!();
    table.printstd();
    println!();

    Ok(())
}
