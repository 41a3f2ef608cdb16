//! Interactive chat session

use crate::chat::ChatService;
use crate::commands::{build_service, ensure_local_user};
use crate::config::Config;
use crate::error::{LovechatError, Result};
use crate::personas::{self, PersonaId};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Runs the interactive chat loop
pub async fn run_chat(config: Config, persona: String, user: Option<String>) -> Result<()> {
    let (storage, service) = build_service(&config)?;

    let user_id = match user {
        Some(id) => id,
        None => ensure_local_user(&storage)?.id,
    };

    let mut persona_id = PersonaId::parse(&persona);
    let mut editor = DefaultEditor::new()?;

    println!();
    println!(
        "Chatting with {}. Type {} for commands, {} to leave.",
        personas::get(persona_id).display_name.magenta().bold(),
        "/help".cyan(),
        "/quit".cyan()
    );
    println!();

    loop {
        let line = match editor.readline("you> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };

        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(&line);

        if let Some(rest) = line.strip_prefix('/') {
            match handle_command(rest, &mut persona_id) {
                CommandOutcome::Continue => continue,
                CommandOutcome::Quit => break,
            }
        }

        send_message(&service, &user_id, persona_id, &line).await;
    }

    println!("Goodbye!");
    Ok(())
}

enum CommandOutcome {
    Continue,
    Quit,
}

fn handle_command(command: &str, persona_id: &mut PersonaId) -> CommandOutcome {
    let mut parts = command.split_whitespace();
    match parts.next() {
        Some("quit") | Some("exit") => CommandOutcome::Quit,
        Some("persona") => {
            match parts.next() {
                Some(name) => match PersonaId::try_parse(name) {
                    Some(id) => {
                        *persona_id = id;
                        println!(
                            "Now chatting with {}.",
                            personas::get(id).display_name.magenta().bold()
                        );
                    }
                    None => println!("{}", format!("Unknown persona: {}", name).yellow()),
                },
                None => println!("Usage: /persona <name>"),
            }
            CommandOutcome::Continue
        }
        _ => {
            println!("Commands: /persona <name>, /help, /quit");
            CommandOutcome::Continue
        }
    }
}

async fn send_message(service: &ChatService, user_id: &str, persona_id: PersonaId, text: &str) {
    match service
        .process_message(user_id, persona_id.as_str(), text)
        .await
    {
        Ok(outcome) => {
            let display_name = personas::get(outcome.persona).display_name;
            println!("{} {}", format!("{}>", display_name).magenta().bold(), outcome.response);

            let mut status = format!(
                "{} · intimacy {}",
                outcome.conversation.relationship_level, outcome.conversation.intimacy_level
            );
            if let Some(left) = outcome.user.messages_left {
                status.push_str(&format!(" · {} messages left today", left));
            }
            println!("{}", status.dimmed());
        }
        Err(e) => print_chat_error(e),
    }
}

fn print_chat_error(e: anyhow::Error) {
    match e.downcast_ref::<LovechatError>() {
        Some(LovechatError::DailyLimitReached { message, .. }) => {
            println!("{}", message.yellow());
        }
        Some(LovechatError::Validation(message)) => {
            println!("{}", message.yellow());
        }
        _ => {
            println!("{}", "Something went wrong, please try again.".red());
            tracing::error!("Chat error: {:#}", e);
        }
    }
}
