//! Command handlers for the CLI
//!
//! Each submodule implements one subcommand. The helpers here wire the
//! storage, provider, and cache into a [`ChatService`] and manage the
//! local development user the CLI chats as.

pub mod analytics;
pub mod chat;
pub mod history;
pub mod personas;

use crate::cache::{MemoryCache, ResponseCache, SqliteCache};
use crate::chat::ChatService;
use crate::config::Config;
use crate::error::Result;
use crate::models::User;
use crate::providers::OpenAiProvider;
use crate::storage::SqliteStorage;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;

/// Id of the user the CLI chats as when none is given
pub const LOCAL_USER_ID: &str = "local";

/// Builds the service stack from configuration
pub fn build_service(config: &Config) -> Result<(Arc<SqliteStorage>, ChatService)> {
    let storage = Arc::new(SqliteStorage::new()?);
    let provider = Arc::new(OpenAiProvider::new(config.provider.openai.clone())?);
    let cache = build_cache(config, &storage)?;
    let service = ChatService::new(storage.clone(), provider, cache, config);
    Ok((storage, service))
}

fn build_cache(config: &Config, storage: &SqliteStorage) -> Result<Arc<dyn ResponseCache>> {
    let ttl = Duration::from_secs(config.chat.cache_ttl_seconds);
    match config.chat.cache_backend.as_str() {
        "sqlite" => {
            let path = storage.db_path().with_file_name("cache.db");
            Ok(Arc::new(SqliteCache::new_with_path(path, ttl)?))
        }
        _ => Ok(Arc::new(MemoryCache::new(ttl, config.chat.cache_capacity))),
    }
}

/// Loads or creates the local development user
pub fn ensure_local_user(storage: &SqliteStorage) -> Result<User> {
    if let Some(user) = storage.load_user(LOCAL_USER_ID)? {
        return Ok(user);
    }

    let mut user = User::new("You", "dev@localhost", Utc::now());
    user.id = LOCAL_USER_ID.to_string();
    storage.save_user(&user)?;
    tracing::info!("Created local development user");
    Ok(user)
}

/// Resolves the user id a command should act on
pub fn resolve_user_id(storage: &SqliteStorage, user: Option<String>) -> Result<String> {
    match user {
        Some(id) => Ok(id),
        None => Ok(ensure_local_user(storage)?.id),
    }
}
