//! Test utilities for Lovechat
//!
//! This module provides common test fixtures: temporary storage,
//! scripted providers, and seeded users.

use crate::cache::MemoryCache;
use crate::chat::ChatService;
use crate::config::Config;
use crate::error::{LovechatError, Result};
use crate::models::{SubscriptionTier, User};
use crate::providers::{Completion, CompletionRequest, Provider};
use crate::storage::SqliteStorage;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Provider double that counts calls and either answers or fails
pub struct ScriptedProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Some(reply) => Ok(Completion {
                text: reply.clone(),
                model: request.model.clone(),
                tokens_used: 42,
            }),
            None => Err(LovechatError::Provider("scripted failure".to_string()).into()),
        }
    }
}

/// Creates a service backed by a temp database and a scripted provider
///
/// Returns the TempDir alongside so callers keep the directory alive.
pub fn test_service(provider: Arc<ScriptedProvider>) -> (ChatService, Arc<SqliteStorage>, TempDir) {
    let dir = TempDir::new().expect("Failed to create temporary directory");
    let storage = Arc::new(
        SqliteStorage::new_with_path(dir.path().join("lovechat.db"))
            .expect("Failed to create storage"),
    );
    let config = Config::default();
    let cache = Arc::new(MemoryCache::new(
        Duration::from_secs(config.chat.cache_ttl_seconds),
        config.chat.cache_capacity,
    ));
    let service = ChatService::new(storage.clone(), provider, cache, &config);
    (service, storage, dir)
}

/// Creates and persists a user on the given tier
pub fn seeded_user(storage: &SqliteStorage, tier: SubscriptionTier) -> User {
    let mut user = User::new("Alex", "alex@example.com", Utc::now());
    user.tier = tier;
    storage.save_user(&user).expect("Failed to save user");
    user
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_provider_answers() {
        let provider = ScriptedProvider::answering("hello");
        let request = CompletionRequest {
            messages: vec![],
            model: "m".to_string(),
            sampling: crate::personas::get(crate::personas::PersonaId::Emma).sampling,
        };
        let completion = provider.complete(&request).await.unwrap();
        assert_eq!(completion.text, "hello");
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_scripted_provider_fails() {
        let provider = ScriptedProvider::failing();
        let request = CompletionRequest {
            messages: vec![],
            model: "m".to_string(),
            sampling: crate::personas::get(crate::personas::PersonaId::Emma).sampling,
        };
        assert!(provider.complete(&request).await.is_err());
    }

    #[test]
    fn test_seeded_user_persisted() {
        let provider = Arc::new(ScriptedProvider::answering("x"));
        let (_service, storage, _dir) = test_service(provider);
        let user = seeded_user(&storage, SubscriptionTier::Premium);
        let loaded = storage.load_user(&user.id).unwrap().unwrap();
        assert_eq!(loaded.tier, SubscriptionTier::Premium);
    }
}
