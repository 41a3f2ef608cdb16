//! Shared fixtures for integration tests

use async_trait::async_trait;
use chrono::Utc;
use lovechat::cache::MemoryCache;
use lovechat::chat::ChatService;
use lovechat::config::Config;
use lovechat::error::{LovechatError, Result};
use lovechat::models::{SubscriptionTier, User};
use lovechat::providers::{Completion, CompletionRequest, OpenAiProvider, Provider};
use lovechat::storage::SqliteStorage;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Provider double that counts calls and either answers or fails
#[allow(dead_code)]
pub struct ScriptedProvider {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    #[allow(dead_code)]
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    #[allow(dead_code)]
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

/// Builds a service over a temp database with the given provider
#[allow(dead_code)]
pub fn service_with_provider(
    provider: Arc<dyn Provider>,
) -> (ChatService, Arc<SqliteStorage>, TempDir) {
    let dir = TempDir::new().expect("failed to create tempdir");
    let storage = Arc::new(
        SqliteStorage::new_with_path(dir.path().join("lovechat.db"))
            .expect("failed to create storage"),
    );
    let config = Config::default();
    let cache = Arc::new(MemoryCache::new(
        Duration::from_secs(config.chat.cache_ttl_seconds),
        config.chat.cache_capacity,
    ));
    let service = ChatService::new(storage.clone(), provider, cache, &config);
    (service, storage, dir)
}

/// Builds a service whose provider talks to `api_base` over HTTP
#[allow(dead_code)]
pub fn service_with_api_base(api_base: &str) -> (ChatService, Arc<SqliteStorage>, TempDir) {
    let mut config = Config::default();
    config.provider.openai.api_base = Some(api_base.to_string());

    let provider =
        Arc::new(OpenAiProvider::new(config.provider.openai.clone()).expect("provider init"));
    let dir = TempDir::new().expect("failed to create tempdir");
    let storage = Arc::new(
        SqliteStorage::new_with_path(dir.path().join("lovechat.db"))
            .expect("failed to create storage"),
    );
    let cache = Arc::new(MemoryCache::new(
        Duration::from_secs(config.chat.cache_ttl_seconds),
        config.chat.cache_capacity,
    ));
    let service = ChatService::new(storage.clone(), provider, cache, &config);
    (service, storage, dir)
}

/// Creates and persists a user on the given tier
#[allow(dead_code)]
pub fn seeded_user(storage: &SqliteStorage, tier: SubscriptionTier) -> User {
    let mut user = User::new("Alex", "alex@example.com", Utc::now());
    user.tier = tier;
    storage.save_user(&user).expect("failed to save user");
    user
}

/// JSON body of a successful chat completion
#[allow(dead_code)]
pub fn completion_body(text: &str, total_tokens: u32) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }
        ],
        "usage": {"prompt_tokens": 40, "completion_tokens": 10, "total_tokens": total_tokens}
    })
}
