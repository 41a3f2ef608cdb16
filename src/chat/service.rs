//! Chat orchestration
//!
//! [`ChatService`] sequences the full pipeline for one incoming message
//! and exposes the read-side accessors, message rating, and the account
//! deletion cascade.

use crate::cache::ResponseCache;
use crate::chat::quota;
use crate::chat::resolver::Resolver;
use crate::chat::state;
use crate::classifier;
use crate::config::{Config, PlansConfig};
use crate::error::{LovechatError, Result};
use crate::models::{
    message::validate_user_text, Conversation, ConversationSummary, Message, ResponseSource, User,
};
use crate::personas::PersonaId;
use crate::providers::Provider;
use crate::storage::{PersonaMessageStats, PersonaUsage, SqliteStorage};
use chrono::{DateTime, Utc};
use metrics::{histogram, increment_counter};
use std::sync::Arc;
use std::time::Instant;

/// Upgrade call-to-action returned with quota exhaustion
const UPGRADE_PROMPT: &str =
    "You've reached your daily message limit. Upgrade to Premium for unlimited messages!";

/// Generic apology for failures inside the pipeline
const PROCESSING_APOLOGY: &str =
    "Sorry, I had trouble processing your message. Please try again.";

/// Rough per-token cost used for accounting, in dollars
const COST_PER_TOKEN: f64 = 0.000002;

/// Conversation counters returned with each processed message
#[derive(Debug, Clone)]
pub struct ConversationCounters {
    pub id: String,
    pub message_count: u64,
    pub relationship_score: f64,
    pub relationship_level: String,
    pub intimacy_level: u8,
}

/// User counters returned with each processed message
#[derive(Debug, Clone)]
pub struct UserCounters {
    /// Messages remaining today, `None` for unlimited tiers
    pub messages_left: Option<u32>,
    pub current_streak: u32,
    pub relationship_level: f64,
    pub relationship_status: String,
}

/// Result of processing one message
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub message_id: String,
    pub response: String,
    pub source: ResponseSource,
    pub persona: PersonaId,
    pub conversation: ConversationCounters,
    pub user: UserCounters,
}

/// Per-persona and aggregate usage for one user
#[derive(Debug, Clone)]
pub struct UserAnalytics {
    pub total_messages: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub relationship_level: f64,
    pub relationship_status: String,
    pub joined_at: DateTime<Utc>,
    pub conversations: Vec<PersonaUsage>,
    pub messages: Vec<PersonaMessageStats>,
    pub favorite_persona: String,
}

/// Record counts removed by an account deletion cascade
#[derive(Debug, Clone, Copy)]
pub struct DeletionReport {
    pub messages_deleted: usize,
    pub conversations_deleted: usize,
}

/// The pipeline façade
pub struct ChatService {
    storage: Arc<SqliteStorage>,
    resolver: Resolver,
    plans: PlansConfig,
    history_turns: usize,
}

impl ChatService {
    pub fn new(
        storage: Arc<SqliteStorage>,
        provider: Arc<dyn Provider>,
        cache: Arc<dyn ResponseCache>,
        config: &Config,
    ) -> Self {
        Self {
            storage,
            resolver: Resolver::new(provider, cache, config),
            plans: config.plans.clone(),
            history_turns: config.chat.history_turns,
        }
    }

    /// Processes one incoming message end to end
    ///
    /// Validation and the quota gate run before any state mutation:
    /// a `Validation` or `DailyLimitReached` error leaves no trace.
    /// Failures after the gate are logged and surfaced as a generic
    /// processing error; records written before the failing step stay
    /// in place, so callers must treat that error as "unknown final
    /// state" rather than "no-op".
    pub async fn process_message(
        &self,
        user_id: &str,
        persona_name: &str,
        text: &str,
    ) -> Result<ChatOutcome> {
        let started = Instant::now();
        let now = Utc::now();

        validate_user_text(text)?;
        let persona_id = PersonaId::parse(persona_name);

        let mut user = self
            .storage
            .load_user(user_id)?
            .ok_or_else(|| LovechatError::UserNotFound(user_id.to_string()))?;

        if !quota::can_send_message(&mut user, &self.plans, now) {
            let limit = self.plans.daily_limit(user.tier).unwrap_or(0);
            tracing::info!("User {} hit daily limit of {}", user_id, limit);
            return Err(LovechatError::DailyLimitReached {
                limit,
                message: UPGRADE_PROMPT.to_string(),
            }
            .into());
        }

        match self
            .run_pipeline(&mut user, persona_id, text, now, started)
            .await
        {
            Ok(outcome) => {
                increment_counter!("lovechat_messages_processed_total");
                histogram!(
                    "lovechat_processing_seconds",
                    started.elapsed().as_secs_f64()
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!("Message processing failed for user {}: {:#}", user_id, e);
                increment_counter!("lovechat_processing_failures_total");
                Err(LovechatError::Processing(PROCESSING_APOLOGY.to_string()).into())
            }
        }
    }

    async fn run_pipeline(
        &self,
        user: &mut User,
        persona_id: PersonaId,
        text: &str,
        now: DateTime<Utc>,
        started: Instant,
    ) -> Result<ChatOutcome> {
        let mut conversation =
            state::get_or_create_active(&self.storage, &user.id, persona_id, now)?;

        user.update_streak(now);

        let history =
            self.storage
                .conversation_history(&user.id, &conversation.id, self.history_turns)?;
        let context_line = format!("The user's name is {}.", user.name);
        let resolved = self
            .resolver
            .resolve(persona_id, text, &history, Some(&context_line))
            .await;

        // Live scoring counts only content signals; the first-message
        // flag is recorded on the message but does not enter the score.
        let is_first = conversation.message_count == 0;
        let analysis = classifier::analyze(text, false);

        let mut message = Message::new(
            &user.id,
            &conversation.id,
            persona_id,
            text,
            &resolved.text,
            resolved.source,
            now,
        );
        message.model_used = resolved.model_used.clone();
        message.tokens_used = resolved.tokens_used;
        message.processing_ms = started.elapsed().as_millis() as u64;
        message.cost_cents = cost_cents(resolved.source, resolved.tokens_used);
        message.importance = analysis.importance;
        message.is_important = analysis.is_important;
        message.is_first_message = is_first;
        message.contains_personal_info = analysis.contains_personal_info;
        message.topics = analysis.topics.clone();
        message.sentiment = analysis.sentiment;
        message.memory_tags = analysis.memory_tags.clone();

        self.storage.save_message(&message)?;

        conversation.record_message(message.importance, now);
        for (fact, weight) in state::extract_user_facts(text) {
            conversation.upsert_fact(fact, weight, now);
        }
        if let Some((mood, confidence)) = state::detect_mood(text) {
            conversation.record_mood(mood, confidence, now);
        }
        for (kind, description) in state::detect_highlights(&message) {
            conversation.add_highlight(kind, description, &message.id, now);
        }

        quota::consume(user, now);

        user.raise_relationship_level(level_increment(&message, user));

        self.storage.save_user(user)?;
        self.storage.save_conversation(&conversation)?;

        tracing::debug!(
            "Processed message {} for user {} via {:?} in {}ms",
            message.id,
            user.id,
            message.source,
            message.processing_ms
        );

        Ok(self.outcome(&message, &conversation, user, now))
    }

    fn outcome(
        &self,
        message: &Message,
        conversation: &Conversation,
        user: &User,
        now: DateTime<Utc>,
    ) -> ChatOutcome {
        ChatOutcome {
            message_id: message.id.clone(),
            response: message.response_text.clone(),
            source: message.source,
            persona: message.persona,
            conversation: ConversationCounters {
                id: conversation.id.clone(),
                message_count: conversation.message_count,
                relationship_score: conversation.relationship_score,
                relationship_level: conversation.relationship_level().to_string(),
                intimacy_level: conversation.intimacy_level,
            },
            user: UserCounters {
                messages_left: quota::messages_left(user, &self.plans, now),
                current_streak: user.relationship.current_streak,
                relationship_level: user.relationship.level,
                relationship_status: user.relationship_status().to_string(),
            },
        }
    }

    // ------------------------------------------------------------------
    // Read accessors
    // ------------------------------------------------------------------

    /// Most recent messages of a conversation, in chronological order
    pub fn get_conversation_history(
        &self,
        user_id: &str,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<Message>> {
        self.storage
            .conversation_history(user_id, conversation_id, limit)
    }

    /// Summaries of a user's conversations, most recently active first
    pub fn list_conversations(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>> {
        Ok(self
            .storage
            .list_conversations(user_id, limit)?
            .iter()
            .map(Conversation::summary)
            .collect())
    }

    /// Aggregated per-persona usage plus user-level counters
    pub fn get_user_analytics(&self, user_id: &str) -> Result<UserAnalytics> {
        let user = self
            .storage
            .load_user(user_id)?
            .ok_or_else(|| LovechatError::UserNotFound(user_id.to_string()))?;

        let conversations = self.storage.persona_usage(user_id)?;
        let messages = self.storage.persona_message_stats(user_id)?;

        let favorite_persona = conversations
            .iter()
            .max_by_key(|u| u.total_messages)
            .map(|u| u.persona.clone())
            .unwrap_or_else(|| PersonaId::Emma.as_str().to_string());

        Ok(UserAnalytics {
            total_messages: user.usage.total_messages,
            current_streak: user.relationship.current_streak,
            longest_streak: user.relationship.longest_streak,
            relationship_level: user.relationship.level,
            relationship_status: user.relationship_status().to_string(),
            joined_at: user.usage.joined_at,
            conversations,
            messages,
            favorite_persona,
        })
    }

    // ------------------------------------------------------------------
    // Mutations outside the pipeline
    // ------------------------------------------------------------------

    /// Attaches a rating (and optional feedback) to a message
    ///
    /// The only permitted mutation of a message after analysis.
    pub fn rate_message(
        &self,
        user_id: &str,
        message_id: &str,
        rating: u8,
        feedback: Option<String>,
    ) -> Result<()> {
        let mut message = self
            .storage
            .load_message(message_id)?
            .ok_or_else(|| LovechatError::Validation(format!("Unknown message: {}", message_id)))?;

        if message.user_id != user_id {
            return Err(
                LovechatError::Validation("Message belongs to another user".to_string()).into(),
            );
        }

        message.rate(rating, feedback)?;
        self.storage.save_message(&message)?;
        tracing::info!("Message {} rated {}/5 by user {}", message_id, rating, user_id);
        Ok(())
    }

    /// Deletes a conversation and its messages
    pub fn delete_conversation(&self, user_id: &str, conversation_id: &str) -> Result<()> {
        let conversation = self
            .storage
            .load_conversation(conversation_id)?
            .ok_or_else(|| {
                LovechatError::Validation(format!("Unknown conversation: {}", conversation_id))
            })?;

        if conversation.user_id != user_id {
            return Err(LovechatError::Validation(
                "Conversation belongs to another user".to_string(),
            )
            .into());
        }

        let removed = self
            .storage
            .delete_messages_for_conversation(conversation_id)?;
        self.storage.delete_conversation(conversation_id)?;
        tracing::info!(
            "Deleted conversation {} and {} messages",
            conversation_id,
            removed
        );
        Ok(())
    }

    /// Deletes an account and everything it owns
    ///
    /// Explicit multi-step cascade: messages, then conversations, then
    /// the user record. The store offers no cross-table transaction, so
    /// a failure mid-cascade leaves the earlier deletions in place;
    /// each step is logged and the operation can be re-run to finish.
    pub fn delete_account(&self, user_id: &str) -> Result<DeletionReport> {
        self.storage
            .load_user(user_id)?
            .ok_or_else(|| LovechatError::UserNotFound(user_id.to_string()))?;

        let messages_deleted = self.storage.delete_messages_for_user(user_id)?;
        tracing::info!("Account {}: deleted {} messages", user_id, messages_deleted);

        let conversations_deleted = self.storage.delete_conversations_for_user(user_id)?;
        tracing::info!(
            "Account {}: deleted {} conversations",
            user_id,
            conversations_deleted
        );

        self.storage.delete_user(user_id)?;
        tracing::info!("Account {}: user record deleted", user_id);

        Ok(DeletionReport {
            messages_deleted,
            conversations_deleted,
        })
    }
}

/// Computes the accounting cost of a response, in cents
///
/// Canned and cached responses are free; generated ones are billed at
/// a flat per-token rate with a floor of 100 tokens.
fn cost_cents(source: ResponseSource, tokens_used: u32) -> u32 {
    match source {
        ResponseSource::Generated => {
            let tokens = tokens_used.max(100) as f64;
            (tokens * COST_PER_TOKEN * 100.0).round() as u32
        }
        _ => 0,
    }
}

/// Weighted user-level relationship increment for one message
fn level_increment(message: &Message, user: &User) -> f64 {
    let mut increment = 0.1;
    if message.is_important {
        increment += 0.5;
    }
    if message.contains_personal_info {
        increment += 1.0;
    }
    if message.sentiment == crate::models::Sentiment::Positive {
        increment += 0.2;
    }
    if user.relationship.current_streak >= 7 {
        increment += 0.3;
    }
    increment
}
